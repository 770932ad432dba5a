//! Average speed in km/h by weekday and hour, from a JSON-lines file of
//! travel times and one of road edges:
//!
//! ```sh
//! cargo run --example average_speed -- travel_times.jsonl road_graph.jsonl
//! ```

use anyhow::Context;
use rowflow::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let usage = "usage: average_speed <travel_times.jsonl> <road_graph.jsonl>";
    let times = args.next().context(usage)?;
    let edges = args.next().context(usage)?;
    for row in average_speed_graph(&times, &edges).run(&Sources::new())? {
        println!("{}", serde_json::to_string(&row?)?);
    }
    Ok(())
}

fn average_speed_graph(times: &str, edges: &str) -> Graph {
    let parser = |line: &str| Row::from_json_str(line);
    let distances = Graph::from_file(edges, parser)
        .map(HaversineDistance::new("edge_id", "start", "end", "distance"))
        .map(Project::new(&["edge_id", "distance"]))
        .sort(&["edge_id"]);
    let durations = Graph::from_file(times, parser)
        .map(TravelTimeParts::new(
            "enter_time",
            "leave_time",
            "weekday",
            "hour",
            "duration",
        ))
        .map(Project::new(&["edge_id", "weekday", "hour", "duration"]))
        .sort(&["edge_id"]);
    // the stable sort keeps rows of one edge contiguous within an hour
    let joined = durations
        .join(InnerJoiner::new(), &distances, &["edge_id"])
        .sort(&["weekday", "hour"]);
    let per_edge_keys = ["edge_id", "weekday", "hour"];
    let total_duration = joined
        .reduce(Sum::new("duration"), &per_edge_keys)
        .sort(&per_edge_keys);
    let total_distance = joined
        .reduce(Sum::new("distance"), &per_edge_keys)
        .sort(&per_edge_keys);
    total_duration
        .join(InnerJoiner::new(), &total_distance, &per_edge_keys)
        .map(Apply::new(
            |row| Ok(Value::from(row.f64("distance")? / row.f64("duration")?)),
            "speed",
        ))
        .map(Project::new(&["weekday", "hour", "speed"]))
}
