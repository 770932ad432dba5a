use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::{Row, Value};
use crate::types::{Error, Result};

const EARTH_RADIUS_KM: f64 = 6373.0;

/// Writes the great-circle distance in kilometres between two `[lon, lat]`
/// coordinate columns (degrees), using the haversine formula.
pub struct HaversineDistance {
    id: String,
    start: String,
    end: String,
    out: String,
}

impl HaversineDistance {
    pub fn new(
        id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        out: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            out: out.into(),
        }
    }

    fn coordinate(&self, row: &Row, column: &str) -> Result<(f64, f64)> {
        let bad_pair = || {
            let id = row.get(&self.id).cloned().unwrap_or(Value::Null);
            Error::Type(format!(
                "column {column:?} of {id} is not a [lon, lat] pair"
            ))
        };
        match row.list(column)? {
            [lon, lat] => match (lon.as_f64(), lat.as_f64()) {
                (Some(lon), Some(lat)) => Ok((lon.to_radians(), lat.to_radians())),
                _ => Err(bad_pair()),
            },
            _ => Err(bad_pair()),
        }
    }
}

impl Mapper for HaversineDistance {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let (lon1, lat1) = self.coordinate(&row, &self.start)?;
        let (lon2, lat2) = self.coordinate(&row, &self.end)?;
        let lat_sin = ((lat2 - lat1) / 2.0).sin().powi(2);
        let lon_sin = ((lon2 - lon1) / 2.0).sin().powi(2);
        let angle = (lat_sin + lat1.cos() * lat2.cos() * lon_sin).sqrt();
        row.set(self.out.as_str(), 2.0 * EARTH_RADIUS_KM * angle.asin());
        Ok(smallvec![row])
    }
}
