use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Point `fraction` of the way from `self` to `other`, in plain degree space.
    pub fn lerp(&self, other: &Position, fraction: f64) -> Position {
        Position {
            lat: self.lat + (other.lat - self.lat) * fraction,
            lon: self.lon + (other.lon - self.lon) * fraction,
        }
    }

    /// Great-circle distance using the haversine formula.
    pub fn distance_to(&self, other: &Position) -> Distance {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        Distance { km: EARTH_RADIUS_KM * c }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub km: f64
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Position,
    pub north_east: Position,
}

impl Bounds {
    /// Bounding box of a path, `None` for an empty one.
    pub fn of(path: &[Position]) -> Option<Bounds> {
        let first = path.first()?;
        let init = Bounds { south_west: *first, north_east: *first };

        Some(path.iter().skip(1).fold(init, |mut b, p| {
            b.south_west.lat = b.south_west.lat.min(p.lat);
            b.south_west.lon = b.south_west.lon.min(p.lon);
            b.north_east.lat = b.north_east.lat.max(p.lat);
            b.north_east.lon = b.north_east.lon.max(p.lon);
            b
        }))
    }
}

pub type Route = Vec<Position>;
