use serde::{Deserialize, Serialize};

/// A WGS-84 position in degrees. Serialized as `[lat, lon]`, the order the
/// mapping library expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lat, p.lon]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

/// All track points of one GPX file, flattened across `<trk>` and `<trkseg>`.
/// Never empty when produced by the extractor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    /// Text of the first `<trk><name>`, if the file has one.
    pub name: Option<String>,
    pub points: Vec<GeoPoint>,
}

impl Track {
    pub fn start(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }
}

/// Axis-aligned lat/lon box. Serialized as `[[south, west], [north, east]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[[f64; 2]; 2]")]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl Bounds {
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for p in rest {
            bounds.include(*p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: GeoPoint) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lon = self.south_west.lon.min(p.lon);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lon = self.north_east.lon.max(p.lon);
    }

    pub fn union(mut self, other: Bounds) -> Self {
        self.include(other.south_west);
        self.include(other.north_east);
        self
    }
}

impl From<Bounds> for [[f64; 2]; 2] {
    fn from(b: Bounds) -> Self {
        [b.south_west.into(), b.north_east.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let pts = [
            GeoPoint::new(51.3, 0.49),
            GeoPoint::new(51.1, 0.52),
            GeoPoint::new(51.4, 0.40),
        ];
        let b = Bounds::from_points(&pts).unwrap();
        assert_eq!(b.south_west, GeoPoint::new(51.1, 0.40));
        assert_eq!(b.north_east, GeoPoint::new(51.4, 0.52));
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_point_serializes_lat_first() {
        let json = serde_json::to_value(GeoPoint::new(51.3, -0.1)).unwrap();
        assert_eq!(json, serde_json::json!([51.3, -0.1]));
    }

    #[test]
    fn test_track_start_end() {
        let track = Track {
            name: None,
            points: vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)],
        };
        assert_eq!(track.start(), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(track.end(), Some(GeoPoint::new(3.0, 4.0)));
    }
}
