use serde::{Deserialize, Serialize};

/// Geographic position in degrees.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180], but nothing
/// here enforces it: out-of-range or NaN values are carried through as-is.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub lat_deg: f64,
    #[serde(rename = "lon")]
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// The point on the opposite side of the sphere.
    pub fn antipode(self) -> Self {
        Self::new(-self.lat_deg, self.lon_deg + 180.0)
    }

    /// Same latitude, longitude shifted by `delta_deg` (not wrapped).
    pub fn offset_lon(self, delta_deg: f64) -> Self {
        Self::new(self.lat_deg, self.lon_deg + delta_deg)
    }

    pub fn is_finite(self) -> bool {
        self.lat_deg.is_finite() && self.lon_deg.is_finite()
    }
}
