use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_m(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Rectangle that encloses the radius around this point, used as a cheap
    /// store-level prefilter before the exact distance check.
    pub fn bounding_box(&self, radius_km: f64) -> BoundingBox {
        let radius_m = radius_km.max(0.0) * 1000.0;
        let lat_delta = radius_m / METERS_PER_DEGREE_LATITUDE;
        // Longitude degrees shrink towards the poles; keep the divisor away
        // from zero so the box degenerates to the full range instead of NaN.
        let lat_cos = self.latitude.to_radians().cos().abs().max(1e-6);
        let lon_delta = lat_delta / lat_cos;

        BoundingBox {
            min_latitude: (self.latitude - lat_delta).max(-90.0),
            max_latitude: (self.latitude + lat_delta).min(90.0),
            min_longitude: (self.longitude - lon_delta).max(-180.0),
            max_longitude: (self.longitude + lon_delta).min(180.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// Whole kilometers as shown to callers: rounded up, never below 1.
pub fn display_km(distance_m: f64) -> i64 {
    let km = (distance_m / 1000.0).ceil() as i64;
    km.max(1)
}
