/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use lavras_clima::{LatLon, LAVRAS};
///
/// let lavras = LatLon(-21.245, -45.0);
/// assert_eq!(lavras, LAVRAS);
/// assert_eq!(lavras.0, -21.245); // Latitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Lavras - MG, the location every dashboard request is made for.
pub const LAVRAS: LatLon = LatLon(-21.245, -45.000);

/// Hashable form of a [`LatLon`], used to key cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey(u64, u64);

impl LatLon {
    pub fn latitude(self) -> f64 {
        self.0
    }

    pub fn longitude(self) -> f64 {
        self.1
    }

    pub(crate) fn cache_key(self) -> LocationKey {
        // -0.0 and 0.0 must share a key
        LocationKey((self.0 + 0.0).to_bits(), (self.1 + 0.0).to_bits())
    }

    pub(crate) fn query_params(self) -> [(&'static str, String); 2] {
        [
            ("latitude", self.0.to_string()),
            ("longitude", self.1.to_string()),
        ]
    }
}
