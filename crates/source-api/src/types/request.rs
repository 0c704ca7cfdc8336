use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// Attribute constraints applied to a full search. Every entry must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether `attributes` satisfies every constraint (case-insensitive values).
    pub fn matches(&self, attributes: &BTreeMap<String, String>) -> bool {
        self.0.iter().all(|(key, wanted)| {
            attributes
                .get(key)
                .is_some_and(|value| value.eq_ignore_ascii_case(wanted))
        })
    }
}

impl FromIterator<(String, String)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parameters of a full results lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsRequest {
    pub query: String,
    pub lang: String,
    #[serde(default)]
    pub filters: FilterSet,
    pub sort_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_require_every_attribute() {
        let mut filters = FilterSet::new();
        filters.insert("fuel", "Electric");
        filters.insert("make", "toyota");

        let mut attributes = BTreeMap::new();
        attributes.insert("make".to_string(), "Toyota".to_string());
        assert!(!filters.matches(&attributes));

        attributes.insert("fuel".to_string(), "electric".to_string());
        assert!(filters.matches(&attributes));
    }

    #[test]
    fn empty_filters_match_anything() {
        assert!(FilterSet::new().matches(&BTreeMap::new()));
    }

    #[test]
    fn distance_between_known_cities() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1278);
        let km = paris.distance_km(&london);
        assert!((340.0..350.0).contains(&km), "unexpected distance {km}");
        assert_eq!(paris.distance_km(&paris), 0.0);
    }
}
