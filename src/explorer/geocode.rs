// explorer/geocode.rs
use crate::domain::geo::Coordinates;
use crate::domain::wire::parse_decimal;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "campus-rentals/0.1 (listing explorer)";

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding is not configured")]
    Unavailable,
    #[error("no result for {0:?}")]
    NoResult(String),
    #[error("geocoder request failed: {0}")]
    Network(String),
}

/// Address → coordinates. Failures are never fatal to callers.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError>;
}

/// Used when no provider is configured: every lookup fails softly.
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    fn geocode(&self, _query: &str) -> Result<Coordinates, GeocodeError> {
        Err(GeocodeError::Unavailable)
    }
}

/// OpenStreetMap Nominatim search endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        places
            .into_iter()
            .find_map(|p| Some(Coordinates::new(parse_decimal(&p.lat)?, parse_decimal(&p.lon)?)))
            .ok_or_else(|| GeocodeError::NoResult(query.to_string()))
    }
}
