// explorer/client.rs
//
// HTTP client for the listings API plus the "load or degrade" helpers the
// explorer uses at startup.

use crate::domain::listing::{ApiListing, Listing, ListingInput};
use crate::domain::university::{ApiUniversity, University};
use crate::errors::FieldErrors;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    BadUrl(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
}

/// The three calls the explorer makes against the API.
pub trait ListingsBackend {
    fn fetch_listings(&self) -> Result<Vec<ApiListing>, ClientError>;
    fn fetch_universities(&self) -> Result<Vec<ApiUniversity>, ClientError>;
    fn create_listing(&self, input: &ListingInput) -> Result<ApiListing, ClientError>;
}

pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // Relative joins drop the last path segment unless it ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ClientError::BadUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::BadUrl(e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        decode_ok(status, &body)
    }
}

impl ListingsBackend for ApiClient {
    fn fetch_listings(&self) -> Result<Vec<ApiListing>, ClientError> {
        self.get_json("api/listings/")
    }

    fn fetch_universities(&self) -> Result<Vec<ApiUniversity>, ClientError> {
        self.get_json("api/universities/")
    }

    fn create_listing(&self, input: &ListingInput) -> Result<ApiListing, ClientError> {
        let url = self.endpoint("api/listings/")?;
        let resp = self
            .client
            .post(url)
            .json(input)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        decode_create_response(status, &body)
    }
}

/// Decode a 2xx JSON body; anything else is a `Status` error.
pub fn decode_ok<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Status {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// A 400 with a field-keyed body becomes `Validation`.
pub fn decode_create_response(status: u16, body: &[u8]) -> Result<ApiListing, ClientError> {
    if status == 400 {
        if let Ok(fields) = serde_json::from_slice::<FieldErrors>(body) {
            return Err(ClientError::Validation(fields));
        }
    }
    decode_ok(status, body)
}

/// Fetch and convert listings. Failures degrade to an empty collection.
pub fn load_listings(backend: &dyn ListingsBackend) -> Vec<Listing> {
    match backend.fetch_listings() {
        Ok(raw) => {
            let listings: Vec<Listing> = raw.into_iter().map(Listing::from_wire).collect();
            let flagged = listings.iter().filter(|l| !l.issues.is_empty()).count();
            if flagged > 0 {
                tracing::warn!(flagged, "listings with malformed numeric fields");
            }
            tracing::info!(count = listings.len(), "listings loaded");
            listings
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load listings; continuing with none");
            Vec::new()
        }
    }
}

pub fn load_universities(backend: &dyn ListingsBackend) -> Vec<University> {
    match backend.fetch_universities() {
        Ok(raw) => raw.into_iter().map(University::from_wire).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "could not load universities; continuing with none");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DownBackend;

    impl ListingsBackend for DownBackend {
        fn fetch_listings(&self) -> Result<Vec<ApiListing>, ClientError> {
            Err(ClientError::Network("connection refused".into()))
        }
        fn fetch_universities(&self) -> Result<Vec<ApiUniversity>, ClientError> {
            Err(ClientError::Status {
                status: 502,
                body: String::new(),
            })
        }
        fn create_listing(&self, _input: &ListingInput) -> Result<ApiListing, ClientError> {
            Err(ClientError::Network("connection refused".into()))
        }
    }

    #[test]
    fn failed_loads_degrade_to_empty() {
        assert!(load_listings(&DownBackend).is_empty());
        assert!(load_universities(&DownBackend).is_empty());
    }

    #[test]
    fn decodes_string_decimals_from_listing_array() {
        let body = br#"[{
            "id": 3, "title": "Room", "price": "875.00",
            "address": "1 A St, Pasadena, CA, 91101",
            "bedrooms": 1, "bathrooms": 1.0, "sqft": null,
            "lat": "34.1", "lng": "not a number",
            "type": "Shared Room", "description": "",
            "amenities": ["WiFi"],
            "owner": {"name": "Property Owner", "verified": true},
            "available": true, "available_from": null,
            "images": [], "image_url": ""
        }]"#;
        let raw: Vec<ApiListing> = decode_ok(200, body).unwrap();
        let listing = Listing::from_wire(raw.into_iter().next().unwrap());
        assert_eq!(listing.price, 875.0);
        assert!(!listing.is_placeable());
    }

    #[test]
    fn create_validation_errors_are_field_keyed() {
        let err = decode_create_response(400, br#"{"price": ["A valid number is required."]}"#)
            .unwrap_err();
        match err {
            ClientError::Validation(fields) => {
                assert_eq!(fields.get("price").map(|m| m.len()), Some(1));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let err = decode_create_response(500, b"boom").unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let client = ApiClient::new("http://localhost:3000/rentals").unwrap();
        assert_eq!(
            client.endpoint("api/listings/").unwrap().as_str(),
            "http://localhost:3000/rentals/api/listings/"
        );
    }
}
