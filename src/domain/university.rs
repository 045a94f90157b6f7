use crate::domain::geo::Coordinates;
use crate::domain::wire::{format_coordinate, parse_decimal, text_or_number};
use serde::{Deserialize, Serialize};

/// Reference point for listing distances.
#[derive(Debug, Clone, PartialEq)]
pub struct University {
    pub name: String,
    pub full_name: String,
    pub location: Coordinates,
}

/// University JSON as served by `GET /api/universities/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiUniversity {
    pub name: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub lat: String,
    #[serde(deserialize_with = "text_or_number")]
    pub lng: String,
}

impl University {
    pub fn new(name: &str, full_name: &str, lat: f64, lng: f64) -> Self {
        Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
            location: Coordinates::new(lat, lng),
        }
    }

    pub fn from_wire(api: ApiUniversity) -> Self {
        let lat = parse_decimal(&api.lat).unwrap_or(f64::NAN);
        let lng = parse_decimal(&api.lng).unwrap_or(f64::NAN);
        Self {
            name: api.name,
            full_name: api.full_name,
            location: Coordinates::new(lat, lng),
        }
    }

    pub fn to_api(&self) -> ApiUniversity {
        ApiUniversity {
            name: self.name.clone(),
            full_name: self.full_name.clone(),
            lat: format_coordinate(self.location.lat),
            lng: format_coordinate(self.location.lng),
        }
    }
}
