// src/domain/listing.rs

use crate::domain::geo::Coordinates;
use crate::domain::wire::{
    format_coordinate, format_price, nullable, nullable_text_or_number, opt_text_or_number,
    parse_decimal, text_or_number,
};
use crate::errors::FieldErrors;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ListingId = i64;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_PRICE: f64 = 999_999.99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub verified: bool,
}

impl Owner {
    /// Public face of a listing owner: `"jdoe"` → `"J. Doe"`.
    /// Listings whose owner row is gone show a generic verified owner.
    pub fn from_account(username: Option<&str>, is_active: bool) -> Self {
        match username.filter(|u| !u.is_empty()) {
            Some(name) => Owner {
                name: display_name(name),
                verified: is_active,
            },
            None => Owner {
                name: "Property Owner".to_string(),
                verified: true,
            },
        }
    }
}

fn display_name(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) if username.chars().count() > 1 => {
            let initial: String = first.to_uppercase().collect();
            format!("{initial}. {}", title_case(chars.as_str()))
        }
        _ => title_case(username),
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingImage {
    pub id: i64,
    pub image_url: String,
    pub label: Option<String>,
    pub order: i64,
}

/// A field that arrived from the API but could not be parsed.
/// The listing is kept; the issue is recorded so callers can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingIssue {
    Price,
    Latitude,
    Longitude,
}

/// A listing as held in memory by the explorer.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    /// Monthly rent in USD. NaN when the API sent something unparsable.
    pub price: f64,
    pub location: Coordinates,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft: Option<u32>,
    pub category: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub owner: Owner,
    pub available: bool,
    pub available_from: Option<NaiveDate>,
    pub image_url: String,
    pub images: Vec<ListingImage>,
    /// Miles to the target university; `None` until one is picked.
    pub distance_miles: Option<f64>,
    pub issues: Vec<ListingIssue>,
}

impl Listing {
    pub fn from_wire(api: ApiListing) -> Self {
        let mut issues = Vec::new();

        let price = parse_decimal(&api.price).unwrap_or_else(|| {
            issues.push(ListingIssue::Price);
            f64::NAN
        });
        let mut coordinate = |raw: Option<&str>, issue: ListingIssue| {
            raw.and_then(parse_decimal).unwrap_or_else(|| {
                issues.push(issue);
                f64::NAN
            })
        };
        let lat = coordinate(api.lat.as_deref(), ListingIssue::Latitude);
        let lng = coordinate(api.lng.as_deref(), ListingIssue::Longitude);

        let mut amenities: Vec<String> = Vec::with_capacity(api.amenities.len());
        for tag in api.amenities {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !amenities.contains(&tag) {
                amenities.push(tag);
            }
        }

        Listing {
            id: api.id,
            title: api.title,
            price,
            location: Coordinates::new(lat, lng),
            bedrooms: u32::try_from(api.bedrooms.max(0)).unwrap_or(u32::MAX),
            bathrooms: api.bathrooms,
            sqft: api.sqft.and_then(|s| u32::try_from(s).ok()),
            category: api.category,
            address: api.address,
            description: api.description,
            amenities,
            owner: api.owner,
            available: api.available,
            available_from: api.available_from,
            image_url: api.image_url,
            images: api.images,
            distance_miles: None,
            issues,
        }
    }

    pub fn has_amenity(&self, tag: &str) -> bool {
        self.amenities.iter().any(|a| a == tag)
    }

    /// Whether the listing can be placed on the map.
    pub fn is_placeable(&self) -> bool {
        self.location.is_finite()
    }
}

/// Listing JSON as served by `GET /api/listings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiListing {
    pub id: ListingId,
    pub title: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    pub address: String,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub sqft: Option<i64>,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    pub lng: Option<String>,
    #[serde(rename = "type")]
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub owner: Owner,
    pub available: bool,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    #[serde(default)]
    pub image_url: String,
}

/// One row of `listings` joined with its owner.
#[derive(Debug, Clone)]
pub struct StoredListing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub monthly_rent: f64,
    pub bedrooms: String,
    pub bathrooms: String,
    pub square_feet: Option<i64>,
    pub room_type: String,
    pub amenities: String,
    pub image_url: String,
    pub is_active: bool,
    pub available_from: Option<NaiveDate>,
    pub owner_id: i64,
    pub owner_username: Option<String>,
    pub owner_is_active: bool,
}

impl StoredListing {
    pub fn full_address(&self) -> String {
        [
            self.address.as_deref(),
            Some(self.city.as_str()),
            Some(self.state.as_str()),
            self.zip_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn to_api(&self, images: Vec<ListingImage>) -> ApiListing {
        ApiListing {
            id: self.id,
            title: self.title.clone(),
            price: format_price(self.monthly_rent),
            address: self.full_address(),
            bedrooms: parse_bedrooms(&self.bedrooms),
            bathrooms: parse_bathrooms(&self.bathrooms),
            sqft: self.square_feet,
            lat: self.latitude.map(format_coordinate),
            lng: self.longitude.map(format_coordinate),
            category: self.room_type.clone(),
            description: self.description.clone(),
            amenities: split_amenities(&self.amenities),
            owner: Owner::from_account(self.owner_username.as_deref(), self.owner_is_active),
            available: self.is_active,
            available_from: self.available_from,
            images,
            image_url: self.image_url.clone(),
        }
    }
}

/// Bedrooms are stored as text; "Studio" counts as zero.
pub fn parse_bedrooms(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("studio") {
        return 0;
    }
    raw.parse().unwrap_or(0)
}

pub fn parse_bathrooms(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(1.0)
}

pub fn split_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of `POST /api/listings/` and `PUT`/`PATCH /api/listings/{id}/`.
///
/// Nullable fields are doubly optional: `None` was not sent, `Some(None)` was
/// sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text_or_number", skip_serializing_if = "Option::is_none")]
    pub lat: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text_or_number", skip_serializing_if = "Option::is_none")]
    pub lng: Option<Option<String>>,
    #[serde(default, deserialize_with = "opt_text_or_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "opt_text_or_number", skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<String>,
    #[serde(default, deserialize_with = "opt_text_or_number", skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub sqft: Option<Option<i64>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub available_from: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Create,
    Replace,
    Patch,
}

/// Validated, typed listing fields. `None` means "not sent"; `Some(None)`
/// clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub monthly_rent: Option<f64>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub square_feet: Option<Option<i64>>,
    pub room_type: Option<String>,
    pub amenities: Option<String>,
    pub image_url: Option<String>,
    pub available_from: Option<Option<NaiveDate>>,
    pub owner_id: Option<i64>,
}

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_A_NUMBER: &str = "A valid number is required.";

impl ListingInput {
    pub fn with_coordinates(mut self, at: Coordinates) -> Self {
        self.lat = Some(Some(format_coordinate(at.lat)));
        self.lng = Some(Some(format_coordinate(at.lng)));
        self
    }

    pub fn has_coordinates(&self) -> bool {
        let parsed = |raw: &Option<Option<String>>| {
            raw.as_ref().and_then(|v| v.as_deref()).and_then(parse_decimal)
        };
        parsed(&self.lat).is_some() && parsed(&self.lng).is_some()
    }

    /// Address line used for geocoding a new listing.
    pub fn geocoding_query(&self) -> String {
        [
            self.address.as_ref().and_then(|a| a.as_deref()),
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip_code.as_ref().and_then(|z| z.as_deref()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn validate(&self, mode: InputMode) -> Result<ListingChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let require_all = mode != InputMode::Patch;

        let mut required_text = |field: &str, value: &Option<String>| -> Option<String> {
            match value {
                None if require_all => {
                    errors.add(field, REQUIRED);
                    None
                }
                None => None,
                Some(v) if v.trim().is_empty() => {
                    errors.add(field, BLANK);
                    None
                }
                Some(v) => Some(v.trim().to_string()),
            }
        };

        let title = required_text("title", &self.title);
        let description = required_text("description", &self.description);
        let city = required_text("city", &self.city);
        let state = required_text("state", &self.state);
        let bedrooms = required_text("bedrooms", &self.bedrooms);
        let bathrooms = required_text("bathrooms", &self.bathrooms);
        let room_type = required_text("type", &self.category);

        if title.as_ref().map_or(false, |t| t.chars().count() > MAX_TITLE_LEN) {
            errors.add(
                "title",
                format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
            );
        }

        let monthly_rent = match self.price.as_deref() {
            None => {
                if require_all {
                    errors.add("price", REQUIRED);
                }
                None
            }
            Some(raw) => match parse_decimal(raw) {
                None => {
                    errors.add("price", NOT_A_NUMBER);
                    None
                }
                Some(p) if p <= 0.0 => {
                    errors.add("price", "Ensure this value is greater than 0.");
                    None
                }
                Some(p) if p > MAX_PRICE => {
                    errors.add(
                        "price",
                        "Ensure that there are no more than 8 digits in total.",
                    );
                    None
                }
                Some(p) => Some(p),
            },
        };

        // Blank clears the coordinate like `null` does.
        let mut coordinate =
            |field: &str, raw: &Option<Option<String>>, limit: f64| -> Option<Option<f64>> {
                let raw = match raw.as_ref()? {
                    Some(r) if !r.trim().is_empty() => r,
                    _ => return Some(None),
                };
                match parse_decimal(raw) {
                    None => {
                        errors.add(field, NOT_A_NUMBER);
                        None
                    }
                    Some(v) if v.abs() > limit => {
                        errors.add(
                            field,
                            format!("Ensure this value is between -{limit} and {limit}."),
                        );
                        None
                    }
                    Some(v) => Some(Some(v)),
                }
            };
        let latitude = coordinate("lat", &self.lat, 90.0);
        let longitude = coordinate("lng", &self.lng, 180.0);

        if self.sqft.flatten().map_or(false, |s| s < 0) {
            errors.add("sqft", "Ensure this value is greater than or equal to 0.");
        }

        let available_from = match self.available_from.as_ref() {
            None => None,
            Some(sent) => match sent.as_deref().map(str::trim) {
                None | Some("") => Some(None),
                Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    Ok(d) => Some(Some(d)),
                    Err(_) => {
                        errors.add(
                            "available_from",
                            "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
                        );
                        None
                    }
                },
            },
        };

        if self.owner_id.is_none() && require_all {
            errors.add("owner_id", REQUIRED);
        }

        errors.into_result()?;

        Ok(ListingChanges {
            title,
            description,
            address: trimmed_nullable(&self.address),
            city,
            state,
            zip_code: trimmed_nullable(&self.zip_code),
            latitude,
            longitude,
            monthly_rent,
            bedrooms,
            bathrooms,
            square_feet: self.sqft,
            room_type,
            amenities: self.amenities.as_ref().map(|list| {
                list.iter()
                    .map(|a| a.trim())
                    .filter(|a| !a.is_empty())
                    .collect::<Vec<_>>()
                    .join(",")
            }),
            image_url: self.image_url.clone(),
            available_from,
            owner_id: self.owner_id,
        })
    }
}

/// Trim a sent value; `null` and blank both clear the column.
fn trimmed_nullable(value: &Option<Option<String>>) -> Option<Option<String>> {
    value.as_ref().map(|sent| {
        sent.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}
