// src/domain/filter.rs

use crate::domain::listing::{Listing, ListingId};
use std::collections::{BTreeSet, HashSet};

/// Predicate parameters for the listing sidebar and marker dimming.
///
/// A listing passes when it satisfies every active dimension: AND across
/// dimensions, OR within `categories`, AND within `amenities`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    /// Empty accepts every category.
    pub categories: BTreeSet<String>,
    pub min_bedrooms: u32,
    pub min_bathrooms: f64,
    pub price_min: f64,
    pub price_max: f64,
    pub area_min: f64,
    pub area_max: f64,
    /// Every tag here must be on the listing.
    pub amenities: BTreeSet<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            categories: BTreeSet::new(),
            min_bedrooms: 0,
            min_bathrooms: 0.0,
            price_min: 0.0,
            price_max: f64::INFINITY,
            area_min: 0.0,
            area_max: f64::INFINITY,
            amenities: BTreeSet::new(),
        }
    }
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    fn price_constrained(&self) -> bool {
        self.price_min > 0.0 || self.price_max < f64::INFINITY
    }

    fn area_constrained(&self) -> bool {
        self.area_min > 0.0 || self.area_max < f64::INFINITY
    }

    pub fn passes(&self, listing: &Listing) -> bool {
        self.matches_search(listing)
            && (self.categories.is_empty() || self.categories.contains(&listing.category))
            && listing.bedrooms >= self.min_bedrooms
            && listing.bathrooms >= self.min_bathrooms
            && (!self.price_constrained()
                || (listing.price >= self.price_min && listing.price <= self.price_max))
            && (!self.area_constrained() || {
                let area = f64::from(listing.sqft.unwrap_or(0));
                area >= self.area_min && area <= self.area_max
            })
            && self.amenities.iter().all(|tag| listing.has_amenity(tag))
    }

    fn matches_search(&self, listing: &Listing) -> bool {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        parse_city(&listing.address).to_lowercase().contains(&query)
            || parse_zip(&listing.address).map_or(false, |zip| zip.contains(&query))
            || listing.address.to_lowercase().contains(&query)
    }

    /// Ids passing over the whole collection, regardless of viewport.
    pub fn passing_ids(&self, listings: &[Listing]) -> HashSet<ListingId> {
        listings
            .iter()
            .filter(|l| self.passes(l))
            .map(|l| l.id)
            .collect()
    }

    /// Read filter parameters from decoded query pairs.
    /// Unknown keys and unparsable numbers are ignored.
    pub fn from_query<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "q" | "search" => filter.search = value.to_string(),
                "type" => {
                    filter.categories.insert(value.to_string());
                }
                "amenity" => {
                    filter.amenities.insert(value.to_string());
                }
                "bedrooms" => {
                    if let Ok(n) = value.parse() {
                        filter.min_bedrooms = n;
                    }
                }
                "bathrooms" => set_number(&mut filter.min_bathrooms, value),
                "price_min" => set_number(&mut filter.price_min, value),
                "price_max" => set_number(&mut filter.price_max, value),
                "sqft_min" => set_number(&mut filter.area_min, value),
                "sqft_max" => set_number(&mut filter.area_max, value),
                _ => {}
            }
        }
        filter
    }
}

fn set_number(slot: &mut f64, raw: &str) {
    if let Some(v) = raw.parse::<f64>().ok().filter(|v| !v.is_nan()) {
        *slot = v;
    }
}

/// Second comma-delimited segment of an address, trimmed.
/// `"9301 Reseda Blvd, Northridge, CA, 91324"` → `"Northridge"`.
pub fn parse_city(address: &str) -> &str {
    address.split(',').nth(1).map(str::trim).unwrap_or("")
}

/// Trailing run of exactly five digits.
pub fn parse_zip(address: &str) -> Option<&str> {
    let trimmed = address.trim_end();
    let bytes = trimmed.as_bytes();
    let digits = bytes
        .iter()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 5 {
        Some(&trimmed[trimmed.len() - 5..])
    } else {
        None
    }
}
