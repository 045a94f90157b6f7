// explorer/context.rs
use crate::domain::filter::FilterState;
use crate::domain::geo::haversine_miles;
use crate::domain::listing::{Listing, ListingId};
use crate::domain::university::University;

/// Ticket for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Orders fetch responses. A response is applied only if no later-issued
/// request has already been applied, so a slow stale response can't
/// overwrite fresher data.
#[derive(Debug, Default)]
pub struct LoadSequence {
    issued: u64,
    applied: u64,
}

impl LoadSequence {
    pub fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    pub fn accept(&mut self, ticket: LoadTicket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }
}

/// Everything the explorer knows, owned by the view controller.
#[derive(Debug, Default)]
pub struct AppContext {
    listings: Vec<Listing>,
    universities: Vec<University>,
    target: Option<String>,
    pub filter: FilterState,
    listing_loads: LoadSequence,
    university_loads: LoadSequence,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(listings: Vec<Listing>, universities: Vec<University>) -> Self {
        let mut ctx = Self::new();
        ctx.listings = listings;
        ctx.universities = universities;
        ctx
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn listing(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn target_university(&self) -> Option<&University> {
        let name = self.target.as_deref()?;
        self.universities.iter().find(|u| u.name == name)
    }

    pub fn begin_listings_load(&mut self) -> LoadTicket {
        self.listing_loads.issue()
    }

    pub fn begin_universities_load(&mut self) -> LoadTicket {
        self.university_loads.issue()
    }

    /// Swap in a fetched listing collection. Returns false for a stale response.
    pub fn apply_listings(&mut self, ticket: LoadTicket, listings: Vec<Listing>) -> bool {
        if !self.listing_loads.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale listings response");
            return false;
        }
        self.listings = listings;
        self.recompute_distances();
        true
    }

    pub fn apply_universities(&mut self, ticket: LoadTicket, universities: Vec<University>) -> bool {
        if !self.university_loads.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale universities response");
            return false;
        }
        self.universities = universities;
        if self.target.is_some() && self.target_university().is_none() {
            self.target = None;
        }
        self.recompute_distances();
        true
    }

    /// Pick the reference university by short name. An unknown name (or
    /// `None`) clears the target. Returns whether a target is now set.
    pub fn set_target_university(&mut self, name: Option<&str>) -> bool {
        self.target = name
            .filter(|n| self.universities.iter().any(|u| u.name == *n))
            .map(str::to_string);
        self.recompute_distances();
        self.target.is_some()
    }

    fn recompute_distances(&mut self) {
        let origin = self
            .target_university()
            .map(|u| u.location)
            .filter(|c| c.is_finite());
        for listing in &mut self.listings {
            listing.distance_miles = match origin {
                Some(origin) if listing.is_placeable() => {
                    Some(haversine_miles(origin, listing.location))
                }
                _ => None,
            };
        }
    }
}
