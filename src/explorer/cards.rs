// explorer/cards.rs
use crate::domain::listing::{Listing, ListingId};
use crate::explorer::map::price_label;
use crate::templates::components::listing_card::card_list;
use std::cell::RefCell;
use std::rc::Rc;

/// What a card shows for one listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: ListingId,
    pub title: String,
    pub price: String,
    pub address: String,
    pub rooms: String,
    pub sqft: Option<u32>,
    pub category: String,
    pub distance: Option<String>,
    pub owner_name: String,
    pub owner_verified: bool,
    pub image_url: String,
    pub amenities: Vec<String>,
}

impl CardView {
    pub fn from_listing(listing: &Listing) -> Self {
        let bedrooms = match listing.bedrooms {
            0 => "Studio".to_string(),
            n => format!("{n} bd"),
        };
        CardView {
            id: listing.id,
            title: listing.title.clone(),
            price: format!("{}/mo", price_label(listing.price)),
            address: listing.address.clone(),
            rooms: format!("{bedrooms} · {} ba", listing.bathrooms),
            sqft: listing.sqft,
            category: listing.category.clone(),
            distance: listing
                .distance_miles
                .filter(|d| d.is_finite())
                .map(|d| format!("{d:.1} mi")),
            owner_name: listing.owner.name.clone(),
            owner_verified: listing.owner.verified,
            image_url: listing
                .images
                .first()
                .map(|img| img.image_url.clone())
                .unwrap_or_else(|| listing.image_url.clone()),
            amenities: listing.amenities.clone(),
        }
    }
}

/// A full replacement of the card list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardListUpdate {
    pub cards: Vec<CardView>,
}

impl CardListUpdate {
    pub fn from_listings<'a, I>(listings: I) -> Self
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        Self {
            cards: listings.into_iter().map(CardView::from_listing).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn count_label(&self) -> String {
        match self.count() {
            1 => "1 listing".to_string(),
            n => format!("{n} listings"),
        }
    }

    pub fn ids(&self) -> Vec<ListingId> {
        self.cards.iter().map(|c| c.id).collect()
    }
}

/// Outbound events a card raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    HoverEnter(ListingId),
    HoverLeave,
    Click(ListingId),
}

/// Subscriber for card list updates. Each update replaces the list.
pub trait CardRenderer {
    fn render(&mut self, update: &CardListUpdate);
}

/// Renders the list to HTML. The markup is readable through a shared handle
/// so the page (or a test) can pick it up after the controller renders.
pub struct HtmlCardList {
    output: Rc<RefCell<String>>,
}

impl HtmlCardList {
    pub fn new() -> Self {
        Self {
            output: Rc::new(RefCell::new(String::new())),
        }
    }

    pub fn handle(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.output)
    }
}

impl Default for HtmlCardList {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRenderer for HtmlCardList {
    fn render(&mut self, update: &CardListUpdate) {
        *self.output.borrow_mut() = card_list(update).into_string();
    }
}
