use crate::explorer::cards::{CardListUpdate, CardView};
use maud::{html, Markup};

pub const EMPTY_PLACEHOLDER: &str = "No listings match your filters in this area.";

pub fn listing_card(card: &CardView) -> Markup {
    html! {
        article class="card listing-card" data-listing-id=(card.id) {
            @if !card.image_url.is_empty() {
                img class="card-image" src=(card.image_url) alt=(card.title) loading="lazy";
            }
            div class="card-body" {
                div class="card-header" {
                    h2 { (card.title) }
                    span class="price" { (card.price) }
                }
                p class="address" { (card.address) }
                p class="rooms" {
                    (card.rooms)
                    @if let Some(sqft) = card.sqft {
                        " · " (sqft) " sqft"
                    }
                    " · " (card.category)
                }
                @if let Some(distance) = &card.distance {
                    p class="distance" { (distance) " from campus" }
                }
                @if !card.amenities.is_empty() {
                    ul class="amenities" {
                        @for tag in &card.amenities {
                            li { (tag) }
                        }
                    }
                }
                p class="owner" {
                    (card.owner_name)
                    @if card.owner_verified {
                        span class="verified" title="Verified owner" { " ✓" }
                    }
                }
            }
        }
    }
}

/// Whole card list with its count label. Empty input gets a placeholder.
pub fn card_list(update: &CardListUpdate) -> Markup {
    html! {
        section id="listing-cards" {
            p class="listing-count" { (update.count_label()) }
            @if update.cards.is_empty() {
                p class="placeholder" { (EMPTY_PLACEHOLDER) }
            } @else {
                @for card in &update.cards {
                    (listing_card(card))
                }
            }
        }
    }
}
