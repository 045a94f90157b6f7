// explorer/map.rs
//
// Boundary with the mapping SDK. The SDK draws and projects; the explorer only
// needs the calls on `MapAdapter`. `MarkerLayer` is an SDK-free adapter that
// keeps the same state a real map would.

use crate::domain::geo::{Bounds, Coordinates};
use crate::domain::listing::{Listing, ListingId};
use crate::domain::university::University;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    Price {
        listing_id: ListingId,
        position: Coordinates,
        price: f64,
    },
    University {
        name: String,
        position: Coordinates,
    },
}

impl Marker {
    pub fn position(&self) -> Coordinates {
        match self {
            Marker::Price { position, .. } | Marker::University { position, .. } => *position,
        }
    }

    pub fn listing_id(&self) -> Option<ListingId> {
        match self {
            Marker::Price { listing_id, .. } => Some(*listing_id),
            Marker::University { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Normal,
    Dimmed,
    Highlighted,
    Target,
}

/// What the SDK is asked to draw for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub label: String,
    pub position: Coordinates,
    pub style: MarkerStyle,
    pub z_index: i32,
}

/// One rendering path for both marker kinds.
pub fn render_marker(marker: &Marker, style: MarkerStyle) -> MarkerView {
    let label = match marker {
        Marker::Price { price, .. } => price_label(*price),
        Marker::University { name, .. } => name.clone(),
    };
    let z_index = match style {
        MarkerStyle::Highlighted => 1000,
        MarkerStyle::Target => 900,
        MarkerStyle::Normal => 1,
        MarkerStyle::Dimmed => 0,
    };
    MarkerView {
        label,
        position: marker.position(),
        style,
        z_index,
    }
}

/// `1950.0` → `"$1,950"`. Unparsed prices show as `"$?"`.
pub fn price_label(price: f64) -> String {
    if !price.is_finite() {
        return "$?".to_string();
    }
    let whole = price.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Events the SDK reports back to the explorer.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The map stopped panning or zooming.
    ViewportSettled(Bounds),
    MarkerEnter(ListingId),
    MarkerLeave,
    MarkerClick(ListingId),
}

pub trait MapAdapter {
    /// Replace every marker. Listings without finite coordinates get none.
    fn set_markers(&mut self, listings: &[Listing], universities: &[University]);
    /// Ids of price markers inside the current viewport.
    fn visible_listings(&self) -> Vec<ListingId>;
    /// De-emphasize every price marker whose id is not in `passing`.
    fn update_marker_visibility(&mut self, passing: &HashSet<ListingId>);
    fn highlight_marker(&mut self, id: ListingId);
    fn unhighlight_marker(&mut self);
    fn set_target(&mut self, university: Option<&str>);
    fn pan_to(&mut self, center: Coordinates);
    fn fit_bounds(&mut self, bounds: Bounds);
    /// Record the viewport the SDK reported when it settled.
    fn sync_viewport(&mut self, bounds: Bounds);
    fn viewport(&self) -> Bounds;
}

#[derive(Debug, Clone)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    viewport: Bounds,
    dimmed: HashSet<ListingId>,
    highlighted: Option<ListingId>,
    target: Option<String>,
}

impl MarkerLayer {
    pub fn new(viewport: Bounds) -> Self {
        Self {
            markers: Vec::new(),
            viewport,
            dimmed: HashSet::new(),
            highlighted: None,
            target: None,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_dimmed(&self, id: ListingId) -> bool {
        self.dimmed.contains(&id)
    }

    pub fn highlighted(&self) -> Option<ListingId> {
        self.highlighted
    }

    pub fn style_of(&self, marker: &Marker) -> MarkerStyle {
        match marker {
            Marker::Price { listing_id, .. } if self.highlighted == Some(*listing_id) => {
                MarkerStyle::Highlighted
            }
            Marker::Price { listing_id, .. } if self.dimmed.contains(listing_id) => {
                MarkerStyle::Dimmed
            }
            Marker::University { name, .. } if self.target.as_deref() == Some(name) => {
                MarkerStyle::Target
            }
            _ => MarkerStyle::Normal,
        }
    }

    pub fn rendered(&self) -> Vec<MarkerView> {
        self.markers
            .iter()
            .map(|m| render_marker(m, self.style_of(m)))
            .collect()
    }
}

impl MapAdapter for MarkerLayer {
    fn set_markers(&mut self, listings: &[Listing], universities: &[University]) {
        let skipped = listings.iter().filter(|l| !l.is_placeable()).count();
        if skipped > 0 {
            tracing::debug!(skipped, "listings without usable coordinates get no marker");
        }

        self.markers = listings
            .iter()
            .filter(|l| l.is_placeable())
            .map(|l| Marker::Price {
                listing_id: l.id,
                position: l.location,
                price: l.price,
            })
            .chain(
                universities
                    .iter()
                    .filter(|u| u.location.is_finite())
                    .map(|u| Marker::University {
                        name: u.name.clone(),
                        position: u.location,
                    }),
            )
            .collect();

        let live: HashSet<ListingId> = self.markers.iter().filter_map(Marker::listing_id).collect();
        self.dimmed.retain(|id| live.contains(id));
        if self.highlighted.map_or(false, |id| !live.contains(&id)) {
            self.highlighted = None;
        }
    }

    fn visible_listings(&self) -> Vec<ListingId> {
        self.markers
            .iter()
            .filter(|m| self.viewport.contains(m.position()))
            .filter_map(Marker::listing_id)
            .collect()
    }

    fn update_marker_visibility(&mut self, passing: &HashSet<ListingId>) {
        self.dimmed = self
            .markers
            .iter()
            .filter_map(Marker::listing_id)
            .filter(|id| !passing.contains(id))
            .collect();
    }

    fn highlight_marker(&mut self, id: ListingId) {
        self.highlighted = Some(id);
    }

    fn unhighlight_marker(&mut self) {
        self.highlighted = None;
    }

    fn set_target(&mut self, university: Option<&str>) {
        self.target = university.map(str::to_string);
    }

    fn pan_to(&mut self, center: Coordinates) {
        if center.is_finite() {
            self.viewport = self.viewport.recentered(center);
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = bounds.padded(0.05);
    }

    fn sync_viewport(&mut self, bounds: Bounds) {
        self.viewport = bounds;
    }

    fn viewport(&self) -> Bounds {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_labels_group_thousands() {
        assert_eq!(price_label(950.0), "$950");
        assert_eq!(price_label(1950.0), "$1,950");
        assert_eq!(price_label(1234567.4), "$1,234,567");
        assert_eq!(price_label(f64::NAN), "$?");
    }

    #[test]
    fn one_renderer_for_both_marker_kinds() {
        let price = Marker::Price {
            listing_id: 3,
            position: Coordinates::new(34.0, -118.0),
            price: 1750.0,
        };
        let uni = Marker::University {
            name: "USC".to_string(),
            position: Coordinates::new(34.02, -118.28),
        };
        let p = render_marker(&price, MarkerStyle::Dimmed);
        let u = render_marker(&uni, MarkerStyle::Target);
        assert_eq!(p.label, "$1,750");
        assert_eq!(u.label, "USC");
        assert!(u.z_index > p.z_index);
    }

    #[test]
    fn style_precedence_highlight_over_dimmed() {
        let mut layer = MarkerLayer::new(Bounds::world());
        layer.markers = vec![Marker::Price {
            listing_id: 1,
            position: Coordinates::new(0.0, 0.0),
            price: 1.0,
        }];
        layer.update_marker_visibility(&HashSet::new());
        assert!(layer.is_dimmed(1));
        layer.highlight_marker(1);
        assert_eq!(layer.rendered()[0].style, MarkerStyle::Highlighted);
        layer.unhighlight_marker();
        assert_eq!(layer.rendered()[0].style, MarkerStyle::Dimmed);
    }
}
