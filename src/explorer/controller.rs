// explorer/controller.rs
//
// Reconciles the map viewport, the filter and the card list. Every trigger
// runs `refresh` to completion before returning; the search debounce is the
// only timing control.

use crate::domain::filter::FilterState;
use crate::domain::geo::Bounds;
use crate::domain::listing::{Listing, ListingId};
use crate::domain::university::University;
use crate::explorer::cards::{CardEvent, CardListUpdate, CardRenderer};
use crate::explorer::client::{load_listings, load_universities, ListingsBackend};
use crate::explorer::context::{AppContext, LoadTicket};
use crate::explorer::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::explorer::geocode::Geocoder;
use crate::explorer::map::{MapAdapter, MapEvent};
use std::collections::HashSet;
use std::time::Instant;

pub struct ViewController<M: MapAdapter> {
    ctx: AppContext,
    map: M,
    renderers: Vec<Box<dyn CardRenderer>>,
    geocoder: Box<dyn Geocoder>,
    search: Debouncer<String>,
    visible_filtered: Vec<ListingId>,
    selected: Option<ListingId>,
    highlighted_card: Option<ListingId>,
    refreshes: u64,
}

impl<M: MapAdapter> ViewController<M> {
    pub fn new(ctx: AppContext, mut map: M, geocoder: Box<dyn Geocoder>) -> Self {
        map.set_markers(ctx.listings(), ctx.universities());
        map.set_target(ctx.target());
        Self {
            ctx,
            map,
            renderers: Vec::new(),
            geocoder,
            search: Debouncer::new(SEARCH_DEBOUNCE),
            visible_filtered: Vec::new(),
            selected: None,
            highlighted_card: None,
            refreshes: 0,
        }
    }

    pub fn subscribe(&mut self, renderer: Box<dyn CardRenderer>) {
        self.renderers.push(renderer);
    }

    /// Viewport ∩ filter → sorted cards; whole collection → marker dimming.
    pub fn refresh(&mut self) {
        let in_view: HashSet<ListingId> = self.map.visible_listings().into_iter().collect();
        let filter = &self.ctx.filter;

        let mut shown: Vec<&Listing> = self
            .ctx
            .listings()
            .iter()
            .filter(|l| in_view.contains(&l.id) && filter.passes(l))
            .collect();
        // Stable: equal prices keep collection order.
        shown.sort_by(|a, b| a.price.total_cmp(&b.price));

        let update = CardListUpdate::from_listings(shown);
        self.visible_filtered = update.ids();
        for renderer in &mut self.renderers {
            renderer.render(&update);
        }

        let passing = self.ctx.filter.passing_ids(self.ctx.listings());
        self.map.update_marker_visibility(&passing);

        self.refreshes += 1;
        tracing::trace!(
            shown = self.visible_filtered.len(),
            passing = passing.len(),
            "explorer refreshed"
        );
    }

    pub fn on_viewport_settled(&mut self, bounds: Bounds) {
        self.map.sync_viewport(bounds);
        self.refresh();
    }

    /// Mutate the filter and refresh.
    pub fn update_filter<F>(&mut self, change: F)
    where
        F: FnOnce(&mut FilterState),
    {
        change(&mut self.ctx.filter);
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.search.cancel();
        self.ctx.filter.reset();
        self.refresh();
    }

    /// Returns whether `name` matched a known university.
    pub fn set_target_university(&mut self, name: Option<&str>) -> bool {
        let found = self.ctx.set_target_university(name);
        self.map.set_target(self.ctx.target());
        self.refresh();
        found
    }

    /// Record a keystroke. Nothing runs until `tick` passes the deadline.
    pub fn on_search_input(&mut self, text: &str, now: Instant) {
        self.search.schedule(text.to_string(), now);
    }

    /// Drive timers. Returns true if a debounced search ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(query) => {
                self.run_search(&query);
                true
            }
            None => false,
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    fn run_search(&mut self, query: &str) {
        let query = query.trim();
        self.ctx.filter.search = query.to_string();
        if !query.is_empty() {
            match self.geocoder.geocode(query) {
                Ok(at) => self.map.pan_to(at),
                Err(e) => tracing::debug!(error = %e, query, "search geocode failed; not panning"),
            }
        }
        self.refresh();
    }

    pub fn handle_card_event(&mut self, event: CardEvent) {
        match event {
            CardEvent::HoverEnter(id) => self.map.highlight_marker(id),
            CardEvent::HoverLeave => self.map.unhighlight_marker(),
            CardEvent::Click(id) => self.select(id),
        }
    }

    pub fn handle_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::ViewportSettled(bounds) => self.on_viewport_settled(bounds),
            MapEvent::MarkerEnter(id) => self.highlighted_card = Some(id),
            MapEvent::MarkerLeave => self.highlighted_card = None,
            MapEvent::MarkerClick(id) => self.select(id),
        }
    }

    fn select(&mut self, id: ListingId) {
        let Some(listing) = self.ctx.listing(id) else {
            tracing::debug!(id, "selected listing is not loaded");
            return;
        };
        if listing.is_placeable() {
            self.map.pan_to(listing.location);
        }
        self.selected = Some(id);
    }

    /// Fit the map to every listing that has coordinates.
    pub fn fit_to_listings(&mut self) {
        let bounds = Bounds::around(
            self.ctx
                .listings()
                .iter()
                .filter(|l| l.is_placeable())
                .map(|l| l.location),
        );
        if let Some(bounds) = bounds {
            self.map.fit_bounds(bounds);
        }
        self.refresh();
    }

    pub fn begin_listings_load(&mut self) -> LoadTicket {
        self.ctx.begin_listings_load()
    }

    pub fn begin_universities_load(&mut self) -> LoadTicket {
        self.ctx.begin_universities_load()
    }

    /// Apply a finished listings fetch. Stale responses are dropped.
    pub fn replace_listings(&mut self, ticket: LoadTicket, listings: Vec<Listing>) -> bool {
        if !self.ctx.apply_listings(ticket, listings) {
            return false;
        }
        self.map.set_markers(self.ctx.listings(), self.ctx.universities());
        if self.selected.map_or(false, |id| self.ctx.listing(id).is_none()) {
            self.selected = None;
        }
        self.refresh();
        true
    }

    pub fn replace_universities(&mut self, ticket: LoadTicket, universities: Vec<University>) -> bool {
        if !self.ctx.apply_universities(ticket, universities) {
            return false;
        }
        self.map.set_markers(self.ctx.listings(), self.ctx.universities());
        self.map.set_target(self.ctx.target());
        self.refresh();
        true
    }

    /// Initial load. Failed fetches leave the explorer empty but usable.
    pub fn load_from(&mut self, backend: &dyn ListingsBackend) {
        let uni_ticket = self.begin_universities_load();
        let universities = load_universities(backend);
        self.replace_universities(uni_ticket, universities);

        let listing_ticket = self.begin_listings_load();
        let listings = load_listings(backend);
        self.replace_listings(listing_ticket, listings);
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn filter(&self) -> &FilterState {
        &self.ctx.filter
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn visible_filtered(&self) -> &[ListingId] {
        &self.visible_filtered
    }

    pub fn selected(&self) -> Option<ListingId> {
        self.selected
    }

    pub fn highlighted_card(&self) -> Option<ListingId> {
        self.highlighted_card
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}
