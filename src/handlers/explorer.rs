// handlers/explorer.rs
//
// Server-rendered explorer: the same controller the client runs, driven once
// with the viewport and filter taken from the query string.

use crate::db::listings::{list_active_listings, to_api_listings};
use crate::db::universities::list_universities;
use crate::db::Database;
use crate::domain::filter::FilterState;
use crate::domain::geo::Bounds;
use crate::domain::listing::Listing;
use crate::explorer::geocode::NoGeocoder;
use crate::explorer::{AppContext, HtmlCardList, MarkerLayer, ViewController};
use crate::responses::{html_response, ResultResp};
use crate::router::query_pairs;
use crate::templates::pages::{explorer_page, ExplorerVm};
use std::collections::BTreeSet;

/// `bounds=south,west,north,east`
fn parse_bounds(raw: &str) -> Option<Bounds> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [south, west, north, east] if south <= north => Some(Bounds::new(*south, *west, *north, *east)),
        _ => None,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn page(db: &Database, query: &str) -> ResultResp {
    let pairs = query_pairs(query);
    let param = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    };

    let (api_listings, universities) = db.with_conn(|conn| {
        let rows = list_active_listings(conn)?;
        Ok((to_api_listings(conn, &rows)?, list_universities(conn)?))
    })?;
    let listings: Vec<Listing> = api_listings.into_iter().map(Listing::from_wire).collect();

    let categories = distinct(listings.iter().map(|l| &l.category));
    let amenities = distinct(listings.iter().flat_map(|l| l.amenities.iter()));

    let mut ctx = AppContext::with_data(listings, universities);
    ctx.filter = FilterState::from_query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    ctx.set_target_university(param("university"));

    let cards = HtmlCardList::new();
    let cards_html = cards.handle();

    let mut controller = ViewController::new(ctx, MarkerLayer::new(Bounds::world()), Box::new(NoGeocoder));
    controller.subscribe(Box::new(cards));
    match param("bounds").and_then(parse_bounds) {
        Some(bounds) => controller.on_viewport_settled(bounds),
        None => controller.fit_to_listings(),
    }

    let vm = ExplorerVm {
        filter: controller.filter(),
        categories,
        amenities,
        universities: controller.context().universities(),
        target: controller.context().target(),
        cards_html: cards_html.borrow().clone(),
        markers: controller.map().rendered(),
    };
    html_response(explorer_page(&vm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_param_needs_four_finite_numbers() {
        assert_eq!(
            parse_bounds("34.0, -118.6, 34.3, -118.3"),
            Some(Bounds::new(34.0, -118.6, 34.3, -118.3))
        );
        assert_eq!(parse_bounds("34,-118,35"), None);
        assert_eq!(parse_bounds("35,-118,34,-117"), None);
        assert_eq!(parse_bounds("a,b,c,d"), None);
    }
}
