//! Client-side listing explorer: filter, map markers and the card list kept
//! in sync by a single [`controller::ViewController`].

pub mod cards;
pub mod client;
pub mod context;
pub mod controller;
pub mod debounce;
pub mod geocode;
pub mod map;
pub mod submit;

pub use cards::{CardEvent, CardListUpdate, CardRenderer, HtmlCardList};
pub use context::AppContext;
pub use controller::ViewController;
pub use map::{MapAdapter, MapEvent, MarkerLayer};
