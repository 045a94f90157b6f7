// templates/pages/explorer.rs

use crate::domain::filter::FilterState;
use crate::domain::university::University;
use crate::explorer::map::MarkerView;
use crate::templates::{components::filter_form, desktop_layout};
use maud::{html, Markup, PreEscaped};

pub struct ExplorerVm<'a> {
    pub filter: &'a FilterState,
    pub categories: Vec<String>,
    pub amenities: Vec<String>,
    pub universities: &'a [University],
    pub target: Option<&'a str>,
    /// Card list markup as produced by `HtmlCardList`.
    pub cards_html: String,
    pub markers: Vec<MarkerView>,
}

pub fn explorer_page(vm: &ExplorerVm<'_>) -> Markup {
    desktop_layout(
        "Explore",
        html! {
            main class="explorer" {
                aside class="sidebar" {
                    (filter_form(
                        vm.filter,
                        &vm.categories,
                        &vm.amenities,
                        vm.universities,
                        vm.target,
                    ))
                }
                section class="results" {
                    (PreEscaped(&vm.cards_html))
                }
                (marker_list(&vm.markers))
            }
        },
    )
}

/// Marker data for the client-side map script.
fn marker_list(markers: &[MarkerView]) -> Markup {
    html! {
        ul id="map-markers" hidden {
            @for m in markers {
                li
                    data-lat=(m.position.lat)
                    data-lng=(m.position.lng)
                    data-style=(format!("{:?}", m.style).to_lowercase())
                    data-z=(m.z_index)
                { (m.label) }
            }
        }
    }
}
