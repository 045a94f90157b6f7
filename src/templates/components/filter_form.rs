use crate::domain::filter::FilterState;
use crate::domain::university::University;
use maud::{html, Markup};

fn bound(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        value.to_string()
    } else {
        String::new()
    }
}

/// Sidebar filter form. Submits as a GET to `/` so the URL carries the state.
pub fn filter_form(
    filter: &FilterState,
    categories: &[String],
    amenities: &[String],
    universities: &[University],
    target: Option<&str>,
) -> Markup {
    html! {
        form id="filters" method="get" action="/" class="filters" {
            label for="q" { "City or zip" }
            input type="search" id="q" name="q" value=(filter.search) placeholder="Northridge, 91324…";

            (university_select(universities, target))

            fieldset {
                legend { "Type" }
                @for category in categories {
                    label {
                        input type="checkbox" name="type" value=(category)
                            checked[filter.categories.contains(category)];
                        " " (category)
                    }
                }
            }

            label for="bedrooms" { "Bedrooms" }
            select id="bedrooms" name="bedrooms" {
                @for n in 0..=4u32 {
                    option value=(n) selected[filter.min_bedrooms == n] {
                        @if n == 0 { "Any" } @else { (n) "+" }
                    }
                }
            }

            label for="bathrooms" { "Bathrooms" }
            select id="bathrooms" name="bathrooms" {
                @for n in [0.0, 1.0, 1.5, 2.0, 3.0] {
                    option value=(n) selected[filter.min_bathrooms == n] {
                        @if n == 0.0 { "Any" } @else { (n) "+" }
                    }
                }
            }

            div class="range" {
                label { "Price" }
                input type="number" name="price_min" min="0" placeholder="Min" value=(bound(filter.price_min));
                input type="number" name="price_max" min="0" placeholder="Max" value=(bound(filter.price_max));
            }

            div class="range" {
                label { "Square feet" }
                input type="number" name="sqft_min" min="0" placeholder="Min" value=(bound(filter.area_min));
                input type="number" name="sqft_max" min="0" placeholder="Max" value=(bound(filter.area_max));
            }

            fieldset {
                legend { "Amenities" }
                @for tag in amenities {
                    label {
                        input type="checkbox" name="amenity" value=(tag)
                            checked[filter.amenities.contains(tag)];
                        " " (tag)
                    }
                }
            }

            div class="actions" {
                button type="submit" class="primary" { "Apply" }
                a href="/" class="btn" { "Reset" }
            }
        }
    }
}

pub fn university_select(universities: &[University], target: Option<&str>) -> Markup {
    html! {
        label for="university" { "Distance from" }
        select id="university" name="university" {
            option value="" selected[target.is_none()] { "No university" }
            @for uni in universities {
                option value=(uni.name) title=(uni.full_name)
                    selected[target == Some(uni.name.as_str())] { (uni.name) }
            }
        }
    }
}
