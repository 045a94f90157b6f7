use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Campus Rentals" }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" { "Campus Rentals" }
                    nav {
                        ul {
                            li { a href="/" { "Explore" } }
                            li { a href="/api/listings/" { "API" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
