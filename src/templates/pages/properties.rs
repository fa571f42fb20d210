use crate::services::properties::PropertyView;
use crate::templates::desktop_layout;
use chrono::{TimeZone, Utc};
use maud::{html, Markup};

pub fn properties_page(group_name: &str, properties: &[PropertyView]) -> Markup {
    desktop_layout(
        "Properties",
        Some(group_name),
        html! {},
        html! {
            main class="container" {
                h1 { "Properties" }
                @if properties.is_empty() {
                    p { "Nothing saved yet. " a href="/add" { "Add the first one." } }
                } @else {
                    table class="properties" {
                        thead {
                            tr {
                                th { "Name" }
                                th { "Address" }
                                th { "Rent" }
                                th { "Added" }
                                th { "Status" }
                            }
                        }
                        tbody {
                            @for p in properties {
                                tr.matched[p.is_matched] {
                                    td { (p.name) }
                                    td { (p.address) }
                                    td { (p.rent) }
                                    td { (added_on(p.created_at)) }
                                    td { (match_status(p)) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn added_on(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn match_status(p: &PropertyView) -> String {
    if p.is_matched {
        "❤️ Match!".to_string()
    } else {
        format!("Likes: {}", p.liked_usernames.len())
    }
}
