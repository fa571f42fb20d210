use maud::{html, Markup, DOCTYPE};

/// Page shell. `group_name` is shown with a leave button when the viewer
/// belongs to a group; `head_extra` lets pages pull in their own assets.
pub fn desktop_layout(title: &str, group_name: Option<&str>, head_extra: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Couple Map" }
                link rel="stylesheet" href="/static/main.css";
                (head_extra)
            }
            body {
              header class="flex items-center justify-between px-6 py-3 shadow" {
                  h3 { a href="/" { "Couple Map" } }
                  @if let Some(group) = group_name {
                      nav {
                          ul {
                              li { a href="/" { "Map" } }
                              li { a href="/properties" { "Properties" } }
                              li { a href="/add" { "Add property" } }
                              li { a href="/stations/add" { "Add station" } }
                          }
                      }
                      div class="group-badge" {
                          span { (group) }
                          form method="post" action="/group/leave" class="inline" {
                              button type="submit" class="link" { "Leave" }
                          }
                      }
                  }
              }
                (content)
            }
        }
    }
}
