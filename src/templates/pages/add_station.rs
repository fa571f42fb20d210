use crate::domain::models::Station;
use crate::templates::components::{card, general_errors, FormErrors};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct AddStationVm<'a> {
    pub group_name: &'a str,
    pub name: &'a str,
    pub errors: &'a FormErrors,
    /// Catalog names offered as suggestions.
    pub suggestions: &'a [String],
    pub stations: &'a [Station],
}

pub fn add_station_page(vm: &AddStationVm<'_>) -> Markup {
    desktop_layout(
        "Stations",
        Some(vm.group_name),
        html! {},
        html! {
            main class="container narrow" {
                h1 { "Favorite stations" }
                p class="lead" { "Walking areas of 5, 10 and 15 minutes are drawn around each station." }

                form method="post" action="/stations/add" {
                    (general_errors(vm.errors))
                    (station_field(vm.name, vm.errors))
                    @if !vm.suggestions.is_empty() {
                        datalist id="station-names" {
                            @for name in vm.suggestions {
                                option value=(name) {}
                            }
                        }
                    }
                    button type="submit" class="primary" { "Add station" }
                }

                (card("Your stations", html! {
                    @if vm.stations.is_empty() {
                        p { "No stations yet." }
                    } @else {
                        ul class="station-list" {
                            @for station in vm.stations {
                                li {
                                    span { (station.name) }
                                    form method="post" action=(format!("/stations/{}/delete", station.id)) class="inline" {
                                        button type="submit" class="link" { "Remove" }
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        },
    )
}

fn station_field(value: &str, errors: &FormErrors) -> Markup {
    let error = errors.for_field("name");
    html! {
        div.field.has-error[error.is_some()] {
            label for="name" { "Station name" }
            input type="text" id="name" name="name" value=(value) placeholder="例: 新宿" list="station-names" autocomplete="off";
            @if let Some(msg) = error {
                p class="field-error" { (msg) }
            }
        }
    }
}
