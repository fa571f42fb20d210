use crate::templates::components::{general_errors, text_field, FormErrors};
use crate::templates::desktop_layout;
use maud::{html, Markup};

#[derive(Debug, Default, Clone)]
pub struct PropertyFormValues {
    pub name: String,
    pub address: String,
    pub rent: String,
}

pub fn add_property_page(group_name: &str, values: &PropertyFormValues, errors: &FormErrors) -> Markup {
    desktop_layout(
        "Add property",
        Some(group_name),
        html! {},
        html! {
            main class="container narrow" {
                h1 { "Add a property" }
                p class="lead" { "The address is looked up on the map when you save." }

                form method="post" action="/add" {
                    (general_errors(errors))
                    (text_field("name", "Name", &values.name, "例: 新宿駅前マンション", errors))
                    (text_field("address", "Address", &values.address, "例: 東京都新宿区西新宿1-1", errors))
                    (text_field("rent", "Rent", &values.rent, "例: 12万円", errors))
                    button type="submit" class="primary" { "Save" }
                }
            }
        },
    )
}
