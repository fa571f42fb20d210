use crate::templates::components::{general_errors, text_field, FormErrors};
use crate::templates::desktop_layout;
use maud::{html, Markup};

#[derive(Debug, Default)]
pub struct GroupSetupVm {
    /// None when the request carried no signed-in user.
    pub username: Option<String>,
    pub current_group: Option<String>,
    pub create_name: String,
    pub create_errors: FormErrors,
    pub join_name: String,
    pub join_errors: FormErrors,
}

pub fn group_setup_page(vm: &GroupSetupVm) -> Markup {
    desktop_layout(
        "Group setup",
        vm.current_group.as_deref(),
        html! {},
        html! {
            main class="container narrow" {
                h1 { "Set up your map" }

                @match &vm.username {
                    None => {
                        p class="lead" { "Please sign in first. Your map is shared with your partner once you are in a group." }
                    }
                    Some(username) => {
                        p class="lead" { "Signed in as " strong { (username) } "." }
                        @if let Some(group) = &vm.current_group {
                            p { "You are currently in " strong { (group) } ". Creating or joining another group moves you there." }
                        }

                        section class="card" id="create" {
                            h2 { "Create a group" }
                            p { "Pick a name and a secret word, then share both with your partner." }
                            form method="post" action="/group/setup" {
                                input type="hidden" name="action" value="create";
                                (general_errors(&vm.create_errors))
                                (text_field("name", "Group name", &vm.create_name, "Sato-Suzuki", &vm.create_errors))
                                (secret_field(&vm.create_errors))
                                button type="submit" class="primary" { "Create" }
                            }
                        }

                        section class="card" id="join" {
                            h2 { "Join your partner's group" }
                            form method="post" action="/group/setup" {
                                input type="hidden" name="action" value="join";
                                (general_errors(&vm.join_errors))
                                (text_field("name", "Group name", &vm.join_name, "Sato-Suzuki", &vm.join_errors))
                                (secret_field(&vm.join_errors))
                                button type="submit" class="primary" { "Join" }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn secret_field(errors: &FormErrors) -> Markup {
    let error = errors.for_field("secret");
    html! {
        div.field.has-error[error.is_some()] {
            label for="secret" { "Secret word" }
            input type="password" id="secret" name="secret" autocomplete="off";
            @if let Some(msg) = error {
                p class="field-error" { (msg) }
            }
        }
    }
}
