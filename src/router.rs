use std::collections::HashMap;
use std::io::Read;

use crate::app::App;
use crate::auth::identity::username_from_headers;
use crate::db::{catalog, stations, users};
use crate::domain::models::{Group, NewProperty, User};
use crate::errors::ServerError;
use crate::responses::{
    css_response, html_response, html_response_with_status, redirect, text_response, ResultResp,
};
use crate::services;
use crate::templates::components::FormErrors;
use crate::templates::pages::{self, AddStationVm, GroupSetupVm, PropertyFormValues};
use astra::Request;

const MAX_FORM_BYTES: u64 = 64 * 1024;
const STATION_SUGGESTIONS: usize = 500;
const STYLESHEET: &str = include_str!("../static/main.css");

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    if method == "GET" && path == "/static/main.css" {
        return css_response(STYLESHEET);
    }

    let now = now_unix();
    let user = current_user(&req, app, now)?;

    match (method.as_str(), path.as_str()) {
        ("GET", "/group/setup") => show_group_setup(user.as_ref()),
        ("POST", "/group/setup") => {
            let Some(user) = user else {
                return redirect("/group/setup");
            };
            let form = parse_form(req)?;
            submit_group_setup(app, &user, &form, now)
        }
        ("POST", "/group/leave") => {
            if let Some(user) = user {
                services::groups::leave_group(&app.db, &user)?;
            }
            redirect("/group/setup")
        }
        _ => {
            let Some((user, group)) = user.and_then(|u| {
                let group = u.membership.group().cloned()?;
                Some((u, group))
            }) else {
                return redirect("/group/setup");
            };
            grouped_route(req, app, &method, &path, &user, &group, now)
        }
    }
}

/// Routes that need a signed-in member of a group.
fn grouped_route(
    req: Request,
    app: &App,
    method: &str,
    path: &str,
    user: &User,
    group: &Group,
    now: i64,
) -> ResultResp {
    match (method, path) {
        ("GET", "/") => {
            let vm = services::map::build_map(app, user, group, now)?;
            html_response(pages::map_page(&vm))
        }

        ("GET", "/properties") => {
            let views = services::properties::property_views(&app.db, app.match_policy, user, group)?;
            html_response(pages::properties_page(&group.name, &views))
        }

        ("GET", "/add") => html_response(pages::add_property_page(
            &group.name,
            &PropertyFormValues::default(),
            &FormErrors::default(),
        )),
        ("POST", "/add") => {
            let form = parse_form(req)?;
            submit_property(app, group, &form, now)
        }

        ("GET", "/stations/add") => station_page(app, group, "", &FormErrors::default(), 200),
        ("POST", "/stations/add") => {
            let form = parse_form(req)?;
            let name = field(&form, "name");
            match services::stations::add_station(app, group, name, now) {
                Ok(_) => redirect("/"),
                Err(err) => match station_form_error(err) {
                    Ok(errors) => station_page(app, group, name, &errors, 422),
                    Err(err) => Err(err),
                },
            }
        }

        ("POST", p) if p.starts_with("/like/") => {
            let property_id = parse_id(p.strip_prefix("/like/").unwrap_or_default())?;
            let state = services::properties::toggle_like(
                &app.db,
                app.match_policy,
                user,
                group,
                property_id,
                now,
            )?;
            text_response(state.as_str())
        }

        ("POST", p) if p.starts_with("/stations/") && p.ends_with("/delete") => {
            let id = p
                .strip_prefix("/stations/")
                .and_then(|rest| rest.strip_suffix("/delete"))
                .ok_or(ServerError::NotFound)?;
            services::stations::remove_station(app, group, parse_id(id)?)?;
            redirect("/stations/add")
        }

        _ => Err(ServerError::NotFound),
    }
}

/// Resolve the proxy-supplied username, registering first-time users.
fn current_user(req: &Request, app: &App, now: i64) -> Result<Option<User>, ServerError> {
    let Some(username) = username_from_headers(req.headers(), &app.identity_header) else {
        return Ok(None);
    };
    let user = app
        .db
        .with_conn(|conn| users::ensure_user(conn, &username, now))?;
    Ok(Some(user))
}

fn show_group_setup(user: Option<&User>) -> ResultResp {
    let vm = GroupSetupVm {
        username: user.map(|u| u.username.clone()),
        current_group: user.and_then(|u| u.membership.group()).map(|g| g.name.clone()),
        ..GroupSetupVm::default()
    };
    html_response(pages::group_setup_page(&vm))
}

fn submit_group_setup(
    app: &App,
    user: &User,
    form: &HashMap<String, String>,
    now: i64,
) -> ResultResp {
    let name = field(form, "name");
    let secret = field(form, "secret");
    let action = field(form, "action");

    let (result, creating) = match action {
        "create" => (
            services::groups::create_group(&app.db, user, name, secret, now),
            true,
        ),
        "join" => (services::groups::join_group(&app.db, user, name, secret), false),
        other => {
            return Err(ServerError::BadRequest(format!("unknown action \"{other}\"")));
        }
    };

    let errors = match result {
        Ok(_) => return redirect("/"),
        Err(ServerError::BadRequest(msg)) => FormErrors::general(msg),
        Err(ServerError::Conflict(_)) => {
            FormErrors::field("name", "That group name is already taken.")
        }
        Err(ServerError::InvalidCredentials) => {
            FormErrors::general("Group name or secret is incorrect.")
        }
        Err(err) => return Err(err),
    };

    let mut vm = GroupSetupVm {
        username: Some(user.username.clone()),
        current_group: user.membership.group().map(|g| g.name.clone()),
        ..GroupSetupVm::default()
    };
    if creating {
        vm.create_name = name.to_string();
        vm.create_errors = errors;
    } else {
        vm.join_name = name.to_string();
        vm.join_errors = errors;
    }
    html_response_with_status(422, pages::group_setup_page(&vm))
}

fn submit_property(
    app: &App,
    group: &Group,
    form: &HashMap<String, String>,
    now: i64,
) -> ResultResp {
    let values = PropertyFormValues {
        name: field(form, "name").to_string(),
        address: field(form, "address").to_string(),
        rent: field(form, "rent").to_string(),
    };

    let errors = match NewProperty::parse(&values.name, &values.address, &values.rent) {
        Err(fields) => FormErrors {
            fields,
            general: Vec::new(),
        },
        Ok(input) => match services::properties::add_property(app, group, &input, now) {
            Ok(_) => return redirect("/"),
            Err(ServerError::GeocodeFailed(msg)) => FormErrors::field("address", msg),
            Err(err) => return Err(err),
        },
    };

    html_response_with_status(422, pages::add_property_page(&group.name, &values, &errors))
}

/// Errors the station form shows inline; anything else propagates.
fn station_form_error(err: ServerError) -> Result<FormErrors, ServerError> {
    match err {
        ServerError::NotFound => Ok(FormErrors::field(
            "name",
            "No station by that name was found.",
        )),
        ServerError::BadRequest(msg) | ServerError::GeocodeFailed(msg) => {
            Ok(FormErrors::field("name", msg))
        }
        other => Err(other),
    }
}

fn station_page(app: &App, group: &Group, name: &str, errors: &FormErrors, status: u16) -> ResultResp {
    let (suggestions, current) = app.db.with_conn(|conn| {
        Ok((
            catalog::catalog_station_names(conn, STATION_SUGGESTIONS)?,
            stations::list_stations(conn, group.id)?,
        ))
    })?;
    let vm = AddStationVm {
        group_name: &group.name,
        name,
        errors,
        suggestions: &suggestions,
        stations: &current,
    };
    html_response_with_status(status, pages::add_station_page(&vm))
}

fn field<'a>(form: &'a HashMap<String, String>, key: &str) -> &'a str {
    form.get(key).map(String::as_str).unwrap_or("")
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>().map_err(|_| ServerError::NotFound)
}

fn parse_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = String::new();
    req.into_body()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;

    Ok(url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect())
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
