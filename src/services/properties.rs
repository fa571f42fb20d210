// src/services/properties.rs
use serde::Serialize;
use std::collections::BTreeSet;

use crate::app::App;
use crate::db::connection::Database;
use crate::db::likes::{self, LikeState};
use crate::db::{properties, users};
use crate::domain::models::{Group, NewProperty, Property, PropertyId, User, UserId};
use crate::domain::MatchPolicy;
use crate::errors::ServerError;

/// A property as shown on the map and in the list.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyView {
    pub id: PropertyId,
    pub name: String,
    pub rent: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub is_matched: bool,
    pub liked_usernames: Vec<String>,
    pub liked_by_me: bool,
    #[serde(skip)]
    pub created_at: i64,
}

/// Geocode the address and store the property for the group.
///
/// The lookup runs before any write; when it fails nothing is stored.
pub fn add_property(
    app: &App,
    group: &Group,
    input: &NewProperty,
    now: i64,
) -> Result<Property, ServerError> {
    let location = match app.geocoder.lookup(&input.address) {
        Ok(Some(location)) => location,
        Ok(None) => {
            tracing::info!(address = %input.address, "address not found");
            return Err(ServerError::GeocodeFailed(
                "We couldn't find that address. Try adding the ward or city.".into(),
            ));
        }
        Err(e) => {
            tracing::warn!(address = %input.address, error = %e, "geocoding failed");
            return Err(ServerError::GeocodeFailed(
                "The address lookup service is unavailable. Please try again.".into(),
            ));
        }
    };

    let property = app
        .db
        .with_conn(|conn| properties::insert_property(conn, group.id, input, location, now))?;

    tracing::info!(property_id = property.id, group = %group.name, "property added");
    Ok(property)
}

/// Flip the user's like on one of their group's properties.
pub fn toggle_like(
    db: &Database,
    policy: MatchPolicy,
    user: &User,
    group: &Group,
    property_id: PropertyId,
    now: i64,
) -> Result<LikeState, ServerError> {
    let state = db.with_conn(|conn| {
        if properties::find_property(conn, group.id, property_id)?.is_none() {
            return Err(ServerError::NotFound);
        }
        likes::toggle_like(conn, user.id, property_id, now)
    })?;

    if state == LikeState::Liked && is_matched(db, policy, group, property_id)? {
        tracing::info!(property_id, group = %group.name, "property matched");
    }
    Ok(state)
}

/// Every property of the group with its likers and match status,
/// newest first.
pub fn property_views(
    db: &Database,
    policy: MatchPolicy,
    user: &User,
    group: &Group,
) -> Result<Vec<PropertyView>, ServerError> {
    db.with_conn(|conn| {
        let members = users::member_ids(conn, group.id)?;
        let mut likers = properties::likers_for_group(conn, group.id)?;

        let views = properties::list_properties(conn, group.id)?
            .into_iter()
            .map(|p| {
                let liked = likers.remove(&p.id).unwrap_or_default();
                let liker_ids: BTreeSet<UserId> = liked.iter().map(|(id, _)| *id).collect();
                PropertyView {
                    id: p.id,
                    is_matched: policy.is_matched(&liker_ids, &members),
                    liked_by_me: liker_ids.contains(&user.id),
                    liked_usernames: liked.into_iter().map(|(_, name)| name).collect(),
                    name: p.name,
                    rent: p.rent,
                    address: p.address,
                    lat: p.location.lat,
                    lon: p.location.lon,
                    created_at: p.created_at,
                }
            })
            .collect();
        Ok(views)
    })
}

/// Match status of one property of the group.
pub fn is_matched(
    db: &Database,
    policy: MatchPolicy,
    group: &Group,
    property_id: PropertyId,
) -> Result<bool, ServerError> {
    db.with_conn(|conn| {
        if properties::find_property(conn, group.id, property_id)?.is_none() {
            return Err(ServerError::NotFound);
        }
        let likers = properties::liker_ids(conn, property_id)?;
        let members = users::member_ids(conn, group.id)?;
        Ok(policy.is_matched(&likers, &members))
    })
}
