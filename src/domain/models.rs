// src/domain/models.rs
use serde::Serialize;

pub type UserId = i64;
pub type GroupId = i64;
pub type StationId = i64;
pub type PropertyId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Provider payloads order positions as [lon, lat].
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

/// Every registered user has exactly one membership record.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    Unassigned,
    Member(Group),
}

impl Membership {
    pub fn group(&self) -> Option<&Group> {
        match self {
            Membership::Unassigned => None,
            Membership::Member(group) => Some(group),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub membership: Membership,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub group_id: GroupId,
    pub name: String,
    pub location: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub group_id: GroupId,
    pub name: String,
    pub address: String,
    pub rent: String,
    pub location: Coordinates,
    pub created_at: i64,
}

/// Validated input for a new property, before geocoding.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub rent: String,
}

impl NewProperty {
    /// Trims every field; name and address are required.
    pub fn parse(name: &str, address: &str, rent: &str) -> Result<Self, Vec<(&'static str, String)>> {
        let name = name.trim().to_string();
        let address = address.trim().to_string();
        let rent = rent.trim().to_string();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(("name", "Enter a name for the property.".to_string()));
        }
        if address.is_empty() {
            errors.push(("address", "Enter an address.".to_string()));
        }

        if errors.is_empty() {
            Ok(Self { name, address, rent })
        } else {
            Err(errors)
        }
    }
}
