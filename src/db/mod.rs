pub mod catalog;
pub mod connection;
pub mod groups;
pub mod isochrones;
pub mod likes;
pub mod properties;
pub mod stations;
pub mod users;

#[cfg(test)]
pub mod test_support;
