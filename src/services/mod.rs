pub mod groups;
pub mod map;
pub mod properties;
pub mod stations;
