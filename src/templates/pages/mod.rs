pub mod add_property;
pub mod add_station;
pub mod group_setup;
pub mod map;
pub mod properties;

pub use add_property::{add_property_page, PropertyFormValues};
pub use add_station::{add_station_page, AddStationVm};
pub use group_setup::{group_setup_page, GroupSetupVm};
pub use map::map_page;
pub use properties::properties_page;
