mod group_tests;
mod map_tests;
mod property_tests;
mod station_tests;
