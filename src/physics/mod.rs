pub mod body_properties;
pub mod collidables;
pub mod collision_detection;
