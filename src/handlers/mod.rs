pub mod airplanes;
pub mod flights;
pub mod health;
pub mod reservations;
