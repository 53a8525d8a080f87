pub mod airplane;
pub mod flight;
pub mod reservation;
