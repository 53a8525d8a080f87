pub mod fields;
pub mod reservation_code;
pub mod schedule;
pub mod shutdown;
