pub mod admission;
pub mod capacity;
pub mod scheduling;
