//! Company domain entities and seat accounting.

pub mod model;
pub mod seat;

pub use model::{Company, CreateCompany};
pub use seat::{SeatSummary, validate_seat_limit};
