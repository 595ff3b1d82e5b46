//! Restaurant endpoints: capacity model, availability, table status and
//! the day's reservation list

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
