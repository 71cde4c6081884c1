//! Utility functions and helpers.

pub mod clock;
pub mod http;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use time::parse_start_time;
