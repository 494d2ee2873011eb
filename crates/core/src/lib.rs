#![forbid(unsafe_code)]

pub mod calendar;
pub mod model;
pub mod stats;
pub mod time;

pub use time::Clock;
