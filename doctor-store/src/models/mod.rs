//! Records exchanged with the practice API.

pub mod dates;
pub mod patient;
pub mod report;

pub use patient::*;
pub use report::*;
