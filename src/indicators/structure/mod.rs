//! Market-structure indicators

pub mod support_resistance;

pub use support_resistance::find_support_resistance;
