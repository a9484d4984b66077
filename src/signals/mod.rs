//! Signal fusion

pub mod fuser;

pub use fuser::SignalFuser;
