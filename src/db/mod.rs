//! Persistence layer

pub mod questdb;

pub use questdb::AnalysisDatabase;
