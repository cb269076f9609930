//! Daily statistics and patient normalisation of inflammation data.
//!
//! Inflammation tables hold one row per patient and one column per day.
//! [`source`] loads collections of tables from a data directory, [`stats`]
//! reduces a table to daily series, [`normalise`] rescales every patient, and
//! [`analysis`] combines datasets into a single daily series.

pub mod analysis;
pub mod config;
pub mod error;
pub mod manager;
pub mod normalise;
pub mod source;
pub mod stats;
pub mod view;

pub use error::Error;
