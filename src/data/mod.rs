//! Data module - dataset location and CSV loading

mod loader;
mod locator;
pub mod timestamp;

pub use loader::{Channel, DisplayRange, LoadError, TrialLoader, TrialRecord, TrialTable};
pub use locator::{DatasetLocator, LocatorError};
