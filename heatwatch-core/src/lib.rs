//! Core library for the `heatwatch` monitor.
//!
//! This crate defines:
//! - The built-in city table and monitor settings
//! - Abstraction over temperature sources (ASOS station JSON, NOAA climate reports)
//! - Rise detection over a sliding five-minute window
//! - Desktop notification dispatch
//!
//! It is used by `heatwatch-cli`, but can also be reused by other binaries or services.

pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod source;

pub use config::Config;
pub use error::{NotifyError, ParseError, SourceError};
pub use model::{CityRecord, Observation};
pub use monitor::{RiseEvent, RiseMonitor};
pub use notify::Notifier;
pub use source::{SourceId, WeatherSource};
