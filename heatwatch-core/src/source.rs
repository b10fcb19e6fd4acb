use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::SourceError,
    model::{CityRecord, Observation},
};

pub mod asos;
pub mod noaa;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Asos,
    Noaa,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Asos => "asos",
            SourceId::Noaa => "noaa",
        }
    }

    /// Human label used in alert messages.
    pub fn label(&self) -> &'static str {
        match self {
            SourceId::Asos => "ASOS",
            SourceId::Noaa => "Climate Report",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::Asos, SourceId::Noaa]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream feed of daily-max temperatures.
///
/// Implementations own the fetch and the source-specific parsing; callers
/// only ever see a normalized [`Observation`].
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    fn id(&self) -> SourceId;

    async fn fetch_max(&self, city: &CityRecord) -> Result<Observation, SourceError>;
}

/// Shared HTTP client. The timeout bounds a single cycle's latency.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(Duration::from_secs(10)).build()
}

/// Both configured sources, in the order they are polled each cycle.
pub fn all_sources(client: &Client) -> Vec<Box<dyn WeatherSource>> {
    vec![
        Box::new(asos::AsosSource::new(client.clone())),
        Box::new(noaa::NoaaSource::new(client.clone())),
    ]
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
