use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::source::SourceId;

/// A monitored city and the identifiers needed to query both data sources.
///
/// The NWS publishes each city's daily climate product under the same code
/// the ASOS network uses for the station, so `station` doubles as the
/// `issuedby` parameter of the report URL.
#[derive(Debug, Clone)]
pub struct CityRecord {
    pub name: String,
    pub timezone: Tz,
    /// Mesonet ASOS network, e.g. "TX_ASOS".
    pub network: String,
    /// Station code within the network, e.g. "AUS".
    pub station: String,
    /// NWS office that issues the city's climate report, e.g. "EWX".
    pub nws_site: String,
}

impl CityRecord {
    pub fn new(name: &str, timezone: Tz, network: &str, station: &str, nws_site: &str) -> Self {
        Self {
            name: name.to_string(),
            timezone,
            network: network.to_string(),
            station: station.to_string(),
            nws_site: nws_site.to_string(),
        }
    }
}

/// A normalized daily-max reading, regardless of which source produced it.
///
/// `occurred_at` is when the maximum was reached (as reported by the source,
/// or the retrieval time when the source only reports a running max);
/// `fetched_at` is when we downloaded it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub source: SourceId,
    pub temp_f: f64,
    pub occurred_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
}
