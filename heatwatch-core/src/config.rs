use std::time::Duration;

use chrono_tz::Tz;

use crate::model::CityRecord;

/// Runtime configuration, constructed once at startup and passed explicitly
/// through the fetch/compare calls.
///
/// There is deliberately no config file and no persisted state: the monitored
/// cities are a fixed table, and everything else is a constant of the design.
#[derive(Debug, Clone)]
pub struct Config {
    pub cities: Vec<CityRecord>,
    /// Cadence of the polling loop.
    pub poll_interval: Duration,
    /// A rise only counts if the new reading occurred within this much time
    /// of the baseline reading.
    pub rise_window: chrono::Duration,
}

impl Config {
    /// The built-in city table.
    pub fn builtin() -> Self {
        Self {
            cities: vec![
                CityRecord::new("Austin, TX", Tz::America__Chicago, "TX_ASOS", "AUS", "EWX"),
                CityRecord::new("Denver, CO", Tz::America__Denver, "CO_ASOS", "DEN", "BOU"),
                CityRecord::new("Miami, FL", Tz::America__New_York, "FL_ASOS", "MIA", "MFL"),
                CityRecord::new(
                    "New York City, NY",
                    Tz::America__New_York,
                    "NY_ASOS",
                    "NYC",
                    "OKX",
                ),
                CityRecord::new("Chicago, IL", Tz::America__Chicago, "IL_ASOS", "MDW", "LOT"),
                CityRecord::new("Houston, TX", Tz::America__Chicago, "TX_ASOS", "HOU", "HGX"),
                CityRecord::new(
                    "Philadelphia, PA",
                    Tz::America__New_York,
                    "PA_ASOS",
                    "PHL",
                    "PHI",
                ),
            ],
            poll_interval: Duration::from_secs(60),
            rise_window: chrono::Duration::minutes(5),
        }
    }

}
