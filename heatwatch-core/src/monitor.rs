//! Rise detection and the polling loop.
//!
//! Per (city, source) pair the monitor holds at most one baseline
//! observation. A newer reading within the window that is strictly warmer
//! fires an alert and becomes the baseline; a reading past the window
//! replaces the baseline silently; anything else leaves the baseline alone.

use std::collections::HashMap;

use chrono::Duration;

use crate::{
    config::Config,
    model::Observation,
    notify::Notifier,
    source::{SourceId, WeatherSource},
};

/// A detected short-window temperature rise.
#[derive(Debug, Clone, PartialEq)]
pub struct RiseEvent {
    pub city: String,
    pub source: SourceId,
    pub from_temp_f: f64,
    pub to_temp_f: f64,
    pub elapsed: Duration,
}

impl RiseEvent {
    pub fn title(&self) -> String {
        format!("Temperature Alert: {}", self.city)
    }

    pub fn body(&self) -> String {
        format!(
            "{} max temperature in {} increased to {:.0}°F (from {:.0}°F) within {} minutes.",
            self.source.label(),
            self.city,
            self.to_temp_f,
            self.from_temp_f,
            self.elapsed.num_minutes(),
        )
    }
}

/// The compare-and-update state machine. Pure over observation timestamps,
/// so tests never touch a wall clock.
#[derive(Debug)]
pub struct RiseMonitor {
    window: Duration,
    baselines: HashMap<(String, SourceId), Observation>,
}

impl RiseMonitor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            baselines: HashMap::new(),
        }
    }

    /// Feed one observation; returns the rise event to announce, if any.
    pub fn observe(&mut self, city: &str, obs: Observation) -> Option<RiseEvent> {
        let key = (city.to_string(), obs.source);
        let baseline = match self.baselines.get(&key) {
            Some(baseline) => *baseline,
            None => {
                self.baselines.insert(key, obs);
                return None;
            }
        };

        let elapsed = obs.occurred_at - baseline.occurred_at;
        if elapsed > self.window {
            // Window expired: start over from the new reading.
            self.baselines.insert(key, obs);
            None
        } else if obs.temp_f > baseline.temp_f {
            let event = RiseEvent {
                city: city.to_string(),
                source: obs.source,
                from_temp_f: baseline.temp_f,
                to_temp_f: obs.temp_f,
                elapsed,
            };
            self.baselines.insert(key, obs);
            Some(event)
        } else {
            // Within the window but no rise (equal counts as no rise); the
            // baseline stays pinned until the window runs out.
            None
        }
    }

    pub fn baseline(&self, city: &str, source: SourceId) -> Option<&Observation> {
        self.baselines.get(&(city.to_string(), source))
    }
}

/// The monitor loop: one cycle per tick, sequential over all cities and both
/// sources. Source failures are logged and skipped; notification failures
/// are logged and ignored. Runs until the process is terminated.
pub async fn run(
    config: &Config,
    sources: &[Box<dyn WeatherSource>],
    notifier: &dyn Notifier,
) -> anyhow::Result<()> {
    let mut monitor = RiseMonitor::new(config.rise_window);
    let mut ticker = crate::clock::Ticker::new(config.poll_interval)?;

    loop {
        ticker.tick().await;
        tracing::debug!(cities = config.cities.len(), "starting polling cycle");

        for city in &config.cities {
            for source in sources {
                let obs = match source.fetch_max(city).await {
                    Ok(obs) => obs,
                    Err(e) => {
                        tracing::warn!(
                            city = %city.name,
                            source = %source.id(),
                            error = %e,
                            "skipping source for this cycle"
                        );
                        continue;
                    }
                };

                tracing::info!(
                    city = %city.name,
                    source = %obs.source,
                    temp_f = obs.temp_f,
                    occurred_at = %obs.occurred_at,
                    "observed daily max"
                );

                if let Some(event) = monitor.observe(&city.name, obs) {
                    tracing::info!(
                        city = %event.city,
                        source = %event.source,
                        from_temp_f = event.from_temp_f,
                        to_temp_f = event.to_temp_f,
                        "temperature rise detected"
                    );
                    if let Err(e) = notifier.notify(&event.title(), &event.body()) {
                        tracing::error!(error = %e, "failed to deliver notification");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, min, 0).unwrap()
    }

    fn obs(source: SourceId, temp_f: f64, when: DateTime<Utc>) -> Observation {
        Observation {
            source,
            temp_f,
            occurred_at: when,
            fetched_at: when,
        }
    }

    fn monitor() -> RiseMonitor {
        RiseMonitor::new(Duration::minutes(5))
    }

    #[test]
    fn first_observation_sets_baseline_without_alert() {
        let mut m = monitor();
        assert_eq!(None, m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0))));
        let baseline = m.baseline("Austin, TX", SourceId::Asos).unwrap();
        assert_eq!(75.0, baseline.temp_f);
    }

    #[test]
    fn rise_within_window_fires_and_advances_baseline() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));

        let event = m
            .observe("Austin, TX", obs(SourceId::Asos, 78.0, at(12, 3)))
            .expect("rise within the window must fire");
        assert_eq!(75.0, event.from_temp_f);
        assert_eq!(78.0, event.to_temp_f);
        assert_eq!(Duration::minutes(3), event.elapsed);

        let baseline = m.baseline("Austin, TX", SourceId::Asos).unwrap();
        assert_eq!(78.0, baseline.temp_f);
        assert_eq!(at(12, 3), baseline.occurred_at);
    }

    #[test]
    fn rise_at_exactly_five_minutes_still_fires() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));
        assert!(m.observe("Austin, TX", obs(SourceId::Asos, 76.0, at(12, 5))).is_some());
    }

    #[test]
    fn lower_reading_within_window_keeps_baseline() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));

        assert_eq!(None, m.observe("Austin, TX", obs(SourceId::Asos, 74.0, at(12, 3))));
        let baseline = m.baseline("Austin, TX", SourceId::Asos).unwrap();
        assert_eq!(75.0, baseline.temp_f);
        assert_eq!(at(12, 0), baseline.occurred_at);

        // The pinned baseline is still the comparison point afterwards.
        let event = m
            .observe("Austin, TX", obs(SourceId::Asos, 76.0, at(12, 4)))
            .expect("rise against the pinned baseline must fire");
        assert_eq!(75.0, event.from_temp_f);
    }

    #[test]
    fn equal_temperature_within_window_does_not_fire() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));
        assert_eq!(None, m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 3))));
    }

    #[test]
    fn expired_window_replaces_baseline_silently() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));

        assert_eq!(None, m.observe("Austin, TX", obs(SourceId::Asos, 76.0, at(12, 7))));
        let baseline = m.baseline("Austin, TX", SourceId::Asos).unwrap();
        assert_eq!(76.0, baseline.temp_f);
        assert_eq!(at(12, 7), baseline.occurred_at);
    }

    #[test]
    fn sources_are_tracked_independently() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));

        // A NOAA reading for the same city has its own baseline.
        assert_eq!(None, m.observe("Austin, TX", obs(SourceId::Noaa, 80.0, at(12, 1))));
        assert_eq!(
            75.0,
            m.baseline("Austin, TX", SourceId::Asos).unwrap().temp_f
        );
        assert_eq!(
            80.0,
            m.baseline("Austin, TX", SourceId::Noaa).unwrap().temp_f
        );
    }

    #[test]
    fn cities_are_tracked_independently() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Asos, 75.0, at(12, 0)));
        assert_eq!(None, m.observe("Denver, CO", obs(SourceId::Asos, 90.0, at(12, 1))));
    }

    #[test]
    fn event_messages_are_human_readable() {
        let mut m = monitor();
        m.observe("Austin, TX", obs(SourceId::Noaa, 75.0, at(12, 0)));
        let event = m
            .observe("Austin, TX", obs(SourceId::Noaa, 78.0, at(12, 3)))
            .unwrap();

        assert_eq!("Temperature Alert: Austin, TX", event.title());
        assert_eq!(
            "Climate Report max temperature in Austin, TX increased to 78°F (from 75°F) within 3 minutes.",
            event.body()
        );
    }
}
