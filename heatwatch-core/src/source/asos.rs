//! Mesonet ASOS station observations.
//!
//! Two endpoints cover the same station: the real-time feed reports a running
//! `max_dayairtemp[F]`, and the daily summary reports `max_tmpf` per local
//! calendar day. Either can lag the other, so the observation is the greater
//! of the two. The feed reports a running max without saying when it was
//! reached, so the occurrence time is the retrieval time.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{ParseError, SourceError},
    model::{CityRecord, Observation},
    source::{SourceId, WeatherSource, truncate_body},
};

const DEFAULT_BASE_URL: &str = "https://mesonet.agron.iastate.edu";

#[derive(Debug, Clone)]
pub struct AsosSource {
    http: Client,
    base_url: String,
}

impl AsosSource {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    async fn fetch_current(&self, city: &CityRecord) -> Result<Option<f64>, SourceError> {
        let url = format!("{}/json/current.py", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("network", city.network.as_str()),
                ("station", city.station.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: CurrentResponse = serde_json::from_str(&body).map_err(ParseError::Json)?;
        Ok(parsed.last_ob.and_then(|ob| ob.max_day_temp_f))
    }

    async fn fetch_daily(&self, city: &CityRecord) -> Result<Option<f64>, SourceError> {
        let url = format!("{}/api/1/daily.json", self.base_url);

        let today = Utc::now().with_timezone(&city.timezone).date_naive();
        let month = today.format("%m").to_string();
        let year = today.format("%Y").to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("network", city.network.as_str()),
                ("station", city.station.as_str()),
                ("month", month.as_str()),
                ("year", year.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: DailyResponse = serde_json::from_str(&body).map_err(ParseError::Json)?;
        Ok(max_tmpf_on(&parsed, &today.format("%Y-%m-%d").to_string()))
    }
}

fn max_tmpf_on(daily: &DailyResponse, date: &str) -> Option<f64> {
    daily
        .data
        .iter()
        .find(|rec| rec.date == date)
        .and_then(|rec| rec.max_tmpf)
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    last_ob: Option<LastOb>,
}

#[derive(Debug, Deserialize)]
struct LastOb {
    #[serde(rename = "max_dayairtemp[F]")]
    max_day_temp_f: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(default)]
    data: Vec<DailyRecord>,
}

#[derive(Debug, Deserialize)]
struct DailyRecord {
    date: String,
    max_tmpf: Option<f64>,
}

#[async_trait]
impl WeatherSource for AsosSource {
    fn id(&self) -> SourceId {
        SourceId::Asos
    }

    async fn fetch_max(&self, city: &CityRecord) -> Result<Observation, SourceError> {
        let current = self.fetch_current(city).await;
        let daily = self.fetch_daily(city).await;

        // The endpoints lag each other and either can be down; one healthy
        // reading is enough for the cycle.
        let temp_f = match (current, daily) {
            (Ok(Some(c)), Ok(Some(d))) => c.max(d),
            (Ok(Some(t)), Ok(None)) | (Ok(None), Ok(Some(t))) => t,
            (Ok(Some(t)), Err(e)) | (Err(e), Ok(Some(t))) => {
                tracing::warn!(
                    city = %city.name,
                    error = %e,
                    "one ASOS endpoint failed; using the other's reading"
                );
                t
            }
            (Ok(None), Ok(None)) => return Err(ParseError::NoDataForToday.into()),
            (Ok(None), Err(e)) | (Err(e), Ok(None)) => return Err(e),
            (Err(e), Err(daily_err)) => {
                tracing::debug!(city = %city.name, error = %daily_err, "daily endpoint also failed");
                return Err(e);
            }
        };

        let now = Utc::now();
        Ok(Observation {
            source: SourceId::Asos,
            temp_f,
            occurred_at: now,
            fetched_at: now,
        })
    }
}
