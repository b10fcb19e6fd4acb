//! NOAA daily climate reports (CLI product).
//!
//! The product is free text. The line of interest looks like
//!
//! ```text
//!   MAXIMUM         74    144 PM  90    1955  62     12       66
//! ```
//!
//! where the time token may or may not carry a colon (`144`, `1136`,
//! `1:44`). The occurrence time is resolved against the city's local
//! calendar day and converted to UTC.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;

use crate::{
    error::{ParseError, SourceError},
    model::{CityRecord, Observation},
    source::{SourceId, WeatherSource, truncate_body},
};

const DEFAULT_BASE_URL: &str = "https://forecast.weather.gov";

#[derive(Debug, Clone)]
pub struct NoaaSource {
    http: Client,
    base_url: String,
}

impl NoaaSource {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl WeatherSource for NoaaSource {
    fn id(&self) -> SourceId {
        SourceId::Noaa
    }

    async fn fetch_max(&self, city: &CityRecord) -> Result<Observation, SourceError> {
        let url = format!("{}/product.php", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("site", city.nws_site.as_str()),
                ("product", "CLI"),
                ("issuedby", city.station.as_str()),
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

        let fetched_at = Utc::now();
        let (temp_f, clock) = parse_report(&body)?;
        let occurred_at = occurrence_to_utc(clock, city.timezone, fetched_at)?;

        Ok(Observation {
            source: SourceId::Noaa,
            temp_f,
            occurred_at,
            fetched_at,
        })
    }
}

/// Extract the max temperature and its occurrence time from the report text.
///
/// Only the first MAXIMUM line is considered; anything after it repeats the
/// value for other periods (month, season).
fn parse_report(text: &str) -> Result<(f64, NaiveTime), ParseError> {
    let line = text
        .lines()
        .find(|l| l.to_ascii_uppercase().contains("MAXIMUM"))
        .ok_or(ParseError::MissingMaximumLine)?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [kw, temp, clock, meridiem, ..]
            if kw.eq_ignore_ascii_case("MAXIMUM")
                && !temp.is_empty()
                && temp.chars().all(|c| c.is_ascii_digit()) =>
        {
            let temp_f = temp
                .parse::<f64>()
                .map_err(|_| ParseError::BadTemperature((*temp).to_string()))?;
            let clock = parse_clock(clock, meridiem)?;
            Ok((temp_f, clock))
        }
        _ => Err(ParseError::MissingMaximumLine),
    }
}

/// Normalize a report time token to a clock time. Colon-less tokens are
/// `hmm` or `hhmm`: `736` reads as 7:36, `1136` as 11:36.
fn parse_clock(token: &str, meridiem: &str) -> Result<NaiveTime, ParseError> {
    let m = meridiem.to_ascii_uppercase();
    if m != "AM" && m != "PM" {
        return Err(ParseError::BadTimeToken(format!("{token} {meridiem}")));
    }

    let with_colon = if token.contains(':') {
        token.to_string()
    } else {
        match token.len() {
            3 => format!("{}:{}", &token[..1], &token[1..]),
            4 => format!("{}:{}", &token[..2], &token[2..]),
            _ => return Err(ParseError::BadTimeToken(token.to_string())),
        }
    };

    NaiveTime::parse_from_str(&format!("{with_colon} {m}"), "%I:%M %p")
        .map_err(|_| ParseError::BadTimeToken(format!("{token} {meridiem}")))
}

/// Pin a report clock time onto the city's current local date and convert to
/// UTC. `earliest` settles DST fall-back ambiguity.
fn occurrence_to_utc(
    clock: NaiveTime,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ParseError> {
    let local_date = now.with_timezone(&tz).date_naive();
    tz.from_local_datetime(&local_date.and_time(clock))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ParseError::BadTimeToken(clock.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn austin() -> CityRecord {
        CityRecord::new("Austin, TX", Tz::America__Chicago, "TX_ASOS", "AUS", "EWX")
    }

    #[test]
    fn report_fixture_parses() {
        let text = std::fs::read_to_string("tests/data/climate-report.txt").unwrap();
        let (temp_f, clock) = parse_report(&text).unwrap();
        assert_eq!(74.0, temp_f);
        assert_eq!(NaiveTime::from_hms_opt(13, 44, 0).unwrap(), clock);
    }

    #[test]
    fn report_without_maximum_line_fails() {
        let err = parse_report("CLIMATE REPORT\nNO TEMPERATURE DATA TODAY\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingMaximumLine));
    }

    #[test]
    fn malformed_maximum_line_fails() {
        // Value column missing, e.g. "MAXIMUM MM" when data is unavailable.
        let err = parse_report("  MAXIMUM         MM    144 PM\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingMaximumLine));
    }

    #[test]
    fn clock_tokens_normalize() {
        let cases = [
            ("144", "PM", (13, 44)),
            ("736", "AM", (7, 36)),
            ("1136", "AM", (11, 36)),
            ("1:44", "PM", (13, 44)),
            ("1200", "AM", (0, 0)),
        ];
        for (token, meridiem, (h, m)) in cases {
            let clock = parse_clock(token, meridiem).unwrap();
            assert_eq!(
                NaiveTime::from_hms_opt(h, m, 0).unwrap(),
                clock,
                "token {token:?} {meridiem:?}"
            );
        }
    }

    #[test]
    fn bad_clock_tokens_are_rejected() {
        assert!(matches!(
            parse_clock("7", "PM").unwrap_err(),
            ParseError::BadTimeToken(_)
        ));
        assert!(matches!(
            parse_clock("144", "XX").unwrap_err(),
            ParseError::BadTimeToken(_)
        ));
    }

    #[test]
    fn occurrence_resolves_in_city_timezone() {
        // Late December: America/Chicago is CST (UTC-6).
        let now = Utc.with_ymd_and_hms(2024, 12, 27, 21, 0, 0).unwrap();
        let clock = NaiveTime::from_hms_opt(13, 44, 0).unwrap();
        let occurred = occurrence_to_utc(clock, Tz::America__Chicago, now).unwrap();
        assert_eq!(Utc.with_ymd_and_hms(2024, 12, 27, 19, 44, 0).unwrap(), occurred);
    }

    #[tokio::test]
    async fn fetch_max_yields_normalized_observation() {
        let server = MockServer::start().await;
        let city = austin();
        let report = std::fs::read_to_string("tests/data/climate-report.txt").unwrap();

        Mock::given(method("GET"))
            .and(path("/product.php"))
            .and(query_param("site", "EWX"))
            .and(query_param("product", "CLI"))
            .and(query_param("issuedby", "AUS"))
            .respond_with(ResponseTemplate::new(200).set_body_string(report))
            .mount(&server)
            .await;

        let source = NoaaSource::with_base_url(Client::new(), server.uri());
        let obs = source.fetch_max(&city).await.unwrap();
        assert_eq!(SourceId::Noaa, obs.source);
        assert_eq!(74.0, obs.temp_f);

        let local = obs.occurred_at.with_timezone(&city.timezone);
        assert_eq!((13, 44), (local.hour(), local.minute()));
    }

    #[tokio::test]
    async fn format_drift_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>moved</html>"))
            .mount(&server)
            .await;

        let source = NoaaSource::with_base_url(Client::new(), server.uri());
        let err = source.fetch_max(&austin()).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Parse(ParseError::MissingMaximumLine)
        ));
    }
}
