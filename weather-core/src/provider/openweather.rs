use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config, Coordinates,
    error::WeatherError,
    model::{ConditionCategory, WeatherReport, format_temperature, title_case},
};

use super::{CurrentWeatherSource, geocode::http_client, read_body};

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl WeatherFetcher {
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.weather_url.clone(),
            http: http_client()?,
        })
    }

    pub async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherReport, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or_else(WeatherError::missing_api_key)?;

        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let body = read_body(res, "weather").await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Malformed weather response: {e}");
            WeatherError::Parse("weather".to_string())
        })?;

        parsed.into_report()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    fn into_report(self) -> Result<WeatherReport, WeatherError> {
        let parse_error = || WeatherError::Parse("weather".to_string());

        let condition = self.weather.first().ok_or_else(parse_error)?;
        let temperature_display = format_temperature(self.main.temp).ok_or_else(parse_error)?;

        Ok(WeatherReport {
            location_name: self.name,
            condition: condition.main.clone(),
            condition_category: ConditionCategory::from_upstream(&condition.main),
            description: title_case(&condition.description),
            temperature_display,
            observed_at: self.dt.and_then(unix_to_utc),
        })
    }
}

#[async_trait]
impl CurrentWeatherSource for WeatherFetcher {
    async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherReport, WeatherError> {
        WeatherFetcher::fetch_current(self, coordinates).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
