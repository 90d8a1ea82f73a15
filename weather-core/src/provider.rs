use crate::{
    Config, Coordinates, WeatherReport,
    error::WeatherError,
    provider::{geocode::CoordinateResolver, openweather::WeatherFetcher},
};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use std::fmt::Debug;

pub mod geocode;
pub mod openweather;

/// Turns a free-text place name into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, location_name: &str) -> Result<Coordinates, WeatherError>;
}

/// Current conditions at a point.
#[async_trait]
pub trait CurrentWeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherReport, WeatherError>;
}

/// Runs one full lookup: resolve the name, then fetch the weather for the
/// first match. The fetch never runs when resolving fails.
#[derive(Debug)]
pub struct WeatherService {
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn CurrentWeatherSource>,
}

impl WeatherService {
    pub fn new(geocoder: Box<dyn Geocoder>, weather: Box<dyn CurrentWeatherSource>) -> Self {
        Self { geocoder, weather }
    }

    /// Wire up the OpenWeatherMap components from config.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self::new(
            Box::new(CoordinateResolver::new(config)?),
            Box::new(WeatherFetcher::new(config)?),
        ))
    }

    pub async fn lookup(&self, location_name: &str) -> Result<WeatherReport, WeatherError> {
        let coordinates = self.geocoder.resolve(location_name).await?;
        tracing::debug!(
            "Resolved '{}' to {}, {}",
            location_name,
            coordinates.latitude,
            coordinates.longitude
        );
        self.weather.fetch_current(coordinates).await
    }
}

/// Read the body of an upstream response, mapping transport errors and
/// unsuccessful statuses onto [`WeatherError`].
pub(crate) async fn read_body(res: Response, what: &str) -> Result<String, WeatherError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| WeatherError::Network(format!("failed to read {what} response: {e}")))?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(WeatherError::Configuration(format!(
            "API key was rejected by the {what} service."
        )));
    }

    if !status.is_success() {
        return Err(WeatherError::Network(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
