//! Forward geocoding through the OpenWeatherMap Geocoding API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{Config, Coordinates, error::WeatherError};

use super::{Geocoder, read_body};

#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: f64,
    lon: f64,
}

impl CoordinateResolver {
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.geocoding_url.clone(),
            http: http_client()?,
        })
    }

    /// Coordinates of the best (first) match for `location_name`.
    pub async fn resolve(&self, location_name: &str) -> Result<Coordinates, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or_else(WeatherError::missing_api_key)?;

        let query = location_name.trim();
        if query.is_empty() {
            return Err(WeatherError::NotFound { location: location_name.to_string() });
        }

        tracing::debug!("Geocoding '{query}'");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("limit", "1"), ("appid", api_key)])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let body = read_body(res, "geolocation").await?;

        let matches: Vec<GeoMatch> = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Malformed geocoding response: {e}");
            WeatherError::Parse("geolocation".to_string())
        })?;

        let best = matches
            .first()
            .ok_or_else(|| WeatherError::NotFound { location: query.to_string() })?;

        Ok(Coordinates { latitude: best.lat, longitude: best.lon })
    }
}

#[async_trait]
impl Geocoder for CoordinateResolver {
    async fn resolve(&self, location_name: &str) -> Result<Coordinates, WeatherError> {
        CoordinateResolver::resolve(self, location_name).await
    }
}

pub(crate) fn http_client() -> Result<Client, WeatherError> {
    Client::builder()
        .user_agent(concat!("live-weather/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| WeatherError::Network(format!("failed to build HTTP client: {e}")))
}
