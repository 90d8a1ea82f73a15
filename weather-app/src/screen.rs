use live_weather_core::{WeatherError, WeatherReport};

/// Text shown in the window. Rebuilt from scratch by every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: String,
    pub temperature: String,
    pub summary: String,
    pub updated: String,
    pub notice: Option<String>,
}

impl Screen {
    pub fn loading() -> Self {
        Self {
            title: "Loading...".to_string(),
            temperature: String::new(),
            summary: String::new(),
            updated: String::new(),
            notice: None,
        }
    }

    pub fn report(report: &WeatherReport) -> Self {
        Self {
            title: report.location_name.clone(),
            temperature: report.temperature_display.clone(),
            summary: report.summary(),
            updated: report
                .observed_at
                .map(|t| format!("Updated {}", t.format("%H:%M UTC")))
                .unwrap_or_default(),
            notice: None,
        }
    }

    pub fn error(err: &WeatherError) -> Self {
        Self {
            title: "Error".to_string(),
            temperature: err.to_string(),
            summary: String::new(),
            updated: String::new(),
            notice: None,
        }
    }
}
