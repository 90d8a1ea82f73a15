use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Timestamp = DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Coarse weather classification reported by the upstream feed. Drives which
/// animation is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionCategory {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    Clear,
    Clouds,
}

impl ConditionCategory {
    pub const fn all() -> &'static [ConditionCategory] {
        use ConditionCategory::*;
        &[
            Thunderstorm, Drizzle, Rain, Snow, Mist, Smoke, Haze, Dust, Fog, Sand, Ash, Squall,
            Tornado, Clear, Clouds,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Smoke => "Smoke",
            Self::Haze => "Haze",
            Self::Dust => "Dust",
            Self::Fog => "Fog",
            Self::Sand => "Sand",
            Self::Ash => "Ash",
            Self::Squall => "Squall",
            Self::Tornado => "Tornado",
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
        }
    }

    /// Exact, case-sensitive match against the canonical names.
    pub fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == value)
    }

    /// Normalise an upstream condition string. Anything outside the known set
    /// uses the `Clear` animation.
    pub fn from_upstream(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            tracing::warn!("Unrecognized weather condition '{value}', falling back to Clear");
            Self::Clear
        })
    }

    /// File name of the animated asset for this category, e.g. `rain.gif`.
    pub fn asset_file_name(&self) -> String {
        format!("{}.gif", self.as_str().to_lowercase())
    }
}

impl std::fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    /// Condition as the upstream feed named it, shown to the user verbatim.
    pub condition: String,
    /// Normalised category, selects the animation.
    pub condition_category: ConditionCategory,
    pub description: String,
    pub temperature_display: String,
    pub observed_at: Option<Timestamp>,
}

impl WeatherReport {
    /// `"Rain (Light Rain)"`
    pub fn summary(&self) -> String {
        format!("{} ({})", self.condition, self.description)
    }
}

/// Render a Celsius temperature with no decimals.
///
/// Ties round to even (`0.5` → `0`, `1.5` → `2`, `2.5` → `2`). The result goes
/// through an integer so negative values that round to zero print `0°C`.
pub fn format_temperature(celsius: f64) -> Option<String> {
    if !celsius.is_finite() {
        return None;
    }
    let whole = celsius.round_ties_even() as i64;
    Some(format!("{whole}°C"))
}

/// Upper-case the first letter of every word, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
