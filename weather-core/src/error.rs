use std::path::PathBuf;

/// Failures of a single location lookup.
///
/// None of these outlive the request that produced them; the caller shows the
/// message and stays ready for the next search.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("{0}")]
    Configuration(String),
    #[error("Location '{location}' not found.")]
    NotFound { location: String },
    #[error("Network Error: {0}")]
    Network(String),
    #[error("Error parsing {0} response.")]
    Parse(String),
}

impl WeatherError {
    pub fn missing_api_key() -> Self {
        Self::Configuration("API Key not provided.".to_string())
    }

    /// True for errors the user can fix by typing something else.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failures of loading an animated asset. Always recoverable: the weather text
/// is shown without an animation.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("GIF file not found at {}", path.display())]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error decoding animation: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Animation contains no frames")]
    Empty,
}
