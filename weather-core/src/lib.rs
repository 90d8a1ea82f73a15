//! Core library for the Live Weather desktop app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - OpenWeatherMap geocoding and current-weather clients
//! - Shared domain models (coordinates, weather reports, condition categories)
//! - GIF animation playback driven by a cancellable repeating timer
//!
//! It has no GUI dependency; `live-weather` renders what it produces.

pub mod animation;
pub mod assets;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod timer;

pub use animation::{Animation, AnimationFrame, AnimationSlot, AnimationState};
pub use assets::AssetLibrary;
pub use config::Config;
pub use error::{AssetError, WeatherError};
pub use model::{ConditionCategory, Coordinates, WeatherReport};
pub use provider::{CurrentWeatherSource, Geocoder, WeatherService};
