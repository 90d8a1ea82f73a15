use eframe::egui::{self, Color32, RichText};
use live_weather_core::{AnimationSlot, AssetLibrary, Config, WeatherReport, WeatherService};
use std::time::Instant;
use tokio::runtime::Runtime;

use crate::{screen::Screen, textures::FrameTextures};

const BACKGROUND: Color32 = Color32::from_rgb(0x2E, 0x2E, 0x2E);
const INPUT_BACKGROUND: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
const TEXT: Color32 = Color32::WHITE;

/// The single window. Every lookup runs to completion on the UI thread
/// before the next frame is drawn.
pub struct WeatherApp {
    runtime: Runtime,
    service: WeatherService,
    assets: AssetLibrary,
    query: String,
    screen: Screen,
    animation: AnimationSlot,
    textures: FrameTextures,
}

impl WeatherApp {
    pub fn new(config: &Config, runtime: Runtime) -> anyhow::Result<Self> {
        let service = WeatherService::from_config(config)?;

        let mut app = Self {
            runtime,
            service,
            assets: AssetLibrary::new(&config.assets_dir),
            query: config.default_location.clone(),
            screen: Screen::loading(),
            animation: AnimationSlot::new(),
            textures: FrameTextures::default(),
        };

        let initial = app.query.clone();
        app.update_weather(&initial);
        Ok(app)
    }

    fn search(&mut self) {
        let location = self.query.trim().to_string();
        if location.is_empty() {
            self.screen.notice = Some("Please enter a city name.".to_string());
            return;
        }
        self.update_weather(&location);
    }

    fn update_weather(&mut self, location: &str) {
        tracing::info!("Looking up weather for '{location}'");

        match self.runtime.block_on(self.service.lookup(location)) {
            Ok(report) => self.show_report(&report),
            Err(e) => {
                if e.is_user_correctable() {
                    tracing::info!("Lookup for '{location}' failed: {e}");
                } else {
                    tracing::warn!("Lookup for '{location}' failed: {e}");
                }
                self.screen = Screen::error(&e);
                self.animation.clear();
            }
        }
    }

    fn show_report(&mut self, report: &WeatherReport) {
        self.screen = Screen::report(report);

        match self.assets.load_animation(report.condition_category) {
            Ok(animation) => {
                self.animation.replace(animation);
                if let Some(animation) = self.animation.current_mut() {
                    animation.start(Instant::now());
                }
            }
            Err(e) => {
                tracing::warn!("No animation for {}: {e}", report.condition_category);
                self.animation.clear();
            }
        }
    }
}

impl eframe::App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.animation.poll(now);
        if let Some(wait) = self.animation.current().and_then(|a| a.time_until_next_frame(now)) {
            ctx.request_repaint_after(wait);
        }

        let mut search_requested = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(BACKGROUND).inner_margin(20.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut self.query)
                        .font(egui::FontId::proportional(14.0))
                        .horizontal_align(egui::Align::Center)
                        .text_color(TEXT)
                        .desired_width(ui.available_width() - 80.0);
                    let response = ui.add(input);
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    let button = egui::Button::new(RichText::new("Search").size(14.0).color(TEXT))
                        .fill(INPUT_BACKGROUND);
                    if ui.add(button).clicked() || submitted {
                        search_requested = true;
                    }
                });

                ui.add_space(15.0);

                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&self.screen.title).size(24.0).strong().color(TEXT));
                    ui.add_space(10.0);
                    ui.label(RichText::new(&self.screen.temperature).size(36.0).strong().color(TEXT));
                    ui.add_space(10.0);
                    ui.label(RichText::new(&self.screen.summary).size(14.0).color(TEXT));

                    if !self.screen.updated.is_empty() {
                        ui.label(RichText::new(&self.screen.updated).size(11.0).color(Color32::GRAY));
                    }
                    if let Some(notice) = &self.screen.notice {
                        ui.label(RichText::new(notice).size(14.0).color(Color32::YELLOW));
                    }

                    ui.add_space(20.0);
                    if let Some(texture) = self.textures.current(ctx, &self.animation) {
                        ui.image((texture.id(), texture.size_vec2()));
                    }
                });
            });

        if search_requested {
            self.search();
        }
    }
}
