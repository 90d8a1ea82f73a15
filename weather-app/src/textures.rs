//! GPU textures for the frames of the animation currently on screen.

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use live_weather_core::AnimationSlot;

/// Uploads every frame of the slot's animation once per slot generation.
#[derive(Default)]
pub struct FrameTextures {
    generation: Option<u64>,
    textures: Vec<TextureHandle>,
}

impl FrameTextures {
    /// Texture for the frame the slot is currently showing.
    pub fn current(&mut self, ctx: &egui::Context, slot: &AnimationSlot) -> Option<&TextureHandle> {
        let Some(animation) = slot.current() else {
            self.textures.clear();
            self.generation = None;
            return None;
        };

        if self.generation != Some(slot.generation()) {
            self.textures = animation
                .frames()
                .iter()
                .enumerate()
                .map(|(i, frame)| {
                    let (w, h) = frame.image.dimensions();
                    let image = ColorImage::from_rgba_unmultiplied(
                        [w as usize, h as usize],
                        frame.image.as_raw(),
                    );
                    ctx.load_texture(
                        format!("weather-frame-{}-{i}", slot.generation()),
                        image,
                        TextureOptions::LINEAR,
                    )
                })
                .collect();
            self.generation = Some(slot.generation());
        }

        self.textures.get(animation.cursor())
    }
}
