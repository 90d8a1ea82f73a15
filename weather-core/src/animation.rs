//! Looping GIF playback, decoupled from any GUI toolkit.
//!
//! An [`Animation`] decodes every frame up front and walks through them on a
//! [`RepeatingTimer`]. The hosting UI polls it once per repaint and draws
//! [`Animation::current_frame`]. [`AnimationSlot`] holds the one animation
//! that is on screen and makes sure a replaced animation stops ticking.

use image::{
    AnimationDecoder, RgbaImage,
    codecs::gif::GifDecoder,
    imageops::{self, FilterType},
};
use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor, Seek},
    path::Path,
    time::{Duration, Instant},
};

use crate::{
    error::AssetError,
    timer::{RepeatingTimer, TimerHandle},
};

pub const DISPLAY_WIDTH: u32 = 250;
pub const DISPLAY_HEIGHT: u32 = 200;

/// Used for frames whose source carries no delay.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub image: RgbaImage,
    pub duration: Duration,
}

impl AnimationFrame {
    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Unloaded,
    Loaded,
    Running,
    /// Source missing or undecodable. Stays here until a successful load.
    Failed,
}

#[derive(Debug)]
pub struct Animation {
    frames: Vec<AnimationFrame>,
    cursor: usize,
    state: AnimationState,
    timer: Option<RepeatingTimer>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    pub fn new() -> Self {
        Self { frames: Vec::new(), cursor: 0, state: AnimationState::Unloaded, timer: None }
    }

    pub fn load_path(&mut self, path: &Path) -> Result<(), AssetError> {
        let decoded = File::open(path)
            .map_err(|source| AssetError::Missing { path: path.to_path_buf(), source })
            .and_then(|file| decode_frames(BufReader::new(file)));

        if let Err(e) = &decoded {
            tracing::warn!("Error loading {}: {e}", path.display());
        }
        self.install(decoded)
    }

    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), AssetError> {
        self.install(decode_frames(Cursor::new(bytes)))
    }

    fn install(&mut self, decoded: Result<Vec<AnimationFrame>, AssetError>) -> Result<(), AssetError> {
        self.stop();
        self.cursor = 0;
        match decoded {
            Ok(frames) => {
                self.frames = frames;
                self.state = AnimationState::Loaded;
                Ok(())
            }
            Err(e) => {
                self.frames.clear();
                self.state = AnimationState::Failed;
                Err(e)
            }
        }
    }

    /// Begin cycling. Only a loaded, stopped animation starts; anything else is
    /// left as it is.
    pub fn start(&mut self, now: Instant) {
        if self.state != AnimationState::Loaded {
            return;
        }
        let Some(frame) = self.frames.get(self.cursor) else {
            return;
        };
        self.timer = Some(RepeatingTimer::new(now, frame.duration));
        self.state = AnimationState::Running;
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        if self.state == AnimationState::Running {
            self.state = AnimationState::Loaded;
        }
    }

    /// Advance to the next frame if the current one has been shown for its
    /// full duration. Returns true when the displayed frame changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state != AnimationState::Running || self.frames.is_empty() {
            return false;
        }
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if !timer.is_due(now) {
            return false;
        }

        self.cursor = (self.cursor + 1) % self.frames.len();
        timer.reschedule(now, self.frames[self.cursor].duration);
        true
    }

    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.frames.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    pub fn time_until_next_frame(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().and_then(|t| t.remaining(now))
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer.as_ref().map(RepeatingTimer::handle)
    }
}

fn decode_frames<R: BufRead + Seek>(reader: R) -> Result<Vec<AnimationFrame>, AssetError> {
    let decoder = GifDecoder::new(reader)?;

    let mut frames = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame?;
        let duration = match Duration::from(frame.delay()) {
            d if d.is_zero() => DEFAULT_FRAME_DURATION,
            d => d,
        };
        let image =
            imageops::resize(frame.buffer(), DISPLAY_WIDTH, DISPLAY_HEIGHT, FilterType::Lanczos3);
        frames.push(AnimationFrame { image, duration });
    }

    if frames.is_empty() {
        return Err(AssetError::Empty);
    }
    Ok(frames)
}

/// The single on-screen animation position.
///
/// Every replacement bumps [`AnimationSlot::generation`], which the UI uses to
/// drop textures belonging to the previous animation.
#[derive(Debug, Default)]
pub struct AnimationSlot {
    current: Option<Animation>,
    generation: u64,
}

impl AnimationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop whatever is showing, then install `next`.
    pub fn replace(&mut self, next: Animation) {
        self.clear();
        self.current = Some(next);
    }

    pub fn clear(&mut self) {
        if let Some(mut old) = self.current.take() {
            old.stop();
        }
        self.generation += 1;
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.current.as_mut().is_some_and(|a| a.poll(now))
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Animation> {
        self.current.as_mut()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Delay, Frame, Rgba, codecs::gif::{GifEncoder, Repeat}};

    pub(crate) const RED: [u8; 4] = [255, 0, 0, 255];
    pub(crate) const GREEN: [u8; 4] = [0, 255, 0, 255];
    pub(crate) const BLUE: [u8; 4] = [0, 0, 255, 255];

    /// Encode solid-colour frames into an in-memory GIF.
    pub(crate) fn gif_bytes(frames: &[([u8; 4], u32)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            for (color, ms) in frames {
                let buffer = RgbaImage::from_pixel(8, 8, Rgba(*color));
                let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(*ms, 1));
                encoder.encode_frame(frame).unwrap();
            }
        }
        bytes
    }

    fn dominant_channel(frame: &AnimationFrame) -> usize {
        let px = frame.image.get_pixel(DISPLAY_WIDTH / 2, DISPLAY_HEIGHT / 2).0;
        (0..3).max_by_key(|&c| px[c]).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn loaded(frames: &[([u8; 4], u32)]) -> Animation {
        let mut animation = Animation::new();
        animation.load_bytes(&gif_bytes(frames)).unwrap();
        animation
    }

    #[test]
    fn load_decodes_and_resizes_every_frame() {
        let animation = loaded(&[(RED, 100), (GREEN, 150), (BLUE, 200)]);

        assert_eq!(animation.state(), AnimationState::Loaded);
        assert!(!animation.is_running());
        assert_eq!(animation.frames().len(), 3);

        let durations: Vec<u128> = animation.frames().iter().map(|f| f.duration_ms()).collect();
        assert_eq!(durations, vec![100, 150, 200]);

        for frame in animation.frames() {
            assert_eq!(frame.image.dimensions(), (DISPLAY_WIDTH, DISPLAY_HEIGHT));
        }
        assert_eq!(dominant_channel(&animation.frames()[0]), 0);
        assert_eq!(dominant_channel(&animation.frames()[2]), 2);
    }

    #[test]
    fn zero_delay_uses_default_duration() {
        let animation = loaded(&[(RED, 0), (BLUE, 0)]);
        assert!(animation.frames().iter().all(|f| f.duration == DEFAULT_FRAME_DURATION));
    }

    #[test]
    fn timer_fires_cycle_through_frames() {
        let mut animation = loaded(&[(RED, 100), (GREEN, 150), (BLUE, 200)]);
        let t0 = Instant::now();
        animation.start(t0);
        assert!(animation.is_running());
        assert_eq!(animation.cursor(), 0);

        assert!(!animation.poll(t0 + ms(99)));
        assert_eq!(animation.cursor(), 0);

        let mut shown = Vec::new();
        for at in [100, 250, 450, 550, 700, 900] {
            assert!(animation.poll(t0 + ms(at)));
            shown.push(animation.cursor());
        }
        assert_eq!(shown, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn each_frame_is_held_for_its_own_duration() {
        let mut animation = loaded(&[(RED, 100), (GREEN, 150), (BLUE, 200)]);
        let t0 = Instant::now();
        animation.start(t0);

        assert!(animation.poll(t0 + ms(100)));
        assert_eq!(animation.time_until_next_frame(t0 + ms(100)), Some(ms(150)));
        assert!(!animation.poll(t0 + ms(249)));
        assert!(animation.poll(t0 + ms(250)));
        assert_eq!(animation.time_until_next_frame(t0 + ms(250)), Some(ms(200)));
    }

    #[test]
    fn single_frame_animation_stays_on_frame_zero() {
        let mut animation = loaded(&[(RED, 100)]);
        let t0 = Instant::now();
        animation.start(t0);

        for i in 1..=5 {
            assert!(animation.poll(t0 + ms(100 * i)));
            assert_eq!(animation.cursor(), 0);
        }
    }

    #[test]
    fn undecodable_source_fails_and_start_is_noop() {
        let mut animation = Animation::new();
        let err = animation.load_bytes(b"definitely not a gif").unwrap_err();

        assert!(matches!(err, AssetError::Decode(_)));
        assert_eq!(animation.state(), AnimationState::Failed);
        assert!(!animation.is_running());

        let t0 = Instant::now();
        animation.start(t0);
        assert!(!animation.is_running());
        assert!(!animation.poll(t0 + ms(1000)));
        assert!(animation.current_frame().is_none());
        assert!(animation.timer_handle().is_none());
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut animation = Animation::new();
        let err = animation.load_path(&dir.path().join("rain.gif")).unwrap_err();

        assert!(matches!(err, AssetError::Missing { .. }));
        assert_eq!(animation.state(), AnimationState::Failed);
    }

    #[test]
    fn load_path_reads_gif_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clear.gif");
        std::fs::write(&path, gif_bytes(&[(RED, 100), (BLUE, 100)])).unwrap();

        let mut animation = Animation::new();
        animation.load_path(&path).unwrap();
        assert_eq!(animation.frames().len(), 2);
    }

    #[test]
    fn gif_truncated_after_first_frame_fails() {
        let full = gif_bytes(&[(RED, 100), (BLUE, 100)]);
        // A one-frame encode is the two-frame file up to the end of frame one,
        // plus the trailer byte.
        let first_frame_end = gif_bytes(&[(RED, 100)]).len() - 1;
        assert!(first_frame_end < full.len() - 1);

        let second_frame_len = full.len() - 1 - first_frame_end;
        for cut in [
            first_frame_end + 1,
            first_frame_end + second_frame_len / 2,
            full.len() - 2,
        ] {
            let mut animation = Animation::new();
            let err = animation.load_bytes(&full[..cut]).unwrap_err();

            assert!(matches!(err, AssetError::Decode(_)), "cut at {cut}: {err}");
            assert_eq!(animation.state(), AnimationState::Failed);
            assert!(animation.frames().is_empty());
            assert!(animation.current_frame().is_none());

            let t0 = Instant::now();
            animation.start(t0);
            assert!(!animation.is_running());
            assert!(!animation.poll(t0 + ms(1000)));
            assert_eq!(animation.cursor(), 0);
        }
    }

    #[test]
    fn unloaded_animation_does_not_start() {
        let mut animation = Animation::new();
        animation.start(Instant::now());
        assert_eq!(animation.state(), AnimationState::Unloaded);
    }

    #[test]
    fn stop_cancels_timer() {
        let mut animation = loaded(&[(RED, 100), (BLUE, 100)]);
        let t0 = Instant::now();
        animation.start(t0);
        let handle = animation.timer_handle().unwrap();

        animation.stop();

        assert!(handle.is_cancelled());
        assert_eq!(animation.state(), AnimationState::Loaded);
        assert!(!animation.poll(t0 + ms(500)));
        assert_eq!(animation.cursor(), 0);
    }

    #[test]
    fn failed_reload_stops_running_animation() {
        let mut animation = loaded(&[(RED, 100), (BLUE, 100)]);
        animation.start(Instant::now());
        let handle = animation.timer_handle().unwrap();

        assert!(animation.load_bytes(b"garbage").is_err());

        assert!(handle.is_cancelled());
        assert_eq!(animation.state(), AnimationState::Failed);
        assert!(animation.frames().is_empty());
    }

    #[test]
    fn replacing_stops_the_old_animation() {
        let t0 = Instant::now();
        let mut slot = AnimationSlot::new();

        let mut a = loaded(&[(RED, 100), (RED, 100)]);
        a.start(t0);
        let a_handle = a.timer_handle().unwrap();
        slot.replace(a);
        let first_generation = slot.generation();

        let mut b = loaded(&[(BLUE, 100), (BLUE, 150)]);
        b.start(t0);
        slot.replace(b);

        assert!(a_handle.is_cancelled());
        assert!(slot.generation() > first_generation);

        for i in 1..=10 {
            slot.poll(t0 + ms(100 * i));
            let frame = slot.current().and_then(Animation::current_frame).unwrap();
            assert_eq!(dominant_channel(frame), 2);
        }
    }

    #[test]
    fn clear_empties_slot() {
        let mut slot = AnimationSlot::new();
        let mut a = loaded(&[(GREEN, 100)]);
        a.start(Instant::now());
        let handle = a.timer_handle().unwrap();
        slot.replace(a);

        slot.clear();

        assert!(slot.current().is_none());
        assert!(handle.is_cancelled());
        assert!(!slot.poll(Instant::now() + ms(1000)));
    }
}
