//! Frame-counter animation playback
//!
//! An animation counts ticks, not images: the visible image is
//! `frame / image_duration`. Looping animations wrap at
//! `frames * image_duration`; one-shot animations stop on their last image
//! and raise `done`.

use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Asset key the frames come from
    pub asset: String,
    /// Number of images in the sequence (never zero)
    pub frames: usize,
    /// Ticks each image stays on screen
    pub image_duration: usize,
    pub looping: bool,
    pub done: bool,
    /// Tick counter
    pub frame: usize,
    /// Draw offset relative to the owner's position
    pub offset: Vec2,
}

impl Animation {
    /// Panics if `frames` or `image_duration` is zero.
    pub fn new(asset: impl Into<String>, frames: usize, image_duration: usize, looping: bool) -> Self {
        let asset = asset.into();
        assert!(frames > 0, "animation '{asset}' has no frames");
        assert!(image_duration > 0, "animation '{asset}' has zero image duration");
        Self {
            asset,
            frames,
            image_duration,
            looping,
            done: false,
            frame: 0,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Start at a given tick (clamped to the valid range)
    pub fn with_start_frame(mut self, frame: usize) -> Self {
        self.frame = frame.min(self.last_tick());
        self
    }

    /// Tick at which a one-shot animation reaches its final image
    #[inline]
    fn last_tick(&self) -> usize {
        (self.frames - 1) * self.image_duration
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if self.looping {
            self.frame = (self.frame + 1) % (self.frames * self.image_duration);
        } else {
            self.frame = (self.frame + 1).min(self.last_tick());
            if self.frame >= self.last_tick() {
                self.done = true;
            }
        }
    }

    /// Index of the image to draw
    #[inline]
    pub fn image_index(&self) -> usize {
        self.frame / self.image_duration
    }

    /// Rewind to the first tick
    pub fn reset(&mut self) {
        self.frame = 0;
        self.done = false;
    }
}
