//! Integer follow camera

use glam::{IVec2, Vec2};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    /// Top-left of the view in world pixels
    pub scroll: IVec2,
    pub viewport: IVec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(IVec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT))
    }
}

impl Camera {
    pub fn new(viewport: IVec2) -> Self {
        Self {
            scroll: IVec2::ZERO,
            viewport,
        }
    }

    /// Close `1/smoothing` of the gap to centring `target`, in whole pixels
    pub fn follow(&mut self, target: Vec2, smoothing: i32) {
        let smoothing = smoothing.max(1);
        let goal = target.as_ivec2() - self.viewport / 2;
        self.scroll += (goal - self.scroll) / smoothing;
    }

    /// Jump straight to centring `target`
    pub fn center_on(&mut self, target: Vec2) {
        self.scroll = target.as_ivec2() - self.viewport / 2;
    }
}
