use anyhow::{bail, Result};

/// Inset rectangle of the camera frame that spans the whole display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveRegion {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ActiveRegion {
    /// `margin` camera pixels in from every edge of a `frame_w` x `frame_h` frame.
    pub fn inset(frame_w: u32, frame_h: u32, margin: f32) -> Result<Self> {
        let (w, h) = (frame_w as f32, frame_h as f32);
        if margin < 0.0 || 2.0 * margin >= w || 2.0 * margin >= h {
            bail!("margin {margin} leaves no active region in a {frame_w}x{frame_h} frame");
        }
        Ok(Self {
            left: margin,
            top: margin,
            right: w - margin,
            bottom: h - margin,
        })
    }
}

/// Linear interpolation of `value` from `from` onto `to`, clamped to `to`'s endpoints.
pub fn interp(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let t = ((value - from.0) / (from.1 - from.0)).clamp(0.0, 1.0);
    to.0 + t * (to.1 - to.0)
}

/// Maps camera-pixel positions inside the active region to absolute display
/// coordinates.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    region: ActiveRegion,
    screen_w: u32,
    screen_h: u32,
}

impl CoordinateMapper {
    pub fn new(region: ActiveRegion, screen_w: u32, screen_h: u32) -> Self {
        Self {
            region,
            screen_w,
            screen_h,
        }
    }

    pub fn region(&self) -> ActiveRegion {
        self.region
    }

    /// Result is always inside [0, screen_w-1] x [0, screen_h-1].
    pub fn map(&self, x: f32, y: f32) -> (f32, f32) {
        let r = &self.region;
        let sw = self.screen_w as f32;
        let sh = self.screen_h as f32;
        let mx = interp(x, (r.left, r.right), (0.0, sw));
        let my = interp(y, (r.top, r.bottom), (0.0, sh));
        (
            mx.clamp(0.0, (sw - 1.0).max(0.0)),
            my.clamp(0.0, (sh - 1.0).max(0.0)),
        )
    }
}
