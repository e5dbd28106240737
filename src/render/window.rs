use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

use crate::gesture::ActiveRegion;
use crate::hand::LandmarkSet;
use crate::render::skeleton::{DEADZONE_COLOR, GUIDE_COLOR, HAND_CONNECTIONS, LANDMARK_COLOR, SKELETON_COLOR};

/// Debug view backed by minifb
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    /// Create the window. Hosts find it by its title
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![0u32; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
        })
    }

    /// Whether the window is still open (Esc closes it)
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Copy a BGR Mat into the buffer
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<opencv::core::Vec3b>(y as i32, x as i32)?;
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                self.buffer[y * self.width + x] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// Draw the active region box, the scroll center line and the deadzone
    pub fn draw_guides(&mut self, region: &ActiveRegion, deadzone: f32) {
        let (l, t) = (region.left as i32, region.top as i32);
        let (r, b) = (region.right as i32, region.bottom as i32);
        self.draw_line(l, t, r, t, GUIDE_COLOR);
        self.draw_line(r, t, r, b, GUIDE_COLOR);
        self.draw_line(r, b, l, b, GUIDE_COLOR);
        self.draw_line(l, b, l, t, GUIDE_COLOR);

        let w = self.width as i32;
        let center_y = self.height as i32 / 2;
        let dz = deadzone as i32;
        self.draw_line(0, center_y, w - 1, center_y, GUIDE_COLOR);
        self.draw_line(w / 2 - 50, center_y - dz, w / 2 + 50, center_y - dz, DEADZONE_COLOR);
        self.draw_line(w / 2 - 50, center_y + dz, w / 2 + 50, center_y + dz, DEADZONE_COLOR);
    }

    /// Draw the hand landmarks
    pub fn draw_hand(&mut self, hand: &LandmarkSet) {
        let w = self.width as u32;
        let h = self.height as u32;
        let px = |lm: &crate::hand::Landmark| {
            let (x, y) = lm.to_pixel(w, h);
            (x as i32, y as i32)
        };

        for (start, end) in HAND_CONNECTIONS.iter() {
            let (x1, y1) = px(hand.get(*start));
            let (x2, y2) = px(hand.get(*end));
            self.draw_line(x1, y1, x2, y2, SKELETON_COLOR);
        }

        for lm in hand.landmarks.iter() {
            let (x, y) = px(lm);
            self.draw_circle(x, y, 3, LANDMARK_COLOR);
        }
    }

    /// Present the buffer
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Bresenham line
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled circle
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Set one pixel, bounds-checked
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}
