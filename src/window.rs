// Preview window + pointer/keyboard input for the live binary.
// Visual effects provided here:
// 1) A window that shows the engine's latest preview frame.
// 2) The normalized 28×28 sample, enlarged, in the top-left corner.
// 3) Mouse and key state for the pointer detector and the keyboard fallback.

use image::{GrayImage, RgbImage};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::{Error, Result};
use crate::symbols::GestureToken;

pub struct Drawer {
    window: Window, // the on-screen window you see
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
        })
    }

    /// Push a frame (and optionally the debug sample) to the screen.
    pub fn present(&mut self, frame: Option<&RgbImage>, sample: Option<&GrayImage>) -> Result<()> {
        match frame {
            Some(frame) if frame.dimensions() == (self.width as u32, self.height as u32) => {
                for (dst, px) in self.buffer.iter_mut().zip(frame.pixels()) {
                    // Each pixel is Rgb<u8>. We pack it as 0x00RRGGBB.
                    let [r, g, b] = px.0;
                    *dst = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
                }
            }
            _ => self.buffer.fill(0),
        }
        if let Some(sample) = sample {
            self.blit_scaled(sample, 5);
        }
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Nearest-neighbour enlargement of a grayscale image at (0,0).
    fn blit_scaled(&mut self, img: &GrayImage, scale: usize) {
        for (x, y, px) in img.enumerate_pixels() {
            let v = px.0[0] as u32;
            let packed = (v << 16) | (v << 8) | v;
            for dy in 0..scale {
                for dx in 0..scale {
                    let (sx, sy) = (x as usize * scale + dx, y as usize * scale + dy);
                    if sx < self.width && sy < self.height {
                        self.buffer[sy * self.width + sx] = packed;
                    }
                }
            }
        }
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position normalized to 0..1, `None` outside the window.
    pub fn pointer(&self) -> Option<(f32, f32)> {
        let (x, y) = self.window.get_mouse_pos(MouseMode::Discard)?;
        Some((x / self.width as f32, y / self.height as f32))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// C discards the stroke in progress.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    /// Keyboard fallback: 1 `/`, 2 `\`, 3 `|`, 4 `O`.
    pub fn spell_key_once(&self) -> Option<GestureToken> {
        let pressed = |k| self.window.is_key_pressed(k, KeyRepeat::No);
        if pressed(Key::Key1) {
            Some(GestureToken::Slash)
        } else if pressed(Key::Key2) {
            Some(GestureToken::Backslash)
        } else if pressed(Key::Key3) {
            Some(GestureToken::Bar)
        } else if pressed(Key::Key4) {
            Some(GestureToken::Circle)
        } else {
            None
        }
    }
}
