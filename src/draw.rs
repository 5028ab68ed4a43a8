// Window + presenting the preview.
// The preview has real transparency, so it is shown over a checkerboard.

use mask_brush::{Error, RasterSurface};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

const CHECKER_CELL: usize = 8;
const CHECKER_LIGHT: u32 = 0x00_CC_CC_CC;
const CHECKER_DARK: u32 = 0x00_99_99_99;

/// Screen buffer handed to minifb, one 0x00RRGGBB word per pixel.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Create a window the size of the photo; refresh is capped at 60 fps.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window pixels, `None` once the pointer leaves the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
}

/// What the pointer did since the previous frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press(f32, f32), // button went down inside the window
    Move(f32, f32),  // held and moved to a new position
    Release,         // button up, or the pointer left the window
    Idle,
}

/// Turns polled mouse state into stroke events. A pointer held still
/// produces nothing, so partial-opacity dabs do not pile up.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<(f32, f32)>, // Some while the button is held inside the window
}

impl PointerTracker {
    pub fn update(&mut self, pos: Option<(f32, f32)>, down: bool) -> PointerEvent {
        match (pos, down, self.last) {
            (Some(p), true, None) => {
                self.last = Some(p);
                PointerEvent::Press(p.0, p.1)
            }
            (Some(p), true, Some(prev)) if p != prev => {
                self.last = Some(p);
                PointerEvent::Move(p.0, p.1)
            }
            (Some(_), true, Some(_)) => PointerEvent::Idle,
            (_, _, Some(_)) => {
                self.last = None;
                PointerEvent::Release
            }
            _ => PointerEvent::Idle,
        }
    }
}

/// Blend the preview over a checkerboard into the screen buffer.
pub fn compose_checkerboard(preview: &RasterSurface, screen: &mut FrameBuffer) {
    let w = screen.width.min(preview.width() as usize);
    let h = screen.height.min(preview.height() as usize);
    let stride = preview.width() as usize * 4;
    let data = preview.data();

    for y in 0..h {
        for x in 0..w {
            let i = y * stride + x * 4;
            let a = data[i + 3] as u32;
            let bg = if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 { CHECKER_LIGHT } else { CHECKER_DARK };
            let mix = |c: u8, shift: u32| -> u32 {
                let b = (bg >> shift) & 0xFF;
                (c as u32 * a + b * (255 - a) + 127) / 255
            };
            let r = mix(data[i], 16);
            let g = mix(data[i + 1], 8);
            let b = mix(data[i + 2], 0);
            screen.pixels[y * screen.width + x] = (r << 16) | (g << 8) | b;
        }
    }
}
