//! Rendering module
//!
//! Draw calls go to an abstract `RenderTarget` in logical screen pixels
//! (1024x768). Drawing only reads the game state; images come from the
//! asset cache and fall back to flat placeholder rectangles when missing.

pub mod scene;
pub mod screens;
pub mod sprites;

use glam::Vec2;

use crate::assets::ImageId;
use crate::sim::Rect;

pub use scene::{draw_hud, draw_pause_overlay, draw_playfield, timer_color};
pub use screens::{draw_game_over, draw_menu, draw_options, draw_session};

/// RGBA, 0.0 - 1.0 per channel
pub type Color = [f32; 4];

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

pub const WHITE: Color = rgb(255, 255, 255);
pub const BLACK: Color = rgb(0, 0, 0);
/// Highlight for the selected menu entry
pub const SELECTED: Color = rgb(125, 33, 129);
/// Option waiting for a key press
pub const CAPTURING: Color = rgb(255, 255, 0);

/// Font size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// HUD (20 px)
    Ui,
    /// Menu entries (30 px)
    Menu,
    /// Titles (40 px)
    Big,
}

impl TextSize {
    pub fn px(self) -> f32 {
        match self {
            TextSize::Ui => 20.0,
            TextSize::Menu => 30.0,
            TextSize::Big => 40.0,
        }
    }
}

/// How `pos` anchors the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `pos.x` is the horizontal centre
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: TextSize,
    pub align: Align,
    /// Outline/drop shadow colour, if any
    pub shadow: Option<Color>,
}

impl TextStyle {
    /// Shadowed HUD text
    pub fn hud(color: Color) -> Self {
        Self {
            color,
            size: TextSize::Ui,
            align: Align::Left,
            shadow: Some(BLACK),
        }
    }

    /// Centred, shadowed text
    pub fn centered(color: Color, size: TextSize) -> Self {
        Self {
            color,
            size,
            align: Align::Center,
            shadow: Some(BLACK),
        }
    }
}

/// Where draw calls end up
pub trait RenderTarget {
    /// Draw `frame` of a sprite sheet stretched over `dest`
    fn blit(&mut self, image: ImageId, frame: usize, dest: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle);
    /// Restrict drawing to `clip`, or lift the restriction
    fn set_clip(&mut self, clip: Option<Rect>);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Blit(ImageId, usize, Rect),
        Fill(Rect, Color),
        Text(String, Vec2, TextStyle),
        Clip(Option<Rect>),
    }

    /// Records every call for inspection
    #[derive(Default)]
    pub struct Recorder {
        pub calls: Vec<Call>,
    }

    impl Recorder {
        pub fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(t, ..) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn text_style(&self, text: &str) -> Option<TextStyle> {
            self.calls.iter().find_map(|c| match c {
                Call::Text(t, _, style) if t == text => Some(*style),
                _ => None,
            })
        }

        pub fn fills_of(&self, color: Color) -> Vec<Rect> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Fill(r, col) if *col == color => Some(*r),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderTarget for Recorder {
        fn blit(&mut self, image: ImageId, frame: usize, dest: Rect) {
            self.calls.push(Call::Blit(image, frame, dest));
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.calls.push(Call::Fill(rect, color));
        }

        fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
            self.calls.push(Call::Text(text.to_string(), pos, style));
        }

        fn set_clip(&mut self, clip: Option<Rect>) {
            self.calls.push(Call::Clip(clip));
        }
    }
}
