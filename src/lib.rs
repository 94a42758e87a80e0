//! Frog Crossing - a single-screen road-and-river crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, level layout, collisions, round state)
//! - `renderer`: Read-only draw-call emission against an abstract render target
//! - `session`: Screen shell (menu, options, playing, game over)
//! - `persistence`: High score and config storage
//! - `settings`: Volume and key bindings

pub mod assets;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the lane speeds were tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen size
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;

    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 640.0;
    pub const MARGIN_X: f32 = (SCREEN_WIDTH - GAME_WIDTH) / 2.0;
    pub const OFFSET_Y: f32 = 8.0;
    pub const TILE_SIZE: f32 = 40.0;

    /// Tile rows (0 = goal row at the top)
    pub const GOAL_ROW: i32 = 0;
    pub const MEDIAN_ROW: i32 = 6;
    pub const VERGE_ROW: i32 = 13;
    pub const START_ROW: i32 = 14;

    /// Number of goal slots along the top
    pub const SLOT_COUNT: usize = 5;

    /// Seconds a frog has to reach a slot
    pub const MAX_TIME: f32 = 30.0;

    /// Lives
    pub const START_LIVES: u32 = 5;
    pub const MAX_LIVES: u32 = 9;

    /// Scoring
    pub const ROW_ADVANCE_POINTS: u64 = 10;
    pub const GOAL_POINTS: u64 = 100;
    pub const LEVEL_CLEAR_POINTS: u64 = 1000;
    pub const COIN_POINTS: u64 = 200;
    /// Every multiple of this grants one extra life
    pub const EXTRA_LIFE_EVERY: u64 = 5000;

    /// Difficulty multiplier growth per cleared level
    pub const DIFFICULTY_STEP: f32 = 0.15;

    /// Deferred transition lengths (seconds)
    pub const GOAL_DELAY: f32 = 1.0;
    pub const LEVEL_DELAY: f32 = 3.0;
    pub const GAME_OVER_DELAY: f32 = 2.0;

    /// Reference frame rate the per-frame lane speeds were authored at
    pub const REFERENCE_FPS: f32 = 60.0;
}

/// Top y coordinate of a tile row
#[inline]
pub fn row_y(row: i32) -> f32 {
    consts::OFFSET_Y + row as f32 * consts::TILE_SIZE
}

/// Tile row containing a y coordinate
#[inline]
pub fn row_of(y: f32) -> i32 {
    ((y - consts::OFFSET_Y) / consts::TILE_SIZE).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_helpers_agree() {
        for row in 0..=consts::START_ROW {
            assert_eq!(row_of(row_y(row)), row);
            assert_eq!(row_of(row_y(row) + 2.0), row);
        }
    }
}
