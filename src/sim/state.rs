//! Round state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`: lives, score, level,
//! timer, difficulty, goal slots, the frog and the hazard set.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::DeathCause;
use super::entity::{Coin, Frog, FrogState, Hazard};
use super::level::build_level;
use crate::consts::*;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    /// Lanes animate, waiting for the first input
    AwaitingStart,
    /// Active gameplay; the only phase where collisions and the timer run
    Playing,
    /// A frog reached a slot; a new frog spawns when this runs out
    GoalTransition { remaining: f32 },
    /// All slots filled; the next level is built when this runs out
    LevelTransition { remaining: f32 },
    /// Last life lost; the round ends when this runs out
    GameOverTransition { remaining: f32 },
    /// Round over
    GameOver,
}

impl GamePhase {
    /// Seconds left on a deferred transition
    pub fn remaining(&self) -> Option<f32> {
        match *self {
            GamePhase::GoalTransition { remaining }
            | GamePhase::LevelTransition { remaining }
            | GamePhase::GameOverTransition { remaining } => Some(remaining),
            _ => None,
        }
    }
}

/// Things that happened during a tick, drained by the shell for audio/logs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Hop,
    Died(DeathCause),
    GoalReached(usize),
    LevelCleared,
    ExtraLife(u32),
    CoinCollected,
    GameOver { score: u64 },
}

/// The five goal slots at the top of the playfield
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSlots {
    ranges: [(f32, f32); SLOT_COUNT],
    occupied: [bool; SLOT_COUNT],
}

impl Default for GoalSlots {
    fn default() -> Self {
        let mut ranges = [(0.0, 0.0); SLOT_COUNT];
        for (i, range) in ranges.iter_mut().enumerate() {
            let start = MARGIN_X + 59.0 + i as f32 * 120.0;
            *range = (start, start + 40.0);
        }
        Self {
            ranges,
            occupied: [false; SLOT_COUNT],
        }
    }
}

impl GoalSlots {
    /// Horizontal ranges (inclusive) of each slot
    pub fn ranges(&self) -> &[(f32, f32)] {
        &self.ranges
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        assert!(index < SLOT_COUNT, "goal slot {index} out of range");
        self.occupied[index]
    }

    /// Mark a slot as filled
    pub fn occupy(&mut self, index: usize) {
        assert!(index < SLOT_COUNT, "goal slot {index} out of range");
        self.occupied[index] = true;
    }

    pub fn all_occupied(&self) -> bool {
        self.occupied.iter().all(|&o| o)
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }

    pub fn clear(&mut self) {
        self.occupied = [false; SLOT_COUNT];
    }

    pub fn iter(&self) -> impl Iterator<Item = ((f32, f32), bool)> + '_ {
        self.ranges.iter().copied().zip(self.occupied.iter().copied())
    }
}

/// Random coin spawn interval (seconds)
pub const COIN_INTERVAL: std::ops::Range<f32> = 6.0..12.0;

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub lives: u32,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Seconds left for the current frog
    pub time_left: f32,
    /// Scales every lane speed; grows per cleared level
    pub difficulty: f32,
    pub slots: GoalSlots,
    /// Debug invulnerability
    pub god_mode: bool,
    /// Pause gate; only transition countdowns run while set
    pub paused: bool,
    pub phase: GamePhase,
    pub frog: Frog,
    /// Traffic, platforms and snakes; replaced wholesale on rebuild
    pub hazards: Vec<Hazard>,
    pub coins: Vec<Coin>,
    /// Seconds until the next coin spawn attempt
    pub coin_timer: f32,
    /// Highest (smallest) row reached by the current frog
    pub max_row_reached: i32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events for the shell
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new round with the given seed, waiting for the first input
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let coin_timer = rng.random_range(COIN_INTERVAL);
        let mut state = Self {
            seed,
            rng,
            lives: START_LIVES,
            level: 1,
            score: 0,
            time_left: MAX_TIME,
            difficulty: 1.0,
            slots: GoalSlots::default(),
            god_mode: false,
            paused: false,
            phase: GamePhase::AwaitingStart,
            frog: Frog::spawn(),
            hazards: Vec::new(),
            coins: Vec::new(),
            coin_timer,
            max_row_reached: START_ROW,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.rebuild_level();
        state
    }

    /// Reset lives, level, score, difficulty and slots and start playing
    pub fn restart(&mut self) {
        log::info!("Restarting round (previous score {})", self.score);
        self.lives = START_LIVES;
        self.level = 1;
        self.score = 0;
        self.difficulty = 1.0;
        self.slots.clear();
        self.paused = false;
        self.events.clear();
        self.rebuild_level();
        self.phase = GamePhase::Playing;
    }

    /// Add points; grants one life per 5000-point threshold crossed.
    /// Returns the number of lives granted.
    pub fn add_score(&mut self, points: u64) -> u32 {
        let old = self.score;
        self.score += points;
        let granted = (self.score / EXTRA_LIFE_EVERY - old / EXTRA_LIFE_EVERY) as u32;
        if granted > 0 {
            self.lives += granted;
            log::info!("Extra life x{} at {} points", granted, self.score);
            self.events.push(GameEvent::ExtraLife(granted));
        }
        granted
    }

    /// Replace the frog and reset the per-life timer and row watermark
    pub fn spawn_frog(&mut self) {
        self.frog = Frog::spawn();
        self.time_left = MAX_TIME;
        self.max_row_reached = START_ROW;
    }

    /// Discard every hazard and coin, build the current level and respawn
    pub fn rebuild_level(&mut self) {
        self.hazards = build_level(self.level, self.difficulty, &mut self.rng);
        self.coins.clear();
        self.spawn_frog();
        log::info!(
            "Level {} ready (difficulty {:.2}, {} hazards)",
            self.level,
            self.difficulty,
            self.hazards.len()
        );
    }

    /// Kill the frog if it is alive. Costs a life exactly once per frog.
    pub fn kill_frog(&mut self, cause: DeathCause) -> bool {
        if !self.frog.die() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Frog died ({:?}), {} lives left", cause, self.lives);
        self.events.push(GameEvent::Died(cause));
        true
    }

    /// Add a life (debug action); never past the cap
    pub fn grant_life(&mut self) {
        if self.lives < MAX_LIVES {
            self.lives += 1;
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Frog parked in a goal slot
    pub fn frog_is_safe(&self) -> bool {
        self.frog.state == FrogState::Safe
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
