//! Playfield entities: the frog, lane hazards/platforms and coins
//!
//! Hazards share one header (id, visual rect, signed speed) and carry their
//! kind-specific state in `HazardKind`. The resolver and the tick dispatch on
//! the kind tag, so per-kind rules live in a single `match`.

use super::rect::Rect;
use crate::consts::*;

/// Per-frame speeds in the level table were authored at 60 Hz; all
/// simulation speeds are stored in pixels per second.
#[inline]
pub fn per_frame_to_per_sec(px_per_frame: f32) -> f32 {
    px_per_frame * REFERENCE_FPS
}

/// Turtle dive cycle length in phase units
pub const TURTLE_CYCLE: f32 = 18.0;
/// Phase units gained per second (0.06 per reference frame)
pub const TURTLE_PHASE_RATE: f32 = 0.06 * REFERENCE_FPS;
/// Crocodile jaw timer units gained per second (0.04 per reference frame)
pub const JAW_RATE: f32 = 0.04 * REFERENCE_FPS;
/// Size of the crocodile head region at the leading edge
pub const CROC_HEAD_SIZE: f32 = 40.0;
/// How far past the far edge a crocodile re-enters
pub const CROC_WRAP_LEAD: f32 = 60.0;
/// Horizontal offset of a snake riding a log
pub const RIDING_SNAKE_OFFSET: f32 = 10.0;

/// Which way the frog is facing (last hop direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

/// Crocodile jaw phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jaw {
    Closed,
    Open,
}

/// How a snake moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnakeMode {
    /// Free-roaming, bouncing between the playfield edges
    Roaming,
    /// Riding the log with this id, `offset` px right of its left edge
    Riding { log_id: u32, offset: f32 },
}

/// Kind tag plus kind-specific state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardKind {
    /// Road traffic; `sprite` picks the car graphic (0..4)
    Car { sprite: u8 },
    /// Floating log; `variant` picks the log graphic (1..=3)
    Log { variant: u8 },
    /// Diving turtle driven by a phase accumulator
    Turtle { phase: f32 },
    /// Crocodile platform with a deadly head when the jaw is open
    Crocodile { timer: f32, jaw: Jaw },
    /// Snake, free or riding a log
    Snake { mode: SnakeMode },
}

/// A lane entity: traffic, platform or snake
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub id: u32,
    /// Visual bounds
    pub rect: Rect,
    /// Horizontal speed in px/s, sign is direction
    pub speed: f32,
    pub kind: HazardKind,
}

impl Hazard {
    /// Car occupying a road lane whose top is `lane_y`
    pub fn car(id: u32, x: f32, lane_y: f32, width: f32, speed: f32, sprite: u8) -> Self {
        Self {
            id,
            rect: Rect::new(x, lane_y + 4.0, width, 32.0),
            speed,
            kind: HazardKind::Car { sprite },
        }
    }

    pub fn log(id: u32, x: f32, lane_y: f32, width: f32, speed: f32, variant: u8) -> Self {
        Self {
            id,
            rect: Rect::new(x, lane_y + 3.0, width, 34.0),
            speed,
            kind: HazardKind::Log { variant },
        }
    }

    /// Turtle starting `phase` units into its dive cycle
    pub fn turtle(id: u32, x: f32, lane_y: f32, speed: f32, phase: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, lane_y + 4.0, 40.0, 32.0),
            speed,
            kind: HazardKind::Turtle { phase },
        }
    }

    pub fn crocodile(id: u32, x: f32, lane_y: f32, speed: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, lane_y, 120.0, 40.0),
            speed,
            kind: HazardKind::Crocodile {
                timer: 0.0,
                jaw: Jaw::Closed,
            },
        }
    }

    pub fn snake(id: u32, x: f32, lane_y: f32, speed: f32, mode: SnakeMode) -> Self {
        Self {
            id,
            rect: Rect::new(x, lane_y + 8.0, 100.0, 25.0),
            speed,
            kind: HazardKind::Snake { mode },
        }
    }

    /// Collision box, inset (or outset) from the visual bounds per kind
    pub fn hitbox(&self) -> Rect {
        match self.kind {
            HazardKind::Car { .. } => self.rect.inflate(-4.0, -8.0),
            HazardKind::Log { .. } => self.rect.inflate(6.0, 0.0),
            HazardKind::Turtle { .. } => self.rect.inflate(2.0, 0.0),
            HazardKind::Crocodile { .. } => self.rect.inflate(-15.0, -10.0),
            HazardKind::Snake { .. } => self.rect.inflate(-10.0, -5.0),
        }
    }

    pub fn is_car(&self) -> bool {
        matches!(self.kind, HazardKind::Car { .. })
    }

    pub fn is_log(&self) -> bool {
        matches!(self.kind, HazardKind::Log { .. })
    }

    pub fn is_snake(&self) -> bool {
        matches!(self.kind, HazardKind::Snake { .. })
    }

    /// Logs, turtles and crocodiles can carry the frog (and coins)
    pub fn is_platform(&self) -> bool {
        matches!(
            self.kind,
            HazardKind::Log { .. } | HazardKind::Turtle { .. } | HazardKind::Crocodile { .. }
        )
    }

    /// True while a turtle is under water; always false for other kinds
    pub fn is_submerged(&self) -> bool {
        match self.kind {
            HazardKind::Turtle { phase } => {
                let cycle = phase.rem_euclid(TURTLE_CYCLE);
                (4.0..9.0).contains(&cycle)
            }
            _ => false,
        }
    }

    /// Sprite frame for a turtle, or `None` while fully under water
    pub fn turtle_frame(&self) -> Option<usize> {
        let HazardKind::Turtle { phase } = self.kind else {
            return None;
        };
        let cycle = phase.rem_euclid(TURTLE_CYCLE);
        if cycle < 5.0 {
            Some(cycle as usize)
        } else if cycle < 9.0 {
            None
        } else if cycle < 13.0 {
            Some((cycle as usize - 4).min(8))
        } else {
            Some(0)
        }
    }

    /// The 40x40 head region at the leading edge of a crocodile
    pub fn crocodile_head(&self) -> Option<Rect> {
        match self.kind {
            HazardKind::Crocodile { .. } => {
                let x = if self.speed < 0.0 {
                    self.rect.x
                } else {
                    self.rect.right() - CROC_HEAD_SIZE
                };
                Some(Rect::new(x, self.rect.y, CROC_HEAD_SIZE, CROC_HEAD_SIZE))
            }
            _ => None,
        }
    }

    /// Jaw state for crocodiles
    pub fn jaw(&self) -> Option<Jaw> {
        match self.kind {
            HazardKind::Crocodile { jaw, .. } => Some(jaw),
            _ => None,
        }
    }

    /// Advance animation state and move one step.
    ///
    /// Riding snakes are left in place here; their position is copied from
    /// the host log after every log has moved.
    pub fn advance(&mut self, dt: f32) {
        let left_edge = MARGIN_X;
        let right_edge = MARGIN_X + GAME_WIDTH;

        match &mut self.kind {
            HazardKind::Car { .. } | HazardKind::Log { .. } => {
                self.rect.x += self.speed * dt;
                wrap_flush(&mut self.rect, self.speed);
            }
            HazardKind::Turtle { phase } => {
                *phase += TURTLE_PHASE_RATE * dt;
                self.rect.x += self.speed * dt;
                wrap_flush(&mut self.rect, self.speed);
            }
            HazardKind::Crocodile { timer, jaw } => {
                *timer += JAW_RATE * dt;
                *jaw = if (*timer as u32) % 2 == 1 {
                    Jaw::Open
                } else {
                    Jaw::Closed
                };
                self.rect.x += self.speed * dt;
                if self.speed > 0.0 && self.rect.left() > right_edge {
                    self.rect.set_right(left_edge - CROC_WRAP_LEAD);
                } else if self.speed < 0.0 && self.rect.right() < left_edge {
                    self.rect.x = right_edge + CROC_WRAP_LEAD;
                }
            }
            HazardKind::Snake {
                mode: SnakeMode::Roaming,
            } => {
                self.rect.x += self.speed * dt;
                if self.rect.left() <= left_edge {
                    self.speed = self.speed.abs();
                } else if self.rect.right() >= right_edge {
                    self.speed = -self.speed.abs();
                }
            }
            HazardKind::Snake {
                mode: SnakeMode::Riding { .. },
            } => {}
        }
    }
}

/// Re-enter flush with the opposite playfield edge once fully off-screen
fn wrap_flush(rect: &mut Rect, speed: f32) {
    let left_edge = MARGIN_X;
    let right_edge = MARGIN_X + GAME_WIDTH;
    if speed > 0.0 && rect.left() > right_edge {
        rect.set_right(left_edge);
    } else if speed < 0.0 && rect.right() < left_edge {
        rect.x = right_edge;
    }
}

/// Frog lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrogState {
    Alive,
    /// Death animation running; nothing else may happen to this frog
    Dying,
    /// Parked in a goal slot, waiting to be replaced
    Safe,
}

/// Sprite size of the frog
pub const FROG_SIZE: f32 = 36.0;
/// Hitbox inset from the sprite on each axis (total)
pub const FROG_HITBOX_INSET: f32 = 22.0;
/// Number of death animation frames
pub const DEATH_FRAMES: f32 = 7.0;
/// Death animation frames per second (0.15 per reference frame)
pub const DEATH_RATE: f32 = 0.15 * REFERENCE_FPS;
/// Hop pose hold time (10 reference frames)
pub const HOP_POSE_TIME: f32 = 10.0 / REFERENCE_FPS;

/// Result of a hop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    /// Hop refused (edge of the playfield, or not lined up with a slot)
    Blocked,
    /// Moved one tile
    Moved,
    /// Moved into the goal row over slot `usize`
    Slot(usize),
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Frog {
    pub rect: Rect,
    pub facing: Facing,
    pub state: FrogState,
    /// Remaining time the hop pose is shown
    pub hop_timer: f32,
    /// Death animation progress in frames
    pub death_progress: f32,
    /// Death animation done; the round decides what happens next
    pub finished: bool,
}

impl Frog {
    /// Fresh frog on the start row, centred horizontally
    pub fn spawn() -> Self {
        Self {
            rect: Rect::new(
                MARGIN_X + 302.0,
                crate::row_y(START_ROW) + 2.0,
                FROG_SIZE,
                FROG_SIZE,
            ),
            facing: Facing::Up,
            state: FrogState::Alive,
            hop_timer: 0.0,
            death_progress: 0.0,
            finished: false,
        }
    }

    pub fn hitbox(&self) -> Rect {
        self.rect.inflate(-FROG_HITBOX_INSET, -FROG_HITBOX_INSET)
    }

    pub fn is_alive(&self) -> bool {
        self.state == FrogState::Alive
    }

    /// Tile row the frog currently stands on
    pub fn row(&self) -> i32 {
        crate::row_of(self.rect.y)
    }

    /// Start dying. Only a living frog can die, and only once.
    pub fn die(&mut self) -> bool {
        if self.state != FrogState::Alive {
            return false;
        }
        self.state = FrogState::Dying;
        self.death_progress = 0.0;
        true
    }

    /// Hop one tile. `slots` are the goal ranges checked when leaving row 1.
    pub fn hop(&mut self, facing: Facing, slots: &[(f32, f32)]) -> Hop {
        if self.state != FrogState::Alive || self.finished {
            return Hop::Blocked;
        }
        self.facing = facing;
        self.hop_timer = HOP_POSE_TIME;

        let step = TILE_SIZE;
        match facing {
            Facing::Up => {
                if self.row() <= GOAL_ROW + 1 {
                    let cx = self.rect.center_x();
                    if let Some(i) = slots.iter().position(|&(s, e)| s <= cx && cx <= e) {
                        let (s, e) = slots[i];
                        self.rect.set_center_x((s + e) / 2.0);
                        self.rect.y -= step;
                        return Hop::Slot(i);
                    }
                    self.hop_timer = 0.0;
                    return Hop::Blocked;
                }
                self.rect.y -= step;
                Hop::Moved
            }
            Facing::Down => {
                if self.row() < START_ROW {
                    self.rect.y += step;
                    Hop::Moved
                } else {
                    Hop::Blocked
                }
            }
            Facing::Left => {
                if self.rect.left() - step >= MARGIN_X {
                    self.rect.x -= step;
                    Hop::Moved
                } else {
                    Hop::Blocked
                }
            }
            Facing::Right => {
                if self.rect.right() + step <= MARGIN_X + GAME_WIDTH {
                    self.rect.x += step;
                    Hop::Moved
                } else {
                    Hop::Blocked
                }
            }
        }
    }

    /// Advance pose/death animation
    pub fn animate(&mut self, dt: f32) {
        match self.state {
            FrogState::Alive => {
                self.hop_timer = (self.hop_timer - dt).max(0.0);
            }
            FrogState::Dying => {
                self.death_progress += DEATH_RATE * dt;
                if self.death_progress >= DEATH_FRAMES {
                    self.finished = true;
                }
            }
            FrogState::Safe => {}
        }
    }

    /// Current death animation frame (clamped to the last frame)
    pub fn death_frame(&self) -> usize {
        (self.death_progress as usize).min(DEATH_FRAMES as usize - 1)
    }
}

/// Coin size
pub const COIN_SIZE: f32 = 34.0;
/// Seconds before an uncollected coin disappears
pub const COIN_LIFETIME: f32 = 15.0;

/// Bonus pickup, optionally riding a river platform
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub rect: Rect,
    /// Seconds since spawn
    pub age: f32,
    /// Host platform id and horizontal offset from its left edge
    pub rider: Option<(u32, f32)>,
}

impl Coin {
    /// Coin centred on a land tile
    pub fn on_tile(row: i32, col: i32) -> Self {
        let pad = (TILE_SIZE - COIN_SIZE) / 2.0;
        Self {
            rect: Rect::new(
                MARGIN_X + col as f32 * TILE_SIZE + pad,
                crate::row_y(row) + pad,
                COIN_SIZE,
                COIN_SIZE,
            ),
            age: 0.0,
            rider: None,
        }
    }

    /// Coin centred on a platform, moving with it
    pub fn on_platform(platform: &Hazard) -> Self {
        let offset = (platform.rect.w - COIN_SIZE) / 2.0;
        Self {
            rect: Rect::new(
                platform.rect.x + offset,
                platform.rect.y + (platform.rect.h - COIN_SIZE) / 2.0,
                COIN_SIZE,
                COIN_SIZE,
            ),
            age: 0.0,
            rider: Some((platform.id, offset)),
        }
    }

    pub fn expired(&self) -> bool {
        self.age > COIN_LIFETIME
    }
}
