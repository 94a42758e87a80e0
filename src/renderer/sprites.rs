//! Sprite selection for playfield entities
//!
//! Picks the sheet and frame for each entity and the flat colour used when
//! the sheet isn't available.

use super::{Color, RenderTarget, rgb};
use crate::assets::{AssetCache, AssetProvider, paths};
use crate::sim::{Facing, Frog, FrogState, Hazard, HazardKind, Jaw, Rect};

/// One frame of a sprite sheet plus its fallback colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub image: &'static str,
    pub frame: usize,
    pub placeholder: Color,
}

const CAR_COLORS: [Color; 4] = [
    rgb(220, 50, 50),
    rgb(240, 200, 40),
    rgb(60, 120, 230),
    rgb(230, 230, 230),
];
pub const LOG_COLOR: Color = rgb(120, 72, 30);
pub const TURTLE_COLOR: Color = rgb(30, 140, 60);
pub const CROCODILE_COLOR: Color = rgb(20, 90, 40);
/// Open jaws, drawn over the head in placeholder mode
pub const JAWS_COLOR: Color = rgb(200, 30, 30);
pub const SNAKE_COLOR: Color = rgb(150, 60, 190);
pub const COIN_COLOR: Color = rgb(255, 200, 0);
pub const FROG_COLOR: Color = rgb(60, 230, 60);
pub const DEAD_FROG_COLOR: Color = rgb(150, 150, 150);

/// Sprite for a hazard, or `None` for a turtle that is fully under water
pub fn hazard_sprite(hazard: &Hazard) -> Option<Sprite> {
    let moving_right = hazard.speed > 0.0;
    let sprite = match hazard.kind {
        HazardKind::Car { sprite } => Sprite {
            image: paths::CARS,
            frame: sprite as usize,
            placeholder: CAR_COLORS[sprite as usize % CAR_COLORS.len()],
        },
        HazardKind::Log { variant } => Sprite {
            image: paths::log(variant),
            frame: 0,
            placeholder: LOG_COLOR,
        },
        HazardKind::Turtle { .. } => Sprite {
            image: paths::TURTLE,
            frame: hazard.turtle_frame()?,
            placeholder: TURTLE_COLOR,
        },
        HazardKind::Crocodile { jaw, .. } => Sprite {
            image: paths::CROCODILE,
            frame: usize::from(jaw == Jaw::Open) + 2 * usize::from(moving_right),
            placeholder: CROCODILE_COLOR,
        },
        HazardKind::Snake { .. } => Sprite {
            image: paths::SNAKE,
            frame: usize::from(moving_right),
            placeholder: SNAKE_COLOR,
        },
    };
    Some(sprite)
}

/// Sprite for the frog, or `None` while it sits in a goal slot
pub fn frog_sprite(frog: &Frog) -> Option<Sprite> {
    match frog.state {
        FrogState::Safe => None,
        FrogState::Dying => Some(Sprite {
            image: paths::DEATH,
            frame: frog.death_frame(),
            placeholder: DEAD_FROG_COLOR,
        }),
        FrogState::Alive => {
            let facing = match frog.facing {
                Facing::Up => 0,
                Facing::Down => 1,
                Facing::Left => 2,
                Facing::Right => 3,
            };
            Some(Sprite {
                image: paths::FROG,
                frame: facing * 2 + usize::from(frog.hop_timer > 0.0),
                placeholder: FROG_COLOR,
            })
        }
    }
}

pub fn coin_sprite() -> Sprite {
    Sprite {
        image: paths::COIN,
        frame: 0,
        placeholder: COIN_COLOR,
    }
}

/// Blit the sprite, or fill its placeholder. Returns false for a placeholder.
pub fn draw_sprite<P: AssetProvider>(
    target: &mut dyn RenderTarget,
    assets: &mut AssetCache<P>,
    sprite: &Sprite,
    dest: Rect,
) -> bool {
    match assets.image(sprite.image) {
        Some(image) => {
            target.blit(image, sprite.frame, dest);
            true
        }
        None => {
            target.fill_rect(dest, sprite.placeholder);
            false
        }
    }
}
