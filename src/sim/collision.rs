//! Collision and carry resolution for the frog
//!
//! Evaluated once per frame while the frog is alive. The order is fixed:
//! traffic and snakes first, then (inside the river band only) logs,
//! turtles and crocodiles, first hit wins. Landing on nothing in the river
//! means drowning.

use super::entity::{Hazard, HazardKind, Jaw};
use super::rect::Rect;
use crate::consts::*;

/// Why the frog died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Traffic,
    Snake,
    /// Stood on a turtle as it dived
    Submerged,
    /// Touched an open crocodile head
    Jaws,
    Drowned,
    OutOfTime,
}

/// Outcome of resolving one frame of contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Nothing happens (dry land, or god mode over open water)
    Clear,
    Death(DeathCause),
    /// Riding a platform moving at `speed` px/s
    Carried { speed: f32 },
}

/// Is a y coordinate inside the river (tile rows 1-5)?
#[inline]
pub fn in_river_band(y: f32) -> bool {
    let top = OFFSET_Y + TILE_SIZE;
    let bottom = OFFSET_Y + 6.0 * TILE_SIZE;
    (top..bottom).contains(&y)
}

/// Resolve the frog's contact with the hazard set.
///
/// God mode suppresses every death but still applies platform carry.
pub fn resolve(frog: &Rect, hazards: &[Hazard], god_mode: bool) -> Contact {
    if !god_mode {
        for hazard in hazards {
            if !frog.overlaps(&hazard.hitbox()) {
                continue;
            }
            match hazard.kind {
                HazardKind::Car { .. } => return Contact::Death(DeathCause::Traffic),
                HazardKind::Snake { .. } => return Contact::Death(DeathCause::Snake),
                _ => {}
            }
        }
    }

    if !in_river_band(frog.center_y()) {
        return Contact::Clear;
    }

    match find_platform(frog, hazards) {
        Some(platform) => ride(frog, platform, god_mode),
        None if god_mode => Contact::Clear,
        None => Contact::Death(DeathCause::Drowned),
    }
}

/// First overlapping platform in priority order: logs, turtles, crocodiles
fn find_platform<'a>(frog: &Rect, hazards: &'a [Hazard]) -> Option<&'a Hazard> {
    let overlapping = |pred: fn(&HazardKind) -> bool| {
        hazards
            .iter()
            .find(|h| pred(&h.kind) && frog.overlaps(&h.hitbox()))
    };
    overlapping(|k| matches!(k, HazardKind::Log { .. }))
        .or_else(|| overlapping(|k| matches!(k, HazardKind::Turtle { .. })))
        .or_else(|| overlapping(|k| matches!(k, HazardKind::Crocodile { .. })))
}

/// Contact with the platform the frog landed on
fn ride(frog: &Rect, platform: &Hazard, god_mode: bool) -> Contact {
    let carried = Contact::Carried {
        speed: platform.speed,
    };
    match platform.kind {
        HazardKind::Turtle { .. } if platform.is_submerged() => {
            if god_mode {
                carried
            } else {
                Contact::Death(DeathCause::Submerged)
            }
        }
        HazardKind::Crocodile { jaw: Jaw::Open, .. } => {
            let bitten = platform
                .crocodile_head()
                .is_some_and(|head| frog.overlaps(&head));
            if bitten && !god_mode {
                Contact::Death(DeathCause::Jaws)
            } else {
                carried
            }
        }
        _ => carried,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row_y;
    use crate::sim::entity::{Frog, SnakeMode};

    /// Frog hitbox centred on a point
    fn frog_at(cx: f32, cy: f32) -> Rect {
        Rect::from_center(glam::Vec2::new(cx, cy), 14.0, 14.0)
    }

    fn open_croc(x: f32, speed: f32) -> Hazard {
        let mut croc = Hazard::crocodile(1, x, row_y(3), speed);
        croc.kind = HazardKind::Crocodile {
            timer: 1.0,
            jaw: Jaw::Open,
        };
        croc
    }

    #[test]
    fn test_river_band_bounds() {
        assert!(!in_river_band(row_y(1) - 0.1));
        assert!(in_river_band(row_y(1)));
        assert!(in_river_band(row_y(5) + 39.0));
        assert!(!in_river_band(row_y(6)));
    }

    #[test]
    fn test_car_kills() {
        let car = Hazard::car(1, 400.0, row_y(8), 40.0, 60.0, 0);
        let frog = frog_at(car.rect.center_x(), car.rect.center_y());
        assert_eq!(
            resolve(&frog, &[car.clone()], false),
            Contact::Death(DeathCause::Traffic)
        );
        assert_eq!(resolve(&frog, &[car], true), Contact::Clear);
    }

    #[test]
    fn test_riding_snake_kills_even_on_log() {
        let log = Hazard::log(1, 300.0, row_y(5), 95.0, -72.0, 2);
        let snake = Hazard::snake(
            2,
            310.0,
            row_y(5),
            -72.0,
            SnakeMode::Riding {
                log_id: 1,
                offset: 10.0,
            },
        );
        let frog = frog_at(340.0, snake.rect.center_y());
        assert_eq!(
            resolve(&frog, &[log, snake], false),
            Contact::Death(DeathCause::Snake)
        );
    }

    #[test]
    fn test_log_carries() {
        let log = Hazard::log(1, 300.0, row_y(5), 95.0, -72.0, 2);
        let frog = frog_at(340.0, row_y(5) + 20.0);
        assert_eq!(resolve(&frog, &[log], false), Contact::Carried { speed: -72.0 });
    }

    #[test]
    fn test_open_water_drowns_unless_god_mode() {
        let frog = frog_at(400.0, row_y(2) + 20.0);
        assert_eq!(resolve(&frog, &[], false), Contact::Death(DeathCause::Drowned));
        assert_eq!(resolve(&frog, &[], true), Contact::Clear);
    }

    #[test]
    fn test_dry_land_is_clear() {
        let frog = Frog::spawn().hitbox();
        assert_eq!(resolve(&frog, &[], false), Contact::Clear);
    }

    #[test]
    fn test_submerged_turtle_kills() {
        let dived = Hazard::turtle(1, 300.0, row_y(4), 90.0, 6.0);
        assert!(dived.is_submerged());
        let frog = frog_at(dived.rect.center_x(), dived.rect.center_y());
        assert_eq!(
            resolve(&frog, &[dived.clone()], false),
            Contact::Death(DeathCause::Submerged)
        );
        assert_eq!(resolve(&frog, &[dived], true), Contact::Carried { speed: 90.0 });
    }

    #[test]
    fn test_surfaced_turtle_carries() {
        let turtle = Hazard::turtle(1, 300.0, row_y(4), 90.0, 0.0);
        let frog = frog_at(turtle.rect.center_x(), turtle.rect.center_y());
        assert_eq!(resolve(&frog, &[turtle], false), Contact::Carried { speed: 90.0 });
    }

    #[test]
    fn test_log_has_priority_over_dived_turtle() {
        let turtle = Hazard::turtle(1, 300.0, row_y(4), 90.0, 6.0);
        let log = Hazard::log(2, 310.0, row_y(4), 95.0, -50.0, 2);
        let frog = frog_at(320.0, row_y(4) + 20.0);
        assert_eq!(
            resolve(&frog, &[turtle, log], false),
            Contact::Carried { speed: -50.0 }
        );
    }

    #[test]
    fn test_open_crocodile_head_bites() {
        // Moving left: head is the leftmost 40 px
        let croc = open_croc(300.0, -108.0);
        let frog = frog_at(325.0, row_y(3) + 20.0);
        assert_eq!(
            resolve(&frog, &[croc.clone()], false),
            Contact::Death(DeathCause::Jaws)
        );
        assert_eq!(resolve(&frog, &[croc], true), Contact::Carried { speed: -108.0 });
    }

    #[test]
    fn test_open_crocodile_body_carries() {
        let croc = open_croc(300.0, -108.0);
        let frog = frog_at(380.0, row_y(3) + 20.0);
        assert_eq!(resolve(&frog, &[croc], false), Contact::Carried { speed: -108.0 });
    }

    #[test]
    fn test_closed_crocodile_head_is_safe() {
        let croc = Hazard::crocodile(1, 300.0, row_y(3), -108.0);
        let frog = frog_at(325.0, row_y(3) + 20.0);
        assert_eq!(resolve(&frog, &[croc], false), Contact::Carried { speed: -108.0 });
    }
}
