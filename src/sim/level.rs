//! Level layout: road traffic, river platforms and snakes
//!
//! Rows are fixed; speeds scale with the difficulty multiplier. The only
//! randomness is which lane-3 slot becomes a crocodile and which lane-1 log
//! carries a snake.

use rand::Rng;

use super::entity::{Hazard, RIDING_SNAKE_OFFSET, SnakeMode, per_frame_to_per_sec};
use crate::consts::*;
use crate::row_y;

/// One road row: tile row, base speed (px/frame), car sprite, width, x offsets
struct TrafficRow {
    row: i32,
    speed: f32,
    sprite: u8,
    width: f32,
    xs: &'static [f32],
}

const TRAFFIC: [TrafficRow; 6] = [
    TrafficRow { row: 7, speed: -2.2, sprite: 0, width: 45.0, xs: &[100.0, 350.0, 550.0] },
    TrafficRow { row: 8, speed: 1.6, sprite: 1, width: 40.0, xs: &[50.0, 400.0] },
    TrafficRow { row: 9, speed: -1.8, sprite: 2, width: 40.0, xs: &[150.0, 210.0, 270.0] },
    TrafficRow { row: 10, speed: 1.3, sprite: 3, width: 55.0, xs: &[0.0, 350.0] },
    TrafficRow { row: 11, speed: -1.5, sprite: 1, width: 40.0, xs: &[0.0, 160.0, 320.0, 480.0] },
    TrafficRow { row: 12, speed: 1.9, sprite: 2, width: 40.0, xs: &[20.0, 280.0, 520.0] },
];

/// River lanes counted upward from the median: lane 1 is tile row 5
pub fn river_lane_row(lane: i32) -> i32 {
    MEDIAN_ROW - lane
}

/// Level at which crocodiles replace one lane-3 log
pub const CROCODILE_FROM_LEVEL: u32 = 2;
/// Level at which the median snake appears
pub const MEDIAN_SNAKE_FROM_LEVEL: u32 = 2;
/// Level at which the verge snake appears
pub const VERGE_SNAKE_FROM_LEVEL: u32 = 3;
/// Level at which a snake rides a lane-1 log
pub const RIDING_SNAKE_FROM_LEVEL: u32 = 4;

/// Build every hazard and platform for a level.
///
/// Ids are unique within the returned set and start at 1. The caller
/// replaces its whole hazard set with the result.
pub fn build_level<R: Rng>(level: u32, difficulty: f32, rng: &mut R) -> Vec<Hazard> {
    let m = difficulty;
    let speed = |base: f32| per_frame_to_per_sec(base * m);
    let mut hazards = Vec::with_capacity(48);
    let mut next_id = 1u32;
    let mut id = || {
        let v = next_id;
        next_id += 1;
        v
    };

    for lane in &TRAFFIC {
        let y = row_y(lane.row);
        for &x in lane.xs {
            hazards.push(Hazard::car(
                id(),
                MARGIN_X + x,
                y,
                lane.width,
                speed(lane.speed),
                lane.sprite,
            ));
        }
    }

    // Lane 1: short logs, one may carry a snake later
    let y = row_y(river_lane_row(1));
    let mut lane1_logs = Vec::with_capacity(4);
    for i in 0..4 {
        let log = Hazard::log(id(), MARGIN_X + i as f32 * 160.0, y, 95.0, speed(-1.2), 2);
        lane1_logs.push(hazards.len());
        hazards.push(log);
    }

    // Lane 2: pairs of turtles, groups dive out of step
    let y = row_y(river_lane_row(2));
    for g in 0..3 {
        for i in 0..2 {
            hazards.push(Hazard::turtle(
                id(),
                MARGIN_X + g as f32 * 220.0 + i as f32 * 46.0,
                y,
                speed(2.0),
                g as f32 * 6.0,
            ));
        }
    }

    // Lane 3: long logs, one swapped for a crocodile from level 2
    let y = row_y(river_lane_row(3));
    let croc_slot = if level >= CROCODILE_FROM_LEVEL {
        Some(rng.random_range(0..3usize))
    } else {
        None
    };
    for (i, x) in [0.0, 220.0, 440.0].into_iter().enumerate() {
        if croc_slot == Some(i) {
            hazards.push(Hazard::crocodile(id(), MARGIN_X + x, y, speed(-1.8)));
        } else {
            hazards.push(Hazard::log(id(), MARGIN_X + x, y, 180.0, speed(-1.8), 3));
        }
    }

    // Lane 4: triples of turtles
    let y = row_y(river_lane_row(4));
    for g in 0..3 {
        for i in 0..3 {
            hazards.push(Hazard::turtle(
                id(),
                MARGIN_X + g as f32 * 210.0 + i as f32 * 46.0,
                y,
                speed(1.5),
                g as f32 * 5.0,
            ));
        }
    }

    // Lane 5: fast medium logs
    let y = row_y(river_lane_row(5));
    for i in 0..3 {
        hazards.push(Hazard::log(id(), MARGIN_X + i as f32 * 250.0, y, 120.0, speed(-2.2), 1));
    }

    if level >= MEDIAN_SNAKE_FROM_LEVEL {
        hazards.push(Hazard::snake(
            id(),
            MARGIN_X + 100.0,
            row_y(MEDIAN_ROW),
            speed(2.0),
            SnakeMode::Roaming,
        ));
    }
    if level >= VERGE_SNAKE_FROM_LEVEL {
        hazards.push(Hazard::snake(
            id(),
            MARGIN_X + 400.0,
            row_y(VERGE_ROW),
            speed(2.0),
            SnakeMode::Roaming,
        ));
    }
    if level >= RIDING_SNAKE_FROM_LEVEL && !lane1_logs.is_empty() {
        let host = &hazards[lane1_logs[rng.random_range(0..lane1_logs.len())]];
        let (host_id, host_x, host_speed) = (host.id, host.rect.x, host.speed);
        hazards.push(Hazard::snake(
            id(),
            host_x + RIDING_SNAKE_OFFSET,
            row_y(river_lane_row(1)),
            host_speed,
            SnakeMode::Riding {
                log_id: host_id,
                offset: RIDING_SNAKE_OFFSET,
            },
        ));
    }

    log::debug!(
        "Built level {} (difficulty {:.2}): {} hazards",
        level,
        difficulty,
        hazards.len()
    );
    hazards
}
