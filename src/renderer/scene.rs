//! Playfield, HUD and overlays for a running round

use glam::Vec2;

use super::sprites::{JAWS_COLOR, coin_sprite, draw_sprite, frog_sprite, hazard_sprite};
use super::{BLACK, Color, RenderTarget, SELECTED, TextSize, TextStyle, WHITE, rgb, rgba};
use crate::assets::{AssetCache, AssetProvider, paths};
use crate::consts::*;
use crate::row_y;
use crate::session::PauseItem;
use crate::sim::{GamePhase, GameState, Hazard, HazardKind, Jaw, Rect};

const GOAL_ROW_COLOR: Color = rgb(0, 60, 0);
const WATER_COLOR: Color = rgb(20, 40, 140);
const GRASS_COLOR: Color = rgb(90, 60, 120);
const ROAD_COLOR: Color = rgb(30, 30, 30);
const FILLED_SLOT_COLOR: Color = rgb(0, 200, 120);

const TIMER_WIDTH: f32 = 200.0;
const TIMER_HEIGHT: f32 = 15.0;
const TIMER_X: f32 = SCREEN_WIDTH - 220.0;
const TIMER_Y: f32 = 750.0;

/// Timer bar colour: green above half, yellow above a quarter, then a
/// blinking red driven by the tick counter
pub fn timer_color(fraction: f32, time_ticks: u64) -> Color {
    if fraction > 0.5 {
        rgb(0, 255, 0)
    } else if fraction > 0.25 {
        rgb(255, 255, 0)
    } else {
        let ms = (time_ticks as f64 * SIM_DT as f64 * 1000.0) as u64;
        if ms % 500 < 250 {
            rgb(255, 0, 0)
        } else {
            rgb(150, 0, 0)
        }
    }
}

fn playfield_rect() -> Rect {
    Rect::new(MARGIN_X, 0.0, GAME_WIDTH, SCREEN_HEIGHT)
}

fn draw_background<P: AssetProvider>(target: &mut dyn RenderTarget, assets: &mut AssetCache<P>) {
    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    if let Some(map) = assets.image(paths::MAP) {
        target.blit(map, 0, screen);
        return;
    }

    target.fill_rect(screen, BLACK);
    for row in GOAL_ROW..=START_ROW {
        let color = match row {
            GOAL_ROW => GOAL_ROW_COLOR,
            1..=5 => WATER_COLOR,
            MEDIAN_ROW | VERGE_ROW | START_ROW => GRASS_COLOR,
            _ => ROAD_COLOR,
        };
        target.fill_rect(Rect::new(MARGIN_X, row_y(row), GAME_WIDTH, TILE_SIZE), color);
    }
}

/// Draw order: turtles, logs, crocodiles, snakes, cars
fn layer(hazard: &Hazard) -> u8 {
    match hazard.kind {
        HazardKind::Turtle { .. } => 0,
        HazardKind::Log { .. } => 1,
        HazardKind::Crocodile { .. } => 2,
        HazardKind::Snake { .. } => 3,
        HazardKind::Car { .. } => 4,
    }
}

/// Draw the map, slots, hazards, coins and frog, clipped to the playfield
pub fn draw_playfield<P: AssetProvider>(
    state: &GameState,
    assets: &mut AssetCache<P>,
    target: &mut dyn RenderTarget,
) {
    draw_background(target, assets);
    target.set_clip(Some(playfield_rect()));

    let goal = assets.image(paths::GOAL);
    for ((start, end), occupied) in state.slots.iter() {
        let x = (start + end) / 2.0 - 17.0;
        let dest = Rect::new(x, OFFSET_Y + 3.0, 34.0, 34.0);
        match (occupied, goal) {
            (true, Some(image)) => target.blit(image, 0, dest),
            (true, None) => target.fill_rect(dest, FILLED_SLOT_COLOR),
            (false, None) => {
                target.fill_rect(Rect::new(start, OFFSET_Y, end - start, TILE_SIZE), WATER_COLOR)
            }
            (false, Some(_)) => {}
        }
    }

    for pass in 0..=4 {
        for hazard in state.hazards.iter().filter(|h| layer(h) == pass) {
            let Some(sprite) = hazard_sprite(hazard) else {
                continue;
            };
            let drawn = draw_sprite(target, assets, &sprite, hazard.rect);
            if !drawn && hazard.jaw() == Some(Jaw::Open) {
                if let Some(head) = hazard.crocodile_head() {
                    target.fill_rect(head, JAWS_COLOR);
                }
            }
        }
    }

    let coin = coin_sprite();
    for c in &state.coins {
        draw_sprite(target, assets, &coin, c.rect);
    }

    if let Some(sprite) = frog_sprite(&state.frog) {
        draw_sprite(target, assets, &sprite, state.frog.rect);
    }

    target.set_clip(None);
}

/// Timer bar, score, level, lives and phase banners
pub fn draw_hud(state: &GameState, target: &mut dyn RenderTarget) {
    let fraction = (state.time_left / MAX_TIME).max(0.0);
    target.fill_rect(
        Rect::new(TIMER_X - 2.0, TIMER_Y - 2.0, TIMER_WIDTH + 4.0, TIMER_HEIGHT + 4.0),
        rgb(40, 40, 40),
    );
    if fraction > 0.0 {
        target.fill_rect(
            Rect::new(TIMER_X, TIMER_Y, TIMER_WIDTH * fraction, TIMER_HEIGHT),
            timer_color(fraction, state.time_ticks),
        );
    }
    target.draw_text("TIME", Vec2::new(TIMER_X - 70.0, TIMER_Y - 5.0), TextStyle::hud(WHITE));

    target.draw_text(
        &format!("SCORE: {:05}", state.score),
        Vec2::new(16.0, 119.0),
        TextStyle::hud(WHITE),
    );
    target.draw_text(
        &format!("LEVEL: {}", state.level),
        Vec2::new(17.0, 63.0),
        TextStyle::hud(WHITE),
    );
    target.draw_text(
        &format!("LIVES: {}", state.lives),
        Vec2::new(17.0, 175.0),
        TextStyle::hud(rgb(255, 50, 50)),
    );
    if state.god_mode {
        target.draw_text("GOD MODE", Vec2::new(10.0, 250.0), TextStyle::hud(rgb(255, 140, 0)));
    }

    let banner = match state.phase {
        GamePhase::AwaitingStart => Some("PRESS ENTER OR MOVE".to_string()),
        GamePhase::LevelTransition { .. } => Some(format!("LEVEL {} CLEAR!", state.level)),
        _ => None,
    };
    if let Some(text) = banner {
        target.draw_text(
            &text,
            Vec2::new(SCREEN_WIDTH / 2.0, 650.0),
            TextStyle::centered(rgb(255, 255, 0), TextSize::Menu),
        );
    }
}

/// Dimmed screen with the RESUME/MENU choice
pub fn draw_pause_overlay(selected: usize, target: &mut dyn RenderTarget) {
    target.fill_rect(
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
        rgba(0, 0, 0, 0.6),
    );
    target.draw_text(
        "PAUSED",
        Vec2::new(SCREEN_WIDTH / 2.0, 280.0),
        TextStyle::centered(WHITE, TextSize::Big),
    );
    for (i, item) in PauseItem::ALL.iter().enumerate() {
        let (text, color) = if i == selected {
            (format!(">{}<", item.label()), SELECTED)
        } else {
            (item.label().to_string(), WHITE)
        };
        target.draw_text(
            &text,
            Vec2::new(SCREEN_WIDTH / 2.0, 380.0 + i as f32 * 62.0),
            TextStyle::centered(color, TextSize::Menu),
        );
    }
}
