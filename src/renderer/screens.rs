//! Menu, options and game-over screens, and the per-screen dispatcher

use glam::Vec2;

use super::scene::{draw_hud, draw_pause_overlay, draw_playfield};
use super::{BLACK, CAPTURING, Color, RenderTarget, SELECTED, TextSize, TextStyle, WHITE, rgb};
use crate::assets::{AssetCache, AssetProvider, paths};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::highscores::HighScore;
use crate::input::Action;
use crate::session::{MenuItem, OptionItem, Screen, Session};
use crate::settings::Settings;
use crate::sim::Rect;

const MENU_SPACING: f32 = 62.0;

fn screen_rect() -> Rect {
    Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT)
}

/// Full-screen background image, or black
fn backdrop<P: AssetProvider>(
    image: &str,
    assets: &mut AssetCache<P>,
    target: &mut dyn RenderTarget,
) {
    match assets.image(image) {
        Some(id) => target.blit(id, 0, screen_rect()),
        None => target.fill_rect(screen_rect(), BLACK),
    }
}

fn menu_line(target: &mut dyn RenderTarget, text: &str, index: usize, start_y: f32, color: Color) {
    target.draw_text(
        text,
        Vec2::new(SCREEN_WIDTH / 2.0, start_y + index as f32 * MENU_SPACING),
        TextStyle::centered(color, TextSize::Menu),
    );
}

pub fn draw_menu<P: AssetProvider>(
    selected: usize,
    assets: &mut AssetCache<P>,
    target: &mut dyn RenderTarget,
) {
    backdrop(paths::MENU, assets, target);
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        if i == selected {
            menu_line(target, &format!(">{}<", item.label()), i, 350.0, SELECTED);
        } else {
            menu_line(target, item.label(), i, 350.0, WHITE);
        }
    }
}

pub fn draw_options<P: AssetProvider>(
    selected: usize,
    capturing: bool,
    settings: &Settings,
    assets: &mut AssetCache<P>,
    target: &mut dyn RenderTarget,
) {
    backdrop(paths::OPTIONS, assets, target);
    for (i, item) in OptionItem::ALL.iter().enumerate() {
        let is_selected = i == selected;
        let text = match *item {
            OptionItem::Volume => {
                let pct = settings.volume_percent();
                if is_selected {
                    format!("> VOLUME: < {}% > <", pct)
                } else {
                    format!("VOLUME: {}%", pct)
                }
            }
            OptionItem::Back if is_selected => "> BACK TO MENU <".to_string(),
            OptionItem::Back => "BACK TO MENU".to_string(),
            OptionItem::Bind(action) => {
                let key = settings.bindings.key_for(action).to_uppercase();
                match (is_selected, capturing) {
                    (true, true) => format!("{}: [ PRESS NEW KEY ]", action.as_str()),
                    (true, false) => format!(">{}: {}<", action.as_str(), key),
                    _ => format!("{}: {}", action.as_str(), key),
                }
            }
        };
        let color = match (is_selected, capturing) {
            (true, true) => CAPTURING,
            (true, false) => SELECTED,
            _ => WHITE,
        };
        menu_line(target, &text, i, 200.0, color);
    }
}

pub fn draw_game_over(
    score: u64,
    high_score: &HighScore,
    new_record: bool,
    settings: &Settings,
    target: &mut dyn RenderTarget,
) {
    let center = SCREEN_WIDTH / 2.0;
    target.fill_rect(screen_rect(), BLACK);
    target.draw_text(
        "GAME OVER",
        Vec2::new(center, 350.0),
        TextStyle::centered(rgb(255, 0, 0), TextSize::Big),
    );
    target.draw_text(
        &format!("FINAL SCORE: {}", score),
        Vec2::new(center, 450.0),
        TextStyle::centered(WHITE, TextSize::Ui),
    );
    target.draw_text(
        &format!("HIGH SCORE: {}", high_score.best),
        Vec2::new(center, 490.0),
        TextStyle::centered(WHITE, TextSize::Ui),
    );
    if new_record {
        target.draw_text(
            "NEW HIGH SCORE!",
            Vec2::new(center, 530.0),
            TextStyle::centered(CAPTURING, TextSize::Ui),
        );
    }
    let hint = format!(
        "{}: PLAY AGAIN   {}: MENU",
        settings.bindings.key_for(Action::Confirm).to_uppercase(),
        settings.bindings.key_for(Action::Pause).to_uppercase()
    );
    target.draw_text(&hint, Vec2::new(center, 620.0), TextStyle::centered(WHITE, TextSize::Ui));
}

/// Draw whatever the session is showing
pub fn draw_session<S, P: AssetProvider>(
    session: &Session<S>,
    assets: &mut AssetCache<P>,
    target: &mut dyn RenderTarget,
) {
    match session.screen {
        Screen::Menu { selected } => draw_menu(selected, assets, target),
        Screen::Options {
            selected,
            capturing,
        } => draw_options(selected, capturing, &session.settings, assets, target),
        Screen::Playing => {
            draw_playfield(&session.state, assets, target);
            draw_hud(&session.state, target);
            if session.state.paused {
                draw_pause_overlay(session.pause_selected, target);
            }
        }
        Screen::GameOver { new_record } => draw_game_over(
            session.state.score,
            &session.high_score,
            new_record,
            &session.settings,
            target,
        ),
    }
}
