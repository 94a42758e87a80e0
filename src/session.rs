//! Screen shell around the simulation
//!
//! Owns the round state, settings, high score and the storage backend, turns
//! key names into actions, and drives the fixed-step tick while a round is on
//! screen. Persistence failures never interrupt play; they are logged by
//! `Settings` and `HighScore`.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::input::{Action, KeyBindings};
use crate::persistence::Storage;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Longest frame the accumulator accepts, so a stall doesn't fast-forward
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Options,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Start, MenuItem::Options, MenuItem::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "START",
            MenuItem::Options => "OPTIONS",
            MenuItem::Exit => "EXIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionItem {
    Volume,
    Bind(Action),
    Back,
}

impl OptionItem {
    pub const ALL: [OptionItem; 6] = [
        OptionItem::Volume,
        OptionItem::Bind(Action::Up),
        OptionItem::Bind(Action::Down),
        OptionItem::Bind(Action::Left),
        OptionItem::Bind(Action::Right),
        OptionItem::Back,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    Menu,
}

impl PauseItem {
    pub const ALL: [PauseItem; 2] = [PauseItem::Resume, PauseItem::Menu];

    pub fn label(self) -> &'static str {
        match self {
            PauseItem::Resume => "RESUME",
            PauseItem::Menu => "MENU",
        }
    }
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: usize },
    /// `capturing` is set while waiting for the key to bind to the selection
    Options { selected: usize, capturing: bool },
    Playing,
    GameOver { new_record: bool },
}

/// Step a list selection up or down with wrap-around
fn cycle(selected: usize, len: usize, forward: bool) -> usize {
    if forward {
        (selected + 1) % len
    } else {
        (selected + len - 1) % len
    }
}

pub struct Session<S> {
    pub screen: Screen,
    pub settings: Settings,
    pub high_score: HighScore,
    pub state: GameState,
    /// Selection in the pause overlay
    pub pause_selected: usize,
    store: S,
    seed: u64,
    rounds: u64,
    accumulator: f32,
    input: TickInput,
    events: Vec<GameEvent>,
    quit: bool,
}

impl<S: Storage> Session<S> {
    /// Load settings and the high score once, and open on the main menu
    pub fn new(store: S, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        let seed = settings.seed.unwrap_or(seed);
        log::info!("Session starting with seed {}", seed);
        Self {
            screen: Screen::Menu { selected: 0 },
            state: GameState::new(seed),
            settings,
            high_score,
            pause_selected: 0,
            store,
            seed,
            rounds: 0,
            accumulator: 0.0,
            input: TickInput::default(),
            events: Vec::new(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Events produced since the last call, for audio
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Action for a key in menus: the player's bindings, then the defaults,
    /// so menus stay usable after a rebinding
    fn menu_action(&self, key: &str) -> Option<Action> {
        self.settings
            .bindings
            .action_for(key)
            .or_else(|| KeyBindings::default().action_for(key))
    }

    /// Feed one key-down event, identified by key name
    pub fn handle_key(&mut self, key: &str) {
        match self.screen {
            Screen::Options {
                selected,
                capturing: true,
            } => self.capture_binding(selected, key),
            Screen::Playing => {
                if let Some(action) = self.settings.bindings.action_for(key) {
                    self.handle_play_action(action);
                }
            }
            _ => {
                if let Some(action) = self.menu_action(key) {
                    self.handle_menu_action(action);
                }
            }
        }
    }

    fn handle_menu_action(&mut self, action: Action) {
        match self.screen {
            Screen::Menu { selected } => match action {
                Action::Up | Action::Down => {
                    let selected = cycle(selected, MenuItem::ALL.len(), action == Action::Down);
                    self.screen = Screen::Menu { selected };
                }
                Action::Confirm => match MenuItem::ALL[selected] {
                    MenuItem::Start => self.start_round(),
                    MenuItem::Options => {
                        self.screen = Screen::Options {
                            selected: 0,
                            capturing: false,
                        }
                    }
                    MenuItem::Exit => {
                        log::info!("Exit selected");
                        self.quit = true;
                    }
                },
                _ => {}
            },
            Screen::Options { selected, .. } => self.handle_options_action(selected, action),
            Screen::GameOver { .. } => match action {
                Action::Confirm => {
                    self.reset_loop();
                    self.state.restart();
                    self.state.god_mode = self.settings.god_mode;
                    self.screen = Screen::Playing;
                }
                Action::Pause => self.screen = Screen::Menu { selected: 0 },
                _ => {}
            },
            Screen::Playing => {}
        }
    }

    fn handle_options_action(&mut self, selected: usize, action: Action) {
        let item = OptionItem::ALL[selected];
        match action {
            Action::Up | Action::Down => {
                self.screen = Screen::Options {
                    selected: cycle(selected, OptionItem::ALL.len(), action == Action::Down),
                    capturing: false,
                };
            }
            Action::Left | Action::Right if item == OptionItem::Volume => {
                if action == Action::Right {
                    self.settings.volume_up();
                } else {
                    self.settings.volume_down();
                }
                self.settings.save(&mut self.store);
            }
            Action::Confirm => match item {
                OptionItem::Back => self.screen = Screen::Menu { selected: 0 },
                OptionItem::Bind(_) => {
                    self.screen = Screen::Options {
                        selected,
                        capturing: true,
                    }
                }
                OptionItem::Volume => {}
            },
            Action::Pause => self.screen = Screen::Menu { selected: 0 },
            _ => {}
        }
    }

    fn capture_binding(&mut self, selected: usize, key: &str) {
        if let OptionItem::Bind(action) = OptionItem::ALL[selected] {
            self.settings.bindings.rebind(action, key);
            self.settings.save(&mut self.store);
        }
        self.screen = Screen::Options {
            selected,
            capturing: false,
        };
    }

    fn handle_play_action(&mut self, action: Action) {
        if self.state.paused {
            self.handle_pause_action(action);
            return;
        }
        match action {
            Action::Pause => {
                self.pause_selected = 0;
                self.input.pause = true;
            }
            Action::Confirm => self.input.start = true,
            Action::ToggleGod => self.input.toggle_god = true,
            Action::GrantLife => self.input.grant_life = true,
            _ => {
                if let Some(facing) = action.facing() {
                    self.input.moves.push(facing);
                }
            }
        }
    }

    /// Only the pause overlay navigates while paused
    fn handle_pause_action(&mut self, action: Action) {
        match action {
            Action::Up | Action::Down => {
                self.pause_selected =
                    cycle(self.pause_selected, PauseItem::ALL.len(), action == Action::Down);
            }
            Action::Pause => self.input.pause = true,
            Action::Confirm => match PauseItem::ALL[self.pause_selected] {
                PauseItem::Resume => self.input.pause = true,
                PauseItem::Menu => {
                    log::info!("Round abandoned at score {}", self.state.score);
                    self.state.paused = false;
                    self.reset_loop();
                    self.screen = Screen::Menu { selected: 0 };
                }
            },
            _ => {}
        }
    }

    /// Fresh round waiting for the first input
    fn start_round(&mut self) {
        self.rounds += 1;
        let seed = self.seed.wrapping_add(self.rounds);
        self.state = GameState::new(seed);
        self.state.god_mode = self.settings.god_mode;
        self.reset_loop();
        self.screen = Screen::Playing;
    }

    fn reset_loop(&mut self) {
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.pause_selected = 0;
    }

    /// Advance by one rendered frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.screen != Screen::Playing {
            return;
        }
        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs apply to a single tick
            self.input = TickInput::default();
        }
        self.events.extend(self.state.drain_events());

        if self.state.phase == GamePhase::GameOver {
            self.finish_round();
        }
    }

    fn finish_round(&mut self) {
        let new_record = self.high_score.submit(self.state.score);
        if new_record {
            self.high_score.save(&mut self.store);
        }
        self.reset_loop();
        self.screen = Screen::GameOver { new_record };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Facing, FrogState};

    fn session() -> Session<MemoryStore> {
        Session::new(MemoryStore::default(), 42)
    }

    fn press(session: &mut Session<MemoryStore>, keys: &[&str]) {
        for key in keys {
            session.handle_key(key);
        }
    }

    #[test]
    fn test_menu_wraps_and_starts() {
        let mut s = session();
        press(&mut s, &["up"]);
        assert_eq!(s.screen, Screen::Menu { selected: 2 });
        press(&mut s, &["down", "enter"]);
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.state.phase, GamePhase::AwaitingStart);
    }

    #[test]
    fn test_exit() {
        let mut s = session();
        press(&mut s, &["down", "down", "enter"]);
        assert!(s.should_quit());
    }

    #[test]
    fn test_options_volume_saves() {
        let mut s = session();
        press(&mut s, &["down", "enter"]);
        assert_eq!(s.screen, Screen::Options { selected: 0, capturing: false });
        press(&mut s, &["right"]);
        assert_eq!(s.settings.volume_percent(), 60);
        let saved = s.store().config.clone().expect("saved on change");
        assert_eq!(saved.volume_percent(), 60);
    }

    #[test]
    fn test_options_rebind_captures_next_key() {
        let mut s = session();
        press(&mut s, &["down", "enter", "down", "enter"]);
        assert_eq!(s.screen, Screen::Options { selected: 1, capturing: true });
        press(&mut s, &["w"]);
        assert_eq!(s.screen, Screen::Options { selected: 1, capturing: false });
        assert_eq!(s.settings.bindings.key_for(Action::Up), "w");
        assert!(s.store().config.is_some());

        // Back to the menu and into a round; "w" now hops
        press(&mut s, &["esc", "enter", "w"]);
        assert_eq!(s.screen, Screen::Playing);
        s.update(SIM_DT);
        assert_eq!(s.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_first_move_starts_and_hops() {
        let mut s = session();
        press(&mut s, &["enter"]);
        s.update(SIM_DT);
        assert_eq!(s.state.phase, GamePhase::AwaitingStart);

        press(&mut s, &["up"]);
        s.update(SIM_DT);
        assert_eq!(s.state.phase, GamePhase::Playing);
        press(&mut s, &["up"]);
        s.update(SIM_DT);
        assert!(s.drain_events().contains(&GameEvent::Hop));
        assert_eq!(s.state.frog.facing, Facing::Up);
    }

    #[test]
    fn test_one_shot_inputs_apply_once() {
        let mut s = session();
        press(&mut s, &["enter", "enter"]);
        s.update(SIM_DT);
        press(&mut s, &["g"]);
        s.update(4.0 * SIM_DT);
        assert!(s.state.god_mode);
    }

    #[test]
    fn test_pause_overlay_to_menu() {
        let mut s = session();
        press(&mut s, &["enter", "enter"]);
        s.update(SIM_DT);
        press(&mut s, &["esc"]);
        s.update(SIM_DT);
        assert!(s.state.paused);

        // Moves navigate the overlay instead of hopping
        press(&mut s, &["down"]);
        assert_eq!(s.pause_selected, 1);
        s.update(SIM_DT);
        assert_eq!(s.state.frog.state, FrogState::Alive);
        press(&mut s, &["enter"]);
        assert_eq!(s.screen, Screen::Menu { selected: 0 });
    }

    #[test]
    fn test_pause_resume() {
        let mut s = session();
        press(&mut s, &["enter", "enter"]);
        s.update(SIM_DT);
        press(&mut s, &["esc"]);
        s.update(SIM_DT);
        press(&mut s, &["enter"]);
        s.update(SIM_DT);
        assert!(!s.state.paused);
        assert_eq!(s.screen, Screen::Playing);
    }

    #[test]
    fn test_game_over_saves_record_and_restarts() {
        let mut s = session();
        press(&mut s, &["enter"]);
        s.state.score = 750;
        s.state.phase = GamePhase::GameOverTransition { remaining: SIM_DT / 2.0 };
        s.update(SIM_DT);
        assert_eq!(s.screen, Screen::GameOver { new_record: true });
        assert_eq!(s.high_score.best, 750);
        assert_eq!(s.store().high_score, Some(750));
        assert!(s.drain_events().contains(&GameEvent::GameOver { score: 750 }));

        press(&mut s, &["enter"]);
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.state.phase, GamePhase::Playing);
        assert_eq!(s.state.score, 0);
    }

    #[test]
    fn test_game_over_without_record_and_back_to_menu() {
        let mut store = MemoryStore::default();
        store.high_score = Some(5000);
        let mut s = Session::new(store, 1);
        assert_eq!(s.high_score.best, 5000);
        press(&mut s, &["enter"]);
        s.state.score = 10;
        s.state.phase = GamePhase::GameOverTransition { remaining: SIM_DT / 2.0 };
        s.update(SIM_DT);
        assert_eq!(s.screen, Screen::GameOver { new_record: false });
        assert_eq!(s.store().high_score, Some(5000));
        press(&mut s, &["esc"]);
        assert_eq!(s.screen, Screen::Menu { selected: 0 });
    }
}
