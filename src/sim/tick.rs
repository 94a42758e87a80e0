//! Per-frame simulation step
//!
//! Core game loop that advances the round: hops, contact resolution, the
//! countdown timer, lane movement, coins and the deferred transitions.

use rand::Rng;

use super::collision::{Contact, DeathCause, resolve};
use super::entity::{Coin, Facing, FrogState, Hazard, HazardKind, Hop, SnakeMode};
use super::state::{COIN_INTERVAL, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Most coins on the field at once
pub const MAX_COINS: usize = 3;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Hop requests in key-down order
    pub moves: Vec<Facing>,
    /// Confirm pressed (starts a waiting round)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Debug: toggle invulnerability
    pub toggle_god: bool,
    /// Debug: add a life
    pub grant_life: bool,
}

/// Advance the round by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.time_ticks += 1;

    if input.toggle_god {
        state.god_mode = !state.god_mode;
        log::info!("God mode {}", if state.god_mode { "on" } else { "off" });
    }
    if input.grant_life {
        state.grant_life();
    }
    if input.pause && state.phase != GamePhase::AwaitingStart {
        state.paused = !state.paused;
        log::debug!("Paused: {}", state.paused);
    }

    // Deferred transitions block the simulation but keep counting down,
    // paused or not
    if let Some(remaining) = state.phase.remaining() {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            finish_transition(state);
        } else {
            set_remaining(&mut state.phase, remaining);
        }
        return;
    }

    if state.paused {
        return;
    }

    match state.phase {
        GamePhase::AwaitingStart => {
            advance_hazards(&mut state.hazards, dt);
            if input.start || !input.moves.is_empty() {
                log::info!("Round started (seed {})", state.seed);
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Playing => step_playing(state, input, dt),
        _ => {}
    }
}

/// Perform a pending transition's effect now instead of waiting it out
pub fn skip_transition(state: &mut GameState) {
    if state.phase.remaining().is_some() {
        finish_transition(state);
    }
}

fn set_remaining(phase: &mut GamePhase, value: f32) {
    match phase {
        GamePhase::GoalTransition { remaining }
        | GamePhase::LevelTransition { remaining }
        | GamePhase::GameOverTransition { remaining } => *remaining = value,
        _ => {}
    }
}

fn finish_transition(state: &mut GameState) {
    match state.phase {
        GamePhase::GoalTransition { .. } => {
            state.spawn_frog();
            state.phase = GamePhase::Playing;
        }
        GamePhase::LevelTransition { .. } => {
            state.level += 1;
            if state.lives < MAX_LIVES {
                state.lives += 1;
            }
            state.difficulty += DIFFICULTY_STEP;
            state.slots.clear();
            state.rebuild_level();
            state.phase = GamePhase::Playing;
        }
        GamePhase::GameOverTransition { .. } => {
            log::info!("Game over at level {} with {} points", state.level, state.score);
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver { score: state.score });
        }
        _ => {}
    }
}

fn step_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    for &facing in &input.moves {
        handle_hop(state, facing);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    if state.frog.is_alive() {
        if !state.god_mode {
            state.time_left -= dt;
            if state.time_left <= 0.0 {
                state.time_left = 0.0;
                state.kill_frog(DeathCause::OutOfTime);
                return;
            }
        }

        match resolve(&state.frog.hitbox(), &state.hazards, state.god_mode) {
            Contact::Death(cause) => {
                state.kill_frog(cause);
                return;
            }
            Contact::Carried { speed } => state.frog.rect.x += speed * dt,
            Contact::Clear => {}
        }

        collect_coins(state);
    }

    if state.frog.finished {
        if state.lives == 0 {
            state.phase = GamePhase::GameOverTransition {
                remaining: GAME_OVER_DELAY,
            };
        } else {
            state.spawn_frog();
        }
        return;
    }

    state.frog.animate(dt);
    advance_hazards(&mut state.hazards, dt);
    update_coins(state, dt);
}

fn handle_hop(state: &mut GameState, facing: Facing) {
    match state.frog.hop(facing, state.slots.ranges()) {
        Hop::Blocked => {}
        Hop::Moved => {
            state.events.push(GameEvent::Hop);
            if facing == Facing::Up {
                award_row_advance(state);
            }
        }
        Hop::Slot(index) if state.slots.is_occupied(index) => {
            // Bounce back down; nothing else changes
            state.frog.rect.y += TILE_SIZE;
        }
        Hop::Slot(index) => {
            state.events.push(GameEvent::Hop);
            award_row_advance(state);
            reach_goal(state, index);
        }
    }
}

/// Small bonus the first time each row is reached by this frog
fn award_row_advance(state: &mut GameState) {
    let row = state.frog.row();
    if row < state.max_row_reached {
        state.max_row_reached = row;
        state.add_score(ROW_ADVANCE_POINTS);
    }
}

fn reach_goal(state: &mut GameState, index: usize) {
    state.slots.occupy(index);
    state.add_score(GOAL_POINTS);
    state.frog.state = FrogState::Safe;
    state.events.push(GameEvent::GoalReached(index));
    log::debug!("Slot {} filled ({}/{})", index, state.slots.occupied_count(), SLOT_COUNT);

    if state.slots.all_occupied() {
        state.add_score(LEVEL_CLEAR_POINTS);
        state.events.push(GameEvent::LevelCleared);
        log::info!("Level {} cleared, score {}", state.level, state.score);
        state.phase = GamePhase::LevelTransition {
            remaining: LEVEL_DELAY,
        };
    } else {
        state.phase = GamePhase::GoalTransition {
            remaining: GOAL_DELAY,
        };
    }
}

/// Move every hazard one step, then pin riding snakes to their host logs
pub fn advance_hazards(hazards: &mut [Hazard], dt: f32) {
    for hazard in hazards.iter_mut() {
        hazard.advance(dt);
    }

    for i in 0..hazards.len() {
        let HazardKind::Snake {
            mode: SnakeMode::Riding { log_id, offset },
        } = hazards[i].kind
        else {
            continue;
        };
        let host = hazards
            .iter()
            .find(|h| h.id == log_id && h.is_log())
            .map(|h| (h.rect.x, h.speed));
        let snake = &mut hazards[i];
        match host {
            Some((x, speed)) => {
                snake.rect.x = x + offset;
                snake.speed = speed;
            }
            None => {
                log::warn!("Snake {} lost host log {}, roaming", snake.id, log_id);
                snake.kind = HazardKind::Snake {
                    mode: SnakeMode::Roaming,
                };
            }
        }
    }
}

fn collect_coins(state: &mut GameState) {
    let hitbox = state.frog.hitbox();
    let before = state.coins.len();
    state.coins.retain(|coin| !coin.rect.overlaps(&hitbox));
    for _ in state.coins.len()..before {
        state.add_score(COIN_POINTS);
        state.events.push(GameEvent::CoinCollected);
    }
}

fn update_coins(state: &mut GameState, dt: f32) {
    let hazards = &state.hazards;
    state.coins.retain_mut(|coin| {
        coin.age += dt;
        if coin.expired() {
            return false;
        }
        if let Some((host, offset)) = coin.rider {
            match hazards.iter().find(|h| h.id == host) {
                Some(platform) => coin.rect.x = platform.rect.x + offset,
                None => return false,
            }
        }
        true
    });

    if !state.frog.is_alive() {
        return;
    }
    state.coin_timer -= dt;
    if state.coin_timer <= 0.0 {
        if state.coins.len() < MAX_COINS {
            spawn_coin(state);
        }
        state.coin_timer = state.rng().random_range(COIN_INTERVAL);
    }
}

/// Drop a coin on a random river platform or a random land tile
fn spawn_coin(state: &mut GameState) {
    let in_water = state.rng().random_bool(0.5);
    let platforms: Vec<usize> = state
        .hazards
        .iter()
        .enumerate()
        .filter(|(_, h)| h.is_platform())
        .map(|(i, _)| i)
        .collect();

    let coin = if in_water && !platforms.is_empty() {
        let pick = platforms[state.rng().random_range(0..platforms.len())];
        Coin::on_platform(&state.hazards[pick])
    } else {
        let row = state.rng().random_range(MEDIAN_ROW..=VERGE_ROW);
        let col = state.rng().random_range(0..(GAME_WIDTH / TILE_SIZE) as i32);
        Coin::on_tile(row, col)
    };
    log::debug!("Coin spawned at ({:.0}, {:.0})", coin.rect.x, coin.rect.y);
    state.coins.push(coin);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row_y;
    use crate::sim::entity::Frog;
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    fn hop(facing: Facing) -> TickInput {
        TickInput {
            moves: vec![facing],
            ..Default::default()
        }
    }

    /// Put the frog on `row` with its centre at `cx`
    fn place_frog(state: &mut GameState, row: i32, cx: f32) {
        state.frog.rect.y = row_y(row) + 2.0;
        state.frog.rect.set_center_x(cx);
    }

    fn slot_center(state: &GameState, i: usize) -> f32 {
        let (s, e) = state.slots.ranges()[i];
        (s + e) / 2.0
    }

    fn finish_death(state: &mut GameState) {
        for _ in 0..200 {
            tick(state, &TickInput::default(), SIM_DT);
            if state.frog.is_alive() || state.phase != GamePhase::Playing {
                return;
            }
        }
        panic!("death animation never finished");
    }

    #[test]
    fn test_tick_awaiting_to_playing() {
        let mut state = GameState::new(12345);
        let before: Vec<f32> = state.hazards.iter().map(|h| h.rect.x).collect();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::AwaitingStart);
        assert_eq!(state.time_left, MAX_TIME);
        // Lanes animate while waiting
        let after: Vec<f32> = state.hazards.iter().map(|h| h.rect.x).collect();
        assert_ne!(before, after);

        tick(&mut state, &TickInput { start: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_timer_expiry_kills() {
        let mut state = playing(1);
        state.hazards.clear();
        state.time_left = SIM_DT;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.frog.state, FrogState::Dying);
        assert_eq!(state.lives, START_LIVES - 1);
        assert!(state.events.contains(&GameEvent::Died(DeathCause::OutOfTime)));
    }

    #[test]
    fn test_timer_frozen_in_god_mode() {
        let mut state = playing(1);
        state.hazards.clear();
        state.god_mode = true;
        state.time_left = SIM_DT;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.frog.is_alive());
        assert_eq!(state.time_left, SIM_DT);
    }

    #[test]
    fn test_last_life_goes_to_game_over() {
        let mut state = playing(2);
        state.hazards.clear();
        state.lives = 1;
        place_frog(&mut state, 3, MARGIN_X + 320.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, 0);
        assert!(state.events.contains(&GameEvent::Died(DeathCause::Drowned)));

        finish_death(&mut state);
        assert!(matches!(state.phase, GamePhase::GameOverTransition { .. }));
        assert!(!state.frog.is_alive());

        let ticks = (GAME_OVER_DELAY / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: state.score }));
    }

    #[test]
    fn test_death_with_lives_left_respawns() {
        let mut state = playing(2);
        state.hazards.clear();
        place_frog(&mut state, 2, MARGIN_X + 320.0);
        state.time_left = 10.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, START_LIVES - 1);

        finish_death(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.frog.is_alive());
        assert_eq!(state.frog, Frog::spawn());
        assert_eq!(state.time_left, MAX_TIME);
        assert_eq!(state.max_row_reached, START_ROW);
    }

    #[test]
    fn test_row_advance_bonus_once_per_row() {
        let mut state = playing(3);
        state.hazards.clear();
        tick(&mut state, &hop(Facing::Up), SIM_DT);
        assert_eq!(state.score, ROW_ADVANCE_POINTS);
        tick(&mut state, &hop(Facing::Down), SIM_DT);
        tick(&mut state, &hop(Facing::Up), SIM_DT);
        assert_eq!(state.score, ROW_ADVANCE_POINTS);
        tick(&mut state, &hop(Facing::Up), SIM_DT);
        assert_eq!(state.score, 2 * ROW_ADVANCE_POINTS);
        assert_eq!(state.max_row_reached, START_ROW - 2);
    }

    #[test]
    fn test_goal_slot_fills_and_respawns_after_delay() {
        let mut state = playing(4);
        state.god_mode = true;
        let cx = slot_center(&state, 1);
        place_frog(&mut state, 1, cx);
        state.max_row_reached = 1;

        tick(&mut state, &hop(Facing::Up), SIM_DT);
        assert!(state.slots.is_occupied(1));
        assert_eq!(state.score, ROW_ADVANCE_POINTS + GOAL_POINTS);
        assert_eq!(state.frog.state, FrogState::Safe);
        assert!(matches!(state.phase, GamePhase::GoalTransition { .. }));
        assert!(state.events.contains(&GameEvent::GoalReached(1)));

        // No respawn until the delay passes
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.frog.state, FrogState::Safe);

        let ticks = (GOAL_DELAY / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.frog.is_alive());
        assert_eq!(state.frog.row(), START_ROW);
    }

    #[test]
    fn test_occupied_slot_bounces_back() {
        let mut state = playing(5);
        state.god_mode = true;
        state.slots.occupy(3);
        let cx = slot_center(&state, 3);
        place_frog(&mut state, 1, cx);
        let y = state.frog.rect.y;
        let score = state.score;

        tick(&mut state, &hop(Facing::Up), SIM_DT);
        assert_eq!(state.score, score);
        assert_eq!(state.slots.occupied_count(), 1);
        assert!(state.slots.is_occupied(3));
        assert_eq!(state.frog.rect.y, y);
        assert_eq!(state.frog.row(), 1);
        assert!(state.frog.is_alive());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_filling_all_slots_clears_level_once() {
        let mut state = playing(6);
        state.god_mode = true;
        let lives = state.lives;
        let mut level_transitions = 0;

        for i in 0..SLOT_COUNT {
            let cx = slot_center(&state, i);
            place_frog(&mut state, 1, cx);
            tick(&mut state, &hop(Facing::Up), SIM_DT);
            if matches!(state.phase, GamePhase::LevelTransition { .. }) {
                level_transitions += 1;
            } else {
                skip_transition(&mut state);
            }
        }
        assert_eq!(level_transitions, 1);
        assert!(state.slots.all_occupied());
        assert!(state.events.contains(&GameEvent::LevelCleared));
        assert!(state.score >= SLOT_COUNT as u64 * GOAL_POINTS + LEVEL_CLEAR_POINTS);

        let ticks = (LEVEL_DELAY / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.lives, lives + 1);
        assert!((state.difficulty - (1.0 + DIFFICULTY_STEP)).abs() < 1e-6);
        assert_eq!(state.slots.occupied_count(), 0);
        assert!(state.hazards.iter().any(|h| h.is_snake()));
    }

    #[test]
    fn test_level_clear_life_capped() {
        let mut state = playing(16);
        state.god_mode = true;
        state.lives = MAX_LIVES;

        for i in 0..SLOT_COUNT {
            let cx = slot_center(&state, i);
            place_frog(&mut state, 1, cx);
            tick(&mut state, &hop(Facing::Up), SIM_DT);
            if !matches!(state.phase, GamePhase::LevelTransition { .. }) {
                skip_transition(&mut state);
            }
        }
        assert!(matches!(state.phase, GamePhase::LevelTransition { .. }));

        skip_transition(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_grant_life_capped() {
        let mut state = playing(17);
        state.hazards.clear();
        let input = TickInput { grant_life: true, ..Default::default() };

        state.lives = MAX_LIVES - 1;
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.lives, MAX_LIVES);

        let score = state.score;
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.score, score);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_platform_coin_rides_and_drops_with_host() {
        let mut state = playing(18);
        state.god_mode = true;
        state.coin_timer = 100.0;
        let log = Hazard::log(40, MARGIN_X + 200.0, row_y(5), 120.0, -72.0, 1);
        let coin = Coin::on_platform(&log);
        let (_, offset) = coin.rider.expect("riding");
        state.hazards = vec![log];
        state.coins.push(coin);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.coins.len(), 1);
            assert_eq!(state.coins[0].rect.x, state.hazards[0].rect.x + offset);
        }
        assert!(state.hazards[0].rect.x < MARGIN_X + 200.0);

        state.hazards.clear();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_log_carries_frog() {
        let mut state = playing(7);
        state.hazards = vec![Hazard::log(1, MARGIN_X + 280.0, row_y(5), 95.0, -72.0, 2)];
        place_frog(&mut state, 5, MARGIN_X + 320.0);
        let x = state.frog.rect.x;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.frog.is_alive());
        assert!((state.frog.rect.x - (x - 72.0 * SIM_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_lanes_and_timer() {
        let mut state = playing(8);
        let input = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &input, SIM_DT);
        assert!(state.paused);

        let before: Vec<f32> = state.hazards.iter().map(|h| h.rect.x).collect();
        let time = state.time_left;
        for _ in 0..30 {
            tick(&mut state, &hop(Facing::Up), SIM_DT);
        }
        let after: Vec<f32> = state.hazards.iter().map(|h| h.rect.x).collect();
        assert_eq!(before, after);
        assert_eq!(state.time_left, time);
        assert_eq!(state.frog.row(), START_ROW);

        tick(&mut state, &input, SIM_DT);
        assert!(!state.paused);
    }

    #[test]
    fn test_transition_counts_down_while_paused() {
        let mut state = playing(9);
        state.phase = GamePhase::GoalTransition { remaining: GOAL_DELAY };
        state.paused = true;
        tick(&mut state, &TickInput::default(), SIM_DT);
        let remaining = state.phase.remaining().expect("still waiting");
        assert!(remaining < GOAL_DELAY);
    }

    #[test]
    fn test_skip_transition_applies_effect() {
        let mut state = playing(10);
        state.phase = GamePhase::GameOverTransition { remaining: GAME_OVER_DELAY };
        skip_transition(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_riding_snake_tracks_log() {
        let mut hazards = vec![
            Hazard::log(1, MARGIN_X + 100.0, row_y(5), 95.0, -72.0, 2),
            Hazard::snake(
                2,
                MARGIN_X + 110.0,
                row_y(5),
                -72.0,
                SnakeMode::Riding { log_id: 1, offset: 10.0 },
            ),
        ];
        for _ in 0..10 {
            advance_hazards(&mut hazards, SIM_DT);
            assert!((hazards[1].rect.x - (hazards[0].rect.x + 10.0)).abs() < 1e-3);
        }

        hazards.remove(0);
        advance_hazards(&mut hazards, SIM_DT);
        assert_eq!(
            hazards[0].kind,
            HazardKind::Snake { mode: SnakeMode::Roaming }
        );
    }

    #[test]
    fn test_coin_collected_and_expires() {
        let mut state = playing(11);
        state.hazards.clear();
        state.coin_timer = 100.0;
        let frog_rect = state.frog.rect;
        state.coins.push(Coin::on_tile(START_ROW, 7));
        state.coins.push(Coin::on_tile(MEDIAN_ROW, 0));
        assert!(state.coins[0].rect.overlaps(&frog_rect.inflate(-22.0, -22.0)));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, COIN_POINTS);
        assert!(state.events.contains(&GameEvent::CoinCollected));
        assert_eq!(state.coins.len(), 1);

        state.coins[0].age = 14.99;
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_coins_spawn_on_timer() {
        let mut state = playing(12);
        state.god_mode = true;
        state.coin_timer = SIM_DT / 2.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.coins.len(), 1);
        assert!(state.coin_timer >= COIN_INTERVAL.start);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let inputs = [
            TickInput { start: true, ..Default::default() },
            hop(Facing::Up),
            hop(Facing::Left),
            TickInput::default(),
            hop(Facing::Up),
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.frog, b.frog);
        assert_eq!(a.hazards, b.hazards);
    }

    fn arb_facing() -> impl Strategy<Value = Facing> {
        prop_oneof![
            Just(Facing::Up),
            Just(Facing::Down),
            Just(Facing::Left),
            Just(Facing::Right),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_god_mode_never_dies(
            seed in any::<u64>(),
            level in 1u32..8,
            moves in prop::collection::vec(prop::option::of(arb_facing()), 1..300),
        ) {
            let mut state = playing(seed);
            state.level = level;
            state.rebuild_level();
            state.god_mode = true;
            let lives = state.lives;
            for step in moves {
                let input = TickInput { moves: step.into_iter().collect(), ..Default::default() };
                tick(&mut state, &input, SIM_DT);
                skip_transition(&mut state);
                prop_assert!(state.frog.state != FrogState::Dying);
                prop_assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Died(_))));
            }
            prop_assert!(state.lives >= lives);
        }
    }
}
