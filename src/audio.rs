//! Sound effects
//!
//! Game events map to effects, effects map to logical sound paths, and the
//! asset cache turns those into handles a backend can play. A sound the
//! provider doesn't have is simply silent.

use crate::assets::{AssetCache, AssetProvider, SoundId, paths};
use crate::sim::{DeathCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Frog hopped
    Hop,
    /// Drowned, dived turtle
    Splash,
    /// Hit by traffic, bitten, out of time
    Squash,
    /// Slot filled
    Goal,
    /// All slots filled
    LevelClear,
    /// Coin picked up
    Coin,
    /// Score threshold crossed
    ExtraLife,
    /// Round over
    GameOver,
}

impl SoundEffect {
    pub fn path(self) -> &'static str {
        match self {
            SoundEffect::Hop => paths::SFX_HOP,
            SoundEffect::Splash => paths::SFX_SPLASH,
            SoundEffect::Squash => paths::SFX_SQUASH,
            SoundEffect::Goal => paths::SFX_GOAL,
            SoundEffect::LevelClear => paths::SFX_LEVEL,
            SoundEffect::Coin => paths::SFX_COIN,
            SoundEffect::ExtraLife => paths::SFX_EXTRA_LIFE,
            SoundEffect::GameOver => paths::SFX_GAME_OVER,
        }
    }

    /// Effect for a game event
    pub fn for_event(event: &GameEvent) -> SoundEffect {
        match event {
            GameEvent::Hop => SoundEffect::Hop,
            GameEvent::Died(DeathCause::Drowned | DeathCause::Submerged) => SoundEffect::Splash,
            GameEvent::Died(_) => SoundEffect::Squash,
            GameEvent::GoalReached(_) => SoundEffect::Goal,
            GameEvent::LevelCleared => SoundEffect::LevelClear,
            GameEvent::CoinCollected => SoundEffect::Coin,
            GameEvent::ExtraLife(_) => SoundEffect::ExtraLife,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, sound: SoundId, volume: f32);
}

/// Audio manager for the game
pub struct AudioManager<B> {
    backend: B,
    volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, volume: f32) -> Self {
        Self {
            backend,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a sound effect
    pub fn play<P: AssetProvider>(&mut self, effect: SoundEffect, assets: &mut AssetCache<P>) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(sound) = assets.sound(effect.path()) {
            self.backend.play(sound, vol);
        }
    }

    /// Play the effect for each event, in order
    pub fn handle_events<P: AssetProvider>(
        &mut self,
        events: &[GameEvent],
        assets: &mut AssetCache<P>,
    ) {
        for event in events {
            self.play(SoundEffect::for_event(event), assets);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
