//! Asset lookup by logical path
//!
//! The core never loads files. A front-end supplies an `AssetProvider`; the
//! renderer and audio go through an `AssetCache`, which asks the provider
//! once per path and remembers misses so a missing file is reported once.

use std::collections::HashMap;

/// Opaque handle to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Opaque handle to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Logical asset paths
pub mod paths {
    pub const MAP: &str = "images/Map.png";
    pub const GOAL: &str = "images/goal.png";
    pub const FROG: &str = "images/frog.png";
    pub const DEATH: &str = "images/FroggerMuerte.png";
    pub const MENU: &str = "images/menu.png";
    pub const OPTIONS: &str = "images/Options.png";
    pub const CARS: &str = "images/cars.png";
    pub const TURTLE: &str = "images/turtle.png";
    pub const CROCODILE: &str = "images/cocodrilo.png";
    pub const SNAKE: &str = "images/Serpiente.png";
    pub const COIN: &str = "images/coin.png";

    pub const SFX_HOP: &str = "sounds/hop.wav";
    pub const SFX_SPLASH: &str = "sounds/splash.wav";
    pub const SFX_SQUASH: &str = "sounds/squash.wav";
    pub const SFX_GOAL: &str = "sounds/goal.wav";
    pub const SFX_LEVEL: &str = "sounds/level.wav";
    pub const SFX_COIN: &str = "sounds/coin.wav";
    pub const SFX_EXTRA_LIFE: &str = "sounds/extra_life.wav";
    pub const SFX_GAME_OVER: &str = "sounds/game_over.wav";

    /// Log sprite for a log variant (1..=3)
    pub fn log(variant: u8) -> &'static str {
        match variant {
            1 => "images/log1.png",
            2 => "images/log2.png",
            _ => "images/log3.png",
        }
    }
}

/// Resolves logical paths to loaded assets
pub trait AssetProvider {
    fn image(&mut self, path: &str) -> Option<ImageId>;
    fn sound(&mut self, path: &str) -> Option<SoundId>;
}

/// Provider with no assets at all; everything falls back to placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn image(&mut self, _path: &str) -> Option<ImageId> {
        None
    }

    fn sound(&mut self, _path: &str) -> Option<SoundId> {
        None
    }
}

/// Memoises provider lookups per logical path
pub struct AssetCache<P> {
    provider: P,
    images: HashMap<String, Option<ImageId>>,
    sounds: HashMap<String, Option<SoundId>>,
}

impl<P: AssetProvider> AssetCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            images: HashMap::new(),
            sounds: HashMap::new(),
        }
    }

    pub fn image(&mut self, path: &str) -> Option<ImageId> {
        if let Some(&cached) = self.images.get(path) {
            return cached;
        }
        let loaded = self.provider.image(path);
        if loaded.is_none() {
            log::warn!("Missing image {}, using placeholder", path);
        }
        self.images.insert(path.to_string(), loaded);
        loaded
    }

    pub fn sound(&mut self, path: &str) -> Option<SoundId> {
        if let Some(&cached) = self.sounds.get(path) {
            return cached;
        }
        let loaded = self.provider.sound(path);
        if loaded.is_none() {
            log::warn!("Missing sound {}, playing nothing", path);
        }
        self.sounds.insert(path.to_string(), loaded);
        loaded
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
