//! Player settings and preferences
//!
//! Persisted as individual string keys through a `KeyValueStore`. Anything
//! missing or unparseable falls back to its default instead of failing.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_PADDLE_WIDTH;
use crate::platform::storage::KeyValueStore;

/// Difficulty levels; each shifts the paddle's base width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Nightmare => "NIGHTMARE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EASY" => Some(Difficulty::Easy),
            "NORMAL" => Some(Difficulty::Normal),
            "HARD" => Some(Difficulty::Hard),
            "NIGHTMARE" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    /// Next difficulty in the options menu cycle
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Nightmare,
            Difficulty::Nightmare => Difficulty::Easy,
        }
    }

    /// Added to the configured paddle width
    pub fn paddle_width_delta(&self) -> f32 {
        match self {
            Difficulty::Easy => 40.0,
            Difficulty::Normal => 0.0,
            Difficulty::Hard => -40.0,
            Difficulty::Nightmare => -80.0,
        }
    }

    /// Base paddle width at this difficulty
    pub fn paddle_width(&self, configured: f32) -> f32 {
        (configured + self.paddle_width_delta()).max(MIN_PADDLE_WIDTH)
    }
}

/// Paddle control scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Controls {
    #[default]
    Mouse,
    Keyboard,
}

impl Controls {
    pub fn as_str(&self) -> &'static str {
        match self {
            Controls::Mouse => "mouse",
            Controls::Keyboard => "keyboard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mouse" => Some(Controls::Mouse),
            "keyboard" => Some(Controls::Keyboard),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Controls::Mouse => Controls::Keyboard,
            Controls::Keyboard => Controls::Mouse,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub highscore: u64,
    /// 0 (muted) or 1
    pub music_volume: u8,
    /// 0 (muted) or 1
    pub sound_volume: u8,
    pub difficulty: Difficulty,
    pub controls: Controls,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highscore: 0,
            music_volume: 1,
            sound_volume: 1,
            difficulty: Difficulty::Normal,
            controls: Controls::Mouse,
        }
    }
}

impl Settings {
    const HIGHSCORE_KEY: &'static str = "highscore";
    const MUSIC_KEY: &'static str = "musicVolume";
    const SOUND_KEY: &'static str = "soundVolume";
    const DIFFICULTY_KEY: &'static str = "difficulty";
    const CONTROLS_KEY: &'static str = "controls";

    /// Read every key, defaulting whatever is absent or invalid
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        let settings = Self {
            highscore: store
                .get(Self::HIGHSCORE_KEY)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.highscore),
            music_volume: read_volume(store, Self::MUSIC_KEY, defaults.music_volume),
            sound_volume: read_volume(store, Self::SOUND_KEY, defaults.sound_volume),
            difficulty: store
                .get(Self::DIFFICULTY_KEY)
                .and_then(|v| Difficulty::from_str(&v))
                .unwrap_or(defaults.difficulty),
            controls: store
                .get(Self::CONTROLS_KEY)
                .and_then(|v| Controls::from_str(&v))
                .unwrap_or(defaults.controls),
        };
        log::debug!("Settings loaded: {settings:?}");
        settings
    }
}

/// Volumes are stored as 0 or 1; any other number counts as on
fn read_volume(store: &impl KeyValueStore, key: &str, default: u8) -> u8 {
    match store.get(key).and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(0) => 0,
        Some(_) => 1,
        None => default,
    }
}

/// Settings plus the backend they persist to. Every change is written through.
#[derive(Debug)]
pub struct SettingsStore<S: KeyValueStore> {
    backend: S,
    settings: Settings,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn load(backend: S) -> Self {
        let settings = Settings::load(&backend);
        Self { backend, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn cycle_difficulty(&mut self) -> Difficulty {
        self.settings.difficulty = self.settings.difficulty.next();
        self.backend
            .set(Settings::DIFFICULTY_KEY, self.settings.difficulty.as_str());
        log::info!("Difficulty set to {}", self.settings.difficulty.as_str());
        self.settings.difficulty
    }

    pub fn toggle_music(&mut self) -> u8 {
        self.settings.music_volume = 1 - self.settings.music_volume.min(1);
        self.backend
            .set(Settings::MUSIC_KEY, &self.settings.music_volume.to_string());
        self.settings.music_volume
    }

    pub fn toggle_sound(&mut self) -> u8 {
        self.settings.sound_volume = 1 - self.settings.sound_volume.min(1);
        self.backend
            .set(Settings::SOUND_KEY, &self.settings.sound_volume.to_string());
        self.settings.sound_volume
    }

    pub fn toggle_controls(&mut self) -> Controls {
        self.settings.controls = self.settings.controls.toggled();
        self.backend
            .set(Settings::CONTROLS_KEY, self.settings.controls.as_str());
        self.settings.controls
    }

    /// Persist `score` if it beats the stored highscore. Returns true if it did.
    pub fn record_highscore(&mut self, score: u64) -> bool {
        if score <= self.settings.highscore {
            return false;
        }
        self.settings.highscore = score;
        self.backend.set(Settings::HIGHSCORE_KEY, &score.to_string());
        log::info!("New highscore {score} saved");
        true
    }
}
