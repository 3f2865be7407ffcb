//! Runtime configuration.
//!
//! [`AvatarConfig`] is the live control surface a host UI toggles while the
//! avatar runs. [`MurmurConfig`] is the load-time document that also names
//! the scene objects and the script table.
//!
//! ```json
//! {
//!   "avatar": { "playAudio": true, "script": "pizzas", "morphTargetSmoothing": 0.3 },
//!   "scene": { "headBone": "Head" },
//!   "scripts": {
//!     "welcome": { "cues": "audios/welcome.json", "animation": "Greeting" },
//!     "pizzas": { "cues": "audios/pizzas.json", "animation": "Angry" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use murmur_animation::{AnimationState, AnimationTable};
use murmur_core::{MurmurError, Result};
use murmur_viseme::{BlendSettings, CueTrack, VisemeMap};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Frame rate the smoothing factor is tuned for.
///
/// Smoothing is applied once per tick, not per second: at other rates the
/// same factor feels faster or slower.
pub const NOMINAL_TICK_RATE: f32 = 60.0;

/// Live toggles read by the frame driver every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvatarConfig {
    pub play_audio: bool,
    pub head_follow: bool,
    pub smooth_morph_target: bool,
    /// Per-tick lerp factor in `[0, 1]`, see [`NOMINAL_TICK_RATE`].
    pub morph_target_smoothing: f32,
    pub script: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            play_audio: false,
            head_follow: true,
            smooth_morph_target: true,
            morph_target_smoothing: 0.5,
            script: "welcome".to_string(),
        }
    }
}

impl AvatarConfig {
    #[must_use]
    pub fn blend_settings(&self) -> BlendSettings {
        if self.smooth_morph_target {
            BlendSettings::smoothed(self.morph_target_smoothing)
        } else {
            BlendSettings::snap()
        }
    }

    /// Clamps the smoothing factor into `[0, 1]`.
    pub fn sanitize(&mut self) {
        let clamped = if self.morph_target_smoothing.is_nan() {
            0.0
        } else {
            self.morph_target_smoothing.clamp(0.0, 1.0)
        };
        if clamped != self.morph_target_smoothing {
            warn!(
                "morphTargetSmoothing {} outside [0, 1], using {clamped}",
                self.morph_target_smoothing
            );
            self.morph_target_smoothing = clamped;
        }
    }
}

/// Names of the scene objects the core drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub head_bone: String,
    pub head_surface: String,
    pub teeth_surface: String,
    pub viseme_map: VisemeMap,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            head_bone: "Head".to_string(),
            head_surface: "Wolf3D_Head".to_string(),
            teeth_surface: "Wolf3D_Teeth".to_string(),
            viseme_map: VisemeMap::standard(),
        }
    }
}

/// One selectable script: its cue file and the body animation it plays with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub cues: PathBuf,
    pub animation: AnimationState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MurmurConfig {
    pub avatar: AvatarConfig,
    pub scene: SceneConfig,
    pub scripts: BTreeMap<String, ScriptEntry>,
}

impl Default for MurmurConfig {
    fn default() -> Self {
        let scripts = [
            ("welcome", AnimationState::Greeting),
            ("pizzas", AnimationState::Angry),
        ]
        .into_iter()
        .map(|(name, animation)| {
            (
                name.to_string(),
                ScriptEntry {
                    cues: PathBuf::from(format!("audios/{name}.json")),
                    animation,
                },
            )
        })
        .collect();

        Self {
            avatar: AvatarConfig::default(),
            scene: SceneConfig::default(),
            scripts,
        }
    }
}

impl MurmurConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.avatar.sanitize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Checks cross references: the selected script must exist.
    pub fn validate(&self) -> Result<()> {
        if self.scripts.is_empty() {
            return Err(MurmurError::InvalidConfig("no scripts configured".to_string()));
        }
        if !self.scripts.contains_key(&self.avatar.script) {
            return Err(MurmurError::UnknownScript(self.avatar.script.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub fn animation_table(&self) -> AnimationTable {
        self.scripts
            .iter()
            .map(|(name, entry)| (name.clone(), entry.animation))
            .collect()
    }

    /// Loads every script's cue file, resolving relative paths against `base_dir`.
    pub fn load_cues(&self, base_dir: &Path) -> Result<CueLibrary> {
        let mut library = CueLibrary::new();
        for (name, entry) in &self.scripts {
            let path = if entry.cues.is_absolute() {
                entry.cues.clone()
            } else {
                base_dir.join(&entry.cues)
            };
            let track = CueTrack::from_path(&path)?;
            info!("Loaded {} cues for script {name:?} from {}", track.len(), path.display());
            library.insert(name.clone(), track);
        }
        Ok(library)
    }
}

/// Cue tracks by script name, shared with the frame driver.
#[derive(Debug, Clone, Default)]
pub struct CueLibrary {
    tracks: FxHashMap<String, Arc<CueTrack>>,
}

impl CueLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, script: impl Into<String>, track: CueTrack) {
        self.tracks.insert(script.into(), Arc::new(track));
    }

    #[must_use]
    pub fn get(&self, script: &str) -> Option<&Arc<CueTrack>> {
        self.tracks.get(script)
    }

    #[must_use]
    pub fn contains(&self, script: &str) -> bool {
        self.tracks.contains_key(script)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
