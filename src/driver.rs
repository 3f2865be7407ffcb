//! Per-frame orchestration.
//!
//! [`FrameDriver::tick`] runs once per rendered frame, in a fixed order:
//!
//! 1. read the playback signal (play toggle + script selection);
//! 2. if it changed: switch cue track and audio, reset the mouth to rest,
//!    play/pause the audio and let the crossfade controller react;
//! 3. poll the audio position;
//! 4. run the viseme blender (unconditionally, so channels keep decaying on
//!    frames without a cue) and write the weights to the face surfaces;
//! 5. turn the head toward the viewer if enabled;
//! 6. advance the body animation crossfades.
//!
//! The driver is the only writer of channel weights and animation state
//! between ticks.

use std::sync::Arc;

use glam::Vec3;
use log::{info, warn};
use murmur_animation::{AnimationMixer, AnimationState, CrossfadeController, Transition};
use murmur_core::{MurmurError, Result};
use murmur_scene::{HeadFollow, Rig};
use murmur_viseme::{
    ChannelWeights, CueTrack, FaceSurfaces, MorphSurface, MouthCue, VisemeBlender, VisemeMap,
};

use crate::config::{AvatarConfig, CueLibrary, MurmurConfig};
use crate::transport::AudioTransport;

/// Playback facts the driver reacts to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSignal {
    pub is_playing: bool,
    pub script: String,
    pub current_time: f32,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Audio position used for this frame
    pub time: f32,
    pub active_cue: Option<MouthCue>,
    pub transition: Option<Transition>,
    pub script_switched: bool,
    pub head_oriented: bool,
}

pub struct FrameDriver<T: AudioTransport> {
    blender: VisemeBlender,
    library: CueLibrary,
    track: Arc<CueTrack>,
    loaded_script: Option<String>,
    weights: ChannelWeights,
    faces: FaceSurfaces,
    controller: CrossfadeController,
    mixer: AnimationMixer,
    rig: Rig,
    head: Option<HeadFollow>,
    transport: T,
    /// Play toggle and script last read from the config
    config_signal: Option<(bool, String)>,
    /// Play toggle and script currently applied
    active_signal: Option<(bool, String)>,
}

impl<T: AudioTransport> FrameDriver<T> {
    /// Wires the core together.
    ///
    /// Face surfaces start detached; attach their morph targets with
    /// [`attach_surface`](Self::attach_surface) once the mesh has loaded.
    /// The idle clip starts fading in immediately.
    pub fn new(
        config: &MurmurConfig,
        library: CueLibrary,
        mut mixer: AnimationMixer,
        rig: Rig,
        transport: T,
    ) -> Result<Self> {
        config.validate()?;
        if let Some(missing) = config.scripts.keys().find(|name| !library.contains(name)) {
            return Err(MurmurError::UnknownScript(missing.clone()));
        }

        let table = config.animation_table();
        mixer.ensure_registered(table.states())?;

        let map = Arc::new(config.scene.viseme_map.clone());
        let mut faces = FaceSurfaces::new();
        faces.push(MorphSurface::detached(config.scene.head_surface.as_str()), &map);
        faces.push(MorphSurface::detached(config.scene.teeth_surface.as_str()), &map);

        let head = HeadFollow::find(&rig, &config.scene.head_bone);

        let mut controller = CrossfadeController::new(table);
        controller.start(&mut mixer);

        Ok(Self {
            weights: ChannelWeights::rest_pose(&map),
            blender: VisemeBlender::new(map),
            library,
            track: Arc::new(CueTrack::empty()),
            loaded_script: None,
            faces,
            controller,
            mixer,
            rig,
            head,
            transport,
            config_signal: None,
            active_signal: None,
        })
    }

    /// Runs one frame. `viewer` is the world-space point the head turns to,
    /// `dt` the seconds since the previous frame.
    pub fn tick(&mut self, config: &AvatarConfig, viewer: Vec3, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();

        let mut signal = PlaybackSignal {
            is_playing: config.play_audio,
            script: config.script.clone(),
            current_time: 0.0,
        };

        let changed = self
            .config_signal
            .as_ref()
            .is_none_or(|(playing, script)| *playing != signal.is_playing || *script != signal.script);
        if changed {
            self.config_signal = Some((signal.is_playing, signal.script.clone()));
            (report.script_switched, report.transition) =
                self.apply_signal(signal.is_playing, &signal.script);
        }

        signal.current_time = self.transport.current_time();
        report.time = signal.current_time;

        self.weights = self.blender.tick(
            &self.track,
            signal.current_time,
            &self.weights,
            config.blend_settings(),
        );
        self.faces.apply(&self.weights);
        report.active_cue = self.track.active_cue(signal.current_time).copied();

        if config.head_follow
            && let Some(head) = self.head
        {
            report.head_oriented = head.apply(&mut self.rig, viewer);
        }

        self.mixer.update(dt);
        report
    }

    /// Switches to `script` with the current play state, as if the config
    /// had selected it: cue track and audio are replaced, the mouth resets,
    /// playback resumes if it was on and the body animation follows.
    ///
    /// Holds until the configured play toggle or script changes.
    pub fn select_script(&mut self, script: &str) -> Result<Option<Transition>> {
        if !self.library.contains(script) {
            return Err(MurmurError::UnknownScript(script.to_string()));
        }
        let is_playing = self.active_signal.as_ref().is_some_and(|(playing, _)| *playing);
        let (_, transition) = self.apply_signal(is_playing, script);
        Ok(transition)
    }

    /// Returns whether the loaded script changed, and the animation transition.
    fn apply_signal(&mut self, is_playing: bool, script: &str) -> (bool, Option<Transition>) {
        let switched = self.load_script(script);
        self.reset_mouth();
        if is_playing {
            self.transport.play();
        } else {
            self.transport.pause();
        }
        let transition = self.controller.on_signal(is_playing, script, &mut self.mixer);
        self.active_signal = Some((is_playing, script.to_string()));
        (switched, transition)
    }

    /// Returns whether the loaded script changed.
    fn load_script(&mut self, script: &str) -> bool {
        if self.loaded_script.as_deref() == Some(script) {
            return false;
        }

        self.track = match self.library.get(script) {
            Some(track) => Arc::clone(track),
            None => {
                warn!("No cue track for script {script:?}, mouth will stay at rest");
                Arc::new(CueTrack::empty())
            }
        };
        self.transport.switch_track(script, self.track.duration());
        self.loaded_script = Some(script.to_string());
        info!("Script {script:?} loaded ({} cues)", self.track.len());
        true
    }

    fn reset_mouth(&mut self) {
        self.weights = ChannelWeights::rest_pose(self.blender.map());
        self.faces.apply(&self.weights);
    }

    /// Installs the morph target names of a face surface once its mesh is ready.
    pub fn attach_surface<I, S>(&mut self, name: &str, target_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attached = self.faces.attach(name, target_names, self.blender.map());
        if attached {
            self.faces.apply(&self.weights);
        } else {
            warn!("No face surface named {name:?}");
        }
        attached
    }

    #[must_use]
    pub fn channel_weights(&self) -> &ChannelWeights {
        &self.weights
    }

    #[must_use]
    pub fn map(&self) -> &VisemeMap {
        self.blender.map()
    }

    #[must_use]
    pub fn surfaces(&self) -> &FaceSurfaces {
        &self.faces
    }

    #[must_use]
    pub fn current_animation(&self) -> AnimationState {
        self.controller.current()
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    #[must_use]
    pub fn track(&self) -> &CueTrack {
        &self.track
    }

    #[must_use]
    pub fn loaded_script(&self) -> Option<&str> {
        self.loaded_script.as_deref()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
