//! Headless lip-sync replay.
//!
//! ```text
//! RUST_LOG=info cargo run -p lipsync_replay -- demo_apps/lipsync_replay/assets/welcome.json welcome
//! ```
//!
//! Drives a [`FrameDriver`] at 60 Hz against a simulated audio clock and logs
//! every change of the dominant mouth shape and of the body animation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use glam::Vec3;
use log::info;
use murmur::prelude::*;
use murmur::{NOMINAL_TICK_RATE, ScriptEntry};

/// Frames replayed after the audio ends so the body can settle back to idle.
const TAIL_SECONDS: f32 = 1.0;

const FACE_TARGETS: [&str; 10] = [
    "viseme_sil",
    "viseme_PP",
    "viseme_FF",
    "viseme_TH",
    "viseme_DD",
    "viseme_kk",
    "viseme_CH",
    "viseme_SS",
    "viseme_nn",
    "viseme_RR",
];

const VOWEL_TARGETS: [&str; 5] = ["viseme_aa", "viseme_E", "viseme_I", "viseme_O", "viseme_U"];

fn build_rig() -> Rig {
    let mut rig = Rig::new();
    let hips = rig.add_bone("Hips", Transform::from_position(Vec3::new(0.0, 1.0, 0.0)), None);
    let spine = rig.add_bone("Spine", Transform::from_position(Vec3::new(0.0, 0.3, 0.0)), Some(hips));
    let neck = rig.add_bone("Neck", Transform::from_position(Vec3::new(0.0, 0.3, 0.0)), Some(spine));
    rig.add_bone("Head", Transform::from_position(Vec3::new(0.0, 0.1, 0.0)), Some(neck));
    rig
}

fn build_mixer() -> murmur::Result<AnimationMixer> {
    AnimationMixer::from_clips([
        (AnimationState::Idle, AnimationClip::new("Idle", 8.0)),
        (AnimationState::Greeting, AnimationClip::new("Standing Greeting", 3.2)),
        (AnimationState::Angry, AnimationClip::new("Angry Gesture", 2.6)),
    ])
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(cues_path) = args.next().map(PathBuf::from) else {
        bail!("usage: lipsync_replay <cues.json> [script]");
    };
    let script = args.next().unwrap_or_else(|| "welcome".to_string());

    let animation = AnimationTable::standard()
        .get(&script)
        .unwrap_or(AnimationState::Greeting);

    let mut config = MurmurConfig {
        scripts: BTreeMap::from([(
            script.clone(),
            ScriptEntry {
                cues: cues_path.clone(),
                animation,
            },
        )]),
        ..MurmurConfig::default()
    };
    config.avatar.script = script;
    config.avatar.play_audio = true;
    config.validate()?;

    let library = config
        .load_cues(Path::new("."))
        .with_context(|| format!("loading cues from {}", cues_path.display()))?;

    let mut driver = FrameDriver::new(&config, library, build_mixer()?, build_rig(), ClockTransport::new())?;
    let all_targets = FACE_TARGETS.iter().chain(VOWEL_TARGETS.iter()).copied();
    driver.attach_surface(&config.scene.head_surface, all_targets.clone());
    driver.attach_surface(&config.scene.teeth_surface, all_targets);

    info!(
        "Animations: {}",
        driver.mixer().list_animations().join(", ")
    );

    let dt = 1.0 / NOMINAL_TICK_RATE;
    let camera = Vec3::new(0.4, 1.7, 2.5);
    let started = Instant::now();
    let mut frames = 0_u32;
    let mut dominant: Option<usize> = None;
    let mut tail_frames = (TAIL_SECONDS * NOMINAL_TICK_RATE) as u32;

    loop {
        frames += 1;
        driver.transport_mut().advance(dt);
        let report = driver.tick(&config.avatar, camera, dt);

        if let Some(transition) = report.transition {
            info!(
                "[{:6.3}s] animation {} -> {}",
                report.time, transition.from, transition.to
            );
        }

        let now = driver.channel_weights().dominant().map(|(channel, _)| channel);
        if now != dominant {
            let name = now.map_or("<none>", |channel| driver.map().channels()[channel].as_str());
            info!("[{:6.3}s] mouth {name}", report.time);
            dominant = now;
        }

        if !driver.transport().is_playing() {
            // Audio over: stop playback so the body returns to idle
            config.avatar.play_audio = false;
            if tail_frames == 0 && driver.mixer().is_settled() {
                break;
            }
            tail_frames = tail_frames.saturating_sub(1);
        }
    }

    info!(
        "Replayed {frames} frames ({:.2}s of simulated time) in {:?}",
        frames as f32 * dt,
        started.elapsed()
    );
    Ok(())
}
