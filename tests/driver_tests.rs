//! Frame Driver Tests
//!
//! Tests for:
//! - Construction checks (scripts, clips)
//! - Per-tick ordering: signal, audio, visemes, head, mixer
//! - Mouth reset on script switch
//! - Detached and late-attached face surfaces
//! - Head follow toggle

use glam::Vec3;
use murmur::prelude::*;

const HEAD_TARGETS: [&str; 9] = [
    "viseme_sil",
    "viseme_PP",
    "viseme_FF",
    "viseme_aa",
    "viseme_O",
    "viseme_I",
    "viseme_E",
    "viseme_SS",
    "viseme_RR",
];

fn library() -> CueLibrary {
    let mut library = CueLibrary::new();
    library.insert(
        "welcome",
        CueTrack::new(vec![
            MouthCue::new(0.0, 0.3, VisemeSymbol::D),
            MouthCue::new(0.3, 0.6, VisemeSymbol::B),
        ])
        .unwrap(),
    );
    library.insert(
        "pizzas",
        CueTrack::new(vec![MouthCue::new(1.0, 1.5, VisemeSymbol::G)]).unwrap(),
    );
    library
}

fn clips() -> AnimationMixer {
    AnimationMixer::from_clips([
        (AnimationState::Idle, AnimationClip::new("Idle", 4.0)),
        (AnimationState::Greeting, AnimationClip::new("Greeting", 2.5)),
        (AnimationState::Angry, AnimationClip::new("Angry", 3.0)),
    ])
    .unwrap()
}

fn rig() -> Rig {
    let mut rig = Rig::new();
    let hips = rig.add_bone("Hips", Transform::IDENTITY, None);
    let spine = rig.add_bone("Spine", Transform::from_position(Vec3::new(0.0, 1.0, 0.0)), Some(hips));
    rig.add_bone("Head", Transform::from_position(Vec3::new(0.0, 0.6, 0.0)), Some(spine));
    rig
}

fn driver() -> FrameDriver<ClockTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    FrameDriver::new(
        &MurmurConfig::default(),
        library(),
        clips(),
        rig(),
        ClockTransport::new(),
    )
    .unwrap()
}

fn snap_config() -> AvatarConfig {
    AvatarConfig {
        smooth_morph_target: false,
        ..AvatarConfig::default()
    }
}

fn weight(driver: &FrameDriver<ClockTransport>, channel: &str) -> f32 {
    driver
        .channel_weights()
        .weight(driver.map(), channel)
        .unwrap()
}

const VIEWER: Vec3 = Vec3::new(0.0, 1.6, 5.0);

// ============================================================================
// Construction
// ============================================================================

#[test]
fn missing_cue_track_is_rejected() {
    let mut library = CueLibrary::new();
    library.insert("welcome", CueTrack::empty());

    let err = FrameDriver::new(
        &MurmurConfig::default(),
        library,
        clips(),
        rig(),
        ClockTransport::new(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, MurmurError::UnknownScript(ref s) if s == "pizzas"));
}

#[test]
fn missing_animation_clip_is_rejected() {
    let mixer = AnimationMixer::from_clips([
        (AnimationState::Idle, AnimationClip::new("Idle", 4.0)),
        (AnimationState::Greeting, AnimationClip::new("Greeting", 2.5)),
    ])
    .unwrap();

    let err = FrameDriver::new(
        &MurmurConfig::default(),
        library(),
        mixer,
        rig(),
        ClockTransport::new(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, MurmurError::MissingClip(ref s) if s == "Angry"));
}

#[test]
fn starts_idle_at_rest_pose() {
    let driver = driver();
    assert_eq!(driver.current_animation(), AnimationState::Idle);
    assert_eq!(weight(&driver, "viseme_I"), 1.0);
    assert!(driver.mixer().action(AnimationState::Idle).unwrap().is_fading());
}

// ============================================================================
// Tick Ordering
// ============================================================================

#[test]
fn first_tick_loads_selected_script() {
    let mut driver = driver();
    let report = driver.tick(&snap_config(), VIEWER, 1.0 / 60.0);

    assert!(report.script_switched);
    assert_eq!(driver.loaded_script(), Some("welcome"));
    assert_eq!(driver.transport().script(), "welcome");
    assert!(!driver.transport().is_playing());
    assert!(report.transition.is_none());
}

#[test]
fn playing_greets_and_lip_syncs() {
    let mut driver = driver();
    let mut config = snap_config();
    driver.tick(&config, VIEWER, 0.5);
    assert_eq!(driver.mixer().weight_of(AnimationState::Idle), 1.0);

    config.play_audio = true;
    let report = driver.tick(&config, VIEWER, 0.25);
    let transition = report.transition.unwrap();
    assert_eq!(transition.to, AnimationState::Greeting);
    assert_eq!(driver.current_animation(), AnimationState::Greeting);
    assert!(driver.transport().is_playing());
    // The fade was requested before the mixer advanced in the same tick
    assert!((driver.mixer().weight_of(AnimationState::Greeting) - 0.5).abs() < 1e-5);

    driver.transport_mut().advance(0.1);
    let report = driver.tick(&config, VIEWER, 0.25);
    assert!(report.transition.is_none());
    assert_eq!(report.time, 0.1);
    assert_eq!(report.active_cue.map(|cue| cue.symbol), Some(VisemeSymbol::D));
    assert_eq!(weight(&driver, "viseme_aa"), 1.0);
    assert_eq!(weight(&driver, "viseme_I"), 0.0);

    driver.transport_mut().advance(0.35);
    driver.tick(&config, VIEWER, 0.25);
    assert_eq!(weight(&driver, "viseme_SS"), 1.0);
    assert_eq!(weight(&driver, "viseme_aa"), 0.0);
}

#[test]
fn mouth_decays_between_cues() {
    let mut driver = driver();
    let config = AvatarConfig {
        script: "pizzas".to_string(),
        ..AvatarConfig::default()
    };

    // Paused at 0 on a track whose first cue starts at 1.0
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    assert!((weight(&driver, "viseme_I") - 0.5).abs() < 1e-5);
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    assert!((weight(&driver, "viseme_I") - 0.25).abs() < 1e-5);
    assert!(driver.channel_weights().as_slice().iter().all(|w| *w <= 0.25));
}

#[test]
fn switching_script_resets_mouth_to_rest() {
    let mut driver = driver();
    let mut config = AvatarConfig {
        play_audio: true,
        ..AvatarConfig::default()
    };
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    driver.transport_mut().advance(0.1);
    for _ in 0..20 {
        driver.tick(&config, VIEWER, 1.0 / 60.0);
    }
    assert!(weight(&driver, "viseme_aa") > 0.5);

    config.script = "pizzas".to_string();
    let report = driver.tick(&config, VIEWER, 1.0 / 60.0);

    assert!(report.script_switched);
    assert_eq!(report.time, 0.0);
    assert_eq!(driver.transport().script(), "pizzas");
    assert_eq!(driver.current_animation(), AnimationState::Angry);
    // Rest pose, then one decay step with no cue active
    assert_eq!(weight(&driver, "viseme_aa"), 0.0);
    assert!((weight(&driver, "viseme_I") - 0.5).abs() < 1e-5);
}

#[test]
fn select_script_rejects_unknown() {
    let mut driver = driver();
    assert!(driver.select_script("pizzas").is_ok());
    assert_eq!(driver.track().len(), 1);

    let err = driver.select_script("karaoke").unwrap_err();
    assert!(matches!(err, MurmurError::UnknownScript(_)));
    assert_eq!(driver.loaded_script(), Some("pizzas"));
}

#[test]
fn select_script_while_playing_keeps_playing() {
    let mut driver = driver();
    let config = AvatarConfig {
        play_audio: true,
        ..AvatarConfig::default()
    };
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    driver.transport_mut().advance(0.5);
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    assert_eq!(driver.current_animation(), AnimationState::Greeting);

    let transition = driver.select_script("pizzas").unwrap().unwrap();
    assert_eq!(transition.from, AnimationState::Greeting);
    assert_eq!(transition.to, AnimationState::Angry);
    assert_eq!(weight(&driver, "viseme_I"), 1.0);

    for _ in 0..30 {
        driver.transport_mut().advance(1.0 / 60.0);
        driver.tick(&config, VIEWER, 1.0 / 60.0);
    }

    // The configured script is unchanged, so the selection holds
    assert_eq!(driver.loaded_script(), Some("pizzas"));
    assert_eq!(driver.transport().script(), "pizzas");
    assert!(driver.transport().is_playing());
    assert!(driver.transport().current_time() > 0.4);
    assert_eq!(driver.current_animation(), AnimationState::Angry);
}

#[test]
fn select_script_while_paused_stays_paused() {
    let mut driver = driver();
    driver.tick(&AvatarConfig::default(), VIEWER, 1.0 / 60.0);

    assert!(driver.select_script("pizzas").unwrap().is_none());
    driver.transport_mut().advance(0.5);
    driver.tick(&AvatarConfig::default(), VIEWER, 1.0 / 60.0);

    assert!(!driver.transport().is_playing());
    assert_eq!(driver.transport().current_time(), 0.0);
    assert_eq!(driver.current_animation(), AnimationState::Idle);
}

#[test]
fn config_change_overrides_selected_script() {
    let mut driver = driver();
    let mut config = AvatarConfig {
        play_audio: true,
        ..AvatarConfig::default()
    };
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    driver.select_script("pizzas").unwrap();

    config.play_audio = false;
    let report = driver.tick(&config, VIEWER, 1.0 / 60.0);

    assert!(report.script_switched);
    assert_eq!(driver.loaded_script(), Some("welcome"));
    assert_eq!(driver.current_animation(), AnimationState::Idle);
}

// ============================================================================
// Surfaces
// ============================================================================

#[test]
fn detached_surfaces_are_left_alone() {
    let mut driver = driver();
    driver.tick(&snap_config(), VIEWER, 1.0 / 60.0);

    assert_eq!(driver.surfaces().len(), 2);
    for surface in driver.surfaces().iter() {
        assert!(!surface.is_attached());
        assert!(surface.influences().is_empty());
    }
}

#[test]
fn attached_surfaces_follow_channel_weights() {
    let mut driver = driver();
    assert!(driver.attach_surface("Wolf3D_Head", HEAD_TARGETS));
    assert!(driver.attach_surface("Wolf3D_Teeth", HEAD_TARGETS));
    assert!(!driver.attach_surface("Wolf3D_Hair", HEAD_TARGETS));

    // Attaching writes the current (rest) weights right away
    let head = driver.surfaces().get("Wolf3D_Head").unwrap();
    assert_eq!(head.influence("viseme_I"), Some(1.0));

    let config = AvatarConfig {
        play_audio: true,
        ..snap_config()
    };
    driver.tick(&config, VIEWER, 1.0 / 60.0);
    driver.transport_mut().advance(0.1);
    driver.tick(&config, VIEWER, 1.0 / 60.0);

    for name in ["Wolf3D_Head", "Wolf3D_Teeth"] {
        let surface = driver.surfaces().get(name).unwrap();
        assert_eq!(surface.influence("viseme_aa"), Some(1.0), "{name}");
        assert_eq!(surface.influence("viseme_I"), Some(0.0), "{name}");
        // Not part of the viseme map
        assert_eq!(surface.influence("viseme_PP"), Some(0.0), "{name}");
    }
}

// ============================================================================
// Head Follow
// ============================================================================

fn head_forward(driver: &FrameDriver<ClockTransport>) -> Vec3 {
    let head = driver.rig().find_by_name("Head").unwrap();
    driver
        .rig()
        .world_matrix(head)
        .unwrap()
        .transform_vector3(Vec3::Z)
        .normalize()
}

#[test]
fn head_turns_toward_viewer() {
    let mut driver = driver();
    let viewer = Vec3::new(5.0, 1.6, 0.0);

    let report = driver.tick(&AvatarConfig::default(), viewer, 1.0 / 60.0);

    assert!(report.head_oriented);
    assert!((head_forward(&driver) - Vec3::X).length() < 1e-4);
}

#[test]
fn head_follow_disabled_keeps_rotation() {
    let mut driver = driver();
    let config = AvatarConfig {
        head_follow: false,
        ..AvatarConfig::default()
    };

    let report = driver.tick(&config, Vec3::new(5.0, 1.6, 0.0), 1.0 / 60.0);

    assert!(!report.head_oriented);
    assert!((head_forward(&driver) - Vec3::Z).length() < 1e-4);
}

#[test]
fn rig_without_head_bone_still_ticks() {
    let mut driver = FrameDriver::new(
        &MurmurConfig::default(),
        library(),
        clips(),
        Rig::new(),
        ClockTransport::new(),
    )
    .unwrap();

    let report = driver.tick(&AvatarConfig::default(), VIEWER, 1.0 / 60.0);
    assert!(!report.head_oriented);
}
