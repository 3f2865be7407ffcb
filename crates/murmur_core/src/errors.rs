//! Error Types
//!
//! [`MurmurError`] covers the load-time failure modes of the lipsync core:
//! - cue data that cannot be parsed or references unknown visemes
//! - incomplete viseme maps and clip registries
//! - configuration that selects things that do not exist
//!
//! Per-frame operations never return errors. Transient absence of runtime
//! resources (a mesh without morph targets yet) degrades to a no-op for that
//! frame instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MurmurError {
    // ========================================================================
    // Cue Data Errors
    // ========================================================================
    /// A cue or map entry references a symbol outside the viseme alphabet.
    #[error("Unknown viseme symbol {symbol:?}{}", cue_index.map(|i| format!(" in cue #{i}")).unwrap_or_default())]
    UnknownSymbol {
        symbol: String,
        /// Position of the offending cue in the file, when known
        cue_index: Option<usize>,
    },

    /// The cue file is not structurally valid.
    #[error("Malformed cue data: {0}")]
    MalformedCueData(String),

    /// A cue whose window is inverted or not a finite number.
    #[error("Invalid cue window #{index}: start {start} > end {end} or not finite")]
    InvalidCueWindow { index: usize, start: f32, end: f32 },

    // ========================================================================
    // Mesh Binding Errors
    // ========================================================================
    /// The surface has no morph target dictionary attached yet.
    #[error("Surface {0:?} has no morph target dictionary")]
    MissingChannelDictionary(String),

    /// A custom viseme map leaves a symbol unmapped.
    #[error("Viseme map is incomplete: symbol {0} has no channel")]
    IncompleteVisemeMap(String),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// Crossfading needs at least two clips.
    #[error("At least two animation clips must be registered, found {found}")]
    NotEnoughClips { found: usize },

    /// A state has no registered clip.
    #[error("No animation clip registered for state {0}")]
    MissingClip(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The selected script is not in the script table.
    #[error("Unknown script selection: {0:?}")]
    UnknownScript(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // I/O & Parsing Errors
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, MurmurError>`.
pub type Result<T> = std::result::Result<T, MurmurError>;
