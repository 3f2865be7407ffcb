use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use murmur_core::{MurmurError, Result};
use serde::Deserialize;

use crate::symbol::VisemeSymbol;

/// A window of playback time during which one viseme should dominate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthCue {
    /// Seconds from the start of the audio track
    pub start: f32,
    pub end: f32,
    pub symbol: VisemeSymbol,
}

impl MouthCue {
    #[must_use]
    pub const fn new(start: f32, end: f32, symbol: VisemeSymbol) -> Self {
        Self { start, end, symbol }
    }

    /// Closed interval test: both ends are inside the window.
    #[inline]
    #[must_use]
    pub fn contains(&self, time: f32) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Optional header of a cue file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CueMetadata {
    #[serde(default)]
    pub sound_file: Option<String>,
    #[serde(default)]
    pub duration: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CueFile {
    #[serde(default)]
    metadata: CueMetadata,
    mouth_cues: Vec<RawCue>,
}

#[derive(Deserialize)]
struct RawCue {
    start: f32,
    end: f32,
    value: String,
}

/// The cues of one audio asset, kept in storage order.
///
/// Immutable once built. Lookup returns the first cue in storage order whose
/// closed window contains the queried time. Tracks that are sorted and free of
/// overlaps (touching ends allowed) are detected at construction and served by
/// binary search, which yields the same answer as the linear first-match scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueTrack {
    cues: Vec<MouthCue>,
    metadata: CueMetadata,
    ordered: bool,
}

impl CueTrack {
    /// Builds a track from already-typed cues, validating every window.
    pub fn new(cues: Vec<MouthCue>) -> Result<Self> {
        Self::with_metadata(cues, CueMetadata::default())
    }

    pub fn with_metadata(cues: Vec<MouthCue>, metadata: CueMetadata) -> Result<Self> {
        for (index, cue) in cues.iter().enumerate() {
            if !cue.start.is_finite() || !cue.end.is_finite() || cue.start > cue.end {
                return Err(MurmurError::InvalidCueWindow {
                    index,
                    start: cue.start,
                    end: cue.end,
                });
            }
        }

        let ordered = cues.windows(2).all(|pair| pair[0].end <= pair[1].start);
        debug!(
            "Cue track with {} cues ({})",
            cues.len(),
            if ordered { "ordered" } else { "overlapping or unsorted" }
        );

        Ok(Self {
            cues,
            metadata,
            ordered,
        })
    }

    /// A track without cues. Every frame only decays.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ordered: true,
            ..Self::default()
        }
    }

    /// Parses a cue file:
    ///
    /// ```json
    /// { "metadata": { "soundFile": "welcome.ogg", "duration": 2.1 },
    ///   "mouthCues": [ { "start": 0.0, "end": 0.3, "value": "X" } ] }
    /// ```
    ///
    /// Structural failures are fatal; no partial track is returned.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CueFile =
            serde_json::from_str(json).map_err(|e| MurmurError::MalformedCueData(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: CueFile = serde_json::from_reader(reader)
            .map_err(|e| MurmurError::MalformedCueData(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_file(file: CueFile) -> Result<Self> {
        let cues = file
            .mouth_cues
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let symbol = raw.value.parse::<VisemeSymbol>().map_err(|_| {
                    MurmurError::UnknownSymbol {
                        symbol: raw.value.clone(),
                        cue_index: Some(index),
                    }
                })?;
                Ok(MouthCue::new(raw.start, raw.end, symbol))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::with_metadata(cues, file.metadata)
    }

    /// First cue in storage order whose window contains `time`.
    #[must_use]
    pub fn active_cue(&self, time: f32) -> Option<&MouthCue> {
        if self.ordered {
            // Ends are non-decreasing: the first cue not yet over is the only
            // candidate, and it wins over every later cue touching it.
            let index = self.cues.partition_point(|cue| cue.end < time);
            self.cues.get(index).filter(|cue| cue.start <= time)
        } else {
            self.cues.iter().find(|cue| cue.contains(time))
        }
    }

    /// Declared duration, falling back to the end of the last cue.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.metadata.duration.unwrap_or_else(|| {
            self.cues
                .iter()
                .map(|cue| cue.end)
                .fold(0.0_f32, f32::max)
        })
    }

    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &CueMetadata {
        &self.metadata
    }

    /// Whether lookups take the binary-search path.
    #[inline]
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    #[inline]
    #[must_use]
    pub fn cues(&self) -> &[MouthCue] {
        &self.cues
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
