use std::collections::BTreeMap;
use std::fmt;

use murmur_core::{MurmurError, Result};
use serde::{Deserialize, Serialize};

use crate::symbol::VisemeSymbol;

/// Name of a morph target channel on the face meshes, e.g. `viseme_aa`.
///
/// Channel names come from the mesh asset. The core only looks them up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(Box<str>);

impl ChannelName {
    #[must_use]
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ChannelName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ChannelName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Immutable mapping from viseme symbol to morph target channel.
///
/// Several symbols may share one channel. Channels are stored once each, in
/// order of first appearance, and every symbol is pre-resolved to a dense
/// channel index so that the per-frame path never touches strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct VisemeMap {
    channels: Vec<ChannelName>,
    by_symbol: [usize; VisemeSymbol::COUNT],
}

impl VisemeMap {
    /// The table shipped with the Ready Player Me style avatars.
    #[must_use]
    pub fn standard() -> Self {
        const TABLE: [(VisemeSymbol, &str); VisemeSymbol::COUNT] = [
            (VisemeSymbol::A, "viseme_FF"),
            (VisemeSymbol::B, "viseme_SS"),
            (VisemeSymbol::C, "viseme_E"),
            (VisemeSymbol::D, "viseme_aa"),
            (VisemeSymbol::E, "viseme_RR"),
            (VisemeSymbol::F, "viseme_DD"),
            (VisemeSymbol::G, "viseme_O"),
            (VisemeSymbol::H, "viseme_aa"),
            (VisemeSymbol::X, "viseme_I"),
        ];

        let mut channels: Vec<ChannelName> = Vec::with_capacity(TABLE.len());
        let mut by_symbol = [0; VisemeSymbol::COUNT];
        for (symbol, name) in TABLE {
            by_symbol[symbol.index()] = intern_channel(&mut channels, name);
        }

        Self {
            channels,
            by_symbol,
        }
    }

    /// Builds a map from explicit pairs. Every symbol must appear exactly once.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (VisemeSymbol, S)>,
        S: AsRef<str>,
    {
        let mut channels: Vec<ChannelName> = Vec::new();
        let mut by_symbol: [Option<usize>; VisemeSymbol::COUNT] = [None; VisemeSymbol::COUNT];

        for (symbol, name) in pairs {
            let slot = &mut by_symbol[symbol.index()];
            if slot.is_some() {
                return Err(MurmurError::InvalidConfig(format!(
                    "viseme symbol {symbol} is mapped more than once"
                )));
            }
            *slot = Some(intern_channel(&mut channels, name.as_ref()));
        }

        let mut resolved = [0; VisemeSymbol::COUNT];
        for symbol in VisemeSymbol::ALL {
            resolved[symbol.index()] = by_symbol[symbol.index()]
                .ok_or_else(|| MurmurError::IncompleteVisemeMap(symbol.to_string()))?;
        }

        Ok(Self {
            channels,
            by_symbol: resolved,
        })
    }

    #[inline]
    #[must_use]
    pub fn lookup(&self, symbol: VisemeSymbol) -> &ChannelName {
        &self.channels[self.by_symbol[symbol.index()]]
    }

    /// Checked lookup for raw symbols arriving from outside the crate.
    pub fn lookup_str(&self, symbol: &str) -> Result<&ChannelName> {
        let symbol: VisemeSymbol = symbol.parse()?;
        Ok(self.lookup(symbol))
    }

    /// Dense index of the channel `symbol` drives.
    #[inline]
    #[must_use]
    pub fn channel_index(&self, symbol: VisemeSymbol) -> usize {
        self.by_symbol[symbol.index()]
    }

    /// Index of a channel by name, if the map drives it.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c == name)
    }

    /// Distinct channels, indexed the same way as [`ChannelWeights`](crate::ChannelWeights).
    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[ChannelName] {
        &self.channels
    }

    #[inline]
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Channel driven by the rest symbol `X`.
    #[inline]
    #[must_use]
    pub fn rest_channel(&self) -> usize {
        self.channel_index(VisemeSymbol::X)
    }
}

impl Default for VisemeMap {
    fn default() -> Self {
        Self::standard()
    }
}

fn intern_channel(channels: &mut Vec<ChannelName>, name: &str) -> usize {
    if let Some(i) = channels.iter().position(|c| c == name) {
        return i;
    }
    channels.push(ChannelName::new(name));
    channels.len() - 1
}

impl TryFrom<BTreeMap<String, String>> for VisemeMap {
    type Error = MurmurError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self> {
        let pairs = raw
            .into_iter()
            .map(|(symbol, channel)| Ok((symbol.parse::<VisemeSymbol>()?, channel)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_pairs(pairs)
    }
}

impl From<VisemeMap> for BTreeMap<String, String> {
    fn from(map: VisemeMap) -> Self {
        VisemeSymbol::ALL
            .into_iter()
            .map(|symbol| (symbol.to_string(), map.lookup(symbol).to_string()))
            .collect()
    }
}
