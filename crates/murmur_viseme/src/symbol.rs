use std::fmt;
use std::str::FromStr;

use murmur_core::MurmurError;
use serde::{Deserialize, Serialize};

/// The closed viseme alphabet used by cue files.
///
/// Nine mouth-shape classes, `A` through `H` plus the rest shape `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VisemeSymbol {
    /// Closed mouth (P, B, M)
    A,
    /// Slightly open, clenched teeth (K, S, T, EE)
    B,
    /// Open mouth (EH, AE)
    C,
    /// Wide open mouth (AA)
    D,
    /// Slightly rounded (AO, ER)
    E,
    /// Puckered (UW, OW, W)
    F,
    /// Upper teeth on lower lip (F, V)
    G,
    /// Tongue raised (long L)
    H,
    /// Idle / rest
    X,
}

impl VisemeSymbol {
    pub const COUNT: usize = 9;

    pub const ALL: [VisemeSymbol; Self::COUNT] = [
        VisemeSymbol::A,
        VisemeSymbol::B,
        VisemeSymbol::C,
        VisemeSymbol::D,
        VisemeSymbol::E,
        VisemeSymbol::F,
        VisemeSymbol::G,
        VisemeSymbol::H,
        VisemeSymbol::X,
    ];

    /// Dense index in `0..COUNT`, matching the order of [`Self::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VisemeSymbol::A => "A",
            VisemeSymbol::B => "B",
            VisemeSymbol::C => "C",
            VisemeSymbol::D => "D",
            VisemeSymbol::E => "E",
            VisemeSymbol::F => "F",
            VisemeSymbol::G => "G",
            VisemeSymbol::H => "H",
            VisemeSymbol::X => "X",
        }
    }
}

impl fmt::Display for VisemeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisemeSymbol {
    type Err = MurmurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisemeSymbol::ALL
            .into_iter()
            .find(|symbol| symbol.as_str() == s)
            .ok_or_else(|| MurmurError::UnknownSymbol {
                symbol: s.to_string(),
                cue_index: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, symbol) in VisemeSymbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
        }
    }

    #[test]
    fn parses_every_symbol() {
        for symbol in VisemeSymbol::ALL {
            assert_eq!(symbol.as_str().parse::<VisemeSymbol>().unwrap(), symbol);
        }
    }

    #[test]
    fn rejects_symbols_outside_alphabet() {
        for bad in ["I", "a", "", "AA", " X"] {
            let err = bad.parse::<VisemeSymbol>().unwrap_err();
            assert!(matches!(err, MurmurError::UnknownSymbol { .. }), "{bad:?}");
        }
    }
}
