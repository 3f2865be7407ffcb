use smallvec::SmallVec;

use crate::map::VisemeMap;

/// Per-channel viseme weights, indexed like [`VisemeMap::channels`].
///
/// This is the explicit state object threaded through the blender: the frame
/// driver owns it between ticks, the blender produces the next one, and the
/// face surfaces copy it into their morph target influences.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelWeights {
    values: SmallVec<[f32; 9]>,
}

impl ChannelWeights {
    /// Every channel at 0.
    #[must_use]
    pub fn zeroed(map: &VisemeMap) -> Self {
        Self {
            values: SmallVec::from_elem(0.0, map.channel_count()),
        }
    }

    /// Neutral mouth: the rest channel at full weight, everything else at 0.
    #[must_use]
    pub fn rest_pose(map: &VisemeMap) -> Self {
        let mut weights = Self::zeroed(map);
        weights.values[map.rest_channel()] = 1.0;
        weights
    }

    #[inline]
    #[must_use]
    pub fn get(&self, channel: usize) -> Option<f32> {
        self.values.get(channel).copied()
    }

    /// Weight of a channel by name; `None` if the map does not drive it.
    #[must_use]
    pub fn weight(&self, map: &VisemeMap, name: &str) -> Option<f32> {
        map.index_of(name).and_then(|i| self.get(i))
    }

    #[inline]
    pub fn set(&mut self, channel: usize, weight: f32) {
        if let Some(value) = self.values.get_mut(channel) {
            *value = weight.clamp(0.0, 1.0);
        }
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Channel with the largest non-zero weight.
    #[must_use]
    pub fn dominant(&self) -> Option<(usize, f32)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, w)| w > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Whether these weights can be used with `map` as-is.
    #[inline]
    #[must_use]
    pub fn matches(&self, map: &VisemeMap) -> bool {
        self.values.len() == map.channel_count()
    }
}
