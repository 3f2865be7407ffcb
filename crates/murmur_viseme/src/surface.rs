use log::{info, trace};
use murmur_core::{MurmurError, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::map::VisemeMap;
use crate::weights::ChannelWeights;

/// A mesh that exposes morph targets by name (the head, the teeth, ...).
///
/// A surface can exist before its mesh asset has loaded; until then it has no
/// dictionary and every write to it is skipped.
#[derive(Debug, Clone)]
pub struct MorphSurface {
    name: String,
    dictionary: Option<FxHashMap<String, usize>>,
    influences: Vec<f32>,
}

impl MorphSurface {
    /// A surface whose morph targets are already known, all at weight 0.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, target_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut surface = Self::detached(name);
        surface.attach(target_names);
        surface
    }

    /// A surface whose mesh has not been attached yet.
    #[must_use]
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dictionary: None,
            influences: Vec::new(),
        }
    }

    /// Installs the morph target dictionary. Influences are reset to 0.
    pub fn attach<I, S>(&mut self, target_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dictionary: FxHashMap<String, usize> = target_names
            .into_iter()
            .enumerate()
            .map(|(slot, name)| (name.into(), slot))
            .collect();
        self.influences = vec![0.0; dictionary.len()];
        self.dictionary = Some(dictionary);
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.dictionary.is_some()
    }

    pub fn dictionary(&self) -> Result<&FxHashMap<String, usize>> {
        self.dictionary
            .as_ref()
            .ok_or_else(|| MurmurError::MissingChannelDictionary(self.name.clone()))
    }

    #[inline]
    #[must_use]
    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    /// Current influence of a morph target by name.
    #[must_use]
    pub fn influence(&self, target: &str) -> Option<f32> {
        let slot = *self.dictionary.as_ref()?.get(target)?;
        self.influences.get(slot).copied()
    }
}

/// Morph target slot of every viseme channel on one surface.
///
/// Resolved once when the surface is bound, so that per-frame writes are plain
/// indexed stores. `None` marks a channel the surface does not define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSlots {
    slots: SmallVec<[Option<usize>; 9]>,
}

impl SurfaceSlots {
    pub fn resolve(map: &VisemeMap, surface: &MorphSurface) -> Result<Self> {
        let dictionary = surface.dictionary()?;
        Ok(Self {
            slots: map
                .channels()
                .iter()
                .map(|channel| dictionary.get(channel.as_str()).copied())
                .collect(),
        })
    }

    #[inline]
    #[must_use]
    pub fn slot(&self, channel: usize) -> Option<usize> {
        self.slots.get(channel).copied().flatten()
    }

    /// Number of channels this surface can display.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[derive(Debug, Clone)]
struct BoundSurface {
    surface: MorphSurface,
    slots: Option<SurfaceSlots>,
}

/// The set of face meshes that must show the same viseme weights.
///
/// Every surface receives the same weight for a channel. A surface missing a
/// channel simply ignores it; a surface without a dictionary ignores the whole
/// frame.
#[derive(Debug, Clone, Default)]
pub struct FaceSurfaces {
    surfaces: SmallVec<[BoundSurface; 2]>,
}

impl FaceSurfaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface and resolves its slots against `map` if it is attached.
    pub fn push(&mut self, surface: MorphSurface, map: &VisemeMap) {
        let slots = SurfaceSlots::resolve(map, &surface).ok();
        if let Some(slots) = &slots {
            info!(
                "Bound surface {:?}: {}/{} viseme channels",
                surface.name(),
                slots.bound_count(),
                map.channel_count()
            );
        }
        self.surfaces.push(BoundSurface { surface, slots });
    }

    /// Attaches morph targets to a surface that was added detached and binds it.
    ///
    /// Returns `false` if no surface has that name.
    pub fn attach<I, S>(&mut self, name: &str, target_names: I, map: &VisemeMap) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(bound) = self.surfaces.iter_mut().find(|b| b.surface.name() == name) else {
            return false;
        };
        bound.surface.attach(target_names);
        bound.slots = SurfaceSlots::resolve(map, &bound.surface).ok();
        if let Some(slots) = &bound.slots {
            info!(
                "Attached surface {name:?}: {}/{} viseme channels",
                slots.bound_count(),
                map.channel_count()
            );
        }
        true
    }

    /// Re-resolves every surface, e.g. after the viseme map changed.
    pub fn rebind(&mut self, map: &VisemeMap) {
        for bound in &mut self.surfaces {
            bound.slots = SurfaceSlots::resolve(map, &bound.surface).ok();
        }
    }

    /// Writes `weights` into every bound surface.
    pub fn apply(&mut self, weights: &ChannelWeights) {
        for bound in &mut self.surfaces {
            let Some(slots) = &bound.slots else {
                trace!("Surface {:?} not attached, skipping", bound.surface.name());
                continue;
            };
            for (channel, &weight) in weights.as_slice().iter().enumerate() {
                if let Some(slot) = slots.slot(channel)
                    && let Some(influence) = bound.surface.influences.get_mut(slot)
                {
                    *influence = weight;
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MorphSurface> {
        self.surfaces
            .iter()
            .map(|b| &b.surface)
            .find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MorphSurface> {
        self.surfaces.iter().map(|b| &b.surface)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD_TARGETS: [&str; 5] = ["eyeBlinkLeft", "viseme_I", "viseme_aa", "viseme_O", "viseme_FF"];

    #[test]
    fn detached_surface_reports_missing_dictionary() {
        let surface = MorphSurface::detached("Wolf3D_Head");
        assert!(matches!(
            surface.dictionary(),
            Err(MurmurError::MissingChannelDictionary(ref name)) if name == "Wolf3D_Head"
        ));
        assert!(SurfaceSlots::resolve(&VisemeMap::standard(), &surface).is_err());
    }

    #[test]
    fn slots_only_cover_defined_channels() {
        let map = VisemeMap::standard();
        let surface = MorphSurface::new("Wolf3D_Head", HEAD_TARGETS);
        let slots = SurfaceSlots::resolve(&map, &surface).unwrap();

        assert_eq!(slots.bound_count(), 4);
        let aa = map.index_of("viseme_aa").unwrap();
        assert_eq!(slots.slot(aa), Some(2));
        let ss = map.index_of("viseme_SS").unwrap();
        assert_eq!(slots.slot(ss), None);
    }

    #[test]
    fn apply_leaves_non_viseme_targets_alone() {
        let map = VisemeMap::standard();
        let mut faces = FaceSurfaces::new();
        faces.push(MorphSurface::new("Wolf3D_Head", HEAD_TARGETS), &map);

        faces.apply(&ChannelWeights::rest_pose(&map));

        let head = faces.get("Wolf3D_Head").unwrap();
        assert_eq!(head.influence("viseme_I"), Some(1.0));
        assert_eq!(head.influence("viseme_aa"), Some(0.0));
        assert_eq!(head.influence("eyeBlinkLeft"), Some(0.0));
    }

    #[test]
    fn late_attach_binds_surface() {
        let map = VisemeMap::standard();
        let mut faces = FaceSurfaces::new();
        faces.push(MorphSurface::detached("Wolf3D_Teeth"), &map);

        let rest = ChannelWeights::rest_pose(&map);
        faces.apply(&rest);
        assert!(faces.get("Wolf3D_Teeth").unwrap().influences().is_empty());

        assert!(faces.attach("Wolf3D_Teeth", ["viseme_I", "viseme_aa"], &map));
        assert!(!faces.attach("Wolf3D_Body", ["viseme_I"], &map));

        faces.apply(&rest);
        assert_eq!(faces.get("Wolf3D_Teeth").unwrap().influence("viseme_I"), Some(1.0));
    }
}
