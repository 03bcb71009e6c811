//! Lifecycle of the floating labels produced by actions.

use snow_day_core::{CellCoord, EffectSnapshot};

/// A single floating label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Effect {
    origin: CellCoord,
    elevation: u32,
    label: String,
    remaining: u32,
}

impl Effect {
    fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot {
            origin: self.origin,
            elevation: self.elevation,
            label: self.label.clone(),
            remaining: self.remaining,
        }
    }
}

/// Unordered collection of live effects.
#[derive(Clone, Debug, Default)]
pub(crate) struct EffectTimeline {
    effects: Vec<Effect>,
}

impl EffectTimeline {
    /// Adds a label rising from `origin`, starting `elevation` units above it.
    pub(crate) fn emit(&mut self, origin: CellCoord, elevation: u32, label: String, lifetime: u32) {
        if lifetime == 0 {
            return;
        }
        self.effects.push(Effect {
            origin,
            elevation,
            label,
            remaining: lifetime,
        });
    }

    /// Advances every effect by one tick, dropping the ones that expire.
    pub(crate) fn age(&mut self) {
        for effect in &mut self.effects {
            effect.remaining = effect.remaining.saturating_sub(1);
            effect.elevation = effect.elevation.saturating_add(1);
        }
        self.effects.retain(|effect| effect.remaining > 0);
    }

    pub(crate) fn clear(&mut self) {
        self.effects.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.effects.len()
    }

    pub(crate) fn snapshots(&self) -> Vec<EffectSnapshot> {
        self.effects.iter().map(Effect::snapshot).collect()
    }
}
