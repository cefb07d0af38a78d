//! L4 Atomic Layer: Pixel offsets for non-uniformly sized chain items
//!
//! Items differ in size, so the distance between neighbouring levels is not
//! constant. The table records the cumulative offset of every present level from
//! level 0 along the scroll axis.

use std::collections::BTreeMap;

use strata_core::ChainSnapshot;

use super::config::{LayoutConfig, LayoutConfigExt};
use super::timing::{bracket, lerp};

/// Sparse level -> offset table
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTable {
    offsets: BTreeMap<i32, f64>,
    /// Step used for gaps and for levels beyond the table
    uniform_step: f64,
}

impl LayoutTable {
    pub fn build(chain: &ChainSnapshot, config: &LayoutConfig) -> Self {
        let default_extent = config.extent(config.default_size());
        let uniform_step = default_extent + config.spacing;

        let extent_at = |level: i32| -> Option<f64> {
            chain
                .item_at(level)
                .map(|item| config.extent(item.size.unwrap_or_else(|| config.default_size())))
        };

        let mut offsets = BTreeMap::new();
        offsets.insert(0, 0.0);

        // Only present levels are recorded; runs of missing levels cost one
        // uniform step each and are resolved in `offset`
        let upward = chain.items().iter().filter(|item| item.level > 0);
        let downward = chain.items().iter().rev().filter(|item| item.level < 0);
        for (dir, items) in [
            (1.0, upward.collect::<Vec<_>>()),
            (-1.0, downward.collect::<Vec<_>>()),
        ] {
            let mut prev_level = 0i32;
            let mut prev_offset = 0.0;
            let mut prev_extent = extent_at(0).unwrap_or(default_extent);
            for item in items {
                let gap = (item.level as f64 - prev_level as f64).abs() - 1.0;
                if gap > 0.0 {
                    prev_offset += gap * uniform_step * dir;
                    prev_extent = default_extent;
                }
                let extent = config.extent(item.size.unwrap_or_else(|| config.default_size()));
                prev_offset += (prev_extent / 2.0 + extent / 2.0 + config.spacing) * dir;
                prev_extent = extent;
                prev_level = item.level;
                offsets.insert(item.level, prev_offset);
            }
        }

        Self {
            offsets,
            uniform_step,
        }
    }

    /// Offset of an integer level from level 0
    ///
    /// Missing levels, inside the chain or beyond it, continue from the
    /// nearest recorded level on the side of level 0 with the uniform step.
    pub fn offset(&self, level: i32) -> f64 {
        if let Some(offset) = self.offsets.get(&level) {
            return *offset;
        }

        if level > 0 {
            let (&anchor, &anchor_offset) =
                self.offsets.range(..level).next_back().unwrap_or((&0, &0.0));
            anchor_offset + (level as f64 - anchor as f64) * self.uniform_step
        } else {
            let (&anchor, &anchor_offset) =
                self.offsets.range(level..).next().unwrap_or((&0, &0.0));
            anchor_offset - (anchor as f64 - level as f64) * self.uniform_step
        }
    }

    /// Offset at a continuous position, blended between the bracketing levels
    pub fn offset_at(&self, position: f64) -> f64 {
        let (floor, ceil, fraction) = bracket(position);
        if floor == ceil {
            return self.offset(floor);
        }
        lerp(self.offset(floor), self.offset(ceil), fraction)
    }

    /// Number of levels with a recorded offset
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn uniform_step(&self) -> f64 {
        self.uniform_step
    }
}
