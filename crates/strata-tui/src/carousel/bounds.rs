//! L4 Atomic Layer: Legal scroll range for a chain snapshot

use strata_core::ChainSnapshot;

use super::config::PhysicsConfig;

/// Inclusive range the continuous position is clamped to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Bounds of an empty chain; the engine stays inert
    pub const EMPTY: Bounds = Bounds { min: 0.0, max: 0.0 };

    /// Bounds spanning two ends in either order; non-finite ends give [`Bounds::EMPTY`]
    pub fn new(a: f64, b: f64) -> Self {
        if !a.is_finite() || !b.is_finite() {
            tracing::warn!(a, b, "Non-finite bounds, carousel is inert");
            return Self::EMPTY;
        }
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Derive bounds from the reachable levels of a chain
    ///
    /// - no items: [`Bounds::EMPTY`]
    /// - no reachable items: `±fallback_range`
    /// - one reachable item: that level `± single_item_margin`
    /// - otherwise: `[min + edge_buffer, max - edge_buffer]`
    pub fn compute(chain: &ChainSnapshot, config: &PhysicsConfig) -> Self {
        if chain.is_empty() {
            return Self::EMPTY;
        }

        let mut reachable = chain.reachable_levels();
        let Some(first) = reachable.next() else {
            return Self::new(-config.fallback_range, config.fallback_range);
        };

        // Levels arrive in ascending order
        let last = reachable.last().unwrap_or(first);
        if first == last {
            let level = first as f64;
            return Self::new(level - config.single_item_margin, level + config.single_item_margin);
        }

        Self::new(first as f64 + config.edge_buffer, last as f64 - config.edge_buffer)
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max - self.min <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{ChainId, ChainItem};
    use uuid::Uuid;

    fn chain(items: Vec<ChainItem>) -> ChainSnapshot {
        ChainSnapshot::new(ChainId::default(), items)
    }

    fn item(level: i32) -> ChainItem {
        ChainItem::new(Uuid::nil(), level)
    }

    #[test]
    fn test_empty_chain() {
        let bounds = Bounds::compute(&chain(vec![]), &PhysicsConfig::default());
        assert_eq!(bounds, Bounds::EMPTY);
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_no_reachable_items_falls_back() {
        let bounds = Bounds::compute(
            &chain(vec![item(0).unreachable(), item(1).unreachable()]),
            &PhysicsConfig::default(),
        );
        assert_eq!(bounds, Bounds { min: -6.0, max: 6.0 });
    }

    #[test]
    fn test_single_item_range() {
        let bounds = Bounds::compute(&chain(vec![item(0)]), &PhysicsConfig::default());
        assert!((bounds.min + 0.1).abs() < 1e-12);
        assert!((bounds.max - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_single_reachable_among_placeholders() {
        let bounds = Bounds::compute(
            &chain(vec![item(-1).unreachable(), item(2), item(3).unreachable()]),
            &PhysicsConfig::default(),
        );
        assert!((bounds.min - 1.9).abs() < 1e-12);
        assert!((bounds.max - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_multi_item_range_is_buffered_inward() {
        let bounds = Bounds::compute(
            &chain(vec![item(-3), item(-1), item(0), item(2), item(4).unreachable()]),
            &PhysicsConfig::default(),
        );
        assert!((bounds.min + 2.95).abs() < 1e-12);
        assert!((bounds.max - 1.95).abs() < 1e-12);
    }

    #[test]
    fn test_misconfigured_ranges_stay_ordered() {
        let config = PhysicsConfig {
            fallback_range: -2.0,
            edge_buffer: 0.7,
            ..Default::default()
        };
        let fallback = Bounds::compute(&chain(vec![item(0).unreachable()]), &config);
        assert_eq!(fallback, Bounds { min: -2.0, max: 2.0 });

        let buffered = Bounds::compute(&chain(vec![item(0), item(1)]), &config);
        assert!(buffered.min <= buffered.max);
        assert!((buffered.min - 0.3).abs() < 1e-12);
        assert!((buffered.max - 0.7).abs() < 1e-12);
        assert_eq!(buffered.clamp(5.0), buffered.max);
    }

    #[test]
    fn test_non_finite_config_is_inert() {
        let config = PhysicsConfig {
            single_item_margin: f64::NAN,
            ..Default::default()
        };
        let bounds = Bounds::compute(&chain(vec![item(2)]), &config);
        assert_eq!(bounds, Bounds::EMPTY);
        assert_eq!(bounds.clamp(1.5), 0.0);
    }

    #[test]
    fn test_clamp_and_contains() {
        let bounds = Bounds { min: -1.0, max: 2.0 };
        assert_eq!(bounds.clamp(-5.0), -1.0);
        assert_eq!(bounds.clamp(5.0), 2.0);
        assert_eq!(bounds.clamp(0.5), 0.5);
        assert!(bounds.contains(2.0));
        assert!(!bounds.contains(2.01));
    }
}
