//! Abstraction chain snapshot consumed by the carousel engine.
//!
//! A chain is an ordered run of concept generalizations and specializations,
//! indexed by signed level with level 0 as the focused concept. The engine
//! treats each snapshot as immutable; a new snapshot identity resets physics.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Rendered size of a chain item in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSize {
    pub width: f64,
    pub height: f64,
}

impl ItemSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Linear blend between two sizes
    pub fn lerp(self, other: ItemSize, t: f64) -> ItemSize {
        ItemSize {
            width: self.width + (other.width - self.width) * t,
            height: self.height + (other.height - self.height) * t,
        }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// One entry of the abstraction chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainItem {
    /// Underlying concept
    pub concept_id: Uuid,
    /// 0 = focus item, negative = more specific, positive = more general
    pub level: i32,
    /// Unreachable placeholders are excluded from bounds and stepping
    #[serde(default = "default_true")]
    pub reachable: bool,
    /// Recorded size, if the presentation layer has measured one
    #[serde(default)]
    pub size: Option<ItemSize>,
    /// Display label (presentation only)
    #[serde(default)]
    pub label: String,
}

impl ChainItem {
    pub fn new(concept_id: Uuid, level: i32) -> Self {
        Self {
            concept_id,
            level,
            reachable: true,
            size: None,
            label: String::new(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(ItemSize::new(width, height));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }
}

/// Identity of a chain snapshot: focused concept plus the active dimension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId {
    pub concept_id: Uuid,
    #[serde(default = "default_dimension")]
    pub dimension: String,
}

impl ChainId {
    pub fn new(concept_id: Uuid, dimension: impl Into<String>) -> Self {
        Self {
            concept_id,
            dimension: dimension.into(),
        }
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::new(Uuid::nil(), default_dimension())
    }
}

/// Immutable, level-ordered chain snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChainSnapshot {
    id: ChainId,
    items: Vec<ChainItem>,
}

impl ChainSnapshot {
    /// Build a snapshot, ordering items by level.
    ///
    /// Levels are unique within a snapshot: later duplicates are dropped.
    /// Sizes that are negative or non-finite are discarded so consumers
    /// fall back to their defaults.
    pub fn new(id: ChainId, mut items: Vec<ChainItem>) -> Self {
        items.sort_by_key(|item| item.level);

        let mut deduped: Vec<ChainItem> = Vec::with_capacity(items.len());
        for mut item in items {
            if deduped.last().is_some_and(|prev| prev.level == item.level) {
                tracing::warn!(
                    "Duplicate chain level {} for concept {}, ignoring",
                    item.level,
                    item.concept_id
                );
                continue;
            }
            if item.size.is_some_and(|size| !size.is_valid()) {
                tracing::warn!("Invalid size for chain level {}, using default", item.level);
                item.size = None;
            }
            deduped.push(item);
        }

        Self { id, items: deduped }
    }

    pub fn id(&self) -> &ChainId {
        &self.id
    }

    pub fn items(&self) -> &[ChainItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Item recorded at exactly this level
    pub fn item_at(&self, level: i32) -> Option<&ChainItem> {
        self.items
            .binary_search_by_key(&level, |item| item.level)
            .ok()
            .map(|idx| &self.items[idx])
    }

    /// Levels of reachable items, ascending
    pub fn reachable_levels(&self) -> impl Iterator<Item = i32> + '_ {
        self.items
            .iter()
            .filter(|item| item.reachable)
            .map(|item| item.level)
    }

    /// Lowest level present (reachable or not)
    pub fn min_level(&self) -> Option<i32> {
        self.items.first().map(|item| item.level)
    }

    /// Highest level present (reachable or not)
    pub fn max_level(&self) -> Option<i32> {
        self.items.last().map(|item| item.level)
    }

    /// Parse a chain document.
    ///
    /// Accepts either `{ "id": {...}, "items": [...] }` or a bare item array,
    /// in which case the snapshot gets a default identity.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let doc: ChainDocument = serde_json::from_str(content).map_err(|e| {
            if e.is_data() {
                Error::ChainParse(e.to_string())
            } else {
                Error::Json(e)
            }
        })?;

        Ok(match doc {
            ChainDocument::Full { id, items } => Self::new(id, items),
            ChainDocument::Items(items) => Self::new(ChainId::default(), items),
        })
    }

    /// Load a chain document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize back into the full document form
    pub fn to_json_string(&self) -> Result<String> {
        let doc = ChainDocumentRef {
            id: &self.id,
            items: &self.items,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChainDocument {
    Full {
        #[serde(default)]
        id: ChainId,
        items: Vec<ChainItem>,
    },
    Items(Vec<ChainItem>),
}

#[derive(Serialize)]
struct ChainDocumentRef<'a> {
    id: &'a ChainId,
    items: &'a [ChainItem],
}

fn default_true() -> bool {
    true
}

fn default_dimension() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(level: i32) -> ChainItem {
        ChainItem::new(Uuid::nil(), level)
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let chain = ChainSnapshot::new(
            ChainId::default(),
            vec![item(2), item(-1), item(0), item(2).with_label("dup")],
        );
        let levels: Vec<i32> = chain.items().iter().map(|i| i.level).collect();
        assert_eq!(levels, vec![-1, 0, 2]);
        assert_eq!(chain.item_at(2).map(|i| i.label.as_str()), Some(""));
        assert!(chain.item_at(1).is_none());
    }

    #[test]
    fn test_invalid_size_dropped() {
        let chain = ChainSnapshot::new(
            ChainId::default(),
            vec![item(0).with_size(-5.0, 10.0), item(1).with_size(f64::NAN, 1.0)],
        );
        assert!(chain.items().iter().all(|i| i.size.is_none()));
    }

    #[test]
    fn test_reachable_levels_and_extent() {
        let chain = ChainSnapshot::new(
            ChainId::default(),
            vec![item(-2).unreachable(), item(0), item(3)],
        );
        assert_eq!(chain.reachable_levels().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(chain.min_level(), Some(-2));
        assert_eq!(chain.max_level(), Some(3));
    }

    #[test]
    fn test_parse_full_document() {
        let json = r#"{
            "id": { "concept_id": "00000000-0000-0000-0000-000000000001", "dimension": "taxonomy" },
            "items": [
                { "concept_id": "00000000-0000-0000-0000-000000000002", "level": 1, "label": "Animal" },
                { "concept_id": "00000000-0000-0000-0000-000000000001", "level": 0,
                  "size": { "width": 120.0, "height": 80.0 } },
                { "concept_id": "00000000-0000-0000-0000-000000000003", "level": -1, "reachable": false }
            ]
        }"#;
        let chain = ChainSnapshot::from_json_str(json).unwrap();
        assert_eq!(chain.id().dimension, "taxonomy");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.item_at(0).unwrap().size, Some(ItemSize::new(120.0, 80.0)));
        assert!(!chain.item_at(-1).unwrap().reachable);
        assert_eq!(chain.item_at(1).unwrap().label, "Animal");
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[{ "concept_id": "00000000-0000-0000-0000-000000000000", "level": 0 }]"#;
        let chain = ChainSnapshot::from_json_str(json).unwrap();
        assert_eq!(chain.id(), &ChainId::default());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let err = ChainSnapshot::from_json_str(r#"{ "levels": 3 }"#).unwrap_err();
        assert!(matches!(err, Error::ChainParse(_)));

        let err = ChainSnapshot::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_identity() {
        let chain = ChainSnapshot::new(
            ChainId::new(Uuid::nil(), "parts"),
            vec![item(0).with_label("Wheel"), item(1)],
        );
        let text = chain.to_json_string().unwrap();
        assert_eq!(ChainSnapshot::from_json_str(&text).unwrap(), chain);
    }

    #[test]
    fn test_lerp_size() {
        let a = ItemSize::new(100.0, 50.0);
        let b = ItemSize::new(200.0, 150.0);
        assert_eq!(a.lerp(b, 0.5), ItemSize::new(150.0, 100.0));
    }
}
