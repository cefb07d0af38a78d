pub mod config;
pub mod run;
pub mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use strata_core::{AppConfig, ChainId, ChainItem, ChainSnapshot};
use uuid::Uuid;

/// Resolve the chain to show: explicit path, then the configured file, then the demo
pub fn load_chain(config: &AppConfig, path: Option<PathBuf>) -> Result<(ChainSnapshot, Option<PathBuf>)> {
    match path.or_else(|| config.chain_file()) {
        Some(path) => {
            let chain = ChainSnapshot::load(&path)
                .with_context(|| format!("loading chain from {}", path.display()))?;
            tracing::info!(path = %path.display(), items = chain.len(), "Loaded chain");
            Ok((chain, Some(path)))
        }
        None => {
            tracing::info!("No chain file given, using the demo chain");
            Ok((demo_chain(), None))
        }
    }
}

/// Taxonomy chain around "Dog"; "Mammal" is listed but not reachable
pub fn demo_chain() -> ChainSnapshot {
    let concept = |n: u128| Uuid::from_u128(0x5354_5241_5441_0000 + n);
    ChainSnapshot::new(
        ChainId::new(concept(0), "taxonomy"),
        vec![
            ChainItem::new(concept(1), -2).with_label("Toy Poodle").with_size(140.0, 96.0),
            ChainItem::new(concept(2), -1).with_label("Poodle").with_size(170.0, 112.0),
            ChainItem::new(concept(0), 0).with_label("Dog").with_size(220.0, 144.0),
            ChainItem::new(concept(3), 1).with_label("Canine").with_size(200.0, 128.0),
            ChainItem::new(concept(4), 2).with_label("Carnivore").with_size(240.0, 128.0),
            ChainItem::new(concept(5), 3).with_label("Mammal").unreachable(),
            ChainItem::new(concept(6), 4).with_label("Animal").with_size(180.0, 160.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_chain_shape() {
        let chain = demo_chain();
        assert_eq!(chain.min_level(), Some(-2));
        assert_eq!(chain.max_level(), Some(4));
        assert_eq!(chain.item_at(0).map(|i| i.label.as_str()), Some("Dog"));
        assert!(!chain.reachable_levels().any(|level| level == 3));
    }

    #[test]
    fn test_load_chain_falls_back_to_demo() {
        let (chain, path) = load_chain(&AppConfig::default(), None).unwrap();
        assert!(path.is_none());
        assert_eq!(chain.id(), demo_chain().id());
    }

    #[test]
    fn test_load_chain_missing_file_errors() {
        let missing = std::env::temp_dir().join("strata-missing-chain.json");
        assert!(load_chain(&AppConfig::default(), Some(missing)).is_err());
    }
}
