//! L3 Molecular Layer: Position to visual parameters
//!
//! Maps the continuous position onto what a renderer needs each frame: the
//! focus scale for the hero element, the blended size of the current item,
//! the focused item, and per-item placement, scale and opacity.

use strata_core::{ChainItem, ChainSnapshot, ItemSize};

use super::config::{LayoutConfig, LayoutConfigExt, RenderConfig};
use super::layout::LayoutTable;
use super::timing::{bracket, nearest_level};

/// Placement of one chain item for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct ItemVisual {
    pub level: i32,
    /// Offset along the scroll axis relative to the viewport centre, in pixels
    pub offset: f64,
    pub scale: f64,
    pub opacity: f64,
    pub size: ItemSize,
    pub reachable: bool,
}

/// Everything published to collaborators once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub position: f64,
    pub focus_scale: f64,
    pub blended_size: ItemSize,
    pub focused: Option<ChainItem>,
    pub snapping: bool,
    pub at_rest: bool,
    pub items: Vec<ItemVisual>,
}

#[derive(Debug, Clone)]
pub struct RenderInterpolator {
    render: RenderConfig,
    layout: LayoutConfig,
}

impl RenderInterpolator {
    pub fn new(render: RenderConfig, layout: LayoutConfig) -> Self {
        Self { render, layout }
    }

    /// Scale for the hero element: 1.0 at home, `focus_scale_at_one` one
    /// level away, then falling at the same rate down to `focus_scale_min`
    pub fn focus_scale(&self, position: f64) -> f64 {
        let distance = position.abs();
        let drop = 1.0 - self.render.focus_scale_at_one;
        let scale = if distance <= 1.0 {
            1.0 - drop * distance
        } else {
            self.render.focus_scale_at_one - drop * (distance - 1.0)
        };
        scale.max(self.render.focus_scale_min)
    }

    /// Size of the current item, blended between the bracketing levels
    pub fn blended_size(&self, chain: &ChainSnapshot, position: f64) -> ItemSize {
        let (floor, ceil, fraction) = bracket(position);
        let size_at = |level: i32| {
            chain
                .item_at(level)
                .and_then(|item| item.size)
                .unwrap_or_else(|| self.layout.default_size())
        };
        if floor == ceil {
            return size_at(floor);
        }
        size_at(floor).lerp(size_at(ceil), fraction)
    }

    /// Item whose level is the position rounded to the nearest level
    pub fn focused_item<'a>(&self, chain: &'a ChainSnapshot, position: f64) -> Option<&'a ChainItem> {
        chain.item_at(nearest_level(position))
    }

    /// Per-item placement relative to the current position
    pub fn item_visuals(
        &self,
        chain: &ChainSnapshot,
        table: &LayoutTable,
        position: f64,
    ) -> Vec<ItemVisual> {
        let origin = table.offset_at(position);
        chain
            .items()
            .iter()
            .map(|item| {
                let distance = (item.level as f64 - position).abs();
                ItemVisual {
                    level: item.level,
                    offset: table.offset(item.level) - origin,
                    scale: (1.0 - self.render.item_scale_falloff * distance)
                        .max(self.render.item_scale_min),
                    opacity: (1.0 - self.render.item_opacity_falloff * distance)
                        .max(self.render.item_opacity_min),
                    size: item.size.unwrap_or_else(|| self.layout.default_size()),
                    reachable: item.reachable,
                }
            })
            .collect()
    }

    /// Assemble the frame output for a position
    pub fn frame(
        &self,
        chain: &ChainSnapshot,
        table: &LayoutTable,
        position: f64,
        snapping: bool,
        at_rest: bool,
    ) -> FrameOutput {
        FrameOutput {
            position,
            focus_scale: self.focus_scale(position),
            blended_size: self.blended_size(chain, position),
            focused: self.focused_item(chain, position).cloned(),
            snapping,
            at_rest,
            items: self.item_visuals(chain, table, position),
        }
    }
}
