//! Tunables shared by layout, viewport and search.
//!
//! Defaults match the stock lineage viewer: 130×56 boxes with a 20px margin, a 150px-tall
//! minimap, zoom-out only (`0.5..=1.0`) and three-character search.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeBox {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for NodeBox {
    fn default() -> Self {
        Self {
            width: 130.0,
            height: 56.0,
            margin: 20.0,
        }
    }
}

impl NodeBox {
    /// Box plus margin, the space one node reserves in the layout grid.
    pub fn footprint(&self) -> (f64, f64) {
        (self.width + self.margin, self.height + self.margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub height: f64,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self { height: 150.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_len: 3 }
    }
}

/// Initial size of the primary rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub node_box: NodeBox,
    pub minimap: MinimapConfig,
    pub zoom: ZoomConfig,
    pub search: SearchConfig,
    pub viewport: ViewportConfig,
}

impl LineageConfig {
    /// Applies a partial JSON object on top of the defaults.
    ///
    /// Only the keys present in `overrides` change; nested objects merge key by key.
    pub fn from_overrides(overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default())?;
        deep_merge_value(&mut base, overrides);
        Ok(serde_json::from_value(base)?)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
