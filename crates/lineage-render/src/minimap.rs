//! Overview minimap geometry.

use crate::model::{Bounds, LayoutPoint, LayoutedTree};
use lineage_core::MinimapConfig;
use serde::{Deserialize, Serialize};

/// Continuous linear map from `domain` to `range`, like `d3.scaleLinear()` without clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, v: f64) -> f64 {
        LinearScale::new(self.range, self.domain).apply(v)
    }
}

/// Minimap sized to the tree's aspect ratio at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Minimap {
    pub width: f64,
    pub height: f64,
    pub scale_x: LinearScale,
    pub scale_y: LinearScale,
}

impl Minimap {
    pub fn new(bounds: &Bounds, config: &MinimapConfig) -> Self {
        let height = config.height;
        let width = if bounds.height() > 0.0 {
            height * bounds.width() / bounds.height()
        } else {
            0.0
        };
        Self {
            width,
            height,
            scale_x: LinearScale::new((bounds.min_x, bounds.max_x), (0.0, width)),
            scale_y: LinearScale::new((bounds.min_y, bounds.max_y), (0.0, height)),
        }
    }

    pub fn project(&self, p: LayoutPoint) -> LayoutPoint {
        LayoutPoint {
            x: self.scale_x.apply(p.x),
            y: self.scale_y.apply(p.y),
        }
    }

    pub fn unproject(&self, p: LayoutPoint) -> LayoutPoint {
        LayoutPoint {
            x: self.scale_x.invert(p.x),
            y: self.scale_y.invert(p.y),
        }
    }

    /// Link polylines in minimap coordinates.
    pub fn links(&self, tree: &LayoutedTree) -> Vec<Vec<LayoutPoint>> {
        tree.links
            .iter()
            .map(|link| link.points.iter().map(|&p| self.project(p)).collect())
            .collect()
    }

    /// Active-record dots in minimap coordinates.
    pub fn dots(&self, tree: &LayoutedTree) -> Vec<LayoutPoint> {
        tree.active_dots
            .iter()
            .map(|d| self.project(LayoutPoint { x: d.x, y: d.y }))
            .collect()
    }
}
