//! Pan/zoom state for the main view and its minimap brush.
//!
//! Transforms follow the `d3-zoom` conventions: a screen point `s` shows layout point
//! `(s - t) / k`, the scale is clamped to an extent and the translation is constrained so the
//! tree's bounding box never leaves the view unnecessarily.

use crate::minimap::Minimap;
use crate::model::{Bounds, LayoutPoint};
use lineage_core::{LineageConfig, MinimapConfig, ViewportConfig, ZoomConfig};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Layout point to screen point.
    pub fn apply(&self, p: LayoutPoint) -> LayoutPoint {
        LayoutPoint {
            x: p.x * self.k + self.x,
            y: p.y * self.k + self.y,
        }
    }

    /// Screen point to layout point.
    pub fn invert(&self, p: LayoutPoint) -> LayoutPoint {
        LayoutPoint {
            x: (p.x - self.x) / self.k,
            y: (p.y - self.y) / self.k,
        }
    }

    /// Moves by a layout-space delta.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + self.k * dx,
            y: self.y + self.k * dy,
            k: self.k,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl From<ViewportConfig> for ViewportSize {
    fn from(c: ViewportConfig) -> Self {
        Self {
            width: c.width,
            height: c.height,
        }
    }
}

/// The rectangle on the minimap that outlines what the main view shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Brush {
    pub fn contains(&self, p: LayoutPoint) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    Idle,
    Zooming,
    Panning,
    /// `offset` is the pointer position relative to the brush origin when the drag started.
    BrushDragging { offset: LayoutPoint },
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    transform: ZoomTransform,
    size: ViewportSize,
    scale_extent: (f64, f64),
    translate_extent: Bounds,
    minimap: Minimap,
    state: InteractionState,
}

impl ViewportController {
    /// Starts at the identity transform, unconstrained, like a freshly attached zoom behavior.
    pub fn new(
        bounds: Bounds,
        size: ViewportSize,
        zoom: &ZoomConfig,
        minimap: &MinimapConfig,
    ) -> Self {
        Self {
            transform: ZoomTransform::IDENTITY,
            size,
            scale_extent: (zoom.min_scale, zoom.max_scale),
            translate_extent: bounds,
            minimap: Minimap::new(&bounds, minimap),
            state: InteractionState::Idle,
        }
    }

    pub fn from_config(bounds: Bounds, config: &LineageConfig) -> Self {
        Self::new(bounds, config.viewport.into(), &config.zoom, &config.minimap)
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn translate_extent(&self) -> Bounds {
        self.translate_extent
    }

    /// Current brush, derived from the transform and the viewport size.
    pub fn brush(&self) -> Brush {
        let t = self.transform;
        let sx = &self.minimap.scale_x;
        let sy = &self.minimap.scale_y;
        Brush {
            x: sx.apply(-t.x / t.k),
            y: sy.apply(-t.y / t.k),
            width: (sx.apply(self.size.width) - sx.apply(0.0)) / t.k,
            height: (sy.apply(self.size.height) - sy.apply(0.0)) / t.k,
        }
    }

    /// Applies a transform produced by an external zoom gesture.
    pub fn on_zoom(&mut self, transform: ZoomTransform) -> ZoomTransform {
        if self.state == InteractionState::Idle {
            self.state = InteractionState::Zooming;
        }
        let k = self.clamp_scale(transform.k);
        self.set(ZoomTransform { k, ..transform })
    }

    /// Scales by `factor` around a screen `pointer`, keeping the layout point under it fixed.
    pub fn wheel(&mut self, factor: f64, pointer: LayoutPoint) -> ZoomTransform {
        self.state = InteractionState::Zooming;
        let anchor = self.transform.invert(pointer);
        let k = self.clamp_scale(self.transform.k * factor);
        self.set(ZoomTransform {
            x: pointer.x - anchor.x * k,
            y: pointer.y - anchor.y * k,
            k,
        })
    }

    pub fn begin_pan(&mut self) {
        self.state = InteractionState::Panning;
    }

    /// Moves the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> ZoomTransform {
        let t = self.transform;
        self.set(ZoomTransform {
            x: t.x + dx,
            y: t.y + dy,
            k: t.k,
        })
    }

    /// `point` is in minimap coordinates.
    pub fn begin_brush_drag(&mut self, point: LayoutPoint) {
        let brush = self.brush();
        self.state = InteractionState::BrushDragging {
            offset: LayoutPoint {
                x: point.x - brush.x,
                y: point.y - brush.y,
            },
        };
    }

    /// Moves the brush so the pointer keeps its grab offset, clamped inside the minimap, and
    /// centers the main view on the brush. Ignored unless a brush drag is in progress.
    pub fn on_brush_drag(&mut self, point: LayoutPoint) -> Brush {
        let InteractionState::BrushDragging { offset } = self.state else {
            return self.brush();
        };
        let brush = self.brush();
        let x = (point.x - offset.x)
            .min(self.minimap.width - brush.width)
            .max(0.0);
        let y = (point.y - offset.y)
            .min(self.minimap.height - brush.height)
            .max(0.0);
        let target = self.minimap.unproject(LayoutPoint {
            x: x + brush.width / 2.0,
            y: y + brush.height / 2.0,
        });
        self.translate_to(target);
        self.brush()
    }

    pub fn end_interaction(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// The transform is kept as is; only the brush, which depends on the size, changes.
    pub fn on_resize(&mut self, size: ViewportSize) -> Brush {
        self.size = size;
        self.brush()
    }

    /// Centers the view on a layout point without changing the scale.
    pub fn translate_to(&mut self, point: LayoutPoint) -> ZoomTransform {
        let k = self.transform.k;
        self.set(ZoomTransform {
            x: self.size.width / 2.0 - point.x * k,
            y: self.size.height / 2.0 - point.y * k,
            k,
        })
    }

    /// Keeps the translate extent in view.
    ///
    /// On each axis, a view wider than the extent centers it; otherwise the view may not reach
    /// past either edge.
    pub fn constrain(&self, t: ZoomTransform) -> ZoomTransform {
        let e = &self.translate_extent;
        let dx0 = -t.x / t.k - e.min_x;
        let dx1 = (self.size.width - t.x) / t.k - e.max_x;
        let dy0 = -t.y / t.k - e.min_y;
        let dy1 = (self.size.height - t.y) / t.k - e.max_y;
        t.translate(axis_shift(dx0, dx1), axis_shift(dy0, dy1))
    }

    fn clamp_scale(&self, k: f64) -> f64 {
        let (lo, hi) = self.scale_extent;
        k.max(lo).min(hi)
    }

    fn set(&mut self, t: ZoomTransform) -> ZoomTransform {
        self.transform = self.constrain(t);
        trace!(
            x = self.transform.x,
            y = self.transform.y,
            k = self.transform.k,
            "viewport transform"
        );
        self.transform
    }
}

fn axis_shift(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        return (d0 + d1) / 2.0;
    }
    let low = d0.min(0.0);
    if low != 0.0 { low } else { d1.max(0.0) }
}
