//! Link routing.
//!
//! Links are drawn with a step-after curve through a handful of corner points, so the geometry is
//! fully described by the polyline returned here.

use crate::model::LayoutPoint;
use lineage_core::NodeBox;

/// Corner points for the link from `source` (top-center of the parent box) to `target`.
///
/// When the two boxes are not vertically aligned the path first drops to the gutter below the
/// parent. A target that is not below the source is reached through the gutter above it.
pub fn step_points(source: LayoutPoint, target: LayoutPoint, node_box: &NodeBox) -> Vec<LayoutPoint> {
    let mut points = Vec::with_capacity(4);
    points.push(source);
    if source.x != target.x {
        points.push(LayoutPoint {
            x: source.x,
            y: source.y + node_box.height + node_box.margin / 2.0,
        });
    }
    if source.y >= target.y {
        points.push(LayoutPoint {
            x: (source.x + target.x) / 2.0,
            y: target.y - node_box.margin / 2.0,
        });
    }
    points.push(target);
    points
}

/// Expands corner points into the vertices a step-after curve actually visits: each segment runs
/// horizontally first, then vertically.
pub fn step_after(points: &[LayoutPoint]) -> Vec<LayoutPoint> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, p) in points.iter().enumerate() {
        if let Some(prev) = i.checked_sub(1).map(|j| points[j]) {
            if prev.x != p.x && prev.y != p.y {
                out.push(LayoutPoint { x: p.x, y: prev.y });
            }
        }
        out.push(*p);
    }
    out
}

/// SVG path data for a step-after curve through `points`.
pub fn path_data(points: &[LayoutPoint]) -> String {
    let mut d = String::new();
    for (i, p) in step_after(points).iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{},{}", fmt_num(p.x), fmt_num(p.y)));
    }
    d
}

fn fmt_num(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
