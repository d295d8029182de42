use lineage_core::NodeId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> LayoutPoint {
        LayoutPoint {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl From<lineage_core::Point> for LayoutPoint {
    fn from(p: lineage_core::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A record node with its final position. `parent`/`children` are the declared lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub record_id: i64,
    pub name: String,
    pub year: i64,
    pub year_label: String,
    pub pledge_label: Option<String>,
    pub active: bool,
    /// Top-center of the node box.
    pub x: f64,
    pub y: f64,
    /// `None` for top-level records.
    pub parent: Option<NodeId>,
    pub children: Option<Vec<NodeId>>,
    /// Depth in the declared lineage; top-level records are `1`.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLink {
    /// `None` when the link starts at the synthetic root.
    pub source: Option<NodeId>,
    pub target: NodeId,
    /// Record id of the target; highlight classes are keyed by it.
    pub key: i64,
    /// Step-after polyline from source to target.
    pub points: Vec<LayoutPoint>,
}

/// Position of an active record, drawn as a dot on the minimap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveDot {
    pub node: NodeId,
    pub record_id: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutedTree {
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<LayoutLink>,
    pub active_dots: Vec<ActiveDot>,
    pub bounds: Bounds,
    /// Where the synthetic root landed; links out of it start here.
    pub root: LayoutPoint,
    #[serde(skip)]
    pub(crate) index: FxHashMap<NodeId, usize>,
}

impl LayoutedTree {
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, id: NodeId) -> Option<LayoutPoint> {
        self.node(id).map(|n| LayoutPoint { x: n.x, y: n.y })
    }

    pub fn node_by_record_id(&self, record_id: i64) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.record_id == record_id)
    }
}
