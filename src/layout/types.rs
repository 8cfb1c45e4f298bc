use serde::Serialize;

use crate::geometry::{ConnectorGeometry, Point, Rect, connector};
use crate::spec::DiagramKind;
use crate::template::Variant;
use crate::validate::ValidationReport;

/// Styling/validation role of a node. Roles drive downstream styling
/// (out of scope here) and validator exemptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Cell,
    Header,
    Step,
    Decision,
    Outcome,
    Category,
    BranchLabel,
    Event,
    Concept,
    Feature,
    Segment,
    Title,
    Axis,
    Background,
}

impl Role {
    /// Content roles participate in node-node overlap checks; decorative
    /// chrome does not.
    pub fn is_content(self) -> bool {
        !matches!(self, Role::Title | Role::Axis | Role::Background)
    }

    /// Branch labels sit on their edge's midpoint by construction, so
    /// they are excluded from node-edge checks (but still checked against
    /// other nodes).
    pub fn checked_against_edges(self) -> bool {
        self.is_content() && !matches!(self, Role::BranchLabel)
    }
}

/// A positioned, sized, text-bearing rectangular element.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub lines: Vec<String>,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Hierarchy depth where applicable, 0 for flat diagrams.
    pub level: usize,
    pub role: Role,
}

impl Node {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height)
    }
}

/// A connector between two points (usually node anchors).
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
    pub stroke_width: f64,
    pub arrowhead: bool,
}

impl Edge {
    /// Placement of the rendering rectangle for this edge. The midpoint
    /// of the returned element equals the midpoint of (from, to), so
    /// center-based rotation lands it exactly on the intended path.
    pub fn connector_geometry(&self) -> ConnectorGeometry {
        connector(self.from, self.to, self.stroke_width)
    }

    pub fn midpoint(&self) -> Point {
        self.from.midpoint(self.to)
    }

    /// Axis-aligned bounding box, used by the validator.
    pub fn bounding_rect(&self) -> Rect {
        self.connector_geometry().bounding_rect()
    }
}

/// A fully positioned diagram: the output of one build invocation.
/// Never mutated after validation; a failed layout is rebuilt from
/// adjusted content, not patched in place.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    pub kind: DiagramKind,
    pub variant: Variant,
    pub title: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn content_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.role.is_content())
    }
}

/// A diagram together with its validation report and the number of
/// build attempts the degrade loop spent on it.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltDiagram {
    pub diagram: Diagram,
    pub validation: ValidationReport,
    pub attempts: u32,
}
