//! Post-layout validation.
//!
//! Validation runs on the finished geometry, not on the inputs: it
//! re-measures every content box against its text and checks every pair
//! of content rectangles for intersection. A failing report is data; the
//! build loop reacts by degrading content and rebuilding, never by
//! nudging the failed layout.

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::geometry::Rect;
use crate::layout::{Diagram, Node};
use crate::textfit::{box_height, estimate_width};

/// Slack applied to anchor containment and floating-point comparisons.
const EPS: f64 = 1e-6;

/// Two content rectangles with negative separation on both axes.
#[derive(Debug, Clone, Serialize)]
pub struct Overlap {
    pub a: String,
    pub b: String,
    /// Signed horizontal separation; negative means the boxes interpenetrate.
    pub gap_x: f64,
    pub gap_y: f64,
}

/// A connector passing through the interior of a content box it is not
/// anchored to.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeCrossing {
    pub node: String,
    pub edge_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowAxis {
    Width,
    Height,
}

/// A box too small for the text assigned to it at the minimum font.
#[derive(Debug, Clone, Serialize)]
pub struct Overflow {
    pub node: String,
    pub axis: OverflowAxis,
    pub required: f64,
    pub assigned: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

/// The full outcome of validating one diagram.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub verdict: Verdict,
    pub overlaps: Vec<Overlap>,
    pub edge_crossings: Vec<EdgeCrossing>,
    pub overflows: Vec<Overflow>,
    /// Content nodes inside the canvas but intruding into the outer
    /// margin. Advisory: tolerated on dense layouts, does not fail the
    /// verdict.
    pub margin_breaches: Vec<String>,
    /// Content nodes that leave the canvas itself. These fail the
    /// verdict: geometry off the slide cannot be rendered.
    pub canvas_breaches: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

pub fn validate(diagram: &Diagram, config: &EngineConfig) -> ValidationReport {
    let content: Vec<&Node> = diagram.content_nodes().collect();

    let mut overlaps = Vec::new();
    for (i, a) in content.iter().enumerate() {
        for b in &content[i + 1..] {
            let (gap_x, gap_y) = signed_gaps(a.rect(), b.rect());
            if gap_x < -EPS && gap_y < -EPS {
                overlaps.push(Overlap {
                    a: a.id.clone(),
                    b: b.id.clone(),
                    gap_x,
                    gap_y,
                });
            }
        }
    }

    let mut edge_crossings = Vec::new();
    for node in content.iter().filter(|n| n.role.checked_against_edges()) {
        let rect = node.rect();
        let anchor_zone = rect.inflate(EPS);
        for (edge_index, edge) in diagram.edges.iter().enumerate() {
            // An edge anchored on this node legitimately touches it.
            if anchor_zone.contains(edge.from) || anchor_zone.contains(edge.to) {
                continue;
            }
            if rect.intersects_segment(edge.from, edge.to) {
                edge_crossings.push(EdgeCrossing {
                    node: node.id.clone(),
                    edge_index,
                });
            }
        }
    }

    // Re-measure each box against the compact metrics floor: whatever
    // class sized the box, it can never legitimately be smaller than this.
    let metrics = config.text.compact_metrics();
    let avg_char = config.text.avg_char_width();
    let mut overflows = Vec::new();
    for node in content.iter().filter(|n| !n.lines.is_empty()) {
        let required_height = box_height(node.lines.len(), metrics);
        if node.height + EPS < required_height {
            overflows.push(Overflow {
                node: node.id.clone(),
                axis: OverflowAxis::Height,
                required: required_height,
                assigned: node.height,
            });
        }
        let required_width = estimate_width(&node.lines, avg_char);
        if node.width + EPS < required_width {
            overflows.push(Overflow {
                node: node.id.clone(),
                axis: OverflowAxis::Width,
                required: required_width,
                assigned: node.width,
            });
        }
    }

    let canvas = Rect::new(0.0, 0.0, config.canvas.width, config.canvas.height);
    let inner = canvas.inflate(-config.canvas.margin);
    let mut margin_breaches = Vec::new();
    let mut canvas_breaches = Vec::new();
    for node in diagram.nodes.iter().filter(|n| n.role.is_content()) {
        let rect = node.rect();
        if !contained(rect, canvas) {
            canvas_breaches.push(node.id.clone());
        } else if !contained(rect, inner) {
            margin_breaches.push(node.id.clone());
        }
    }

    let verdict = if overlaps.is_empty()
        && edge_crossings.is_empty()
        && overflows.is_empty()
        && canvas_breaches.is_empty()
    {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    debug!(
        ?verdict,
        overlaps = overlaps.len(),
        crossings = edge_crossings.len(),
        overflows = overflows.len(),
        margin_breaches = margin_breaches.len(),
        canvas_breaches = canvas_breaches.len(),
        "validated diagram"
    );
    ValidationReport {
        verdict,
        overlaps,
        edge_crossings,
        overflows,
        margin_breaches,
        canvas_breaches,
    }
}

/// Signed separation per axis: positive means clear space between the
/// rectangles, negative means interpenetration on that axis.
fn signed_gaps(a: Rect, b: Rect) -> (f64, f64) {
    let gap_x = (b.left - a.right()).max(a.left - b.right());
    let gap_y = (b.top - a.bottom()).max(a.top - b.bottom());
    (gap_x, gap_y)
}

fn contained(inner: Rect, outer: Rect) -> bool {
    inner.left >= outer.left - EPS
        && inner.top >= outer.top - EPS
        && inner.right() <= outer.right() + EPS
        && inner.bottom() <= outer.bottom() + EPS
}

/// Render the diagram as a coarse character grid for debugging failed
/// layouts: one letter per node (by insertion order), `#` where boxes
/// stack, `+` for connector paths, `.` for empty canvas.
pub fn ascii_map(diagram: &Diagram, cols: usize, rows: usize) -> String {
    let canvas_width = diagram
        .nodes
        .iter()
        .map(|n| n.rect().right())
        .fold(13.33f64, f64::max);
    let canvas_height = diagram
        .nodes
        .iter()
        .map(|n| n.rect().bottom())
        .fold(7.5f64, f64::max);
    let mut out = String::with_capacity((cols + 1) * rows);
    for row in 0..rows {
        let y = (row as f64 + 0.5) / rows as f64 * canvas_height;
        for col in 0..cols {
            let x = (col as f64 + 0.5) / cols as f64 * canvas_width;
            let p = crate::geometry::Point::new(x, y);
            let hits: Vec<usize> = diagram
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.role.is_content() && n.rect().contains(p))
                .map(|(i, _)| i)
                .collect();
            let ch = match hits.len() {
                0 => {
                    let cell = Rect::new(
                        col as f64 / cols as f64 * canvas_width,
                        row as f64 / rows as f64 * canvas_height,
                        canvas_width / cols as f64,
                        canvas_height / rows as f64,
                    );
                    if diagram
                        .edges
                        .iter()
                        .any(|e| cell.intersects_segment(e.from, e.to))
                    {
                        '+'
                    } else {
                        '.'
                    }
                }
                1 => (b'a' + (hits[0] % 26) as u8) as char,
                _ => '#',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Edge, Role};
    use crate::geometry::Point;
    use crate::spec::DiagramKind;
    use crate::template::Variant;

    fn node(id: &str, left: f64, top: f64, width: f64, height: f64, role: Role) -> Node {
        Node {
            id: id.into(),
            lines: vec!["text".into()],
            left,
            top,
            width,
            height,
            level: 0,
            role,
        }
    }

    fn diagram(nodes: Vec<Node>, edges: Vec<Edge>) -> Diagram {
        Diagram {
            kind: DiagramKind::Flowchart,
            variant: Variant::A,
            title: String::new(),
            nodes,
            edges,
        }
    }

    #[test]
    fn disjoint_boxes_pass() {
        let config = EngineConfig::default();
        let d = diagram(
            vec![
                node("a", 1.0, 1.0, 2.0, 1.0, Role::Step),
                node("b", 4.0, 1.0, 2.0, 1.0, Role::Step),
            ],
            Vec::new(),
        );
        let report = validate(&d, &config);
        assert!(report.passed());
        assert!(report.overlaps.is_empty());
    }

    #[test]
    fn interpenetrating_boxes_fail_with_negative_gaps() {
        let config = EngineConfig::default();
        let d = diagram(
            vec![
                node("a", 1.0, 1.0, 2.0, 1.0, Role::Step),
                node("b", 2.5, 1.5, 2.0, 1.0, Role::Step),
            ],
            Vec::new(),
        );
        let report = validate(&d, &config);
        assert!(!report.passed());
        assert_eq!(report.overlaps.len(), 1);
        assert!(report.overlaps[0].gap_x < 0.0);
        assert!(report.overlaps[0].gap_y < 0.0);
    }

    #[test]
    fn overlap_detection_is_symmetric() {
        let config = EngineConfig::default();
        let a = node("a", 1.0, 1.0, 2.0, 1.0, Role::Step);
        let b = node("b", 2.5, 1.5, 2.0, 1.0, Role::Step);
        let forward = validate(&diagram(vec![a.clone(), b.clone()], Vec::new()), &config);
        let reverse = validate(&diagram(vec![b, a], Vec::new()), &config);
        assert_eq!(forward.overlaps.len(), reverse.overlaps.len());
    }

    #[test]
    fn title_is_exempt_from_overlap_checks() {
        let config = EngineConfig::default();
        let d = diagram(
            vec![
                node("title", 1.0, 1.0, 10.0, 1.0, Role::Title),
                node("a", 2.0, 1.2, 2.0, 0.6, Role::Step),
            ],
            Vec::new(),
        );
        assert!(validate(&d, &config).passed());
    }

    #[test]
    fn anchored_edges_do_not_flag_their_own_node() {
        let config = EngineConfig::default();
        let a = node("a", 1.0, 1.0, 2.0, 1.0, Role::Step);
        let b = node("b", 1.0, 4.0, 2.0, 1.0, Role::Step);
        let edge = Edge {
            from: a.bottom_center(),
            to: b.top_center(),
            stroke_width: 0.03,
            arrowhead: true,
        };
        let report = validate(&diagram(vec![a, b], vec![edge]), &config);
        assert!(report.edge_crossings.is_empty());
    }

    #[test]
    fn an_unrelated_crossing_edge_fails_the_verdict() {
        let config = EngineConfig::default();
        let a = node("a", 2.0, 2.0, 2.0, 1.0, Role::Step);
        let edge = Edge {
            from: Point::new(0.0, 2.5),
            to: Point::new(8.0, 2.5),
            stroke_width: 0.03,
            arrowhead: false,
        };
        let report = validate(&diagram(vec![a], vec![edge]), &config);
        assert_eq!(report.edge_crossings.len(), 1);
        assert!(!report.passed());
    }

    #[test]
    fn undersized_box_reports_height_overflow() {
        let config = EngineConfig::default();
        let mut cramped = node("a", 1.0, 1.0, 2.0, 0.1, Role::Cell);
        cramped.lines = vec!["one".into(), "two".into(), "three".into()];
        let report = validate(&diagram(vec![cramped], Vec::new()), &config);
        assert!(report
            .overflows
            .iter()
            .any(|o| o.axis == OverflowAxis::Height));
        assert!(!report.passed());
    }

    #[test]
    fn margin_intrusion_is_advisory() {
        let config = EngineConfig::default();
        // Inside the canvas, but poking into the 0.4 outer margin.
        let d = diagram(
            vec![node("a", 0.1, 1.0, 2.0, 1.0, Role::Step)],
            Vec::new(),
        );
        let report = validate(&d, &config);
        assert_eq!(report.margin_breaches, vec!["a".to_string()]);
        assert!(report.canvas_breaches.is_empty());
        assert!(report.passed());
    }

    #[test]
    fn node_leaving_the_canvas_fails_the_verdict() {
        let config = EngineConfig::default();
        let d = diagram(
            vec![node("a", -1.0, 1.0, 2.0, 1.0, Role::Step)],
            Vec::new(),
        );
        let report = validate(&d, &config);
        assert_eq!(report.canvas_breaches, vec!["a".to_string()]);
        assert!(report.margin_breaches.is_empty());
        assert!(!report.passed());
    }

    #[test]
    fn ascii_map_marks_boxes_and_gaps() {
        let d = diagram(
            vec![node("a", 0.0, 0.0, 6.0, 7.5, Role::Step)],
            Vec::new(),
        );
        let map = ascii_map(&d, 10, 4);
        assert_eq!(map.lines().count(), 4);
        assert!(map.contains('a'));
        assert!(map.contains('.'));
    }
}
