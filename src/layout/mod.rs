//! Diagram builders.
//!
//! One module per diagram kind, dispatched by a single match. Builders
//! are pure: they read the spec, the selected template and the config,
//! and emit a fresh [`Diagram`]. All sizing goes through the text-fit
//! sizer, all sibling placement through the spacing distributor, and all
//! connector geometry through the geometry primitives.

mod comparison;
mod decision;
mod flowchart;
mod hierarchy;
mod spectrum;
mod table;
mod timeline;
pub mod types;

pub use types::*;

use tracing::{debug, trace};

use crate::config::{BoxMetrics, EngineConfig, LineCaps};
use crate::error::LayoutError;
use crate::geometry::{Point, Rect};
use crate::spacing::{distribute_siblings, required_span};
use crate::spec::{DiagramContent, DiagramKind, DiagramSpec};
use crate::template::{
    Selection, Variant, degrade, fallback_table, select_variant, template_of,
};
use crate::textfit::{box_height, cap_lines, fit_box};
use crate::validate::validate;

/// Build one diagram with a pre-selected variant.
pub fn build_diagram(
    spec: &DiagramSpec,
    variant: Variant,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let template = template_of(spec.content.kind(), variant);
    debug!(kind = ?spec.content.kind(), %variant, "building diagram layout");
    match &spec.content {
        DiagramContent::Table(table) => {
            table::compute_table_layout(&spec.title, table, template, config)
        }
        DiagramContent::Flowchart(flow) => {
            flowchart::compute_flowchart_layout(&spec.title, flow, template, config)
        }
        DiagramContent::DecisionTree(tree) => {
            decision::compute_decision_layout(&spec.title, tree, template, config)
        }
        DiagramContent::Timeline(timeline) => {
            timeline::compute_timeline_layout(&spec.title, timeline, template, config)
        }
        DiagramContent::Hierarchy(hierarchy) => {
            hierarchy::compute_hierarchy_layout(&spec.title, hierarchy, template, config)
        }
        DiagramContent::Spectrum(spectrum) => {
            spectrum::compute_spectrum_layout(&spec.title, spectrum, template, config)
        }
        DiagramContent::Comparison(comparison) => {
            comparison::compute_comparison_layout(&spec.title, comparison, template, config)
        }
    }
}

const MAX_BUILD_ATTEMPTS: u32 = 3;

/// Select, build and validate, degrading content between attempts.
///
/// The loop is bounded: after three attempts the last result is returned
/// as-is (a failing report is data for the caller, not an error), and a
/// spec that never finds a variant falls back to the universal table
/// substitution. Only content that exceeds even the table caps surfaces
/// [`LayoutError::CapacityExceeded`].
pub fn build_validated(
    spec: &DiagramSpec,
    config: &EngineConfig,
) -> Result<BuiltDiagram, LayoutError> {
    // Empty content is not a capacity problem: lay out whatever scaffold
    // the kind keeps (title, bare header row) and return it on the spot.
    if spec.content.counts().primary == 0 {
        debug!(kind = ?spec.content.kind(), "content is empty, building a minimal layout");
        let diagram = build_diagram(spec, Variant::A, config)?;
        let validation = validate(&diagram, config);
        return Ok(BuiltDiagram {
            diagram,
            validation,
            attempts: 1,
        });
    }

    let mut content = spec.content.clone();
    for attempt in 1..=MAX_BUILD_ATTEMPTS {
        match select_variant(content.kind(), content.counts()) {
            Selection::Variant(variant) => {
                let work = DiagramSpec {
                    title: spec.title.clone(),
                    content: content.clone(),
                };
                let diagram = build_diagram(&work, variant, config)?;
                let validation = validate(&diagram, config);
                let built = BuiltDiagram {
                    diagram,
                    validation,
                    attempts: attempt,
                };
                if built.validation.passed() || attempt == MAX_BUILD_ATTEMPTS {
                    return Ok(built);
                }
                debug!(attempt, "layout failed validation, degrading content and retrying");
                content = degrade(content);
            }
            Selection::Degrade => {
                debug!(attempt, kind = ?content.kind(), "no variant covers content, degrading");
                content = degrade(content);
            }
        }
    }

    // Ran out of attempts without ever finding a variant: substitute the
    // universal table fallback.
    let mut table = DiagramContent::Table(fallback_table(&spec.title, &content));
    if select_variant(DiagramKind::Table, table.counts()) == Selection::Degrade {
        table = degrade(table);
    }
    match select_variant(DiagramKind::Table, table.counts()) {
        Selection::Variant(variant) => {
            let work = DiagramSpec {
                title: spec.title.clone(),
                content: table,
            };
            let diagram = build_diagram(&work, variant, config)?;
            let validation = validate(&diagram, config);
            Ok(BuiltDiagram {
                diagram,
                validation,
                attempts: MAX_BUILD_ATTEMPTS,
            })
        }
        Selection::Degrade => Err(LayoutError::CapacityExceeded {
            kind: spec.content.kind(),
            attempts: MAX_BUILD_ATTEMPTS,
        }),
    }
}

/// The canvas region available to diagram content: canvas minus outer
/// margins, minus the title band when a title is present.
pub(super) fn content_frame(title: &str, config: &EngineConfig) -> Rect {
    let canvas = &config.canvas;
    let band = if title.trim().is_empty() {
        0.0
    } else {
        canvas.title_band
    };
    Rect::new(
        canvas.margin,
        canvas.margin + band,
        canvas.width - canvas.margin * 2.0,
        canvas.height - canvas.margin * 2.0 - band,
    )
}

/// The title node spanning the reserved band, when a title is present.
pub(super) fn title_node(title: &str, config: &EngineConfig) -> Option<Node> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return None;
    }
    let canvas = &config.canvas;
    Some(Node {
        id: "title".to_string(),
        lines: vec![trimmed.to_string()],
        left: canvas.margin,
        top: canvas.margin,
        width: canvas.width - canvas.margin * 2.0,
        height: canvas.title_band - 0.1,
        level: 0,
        role: Role::Title,
    })
}

/// Push a plain connector, silently skipping degenerate (coincident)
/// endpoints.
pub(super) fn push_connector(edges: &mut Vec<Edge>, from: Point, to: Point, config: &EngineConfig) {
    if from.distance_to(to) <= f64::EPSILON {
        trace!(?from, "skipping zero-length connector");
        return;
    }
    edges.push(Edge {
        from,
        to,
        stroke_width: config.stroke.line_width,
        arrowhead: false,
    });
}

/// Push an arrow connector; degenerate spans are skipped like plain
/// connectors.
pub(super) fn push_arrow(edges: &mut Vec<Edge>, from: Point, to: Point, config: &EngineConfig) {
    if from.distance_to(to) <= config.stroke.arrow_head_length {
        trace!(?from, ?to, "skipping arrow shorter than its head");
        return;
    }
    edges.push(Edge {
        from,
        to,
        stroke_width: config.stroke.line_width,
        arrowhead: true,
    });
}

/// A sized but unplaced tree node used by the decision-tree and
/// hierarchy builders.
pub(super) struct TreeBox {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
    pub role: Role,
    /// Short text rendered at the midpoint of the incoming edge.
    pub branch_label: Option<String>,
    pub children: Vec<TreeBox>,
}

impl TreeBox {
    /// Horizontal span this subtree needs: its own box, or the
    /// explicitly pre-computed span of its children's slots, whichever
    /// is wider. Sibling slots are uniform (the widest wins) so the
    /// distributor's single-width contract holds.
    fn slot_width(&self, min_gap: f64) -> f64 {
        if self.children.is_empty() {
            return self.width;
        }
        let child_slot = self
            .children
            .iter()
            .map(|c| c.slot_width(min_gap))
            .fold(0.0, f64::max);
        let span = required_span(child_slot, self.children.len(), min_gap);
        self.width.max(span)
    }
}

/// Recursively place a tree under `frame`, centered horizontally, and
/// emit nodes plus parent-to-child arrows with optional branch labels.
pub(super) fn place_tree(
    root: &TreeBox,
    frame: Rect,
    id_prefix: &str,
    config: &EngineConfig,
    nodes: &mut Vec<Node>,
    edges: &mut Vec<Edge>,
) {
    let min_gap = config.spacing.min_gap;
    let slot = root.slot_width(min_gap);
    let slot_left = frame.center().x - slot / 2.0;
    let mut counter = 0usize;
    place_subtree(
        root, slot_left, slot, frame.top, 0, id_prefix, config, nodes, edges, &mut counter,
    );
}

#[allow(clippy::too_many_arguments)]
fn place_subtree(
    node: &TreeBox,
    slot_left: f64,
    slot_width: f64,
    top: f64,
    level: usize,
    id_prefix: &str,
    config: &EngineConfig,
    nodes: &mut Vec<Node>,
    edges: &mut Vec<Edge>,
    counter: &mut usize,
) {
    let min_gap = config.spacing.min_gap;
    let id = format!("{id_prefix}_{}", *counter);
    *counter += 1;
    let placed = Node {
        id,
        lines: node.lines.clone(),
        left: slot_left + (slot_width - node.width) / 2.0,
        top,
        width: node.width,
        height: node.height,
        level,
        role: node.role,
    };
    let parent_anchor = placed.bottom_center();
    nodes.push(placed);

    if node.children.is_empty() {
        return;
    }
    let child_slot = node
        .children
        .iter()
        .map(|c| c.slot_width(min_gap))
        .fold(0.0, f64::max);
    let lefts = distribute_siblings(slot_left, slot_width, child_slot, node.children.len(), min_gap);
    let child_top = top + node.height + config.spacing.level_gap;
    for (child, child_slot_left) in node.children.iter().zip(lefts) {
        let child_anchor = Point::new(
            child_slot_left + child_slot / 2.0,
            child_top,
        );
        push_arrow(edges, parent_anchor, child_anchor, config);
        if let Some(label) = &child.branch_label {
            let mid = parent_anchor.midpoint(child_anchor);
            let metrics = config.text.compact_metrics();
            let width = label.chars().count() as f64 * config.text.avg_char_width() + 0.1;
            let height = metrics.base_height + metrics.per_line_height;
            nodes.push(Node {
                id: format!("{id_prefix}_label_{}", nodes.len()),
                lines: vec![label.clone()],
                left: mid.x - width / 2.0,
                top: mid.y - height / 2.0,
                width,
                height,
                level: level + 1,
                role: Role::BranchLabel,
            });
        }
        place_subtree(
            child,
            child_slot_left,
            child_slot,
            child_top,
            level + 1,
            id_prefix,
            config,
            nodes,
            edges,
            counter,
        );
    }
}

/// Size one box from capped lines: text-fit width plus horizontal
/// padding, clamped to `max_width`, at the given metrics. The line cap
/// is re-applied after fitting, since the width-driven re-wrap can split
/// capped lines further.
pub(super) fn sized_box(
    lines: &[String],
    max_width: f64,
    min_width: f64,
    metrics: BoxMetrics,
    caps: LineCaps,
    config: &EngineConfig,
) -> Result<crate::textfit::FitBox, LayoutError> {
    let pad = 0.2;
    let inner = (max_width - pad).max(0.1);
    let mut fit = fit_box(lines, inner, metrics, &config.text)?;
    let char_budget = (inner / config.text.avg_char_width()).floor() as usize;
    cap_lines(&mut fit.lines, caps.max_lines, char_budget);
    fit.height = box_height(fit.lines.len(), metrics);
    fit.width = (fit.width + pad).clamp(min_width.min(max_width), max_width);
    Ok(fit)
}
