//! Layout template selection and content degradation.
//!
//! Each diagram kind owns a small ordered table of five layout variants
//! (A-E), each a static capacity/arrangement descriptor. Selection picks
//! the covering variant needing the least canvas area; when nothing
//! covers, the caller receives a degrade signal and reduces content
//! before retrying. The table is read-only, built once, and safe to share
//! across concurrent builds.

use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::warn;

use crate::spec::{
    ContentCounts, DecisionBranch, DecisionNode, DiagramContent, DiagramKind, SpectrumSegment,
    TableSpec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variant {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// How a variant arranges its nodes on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Arrangement {
    /// Rows by columns cell grid.
    Grid,
    /// One centered vertical chain.
    SingleColumn,
    /// Two side-by-side chains in reading order.
    DoubleColumn,
    /// Levels of a tree, each centered over its children.
    LevelTree,
    /// Cards in one row above a horizontal axis.
    AxisRow,
    /// Cards alternating above and below a horizontal axis.
    AxisAlternating,
    /// Contiguous left-to-right band of segments.
    Band,
    /// Side-by-side concept panels.
    Panels,
}

/// Static capacity/arrangement descriptor for one variant of one kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayoutTemplate {
    pub kind: DiagramKind,
    pub variant: Variant,
    /// Inclusive range of the kind's primary count (rows, steps, events,
    /// tree nodes, segments, panels).
    pub primary: (usize, usize),
    /// Inclusive range of the cross dimension (columns, max features).
    pub secondary: (usize, usize),
    pub max_depth: usize,
    pub arrangement: Arrangement,
    /// Nominal fraction of the canvas the arrangement occupies; breaks
    /// ties between covering variants in favor of the most compact.
    pub area_hint: f64,
}

impl LayoutTemplate {
    pub fn covers(&self, counts: ContentCounts) -> bool {
        counts.primary >= self.primary.0
            && counts.primary <= self.primary.1
            && counts.secondary >= self.secondary.0
            && counts.secondary <= self.secondary.1
            && counts.depth <= self.max_depth
    }
}

const ANY: (usize, usize) = (0, usize::MAX);

macro_rules! template {
    ($kind:ident, $variant:ident, $primary:expr, $secondary:expr, $depth:expr, $arr:ident, $area:expr) => {
        LayoutTemplate {
            kind: DiagramKind::$kind,
            variant: Variant::$variant,
            primary: $primary,
            secondary: $secondary,
            max_depth: $depth,
            arrangement: Arrangement::$arr,
            area_hint: $area,
        }
    };
}

/// The process-wide variant table. Ranges within a kind jointly cover
/// everything up to that kind's hard caps, so a degraded spec always
/// finds a variant.
static TEMPLATES: Lazy<Vec<LayoutTemplate>> = Lazy::new(|| {
    vec![
        template!(Table, A, (1, 4), (1, 4), 1, Grid, 0.35),
        template!(Table, B, (3, 6), (2, 4), 1, Grid, 0.55),
        template!(Table, C, (6, 8), (2, 4), 1, Grid, 0.75),
        template!(Table, D, (6, 10), (2, 3), 1, Grid, 0.85),
        template!(Table, E, (8, 10), (2, 4), 1, Grid, 0.95),
        template!(Flowchart, A, (1, 3), ANY, 1, SingleColumn, 0.35),
        template!(Flowchart, B, (4, 5), ANY, 1, SingleColumn, 0.55),
        template!(Flowchart, C, (4, 5), ANY, 1, DoubleColumn, 0.6),
        template!(Flowchart, D, (6, 7), ANY, 1, DoubleColumn, 0.8),
        template!(Flowchart, E, (6, 7), ANY, 1, SingleColumn, 0.9),
        template!(DecisionTree, A, (1, 3), ANY, 2, LevelTree, 0.35),
        template!(DecisionTree, B, (4, 7), ANY, 3, LevelTree, 0.6),
        template!(DecisionTree, C, (8, 11), ANY, 4, LevelTree, 0.8),
        template!(DecisionTree, D, (4, 7), ANY, 4, LevelTree, 0.7),
        template!(DecisionTree, E, (12, 15), ANY, 4, LevelTree, 0.9),
        template!(Timeline, A, (1, 3), ANY, 1, AxisRow, 0.35),
        template!(Timeline, B, (4, 5), ANY, 1, AxisRow, 0.55),
        template!(Timeline, C, (4, 6), ANY, 1, AxisAlternating, 0.6),
        template!(Timeline, D, (5, 7), ANY, 1, AxisAlternating, 0.75),
        template!(Timeline, E, (7, 8), ANY, 1, AxisAlternating, 0.85),
        template!(Hierarchy, A, (1, 5), ANY, 2, LevelTree, 0.4),
        template!(Hierarchy, B, (2, 9), ANY, 3, LevelTree, 0.6),
        template!(Hierarchy, C, (10, 13), ANY, 3, LevelTree, 0.75),
        template!(Hierarchy, D, (2, 11), ANY, 4, LevelTree, 0.8),
        template!(Hierarchy, E, (10, 15), ANY, 4, LevelTree, 0.9),
        template!(Spectrum, A, (1, 3), ANY, 1, Band, 0.4),
        template!(Spectrum, B, (3, 4), ANY, 1, Band, 0.5),
        template!(Spectrum, C, (4, 5), ANY, 1, Band, 0.65),
        template!(Spectrum, D, (5, 6), ANY, 1, Band, 0.75),
        template!(Spectrum, E, (6, 6), ANY, 1, Band, 0.85),
        template!(Comparison, A, (2, 2), (0, 5), 1, Panels, 0.5),
        template!(Comparison, B, (3, 3), (0, 5), 1, Panels, 0.65),
        template!(Comparison, C, (4, 4), (0, 4), 1, Panels, 0.8),
        template!(Comparison, D, (2, 2), (0, 8), 1, Panels, 0.6),
        template!(Comparison, E, (3, 4), (0, 8), 1, Panels, 0.9),
    ]
});

pub fn templates_for(kind: DiagramKind) -> impl Iterator<Item = &'static LayoutTemplate> {
    TEMPLATES.iter().filter(move |t| t.kind == kind)
}

pub fn template_of(kind: DiagramKind, variant: Variant) -> &'static LayoutTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.kind == kind && t.variant == variant)
        .unwrap_or_else(|| unreachable!("every kind defines all five variants"))
}

/// Outcome of variant selection. `Degrade` is a signal, not an error: the
/// caller reduces content and retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Variant(Variant),
    Degrade,
}

/// Pick the variant for the observed content volume: among all covering
/// variants, the one with the smallest area hint (earliest wins ties).
pub fn select_variant(kind: DiagramKind, counts: ContentCounts) -> Selection {
    let mut best: Option<&LayoutTemplate> = None;
    for template in templates_for(kind) {
        if !template.covers(counts) {
            continue;
        }
        match best {
            Some(current) if current.area_hint <= template.area_hint => {}
            _ => best = Some(template),
        }
    }
    match best {
        Some(template) => Selection::Variant(template.variant),
        None => Selection::Degrade,
    }
}

/// Hard capacity caps per kind; never exceeded even after degradation.
pub fn hard_caps(kind: DiagramKind) -> ContentCounts {
    match kind {
        DiagramKind::Table => ContentCounts {
            primary: 10,
            secondary: 4,
            depth: 1,
        },
        DiagramKind::Flowchart => ContentCounts {
            primary: 7,
            secondary: usize::MAX,
            depth: 1,
        },
        DiagramKind::DecisionTree => ContentCounts {
            primary: 15,
            secondary: usize::MAX,
            depth: 4,
        },
        DiagramKind::Timeline => ContentCounts {
            primary: 8,
            secondary: usize::MAX,
            depth: 1,
        },
        DiagramKind::Hierarchy => ContentCounts {
            primary: 15,
            secondary: usize::MAX,
            depth: 4,
        },
        DiagramKind::Spectrum => ContentCounts {
            primary: 6,
            secondary: usize::MAX,
            depth: 1,
        },
        DiagramKind::Comparison => ContentCounts {
            primary: 4,
            secondary: 8,
            depth: 1,
        },
    }
}

/// Apply one kind-specific reduction step so the content moves toward its
/// hard caps: merge adjacent rows/features/segments, prune the deepest
/// tree level, or truncate the tail with a warning.
pub fn degrade(content: DiagramContent) -> DiagramContent {
    let kind = content.kind();
    let caps = hard_caps(kind);
    match content {
        DiagramContent::Table(mut table) => {
            if table.headers.len() > caps.secondary {
                warn!(
                    kind = ?kind,
                    dropped = table.headers.len() - caps.secondary,
                    "truncating table columns to cap"
                );
                table.headers.truncate(caps.secondary);
                for row in &mut table.rows {
                    row.truncate(caps.secondary);
                }
            }
            while table.rows.len() > caps.primary {
                merge_last_rows(&mut table.rows);
            }
            DiagramContent::Table(table)
        }
        DiagramContent::Flowchart(mut flow) => {
            let mut actions = flow
                .steps
                .iter()
                .filter(|s| !s.trim_end().ends_with(':'))
                .count();
            // Merge the last two actions; category headers stay put and
            // never absorb action text.
            while actions > caps.primary {
                let Some(last_idx) = flow
                    .steps
                    .iter()
                    .rposition(|s| !s.trim_end().ends_with(':'))
                else {
                    break;
                };
                let last = flow.steps.remove(last_idx);
                let Some(prev_idx) = flow.steps[..last_idx]
                    .iter()
                    .rposition(|s| !s.trim_end().ends_with(':'))
                else {
                    flow.steps.insert(last_idx, last);
                    break;
                };
                flow.steps[prev_idx].push_str("; ");
                flow.steps[prev_idx].push_str(last.trim());
                actions -= 1;
            }
            DiagramContent::Flowchart(flow)
        }
        DiagramContent::DecisionTree(mut tree) => {
            prune_decision(&mut tree.root, caps.depth.saturating_sub(1));
            DiagramContent::DecisionTree(tree)
        }
        DiagramContent::Timeline(mut timeline) => {
            if timeline.events.len() > caps.primary {
                warn!(
                    dropped = timeline.events.len() - caps.primary,
                    "truncating timeline events to cap"
                );
                timeline.events.truncate(caps.primary);
            }
            DiagramContent::Timeline(timeline)
        }
        DiagramContent::Hierarchy(mut hierarchy) => {
            let depth = deepest_level(&hierarchy.root, 1);
            flatten_level(&mut hierarchy.root, 1, depth.min(5).max(2) - 1);
            DiagramContent::Hierarchy(hierarchy)
        }
        DiagramContent::Spectrum(mut spectrum) => {
            while spectrum.segments.len() > caps.primary {
                merge_last_segments(&mut spectrum.segments);
            }
            DiagramContent::Spectrum(spectrum)
        }
        DiagramContent::Comparison(mut comparison) => {
            if comparison.panels.len() > caps.primary {
                warn!(
                    dropped = comparison.panels.len() - caps.primary,
                    "truncating comparison panels to cap"
                );
                comparison.panels.truncate(caps.primary);
            }
            for panel in &mut comparison.panels {
                while panel.features.len() > caps.secondary {
                    let last = panel.features.pop().unwrap_or_default();
                    if let Some(prev) = panel.features.last_mut() {
                        prev.push_str("; ");
                        prev.push_str(last.trim());
                    }
                }
            }
            DiagramContent::Comparison(comparison)
        }
    }
}

/// Universal last-resort fallback: re-express any content as a table.
pub fn fallback_table(title: &str, content: &DiagramContent) -> TableSpec {
    warn!(kind = ?content.kind(), title, "substituting table layout for oversized content");
    match content {
        DiagramContent::Table(table) => table.clone(),
        DiagramContent::Flowchart(flow) => TableSpec {
            headers: vec!["#".into(), "Step".into()],
            rows: flow
                .steps
                .iter()
                .filter(|s| !s.trim_end().ends_with(':'))
                .enumerate()
                .map(|(i, step)| vec![(i + 1).to_string(), step.clone()])
                .collect(),
        },
        DiagramContent::DecisionTree(tree) => {
            let mut rows = Vec::new();
            collect_outcome_rows(&tree.root, &mut Vec::new(), &mut rows);
            TableSpec {
                headers: vec!["Path".into(), "Outcome".into()],
                rows,
            }
        }
        DiagramContent::Timeline(timeline) => TableSpec {
            headers: vec!["Date".into(), "Event".into()],
            rows: timeline
                .events
                .iter()
                .map(|e| vec![e.date.clone(), e.text.clone()])
                .collect(),
        },
        DiagramContent::Hierarchy(hierarchy) => {
            let mut rows = Vec::new();
            collect_parent_rows(&hierarchy.root, &mut rows);
            TableSpec {
                headers: vec!["Parent".into(), "Children".into()],
                rows,
            }
        }
        DiagramContent::Spectrum(spectrum) => TableSpec {
            headers: vec!["Position".into(), "Segment".into()],
            rows: spectrum
                .segments
                .iter()
                .enumerate()
                .map(|(i, seg)| {
                    let label = match &seg.detail {
                        Some(detail) => format!("{} - {}", seg.label, detail),
                        None => seg.label.clone(),
                    };
                    vec![(i + 1).to_string(), label]
                })
                .collect(),
        },
        DiagramContent::Comparison(comparison) => {
            let panels: Vec<_> = comparison.panels.iter().take(4).collect();
            let feature_rows = panels.iter().map(|p| p.features.len()).max().unwrap_or(0);
            let rows = (0..feature_rows)
                .map(|i| {
                    panels
                        .iter()
                        .map(|p| p.features.get(i).cloned().unwrap_or_default())
                        .collect()
                })
                .collect();
            TableSpec {
                headers: panels.iter().map(|p| p.concept.clone()).collect(),
                rows,
            }
        }
    }
}

fn merge_last_rows(rows: &mut Vec<Vec<String>>) {
    let Some(last) = rows.pop() else { return };
    if let Some(prev) = rows.last_mut() {
        for (i, cell) in last.into_iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match prev.get_mut(i) {
                Some(target) if !target.is_empty() => {
                    target.push_str("; ");
                    target.push_str(&cell);
                }
                Some(target) => *target = cell,
                None => prev.push(cell),
            }
        }
    }
}

fn merge_last_segments(segments: &mut Vec<SpectrumSegment>) {
    let Some(last) = segments.pop() else { return };
    if let Some(prev) = segments.last_mut() {
        prev.label.push_str(" / ");
        prev.label.push_str(&last.label);
        if prev.detail.is_none() {
            prev.detail = last.detail;
        }
    }
}

/// Convert decisions below `max_decision_depth` into outcomes carrying
/// their question text, trimming the tree one level at a time.
fn prune_decision(node: &mut DecisionNode, remaining: usize) {
    if let DecisionNode::Decision { text, branches } = node {
        if remaining == 0 {
            let text = std::mem::take(text);
            *node = DecisionNode::Outcome { text };
        } else {
            for branch in branches.iter_mut() {
                prune_decision(&mut branch.child, remaining - 1);
            }
        }
    }
}

fn collect_outcome_rows(
    node: &DecisionNode,
    path: &mut Vec<String>,
    rows: &mut Vec<Vec<String>>,
) {
    match node {
        DecisionNode::Outcome { text } => {
            rows.push(vec![path.join(" / "), text.clone()]);
        }
        DecisionNode::Decision { branches, .. } => {
            for DecisionBranch { label, child } in branches {
                path.push(label.clone());
                collect_outcome_rows(child, path, rows);
                path.pop();
            }
        }
    }
}

fn collect_parent_rows(node: &crate::spec::HierarchyNode, rows: &mut Vec<Vec<String>>) {
    if !node.children.is_empty() {
        let children: Vec<&str> = node.children.iter().map(|c| c.label.as_str()).collect();
        rows.push(vec![node.label.clone(), children.join(", ")]);
        for child in &node.children {
            collect_parent_rows(child, rows);
        }
    }
}

fn deepest_level(node: &crate::spec::HierarchyNode, level: usize) -> usize {
    node.children
        .iter()
        .map(|c| deepest_level(c, level + 1))
        .max()
        .unwrap_or(level)
}

/// Fold the children of every node at `target_level` into their parent's
/// label, removing one tree level.
fn flatten_level(node: &mut crate::spec::HierarchyNode, level: usize, target_level: usize) {
    if level == target_level {
        if !node.children.is_empty() {
            let folded: Vec<String> = node.children.drain(..).map(|c| c.label).collect();
            node.label.push_str(" (");
            node.label.push_str(&folded.join(", "));
            node.label.push(')');
        }
    } else {
        for child in &mut node.children {
            flatten_level(child, level + 1, target_level);
        }
    }
}
