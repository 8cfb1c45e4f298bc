//! Flowchart layout: a chain of step boxes joined by arrows, in one or
//! two columns depending on the template.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::layout::types::{Diagram, Edge, Node, Role};
use crate::layout::{content_frame, push_arrow, sized_box, title_node};
use crate::spec::{DiagramKind, FlowchartSpec};
use crate::template::{Arrangement, LayoutTemplate};
use crate::textfit::wrap_to_caps;

const MIN_STEP_WIDTH: f64 = 2.2;

pub(super) fn compute_flowchart_layout(
    title: &str,
    spec: &FlowchartSpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();
    let mut edges: Vec<Edge> = Vec::new();

    // Category headers (trailing colon) are organizational text, not steps.
    let steps: Vec<&str> = spec
        .steps
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim_end().ends_with(':'))
        .collect();
    if steps.is_empty() {
        return Ok(Diagram {
            kind: DiagramKind::Flowchart,
            variant: template.variant,
            title: title.to_string(),
            nodes,
            edges,
        });
    }

    let two_columns = template.arrangement == Arrangement::DoubleColumn && steps.len() > 1;
    let max_width = if two_columns {
        (frame.width - config.spacing.min_gap) / 2.0
    } else {
        frame.width * 0.6
    };

    let metrics = config.text.compact_metrics();
    let mut fits = Vec::with_capacity(steps.len());
    let mut box_width: f64 = MIN_STEP_WIDTH.min(max_width);
    for step in &steps {
        let lines = wrap_to_caps(step, config.caps.step);
        let fit = sized_box(&lines, max_width, MIN_STEP_WIDTH, metrics, config.caps.step, config)?;
        box_width = box_width.max(fit.width);
        fits.push(fit);
    }

    let gap = config.spacing.chain_gap + config.stroke.arrow_head_length;
    if two_columns {
        let split = steps.len().div_ceil(2);
        let column_lefts = crate::spacing::distribute_siblings(
            frame.left,
            frame.width,
            box_width,
            2,
            frame.width - 2.0 * box_width,
        );
        for (column, chunk) in [&fits[..split], &fits[split..]].into_iter().enumerate() {
            let tops = stacked_tops(chunk, frame.top, frame.height, gap);
            let left = column_lefts[column];
            for (offset, (fit, top)) in chunk.iter().zip(&tops).enumerate() {
                let index = column * split + offset;
                nodes.push(step_node(index, fit.lines.clone(), left, *top, box_width, fit.height));
            }
        }
        chain_column(&mut edges, &nodes, 0, split, config);
        chain_column(&mut edges, &nodes, split, steps.len(), config);
        // Bridge from the foot of the first column to the head of the
        // second, side to side so it stays out of both columns.
        if split < steps.len() {
            let tail = content(&nodes, split - 1);
            let head = content(&nodes, split);
            let from = crate::geometry::Point::new(tail.rect().right(), tail.center().y);
            let to = crate::geometry::Point::new(head.left, head.center().y);
            push_arrow(&mut edges, from, to, config);
        }
    } else {
        let tops = stacked_tops(&fits, frame.top, frame.height, gap);
        let left = frame.center().x - box_width / 2.0;
        for (index, (fit, top)) in fits.iter().zip(&tops).enumerate() {
            nodes.push(step_node(index, fit.lines.clone(), left, *top, box_width, fit.height));
        }
        chain_column(&mut edges, &nodes, 0, steps.len(), config);
    }

    Ok(Diagram {
        kind: DiagramKind::Flowchart,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges,
    })
}

fn step_node(index: usize, lines: Vec<String>, left: f64, top: f64, width: f64, height: f64) -> Node {
    Node {
        id: format!("step_{index}"),
        lines,
        left,
        top,
        width,
        height,
        level: 0,
        role: Role::Step,
    }
}

/// Vertical tops for a stacked column, centered within the frame height.
fn stacked_tops(fits: &[crate::textfit::FitBox], frame_top: f64, frame_height: f64, gap: f64) -> Vec<f64> {
    let total: f64 =
        fits.iter().map(|f| f.height).sum::<f64>() + fits.len().saturating_sub(1) as f64 * gap;
    let mut top = frame_top + ((frame_height - total) / 2.0).max(0.0);
    let mut tops = Vec::with_capacity(fits.len());
    for fit in fits {
        tops.push(top);
        top += fit.height + gap;
    }
    tops
}

/// Step nodes only, skipping the title node when present.
fn content(nodes: &[Node], index: usize) -> &Node {
    nodes.iter().filter(|n| n.role == Role::Step).nth(index).unwrap_or(&nodes[0])
}

fn chain_column(edges: &mut Vec<Edge>, nodes: &[Node], start: usize, end: usize, config: &EngineConfig) {
    for index in start + 1..end {
        let from = content(nodes, index - 1).bottom_center();
        let to = content(nodes, index).top_center();
        push_arrow(edges, from, to, config);
    }
}
