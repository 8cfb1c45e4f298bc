//! Spectrum layout: an ordered band of segments over a directional axis,
//! with optional labels at the two extremes.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::geometry::Point;
use crate::layout::types::{Diagram, Edge, Node, Role};
use crate::layout::{content_frame, push_arrow, title_node};
use crate::spacing::distribute_siblings;
use crate::spec::{DiagramKind, SpectrumSpec};
use crate::template::LayoutTemplate;
use crate::textfit::{fit_box, wrap_to_caps};

/// Vertical clearance between the segment band and the axis arrow.
const AXIS_GAP: f64 = 0.45;

pub(super) fn compute_spectrum_layout(
    title: &str,
    spec: &SpectrumSpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();
    let mut edges: Vec<Edge> = Vec::new();

    let count = spec.segments.len();
    if count == 0 {
        return Ok(Diagram {
            kind: DiagramKind::Spectrum,
            variant: template.variant,
            title: title.to_string(),
            nodes,
            edges,
        });
    }

    let min_gap = config.spacing.min_gap;
    let segment_width = (frame.width - count.saturating_sub(1) as f64 * min_gap) / count as f64;
    // Segments are the primary boxes of this kind and get the standard
    // height calibration; only the end labels stay compact.
    let metrics = config.text.standard_metrics();

    let mut fits = Vec::with_capacity(count);
    let mut band_height: f64 = 0.0;
    for segment in &spec.segments {
        let mut lines = wrap_to_caps(&segment.label, config.caps.segment);
        if let Some(detail) = &segment.detail {
            lines.extend(wrap_to_caps(detail, config.caps.segment));
        }
        let fit = fit_box(&lines, segment_width - 0.15, metrics, &config.text)?;
        band_height = band_height.max(fit.height);
        fits.push(fit);
    }

    let label_height = config.text.compact_metrics().base_height
        + config.text.compact_metrics().per_line_height;
    let extra_below = if spec.ends.is_some() {
        AXIS_GAP + label_height
    } else {
        AXIS_GAP
    };
    let band_top = frame.top + ((frame.height - band_height - extra_below) / 2.0).max(0.0);
    let axis_y = band_top + band_height + AXIS_GAP;

    let lefts = distribute_siblings(frame.left, frame.width, segment_width, count, min_gap);
    for (index, (fit, left)) in fits.into_iter().zip(lefts).enumerate() {
        // Segments share one band height so the row reads as a scale.
        nodes.push(Node {
            id: format!("segment_{index}"),
            lines: fit.lines,
            left,
            top: band_top,
            width: segment_width,
            height: band_height,
            level: 0,
            role: Role::Segment,
        });
    }

    push_arrow(
        &mut edges,
        Point::new(frame.left, axis_y),
        Point::new(frame.right(), axis_y),
        config,
    );

    if let Some((low, high)) = &spec.ends {
        let label_top = axis_y + 0.1;
        let avg_char = config.text.avg_char_width();
        for (text, at_left) in [(low, true), (high, false)] {
            let width = (text.chars().count() as f64 * avg_char + 0.1).min(frame.width / 3.0);
            nodes.push(Node {
                id: if at_left { "end_low" } else { "end_high" }.to_string(),
                lines: vec![text.clone()],
                left: if at_left { frame.left } else { frame.right() - width },
                top: label_top,
                width,
                height: label_height,
                level: 0,
                role: Role::Axis,
            });
        }
    }

    Ok(Diagram {
        kind: DiagramKind::Spectrum,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges,
    })
}
