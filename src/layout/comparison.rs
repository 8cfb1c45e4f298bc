//! Comparison layout: side-by-side concept panels, each with a header
//! and a bulleted feature list.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::layout::types::{Diagram, Node, Role};
use crate::layout::{content_frame, title_node};
use crate::spacing::distribute_siblings;
use crate::spec::{ComparisonSpec, DiagramKind};
use crate::template::LayoutTemplate;
use crate::textfit::{fit_box, wrap_to_caps};

const PANEL_PAD: f64 = 0.15;
const HEADER_GAP: f64 = 0.25;

pub(super) fn compute_comparison_layout(
    title: &str,
    spec: &ComparisonSpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();

    let count = spec.panels.len();
    if count == 0 {
        return Ok(Diagram {
            kind: DiagramKind::Comparison,
            variant: template.variant,
            title: title.to_string(),
            nodes,
            edges: Vec::new(),
        });
    }

    let min_gap = config.spacing.min_gap;
    let panel_width = (frame.width - count.saturating_sub(1) as f64 * min_gap) / count as f64;
    let inner_width = panel_width - PANEL_PAD * 2.0;
    let metrics = config.text.compact_metrics();
    let lefts = distribute_siblings(frame.left, frame.width, panel_width, count, min_gap);

    for (index, (panel, left)) in spec.panels.iter().zip(lefts).enumerate() {
        nodes.push(Node {
            id: format!("panel_{index}"),
            lines: Vec::new(),
            left,
            top: frame.top,
            width: panel_width,
            height: frame.height,
            level: 0,
            role: Role::Background,
        });

        let concept_lines = wrap_to_caps(&panel.concept, config.caps.table_cell);
        // Concept headers carry the panel and use the standard height
        // calibration; the feature list below stays compact.
        let concept = fit_box(
            &concept_lines,
            inner_width,
            config.text.standard_metrics(),
            &config.text,
        )?;
        let concept_height = concept.height + 0.1;
        nodes.push(Node {
            id: format!("concept_{index}"),
            lines: concept.lines,
            left: left + PANEL_PAD,
            top: frame.top + PANEL_PAD,
            width: inner_width,
            height: concept_height,
            level: 0,
            role: Role::Concept,
        });

        if panel.features.is_empty() {
            continue;
        }
        let mut bullet_lines = Vec::new();
        for feature in &panel.features {
            for (line_index, line) in wrap_to_caps(feature, config.caps.feature).into_iter().enumerate() {
                if line_index == 0 {
                    bullet_lines.push(format!("\u{2022} {line}"));
                } else {
                    bullet_lines.push(format!("  {line}"));
                }
            }
        }
        let features = fit_box(&bullet_lines, inner_width, metrics, &config.text)?;
        nodes.push(Node {
            id: format!("features_{index}"),
            lines: features.lines,
            left: left + PANEL_PAD,
            top: frame.top + PANEL_PAD + concept_height + HEADER_GAP,
            width: inner_width,
            height: features.height,
            level: 1,
            role: Role::Feature,
        });
    }

    Ok(Diagram {
        kind: DiagramKind::Comparison,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges: Vec::new(),
    })
}
