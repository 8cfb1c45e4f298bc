//! Table layout: a header row plus data rows on a uniform column grid.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::layout::types::{Diagram, Node, Role};
use crate::layout::{content_frame, title_node};
use crate::spec::TableSpec;
use crate::template::LayoutTemplate;
use crate::textfit::{box_height, cap_lines, fit_box, wrap_to_caps};

const CELL_GUTTER: f64 = 0.08;
const CELL_PAD: f64 = 0.12;

pub(super) fn compute_table_layout(
    title: &str,
    spec: &TableSpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();

    let cols = spec
        .headers
        .len()
        .max(spec.rows.iter().map(Vec::len).max().unwrap_or(0))
        .max(1);
    let col_width = (frame.width - (cols - 1) as f64 * CELL_GUTTER) / cols as f64;
    let metrics = config.text.compact_metrics();
    let caps = config.caps.table_cell;

    // Fit every cell's text first; row heights come from the tallest cell.
    let mut fitted_rows: Vec<Vec<Vec<String>>> = Vec::with_capacity(spec.rows.len() + 1);
    let mut row_heights: Vec<f64> = Vec::with_capacity(spec.rows.len() + 1);
    let header_row: Vec<&str> = spec.headers.iter().map(String::as_str).collect();
    let all_rows = std::iter::once(header_row).chain(
        spec.rows
            .iter()
            .map(|row| row.iter().map(String::as_str).collect()),
    );
    for row in all_rows {
        let mut fitted: Vec<Vec<String>> = Vec::with_capacity(cols);
        let mut height: f64 = 0.0;
        let char_budget = ((col_width - CELL_PAD) / config.text.avg_char_width()).floor() as usize;
        for col in 0..cols {
            let text = row.get(col).copied().unwrap_or("");
            let lines = wrap_to_caps(text, caps);
            let mut fit = fit_box(&lines, col_width - CELL_PAD, metrics, &config.text)?;
            // The narrow-column re-wrap can exceed the cell line cap.
            cap_lines(&mut fit.lines, caps.max_lines, char_budget);
            height = height.max(box_height(fit.lines.len(), metrics));
            fitted.push(fit.lines);
        }
        fitted_rows.push(fitted);
        row_heights.push(height + CELL_PAD);
    }

    let total_height: f64 =
        row_heights.iter().sum::<f64>() + (row_heights.len() - 1) as f64 * CELL_GUTTER;
    let mut top = frame.top + ((frame.height - total_height) / 2.0).max(0.0);

    for (row_index, (row, height)) in fitted_rows.into_iter().zip(row_heights).enumerate() {
        let role = if row_index == 0 { Role::Header } else { Role::Cell };
        for (col, lines) in row.into_iter().enumerate() {
            let left = frame.left + col as f64 * (col_width + CELL_GUTTER);
            let id = if row_index == 0 {
                format!("header_c{col}")
            } else {
                format!("cell_r{}_c{col}", row_index - 1)
            };
            nodes.push(Node {
                id,
                lines,
                left,
                top,
                width: col_width,
                height,
                level: 0,
                role,
            });
        }
        top += height + CELL_GUTTER;
    }

    Ok(Diagram {
        kind: crate::spec::DiagramKind::Table,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges: Vec::new(),
    })
}
