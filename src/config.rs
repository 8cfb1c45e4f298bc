//! Engine configuration.
//!
//! Every numeric constant the builders consume lives here rather than in
//! call sites: canvas size, font sizing calibration, gaps, stroke widths,
//! and the per-kind text caps. Defaults target a 13.33 x 7.5 slide with an
//! 18 pt minimum font.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    pub text: TextConfig,
    pub spacing: SpacingConfig,
    pub stroke: StrokeConfig,
    pub caps: CapsConfig,
}

/// The fixed-size rendering surface for one slide, in slide units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Outer margin kept free of content on all four sides.
    pub margin: f64,
    /// Height reserved at the top for the diagram title band.
    pub title_band: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 13.33,
            height: 7.5,
            margin: 0.4,
            title_band: 0.9,
        }
    }
}

/// Text sizing calibration.
///
/// `base_height` and `per_line_height` are calibrated at
/// `reference_font_pt`; the sizer scales them linearly when the minimum
/// font differs, so the ratio is re-derived instead of silently reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub min_font_pt: f64,
    pub reference_font_pt: f64,
    /// Box chrome (padding, rule space) above and below the text run, for
    /// prominent single-row boxes such as spectrum segments and comparison
    /// concept headers.
    pub base_height: f64,
    pub per_line_height: f64,
    /// Compact metrics for dense multi-row elements: table cells, tree
    /// boxes, steps, timeline cards, branch labels. Also the floor the
    /// validator holds every node to.
    pub compact_base_height: f64,
    pub compact_per_line_height: f64,
    /// Average glyph advance as a fraction of the font size (em units).
    pub avg_char_em: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            min_font_pt: 18.0,
            reference_font_pt: 18.0,
            base_height: 0.7,
            per_line_height: 0.7,
            compact_base_height: 0.12,
            compact_per_line_height: 0.32,
            avg_char_em: 0.56,
        }
    }
}

impl TextConfig {
    /// Average character width in slide units at the configured minimum
    /// font (points are 1/72 of a slide unit).
    pub fn avg_char_width(&self) -> f64 {
        self.min_font_pt * self.avg_char_em / 72.0
    }

    fn scale(&self) -> f64 {
        self.min_font_pt / self.reference_font_pt.max(1.0)
    }

    /// Standard box metrics scaled to the configured font.
    pub fn standard_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            base_height: self.base_height * self.scale(),
            per_line_height: self.per_line_height * self.scale(),
        }
    }

    /// Compact box metrics scaled to the configured font.
    pub fn compact_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            base_height: self.compact_base_height * self.scale(),
            per_line_height: self.compact_per_line_height * self.scale(),
        }
    }
}

/// Height calibration for one class of box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub base_height: f64,
    pub per_line_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Minimum gap between adjacent sibling boxes.
    pub min_gap: f64,
    /// Minimum vertical (or horizontal, for lateral diagrams) clearance
    /// between parent and child rows, leaving room for connectors.
    pub level_gap: f64,
    /// Gap between chained elements (flowchart steps, timeline cards).
    pub chain_gap: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            min_gap: 0.5,
            level_gap: 1.0,
            chain_gap: 0.35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub line_width: f64,
    pub arrow_head_length: f64,
    pub arrow_head_width: f64,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            line_width: 0.03,
            arrow_head_length: 0.18,
            arrow_head_width: 0.14,
        }
    }
}

/// Character/line caps per element class, applied before sizing so boxes
/// stay readable at the minimum font.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsConfig {
    pub table_cell: LineCaps,
    pub step: LineCaps,
    pub decision: LineCaps,
    pub event: LineCaps,
    pub hierarchy: LineCaps,
    pub segment: LineCaps,
    pub feature: LineCaps,
}

impl Default for CapsConfig {
    fn default() -> Self {
        Self {
            table_cell: LineCaps { max_lines: 2, max_chars: 30 },
            step: LineCaps { max_lines: 2, max_chars: 35 },
            decision: LineCaps { max_lines: 2, max_chars: 25 },
            event: LineCaps { max_lines: 3, max_chars: 24 },
            hierarchy: LineCaps { max_lines: 2, max_chars: 22 },
            segment: LineCaps { max_lines: 2, max_chars: 18 },
            feature: LineCaps { max_lines: 2, max_chars: 32 },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineCaps {
    pub max_lines: usize,
    pub max_chars: usize,
}

/// Load configuration from a JSON file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let config = serde_json::from_str(&raw)?;
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_slide_shaped() {
        let config = EngineConfig::default();
        assert!((config.canvas.width - 13.33).abs() < 1e-9);
        assert!((config.canvas.height - 7.5).abs() < 1e-9);
        assert!((config.spacing.min_gap - 0.5).abs() < 1e-9);
    }

    #[test]
    fn metrics_scale_with_font_size() {
        let mut text = TextConfig::default();
        assert!((text.standard_metrics().per_line_height - 0.7).abs() < 1e-9);
        text.min_font_pt = 36.0;
        assert!((text.standard_metrics().per_line_height - 1.4).abs() < 1e-9);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"canvas": {"width": 10.0}}"#).expect("parses");
        assert!((config.canvas.width - 10.0).abs() < 1e-9);
        assert!((config.canvas.height - 7.5).abs() < 1e-9);
        assert!((config.text.min_font_pt - 18.0).abs() < 1e-9);
    }
}
