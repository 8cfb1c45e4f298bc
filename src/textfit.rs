//! Text-fit sizing.
//!
//! Estimates the minimum box that holds a run of text at the configured
//! minimum font, using an average-character-width heuristic. When the
//! estimated width exceeds the caller's maximum, the text is re-wrapped
//! into more lines and re-measured; that fixed-point loop is bounded and
//! fails loudly if it does not converge, since non-convergence means the
//! configuration is inconsistent (e.g. a box narrower than one glyph).

use crate::config::{BoxMetrics, LineCaps, TextConfig};
use crate::error::LayoutError;

const MAX_FIT_PASSES: u32 = 5;

/// Result of sizing a run of text: the (possibly re-wrapped) lines and
/// the minimum box that holds them.
#[derive(Debug, Clone)]
pub struct FitBox {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

/// Compute the minimum box for `lines`, re-wrapping to fit `max_width`.
///
/// Height is `base + line_count * per_line` from `metrics` (already scaled
/// to the configured font). Width and height are monotonically
/// non-decreasing in text length and line count.
pub fn fit_box(
    lines: &[String],
    max_width: f64,
    metrics: BoxMetrics,
    text: &TextConfig,
) -> Result<FitBox, LayoutError> {
    let avg_char = text.avg_char_width();
    let mut current: Vec<String> = lines
        .iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    if current.is_empty() {
        current.push(String::new());
    }

    for pass in 0..MAX_FIT_PASSES {
        let width = estimate_width(&current, avg_char);
        if width <= max_width {
            return Ok(FitBox {
                height: box_height(current.len(), metrics),
                width,
                lines: current,
            });
        }
        let budget = (max_width / avg_char).floor() as usize;
        let rewrapped = rewrap(&current, budget);
        if rewrapped == current {
            // No further progress is possible; the loop would spin.
            return Err(LayoutError::SizingNonConvergence {
                iterations: pass + 1,
                max_width,
                longest_line: longest_line(&current),
            });
        }
        current = rewrapped;
    }

    Err(LayoutError::SizingNonConvergence {
        iterations: MAX_FIT_PASSES,
        max_width,
        longest_line: longest_line(lines),
    })
}

/// Wrap raw text to a per-element cap, truncating with an ellipsis when
/// the capped line count cannot hold it. Builders apply this before
/// sizing so boxes stay within their class's readable budget.
pub fn wrap_to_caps(text: &str, caps: LineCaps) -> Vec<String> {
    let wrapped = wrap_words(text.trim(), caps.max_chars.max(1));
    if wrapped.len() <= caps.max_lines {
        return wrapped;
    }
    let mut lines: Vec<String> = wrapped.into_iter().take(caps.max_lines).collect();
    if let Some(last) = lines.last_mut() {
        truncate_with_ellipsis(last, caps.max_chars.max(1));
    }
    lines
}

/// Re-apply a line cap after width-driven re-wrapping, which can split
/// capped lines further. Truncates to `max_lines` and marks the cut with
/// an ellipsis, kept within `max_chars` so width estimates stay honest.
pub(crate) fn cap_lines(lines: &mut Vec<String>, max_lines: usize, max_chars: usize) {
    if lines.len() <= max_lines.max(1) {
        return;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        last.push('\u{2026}');
        truncate_with_ellipsis(last, max_chars.max(1));
    }
}

pub(crate) fn box_height(line_count: usize, metrics: BoxMetrics) -> f64 {
    metrics.base_height + line_count as f64 * metrics.per_line_height
}

pub(crate) fn estimate_width(lines: &[String], avg_char: f64) -> f64 {
    longest_line(lines) as f64 * avg_char
}

fn longest_line(lines: &[String]) -> usize {
    lines.iter().map(|line| line.chars().count()).max().unwrap_or(0)
}

fn rewrap(lines: &[String], budget: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if line.chars().count() <= budget {
            out.push(line.clone());
        } else {
            out.extend(wrap_words(line, budget.max(1)));
        }
    }
    out
}

fn wrap_words(text: &str, budget: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > budget && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else if current.is_empty() {
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn truncate_with_ellipsis(line: &mut String, budget: usize) {
    let count = line.chars().count();
    if count <= budget {
        return;
    }
    let keep = budget.saturating_sub(1).max(1);
    let truncated: String = line.chars().take(keep).collect();
    *line = format!("{}\u{2026}", truncated.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextConfig;

    fn text() -> TextConfig {
        TextConfig::default()
    }

    fn standard(text: &TextConfig) -> BoxMetrics {
        text.standard_metrics()
    }

    #[test]
    fn three_lines_at_reference_font_measure_2_8() {
        let text = text();
        let lines = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let fit = fit_box(&lines, 10.0, standard(&text), &text).expect("fits");
        assert!((fit.height - 2.8).abs() < 1e-9, "got {}", fit.height);
    }

    #[test]
    fn height_is_monotone_in_line_count() {
        let text = text();
        let mut prev = 0.0;
        for n in 1..=6 {
            let lines: Vec<String> = (0..n).map(|i| format!("line {i}")).collect();
            let fit = fit_box(&lines, 10.0, standard(&text), &text).expect("fits");
            assert!(fit.height >= prev);
            prev = fit.height;
        }
    }

    #[test]
    fn width_is_monotone_in_text_length() {
        let text = text();
        let short = fit_box(&["abc".to_string()], 10.0, standard(&text), &text).unwrap();
        let long = fit_box(&["abcdefgh".to_string()], 10.0, standard(&text), &text).unwrap();
        assert!(long.width >= short.width);
    }

    #[test]
    fn overlong_line_rewraps_and_grows_height() {
        let text = text();
        let avg = text.avg_char_width();
        let line = "alpha beta gamma delta epsilon zeta".to_string();
        let narrow = 12.0 * avg;
        let fit = fit_box(&[line.clone()], narrow, standard(&text), &text).expect("converges");
        assert!(fit.lines.len() > 1);
        assert!(fit.width <= narrow + 1e-9);
        let wide = fit_box(&[line], 10.0, standard(&text), &text).unwrap();
        assert!(fit.height > wide.height);
    }

    #[test]
    fn unsplittable_word_fails_loudly() {
        let text = text();
        let avg = text.avg_char_width();
        let result = fit_box(
            &["incomprehensibilities".to_string()],
            3.0 * avg,
            standard(&text),
            &text,
        );
        assert!(matches!(
            result,
            Err(LayoutError::SizingNonConvergence { .. })
        ));
    }

    #[test]
    fn wrap_to_caps_truncates_beyond_line_budget() {
        let caps = LineCaps {
            max_lines: 2,
            max_chars: 10,
        };
        let lines = wrap_to_caps("one two three four five six seven", caps);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('\u{2026}'));
    }

    #[test]
    fn cap_lines_truncates_rewrapped_overflow_within_budget() {
        let mut lines = vec![
            "alpha beta".to_string(),
            "gamma delta".to_string(),
            "epsilon".to_string(),
        ];
        cap_lines(&mut lines, 2, 11);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('\u{2026}'));
        assert!(lines.iter().all(|l| l.chars().count() <= 11));

        let mut short = vec!["one".to_string(), "two".to_string()];
        cap_lines(&mut short, 2, 11);
        assert_eq!(short, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn wrap_to_caps_leaves_short_text_alone() {
        let caps = LineCaps {
            max_lines: 2,
            max_chars: 30,
        };
        assert_eq!(wrap_to_caps("short", caps), vec!["short".to_string()]);
    }
}
