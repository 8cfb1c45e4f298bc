//! Sibling spacing.
//!
//! One formula positions every "N boxes under a shared reference" case in
//! the engine: hierarchy siblings, decision outcomes, timeline cards,
//! comparison panels. Diagram builders must route through it instead of
//! duplicating spacing arithmetic.

/// Total horizontal span `count` boxes of `child_width` need at `min_gap`.
///
/// Callers placing siblings whose own subtrees are wider than the boxes
/// themselves pre-compute this for the subtree slot width before
/// distributing; the two-child case is the most overlap-prone and relies
/// on this being explicit.
pub fn required_span(child_width: f64, count: usize, min_gap: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * child_width + (count.saturating_sub(1)) as f64 * min_gap
}

/// Left coordinates for `count` siblings of `child_width` under a parent
/// span, keeping at least `min_gap` between adjacent boxes.
///
/// When the required span fits, the row is centered under the parent.
/// When it does not, the row stays centered on the parent's center and
/// extends symmetrically beyond both parent edges.
pub fn distribute_siblings(
    parent_left: f64,
    parent_width: f64,
    child_width: f64,
    count: usize,
    min_gap: f64,
) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let required = required_span(child_width, count, min_gap);
    // Centering handles both cases: a row narrower than the parent starts
    // inside it, a wider row starts (required - parent) / 2 to the left.
    let start = parent_left + (parent_width - required) / 2.0;
    (0..count)
        .map(|i| start + i as f64 * (child_width + min_gap))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn adjacent_gap_never_undercuts_minimum() {
        for count in 1..=10usize {
            for child_width in [0.5, 1.0, 2.5, 5.0] {
                let lefts = distribute_siblings(0.0, 3.0, child_width, count, 0.5);
                assert_eq!(lefts.len(), count);
                for pair in lefts.windows(2) {
                    let gap = pair[1] - (pair[0] + child_width);
                    assert!(gap >= 0.5 - EPS, "gap {gap} for n={count} w={child_width}");
                }
            }
        }
    }

    #[test]
    fn narrow_row_is_centered_under_parent() {
        let lefts = distribute_siblings(2.0, 8.0, 1.0, 2, 0.5);
        // Row spans 2.5, centered in [2, 10] => starts at 4.75.
        assert!((lefts[0] - 4.75).abs() < EPS);
        assert!((lefts[1] - 6.25).abs() < EPS);
    }

    #[test]
    fn two_children_extend_symmetrically_past_a_narrow_parent() {
        // Children of width 2.5 under a 3.0-wide parent at left 0:
        // required span 5.5, extension 1.25 per side, gap exactly 0.5.
        let lefts = distribute_siblings(0.0, 3.0, 2.5, 2, 0.5);
        assert!((lefts[0] - (-1.25)).abs() < EPS);
        assert!((lefts[1] - 2.75).abs() < EPS);
        let gap = lefts[1] - (lefts[0] + 2.5);
        assert!((gap - 0.5).abs() < EPS);
        // Symmetric: right overhang equals left overhang.
        let right_overhang = (lefts[1] + 2.5) - 3.0;
        assert!((right_overhang - 1.25).abs() < EPS);
    }

    #[test]
    fn single_child_sits_on_parent_center() {
        let lefts = distribute_siblings(1.0, 4.0, 2.0, 1, 0.5);
        assert!((lefts[0] - 2.0).abs() < EPS);
    }

    #[test]
    fn required_span_matches_distribution_extent() {
        let lefts = distribute_siblings(0.0, 1.0, 1.5, 4, 0.5);
        let extent = lefts.last().unwrap() + 1.5 - lefts.first().unwrap();
        assert!((extent - required_span(1.5, 4, 0.5)).abs() < EPS);
    }
}
