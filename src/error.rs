use thiserror::Error;

use crate::spec::DiagramKind;

/// Errors surfaced by the layout engine.
///
/// Capacity overruns and validation failures are deliberately *not* here:
/// they travel back to the caller as data (`Selection::Degrade`,
/// `ValidationReport`) so the content pipeline can react by changing its
/// input instead of unwinding.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The wrap-and-remeasure loop in the sizer did not converge within its
    /// iteration cap. This indicates a configuration inconsistency (for
    /// example a maximum box width narrower than a single character), not a
    /// recoverable content problem.
    #[error(
        "text sizing did not converge after {iterations} passes (max width {max_width:.3}, longest line {longest_line} chars)"
    )]
    SizingNonConvergence {
        iterations: u32,
        max_width: f64,
        longest_line: usize,
    },

    /// Content volume exceeded every variant of every fallback, including
    /// the table substitution, within the bounded degrade loop.
    #[error("{kind:?} content exceeds every layout variant after {attempts} degrade attempts")]
    CapacityExceeded { kind: DiagramKind, attempts: u32 },
}
