//! Timeline layout: event cards tied to a left-to-right axis arrow,
//! either all above it or alternating above and below.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::geometry::Point;
use crate::layout::types::{Diagram, Edge, Node, Role};
use crate::layout::{content_frame, push_arrow, push_connector, title_node};
use crate::spacing::distribute_siblings;
use crate::spec::{DiagramKind, TimelineSpec};
use crate::template::{Arrangement, LayoutTemplate};
use crate::textfit::{fit_box, wrap_to_caps};

const MIN_CARD_WIDTH: f64 = 1.4;
const MAX_CARD_WIDTH: f64 = 2.6;
/// Clearance between a card and the axis, spanned by its connector.
const AXIS_DROP: f64 = 0.35;

pub(super) fn compute_timeline_layout(
    title: &str,
    spec: &TimelineSpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();
    let mut edges: Vec<Edge> = Vec::new();

    let count = spec.events.len();
    if count == 0 {
        return Ok(Diagram {
            kind: DiagramKind::Timeline,
            variant: template.variant,
            title: title.to_string(),
            nodes,
            edges,
        });
    }

    let alternating = template.arrangement == Arrangement::AxisAlternating;
    let metrics = config.text.compact_metrics();

    // Card width: fill the axis, but stay within readable bounds. In the
    // alternating arrangement neighbours sit on opposite sides, so cards
    // may be wider than an even split as long as same-side cards (two
    // positions apart) keep the minimum gap.
    let min_gap = config.spacing.min_gap;
    let card_width = if alternating {
        let fill = (frame.width - count.saturating_sub(1) as f64 * min_gap / 2.0)
            / ((count + 1) as f64 / 2.0);
        fill.clamp(MIN_CARD_WIDTH, MAX_CARD_WIDTH)
    } else {
        let even = (frame.width - count.saturating_sub(1) as f64 * min_gap) / count as f64;
        even.clamp(MIN_CARD_WIDTH, MAX_CARD_WIDTH)
    };

    let mut fits = Vec::with_capacity(count);
    for event in &spec.events {
        let mut lines = vec![event.date.trim().to_string()];
        lines.extend(wrap_to_caps(&event.text, config.caps.event));
        let fit = fit_box(&lines, card_width - 0.15, metrics, &config.text)?;
        fits.push(fit);
    }

    // Spread the cards across the whole axis rather than clustering them.
    // Alternating cards may overlap horizontally (they face away from each
    // other vertically), but never so far that same-side cards close in.
    let gap_floor = if alternating {
        (min_gap - card_width) / 2.0
    } else {
        min_gap
    };
    let spread_gap = if count > 1 {
        ((frame.width - count as f64 * card_width) / (count - 1) as f64).max(gap_floor)
    } else {
        0.0
    };
    let lefts = distribute_siblings(frame.left, frame.width, card_width, count, spread_gap);

    let axis_y = if alternating {
        frame.center().y
    } else {
        let tallest = fits.iter().map(|f| f.height).fold(0.0, f64::max);
        (frame.top + tallest + AXIS_DROP + 0.2).min(frame.bottom() - 0.3)
    };

    for (index, (fit, left)) in fits.into_iter().zip(lefts).enumerate() {
        let below = alternating && index % 2 == 1;
        let top = if below {
            axis_y + AXIS_DROP
        } else {
            axis_y - AXIS_DROP - fit.height
        };
        let card = Node {
            id: format!("event_{index}"),
            lines: fit.lines,
            left,
            top,
            width: card_width,
            height: fit.height,
            level: 0,
            role: Role::Event,
        };
        let anchor = if below { card.top_center() } else { card.bottom_center() };
        push_connector(&mut edges, anchor, Point::new(anchor.x, axis_y), config);
        nodes.push(card);
    }

    push_arrow(
        &mut edges,
        Point::new(frame.left, axis_y),
        Point::new(frame.right(), axis_y),
        config,
    );

    Ok(Diagram {
        kind: DiagramKind::Timeline,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TimelineEvent;
    use crate::template::{Variant, template_of};

    fn events(n: usize) -> TimelineSpec {
        TimelineSpec {
            events: (0..n)
                .map(|i| TimelineEvent {
                    date: format!("19{:02}", 10 + i),
                    text: format!("Event number {i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn row_arrangement_keeps_every_card_above_the_axis() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Timeline, Variant::A);
        let diagram =
            compute_timeline_layout("History", &events(3), template, &config).unwrap();
        let axis = diagram.edges.iter().find(|e| e.arrowhead).expect("axis arrow");
        for card in diagram.nodes.iter().filter(|n| n.role == Role::Event) {
            assert!(card.rect().bottom() <= axis.from.y - AXIS_DROP + 1e-9);
        }
        // One connector per card plus the axis itself.
        assert_eq!(diagram.edges.len(), 4);
    }

    #[test]
    fn alternating_arrangement_flips_sides_per_event() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Timeline, Variant::C);
        let diagram = compute_timeline_layout("Era", &events(5), template, &config).unwrap();
        let axis_y = diagram.edges.iter().find(|e| e.arrowhead).unwrap().from.y;
        let cards: Vec<&Node> = diagram.nodes.iter().filter(|n| n.role == Role::Event).collect();
        for (index, card) in cards.iter().enumerate() {
            if index % 2 == 0 {
                assert!(card.rect().bottom() < axis_y);
            } else {
                assert!(card.top > axis_y);
            }
        }
    }

    #[test]
    fn cards_are_ordered_left_to_right() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Timeline, Variant::B);
        let diagram = compute_timeline_layout("", &events(5), template, &config).unwrap();
        let cards: Vec<&Node> = diagram.nodes.iter().filter(|n| n.role == Role::Event).collect();
        assert!(cards.windows(2).all(|w| w[0].left < w[1].left));
        // First line of each card is the date.
        assert_eq!(cards[0].lines[0], "1910");
    }

    #[test]
    fn first_date_starts_at_frame_left_edge() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Timeline, Variant::A);
        let diagram = compute_timeline_layout("T", &events(3), template, &config).unwrap();
        let first = diagram.nodes.iter().find(|n| n.role == Role::Event).unwrap();
        assert!((first.left - config.canvas.margin).abs() < 1e-9);
    }
}
