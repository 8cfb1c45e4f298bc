//! Hierarchy layout: a rooted tree of category boxes, children spread
//! symmetrically under their parent.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::layout::types::{Diagram, Edge, Node, Role};
use crate::layout::{TreeBox, content_frame, place_tree, sized_box, title_node};
use crate::spec::{DiagramKind, HierarchyNode, HierarchySpec};
use crate::template::LayoutTemplate;
use crate::textfit::wrap_to_caps;

const MIN_BOX_WIDTH: f64 = 1.4;
const MAX_BOX_WIDTH: f64 = 3.0;

pub(super) fn compute_hierarchy_layout(
    title: &str,
    spec: &HierarchySpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();
    let mut edges: Vec<Edge> = Vec::new();

    let root = size_node(&spec.root, config)?;
    place_tree(&root, frame, "unit", config, &mut nodes, &mut edges);

    Ok(Diagram {
        kind: DiagramKind::Hierarchy,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges,
    })
}

fn size_node(node: &HierarchyNode, config: &EngineConfig) -> Result<TreeBox, LayoutError> {
    let lines = wrap_to_caps(&node.label, config.caps.hierarchy);
    let fit = sized_box(
        &lines,
        MAX_BOX_WIDTH,
        MIN_BOX_WIDTH,
        config.text.compact_metrics(),
        config.caps.hierarchy,
        config,
    )?;
    let children = node
        .children
        .iter()
        .map(|child| size_node(child, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TreeBox {
        lines: fit.lines,
        width: fit.width,
        height: fit.height,
        role: Role::Category,
        branch_label: None,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Variant, template_of};

    fn node(label: &str, children: Vec<HierarchyNode>) -> HierarchyNode {
        HierarchyNode {
            label: label.into(),
            children,
        }
    }

    #[test]
    fn children_straddle_the_parent_center() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Hierarchy, Variant::A);
        let spec = HierarchySpec {
            root: node(
                "Animals",
                vec![node("Vertebrates", vec![]), node("Invertebrates", vec![])],
            ),
        };
        let diagram = compute_hierarchy_layout("Kingdom", &spec, template, &config).unwrap();
        let boxes: Vec<&Node> = diagram
            .nodes
            .iter()
            .filter(|n| n.role == Role::Category)
            .collect();
        assert_eq!(boxes.len(), 3);
        let (root, left, right) = (boxes[0], boxes[1], boxes[2]);
        let mid = (left.center().x + right.center().x) / 2.0;
        assert!((mid - root.center().x).abs() < 1e-9);
        assert!(left.top > root.rect().bottom());
        assert_eq!(diagram.edges.len(), 2);
    }

    #[test]
    fn grandchildren_of_different_parents_never_collide() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Hierarchy, Variant::B);
        // Two subtrees whose leaf rows are wider than their parents.
        let spec = HierarchySpec {
            root: node(
                "Company",
                vec![
                    node(
                        "Engineering",
                        vec![node("Backend team", vec![]), node("Frontend team", vec![])],
                    ),
                    node(
                        "Operations",
                        vec![node("Support desk", vec![]), node("Logistics", vec![])],
                    ),
                ],
            ),
        };
        let diagram = compute_hierarchy_layout("Org", &spec, template, &config).unwrap();
        let boxes: Vec<&Node> = diagram
            .nodes
            .iter()
            .filter(|n| n.role == Role::Category)
            .collect();
        assert_eq!(boxes.len(), 7);
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert!(
                    a.rect().intersection(&b.rect()).is_none(),
                    "{} overlaps {}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn sibling_gap_holds_even_when_children_outgrow_the_parent() {
        let config = EngineConfig::default();
        let template = template_of(DiagramKind::Hierarchy, Variant::A);
        let spec = HierarchySpec {
            root: node(
                "Root",
                vec![
                    node("Alpha branch unit", vec![]),
                    node("Gamma branch unit", vec![]),
                ],
            ),
        };
        let diagram = compute_hierarchy_layout("", &spec, template, &config).unwrap();
        let boxes: Vec<&Node> = diagram
            .nodes
            .iter()
            .filter(|n| n.role == Role::Category && n.level == 1)
            .collect();
        let gap = boxes[1].left - boxes[0].rect().right();
        assert!(gap >= config.spacing.min_gap - 1e-9);
        // The pair extends symmetrically past the parent.
        let root = diagram.nodes.iter().find(|n| n.level == 0 && n.role == Role::Category).unwrap();
        let left_overhang = root.left - boxes[0].left;
        let right_overhang = boxes[1].rect().right() - root.rect().right();
        assert!((left_overhang - right_overhang).abs() < 1e-9);
    }
}
