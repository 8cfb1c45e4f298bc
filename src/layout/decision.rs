//! Decision tree layout: question boxes branching to labeled children,
//! leaves rendered as outcomes.

use crate::config::EngineConfig;
use crate::error::LayoutError;
use crate::layout::types::{Diagram, Edge, Node, Role};
use crate::layout::{TreeBox, content_frame, place_tree, sized_box, title_node};
use crate::spec::{DecisionNode, DecisionTreeSpec, DiagramKind};
use crate::template::LayoutTemplate;
use crate::textfit::wrap_to_caps;

const MIN_BOX_WIDTH: f64 = 1.5;
const MAX_BOX_WIDTH: f64 = 2.8;

pub(super) fn compute_decision_layout(
    title: &str,
    spec: &DecisionTreeSpec,
    template: &LayoutTemplate,
    config: &EngineConfig,
) -> Result<Diagram, LayoutError> {
    let frame = content_frame(title, config);
    let mut nodes: Vec<Node> = title_node(title, config).into_iter().collect();
    let mut edges: Vec<Edge> = Vec::new();

    let root = size_node(&spec.root, None, config)?;
    place_tree(&root, frame, "decision", config, &mut nodes, &mut edges);

    Ok(Diagram {
        kind: DiagramKind::DecisionTree,
        variant: template.variant,
        title: title.to_string(),
        nodes,
        edges,
    })
}

fn size_node(
    node: &DecisionNode,
    branch_label: Option<&str>,
    config: &EngineConfig,
) -> Result<TreeBox, LayoutError> {
    let metrics = config.text.compact_metrics();
    let (text, children) = match node {
        DecisionNode::Decision { text, branches } => (text, branches.as_slice()),
        DecisionNode::Outcome { text } => (text, &[][..]),
    };
    let lines = wrap_to_caps(text, config.caps.decision);
    let fit = sized_box(
        &lines,
        MAX_BOX_WIDTH,
        MIN_BOX_WIDTH,
        metrics,
        config.caps.decision,
        config,
    )?;
    let children = children
        .iter()
        .map(|branch| size_node(&branch.child, Some(&branch.label), config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TreeBox {
        lines: fit.lines,
        width: fit.width,
        height: fit.height,
        role: if matches!(node, DecisionNode::Decision { .. }) {
            Role::Decision
        } else {
            Role::Outcome
        },
        branch_label: branch_label.map(str::to_string),
        children,
    })
}
