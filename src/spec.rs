//! Typed diagram specifications.
//!
//! This is the input contract of the engine: the content-generation
//! collaborator hands over one of these per slide, already validated at
//! its own boundary. The engine never parses text; it only lays out.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Table,
    Flowchart,
    DecisionTree,
    Timeline,
    Hierarchy,
    Spectrum,
    Comparison,
}

/// One diagram to lay out: a title plus kind-specific content.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramSpec {
    pub title: String,
    pub content: DiagramContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagramContent {
    Table(TableSpec),
    Flowchart(FlowchartSpec),
    DecisionTree(DecisionTreeSpec),
    Timeline(TimelineSpec),
    Hierarchy(HierarchySpec),
    Spectrum(SpectrumSpec),
    Comparison(ComparisonSpec),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowchartSpec {
    /// Ordered steps. Lines ending in a colon are category headers, not
    /// actions, and are filtered out before node creation.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTreeSpec {
    pub root: DecisionNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DecisionNode {
    Decision {
        text: String,
        branches: Vec<DecisionBranch>,
    },
    Outcome {
        text: String,
    },
}

/// A labeled edge out of a decision ("Yes"/"No" or a numeric threshold).
/// The label renders as short text at the edge midpoint, never merged
/// into the node text.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionBranch {
    pub label: String,
    pub child: DecisionNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineSpec {
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HierarchySpec {
    pub root: HierarchyNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyNode {
    pub label: String,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpectrumSpec {
    /// Ordered left-to-right segments.
    pub segments: Vec<SpectrumSegment>,
    /// Optional labels for the two extremes of the axis.
    #[serde(default)]
    pub ends: Option<(String, String)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpectrumSegment {
    pub label: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonSpec {
    pub panels: Vec<ConceptPanel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptPanel {
    pub concept: String,
    pub features: Vec<String>,
}

/// Content volume summary used for variant selection.
///
/// `primary` is the count that drives capacity for the kind (rows, steps,
/// events, tree nodes, segments, panels); `secondary` the cross dimension
/// (columns, features); `depth` the tree depth where applicable (1 for
/// flat kinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentCounts {
    pub primary: usize,
    pub secondary: usize,
    pub depth: usize,
}

impl DiagramContent {
    pub fn kind(&self) -> DiagramKind {
        match self {
            DiagramContent::Table(_) => DiagramKind::Table,
            DiagramContent::Flowchart(_) => DiagramKind::Flowchart,
            DiagramContent::DecisionTree(_) => DiagramKind::DecisionTree,
            DiagramContent::Timeline(_) => DiagramKind::Timeline,
            DiagramContent::Hierarchy(_) => DiagramKind::Hierarchy,
            DiagramContent::Spectrum(_) => DiagramKind::Spectrum,
            DiagramContent::Comparison(_) => DiagramKind::Comparison,
        }
    }

    pub fn counts(&self) -> ContentCounts {
        match self {
            DiagramContent::Table(t) => ContentCounts {
                primary: t.rows.len(),
                secondary: t
                    .headers
                    .len()
                    .max(t.rows.iter().map(Vec::len).max().unwrap_or(0)),
                depth: 1,
            },
            DiagramContent::Flowchart(f) => ContentCounts {
                // Category headers never become nodes, so they do not
                // count against capacity either.
                primary: f
                    .steps
                    .iter()
                    .filter(|s| !s.trim_end().ends_with(':'))
                    .count(),
                secondary: 1,
                depth: 1,
            },
            DiagramContent::DecisionTree(d) => {
                let (nodes, depth) = decision_measure(&d.root);
                ContentCounts {
                    primary: nodes,
                    secondary: 1,
                    depth,
                }
            }
            DiagramContent::Timeline(t) => ContentCounts {
                primary: t.events.len(),
                secondary: 1,
                depth: 1,
            },
            DiagramContent::Hierarchy(h) => {
                let (nodes, depth) = hierarchy_measure(&h.root);
                ContentCounts {
                    primary: nodes,
                    secondary: 1,
                    depth,
                }
            }
            DiagramContent::Spectrum(s) => ContentCounts {
                primary: s.segments.len(),
                secondary: 1,
                depth: 1,
            },
            DiagramContent::Comparison(c) => ContentCounts {
                primary: c.panels.len(),
                secondary: c.panels.iter().map(|p| p.features.len()).max().unwrap_or(0),
                depth: 1,
            },
        }
    }
}

fn decision_measure(node: &DecisionNode) -> (usize, usize) {
    match node {
        DecisionNode::Outcome { .. } => (1, 1),
        DecisionNode::Decision { branches, .. } => {
            let mut nodes = 1;
            let mut depth = 0;
            for branch in branches {
                let (n, d) = decision_measure(&branch.child);
                nodes += n;
                depth = depth.max(d);
            }
            (nodes, depth + 1)
        }
    }
}

fn hierarchy_measure(node: &HierarchyNode) -> (usize, usize) {
    let mut nodes = 1;
    let mut depth = 0;
    for child in &node.children {
        let (n, d) = hierarchy_measure(child);
        nodes += n;
        depth = depth.max(d);
    }
    (nodes, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_hierarchy() -> HierarchyNode {
        HierarchyNode {
            label: "root".into(),
            children: vec![
                HierarchyNode {
                    label: "a".into(),
                    children: Vec::new(),
                },
                HierarchyNode {
                    label: "b".into(),
                    children: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn hierarchy_counts_nodes_and_depth() {
        let content = DiagramContent::Hierarchy(HierarchySpec {
            root: two_level_hierarchy(),
        });
        let counts = content.counts();
        assert_eq!(counts.primary, 3);
        assert_eq!(counts.depth, 2);
    }

    #[test]
    fn flowchart_counts_exclude_category_headers() {
        let content = DiagramContent::Flowchart(FlowchartSpec {
            steps: vec![
                "Prepare:".into(),
                "Mix ingredients".into(),
                "Bake".into(),
            ],
        });
        assert_eq!(content.counts().primary, 2);
    }

    #[test]
    fn spec_deserializes_from_tagged_json() {
        let json = r#"{
            "title": "Process",
            "content": {
                "type": "flowchart",
                "steps": ["One", "Two"]
            }
        }"#;
        let spec: DiagramSpec = serde_json::from_str(json).expect("valid spec");
        assert_eq!(spec.content.kind(), DiagramKind::Flowchart);
    }

    #[test]
    fn decision_tree_counts_nested_branches() {
        let content = DiagramContent::DecisionTree(DecisionTreeSpec {
            root: DecisionNode::Decision {
                text: "q".into(),
                branches: vec![
                    DecisionBranch {
                        label: "yes".into(),
                        child: DecisionNode::Outcome { text: "a".into() },
                    },
                    DecisionBranch {
                        label: "no".into(),
                        child: DecisionNode::Decision {
                            text: "q2".into(),
                            branches: vec![
                                DecisionBranch {
                                    label: "yes".into(),
                                    child: DecisionNode::Outcome { text: "b".into() },
                                },
                                DecisionBranch {
                                    label: "no".into(),
                                    child: DecisionNode::Outcome { text: "c".into() },
                                },
                            ],
                        },
                    },
                ],
            },
        });
        let counts = content.counts();
        assert_eq!(counts.primary, 6);
        assert_eq!(counts.depth, 3);
    }
}
