//! Deterministic layout geometry for slide-based graphic organizers.
//!
//! Given a typed diagram specification (table, flowchart, decision tree,
//! timeline, hierarchy, spectrum or comparison), the engine selects a
//! layout template sized to the content, computes exact node and
//! connector geometry on a fixed slide canvas, and validates the result
//! for overlaps and text overflow. Everything is pure computation over
//! `f64` slide units; rendering and content generation live elsewhere.
//!
//! The entry point for most callers is [`layout::build_validated`], which
//! runs the select/build/validate loop with bounded degradation:
//!
//! ```
//! use slidegram::config::EngineConfig;
//! use slidegram::layout::build_validated;
//! use slidegram::spec::{DiagramContent, DiagramSpec, FlowchartSpec};
//!
//! let config = EngineConfig::default();
//! let spec = DiagramSpec {
//!     title: "Water Cycle".into(),
//!     content: DiagramContent::Flowchart(FlowchartSpec {
//!         steps: vec!["Evaporation".into(), "Condensation".into(), "Rain".into()],
//!     }),
//! };
//! let built = build_validated(&spec, &config).unwrap();
//! assert!(built.validation.passed());
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod spacing;
pub mod spec;
pub mod template;
pub mod textfit;
pub mod validate;

pub use config::{EngineConfig, load_config};
pub use error::LayoutError;
pub use layout::{BuiltDiagram, Diagram, build_diagram, build_validated};
pub use spec::{DiagramContent, DiagramKind, DiagramSpec};
pub use validate::{ValidationReport, validate};
