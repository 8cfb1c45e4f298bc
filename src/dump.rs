//! JSON export of built layouts.
//!
//! The dump is the contract with downstream consumers (renderers, fixture
//! diffs): canvas dimensions plus the full node/edge geometry and the
//! validation report, pretty-printed for reviewable diffs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::layout::BuiltDiagram;

#[derive(Serialize)]
struct LayoutDump<'a> {
    canvas: CanvasDump,
    #[serde(flatten)]
    built: &'a BuiltDiagram,
}

#[derive(Serialize)]
struct CanvasDump {
    width: f64,
    height: f64,
}

/// Serialize a built diagram to a pretty-printed JSON string.
pub fn layout_json(built: &BuiltDiagram, config: &EngineConfig) -> anyhow::Result<String> {
    let dump = LayoutDump {
        canvas: CanvasDump {
            width: config.canvas.width,
            height: config.canvas.height,
        },
        built,
    };
    serde_json::to_string_pretty(&dump).context("serializing layout dump")
}

/// Write the layout dump to `path`.
pub fn write_layout_dump(
    path: &Path,
    built: &BuiltDiagram,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating layout dump at {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(layout_json(built, config)?.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
