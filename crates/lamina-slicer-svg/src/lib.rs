#![warn(missing_docs)]

//! SVG output for slice layers.
//!
//! Each layer becomes one SVG document with a fixed pixel canvas. The
//! `viewBox` is the mesh extent in the slice plane, so every layer of a run
//! shares the same framing and segments are written in model units.

use std::fmt::Write;
use std::path::Path;

use lamina_math::Rect;
use lamina_slicer::{Segment, SliceLayer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for SVG output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgSettings {
    /// Width and height of the canvas in pixels.
    pub size: u32,
    /// Stroke color for segments (CSS color string).
    pub stroke_color: String,
}

impl Default for SvgSettings {
    fn default() -> Self {
        Self {
            size: 500,
            stroke_color: "#F00".to_string(),
        }
    }
}

impl SvgSettings {
    /// Stroke width in model units: one canvas pixel at the viewport width.
    pub fn stroke_width(&self, viewport: &Rect) -> f64 {
        if self.size == 0 {
            return viewport.width;
        }
        viewport.width / f64::from(self.size)
    }
}

/// Render segments as an SVG document.
///
/// One `<line>` is written per segment, in order. Only the in-plane
/// coordinates are used.
pub fn layer_svg(segments: &[Segment], viewport: &Rect, settings: &SvgSettings) -> String {
    let mut svg = format!(
        "<svg height=\"{size}\" width=\"{size}\" viewBox=\"{} {} {} {}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        viewport.x,
        viewport.y,
        viewport.width,
        viewport.height,
        size = settings.size,
    );

    let stroke_width = settings.stroke_width(viewport);
    for segment in segments {
        let _ = writeln!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" style=\"stroke:{};stroke-width:{}\" />",
            segment.start.x,
            segment.start.y,
            segment.end.x,
            segment.end.y,
            settings.stroke_color,
            stroke_width
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render segments and write them to `path`.
pub fn write_layer_svg(
    path: impl AsRef<Path>,
    segments: &[Segment],
    viewport: &Rect,
    settings: &SvgSettings,
) -> std::io::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, layer_svg(segments, viewport, settings))?;
    debug!(path = %path.display(), segments = segments.len(), "Wrote layer");
    Ok(())
}

/// File name for a layer: `{prefix}_{index}.svg`.
pub fn layer_file_name(prefix: &str, index: usize) -> String {
    format!("{}_{}.svg", prefix, index)
}

/// Write every layer into `dir`, returning the written paths in layer order.
pub fn write_layers(
    dir: impl AsRef<Path>,
    prefix: &str,
    layers: &[SliceLayer],
    viewport: &Rect,
    settings: &SvgSettings,
) -> std::io::Result<Vec<std::path::PathBuf>> {
    let dir = dir.as_ref();
    let mut paths = Vec::with_capacity(layers.len());
    for layer in layers {
        let path = dir.join(layer_file_name(prefix, layer.index));
        write_layer_svg(&path, &layer.segments, viewport, settings)?;
        paths.push(path);
    }
    Ok(paths)
}
