use std::fmt::Write as _;
use std::path::Path;

use crate::foundation::core::{Rect, Vec2};
use crate::foundation::error::{ChainviewError, ChainviewResult};
use crate::layout::diagram::LaneWires;
use crate::layout::lane::{LANE_HEIGHT, LaneSpec};
use crate::layout::node::{NodeSpec, StageKind};
use crate::layout::wire::{DeclaredLayout, LayoutProvider};
use crate::surface::PresentationSurface;

/// Options for [`SvgSurface`].
#[derive(Clone, Debug)]
pub struct SvgSurfaceOpts {
    /// Outer margin in pixels.
    pub margin: f64,
    /// Width of the lane label column left of the nodes.
    pub label_width: f64,
    /// Base font size in pixels.
    pub font_size: f64,
    /// Page background color.
    pub background: String,
    /// Lane band color.
    pub lane_fill: String,
    /// Node outline and text color.
    pub stroke: String,
    /// Wire color.
    pub wire: String,
}

impl Default for SvgSurfaceOpts {
    fn default() -> Self {
        Self {
            margin: 16.0,
            label_width: 90.0,
            font_size: 11.0,
            background: "#ffffff".to_string(),
            lane_fill: "#f3f4f6".to_string(),
            stroke: "#1f2937".to_string(),
            wire: "#2563eb".to_string(),
        }
    }
}

const CONNECTOR_RADIUS: f64 = 4.0;
const ERROR_PANEL: (f64, f64) = (480.0, 80.0);

/// Surface that lays the diagram out as an SVG document.
///
/// Layout is synchronous: nodes are placed at their declared geometry shifted past the margin
/// and label column, so `layout_settled` resolves immediately.
#[derive(Clone, Debug, Default)]
pub struct SvgSurface {
    opts: SvgSurfaceOpts,
    lanes: Vec<LaneSpec>,
    wires: Vec<LaneWires>,
    error: Option<String>,
}

impl SvgSurface {
    /// Create an empty surface.
    pub fn new(opts: SvgSurfaceOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    fn origin(&self) -> Vec2 {
        Vec2::new(self.opts.margin + self.opts.label_width, self.opts.margin)
    }

    fn page_size(&self) -> (f64, f64) {
        if self.error.is_some() {
            return (
                ERROR_PANEL.0 + 2.0 * self.opts.margin,
                ERROR_PANEL.1 + 2.0 * self.opts.margin,
            );
        }
        let content = self
            .lanes
            .iter()
            .map(LaneSpec::content_width)
            .fold(0.0, f64::max);
        (
            self.origin().x + content + self.opts.margin,
            self.opts.margin * 2.0 + self.lanes.len() as f64 * LANE_HEIGHT,
        )
    }

    /// Render the current contents as an SVG document.
    pub fn to_svg_string(&self) -> String {
        let (w, h) = self.page_size();
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = writeln!(
            out,
            r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
            self.opts.background
        );

        if let Some(message) = &self.error {
            self.write_error(&mut out, message);
        } else {
            for lane in &self.lanes {
                self.write_lane(&mut out, lane, w);
            }
            for lw in &self.wires {
                for wire in &lw.wires {
                    let (ax, ay) = (wire.anchor.x, wire.anchor.y);
                    let _ = writeln!(
                        out,
                        r#"<line x1="{ax}" y1="{ay}" x2="{}" y2="{ay}" transform="rotate({} {ax} {ay})" stroke="{}" stroke-width="2"/>"#,
                        ax + wire.length,
                        wire.angle_degrees,
                        self.opts.wire
                    );
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }

    /// Write the document to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> ChainviewResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg_string()).map_err(|e| {
            ChainviewError::Other(
                anyhow::Error::new(e).context(format!("write svg '{}'", path.display())),
            )
        })
    }

    fn write_lane(&self, out: &mut String, lane: &LaneSpec, page_w: f64) {
        let top = self.opts.margin + DeclaredLayout::lane_top(lane.channel_index);
        let fs = self.opts.font_size;
        let _ = writeln!(
            out,
            r#"<rect x="{m}" y="{top}" width="{}" height="{LANE_HEIGHT}" fill="{}"/>"#,
            page_w - 2.0 * self.opts.margin,
            self.opts.lane_fill,
            m = self.opts.margin,
        );
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" font-weight="bold" fill="{}">{}</text>"#,
            self.opts.margin + 6.0,
            top + LANE_HEIGHT * 0.5 + fs * 0.4,
            fs + 1.0,
            self.opts.stroke,
            escape(&lane.label)
        );

        for node in &lane.nodes {
            let Some(r) = self.measure(node) else {
                continue;
            };
            self.write_node(out, node, r);
        }
    }

    fn write_node(&self, out: &mut String, node: &NodeSpec, r: Rect) {
        let fs = self.opts.font_size;
        let stroke = &self.opts.stroke;
        let _ = writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="6" fill="{}" stroke="{stroke}" stroke-width="1.5"/>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            kind_fill(node.stage_type),
        );
        let cx = r.center().x;
        let _ = writeln!(
            out,
            r#"<text x="{cx}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="{fs}" font-weight="bold" fill="{stroke}">{}</text>"#,
            r.y0 + fs + 4.0,
            escape(&node.header)
        );
        for (i, line) in node.details.iter().enumerate() {
            let _ = writeln!(
                out,
                r#"<text x="{cx}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="{}" fill="{stroke}">{}</text>"#,
                r.y0 + fs + 4.0 + (i as f64 + 1.0) * (fs + 3.0),
                fs - 1.0,
                escape(line)
            );
        }

        let cy = r.center().y;
        if node.has_left_connector {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{cy}" r="{CONNECTOR_RADIUS}" fill="{stroke}"/>"#,
                r.x0
            );
        }
        if node.has_right_connector {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{cy}" r="{CONNECTOR_RADIUS}" fill="{stroke}"/>"#,
                r.x1
            );
        }
    }

    fn write_error(&self, out: &mut String, message: &str) {
        let m = self.opts.margin;
        let (w, h) = ERROR_PANEL;
        let _ = writeln!(
            out,
            r##"<rect x="{m}" y="{m}" width="{w}" height="{h}" rx="6" fill="#fee2e2" stroke="#b91c1c"/>"##
        );
        let _ = writeln!(
            out,
            r##"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" fill="#b91c1c">{}</text>"##,
            m + 12.0,
            m + h * 0.5 + self.opts.font_size * 0.4,
            self.opts.font_size + 1.0,
            escape(message)
        );
    }
}

impl LayoutProvider for SvgSurface {
    fn measure(&self, node: &NodeSpec) -> Option<Rect> {
        let r = DeclaredLayout.measure(node)?;
        Some(r + self.origin())
    }
}

impl PresentationSurface for SvgSurface {
    fn clear(&mut self) {
        self.lanes.clear();
        self.wires.clear();
        self.error = None;
    }

    fn emit_lanes(&mut self, lanes: &[LaneSpec]) {
        self.lanes = lanes.to_vec();
    }

    async fn layout_settled(&mut self) -> ChainviewResult<()> {
        Ok(())
    }

    fn emit_wires(&mut self, wires: &[LaneWires]) {
        self.wires = wires.to_vec();
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

fn kind_fill(kind: StageKind) -> &'static str {
    match kind {
        StageKind::Input | StageKind::Output => "#dcfce7",
        StageKind::Mixer => "#fef9c3",
        StageKind::Filter => "#dbeafe",
        StageKind::Unknown => "#e5e7eb",
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "../../tests/unit/surface/svg.rs"]
mod tests;
