//! Presentation surfaces.
//!
//! A surface receives lanes and wires from the renderer and reports where it actually placed the
//! nodes. Painting is entirely the surface's business.

/// In-memory surface for tests and debugging.
pub(crate) mod memory;
/// SVG document surface.
pub(crate) mod svg;

use crate::foundation::error::ChainviewResult;
use crate::layout::diagram::LaneWires;
use crate::layout::lane::LaneSpec;
use crate::layout::wire::LayoutProvider;

/// Visual container driven by [`crate::PipelineRenderer`].
///
/// Call order within a pass: `clear`, `emit_lanes`, `layout_settled`, `emit_wires`. On a fatal
/// error the renderer calls `clear` followed by `show_error` instead. Measurements
/// ([`LayoutProvider::measure`]) are only trusted after `layout_settled` resolved.
#[allow(async_fn_in_trait)]
pub trait PresentationSurface: LayoutProvider {
    /// Drop every node, wire and error panel currently shown.
    fn clear(&mut self);
    /// Show the lanes and their nodes.
    fn emit_lanes(&mut self, lanes: &[LaneSpec]);
    /// Resolves once node placement is stable and can be measured.
    async fn layout_settled(&mut self) -> ChainviewResult<()>;
    /// Show wires routed from the settled geometry, replacing previous wires.
    fn emit_wires(&mut self, wires: &[LaneWires]);
    /// Replace all visual output with a single error panel.
    fn show_error(&mut self, message: &str);
}
