use crate::foundation::core::Rect;
use crate::foundation::error::ChainviewResult;
use crate::layout::diagram::LaneWires;
use crate::layout::lane::LaneSpec;
use crate::layout::node::NodeSpec;
use crate::layout::wire::{DeclaredLayout, LayoutProvider};
use crate::surface::PresentationSurface;

/// Calls observed by an [`InMemorySurface`], in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// `clear`.
    Cleared,
    /// `emit_lanes` with the lane count.
    Lanes(usize),
    /// `layout_settled`.
    Settled,
    /// `emit_wires` with the total wire count.
    Wires(usize),
    /// `show_error` with the message.
    Error(String),
}

/// In-memory surface for tests and debugging.
///
/// Places nodes at their declared geometry scaled by a viewport factor. Nodes only become
/// measurable once `layout_settled` ran, as on a real surface where geometry exists after the
/// layout pass.
#[derive(Debug)]
pub struct InMemorySurface {
    lanes: Vec<LaneSpec>,
    wires: Vec<LaneWires>,
    error: Option<String>,
    settled: bool,
    scale: f64,
    events: Vec<SurfaceEvent>,
}

impl Default for InMemorySurface {
    fn default() -> Self {
        Self {
            lanes: Vec::new(),
            wires: Vec::new(),
            error: None,
            settled: false,
            scale: 1.0,
            events: Vec::new(),
        }
    }
}

impl InMemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lanes currently shown.
    pub fn lanes(&self) -> &[LaneSpec] {
        &self.lanes
    }

    /// Wires currently shown.
    pub fn wires(&self) -> &[LaneWires] {
        &self.wires
    }

    /// Error panel currently shown, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Every call received so far.
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Simulate a viewport resize.
    ///
    /// Placed nodes reflow, so nothing is measurable until `layout_settled` runs again.
    pub fn resize(&mut self, scale: f64) {
        self.scale = scale;
        self.settled = false;
    }
}

impl LayoutProvider for InMemorySurface {
    fn measure(&self, node: &NodeSpec) -> Option<Rect> {
        if !self.settled {
            return None;
        }
        let shown = self
            .lanes
            .iter()
            .any(|l| l.channel_index == node.channel_index && l.nodes.contains(node));
        if !shown {
            return None;
        }
        let r = DeclaredLayout.measure(node)?;
        Some(kurbo::Affine::scale(self.scale).transform_rect_bbox(r))
    }
}

impl PresentationSurface for InMemorySurface {
    fn clear(&mut self) {
        self.lanes.clear();
        self.wires.clear();
        self.error = None;
        self.settled = false;
        self.events.push(SurfaceEvent::Cleared);
    }

    fn emit_lanes(&mut self, lanes: &[LaneSpec]) {
        self.lanes = lanes.to_vec();
        self.settled = false;
        self.events.push(SurfaceEvent::Lanes(lanes.len()));
    }

    async fn layout_settled(&mut self) -> ChainviewResult<()> {
        self.settled = true;
        self.events.push(SurfaceEvent::Settled);
        Ok(())
    }

    fn emit_wires(&mut self, wires: &[LaneWires]) {
        self.wires = wires.to_vec();
        self.events.push(SurfaceEvent::Wires(
            wires.iter().map(|w| w.wires.len()).sum(),
        ));
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.events.push(SurfaceEvent::Error(message.to_string()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/memory.rs"]
mod tests;
