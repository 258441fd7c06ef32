use crate::foundation::core::{Point, Rect, left_center, right_center};
use crate::foundation::error::{ChainviewError, ChainviewResult};
use crate::layout::lane::{LANE_HEIGHT, LaneSpec};
use crate::layout::node::NodeSpec;

/// A straight connector between two consecutive nodes of a lane.
///
/// Drawn as a segment of `length` starting at `anchor`, rotated by `angle_degrees` about the
/// anchor. Nodes sharing a vertical center give an angle of exactly 0.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WireSpec {
    /// Right-center of the upstream node.
    pub anchor: Point,
    /// Segment length.
    pub length: f64,
    /// Rotation about the anchor, clockwise in y-down coordinates.
    pub angle_degrees: f64,
}

impl WireSpec {
    /// Point the wire ends at.
    pub fn end(&self) -> Point {
        let rad = self.angle_degrees.to_radians();
        Point::new(
            self.anchor.x + self.length * rad.cos(),
            self.anchor.y + self.length * rad.sin(),
        )
    }
}

/// Source of measured node geometry.
///
/// Rectangles are in one coordinate space shared by every lane. Implementations return `None`
/// for nodes that have not been placed yet.
pub trait LayoutProvider {
    /// Measured box of a node.
    fn measure(&self, node: &NodeSpec) -> Option<Rect>;
}

/// Geometry as declared by the layout, without a presentation surface.
///
/// Lane `i` occupies `y = i * LANE_HEIGHT ..`, nodes are vertically centered inside it.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclaredLayout;

impl DeclaredLayout {
    /// Top edge of a lane.
    pub fn lane_top(channel_index: usize) -> f64 {
        channel_index as f64 * LANE_HEIGHT
    }
}

impl LayoutProvider for DeclaredLayout {
    fn measure(&self, node: &NodeSpec) -> Option<Rect> {
        let top = Self::lane_top(node.channel_index) + (LANE_HEIGHT - node.height) * 0.5;
        Some(node.declared_rect(top))
    }
}

/// Wire from the right-center of `from` to the left-center of `to`.
pub fn route_wire(from: Rect, to: Rect) -> WireSpec {
    let anchor = right_center(from);
    let delta = left_center(to) - anchor;
    WireSpec {
        anchor,
        length: delta.hypot(),
        angle_degrees: delta.atan2().to_degrees(),
    }
}

/// Wires for every consecutive node pair of a lane.
///
/// Must run after the surface has settled its layout: measurements are taken as-is.
pub fn route_lane(lane: &LaneSpec, layout: &dyn LayoutProvider) -> ChainviewResult<Vec<WireSpec>> {
    let rects = lane
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            layout.measure(node).ok_or_else(|| {
                ChainviewError::layout(format!(
                    "node {idx} of lane {} has not been measured",
                    lane.channel_index
                ))
            })
        })
        .collect::<ChainviewResult<Vec<_>>>()?;

    Ok(rects.windows(2).map(|w| route_wire(w[0], w[1])).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wire.rs"]
mod tests;
