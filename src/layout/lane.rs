use crate::config::model::StageDescriptor;
use crate::layout::node::{NODE_SPACING, NodeSpec, build_node};

/// Left edge of the first node in every lane.
pub const LANE_START_X: f64 = 10.0;
/// Height of a lane.
pub const LANE_HEIGHT: f64 = 120.0;

/// One channel's row of nodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LaneSpec {
    /// Channel index.
    pub channel_index: usize,
    /// Lane label, `Channel {i}`.
    pub label: String,
    /// Nodes, left to right.
    pub nodes: Vec<NodeSpec>,
}

impl LaneSpec {
    /// Right edge of the last node, or the start offset for an empty lane.
    pub fn content_width(&self) -> f64 {
        self.nodes
            .last()
            .map(|n| n.x_offset + n.width)
            .unwrap_or(LANE_START_X)
    }

    /// Number of wires this lane needs.
    pub fn wire_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Lay out a channel's stages left to right.
///
/// An empty stage list yields an empty lane.
pub fn build_lane(channel_index: usize, stages: &[StageDescriptor]) -> LaneSpec {
    let mut nodes = Vec::with_capacity(stages.len());
    let mut x = LANE_START_X;
    for stage in stages {
        nodes.push(build_node(stage, channel_index, x));
        x += NODE_SPACING;
    }
    LaneSpec {
        channel_index,
        label: format!("Channel {channel_index}"),
        nodes,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/lane.rs"]
mod tests;
