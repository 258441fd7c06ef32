use crate::config::model::ChannelConfig;
use crate::foundation::core::Size;
use crate::foundation::error::ChainviewResult;
use crate::layout::lane::{LANE_HEIGHT, LANE_START_X, LaneSpec, build_lane};
use crate::layout::wire::{LayoutProvider, WireSpec, route_lane};

/// Wires of one lane.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LaneWires {
    /// Channel index of the lane.
    pub channel_index: usize,
    /// Wires, left to right.
    pub wires: Vec<WireSpec>,
}

/// Complete diagram: lanes with their nodes, and the wires routed between them.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Diagram {
    /// One lane per channel, in channel order.
    pub lanes: Vec<LaneSpec>,
    /// One entry per lane, in the same order.
    pub wires: Vec<LaneWires>,
}

/// First phase: build one lane per channel.
///
/// Produces node geometry only. Wires depend on measured geometry and are routed separately by
/// [`route_wires`] once the presentation surface has settled.
#[tracing::instrument(skip_all, fields(channels = channels.len()))]
pub fn layout_nodes(channels: &[ChannelConfig]) -> Vec<LaneSpec> {
    let lanes: Vec<LaneSpec> = channels
        .iter()
        .enumerate()
        .map(|(idx, ch)| build_lane(idx, &ch.stages))
        .collect();
    tracing::debug!(
        nodes = lanes.iter().map(|l| l.nodes.len()).sum::<usize>(),
        "laid out nodes"
    );
    lanes
}

/// Second phase: route the wires of every lane from measured geometry.
#[tracing::instrument(skip_all, fields(lanes = lanes.len()))]
pub fn route_wires(
    lanes: &[LaneSpec],
    layout: &dyn LayoutProvider,
) -> ChainviewResult<Vec<LaneWires>> {
    lanes
        .iter()
        .map(|lane| {
            Ok(LaneWires {
                channel_index: lane.channel_index,
                wires: route_lane(lane, layout)?,
            })
        })
        .collect()
}

impl Diagram {
    /// Run both phases against a layout provider whose geometry is already final.
    pub fn build(channels: &[ChannelConfig], layout: &dyn LayoutProvider) -> ChainviewResult<Self> {
        let lanes = layout_nodes(channels);
        let wires = route_wires(&lanes, layout)?;
        Ok(Self { lanes, wires })
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.lanes.iter().map(|l| l.nodes.len()).sum()
    }

    /// Total number of wires.
    pub fn wire_count(&self) -> usize {
        self.wires.iter().map(|w| w.wires.len()).sum()
    }

    /// Bounding size of the declared geometry, with a trailing margin equal to the lane inset.
    pub fn extent(&self) -> Size {
        let width = self
            .lanes
            .iter()
            .map(LaneSpec::content_width)
            .fold(LANE_START_X, f64::max)
            + LANE_START_X;
        Size::new(width, self.lanes.len() as f64 * LANE_HEIGHT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/diagram.rs"]
mod tests;
