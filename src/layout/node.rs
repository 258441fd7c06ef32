use crate::config::model::StageDescriptor;
use crate::foundation::core::{Rect, Size};
use crate::format::stage::format_stage;

/// Node box width in pixels.
pub const NODE_WIDTH: f64 = 120.0;
/// Node box height in pixels.
pub const NODE_HEIGHT: f64 = 80.0;
/// Horizontal gap between consecutive nodes.
pub const NODE_GAP: f64 = 20.0;
/// Distance between the left edges of consecutive nodes.
pub const NODE_SPACING: f64 = NODE_WIDTH + NODE_GAP;

/// Stage category carried by a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Capture device.
    Input,
    /// Playback device.
    Output,
    /// Channel mixer.
    Mixer,
    /// Filter.
    Filter,
    /// Unclassified stage.
    Unknown,
}

impl StageKind {
    /// Category of a stage descriptor.
    pub fn of(stage: &StageDescriptor) -> Self {
        match stage {
            StageDescriptor::Input(_) => Self::Input,
            StageDescriptor::Output(_) => Self::Output,
            StageDescriptor::Mixer(_) => Self::Mixer,
            StageDescriptor::Filter(_) => Self::Filter,
            StageDescriptor::Unknown(_) => Self::Unknown,
        }
    }
}

/// A positioned box representing one stage.
///
/// `x_offset` is lane-local; the vertical placement is owned by whoever lays lanes out (see
/// [`crate::DeclaredLayout`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NodeSpec {
    /// Stage category.
    pub stage_type: StageKind,
    /// Channel (lane) this node belongs to.
    pub channel_index: usize,
    /// Left edge inside the lane.
    pub x_offset: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Header line.
    pub header: String,
    /// Detail lines under the header.
    pub details: Vec<String>,
    /// Whether a wire may enter from the left. False only for inputs.
    pub has_left_connector: bool,
    /// Whether a wire may leave to the right. False only for outputs.
    pub has_right_connector: bool,
}

impl NodeSpec {
    /// Declared box size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Declared box at the given lane-local top, in lane coordinates.
    pub fn declared_rect(&self, top: f64) -> Rect {
        Rect::new(
            self.x_offset,
            top,
            self.x_offset + self.width,
            top + self.height,
        )
    }
}

/// Build the node for one stage at a lane-local horizontal offset.
///
/// Never fails; unrecognized stages produce a node with placeholder text.
pub fn build_node(stage: &StageDescriptor, channel_index: usize, x_offset: f64) -> NodeSpec {
    let kind = StageKind::of(stage);
    let text = format_stage(stage);
    NodeSpec {
        stage_type: kind,
        channel_index,
        x_offset,
        width: NODE_WIDTH,
        height: NODE_HEIGHT,
        header: text.header,
        details: text.details,
        has_left_connector: kind != StageKind::Input,
        has_right_connector: kind != StageKind::Output,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/node.rs"]
mod tests;
