//! chainview lays out per-channel signal-processing pipelines as lane-and-wire diagrams.
//!
//! A configuration is a list of channels, each an ordered chain of stages (input, mixer,
//! filters, output). chainview turns it into one horizontal lane per channel holding one box per
//! stage, and computes the straight wires that connect consecutive boxes. It computes geometry
//! and text only; painting is left to a [`PresentationSurface`].
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: a [`ConfigSource`] downloads and linearizes the configuration into
//!    [`ChannelConfig`]s.
//! 2. **Lay out nodes**: [`layout_nodes`] builds a [`LaneSpec`] per channel (fixed-size
//!    [`NodeSpec`] boxes, 140 px apart, starting at x = 10).
//! 3. **Settle**: the surface places the nodes and signals that geometry is final.
//! 4. **Route wires**: [`route_wires`] measures nodes through a [`LayoutProvider`] and produces a
//!    [`WireSpec`] (anchor, length, angle) per consecutive pair.
//!
//! [`PipelineRenderer`] drives these steps and owns the initialize/refresh lifecycle. For
//! one-shot use without a surface, [`Diagram::build`] with [`DeclaredLayout`] runs both layout
//! phases directly.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod format;
mod foundation;
mod layout;
mod render;
mod source;
mod surface;

pub use config::model::{
    ChannelConfig, DeviceStage, FilterKind, FilterSpec, FilterStage, MixerStage, StageDescriptor,
    UnknownStage, linearized_from_path, linearized_from_reader,
};
pub use format::stage::{StageText, format_stage};
pub use foundation::core::{Point, Rect, Size, Vec2};
pub use foundation::error::{ChainviewError, ChainviewResult};
pub use layout::diagram::{Diagram, LaneWires, layout_nodes, route_wires};
pub use layout::lane::{LANE_HEIGHT, LANE_START_X, LaneSpec, build_lane};
pub use layout::node::{
    NODE_GAP, NODE_HEIGHT, NODE_SPACING, NODE_WIDTH, NodeSpec, StageKind, build_node,
};
pub use layout::wire::{DeclaredLayout, LayoutProvider, WireSpec, route_lane, route_wire};
pub use render::renderer::{PipelineRenderer, RenderPhase, RendererState};
pub use source::config_source::{ConfigSource, StaticConfigSource};
pub use surface::PresentationSurface;
pub use surface::memory::{InMemorySurface, SurfaceEvent};
pub use surface::svg::{SvgSurface, SvgSurfaceOpts};
