//! Two-phase diagram layout.
//!
//! Phase one ([`diagram::layout_nodes`]) turns channels into lanes of positioned nodes. Phase two
//! ([`diagram::route_wires`]) connects consecutive nodes once a [`wire::LayoutProvider`] can
//! measure them.

pub(crate) mod diagram;
pub(crate) mod lane;
pub(crate) mod node;
pub(crate) mod wire;
