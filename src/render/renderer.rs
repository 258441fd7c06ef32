use crate::foundation::error::{ChainviewError, ChainviewResult};
use crate::layout::diagram::{Diagram, LaneWires, layout_nodes, route_wires};
use crate::layout::lane::LaneSpec;
use crate::source::config_source::ConfigSource;
use crate::surface::PresentationSurface;

/// Lifecycle phase of a [`PipelineRenderer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderPhase {
    /// Nothing requested yet.
    #[default]
    Uninitialized,
    /// First pass in flight.
    Loading,
    /// Lanes and wires are shown.
    Rendered,
    /// Refresh pass in flight.
    Refreshing,
    /// The last pass failed; the message is what the user sees.
    Errored {
        /// User-facing error message.
        message: String,
    },
}

/// Mutable state owned by one renderer.
///
/// Lanes and wires are only ever replaced wholesale, never patched.
#[derive(Clone, Debug, Default)]
pub struct RendererState {
    /// Current phase.
    pub phase: RenderPhase,
    /// Lanes of the last successful pass; empty otherwise.
    pub lanes: Vec<LaneSpec>,
    /// Wires of the last successful pass or re-layout.
    pub wires: Vec<LaneWires>,
    /// Number of passes started so far.
    pub pass: u64,
}

impl RendererState {
    fn begin_pass(&mut self, phase: RenderPhase) {
        self.pass += 1;
        self.phase = phase;
        self.lanes.clear();
        self.wires.clear();
    }

    fn fail(&mut self, message: String) {
        self.lanes.clear();
        self.wires.clear();
        self.phase = RenderPhase::Errored { message };
    }
}

/// Drives the render lifecycle of a pipeline diagram.
///
/// `Uninitialized → Loading → Rendered → (Refreshing → Rendered)*`, with `Errored` reachable from
/// both in-flight phases. Every entry point takes `&mut self`, so passes on one renderer are
/// serialized and the last completed pass is the one shown.
pub struct PipelineRenderer<C, S> {
    source: C,
    surface: S,
    state: RendererState,
}

impl<C: ConfigSource, S: PresentationSurface> PipelineRenderer<C, S> {
    /// Create a renderer over a configuration source and a presentation surface.
    pub fn new(source: C, surface: S) -> Self {
        Self {
            source,
            surface,
            state: RendererState::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &RenderPhase {
        &self.state.phase
    }

    /// Full renderer state.
    pub fn state(&self) -> &RendererState {
        &self.state
    }

    /// Lanes of the last successful pass.
    pub fn lanes(&self) -> &[LaneSpec] {
        &self.state.lanes
    }

    /// Wires of the last successful pass or re-layout.
    pub fn wires(&self) -> &[LaneWires] {
        &self.state.wires
    }

    /// Snapshot of the lanes and wires currently shown.
    pub fn diagram(&self) -> Diagram {
        Diagram {
            lanes: self.state.lanes.clone(),
            wires: self.state.wires.clone(),
        }
    }

    /// Borrow the configuration source.
    pub fn source(&self) -> &C {
        &self.source
    }

    /// Mutably borrow the configuration source.
    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }

    /// Borrow the presentation surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the presentation surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give back the source and the surface.
    pub fn into_parts(self) -> (C, S) {
        (self.source, self.surface)
    }

    /// Run the first pass.
    ///
    /// Without a live connection the renderer goes straight to `Errored` and nothing is fetched.
    /// Calling this again (for instance after an error) starts a fresh pass.
    #[tracing::instrument(skip(self), fields(pass = self.state.pass + 1))]
    pub async fn initialize(&mut self) -> ChainviewResult<()> {
        self.state.begin_pass(RenderPhase::Loading);
        self.surface.clear();

        if !self.source.is_connected() {
            let err = ChainviewError::connectivity("no live connection to the configuration source");
            self.fail(&err);
            return Err(err);
        }
        self.run_pass().await
    }

    /// Re-fetch the configuration and rebuild every lane from scratch.
    ///
    /// Before the first `initialize` this behaves like `initialize`.
    #[tracing::instrument(skip(self), fields(pass = self.state.pass + 1))]
    pub async fn refresh(&mut self) -> ChainviewResult<()> {
        if self.state.phase == RenderPhase::Uninitialized {
            return self.initialize().await;
        }
        self.state.begin_pass(RenderPhase::Refreshing);
        self.surface.clear();
        self.run_pass().await
    }

    /// Recompute every wire from fresh measurements, e.g. after a viewport resize.
    ///
    /// Lanes are kept; only valid while `Rendered`. Waits for the surface to settle again before
    /// measuring. A routing failure moves the renderer to `Errored` like any other pass.
    #[tracing::instrument(skip(self))]
    pub async fn relayout(&mut self) -> ChainviewResult<()> {
        if self.state.phase != RenderPhase::Rendered {
            return Err(ChainviewError::validation(format!(
                "relayout requires a rendered diagram, phase is {:?}",
                self.state.phase
            )));
        }
        match self.reroute().await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn run_pass(&mut self) -> ChainviewResult<()> {
        match self.build().await {
            Ok(()) => {
                self.state.phase = RenderPhase::Rendered;
                tracing::debug!(
                    pass = self.state.pass,
                    lanes = self.state.lanes.len(),
                    "render pass complete"
                );
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn build(&mut self) -> ChainviewResult<()> {
        self.source.download_config().await?;
        let channels = self.source.linearize_config().await?;

        let lanes = layout_nodes(&channels);
        self.surface.emit_lanes(&lanes);
        self.state.lanes = lanes;

        self.reroute().await
    }

    async fn reroute(&mut self) -> ChainviewResult<()> {
        self.surface.layout_settled().await?;
        let wires = route_wires(&self.state.lanes, &self.surface)?;
        self.surface.emit_wires(&wires);
        self.state.wires = wires;
        Ok(())
    }

    fn fail(&mut self, err: &ChainviewError) {
        let message = err.to_string();
        tracing::error!(pass = self.state.pass, error = %message, "render pass failed");
        self.surface.clear();
        self.surface.show_error(&message);
        self.state.fail(message);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
