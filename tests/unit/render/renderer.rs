use super::*;
use crate::config::model::{ChannelConfig, FilterSpec, StageDescriptor};
use crate::foundation::core::Rect;
use crate::layout::node::NodeSpec;
use crate::layout::wire::LayoutProvider;
use crate::source::config_source::StaticConfigSource;
use crate::surface::memory::{InMemorySurface, SurfaceEvent};
use pollster::block_on;

/// Source double with injectable failures and call counters.
#[derive(Default)]
struct ScriptedSource {
    inner: StaticConfigSource,
    fail_download: bool,
    fail_linearize: bool,
    downloads: usize,
}

impl ScriptedSource {
    fn new(channels: Vec<ChannelConfig>) -> Self {
        Self {
            inner: StaticConfigSource::new(channels),
            ..Self::default()
        }
    }
}

impl ConfigSource for ScriptedSource {
    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    async fn download_config(&mut self) -> ChainviewResult<()> {
        self.downloads += 1;
        if self.fail_download {
            return Err(ChainviewError::connectivity("transport closed"));
        }
        self.inner.download_config().await
    }

    async fn linearize_config(&mut self) -> ChainviewResult<Vec<ChannelConfig>> {
        if self.fail_linearize {
            return Err(ChainviewError::config_fetch("snapshot is malformed"));
        }
        self.inner.linearize_config().await
    }
}

fn chain(k: usize) -> ChannelConfig {
    let mut stages = vec![StageDescriptor::input("hw:0", "S32LE")];
    for i in 0..k.saturating_sub(2) {
        stages.push(StageDescriptor::filter(format!("f{i}"), FilterSpec::gain(0.0)));
    }
    if k >= 2 {
        stages.push(StageDescriptor::output("hw:1", "S32LE"));
    }
    stages.truncate(k);
    ChannelConfig::new(stages)
}

fn renderer(
    channels: Vec<ChannelConfig>,
) -> PipelineRenderer<ScriptedSource, InMemorySurface> {
    PipelineRenderer::new(ScriptedSource::new(channels), InMemorySurface::new())
}

#[test]
fn initialize_renders_one_lane_per_channel() {
    let mut r = renderer(vec![chain(3), chain(0), chain(1), chain(5)]);
    block_on(r.initialize()).unwrap();

    assert_eq!(r.phase(), &RenderPhase::Rendered);
    assert_eq!(r.lanes().len(), 4);
    for (i, lane) in r.lanes().iter().enumerate() {
        assert_eq!(lane.label, format!("Channel {i}"));
    }
    let wire_counts: Vec<_> = r.wires().iter().map(|w| w.wires.len()).collect();
    assert_eq!(wire_counts, vec![2, 0, 0, 4]);
    assert_eq!(
        r.surface().events(),
        &[
            SurfaceEvent::Cleared,
            SurfaceEvent::Lanes(4),
            SurfaceEvent::Settled,
            SurfaceEvent::Wires(6),
        ]
    );
    assert_eq!(r.surface().lanes(), r.lanes());
}

#[test]
fn initialize_without_connection_errors_without_fetching() {
    let mut source = ScriptedSource::new(vec![chain(3)]);
    source.inner.set_connected(false);
    let mut r = PipelineRenderer::new(source, InMemorySurface::new());

    let err = block_on(r.initialize()).unwrap_err();
    assert!(matches!(err, ChainviewError::Connectivity(_)));
    assert!(matches!(r.phase(), RenderPhase::Errored { message } if message.contains("connection")));
    assert!(r.lanes().is_empty());
    assert_eq!(r.source().downloads, 0);
    assert!(r.surface().lanes().is_empty());
    assert!(r.surface().error().is_some());
}

#[test]
fn fetch_failures_clear_lanes_and_show_error() {
    let mut r = renderer(vec![chain(3)]);
    block_on(r.initialize()).unwrap();
    assert_eq!(r.lanes().len(), 1);

    r.source_mut().fail_download = true;
    let err = block_on(r.refresh()).unwrap_err();
    assert!(matches!(err, ChainviewError::Connectivity(_)));
    assert!(matches!(r.phase(), RenderPhase::Errored { .. }));
    assert!(r.lanes().is_empty());
    assert!(r.wires().is_empty());
    assert!(r.surface().lanes().is_empty());
    assert_eq!(r.surface().error(), Some("connectivity error: transport closed"));

    r.source_mut().fail_download = false;
    r.source_mut().fail_linearize = true;
    let err = block_on(r.refresh()).unwrap_err();
    assert!(matches!(err, ChainviewError::ConfigFetch(_)));
    assert_eq!(
        r.phase(),
        &RenderPhase::Errored {
            message: "config fetch error: snapshot is malformed".to_string()
        }
    );
}

#[test]
fn refresh_retries_after_error() {
    let mut r = renderer(vec![chain(2)]);
    r.source_mut().fail_linearize = true;
    assert!(block_on(r.initialize()).is_err());

    r.source_mut().fail_linearize = false;
    block_on(r.refresh()).unwrap();
    assert_eq!(r.phase(), &RenderPhase::Rendered);
    assert_eq!(r.lanes().len(), 1);
    assert!(r.surface().error().is_none());
}

#[test]
fn rapid_refreshes_leave_one_consistent_set() {
    let mut r = renderer(vec![chain(3), chain(2)]);
    block_on(r.initialize()).unwrap();

    r.source_mut().inner.publish(vec![chain(4)]);
    block_on(r.refresh()).unwrap();
    block_on(r.refresh()).unwrap();

    assert_eq!(r.state().pass, 3);
    assert_eq!(r.lanes().len(), 1);
    assert_eq!(r.lanes()[0].nodes.len(), 4);
    assert_eq!(r.wires().len(), 1);
    assert_eq!(r.wires()[0].wires.len(), 3);
    assert_eq!(r.surface().lanes(), r.lanes());
    assert_eq!(r.surface().wires(), r.wires());

    let clears = r
        .surface()
        .events()
        .iter()
        .filter(|e| **e == SurfaceEvent::Cleared)
        .count();
    assert_eq!(clears, 3);
}

#[test]
fn refresh_before_initialize_checks_connection() {
    let mut source = ScriptedSource::new(vec![chain(2)]);
    source.inner.set_connected(false);
    let mut r = PipelineRenderer::new(source, InMemorySurface::new());
    assert!(matches!(
        block_on(r.refresh()),
        Err(ChainviewError::Connectivity(_))
    ));

    let mut r = renderer(vec![chain(2)]);
    block_on(r.refresh()).unwrap();
    assert_eq!(r.phase(), &RenderPhase::Rendered);
    assert_eq!(r.state().pass, 1);
}

#[test]
fn relayout_recomputes_wires_after_resize() {
    let mut r = renderer(vec![chain(3)]);
    block_on(r.initialize()).unwrap();
    assert_eq!(r.wires()[0].wires[0].length, 20.0);

    r.surface_mut().resize(0.5);
    block_on(r.relayout()).unwrap();
    assert_eq!(r.phase(), &RenderPhase::Rendered);
    assert_eq!(
        &r.surface().events()[4..],
        &[SurfaceEvent::Settled, SurfaceEvent::Wires(2)]
    );
    assert_eq!(r.wires()[0].wires.len(), 2);
    assert_eq!(r.wires()[0].wires[0].length, 10.0);
    assert_eq!(r.surface().wires(), r.wires());
    assert_eq!(r.lanes()[0].nodes[1].x_offset, 150.0);
}

#[test]
fn relayout_requires_rendered_phase() {
    let mut r = renderer(vec![chain(3)]);
    assert!(matches!(
        block_on(r.relayout()),
        Err(ChainviewError::Validation(_))
    ));
    assert_eq!(r.phase(), &RenderPhase::Uninitialized);
}

/// Surface whose reflow can be held back, leaving nodes unmeasurable after a resize.
#[derive(Default)]
struct StallingSurface {
    inner: InMemorySurface,
    stall: bool,
}

impl LayoutProvider for StallingSurface {
    fn measure(&self, node: &NodeSpec) -> Option<Rect> {
        self.inner.measure(node)
    }
}

impl PresentationSurface for StallingSurface {
    fn clear(&mut self) {
        self.inner.clear();
    }

    fn emit_lanes(&mut self, lanes: &[LaneSpec]) {
        self.inner.emit_lanes(lanes);
    }

    async fn layout_settled(&mut self) -> ChainviewResult<()> {
        if self.stall {
            return Ok(());
        }
        self.inner.layout_settled().await
    }

    fn emit_wires(&mut self, wires: &[LaneWires]) {
        self.inner.emit_wires(wires);
    }

    fn show_error(&mut self, message: &str) {
        self.inner.show_error(message);
    }
}

#[test]
fn relayout_measures_only_after_surface_settles_again() {
    let mut r = PipelineRenderer::new(
        ScriptedSource::new(vec![chain(3)]),
        StallingSurface::default(),
    );
    block_on(r.initialize()).unwrap();

    r.surface_mut().inner.resize(2.0);
    block_on(r.relayout()).unwrap();
    assert_eq!(r.wires()[0].wires[0].length, 40.0);
}

#[test]
fn relayout_failure_moves_to_errored() {
    let mut r = PipelineRenderer::new(
        ScriptedSource::new(vec![chain(3)]),
        StallingSurface::default(),
    );
    block_on(r.initialize()).unwrap();

    r.surface_mut().inner.resize(2.0);
    r.surface_mut().stall = true;
    let err = block_on(r.relayout()).unwrap_err();
    assert!(matches!(err, ChainviewError::Layout(_)));
    assert!(matches!(r.phase(), RenderPhase::Errored { message } if message.contains("layout error")));
    assert!(r.lanes().is_empty());
    assert!(r.wires().is_empty());
    assert!(r.surface().inner.wires().is_empty());
    assert!(r.surface().inner.error().is_some());
}

#[test]
fn malformed_stages_do_not_abort_the_pass() {
    let channel: ChannelConfig = serde_json::from_value(serde_json::json!([
        {"type": "input", "device": {"device": "hw:0", "format": "S32LE"}},
        {"type": "filter"},
        {"type": "resampler"},
        {"type": "output", "device": {"device": "hw:1", "format": "S32LE"}}
    ]))
    .unwrap();
    let mut r = renderer(vec![channel]);
    block_on(r.initialize()).unwrap();

    let nodes = &r.lanes()[0].nodes;
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[1].details, vec!["Unknown"]);
    assert_eq!(nodes[2].header, "UNKNOWN");
    assert_eq!(r.wires()[0].wires.len(), 3);
    assert_eq!(r.diagram().wire_count(), 3);
}
