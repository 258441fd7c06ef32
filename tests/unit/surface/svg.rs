use super::*;
use crate::config::model::{FilterSpec, StageDescriptor};
use crate::layout::diagram::route_wires;
use crate::layout::lane::build_lane;

fn surface_with_chain() -> SvgSurface {
    let mut s = SvgSurface::new(SvgSurfaceOpts::default());
    let lanes = vec![build_lane(
        0,
        &[
            StageDescriptor::input("hw:0", "S32LE"),
            StageDescriptor::filter("Bass & <Treble>", FilterSpec::gain(1.0)),
            StageDescriptor::output("hw:1", "S32LE"),
        ],
    )];
    s.emit_lanes(&lanes);
    pollster::block_on(s.layout_settled()).unwrap();
    let wires = route_wires(&lanes, &s).unwrap();
    s.emit_wires(&wires);
    s
}

#[test]
fn measurements_are_offset_past_label_column() {
    let s = SvgSurface::new(SvgSurfaceOpts::default());
    let lane = build_lane(1, &[StageDescriptor::mixer(vec![])]);
    let r = s.measure(&lane.nodes[0]).unwrap();
    assert_eq!(r, Rect::new(116.0, 156.0, 236.0, 236.0));
}

#[test]
fn document_contains_nodes_wires_and_connectors() {
    let svg = surface_with_chain().to_svg_string();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<line").count(), 2);
    assert_eq!(svg.matches("rotate(0 ").count(), 2);
    // input: right only, filter: both, output: left only
    assert_eq!(svg.matches("<circle").count(), 4);
    assert!(svg.contains(">Channel 0<"));
    assert!(svg.contains("Bass &amp; &lt;Treble&gt;"));
}

#[test]
fn document_parses_as_svg() {
    let svg = surface_with_chain().to_svg_string();
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn error_panel_replaces_diagram() {
    let mut s = surface_with_chain();
    s.clear();
    s.show_error("connectivity error: offline");
    let svg = s.to_svg_string();
    assert!(svg.contains("connectivity error: offline"));
    assert!(!svg.contains("<line"));
    assert!(!svg.contains("Channel 0"));
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}
