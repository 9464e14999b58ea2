//! End-to-end wiring: map movement drives sparkline repaints through the
//! scheduler, the way the heatmap view assembles the pieces.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use loom_heatmap::data_types::{Attribute, LatLng, ViewState, ZoomPyramid};
use loom_heatmap::map::HeatmapMap;
use loom_heatmap::scheduler::{AsyncPainter, PaintState, RenderQueue};
use loom_heatmap::sparkline::{Sparkline, SparklineMode, SparklineSettings};
use loom_heatmap::surface::{PaintCommand, SharedSurface};

#[test]
fn test_view_changes_drive_sparkline_repaints() {
    let queue = RenderQueue::new(Duration::from_millis(100));
    // the row strip beside the map: narrow and tall
    let surface = SharedSurface::new(80.0, 512.0);
    let painter = AsyncPainter::new(queue.clone(), None, Some(Box::new(surface.clone())));
    // no paint registered yet, so nothing is queued
    assert_eq!(painter.state(), PaintState::Idle);
    assert_eq!(queue.pending(), 0);

    let attr = Arc::new(Attribute::from_floats(
        "expression",
        (0..5000).map(|i| (i % 97) as f32).collect(),
    ));

    let pyramid = ZoomPyramid::new(0, 8, 16, 5000, 5000).unwrap();
    let mut map = HeatmapMap::new(pyramid, 512.0, 512.0).unwrap();

    let seen_ranges: Arc<Mutex<Vec<(f64, f64)>>> = Default::default();
    let ranges_sink = seen_ranges.clone();
    let listener_painter = painter.clone();
    let listener_attr = attr.clone();
    map.on_view_changed(Box::new(move |vs: &ViewState| {
        let (lo, hi) = vs.row_range();
        ranges_sink.lock().unwrap().push((lo, hi));
        let sparkline = Sparkline::new(
            listener_attr.clone(),
            SparklineMode::Bars,
            SparklineSettings::default(),
        )
        .with_data_range(lo, hi);
        // a new view window means a new paint, at user priority
        listener_painter.replace_paint(Box::new(sparkline.into_task()));
    }));

    map.mount(Some((LatLng::new(-9.0, 9.0), 10.0)));
    assert_eq!(queue.pending(), 1);
    assert_eq!(queue.run_pending(), 0);
    assert!(painter.is_rendered());
    let first = surface.snapshot();
    assert!(first
        .iter()
        .any(|c| matches!(c, PaintCommand::FillRect { .. })));

    // pan down: a new row window arrives and invalidates the strip
    map.pan_by(0.0, 200.0);
    assert_eq!(queue.pending(), 1);
    assert!(!painter.is_rendered());
    queue.run_pending();
    assert!(painter.is_rendered());

    let second = surface.snapshot();
    assert_ne!(first, second);

    // the listener saw the 128-row window slide by 50 rows
    let ranges = seen_ranges.lock().unwrap();
    assert_eq!(ranges.len(), 2);
    let (lo0, hi0) = ranges[0];
    let (lo1, hi1) = ranges[1];
    assert!((hi0 - lo0 - 128.0).abs() < 1.0e-9);
    assert!((lo1 - lo0 - 50.0).abs() < 1.0e-9);
    assert!((hi1 - hi0 - 50.0).abs() < 1.0e-9);

    // unmounting the view clears the strip's pending work
    map.unmount();
    map.pan_by(0.0, 200.0);
    assert_eq!(queue.pending(), 0);
    painter.remove();
    queue.clear();
}
