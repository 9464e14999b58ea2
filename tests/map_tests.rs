use std::sync::{Arc, Mutex};

use glam::DVec2;
use loom_heatmap::data_types::{clamp_bounds, LatLng, ViewState, ZoomPyramid};
use loom_heatmap::map::crs::CrsSimple;
use loom_heatmap::map::{HeatmapMap, TileCoord, TileLayer, TileLayerOptions, TILE_SIZE};

fn pyramid() -> ZoomPyramid {
    ZoomPyramid::new(0, 8, 16, 500, 300).unwrap()
}

#[test]
fn test_pyramid_rejects_out_of_order_zooms() {
    assert!(ZoomPyramid::new(4, 2, 8, 100, 100).is_err());
    assert!(ZoomPyramid::new(0, 9, 8, 100, 100).is_err());
    assert!(ZoomPyramid::new(0, 4, 8, 0, 100).is_err());
    assert!(ZoomPyramid::new(0, 4, 8, 100, 100).is_ok());
}

#[test]
fn test_projection_round_trip() {
    for zoom in [1.0, 8.0, 12.5] {
        let p = LatLng::new(-1.25, 3.5);
        let back = CrsSimple::unproject(CrsSimple::project(p, zoom), zoom);
        assert!((back.lat - p.lat).abs() < 1.0e-12);
        assert!((back.lng - p.lng).abs() < 1.0e-12);
    }
}

#[test]
fn test_projection_doubles_per_zoom_level() {
    let p = LatLng::new(-2.0, 3.0);
    let a = CrsSimple::project(p, 5.0);
    let b = CrsSimple::project(p, 6.0);
    assert_eq!(b, a * 2.0);
    assert_eq!(CrsSimple::rescale(b, 6.0, 5.0), a);
}

#[test]
fn test_mount_fits_full_data_bounds() {
    let mut map = HeatmapMap::new(pyramid(), 800.0, 600.0).unwrap();
    let seen: Arc<Mutex<Vec<ViewState>>> = Default::default();
    let sink = seen.clone();
    map.on_view_changed(Box::new(move |vs| sink.lock().unwrap().push(*vs)));
    map.mount(None);

    let states = seen.lock().unwrap();
    assert_eq!(states.len(), 1);
    let vs = &states[0];
    // the 500x300 matrix fits a 800x600 viewport at the data zoom itself
    assert_eq!(vs.zoom, 8.0);
    assert_eq!(vs.data_bounds, [0.0, 0.0, 500.0, 300.0]);
    assert_eq!(vs.screen_bounds, [0.0, 0.0, 800.0, 600.0]);
}

#[test]
fn test_mount_restores_persisted_camera() {
    let mut map = HeatmapMap::new(pyramid(), 800.0, 600.0).unwrap();
    let center = LatLng::new(-0.5, 1.0);
    map.mount(Some((center, 10.7)));
    assert_eq!(map.center(), center);
    // persisted zoom is truncated to a whole level
    assert_eq!(map.zoom(), 10.0);
}

#[test]
fn test_data_bounds_are_resolution_independent() {
    let pyramid = ZoomPyramid::new(0, 8, 16, 5000, 5000).unwrap();
    let mut map = HeatmapMap::new(pyramid, 512.0, 512.0).unwrap();
    let center = LatLng::new(-9.0, 9.0);

    map.mount(Some((center, 10.0)));
    let at10 = map.view_state();
    // at zoom 10 one data cell covers 4 pixels, so 512 px show 128 cells
    assert!((at10.data_bounds[2] - at10.data_bounds[0] - 128.0).abs() < 1.0e-9);

    map.zoom_to(11.0);
    let at11 = map.view_state();
    assert!((at11.data_bounds[2] - at11.data_bounds[0] - 64.0).abs() < 1.0e-9);

    // same camera center regardless of zoom
    let mid10 = (at10.data_bounds[0] + at10.data_bounds[2]) * 0.5;
    let mid11 = (at11.data_bounds[0] + at11.data_bounds[2]) * 0.5;
    assert!((mid10 - mid11).abs() < 1.0e-9);
}

#[test]
fn test_bounds_clamped_to_matrix_extent() {
    let mut map = HeatmapMap::new(pyramid(), 800.0, 600.0).unwrap();
    map.mount(None);

    // drag far beyond the north-west corner
    map.set_view(LatLng::new(1.0e6, -1.0e6), 12.0);
    let vs = map.view_state();
    assert_eq!(vs.data_bounds, [0.0, 0.0, 0.0, 0.0]);

    // and far south-east
    map.set_view(LatLng::new(-1.0e6, 1.0e6), 12.0);
    let vs = map.view_state();
    assert_eq!(vs.data_bounds, [500.0, 300.0, 500.0, 300.0]);

    // any view stays inside the matrix rectangle
    map.set_view(LatLng::new(-0.8, 1.2), 9.0);
    let b = map.view_state().data_bounds;
    assert!(b[0] >= 0.0 && b[2] <= 500.0);
    assert!(b[1] >= 0.0 && b[3] <= 300.0);
    assert!(b[0] <= b[2] && b[1] <= b[3]);
}

#[test]
fn test_zoom_is_clamped_to_pyramid_range() {
    let mut map = HeatmapMap::new(pyramid(), 800.0, 600.0).unwrap();
    map.mount(None);
    map.zoom_to(99.0);
    assert_eq!(map.zoom(), 16.0);
    map.zoom_to(0.0);
    // the degenerate root level is never used
    assert_eq!(map.zoom(), 1.0);
}

#[test]
fn test_every_movement_emits_exactly_once() {
    let mut map = HeatmapMap::new(pyramid(), 800.0, 600.0).unwrap();
    let count = Arc::new(Mutex::new(0usize));
    let sink = count.clone();
    map.on_view_changed(Box::new(move |_| *sink.lock().unwrap() += 1));

    map.mount(None);
    assert_eq!(*count.lock().unwrap(), 1);
    map.pan_by(25.0, -10.0);
    assert_eq!(*count.lock().unwrap(), 2);
    map.zoom_to(9.0);
    assert_eq!(*count.lock().unwrap(), 3);
    map.set_view(LatLng::new(-0.5, 0.5), 10.0);
    assert_eq!(*count.lock().unwrap(), 4);
    map.resize(400.0, 300.0);
    assert_eq!(*count.lock().unwrap(), 5);
}

#[test]
fn test_unmount_stops_event_delivery() {
    let mut map = HeatmapMap::new(pyramid(), 800.0, 600.0).unwrap();
    let count = Arc::new(Mutex::new(0usize));
    let sink = count.clone();
    map.on_view_changed(Box::new(move |_| *sink.lock().unwrap() += 1));
    map.mount(None);
    assert_eq!(*count.lock().unwrap(), 1);

    map.unmount();
    map.pan_by(10.0, 10.0);
    map.zoom_to(12.0);
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_pan_moves_the_data_window() {
    let pyramid = ZoomPyramid::new(0, 8, 16, 5000, 5000).unwrap();
    let mut map = HeatmapMap::new(pyramid, 512.0, 512.0).unwrap();
    map.mount(Some((LatLng::new(-9.0, 9.0), 10.0)));
    let before = map.view_state().data_bounds;
    // 40 screen px right at zoom 10 is 10 data cells
    map.pan_by(40.0, 0.0);
    let after = map.view_state().data_bounds;
    assert!((after[0] - before[0] - 10.0).abs() < 1.0e-9);
    assert!((after[1] - before[1]).abs() < 1.0e-9);
}

#[test]
fn test_tile_url_template() {
    let layer = TileLayer::new("myproj", "cortex.loom", pyramid());
    let url = layer.tile_url(TileCoord { z: 9, x: 3, y: 7 });
    assert_eq!(url, "/loom/myproj/cortex.loom/tiles/9/3_7.png");
}

#[test]
fn test_tile_layer_zoom_limits() {
    let layer = TileLayer::new("p", "d", pyramid());
    assert_eq!(layer.min_zoom(), 1);
    assert_eq!(layer.max_zoom(), 16);
    assert_eq!(layer.max_native_zoom(), 8);

    let shallow = TileLayer::new("p", "d", pyramid())
        .with_options(TileLayerOptions {
            native_pyramid_depth: 2,
        });
    assert_eq!(shallow.max_native_zoom(), 14);

    // a depth larger than the range clamps at the minimum usable zoom
    let deep = TileLayer::new("p", "d", pyramid())
        .with_options(TileLayerOptions {
            native_pyramid_depth: 30,
        });
    assert_eq!(deep.max_native_zoom(), deep.min_zoom());
}

#[test]
fn test_visible_tiles_stay_inside_pyramid_extent() {
    let pyramid = ZoomPyramid::new(0, 8, 16, 500, 300).unwrap();
    let layer = TileLayer::new("p", "d", pyramid);
    let center = CrsSimple::unproject(DVec2::new(250.0, 150.0), 8.0);

    for zoom in [2.0, 5.0, 8.0, 12.0, 16.0] {
        let tiles = layer.visible_tiles(center, zoom, DVec2::new(1024.0, 768.0));
        assert!(!tiles.is_empty(), "zoom {}", zoom);
        for t in &tiles {
            // finer-than-native requests are downgraded, never issued
            assert!(t.z >= layer.min_zoom());
            assert!(t.z <= layer.max_native_zoom());
            let f = CrsSimple::scale(t.z as f64) / CrsSimple::scale(8.0);
            let max_tx = (500.0 * f / TILE_SIZE).ceil() as u32;
            let max_ty = (300.0 * f / TILE_SIZE).ceil() as u32;
            assert!(t.x < max_tx.max(1), "tile {:?}", t);
            assert!(t.y < max_ty.max(1), "tile {:?}", t);
        }
    }
}

#[test]
fn test_view_state_json_round_trip() {
    let vs = ViewState {
        data_bounds: [1.5, 2.5, 400.0, 250.0],
        screen_bounds: [0.0, 0.0, 800.0, 600.0],
        zoom: 9.0,
        center: LatLng::new(-0.586, 0.977),
    };
    let encoded = vs.encode().unwrap();
    let decoded = ViewState::decode(&encoded).unwrap();
    assert_eq!(decoded, vs);
}

#[test]
fn test_view_state_sparkline_ranges() {
    let vs = ViewState {
        data_bounds: [10.0, 20.0, 110.0, 80.0],
        screen_bounds: [0.0, 0.0, 100.0, 60.0],
        zoom: 9.0,
        center: LatLng::default(),
    };
    assert_eq!(vs.col_range(), (10.0, 110.0));
    assert_eq!(vs.row_range(), (20.0, 80.0));
}

#[test]
fn test_clamp_bounds_component_wise() {
    assert_eq!(
        clamp_bounds([-5.0, -2.0, 600.0, 400.0], 500.0, 300.0),
        [0.0, 0.0, 500.0, 300.0]
    );
    assert_eq!(
        clamp_bounds([10.0, 20.0, 30.0, 40.0], 500.0, 300.0),
        [10.0, 20.0, 30.0, 40.0]
    );
}
