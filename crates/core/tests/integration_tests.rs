//! Integration tests for surface-layout-core.
//!
//! These exercise the public API end to end, including layout documents
//! written to and read from disk.
//!
//! Run with: cargo test --package surface-layout-core --test integration_tests

use surface_layout_core::{
    store, Alignment, Axis, Bounds, EngineConfig, ErrorKind, GridSettings, LayoutEngine,
    LayoutError, Orientation, PageSize, PageSpec, PositionRequest, SizeRequest, SurfaceProfile,
};
use tempfile::TempDir;

fn engine_on(surface: SurfaceProfile) -> LayoutEngine {
    LayoutEngine::new(surface, EngineConfig::with_grid(GridSettings::default())).unwrap()
}

fn a4_engine() -> LayoutEngine {
    engine_on(SurfaceProfile::create(PageSize::A4, Orientation::Portrait, 96.0).unwrap())
}

fn add_abs(engine: &mut LayoutEngine, id: &str, x: i32, y: i32, width: u32, height: u32) {
    engine
        .add_element(
            id,
            PositionRequest::Absolute { x, y },
            SizeRequest::Absolute { width, height },
        )
        .unwrap();
}

// ============================================================================
// Documented scenarios
// ============================================================================

#[test]
fn test_a4_portrait_surface_extent() {
    let surface = SurfaceProfile::create(PageSize::A4, Orientation::Portrait, 96.0).unwrap();
    assert_eq!(surface.pixel_extent(), (794, 1123));
}

#[test]
fn test_relative_button_on_a4() {
    let mut engine = a4_engine();
    let button = engine
        .add_element(
            "btn1",
            PositionRequest::Relative { fx: 0.5, fy: 0.5 },
            SizeRequest::Absolute {
                width: 100,
                height: 30,
            },
        )
        .unwrap();
    assert_eq!(button.bounds, Bounds::new(397, 561, 100, 30));
}

#[test]
fn test_distribute_three_zero_width_elements() {
    let mut engine = a4_engine();
    for id in ["e1", "e2", "e3"] {
        add_abs(&mut engine, id, 0, 0, 0, 0);
    }
    engine
        .distribute(&["e1", "e2", "e3"], Axis::Horizontal, 0, 400)
        .unwrap();
    let xs: Vec<i32> = ["e1", "e2", "e3"]
        .iter()
        .map(|id| engine.get_bounds(id).unwrap().x)
        .collect();
    assert_eq!(xs, vec![100, 200, 300]);
}

#[test]
fn test_dpi_change_96_to_192() {
    let mut engine = a4_engine();
    add_abs(&mut engine, "box", 100, 100, 50, 50);
    engine.on_dpi_changed(192.0).unwrap();
    assert_eq!(
        engine.get_bounds("box").unwrap(),
        Bounds::new(200, 200, 100, 100)
    );
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_save_load_round_trip_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("layout.json");

    let mut engine = a4_engine();
    add_abs(&mut engine, "title", 40, 30, 714, 48);
    add_abs(&mut engine, "name", 40, 120, 333, 24);
    add_abs(&mut engine, "ok", 617, 1059, 137, 33);
    engine.set_font_size("title", Some(20.0)).unwrap();

    let original: Vec<Bounds> = engine
        .element_ids()
        .iter()
        .map(|id| engine.get_bounds(id).unwrap())
        .collect();
    store::save(&engine, &path).unwrap();

    let mut restored = a4_engine();
    for id in ["title", "name", "ok"] {
        add_abs(&mut restored, id, 0, 0, 1, 1);
    }
    restored.set_font_size("title", Some(12.0)).unwrap();
    let report = store::load(&mut restored, &path).unwrap();
    assert_eq!(report.applied.len(), 3);

    for (id, before) in ["title", "name", "ok"].iter().zip(original) {
        let after = restored.get_bounds(id).unwrap();
        assert!((after.x - before.x).abs() <= 1, "{id}: {after:?} vs {before:?}");
        assert!((after.y - before.y).abs() <= 1, "{id}: {after:?} vs {before:?}");
        assert!(after.width.abs_diff(before.width) <= 1);
        assert!(after.height.abs_diff(before.height) <= 1);
    }
    let font = restored.element("title").unwrap().font_pt.unwrap();
    assert!((font - 20.0).abs() < 1e-9);
    assert_eq!(restored.element("name").unwrap().font_pt, None);
}

#[test]
fn test_save_on_letter_load_on_a4_landscape() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("layout.json");

    let mut letter =
        engine_on(SurfaceProfile::create(PageSize::Letter, Orientation::Portrait, 96.0).unwrap());
    add_abs(&mut letter, "logo", 408, 0, 408, 264);
    store::save(&letter, &path).unwrap();

    let mut landscape =
        engine_on(SurfaceProfile::create(PageSize::A4, Orientation::Landscape, 96.0).unwrap());
    add_abs(&mut landscape, "logo", 0, 0, 1, 1);
    store::load(&mut landscape, &path).unwrap();

    // Half the width, a quarter of the height, anchored at the horizontal middle.
    let b = landscape.get_bounds("logo").unwrap();
    assert_eq!(b, Bounds::new(561, 0, 561, 198));
}

#[test]
fn test_save_load_portable_to_double_size() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("layout.json");

    let mut small = engine_on(SurfaceProfile::from_pixels(640, 480, 96.0).unwrap());
    add_abs(&mut small, "a", 64, 48, 320, 24);
    add_abs(&mut small, "b", 13, 7, 5, 3);
    let saved = store::save(&small, &path).unwrap();

    let mut big = engine_on(SurfaceProfile::from_pixels(1280, 960, 96.0).unwrap());
    add_abs(&mut big, "a", 0, 0, 1, 1);
    add_abs(&mut big, "b", 0, 0, 1, 1);
    store::load(&mut big, &path).unwrap();

    assert_eq!(big.get_bounds("a").unwrap(), Bounds::new(128, 96, 640, 48));
    assert_eq!(big.get_bounds("b").unwrap(), Bounds::new(26, 14, 10, 6));

    let resaved = store::capture(&big).unwrap();
    for (before, after) in saved.elements.iter().zip(&resaved.elements) {
        assert_eq!(before.id, after.id);
        assert!((before.left - after.left).abs() < 1e-9);
        assert!((before.top - after.top).abs() < 1e-9);
        assert!((before.width - after.width).abs() < 1e-9);
        assert!((before.height - after.height).abs() < 1e-9);
    }
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut engine = a4_engine();
    let err = store::load(&mut engine, temp_dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, LayoutError::FileNotFound(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_load_malformed_file_leaves_engine_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ \"surfaceName\": \"A4\", \"elements\": [ {\"id\": ").unwrap();

    let mut engine = a4_engine();
    add_abs(&mut engine, "a", 10, 20, 30, 40);
    let err = store::load(&mut engine, &path).unwrap_err();
    assert!(matches!(err, LayoutError::ParseError { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(engine.get_bounds("a").unwrap(), Bounds::new(10, 20, 30, 40));
}

#[test]
fn test_load_superset_template() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("template.json");

    let mut full = a4_engine();
    add_abs(&mut full, "a", 10, 10, 10, 10);
    add_abs(&mut full, "b", 20, 20, 10, 10);
    add_abs(&mut full, "c", 30, 30, 10, 10);
    store::save(&full, &path).unwrap();

    let mut partial = a4_engine();
    add_abs(&mut partial, "b", 0, 0, 1, 1);
    let report = store::load(&mut partial, &path).unwrap();
    assert_eq!(report.applied, vec!["b"]);
    assert_eq!(report.skipped, vec!["a", "c"]);
    assert_eq!(partial.get_bounds("b").unwrap(), Bounds::new(20, 20, 10, 10));
}

#[test]
fn test_saved_document_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("layout.json");

    let surface = SurfaceProfile::create(PageSize::A4, Orientation::Portrait, 96.0)
        .unwrap()
        .with_name("order-form");
    let mut engine = engine_on(surface);
    add_abs(&mut engine, "a", 397, 0, 794, 1123);
    store::save(&engine, &path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["surfaceName"], "order-form");
    assert!(json["savedAt"].as_str().unwrap().contains('T'));
    let el = &json["elements"][0];
    assert_eq!(el["id"], "a");
    assert_eq!(el["left"], 0.5);
    assert_eq!(el["width"], 1.0);
    assert_eq!(el["fontScale"], 1.0);
}

// ============================================================================
// Engine behavior
// ============================================================================

#[test]
fn test_custom_page_with_grid_placement() {
    let page = PageSpec::Custom {
        width_mm: 100.0,
        height_mm: 50.0,
    };
    let surface = SurfaceProfile::create(page, Orientation::Landscape, 254.0).unwrap();
    assert_eq!(surface.pixel_extent(), (1000, 500));

    let mut engine = engine_on(surface);
    let el = engine
        .add_element(
            "cell",
            PositionRequest::Grid { col: 3, row: 2 },
            SizeRequest::Grid { cols: 2, rows: 1 },
        )
        .unwrap();
    assert_eq!(el.bounds, Bounds::new(24, 16, 16, 8));
}

#[test]
fn test_nested_layout_survives_dpi_round_trip() {
    let mut engine = a4_engine();
    add_abs(&mut engine, "panel", 101, 203, 400, 300);
    engine
        .add_child_element(
            "panel",
            "field",
            PositionRequest::Absolute { x: 17, y: 9 },
            SizeRequest::Absolute {
                width: 120,
                height: 22,
            },
        )
        .unwrap();

    engine.on_dpi_changed(144.0).unwrap();
    engine.on_dpi_changed(96.0).unwrap();

    let field = engine.get_bounds("field").unwrap();
    assert!((field.x - 118).abs() <= 1);
    assert!((field.y - 212).abs() <= 1);
    assert_eq!(engine.surface().pixel_extent(), (794, 1123));
}

#[test]
fn test_align_then_dirty_regions() {
    let mut engine = a4_engine();
    add_abs(&mut engine, "a", 10, 10, 100, 100);
    engine.take_dirty_regions();

    engine.align(&["a"], Alignment::BottomRight, 0).unwrap();
    let dirty = engine.take_dirty_regions();
    assert_eq!(dirty, vec![Bounds::new(10, 10, 784, 1113)]);
}

#[test]
fn test_reference_errors_do_not_corrupt_state() {
    let mut engine = a4_engine();
    add_abs(&mut engine, "a", 1, 2, 3, 4);

    let dup = engine
        .add_element(
            "a",
            PositionRequest::Absolute { x: 0, y: 0 },
            SizeRequest::Absolute {
                width: 0,
                height: 0,
            },
        )
        .unwrap_err();
    assert_eq!(dup.kind(), ErrorKind::Reference);
    let unknown = engine
        .reposition("b", PositionRequest::Absolute { x: 0, y: 0 })
        .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::Reference);

    assert_eq!(engine.len(), 1);
    assert_eq!(engine.get_bounds("a").unwrap(), Bounds::new(1, 2, 3, 4));
}
