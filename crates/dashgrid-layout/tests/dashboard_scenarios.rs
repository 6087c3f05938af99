//! End-to-end dashboard scenarios: a downloader-style dashboard built,
//! rearranged, saved, and restored through the public API only.

use std::cell::RefCell;
use std::rc::Rc;

use dashgrid_core::{Cell, CellSize};
use dashgrid_layout::{
    Grid, GridOptions, RegistryError, Widget, WidgetKind, WidgetRegistry,
};

fn dashboard() -> Grid {
    // A fixed-width dashboard that grows downward as widgets pile up.
    Grid::new(
        6,
        4,
        GridOptions::new()
            .auto_resize_width(false)
            .auto_resize_height(true)
            .gap_px(8.0),
    )
    .unwrap()
}

#[test]
fn building_a_default_dashboard_packs_top_left_first() {
    let mut grid = dashboard();
    let downloads = grid.add_widget(Widget::new(WidgetKind::Downloads), None);
    let settings = grid.add_widget(Widget::new(WidgetKind::Settings), None);
    let stats = grid.add_widget(Widget::new(WidgetKind::Statistics), None);
    let subs = grid.add_widget(Widget::new(WidgetKind::Subscriptions), None);

    // Downloads (4x3) claims the top-left block, settings (2x2) the gap to
    // its right, statistics (2x2) goes below settings, subscriptions (4x2)
    // grows the grid downward.
    assert_eq!(grid.widget(downloads).unwrap().position, Cell::new(0, 0));
    assert_eq!(grid.widget(settings).unwrap().position, Cell::new(4, 0));
    assert_eq!(grid.widget(stats).unwrap().position, Cell::new(4, 2));
    assert_eq!(grid.widget(subs).unwrap().position, Cell::new(0, 3));
    assert_eq!(grid.dimensions(), (6, 5));
}

#[test]
fn drag_rearrange_with_nearest_slot_snapping() {
    let mut grid = dashboard();
    let downloads = grid.add_widget(Widget::new(WidgetKind::Downloads), None);
    let settings = grid.add_widget(Widget::new(WidgetKind::Settings), None);

    // A drop right on top of the downloads widget is invalid; the engine
    // snaps to the closest free slot instead of rejecting the gesture.
    let size = grid.widget(settings).unwrap().size;
    let drop = Cell::new(1, 1);
    assert!(!grid.is_valid_position(drop, size, Some(settings)));
    let snapped = grid
        .nearest_valid_position(drop, size, Some(settings))
        .unwrap();
    grid.move_widget(settings, snapped);

    let a = grid.widget(downloads).unwrap().footprint();
    let b = grid.widget(settings).unwrap().footprint();
    assert!(!a.intersects(b));
}

#[test]
fn full_grid_fallback_is_the_documented_origin_overlap() {
    // The 3x3 case: a second 2x2 widget cannot fit anywhere.
    let mut grid = Grid::new(
        3,
        3,
        GridOptions::new()
            .auto_resize_width(false)
            .auto_resize_height(false),
    )
    .unwrap();

    let first = grid.add_widget(
        Widget::new(WidgetKind::Settings).with_size(CellSize::new(2, 2)),
        None,
    );
    assert_eq!(grid.widget(first).unwrap().position, Cell::new(0, 0));
    assert_eq!(grid.find_available_position(CellSize::new(2, 2)), None);

    let second = grid.add_widget(
        Widget::new(WidgetKind::Statistics).with_size(CellSize::new(2, 2)),
        None,
    );
    // The add still succeeds, at the origin, overlapping the first widget.
    assert_eq!(grid.widget(second).unwrap().position, Cell::new(0, 0));
    assert!(grid
        .widget(first)
        .unwrap()
        .footprint()
        .intersects(grid.widget(second).unwrap().footprint()));
}

#[test]
fn save_and_restore_with_a_custom_widget_kind() {
    let mut registry = WidgetRegistry::with_builtins();
    registry.register("episode-calendar", |entry| {
        Ok(Widget::new(WidgetKind::Custom("episode-calendar".into()))
            .with_title(entry.title.clone()))
    });

    let mut grid = dashboard();
    grid.add_widget(Widget::new(WidgetKind::Downloads), None);
    grid.add_widget(
        Widget::new(WidgetKind::Custom("episode-calendar".into()))
            .with_title("Airing this week")
            .with_size(CellSize::new(2, 2)),
        None,
    );

    let saved = serde_json::to_string(&grid.layout()).unwrap();

    // A fresh session restores the same dashboard from persisted JSON.
    let mut restored = dashboard();
    let layout = serde_json::from_str(&saved).unwrap();
    let report = restored.load_layout(&layout, &registry);
    assert!(report.is_complete());
    assert_eq!(restored.layout(), layout);
    assert_eq!(
        restored.widgets()[1].title,
        "Airing this week"
    );
}

#[test]
fn restore_without_the_custom_factory_degrades_per_entry() {
    let mut grid = dashboard();
    grid.add_widget(Widget::new(WidgetKind::Downloads), None);
    grid.add_widget(
        Widget::new(WidgetKind::Custom("episode-calendar".into())).with_size(CellSize::new(2, 2)),
        None,
    );
    let saved = grid.layout();

    // Builtins only: the custom entry is skipped, the rest load.
    let mut restored = dashboard();
    let report = restored.load_layout(&saved, &WidgetRegistry::with_builtins());
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(
        report.skipped[0].error,
        RegistryError::UnknownKind(ref tag) if tag == "episode-calendar"
    ));
    assert_eq!(restored.widget_count(), 1);
    assert_eq!(restored.widgets()[0].kind, WidgetKind::Downloads);
}

#[test]
fn subscribers_observe_the_whole_session() {
    let mut grid = dashboard();

    let layouts = Rc::new(RefCell::new(0u32));
    let resizes = Rc::new(RefCell::new(Vec::new()));
    let layout_sink = Rc::clone(&layouts);
    let resize_sink = Rc::clone(&resizes);
    let _layout_sub = grid.on_layout_changed(move |_| *layout_sink.borrow_mut() += 1);
    let _resize_sub =
        grid.on_grid_resized(move |e| resize_sink.borrow_mut().push((e.width, e.height)));

    let downloads = grid.add_widget(Widget::new(WidgetKind::Downloads), None); // fits, no resize
    let subs = grid.add_widget(Widget::new(WidgetKind::Subscriptions), None); // grows to height 5
    grid.move_widget(subs, Cell::new(0, 4)); // grows to height 6
    grid.remove_widget(downloads); // shrink floor is 4, subs still needs 6
    grid.remove_widget(subs); // back to the floor

    assert_eq!(*layouts.borrow(), 5);
    assert_eq!(*resizes.borrow(), vec![(6, 5), (6, 6), (6, 4)]);
}

#[test]
fn unsubscribed_observers_go_quiet() {
    let mut grid = dashboard();
    let count = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&count);
    let sub = grid.on_layout_changed(move |_| *sink.borrow_mut() += 1);

    grid.add_widget(Widget::new(WidgetKind::Settings), None);
    drop(sub);
    grid.add_widget(Widget::new(WidgetKind::Statistics), None);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn pixel_geometry_for_the_render_layer() {
    let mut grid = dashboard();
    let downloads = grid.add_widget(Widget::new(WidgetKind::Downloads), None);

    // 6 columns, 8px gaps, 608px viewport: 100px cells.
    let cell = grid.cell_px(640.0, 440.0);
    assert_eq!(cell.width, 100.0);
    // Downloads spans 4 columns and 3 gaps: 4*100 + 3*8.
    let px = grid.pixel_rect(downloads, 640.0, 440.0).unwrap();
    assert_eq!(px.x, 0.0);
    assert_eq!(px.width, 424.0);
}
