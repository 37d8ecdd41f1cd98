use super::*;
use crate::text::shaper::BlockShaper;

fn canvas() -> Canvas {
    Canvas::new(960, 540).unwrap()
}

fn text(entries: &[&str]) -> TextContent {
    TextContent {
        entries: entries.iter().map(|s| (*s).to_owned()).collect(),
        ..TextContent::default()
    }
}

#[test]
fn identical_keys_reuse_the_cached_entry() {
    let mut cache = TextLayoutCache::new();
    let t = text(&["AB"]);
    let first = cache
        .resolve(&t, 5, 0.8, canvas(), &mut BlockShaper)
        .unwrap() as *const LayoutEntry;
    let second = cache
        .resolve(&t, 5, 0.8, canvas(), &mut BlockShaper)
        .unwrap() as *const LayoutEntry;
    assert_eq!(first, second);
    assert_eq!(cache.recompute_count(), 1);
}

#[test]
fn each_key_component_forces_a_rebuild() {
    let mut cache = TextLayoutCache::new();
    let mut t = text(&["AB"]);
    cache.resolve(&t, 5, 0.8, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 1);

    t.font_size = 48.0;
    cache.resolve(&t, 5, 0.8, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 2);

    t.entries = vec!["AB".into(), "C".into()];
    cache.resolve(&t, 5, 0.8, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 3);

    cache.resolve(&t, 4, 0.8, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 4);

    cache.resolve(&t, 4, 0.9, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 5);

    t.font_family = "Helvetica".into();
    cache.resolve(&t, 4, 0.9, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 6);

    cache
        .resolve(&t, 4, 0.9, Canvas::new(961, 540).unwrap(), &mut BlockShaper)
        .unwrap();
    assert_eq!(cache.recompute_count(), 7);

    cache
        .resolve(&t, 4, 0.9, Canvas::new(961, 540).unwrap(), &mut BlockShaper)
        .unwrap();
    assert_eq!(cache.recompute_count(), 7);
}

#[test]
fn spacing_changes_within_tolerance_are_ignored() {
    let mut cache = TextLayoutCache::new();
    let t = text(&["AB"]);
    cache.resolve(&t, 5, 1.0, canvas(), &mut BlockShaper).unwrap();
    // 540 * 1e-6 / 2 is far below 0.001 px.
    cache.resolve(&t, 5, 1.000_001, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 1);
}

#[test]
fn invalidate_marks_dirty() {
    let mut cache = TextLayoutCache::default();
    let t = text(&["AB"]);
    cache.resolve(&t, 5, 0.8, canvas(), &mut BlockShaper).unwrap();
    cache.invalidate();
    cache.resolve(&t, 5, 0.8, canvas(), &mut BlockShaper).unwrap();
    assert_eq!(cache.recompute_count(), 2);
}

#[test]
fn metrics_follow_measured_widths() {
    let t = TextContent {
        entries: vec!["AB".into(), "   ".into()],
        font_size: 100.0,
        ..TextContent::default()
    };
    let entry = build_entry(&t, 3, 1.0, Canvas::new(600, 300).unwrap(), &mut BlockShaper).unwrap();
    assert_eq!(entry.entries.len(), 2);
    // "AB" = 2 * 60 px.
    assert!((entry.entries[0].width - 120.0).abs() < 1e-3);
    assert_eq!(entry.entries[0].repetitions, 7);
    // Whitespace-only entries collapse to one space.
    assert_eq!(entry.entries[1].text, " ");
    assert!((entry.entries[1].width - 60.0).abs() < 1e-3);

    assert!((entry.line_height - 100.0).abs() < 1e-4);
    assert_eq!(entry.adjusted_start_offset, 0.0);
    assert_eq!(entry.line_center(0), 50.0);
    assert_eq!(entry.line_center(2), 250.0);
    assert_eq!(entry.entry_for_line(2).unwrap().text, "AB");
}

#[test]
fn zero_width_entries_are_floored_to_one_pixel() {
    let t = TextContent {
        entries: vec!["A".into()],
        font_size: 0.5,
        ..TextContent::default()
    };
    let entry = build_entry(&t, 1, 1.0, Canvas::new(10, 10).unwrap(), &mut BlockShaper).unwrap();
    assert_eq!(entry.entries[0].width, 1.0);
    assert_eq!(entry.entries[0].repetitions, 12);
}

#[test]
fn spacing_offsets_center_the_stack() {
    let t = text(&["A"]);
    let entry = build_entry(&t, 5, 0.8, Canvas::new(100, 500).unwrap(), &mut BlockShaper).unwrap();
    assert!((entry.line_height - 80.0).abs() < 1e-4);
    assert!((entry.adjusted_start_offset - 50.0).abs() < 1e-4);
}
