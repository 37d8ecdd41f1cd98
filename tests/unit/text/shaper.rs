use super::*;

#[test]
fn block_shaper_advances_per_character() {
    let line = BlockShaper.shape("AB", 100.0).unwrap();
    assert!((line.width - 120.0).abs() < 1e-4);
    assert_eq!(line.height, 100.0);
    let LinePaint::Blocks(rects) = &line.paint else {
        panic!("block shaper must emit blocks");
    };
    assert_eq!(rects.len(), 2);
    assert!((rects[0].x0 - 10.0).abs() < 1e-4);
    assert!((rects[0].x1 - 50.0).abs() < 1e-4);
    assert!((rects[0].y0 - 15.0).abs() < 1e-4);
    assert!((rects[0].y1 - 85.0).abs() < 1e-4);
    assert!((rects[1].x0 - 70.0).abs() < 1e-4);
}

#[test]
fn whitespace_advances_without_ink() {
    let line = BlockShaper.shape(" ", 10.0).unwrap();
    assert!((line.width - 6.0).abs() < 1e-5);
    let LinePaint::Blocks(rects) = &line.paint else {
        panic!("block shaper must emit blocks");
    };
    assert!(rects.is_empty());

    assert_eq!(BlockShaper.shape("", 10.0).unwrap().width, 0.0);
}

#[test]
fn invalid_font_sizes_are_rejected() {
    assert!(BlockShaper.shape("A", 0.0).is_err());
    assert!(BlockShaper.shape("A", f32::NAN).is_err());
}

fn fixture_fonts() -> FontLibrary {
    FontLibrary::new([std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts")])
}

fn mono_text() -> TextContent {
    TextContent {
        font_family: "DejaVu Sans Mono".into(),
        ..TextContent::default()
    }
}

#[test]
fn unknown_families_fall_back_to_blocks() {
    let shaper = shaper_from_library(&TextContent::default(), &FontLibrary::default()).unwrap();
    assert_eq!(shaper.font_key(), 0);
    let shaper = shaper_from_library(&TextContent::default(), &fixture_fonts()).unwrap();
    assert_eq!(shaper.font_key(), 0);

    let missing = TextContent {
        font_file: Some("/nonexistent/font.ttf".into()),
        ..TextContent::default()
    };
    assert!(shaper_from_library(&missing, &fixture_fonts()).is_err());
}

#[test]
fn font_family_resolves_to_installed_glyphs() {
    let mut shaper = shaper_from_library(&mono_text(), &fixture_fonts()).unwrap();
    assert_ne!(shaper.font_key(), 0);

    let one = shaper.shape("H", 20.0).unwrap();
    let two = shaper.shape("HH", 20.0).unwrap();
    assert!(one.width > 5.0 && one.width < 20.0, "{}", one.width);
    assert!((two.width - 2.0 * one.width).abs() < 0.01);
    assert!(one.height > 20.0 && one.height < 30.0, "{}", one.height);
    let LinePaint::Glyphs(runs) = &two.paint else {
        panic!("font shaper must emit glyphs");
    };
    assert_eq!(runs.iter().map(|r| r.glyphs.len()).sum::<usize>(), 2);
    assert!(runs.iter().all(|r| r.font_size == 20.0));
}

#[test]
fn family_lookup_matches_the_font_file() {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fonts/DejaVuSansMono-Bold.ttf");
    let mut by_file = ParleyShaper::new(std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(by_file.family_name(), "DejaVu Sans Mono");
    let mut by_family = ParleyShaper::from_family("dejavu sans mono", &fixture_fonts())
        .unwrap()
        .unwrap();
    assert_eq!(by_family.family_name(), "DejaVu Sans Mono");
    assert_eq!(by_file.font_key(), by_family.font_key());
    let a = by_file.shape("Sinus", 32.0).unwrap();
    let b = by_family.shape("Sinus", 32.0).unwrap();
    assert_eq!(a.width, b.width);

    assert!(ParleyShaper::from_family("Arial", &fixture_fonts()).unwrap().is_none());
}

#[test]
fn parley_shaper_rejects_non_font_bytes() {
    assert!(ParleyShaper::new(b"not a font".to_vec()).is_err());
}
