use super::*;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts")
}

#[test]
fn family_names_match_file_stems_loosely() {
    let lib = FontLibrary::new([fixture_dir()]);
    let found = lib.candidates("DejaVu Sans Mono");
    assert_eq!(found.len(), 1);
    assert!(found[0].ends_with("DejaVuSansMono-Bold.ttf"));
    assert_eq!(lib.candidates("dejavu sans"), found);
}

#[test]
fn unknown_families_and_missing_dirs_find_nothing() {
    let lib = FontLibrary::new([fixture_dir(), PathBuf::from("/nonexistent/fonts")]);
    assert!(lib.candidates("Arial").is_empty());
    assert!(lib.candidates("  ").is_empty());
    assert!(FontLibrary::default().candidates("DejaVu Sans Mono").is_empty());
}
