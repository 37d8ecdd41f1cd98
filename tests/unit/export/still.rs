use super::*;
use crate::foundation::core::Canvas;

#[test]
fn still_is_a_png_at_export_resolution() {
    let mut scene = Scene::default();
    scene.canvas = Canvas::new(30, 20).unwrap();
    scene.text.font_size = 6.0;
    let artifact = StillExporter {
        quality_factor: 2.0,
    }
    .export(&scene)
    .unwrap();
    assert!(artifact.file_name.ends_with(".png"));
    assert_eq!(artifact.mime, "image/png");
    let decoded = image::load_from_memory(&artifact.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (60, 40));
}

#[test]
fn invalid_scenes_fail_before_rendering() {
    let mut scene = Scene::default();
    scene.params.num_curves = 0;
    let err = StillExporter::default().export(&scene).unwrap_err();
    assert!(err.is_precondition());
}
