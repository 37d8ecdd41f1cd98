use super::*;
use crate::scene::content::ImageSource;
use crate::text::shaper::BlockShaper;

fn scene() -> Scene {
    let mut s = Scene::default();
    s.canvas = Canvas::new(40, 24).unwrap();
    s.text.font_size = 8.0;
    s.params.num_curves = 3;
    s
}

#[test]
fn export_size_is_scaled_and_rounded() {
    let e = FrameExporter::new(Canvas::new(960, 540).unwrap(), 3.5).unwrap();
    assert_eq!((e.width(), e.height()), (3360, 1890));
    let e = FrameExporter::new(Canvas::new(3, 3).unwrap(), 0.1).unwrap();
    assert_eq!((e.width(), e.height()), (1, 1));
}

#[test]
fn same_time_renders_identical_bytes() {
    let scene = scene();
    let mut e = FrameExporter::new(scene.canvas, 2.0).unwrap();
    let cache = e.create_render_cache_with(&scene, &mut BlockShaper).unwrap();
    let a = e.render_frame(&scene, 1.25, &cache).unwrap().clone();
    e.render_frame(&scene, 3.0, &cache).unwrap();
    let b = e.render_frame(&scene, 1.25, &cache).unwrap().clone();
    assert_eq!((a.width, a.height), (80, 48));
    assert_eq!(a, b);
}

#[test]
fn rendering_leaves_the_scene_untouched() {
    let scene = scene();
    let before = scene.clone();
    let mut e = FrameExporter::new(scene.canvas, 1.0).unwrap();
    let cache = e.create_render_cache(&scene).unwrap();
    e.render_frame(&scene, 7.0, &cache).unwrap();
    assert_eq!(scene.params, before.params);
    assert_eq!(scene.text, before.text);
}

#[test]
fn image_scenes_use_the_image_cache() {
    let mut scene = scene();
    scene.image = Some(ImageSource::new(1, 1, vec![255, 0, 0, 255]).unwrap());
    scene.params.preserve_image_color = true;
    scene.params.amplitude = 0.0;
    scene.params.num_curves = 1;
    scene.params.spacing = 1.0;
    let mut e = FrameExporter::new(scene.canvas, 1.0).unwrap();
    let cache = e.create_render_cache(&scene).unwrap();
    assert!(matches!(cache, RenderCache::Image));
    let frame = e.render_frame(&scene, 0.0, &cache).unwrap();
    assert_eq!(frame.pixel(20, 12), Some([255, 0, 0, 255]));

    scene.image = None;
    assert!(e.render_frame(&scene, 0.0, &cache).is_err());
}

#[test]
fn disposed_exporters_refuse_to_render() {
    let scene = scene();
    let mut e = FrameExporter::new(scene.canvas, 1.0).unwrap();
    let cache = e.create_render_cache(&scene).unwrap();
    e.dispose();
    assert!(e.is_disposed());
    assert!(matches!(
        e.render_frame(&scene, 0.0, &cache),
        Err(SinusError::Init(_))
    ));
    assert_eq!(e.width(), 40);
}
