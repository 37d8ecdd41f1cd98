use super::*;
use crate::foundation::core::Canvas;
use crate::text::shaper::BlockShaper;

fn small_scene() -> Scene {
    let mut scene = Scene::default();
    scene.canvas = Canvas::new(64, 32).unwrap();
    scene.text.font_size = 12.0;
    scene
}

#[test]
fn surface_is_redrawn_at_most_every_16ms() {
    let mut scene = small_scene();
    let mut live = LiveRenderLoop::with_shaper(&scene, Box::new(BlockShaper)).unwrap();

    live.tick(&mut scene, Some(0.0)).unwrap();
    assert_eq!(live.raster_count(), 1);
    live.tick(&mut scene, Some(10.0)).unwrap();
    assert_eq!(live.raster_count(), 1);
    live.tick(&mut scene, Some(16.0)).unwrap();
    assert_eq!(live.raster_count(), 2);
    live.tick(&mut scene, Some(20.0)).unwrap();
    assert_eq!(live.raster_count(), 2);
    live.tick(&mut scene, None).unwrap();
    assert_eq!(live.raster_count(), 2);
    live.tick(&mut scene, Some(40.0)).unwrap();
    assert_eq!(live.raster_count(), 3);
}

#[test]
fn clock_advances_by_wall_time_or_fallback() {
    let mut scene = small_scene();
    let mut live = LiveRenderLoop::with_shaper(&scene, Box::new(BlockShaper)).unwrap();
    live.tick(&mut scene, None).unwrap();
    assert!((scene.params.time - 0.016).abs() < 1e-12);
    live.tick(&mut scene, Some(100.0)).unwrap();
    assert!((scene.params.time - 0.032).abs() < 1e-12);
    live.tick(&mut scene, Some(350.0)).unwrap();
    assert!((scene.params.time - 0.282).abs() < 1e-12);
    assert_eq!(live.raster_count(), 3);
}

#[test]
fn frames_are_opaque_and_canvas_sized() {
    let mut scene = small_scene();
    let mut live = LiveRenderLoop::with_shaper(&scene, Box::new(BlockShaper)).unwrap();
    let frame = live.tick(&mut scene, Some(0.0)).unwrap();
    assert_eq!((frame.width, frame.height), (64, 32));
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn canvas_change_relayouts_and_resizes() {
    let mut scene = small_scene();
    let mut live = LiveRenderLoop::with_shaper(&scene, Box::new(BlockShaper)).unwrap();
    live.tick(&mut scene, Some(0.0)).unwrap();
    live.tick(&mut scene, Some(20.0)).unwrap();
    assert_eq!(live.layout_recomputes(), 1);

    scene.canvas = Canvas::new(80, 40).unwrap();
    let frame = live.tick(&mut scene, Some(21.0)).unwrap();
    assert_eq!((frame.width, frame.height), (80, 40));
    assert_eq!(live.layout_recomputes(), 2);
    assert_eq!(live.raster_count(), 3);
}

#[test]
fn run_stops_when_the_presenter_breaks() {
    let mut scene = small_scene();
    let mut live = LiveRenderLoop::with_shaper(&scene, Box::new(BlockShaper)).unwrap();
    let mut presented = 0;
    live.run(&mut scene, 500.0, |_, frame| {
        assert_eq!(frame.width, 64);
        presented += 1;
        if presented == 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .unwrap();
    assert_eq!(presented, 3);
    assert!(scene.params.time > 0.0);
    assert!(live.run(&mut scene, 0.0, |_, _| ControlFlow::Break(())).is_err());
}
