use super::*;
use crate::foundation::core::Canvas;

fn request() -> AnimationRequest {
    AnimationRequest::resolve(Some(0.5), Some(4), ExportLimits::VIDEO).unwrap()
}

#[test]
fn missing_toolchain_is_a_precondition_failure() {
    let toolchain = EncoderToolchain::new("sinus-test-no-such-ffmpeg-binary");
    let exporter = VideoExporter {
        request: request(),
        quality_factor: 1.0,
        toolchain: &toolchain,
    };
    let mut scene = Scene::default();
    scene.canvas = Canvas::new(16, 16).unwrap();
    let err = exporter
        .export(&scene, |_| panic!("no progress expected"))
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(!toolchain.is_ready());
}

#[test]
fn over_budget_requests_are_rejected_first() {
    let mut r = request();
    r.total_frames = crate::export::limits::MAX_VIDEO_FRAMES + 1;
    let err = VideoExporter::new(r)
        .export(&Scene::default(), |_| {})
        .unwrap_err();
    assert!(err.is_precondition());
}
