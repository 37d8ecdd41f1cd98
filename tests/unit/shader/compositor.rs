use super::*;
use crate::foundation::core::Rgb;
use crate::shader::color::{heat_map, rotate_hue};

fn uniforms(width: u32, height: u32, params: ParameterSet) -> FrameUniforms {
    FrameUniforms::from_params(&params, 0.0, width, height, 1.0, false)
}

fn neutral() -> ParameterSet {
    ParameterSet {
        num_curves: 1,
        spacing: 1.0,
        amplitude: 0.0,
        motion_blur: 0.0,
        grain: 0.0,
        ..ParameterSet::default()
    }
}

fn solid(width: u32, height: u32, px: [u8; 4]) -> SourceSurface {
    let data = px.repeat((width * height) as usize);
    SourceSurface::from_rgba8(width, height, data).unwrap()
}

#[test]
fn white_source_takes_the_text_tint() {
    let params = ParameterSet {
        text_color: Rgb::new(1.0, 0.0, 0.0),
        ..neutral()
    };
    let mut c = DeformCompositor::new();
    let frame = c.composite(&solid(4, 4, [255; 4]), &uniforms(4, 4, params));
    assert_eq!((frame.width, frame.height), (4, 4));
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, [255, 0, 0, 255]);
    }
}

#[test]
fn empty_source_shows_the_background() {
    let params = ParameterSet {
        background_color: Rgb::new(0.2, 0.4, 0.6),
        ..neutral()
    };
    let mut c = DeformCompositor::new();
    let frame = c.composite(&solid(3, 2, [0; 4]), &uniforms(3, 2, params));
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, [51, 102, 153, 255]);
    }
}

#[test]
fn preserved_image_colors_pass_through() {
    let mut c = DeformCompositor::new();
    let u = FrameUniforms::from_params(&neutral(), 0.0, 2, 2, 1.0, true);
    let frame = c.composite(&solid(2, 2, [10, 200, 40, 255]), &u);
    assert_eq!(frame.pixel(1, 1), Some([10, 200, 40, 255]));
}

#[test]
fn output_rows_follow_source_rows() {
    // Top half white, bottom half black.
    let mut data = [255u8; 4].repeat(8);
    data.extend([0, 0, 0, 255].repeat(8));
    let source = SourceSurface::from_rgba8(4, 4, data).unwrap();
    let mut c = DeformCompositor::new();
    let frame = c.composite(&source, &uniforms(4, 4, neutral()));
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(3, 1), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(0, 2), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(3, 3), Some([0, 0, 0, 255]));
}

#[test]
fn motion_blur_below_threshold_reads_one_texel() {
    // Left half black, right half white.
    let row = [[0, 0, 0, 255].repeat(4), [255u8; 4].repeat(4)].concat();
    let source = SourceSurface::from_rgba8(8, 8, row.repeat(8)).unwrap();
    let mut c = DeformCompositor::new();

    let sharp = ParameterSet {
        motion_blur: 0.01,
        heat_map_enabled: false,
        ..neutral()
    };
    let px = c.composite(&source, &uniforms(8, 8, sharp)).pixel(4, 4);
    assert_eq!(px, Some([255, 255, 255, 255]));

    let blurred = ParameterSet {
        motion_blur: 8.0,
        heat_map_enabled: false,
        ..neutral()
    };
    let px = c.composite(&source, &uniforms(8, 8, blurred)).pixel(4, 4).unwrap();
    assert!(px[0] < 255 && px[0] > 0, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn rejected_pixels_show_the_heat_gradient_while_blurring() {
    let params = ParameterSet {
        num_curves: 10,
        spacing: 0.1,
        motion_blur: 1.0,
        heat_map_enabled: true,
        hue: 40.0,
        ..neutral()
    };
    let mut c = DeformCompositor::new();
    let frame = c.composite(&solid(4, 100, [255; 4]), &uniforms(4, 100, params.clone()));
    let uv_y = 1.0 - 99.5 / 100.0;
    let expected = rotate_hue(heat_map(uv_y), 40.0);
    let px = frame.pixel(0, 0).unwrap();
    for ch in 0..3 {
        assert_eq!(px[ch], unorm8(expected[ch]));
    }

    let no_blur = ParameterSet {
        motion_blur: 0.0,
        background_color: Rgb::new(0.0, 0.0, 1.0),
        ..params
    };
    let frame = c.composite(&solid(4, 100, [255; 4]), &uniforms(4, 100, no_blur));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 255, 255]));
}

#[test]
fn grain_perturbs_but_stays_opaque() {
    let params = ParameterSet {
        grain: 100.0,
        text_color: Rgb::new(0.5, 0.5, 0.5),
        ..neutral()
    };
    let mut c = DeformCompositor::new();
    let frame = c.composite(&solid(16, 16, [255; 4]), &uniforms(16, 16, params));
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    assert!(frame.data.chunks_exact(4).any(|px| px[0] != 128));
}

#[test]
fn release_drops_the_frame() {
    let mut c = DeformCompositor::new();
    c.composite(&solid(2, 2, [255; 4]), &uniforms(2, 2, neutral()));
    assert_eq!(c.frame().data.len(), 16);
    c.release();
    assert!(c.frame().data.is_empty());
}

#[test]
fn export_scale_multiplies_pixel_parameters() {
    let params = ParameterSet {
        amplitude: 10.0,
        vertical_offset: -3.0,
        ..ParameterSet::default()
    };
    let u = FrameUniforms::from_params(&params, 1.5, 100, 50, 4.0, false);
    assert_eq!(u.amplitude, 40.0);
    assert_eq!(u.vertical_offset, -12.0);
    assert_eq!(u.time, 1.5);
    assert_eq!(u.num_curves, 5.0);
}
