use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8, 1, 2, 3, 255];
    let img = image::RgbaImage::from_raw(2, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = load_image_source(&buf).unwrap();
    assert_eq!((decoded.width, decoded.height), (2, 1));
    assert_eq!(decoded.rgba8.as_slice(), src_rgba.as_slice());
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = load_image_source(b"definitely not an image").unwrap_err();
    assert!(matches!(err, SinusError::Decode(_)));
}

#[test]
fn missing_file_is_reported() {
    let err = load_image_file(Path::new("/nonexistent/sinus/image.png")).unwrap_err();
    assert!(err.to_string().contains("image.png"));
}
