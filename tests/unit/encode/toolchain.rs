use super::*;

const LISTING: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 S..... = Subtitle
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (codec h264)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 V..... png                  PNG (Portable Network Graphics) image
 A....D aac                  AAC (Advanced Audio Coding)
";

#[test]
fn listing_legend_is_skipped_and_audio_dropped() {
    let list = EncoderList::parse(LISTING);
    assert_eq!(list.len(), 3);
    assert!(list.supports("libx264"));
    assert!(list.supports("libvpx-vp9"));
    assert!(!list.supports("aac"));
    // Legend rows look like video entries but sit above the separator.
    assert!(!list.supports("="));
    assert!(list.supports_any("vp9"));
    assert!(!list.supports_any("vp8"));
}

#[test]
fn missing_program_fails_and_is_retried() {
    let tc = EncoderToolchain::new("sinus-test-no-such-ffmpeg-binary");
    let err = tc.ensure().unwrap_err();
    assert!(err.is_precondition());
    assert!(!tc.is_ready());
    assert!(tc.ensure().is_err());
    assert!(!tc.is_ready());
}

#[test]
fn empty_listing_yields_no_encoders() {
    assert!(EncoderList::parse("").is_empty());
    assert!(EncoderList::parse("Encoders:\n ------\n").is_empty());
}
