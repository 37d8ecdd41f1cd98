use super::*;
use crate::encode::toolchain::EncoderToolchain;

#[test]
fn codec_negotiation_follows_preference_order() {
    let all = EncoderList::from_names(["libx264", "libvpx-vp9", "libvpx"]);
    assert_eq!(negotiate_codec(&all).unwrap(), VIDEO_CODEC_PREFERENCES[0]);

    let vpx = EncoderList::from_names(["libvpx", "libvpx-vp9"]);
    let c = negotiate_codec(&vpx).unwrap();
    assert_eq!(c.encoder, Some("libvpx-vp9"));
    assert_eq!(c.container.extension(), "webm");

    let vp8 = EncoderList::from_names(["libvpx"]);
    assert_eq!(negotiate_codec(&vp8).unwrap().mime, "video/webm;codecs=vp8");

    let hw = EncoderList::from_names(["vp9_vaapi"]);
    assert_eq!(negotiate_codec(&hw).unwrap().encoder, None);

    let none = EncoderList::from_names(["png", "mjpeg"]);
    assert!(negotiate_codec(&none).unwrap_err().is_precondition());
}

#[test]
fn bitrate_is_clamped() {
    assert_eq!(video_bitrate(100, 100, 30), 6_000_000);
    assert_eq!(video_bitrate(3360, 1890, 90), 25_000_000);
    assert_eq!(video_bitrate(1000, 1000, 12), 7_200_000);
}

#[test]
fn command_streams_to_stdout() {
    let sink = VideoSink::new(VideoSinkOpts {
        program: "ffmpeg".into(),
        codec: VIDEO_CODEC_PREFERENCES[0],
        bitrate: 6_000_000,
    });
    let cmd = sink.command(&SinkConfig {
        width: 33,
        height: 20,
        fps: 24,
    });
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let has = |pair: [&str; 2]| args.windows(2).any(|w| w[0] == pair[0] && w[1] == pair[1]);
    assert!(has(["-s", "33x20"]));
    assert!(has(["-r", "24"]));
    assert!(has(["-c:v", "libx264"]));
    assert!(has(["-b:v", "6000000"]));
    assert!(has(["-movflags", "frag_keyframe+empty_moov"]));
    assert!(has(["-f", "mp4"]));
    assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
}

#[test]
fn missing_program_fails_before_any_frame() {
    let mut sink = VideoSink::new(VideoSinkOpts {
        program: "sinus-test-no-such-ffmpeg-binary".into(),
        codec: VIDEO_CODEC_PREFERENCES[3],
        bitrate: 6_000_000,
    });
    let err = sink
        .begin(SinkConfig {
            width: 2,
            height: 2,
            fps: 1,
        })
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(sink.push_frame(FrameIndex(0), &FrameRGBA::new(2, 2)).is_err());
}

#[test]
fn clip_is_assembled_from_the_encoder_output() {
    let toolchain = EncoderToolchain::new("ffmpeg");
    let Ok(encoders) = toolchain.ensure() else {
        return;
    };
    let Ok(codec) = negotiate_codec(&encoders) else {
        return;
    };

    let cfg = SinkConfig {
        width: 33,
        height: 20,
        fps: 10,
    };
    let mut sink = VideoSink::new(VideoSinkOpts {
        program: "ffmpeg".into(),
        codec,
        bitrate: video_bitrate(cfg.width, cfg.height, cfg.fps),
    });
    sink.begin(cfg).unwrap();
    let mut frame = FrameRGBA::new(cfg.width, cfg.height);
    for i in 0..5u8 {
        for px in frame.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[i * 50, 255 - i * 50, 128, 255]);
        }
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    sink.end().unwrap();

    let clip = sink.take_output().unwrap();
    assert!(clip.len() > 100, "clip is {} bytes", clip.len());
    match codec.container {
        Container::Mp4 => assert_eq!(&clip[4..8], b"ftyp"),
        Container::Webm => assert_eq!(&clip[..4], &[0x1A, 0x45, 0xDF, 0xA3]),
    }
    assert!(sink.take_output().is_none());
}
