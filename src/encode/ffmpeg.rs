use std::ffi::OsString;
use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::encode::toolchain::EncoderList;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SinusError, SinusResult};
use crate::render::frame::FrameRGBA;

/// Output container of a video export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Mp4,
    Webm,
}

impl Container {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }

    fn muxer(self) -> &'static str {
        self.extension()
    }
}

/// One entry of the codec preference list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoCodec {
    pub container: Container,
    /// `ffmpeg` encoder name; `None` lets the muxer pick its default.
    pub encoder: Option<&'static str>,
    /// MIME type of the produced clip.
    pub mime: &'static str,
}

impl VideoCodec {
    /// Whether `encoders` can produce this format.
    ///
    /// The muxer-default WebM entry needs some VP8 or VP9 encoder to be present.
    pub fn is_supported(&self, encoders: &EncoderList) -> bool {
        match self.encoder {
            Some(name) => encoders.supports(name),
            None => encoders.supports_any("vp9") || encoders.supports_any("vp8"),
        }
    }
}

/// Formats tried in order; the first one the toolchain supports wins.
pub const VIDEO_CODEC_PREFERENCES: [VideoCodec; 4] = [
    VideoCodec {
        container: Container::Mp4,
        encoder: Some("libx264"),
        mime: "video/mp4;codecs=h264",
    },
    VideoCodec {
        container: Container::Webm,
        encoder: Some("libvpx-vp9"),
        mime: "video/webm;codecs=vp9",
    },
    VideoCodec {
        container: Container::Webm,
        encoder: Some("libvpx"),
        mime: "video/webm;codecs=vp8",
    },
    VideoCodec {
        container: Container::Webm,
        encoder: None,
        mime: "video/webm",
    },
];

/// First entry of [`VIDEO_CODEC_PREFERENCES`] available in `encoders`.
pub fn negotiate_codec(encoders: &EncoderList) -> SinusResult<VideoCodec> {
    VIDEO_CODEC_PREFERENCES
        .iter()
        .copied()
        .find(|c| c.is_supported(encoders))
        .ok_or_else(|| {
            SinusError::validation("no supported video format (MP4/H.264 or WebM/VP9/VP8) available")
        })
}

/// Target bitrate in bits per second: `w * h * fps * 0.6`, clamped to `6..=25` Mbit/s.
pub fn video_bitrate(width: u32, height: u32, fps: u32) -> u64 {
    let raw = f64::from(width) * f64::from(height) * f64::from(fps) * 0.6;
    raw.clamp(6_000_000.0, 25_000_000.0).round() as u64
}

/// Options for [`VideoSink`].
#[derive(Clone, Debug)]
pub struct VideoSinkOpts {
    /// `ffmpeg` program name or path.
    pub program: OsString,
    pub codec: VideoCodec,
    /// Bits per second.
    pub bitrate: u64,
}

/// Sink that spawns `ffmpeg`, streams raw RGBA frames to stdin and collects the encoded
/// container from stdout.
pub struct VideoSink {
    opts: VideoSinkOpts,
    order: FrameOrder,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_reader: Option<JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    output: Option<Vec<u8>>,
}

impl VideoSink {
    pub fn new(opts: VideoSinkOpts) -> Self {
        Self {
            opts,
            order: FrameOrder::default(),
            child: None,
            stdin: None,
            stdout_reader: None,
            stderr_drain: None,
            output: None,
        }
    }

    /// The assembled clip after a successful `end`.
    pub fn take_output(&mut self) -> Option<Vec<u8>> {
        self.output.take()
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
        ]);
        if let Some(encoder) = self.opts.codec.encoder {
            cmd.args(["-c:v", encoder]);
        }
        // yuv420p needs even dimensions.
        cmd.args([
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            &self.opts.bitrate.to_string(),
        ]);
        if self.opts.codec.container == Container::Mp4 {
            // Seekable output is unavailable on a pipe.
            cmd.args(["-movflags", "frag_keyframe+empty_moov"]);
        }
        cmd.args(["-f", self.opts.codec.container.muxer(), "pipe:1"]);
        cmd
    }
}

impl FrameSink for VideoSink {
    fn begin(&mut self, cfg: SinkConfig) -> SinusResult<()> {
        cfg.validate("video sink")?;

        let mut child = self.command(&cfg).spawn().map_err(|e| {
            SinusError::validation(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SinusError::export("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| SinusError::export("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SinusError::export("failed to open ffmpeg stderr (unexpected)"))?;

        let stdout_reader = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = vec![0u8; 64 * 1024];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                chunks.push(buf[..n].to_vec());
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.order.start(cfg);
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.output = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SinusResult<()> {
        self.order.admit("video sink", idx, frame)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SinusError::export("video sink is already finalized"));
        };
        stdin.write_all(&frame.data).map_err(|e| {
            SinusError::export(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> SinusResult<()> {
        self.order.finish("video sink")?;
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SinusError::export("video sink not started"))?;

        let status = child.wait().map_err(|e| {
            SinusError::export(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let chunks = join_reader(self.stdout_reader.take(), "stdout")?;
        let stderr_bytes = join_reader(self.stderr_drain.take(), "stderr")?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SinusError::export(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let clip = chunks.concat();
        if clip.is_empty() {
            return Err(SinusError::export("the encoded video stream is empty"));
        }
        tracing::debug!(bytes = clip.len(), "video stream collected");
        self.output = Some(clip);
        Ok(())
    }
}

impl Drop for VideoSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn join_reader<T: Default>(
    handle: Option<JoinHandle<std::io::Result<T>>>,
    stream: &str,
) -> SinusResult<T> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| SinusError::export(format!("ffmpeg {stream} reader thread panicked")))?
            .map_err(|e| SinusError::export(format!("ffmpeg {stream} read failed: {e}"))),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
