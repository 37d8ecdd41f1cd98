use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sinus", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a supersampled PNG at the scene's current time.
    Still(StillArgs),
    /// Export a looping GIF.
    Gif(AnimArgs),
    /// Export an MP4/WebM clip (requires `ffmpeg` on PATH).
    Video(AnimArgs),
    /// Run the live loop for a while and save its last frame.
    Preview(PreviewArgs),
    /// Print the default scene as JSON.
    Defaults,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene JSON; every field is optional.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Text entries, one per flag (replaces the scene's entries).
    #[arg(long = "text")]
    texts: Vec<String>,

    /// Font file used to shape the text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Image shown instead of the text.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Canvas width override.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height override.
    #[arg(long)]
    height: Option<u32>,

    /// Clock value override in seconds.
    #[arg(long)]
    time: Option<f64>,
}

#[derive(Parser, Debug)]
struct StillArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Supersampling factor.
    #[arg(long, default_value_t = sinus::STILL_QUALITY_FACTOR)]
    quality: f32,
}

#[derive(Parser, Debug)]
struct AnimArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Duration in seconds (clamped to the export limits).
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second (clamped to 1..=240).
    #[arg(long)]
    fps: Option<u32>,

    /// Supersampling factor; defaults to 3 for GIF and 3.5 for video.
    #[arg(long)]
    quality: Option<f32>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// How long to run the live loop.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Target tick rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Gif(args) => cmd_gif(args),
        Command::Video(args) => cmd_video(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Defaults => {
            println!("{}", sinus::Scene::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<sinus::Scene> {
    let mut scene = match &args.scene {
        Some(path) => sinus::Scene::from_path(path)
            .with_context(|| format!("load scene '{}'", path.display()))?,
        None => sinus::Scene::default(),
    };
    if !args.texts.is_empty() {
        scene.text.entries = args.texts.clone();
    }
    if let Some(font) = &args.font {
        scene.text.font_file = Some(font.clone());
    }
    if let Some(image) = &args.image {
        // A bad image keeps the scene in text mode.
        if let Err(e) = scene.load_image(image) {
            tracing::warn!(path = %image.display(), error = %e, "image not loaded");
        }
    }
    let canvas = scene.canvas;
    scene.canvas = sinus::Canvas::new(
        args.width.unwrap_or(canvas.width),
        args.height.unwrap_or(canvas.height),
    )?;
    if let Some(time) = args.time {
        scene.params.time = time;
    }
    scene.validate()?;
    Ok(scene)
}

fn report(written: &Path) {
    eprintln!("wrote {}", written.display());
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let artifact = sinus::StillExporter {
        quality_factor: args.quality,
    }
    .export(&scene)?;
    report(&artifact.write_to(&args.out_dir)?);
    Ok(())
}

fn cmd_gif(args: AnimArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let request =
        sinus::AnimationRequest::resolve(args.duration, args.fps, sinus::ExportLimits::GIF)?;
    let mut exporter = sinus::GifExporter::new(request);
    if let Some(q) = args.quality {
        exporter.quality_factor = q;
    }
    let artifact = exporter.export(&scene, log_phase)?;
    report(&artifact.write_to(&args.out_dir)?);
    Ok(())
}

fn cmd_video(args: AnimArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let request =
        sinus::AnimationRequest::resolve(args.duration, args.fps, sinus::ExportLimits::VIDEO)?;
    let mut exporter = sinus::VideoExporter::new(request);
    if let Some(q) = args.quality {
        exporter.quality_factor = q;
    }
    let artifact = exporter.export(&scene, log_phase)?;
    report(&artifact.write_to(&args.out_dir)?);
    Ok(())
}

fn log_phase(phase: sinus::ExportPhase) {
    match phase {
        sinus::ExportPhase::Preparing { frame, total, .. } if frame != total && frame % 30 != 0 => {}
        phase => tracing::info!("{phase}"),
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.scene)?;
    let mut live = sinus::LiveRenderLoop::new(&scene)?;
    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds.max(0.0));
    let mut ticks = 0u64;
    live.run(&mut scene, args.fps, |_, _| {
        ticks += 1;
        if Instant::now() >= deadline {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    tracing::info!(
        ticks,
        rasters = live.raster_count(),
        time = scene.params.time,
        "preview finished"
    );

    let png = live.frame().encode_png()?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    report(&args.out);
    Ok(())
}
