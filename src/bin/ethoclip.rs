use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use ethoclip::{
    CancelToken, FfmpegSinkFactory, MultiStreamCapture, ObservationData, PoseTrajectory,
    ProgressSink, RenderOutcome, RenderSettings, SettingsStore, SnippetRequest, TrajectoryMap,
    VideoSnippet,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ethoclip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a snippet into the output directory (requires `ffmpeg` on PATH).
    Cut(SnippetArgs),
    /// Print the cache path a snippet renders to, without rendering.
    Path(SnippetArgs),
    /// Print stream properties of the concatenated video files.
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
struct SnippetArgs {
    /// Video file; repeat to concatenate files in order.
    #[arg(long = "video", required = true)]
    videos: Vec<PathBuf>,

    /// First frame of the requested window.
    #[arg(long)]
    start: u64,

    /// Last frame of the requested window.
    #[arg(long)]
    stop: u64,

    /// Render settings JSON; missing fields take their defaults.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Trajectories JSON: an object mapping individual ids to pose trajectories.
    #[arg(long)]
    trajectories: Option<PathBuf>,

    /// Observations JSON: `{"observations": [...], "highlight": [...]}`.
    #[arg(long)]
    observations: Option<PathBuf>,

    /// Directory snippets are cached in.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the label font origin and the SHA-256 of its bytes.
    #[arg(long)]
    dump_font: bool,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Video file; repeat to concatenate files in order.
    #[arg(long = "video", required = true)]
    videos: Vec<PathBuf>,
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
        Command::Cut(args) => cmd_cut(args),
        Command::Path(args) => cmd_path(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn build_request(args: &SnippetArgs) -> anyhow::Result<SnippetRequest> {
    let settings: RenderSettings = match &args.settings {
        Some(path) => read_json(path, "render settings")?,
        None => RenderSettings::default(),
    };
    let mut store = SettingsStore::new(settings);
    let snapshot = store.commit()?;

    let mut trajectories = TrajectoryMap::new();
    if let Some(path) = &args.trajectories {
        let loaded: std::collections::BTreeMap<String, PoseTrajectory> =
            read_json(path, "trajectories")?;
        for (id, trajectory) in loaded {
            trajectories.insert(id, Arc::new(trajectory));
        }
    }
    let observations: ObservationData = match &args.observations {
        Some(path) => read_json(path, "observations")?,
        None => ObservationData::default(),
    };

    Ok(SnippetRequest::new(args.videos.clone(), args.start, args.stop)
        .with_settings(snapshot)
        .with_trajectories(trajectories)
        .with_observations(observations)
        .with_output_dir(&args.out_dir))
}

fn dump_font(settings: &RenderSettings) -> anyhow::Result<()> {
    match ethoclip::overlay::LabelFont::resolve(settings.label_font.as_deref())? {
        Some(font) => {
            let digest = ethoclip::snippet::cache::sha256_hex(font.bytes());
            eprintln!("label font: {} sha256={digest}", font.origin());
        }
        None => eprintln!("label font: none (labels are skipped)"),
    }
    Ok(())
}

fn cmd_cut(args: SnippetArgs) -> anyhow::Result<()> {
    let request = build_request(&args)?;
    if args.dump_font {
        dump_font(&request.settings)?;
    }
    let mut snippet = VideoSnippet::open(request)?;
    let out = snippet.output_path()?;

    let last_decile = std::sync::atomic::AtomicU64::new(0);
    let progress = move |pct: f64| {
        let decile = (pct / 10.0).floor() as u64;
        if decile > last_decile.swap(decile, std::sync::atomic::Ordering::Relaxed) {
            tracing::info!(progress = pct.round(), "rendering");
        }
    };
    let outcome = snippet.cut(
        &FfmpegSinkFactory::default(),
        Some(&progress as &dyn ProgressSink),
        &CancelToken::new(),
    );
    match outcome {
        RenderOutcome::Completed | RenderOutcome::Cached => {
            println!("{}", out.display());
            Ok(())
        }
        RenderOutcome::Cancelled => anyhow::bail!("render cancelled"),
        RenderOutcome::Failed(reason) => anyhow::bail!("render failed: {reason}"),
    }
}

fn cmd_path(args: SnippetArgs) -> anyhow::Result<()> {
    let request = build_request(&args)?;
    let snippet = VideoSnippet::open(request)?;
    let plan = snippet.plan()?;
    let out = snippet.request().output_path(&plan)?;
    eprintln!(
        "frames {}..{} roi {:?} -> {}",
        plan.interval.start,
        plan.interval.stop,
        plan.roi,
        snippet.render_size(&plan)
    );
    println!("{}", out.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let capture = MultiStreamCapture::open(&args.videos)?;
    for (path, frames) in capture.paths().iter().zip(capture.frames()) {
        println!("{}: {frames} frames", path.display());
    }
    println!(
        "{}x{} @ {} fps, {} frames total",
        capture.width(),
        capture.height(),
        capture.fps(),
        capture.total_frames()
    );
    Ok(())
}
