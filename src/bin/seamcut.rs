use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use seamcut::{
    Ease, FfmpegSink, FfmpegSinkOpts, FfmpegVideo, Fps, ImageRaster, LoggingConfig, Rgba8,
    SeamConfig, StrategyKind,
};

#[derive(Parser, Debug)]
#[command(name = "seamcut", version, about = "Contact-sheet decomposition and eased retiming")]
struct Cli {
    /// JSON config file; unset keys keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter such as `debug` or `seamcut=trace` (RUST_LOG wins when set).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a contact sheet into `frame-1.png … frame-N.png`.
    Grid(GridArgs),
    /// Retime one clip with an easing curve (requires `ffmpeg` on PATH).
    Retime(RetimeArgs),
    /// Retime several clips with the same curve and concatenate them.
    Concat(ConcatArgs),
    /// Print the global timestamp plan as JSON without touching any media.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Contact sheet image.
    image: PathBuf,
    /// Expected rows.
    rows: u32,
    /// Expected columns.
    cols: u32,
    /// Directory receiving the cell PNGs.
    out_dir: PathBuf,

    /// Detection strategy: auto, variance, projection or equal.
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Letterbox fill as `r,g,b` or `r,g,b,a`.
    #[arg(long)]
    fill: Option<Rgba8>,

    /// Also write `grid.json` with cell geometry and diagnostics.
    #[arg(long, default_value_t = false)]
    diagnostics: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Target video bitrate (e.g. `8M`).
    #[arg(long)]
    bitrate: Option<String>,

    /// Decoder threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames decoded per chunk.
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Decode frames one at a time.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Fail instead of overwriting an existing output.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct RetimeArgs {
    /// Source clip.
    source: PathBuf,
    /// Easing name or `cubic-bezier(a, b, c, d)`.
    easing: Ease,
    /// Output duration in seconds.
    duration: f64,
    /// Output frame rate (`30`, `30000/1001`, `29.97`).
    fps: Fps,

    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Args, Debug)]
struct ConcatArgs {
    /// Source clips, in output order.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Easing name or `cubic-bezier(a, b, c, d)`; config default when omitted.
    #[arg(long)]
    easing: Option<Ease>,

    /// Output duration of each segment in seconds.
    #[arg(long)]
    duration: f64,

    /// Output frame rate.
    #[arg(long)]
    fps: Fps,

    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Easing name or `cubic-bezier(a, b, c, d)`; config default when omitted.
    #[arg(long)]
    easing: Option<Ease>,

    /// Source duration of each segment in seconds (repeat per segment).
    #[arg(long = "source-duration", required = true)]
    source_durations: Vec<f64>,

    /// Output duration of each segment in seconds.
    #[arg(long)]
    duration: f64,

    /// Output frame rate.
    #[arg(long)]
    fps: Fps,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = match cli.config.as_deref() {
        Some(path) => SeamConfig::from_path(path)?,
        None => SeamConfig::default(),
    };
    if let Some(level) = cli.log_level {
        cfg.logging.level = level;
    }
    seamcut::init_logging(&LoggingConfig {
        ansi: cfg.logging.ansi && std::env::var_os("NO_COLOR").is_none(),
        ..cfg.logging.clone()
    });

    match cli.cmd {
        Command::Grid(args) => cmd_grid(args, cfg),
        Command::Retime(args) => {
            let sources = [args.source];
            cmd_encode(&sources, args.easing, args.duration, args.fps, args.encode, cfg)
        }
        Command::Concat(args) => {
            let easing = args.easing.unwrap_or(cfg.retime.easing);
            cmd_encode(
                &args.sources,
                easing,
                args.duration,
                args.fps,
                args.encode,
                cfg,
            )
        }
        Command::Plan(args) => cmd_plan(args, cfg),
    }
}

fn cmd_grid(args: GridArgs, cfg: SeamConfig) -> anyhow::Result<()> {
    let mut opts = cfg.grid;
    if let Some(strategy) = args.strategy {
        opts.strategy = strategy;
    }
    if let Some(fill) = args.fill {
        opts.fill = fill;
    }

    let out = seamcut::decompose_image(&ImageRaster, &args.image, args.rows, args.cols, &opts)
        .with_context(|| format!("decompose '{}'", args.image.display()))?;
    let paths = seamcut::write_cells(&out.cells, &args.out_dir)?;

    if args.diagnostics {
        let path = args.out_dir.join("grid.json");
        let json = serde_json::to_string_pretty(&out.grid)?;
        std::fs::write(&path, json).with_context(|| format!("write '{}'", path.display()))?;
    }
    if out.grid.degraded {
        eprintln!(
            "warning: grid detection degraded ({}, confidence {:.2}); some cells were interpolated",
            out.grid.diagnostics.strategy, out.grid.diagnostics.confidence
        );
    }
    eprintln!(
        "wrote {} cells ({}x{}) to {}",
        paths.len(),
        out.dims.width,
        out.dims.height,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_encode(
    sources: &[PathBuf],
    easing: Ease,
    duration: f64,
    fps: Fps,
    encode: EncodeArgs,
    cfg: SeamConfig,
) -> anyhow::Result<()> {
    let mut opts = cfg.retime;
    if encode.bitrate.is_some() {
        opts.bitrate = encode.bitrate;
    }
    if encode.threads.is_some() {
        opts.threading.threads = encode.threads;
    }
    if let Some(chunk_size) = encode.chunk_size {
        opts.threading.chunk_size = chunk_size;
    }
    if encode.sequential {
        opts.threading.parallel = false;
    }

    let mut sink_opts = FfmpegSinkOpts::new(&encode.out);
    sink_opts.overwrite = !encode.no_overwrite;
    let mut sink = FfmpegSink::new(sink_opts);

    let paths: Vec<&Path> = sources.iter().map(PathBuf::as_path).collect();
    let (plan, _stats) = seamcut::retime_files(
        &FfmpegVideo,
        &paths,
        easing,
        duration,
        fps,
        &mut sink,
        &opts,
        &AtomicBool::new(false),
    )?;

    eprintln!(
        "wrote {} ({} frames, {:.3}s)",
        encode.out.display(),
        plan.len(),
        plan.duration_secs()
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs, cfg: SeamConfig) -> anyhow::Result<()> {
    let easing = args.easing.unwrap_or(cfg.retime.easing);
    let plan = seamcut::plan_segments(
        easing,
        &args.source_durations,
        args.duration,
        args.fps,
        &cfg.retime.mapper,
    )?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
