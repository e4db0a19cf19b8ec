use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info, warn};
use vp_detect::{
    build_debug_overlay, collect_line_files, LineSetFile, VpDetectConfig, VpDetectReport,
    VpDetector, VpDetectorParams, VpResult,
};

/// Estimate the three Manhattan vanishing points of line-set files.
#[derive(Debug, Parser)]
#[command(name = "vp-detect", author, version, about = "Manhattan vanishing point detection")]
struct Args {
    /// Line-set JSON file, or a directory of them.
    #[arg(short, long)]
    input: PathBuf,

    /// Minimal segment length in pixels.
    #[arg(short = 'l', long)]
    length_thresh: Option<f64>,

    /// Principal point in pixels (image centre when omitted).
    #[arg(short = 'p', long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    principal_point: Option<Vec<f64>>,

    /// Focal length in pixels.
    #[arg(short = 'f', long)]
    focal_length: Option<f64>,

    /// Inlier tolerance in radians.
    #[arg(short = 'a', long)]
    angle_tol: Option<f64>,

    /// Seed for reproducible sampling.
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Scored sampling rounds per direction.
    #[arg(long)]
    iterations: Option<usize>,

    /// Refinement passes after the triad is built.
    #[arg(long)]
    refine_iterations: Option<usize>,

    /// JSON config with detector params and output paths.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build the debug overlay and log its summary.
    #[arg(short, long)]
    debug: bool,

    /// Where to render the debug overlay; a path without extension is a directory.
    #[arg(long)]
    debug_path: Option<PathBuf>,

    /// Where to write the JSON report; a path without extension is a directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace). Falls back to `VP_DETECT_LOG`.
    /// With the `tracing` feature this is an `EnvFilter` directive and falls
    /// back to `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
}

struct Settings {
    params: VpDetectorParams,
    output: Option<PathBuf>,
    debug_path: Option<PathBuf>,
    debug: bool,
}

impl Settings {
    fn from_args(args: &Args) -> Result<Self, Box<dyn Error>> {
        let cfg = match &args.config {
            Some(path) => VpDetectConfig::load_json(path)?,
            None => VpDetectConfig::default(),
        };

        let mut params = cfg.params;
        if let Some(v) = args.length_thresh {
            params.length_thresh = v;
        }
        if let Some(pp) = &args.principal_point {
            if let [x, y] = pp.as_slice() {
                params.principal_point = Some([*x, *y]);
            }
        }
        if let Some(v) = args.focal_length {
            params.focal_length = v;
        }
        if let Some(v) = args.angle_tol {
            params.angle_tol = v;
        }
        if args.seed.is_some() {
            params.seed = args.seed;
        }
        if let Some(v) = args.iterations {
            params.iterations = v;
        }
        if let Some(v) = args.refine_iterations {
            params.refine_iterations = v;
        }
        params.validate()?;

        Ok(Self {
            params,
            output: args
                .output
                .clone()
                .or_else(|| cfg.output_path.map(PathBuf::from)),
            debug_path: args
                .debug_path
                .clone()
                .or_else(|| cfg.debug_path.map(PathBuf::from)),
            debug: args.debug,
        })
    }
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args);

    let settings = Settings::from_args(&args)?;
    let files = collect_line_files(&args.input)?;
    let batch = files.len() > 1 || args.input.is_dir();
    print_settings(&args.input, &settings.params, batch);
    let detector = VpDetector::new(settings.params.clone());

    let mut failed = 0usize;
    for path in &files {
        match process_file(&detector, path, &settings, batch) {
            Ok(true) => {}
            Ok(false) => failed += 1,
            Err(err) => {
                error!("{}: {err}", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} input(s) failed", files.len()).into());
    }
    Ok(())
}

fn init_logging(args: &Args) {
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        vp_detect::core::init_tracing(false, args.log_level.as_deref());
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = args
            .log_level
            .as_deref()
            .and_then(|v| v.trim().parse::<log::LevelFilter>().ok())
            .unwrap_or_else(|| {
                vp_detect::core::level_from_env("VP_DETECT_LOG", log::LevelFilter::Info)
            });
        if let Err(err) = vp_detect::core::init_with_level(level) {
            eprintln!("logger: {err}");
        }
    }
}

/// Run one line-set file. `Ok(false)` means detection failed and the failure
/// was recorded in the report.
fn process_file(
    detector: &VpDetector,
    path: &Path,
    settings: &Settings,
    batch: bool,
) -> Result<bool, Box<dyn Error>> {
    let lines = LineSetFile::load_json(path)?;
    let camera = detector.camera_for_image(lines.image_width, lines.image_height)?;
    let mut report = VpDetectReport::new(path, &lines, &camera);

    let outcome = detector.find_vps(&lines.segments, &camera);
    let ok = match &outcome {
        Ok(res) => {
            report.set_result(res);
            print_result(path, res);
            true
        }
        Err(err) => {
            error!("{}: {err}", path.display());
            report.set_error(err);
            false
        }
    };

    if let Some(base) = &settings.output {
        let out = output_path_for(base, path, batch, "json")?;
        report.write_json(&out)?;
        info!("wrote report to {}", out.display());
    }

    if let Ok(res) = &outcome {
        if settings.debug || settings.debug_path.is_some() {
            write_debug(&lines, res, path, settings, batch)?;
        }
    }

    Ok(ok)
}

fn print_settings(input: &Path, params: &VpDetectorParams, batch: bool) {
    println!("input path: {}", input.display());
    match params.seed {
        Some(seed) => println!("seed: {seed}"),
        None => println!("seed: random"),
    }
    println!("line length threshold: {}", params.length_thresh);
    println!("focal length: {}", params.focal_length);
    println!("angle tolerance: {} rad", params.angle_tol);
    if batch {
        println!("input path is a directory");
    }
}

fn print_result(path: &Path, res: &VpResult) {
    let pp = res.camera.principal_point();
    println!("{}:", path.display());
    println!("  principal point: ({:.2}, {:.2})", pp.x, pp.y);
    for (k, d) in res.directions_3d().iter().enumerate() {
        println!("  vp{k} 3d: [{:+.6}, {:+.6}, {:+.6}]", d.x, d.y, d.z);
    }
    for (k, vp) in res.vps_2d.iter().enumerate() {
        match vp {
            Some(p) => println!("  vp{k} 2d: ({:.2}, {:.2})", p.x, p.y),
            None => println!("  vp{k} 2d: at infinity"),
        }
    }
}

fn write_debug(
    lines: &LineSetFile,
    res: &VpResult,
    input: &Path,
    settings: &Settings,
    batch: bool,
) -> Result<(), Box<dyn Error>> {
    let overlay = build_debug_overlay(&lines.segments, res);
    let [c0, c1, c2, none] = overlay.cluster_counts();
    info!(
        "{}: clusters {c0}/{c1}/{c2}, unassigned {none}, markers {}",
        input.display(),
        overlay.markers.len()
    );

    let Some(base) = &settings.debug_path else {
        return Ok(());
    };
    let out = output_path_for(base, input, batch, "png")?;

    #[cfg(feature = "image")]
    {
        use vp_detect::render::{background, save_overlay, RenderStyle};
        let canvas = background(
            lines.image_path.as_deref().map(Path::new),
            lines.image_width,
            lines.image_height,
        );
        save_overlay(&out, canvas, &overlay, &RenderStyle::default())?;
        info!("wrote debug image to {}", out.display());
    }
    #[cfg(not(feature = "image"))]
    warn!(
        "built without the `image` feature, not rendering {}",
        out.display()
    );

    Ok(())
}

/// Destination for one input's artifact. A `base` without extension is a
/// directory holding `<input stem>.<ext>`; a file `base` in batch mode gets
/// the input stem as a prefix.
fn output_path_for(
    base: &Path,
    input: &Path,
    batch: bool,
    ext: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());

    if base.extension().is_none() {
        fs::create_dir_all(base)?;
        return Ok(base.join(format!("{stem}.{ext}")));
    }
    if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if !batch {
        return Ok(base.to_path_buf());
    }
    let name = base
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    warn!("batch run with a file path {}, prefixing with input names", base.display());
    Ok(base.with_file_name(format!("{stem}_{name}")))
}
