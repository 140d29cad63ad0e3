use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::warn;
use profiler::{format_estimate, BeamProfiler, EllipseConvention, ProfilerSettings, Screen};
use profiler_harness::{
    run_session, DummyGaussian, DummyGaussianConfig, FrameSource, ImageFileSource,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Convention {
    Legacy,
    Rotation,
}

impl From<Convention> for EllipseConvention {
    fn from(value: Convention) -> Self {
        match value {
            Convention::Legacy => EllipseConvention::Legacy,
            Convention::Rotation => EllipseConvention::Rotation,
        }
    }
}

/// Command line arguments for the beam profiler
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fit a Gaussian beam ellipse to camera frames",
    long_about = "Runs the beam profiler over a stream of frames and prints the fitted \
        centroid, axes, rotation and ellipticity.\n\n\
        Frames come from a synthetic Gaussian camera unless --input names an image \
        file, in which case that image is analysed repeatedly."
)]
struct Args {
    #[arg(
        long,
        help = "Profiler settings JSON file",
        long_help = "JSON file with profiler settings. Missing fields take their defaults; \
            command line overrides below take precedence over the file."
    )]
    config: Option<PathBuf>,

    #[arg(long, help = "Image file to analyse instead of the synthetic camera")]
    input: Option<PathBuf>,

    #[arg(long, help = "Background percentile (0-100)")]
    background_percentile: Option<f64>,

    #[arg(long, help = "Number of crop-and-recompute passes")]
    num_crops: Option<usize>,

    #[arg(
        long,
        help = "Crop half-width in beam diameters",
        long_help = "Half-width of each crop window as a multiple of the 4-sigma beam \
            diameter along each axis. Smaller values reject clutter more aggressively \
            but clip the beam wings."
    )]
    crop_radius: Option<f64>,

    #[arg(long, help = "Samples on the overlay ellipse")]
    num_points: Option<usize>,

    #[arg(long, value_enum, help = "Overlay ellipse sign convention")]
    convention: Option<Convention>,

    #[arg(short = 'n', long, default_value_t = 10, help = "Number of frames to process")]
    frames: usize,

    #[arg(long, default_value_t = 320, help = "Synthetic frame width in pixels")]
    width: usize,

    #[arg(long, default_value_t = 200, help = "Synthetic frame height in pixels")]
    height: usize,

    #[arg(long, default_value_t = 200.0, help = "Synthetic beam peak value")]
    amplitude: f64,

    #[arg(long, default_value_t = 12.0, help = "Synthetic beam sigma along its x axis")]
    sigma_x: f64,

    #[arg(long, default_value_t = 8.0, help = "Synthetic beam sigma along its y axis")]
    sigma_y: f64,

    #[arg(long, default_value_t = 20.0, help = "Synthetic beam rotation in degrees")]
    angle: f64,

    #[arg(long, default_value_t = 10.0, help = "Synthetic background level")]
    pedestal: f64,

    #[arg(long, default_value_t = 1.0, help = "Synthetic read noise standard deviation")]
    noise: f64,

    #[arg(long, default_value_t = 20.0, help = "Radius of the synthetic beam wander")]
    wander: f64,

    #[arg(long, help = "Emit RGB frames from the synthetic camera")]
    color: bool,

    #[arg(long, default_value_t = 0, help = "Seed for synthetic noise")]
    seed: u64,

    #[arg(
        long,
        help = "Analyse all frames in parallel",
        long_help = "Collect all frames first and analyse them concurrently. Frames are \
            independent, so the results match sequential processing."
    )]
    parallel: bool,

    #[arg(long, help = "Print each estimate as a JSON line")]
    json: bool,
}

fn load_settings(args: &Args) -> Result<ProfilerSettings, Box<dyn std::error::Error>> {
    let mut settings = match &args.config {
        Some(path) => ProfilerSettings::from_json(&std::fs::read_to_string(path)?)?,
        None => ProfilerSettings::default(),
    };

    if let Some(p) = args.background_percentile {
        settings.analyzer.background_percentile = p;
    }
    if let Some(n) = args.num_crops {
        settings.analyzer.num_crops = n;
    }
    if let Some(r) = args.crop_radius {
        settings.analyzer.crop_radius = r;
    }
    if let Some(n) = args.num_points {
        settings.num_points = n;
    }
    if let Some(c) = args.convention {
        settings.ellipse_convention = c.into();
    }
    Ok(settings)
}

fn build_source(args: &Args) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    match &args.input {
        Some(path) => Ok(Box::new(ImageFileSource::open(path)?)),
        None => Ok(Box::new(DummyGaussian::new(DummyGaussianConfig {
            rows: args.height,
            cols: args.width,
            amplitude: args.amplitude,
            sigma_x: args.sigma_x,
            sigma_y: args.sigma_y,
            angle_degrees: args.angle,
            pedestal: args.pedestal,
            noise_std: args.noise,
            wander_radius: args.wander,
            color: args.color,
            seed: args.seed,
            ..Default::default()
        })?)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    let mut source = build_source(&args)?;

    let mut profiler = BeamProfiler::new(settings)?;
    let mut screen = Screen::new();
    profiler.set_active(true, &mut screen);

    println!("Beam Profiler");
    println!("=============");
    println!("Source: {}", source.id_string());
    println!(
        "Background percentile: {}, crops: {}, crop radius: {}",
        settings.analyzer.background_percentile,
        settings.analyzer.num_crops,
        settings.analyzer.crop_radius
    );

    if args.parallel {
        let frames = (0..args.frames)
            .map(|_| source.next_frame())
            .collect::<Result<Vec<_>, _>>()?;
        let results = profiler.analyzer().analyze_batch(&frames);

        let mut dropped = 0;
        for (index, result) in results.iter().enumerate() {
            match result {
                Ok(estimate) if args.json => println!("{}", serde_json::to_string(estimate)?),
                Ok(estimate) => println!("\nFrame {index}\n{}", format_estimate(estimate)),
                Err(err) => {
                    warn!("Frame {index} dropped: {err}");
                    dropped += 1;
                }
            }
        }
        println!("\n{} frames analysed, {} dropped", frames.len() - dropped, dropped);
        return Ok(());
    }

    let summary = run_session(source.as_mut(), &mut profiler, &mut screen, args.frames)?;

    if args.json {
        for estimate in &summary.estimates {
            println!("{}", serde_json::to_string(estimate)?);
        }
    } else {
        print!("\n{}", screen.hud_text());
    }
    println!(
        "{} frames analysed, {} dropped",
        summary.analyzed, summary.dropped
    );

    Ok(())
}
