//! Disparity map estimation using Yoon-Kweon adaptive weights.

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::ThreadPoolBuilder;
use tracing_subscriber::EnvFilter;

use sv_io::{load_color, write_disparity};
use sv_stereo::{
    run_pipeline, CameraMotion, MatchParams, OcclusionParams, WeightCombination,
};

#[derive(Parser)]
#[command(
    name = "disparity",
    about = "Yoon-Kweon disparity map estimation with adaptive weights",
    version
)]
struct Cli {
    /// Reference image (PNG)
    im1: PathBuf,
    /// Target image (PNG)
    im2: PathBuf,
    /// Minimum disparity
    #[arg(allow_negative_numbers = true)]
    d_min: i32,
    /// Maximum disparity
    #[arg(allow_negative_numbers = true)]
    d_max: i32,
    /// Prefix of the output TIFF files
    #[arg(default_value = "disparity")]
    out_prefix: String,

    /// Gamma for color difference
    #[arg(long = "gcol", default_value_t = 12.0)]
    gamma_color: f32,
    /// Gamma for spatial distance
    #[arg(long = "gpos", default_value_t = 17.5)]
    gamma_position: f32,
    /// Radius of the patch window
    #[arg(short = 'R', default_value_t = 17)]
    radius: i32,
    /// Alpha blending color and gradient costs
    #[arg(short = 'A', default_value_t = 0.9)]
    alpha: f32,
    /// Threshold for color difference in the matching cost
    #[arg(short = 't', default_value_t = 30.0)]
    color_threshold: f32,
    /// Threshold for gradient difference in the matching cost
    #[arg(short = 'g', default_value_t = 2.0)]
    gradient_threshold: f32,

    /// Tolerance for the left/right disparity difference
    #[arg(short = 'o', default_value_t = 0.0)]
    tol_disp: f32,
    /// Camera sense: 0 = moves right, 1 = moves left
    #[arg(short = 'O', default_value_t = 0)]
    sense: i32,
    /// Radius of the weighted median filter
    #[arg(short = 'r', default_value_t = 9)]
    median_radius: i32,
    /// Sigma of the guidance color kernel
    #[arg(short = 'c', default_value_t = 25.5)]
    sigma_color: f32,
    /// Sigma of the spatial kernel
    #[arg(short = 's', default_value_t = 9.0)]
    sigma_space: f32,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(1);
    });

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let motion = CameraMotion::from_sense(cli.sense)?;

    let im1 = load_color(&cli.im1)
        .with_context(|| format!("unable to read {} as PNG", cli.im1.display()))?;
    let im2 = load_color(&cli.im2)
        .with_context(|| format!("unable to read {} as PNG", cli.im2.display()))?;
    if im1.width() != im2.width() || im1.height() != im2.height() {
        bail!("the images must have the same size");
    }

    let match_params = MatchParams {
        color_threshold: cli.color_threshold,
        gradient_threshold: cli.gradient_threshold,
        alpha: cli.alpha,
        gamma_color: cli.gamma_color,
        gamma_position: cli.gamma_position,
        window_radius: cli.radius,
    };
    let occlusion_params = OcclusionParams {
        tol_disp: cli.tol_disp,
        median_radius: cli.median_radius,
        sigma_color: cli.sigma_color,
        sigma_space: cli.sigma_space,
    };

    configure_thread_pool()?;
    let output = run_pipeline(
        &im1,
        &im2,
        cli.d_min,
        cli.d_max,
        &match_params,
        WeightCombination::default(),
        &occlusion_params,
        motion,
    )?;

    for (map, suffix) in [
        (&output.raw, ""),
        (&output.occluded, "_occ"),
        (&output.densified, "_pp"),
    ] {
        let path = PathBuf::from(format!("{}{}.tif", cli.out_prefix, suffix));
        write_disparity(&path, map)
            .with_context(|| format!("error writing file {}", path.display()))?;
    }

    Ok(())
}

/// Bound the row-level parallelism when `SV_CPU_THREADS` is set; rayon's
/// default thread count applies otherwise.
fn configure_thread_pool() -> Result<()> {
    let raw = match env::var("SV_CPU_THREADS") {
        Ok(v) => v,
        Err(_) => return Ok(()),
    };
    let threads: usize = raw
        .parse()
        .ok()
        .filter(|&n| n > 0)
        .with_context(|| format!("SV_CPU_THREADS must be a positive integer, got '{raw}'"))?;
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("failed to initialize the thread pool")?;
    Ok(())
}
