//! Visualization of adaptive (bilateral) weights in a square window.
//!
//! Renders the support window around one pixel, optionally combined with the
//! window around the matching pixel of a second image.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;

use sv_core::FloatImage;
use sv_io::{load_color, save_gray};

type Comb = fn(f32, f32) -> f32;

#[derive(Parser)]
#[command(name = "show-weights", about = "Show adaptive weights in a square window", version)]
struct Cli {
    /// Image (PNG)
    im1: PathBuf,
    /// Center x
    x: i32,
    /// Center y
    y: i32,
    /// Output PNG
    output: PathBuf,
    /// Second image, for combined weights
    im2: Option<PathBuf>,
    /// Disparity of the center pixel in the second image
    #[arg(allow_negative_numbers = true, requires = "im2")]
    disp: Option<i32>,

    /// Radius of the window patch
    #[arg(short = 'R', default_value_t = 17)]
    radius: i32,
    /// Gamma for color similarity
    #[arg(long = "gcol", default_value_t = 12.0)]
    gamma_color: f32,
    /// Gamma for distance
    #[arg(long = "gpos", default_value_t = 17.5)]
    gamma_position: f32,
    /// Weights combination: max, min, mult or plus
    #[arg(short = 'c')]
    combine: Option<String>,
}

/// Relative weight between pixels (x, y) and (x+dx, y+dy).
///
/// The visualizer keeps the doubled spatial exponent; the matching core uses
/// the single one.
fn weight(im: &FloatImage, x: i32, y: i32, dx: i32, dy: i32, gamma_c: f32, gamma_p: f32) -> f32 {
    let mut d = 0.0f32;
    for c in 0..im.channels() {
        d += (im.get((x + dx) as u32, (y + dy) as u32, c) - im.get(x as u32, y as u32, c)).abs();
    }
    (-d / (im.channels() as f32 * gamma_c)).exp()
        * (-2.0 * ((dx * dx + dy * dy) as f32).sqrt() / gamma_p).exp()
}

/// Compute the window of weights around (xp, yp), optionally combined with
/// the window around (xq, yp) in the second image.
fn weight_window(
    im1: &FloatImage,
    im2: Option<&FloatImage>,
    comb: Option<Comb>,
    xp: i32,
    yp: i32,
    xq: i32,
    r: i32,
    gamma_c: f32,
    gamma_p: f32,
) -> Vec<f32> {
    let dim = (2 * r + 1) as usize;
    let mut window = vec![0.0f32; dim * dim];
    let (w1, h1) = (im1.width() as i32, im1.height() as i32);

    for dy in -r..=r {
        if yp + dy < 0 || yp + dy >= h1 {
            continue;
        }
        for dx in -r..=r {
            if xp + dx < 0 || xp + dx >= w1 {
                continue;
            }
            let mut value = weight(im1, xp, yp, dx, dy, gamma_c, gamma_p);
            if let (Some(im2), Some(comb)) = (im2, comb) {
                if xq + dx < 0
                    || xq + dx >= im2.width() as i32
                    || yp + dy >= im2.height() as i32
                {
                    continue;
                }
                value = comb(value, weight(im2, xq, yp, dx, dy, gamma_c, gamma_p));
            }
            window[((dy + r) * (2 * r + 1) + dx + r) as usize] = value;
        }
    }
    window
}

/// Rescale so the center weight maps to 255.
fn rescale(window: &mut [f32], dim: usize) {
    let center = window[(dim / 2) * dim + dim / 2];
    if center == 0.0 {
        return;
    }
    let factor = 255.0 / center;
    for v in window.iter_mut() {
        *v = (*v * factor).clamp(0.0, 255.0);
    }
}

fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(1);
    });

    let im1 = load_color(&cli.im1)
        .with_context(|| format!("unable to read {} as PNG", cli.im1.display()))?;
    if cli.x < 0 || cli.x >= im1.width() as i32 || cli.y < 0 || cli.y >= im1.height() as i32 {
        bail!("center ({}, {}) is outside the image", cli.x, cli.y);
    }

    let im2 = match &cli.im2 {
        Some(path) => Some(
            load_color(path).with_context(|| format!("unable to read {} as PNG", path.display()))?,
        ),
        None => None,
    };

    let comb: Option<Comb> = match cli.combine.as_deref() {
        None => None,
        Some("max") => Some(f32::max),
        Some("min") => Some(f32::min),
        Some("mult") => Some(|a, b| a * b),
        Some("plus") => Some(|a, b| a + b),
        Some(other) => bail!(
            "unrecognized weights combination '{other}' (should be max, min, mult or plus)"
        ),
    };
    if comb.is_some() && im2.is_none() {
        bail!("a weights combination requires a second image and a disparity");
    }

    let disp = cli.disp.unwrap_or(0);
    if let Some(im2) = &im2 {
        let xq = cli.x + disp;
        if xq < 0 || xq >= im2.width() as i32 || cli.y >= im2.height() as i32 {
            bail!("matching center ({}, {}) is outside the second image", xq, cli.y);
        }
    }
    let mut window = weight_window(
        &im1,
        im2.as_ref(),
        comb,
        cli.x,
        cli.y,
        cli.x + disp,
        cli.radius,
        cli.gamma_color,
        cli.gamma_position,
    );
    let dim = (2 * cli.radius + 1) as usize;
    rescale(&mut window, dim);

    save_gray(&cli.output, &window, dim as u32, dim as u32)
        .with_context(|| format!("unable to write file {}", cli.output.display()))?;

    Ok(())
}
