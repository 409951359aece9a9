//! slicevox CLI - convert meshes to frame stacks and back
//!
//! Usage:
//!   slicevox slice <input.stl> <output_dir> [--delta 0.04] [--z-stride 1]
//!   slicevox reconstruct <input_dir> <output.stl> [--delta D] [--mc-delta D]
//!                        [--z-stride N] [--smooth 20] [--max-frames N]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::constants::{
    ConversionConfig, DEFAULT_DELTA, DEFAULT_SEARCH_DEPTH, DEFAULT_SMOOTH_ITERS, DEFAULT_Z_STRIDE,
};
use glam::DVec3;
use log::{info, warn, LevelFilter};
use slicevox_core::{SliceEngine, VolumeReconstructor};
use slicevox_io::{load_stl, save_stl, write_stack_frame, StackInfo, StackReader};
use slicevox_mesh::extract_isosurface;
use std::path::PathBuf;

/// Converts between triangle meshes and stacks of binary cross-sections
#[derive(Parser, Debug)]
#[command(name = "slicevox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Slice an STL mesh into a directory of PNG frames
    Slice {
        /// Input STL file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output frame directory
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Spatial quantization (world size of one pixel)
        #[arg(long, default_value_t = DEFAULT_DELTA)]
        delta: f64,

        /// Keep every n-th frame along Z
        #[arg(long, default_value_t = DEFAULT_Z_STRIDE)]
        z_stride: usize,
    },

    /// Rebuild an STL mesh from a directory of frames
    Reconstruct {
        /// Input frame directory
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output STL file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Spatial quantization (defaults to stack.json, then 0.04)
        #[arg(long)]
        delta: Option<f64>,

        /// Isosurface grid spacing, if different from the spatial delta
        #[arg(long)]
        mc_delta: Option<f64>,

        /// Z stride the stack was written with (defaults to stack.json, then 1)
        #[arg(long)]
        z_stride: Option<usize>,

        /// Smoothing iterations applied to each frame outline
        #[arg(long, default_value_t = DEFAULT_SMOOTH_ITERS)]
        smooth: usize,

        /// Maximum number of frames to read (0 reads all)
        #[arg(long, default_value_t = 0)]
        max_frames: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Slice {
            input,
            output,
            delta,
            z_stride,
        } => cmd_slice(input, output, delta, z_stride),
        Commands::Reconstruct {
            input,
            output,
            delta,
            mc_delta,
            z_stride,
            smooth,
            max_frames,
        } => cmd_reconstruct(input, output, delta, mc_delta, z_stride, smooth, max_frames),
    }
}

fn cmd_slice(input: PathBuf, output: PathBuf, delta: f64, z_stride: usize) -> Result<()> {
    let config = ConversionConfig::new(
        delta,
        z_stride,
        DEFAULT_SMOOTH_ITERS,
        None,
        DEFAULT_SEARCH_DEPTH,
    )
    .context("Invalid slicing parameters")?;

    info!("Loading mesh: {}", input.display());
    let mesh = load_stl(&input).context("Failed to load STL file")?;
    info!("  Triangles: {}", mesh.triangle_count());

    info!("Creating slicer...");
    let engine = SliceEngine::new(&mesh, config.delta).context("Failed to create slicer")?;
    let count = engine.num_frames() / config.z_stride;
    info!(
        "  Frames: {}x{} pixels, {} of {} frames",
        engine.width(),
        engine.height(),
        count,
        engine.num_frames()
    );
    if count == 0 {
        warn!("Mesh is thinner than one stride; no frames will be written");
    }

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    for i in 0..count {
        info!("Encoding frame {}/{}", i + 1, count);
        let frame = engine
            .slice(i * config.z_stride)
            .with_context(|| format!("Failed to slice frame {}", i * config.z_stride))?;
        write_stack_frame(&output, i, &frame)
            .with_context(|| format!("Failed to write frame {i}"))?;
    }

    let bounds = engine.bounds();
    let origin = DVec3::new(bounds.min.x, bounds.min.y, engine.frame_z(0));
    StackInfo::new(
        config.delta,
        config.z_stride,
        engine.width(),
        engine.height(),
        count,
        origin,
    )
    .save(&output)
    .context("Failed to write stack info")?;

    info!("Wrote {} frames to {}", count, output.display());
    Ok(())
}

fn cmd_reconstruct(
    input: PathBuf,
    output: PathBuf,
    delta: Option<f64>,
    mc_delta: Option<f64>,
    z_stride: Option<usize>,
    smooth: usize,
    max_frames: usize,
) -> Result<()> {
    let info = StackInfo::load_optional(&input).context("Failed to read stack info")?;
    if info.is_none() {
        warn!(
            "No stack info in {}; output stays in stack coordinates",
            input.display()
        );
    }

    let config = ConversionConfig::new(
        delta
            .or(info.as_ref().map(|s| s.delta))
            .unwrap_or(DEFAULT_DELTA),
        z_stride
            .or(info.as_ref().map(|s| s.z_stride))
            .unwrap_or(DEFAULT_Z_STRIDE),
        smooth,
        mc_delta,
        DEFAULT_SEARCH_DEPTH,
    )
    .context("Invalid reconstruction parameters")?;
    info!(
        "delta {}, z stride {}, smoothing {}, isosurface delta {}",
        config.delta,
        config.z_stride,
        config.smooth_iters,
        config.mc_delta()
    );

    let mut recon =
        VolumeReconstructor::from_config(&config).context("Failed to create reconstructor")?;

    info!("Reading frames from {}...", input.display());
    let limit = (max_frames > 0).then_some(max_frames);
    let reader = StackReader::open(&input, limit).context("Failed to open frame stack")?;
    let total = reader.remaining();
    for (i, frame) in reader.enumerate() {
        let frame = frame.with_context(|| format!("Failed to read frame {}", i + 1))?;
        info!("Processing frame {}/{}", i + 1, total);
        recon.add_frame(&frame);
    }

    info!("Converting sliced solid to mesh...");
    let mut mesh = extract_isosurface(&recon, config.mc_delta(), config.search_depth)
        .context("Failed to extract isosurface")?;
    if let Some(info) = &info {
        mesh.translate(info.origin);
    }
    info!("  Triangles: {}", mesh.triangle_count());

    info!("Saving to {}...", output.display());
    save_stl(&mesh, &output).context("Failed to save STL file")?;
    Ok(())
}
