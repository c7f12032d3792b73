use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tcomb_core::io::image_io::save_plane_png;
use tcomb_core::pipeline::config::PlaneSet;
use tcomb_core::pipeline::render_frame;
use tracing::warn;

use super::pipeline::FilterArgs;

#[derive(Args)]
pub struct PreviewArgs {
    /// Input Y4M file
    pub file: PathBuf,

    /// Frame to render (0-based)
    #[arg(long, default_value = "0")]
    pub frame: usize,

    /// Plane to save (0 = Y, 1 = U, 2 = V)
    #[arg(long, default_value = "0")]
    pub plane: usize,

    /// Output PNG path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config = args.filter.build_config(&args.file, &args.output)?;
    let frame = render_frame(&config, args.frame)
        .with_context(|| format!("Failed to render frame {}", args.frame))?;

    let planes = PlaneSet::new(config.filter.mode, frame.plane_count())?;
    if !planes.contains(args.plane) {
        warn!(
            plane = args.plane,
            mode = %config.filter.mode,
            "Saved plane is not filtered in this mode"
        );
    }

    save_plane_png(&frame, args.plane, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Frame {} plane {} saved to {}",
        args.frame,
        args.plane,
        args.output.display()
    );
    Ok(())
}
