use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tcomb_core::io::y4m::Y4mReader;
use tcomb_core::source::FrameSource;

#[derive(Args)]
pub struct InfoArgs {
    /// Input Y4M file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = Y4mReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let header = &reader.header;
    let format = reader.format();

    println!("File:        {}", args.file.display());
    println!("Frames:      {}", reader.frame_count());
    println!("Dimensions:  {}x{}", header.width, header.height);
    println!("Sampling:    {}", format.sampling);
    if let Some(ref c) = header.colorspace {
        println!("Colorspace:  {}", c);
    }
    if let Some((n, d)) = header.frame_rate {
        println!("Frame rate:  {}:{} ({:.3} fps)", n, d, n as f64 / d.max(1) as f64);
    }
    match header.field_order() {
        Some(order) => println!("Interlace:   {}", order),
        None => println!("Interlace:   {}", header.interlacing.unwrap_or('?')),
    }
    if let Some((n, d)) = header.aspect {
        println!("Aspect:      {}:{}", n, d);
    }

    let total_mb = (format.frame_byte_size() * reader.frame_count()) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
