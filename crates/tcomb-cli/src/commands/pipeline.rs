use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tcomb_core::fields::FieldOrder;
use tcomb_core::pipeline::config::{FilterConfig, PipelineConfig, ProcessingMode};
use tcomb_core::pipeline::run_pipeline_reported;

use crate::progress::BarReporter;
use crate::summary::{print_run_header, print_run_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Luma,
    Chroma,
    Both,
}

impl From<ModeArg> for ProcessingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Luma => Self::Luma,
            ModeArg::Chroma => Self::Chroma,
            ModeArg::Both => Self::Both,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FieldOrderArg {
    Auto,
    Tff,
    Bff,
}

impl From<FieldOrderArg> for FieldOrder {
    fn from(arg: FieldOrderArg) -> Self {
        match arg {
            FieldOrderArg::Auto => Self::Auto,
            FieldOrderArg::Tff => Self::TopFieldFirst,
            FieldOrderArg::Bff => Self::BottomFieldFirst,
        }
    }
}

/// Filter options shared by `run` and `preview`. Unset flags keep the value
/// from the config file, or the default.
#[derive(Args)]
pub struct FilterArgs {
    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Planes to filter
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Luma motion/average threshold (1-255)
    #[arg(long)]
    pub fthreshl: Option<u32>,

    /// Chroma average threshold (1-255)
    #[arg(long)]
    pub fthreshc: Option<u32>,

    /// Luma oscillation threshold (1-255)
    #[arg(long)]
    pub othreshl: Option<u32>,

    /// Chroma oscillation threshold (1-255)
    #[arg(long)]
    pub othreshc: Option<u32>,

    /// Scene-change threshold in percent; negative disables
    #[arg(long, allow_negative_numbers = true)]
    pub scthresh: Option<f64>,

    /// Output a correction map instead of the filtered video
    #[arg(long)]
    pub map: bool,

    /// Field order of the input
    #[arg(long, value_enum)]
    pub field_order: Option<FieldOrderArg>,
}

impl FilterArgs {
    /// Load the config file (if any) and apply the command-line overrides.
    pub fn build_config(&self, input: &Path, output: &Path) -> Result<PipelineConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&contents).context("Invalid pipeline config")?
            }
            None => PipelineConfig::new(input.to_path_buf(), output.to_path_buf()),
        };
        config.input = input.to_path_buf();
        config.output = output.to_path_buf();
        if let Some(order) = self.field_order {
            config.field_order = order.into();
        }
        self.apply(&mut config.filter);
        config.validate().context("Invalid filter settings")?;
        Ok(config)
    }

    fn apply(&self, filter: &mut FilterConfig) {
        if let Some(mode) = self.mode {
            filter.mode = mode.into();
        }
        if let Some(v) = self.fthreshl {
            filter.fine_threshold_luma = v;
        }
        if let Some(v) = self.fthreshc {
            filter.fine_threshold_chroma = v;
        }
        if let Some(v) = self.othreshl {
            filter.output_threshold_luma = v;
        }
        if let Some(v) = self.othreshc {
            filter.output_threshold_chroma = v;
        }
        if let Some(v) = self.scthresh {
            filter.scene_threshold = v;
        }
        if self.map {
            filter.map = true;
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input Y4M file
    pub file: PathBuf,

    /// Output Y4M file
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output fields computed per batch
    #[arg(long)]
    pub batch_size: Option<usize>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = args.filter.build_config(&args.file, &args.output)?;
    if let Some(batch) = args.batch_size {
        config.batch_size = batch;
        config.validate().context("Invalid batch size")?;
    }

    print_run_header(&config);

    let reporter = Arc::new(BarReporter::new());
    let start = Instant::now();
    let summary = run_pipeline_reported(&config, reporter.clone())
        .with_context(|| format!("Failed to filter {}", config.input.display()))?;
    reporter.finish();

    print_run_summary(&summary, &config, start.elapsed());
    Ok(())
}
