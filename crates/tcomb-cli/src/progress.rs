use indicatif::{ProgressBar, ProgressStyle};
use tcomb_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives one indicatif bar from pipeline progress callbacks.
pub struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len} fields ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(style);
        Self { pb }
    }

    pub fn finish(&self) {
        self.pb.finish_with_message("Done");
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        if let Some(total) = total_items {
            self.pb.set_length(total as u64);
            self.pb.set_position(0);
        }
    }

    fn advance(&self, items_done: usize) {
        self.pb.inc(items_done as u64);
    }
}
