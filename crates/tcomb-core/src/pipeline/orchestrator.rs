use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, TcombError};
use crate::fields::{weave_fields, FieldSource};
use crate::frame::Frame;
use crate::io::y4m::Y4mReader;
use crate::io::y4m_writer::Y4mWriter;
use crate::source::FrameSource;

use super::config::PipelineConfig;
use super::scheduler::TcombFilter;
use super::types::{NoOpReporter, PipelineStage, PipelineSummary, ProgressReporter};

fn open_filter(config: &PipelineConfig) -> Result<TcombFilter<FieldSource<Y4mReader>>> {
    config.validate()?;
    let reader = Y4mReader::open(&config.input)?;
    let format = reader.format();
    info!(
        frames = reader.frame_count(),
        width = format.width,
        height = format.height,
        sampling = %format.sampling,
        "Opened Y4M input"
    );
    if reader.is_empty() {
        return Err(TcombError::EmptySequence);
    }

    let fields = FieldSource::new(reader, config.field_order)?;
    let parity = fields.first_parity();
    let filter = TcombFilter::new(fields, &config.filter)?;
    info!(
        fields = filter.len(),
        first_field = ?parity,
        mode = %config.filter.mode,
        map = config.filter.map,
        "Filter built"
    );
    Ok(filter)
}

/// Run the filter over the whole input with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineSummary> {
    reporter.begin_stage(PipelineStage::Reading, None);
    let filter = open_filter(config)?;
    let header = filter.source().inner().header.clone();
    let format = filter.source().inner().format();
    let parity = filter.source().first_parity();
    reporter.finish_stage();

    let mut writer = Y4mWriter::create(&config.output, &header)?;
    // Batches hold whole frames so each one weaves on its own.
    let batch = config.batch_size.next_multiple_of(2);

    reporter.begin_stage(PipelineStage::Filtering, Some(filter.len()));
    let fields_processed = filter.process_all(batch, |start, fields| {
        for pair in fields.chunks_exact(2) {
            let frame = weave_fields(&pair[0], &pair[1], parity)?;
            writer.write_frame(&frame)?;
        }
        debug!(start, fields = fields.len(), "Wrote batch");
        reporter.advance(fields.len());
        Ok(())
    })?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, None);
    let frames_written = writer.frames_written();
    writer.finalize()?;
    reporter.finish_stage();

    let stats = filter.stats();
    let summary = PipelineSummary {
        format,
        frames_written,
        fields_processed,
        scene_changes: stats.scene_changes,
        corrected_pixels: stats.corrected_pixels,
    };
    info!(
        frames = summary.frames_written,
        scene_changes = summary.scene_changes,
        corrected_pixels = summary.corrected_pixels,
        output = %config.output.display(),
        "Run finished"
    );
    Ok(summary)
}

/// Run the filter over the whole input.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}

/// Filter a single output frame via random access; `config.output` is unused.
pub fn render_frame(config: &PipelineConfig, frame: usize) -> Result<Frame> {
    let filter = open_filter(config)?;
    let total = filter.source().inner().frame_count();
    if frame >= total {
        return Err(TcombError::FrameIndexOutOfRange {
            index: frame,
            total,
        });
    }
    let fields = filter.process_range(frame * 2..frame * 2 + 2)?;
    let mut woven = weave_fields(&fields[0], &fields[1], filter.source().first_parity())?;
    woven.metadata.frame_index = frame;
    Ok(woven)
}
