#[allow(dead_code)]
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use tcomb_core::error::TcombError;
use tcomb_core::fields::{separate_fields, FieldOrder};
use tcomb_core::frame::{ChromaSampling, FieldParity, Frame};
use tcomb_core::io::y4m::{Y4mHeader, Y4mReader};
use tcomb_core::pipeline::config::{PipelineConfig, ProcessingMode};
use tcomb_core::pipeline::{
    render_frame, run_pipeline, run_pipeline_reported, PipelineStage, ProgressReporter,
};
use tcomb_core::source::FrameSource;

fn static_clip(dir: &TempDir, frames: usize) -> (std::path::PathBuf, Vec<Frame>) {
    let path = dir.path().join("static.y4m");
    let format = common::format(16, 16, ChromaSampling::Cs420);
    let clip = common::sequence(&format, frames, |_, p, r, c| common::texture(p, r, c));
    let mut header = Y4mHeader::new(16, 16, ChromaSampling::Cs420);
    header.frame_rate = Some((30000, 1001));
    header.interlacing = Some('t');
    common::write_y4m(&path, &header, &clip);
    (path, clip)
}

#[test]
fn test_static_clip_passes_through_unchanged() {
    let dir = TempDir::new().unwrap();
    let (input, clip) = static_clip(&dir, 12);
    let output = dir.path().join("out.y4m");
    let mut config = PipelineConfig::new(input.clone(), output.clone());
    config.batch_size = 5;

    let summary = run_pipeline(&config).unwrap();
    assert_eq!(summary.frames_written, 12);
    assert_eq!(summary.fields_processed, 24);
    assert_eq!(summary.scene_changes, 0);

    let reader = Y4mReader::open(&output).unwrap();
    let original = Y4mReader::open(&input).unwrap();
    assert_eq!(reader.header, original.header);
    assert_eq!(reader.frame_count(), 12);
    for (i, frame) in clip.iter().enumerate() {
        assert_eq!(reader.read_frame(i).unwrap().planes, frame.planes, "frame {i}");
    }
}

#[test]
fn test_comb_in_bottom_field_is_removed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("comb.y4m");
    let format = common::format(16, 16, ChromaSampling::Cs444);
    // The U sample at frame row 7 belongs to the bottom field (field row 3)
    // and flips every frame, which is every second field of that parity.
    let clip = common::sequence(&format, 16, |i, p, r, c| {
        if p == 1 && (r, c) == (7, 7) {
            if i % 2 == 0 {
                100
            } else {
                140
            }
        } else {
            128
        }
    });
    common::write_y4m(&path, &Y4mHeader::new(16, 16, ChromaSampling::Cs444), &clip);

    let mut config = PipelineConfig::new(path, dir.path().join("out.y4m"));
    config.field_order = FieldOrder::TopFieldFirst;
    config.filter.mode = ProcessingMode::Chroma;
    let frame = render_frame(&config, 8).unwrap();

    assert_eq!(frame.plane(1)[[7, 7]], 120);
    assert!(frame.plane(0).iter().all(|&v| v == 128));
    let [top, _] = separate_fields(&frame, FieldParity::Top);
    assert!(top.plane(1).iter().all(|&v| v == 128));
}

#[test]
fn test_render_frame_out_of_range() {
    let dir = TempDir::new().unwrap();
    let (input, _) = static_clip(&dir, 4);
    let config = PipelineConfig::new(input, dir.path().join("unused.y4m"));
    assert!(matches!(
        render_frame(&config, 4),
        Err(TcombError::FrameIndexOutOfRange { index: 4, total: 4 })
    ));
    let frame = render_frame(&config, 3).unwrap();
    assert_eq!(frame.metadata.frame_index, 3);
}

#[test]
fn test_odd_height_420_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.y4m");
    let format = common::format(16, 6, ChromaSampling::Cs420);
    let clip = common::sequence(&format, 2, |_, _, _, _| 0);
    common::write_y4m(&path, &Y4mHeader::new(16, 6, ChromaSampling::Cs420), &clip);

    let config = PipelineConfig::new(path, dir.path().join("out.y4m"));
    assert!(matches!(
        run_pipeline(&config),
        Err(TcombError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_empty_input_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.y4m");
    std::fs::write(&path, b"YUV4MPEG2 W16 H16 C420jpeg\n").unwrap();
    let config = PipelineConfig::new(path, dir.path().join("out.y4m"));
    assert!(matches!(run_pipeline(&config), Err(TcombError::EmptySequence)));
}

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<(PipelineStage, Option<usize>)>>,
    advanced: AtomicUsize,
    finished: AtomicUsize,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.stages.lock().unwrap().push((stage, total_items));
    }

    fn advance(&self, items_done: usize) {
        self.advanced.fetch_add(items_done, Ordering::Relaxed);
    }

    fn finish_stage(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_reporter_sees_every_field() {
    let dir = TempDir::new().unwrap();
    let (input, _) = static_clip(&dir, 7);
    let mut config = PipelineConfig::new(input, dir.path().join("out.y4m"));
    config.batch_size = 3;

    let reporter = Arc::new(RecordingReporter::default());
    run_pipeline_reported(&config, reporter.clone()).unwrap();

    let stages = reporter.stages.lock().unwrap().clone();
    assert_eq!(
        stages,
        vec![
            (PipelineStage::Reading, None),
            (PipelineStage::Filtering, Some(14)),
            (PipelineStage::Writing, None),
        ]
    );
    assert_eq!(reporter.advanced.load(Ordering::Relaxed), 14);
    assert_eq!(reporter.finished.load(Ordering::Relaxed), 3);
}

#[test]
fn test_field_order_hint_from_header() {
    let dir = TempDir::new().unwrap();
    let (input, _) = static_clip(&dir, 2);
    let reader = Y4mReader::open(&input).unwrap();
    assert_eq!(reader.field_order_hint(), Some(FieldOrder::TopFieldFirst));
}
