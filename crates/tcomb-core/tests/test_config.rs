use std::path::PathBuf;

use tcomb_core::error::TcombError;
use tcomb_core::fields::FieldOrder;
use tcomb_core::pipeline::config::{FilterConfig, PipelineConfig, PlaneSet, ProcessingMode};

#[test]
fn test_defaults() {
    let cfg = FilterConfig::default();
    assert_eq!(cfg.mode, ProcessingMode::Both);
    assert_eq!(cfg.fine_threshold_luma, 4);
    assert_eq!(cfg.fine_threshold_chroma, 5);
    assert_eq!(cfg.output_threshold_luma, 5);
    assert_eq!(cfg.output_threshold_chroma, 6);
    assert_eq!(cfg.scene_threshold, 12.0);
    assert!(!cfg.map);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_threshold_range_enforced() {
    for bad in [0, 256, 1000] {
        let cfg = FilterConfig {
            output_threshold_chroma: bad,
            ..FilterConfig::default()
        };
        match cfg.validate() {
            Err(TcombError::InvalidConfig(msg)) => {
                assert!(msg.contains("output_threshold_chroma"), "{msg}")
            }
            other => panic!("expected InvalidConfig for {bad}, got {other:?}"),
        }
    }
    let edge = FilterConfig {
        fine_threshold_luma: 1,
        fine_threshold_chroma: 255,
        ..FilterConfig::default()
    };
    let t = edge.thresholds().unwrap();
    assert_eq!((t.fine(0), t.fine(1), t.fine(2)), (1, 255, 255));
}

#[test]
fn test_scene_threshold_range() {
    let with = |scene_threshold| FilterConfig {
        scene_threshold,
        ..FilterConfig::default()
    };
    assert!(with(100.0).validate().is_ok());
    assert!(with(-5.0).validate().is_ok());
    assert!(with(100.5).validate().is_err());
    assert!(with(f64::NAN).validate().is_err());
}

#[test]
fn test_plane_sets() {
    let luma = PlaneSet::new(ProcessingMode::Luma, 3).unwrap();
    assert_eq!(luma.iter().collect::<Vec<_>>(), vec![0]);
    let chroma = PlaneSet::new(ProcessingMode::Chroma, 3).unwrap();
    assert_eq!(chroma.iter().collect::<Vec<_>>(), vec![1, 2]);
    assert!(!chroma.luma());
    assert!(chroma.contains(2));
    let both = PlaneSet::new(ProcessingMode::Both, 3).unwrap();
    assert_eq!(both.len(), 3);
    let mono = PlaneSet::new(ProcessingMode::Both, 1).unwrap();
    assert_eq!(mono, luma);
    assert!(PlaneSet::new(ProcessingMode::Chroma, 1).is_err());
}

#[test]
fn test_pipeline_config_toml_roundtrip() {
    let mut cfg = PipelineConfig::new(PathBuf::from("in.y4m"), PathBuf::from("out.y4m"));
    cfg.field_order = FieldOrder::BottomFieldFirst;
    cfg.filter.mode = ProcessingMode::Chroma;
    cfg.filter.scene_threshold = -1.0;

    let text = toml::to_string_pretty(&cfg).unwrap();
    assert!(text.contains("bottom-field-first"));
    assert!(text.contains("mode = \"chroma\""));

    let back: PipelineConfig = toml::from_str(&text).unwrap();
    assert_eq!(back.field_order, FieldOrder::BottomFieldFirst);
    assert_eq!(back.filter, cfg.filter);
    assert_eq!(back.batch_size, cfg.batch_size);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let text = r#"
input = "a.y4m"
output = "b.y4m"

[filter]
mode = "luma"
output_threshold_luma = 9
"#;
    let cfg: PipelineConfig = toml::from_str(text).unwrap();
    assert_eq!(cfg.field_order, FieldOrder::Auto);
    assert_eq!(cfg.batch_size, 32);
    assert_eq!(cfg.filter.mode, ProcessingMode::Luma);
    assert_eq!(cfg.filter.output_threshold_luma, 9);
    assert_eq!(cfg.filter.fine_threshold_chroma, 5);
}

#[test]
fn test_zero_batch_rejected() {
    let mut cfg = PipelineConfig::new(PathBuf::from("a"), PathBuf::from("b"));
    cfg.batch_size = 0;
    assert!(matches!(cfg.validate(), Err(TcombError::InvalidConfig(_))));
}
