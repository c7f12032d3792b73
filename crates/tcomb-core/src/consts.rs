/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Envelope slack added around the 3x3 min/max of the luma plane.
pub const LUMA_ENVELOPE_SLACK: u8 = 2;

/// Envelope slack added around the 3x3 min/max of the chroma planes.
pub const CHROMA_ENVELOPE_SLACK: u8 = 8;

/// Border replicated on each side of a plane before envelope extraction.
pub const ENVELOPE_PAD: usize = 2;

/// Nominal luma excursion (235 - 16) used to scale the scene-change threshold.
pub const SCENE_CHANGE_LUMA_RANGE: i64 = 219;

/// Scene-change sums only cover columns up to the largest multiple of this.
pub const SCENE_CHANGE_COLUMN_ALIGN: usize = 16;

/// Columns are accumulated in groups of this many samples.
pub const SCENE_CHANGE_GROUP: usize = 4;

/// Number of smoothed variants in a blur pyramid.
pub const PYRAMID_LEVELS: usize = 6;

/// Value written for a set mask pixel.
pub const MASK_SET: u8 = 0xFF;

/// Map-mode intensity when the centered 3-tap blend was used.
pub const MAP_CENTER: u8 = 255;

/// Map-mode intensity when the backward 3-tap blend was used.
pub const MAP_BACKWARD: u8 = 170;

/// Map-mode intensity when the forward 3-tap blend was used.
pub const MAP_FORWARD: u8 = 85;

/// Smallest luma field width the blur kernels support.
pub const MIN_FIELD_WIDTH: usize = 4;

/// Smallest luma field height the vertical kernels support.
pub const MIN_FIELD_HEIGHT: usize = 2;

/// Default luma fine (motion) threshold.
pub const DEFAULT_FINE_THRESHOLD_LUMA: u32 = 4;

/// Default chroma fine (motion) threshold.
pub const DEFAULT_FINE_THRESHOLD_CHROMA: u32 = 5;

/// Default luma output (oscillation spread) threshold.
pub const DEFAULT_OUTPUT_THRESHOLD_LUMA: u32 = 5;

/// Default chroma output (oscillation spread) threshold.
pub const DEFAULT_OUTPUT_THRESHOLD_CHROMA: u32 = 6;

/// Default scene-change sensitivity in percent.
pub const DEFAULT_SCENE_THRESHOLD: f64 = 12.0;

/// Default number of output fields computed per scheduler batch.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Field offsets of the oscillation window (p2, p1, s1, n1, n2).
pub const OSCILLATION_WINDOW: [isize; 5] = [-8, -6, -4, -2, 0];

/// Field offsets whose averages corroborate an oscillation.
pub const AVERAGE_WINDOW: [isize; 4] = [-6, -4, -2, 0];

/// Field offsets of the oscillation masks combined for one final mask.
pub const COMBINE_OSCILLATION_WINDOW: [isize; 5] = [-2, 0, 2, 4, 6];

/// Field offsets of the raw fields blended by the final stage.
pub const BLEND_WINDOW: [isize; 5] = [-4, -2, 0, 2, 4];
