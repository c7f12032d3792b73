pub mod combine;
pub mod masks;
pub mod morphology;
pub mod motion;
pub mod oscillation;
pub mod scene_change;

pub use combine::{combine_masks, CombineInputs};
pub use motion::build_motion_mask;
pub use oscillation::{check_oscillation5, clear_uncorrelated};
pub use scene_change::SceneChangeDetector;
