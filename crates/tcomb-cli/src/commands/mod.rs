pub mod config;
pub mod info;
pub mod pipeline;
pub mod preview;
