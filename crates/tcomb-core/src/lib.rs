pub mod blend;
pub mod consts;
pub mod detection;
pub mod error;
pub mod fields;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod source;
