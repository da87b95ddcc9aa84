pub mod config;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod index;
pub mod io;
pub mod pipeline;
pub mod planes;
pub mod range;
pub mod render;
pub mod synth;
pub mod zoom;
