pub mod error;
pub mod generator;
pub mod minify;
pub mod render;
