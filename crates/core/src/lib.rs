//! Core library: configuration, title normalization, scanning and the cull pipeline.

pub mod config;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod scanner;
