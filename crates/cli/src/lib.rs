//! Public library modules for the CLI crate
pub mod apply;
pub mod fs_apply;
