//! Batch driver for the synthetic CMS-1500 generator.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
