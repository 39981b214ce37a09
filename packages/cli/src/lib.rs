#![allow(clippy::uninlined_format_args)]
pub mod args;
pub mod command;
pub mod config;
pub mod display;
