//! Quarry CLI - Command-line interface for Quarry.
//!
//! This crate provides the `quarry` tool for inspecting schema files and
//! compiling query parameters into filter trees.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
