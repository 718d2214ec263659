//! Queueboard CLI library.
//!
//! This crate provides the command-line interface and interactive REPL
//! for the clinic queue board.

pub mod cli;
pub mod commands;
pub mod render;
pub mod repl;
pub mod seed;
