//! envprobe-lib: Core types and logic for envprobe
//!
//! This crate provides everything the `envprobe` binary builds on:
//! - `vartype`: typed environment variables with structural diff and merge
//! - `heuristic`: deciding which type a variable has
//! - `environment`: current versus stamped environment of a shell session
//! - `snapshot`: named, mergeable records of variable changes
//! - `tracking`: which variables take part in snapshots
//! - `shell`: hooking into interactive shells through a control file

pub mod config_file;
pub mod consts;
pub mod environment;
pub mod heuristic;
pub mod lock;
pub mod platform;
pub mod shell;
pub mod snapshot;
pub mod tracking;
pub mod varinfo;
pub mod vartype;
