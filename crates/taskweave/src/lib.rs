//! Taskweave - dependency-aware task tracking.
//!
//! Tasks form a directed dependency graph. The [`graph`] engine keeps that
//! graph acyclic (every new edge is checked first) and derives each task's
//! status from its dependencies, cascading changes to dependents. The
//! [`engine`] module exposes the operations a front end calls; the CLI in
//! [`cli`] is one such front end.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod engine;
pub mod error;
pub mod graph;
pub mod storage;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod output;

// Command implementations
pub mod commands;

pub mod config;
