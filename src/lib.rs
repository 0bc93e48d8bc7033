//! Run commands and move files in a toolbox container.
//!
//! `toolbox-connection` is a transport for automation engines. Instead of
//! opening a session to a remote host, it drives a named toolbox container
//! on the local machine through two external command-line tools: a
//! container engine (`podman` by default) for file copies and ownership
//! changes, and a toolbox manager (`distrobox` by default) for command
//! execution.
//!
//! # Modules
//!
//! - [`config`]: Configuration with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Executable resolution, argument construction and process spawning
//! - [`connection`]: The [`connection::Transport`] contract and its toolbox implementation
//! - [`api`]: Connect, operate, close orchestration used by the binary
//! - [`error`]: Semantic error types for the library
//! - [`logging`]: Subscriber setup for the binary

pub mod api;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod logging;
