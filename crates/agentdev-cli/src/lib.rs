//! AgentDev CLI library.
//!
//! This crate provides the `agentdev` command line: `serve` runs the API
//! server, and the remaining commands drive a running server through the
//! authenticated client (login, dashboard, projects, agents, chat and
//! artifacts).

pub mod cli;
pub mod commands;
pub mod output;
