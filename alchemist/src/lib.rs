//! The Alchemist - conversational client for the mineral data agent.
//!
//! The chat session core lives in [`chat`]; it reaches the remote agent only
//! through the [`agent::AgentService`] trait. [`auth`] holds the process-wide
//! auth context used by the surrounding pages, [`server`] a development
//! backend, and [`cli`] the terminal front end.

pub mod agent;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod ids;
pub mod models;
pub mod server;
