//! Client library for the Agro Youth learning platform.
//!
//! The authority (the platform backend) owns all durable state; this crate
//! holds the typed API client, the enrollment lifecycle workflow, and the
//! certificate retrieval/verification workflow, plus the text renderer the
//! `agro` binary uses.

pub mod api;
pub mod certificate;
pub mod cli;
pub mod config;
pub mod enrollment;
pub mod model;
pub mod render;
pub mod session;
pub mod workflow;
