//! Domain models for Kiln
//!
//! Core business entities shared by the client and the pipeline step.

pub mod alias;
pub mod log;
pub mod template;
