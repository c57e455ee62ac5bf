//! Kiln Core
//!
//! Core types and abstractions for building sandbox templates from container images.
//!
//! This crate contains:
//! - Domain types: Alias derivation, build plans, template descriptors, build logs
//! - DTOs: Wire types for the sandbox provider's template API

pub mod domain;
pub mod dto;
