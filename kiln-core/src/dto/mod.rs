//! Data Transfer Objects (DTOs)
//!
//! Request and response bodies exchanged with the sandbox provider API.
//! Field names follow the provider's camelCase wire format.

pub mod template;
