//! Platform - External Service Clients
//!
//! Leaf infrastructure for the three remote collaborators plus byte
//! acquisition for media sources:
//! - `postgrest` - column-scoped access to the relational backend
//! - `identity` - the external authentication provider
//! - `storage` - the object-storage bucket holding uploaded media
//! - `fetch` - uniform byte acquisition from remote or local URIs
//!
//! Each module defines the port (an async trait) and the reqwest-backed
//! implementation. Domain crates depend on the ports; only the application
//! entry point constructs the concrete clients.
//!
//! No retries anywhere: a failed call is terminal for that invocation.

pub mod config;
pub mod fetch;
pub mod identity;
pub mod postgrest;
pub mod storage;
