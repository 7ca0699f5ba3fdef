//! Infrastructure implementations of the domain ports.

pub mod identity;
pub mod postgrest;
pub mod session;

pub use identity::ProviderIdentityGateway;
pub use postgrest::PostgrestProfileRepository;
pub use session::{FileSessionStore, MemorySessionStore};
