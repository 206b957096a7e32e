//! In-memory model of the TranscriptStorage contract: verified institutions
//! issue academic transcripts, institutions revoke them, owners amend them.
//! Validation order and numeric error codes match the on-chain contract.

pub mod authority;
pub mod registry;
pub mod types;

pub use authority::{
    AuthorityOracle, InMemoryTransferLog, StaticAuthoritySet, Transfer, ValueTransferLedger,
};
pub use registry::TranscriptRegistry;
pub use types::{
    CallContext, Degree, Principal, RegistryConfig, RegistryError, Transcript, TranscriptUpdate,
};
