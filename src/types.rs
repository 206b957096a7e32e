//! Core type definitions for the transcript registry.
//!
//! This module contains the data structures shared across the registry:
//! principals, transcript records, the update-audit record, registry
//! configuration, and the error enum carrying the contract's numeric
//! error codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on transcript metadata length, in characters.
pub const MAX_METADATA_LEN: usize = 200;

/// Upper bound on the number of course codes per transcript.
pub const MAX_COURSES: usize = 10;

/// Upper bound on the stored GPA value (GPA x10, so 40 means 4.0).
pub const MAX_GPA: i64 = 40;

/// Number of back-references retained per owner; older entries are dropped.
pub const OWNER_INDEX_CAP: usize = 100;

/// The reserved burn address. The authority contract may never be bound to it.
pub const BURN_PRINCIPAL: &str = "SP000000000000000000002Q6VF78";

/// Failure modes of the registry operations.
///
/// Variants that exist on the wire carry a stable numeric code (see
/// [`RegistryError::code`]); callers asserting against the contract must
/// match those codes exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("caller is not a verified authority")]
    NotAuthorized,
    #[error("transcript id already exists")]
    AlreadyExists,
    #[error("transcript not found")]
    NotFound,
    #[error("metadata must be 1-{MAX_METADATA_LEN} characters")]
    InvalidMetadata,
    #[error("owner may not equal the issuing institution")]
    InvalidOwner,
    #[error("invalid institution principal")]
    InvalidInstitution,
    #[error("transcript already revoked")]
    AlreadyRevoked,
    #[error("revoked transcripts cannot be updated")]
    UpdateNotAllowed,
    #[error("registry is at capacity")]
    MaxCapacityExceeded,
    #[error("degree must be Bachelor, Master, or PhD")]
    InvalidDegree,
    #[error("gpa must be within 0-{MAX_GPA}")]
    InvalidGpa,
    #[error("at most {MAX_COURSES} courses per transcript")]
    InvalidCourses,
    #[error("no authority contract configured")]
    NotConfigured,
    #[error("authority contract already configured")]
    AlreadyConfigured,
    #[error("update rejected")]
    InvalidUpdate,
}

impl RegistryError {
    /// The numeric error code as exposed by the on-chain contract, or
    /// `None` for the failures the contract reports as a bare `false`
    /// (re-configuration attempts and update-payload validation).
    ///
    /// Code 108 is unassigned in the contract and deliberately absent here.
    pub fn code(&self) -> Option<u16> {
        match self {
            RegistryError::NotAuthorized => Some(100),
            RegistryError::AlreadyExists => Some(101),
            RegistryError::NotFound => Some(102),
            RegistryError::InvalidMetadata => Some(103),
            RegistryError::InvalidOwner => Some(104),
            RegistryError::InvalidInstitution => Some(105),
            RegistryError::AlreadyRevoked => Some(106),
            RegistryError::UpdateNotAllowed => Some(107),
            RegistryError::MaxCapacityExceeded => Some(109),
            RegistryError::InvalidDegree => Some(110),
            RegistryError::InvalidGpa => Some(111),
            RegistryError::InvalidCourses => Some(112),
            RegistryError::NotConfigured => Some(113),
            RegistryError::AlreadyConfigured | RegistryError::InvalidUpdate => None,
        }
    }
}

/// A chain principal (wallet or contract address, e.g. `"ST1TEST"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    pub fn new(address: impl Into<String>) -> Self {
        Principal(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved burn address.
    pub fn is_burn(&self) -> bool {
        self.0 == BURN_PRINCIPAL
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(address: &str) -> Self {
        Principal(address.to_string())
    }
}

impl From<String> for Principal {
    fn from(address: String) -> Self {
        Principal(address)
    }
}

/// The degrees a transcript may certify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    Bachelor,
    Master,
    PhD,
}

impl Degree {
    /// Parse the contract's string representation. Issuance takes the
    /// degree as a string so an unknown value surfaces as
    /// [`RegistryError::InvalidDegree`] at its slot in the validation
    /// order rather than at the call boundary.
    pub fn parse(s: &str) -> Option<Degree> {
        match s {
            "Bachelor" => Some(Degree::Bachelor),
            "Master" => Some(Degree::Master),
            "PhD" => Some(Degree::PhD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Degree::Bachelor => "Bachelor",
            Degree::Master => "Master",
            Degree::PhD => "PhD",
        }
    }
}

impl std::fmt::Display for Degree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issued transcript record.
///
/// Immutable after issuance except for the two controlled mutations:
/// revocation (one-way) and the owner's metadata/gpa update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// The student the transcript belongs to.
    pub owner: Principal,
    /// The issuing institution (the caller at issuance time).
    pub institution: Principal,
    /// Free-text metadata, 1-200 characters.
    pub metadata: String,
    pub degree: Degree,
    /// GPA x10, within 0-40.
    pub gpa: u32,
    /// Course codes, at most 10.
    pub courses: Vec<u32>,
    /// Block height at issuance.
    pub issued_at: u64,
    /// One-way flag; never transitions back to `false`.
    pub revoked: bool,
    /// Mirrors `!revoked`.
    pub status: bool,
}

/// Audit record of the last applied update for a transcript.
///
/// Overwritten on each successful update; no deeper history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    pub update_metadata: String,
    pub update_gpa: u32,
    /// Block height when the update was applied.
    pub update_timestamp: u64,
    /// The caller that applied the update (always the record's owner).
    pub updater: Principal,
}

/// Process-wide registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Capacity bound on total issuances.
    pub max_transcripts: u64,
    /// Fee charged per issuance, transferred to the authority contract.
    pub storage_fee: u64,
    /// Bound exactly once; never cleared or re-bound.
    pub authority_contract: Option<Principal>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            max_transcripts: 500,
            storage_fee: 500,
            authority_contract: None,
        }
    }
}

/// Ambient invocation context, passed explicitly to every state-mutating
/// operation that reads it: the caller identity and the externally supplied
/// logical clock. The registry never advances the block height itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub block_height: u64,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, block_height: u64) -> Self {
        CallContext {
            caller: caller.into(),
            block_height,
        }
    }
}
