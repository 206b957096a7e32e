//! The transcript registry state machine.
//!
//! All registry state lives in [`TranscriptRegistry`] and every mutation is
//! funneled through its operations. Each operation validates against the
//! current snapshot before touching anything, so a failed call never leaves
//! partial state behind. The execution model is strictly sequential; the
//! `&mut self` receiver on every mutating operation is the whole locking
//! story.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::authority::{AuthorityOracle, Transfer, ValueTransferLedger};
use crate::types::{
    CallContext, Degree, Principal, RegistryConfig, RegistryError, Transcript, TranscriptUpdate,
    MAX_COURSES, MAX_GPA, MAX_METADATA_LEN, OWNER_INDEX_CAP,
};

/// Registry of academic transcripts issued by verified institutions.
///
/// Holds the issuance counter, the record table, the per-owner
/// back-reference index, and the update-audit table. Collaborators are
/// injected: the [`AuthorityOracle`] gates issuance and the
/// [`ValueTransferLedger`] receives the storage fee.
pub struct TranscriptRegistry<A: AuthorityOracle, L: ValueTransferLedger> {
    config: RegistryConfig,
    /// Monotonic issuance counter; doubles as the live transcript count.
    next_transcript_id: u64,
    transcripts: BTreeMap<String, Transcript>,
    /// Insertion-ordered back-references per owner, newest 100 kept.
    by_owner: BTreeMap<Principal, Vec<String>>,
    /// Last applied update per transcript id.
    updates: BTreeMap<String, TranscriptUpdate>,
    oracle: Arc<A>,
    transfer_ledger: Arc<L>,
}

impl<A: AuthorityOracle, L: ValueTransferLedger> TranscriptRegistry<A, L> {
    pub fn new(oracle: Arc<A>, transfer_ledger: Arc<L>) -> Self {
        Self::with_config(RegistryConfig::default(), oracle, transfer_ledger)
    }

    pub fn with_config(config: RegistryConfig, oracle: Arc<A>, transfer_ledger: Arc<L>) -> Self {
        TranscriptRegistry {
            config,
            next_transcript_id: 0,
            transcripts: BTreeMap::new(),
            by_owner: BTreeMap::new(),
            updates: BTreeMap::new(),
            oracle,
            transfer_ledger,
        }
    }

    /// Bind the authority contract. Permanent: there is no unbind or rebind.
    pub fn configure_authority(&mut self, contract: Principal) -> Result<(), RegistryError> {
        if contract.is_burn() {
            return Err(RegistryError::InvalidInstitution);
        }
        if self.config.authority_contract.is_some() {
            return Err(RegistryError::AlreadyConfigured);
        }
        self.config.authority_contract = Some(contract);
        Ok(())
    }

    /// Overwrite the per-issuance storage fee. No bounds check on the fee
    /// itself; only requires the authority contract to be bound first.
    pub fn set_storage_fee(&mut self, new_fee: u64) -> Result<(), RegistryError> {
        if self.config.authority_contract.is_none() {
            return Err(RegistryError::NotConfigured);
        }
        self.config.storage_fee = new_fee;
        Ok(())
    }

    /// Issue a new transcript as `ctx.caller`.
    ///
    /// Checks run in a fixed order and the first failure wins; callers
    /// observe the order through the returned code, so it must not change.
    /// No state is touched (including the fee transfer) until every check
    /// has passed.
    pub fn issue_transcript(
        &mut self,
        ctx: &CallContext,
        transcript_id: &str,
        owner: Principal,
        metadata: &str,
        degree: &str,
        gpa: i64,
        courses: &[u32],
    ) -> Result<(), RegistryError> {
        if self.next_transcript_id >= self.config.max_transcripts {
            return Err(RegistryError::MaxCapacityExceeded);
        }
        if metadata.is_empty() || metadata.chars().count() > MAX_METADATA_LEN {
            return Err(RegistryError::InvalidMetadata);
        }
        if owner == ctx.caller {
            return Err(RegistryError::InvalidOwner);
        }
        let degree = Degree::parse(degree).ok_or(RegistryError::InvalidDegree)?;
        if !(0..=MAX_GPA).contains(&gpa) {
            return Err(RegistryError::InvalidGpa);
        }
        if courses.len() > MAX_COURSES {
            return Err(RegistryError::InvalidCourses);
        }
        if self.transcripts.contains_key(transcript_id) {
            return Err(RegistryError::AlreadyExists);
        }
        if !self.oracle.is_verified_authority(&ctx.caller) {
            return Err(RegistryError::NotAuthorized);
        }
        let authority = self
            .config
            .authority_contract
            .clone()
            .ok_or(RegistryError::NotConfigured)?;

        self.transfer_ledger.record_transfer(Transfer {
            amount: self.config.storage_fee,
            from: ctx.caller.clone(),
            to: authority,
        });

        self.transcripts.insert(
            transcript_id.to_string(),
            Transcript {
                owner: owner.clone(),
                institution: ctx.caller.clone(),
                metadata: metadata.to_string(),
                degree,
                gpa: gpa as u32,
                courses: courses.to_vec(),
                issued_at: ctx.block_height,
                revoked: false,
                status: true,
            },
        );

        let refs = self.by_owner.entry(owner).or_default();
        refs.push(transcript_id.to_string());
        if refs.len() > OWNER_INDEX_CAP {
            let excess = refs.len() - OWNER_INDEX_CAP;
            refs.drain(..excess);
        }

        self.next_transcript_id += 1;
        Ok(())
    }

    /// Look up a transcript. Absence is an ordinary outcome, not an error.
    pub fn get_transcript(&self, transcript_id: &str) -> Option<&Transcript> {
        self.transcripts.get(transcript_id)
    }

    /// Revoke a transcript as `ctx.caller`. Only the issuing institution
    /// may revoke, and revocation is terminal.
    pub fn revoke_transcript(
        &mut self,
        ctx: &CallContext,
        transcript_id: &str,
    ) -> Result<(), RegistryError> {
        let record = self
            .transcripts
            .get_mut(transcript_id)
            .ok_or(RegistryError::NotFound)?;
        if record.institution != ctx.caller {
            return Err(RegistryError::NotAuthorized);
        }
        if record.revoked {
            return Err(RegistryError::AlreadyRevoked);
        }
        record.revoked = true;
        record.status = false;
        Ok(())
    }

    /// Amend a transcript's metadata and gpa as `ctx.caller`.
    ///
    /// Only the record's owner may update (institutions revoke, owners
    /// amend). Payload validation failures return the codeless
    /// [`RegistryError::InvalidUpdate`]: the contract reports these as a
    /// bare `false` rather than a numeric code, and that asymmetry is part
    /// of the observable behavior.
    pub fn update_transcript(
        &mut self,
        ctx: &CallContext,
        transcript_id: &str,
        new_metadata: &str,
        new_gpa: i64,
    ) -> Result<(), RegistryError> {
        let record = self
            .transcripts
            .get_mut(transcript_id)
            .ok_or(RegistryError::NotFound)?;
        if record.owner != ctx.caller {
            return Err(RegistryError::NotAuthorized);
        }
        if record.revoked {
            return Err(RegistryError::UpdateNotAllowed);
        }
        if new_metadata.is_empty() || new_metadata.chars().count() > MAX_METADATA_LEN {
            return Err(RegistryError::InvalidUpdate);
        }
        if !(0..=MAX_GPA).contains(&new_gpa) {
            return Err(RegistryError::InvalidUpdate);
        }

        record.metadata = new_metadata.to_string();
        record.gpa = new_gpa as u32;
        self.updates.insert(
            transcript_id.to_string(),
            TranscriptUpdate {
                update_metadata: new_metadata.to_string(),
                update_gpa: new_gpa as u32,
                update_timestamp: ctx.block_height,
                updater: ctx.caller.clone(),
            },
        );
        Ok(())
    }

    /// Number of successful issuances. Never decremented.
    pub fn transcript_count(&self) -> u64 {
        self.next_transcript_id
    }

    pub fn transcript_exists(&self, transcript_id: &str) -> bool {
        self.transcripts.contains_key(transcript_id)
    }

    /// The audit entry for the last applied update, if any.
    pub fn last_update(&self, transcript_id: &str) -> Option<&TranscriptUpdate> {
        self.updates.get(transcript_id)
    }

    /// The capped back-reference list for an owner, oldest first.
    pub fn transcripts_for_owner(&self, owner: &Principal) -> &[String] {
        self.by_owner.get(owner).map_or(&[], Vec::as_slice)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}
