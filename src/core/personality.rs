// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/personality.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the pool personalities served by the mock pool, located in
// the core subdirectory. A personality bundles the protocol-tuning parameters
// observed on a specific pool operator (extranonce layout, version mask, job
// cadence, difficulty) and the selector decides which one a connection gets.
//
// Tree Location:
// - src/core/personality.rs (personality profiles and selection)
// - Depends on: std, crate::core::types

use crate::core::types::PersonalityKind;
use std::sync::Arc;
use std::time::Duration;

/// When the job scheduler replaces extranonce1 mid-session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtranonceRotation {
    /// extranonce1 stays fixed for the whole session
    None,

    /// A fresh random extranonce1 is pushed before every `n`th job
    EveryNthJob {
        n: u64,
        /// Length of the regenerated extranonce1 in bytes
        extranonce1_bytes: usize,
    },
}

impl ExtranonceRotation {
    /// Whether the policy fires for the given 1-based job number
    pub fn fires_on(&self, job_number: u64) -> bool {
        match *self {
            ExtranonceRotation::None => false,
            ExtranonceRotation::EveryNthJob { n, .. } => n > 0 && job_number > 0 && job_number % n == 0,
        }
    }
}

/// Immutable profile a session is bound to for its whole lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct Personality {
    /// Short name used in logs (e.g. "mrr", "nicehash")
    pub name: &'static str,

    /// Initial extranonce1 as lowercase hex
    pub extranonce1: String,

    /// Initial extranonce2 size in bytes
    pub extranonce2_size: usize,

    /// Version-rolling mask returned from mining.configure
    pub version_mask: u32,

    /// Delay between periodic job notifications
    pub job_interval: Duration,

    /// Difficulty pushed with mining.set_difficulty after authorize
    pub base_difficulty: u64,

    /// Mid-session extranonce replacement policy
    pub rotation: ExtranonceRotation,

    /// Push mining.set_extranonce right after the extranonce.subscribe ack
    pub announce_extranonce: bool,
}

impl Personality {
    /// MiningRigRentals-like profile: fixed 4-byte extranonce1, slow jobs
    pub fn mrr() -> Self {
        Self {
            name: "mrr",
            extranonce1: "8000845a".to_string(),
            extranonce2_size: 4,
            version_mask: 0x1fffe000,
            job_interval: Duration::from_secs(10),
            base_difficulty: 65536,
            rotation: ExtranonceRotation::None,
            announce_extranonce: false,
        }
    }

    /// NiceHash-like profile: wide extranonce, fast jobs, rotation every 4th job
    pub fn nicehash() -> Self {
        Self {
            name: "nicehash",
            extranonce1: "deadbeefcafebabe".to_string(),
            extranonce2_size: 8,
            version_mask: 0xffffffff,
            job_interval: Duration::from_secs(3),
            base_difficulty: 300,
            rotation: ExtranonceRotation::EveryNthJob {
                n: 4,
                extranonce1_bytes: 8,
            },
            announce_extranonce: true,
        }
    }

    /// Version mask as sent on the wire (8 lowercase hex digits)
    pub fn version_mask_hex(&self) -> String {
        format!("{:08x}", self.version_mask)
    }
}

/// Strategy mapping a connection ordinal to a personality.
///
/// Implementations must be pure: the same ordinal always yields the same
/// profile, and no state is shared between calls.
pub trait PersonalitySelector: Send + Sync {
    fn select(&self, ordinal: u64) -> Personality;
}

/// Alternates between two profiles by ordinal parity (even first)
#[derive(Debug, Clone)]
pub struct ParitySelector {
    even: Personality,
    odd: Personality,
}

impl ParitySelector {
    pub fn new(even: Personality, odd: Personality) -> Self {
        Self { even, odd }
    }
}

impl Default for ParitySelector {
    fn default() -> Self {
        Self::new(Personality::mrr(), Personality::nicehash())
    }
}

impl PersonalitySelector for ParitySelector {
    fn select(&self, ordinal: u64) -> Personality {
        if ordinal % 2 == 0 {
            self.even.clone()
        } else {
            self.odd.clone()
        }
    }
}

/// Always hands out the same profile
#[derive(Debug, Clone)]
pub struct FixedSelector(Personality);

impl FixedSelector {
    pub fn new(personality: Personality) -> Self {
        Self(personality)
    }
}

impl PersonalitySelector for FixedSelector {
    fn select(&self, _ordinal: u64) -> Personality {
        self.0.clone()
    }
}

/// Build the selector for a command-line personality choice
pub fn selector_for(kind: PersonalityKind) -> Arc<dyn PersonalitySelector> {
    match kind {
        PersonalityKind::Alternate => Arc::new(ParitySelector::default()),
        PersonalityKind::Mrr => Arc::new(FixedSelector::new(Personality::mrr())),
        PersonalityKind::Nicehash => Arc::new(FixedSelector::new(Personality::nicehash())),
    }
}


// Changelog:
// - v1.1.0 (2026-10-16): Made selection pluggable.
//   - Added PersonalitySelector trait with ParitySelector and FixedSelector.
//   - Added selector_for to map the --personality flag to a selector.
// - v1.0.0 (2026-10-14): Initial MRR / NiceHash profiles.
