use std::collections::HashSet;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::{LookupMap, LookupSet, Vector};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{require, AccountId, BorshStorageKey};

/// 1-based position of an option in insertion order.
pub type OptionId = u32;
/// Number of votes cast for a single option.
pub type Tally = u64;

#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq,
)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    #[default]
    NotStarted,
    Started,
    Ended,
}

/// Helper structure for keys of the persistent collections.
#[derive(BorshSerialize, BorshStorageKey)]
pub enum StorageKey {
    Options,
    Tallies,
    Voters,
}

/// Storage port of the poll engine. Implementations only persist what they are
/// told to: every precondition is checked by `PollEngine` before a write.
pub trait PollStorage {
    fn status(&self) -> PollStatus;
    fn set_status(&mut self, status: PollStatus);

    fn options_len(&self) -> u32;
    /// Returns the label of the option, or None if `id` is out of range.
    fn option(&self, id: OptionId) -> Option<String>;
    /// Appends a new option with a zero tally and returns its id.
    fn push_option(&mut self, label: String) -> OptionId;

    /// Returns 0 for unknown options.
    fn tally(&self, id: OptionId) -> Tally;

    fn has_voted(&self, voter: &AccountId) -> bool;
    fn voters_count(&self) -> u64;
    /// Increments the option tally and registers the voter in one step.
    /// `id` must be in `1..=options_len()`.
    fn record_vote(&mut self, voter: &AccountId, id: OptionId);
}

/// Poll storage backed by the contract state and NEAR persistent collections.
#[derive(BorshDeserialize, BorshSerialize)]
pub struct LedgerStorage {
    status: PollStatus,
    options: Vector<String>,
    tallies: LookupMap<OptionId, Tally>,
    voters: LookupSet<AccountId>,
    /// LookupSet doesn't track its size.
    voters_num: u64,
}

impl LedgerStorage {
    pub fn new() -> Self {
        Self {
            status: PollStatus::NotStarted,
            options: Vector::new(StorageKey::Options),
            tallies: LookupMap::new(StorageKey::Tallies),
            voters: LookupSet::new(StorageKey::Voters),
            voters_num: 0,
        }
    }
}

impl PollStorage for LedgerStorage {
    fn status(&self) -> PollStatus {
        self.status
    }

    fn set_status(&mut self, status: PollStatus) {
        self.status = status;
    }

    fn options_len(&self) -> u32 {
        // an option id past u32::MAX can't be pushed, see `push_option`
        u32::try_from(self.options.len()).unwrap_or(OptionId::MAX)
    }

    fn option(&self, id: OptionId) -> Option<String> {
        if id == 0 {
            return None;
        }
        self.options.get(id as u64 - 1)
    }

    fn push_option(&mut self, label: String) -> OptionId {
        require!(self.options_len() < OptionId::MAX, "too many options");
        self.options.push(&label);
        let id = self.options_len();
        self.tallies.insert(&id, &0);
        id
    }

    fn tally(&self, id: OptionId) -> Tally {
        self.tallies.get(&id).unwrap_or(0)
    }

    fn has_voted(&self, voter: &AccountId) -> bool {
        self.voters.contains(voter)
    }

    fn voters_count(&self) -> u64 {
        self.voters_num
    }

    fn record_vote(&mut self, voter: &AccountId, id: OptionId) {
        debug_assert!(id >= 1 && id <= self.options_len(), "option out of range");
        let tally = self.tally(id);
        self.tallies.insert(&id, &(tally + 1));
        self.voters.insert(voter);
        self.voters_num += 1;
    }
}

/// Off-chain poll storage, used to drive the engine without a ledger.
#[derive(Clone, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(PartialEq, Debug))]
pub struct InMemoryStorage {
    status: PollStatus,
    options: Vec<String>,
    tallies: Vec<Tally>,
    voters: HashSet<AccountId>,
}

impl PollStorage for InMemoryStorage {
    fn status(&self) -> PollStatus {
        self.status
    }

    fn set_status(&mut self, status: PollStatus) {
        self.status = status;
    }

    fn options_len(&self) -> u32 {
        u32::try_from(self.options.len()).unwrap_or(OptionId::MAX)
    }

    fn option(&self, id: OptionId) -> Option<String> {
        let idx = (id as usize).checked_sub(1)?;
        self.options.get(idx).cloned()
    }

    fn push_option(&mut self, label: String) -> OptionId {
        require!(self.options_len() < OptionId::MAX, "too many options");
        self.options.push(label);
        self.tallies.push(0);
        self.options_len()
    }

    fn tally(&self, id: OptionId) -> Tally {
        (id as usize)
            .checked_sub(1)
            .and_then(|idx| self.tallies.get(idx))
            .copied()
            .unwrap_or(0)
    }

    fn has_voted(&self, voter: &AccountId) -> bool {
        self.voters.contains(voter)
    }

    fn voters_count(&self) -> u64 {
        self.voters.len() as u64
    }

    fn record_vote(&mut self, voter: &AccountId, id: OptionId) {
        debug_assert!(id >= 1 && id <= self.options_len(), "option out of range");
        self.tallies[id as usize - 1] += 1;
        self.voters.insert(voter.clone());
    }
}
