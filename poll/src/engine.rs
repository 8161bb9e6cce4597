use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::AccountId;

use crate::consts::MIN_OPTIONS;
use crate::{OptionId, PollError, PollStatus, PollStorage, Tally};

/// Poll lifecycle state machine: NotStarted -> Started -> Ended.
///
/// Every operation validates all of its preconditions before touching the
/// storage, so a rejected call never leaves a partial write behind.
#[derive(BorshDeserialize, BorshSerialize)]
pub struct PollEngine<S> {
    storage: S,
}

impl<S: PollStorage> PollEngine<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /**********
     * QUERIES
     **********/

    pub fn status(&self) -> PollStatus {
        self.storage.status()
    }

    /// Returns the number of votes for `option` in any poll status.
    pub fn result(&self, option: OptionId) -> Result<Tally, PollError> {
        self.check_option(option)?;
        Ok(self.storage.tally(option))
    }

    /// Option labels ordered by option id.
    pub fn options(&self) -> Vec<String> {
        (1..=self.storage.options_len())
            .filter_map(|id| self.storage.option(id))
            .collect()
    }

    /// Tallies ordered by option id.
    pub fn results(&self) -> Vec<Tally> {
        (1..=self.storage.options_len())
            .map(|id| self.storage.tally(id))
            .collect()
    }

    pub fn has_voted(&self, voter: &AccountId) -> bool {
        self.storage.has_voted(voter)
    }

    pub fn voters_count(&self) -> u64 {
        self.storage.voters_count()
    }

    /**********
     * TRANSITIONS
     **********/

    /// Appends a new option and returns its id. Duplicated labels are allowed.
    pub fn add_option(&mut self, label: String) -> Result<OptionId, PollError> {
        if self.storage.status() != PollStatus::NotStarted {
            return Err(PollError::PollAlreadyStarted);
        }
        Ok(self.storage.push_option(label))
    }

    /// The status is checked before the number of options: starting a poll
    /// which already started fails with `PollAlreadyStarted`.
    pub fn start_poll(&mut self) -> Result<(), PollError> {
        if self.storage.status() != PollStatus::NotStarted {
            return Err(PollError::PollAlreadyStarted);
        }
        if self.storage.options_len() < MIN_OPTIONS {
            return Err(PollError::InsufficientOptions);
        }
        self.storage.set_status(PollStatus::Started);
        Ok(())
    }

    pub fn vote(&mut self, voter: &AccountId, option: OptionId) -> Result<(), PollError> {
        if self.storage.status() != PollStatus::Started {
            return Err(PollError::PollNotActive);
        }
        self.check_option(option)?;
        if self.storage.has_voted(voter) {
            return Err(PollError::AlreadyVoted);
        }
        self.storage.record_vote(voter, option);
        Ok(())
    }

    pub fn end_poll(&mut self) -> Result<(), PollError> {
        if self.storage.status() != PollStatus::Started {
            return Err(PollError::PollNotActive);
        }
        self.storage.set_status(PollStatus::Ended);
        Ok(())
    }

    fn check_option(&self, option: OptionId) -> Result<(), PollError> {
        if option == 0 || option > self.storage.options_len() {
            return Err(PollError::InvalidOption);
        }
        Ok(())
    }
}
