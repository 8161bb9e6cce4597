use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::{env, near_bindgen, AccountId, PanicOnDefault};

pub use crate::engine::*;
pub use crate::errors::*;
pub use crate::storage::*;

pub mod consts;
mod engine;
mod errors;
pub mod events;
mod storage;

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    /// The single poll managed by this contract.
    pub(crate) poll: PollEngine<LedgerStorage>,
}

// Implement the contract structure
#[near_bindgen]
impl Contract {
    /// Creates an empty poll: no options, not started.
    #[init]
    pub fn new() -> Self {
        Self {
            poll: PollEngine::new(LedgerStorage::new()),
        }
    }

    /**********
     * QUERIES
     **********/

    /// Returns the number of votes for the given option. Can be queried in any
    /// poll status. Fails with `InvalidOption` if the option doesn't exist.
    #[handle_result]
    pub fn get_result(&self, option: OptionId) -> Result<Tally, PollError> {
        self.poll.result(option)
    }

    pub fn status(&self) -> PollStatus {
        self.poll.status()
    }

    /// Returns option labels. The label at position `i` is the option `i+1`.
    pub fn options(&self) -> Vec<String> {
        self.poll.options()
    }

    /// Returns tallies of all options, ordered by option id.
    pub fn results(&self) -> Vec<Tally> {
        self.poll.results()
    }

    pub fn has_voted(&self, account: AccountId) -> bool {
        self.poll.has_voted(&account)
    }

    pub fn voters_count(&self) -> u64 {
        self.poll.voters_count()
    }

    /**********
     * TRANSACTIONS
     **********/

    /// Adds a new option and returns its id (ids start from 1).
    /// Fails with `PollAlreadyStarted` once the poll has been started.
    #[handle_result]
    pub fn add_option(&mut self, label: String) -> Result<OptionId, PollError> {
        let option = self.poll.add_option(label.clone())?;
        events::emit_add_option(option, label);
        Ok(option)
    }

    /// Fails with `PollAlreadyStarted` if the poll is not in the `NotStarted`
    /// status, or with `InsufficientOptions` if there are less than 2 options.
    #[handle_result]
    pub fn start_poll(&mut self) -> Result<(), PollError> {
        self.poll.start_poll()?;
        events::emit_start_poll(self.poll.storage().options_len());
        Ok(())
    }

    /// Casts the caller's vote. Every account can vote only once.
    /// Errors, in the order they are checked:
    /// - `PollNotActive` if the poll is not started or already ended
    /// - `InvalidOption` if the option doesn't exist
    /// - `AlreadyVoted` if the caller already voted
    #[handle_result]
    pub fn vote(&mut self, option: OptionId) -> Result<(), PollError> {
        let voter = env::predecessor_account_id();
        self.poll.vote(&voter, option)?;
        events::emit_vote(voter, option);
        Ok(())
    }

    /// Closes the poll. Tallies are frozen afterwards.
    #[handle_result]
    pub fn end_poll(&mut self) -> Result<(), PollError> {
        self.poll.end_poll()?;
        events::emit_end_poll(self.poll.voters_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use near_sdk::test_utils::{self, accounts, VMContextBuilder};
    use near_sdk::{testing_env, AccountId, VMContext};
    use pretty_assertions::assert_eq;

    use crate::{Contract, PollError, PollStatus};

    fn deployer() -> AccountId {
        AccountId::new_unchecked("poll.near".to_string())
    }

    fn setup(predecessor: &AccountId) -> (VMContext, Contract) {
        let mut ctx = VMContextBuilder::new()
            .predecessor_account_id(deployer())
            .block_timestamp(0)
            .is_view(false)
            .build();
        testing_env!(ctx.clone());
        let ctr = Contract::new();
        ctx.predecessor_account_id = predecessor.clone();
        testing_env!(ctx.clone());
        (ctx, ctr)
    }

    fn with_options(ctr: &mut Contract, labels: &[&str]) -> Result<(), PollError> {
        for l in labels {
            ctr.add_option(l.to_string())?;
        }
        Ok(())
    }

    fn call_as(ctx: &mut VMContext, account: AccountId) {
        ctx.predecessor_account_id = account;
        testing_env!(ctx.clone());
    }

    #[test]
    fn init() {
        let (_, ctr) = setup(&accounts(0));
        assert_eq!(ctr.status(), PollStatus::NotStarted);
        assert_eq!(ctr.options(), Vec::<String>::new());
        assert_eq!(ctr.results(), Vec::<u64>::new());
        assert_eq!(ctr.voters_count(), 0);
        assert_matches!(ctr.get_result(1), Err(PollError::InvalidOption));
    }

    #[test]
    fn flow1() -> Result<(), PollError> {
        let (mut ctx, mut ctr) = setup(&accounts(0));

        assert_eq!(ctr.end_poll(), Err(PollError::PollNotActive));
        assert_eq!(ctr.start_poll(), Err(PollError::InsufficientOptions));
        assert_eq!(ctr.vote(1), Err(PollError::PollNotActive));

        assert_eq!(ctr.add_option("option1".to_string()), Ok(1));
        assert_eq!(ctr.add_option("option2".to_string()), Ok(2));
        ctr.start_poll()?;
        assert_eq!(ctr.status(), PollStatus::Started);

        assert_eq!(
            ctr.add_option("option1".to_string()),
            Err(PollError::PollAlreadyStarted)
        );
        assert_eq!(ctr.vote(4), Err(PollError::InvalidOption));
        ctr.vote(1)?;
        assert_eq!(ctr.vote(2), Err(PollError::AlreadyVoted));
        assert_eq!(ctr.get_result(1), Ok(1));
        assert_eq!(ctr.get_result(2), Ok(0));
        ctr.end_poll()?;

        call_as(&mut ctx, accounts(1));
        assert_eq!(ctr.vote(1), Err(PollError::PollNotActive));
        assert_eq!(ctr.get_result(1), Ok(1));
        assert_eq!(ctr.get_result(2), Ok(0));
        assert_eq!(ctr.status(), PollStatus::Ended);
        assert_eq!(ctr.options(), vec!["option1", "option2"]);

        Ok(())
    }

    #[test]
    fn votes_from_many_accounts() -> Result<(), PollError> {
        let (mut ctx, mut ctr) = setup(&accounts(0));
        with_options(&mut ctr, &["a", "b", "c"])?;
        ctr.start_poll()?;

        for (i, option) in [1, 3, 3, 2, 3].into_iter().enumerate() {
            call_as(&mut ctx, accounts(i));
            ctr.vote(option)?;
        }
        assert_eq!(ctr.results(), vec![1, 1, 3]);
        assert_eq!(ctr.voters_count(), 5);
        assert!(ctr.has_voted(accounts(4)));
        assert!(!ctr.has_voted(accounts(5)));

        call_as(&mut ctx, accounts(2));
        assert_eq!(ctr.vote(1), Err(PollError::AlreadyVoted));
        assert_eq!(ctr.results(), vec![1, 1, 3]);
        assert_eq!(ctr.voters_count(), 5);
        Ok(())
    }

    #[test]
    fn start_twice() -> Result<(), PollError> {
        let (_, mut ctr) = setup(&accounts(0));
        with_options(&mut ctr, &["a", "b"])?;
        ctr.start_poll()?;
        assert_eq!(ctr.start_poll(), Err(PollError::PollAlreadyStarted));
        ctr.end_poll()?;
        assert_eq!(ctr.start_poll(), Err(PollError::PollAlreadyStarted));
        assert_eq!(ctr.end_poll(), Err(PollError::PollNotActive));
        Ok(())
    }

    #[test]
    fn events() -> Result<(), PollError> {
        let (mut ctx, mut ctr) = setup(&accounts(0));
        with_options(&mut ctr, &["yes", "no"])?;
        ctr.start_poll()?;
        // failed calls don't emit anything
        assert_eq!(
            ctr.add_option("maybe".to_string()),
            Err(PollError::PollAlreadyStarted)
        );
        ctr.vote(2)?;
        assert_eq!(ctr.vote(2), Err(PollError::AlreadyVoted));
        ctr.end_poll()?;

        assert_eq!(
            test_utils::get_logs(),
            vec![
                r#"EVENT_JSON:{"standard":"poll","version":"1.0.0","event":"add_option","data":{"option":1,"label":"yes"}}"#,
                r#"EVENT_JSON:{"standard":"poll","version":"1.0.0","event":"add_option","data":{"option":2,"label":"no"}}"#,
                r#"EVENT_JSON:{"standard":"poll","version":"1.0.0","event":"start_poll","data":{"options":2}}"#,
                r#"EVENT_JSON:{"standard":"poll","version":"1.0.0","event":"vote","data":{"voter":"alice","option":2}}"#,
                r#"EVENT_JSON:{"standard":"poll","version":"1.0.0","event":"end_poll","data":{"voters":1}}"#,
            ]
        );

        call_as(&mut ctx, accounts(1));
        assert_eq!(ctr.vote(1), Err(PollError::PollNotActive));
        assert!(test_utils::get_logs().is_empty());
        Ok(())
    }
}
