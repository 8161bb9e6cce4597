use std::fmt;

use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{env, AccountId};

use crate::consts::{EVENT_STANDARD, EVENT_VERSION};
use crate::OptionId;

/// Poll lifecycle events.
#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
#[serde(crate = "near_sdk::serde")]
pub enum PollEvent {
    AddOption(AddOptionLog),
    StartPoll(StartPollLog),
    Vote(VoteLog),
    EndPoll(EndPollLog),
}

/// Interface to capture data about an event
///
/// Arguments:
/// * `standard`: name of standard, "poll"
/// * `version`: e.g. 1.0.0
/// * `event`: associate event data
#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct EventLog {
    pub standard: String,
    pub version: String,

    // `flatten` to not have "event": {<PollEvent>} in the JSON, just have the contents of {<PollEvent>}.
    #[serde(flatten)]
    pub event: PollEvent,
}

impl From<PollEvent> for EventLog {
    fn from(event: PollEvent) -> Self {
        Self {
            standard: EVENT_STANDARD.to_string(),
            version: EVENT_VERSION.to_string(),
            event,
        }
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "EVENT_JSON:{}",
            &serde_json::to_string(self).map_err(|_| fmt::Error)?
        ))
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct AddOptionLog {
    pub option: OptionId,
    pub label: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct StartPollLog {
    /// number of options the poll was started with
    pub options: u32,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VoteLog {
    pub voter: AccountId,
    pub option: OptionId,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct EndPollLog {
    /// total number of voters
    pub voters: u64,
}

pub(crate) fn emit_event(event: PollEvent) {
    env::log_str(&EventLog::from(event).to_string());
}

pub(crate) fn emit_add_option(option: OptionId, label: String) {
    emit_event(PollEvent::AddOption(AddOptionLog { option, label }));
}

pub(crate) fn emit_start_poll(options: u32) {
    emit_event(PollEvent::StartPoll(StartPollLog { options }));
}

pub(crate) fn emit_vote(voter: AccountId, option: OptionId) {
    emit_event(PollEvent::Vote(VoteLog { voter, option }));
}

pub(crate) fn emit_end_poll(voters: u64) {
    emit_event(PollEvent::EndPoll(EndPollLog { voters }));
}
