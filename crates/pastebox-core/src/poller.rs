//! The command poller.
//!
//! Each cycle reads the command slot. When the text is exactly [`SENTINEL`],
//! the local action runs once and its output (or its error description) is
//! published to a new slot. Every failure is logged and the loop carries on;
//! only the [`Schedule`] ends it.

use crate::action::LocalAction;
use crate::config::{Expiry, PollerConfig};
use crate::schedule::Schedule;
use crate::slot::SlotId;
use crate::store::{Paste, TextStore};
use serde::Serialize;
use tracing::{debug, info, warn};

/// The only command text with defined behaviour.
pub const SENTINEL: &str = "run";

/// What happened during one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The command slot could not be read; nothing else happened.
    FetchFailed { reason: String },
    /// The command was not the sentinel; nothing else happened.
    Inert,
    /// The action ran and its result was published.
    Published { slot: SlotId, action_failed: bool },
    /// The action ran but the result could not be published.
    PublishFailed { reason: String, action_failed: bool },
}

impl CycleOutcome {
    pub fn executed(&self) -> bool {
        matches!(
            self,
            CycleOutcome::Published { .. } | CycleOutcome::PublishFailed { .. }
        )
    }
}

/// Totals over a whole [`Poller::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub cycles: u64,
    pub fetch_failures: u64,
    pub executed: u64,
    pub action_failures: u64,
    pub published: u64,
    pub publish_failures: u64,
}

impl PollSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::FetchFailed { .. } => self.fetch_failures += 1,
            CycleOutcome::Inert => {}
            CycleOutcome::Published { action_failed, .. } => {
                self.executed += 1;
                self.published += 1;
                self.action_failures += u64::from(*action_failed);
            }
            CycleOutcome::PublishFailed { action_failed, .. } => {
                self.executed += 1;
                self.publish_failures += 1;
                self.action_failures += u64::from(*action_failed);
            }
        }
    }
}

pub struct Poller<S, A> {
    store: S,
    action: A,
    command_slot: SlotId,
    result_name: String,
    result_expiry: Expiry,
}

impl<S: TextStore, A: LocalAction> Poller<S, A> {
    pub fn new(store: S, action: A, command_slot: SlotId, config: &PollerConfig) -> Self {
        Self {
            store,
            action,
            command_slot,
            result_name: config.result_name.clone(),
            result_expiry: config.result_expiry,
        }
    }

    pub fn command_slot(&self) -> &SlotId {
        &self.command_slot
    }

    /// Run one fetch / execute / publish cycle. Never fails.
    pub fn run_cycle(&self) -> CycleOutcome {
        let command = match self.store.read(&self.command_slot) {
            Ok(text) => text,
            Err(e) => {
                warn!(slot = %self.command_slot, "error fetching command: {e}");
                return CycleOutcome::FetchFailed {
                    reason: e.to_string(),
                };
            }
        };

        if command != SENTINEL {
            debug!(command = %command.escape_debug(), "no command to run");
            return CycleOutcome::Inert;
        }

        info!(
            "command '{SENTINEL}' received, executing '{}'",
            self.action.name()
        );
        let (text, action_failed) = match self.action.execute() {
            Ok(output) => (output, false),
            Err(e) => {
                warn!("{e}");
                (e.to_string(), true)
            }
        };

        let paste = Paste {
            text,
            name: self.result_name.clone(),
            expiry: self.result_expiry,
        };
        match self.store.create(&paste) {
            Ok(created) => {
                info!(slot = %created.slot, "result posted: {}", created.url);
                CycleOutcome::Published {
                    slot: created.slot,
                    action_failed,
                }
            }
            Err(e) => {
                warn!("failed to post result: {e}");
                CycleOutcome::PublishFailed {
                    reason: e.to_string(),
                    action_failed,
                }
            }
        }
    }

    /// Run cycles until `schedule` stops. The first cycle runs immediately.
    pub fn run(&self, schedule: &mut impl Schedule) -> PollSummary {
        info!(slot = %self.command_slot, "poller started, monitoring for commands");
        let mut summary = PollSummary::default();
        loop {
            let outcome = self.run_cycle();
            summary.record(&outcome);
            if !schedule.wait() {
                break;
            }
        }
        info!(cycles = summary.cycles, "poller stopped");
        summary
    }
}
