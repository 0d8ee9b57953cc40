use super::Settings;
use crate::output::print_json;
use anyhow::Context;
use pastebox_core::action::IdentityQuery;
use pastebox_core::poller::Poller;
use pastebox_core::schedule::{Cycles, Ticker};
use pastebox_core::slot::SlotId;
use pastebox_core::store::HttpStore;

pub fn run(
    settings: &Settings,
    slot: Option<String>,
    interval: Option<u64>,
    once: bool,
) -> anyhow::Result<()> {
    let mut config = settings.load_config()?;
    if let Some(slot) = slot {
        config.poller.command_slot = Some(slot);
    }
    if let Some(secs) = interval {
        config.poller.interval_secs = secs;
    }

    let command_slot = SlotId::new(config.command_slot()?);
    let store = HttpStore::new(&config.store).context("failed to set up store client")?;
    let poller = Poller::new(store, IdentityQuery::new(), command_slot, &config.poller);

    let summary = if once {
        poller.run(&mut Cycles::once())
    } else {
        // The handle lives until the loop ends; the process is stopped by signal.
        let (mut ticker, _handle) = Ticker::new(config.poller.interval());
        poller.run(&mut ticker)
    };

    if settings.json {
        print_json(&summary)?;
    } else {
        println!(
            "Polled {} time(s): {} executed, {} published, {} fetch failure(s), {} publish failure(s)",
            summary.cycles,
            summary.executed,
            summary.published,
            summary.fetch_failures,
            summary.publish_failures
        );
    }

    Ok(())
}
