use super::Settings;
use crate::output::print_json;
use anyhow::Context;
use pastebox_core::publisher::{read_command, Publisher};
use pastebox_core::store::HttpStore;
use std::io::Write;

pub fn run(settings: &Settings, text: Option<String>) -> anyhow::Result<()> {
    let config = settings.load_config()?;

    let command = match text {
        Some(t) => t,
        None => {
            // Prompt on stderr so stdout carries only the result.
            eprint!("Enter command to send (e.g., 'run' or 'idle'): ");
            std::io::stderr().flush()?;
            read_command(&mut std::io::stdin().lock()).context("failed to read command")?
        }
    };

    let store = HttpStore::new(&config.store).context("failed to set up store client")?;
    let created = Publisher::new(store, &config.publisher)
        .publish(&command)
        .context("failed to create command")?;

    if settings.json {
        print_json(&created)?;
    } else {
        println!("New command paste created: {}", created.url);
        println!("Point the poller at slot: {}", created.slot);
    }

    Ok(())
}
