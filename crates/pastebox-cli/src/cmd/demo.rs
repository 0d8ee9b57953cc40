use pastebox_core::demo::{self, Variant};
use std::time::Duration;

pub fn run(encoded: bool) -> anyhow::Result<()> {
    let variant = if encoded {
        Variant::Encoded
    } else {
        Variant::Plain
    };
    demo::run(variant, Duration::from_secs(1), &mut std::io::stdout().lock())?;
    Ok(())
}
