//! Readable vs. disguised naming, side by side.
//!
//! Both variants print the same three lines. The encoded one keeps its key as
//! base64 and decodes it at runtime; nothing else differs.

use crate::error::{PasteboxError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::Write;
use std::time::Duration;

pub const SECRET_KEY: &str = "This is a very secret key.";

const INPUT: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Plain,
    Encoded,
}

pub fn calculate_something(input_value: i64) -> i64 {
    input_value * 2
}

mod encoded {
    pub(super) const S: &[u8] = b"VGhpcyBpcyBhIHZlcnkgc2VjcmV0IGtleS4=";

    pub(super) fn c(i: i64) -> i64 {
        i * 2
    }
}

/// Decode the base64 key used by the encoded variant.
pub fn decode_key() -> Result<String> {
    let bytes = STANDARD
        .decode(encoded::S)
        .map_err(|e| PasteboxError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PasteboxError::Decode(e.to_string()))
}

/// Print the demo output for `variant` to `out`, pausing `pause` after the
/// first line.
pub fn run(variant: Variant, pause: Duration, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Starting application logic...")?;
    std::thread::sleep(pause);

    let (key, value) = match variant {
        Variant::Plain => (SECRET_KEY.to_string(), calculate_something(INPUT)),
        Variant::Encoded => (decode_key()?, encoded::c(INPUT)),
    };

    writeln!(out, "Key: {key}")?;
    writeln!(out, "Result: {value}")?;
    Ok(())
}
