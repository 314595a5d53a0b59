//! Command implementations. Results are printed to stdout as JSON.

pub mod contacts;
pub mod oauth;

use serde::Serialize;

use crate::error::{BridgeError, BridgeResult};

/// Prints a value as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> BridgeResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BridgeError::server(format!("failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
