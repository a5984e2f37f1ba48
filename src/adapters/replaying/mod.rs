//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;

/// Take the next recorded output for a port and method.
///
/// # Errors
///
/// Returns an error if the cassette holds no further interaction for the pair.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().map_err(|e| format!("Replayer lock poisoned: {e}"))?;
    guard.next_interaction(port, method).map(|i| i.output)
}

/// Decode a replayed output as `Result<T, String>`.
///
/// Outputs without an `Ok`/`Err` wrapper are decoded as a bare `T`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, String> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(err_val.as_str().unwrap_or("replayed error").to_string());
    }
    let value = match output.get("Ok").or_else(|| output.get("ok")) {
        Some(ok_val) => ok_val.clone(),
        None => output,
    };
    serde_json::from_value(value).map_err(|e| format!("Malformed recorded output: {e}"))
}
