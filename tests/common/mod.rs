//! Shared utilities for integration tests.

pub mod harness;

use serde_json::Value;

/// Extracts the `data` payload of a JSON command output.
#[allow(dead_code)]
pub fn data(output: &Value) -> &Value {
    output.get("data").expect("JSON output has a data field")
}
