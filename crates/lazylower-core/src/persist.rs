use crate::builder::Computation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// On-disk form of a computation. The fingerprint is checked on load so a hand-edited or truncated
/// file is rejected instead of being compiled.
#[derive(Debug, Serialize, Deserialize)]
struct StoredComputation {
    fingerprint: String,
    computation: Computation,
}

fn invalid_data(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

pub fn save_computation(computation: &Computation, path: impl AsRef<Path>) -> io::Result<()> {
    let stored = StoredComputation {
        fingerprint: computation.fingerprint(),
        computation: computation.clone(),
    };
    let json = serde_json::to_string_pretty(&stored).map_err(invalid_data)?;
    fs::write(path, json)
}

pub fn load_computation(path: impl AsRef<Path>) -> io::Result<Computation> {
    let json = fs::read_to_string(path)?;
    let stored: StoredComputation = serde_json::from_str(&json).map_err(invalid_data)?;

    let actual = stored.computation.fingerprint();
    if actual != stored.fingerprint {
        return Err(invalid_data(format!(
            "fingerprint mismatch for computation {}: stored {}, computed {}",
            stored.computation.name, stored.fingerprint, actual
        )));
    }
    Ok(stored.computation)
}
