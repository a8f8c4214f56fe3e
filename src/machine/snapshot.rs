//! RAM snapshot files.
//!
//! A snapshot is the raw RAM bytes: 32768 words, two bytes each, most
//! significant first. Dumping after a run and loading into a fresh machine
//! reproduces the same memory contents.

use crate::machine::{Machine, MachineError, SnapshotPolicy};
use std::path::Path;
use thiserror::Error;

/// Load a RAM snapshot file into `machine`.
///
/// Returns the number of bytes loaded.
pub fn load_ram_file<P: AsRef<Path>>(
    machine: &mut Machine,
    path: P,
    policy: SnapshotPolicy,
) -> Result<usize, SnapshotError> {
    let bytes = std::fs::read(path.as_ref())
        .map_err(|e| SnapshotError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;
    Ok(machine.load_ram(&bytes, policy)?)
}

/// Write the machine's RAM to a snapshot file.
pub fn dump_ram_file<P: AsRef<Path>>(machine: &Machine, path: P) -> Result<(), SnapshotError> {
    write_file(path.as_ref(), machine.ram_bytes())
}

/// Write the machine's ROM image (two bytes per instruction) to a file.
pub fn dump_rom_file<P: AsRef<Path>>(machine: &Machine, path: P) -> Result<(), SnapshotError> {
    write_file(path.as_ref(), machine.rom_bytes())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    std::fs::write(path, bytes)
        .map_err(|e| SnapshotError::IoError(format!("{}: {}", path.display(), e)))
}

/// Errors that can occur reading or writing snapshot files.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error(transparent)]
    Machine(#[from] MachineError),
}
