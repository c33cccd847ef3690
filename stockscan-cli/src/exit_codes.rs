//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts and CI systems to handle errors appropriately.

use stockscan_core::ScanError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (invalid arguments, bad input data).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Service unavailable (scan server, asset store).
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const NETWORK_ERROR: i32 = 69;

/// I/O error (cannot write output file).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Token missing, invalid, or without the admin capability.
/// Maps to EX_NOPERM from sysexits.h.
pub const PERMISSION_DENIED: i32 = 77;

/// Represents an exit code with optional error context.
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Typed errors first, then the context messages attached by commands
        let code = match err.chain().find_map(|e| e.downcast_ref::<ScanError>()) {
            Some(scan_error) => code_for_scan_error(scan_error),
            None if message.contains("Failed to read") => INPUT_ERROR,
            None if message.contains("Failed to write") => IO_ERROR,
            None if message.contains("Failed to parse") || message.contains("requires --server") => {
                USAGE_ERROR
            }
            None => GENERAL_ERROR,
        };

        Self {
            code,
            message: Some(message),
        }
    }
}

fn code_for_scan_error(err: &ScanError) -> i32 {
    match err {
        ScanError::Unauthorized(_) => PERMISSION_DENIED,
        ScanError::InvalidInput(_)
        | ScanError::InvalidPattern { .. }
        | ScanError::InvalidConfig(_) => USAGE_ERROR,
        ScanError::StoreUnavailable(_) | ScanError::Transport(_) => NETWORK_ERROR,
        ScanError::Export(_) => IO_ERROR,
    }
}
