//! Standard exit codes (BSD sysexits.h compatible)

/// Cross-check or validation of a result failed
pub const FAILED: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (invalid Prüfer sequence or edge list)
pub const DATAERR: i32 = 65;

/// Cannot open input
pub const NOINPUT: i32 = 66;

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
