//! SDK Error types

use thiserror::Error;

/// SDK errors
#[derive(Error, Debug)]
pub enum PercolatorSdkError {
    /// Buffer ends before the region being read. Re-fetch the slab.
    #[error("Truncated buffer: need {needed} bytes, have {actual}")]
    TruncatedBuffer { needed: usize, actual: usize },

    #[error("Index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Occupied record with a kind byte we do not know. Corrupt slab or layout mismatch.
    #[error("Unknown account kind {tag} at index {index}")]
    UnknownAccountKind { index: usize, tag: u8 },

    #[error("Value {value} does not fit {target}")]
    ValueOutOfRange { value: String, target: &'static str },

    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("Invalid slab magic: {found:#018x}")]
    InvalidMagic { found: u64 },

    #[error("Unknown instruction tag {tag}")]
    UnknownInstruction { tag: u8 },

    /// Payload has the right tag and length but does not decode.
    #[error("Invalid instruction data: {0}")]
    InvalidInstructionData(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, PercolatorSdkError>;
