use anchor_lang::prelude::Pubkey;
use raffle::error::RaffleError;
use thiserror::Error;

/// Submission failures that clear up on their own and are worth another attempt.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    #[error("blockhash not found")]
    StaleBlockhash,
    #[error("transaction was not confirmed in time")]
    Unconfirmed,
    #[error("node is behind")]
    NodeBehind,
    #[error("request timed out")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("connection failed")]
    Network,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("randomness is not settled yet")]
    NotYetSettled,
    #[error("randomness is too old to reveal")]
    TooOld,
    #[error("oracle request failed: {0}")]
    Request(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeeperError {
    #[error("transient failure: {0}")]
    Transient(#[from] TransientKind),

    #[error("rpc error: {0}")]
    Rpc(String),

    /// Rejected by the raffle program. Holds the program error name.
    #[error("program error: {0}")]
    Program(String),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<KeeperError> },
}

const TRANSIENT_MARKERS: &[(&str, TransientKind)] = &[
    ("Blockhash not found", TransientKind::StaleBlockhash),
    ("block height exceeded", TransientKind::StaleBlockhash),
    ("Transaction was not confirmed", TransientKind::Unconfirmed),
    ("Node is behind", TransientKind::NodeBehind),
    ("Timed out", TransientKind::Timeout),
    ("429", TransientKind::RateLimited),
    ("ECONNRESET", TransientKind::Network),
    ("fetch failed", TransientKind::Network),
];

impl KeeperError {
    /// Classifies a raw transport or simulation message.
    pub fn from_rpc_message(message: &str) -> Self {
        if let Some((_, kind)) = TRANSIENT_MARKERS
            .iter()
            .find(|(marker, _)| message.contains(marker))
        {
            return KeeperError::Transient(*kind);
        }
        if message.contains("custom program error") || message.contains("AnchorError") {
            return KeeperError::Program(message.to_string());
        }
        KeeperError::Rpc(message.to_string())
    }

    pub fn program(error: RaffleError) -> Self {
        KeeperError::Program(error.name())
    }

    /// Transient submission failures, and randomness the oracle has not revealed yet.
    pub fn is_retryable(&self) -> bool {
        match self {
            KeeperError::Transient(_) | KeeperError::Oracle(OracleError::NotYetSettled) => true,
            KeeperError::Program(name) => name == &RaffleError::RandomnessNotResolved.name(),
            _ => false,
        }
    }

    /// The bound randomness can no longer be revealed and a fresh request is needed.
    pub fn is_stale_randomness(&self) -> bool {
        match self {
            KeeperError::Oracle(OracleError::TooOld) => true,
            KeeperError::Program(name) => name == &RaffleError::RandomnessTooOld.name(),
            _ => false,
        }
    }
}

impl From<anchor_lang::error::Error> for KeeperError {
    fn from(error: anchor_lang::error::Error) -> Self {
        match error {
            anchor_lang::error::Error::AnchorError(e) => KeeperError::Program(e.error_name),
            anchor_lang::error::Error::ProgramError(e) => {
                KeeperError::Program(e.program_error.to_string())
            }
        }
    }
}
