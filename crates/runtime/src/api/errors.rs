//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, rejected commands, and
//! command decoding so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use match_core::Rejection;

pub use super::wire::DecodeError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("match controller command channel closed")]
    CommandChannelClosed,

    #[error("match controller reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    /// The command was applied to nothing; the match state is unchanged.
    #[error("command rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl RuntimeError {
    /// Rejections and undecodable commands are expected during a live event
    /// and must never stop the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Decode(_))
    }
}
