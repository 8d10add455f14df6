//! Collective communication layer
//!
//! This module defines the three collective operations the histogram protocol is
//! built on, abstracted over a fixed group of participants:
//!
//! - **broadcast** (one-to-all): the coordinator supplies a value, everyone
//!   receives a copy
//! - **scatter** (one-to-all partition): the coordinator supplies the full
//!   dataset, every participant receives its owned, contiguous chunk
//! - **reduce** (all-to-one sum): every participant supplies its counts, only
//!   the coordinator receives the element-wise sum
//!
//! Every collective is a full barrier: a call returns only after every member of
//! the group has entered the matching call. Participants must issue the same
//! sequence of collectives in the same program order; a mismatched sequence
//! deadlocks by design and is not recoverable at runtime.
//!
//! # Serialization Format
//!
//! Payloads cross participant boundaries as bincode frames. The in-process
//! channel transport would not strictly need serialization, but framing keeps
//! the collective operations generic over any serde-compatible payload and
//! keeps the transport swappable.

pub mod channel;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use channel::ChannelCommunicator;

/// Rank of the coordinator within every group
pub const COORDINATOR_RANK: usize = 0;

/// Errors raised by the collective layer
///
/// Any of these is fatal to the whole run: a failed collective on one
/// participant cannot be isolated, because every later step requires universal
/// participation.
#[derive(Debug, Error)]
pub enum CommError {
    /// A peer hung up before the collective completed
    #[error("group link disconnected: a participant exited before the collective completed")]
    Disconnected,

    /// Payload length did not match what the collective requires
    #[error("collective shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The coordinator called a rooted collective without supplying the payload
    #[error("the coordinator must supply the payload for this collective")]
    MissingPayload,

    /// bincode encoding failed
    #[error("failed to encode collective payload")]
    Encode(#[source] bincode::Error),

    /// bincode decoding failed
    #[error("failed to decode collective payload")]
    Decode(#[source] bincode::Error),
}

/// A member's handle onto the group's collective operations
///
/// One communicator is held per participant. `rank` identifies the participant
/// within the group; rank [`COORDINATOR_RANK`] is the coordinator and acts as
/// the root of every collective.
pub trait Communicator {
    /// This participant's rank in `[0, size)`
    fn rank(&self) -> usize;

    /// Fixed number of participants in the group
    fn size(&self) -> usize;

    /// Whether this participant is the root of the collectives
    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR_RANK
    }

    /// One-to-all broadcast
    ///
    /// The coordinator passes `Some(value)`, workers pass `None`. Every
    /// participant (the coordinator included) receives the value. Blocks until
    /// the whole group has entered the broadcast.
    fn broadcast<T>(&self, value: Option<T>) -> Result<T, CommError>
    where
        T: Serialize + DeserializeOwned;

    /// One-to-all partition
    ///
    /// The coordinator passes `Some(data)` with exactly `chunk_len * size()`
    /// elements; workers pass `None`. Participant `i` receives ownership of the
    /// contiguous chunk `[i * chunk_len, (i + 1) * chunk_len)`. Blocks until
    /// every participant has received its chunk.
    fn scatter<T>(&self, data: Option<Vec<T>>, chunk_len: usize) -> Result<Vec<T>, CommError>
    where
        T: Serialize + DeserializeOwned;

    /// All-to-one element-wise sum
    ///
    /// Every participant supplies a slice of the same length. The coordinator
    /// receives `Some(sum)`, workers receive `None`. Blocks until the sum is
    /// computed. The sum is independent of participant ordering.
    fn reduce_sum(&self, local: &[u64]) -> Result<Option<Vec<u64>>, CommError>;

    /// Block until every participant has entered the barrier
    fn barrier(&self) -> Result<(), CommError>;
}

/// Encode a collective payload as a bincode frame
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CommError> {
    bincode::serialize(value).map_err(CommError::Encode)
}

/// Decode a collective payload from a bincode frame
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CommError> {
    bincode::deserialize(bytes).map_err(CommError::Decode)
}
