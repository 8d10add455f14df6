//! Channel-backed collective communication
//!
//! This module implements [`Communicator`] over crossbeam channels, with one
//! participant per thread. The topology is a star rooted at the coordinator:
//! the coordinator holds one sender/receiver pair per worker, each worker holds
//! the matching pair back to the coordinator. Worker links are dedicated, so
//! frames from different workers can never interleave on a shared queue.
//!
//! Barrier semantics: every collective finishes with an arrive/release
//! handshake. Workers send an `Arrive` frame and block until the coordinator
//! has collected one from each of them and answered with `Release`. This is
//! what makes each collective a full barrier rather than a one-way send.
//!
//! A disconnected channel (a peer that panicked or exited early) surfaces as
//! [`CommError::Disconnected`] and aborts the run; there is no retry path.

use crossbeam::channel::{unbounded, Receiver, Sender};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{decode, encode, CommError, Communicator};

/// Frame exchanged over a participant link
#[derive(Debug)]
enum Frame {
    /// bincode-encoded collective payload
    Payload(Vec<u8>),
    /// Barrier arrival (worker to coordinator)
    Arrive,
    /// Barrier release (coordinator to worker)
    Release,
}

/// Link endpoints, shaped by role
enum Links {
    /// Coordinator side: one link per worker, indexed by `worker_rank - 1`
    Coordinator {
        to_workers: Vec<Sender<Frame>>,
        from_workers: Vec<Receiver<Frame>>,
    },
    /// Worker side: the single link back to the coordinator
    Worker {
        to_coordinator: Sender<Frame>,
        from_coordinator: Receiver<Frame>,
    },
}

/// Channel-backed group member
///
/// Created in bulk by [`ChannelCommunicator::connect`]; each endpoint is then
/// moved into its participant's thread.
pub struct ChannelCommunicator {
    rank: usize,
    size: usize,
    links: Links,
}

impl ChannelCommunicator {
    /// Build the fully connected group for `size` participants
    ///
    /// Returns one endpoint per rank, in rank order. The group size is fixed
    /// for the lifetime of the endpoints.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero; group size is validated before any endpoint
    /// is constructed.
    pub fn connect(size: usize) -> Vec<ChannelCommunicator> {
        assert!(size > 0, "group size must be at least 1");

        let mut to_workers = Vec::with_capacity(size - 1);
        let mut from_workers = Vec::with_capacity(size - 1);
        let mut workers = Vec::with_capacity(size - 1);

        for rank in 1..size {
            let (down_tx, down_rx) = unbounded();
            let (up_tx, up_rx) = unbounded();
            to_workers.push(down_tx);
            from_workers.push(up_rx);
            workers.push(ChannelCommunicator {
                rank,
                size,
                links: Links::Worker {
                    to_coordinator: up_tx,
                    from_coordinator: down_rx,
                },
            });
        }

        let mut group = Vec::with_capacity(size);
        group.push(ChannelCommunicator {
            rank: 0,
            size,
            links: Links::Coordinator {
                to_workers,
                from_workers,
            },
        });
        group.extend(workers);
        group
    }

    /// Send a payload frame to every worker
    fn send_to_workers(&self, frames: Vec<Vec<u8>>) -> Result<(), CommError> {
        match &self.links {
            Links::Coordinator { to_workers, .. } => {
                for (link, frame) in to_workers.iter().zip(frames) {
                    link.send(Frame::Payload(frame))
                        .map_err(|_| CommError::Disconnected)?;
                }
                Ok(())
            }
            Links::Worker { .. } => unreachable!("send_to_workers called on a worker"),
        }
    }

    /// Receive the next payload frame from the coordinator
    fn recv_payload(&self) -> Result<Vec<u8>, CommError> {
        match &self.links {
            Links::Worker {
                from_coordinator, ..
            } => match from_coordinator.recv() {
                Ok(Frame::Payload(bytes)) => Ok(bytes),
                // A control frame here means the call sequences diverged
                Ok(_) | Err(_) => Err(CommError::Disconnected),
            },
            Links::Coordinator { .. } => unreachable!("recv_payload called on the coordinator"),
        }
    }
}

impl Communicator for ChannelCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast<T>(&self, value: Option<T>) -> Result<T, CommError>
    where
        T: Serialize + DeserializeOwned,
    {
        let result = match &self.links {
            Links::Coordinator { .. } => {
                let value = value.ok_or(CommError::MissingPayload)?;
                let frame = encode(&value)?;
                self.send_to_workers(vec![frame; self.size - 1])?;
                value
            }
            Links::Worker { .. } => {
                let bytes = self.recv_payload()?;
                decode(&bytes)?
            }
        };
        self.barrier()?;
        Ok(result)
    }

    fn scatter<T>(&self, data: Option<Vec<T>>, chunk_len: usize) -> Result<Vec<T>, CommError>
    where
        T: Serialize + DeserializeOwned,
    {
        let chunk = match &self.links {
            Links::Coordinator { .. } => {
                let mut data = data.ok_or(CommError::MissingPayload)?;
                let expected = chunk_len * self.size;
                if data.len() != expected {
                    return Err(CommError::ShapeMismatch {
                        expected,
                        actual: data.len(),
                    });
                }

                // Chunk i goes to rank i; the coordinator keeps chunk 0.
                let mut frames = Vec::with_capacity(self.size - 1);
                for worker in 1..self.size {
                    let chunk = &data[worker * chunk_len..(worker + 1) * chunk_len];
                    frames.push(encode(&chunk)?);
                }
                self.send_to_workers(frames)?;

                data.truncate(chunk_len);
                data
            }
            Links::Worker { .. } => {
                let bytes = self.recv_payload()?;
                let chunk: Vec<T> = decode(&bytes)?;
                if chunk.len() != chunk_len {
                    return Err(CommError::ShapeMismatch {
                        expected: chunk_len,
                        actual: chunk.len(),
                    });
                }
                chunk
            }
        };
        self.barrier()?;
        Ok(chunk)
    }

    fn reduce_sum(&self, local: &[u64]) -> Result<Option<Vec<u64>>, CommError> {
        let result = match &self.links {
            Links::Coordinator { from_workers, .. } => {
                let mut sum = local.to_vec();
                for link in from_workers {
                    let bytes = match link.recv() {
                        Ok(Frame::Payload(bytes)) => bytes,
                        Ok(_) | Err(_) => return Err(CommError::Disconnected),
                    };
                    let counts: Vec<u64> = decode(&bytes)?;
                    if counts.len() != sum.len() {
                        return Err(CommError::ShapeMismatch {
                            expected: sum.len(),
                            actual: counts.len(),
                        });
                    }
                    for (acc, count) in sum.iter_mut().zip(&counts) {
                        *acc += count;
                    }
                }
                Some(sum)
            }
            Links::Worker { to_coordinator, .. } => {
                let frame = encode(&local)?;
                to_coordinator
                    .send(Frame::Payload(frame))
                    .map_err(|_| CommError::Disconnected)?;
                None
            }
        };
        self.barrier()?;
        Ok(result)
    }

    fn barrier(&self) -> Result<(), CommError> {
        match &self.links {
            Links::Coordinator {
                to_workers,
                from_workers,
            } => {
                for link in from_workers {
                    match link.recv() {
                        Ok(Frame::Arrive) => {}
                        Ok(_) | Err(_) => return Err(CommError::Disconnected),
                    }
                }
                for link in to_workers {
                    link.send(Frame::Release)
                        .map_err(|_| CommError::Disconnected)?;
                }
            }
            Links::Worker {
                to_coordinator,
                from_coordinator,
            } => {
                to_coordinator
                    .send(Frame::Arrive)
                    .map_err(|_| CommError::Disconnected)?;
                match from_coordinator.recv() {
                    Ok(Frame::Release) => {}
                    Ok(_) | Err(_) => return Err(CommError::Disconnected),
                }
            }
        }
        Ok(())
    }
}
