//! Group runners
//!
//! Two ways to execute the protocol over a fixed-size group:
//!
//! - [`run_threaded`]: one OS thread per participant, connected by channel
//!   communicators. This is the production path.
//! - [`simulate`]: all roles executed sequentially in the calling thread
//!   through the same pure stage functions, with no communication layer at
//!   all. Deterministic by construction; the reference the threaded runner is
//!   tested against.
//!
//! For equal parameters and seeds the two produce identical histograms.

use crate::comm::{ChannelCommunicator, Communicator};
use crate::config::Params;
use crate::data;
use crate::histogram::{BinBoundaries, BinCounts, Histogram};
use crate::participant::{self, Role};
use crate::Result;
use anyhow::Context;
use std::thread;

/// Run the protocol with one thread per participant
///
/// The calling thread becomes the coordinator; `participants - 1` worker
/// threads are spawned and joined before this returns. Any participant failure
/// (collective error or panic) aborts the whole run with an error; no partial
/// histogram is produced.
pub fn run_threaded(participants: usize, params: Params, seed: Option<u64>) -> Result<Histogram> {
    if participants == 0 {
        anyhow::bail!("participant count must be at least 1");
    }
    if params.participants() != participants {
        anyhow::bail!(
            "parameters were truncated for {} participants, cannot run with {}",
            params.participants(),
            participants
        );
    }

    let mut comms = ChannelCommunicator::connect(participants);
    let coordinator_comm = comms.remove(0);

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for comm in comms {
            let handle = thread::Builder::new()
                .name(format!("histogrid-worker-{}", comm.rank()))
                .spawn_scoped(scope, move || participant::run(&comm, Role::Worker))
                .context("failed to spawn worker thread")?;
            handles.push(handle);
        }

        let coordinator = participant::run(&coordinator_comm, Role::Coordinator { params, seed });
        // Release the coordinator's links first: if it failed mid-protocol,
        // blocked workers must observe the disconnect instead of waiting on a
        // collective that will never complete.
        drop(coordinator_comm);

        // Join every worker before deciding the outcome: a coordinator error
        // usually has a worker-side cause worth surfacing instead.
        let mut worker_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(None)) => {}
                Ok(Ok(Some(_))) => anyhow::bail!("a worker received the reduction result"),
                Ok(Err(err)) => worker_error = Some(err),
                Err(_) => anyhow::bail!("a worker thread panicked"),
            }
        }

        match (coordinator, worker_error) {
            (Ok(Some(histogram)), None) => Ok(histogram),
            (Ok(None), _) => anyhow::bail!("coordinator finished without a histogram"),
            (_, Some(err)) => Err(err).context("a worker failed; run aborted"),
            (Err(err), None) => Err(err).context("coordinator failed; run aborted"),
        }
    })
}

/// Execute all roles of the protocol sequentially in one thread
///
/// Walks the same stages as the distributed run: the dataset is generated
/// once, split into the same contiguous rank-ordered chunks the scatter would
/// move, boundaries are derived per rank as each rank would, and the local
/// counts are merged in a single pass. Exists to make tests deterministic and
/// to give the threaded runner an oracle.
pub fn simulate(params: &Params, seed: Option<u64>) -> Histogram {
    let dataset = data::generate(params, seed);

    let mut global = BinCounts::zeroed(params.bin_count);
    let mut boundaries = None;
    for chunk in dataset.chunks(params.local_data_count) {
        // Each virtual rank derives its own boundaries, as in the real run.
        let rank_boundaries =
            BinBoundaries::derive(params.bin_count, params.min_meas, params.max_meas);
        let mut local = BinCounts::zeroed(params.bin_count);
        local.accumulate(chunk, &rank_boundaries);
        global.merge(&local);
        boundaries = Some(rank_boundaries);
    }

    Histogram {
        params: params.clone(),
        boundaries: boundaries
            .unwrap_or_else(|| BinBoundaries::derive(params.bin_count, params.min_meas, params.max_meas)),
        counts: global.into_vec(),
    }
}
