//! Per-participant protocol run
//!
//! Every participant executes the same five collective steps in the same
//! order; the only differences are rooted at the coordinator. Diverging from
//! this sequence on any participant deadlocks the group, which is why the
//! whole protocol lives in one function instead of being scattered across
//! role-conditional call sites:
//!
//! ```text
//! Coordinator                      Workers
//!     |                               |
//!     |------- broadcast(Params) --->>|      (everyone)
//!     |   derive boundaries, zero local counts   (everyone, no comms)
//!     | generate dataset              |
//!     |------- scatter(chunks) ----->>|      (everyone)
//!     |   classify own partition      |      (everyone, no comms)
//!     |<<------ reduce(counts) -------|      (everyone)
//!     | render                        |
//! ```

use crate::comm::Communicator;
use crate::config::Params;
use crate::data;
use crate::histogram::{BinBoundaries, BinCounts, Histogram};
use crate::Result;
use anyhow::Context;

/// What a participant is responsible for beyond classification
///
/// Selected once at startup and fixed for the whole run. Only the coordinator
/// generates data and receives the aggregated histogram; the role-independent
/// classification path is shared.
#[derive(Debug, Clone)]
pub enum Role {
    /// Rank 0: supplies parameters, generates and scatters the dataset,
    /// receives the reduction
    Coordinator {
        /// Validated, truncated run parameters
        params: Params,
        /// Dataset PRNG seed (None: seeded from the OS)
        seed: Option<u64>,
    },
    /// Any other rank: classifies its partition, nothing else
    Worker,
}

impl Role {
    /// The role rank `rank` plays in a group
    pub fn for_rank(rank: usize, params: &Params, seed: Option<u64>) -> Role {
        if rank == crate::comm::COORDINATOR_RANK {
            Role::Coordinator {
                params: params.clone(),
                seed,
            }
        } else {
            Role::Worker
        }
    }
}

/// Run the full histogram protocol on one participant
///
/// Returns the aggregated histogram on the coordinator and `None` on workers.
/// Any collective failure is fatal and propagates out; the caller aborts the
/// whole group.
pub fn run<C: Communicator>(comm: &C, role: Role) -> Result<Option<Histogram>> {
    if matches!(role, Role::Coordinator { .. }) != comm.is_coordinator() {
        anyhow::bail!(
            "role/rank mismatch: rank {} cannot run as {:?}",
            comm.rank(),
            role
        );
    }

    // Step 1: parameter broadcast. After this, every participant holds a
    // bit-identical Params.
    let params = match &role {
        Role::Coordinator { params, .. } => comm
            .broadcast(Some(params.clone()))
            .context("parameter broadcast failed")?,
        Role::Worker => comm
            .broadcast::<Params>(None)
            .context("parameter broadcast failed")?,
    };

    // Step 2: boundary derivation. Pure and local; identical on every rank.
    let boundaries = BinBoundaries::derive(params.bin_count, params.min_meas, params.max_meas);
    let mut local = BinCounts::zeroed(params.bin_count);

    // Step 3: dataset generation and scatter. The coordinator owns the full
    // dataset only until the scatter moves each chunk to its classifier.
    let dataset = match &role {
        Role::Coordinator { seed, .. } => Some(data::generate(&params, *seed)),
        Role::Worker => None,
    };
    let partition = comm
        .scatter(dataset, params.local_data_count)
        .context("dataset scatter failed")?;

    // Step 4: classification, sequential over the owned partition.
    local.accumulate(&partition, &boundaries);

    // Step 5: sum-reduction to the coordinator.
    let global = comm
        .reduce_sum(local.as_slice())
        .context("count reduction failed")?;

    Ok(global.map(|counts| Histogram {
        params,
        boundaries,
        counts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::ChannelCommunicator;
    use std::thread;

    fn run_protocol(size: usize, params: Params, seed: u64) -> Histogram {
        let comms = ChannelCommunicator::connect(size);
        thread::scope(|scope| {
            let mut handles = Vec::new();
            for comm in comms {
                let role = Role::for_rank(comm.rank(), &params, Some(seed));
                handles.push(scope.spawn(move || run(&comm, role).unwrap()));
            }
            let mut histogram = None;
            for handle in handles {
                if let Some(result) = handle.join().expect("participant panicked") {
                    assert!(histogram.is_none(), "only one rank may receive the result");
                    histogram = Some(result);
                }
            }
            histogram.expect("coordinator produced no histogram")
        })
    }

    #[test]
    fn test_single_participant_owns_everything() {
        let params = Params::new(4, 0.0, 10.0, 8, 1).unwrap();
        let histogram = run_protocol(1, params.clone(), 11);

        // P=1: the global counts are exactly the one participant's local
        // counts over the whole dataset.
        let data = crate::data::generate(&params, Some(11));
        let boundaries = BinBoundaries::derive(4, 0.0, 10.0);
        let mut expected = BinCounts::zeroed(4);
        expected.accumulate(&data, &boundaries);

        assert_eq!(histogram.counts, expected.as_slice());
        assert_eq!(histogram.total(), 8);
    }

    #[test]
    fn test_conservation_across_group_sizes() {
        for size in [1, 2, 3, 4] {
            let params = Params::new(5, -1.0, 1.0, 600, size).unwrap();
            let histogram = run_protocol(size, params, 3);
            assert_eq!(histogram.total(), 600, "group size {}", size);
        }
    }

    #[test]
    fn test_truncated_count_is_conserved() {
        // 10 requested over 3 participants: 9 classified, never 10.
        let params = Params::new(4, 0.0, 10.0, 10, 3).unwrap();
        assert_eq!(params.data_count, 9);
        let histogram = run_protocol(3, params, 5);
        assert_eq!(histogram.total(), 9);
    }

    #[test]
    fn test_single_bin_absorbs_everything() {
        let params = Params::new(1, 0.0, 10.0, 64, 2).unwrap();
        let histogram = run_protocol(2, params, 21);
        assert_eq!(histogram.counts, vec![64]);
    }

    #[test]
    fn test_role_rank_mismatch_is_rejected() {
        let comms = ChannelCommunicator::connect(2);
        // Worker role on the coordinator rank must fail before any collective.
        let err = run(&comms[0], Role::Worker).unwrap_err();
        assert!(err.to_string().contains("role/rank mismatch"));
    }
}
