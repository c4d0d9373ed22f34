//! Progress lines of a proof attempt.
//!
//! Everything is logged through `tracing`. With [`ProveParams::verbose`] set, the limits and
//! phase lines are emitted at `info` level, otherwise at `debug` level.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::{Network, ProveParams, ResourceLedger};

pub(super) fn limits(verbose: bool, params: &ProveParams) {
    if verbose {
        info!(
            iterations = params.iterations,
            rewriting = params.use_rewriting,
            fraiging = params.use_fraiging,
            bdds = params.use_bdds,
            total_backtrack_limit = params.total_backtrack_limit,
            total_inspect_limit = params.total_inspect_limit,
            "Proving miter"
        );
    } else {
        debug!(
            iterations = params.iterations,
            rewriting = params.use_rewriting,
            fraiging = params.use_fraiging,
            bdds = params.use_bdds,
            total_backtrack_limit = params.total_backtrack_limit,
            total_inspect_limit = params.total_inspect_limit,
            "Proving miter"
        );
    }
}

pub(super) fn iteration(verbose: bool, iteration: u32, ledger: &ResourceLedger) {
    if verbose {
        info!(
            iteration,
            backtracks = ledger.backtracks_made(),
            inspects = ledger.inspects_made(),
            "Escalation round"
        );
    } else {
        debug!(
            iteration,
            backtracks = ledger.backtracks_made(),
            inspects = ledger.inspects_made(),
            "Escalation round"
        );
    }
}

pub(super) fn phase_done<N: Network>(verbose: bool, name: &str, network: &N, start: Instant) {
    let nodes = network.node_count();
    let levels = network.level_count();
    let elapsed = start.elapsed();
    if verbose {
        info!(nodes, levels, ?elapsed, "{name} done");
    } else {
        debug!(nodes, levels, ?elapsed, "{name} done");
    }
}

pub(super) fn limit_reached(ledger: &ResourceLedger) {
    warn!(
        backtracks = ledger.backtracks_made(),
        inspects = ledger.inspects_made(),
        "Reached global limit on conflicts/inspects, giving up"
    );
}
