use std::collections::{BTreeMap, BTreeSet};

use metrics::counter;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    action::WindowAction,
    model::{PickingStore, Transfer, TransferId},
};

/// Fields whose change invalidates the upstream computation of a transfer.
pub const UPSTREAM_DEPENDS_ON: &[&str] = &[
    "move_lines",
    "move_lines.move_orig_ids",
    "move_lines.move_orig_ids.picking_id",
];

pub const UPSTREAM_ACTION_NAME: &str = "Upstream Transfers";

/// Transfers a given transfer depends on for stock availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpstreamTransfers {
    pub transfer_ids: BTreeSet<TransferId>,
}

impl UpstreamTransfers {
    pub fn count(&self) -> usize {
        self.transfer_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfer_ids.is_empty()
    }

    pub fn contains(&self, id: TransferId) -> bool {
        self.transfer_ids.contains(&id)
    }
}

/// Resolves upstream transfers by walking the origin moves of each move line.
pub struct UpstreamPickingResolver<'a, S> {
    store: &'a S,
}

impl<'a, S> UpstreamPickingResolver<'a, S>
where
    S: PickingStore,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Owning transfers of every origin move of `transfer`'s move lines,
    /// excluding `transfer` itself.
    pub fn compute_upstream(&self, transfer: &Transfer) -> UpstreamTransfers {
        let mut transfer_ids = BTreeSet::new();

        for move_id in &transfer.move_ids {
            let Some(stock_move) = self.store.stock_move(*move_id) else {
                warn!(stage = "upstream", transfer = %transfer.id, %move_id, "move line missing from working set");
                counter!("upstream_dangling_moves_total").increment(1);
                continue;
            };

            for origin_id in &stock_move.origin_move_ids {
                match self.store.stock_move(*origin_id) {
                    Some(origin) => transfer_ids.extend(origin.picking_id),
                    None => {
                        warn!(stage = "upstream", transfer = %transfer.id, origin = %origin_id, "origin move missing from working set");
                        counter!("upstream_dangling_moves_total").increment(1);
                    }
                }
            }
        }

        // Split and merged moves can chain back into the transfer itself.
        transfer_ids.remove(&transfer.id);

        debug!(stage = "upstream", transfer = %transfer.id, count = transfer_ids.len(), "computed upstream transfers");
        UpstreamTransfers { transfer_ids }
    }

    /// Computes upstream transfers for each transfer of a batch.
    pub fn compute_batch<'t, I>(&self, transfers: I) -> BTreeMap<TransferId, UpstreamTransfers>
    where
        I: IntoIterator<Item = &'t Transfer>,
    {
        transfers
            .into_iter()
            .map(|transfer| (transfer.id, self.compute_upstream(transfer)))
            .collect()
    }

    /// Window action listing the upstream transfers of `transfer`.
    pub fn list_upstream_action(&self, transfer: &Transfer) -> WindowAction {
        let upstream = self.compute_upstream(transfer);
        WindowAction::transfers(UPSTREAM_ACTION_NAME, upstream.transfer_ids)
    }
}
