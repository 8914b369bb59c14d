use std::collections::BTreeMap;

use addons_core::record_id;
use serde::{Deserialize, Serialize};

record_id!(
    /// Identifier of a transfer (stock picking).
    TransferId
);
record_id!(
    /// Identifier of a stock move line.
    MoveId
);

/// A logistics operation moving stock between locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub name: String,
    #[serde(default)]
    pub move_ids: Vec<MoveId>,
}

/// One line item within a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMove {
    pub id: MoveId,
    /// Transfer owning the move; moves can exist outside any transfer.
    #[serde(default)]
    pub picking_id: Option<TransferId>,
    /// Moves that must complete before this one.
    #[serde(default)]
    pub origin_move_ids: Vec<MoveId>,
}

/// Read access to transfers and moves already loaded by the host.
pub trait PickingStore {
    fn transfer(&self, id: TransferId) -> Option<&Transfer>;
    fn stock_move(&self, id: MoveId) -> Option<&StockMove>;
}

/// In-memory working set of transfers and moves.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WorkingSet {
    #[serde(default)]
    transfers: BTreeMap<TransferId, Transfer>,
    #[serde(default)]
    moves: BTreeMap<MoveId, StockMove>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_transfer(&mut self, transfer: Transfer) {
        self.transfers.insert(transfer.id, transfer);
    }

    pub fn insert_move(&mut self, stock_move: StockMove) {
        self.moves.insert(stock_move.id, stock_move);
    }

    pub fn transfers(&self) -> impl Iterator<Item = &Transfer> {
        self.transfers.values()
    }
}

impl PickingStore for WorkingSet {
    fn transfer(&self, id: TransferId) -> Option<&Transfer> {
        self.transfers.get(&id)
    }

    fn stock_move(&self, id: MoveId) -> Option<&StockMove> {
        self.moves.get(&id)
    }
}
