//! Upstream transfer resolution for stock pickings.
//!
//! A transfer waiting on stock often depends on other transfers whose moves
//! feed its own. This crate computes that set and the window action used to
//! list it.
pub mod action;
pub mod model;
pub mod upstream;

pub use action::{DomainTerm, ViewMode, WindowAction, PICKING_MODEL};
pub use model::{MoveId, PickingStore, StockMove, Transfer, TransferId, WorkingSet};
pub use upstream::{
    UpstreamPickingResolver, UpstreamTransfers, UPSTREAM_ACTION_NAME, UPSTREAM_DEPENDS_ON,
};
