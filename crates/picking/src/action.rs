use serde::{ser::SerializeTuple, Serialize, Serializer};

use crate::model::TransferId;

pub const PICKING_MODEL: &str = "stock.picking";

/// View modes a window action may open with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Kanban,
    Form,
    Calendar,
    Map,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Kanban => "kanban",
            Self::Form => "form",
            Self::Calendar => "calendar",
            Self::Map => "map",
        }
    }
}

/// A single domain term restricting the records an action shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainTerm {
    IdIn(Vec<u64>),
}

impl Serialize for DomainTerm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::IdIn(ids) => {
                let mut tuple = serializer.serialize_tuple(3)?;
                tuple.serialize_element("id")?;
                tuple.serialize_element("in")?;
                tuple.serialize_element(ids)?;
                tuple.end()
            }
        }
    }
}

/// Declarative request for the display layer to open a record window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowAction {
    pub name: String,
    #[serde(rename = "type")]
    pub action_type: &'static str,
    pub res_model: &'static str,
    pub domain: Vec<DomainTerm>,
    #[serde(rename = "view_mode", serialize_with = "serialize_view_modes")]
    pub view_modes: Vec<ViewMode>,
}

impl WindowAction {
    /// Window over the given transfers, openable in every transfer view.
    pub fn transfers<I>(name: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = TransferId>,
    {
        Self {
            name: name.to_string(),
            action_type: "ir.actions.act_window",
            res_model: PICKING_MODEL,
            domain: vec![DomainTerm::IdIn(ids.into_iter().map(TransferId::get).collect())],
            view_modes: vec![
                ViewMode::List,
                ViewMode::Kanban,
                ViewMode::Form,
                ViewMode::Calendar,
                ViewMode::Map,
            ],
        }
    }

    /// Record ids the action is filtered to.
    pub fn record_ids(&self) -> &[u64] {
        self.domain
            .iter()
            .map(|term| match term {
                DomainTerm::IdIn(ids) => ids.as_slice(),
            })
            .next()
            .unwrap_or(&[])
    }
}

fn serialize_view_modes<S>(modes: &[ViewMode], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let joined = modes
        .iter()
        .map(|mode| mode.as_str())
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}
