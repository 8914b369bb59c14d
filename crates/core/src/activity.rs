use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::PartyId;

/// A follow-up task scheduled on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub summary: String,
    pub deadline: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<PartyId>,
}

/// State of an activity relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    Overdue,
    Today,
    Planned,
}

impl Activity {
    pub fn state(&self, today: NaiveDate) -> ActivityState {
        if self.deadline < today {
            ActivityState::Overdue
        } else if self.deadline == today {
            ActivityState::Today
        } else {
            ActivityState::Planned
        }
    }
}

/// Capability of records that can carry scheduled activities.
pub trait HasActivities {
    fn activities(&self) -> &[Activity];

    /// Activities whose deadline is before `today`.
    fn overdue_activities(&self, today: NaiveDate) -> Vec<&Activity> {
        self.activities()
            .iter()
            .filter(|activity| activity.state(today) == ActivityState::Overdue)
            .collect()
    }

    /// Earliest deadline among the scheduled activities.
    fn next_deadline(&self) -> Option<NaiveDate> {
        self.activities().iter().map(|activity| activity.deadline).min()
    }
}
