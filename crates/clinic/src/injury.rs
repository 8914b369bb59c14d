use std::collections::BTreeSet;

use addons_core::{record_id, Activity, HasActivities, MailThread, PartyId, ThreadRef, TrackedChange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::patient::PatientId;

pub const INJURY_MODEL: &str = "sports.patient.injury";

record_id!(
    /// Identifier of an injury record.
    InjuryId
);

/// Resolution of an injury as of `today`.
///
/// Without a predicted return date the injury is still open; otherwise it is
/// resolved once that date lies strictly in the past.
pub fn is_resolved(predicted_return_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    match predicted_return_date {
        Some(date) => date < today,
        None => false,
    }
}

/// A patient's injury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub id: InjuryId,
    patient_id: PatientId,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub injury_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub internal_notes: Option<String>,
    #[serde(default)]
    pub treatment_professional_ids: BTreeSet<PartyId>,
    #[serde(default)]
    pub predicted_return_date: Option<NaiveDate>,
    #[serde(default)]
    pub follower_ids: BTreeSet<PartyId>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Injury {
    pub(crate) fn from_new(id: InjuryId, patient_id: PatientId, values: NewInjury) -> Self {
        Self {
            id,
            patient_id,
            diagnosis: values.diagnosis,
            injury_date_time: values.injury_date_time,
            internal_notes: values.internal_notes,
            treatment_professional_ids: values.treatment_professional_ids,
            predicted_return_date: values.predicted_return_date,
            follower_ids: BTreeSet::new(),
            activities: Vec::new(),
        }
    }

    /// Owning patient. Fixed at creation.
    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn is_resolved(&self, today: NaiveDate) -> bool {
        is_resolved(self.predicted_return_date, today)
    }

    /// Writes the values carried by `update` and returns the tracked changes.
    pub fn apply(&mut self, update: InjuryUpdate) -> Vec<TrackedChange> {
        let mut changes = Vec::new();

        if let Some(diagnosis) = update.diagnosis {
            track(&mut changes, InjuryField::Diagnosis, &self.diagnosis, &diagnosis);
            self.diagnosis = diagnosis;
        }
        if let Some(injury_date_time) = update.injury_date_time {
            track(
                &mut changes,
                InjuryField::InjuryDateTime,
                &self.injury_date_time,
                &injury_date_time,
            );
            self.injury_date_time = injury_date_time;
        }
        if let Some(notes) = update.internal_notes {
            track(&mut changes, InjuryField::InternalNotes, &self.internal_notes, &notes);
            self.internal_notes = notes;
        }
        if let Some(professionals) = update.treatment_professional_ids {
            track(
                &mut changes,
                InjuryField::TreatmentProfessionals,
                &self.treatment_professional_ids,
                &professionals,
            );
            self.treatment_professional_ids = professionals;
        }
        if let Some(date) = update.predicted_return_date {
            track(
                &mut changes,
                InjuryField::PredictedReturnDate,
                &self.predicted_return_date,
                &date,
            );
            self.predicted_return_date = date;
        }

        changes
    }
}

fn track<T>(changes: &mut Vec<TrackedChange>, field: InjuryField, old: &T, new: &T)
where
    T: PartialEq + Serialize,
{
    if field.is_tracked() && old != new {
        changes.push(TrackedChange::new(field.name(), json!(old), json!(new)));
    }
}

impl MailThread for Injury {
    fn thread_ref(&self) -> ThreadRef {
        ThreadRef::new(INJURY_MODEL, self.id.get())
    }

    fn follower_ids(&self) -> &BTreeSet<PartyId> {
        &self.follower_ids
    }
}

impl HasActivities for Injury {
    fn activities(&self) -> &[Activity] {
        &self.activities
    }
}

/// Values for a new injury.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInjury {
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub injury_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub internal_notes: Option<String>,
    #[serde(default)]
    pub treatment_professional_ids: BTreeSet<PartyId>,
    #[serde(default)]
    pub predicted_return_date: Option<NaiveDate>,
}

/// Partial write of an injury. `None` leaves a field untouched, `Some(None)`
/// clears it.
///
/// The owning patient is not writable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjuryUpdate {
    pub diagnosis: Option<Option<String>>,
    pub injury_date_time: Option<Option<DateTime<Utc>>>,
    pub internal_notes: Option<Option<String>>,
    pub treatment_professional_ids: Option<BTreeSet<PartyId>>,
    pub predicted_return_date: Option<Option<NaiveDate>>,
}

impl InjuryUpdate {
    /// Fields carried by the update, whether or not their value differs.
    pub fn changed_fields(&self) -> BTreeSet<InjuryField> {
        let mut fields = BTreeSet::new();
        if self.diagnosis.is_some() {
            fields.insert(InjuryField::Diagnosis);
        }
        if self.injury_date_time.is_some() {
            fields.insert(InjuryField::InjuryDateTime);
        }
        if self.internal_notes.is_some() {
            fields.insert(InjuryField::InternalNotes);
        }
        if self.treatment_professional_ids.is_some() {
            fields.insert(InjuryField::TreatmentProfessionals);
        }
        if self.predicted_return_date.is_some() {
            fields.insert(InjuryField::PredictedReturnDate);
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InjuryField {
    Diagnosis,
    InjuryDateTime,
    InternalNotes,
    TreatmentProfessionals,
    PredictedReturnDate,
    IsResolved,
}

impl InjuryField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Diagnosis => "diagnosis",
            Self::InjuryDateTime => "injury_date_time",
            Self::InternalNotes => "internal_notes",
            Self::TreatmentProfessionals => "treatment_professional_ids",
            Self::PredictedReturnDate => "predicted_return_date",
            Self::IsResolved => "is_resolved",
        }
    }

    /// Whether value changes are posted to the injury's thread.
    pub fn is_tracked(self) -> bool {
        matches!(
            self,
            Self::Diagnosis | Self::InternalNotes | Self::PredictedReturnDate
        )
    }

    /// Stored fields a computed field is derived from. Empty for stored fields.
    pub fn depends_on(self) -> &'static [&'static str] {
        match self {
            Self::IsResolved => &["predicted_return_date"],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn injury(predicted: Option<NaiveDate>) -> Injury {
        Injury::from_new(
            InjuryId(1),
            PatientId(1),
            NewInjury {
                diagnosis: Some("Grade II ankle sprain".into()),
                predicted_return_date: predicted,
                ..NewInjury::default()
            },
        )
    }

    #[test]
    fn resolution_depends_on_predicted_return_date() {
        let today = day(2024, 6, 15);
        assert!(is_resolved(Some(day(2024, 6, 10)), today));
        assert!(!is_resolved(Some(day(2024, 6, 15)), today));
        assert!(!is_resolved(Some(day(2024, 7, 1)), today));
        assert!(!is_resolved(None, today));
    }

    #[test]
    fn resolution_rolls_over_with_today() {
        let injury = injury(Some(day(2024, 6, 15)));
        assert!(!injury.is_resolved(day(2024, 6, 15)));
        assert!(injury.is_resolved(day(2024, 6, 16)));
    }

    #[test]
    fn apply_reports_only_tracked_value_changes() {
        let mut injury = injury(Some(day(2024, 6, 20)));
        let update = InjuryUpdate {
            diagnosis: Some(Some("Grade II ankle sprain".into())),
            internal_notes: Some(Some("<p>Cleared for light jogging</p>".into())),
            predicted_return_date: Some(Some(day(2024, 6, 27))),
            treatment_professional_ids: Some([PartyId(1)].into_iter().collect()),
            ..InjuryUpdate::default()
        };

        let changes = injury.apply(update);

        let fields: Vec<_> = changes.iter().map(|change| change.field).collect();
        assert_eq!(fields, vec!["internal_notes", "predicted_return_date"]);
        assert_eq!(changes[1].old, json!("2024-06-20"));
        assert_eq!(changes[1].new, json!("2024-06-27"));
        assert_eq!(injury.predicted_return_date, Some(day(2024, 6, 27)));
        assert!(injury.treatment_professional_ids.contains(&PartyId(1)));
    }

    #[test]
    fn untracked_fields_are_written_without_tracking() {
        let mut injury = injury(None);
        let occurred_at = DateTime::parse_from_rfc3339("2024-06-01T18:45:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);

        let changes = injury.apply(InjuryUpdate {
            injury_date_time: Some(Some(occurred_at)),
            treatment_professional_ids: Some([PartyId(2)].into_iter().collect()),
            ..InjuryUpdate::default()
        });

        assert!(changes.is_empty());
        assert_eq!(injury.injury_date_time, Some(occurred_at));
        assert!(!InjuryField::InjuryDateTime.is_tracked());
        assert!(InjuryField::Diagnosis.is_tracked());
    }

    #[test]
    fn clearing_return_date_reopens_the_injury() {
        let mut injury = injury(Some(day(2024, 6, 1)));
        assert!(injury.is_resolved(day(2024, 6, 15)));

        injury.apply(InjuryUpdate {
            predicted_return_date: Some(None),
            ..InjuryUpdate::default()
        });

        assert!(!injury.is_resolved(day(2024, 6, 15)));
    }

    #[test]
    fn changed_fields_lists_carried_values() {
        let update = InjuryUpdate {
            treatment_professional_ids: Some(BTreeSet::new()),
            diagnosis: Some(None),
            ..InjuryUpdate::default()
        };
        let fields = update.changed_fields();
        assert!(fields.contains(&InjuryField::TreatmentProfessionals));
        assert!(fields.contains(&InjuryField::Diagnosis));
        assert_eq!(fields.len(), 2);
        assert!(InjuryUpdate::default().changed_fields().is_empty());
    }

    #[test]
    fn thread_reference_uses_injury_model() {
        let injury = injury(None);
        assert_eq!(injury.thread_ref(), ThreadRef::new(INJURY_MODEL, 1));
        assert_eq!(InjuryField::IsResolved.depends_on(), &["predicted_return_date"]);
        assert!(!InjuryField::TreatmentProfessionals.is_tracked());
    }
}
