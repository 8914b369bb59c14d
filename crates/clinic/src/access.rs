use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{patient::Patient, profile::PatientProfile};

/// Authorization groups gating patient fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Sees clinical fields: birth date and age.
    TreatmentProfessional,
    /// Sees contact fields: phone, email and the contact list.
    ClinicUser,
}

impl Group {
    /// Groups granted along with this one.
    pub fn implied(self) -> &'static [Group] {
        match self {
            Self::TreatmentProfessional => &[Self::ClinicUser],
            Self::ClinicUser => &[],
        }
    }
}

/// Patient fields readable only by members of a group.
pub const RESTRICTED_PATIENT_FIELDS: &[(&str, Group)] = &[
    ("date_of_birth", Group::TreatmentProfessional),
    ("age", Group::TreatmentProfessional),
    ("phone", Group::ClinicUser),
    ("email", Group::ClinicUser),
    ("contacts", Group::ClinicUser),
];

/// The caller a view is rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    groups: BTreeSet<Group>,
}

impl Viewer {
    /// Viewer holding `groups` and everything they imply.
    pub fn with_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Group>,
    {
        let mut resolved = BTreeSet::new();
        let mut pending: Vec<Group> = groups.into_iter().collect();
        while let Some(group) = pending.pop() {
            if resolved.insert(group) {
                pending.extend_from_slice(group.implied());
            }
        }
        Self { groups: resolved }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_group(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }

    /// Whether the viewer may read the patient field `field`.
    pub fn can_read(&self, field: &str) -> bool {
        RESTRICTED_PATIENT_FIELDS
            .iter()
            .filter(|(name, _)| *name == field)
            .all(|(_, group)| self.has_group(*group))
    }
}

/// Outward representation of a patient with restricted fields removed.
pub struct PatientView;

impl PatientView {
    /// Renders stored and computed fields of `patient` readable by `viewer`.
    pub fn render(patient: &Patient, profile: &PatientProfile, viewer: &Viewer) -> Value {
        let value = json!({
            "id": patient.id,
            "name": profile.display_name,
            "first_name": patient.first_name,
            "last_name": patient.last_name,
            "date_of_birth": patient.date_of_birth,
            "age": profile.age,
            "phone": patient.phone,
            "email": patient.email,
            "contacts": patient.ordered_contacts(),
            "team_ids": patient.team_ids,
            "player_status": patient.player_status,
            "injury_ids": patient.injuries.iter().map(|injury| injury.id).collect::<Vec<_>>(),
            "is_injured": profile.is_injured,
            "injured_since": profile.injured_since,
            "predicted_return_date": profile.predicted_return_date,
        });

        match value {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .filter(|(field, _)| viewer.can_read(field))
                    .collect::<Map<_, _>>(),
            ),
            other => other,
        }
    }
}
