use std::collections::BTreeSet;

use addons_core::{record_id, Activity, HasActivities, MailThread, PartyId, ThreadRef};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::ClinicError,
    injury::{Injury, InjuryId},
    party::PartyDirectory,
};

pub const PATIENT_MODEL: &str = "sports.patient";

record_id!(
    /// Identifier of a clinic patient.
    PatientId
);
record_id!(
    /// Identifier of a patient contact entry.
    ContactId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Practice,
    Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Mother,
    Father,
    Other,
}

/// Emergency or other contact of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(default)]
    pub sequence: i32,
    #[serde(default)]
    pub kind: Option<ContactKind>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Patient at a sports medicine clinic, with the contacts and injuries it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub team_ids: BTreeSet<PartyId>,
    #[serde(default)]
    pub player_status: Option<PlayerStatus>,
    #[serde(default)]
    pub injuries: Vec<Injury>,
    #[serde(default)]
    pub follower_ids: BTreeSet<PartyId>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Patient {
    /// Contacts ordered by sequence, then by id.
    pub fn ordered_contacts(&self) -> Vec<&Contact> {
        let mut contacts: Vec<&Contact> = self.contacts.iter().collect();
        contacts.sort_by_key(|contact| (contact.sequence, contact.id));
        contacts
    }

    pub fn injury(&self, id: InjuryId) -> Option<&Injury> {
        self.injuries.iter().find(|injury| injury.id == id)
    }

    pub fn injury_mut(&mut self, id: InjuryId) -> Option<&mut Injury> {
        self.injuries.iter_mut().find(|injury| injury.id == id)
    }
}

impl MailThread for Patient {
    fn thread_ref(&self) -> ThreadRef {
        ThreadRef::new(PATIENT_MODEL, self.id.get())
    }

    fn follower_ids(&self) -> &BTreeSet<PartyId> {
        &self.follower_ids
    }
}

impl HasActivities for Patient {
    fn activities(&self) -> &[Activity] {
        &self.activities
    }
}

/// Values for a new patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub team_ids: BTreeSet<PartyId>,
    #[serde(default)]
    pub player_status: Option<PlayerStatus>,
}

impl NewPatient {
    /// Validates required names and team affiliations, then builds the record.
    pub fn create<D>(self, id: PatientId, directory: &D) -> Result<Patient, ClinicError>
    where
        D: PartyDirectory,
    {
        let first_name = required(self.first_name, "first_name")?;
        let last_name = required(self.last_name, "last_name")?;
        directory.ensure_teams(&self.team_ids)?;

        Ok(Patient {
            id,
            first_name,
            last_name,
            date_of_birth: self.date_of_birth,
            phone: self.phone,
            email: self.email,
            contacts: self.contacts,
            team_ids: self.team_ids,
            player_status: self.player_status,
            injuries: Vec::new(),
            follower_ids: BTreeSet::new(),
            activities: Vec::new(),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ClinicError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(ClinicError::MissingField(field))
}

/// Computed fields of a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatientField {
    Name,
    Age,
    PredictedReturnDate,
    IsInjured,
    InjuredSince,
}

impl PatientField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::PredictedReturnDate => "predicted_return_date",
            Self::IsInjured => "is_injured",
            Self::InjuredSince => "injured_since",
        }
    }

    /// Fields whose change invalidates this computed field.
    pub fn depends_on(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["first_name", "last_name"],
            Self::Age => &["date_of_birth"],
            Self::PredictedReturnDate => &["injury_ids.predicted_return_date"],
            Self::IsInjured | Self::InjuredSince => {
                &["injury_ids.is_resolved", "injury_ids.injury_date_time"]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::tests::sample_directory;
    use crate::injury::InjuryField;

    fn new_patient() -> NewPatient {
        NewPatient {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            team_ids: [PartyId(10)].into_iter().collect(),
            ..NewPatient::default()
        }
    }

    fn contact(id: u64, sequence: i32, name: &str) -> Contact {
        Contact {
            id: ContactId(id),
            sequence,
            kind: Some(ContactKind::Other),
            name: Some(name.into()),
            phone: None,
        }
    }

    #[test]
    fn creates_patient_from_valid_values() {
        let patient = new_patient()
            .create(PatientId(1), &sample_directory())
            .expect("valid patient");

        assert_eq!(patient.first_name, "Jane");
        assert!(patient.injuries.is_empty());
        assert_eq!(patient.thread_ref(), ThreadRef::new(PATIENT_MODEL, 1));
    }

    #[test]
    fn names_are_required() {
        let mut values = new_patient();
        values.last_name = Some("   ".into());

        let err = values
            .create(PatientId(1), &sample_directory())
            .expect_err("blank last name");
        assert!(matches!(err, ClinicError::MissingField("last_name")));

        let err = NewPatient::default()
            .create(PatientId(2), &sample_directory())
            .expect_err("missing first name");
        assert!(matches!(err, ClinicError::MissingField("first_name")));
    }

    #[test]
    fn teams_must_be_team_parties() {
        let mut values = new_patient();
        values.team_ids.insert(PartyId(1));

        let err = values
            .create(PatientId(1), &sample_directory())
            .expect_err("doctor is not a team");
        assert!(matches!(err, ClinicError::NotATeam(PartyId(1))));
    }

    #[test]
    fn contacts_follow_sequence_then_id() {
        let mut patient = new_patient()
            .create(PatientId(1), &sample_directory())
            .expect("valid patient");
        patient.contacts = vec![
            contact(3, 5, "Coach"),
            contact(2, 0, "Father"),
            contact(1, 0, "Mother"),
        ];

        let names: Vec<_> = patient
            .ordered_contacts()
            .into_iter()
            .filter_map(|contact| contact.name.as_deref())
            .collect();
        assert_eq!(names, vec!["Mother", "Father", "Coach"]);
    }

    #[test]
    fn player_status_serializes_in_snake_case() {
        let value = serde_json::to_value(PlayerStatus::Match).expect("serialize");
        assert_eq!(value, serde_json::json!("match"));
    }

    #[test]
    fn computed_fields_declare_their_stored_sources() {
        assert_eq!(PatientField::Name.depends_on(), &["first_name", "last_name"]);
        assert_eq!(PatientField::Age.depends_on(), &["date_of_birth"]);
        assert_eq!(
            PatientField::InjuredSince.depends_on(),
            PatientField::IsInjured.depends_on()
        );
        assert_eq!(PatientField::PredictedReturnDate.name(), "predicted_return_date");
    }

    #[test]
    fn injury_dependencies_name_injury_fields() {
        let injury_fields = [
            InjuryField::Diagnosis,
            InjuryField::InjuryDateTime,
            InjuryField::InternalNotes,
            InjuryField::TreatmentProfessionals,
            InjuryField::PredictedReturnDate,
            InjuryField::IsResolved,
        ];
        let fields = [
            PatientField::Name,
            PatientField::Age,
            PatientField::PredictedReturnDate,
            PatientField::IsInjured,
            PatientField::InjuredSince,
        ];

        for dependency in fields.iter().flat_map(|field| field.depends_on()) {
            if let Some(injury_field) = dependency.strip_prefix("injury_ids.") {
                assert!(
                    injury_fields.iter().any(|field| field.name() == injury_field),
                    "{dependency} does not name an injury field"
                );
            }
        }
    }
}
