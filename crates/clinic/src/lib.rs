//! Sports medicine clinic records: patients, their contacts and injuries.
//!
//! Computed patient fields are pure functions of the stored record and the
//! clinic calendar. Injury lifecycle hooks keep assigned treatment
//! professionals subscribed to the injury's notification thread.
pub mod access;
pub mod error;
pub mod injury;
pub mod party;
pub mod patient;
pub mod profile;
pub mod subscription;

pub use access::{Group, PatientView, Viewer, RESTRICTED_PATIENT_FIELDS};
pub use error::ClinicError;
pub use injury::{
    is_resolved, Injury, InjuryField, InjuryId, InjuryUpdate, NewInjury, INJURY_MODEL,
};
pub use party::{Directory, Party, PartyDirectory, PartyKind};
pub use patient::{
    Contact, ContactId, ContactKind, NewPatient, Patient, PatientField, PatientId, PlayerStatus,
    PATIENT_MODEL,
};
pub use profile::{
    age, compute_profiles, display_name, injury_patient_names, injury_status,
    predicted_return_date, InjuryStatus, PatientProfile,
};
pub use subscription::{pending_subscribers, InjurySubscriptionManager, SubscriptionOutcome};
