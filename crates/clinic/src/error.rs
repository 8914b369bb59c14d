use addons_core::{HubError, PartyId};
use thiserror::Error;

/// Errors raised while validating or writing clinic records.
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown party: {0}")]
    UnknownParty(PartyId),
    #[error("party {0} is not a team")]
    NotATeam(PartyId),
    #[error("party {0} is not a treatment professional")]
    NotATreatmentProfessional(PartyId),
    #[error("notification hub error: {0}")]
    Hub(#[from] HubError),
}
