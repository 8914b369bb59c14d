use std::collections::BTreeMap;

use addons_core::PartyId;
use serde::{Deserialize, Serialize};

use crate::error::ClinicError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Person,
    Company,
    Team,
}

/// Entry of the host's contact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    pub kind: PartyKind,
    #[serde(default)]
    pub is_treatment_professional: bool,
}

/// Read access to parties known to the host.
pub trait PartyDirectory {
    fn party(&self, id: PartyId) -> Option<&Party>;

    /// Fails unless every id refers to a team.
    fn ensure_teams<'a, I>(&self, ids: I) -> Result<(), ClinicError>
    where
        I: IntoIterator<Item = &'a PartyId>,
        Self: Sized,
    {
        for id in ids {
            let party = self.party(*id).ok_or(ClinicError::UnknownParty(*id))?;
            if party.kind != PartyKind::Team {
                return Err(ClinicError::NotATeam(*id));
            }
        }
        Ok(())
    }

    /// Fails unless every id refers to a treatment professional.
    fn ensure_treatment_professionals<'a, I>(&self, ids: I) -> Result<(), ClinicError>
    where
        I: IntoIterator<Item = &'a PartyId>,
        Self: Sized,
    {
        for id in ids {
            let party = self.party(*id).ok_or(ClinicError::UnknownParty(*id))?;
            if !party.is_treatment_professional {
                return Err(ClinicError::NotATreatmentProfessional(*id));
            }
        }
        Ok(())
    }
}

/// In-memory party directory.
#[derive(Debug, Default, Clone)]
pub struct Directory {
    parties: BTreeMap<PartyId, Party>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, party: Party) {
        self.parties.insert(party.id, party);
    }
}

impl FromIterator<Party> for Directory {
    fn from_iter<T: IntoIterator<Item = Party>>(iter: T) -> Self {
        Self {
            parties: iter.into_iter().map(|party| (party.id, party)).collect(),
        }
    }
}

impl PartyDirectory for Directory {
    fn party(&self, id: PartyId) -> Option<&Party> {
        self.parties.get(&id)
    }
}
