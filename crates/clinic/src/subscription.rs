use std::collections::BTreeSet;

use addons_core::{MailThread, NotificationHub, PartyId};
use metrics::counter;
use tracing::{debug, info};

use crate::{
    error::ClinicError,
    injury::{Injury, InjuryField, InjuryId, InjuryUpdate, NewInjury},
    party::PartyDirectory,
    patient::Patient,
};

/// Parties subscribed by a lifecycle hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionOutcome {
    pub subscribed: BTreeSet<PartyId>,
}

impl SubscriptionOutcome {
    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }
}

/// Treatment professionals assigned to `injury` that do not follow it yet.
pub fn pending_subscribers(injury: &Injury) -> BTreeSet<PartyId> {
    injury
        .treatment_professional_ids
        .difference(injury.follower_ids())
        .copied()
        .collect()
}

/// Keeps treatment professionals subscribed to the injuries they are assigned to.
///
/// Subscriptions only ever grow: removing a professional from an injury leaves
/// their subscription in place.
#[derive(Debug)]
pub struct InjurySubscriptionManager<H> {
    hub: H,
}

impl<H> InjurySubscriptionManager<H>
where
    H: NotificationHub,
{
    pub fn new(hub: H) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    pub fn hub_mut(&mut self) -> &mut H {
        &mut self.hub
    }

    pub fn into_hub(self) -> H {
        self.hub
    }

    /// Hook run once a new injury has been stored.
    pub fn on_create(&mut self, injury: &mut Injury) -> Result<SubscriptionOutcome, ClinicError> {
        self.subscribe_pending(injury)
    }

    /// Hook run once a write has been applied to `injury`.
    ///
    /// Only writes touching the treatment professionals trigger subscriptions.
    pub fn on_update(
        &mut self,
        injury: &mut Injury,
        changed_fields: &BTreeSet<InjuryField>,
    ) -> Result<SubscriptionOutcome, ClinicError> {
        if !changed_fields.contains(&InjuryField::TreatmentProfessionals) {
            return Ok(SubscriptionOutcome::default());
        }
        self.subscribe_pending(injury)
    }

    /// Creates an injury on `patient` and runs the create hook.
    ///
    /// The injury is only attached to the patient when the hook succeeds.
    pub fn create<D>(
        &mut self,
        directory: &D,
        patient: &mut Patient,
        id: InjuryId,
        values: NewInjury,
    ) -> Result<SubscriptionOutcome, ClinicError>
    where
        D: PartyDirectory,
    {
        directory.ensure_treatment_professionals(&values.treatment_professional_ids)?;

        let mut injury = Injury::from_new(id, patient.id, values);
        let outcome = self.on_create(&mut injury)?;
        patient.injuries.push(injury);
        Ok(outcome)
    }

    /// Applies `update` to `injury`, runs the write hook and posts tracked changes.
    ///
    /// The update is staged on a copy and only stored once every hub call
    /// succeeded, so a failed write leaves `injury` as it was.
    pub fn write<D>(
        &mut self,
        directory: &D,
        injury: &mut Injury,
        update: InjuryUpdate,
    ) -> Result<SubscriptionOutcome, ClinicError>
    where
        D: PartyDirectory,
    {
        if let Some(professionals) = &update.treatment_professional_ids {
            directory.ensure_treatment_professionals(professionals)?;
        }

        let changed_fields = update.changed_fields();
        let mut staged = injury.clone();
        let changes = staged.apply(update);

        let outcome = self.on_update(&mut staged, &changed_fields)?;
        if !changes.is_empty() {
            debug!(stage = "subscription", injury = %staged.id, changes = changes.len(), "posting tracked changes");
            self.hub.post_tracking(staged.thread_ref(), &changes)?;
        }

        *injury = staged;
        Ok(outcome)
    }

    fn subscribe_pending(&mut self, injury: &mut Injury) -> Result<SubscriptionOutcome, ClinicError> {
        let pending = pending_subscribers(injury);
        if pending.is_empty() {
            return Ok(SubscriptionOutcome::default());
        }

        self.hub.subscribe(injury.thread_ref(), &pending)?;
        injury.follower_ids.extend(pending.iter().copied());

        info!(stage = "subscription", injury = %injury.id, subscribed = pending.len(), "subscribed treatment professionals");
        counter!("injury_subscriptions_total").increment(pending.len() as u64);

        Ok(SubscriptionOutcome {
            subscribed: pending,
        })
    }
}
