use std::collections::BTreeMap;

use addons_core::ClinicCalendar;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::{
    injury::{Injury, InjuryId},
    patient::{Patient, PatientId},
};

/// First and last name joined by a space; missing parts count as empty.
pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    format!("{} {}", first_name.unwrap_or(""), last_name.unwrap_or(""))
        .trim()
        .to_string()
}

fn patient_name(patient: &Patient) -> String {
    display_name(Some(patient.first_name.as_str()), Some(patient.last_name.as_str()))
}

/// Whole calendar years between `date_of_birth` and `today`.
///
/// A year only counts once the birthday has been reached. Birth dates in the
/// future yield a non-positive value truncated toward zero.
pub fn age(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
    let born = date_of_birth?;
    if born > today {
        return Some(-whole_years(today, born));
    }
    Some(whole_years(born, today))
}

fn whole_years(from: NaiveDate, to: NaiveDate) -> i32 {
    let years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years - 1
    } else {
        years
    }
}

/// Injury status derived from a patient's injuries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InjuryStatus {
    pub is_injured: bool,
    pub injured_since: Option<NaiveDate>,
}

/// Injured when any injury is unresolved; the status starts at the latest
/// occurring unresolved injury.
///
/// Unresolved injuries without a date-time mark the patient injured but do
/// not date the status.
pub fn injury_status(injuries: &[Injury], calendar: &ClinicCalendar) -> InjuryStatus {
    let today = calendar.today();
    let is_injured = injuries.iter().any(|injury| !injury.is_resolved(today));

    InjuryStatus {
        is_injured,
        injured_since: latest_unresolved(injuries, today)
            .and_then(|injury| injury.injury_date_time)
            .map(|occurred_at| calendar.local_date(occurred_at)),
    }
}

/// Unresolved injury with the latest date-time. Ties keep the first one in
/// the given order.
fn latest_unresolved(injuries: &[Injury], today: NaiveDate) -> Option<&Injury> {
    injuries
        .iter()
        .filter(|injury| !injury.is_resolved(today))
        .filter(|injury| injury.injury_date_time.is_some())
        .fold(None::<&Injury>, |latest, injury| match latest {
            Some(current) if current.injury_date_time >= injury.injury_date_time => Some(current),
            _ => Some(injury),
        })
}

/// Latest predicted return date strictly after `today`.
///
/// Injuries whose return date has passed do not contribute, even while other
/// injuries keep the patient injured.
pub fn predicted_return_date(injuries: &[Injury], today: NaiveDate) -> Option<NaiveDate> {
    injuries
        .iter()
        .filter_map(|injury| injury.predicted_return_date)
        .filter(|date| *date > today)
        .max()
}

/// Computed fields of a patient as of a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientProfile {
    pub display_name: String,
    pub age: Option<i32>,
    pub is_injured: bool,
    pub injured_since: Option<NaiveDate>,
    pub predicted_return_date: Option<NaiveDate>,
}

impl PatientProfile {
    /// Recomputes every derived field of `patient` against the calendar's today.
    pub fn compute(patient: &Patient, calendar: &ClinicCalendar) -> Self {
        let today = calendar.today();
        let status = injury_status(&patient.injuries, calendar);

        Self {
            display_name: patient_name(patient),
            age: age(patient.date_of_birth, today),
            is_injured: status.is_injured,
            injured_since: status.injured_since,
            predicted_return_date: predicted_return_date(&patient.injuries, today),
        }
    }
}

/// Computes the profile of each patient in a batch.
pub fn compute_profiles<'p, I>(
    patients: I,
    calendar: &ClinicCalendar,
) -> BTreeMap<PatientId, PatientProfile>
where
    I: IntoIterator<Item = &'p Patient>,
{
    let profiles: BTreeMap<_, _> = patients
        .into_iter()
        .map(|patient| (patient.id, PatientProfile::compute(patient, calendar)))
        .collect();
    debug!(stage = "profile", count = profiles.len(), today = %calendar.today(), "computed patient profiles");
    profiles
}

/// Related `patient_name` of every injury owned by the given patients.
pub fn injury_patient_names<'p, I>(patients: I) -> BTreeMap<InjuryId, String>
where
    I: IntoIterator<Item = &'p Patient>,
{
    patients
        .into_iter()
        .flat_map(|patient| {
            let name = patient_name(patient);
            patient
                .injuries
                .iter()
                .map(move |injury| (injury.id, name.clone()))
        })
        .collect()
}
