use crate::log::ENRICH;
use crate::model::Patient;
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

///
/// Age brackets over half-open ranges `[0,18) [18,35) [35,50) [50,65) [65,∞)`.
///
/// Labels are the published ones. They do not line up with the ranges: an age of
/// exactly 18 is in `19-35`.
///
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AgeBracket {
    #[display("0-18")]
    #[serde(rename = "0-18")]
    Child,
    #[display("19-35")]
    #[serde(rename = "19-35")]
    YoungAdult,
    #[display("36-50")]
    #[serde(rename = "36-50")]
    Adult,
    #[display("51-65")]
    #[serde(rename = "51-65")]
    MiddleAged,
    #[display("65+")]
    #[serde(rename = "65+")]
    Senior,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 5] = [
        AgeBracket::Child,
        AgeBracket::YoungAdult,
        AgeBracket::Adult,
        AgeBracket::MiddleAged,
        AgeBracket::Senior,
    ];

    pub fn for_age(age: u32) -> AgeBracket {
        match age {
            0..18 => AgeBracket::Child,
            18..35 => AgeBracket::YoungAdult,
            35..50 => AgeBracket::Adult,
            50..65 => AgeBracket::MiddleAged,
            _ => AgeBracket::Senior,
        }
    }
}

/// Whole years from `birthdate` to `today`.
/// `None` when the date does not parse or lies in the future.
pub fn calculate_age(birthdate: &str, today: NaiveDate) -> Option<u32> {
    let born = NaiveDate::parse_from_str(birthdate.trim(), BIRTHDATE_FORMAT).ok()?;
    today.years_since(born)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedPatient {
    #[serde(flatten)]
    pub patient: Patient,
    pub age: Option<u32>,
    pub age_group: Option<AgeBracket>,
}

impl EnrichedPatient {
    pub fn new(patient: Patient, today: NaiveDate) -> Self {
        let age = patient
            .birthdate
            .as_deref()
            .and_then(|birthdate| calculate_age(birthdate, today));

        if age.is_none() {
            debug!(
                target: ENRICH,
                msg = "No age for patient",
                patient_id = patient.patient_id,
                birthdate = patient.birthdate,
            );
        }

        EnrichedPatient {
            patient,
            age,
            age_group: age.map(AgeBracket::for_age),
        }
    }
}

/// Attaches age and age bracket as of `today`. Input order is kept.
pub fn enrich_patients(patients: &[Patient], today: NaiveDate) -> Vec<EnrichedPatient> {
    let enriched: Vec<EnrichedPatient> = patients
        .iter()
        .cloned()
        .map(|patient| EnrichedPatient::new(patient, today))
        .collect();

    info!(
        target: ENRICH,
        msg = "Enriched patients",
        patients = enriched.len(),
        without_age = enriched.iter().filter(|p| p.age.is_none()).count(),
        as_of = %today,
    );

    enriched
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;

    const BOUNDARIES: [u32; 4] = [18, 35, 50, 65];

    proptest! {
        /// An age at a boundary never shares a bracket with the year before it
        #[test]
        fn boundary_ages_start_a_new_bracket(index in 0..BOUNDARIES.len()) {
            let age = BOUNDARIES[index];
            prop_assert!(AgeBracket::for_age(age) > AgeBracket::for_age(age - 1));
        }

        /// Brackets never decrease as age increases
        #[test]
        fn brackets_are_monotonic(age in 0u32..130) {
            prop_assert!(AgeBracket::for_age(age) <= AgeBracket::for_age(age + 1));
        }

        /// On the birthday the age is exactly the difference in years
        #[test]
        fn age_on_birthday(year in 1900i32..2000, years in 0u32..100, month in 1u32..=12, day in 1u32..=28) {
            let born = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let today = NaiveDate::from_ymd_opt(year + years as i32, month, day).unwrap();
            let birthdate = born.format(BIRTHDATE_FORMAT).to_string();

            prop_assert_eq!(calculate_age(&birthdate, today), Some(years));
            prop_assert_eq!(today.year() - born.year(), years as i32);
        }
    }
}
