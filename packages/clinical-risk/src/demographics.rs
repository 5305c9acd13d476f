//! Population demographics over enriched patients.

use crate::enrich::{AgeBracket, EnrichedPatient};
use crate::model::Gender;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Age statistics are absent when no patient has an age.
/// Patients without an age or a state are left out of those distributions.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Demographics {
    pub total_patients: usize,
    pub gender_distribution: BTreeMap<Gender, usize>,
    pub age_mean: Option<f64>,
    pub age_median: Option<f64>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub age_group_distribution: BTreeMap<AgeBracket, usize>,
    pub state_distribution: BTreeMap<String, usize>,
}

pub fn demographics(patients: &[EnrichedPatient]) -> Demographics {
    let mut ages: Vec<u32> = patients.iter().filter_map(|p| p.age).collect();
    ages.sort_unstable();

    Demographics {
        total_patients: patients.len(),
        gender_distribution: count(patients.iter().map(|p| p.patient.gender)),
        age_mean: mean(&ages),
        age_median: median(&ages),
        age_min: ages.first().copied(),
        age_max: ages.last().copied(),
        age_group_distribution: count(patients.iter().filter_map(|p| p.age_group)),
        state_distribution: count(
            patients
                .iter()
                .map(|p| p.patient.state.trim())
                .filter(|state| !state.is_empty())
                .map(str::to_owned),
        ),
    }
}

fn count<K: Ord>(keys: impl Iterator<Item = K>) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts
}

fn mean(sorted: &[u32]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let sum: u64 = sorted.iter().map(|&age| u64::from(age)).sum();
    Some(sum as f64 / sorted.len() as f64)
}

fn median(sorted: &[u32]) -> Option<f64> {
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(f64::from(sorted[mid])),
        _ => Some((f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0),
    }
}
