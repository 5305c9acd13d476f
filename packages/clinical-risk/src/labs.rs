//! Latest lab value per patient and test.

use crate::config::RulesConfig;
use crate::log::LABS;
use crate::model::{Observation, PatientRecord};
use derive_more::Display;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum LabKind {
    #[display("HbA1c")]
    Glycemic,
    #[display("Cholesterol")]
    Lipid,
}

impl LabKind {
    pub fn test_name(self, rules: &RulesConfig) -> &str {
        match self {
            LabKind::Glycemic => &rules.glycemic_test,
            LabKind::Lipid => &rules.lipid_test,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabValue {
    pub value: f64,
    pub date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LatestLabValues {
    pub glycemic: Option<LabValue>,
    pub lipid: Option<LabValue>,
}

impl LatestLabValues {
    pub fn value(&self, kind: LabKind) -> Option<f64> {
        self.lab(kind).map(|lab| lab.value)
    }

    pub fn lab(&self, kind: LabKind) -> Option<&LabValue> {
        match kind {
            LabKind::Glycemic => self.glycemic.as_ref(),
            LabKind::Lipid => self.lipid.as_ref(),
        }
    }
}

///
/// Reduces `items` to the greatest item per key under `cmp`.
///
/// On ties the first item encountered is kept, since an item only replaces the
/// current one when it compares strictly greater.
///
pub fn latest_by_key<'a, T, K, F, C>(items: &'a [T], key_fn: F, cmp: C) -> BTreeMap<K, &'a T>
where
    K: Ord,
    F: Fn(&T) -> K,
    C: Fn(&T, &T) -> Ordering,
{
    let mut latest: BTreeMap<K, &T> = BTreeMap::new();

    for item in items {
        latest
            .entry(key_fn(item))
            .and_modify(|current| {
                if cmp(item, current) == Ordering::Greater {
                    *current = item;
                }
            })
            .or_insert(item);
    }

    latest
}

/// Absent dates order before any present one; present dates compare as text.
fn by_date(a: &Observation, b: &Observation) -> Ordering {
    a.date.cmp(&b.date)
}

/// Latest value per patient for one test.
/// Observations without a value or without a resolved patient are skipped.
pub fn resolve_series(observations: &[Observation], test_name: &str) -> BTreeMap<String, LabValue> {
    let matching: Vec<&Observation> = observations
        .iter()
        .filter(|o| o.is_test(test_name))
        .collect();

    let usable: Vec<&Observation> = matching
        .iter()
        .copied()
        .filter(|o| o.value.is_some() && o.is_resolved())
        .collect();

    if usable.len() < matching.len() {
        debug!(
            target: LABS,
            msg = "Skipped observations without a value or patient",
            test = test_name,
            skipped = matching.len() - usable.len(),
        );
    }

    let latest = latest_by_key(&usable, |o| o.patient_id.clone(), |a, b| by_date(a, b));

    latest
        .into_iter()
        .filter_map(|(patient_id, o)| {
            o.value.map(|value| {
                (
                    patient_id,
                    LabValue {
                        value,
                        date: o.date.clone(),
                    },
                )
            })
        })
        .collect()
}

/// Outer join of the glycemic and lipid series on patient id.
pub fn resolve_latest_labs(
    observations: &[Observation],
    rules: &RulesConfig,
) -> BTreeMap<String, LatestLabValues> {
    let glycemic = resolve_series(observations, LabKind::Glycemic.test_name(rules));
    let lipid = resolve_series(observations, LabKind::Lipid.test_name(rules));

    info!(
        target: LABS,
        msg = "Resolved latest lab values",
        glycemic_patients = glycemic.len(),
        lipid_patients = lipid.len(),
    );

    let mut labs: BTreeMap<String, LatestLabValues> = BTreeMap::new();

    for (patient_id, value) in glycemic {
        labs.entry(patient_id).or_default().glycemic = Some(value);
    }
    for (patient_id, value) in lipid {
        labs.entry(patient_id).or_default().lipid = Some(value);
    }

    labs
}
