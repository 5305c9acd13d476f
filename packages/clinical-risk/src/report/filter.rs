use super::PatientRiskRecord;

///
/// Dashboard filter over per-patient records.
///
/// Both bounds of the age range are inclusive. A record without an age never
/// matches when either bound is set.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientFilter {
    pub category: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl PatientFilter {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn age_range(mut self, min_age: u32, max_age: u32) -> Self {
        self.min_age = Some(min_age);
        self.max_age = Some(max_age);
        self
    }

    fn has_age_range(&self) -> bool {
        self.min_age.is_some() || self.max_age.is_some()
    }

    pub fn matches(&self, record: &PatientRiskRecord) -> bool {
        if let Some(category) = &self.category {
            if &record.risk_category != category {
                return false;
            }
        }

        if !self.has_age_range() {
            return true;
        }

        match record.age {
            Some(age) => {
                self.min_age.map_or(true, |min| age >= min)
                    && self.max_age.map_or(true, |max| age <= max)
            }
            None => false,
        }
    }

    pub fn apply<'a>(&self, records: &'a [PatientRiskRecord]) -> Vec<&'a PatientRiskRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
