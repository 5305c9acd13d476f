use super::Defaulted;
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[display("male")]
    Male,
    #[display("female")]
    Female,
    #[display("other")]
    Other,
    #[default]
    #[display("unknown")]
    Unknown,
}

impl Gender {
    /// Case-insensitive match on the FHIR administrative gender codes
    pub fn parse(code: &str) -> Option<Gender> {
        match code.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "unknown" => Some(Gender::Unknown),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Patient {
    pub patient_id: String,
    /// Given names joined by spaces, then a space and the family name.
    /// A patient without given names has a leading space.
    pub full_name: String,
    pub family_name: String,
    pub given_name: String,
    pub gender: Gender,
    pub birthdate: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(skip)]
    pub defaulted: Defaulted,
}

impl Patient {
    pub fn was_defaulted(&self, field: &str) -> bool {
        self.defaulted.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::Gender;

    #[test]
    fn gender_codes_are_case_insensitive() {
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("MALE"), Some(Gender::Male));
        assert_eq!(Gender::parse("Other"), Some(Gender::Other));
        assert_eq!(Gender::parse("unknown"), Some(Gender::Unknown));
        assert_eq!(Gender::parse("f"), None);
    }

    #[test]
    fn gender_displays_as_code() {
        assert_eq!(Gender::Female.to_string(), "female");
        assert_eq!(Gender::default().to_string(), "unknown");
    }
}
