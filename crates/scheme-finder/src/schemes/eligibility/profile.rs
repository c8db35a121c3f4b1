use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Yes/No questionnaire answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "y" => Some(Self::Yes),
            "no" | "false" | "n" => Some(Self::No),
            _ => None,
        }
    }

    pub fn is_yes(answer: Option<Self>) -> bool {
        matches!(answer, Some(Self::Yes))
    }
}

/// Self-declared attributes used to match eligibility.
///
/// Every field is optional; a blank answer means "not supplied", never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityProfile {
    #[serde(deserialize_with = "optional_text")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "optional_number")]
    pub age: Option<u32>,
    #[serde(deserialize_with = "optional_text")]
    pub marital_status: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub residence_type: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub caste: Option<String>,
    #[serde(deserialize_with = "optional_answer")]
    pub has_disability: Option<Answer>,
    #[serde(deserialize_with = "optional_number")]
    pub disability_percentage: Option<u32>,
    #[serde(deserialize_with = "optional_answer")]
    pub is_minority: Option<Answer>,
    #[serde(deserialize_with = "optional_answer")]
    pub owns_agri_land: Option<Answer>,
    #[serde(deserialize_with = "optional_answer")]
    pub is_student: Option<Answer>,
    #[serde(deserialize_with = "optional_text")]
    pub employment_status: Option<String>,
    #[serde(deserialize_with = "optional_answer")]
    pub is_gov_employee: Option<Answer>,
    #[serde(deserialize_with = "optional_text")]
    pub occupation: Option<String>,
    #[serde(rename = "isBPL", deserialize_with = "optional_answer")]
    pub is_bpl: Option<Answer>,
    #[serde(deserialize_with = "optional_number")]
    pub family_income: Option<u32>,
    #[serde(deserialize_with = "optional_number")]
    pub parent_income: Option<u32>,
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, found {number}"))),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a non-negative integer, found '{text}'"))),
        other => Err(D::Error::custom(format!(
            "expected a non-negative integer, found {other}"
        ))),
    }
}

fn optional_answer<'de, D>(deserializer: D) -> Result<Option<Answer>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(if flag { Answer::Yes } else { Answer::No })),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => Answer::parse(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected 'Yes' or 'No', found '{text}'"))),
        other => Err(D::Error::custom(format!("expected 'Yes' or 'No', found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_answers_mean_not_supplied() {
        let profile: EligibilityProfile = serde_json::from_value(json!({
            "gender": "Female",
            "age": "",
            "state": "  ",
            "isStudent": "",
            "disabilityPercentage": null
        }))
        .expect("profile parses");

        assert_eq!(profile.gender.as_deref(), Some("Female"));
        assert_eq!(profile.age, None);
        assert_eq!(profile.state, None);
        assert_eq!(profile.is_student, None);
        assert_eq!(profile.disability_percentage, None);
    }

    #[test]
    fn numeric_strings_and_form_answers_are_accepted() {
        let profile: EligibilityProfile = serde_json::from_value(json!({
            "age": "24",
            "familyIncome": 250000,
            "hasDisability": "Yes",
            "isBPL": "No",
            "ownsAgriLand": true
        }))
        .expect("profile parses");

        assert_eq!(profile.age, Some(24));
        assert_eq!(profile.family_income, Some(250_000));
        assert_eq!(profile.has_disability, Some(Answer::Yes));
        assert_eq!(profile.is_bpl, Some(Answer::No));
        assert_eq!(profile.owns_agri_land, Some(Answer::Yes));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = serde_json::from_value::<EligibilityProfile>(json!({"age": "twenty"}));
        assert!(result.is_err());
    }
}
