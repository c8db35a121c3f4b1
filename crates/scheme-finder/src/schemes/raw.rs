//! Raw dataset records as they appear in the source JSON.
//!
//! Every field is optional and deserialized leniently: a field with an
//! unexpected shape collapses to `None` instead of failing the whole record,
//! so one malformed entry never aborts loading the rest of the dataset.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Numeric `{min, max}` range used by `age_criteria` and `disability_percent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeCriteria {
    #[serde(default, deserialize_with = "lenient_number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,
}

impl RangeCriteria {
    /// Lower bound, with zero treated as unset.
    pub fn lower(&self) -> Option<f64> {
        self.min.filter(|value| *value != 0.0)
    }

    /// Upper bound, with zero treated as unset.
    pub fn upper(&self) -> Option<f64> {
        self.max.filter(|value| *value != 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFaq {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSchemeRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub ministry: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub states: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub gender: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub caste_categories: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub residence: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub benefit_type: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub marital_status: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub employment_status: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub occupations: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_or_list")]
    pub special_categories: Option<StringOrList>,
    #[serde(default, deserialize_with = "lenient_range")]
    pub age_criteria: Option<RangeCriteria>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub requires_disability: bool,
    #[serde(default, deserialize_with = "lenient_range")]
    pub disability_percent: Option<RangeCriteria>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub scheme_category: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub benefits: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub eligibility: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exclusions: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub application_process: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub documents_required: Option<String>,
    #[serde(default, deserialize_with = "lenient_faqs")]
    pub faqs: Vec<RawFaq>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sources_references: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheme_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub implementation_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(items.into_iter().filter_map(scalar_to_string).collect()),
        _ => None,
    })
}

fn lenient_string_or_list<'de, D>(deserializer: D) -> Result<Option<StringOrList>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(StringOrList::One(text)),
        Value::Array(items) => Some(StringOrList::Many(
            items.into_iter().filter_map(scalar_to_string).collect(),
        )),
        _ => None,
    })
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value))
}

fn lenient_range<'de, D>(deserializer: D) -> Result<Option<RangeCriteria>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => Some(RangeCriteria {
            min: map.get("min").and_then(number_from),
            max: map.get("max").and_then(number_from),
        }),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    })
}

fn lenient_faqs<'de, D>(deserializer: D) -> Result<Vec<RawFaq>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RawFaq>(item).ok())
            .filter(|faq| faq.question.is_some() || faq.answer.is_some())
            .collect(),
        _ => Vec::new(),
    })
}
