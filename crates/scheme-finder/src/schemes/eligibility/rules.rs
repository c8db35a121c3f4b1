use serde::{Deserialize, Serialize};

use super::classifier::SchemeClassification;
use super::profile::{Answer, EligibilityProfile};
use crate::schemes::domain::{
    parse_age_tag, Scheme, ALL, ALL_AGES, ALL_INDIA, CENTRAL, NO_DISABILITY_REQUIREMENT,
    NO_OCCUPATION,
};

/// First failing check that removed a scheme from the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Exclusion {
    GenderMismatch { required: String },
    StateMismatch { required: String },
    CasteMismatch { accepted: Vec<String> },
    ResidenceMismatch { required: String },
    MaritalStatusMismatch { required: String },
    AgeOutOfRange { age: u32 },
    EmploymentMismatch { required: String },
    OccupationMismatch { required: String },
    DisabilityRequired,
    DisabilityBelowThreshold { required: u32, declared: u32 },
    SpecialCategoryRequired { category: SpecialRequirement },
    Institutional,
    StudentSchemesOnly,
    NotForStudents,
    NoSpecificMatch,
}

impl Exclusion {
    pub fn summary(&self) -> String {
        match self {
            Exclusion::GenderMismatch { required } => format!("scheme is for {required} applicants"),
            Exclusion::StateMismatch { required } => format!("scheme is limited to {required}"),
            Exclusion::CasteMismatch { accepted } => {
                format!("scheme accepts castes: {}", accepted.join(", "))
            }
            Exclusion::ResidenceMismatch { required } => format!("scheme is for {required} residents"),
            Exclusion::MaritalStatusMismatch { required } => {
                format!("scheme requires marital status {required}")
            }
            Exclusion::AgeOutOfRange { age } => format!("age {age} outside the scheme's age range"),
            Exclusion::EmploymentMismatch { required } => {
                format!("scheme requires employment status {required}")
            }
            Exclusion::OccupationMismatch { required } => format!("scheme is for {required}"),
            Exclusion::DisabilityRequired => "scheme requires a declared disability".to_string(),
            Exclusion::DisabilityBelowThreshold { required, declared } => {
                format!("declared disability {declared}% below required {required}%")
            }
            Exclusion::SpecialCategoryRequired { category } => {
                format!("scheme requires {}", category.label())
            }
            Exclusion::Institutional => "scheme targets institutions, not individuals".to_string(),
            Exclusion::StudentSchemesOnly => "only student schemes requested".to_string(),
            Exclusion::NotForStudents => "scheme is student oriented".to_string(),
            Exclusion::NoSpecificMatch => "scheme has no specific targeting criterion".to_string(),
        }
    }
}

/// Special-category membership a scheme can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRequirement {
    BelowPovertyLine,
    Minority,
    Farmer,
}

impl SpecialRequirement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowPovertyLine => "Below Poverty Line membership",
            Self::Minority => "minority community membership",
            Self::Farmer => "agricultural land ownership",
        }
    }

    pub fn declared(self, profile: &EligibilityProfile) -> bool {
        let answer = match self {
            Self::BelowPovertyLine => profile.is_bpl,
            Self::Minority => profile.is_minority,
            Self::Farmer => profile.owns_agri_land,
        };
        Answer::is_yes(answer)
    }
}

/// Requirements signalled by the scheme's special-category labels.
pub(crate) fn special_requirements(scheme: &Scheme) -> Vec<SpecialRequirement> {
    let labels: Vec<String> = scheme
        .filter_special_categories
        .values()
        .into_iter()
        .map(|label| label.trim().to_lowercase())
        .collect();

    let mut requirements = Vec::new();
    if labels
        .iter()
        .any(|label| label == "below poverty line" || label.contains("bpl"))
    {
        requirements.push(SpecialRequirement::BelowPovertyLine);
    }
    if labels.iter().any(|label| label.contains("minority")) {
        requirements.push(SpecialRequirement::Minority);
    }
    if labels
        .iter()
        .any(|label| label.contains("farmer") || label.contains("agriculture"))
    {
        requirements.push(SpecialRequirement::Farmer);
    }
    requirements
}

/// Value of a single-valued field when it restricts eligibility.
pub(crate) fn specific(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != ALL).then_some(value)
}

pub(crate) fn specific_state(scheme: &Scheme) -> Option<&str> {
    let state = scheme.classified_state.trim();
    (!state.is_empty() && state != CENTRAL && state != ALL_INDIA).then_some(state)
}

/// Caste list when it restricts eligibility.
pub(crate) fn specific_castes(scheme: &Scheme) -> Option<Vec<&str>> {
    let castes: Vec<&str> = scheme.filter_caste.iter().map(|caste| caste.trim()).collect();
    (!castes.is_empty() && !castes.contains(&ALL)).then_some(castes)
}

pub(crate) fn specific_occupation(scheme: &Scheme) -> Option<&str> {
    specific(&scheme.filter_occupation).filter(|occupation| *occupation != NO_OCCUPATION)
}

/// `None` when the scheme carries no usable age restriction.
pub(crate) fn age_in_range(scheme: &Scheme, age: u32) -> Option<bool> {
    let tags: Vec<&str> = scheme.age_tags.iter().map(|tag| tag.trim()).collect();
    if tags.is_empty() || tags.iter().any(|tag| *tag == ALL_AGES || *tag == ALL) {
        return None;
    }
    Some(tags.iter().any(|tag| {
        parse_age_tag(tag).is_some_and(|(min, max)| age >= min && age <= max)
    }))
}

/// Minimum percentage encoded in a disability bucket label, e.g. `Moderate Disability (40-59%)`.
pub(crate) fn required_disability_percent(label: &str) -> Option<u32> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let digits: String = label[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub(crate) fn requires_disability(scheme: &Scheme) -> bool {
    let bucket = scheme.filter_disability_percentage.trim();
    !bucket.is_empty() && bucket != NO_DISABILITY_REQUIREMENT
}

fn required_match(
    scheme_value: Option<&str>,
    declared: Option<&str>,
    has_specific_match: &mut bool,
    mismatch: impl FnOnce(String) -> Exclusion,
) -> Result<(), Exclusion> {
    if let Some(required) = scheme_value {
        if declared.map(str::trim) != Some(required) {
            return Err(mismatch(required.to_string()));
        }
        *has_specific_match = true;
    }
    Ok(())
}

/// Strict pass: every specified scheme requirement must match; the first
/// failing check excludes. A scheme is only kept when it matched the profile
/// on at least one specific gender, state, caste, residence or marital status.
pub(crate) fn check_strict(
    scheme: &Scheme,
    profile: &EligibilityProfile,
    classification: SchemeClassification,
) -> Result<(), Exclusion> {
    let mut has_specific_match = false;

    required_match(
        specific(&scheme.filter_gender),
        profile.gender.as_deref(),
        &mut has_specific_match,
        |required| Exclusion::GenderMismatch { required },
    )?;

    required_match(
        specific_state(scheme),
        profile.state.as_deref(),
        &mut has_specific_match,
        |required| Exclusion::StateMismatch { required },
    )?;

    if let Some(castes) = specific_castes(scheme) {
        let declared = profile.caste.as_deref().map(str::trim);
        if !declared.is_some_and(|caste| castes.contains(&caste)) {
            return Err(Exclusion::CasteMismatch {
                accepted: castes.iter().map(|caste| caste.to_string()).collect(),
            });
        }
        has_specific_match = true;
    }

    required_match(
        specific(&scheme.filter_residence),
        profile.residence_type.as_deref(),
        &mut has_specific_match,
        |required| Exclusion::ResidenceMismatch { required },
    )?;

    required_match(
        specific(&scheme.filter_marital_status),
        profile.marital_status.as_deref(),
        &mut has_specific_match,
        |required| Exclusion::MaritalStatusMismatch { required },
    )?;

    // Age narrows the result but never counts as a specific match.
    if let Some(age) = profile.age {
        if age_in_range(scheme, age) == Some(false) {
            return Err(Exclusion::AgeOutOfRange { age });
        }
    }

    if let Some(employment) = profile.employment_status.as_deref() {
        if let Some(required) = specific(&scheme.filter_employment_status) {
            if employment.trim() != required {
                return Err(Exclusion::EmploymentMismatch {
                    required: required.to_string(),
                });
            }
        }
    }

    if let Some(occupation) = profile.occupation.as_deref() {
        if let Some(required) = specific_occupation(scheme) {
            if occupation.trim() != required {
                return Err(Exclusion::OccupationMismatch {
                    required: required.to_string(),
                });
            }
        }
    }

    if requires_disability(scheme) {
        if !Answer::is_yes(profile.has_disability) {
            return Err(Exclusion::DisabilityRequired);
        }
        if let (Some(declared), Some(required)) = (
            profile.disability_percentage,
            required_disability_percent(&scheme.filter_disability_percentage),
        ) {
            if declared < required {
                return Err(Exclusion::DisabilityBelowThreshold { required, declared });
            }
        }
    }

    if let Some(category) = special_requirements(scheme)
        .into_iter()
        .find(|requirement| !requirement.declared(profile))
    {
        return Err(Exclusion::SpecialCategoryRequired { category });
    }

    if classification.is_institutional {
        return Err(Exclusion::Institutional);
    }

    match profile.is_student {
        Some(Answer::Yes) if !classification.is_student_oriented => {
            return Err(Exclusion::StudentSchemesOnly)
        }
        Some(Answer::No) if classification.is_student_oriented => {
            return Err(Exclusion::NotForStudents)
        }
        _ => {}
    }

    if !has_specific_match {
        return Err(Exclusion::NoSpecificMatch);
    }

    Ok(())
}
