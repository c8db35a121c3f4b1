use serde::{Deserialize, Serialize};

use super::classifier::SchemeClassification;
use super::profile::{Answer, EligibilityProfile};
use super::rules::{
    age_in_range, required_disability_percent, requires_disability, special_requirements,
    specific, specific_castes, specific_occupation, specific_state, Exclusion,
};
use crate::schemes::domain::Scheme;

/// Profile signal a score component was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    Gender,
    State,
    Caste,
    Residence,
    MaritalStatus,
    EmploymentStatus,
    Occupation,
    Age,
    Disability,
    SpecialCategory,
    StudentAlignment,
}

/// Discrete contribution to a scored match, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub signal: MatchSignal,
    pub score: i16,
    pub notes: String,
}

struct Scorecard {
    components: Vec<ScoreComponent>,
    total: i16,
}

impl Scorecard {
    fn new() -> Self {
        Self {
            components: Vec::new(),
            total: 0,
        }
    }

    fn push(&mut self, signal: MatchSignal, score: i16, notes: String) {
        self.total += score;
        self.components.push(ScoreComponent {
            signal,
            score,
            notes,
        });
    }

    /// Soft requirement: points when the profile matches, a penalty when it
    /// declares something else, nothing when the profile is silent.
    fn soft(
        &mut self,
        signal: MatchSignal,
        weight: i16,
        required: Option<&str>,
        declared: Option<&str>,
    ) {
        let (Some(required), Some(declared)) = (required, declared.map(str::trim)) else {
            return;
        };
        if declared == required {
            self.push(signal, weight, format!("matches required {required}"));
        } else {
            self.push(
                signal,
                -weight,
                format!("declared {declared}, scheme targets {required}"),
            );
        }
    }
}

/// Scored pass: institutional schemes and declared conflicts on gender, state
/// or caste still exclude; everything else adds or subtracts points.
pub(crate) fn score_scheme(
    scheme: &Scheme,
    profile: &EligibilityProfile,
    classification: SchemeClassification,
) -> Result<(i16, Vec<ScoreComponent>), Exclusion> {
    if classification.is_institutional {
        return Err(Exclusion::Institutional);
    }

    let mut card = Scorecard::new();

    if let (Some(required), Some(declared)) = (specific(&scheme.filter_gender), profile.gender.as_deref()) {
        if declared.trim() != required {
            return Err(Exclusion::GenderMismatch {
                required: required.to_string(),
            });
        }
        card.push(MatchSignal::Gender, 20, format!("scheme targets {required} applicants"));
    }

    if let (Some(required), Some(declared)) = (specific_state(scheme), profile.state.as_deref()) {
        if declared.trim() != required {
            return Err(Exclusion::StateMismatch {
                required: required.to_string(),
            });
        }
        card.push(MatchSignal::State, 25, format!("scheme is run by {required}"));
    }

    if let (Some(castes), Some(declared)) = (specific_castes(scheme), profile.caste.as_deref()) {
        if !castes.contains(&declared.trim()) {
            return Err(Exclusion::CasteMismatch {
                accepted: castes.iter().map(|caste| caste.to_string()).collect(),
            });
        }
        card.push(MatchSignal::Caste, 20, format!("scheme reserved for {}", declared.trim()));
    }

    card.soft(
        MatchSignal::Residence,
        10,
        specific(&scheme.filter_residence),
        profile.residence_type.as_deref(),
    );
    card.soft(
        MatchSignal::MaritalStatus,
        10,
        specific(&scheme.filter_marital_status),
        profile.marital_status.as_deref(),
    );
    card.soft(
        MatchSignal::EmploymentStatus,
        10,
        specific(&scheme.filter_employment_status),
        profile.employment_status.as_deref(),
    );
    card.soft(
        MatchSignal::Occupation,
        15,
        specific_occupation(scheme),
        profile.occupation.as_deref(),
    );

    if let Some(age) = profile.age {
        match age_in_range(scheme, age) {
            Some(true) => card.push(MatchSignal::Age, 0, format!("age {age} within range")),
            Some(false) => card.push(MatchSignal::Age, -15, format!("age {age} outside range")),
            None => {}
        }
    }

    if requires_disability(scheme) {
        let threshold_met = match (
            profile.disability_percentage,
            required_disability_percent(&scheme.filter_disability_percentage),
        ) {
            (Some(declared), Some(required)) => declared >= required,
            _ => true,
        };
        if Answer::is_yes(profile.has_disability) && threshold_met {
            card.push(
                MatchSignal::Disability,
                15,
                format!("meets {}", scheme.filter_disability_percentage),
            );
        } else {
            card.push(
                MatchSignal::Disability,
                -30,
                format!("requires {}", scheme.filter_disability_percentage),
            );
        }
    }

    for requirement in special_requirements(scheme) {
        if requirement.declared(profile) {
            card.push(
                MatchSignal::SpecialCategory,
                10,
                format!("declared {}", requirement.label()),
            );
        } else {
            card.push(
                MatchSignal::SpecialCategory,
                -20,
                format!("requires {}", requirement.label()),
            );
        }
    }

    match (profile.is_student, classification.is_student_oriented) {
        (Some(Answer::Yes), true) => card.push(
            MatchSignal::StudentAlignment,
            10,
            "student scheme for a student".to_string(),
        ),
        (Some(Answer::Yes), false) => card.push(
            MatchSignal::StudentAlignment,
            -20,
            "not a student scheme".to_string(),
        ),
        (Some(Answer::No), true) => card.push(
            MatchSignal::StudentAlignment,
            -20,
            "student scheme for a non-student".to_string(),
        ),
        _ => {}
    }

    Ok((card.total, card.components))
}
