use serde::{Deserialize, Serialize};

use super::super::experience::{measure, ExperienceFilter};
use super::super::profile::{LanguageAbility, Profile};
use super::config::ScoringConfig;
use super::tables::{
    exact_lookup, step_lookup, AGE, CANADIAN_EXPERIENCE, EDUCATION, FIRST_LANGUAGE,
    HUMAN_CAPITAL_CAP, SECOND_LANGUAGE, SECOND_LANGUAGE_CAP,
};
use super::{ScoreComponent, ScoreFactor};

/// Core human capital points for the principal applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreScore {
    pub age: u16,
    pub education: u16,
    pub first_language: u16,
    pub second_language: u16,
    pub canadian_experience: u16,
    pub subtotal: u16,
    /// Cap applied to this category (lower when a partner is assessed).
    pub cap: u16,
}

pub(crate) fn score_human_capital(
    profile: &Profile,
    config: &ScoringConfig,
) -> (CoreScore, Vec<ScoreComponent>) {
    let with_spouse = profile.has_spouse();
    let mut components = Vec::with_capacity(5);

    let age = exact_lookup(&AGE, profile.age)
        .map(|points| points.pick(with_spouse))
        .unwrap_or(0);
    components.push(ScoreComponent::new(
        ScoreFactor::Age,
        age,
        format!("age {}", profile.age),
    ));

    let (education, education_notes) = match profile.highest_education() {
        Some(level) => (
            exact_lookup(&EDUCATION, level)
                .map(|points| points.pick(with_spouse))
                .unwrap_or(0),
            level.label().to_string(),
        ),
        None => (0, "no recognised credential".to_string()),
    };
    components.push(ScoreComponent::new(
        ScoreFactor::Education,
        education,
        education_notes,
    ));

    let first_language = first_language_points(&profile.first_language, with_spouse);
    components.push(ScoreComponent::new(
        ScoreFactor::FirstOfficialLanguage,
        first_language,
        describe_language(&profile.first_language),
    ));

    let second_language = profile
        .second_language
        .as_ref()
        .map(|ability| second_language_points(ability, with_spouse))
        .unwrap_or(0);
    if let Some(ability) = &profile.second_language {
        components.push(ScoreComponent::new(
            ScoreFactor::SecondOfficialLanguage,
            second_language,
            describe_language(ability),
        ));
    }

    let years = measure(
        &profile.work,
        profile.as_of,
        ExperienceFilter::canadian(config.experience_lookback_years),
    )
    .whole_years();
    let canadian_experience = step_lookup(&CANADIAN_EXPERIENCE, years)
        .map(|points| points.pick(with_spouse))
        .unwrap_or(0);
    components.push(ScoreComponent::new(
        ScoreFactor::CanadianExperience,
        canadian_experience,
        format!("{years} year(s) of full-time Canadian experience"),
    ));

    let cap = HUMAN_CAPITAL_CAP.pick(with_spouse);
    let subtotal = (age + education + first_language + second_language + canadian_experience).min(cap);

    (
        CoreScore {
            age,
            education,
            first_language,
            second_language,
            canadian_experience,
            subtotal,
            cap,
        },
        components,
    )
}

fn first_language_points(ability: &LanguageAbility, with_spouse: bool) -> u16 {
    ability
        .clb
        .iter()
        .map(|(_, level)| {
            step_lookup(&FIRST_LANGUAGE, level.value())
                .map(|points| points.pick(with_spouse))
                .unwrap_or(0)
        })
        .sum()
}

fn second_language_points(ability: &LanguageAbility, with_spouse: bool) -> u16 {
    let raw: u16 = ability
        .clb
        .iter()
        .map(|(_, level)| step_lookup(&SECOND_LANGUAGE, level.value()).unwrap_or(0))
        .sum();
    raw.min(SECOND_LANGUAGE_CAP.pick(with_spouse))
}

pub(crate) fn describe_language(ability: &LanguageAbility) -> String {
    let levels: Vec<String> = ability
        .clb
        .iter()
        .map(|(skill, level)| format!("{} {}", skill.label(), level))
        .collect();
    format!(
        "{} ({}): {}",
        ability.language.label(),
        ability.test.code(),
        levels.join(", ")
    )
}
