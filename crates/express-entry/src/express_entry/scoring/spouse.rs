use serde::{Deserialize, Serialize};

use super::super::experience::{measure, ExperienceFilter};
use super::super::profile::{highest_counted, PartnerAssessment, Profile, SpouseProfile};
use super::config::ScoringConfig;
use super::human_capital::describe_language;
use super::tables::{
    exact_lookup, step_lookup, SPOUSE_CANADIAN_EXPERIENCE, SPOUSE_CAP, SPOUSE_EDUCATION,
    SPOUSE_LANGUAGE,
};
use super::{ScoreComponent, ScoreFactor};

/// Points contributed by an accompanying partner. All zero when no partner is assessed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseScore {
    pub assessed: bool,
    pub education: u16,
    pub language: u16,
    pub canadian_experience: u16,
    pub subtotal: u16,
}

pub(crate) fn score_spouse(
    profile: &Profile,
    config: &ScoringConfig,
) -> (SpouseScore, Vec<ScoreComponent>) {
    match &profile.partner {
        PartnerAssessment::NotAssessed => (SpouseScore::default(), Vec::new()),
        PartnerAssessment::Assessed(spouse) => score_partner(spouse, profile, config),
    }
}

fn score_partner(
    spouse: &SpouseProfile,
    profile: &Profile,
    config: &ScoringConfig,
) -> (SpouseScore, Vec<ScoreComponent>) {
    let mut components = Vec::with_capacity(3);

    let level = highest_counted(&spouse.credentials).map(|credential| credential.level);
    let education = level
        .and_then(|level| exact_lookup(&SPOUSE_EDUCATION, level))
        .unwrap_or(0);
    components.push(ScoreComponent::new(
        ScoreFactor::SpouseEducation,
        education,
        level
            .map(|level| level.label().to_string())
            .unwrap_or_else(|| "no recognised credential".to_string()),
    ));

    let language = spouse
        .first_language
        .as_ref()
        .map(|ability| {
            ability
                .clb
                .iter()
                .map(|(_, level)| step_lookup(&SPOUSE_LANGUAGE, level.value()).unwrap_or(0))
                .sum::<u16>()
        })
        .unwrap_or(0);
    components.push(ScoreComponent::new(
        ScoreFactor::SpouseLanguage,
        language,
        spouse
            .first_language
            .as_ref()
            .map(describe_language)
            .unwrap_or_else(|| "no valid language test".to_string()),
    ));

    let years = measure(
        &spouse.work,
        profile.as_of,
        ExperienceFilter::canadian(config.experience_lookback_years),
    )
    .whole_years();
    let canadian_experience = step_lookup(&SPOUSE_CANADIAN_EXPERIENCE, years).unwrap_or(0);
    components.push(ScoreComponent::new(
        ScoreFactor::SpouseCanadianExperience,
        canadian_experience,
        format!("{years} year(s) of full-time Canadian experience"),
    ));

    let subtotal = (education + language + canadian_experience).min(SPOUSE_CAP);

    (
        SpouseScore {
            assessed: true,
            education,
            language,
            canadian_experience,
            subtotal,
        },
        components,
    )
}
