use serde::{Deserialize, Serialize};

use super::super::domain::EducationLevel;
use super::super::experience::{measure, ExperienceFilter};
use super::super::profile::Profile;
use super::config::ScoringConfig;
use super::tables::{
    grid_cell, CERTIFICATE_LANGUAGE, COMBINATION_CAP, EDUCATION_FOREIGN_EXPERIENCE,
    EDUCATION_LANGUAGE, FOREIGN_CANADIAN_EXPERIENCE, TRANSFERABILITY_CAP,
};
use super::{ScoreComponent, ScoreFactor};

/// Combination bonuses, each capped individually before the category cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferabilityScore {
    pub education_language: u16,
    pub education_foreign_experience: u16,
    pub foreign_canadian_experience: u16,
    pub certificate_language: u16,
    pub subtotal: u16,
}

/// Tier inputs shared by the four grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tiers {
    education: u8,
    language: u8,
    trade_language: u8,
    foreign_experience: u8,
    canadian_experience: u8,
    certificate: u8,
}

impl Tiers {
    fn of(profile: &Profile, config: &ScoringConfig) -> Self {
        let min_clb = profile.first_language.clb.min().value();
        let foreign_years = measure(
            &profile.work,
            profile.as_of,
            ExperienceFilter::foreign(config.experience_lookback_years),
        )
        .whole_years();
        let canadian_years = measure(
            &profile.work,
            profile.as_of,
            ExperienceFilter::canadian(config.experience_lookback_years),
        )
        .whole_years();

        Self {
            education: education_tier(profile.highest_education()),
            language: match min_clb {
                0..=6 => 0,
                7 | 8 => 1,
                _ => 2,
            },
            trade_language: match min_clb {
                0..=4 => 0,
                5 | 6 => 1,
                _ => 2,
            },
            foreign_experience: match foreign_years {
                0 => 0,
                1 | 2 => 1,
                _ => 2,
            },
            canadian_experience: match canadian_years {
                0 => 0,
                1 => 1,
                _ => 2,
            },
            certificate: u8::from(profile.certificate_of_qualification),
        }
    }
}

fn education_tier(level: Option<EducationLevel>) -> u8 {
    match level {
        None | Some(EducationLevel::HighSchool) => 0,
        Some(
            EducationLevel::OneYearDiploma
            | EducationLevel::TwoYearDiploma
            | EducationLevel::Bachelors,
        ) => 1,
        Some(EducationLevel::TwoOrMoreDegrees | EducationLevel::Masters | EducationLevel::Phd) => 2,
    }
}

pub(crate) fn score_transferability(
    profile: &Profile,
    config: &ScoringConfig,
) -> (TransferabilityScore, Vec<ScoreComponent>) {
    let tiers = Tiers::of(profile, config);
    let combination = |points: u16| points.min(COMBINATION_CAP);

    let education_language =
        combination(grid_cell(&EDUCATION_LANGUAGE, tiers.education, tiers.language));
    let education_foreign_experience = combination(grid_cell(
        &EDUCATION_FOREIGN_EXPERIENCE,
        tiers.education,
        tiers.foreign_experience,
    ));
    let foreign_canadian_experience = combination(grid_cell(
        &FOREIGN_CANADIAN_EXPERIENCE,
        tiers.foreign_experience,
        tiers.canadian_experience,
    ));
    let certificate_language = combination(grid_cell(
        &CERTIFICATE_LANGUAGE,
        tiers.certificate,
        tiers.trade_language,
    ));

    let components = vec![
        ScoreComponent::new(
            ScoreFactor::EducationLanguage,
            education_language,
            format!("education tier {}, language tier {}", tiers.education, tiers.language),
        ),
        ScoreComponent::new(
            ScoreFactor::EducationForeignExperience,
            education_foreign_experience,
            format!(
                "education tier {}, foreign experience tier {}",
                tiers.education, tiers.foreign_experience
            ),
        ),
        ScoreComponent::new(
            ScoreFactor::ForeignCanadianExperience,
            foreign_canadian_experience,
            format!(
                "foreign experience tier {}, Canadian experience tier {}",
                tiers.foreign_experience, tiers.canadian_experience
            ),
        ),
        ScoreComponent::new(
            ScoreFactor::CertificateLanguage,
            certificate_language,
            format!(
                "certificate of qualification {}, language tier {}",
                if tiers.certificate == 1 { "held" } else { "absent" },
                tiers.trade_language
            ),
        ),
    ];

    let subtotal = (education_language
        + education_foreign_experience
        + foreign_canadian_experience
        + certificate_language)
        .min(TRANSFERABILITY_CAP);

    (
        TransferabilityScore {
            education_language,
            education_foreign_experience,
            foreign_canadian_experience,
            certificate_language,
            subtotal,
        },
        components,
    )
}
