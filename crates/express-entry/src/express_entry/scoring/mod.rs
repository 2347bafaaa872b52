mod additional;
mod aggregate;
mod config;
mod human_capital;
mod spouse;
mod tables;
mod transferability;

pub use additional::{AdditionalScore, EligibilityWarning};
pub use aggregate::ScoreBreakdown;
pub use config::{CanadianStudyConfig, FrenchBonusConfig, JobOfferPoints, ScoringConfig};
pub use human_capital::CoreScore;
pub use spouse::SpouseScore;
pub use transferability::TransferabilityScore;

use serde::{Deserialize, Serialize};

use super::profile::Profile;

/// Stateless calculator applying the point tables and scoring dials to a normalized profile.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, profile: &Profile) -> ScoreBreakdown {
        let (core, mut components) = human_capital::score_human_capital(profile, &self.config);
        let (spouse, spouse_components) = spouse::score_spouse(profile, &self.config);
        let (transferability, transferability_components) =
            transferability::score_transferability(profile, &self.config);
        let (additional, additional_components, warnings) =
            additional::score_additional(profile, &self.config);

        components.extend(spouse_components);
        components.extend(transferability_components);
        components.extend(additional_components);

        aggregate::aggregate(core, spouse, transferability, additional, warnings, components)
    }
}

/// Factor a [`ScoreComponent`] was awarded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Age,
    Education,
    FirstOfficialLanguage,
    SecondOfficialLanguage,
    CanadianExperience,
    SpouseEducation,
    SpouseLanguage,
    SpouseCanadianExperience,
    EducationLanguage,
    EducationForeignExperience,
    ForeignCanadianExperience,
    CertificateLanguage,
    ProvincialNomination,
    JobOffer,
    FrenchLanguage,
    CanadianStudy,
    Sibling,
}

/// Discrete contribution to a ranking score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: u16,
    pub notes: String,
}

impl ScoreComponent {
    pub(crate) fn new(factor: ScoreFactor, points: u16, notes: String) -> Self {
        Self {
            factor,
            points,
            notes,
        }
    }
}
