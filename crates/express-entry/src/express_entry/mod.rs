//! Comprehensive Ranking System scoring and federal program eligibility.
//!
//! Raw profiles pass through the [`normalizer`] once; the resulting [`Profile`] feeds the
//! [`scoring`] calculators, the [`eligibility`] rule sets, and the provincial matcher
//! independently. Every computation takes an explicit assessment date so results never
//! depend on the wall clock.

pub mod domain;
pub mod draws;
pub mod eligibility;
pub mod experience;
pub mod language;
pub mod normalizer;
pub mod occupation;
pub mod profile;
pub mod recommendation;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use domain::{
    AdaptabilityFactors, EducationLevel, EducationRecord, JobOfferDetails, Language,
    LanguageTestResult, LanguageTestType, MaritalStatus, NominationDetails, Occupation, ProfileId,
    Province, RawProfile, RawSpouseProfile, Relationship, Relative, ResidencyStatus,
    WorkExperienceRecord,
};
pub use draws::{CutoffComparison, DrawHistory, DrawRound, RoundType};
pub use eligibility::{
    EligibilityConfig, EligibilityEvaluator, EligibilityReport, EligibilityResult, Program,
    UnmetCriterion,
};
pub use normalizer::{InvalidInput, InvalidInputReason, NormalizationConfig, ProfileNormalizer};
pub use profile::{ClbLevel, ClbScores, PartnerAssessment, Profile};
pub use recommendation::{
    AssessmentSummary, ImprovementAdvisor, Recommendation, RecommendationError,
    RecommendationKind, RecommendationSource,
};
pub use repository::{CatalogueSource, ProfileRepository, RepositoryError};
pub use router::assessment_router;
pub use scoring::{
    AdditionalScore, CoreScore, EligibilityWarning, ScoreBreakdown, ScoreComponent, ScoreEngine,
    ScoreFactor, ScoringConfig, SpouseScore, TransferabilityScore,
};
pub use service::{AssessmentService, AssessmentServiceError, ProfileAssessment};

use crate::pnp::{PnpMatcher, PnpProgram};

/// Data-driven policy for normalization, scoring, and eligibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub normalization: NormalizationConfig,
    pub scoring: ScoringConfig,
    pub eligibility: EligibilityConfig,
}

/// Normalizes raw profiles and runs the scoring, eligibility, and provincial matching rules.
#[derive(Debug, Clone, Default)]
pub struct ExpressEntryEngine {
    normalizer: ProfileNormalizer,
    scoring: ScoreEngine,
    eligibility: EligibilityEvaluator,
    matcher: PnpMatcher,
}

impl ExpressEntryEngine {
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            normalizer: ProfileNormalizer::new(rules.normalization),
            scoring: ScoreEngine::new(rules.scoring),
            eligibility: EligibilityEvaluator::new(rules.eligibility),
            matcher: PnpMatcher,
        }
    }

    pub fn scoring(&self) -> &ScoreEngine {
        &self.scoring
    }

    pub fn normalize(&self, raw: &RawProfile, as_of: NaiveDate) -> Result<Profile, InvalidInput> {
        self.normalizer.normalize(raw, as_of)
    }

    pub fn compute_score(
        &self,
        raw: &RawProfile,
        as_of: NaiveDate,
    ) -> Result<ScoreBreakdown, InvalidInput> {
        let profile = self.normalize(raw, as_of)?;
        Ok(self.scoring.score(&profile))
    }

    /// Scores a batch on the rayon pool; results keep input order.
    pub fn compute_scores(
        &self,
        profiles: &[RawProfile],
        as_of: NaiveDate,
    ) -> Vec<Result<ScoreBreakdown, InvalidInput>> {
        profiles
            .par_iter()
            .map(|raw| self.compute_score(raw, as_of))
            .collect()
    }

    pub fn evaluate_eligibility(
        &self,
        raw: &RawProfile,
        as_of: NaiveDate,
    ) -> Result<EligibilityReport, InvalidInput> {
        let profile = self.normalize(raw, as_of)?;
        Ok(self.eligibility.evaluate(&profile))
    }

    pub fn match_provincial_programs(
        &self,
        raw: &RawProfile,
        catalogue: &[PnpProgram],
        as_of: NaiveDate,
    ) -> Result<Vec<PnpProgram>, InvalidInput> {
        let profile = self.normalize(raw, as_of)?;
        Ok(self
            .matcher
            .matching(&profile, catalogue)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Score, eligibility, and matching over one normalized profile.
    pub fn assess_profile(&self, profile: &Profile, catalogue: &[PnpProgram]) -> AssessmentSummary {
        AssessmentSummary {
            profile: profile.clone(),
            score: self.scoring.score(profile),
            eligibility: self.eligibility.evaluate(profile),
            provincial_programs: self.matcher.assess(profile, catalogue),
        }
    }
}

/// [`ExpressEntryEngine::compute_score`] with the default rules.
pub fn compute_score(raw: &RawProfile, as_of: NaiveDate) -> Result<ScoreBreakdown, InvalidInput> {
    ExpressEntryEngine::default().compute_score(raw, as_of)
}

/// [`ExpressEntryEngine::evaluate_eligibility`] with the default rules.
pub fn evaluate_eligibility(
    raw: &RawProfile,
    as_of: NaiveDate,
) -> Result<EligibilityReport, InvalidInput> {
    ExpressEntryEngine::default().evaluate_eligibility(raw, as_of)
}

/// [`ExpressEntryEngine::match_provincial_programs`] with the default rules.
pub fn match_provincial_programs(
    raw: &RawProfile,
    catalogue: &[PnpProgram],
    as_of: NaiveDate,
) -> Result<Vec<PnpProgram>, InvalidInput> {
    ExpressEntryEngine::default().match_provincial_programs(raw, catalogue, as_of)
}
