use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{ProfileId, RawProfile};
use super::draws::{CutoffComparison, DrawHistory};
use super::eligibility::{EligibilityReport, Program};
use super::normalizer::InvalidInput;
use super::recommendation::{
    ImprovementAdvisor, Recommendation, RecommendationError, RecommendationSource,
};
use super::repository::{CatalogueSource, ProfileRepository, RepositoryError};
use super::scoring::ScoreBreakdown;
use super::{ExpressEntryEngine, RulesConfig};
use crate::pnp::{PnpProgram, ProgramAssessment};

/// Full assessment of a stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAssessment {
    pub profile_id: ProfileId,
    pub as_of: NaiveDate,
    pub score: ScoreBreakdown,
    pub eligibility: EligibilityReport,
    pub eligible_programs: Vec<Program>,
    pub provincial_programs: Vec<ProgramAssessment>,
    pub recommendations: Vec<Recommendation>,
    /// Gap to the latest invitation round the profile could have entered.
    pub cutoff: Option<CutoffComparison>,
}

/// Service composing the profile store, the program catalogue, and the rules engine.
pub struct AssessmentService<P, C> {
    profiles: Arc<P>,
    catalogue: Arc<C>,
    engine: Arc<ExpressEntryEngine>,
    advisor: Arc<dyn RecommendationSource>,
    draws: Arc<DrawHistory>,
}

impl<P, C> AssessmentService<P, C>
where
    P: ProfileRepository + 'static,
    C: CatalogueSource + 'static,
{
    pub fn new(profiles: Arc<P>, catalogue: Arc<C>, rules: RulesConfig) -> Self {
        let engine = ExpressEntryEngine::new(rules);
        let advisor = Arc::new(ImprovementAdvisor::new(engine.scoring().clone()));

        Self {
            profiles,
            catalogue,
            engine: Arc::new(engine),
            advisor,
            draws: Arc::new(DrawHistory::standard()),
        }
    }

    /// Replace the reference invitation rounds used for cutoff comparisons.
    pub fn with_draws(mut self, draws: DrawHistory) -> Self {
        self.draws = Arc::new(draws);
        self
    }

    /// Swap the recommendation source, e.g. for an external advisory adapter.
    pub fn with_recommendations(mut self, advisor: Arc<dyn RecommendationSource>) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn engine(&self) -> &ExpressEntryEngine {
        &self.engine
    }

    pub fn score(
        &self,
        raw: &RawProfile,
        as_of: NaiveDate,
    ) -> Result<ScoreBreakdown, AssessmentServiceError> {
        let breakdown = self.engine.compute_score(raw, as_of)?;
        debug!(total = breakdown.total, warnings = breakdown.warnings.len(), "profile scored");
        Ok(breakdown)
    }

    pub fn eligibility(
        &self,
        raw: &RawProfile,
        as_of: NaiveDate,
    ) -> Result<EligibilityReport, AssessmentServiceError> {
        let report = self.engine.evaluate_eligibility(raw, as_of)?;
        debug!(eligible_programs = ?report.eligible_programs(), "eligibility evaluated");
        Ok(report)
    }

    /// Match against the supplied catalogue, or the catalogue source when none is given.
    pub fn match_programs(
        &self,
        raw: &RawProfile,
        catalogue: Option<Vec<PnpProgram>>,
        as_of: NaiveDate,
    ) -> Result<Vec<ProgramAssessment>, AssessmentServiceError> {
        let programs = match catalogue {
            Some(programs) => programs,
            None => self.catalogue.load_pnp_catalogue()?.into_programs(),
        };
        let profile = self.engine.normalize(raw, as_of)?;
        Ok(self.engine.assess_profile(&profile, &programs).provincial_programs)
    }

    /// Load a stored profile and run every rule set against it.
    pub fn assess(
        &self,
        profile_id: &ProfileId,
        as_of: NaiveDate,
    ) -> Result<ProfileAssessment, AssessmentServiceError> {
        let raw = self
            .profiles
            .load_profile(profile_id)?
            .ok_or(RepositoryError::NotFound)?;
        let catalogue = self.catalogue.load_pnp_catalogue()?;

        let profile = self.engine.normalize(&raw, as_of).map_err(|error| {
            warn!(profile_id = %profile_id.0, field = %error.field, "stored profile failed validation");
            error
        })?;
        let summary = self.engine.assess_profile(&profile, catalogue.programs());
        let recommendations = self.advisor.recommend(&summary)?;

        let eligible_programs = summary.eligibility.eligible_programs();
        let cutoff = self
            .draws
            .compare(&summary.score, &summary.eligibility, as_of);
        info!(
            profile_id = %profile_id.0,
            total = summary.score.total,
            cutoff_gap = ?cutoff.as_ref().map(|comparison| comparison.cutoff_gap),
            ?eligible_programs,
            provincial_matches = summary
                .provincial_programs
                .iter()
                .filter(|program| program.eligible)
                .count(),
            "profile assessed"
        );

        Ok(ProfileAssessment {
            profile_id: profile_id.clone(),
            as_of,
            score: summary.score,
            eligibility: summary.eligibility,
            eligible_programs,
            provincial_programs: summary.provincial_programs,
            recommendations,
            cutoff,
        })
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
}
