//! Improvement advice kept behind a narrow trait so the scoring core never depends on
//! text generation. [`ImprovementAdvisor`] is the in-process implementation: it re-scores
//! hypothetical variants of the profile and reports the point difference.

use chrono::Days;
use serde::{Deserialize, Serialize};

use super::domain::{Language, LanguageTestType};
use super::eligibility::EligibilityReport;
use super::experience::{measure, ExperienceFilter, ExperiencePeriod};
use super::occupation::NocCode;
use super::profile::{ClbLevel, ClbScores, JobOffer, LanguageAbility, Nomination, Profile};
use super::scoring::{ScoreBreakdown, ScoreEngine};
use crate::pnp::ProgramAssessment;

/// Everything an advisor may look at; produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub profile: Profile,
    pub score: ScoreBreakdown,
    pub eligibility: EligibilityReport,
    pub provincial_programs: Vec<ProgramAssessment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    LanguageRetest,
    FrenchLanguage,
    CanadianExperience,
    JobOffer,
    ProvincialNomination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
    /// Ranking points the change would add to the current total.
    pub points_gain: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("recommendation source unavailable: {0}")]
    Unavailable(String),
}

/// Produces improvement suggestions for an assessed profile.
pub trait RecommendationSource: Send + Sync {
    fn recommend(
        &self,
        summary: &AssessmentSummary,
    ) -> Result<Vec<Recommendation>, RecommendationError>;
}

const RETEST_TARGET: ClbLevel = ClbLevel(9);
const FRENCH_TARGET: ClbLevel = ClbLevel(7);
const MAX_SCORED_CANADIAN_YEARS: u32 = 5;
const DAYS_PER_YEAR: u64 = 365;

/// Deterministic what-if advisor built on the score engine.
#[derive(Debug, Clone, Default)]
pub struct ImprovementAdvisor {
    scoring: ScoreEngine,
}

impl ImprovementAdvisor {
    pub fn new(scoring: ScoreEngine) -> Self {
        Self { scoring }
    }

    fn gain(&self, current: &ScoreBreakdown, variant: &Profile) -> u16 {
        self.scoring.score(variant).total.saturating_sub(current.total)
    }

    fn language_retest(&self, summary: &AssessmentSummary) -> Option<Recommendation> {
        let first = &summary.profile.first_language;
        if first.clb.min() >= RETEST_TARGET {
            return None;
        }

        let mut variant = summary.profile.clone();
        variant.first_language.clb = raise_to(first.clb, RETEST_TARGET);
        let gain = self.gain(&summary.score, &variant);

        Some(Recommendation {
            kind: RecommendationKind::LanguageRetest,
            message: format!(
                "Retaking {} and reaching {RETEST_TARGET} on every ability adds {gain} points",
                first.test.code()
            ),
            points_gain: gain,
        })
    }

    fn french(&self, summary: &AssessmentSummary) -> Option<Recommendation> {
        let profile = &summary.profile;
        let current = profile.language(Language::French).map(|ability| ability.clb);
        if current.is_some_and(|clb| clb.min() >= FRENCH_TARGET) {
            return None;
        }

        let mut variant = profile.clone();
        let french = LanguageAbility {
            language: Language::French,
            test: LanguageTestType::Tef,
            clb: raise_to(current.unwrap_or(ClbScores::uniform(ClbLevel::NONE)), FRENCH_TARGET),
            test_date: profile.as_of,
        };
        if variant.first_language.language == Language::French {
            variant.first_language = french;
        } else {
            variant.second_language = Some(french);
        }
        let gain = self.gain(&summary.score, &variant);

        Some(Recommendation {
            kind: RecommendationKind::FrenchLanguage,
            message: format!("Reaching French {FRENCH_TARGET} on every ability adds {gain} points"),
            points_gain: gain,
        })
    }

    fn canadian_experience(&self, summary: &AssessmentSummary) -> Option<Recommendation> {
        let profile = &summary.profile;
        let years = measure(
            &profile.work,
            profile.as_of,
            ExperienceFilter::canadian(self.scoring.config().experience_lookback_years),
        )
        .whole_years();
        if years >= MAX_SCORED_CANADIAN_YEARS {
            return None;
        }

        let target = years + 1;
        let start = profile
            .as_of
            .checked_sub_days(Days::new(u64::from(target) * DAYS_PER_YEAR))?;
        let mut variant = profile.clone();
        variant.work.push(ExperiencePeriod {
            noc: None,
            canadian: true,
            start,
            end: profile.as_of,
            full_time: true,
            paid: true,
        });
        let gain = self.gain(&summary.score, &variant);

        Some(Recommendation {
            kind: RecommendationKind::CanadianExperience,
            message: format!(
                "Reaching {target} year(s) of full-time Canadian experience adds {gain} points"
            ),
            points_gain: gain,
        })
    }

    fn job_offer(&self, summary: &AssessmentSummary) -> Option<Recommendation> {
        let profile = &summary.profile;
        if summary.score.additional.job_offer > 0 {
            return None;
        }
        let noc = skilled_reference_noc(profile)?;

        let mut variant = profile.clone();
        variant.job_offer = Some(JobOffer {
            raw_noc: noc.as_str().to_string(),
            noc: Some(noc.clone()),
            province: None,
            lmia_supported: true,
            lmia_exempt: false,
        });
        let gain = self.gain(&summary.score, &variant);

        Some(Recommendation {
            kind: RecommendationKind::JobOffer,
            message: format!("A supported job offer in {noc} adds {gain} points"),
            points_gain: gain,
        })
    }

    fn nomination(&self, summary: &AssessmentSummary) -> Option<Recommendation> {
        if summary.score.additional.provincial_nomination > 0 {
            return None;
        }

        let mut variant = summary.profile.clone();
        variant.nomination = Some(Nomination {
            province: None,
            expires_on: None,
        });
        let gain = self.gain(&summary.score, &variant);
        let eligible_streams = summary
            .provincial_programs
            .iter()
            .filter(|program| program.eligible)
            .count();

        Some(Recommendation {
            kind: RecommendationKind::ProvincialNomination,
            message: format!(
                "A provincial nomination adds {gain} points ({eligible_streams} matching stream(s))"
            ),
            points_gain: gain,
        })
    }
}

impl RecommendationSource for ImprovementAdvisor {
    fn recommend(
        &self,
        summary: &AssessmentSummary,
    ) -> Result<Vec<Recommendation>, RecommendationError> {
        let mut recommendations: Vec<Recommendation> = [
            self.language_retest(summary),
            self.french(summary),
            self.canadian_experience(summary),
            self.job_offer(summary),
            self.nomination(summary),
        ]
        .into_iter()
        .flatten()
        .filter(|recommendation| recommendation.points_gain > 0)
        .collect();

        recommendations.sort_by(|a, b| b.points_gain.cmp(&a.points_gain));
        Ok(recommendations)
    }
}

fn raise_to(scores: ClbScores, floor: ClbLevel) -> ClbScores {
    ClbScores {
        speaking: scores.speaking.max(floor),
        listening: scores.listening.max(floor),
        reading: scores.reading.max(floor),
        writing: scores.writing.max(floor),
    }
}

/// Most recent skilled occupation the applicant has worked in.
fn skilled_reference_noc(profile: &Profile) -> Option<NocCode> {
    profile
        .work
        .iter()
        .filter(|period| period.skilled())
        .max_by_key(|period| period.end)
        .and_then(|period| period.noc.clone())
}
