use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{EducationLevel, Language, Province, Relationship};
use super::super::occupation::SkillTier;
use super::super::profile::{Credential, JobOffer, Profile};
use super::config::ScoringConfig;
use super::tables::ADDITIONAL_CAP;
use super::{ScoreComponent, ScoreFactor};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalScore {
    pub provincial_nomination: u16,
    pub job_offer: u16,
    pub french_language: u16,
    pub canadian_study: u16,
    pub sibling: u16,
    pub subtotal: u16,
}

/// Non-fatal finding: a factor would have earned points but a secondary condition voids it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EligibilityWarning {
    ExpiredNomination {
        province: Option<Province>,
        expired_on: NaiveDate,
    },
    NonQualifyingJobOffer {
        noc: String,
        reason: String,
    },
}

impl EligibilityWarning {
    pub fn summary(&self) -> String {
        match self {
            EligibilityWarning::ExpiredNomination {
                province,
                expired_on,
            } => match province {
                Some(province) => format!(
                    "provincial nomination from {} expired on {expired_on}",
                    province.code()
                ),
                None => format!("provincial nomination expired on {expired_on}"),
            },
            EligibilityWarning::NonQualifyingJobOffer { noc, reason } => {
                format!("job offer for '{noc}' earns no points: {reason}")
            }
        }
    }
}

pub(crate) fn score_additional(
    profile: &Profile,
    config: &ScoringConfig,
) -> (AdditionalScore, Vec<ScoreComponent>, Vec<EligibilityWarning>) {
    let mut components = Vec::new();
    let mut warnings = Vec::new();

    let mut provincial_nomination = 0;
    if let Some(nomination) = &profile.nomination {
        match nomination.expires_on {
            Some(expires_on) if expires_on < profile.as_of => {
                warnings.push(EligibilityWarning::ExpiredNomination {
                    province: nomination.province,
                    expired_on: expires_on,
                });
            }
            _ => {
                provincial_nomination = config.provincial_nomination_points;
                components.push(ScoreComponent::new(
                    ScoreFactor::ProvincialNomination,
                    provincial_nomination,
                    match nomination.province {
                        Some(province) => format!("nominated by {}", province.code()),
                        None => "provincial nomination on file".to_string(),
                    },
                ));
            }
        }
    }

    let mut job_offer = 0;
    if let Some(offer) = &profile.job_offer {
        match job_offer_points(offer, config) {
            Ok((points, notes)) => {
                job_offer = points;
                components.push(ScoreComponent::new(ScoreFactor::JobOffer, points, notes));
            }
            Err(reason) => warnings.push(EligibilityWarning::NonQualifyingJobOffer {
                noc: offer.raw_noc.clone(),
                reason,
            }),
        }
    }

    let french_language = french_bonus(profile, config);
    if french_language > 0 {
        components.push(ScoreComponent::new(
            ScoreFactor::FrenchLanguage,
            french_language,
            "French CLB 7 or higher on all abilities".to_string(),
        ));
    }

    let canadian_study = profile
        .credentials
        .iter()
        .map(|credential| study_points(credential, config))
        .max()
        .unwrap_or(0);
    if canadian_study > 0 {
        components.push(ScoreComponent::new(
            ScoreFactor::CanadianStudy,
            canadian_study,
            "completed post-secondary study in Canada".to_string(),
        ));
    }

    let has_sibling = profile.adaptability.relatives_in_canada.iter().any(|relative| {
        relative.relationship == Relationship::Sibling && relative.status.is_permanent()
    });
    let sibling = if has_sibling { config.sibling_points } else { 0 };
    if sibling > 0 {
        components.push(ScoreComponent::new(
            ScoreFactor::Sibling,
            sibling,
            "sibling is a Canadian citizen or permanent resident".to_string(),
        ));
    }

    let subtotal =
        (provincial_nomination + job_offer + french_language + canadian_study + sibling)
            .min(ADDITIONAL_CAP);

    (
        AdditionalScore {
            provincial_nomination,
            job_offer,
            french_language,
            canadian_study,
            sibling,
            subtotal,
        },
        components,
        warnings,
    )
}

fn job_offer_points(offer: &JobOffer, config: &ScoringConfig) -> Result<(u16, String), String> {
    if !offer.authorized() {
        return Err("offer is neither LMIA-supported nor LMIA-exempt".to_string());
    }
    let noc = offer
        .noc
        .as_ref()
        .ok_or_else(|| "not a valid five-digit NOC 2021 code".to_string())?;

    match noc.tier() {
        SkillTier::SeniorManagement => Ok((
            config.job_offer.senior_management,
            format!("arranged employment in {noc} (senior management)"),
        )),
        tier if tier.is_skilled() => Ok((
            config.job_offer.skilled,
            format!("arranged employment in {noc} ({})", tier.label()),
        )),
        tier => Err(format!("{noc} is {}", tier.label())),
    }
}

fn french_bonus(profile: &Profile, config: &ScoringConfig) -> u16 {
    let bonus = &config.french_bonus;
    let french_ready = profile
        .language(Language::French)
        .map(|ability| ability.clb.min().at_least(bonus.minimum_french_clb))
        .unwrap_or(false);
    if !french_ready {
        return 0;
    }

    let english_min = profile
        .language(Language::English)
        .map(|ability| ability.clb.min().value())
        .unwrap_or(0);
    if english_min >= bonus.english_clb_threshold {
        bonus.higher_bonus
    } else {
        bonus.lower_bonus
    }
}

fn study_points(credential: &Credential, config: &ScoringConfig) -> u16 {
    let study = &config.canadian_study;
    if !credential.canadian || !credential.completed || !credential.level.is_post_secondary() {
        return 0;
    }

    let graduate = matches!(credential.level, EducationLevel::Masters | EducationLevel::Phd);
    match credential.program_length_months {
        Some(months) if months < study.minimum_months => 0,
        Some(months) if months >= study.extended_months || graduate => {
            study.extended_program_points
        }
        Some(_) => study.short_program_points,
        None if graduate => study.extended_program_points,
        None => 0,
    }
}
