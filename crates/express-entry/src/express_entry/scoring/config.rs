use serde::{Deserialize, Serialize};

/// Policy dials for the ranking calculators. Point tables live in `tables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Experience older than this many years before the assessment date earns nothing.
    pub experience_lookback_years: u32,
    pub provincial_nomination_points: u16,
    pub job_offer: JobOfferPoints,
    pub french_bonus: FrenchBonusConfig,
    pub canadian_study: CanadianStudyConfig,
    pub sibling_points: u16,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            experience_lookback_years: 10,
            provincial_nomination_points: 600,
            job_offer: JobOfferPoints::default(),
            french_bonus: FrenchBonusConfig::default(),
            canadian_study: CanadianStudyConfig::default(),
            sibling_points: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOfferPoints {
    /// Major group 00.
    pub senior_management: u16,
    /// Any other TEER 0-3 occupation.
    pub skilled: u16,
}

impl Default for JobOfferPoints {
    fn default() -> Self {
        Self {
            senior_management: 200,
            skilled: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrenchBonusConfig {
    /// French CLB required on every ability before any bonus applies.
    pub minimum_french_clb: u8,
    /// English minimum CLB separating the lower and higher bonus.
    pub english_clb_threshold: u8,
    pub lower_bonus: u16,
    pub higher_bonus: u16,
}

impl Default for FrenchBonusConfig {
    fn default() -> Self {
        Self {
            minimum_french_clb: 7,
            english_clb_threshold: 5,
            lower_bonus: 25,
            higher_bonus: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanadianStudyConfig {
    pub minimum_months: u32,
    pub extended_months: u32,
    pub short_program_points: u16,
    pub extended_program_points: u16,
}

impl Default for CanadianStudyConfig {
    fn default() -> Self {
        Self {
            minimum_months: 12,
            extended_months: 36,
            short_program_points: 15,
            extended_program_points: 30,
        }
    }
}
