use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AdaptabilityFactors, EducationLevel, Language, LanguageTestType, MaritalStatus, Province,
};
use super::experience::ExperiencePeriod;
use super::occupation::NocCode;

/// Canadian Language Benchmark level. `0` stands for "below CLB 4"; `10` for "10 and above".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClbLevel(pub u8);

impl ClbLevel {
    pub const NONE: ClbLevel = ClbLevel(0);

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn at_least(self, level: u8) -> bool {
        self.0 >= level
    }
}

impl fmt::Display for ClbLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "below CLB 4"),
            10 => write!(f, "CLB 10+"),
            level => write!(f, "CLB {level}"),
        }
    }
}

/// The four tested abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ability {
    Speaking,
    Listening,
    Reading,
    Writing,
}

impl Ability {
    pub const ALL: [Ability; 4] = [
        Ability::Speaking,
        Ability::Listening,
        Ability::Reading,
        Ability::Writing,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Ability::Speaking => "speaking",
            Ability::Listening => "listening",
            Ability::Reading => "reading",
            Ability::Writing => "writing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClbScores {
    pub speaking: ClbLevel,
    pub listening: ClbLevel,
    pub reading: ClbLevel,
    pub writing: ClbLevel,
}

impl ClbScores {
    pub const fn uniform(level: ClbLevel) -> Self {
        Self {
            speaking: level,
            listening: level,
            reading: level,
            writing: level,
        }
    }

    pub const fn get(&self, ability: Ability) -> ClbLevel {
        match ability {
            Ability::Speaking => self.speaking,
            Ability::Listening => self.listening,
            Ability::Reading => self.reading,
            Ability::Writing => self.writing,
        }
    }

    /// Weakest ability; combination rules key off the floor across all four.
    pub fn min(&self) -> ClbLevel {
        Ability::ALL
            .iter()
            .map(|ability| self.get(*ability))
            .min()
            .unwrap_or(ClbLevel::NONE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, ClbLevel)> + '_ {
        Ability::ALL
            .iter()
            .map(move |ability| (*ability, self.get(*ability)))
    }
}

/// Authoritative (most recent, unexpired) result for one official language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageAbility {
    pub language: Language,
    pub test: LanguageTestType,
    pub clb: ClbScores,
    pub test_date: NaiveDate,
}

/// A credential after equivalency and completion checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub level: EducationLevel,
    pub canadian: bool,
    pub completed: bool,
    /// Foreign credentials need an equivalency assessment before they earn points.
    pub assessed: bool,
    pub program_length_months: Option<u32>,
}

impl Credential {
    pub const fn counts(&self) -> bool {
        self.completed && (self.canadian || self.assessed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nomination {
    /// `None` when the nomination was declared without details.
    pub province: Option<Province>,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    /// `None` when the supplied code is not a valid NOC 2021 unit group.
    pub noc: Option<NocCode>,
    pub raw_noc: String,
    pub province: Option<Province>,
    pub lmia_supported: bool,
    pub lmia_exempt: bool,
}

impl JobOffer {
    pub const fn authorized(&self) -> bool {
        self.lmia_supported || self.lmia_exempt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseProfile {
    pub credentials: Vec<Credential>,
    pub first_language: Option<LanguageAbility>,
    pub work: Vec<ExperiencePeriod>,
}

/// Whether the partner takes part in the assessment. Replaces "missing spouse field means
/// no spouse" with an explicit variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartnerAssessment {
    NotAssessed,
    Assessed(SpouseProfile),
}

impl PartnerAssessment {
    pub fn spouse(&self) -> Option<&SpouseProfile> {
        match self {
            PartnerAssessment::NotAssessed => None,
            PartnerAssessment::Assessed(spouse) => Some(spouse),
        }
    }

    pub const fn is_assessed(&self) -> bool {
        matches!(self, PartnerAssessment::Assessed(_))
    }
}

/// Normalized profile consumed by every calculator, evaluator, and matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub credentials: Vec<Credential>,
    pub first_language: LanguageAbility,
    pub second_language: Option<LanguageAbility>,
    pub work: Vec<ExperiencePeriod>,
    pub adaptability: AdaptabilityFactors,
    pub nomination: Option<Nomination>,
    pub job_offer: Option<JobOffer>,
    pub certificate_of_qualification: bool,
    pub partner: PartnerAssessment,
    pub as_of: NaiveDate,
}

impl Profile {
    /// Highest credential that earns points.
    pub fn highest_credential(&self) -> Option<&Credential> {
        highest_counted(&self.credentials)
    }

    pub fn highest_education(&self) -> Option<EducationLevel> {
        self.highest_credential().map(|credential| credential.level)
    }

    pub fn language(&self, language: Language) -> Option<&LanguageAbility> {
        if self.first_language.language == language {
            Some(&self.first_language)
        } else {
            self.second_language
                .as_ref()
                .filter(|ability| ability.language == language)
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageAbility> {
        std::iter::once(&self.first_language).chain(self.second_language.iter())
    }

    pub const fn has_spouse(&self) -> bool {
        self.partner.is_assessed()
    }
}

pub(crate) fn highest_counted(credentials: &[Credential]) -> Option<&Credential> {
    credentials
        .iter()
        .filter(|credential| credential.counts())
        .max_by_key(|credential| credential.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clb_minimum_tracks_weakest_ability() {
        let scores = ClbScores {
            speaking: ClbLevel(9),
            listening: ClbLevel(10),
            reading: ClbLevel(7),
            writing: ClbLevel(8),
        };
        assert_eq!(scores.min(), ClbLevel(7));
    }

    #[test]
    fn clb_display_marks_floor_and_ceiling() {
        assert_eq!(ClbLevel(0).to_string(), "below CLB 4");
        assert_eq!(ClbLevel(10).to_string(), "CLB 10+");
        assert_eq!(ClbLevel(7).to_string(), "CLB 7");
    }

    #[test]
    fn unassessed_foreign_credential_does_not_count() {
        let credential = Credential {
            level: EducationLevel::Masters,
            canadian: false,
            completed: true,
            assessed: false,
            program_length_months: None,
        };
        assert!(!credential.counts());
        assert!(highest_counted(&[credential]).is_none());
    }
}
