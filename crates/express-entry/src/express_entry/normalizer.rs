use std::fmt;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{
    EducationRecord, Language, LanguageTestResult, RawProfile, RawSpouseProfile,
    WorkExperienceRecord,
};
use super::experience::{ExperiencePeriod, FULL_TIME_HOURS};
use super::language::{band_range, band_score, convert};
use super::occupation::NocCode;
use super::profile::{
    Ability, Credential, JobOffer, LanguageAbility, Nomination, PartnerAssessment, Profile,
    SpouseProfile,
};

const MAX_AGE: i32 = 99;
const MAX_WEEKLY_HOURS: f32 = 168.0;

/// Structurally invalid or out-of-range profile data, with the offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("invalid input at {field}: {reason}")]
pub struct InvalidInput {
    pub field: String,
    pub reason: InvalidInputReason,
}

impl InvalidInput {
    fn new(field: impl Into<String>, reason: InvalidInputReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum InvalidInputReason {
    AgeOutOfRange { age: i32 },
    MissingLanguageTest,
    TestLanguageMismatch { test: String, language: String },
    BandScoreOutOfRange { test: String, score: f32 },
    FutureDate { date: NaiveDate },
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    NegativeDuration { months: i32 },
    HoursOutOfRange { hours: f32 },
    SpouseWithoutPartnerStatus { marital_status: String },
    MissingJobOfferDetails,
}

impl fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInputReason::AgeOutOfRange { age } => {
                write!(f, "age {age} must be between 1 and {MAX_AGE}")
            }
            InvalidInputReason::MissingLanguageTest => {
                write!(f, "no valid, unexpired language test result")
            }
            InvalidInputReason::TestLanguageMismatch { test, language } => {
                write!(f, "{test} does not assess {language}")
            }
            InvalidInputReason::BandScoreOutOfRange { test, score } => {
                write!(f, "band score {score} is not a valid {test} result")
            }
            InvalidInputReason::FutureDate { date } => {
                write!(f, "{date} is after the assessment date")
            }
            InvalidInputReason::InvalidDateRange { start, end } => {
                write!(f, "start date {start} is after end date {end}")
            }
            InvalidInputReason::NegativeDuration { months } => {
                write!(f, "duration of {months} months is negative")
            }
            InvalidInputReason::HoursOutOfRange { hours } => {
                write!(f, "{hours} hours per week is outside 0..={MAX_WEEKLY_HOURS}")
            }
            InvalidInputReason::SpouseWithoutPartnerStatus { marital_status } => {
                write!(f, "spouse supplied while marital status is {marital_status}")
            }
            InvalidInputReason::MissingJobOfferDetails => {
                write!(f, "job offer declared without offer details")
            }
        }
    }
}

/// Dials for the validation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Results older than this many months at the assessment date are discarded.
    pub language_test_validity_months: u32,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            language_test_validity_months: 24,
        }
    }
}

/// Validates a raw profile and converts it into the normalized [`Profile`].
#[derive(Debug, Clone, Default)]
pub struct ProfileNormalizer {
    config: NormalizationConfig,
}

impl ProfileNormalizer {
    pub fn new(config: NormalizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    pub fn normalize(&self, raw: &RawProfile, as_of: NaiveDate) -> Result<Profile, InvalidInput> {
        if raw.age < 1 || raw.age > MAX_AGE {
            return Err(InvalidInput::new(
                "age",
                InvalidInputReason::AgeOutOfRange { age: raw.age },
            ));
        }

        let credentials = normalize_credentials(&raw.education, "education", as_of)?;
        let tests = self.current_tests(&raw.language_proficiency, "languageProficiency", as_of)?;
        let (first_language, second_language) = pick_official_languages(raw, &tests)?;
        let work = normalize_work(&raw.work_experience, "workExperience", as_of)?;
        let partner = self.normalize_partner(raw, as_of)?;

        let nomination = match (&raw.provincial_nomination, raw.has_provincial_nomination) {
            (Some(details), true) => Some(Nomination {
                province: Some(details.province),
                expires_on: details.expires_on,
            }),
            (None, true) => Some(Nomination {
                province: None,
                expires_on: None,
            }),
            (_, false) => None,
        };

        let job_offer = match (&raw.job_offer_details, raw.has_job_offer) {
            (Some(details), true) => Some(JobOffer {
                noc: NocCode::parse(&details.noc),
                raw_noc: details.noc.trim().to_string(),
                province: details.province,
                lmia_supported: details.has_lmia,
                lmia_exempt: details.is_lmia_exempt,
            }),
            (None, true) => {
                return Err(InvalidInput::new(
                    "jobOfferDetails",
                    InvalidInputReason::MissingJobOfferDetails,
                ))
            }
            (_, false) => None,
        };

        Ok(Profile {
            age: raw.age as u8,
            marital_status: raw.marital_status,
            credentials,
            first_language,
            second_language,
            work,
            adaptability: raw.adaptability_factors.clone(),
            nomination,
            job_offer,
            certificate_of_qualification: raw.has_certificate_of_qualification,
            partner,
            as_of,
        })
    }

    fn normalize_partner(
        &self,
        raw: &RawProfile,
        as_of: NaiveDate,
    ) -> Result<PartnerAssessment, InvalidInput> {
        let Some(spouse) = &raw.spouse else {
            return Ok(PartnerAssessment::NotAssessed);
        };

        if !raw.marital_status.has_partner() {
            return Err(InvalidInput::new(
                "spouse",
                InvalidInputReason::SpouseWithoutPartnerStatus {
                    marital_status: raw.marital_status.label().to_string(),
                },
            ));
        }

        let profile = self.normalize_spouse(spouse, as_of)?;
        if !spouse.accompanying || spouse.canadian_citizen_or_permanent_resident {
            return Ok(PartnerAssessment::NotAssessed);
        }

        Ok(PartnerAssessment::Assessed(profile))
    }

    fn normalize_spouse(
        &self,
        spouse: &RawSpouseProfile,
        as_of: NaiveDate,
    ) -> Result<SpouseProfile, InvalidInput> {
        let credentials = normalize_credentials(&spouse.education, "spouse.education", as_of)?;
        let tests = self.current_tests(
            &spouse.language_proficiency,
            "spouse.languageProficiency",
            as_of,
        )?;
        let first_language = tests
            .iter()
            .find(|ability| ability.language == Language::English)
            .or_else(|| tests.first())
            .copied();
        let work = normalize_work(&spouse.work_experience, "spouse.workExperience", as_of)?;

        Ok(SpouseProfile {
            credentials,
            first_language,
            work,
        })
    }

    /// Validate every result, drop expired ones, keep the most recent per language.
    fn current_tests(
        &self,
        results: &[LanguageTestResult],
        field: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<LanguageAbility>, InvalidInput> {
        let cutoff = as_of
            .checked_sub_months(Months::new(self.config.language_test_validity_months))
            .unwrap_or(NaiveDate::MIN);

        let mut current: Vec<LanguageAbility> = Vec::new();
        for (index, result) in results.iter().enumerate() {
            validate_test(result, &format!("{field}[{index}]"), as_of)?;
            if result.test_date < cutoff {
                continue;
            }

            let ability = LanguageAbility {
                language: result.language,
                test: result.test,
                clb: convert(result),
                test_date: result.test_date,
            };
            match current
                .iter_mut()
                .find(|existing| existing.language == ability.language)
            {
                Some(existing) if ability.test_date > existing.test_date => *existing = ability,
                Some(_) => {}
                None => current.push(ability),
            }
        }

        current.sort_by_key(|ability| ability.language);
        Ok(current)
    }
}

fn validate_test(result: &LanguageTestResult, field: &str, as_of: NaiveDate) -> Result<(), InvalidInput> {
    if result.test.language() != result.language {
        return Err(InvalidInput::new(
            format!("{field}.test"),
            InvalidInputReason::TestLanguageMismatch {
                test: result.test.code().to_string(),
                language: result.language.label().to_string(),
            },
        ));
    }

    for ability in Ability::ALL {
        let score = band_score(result, ability);
        if !band_range(result.test, ability).accepts(score) {
            return Err(InvalidInput::new(
                format!("{field}.{}", ability.label()),
                InvalidInputReason::BandScoreOutOfRange {
                    test: result.test.code().to_string(),
                    score,
                },
            ));
        }
    }

    if result.test_date > as_of {
        return Err(InvalidInput::new(
            format!("{field}.testDate"),
            InvalidInputReason::FutureDate {
                date: result.test_date,
            },
        ));
    }

    Ok(())
}

fn pick_official_languages(
    raw: &RawProfile,
    tests: &[LanguageAbility],
) -> Result<(LanguageAbility, Option<LanguageAbility>), InvalidInput> {
    let find = |language: Language| tests.iter().find(|ability| ability.language == language);

    let first = match raw.first_official_language {
        Some(language) => find(language).ok_or_else(|| {
            InvalidInput::new(
                format!("languageProficiency.{}", language.label().to_ascii_lowercase()),
                InvalidInputReason::MissingLanguageTest,
            )
        })?,
        None => find(Language::English)
            .or_else(|| find(Language::French))
            .ok_or_else(|| {
                InvalidInput::new(
                    "languageProficiency",
                    InvalidInputReason::MissingLanguageTest,
                )
            })?,
    };
    let second = find(first.language.other()).copied();

    Ok((*first, second))
}

fn normalize_credentials(
    records: &[EducationRecord],
    field: &str,
    as_of: NaiveDate,
) -> Result<Vec<Credential>, InvalidInput> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let program_length_months = match record.program_length_months {
                Some(months) if months < 0 => {
                    return Err(InvalidInput::new(
                        format!("{field}[{index}].programLengthMonths"),
                        InvalidInputReason::NegativeDuration { months },
                    ))
                }
                Some(months) => Some(months as u32),
                None => None,
            };

            Ok(Credential {
                level: record.level,
                canadian: is_canada(record.country.as_deref()),
                completed: record
                    .completion_date
                    .map(|date| date <= as_of)
                    .unwrap_or(true),
                assessed: record.canadian_equivalency,
                program_length_months,
            })
        })
        .collect()
}

fn normalize_work(
    records: &[WorkExperienceRecord],
    field: &str,
    as_of: NaiveDate,
) -> Result<Vec<ExperiencePeriod>, InvalidInput> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let path = format!("{field}[{index}]");
            if let Some(end) = record.end_date {
                if record.start_date > end {
                    return Err(InvalidInput::new(
                        format!("{path}.endDate"),
                        InvalidInputReason::InvalidDateRange {
                            start: record.start_date,
                            end,
                        },
                    ));
                }
            }
            if record.start_date > as_of {
                return Err(InvalidInput::new(
                    format!("{path}.startDate"),
                    InvalidInputReason::FutureDate {
                        date: record.start_date,
                    },
                ));
            }
            let hours = record.hours_per_week;
            if !hours.is_finite() || !(0.0..=MAX_WEEKLY_HOURS).contains(&hours) {
                return Err(InvalidInput::new(
                    format!("{path}.hoursPerWeek"),
                    InvalidInputReason::HoursOutOfRange { hours },
                ));
            }

            Ok(ExperiencePeriod {
                noc: record.occupation.noc.as_deref().and_then(NocCode::parse),
                canadian: record.is_canadian_experience,
                start: record.start_date,
                end: record.end_date.unwrap_or(as_of).min(as_of),
                full_time: hours >= FULL_TIME_HOURS,
                paid: record.paid,
            })
        })
        .collect()
}

fn is_canada(country: Option<&str>) -> bool {
    country
        .map(|value| {
            let value = value.trim();
            value.eq_ignore_ascii_case("canada") || value.eq_ignore_ascii_case("ca")
        })
        .unwrap_or(false)
}
