use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::express_entry::domain::{EducationLevel, Language, LanguageTestType, Province};

use super::catalogue::{AgeRange, PnpCatalogue, PnpProgram, ProgramRequirements, StreamType};

/// Failure while loading a catalogue export.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueImportError {
    #[error("failed to read catalogue export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalogue CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a valid {field}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("program id '{0}' appears more than once")]
    DuplicateProgram(String),
}

/// Loads provincial program catalogues from CSV exports.
///
/// Expected headers: `id,name,province,streamType,description,minAge,maxAge,minimumEducation,
/// minimumClb,requiredTest,requiredLanguage,minimumExperienceMonths,occupationCodes,
/// jobOfferRequired,connectionToProvinceRequired,expressEntryLinked,processingTime,
/// applicationFee,isActive`. Occupation codes are separated by `;`. Blank cells mean "not set".
pub struct PnpCatalogueImporter;

impl PnpCatalogueImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<PnpCatalogue, CatalogueImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PnpCatalogue, CatalogueImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut programs = Vec::new();
        let mut seen = HashSet::new();

        for (index, record) in csv_reader.deserialize::<CatalogueRow>().enumerate() {
            let row = record?;
            let program = row.into_program(index + 1)?;
            if !seen.insert(program.id.clone()) {
                return Err(CatalogueImportError::DuplicateProgram(program.id));
            }
            programs.push(program);
        }

        Ok(PnpCatalogue::new(programs))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogueRow {
    id: String,
    name: String,
    province: String,
    stream_type: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    min_age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    max_age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    minimum_education: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    minimum_clb: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    required_test: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    required_language: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    minimum_experience_months: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    occupation_codes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    job_offer_required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    connection_to_province_required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    express_entry_linked: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    processing_time: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    application_fee: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_active: Option<String>,
}

impl CatalogueRow {
    fn into_program(self, row: usize) -> Result<PnpProgram, CatalogueImportError> {
        let invalid = |field: &'static str, value: &str| CatalogueImportError::InvalidField {
            row,
            field,
            value: value.to_string(),
        };

        let province =
            Province::from_code(&self.province).ok_or_else(|| invalid("province", &self.province))?;
        let stream_type = StreamType::from_code(&self.stream_type)
            .ok_or_else(|| invalid("streamType", &self.stream_type))?;

        let age_range = match (
            parse_number::<u8>(self.min_age.as_deref(), "minAge", row)?,
            parse_number::<u8>(self.max_age.as_deref(), "maxAge", row)?,
        ) {
            (None, None) => None,
            (min, max) => {
                let range = AgeRange {
                    min: min.unwrap_or(0),
                    max: max.unwrap_or(u8::MAX),
                };
                if range.min > range.max {
                    return Err(invalid("age range", &format!("{}-{}", range.min, range.max)));
                }
                Some(range)
            }
        };

        let minimum_education = self
            .minimum_education
            .as_deref()
            .map(|value| EducationLevel::from_code(value).ok_or_else(|| invalid("minimumEducation", value)))
            .transpose()?;
        let required_test = self
            .required_test
            .as_deref()
            .map(|value| LanguageTestType::from_code(value).ok_or_else(|| invalid("requiredTest", value)))
            .transpose()?;
        let required_language = self
            .required_language
            .as_deref()
            .map(|value| Language::from_code(value).ok_or_else(|| invalid("requiredLanguage", value)))
            .transpose()?;

        let occupation_codes = self
            .occupation_codes
            .as_deref()
            .map(|codes| {
                codes
                    .split(';')
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PnpProgram {
            id: self.id,
            name: self.name,
            province,
            stream_type,
            description: self.description,
            requirements: ProgramRequirements {
                age_range,
                minimum_education,
                minimum_clb: parse_number(self.minimum_clb.as_deref(), "minimumClb", row)?,
                required_test,
                required_language,
                minimum_experience_months: parse_number(
                    self.minimum_experience_months.as_deref(),
                    "minimumExperienceMonths",
                    row,
                )?,
                occupation_codes,
                job_offer_required: parse_flag(
                    self.job_offer_required.as_deref(),
                    "jobOfferRequired",
                    row,
                    false,
                )?,
                connection_to_province_required: parse_flag(
                    self.connection_to_province_required.as_deref(),
                    "connectionToProvinceRequired",
                    row,
                    false,
                )?,
                express_entry_linked: parse_flag(
                    self.express_entry_linked.as_deref(),
                    "expressEntryLinked",
                    row,
                    false,
                )?,
            },
            processing_time: self.processing_time,
            application_fee: parse_number(self.application_fee.as_deref(), "applicationFee", row)?,
            is_active: parse_flag(self.is_active.as_deref(), "isActive", row, true)?,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    value: Option<&str>,
    field: &'static str,
    row: usize,
) -> Result<Option<T>, CatalogueImportError> {
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| CatalogueImportError::InvalidField {
                    row,
                    field,
                    value: raw.to_string(),
                })
        })
        .transpose()
}

fn parse_flag(
    value: Option<&str>,
    field: &'static str,
    row: usize,
    default: bool,
) -> Result<bool, CatalogueImportError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(CatalogueImportError::InvalidField {
            row,
            field,
            value: raw.to_string(),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
