use serde::{Deserialize, Serialize};

use crate::express_entry::domain::{EducationLevel, Language, LanguageTestType, Province};

/// Provincial nominee stream definition. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnpProgram {
    pub id: String,
    pub name: String,
    pub province: Province,
    pub stream_type: StreamType,
    pub description: String,
    #[serde(default)]
    pub requirements: ProgramRequirements,
    #[serde(default)]
    pub processing_time: Option<String>,
    /// Provincial processing fee in Canadian dollars.
    #[serde(default)]
    pub application_fee: Option<u32>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    SkilledWorker,
    ExpressEntry,
    Business,
    Entrepreneur,
    InternationalGraduate,
    SemiSkilledWorker,
    Family,
    Community,
    Rural,
}

impl StreamType {
    pub const fn code(self) -> &'static str {
        match self {
            StreamType::SkilledWorker => "skilled_worker",
            StreamType::ExpressEntry => "express_entry",
            StreamType::Business => "business",
            StreamType::Entrepreneur => "entrepreneur",
            StreamType::InternationalGraduate => "international_graduate",
            StreamType::SemiSkilledWorker => "semi_skilled_worker",
            StreamType::Family => "family",
            StreamType::Community => "community",
            StreamType::Rural => "rural",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        const ALL: [StreamType; 9] = [
            StreamType::SkilledWorker,
            StreamType::ExpressEntry,
            StreamType::Business,
            StreamType::Entrepreneur,
            StreamType::InternationalGraduate,
            StreamType::SemiSkilledWorker,
            StreamType::Family,
            StreamType::Community,
            StreamType::Rural,
        ];
        let normalized = code.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        ALL.into_iter().find(|stream| stream.code() == normalized)
    }
}

/// Inclusive age bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub const fn contains(&self, age: u8) -> bool {
        age >= self.min && age <= self.max
    }
}

/// Declared eligibility predicate. Absent fields impose no condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRequirements {
    #[serde(default)]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub minimum_education: Option<EducationLevel>,
    #[serde(default)]
    pub minimum_clb: Option<u8>,
    #[serde(default)]
    pub required_test: Option<LanguageTestType>,
    #[serde(default)]
    pub required_language: Option<Language>,
    #[serde(default)]
    pub minimum_experience_months: Option<u32>,
    /// NOC unit groups, or group prefixes, that satisfy the occupation requirement.
    #[serde(default)]
    pub occupation_codes: Vec<String>,
    #[serde(default)]
    pub job_offer_required: bool,
    #[serde(default)]
    pub connection_to_province_required: bool,
    #[serde(default)]
    pub express_entry_linked: bool,
}

fn active_by_default() -> bool {
    true
}

/// Ordered program catalogue; matching preserves this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PnpCatalogue {
    programs: Vec<PnpProgram>,
}

impl PnpCatalogue {
    pub fn new(programs: Vec<PnpProgram>) -> Self {
        Self { programs }
    }

    /// Reference streams for Ontario, British Columbia, Alberta, and Quebec.
    pub fn standard() -> Self {
        Self::new(vec![
            PnpProgram {
                id: "on-001".to_string(),
                name: "Ontario Immigrant Nominee Program (OINP) - Human Capital Priorities Stream"
                    .to_string(),
                province: Province::Ontario,
                stream_type: StreamType::ExpressEntry,
                description: "For skilled workers with experience in Ontario's priority occupations"
                    .to_string(),
                requirements: ProgramRequirements {
                    minimum_education: Some(EducationLevel::Bachelors),
                    minimum_clb: Some(7),
                    minimum_experience_months: Some(12),
                    express_entry_linked: true,
                    ..ProgramRequirements::default()
                },
                processing_time: Some("60-90 days".to_string()),
                application_fee: Some(1500),
                is_active: true,
            },
            PnpProgram {
                id: "on-002".to_string(),
                name: "Ontario Immigrant Nominee Program (OINP) - Skilled Trades Stream"
                    .to_string(),
                province: Province::Ontario,
                stream_type: StreamType::ExpressEntry,
                description: "For skilled workers with experience in eligible trades".to_string(),
                requirements: ProgramRequirements {
                    minimum_clb: Some(5),
                    minimum_experience_months: Some(12),
                    occupation_codes: ["72", "73", "82", "83", "92", "93"]
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    job_offer_required: true,
                    express_entry_linked: true,
                    ..ProgramRequirements::default()
                },
                processing_time: Some("30-60 days".to_string()),
                application_fee: Some(1500),
                is_active: true,
            },
            PnpProgram {
                id: "bc-001".to_string(),
                name: "British Columbia Provincial Nominee Program (BC PNP) - Skills Immigration"
                    .to_string(),
                province: Province::BritishColumbia,
                stream_type: StreamType::SkilledWorker,
                description: "For skilled workers with experience in high-demand occupations"
                    .to_string(),
                requirements: ProgramRequirements {
                    minimum_education: Some(EducationLevel::OneYearDiploma),
                    minimum_clb: Some(4),
                    minimum_experience_months: Some(24),
                    job_offer_required: true,
                    ..ProgramRequirements::default()
                },
                processing_time: Some("2-3 months".to_string()),
                application_fee: Some(1150),
                is_active: true,
            },
            PnpProgram {
                id: "bc-002".to_string(),
                name: "British Columbia Provincial Nominee Program (BC PNP) - Express Entry BC"
                    .to_string(),
                province: Province::BritishColumbia,
                stream_type: StreamType::ExpressEntry,
                description: "Fast-track option for candidates in Express Entry system"
                    .to_string(),
                requirements: ProgramRequirements {
                    minimum_clb: Some(7),
                    minimum_experience_months: Some(12),
                    job_offer_required: true,
                    express_entry_linked: true,
                    ..ProgramRequirements::default()
                },
                processing_time: Some("2-3 weeks".to_string()),
                application_fee: Some(1150),
                is_active: true,
            },
            PnpProgram {
                id: "ab-001".to_string(),
                name: "Alberta Immigrant Nominee Program (AINP) - Alberta Express Entry Stream"
                    .to_string(),
                province: Province::Alberta,
                stream_type: StreamType::ExpressEntry,
                description: "For Express Entry candidates with strong ties to Alberta"
                    .to_string(),
                requirements: ProgramRequirements {
                    minimum_experience_months: Some(12),
                    connection_to_province_required: true,
                    express_entry_linked: true,
                    ..ProgramRequirements::default()
                },
                processing_time: Some("6-8 months".to_string()),
                application_fee: Some(500),
                is_active: true,
            },
            PnpProgram {
                id: "qc-001".to_string(),
                name: "Quebec Skilled Worker Program (QSWP)".to_string(),
                province: Province::Quebec,
                stream_type: StreamType::SkilledWorker,
                description:
                    "For skilled workers who want to become permanent residents of Quebec"
                        .to_string(),
                requirements: ProgramRequirements {
                    minimum_education: Some(EducationLevel::OneYearDiploma),
                    minimum_clb: Some(5),
                    required_language: Some(Language::French),
                    minimum_experience_months: Some(6),
                    connection_to_province_required: true,
                    ..ProgramRequirements::default()
                },
                processing_time: Some("12-24 months".to_string()),
                application_fee: Some(822),
                is_active: true,
            },
        ])
    }

    pub fn programs(&self) -> &[PnpProgram] {
        &self.programs
    }

    pub fn into_programs(self) -> Vec<PnpProgram> {
        self.programs
    }

    pub fn find(&self, id: &str) -> Option<&PnpProgram> {
        self.programs.iter().find(|program| program.id == id)
    }

    pub fn for_province(&self, province: Province) -> impl Iterator<Item = &PnpProgram> {
        self.programs
            .iter()
            .filter(move |program| program.province == province)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalogue_has_unique_ids_across_four_provinces() {
        let catalogue = PnpCatalogue::standard();
        let mut ids: Vec<&str> = catalogue.programs().iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalogue.len());
        assert_eq!(catalogue.for_province(Province::Ontario).count(), 2);
        assert_eq!(catalogue.for_province(Province::BritishColumbia).count(), 2);
        assert_eq!(catalogue.for_province(Province::Alberta).count(), 1);
        assert_eq!(catalogue.for_province(Province::Quebec).count(), 1);
    }

    #[test]
    fn program_documents_deserialize_with_defaults() {
        let program: PnpProgram = serde_json::from_value(serde_json::json!({
            "id": "mb-001",
            "name": "Manitoba Skilled Worker in Manitoba",
            "province": "manitoba",
            "streamType": "skilled_worker",
            "description": "Workers already employed in Manitoba",
            "requirements": { "jobOfferRequired": true, "ageRange": { "min": 21, "max": 45 } }
        }))
        .expect("program parses");

        assert!(program.is_active);
        assert!(program.requirements.job_offer_required);
        assert_eq!(program.requirements.age_range, Some(AgeRange { min: 21, max: 45 }));
        assert!(program.requirements.occupation_codes.is_empty());
    }
}
