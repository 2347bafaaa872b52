use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored immigration profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Profile document as captured by intake forms, before any validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfile {
    pub age: i32,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub education: Vec<EducationRecord>,
    #[serde(default)]
    pub language_proficiency: Vec<LanguageTestResult>,
    /// Declared first official language; inferred from the tests when absent.
    #[serde(default)]
    pub first_official_language: Option<Language>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperienceRecord>,
    #[serde(default)]
    pub adaptability_factors: AdaptabilityFactors,
    #[serde(default)]
    pub has_provincial_nomination: bool,
    #[serde(default)]
    pub provincial_nomination: Option<NominationDetails>,
    #[serde(default)]
    pub has_job_offer: bool,
    #[serde(default)]
    pub job_offer_details: Option<JobOfferDetails>,
    #[serde(default)]
    pub has_certificate_of_qualification: bool,
    #[serde(default)]
    pub spouse: Option<RawSpouseProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaritalStatus {
    Single,
    Married,
    CommonLaw,
    Divorced,
    Separated,
    Widowed,
}

impl MaritalStatus {
    /// Statuses under which an accompanying partner can be assessed.
    pub const fn has_partner(self) -> bool {
        matches!(self, MaritalStatus::Married | MaritalStatus::CommonLaw)
    }

    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::CommonLaw => "commonLaw",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Separated => "separated",
            MaritalStatus::Widowed => "widowed",
        }
    }
}

/// Credential levels ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationLevel {
    HighSchool,
    OneYearDiploma,
    TwoYearDiploma,
    Bachelors,
    TwoOrMoreDegrees,
    Masters,
    Phd,
}

impl EducationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "secondary diploma",
            EducationLevel::OneYearDiploma => "one-year post-secondary credential",
            EducationLevel::TwoYearDiploma => "two-year post-secondary credential",
            EducationLevel::Bachelors => "bachelor's degree",
            EducationLevel::TwoOrMoreDegrees => "two or more post-secondary credentials",
            EducationLevel::Masters => "master's degree",
            EducationLevel::Phd => "doctoral degree",
        }
    }

    pub const fn is_post_secondary(self) -> bool {
        !matches!(self, EducationLevel::HighSchool)
    }

    /// Accepts the camelCase wire names, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "highschool" => Some(EducationLevel::HighSchool),
            "oneyeardiploma" => Some(EducationLevel::OneYearDiploma),
            "twoyeardiploma" => Some(EducationLevel::TwoYearDiploma),
            "bachelors" => Some(EducationLevel::Bachelors),
            "twoormoredegrees" => Some(EducationLevel::TwoOrMoreDegrees),
            "masters" => Some(EducationLevel::Masters),
            "phd" => Some(EducationLevel::Phd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRecord {
    pub level: EducationLevel,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub program_length_months: Option<i32>,
    /// Educational credential assessment on file for a foreign credential.
    #[serde(default)]
    pub canadian_equivalency: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    English,
    French,
}

impl Language {
    pub const fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Language::English => Language::French,
            Language::French => Language::English,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Some(Language::English),
            "french" | "fr" => Some(Language::French),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageTestType {
    #[serde(rename = "IELTS")]
    Ielts,
    #[serde(rename = "CELPIP")]
    Celpip,
    #[serde(rename = "TEF")]
    Tef,
    #[serde(rename = "TCF")]
    Tcf,
}

impl LanguageTestType {
    pub const fn language(self) -> Language {
        match self {
            LanguageTestType::Ielts | LanguageTestType::Celpip => Language::English,
            LanguageTestType::Tef | LanguageTestType::Tcf => Language::French,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            LanguageTestType::Ielts => "IELTS",
            LanguageTestType::Celpip => "CELPIP",
            LanguageTestType::Tef => "TEF",
            LanguageTestType::Tcf => "TCF",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "IELTS" => Some(LanguageTestType::Ielts),
            "CELPIP" => Some(LanguageTestType::Celpip),
            "TEF" => Some(LanguageTestType::Tef),
            "TCF" => Some(LanguageTestType::Tcf),
            _ => None,
        }
    }
}

/// One sitting of a designated language test with raw band scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageTestResult {
    pub language: Language,
    pub test: LanguageTestType,
    pub speaking: f32,
    pub listening: f32,
    pub reading: f32,
    pub writing: f32,
    pub test_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupation {
    #[serde(default)]
    pub title: Option<String>,
    /// NOC 2021 five-digit unit group code.
    #[serde(default)]
    pub noc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceRecord {
    #[serde(default)]
    pub occupation: Occupation,
    #[serde(default)]
    pub employer: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub is_canadian_experience: bool,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub hours_per_week: f32,
    #[serde(default = "default_true")]
    pub paid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptabilityFactors {
    #[serde(default)]
    pub relatives_in_canada: Vec<Relative>,
    #[serde(default)]
    pub provincial_connections: Vec<Province>,
    #[serde(default)]
    pub spouse_canadian_education: bool,
    #[serde(default)]
    pub spouse_canadian_experience: bool,
    #[serde(default)]
    pub prior_canadian_study: bool,
    #[serde(default)]
    pub prior_canadian_work: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relative {
    pub relationship: Relationship,
    pub status: ResidencyStatus,
    #[serde(default)]
    pub province: Option<Province>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relationship {
    Sibling,
    Parent,
    Grandparent,
    Child,
    AuntOrUncle,
    NieceOrNephew,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResidencyStatus {
    Citizen,
    PermanentResident,
    TemporaryResident,
    Other,
}

impl ResidencyStatus {
    pub const fn is_permanent(self) -> bool {
        matches!(
            self,
            ResidencyStatus::Citizen | ResidencyStatus::PermanentResident
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Province {
    Ontario,
    BritishColumbia,
    Alberta,
    Quebec,
    Manitoba,
    Saskatchewan,
    NovaScotia,
    NewBrunswick,
    PrinceEdwardIsland,
    NewfoundlandAndLabrador,
    Yukon,
    NorthwestTerritories,
    Nunavut,
}

impl Province {
    pub const fn code(self) -> &'static str {
        match self {
            Province::Ontario => "ontario",
            Province::BritishColumbia => "british_columbia",
            Province::Alberta => "alberta",
            Province::Quebec => "quebec",
            Province::Manitoba => "manitoba",
            Province::Saskatchewan => "saskatchewan",
            Province::NovaScotia => "nova_scotia",
            Province::NewBrunswick => "new_brunswick",
            Province::PrinceEdwardIsland => "prince_edward_island",
            Province::NewfoundlandAndLabrador => "newfoundland_and_labrador",
            Province::Yukon => "yukon",
            Province::NorthwestTerritories => "northwest_territories",
            Province::Nunavut => "nunavut",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        const ALL: [Province; 13] = [
            Province::Ontario,
            Province::BritishColumbia,
            Province::Alberta,
            Province::Quebec,
            Province::Manitoba,
            Province::Saskatchewan,
            Province::NovaScotia,
            Province::NewBrunswick,
            Province::PrinceEdwardIsland,
            Province::NewfoundlandAndLabrador,
            Province::Yukon,
            Province::NorthwestTerritories,
            Province::Nunavut,
        ];
        let normalized = code.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        ALL.into_iter().find(|province| province.code() == normalized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationDetails {
    pub province: Province,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub nominated_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferDetails {
    pub noc: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub employer: Option<String>,
    #[serde(default)]
    pub province: Option<Province>,
    #[serde(rename = "isLMIAExempt", default)]
    pub is_lmia_exempt: bool,
    #[serde(default = "default_true")]
    pub has_lmia: bool,
}

/// Reduced profile of the spouse or common-law partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpouseProfile {
    #[serde(default)]
    pub education: Vec<EducationRecord>,
    #[serde(default)]
    pub language_proficiency: Vec<LanguageTestResult>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperienceRecord>,
    #[serde(default = "default_true")]
    pub accompanying: bool,
    #[serde(default)]
    pub canadian_citizen_or_permanent_resident: bool,
}

fn default_true() -> bool {
    true
}
