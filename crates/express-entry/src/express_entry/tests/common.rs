use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::express_entry::domain::{
    AdaptabilityFactors, EducationLevel, EducationRecord, Language, LanguageTestResult,
    LanguageTestType, MaritalStatus, Occupation, ProfileId, RawProfile, RawSpouseProfile,
    WorkExperienceRecord,
};
use crate::express_entry::repository::{CatalogueSource, ProfileRepository, RepositoryError};
use crate::express_entry::{assessment_router, AssessmentService, RulesConfig};
use crate::pnp::PnpCatalogue;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn as_of() -> NaiveDate {
    date(2025, 6, 1)
}

/// IELTS sitting converting to CLB 9 on every ability.
pub(super) fn ielts_clb9() -> LanguageTestResult {
    LanguageTestResult {
        language: Language::English,
        test: LanguageTestType::Ielts,
        speaking: 7.0,
        listening: 8.0,
        reading: 7.0,
        writing: 7.0,
        test_date: date(2025, 1, 15),
    }
}

/// IELTS sitting converting to CLB 5 on every ability.
pub(super) fn ielts_clb5() -> LanguageTestResult {
    LanguageTestResult {
        speaking: 5.0,
        listening: 5.0,
        reading: 4.0,
        writing: 5.0,
        ..ielts_clb9()
    }
}

/// TEF sitting converting to CLB 7 on every ability.
pub(super) fn tef_clb7() -> LanguageTestResult {
    LanguageTestResult {
        language: Language::French,
        test: LanguageTestType::Tef,
        speaking: 310.0,
        listening: 249.0,
        reading: 207.0,
        writing: 310.0,
        test_date: date(2025, 2, 1),
    }
}

pub(super) fn canadian_bachelors() -> EducationRecord {
    EducationRecord {
        level: EducationLevel::Bachelors,
        field: Some("Computer Science".to_string()),
        country: Some("Canada".to_string()),
        completion_date: Some(date(2019, 5, 1)),
        program_length_months: Some(48),
        canadian_equivalency: false,
    }
}

pub(super) fn job(noc: &str, canadian: bool, start: NaiveDate, end: Option<NaiveDate>) -> WorkExperienceRecord {
    WorkExperienceRecord {
        occupation: Occupation {
            title: None,
            noc: Some(noc.to_string()),
        },
        employer: Some("Northwind Systems".to_string()),
        country: Some(if canadian { "Canada" } else { "India" }.to_string()),
        is_canadian_experience: canadian,
        start_date: start,
        end_date: end,
        hours_per_week: 40.0,
        paid: true,
    }
}

/// 29-year-old software developer: Canadian bachelor's, CLB 9, three years in Canada.
pub(super) fn single_profile() -> RawProfile {
    RawProfile {
        age: 29,
        marital_status: MaritalStatus::Single,
        education: vec![canadian_bachelors()],
        language_proficiency: vec![ielts_clb9()],
        first_official_language: None,
        work_experience: vec![job("21231", true, date(2022, 5, 1), None)],
        adaptability_factors: AdaptabilityFactors::default(),
        has_provincial_nomination: false,
        provincial_nomination: None,
        has_job_offer: false,
        job_offer_details: None,
        has_certificate_of_qualification: false,
        spouse: None,
    }
}

pub(super) fn spouse() -> RawSpouseProfile {
    RawSpouseProfile {
        education: vec![EducationRecord {
            level: EducationLevel::Masters,
            field: None,
            country: Some("India".to_string()),
            completion_date: Some(date(2018, 6, 30)),
            program_length_months: Some(24),
            canadian_equivalency: true,
        }],
        language_proficiency: vec![ielts_clb9()],
        work_experience: Vec::new(),
        accompanying: true,
        canadian_citizen_or_permanent_resident: false,
    }
}

pub(super) fn married_profile() -> RawProfile {
    RawProfile {
        marital_status: MaritalStatus::Married,
        spouse: Some(spouse()),
        ..single_profile()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    pub(super) records: Arc<Mutex<HashMap<ProfileId, RawProfile>>>,
}

impl MemoryProfiles {
    pub(super) fn with(id: &str, profile: RawProfile) -> Self {
        let repository = Self::default();
        repository
            .records
            .lock()
            .expect("lock")
            .insert(ProfileId(id.to_string()), profile);
        repository
    }
}

impl ProfileRepository for MemoryProfiles {
    fn load_profile(&self, id: &ProfileId) -> Result<Option<RawProfile>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct StandardCatalogue;

impl CatalogueSource for StandardCatalogue {
    fn load_pnp_catalogue(&self) -> Result<PnpCatalogue, RepositoryError> {
        Ok(PnpCatalogue::standard())
    }
}

pub(super) struct OfflineCatalogue;

impl CatalogueSource for OfflineCatalogue {
    fn load_pnp_catalogue(&self) -> Result<PnpCatalogue, RepositoryError> {
        Err(RepositoryError::Unavailable("catalogue feed offline".to_string()))
    }
}

pub(super) fn build_service(
    profiles: MemoryProfiles,
) -> AssessmentService<MemoryProfiles, StandardCatalogue> {
    AssessmentService::new(
        Arc::new(profiles),
        Arc::new(StandardCatalogue),
        RulesConfig::default(),
    )
}

pub(super) fn router_with_service(
    service: AssessmentService<MemoryProfiles, StandardCatalogue>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
