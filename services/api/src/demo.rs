use crate::commands::{
    print_cutoff, print_eligibility, print_programs, print_score, resolve_as_of,
};
use crate::infra::{InMemoryProfileRepository, StaticCatalogue};
use chrono::{Days, NaiveDate};
use clap::Args;
use express_entry::config::AppConfig;
use express_entry::error::AppError;
use express_entry::express_entry::{
    AdaptabilityFactors, AssessmentService, EducationLevel, EducationRecord, JobOfferDetails,
    Language, LanguageTestResult, LanguageTestType, MaritalStatus, NominationDetails, Occupation,
    ProfileId, Province, RawProfile, RawSpouseProfile, Relationship, Relative, ResidencyStatus,
    WorkExperienceRecord,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Assessment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Optional CSV catalogue export used for provincial matching.
    #[arg(long)]
    pub(crate) catalogue: Option<PathBuf>,
    /// Skip the improvement recommendations section.
    #[arg(long)]
    pub(crate) skip_recommendations: bool,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let as_of = resolve_as_of(args.as_of);
    let profiles = sample_profiles(as_of);
    let ids: Vec<ProfileId> = profiles.iter().map(|(id, _)| id.clone()).collect();

    let service = AssessmentService::new(
        Arc::new(InMemoryProfileRepository::seeded(profiles)),
        Arc::new(StaticCatalogue::load(
            args.catalogue
                .as_deref()
                .or(config.pnp_catalogue_path.as_deref()),
        )?),
        config.rules.clone(),
    );

    println!("=== Express Entry demo ({as_of}) ===");
    for id in ids {
        let assessment = service.assess(&id, as_of)?;

        println!("\n--- {} ---", id.0);
        print_score(&assessment.score);
        print_cutoff(assessment.cutoff.as_ref());
        println!("  Federal programs:");
        print_eligibility(&assessment.eligibility);
        println!("  Provincial programs:");
        print_programs(&assessment.provincial_programs);

        if !args.skip_recommendations {
            println!("  Improvement options:");
            if assessment.recommendations.is_empty() {
                println!("    none found");
            }
            for recommendation in &assessment.recommendations {
                println!(
                    "    +{} {}",
                    recommendation.points_gain, recommendation.message
                );
            }
        }
    }

    Ok(())
}

/// Three representative applicants with test and work dates anchored to `as_of`.
pub(crate) fn sample_profiles(as_of: NaiveDate) -> Vec<(ProfileId, RawProfile)> {
    vec![
        (
            ProfileId("sample-developer".to_string()),
            developer(as_of),
        ),
        (
            ProfileId("sample-tradesperson".to_string()),
            tradesperson(as_of),
        ),
        (ProfileId("sample-nominee".to_string()), nominee(as_of)),
    ]
}

fn days_before(as_of: NaiveDate, days: u64) -> NaiveDate {
    as_of.checked_sub_days(Days::new(days)).unwrap_or(as_of)
}

fn ielts(as_of: NaiveDate, speaking: f32, listening: f32, reading: f32, writing: f32) -> LanguageTestResult {
    LanguageTestResult {
        language: Language::English,
        test: LanguageTestType::Ielts,
        speaking,
        listening,
        reading,
        writing,
        test_date: days_before(as_of, 120),
    }
}

fn employment(noc: &str, title: &str, country: &str, start: NaiveDate, end: Option<NaiveDate>) -> WorkExperienceRecord {
    WorkExperienceRecord {
        occupation: Occupation {
            title: Some(title.to_string()),
            noc: Some(noc.to_string()),
        },
        employer: None,
        country: Some(country.to_string()),
        is_canadian_experience: country == "Canada",
        start_date: start,
        end_date: end,
        hours_per_week: 40.0,
        paid: true,
    }
}

fn developer(as_of: NaiveDate) -> RawProfile {
    RawProfile {
        age: 29,
        marital_status: MaritalStatus::Single,
        education: vec![EducationRecord {
            level: EducationLevel::Bachelors,
            field: Some("Computer Science".to_string()),
            country: Some("Canada".to_string()),
            completion_date: Some(days_before(as_of, 6 * 365)),
            program_length_months: Some(48),
            canadian_equivalency: false,
        }],
        language_proficiency: vec![ielts(as_of, 7.0, 8.0, 7.0, 7.0)],
        first_official_language: None,
        work_experience: vec![employment(
            "21231",
            "Software developer",
            "Canada",
            days_before(as_of, 3 * 365 + 30),
            None,
        )],
        adaptability_factors: AdaptabilityFactors::default(),
        has_provincial_nomination: false,
        provincial_nomination: None,
        has_job_offer: false,
        job_offer_details: None,
        has_certificate_of_qualification: false,
        spouse: None,
    }
}

fn tradesperson(as_of: NaiveDate) -> RawProfile {
    RawProfile {
        age: 34,
        marital_status: MaritalStatus::Married,
        education: vec![EducationRecord {
            level: EducationLevel::TwoYearDiploma,
            field: Some("Industrial Electricity".to_string()),
            country: Some("Philippines".to_string()),
            completion_date: Some(days_before(as_of, 12 * 365)),
            program_length_months: Some(24),
            canadian_equivalency: true,
        }],
        language_proficiency: vec![ielts(as_of, 6.0, 5.5, 5.0, 5.5)],
        first_official_language: Some(Language::English),
        work_experience: vec![
            employment(
                "72200",
                "Industrial electrician",
                "Philippines",
                days_before(as_of, 8 * 365),
                Some(days_before(as_of, 2 * 365)),
            ),
            employment(
                "72200",
                "Industrial electrician",
                "Canada",
                days_before(as_of, 365 + 60),
                None,
            ),
        ],
        adaptability_factors: AdaptabilityFactors {
            relatives_in_canada: vec![Relative {
                relationship: Relationship::Sibling,
                status: ResidencyStatus::Citizen,
                province: Some(Province::Alberta),
            }],
            provincial_connections: vec![Province::Alberta],
            ..AdaptabilityFactors::default()
        },
        has_provincial_nomination: false,
        provincial_nomination: None,
        has_job_offer: true,
        job_offer_details: Some(JobOfferDetails {
            noc: "72200".to_string(),
            title: Some("Industrial electrician".to_string()),
            employer: Some("Prairie Grid Services".to_string()),
            province: Some(Province::Alberta),
            is_lmia_exempt: false,
            has_lmia: true,
        }),
        has_certificate_of_qualification: true,
        spouse: Some(RawSpouseProfile {
            education: vec![EducationRecord {
                level: EducationLevel::Bachelors,
                field: Some("Accounting".to_string()),
                country: Some("Philippines".to_string()),
                completion_date: Some(days_before(as_of, 10 * 365)),
                program_length_months: Some(48),
                canadian_equivalency: true,
            }],
            language_proficiency: vec![ielts(as_of, 6.5, 7.0, 6.5, 6.5)],
            work_experience: Vec::new(),
            accompanying: true,
            canadian_citizen_or_permanent_resident: false,
        }),
    }
}

fn nominee(as_of: NaiveDate) -> RawProfile {
    RawProfile {
        age: 41,
        has_provincial_nomination: true,
        provincial_nomination: Some(NominationDetails {
            province: Province::Ontario,
            stream: Some("Human Capital Priorities".to_string()),
            nominated_on: Some(days_before(as_of, 45)),
            expires_on: Some(as_of.checked_add_days(Days::new(135)).unwrap_or(as_of)),
        }),
        ..developer(as_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use express_entry::config::{AppEnvironment, ServerConfig, TelemetryConfig};
    use express_entry::express_entry::RulesConfig;

    #[test]
    fn sample_profiles_are_assessable() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let service = AssessmentService::new(
            Arc::new(InMemoryProfileRepository::seeded(sample_profiles(as_of))),
            Arc::new(StaticCatalogue::load(None).unwrap()),
            RulesConfig::default(),
        );

        for (id, _) in sample_profiles(as_of) {
            let assessment = service.assess(&id, as_of).expect("sample profile assesses");
            assert!(assessment.score.total > 0);
        }
    }

    #[test]
    fn nominee_outscores_developer_by_nomination_points() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let engine = express_entry::express_entry::ExpressEntryEngine::default();

        let developer = engine.compute_score(&developer(as_of), as_of).unwrap();
        let nominee = engine.compute_score(&nominee(as_of), as_of).unwrap();

        assert_eq!(nominee.additional.provincial_nomination, 600);
        assert!(nominee.total > developer.total);
    }

    #[test]
    fn demo_runs_against_the_standard_catalogue() {
        let config = AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            rules: RulesConfig::default(),
            pnp_catalogue_path: None,
        };
        let result = run_demo(
            DemoArgs {
                as_of: NaiveDate::from_ymd_opt(2025, 6, 1),
                catalogue: None,
                skip_recommendations: false,
            },
            &config,
        );
        assert!(result.is_ok());
    }
}
