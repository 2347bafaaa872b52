use chrono::Days;
use proptest::prelude::*;

use super::common::*;
use crate::express_entry::domain::{
    EducationLevel, EducationRecord, JobOfferDetails, LanguageTestResult, MaritalStatus,
    NominationDetails, Province, RawProfile, Relationship, Relative, ResidencyStatus,
};
use crate::express_entry::scoring::{EligibilityWarning, ScoreBreakdown, ScoreFactor};
use crate::express_entry::{compute_score, ExpressEntryEngine};

fn score(raw: &RawProfile) -> ScoreBreakdown {
    compute_score(raw, as_of()).expect("valid profile")
}

fn offer(noc: &str, has_lmia: bool) -> JobOfferDetails {
    JobOfferDetails {
        noc: noc.to_string(),
        title: None,
        employer: None,
        province: Some(Province::Ontario),
        is_lmia_exempt: false,
        has_lmia,
    }
}

#[test]
fn sample_profile_scores_above_four_hundred() {
    let breakdown = score(&single_profile());

    assert_eq!(breakdown.core.age, 110);
    assert_eq!(breakdown.core.education, 120);
    assert_eq!(breakdown.core.first_language, 124);
    assert_eq!(breakdown.core.canadian_experience, 64);
    assert_eq!(breakdown.core.subtotal, 418);
    assert_eq!(breakdown.transferability.education_language, 25);
    assert_eq!(breakdown.transferability.subtotal, 25);
    assert_eq!(breakdown.additional.canadian_study, 30);
    assert_eq!(breakdown.total, 473);
    assert!(breakdown.total >= 400);
    assert!(breakdown.warnings.is_empty());
}

#[test]
fn total_matches_category_subtotals() {
    for raw in [single_profile(), married_profile()] {
        let breakdown = score(&raw);
        assert_eq!(breakdown.total, breakdown.category_sum());
    }
}

#[test]
fn scoring_is_idempotent() {
    let raw = married_profile();
    assert_eq!(score(&raw), score(&raw));
}

#[test]
fn ages_outside_the_table_earn_nothing() {
    for age in [17, 45, 60] {
        let raw = RawProfile {
            age,
            ..single_profile()
        };
        assert_eq!(score(&raw).core.age, 0, "age {age}");
    }

    let young = score(&single_profile());
    let older = score(&RawProfile {
        age: 45,
        ..single_profile()
    });
    assert_ne!(young.core.age, older.core.age);
    assert_eq!(young.total - older.total, 110);
}

#[test]
fn single_applicant_uses_the_higher_cap_and_no_spouse_points() {
    let breakdown = score(&single_profile());

    assert_eq!(breakdown.core.cap, 500);
    assert!(!breakdown.spouse.assessed);
    assert_eq!(breakdown.spouse.subtotal, 0);
    assert!(!breakdown
        .components
        .iter()
        .any(|component| component.factor == ScoreFactor::SpouseEducation));
}

#[test]
fn accompanying_spouse_switches_columns_and_adds_partner_points() {
    let breakdown = score(&married_profile());

    assert_eq!(breakdown.core.cap, 460);
    assert_eq!(breakdown.core.age, 100);
    assert_eq!(breakdown.core.education, 112);
    assert_eq!(breakdown.core.first_language, 116);
    assert_eq!(breakdown.core.canadian_experience, 56);
    assert!(breakdown.spouse.assessed);
    assert_eq!(breakdown.spouse.education, 10);
    assert_eq!(breakdown.spouse.language, 20);
    assert_eq!(breakdown.spouse.subtotal, 30);
    assert_eq!(breakdown.total, 469);
}

#[test]
fn french_second_language_earns_points_and_bonus() {
    let mut raw = single_profile();
    raw.language_proficiency.push(tef_clb7());

    let breakdown = score(&raw);

    assert_eq!(breakdown.core.second_language, 12);
    assert_eq!(breakdown.additional.french_language, 50);
    assert_eq!(breakdown.total, 473 + 12 + 50);
}

#[test]
fn french_bonus_is_lower_with_weak_english() {
    let mut raw = single_profile();
    raw.language_proficiency = vec![
        LanguageTestResult {
            speaking: 3.5,
            listening: 4.0,
            reading: 3.0,
            writing: 3.5,
            ..ielts_clb9()
        },
        tef_clb7(),
    ];

    let breakdown = score(&raw);

    assert_eq!(breakdown.additional.french_language, 25);
}

#[test]
fn nomination_adds_six_hundred_until_it_expires() {
    let mut raw = single_profile();
    raw.has_provincial_nomination = true;
    raw.provincial_nomination = Some(NominationDetails {
        province: Province::Ontario,
        stream: None,
        nominated_on: Some(date(2025, 1, 10)),
        expires_on: Some(date(2025, 12, 31)),
    });
    let nominated = score(&raw);
    assert_eq!(nominated.additional.provincial_nomination, 600);
    assert_eq!(nominated.total, 1073);

    if let Some(details) = raw.provincial_nomination.as_mut() {
        details.expires_on = Some(date(2025, 1, 1));
    }
    let expired = score(&raw);
    assert_eq!(expired.additional.provincial_nomination, 0);
    assert_eq!(
        expired.warnings,
        vec![EligibilityWarning::ExpiredNomination {
            province: Some(Province::Ontario),
            expired_on: date(2025, 1, 1),
        }]
    );
    assert!(expired.warnings[0].summary().contains("expired on 2025-01-01"));
}

#[test]
fn job_offer_points_depend_on_the_occupation() {
    let with_offer = |details: JobOfferDetails| RawProfile {
        has_job_offer: true,
        job_offer_details: Some(details),
        ..single_profile()
    };

    assert_eq!(score(&with_offer(offer("00012", true))).additional.job_offer, 200);
    assert_eq!(score(&with_offer(offer("21231", true))).additional.job_offer, 50);

    let labour = score(&with_offer(offer("65201", true)));
    assert_eq!(labour.additional.job_offer, 0);
    assert!(matches!(
        labour.warnings.as_slice(),
        [EligibilityWarning::NonQualifyingJobOffer { noc, .. }] if noc == "65201"
    ));

    let unsupported = score(&with_offer(offer("21231", false)));
    assert_eq!(unsupported.additional.job_offer, 0);
    assert_eq!(unsupported.warnings.len(), 1);

    let malformed = score(&with_offer(offer("2123", true)));
    assert_eq!(malformed.additional.job_offer, 0);
    assert_eq!(malformed.warnings.len(), 1);
}

#[test]
fn additional_points_are_capped() {
    let mut raw = single_profile();
    raw.has_provincial_nomination = true;
    raw.has_job_offer = true;
    raw.job_offer_details = Some(offer("00012", true));

    let breakdown = score(&raw);

    assert_eq!(breakdown.additional.provincial_nomination, 600);
    assert_eq!(breakdown.additional.job_offer, 200);
    assert_eq!(breakdown.additional.subtotal, 600);
    assert_eq!(breakdown.total, 418 + 25 + 600);
}

#[test]
fn canadian_study_points_follow_program_length() {
    let with_length = |months: i32, level: EducationLevel| {
        let mut raw = single_profile();
        raw.education = vec![EducationRecord {
            level,
            program_length_months: Some(months),
            ..canadian_bachelors()
        }];
        score(&raw).additional.canadian_study
    };

    assert_eq!(with_length(8, EducationLevel::OneYearDiploma), 0);
    assert_eq!(with_length(24, EducationLevel::TwoYearDiploma), 15);
    assert_eq!(with_length(48, EducationLevel::Bachelors), 30);
    assert_eq!(with_length(12, EducationLevel::Masters), 30);
}

#[test]
fn sibling_in_canada_earns_points() {
    let mut raw = single_profile();
    raw.adaptability_factors.relatives_in_canada = vec![
        Relative {
            relationship: Relationship::Parent,
            status: ResidencyStatus::Citizen,
            province: None,
        },
        Relative {
            relationship: Relationship::Sibling,
            status: ResidencyStatus::TemporaryResident,
            province: None,
        },
    ];
    assert_eq!(score(&raw).additional.sibling, 0);

    raw.adaptability_factors.relatives_in_canada[1].status = ResidencyStatus::PermanentResident;
    assert_eq!(score(&raw).additional.sibling, 15);
}

#[test]
fn foreign_experience_feeds_transferability() {
    let mut raw = single_profile();
    raw.work_experience
        .push(job("21231", false, date(2017, 1, 1), Some(date(2020, 12, 31))));

    let breakdown = score(&raw);

    assert_eq!(breakdown.transferability.education_foreign_experience, 25);
    assert_eq!(breakdown.transferability.foreign_canadian_experience, 50);
    assert_eq!(breakdown.transferability.subtotal, 100);
}

#[test]
fn certificate_of_qualification_combines_with_language() {
    let raw = RawProfile {
        has_certificate_of_qualification: true,
        language_proficiency: vec![ielts_clb5()],
        ..single_profile()
    };

    assert_eq!(score(&raw).transferability.certificate_language, 25);
}

#[test]
fn education_language_follows_the_weakest_ability() {
    let raw = RawProfile {
        language_proficiency: vec![LanguageTestResult {
            writing: 5.5,
            ..ielts_clb9()
        }],
        ..single_profile()
    };
    assert_eq!(score(&raw).transferability.education_language, 0);

    let raw = RawProfile {
        language_proficiency: vec![LanguageTestResult {
            writing: 6.0,
            ..ielts_clb9()
        }],
        ..single_profile()
    };
    assert_eq!(score(&raw).transferability.education_language, 13);
}

#[test]
fn certificate_earns_nothing_at_clb_four() {
    let raw = RawProfile {
        has_certificate_of_qualification: true,
        language_proficiency: vec![LanguageTestResult {
            speaking: 4.0,
            listening: 4.5,
            reading: 3.5,
            writing: 4.0,
            ..ielts_clb9()
        }],
        ..single_profile()
    };

    let breakdown = score(&raw);
    assert_eq!(breakdown.core.first_language, 24);
    assert_eq!(breakdown.transferability.certificate_language, 0);
}

#[test]
fn components_explain_the_core_factors() {
    let breakdown = score(&single_profile());
    let age = breakdown
        .components
        .iter()
        .find(|component| component.factor == ScoreFactor::Age)
        .expect("age component");

    assert_eq!(age.points, 110);
    assert_eq!(age.notes, "age 29");
}

#[test]
fn batch_scoring_preserves_input_order() {
    let profiles: Vec<RawProfile> = (18..48)
        .map(|age| RawProfile {
            age,
            ..single_profile()
        })
        .chain(std::iter::once(RawProfile {
            language_proficiency: Vec::new(),
            ..single_profile()
        }))
        .collect();

    let engine = ExpressEntryEngine::default();
    let results = engine.compute_scores(&profiles, as_of());

    assert_eq!(results.len(), profiles.len());
    for (raw, result) in profiles.iter().zip(&results) {
        assert_eq!(result, &engine.compute_score(raw, as_of()));
    }
    assert!(results.last().expect("last").is_err());
}

fn half_band() -> impl Strategy<Value = f32> {
    (0u8..=18).prop_map(|steps| f32::from(steps) / 2.0)
}

fn education_level() -> impl Strategy<Value = EducationLevel> {
    prop_oneof![
        Just(EducationLevel::HighSchool),
        Just(EducationLevel::OneYearDiploma),
        Just(EducationLevel::TwoYearDiploma),
        Just(EducationLevel::Bachelors),
        Just(EducationLevel::TwoOrMoreDegrees),
        Just(EducationLevel::Masters),
        Just(EducationLevel::Phd),
    ]
}

prop_compose! {
    fn raw_profile()(
        age in 17i32..70,
        bands in (half_band(), half_band(), half_band(), half_band()),
        level in education_level(),
        canadian_years in 0u64..9,
        foreign_years in 0u64..12,
        married in any::<bool>(),
        french in any::<bool>(),
        nominated in any::<bool>(),
        offer_noc in prop_oneof![Just("00012"), Just("21231"), Just("65201")],
        certificate in any::<bool>(),
    ) -> RawProfile {
        let (speaking, listening, reading, writing) = bands;
        let mut raw = if married { married_profile() } else { single_profile() };
        raw.age = age;
        raw.education[0].level = level;
        raw.language_proficiency = vec![LanguageTestResult {
            speaking,
            listening,
            reading,
            writing,
            ..ielts_clb9()
        }];
        if french {
            raw.language_proficiency.push(tef_clb7());
        }
        raw.work_experience.clear();
        if canadian_years > 0 {
            let start = as_of() - Days::new(canadian_years * 365);
            raw.work_experience.push(job("21231", true, start, None));
        }
        if foreign_years > 0 {
            let end = date(2021, 12, 31);
            let start = end - Days::new(foreign_years * 365);
            raw.work_experience.push(job("21231", false, start, Some(end)));
        }
        raw.has_provincial_nomination = nominated;
        raw.has_job_offer = true;
        raw.job_offer_details = Some(offer(offer_noc, true));
        raw.has_certificate_of_qualification = certificate;
        if married {
            raw.marital_status = MaritalStatus::CommonLaw;
        }
        raw
    }
}

proptest! {
    #[test]
    fn totals_respect_every_cap(raw in raw_profile()) {
        let breakdown = compute_score(&raw, as_of()).expect("generated profiles are valid");

        prop_assert!(breakdown.total <= 1200);
        prop_assert_eq!(breakdown.total, breakdown.category_sum().min(1200));
        prop_assert!(breakdown.core.subtotal <= breakdown.core.cap);
        prop_assert!(breakdown.spouse.subtotal <= 40);
        prop_assert!(breakdown.transferability.subtotal <= 100);
        prop_assert!(breakdown.additional.subtotal <= 600);
        if !breakdown.spouse.assessed {
            prop_assert_eq!(breakdown.spouse.subtotal, 0);
            prop_assert_eq!(breakdown.core.cap, 500);
        }
    }

    #[test]
    fn scoring_twice_gives_the_same_breakdown(raw in raw_profile()) {
        prop_assert_eq!(
            compute_score(&raw, as_of()).expect("valid"),
            compute_score(&raw, as_of()).expect("valid")
        );
    }
}
