use super::common::*;
use crate::express_entry::domain::{JobOfferDetails, Province, RawProfile};
use crate::express_entry::{match_provincial_programs, ExpressEntryEngine};
use crate::pnp::{AgeRange, PnpCatalogue, PnpMatcher, PnpProgram};

fn matched_ids(raw: &RawProfile, catalogue: &[PnpProgram]) -> Vec<String> {
    match_provincial_programs(raw, catalogue, as_of())
        .expect("valid profile")
        .into_iter()
        .map(|program| program.id)
        .collect()
}

fn bc_offer() -> JobOfferDetails {
    JobOfferDetails {
        noc: "21231".to_string(),
        title: Some("Software developer".to_string()),
        employer: Some("Coastline Analytics".to_string()),
        province: Some(Province::BritishColumbia),
        is_lmia_exempt: true,
        has_lmia: false,
    }
}

#[test]
fn sample_profile_matches_only_the_unconditional_ontario_stream() {
    let catalogue = PnpCatalogue::standard();

    assert_eq!(matched_ids(&single_profile(), catalogue.programs()), vec!["on-001"]);
}

#[test]
fn job_offer_and_connection_open_more_streams_in_catalogue_order() {
    let catalogue = PnpCatalogue::standard();
    let mut raw = RawProfile {
        has_job_offer: true,
        job_offer_details: Some(bc_offer()),
        ..single_profile()
    };
    raw.adaptability_factors.provincial_connections = vec![Province::Alberta];

    assert_eq!(
        matched_ids(&raw, catalogue.programs()),
        vec!["on-001", "bc-001", "bc-002", "ab-001"]
    );
}

#[test]
fn french_stream_needs_a_french_result_and_a_connection() {
    let catalogue = PnpCatalogue::standard();
    let mut raw = single_profile();
    raw.language_proficiency.push(tef_clb7());
    assert!(!matched_ids(&raw, catalogue.programs()).contains(&"qc-001".to_string()));

    raw.adaptability_factors.provincial_connections = vec![Province::Quebec];
    assert!(matched_ids(&raw, catalogue.programs()).contains(&"qc-001".to_string()));
}

#[test]
fn trade_stream_matches_occupation_prefixes() {
    let catalogue = PnpCatalogue::standard();
    let raw = RawProfile {
        work_experience: vec![job("72200", true, date(2022, 5, 1), None)],
        has_job_offer: true,
        job_offer_details: Some(JobOfferDetails {
            noc: "72200".to_string(),
            province: Some(Province::Ontario),
            ..bc_offer()
        }),
        ..single_profile()
    };

    assert!(matched_ids(&raw, catalogue.programs()).contains(&"on-002".to_string()));
}

#[test]
fn assessments_list_every_unmet_requirement() {
    let catalogue = PnpCatalogue::standard();
    let engine = ExpressEntryEngine::default();
    let profile = engine.normalize(&single_profile(), as_of()).expect("valid");

    let assessments = PnpMatcher.assess(&profile, catalogue.programs());

    assert_eq!(assessments.len(), catalogue.len());
    let trades = assessments
        .iter()
        .find(|assessment| assessment.program_id == "on-002")
        .expect("on-002 assessed");
    assert!(!trades.eligible);
    assert_eq!(trades.unmet_requirements.len(), 2);
    assert!(trades.unmet_requirements[1].contains("job offer in ontario"));
}

#[test]
fn inactive_and_age_limited_programs_are_excluded() {
    let mut programs = PnpCatalogue::standard().into_programs();
    programs.truncate(1);
    let mut aged = programs[0].clone();
    aged.id = "on-aged".to_string();
    aged.requirements.age_range = Some(AgeRange { min: 30, max: 45 });
    let mut closed = programs[0].clone();
    closed.id = "on-closed".to_string();
    closed.is_active = false;
    programs.push(aged);
    programs.push(closed);

    assert_eq!(matched_ids(&single_profile(), &programs), vec!["on-001"]);
}

#[test]
fn empty_catalogue_matches_nothing() {
    assert!(matched_ids(&single_profile(), &[]).is_empty());
}
