use chrono::NaiveDate;
use express_entry::express_entry::{match_provincial_programs, RawProfile};
use express_entry::pnp::{PnpCatalogue, PnpCatalogueImporter};
use serde_json::json;

fn assessment_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid assessment date")
}

fn catalogue() -> PnpCatalogue {
    let data = include_bytes!("../data/pnp_programs.csv");
    PnpCatalogueImporter::from_reader(&data[..]).expect("catalogue export imports")
}

fn developer() -> RawProfile {
    serde_json::from_value(json!({
        "age": 29,
        "maritalStatus": "single",
        "education": [{ "level": "bachelors", "country": "Canada", "completionDate": "2019-05-01" }],
        "languageProficiency": [{
            "language": "english", "test": "IELTS",
            "speaking": 7.0, "listening": 8.0, "reading": 7.0, "writing": 7.0,
            "testDate": "2025-01-15"
        }],
        "workExperience": [{
            "occupation": { "noc": "21231" },
            "isCanadianExperience": true,
            "startDate": "2022-05-01",
            "hoursPerWeek": 37.5
        }]
    }))
    .expect("profile document parses")
}

#[test]
fn csv_export_reproduces_the_reference_streams() {
    let imported = catalogue();
    let reference = PnpCatalogue::standard();

    assert_eq!(imported.len(), 8);
    for program in reference.programs() {
        let loaded = imported.find(&program.id).expect("reference stream present");
        assert_eq!(loaded, program);
    }
}

#[test]
fn imported_catalogue_matches_in_file_order() {
    let catalogue = catalogue();

    let matched: Vec<String> =
        match_provincial_programs(&developer(), catalogue.programs(), assessment_date())
            .expect("valid profile")
            .into_iter()
            .map(|program| program.id)
            .collect();

    assert_eq!(matched, vec!["on-001", "sk-001"]);
}

#[test]
fn inactive_streams_never_match() {
    let catalogue = catalogue();
    let nova_scotia = catalogue.find("ns-001").expect("nova scotia stream");
    assert!(!nova_scotia.is_active);

    let matched = match_provincial_programs(
        &developer(),
        std::slice::from_ref(nova_scotia),
        assessment_date(),
    )
    .expect("valid profile");

    assert!(matched.is_empty());
}

#[test]
fn missing_export_surfaces_an_io_error() {
    let err = PnpCatalogueImporter::from_path("data/does-not-exist.csv").expect_err("no file");
    assert!(err.to_string().starts_with("failed to read catalogue export"));
}
