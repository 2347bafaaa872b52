use crate::infra::{read_profile, StaticCatalogue};
use chrono::{NaiveDate, Utc};
use clap::Args;
use express_entry::config::AppConfig;
use express_entry::error::AppError;
use express_entry::express_entry::{
    AssessmentServiceError, CutoffComparison, DrawHistory, EligibilityReport, ExpressEntryEngine,
    ScoreBreakdown,
};
use express_entry::pnp::ProgramAssessment;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ProfileArgs {
    /// JSON profile document to assess
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Assessment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the result as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PnpArgs {
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
    /// CSV catalogue export to match against instead of the built-in programs
    #[arg(long)]
    pub(crate) catalogue: Option<PathBuf>,
    /// Only list programs the profile qualifies for
    #[arg(long)]
    pub(crate) matches_only: bool,
}

/// Score with the draw comparison the text report prints.
#[derive(Debug, Serialize)]
pub(crate) struct ScoreReport {
    pub(crate) as_of: NaiveDate,
    pub(crate) score: ScoreBreakdown,
    pub(crate) cutoff: Option<CutoffComparison>,
}

pub(crate) fn run_score(args: ProfileArgs, config: &AppConfig) -> Result<(), AppError> {
    let report = score_profile(&args, config)?;

    if args.json {
        return print_json(&report);
    }
    println!("CRS assessment as of {}", report.as_of);
    print_score(&report.score);
    print_cutoff(report.cutoff.as_ref());
    Ok(())
}

pub(crate) fn run_eligibility(args: ProfileArgs, config: &AppConfig) -> Result<(), AppError> {
    let as_of = resolve_as_of(args.as_of);
    let report = evaluate_profile(&args, config)?;

    if args.json {
        return print_json(&report);
    }
    println!("Program eligibility as of {as_of}");
    print_eligibility(&report);
    Ok(())
}

pub(crate) fn run_pnp_match(args: PnpArgs, config: &AppConfig) -> Result<(), AppError> {
    let as_of = resolve_as_of(args.profile.as_of);
    let (catalogue_size, assessments) = match_profile(&args, config)?;

    if args.profile.json {
        return print_json(&assessments);
    }
    println!("Provincial nominee matching as of {as_of} ({catalogue_size} programs)");
    print_programs(&assessments);
    Ok(())
}

fn score_profile(args: &ProfileArgs, config: &AppConfig) -> Result<ScoreReport, AppError> {
    let raw = read_profile(&args.profile)?;
    let as_of = resolve_as_of(args.as_of);
    let engine = ExpressEntryEngine::new(config.rules.clone());
    let profile = engine
        .normalize(&raw, as_of)
        .map_err(AssessmentServiceError::from)?;
    let summary = engine.assess_profile(&profile, &[]);
    let cutoff = DrawHistory::standard().compare(&summary.score, &summary.eligibility, as_of);

    Ok(ScoreReport {
        as_of,
        score: summary.score,
        cutoff,
    })
}

fn evaluate_profile(args: &ProfileArgs, config: &AppConfig) -> Result<EligibilityReport, AppError> {
    let raw = read_profile(&args.profile)?;
    let report = ExpressEntryEngine::new(config.rules.clone())
        .evaluate_eligibility(&raw, resolve_as_of(args.as_of))
        .map_err(AssessmentServiceError::from)?;
    Ok(report)
}

/// An explicit `--catalogue` wins over `PNP_CATALOGUE_PATH`.
fn match_profile(
    args: &PnpArgs,
    config: &AppConfig,
) -> Result<(usize, Vec<ProgramAssessment>), AppError> {
    let raw = read_profile(&args.profile.profile)?;
    let as_of = resolve_as_of(args.profile.as_of);
    let path = args
        .catalogue
        .as_deref()
        .or(config.pnp_catalogue_path.as_deref());
    let source = StaticCatalogue::load(path)?;
    let engine = ExpressEntryEngine::new(config.rules.clone());
    let profile = engine
        .normalize(&raw, as_of)
        .map_err(AssessmentServiceError::from)?;
    let mut assessments = engine
        .assess_profile(&profile, source.catalogue().programs())
        .provincial_programs;
    if args.matches_only {
        assessments.retain(|assessment| assessment.eligible);
    }
    Ok((source.catalogue().len(), assessments))
}

pub(crate) fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_score(breakdown: &ScoreBreakdown) {
    let core = &breakdown.core;
    println!("  Total: {}", breakdown.total);
    println!("  Core / human capital: {} (cap {})", core.subtotal, core.cap);
    println!(
        "    age {} | education {} | first language {} | second language {} | Canadian experience {}",
        core.age, core.education, core.first_language, core.second_language, core.canadian_experience
    );

    let spouse = &breakdown.spouse;
    if spouse.assessed {
        println!("  Spouse factors: {}", spouse.subtotal);
        println!(
            "    education {} | language {} | Canadian experience {}",
            spouse.education, spouse.language, spouse.canadian_experience
        );
    }

    let transferability = &breakdown.transferability;
    println!("  Skill transferability: {}", transferability.subtotal);
    println!(
        "    education+language {} | education+foreign experience {} | foreign+Canadian experience {} | certificate+language {}",
        transferability.education_language,
        transferability.education_foreign_experience,
        transferability.foreign_canadian_experience,
        transferability.certificate_language
    );

    let additional = &breakdown.additional;
    println!("  Additional points: {}", additional.subtotal);
    println!(
        "    nomination {} | job offer {} | French {} | Canadian study {} | sibling {}",
        additional.provincial_nomination,
        additional.job_offer,
        additional.french_language,
        additional.canadian_study,
        additional.sibling
    );

    for warning in &breakdown.warnings {
        println!("  ! {}", warning.summary());
    }
}

pub(crate) fn print_cutoff(cutoff: Option<&CutoffComparison>) {
    match cutoff {
        Some(cutoff) => println!(
            "  Latest open round: #{} on {} ({}), minimum {}, gap {:+}",
            cutoff.draw_number,
            cutoff.draw_date,
            cutoff.round_type.label(),
            cutoff.minimum_score,
            cutoff.cutoff_gap
        ),
        None => println!("  No invitation round on record that this profile could enter."),
    }
}

pub(crate) fn print_eligibility(report: &EligibilityReport) {
    for result in report.results() {
        let status = if result.is_eligible {
            "eligible"
        } else {
            "not eligible"
        };
        println!("  {}: {status}", result.program.code());
        for reason in &result.reasons {
            println!("    - {reason}");
        }
    }
}

pub(crate) fn print_programs(assessments: &[ProgramAssessment]) {
    if assessments.is_empty() {
        println!("  No provincial programs to report.");
        return;
    }
    for assessment in assessments {
        let marker = if assessment.eligible { "+" } else { "-" };
        println!(
            "  {marker} {} {} ({})",
            assessment.program_id,
            assessment.name,
            assessment.province.code()
        );
        for requirement in &assessment.unmet_requirements {
            println!("      needs {requirement}");
        }
    }
}
