use std::fmt::Display;

use super::super::experience::{measure, measure_by_occupation, ExperienceFilter, ExperienceSpan};
use super::super::occupation::NocCode;
use super::super::profile::{Ability, ClbLevel, ClbScores, LanguageAbility, Profile};
use super::config::EligibilityConfig;
use super::{EligibilityResult, Program, UnmetCriterion};

/// Collects every failed criterion; nothing short-circuits.
struct Checklist {
    program: Program,
    reasons: Vec<UnmetCriterion>,
}

impl Checklist {
    fn new(program: Program) -> Self {
        Self {
            program,
            reasons: Vec::new(),
        }
    }

    fn require(
        &mut self,
        met: bool,
        criterion: impl Into<String>,
        observed: impl Display,
        required: impl Display,
    ) {
        if !met {
            self.reasons.push(UnmetCriterion {
                criterion: criterion.into(),
                observed: observed.to_string(),
                required: required.to_string(),
            });
        }
    }

    fn finish(self) -> EligibilityResult {
        EligibilityResult {
            program: self.program,
            is_eligible: self.reasons.is_empty(),
            reasons: self.reasons,
        }
    }
}

pub(crate) fn federal_skilled_worker(profile: &Profile, config: &EligibilityConfig) -> EligibilityResult {
    let mut checklist = Checklist::new(Program::FederalSkilledWorker);

    let credential = profile.highest_education();
    checklist.require(
        credential.is_some(),
        "education",
        "no completed credential with Canadian equivalency",
        "at least one completed credential",
    );

    let result = best_language(profile, |clb| clb.min().at_least(config.fswp_min_clb));
    let language = result.clb.min();
    checklist.require(
        language.at_least(config.fswp_min_clb),
        format!("official language ({})", result.language.label()),
        language,
        ClbLevel(config.fswp_min_clb),
    );

    let by_occupation = measure_by_occupation(
        &profile.work,
        profile.as_of,
        ExperienceFilter::within(config.fswp_lookback_years).skilled(),
    );
    let longest = longest_occupation(&by_occupation);
    let months = longest.map(|(_, span)| span.whole_months()).unwrap_or(0);
    checklist.require(
        months >= config.fswp_min_months,
        "skilled work experience in one occupation",
        describe_months(months, longest.map(|(noc, _)| noc)),
        format!(
            "{} months within {} years",
            config.fswp_min_months, config.fswp_lookback_years
        ),
    );

    checklist.finish()
}

pub(crate) fn canadian_experience_class(
    profile: &Profile,
    config: &EligibilityConfig,
) -> EligibilityResult {
    let mut checklist = Checklist::new(Program::CanadianExperienceClass);
    let filter = ExperienceFilter::canadian(config.cec_lookback_years).skilled();

    let months = measure(&profile.work, profile.as_of, filter).whole_months();
    checklist.require(
        months >= config.cec_min_months,
        "skilled Canadian work experience",
        format!("{months} months"),
        format!(
            "{} months within {} years",
            config.cec_min_months, config.cec_lookback_years
        ),
    );

    let by_occupation = measure_by_occupation(&profile.work, profile.as_of, filter);
    let main_occupation = longest_occupation(&by_occupation).map(|(noc, _)| noc);
    let (threshold, tier_label) = match main_occupation {
        Some(noc) if noc.tier().is_managerial_or_professional() => {
            (config.cec_managerial_clb, noc.tier().label())
        }
        Some(noc) => (config.cec_technical_clb, noc.tier().label()),
        None => (config.cec_technical_clb, "no skilled occupation"),
    };
    let result = best_language(profile, |clb| clb.min().at_least(threshold));
    let language = result.clb.min();
    checklist.require(
        language.at_least(threshold),
        format!(
            "official language ({}) for {tier_label}",
            result.language.label()
        ),
        language,
        ClbLevel(threshold),
    );

    checklist.finish()
}

pub(crate) fn federal_skilled_trades(profile: &Profile, config: &EligibilityConfig) -> EligibilityResult {
    let mut checklist = Checklist::new(Program::FederalSkilledTrades);

    let months = measure(
        &profile.work,
        profile.as_of,
        ExperienceFilter::within(config.fstp_lookback_years).trades(),
    )
    .whole_months();
    checklist.require(
        months >= config.fstp_min_months,
        "skilled trade work experience",
        format!("{months} months"),
        format!(
            "{} months within {} years",
            config.fstp_min_months, config.fstp_lookback_years
        ),
    );

    let qualifying_offer = profile
        .job_offer
        .as_ref()
        .map(|offer| offer.authorized() && offer.noc.is_some())
        .unwrap_or(false);
    checklist.require(
        qualifying_offer || profile.certificate_of_qualification,
        "job offer or certificate of qualification",
        "neither",
        "a qualifying job offer or a provincial certificate of qualification",
    );

    let required = |ability: Ability| match ability {
        Ability::Speaking | Ability::Listening => config.fstp_speaking_listening_clb,
        Ability::Reading | Ability::Writing => config.fstp_reading_writing_clb,
    };
    let result = best_language(profile, |clb| {
        clb.iter().all(|(ability, level)| level.at_least(required(ability)))
    });
    for ability in Ability::ALL {
        let minimum = required(ability);
        let level = result.clb.get(ability);
        checklist.require(
            level.at_least(minimum),
            format!("{} ({})", ability.label(), result.language.label()),
            level,
            ClbLevel(minimum),
        );
    }

    checklist.finish()
}

/// Either official language may satisfy a language gate. Returns the first result that
/// passes, otherwise the one with the highest floor (the first language on ties).
fn best_language<'a>(
    profile: &'a Profile,
    passes: impl Fn(&ClbScores) -> bool,
) -> &'a LanguageAbility {
    profile
        .languages()
        .find(|result| passes(&result.clb))
        .unwrap_or_else(|| {
            profile.languages().fold(&profile.first_language, |best, result| {
                if result.clb.min() > best.clb.min() {
                    result
                } else {
                    best
                }
            })
        })
}

/// Occupation with the most days; ties go to the lowest code.
fn longest_occupation(
    by_occupation: &std::collections::BTreeMap<NocCode, ExperienceSpan>,
) -> Option<(&NocCode, ExperienceSpan)> {
    by_occupation
        .iter()
        .fold(None, |best: Option<(&NocCode, ExperienceSpan)>, (noc, span)| match best {
            Some((_, best_span)) if best_span >= *span => best,
            _ => Some((noc, *span)),
        })
}

fn describe_months(months: u32, noc: Option<&NocCode>) -> String {
    match noc {
        Some(noc) => format!("{months} months in {noc}"),
        None => format!("{months} months"),
    }
}
