use serde::{Deserialize, Serialize};

use crate::express_entry::domain::Province;
use crate::express_entry::experience::{measure, ExperienceFilter};
use crate::express_entry::profile::{ClbLevel, Profile};

use super::catalogue::{PnpProgram, ProgramRequirements};

/// Outcome of checking one program, including the requirements that were not met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAssessment {
    pub program_id: String,
    pub name: String,
    pub province: Province,
    pub eligible: bool,
    pub unmet_requirements: Vec<String>,
}

/// Filters a caller-supplied catalogue against a normalized profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnpMatcher;

impl PnpMatcher {
    /// Matching programs in catalogue order.
    pub fn matching<'a>(&self, profile: &Profile, catalogue: &'a [PnpProgram]) -> Vec<&'a PnpProgram> {
        catalogue
            .iter()
            .filter(|program| unmet_requirements(profile, program).is_empty())
            .collect()
    }

    /// Every program with its unmet requirements, in catalogue order.
    pub fn assess(&self, profile: &Profile, catalogue: &[PnpProgram]) -> Vec<ProgramAssessment> {
        catalogue
            .iter()
            .map(|program| {
                let unmet = unmet_requirements(profile, program);
                ProgramAssessment {
                    program_id: program.id.clone(),
                    name: program.name.clone(),
                    province: program.province,
                    eligible: unmet.is_empty(),
                    unmet_requirements: unmet,
                }
            })
            .collect()
    }
}

fn unmet_requirements(profile: &Profile, program: &PnpProgram) -> Vec<String> {
    let mut unmet = Vec::new();
    if !program.is_active {
        unmet.push("program is not currently accepting applications".to_string());
    }

    let requirements = &program.requirements;

    if let Some(range) = requirements.age_range {
        if !range.contains(profile.age) {
            unmet.push(format!(
                "age {} outside {}-{}",
                profile.age, range.min, range.max
            ));
        }
    }

    if let Some(minimum) = requirements.minimum_education {
        let meets = profile
            .credentials
            .iter()
            .any(|credential| credential.counts() && credential.level >= minimum);
        if !meets {
            unmet.push(format!("requires at least a {}", minimum.label()));
        }
    }

    if !language_requirement_met(profile, requirements) {
        unmet.push(describe_language_requirement(requirements));
    }

    if let Some(months) = requirements.minimum_experience_months {
        let observed = measure(&profile.work, profile.as_of, ExperienceFilter::lifetime()).whole_months();
        if observed < months {
            unmet.push(format!(
                "{observed} months of full-time work experience, requires {months}"
            ));
        }
    }

    if !requirements.occupation_codes.is_empty() {
        let meets = profile.work.iter().any(|period| {
            period.noc.as_ref().is_some_and(|noc| {
                requirements
                    .occupation_codes
                    .iter()
                    .any(|code| noc.matches(code))
            })
        });
        if !meets {
            unmet.push(format!(
                "experience in an eligible occupation ({})",
                requirements.occupation_codes.join(", ")
            ));
        }
    }

    let offer_in_province = profile
        .job_offer
        .as_ref()
        .is_some_and(|offer| offer.province == Some(program.province));

    if requirements.job_offer_required && !offer_in_province {
        unmet.push(format!("job offer in {}", program.province.code()));
    }

    if requirements.connection_to_province_required {
        let nominated_here = profile
            .nomination
            .as_ref()
            .is_some_and(|nomination| nomination.province == Some(program.province));
        let connected = profile
            .adaptability
            .provincial_connections
            .contains(&program.province)
            || nominated_here
            || offer_in_province;
        if !connected {
            unmet.push(format!("connection to {}", program.province.code()));
        }
    }

    unmet
}

fn language_requirement_met(profile: &Profile, requirements: &ProgramRequirements) -> bool {
    if requirements.minimum_clb.is_none()
        && requirements.required_test.is_none()
        && requirements.required_language.is_none()
    {
        return true;
    }

    profile.languages().any(|ability| {
        requirements
            .required_test
            .map_or(true, |test| ability.test == test)
            && requirements
                .required_language
                .map_or(true, |language| ability.language == language)
            && requirements
                .minimum_clb
                .map_or(true, |minimum| ability.clb.min().at_least(minimum))
    })
}

fn describe_language_requirement(requirements: &ProgramRequirements) -> String {
    let mut parts = Vec::new();
    if let Some(minimum) = requirements.minimum_clb {
        parts.push(ClbLevel(minimum).to_string());
    }
    if let Some(language) = requirements.required_language {
        parts.push(format!("in {}", language.label()));
    }
    if let Some(test) = requirements.required_test {
        parts.push(format!("via {}", test.code()));
    }
    format!("language result of {}", parts.join(" "))
}
