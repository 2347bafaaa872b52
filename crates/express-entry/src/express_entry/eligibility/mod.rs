mod config;
mod rules;

pub use config::EligibilityConfig;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::profile::Profile;

/// Federal economic programs managed through Express Entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    FederalSkilledWorker,
    CanadianExperienceClass,
    FederalSkilledTrades,
}

impl Program {
    pub const fn code(self) -> &'static str {
        match self {
            Program::FederalSkilledWorker => "FSWP",
            Program::CanadianExperienceClass => "CEC",
            Program::FederalSkilledTrades => "FSTP",
        }
    }
}

/// A criterion the profile does not meet, with what was observed and what is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetCriterion {
    pub criterion: String,
    pub observed: String,
    pub required: String,
}

impl fmt::Display for UnmetCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: observed {}, required {}",
            self.criterion, self.observed, self.required
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub program: Program,
    pub is_eligible: bool,
    pub reasons: Vec<UnmetCriterion>,
}

impl EligibilityResult {
    pub fn reason_messages(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}

/// Independent results for each federal program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub fswp: EligibilityResult,
    pub cec: EligibilityResult,
    pub fstp: EligibilityResult,
}

impl EligibilityReport {
    pub fn results(&self) -> [&EligibilityResult; 3] {
        [&self.fswp, &self.cec, &self.fstp]
    }

    pub fn eligible_programs(&self) -> Vec<Program> {
        self.results()
            .into_iter()
            .filter(|result| result.is_eligible)
            .map(|result| result.program)
            .collect()
    }
}

/// Runs each program's rule set against the same normalized profile.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    config: EligibilityConfig,
}

impl EligibilityEvaluator {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    pub fn evaluate(&self, profile: &Profile) -> EligibilityReport {
        EligibilityReport {
            fswp: self.evaluate_program(profile, Program::FederalSkilledWorker),
            cec: self.evaluate_program(profile, Program::CanadianExperienceClass),
            fstp: self.evaluate_program(profile, Program::FederalSkilledTrades),
        }
    }

    pub fn evaluate_program(&self, profile: &Profile, program: Program) -> EligibilityResult {
        match program {
            Program::FederalSkilledWorker => rules::federal_skilled_worker(profile, &self.config),
            Program::CanadianExperienceClass => {
                rules::canadian_experience_class(profile, &self.config)
            }
            Program::FederalSkilledTrades => rules::federal_skilled_trades(profile, &self.config),
        }
    }
}
