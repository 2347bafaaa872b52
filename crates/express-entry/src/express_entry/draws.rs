use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::eligibility::{EligibilityReport, Program};
use super::scoring::ScoreBreakdown;

/// Which candidates a round of invitations was open to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    General,
    ProvincialNominee,
    CanadianExperienceClass,
    FederalSkilledTrades,
    FrenchLanguage,
}

impl RoundType {
    pub const fn label(self) -> &'static str {
        match self {
            RoundType::General => "Express Entry",
            RoundType::ProvincialNominee => "PNP only",
            RoundType::CanadianExperienceClass => "Canadian Experience Class",
            RoundType::FederalSkilledTrades => "Federal Skilled Trades",
            RoundType::FrenchLanguage => "French-language proficiency",
        }
    }

    /// Whether a candidate with this score and eligibility could have been invited.
    fn admits(self, score: &ScoreBreakdown, eligibility: &EligibilityReport) -> bool {
        let eligible = eligibility.eligible_programs();
        match self {
            RoundType::General => !eligible.is_empty(),
            RoundType::ProvincialNominee => score.additional.provincial_nomination > 0,
            RoundType::CanadianExperienceClass => {
                eligible.contains(&Program::CanadianExperienceClass)
            }
            RoundType::FederalSkilledTrades => eligible.contains(&Program::FederalSkilledTrades),
            RoundType::FrenchLanguage => {
                !eligible.is_empty() && score.additional.french_language > 0
            }
        }
    }
}

/// One published round of invitations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRound {
    pub draw_number: u32,
    pub draw_date: NaiveDate,
    pub round_type: RoundType,
    pub invitations_issued: u32,
    pub minimum_score: u16,
    /// Profile-submission timestamp used to break ties at the minimum score.
    #[serde(default)]
    pub tie_break_rule: Option<String>,
}

/// How a total compares with the cutoff of the latest round the candidate could enter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffComparison {
    pub draw_number: u32,
    pub draw_date: NaiveDate,
    pub round_type: RoundType,
    pub minimum_score: u16,
    /// Total minus the round's minimum; negative when the total fell short.
    pub cutoff_gap: i32,
}

impl CutoffComparison {
    pub fn would_have_been_invited(&self) -> bool {
        self.cutoff_gap >= 0
    }
}

/// Read-only history of invitation rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawHistory {
    rounds: Vec<DrawRound>,
}

impl DrawHistory {
    pub fn new(rounds: Vec<DrawRound>) -> Self {
        Self { rounds }
    }

    /// Reference rounds from autumn 2023.
    pub fn standard() -> Self {
        Self::new(vec![
            standard_round(245, (2023, 11, 8), RoundType::General, 4750, 481, "2023-10-15 11:22:33 UTC"),
            standard_round(244, (2023, 10, 25), RoundType::General, 4300, 491, "2023-10-01 09:12:45 UTC"),
            standard_round(
                243,
                (2023, 10, 11),
                RoundType::ProvincialNominee,
                1548,
                776,
                "2023-09-18 14:32:12 UTC",
            ),
        ])
    }

    pub fn rounds(&self) -> &[DrawRound] {
        &self.rounds
    }

    /// Most recent round held on or before `as_of`, of any type.
    pub fn latest(&self, as_of: NaiveDate) -> Option<&DrawRound> {
        self.held_by(as_of).max_by_key(|round| (round.draw_date, round.draw_number))
    }

    /// Compares the total against the latest round, held by `as_of`, that the candidate could enter.
    pub fn compare(
        &self,
        score: &ScoreBreakdown,
        eligibility: &EligibilityReport,
        as_of: NaiveDate,
    ) -> Option<CutoffComparison> {
        self.held_by(as_of)
            .filter(|round| round.round_type.admits(score, eligibility))
            .max_by_key(|round| (round.draw_date, round.draw_number))
            .map(|round| CutoffComparison {
                draw_number: round.draw_number,
                draw_date: round.draw_date,
                round_type: round.round_type,
                minimum_score: round.minimum_score,
                cutoff_gap: i32::from(score.total) - i32::from(round.minimum_score),
            })
    }

    fn held_by(&self, as_of: NaiveDate) -> impl Iterator<Item = &DrawRound> {
        self.rounds.iter().filter(move |round| round.draw_date <= as_of)
    }
}

fn standard_round(
    draw_number: u32,
    (year, month, day): (i32, u32, u32),
    round_type: RoundType,
    invitations_issued: u32,
    minimum_score: u16,
    tie_break_rule: &str,
) -> DrawRound {
    DrawRound {
        draw_number,
        draw_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        round_type,
        invitations_issued,
        minimum_score,
        tie_break_rule: Some(tie_break_rule.to_string()),
    }
}
