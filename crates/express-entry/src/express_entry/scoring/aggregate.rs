use serde::{Deserialize, Serialize};

use super::additional::{AdditionalScore, EligibilityWarning};
use super::human_capital::CoreScore;
use super::spouse::SpouseScore;
use super::tables::GRAND_TOTAL_CAP;
use super::transferability::TransferabilityScore;
use super::ScoreComponent;

/// Complete ranking result. Category subtotals are already capped; `total` is their sum
/// clamped to the global maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub core: CoreScore,
    pub spouse: SpouseScore,
    pub transferability: TransferabilityScore,
    pub additional: AdditionalScore,
    pub total: u16,
    pub warnings: Vec<EligibilityWarning>,
    pub components: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn category_sum(&self) -> u16 {
        self.core.subtotal
            + self.spouse.subtotal
            + self.transferability.subtotal
            + self.additional.subtotal
    }
}

pub(crate) fn aggregate(
    core: CoreScore,
    spouse: SpouseScore,
    transferability: TransferabilityScore,
    additional: AdditionalScore,
    warnings: Vec<EligibilityWarning>,
    components: Vec<ScoreComponent>,
) -> ScoreBreakdown {
    let sum = core.subtotal + spouse.subtotal + transferability.subtotal + additional.subtotal;

    ScoreBreakdown {
        core,
        spouse,
        transferability,
        additional,
        total: sum.min(GRAND_TOTAL_CAP),
        warnings,
        components,
    }
}
