use serde::{Deserialize, Serialize};

/// Thresholds for the three federal programs. Language minimums follow program instructions
/// and change over time, so they are data rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub fswp_min_clb: u8,
    pub fswp_min_months: u32,
    pub fswp_lookback_years: u32,
    pub cec_min_months: u32,
    pub cec_lookback_years: u32,
    /// Applies when the main Canadian occupation is TEER 0 or 1.
    pub cec_managerial_clb: u8,
    /// Applies to TEER 2 and 3 occupations.
    pub cec_technical_clb: u8,
    pub fstp_min_months: u32,
    pub fstp_lookback_years: u32,
    pub fstp_speaking_listening_clb: u8,
    pub fstp_reading_writing_clb: u8,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            fswp_min_clb: 7,
            fswp_min_months: 12,
            fswp_lookback_years: 10,
            cec_min_months: 12,
            cec_lookback_years: 3,
            cec_managerial_clb: 7,
            cec_technical_clb: 5,
            fstp_min_months: 24,
            fstp_lookback_years: 5,
            fstp_speaking_listening_clb: 5,
            fstp_reading_writing_clb: 4,
        }
    }
}
