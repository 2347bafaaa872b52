use std::fmt;

use serde::{Deserialize, Serialize};

/// NOC 2021 unit group code (five digits: broad category, TEER, then sub-groups).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NocCode(String);

/// Training, Education, Experience and Responsibilities category of an occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    /// Major group 00, legislative and senior management.
    SeniorManagement,
    /// TEER 0 outside major group 00.
    Management,
    /// TEER 1, usually a university degree.
    Professional,
    /// TEER 2, college diploma or apprenticeship of two or more years.
    Technical,
    /// TEER 3, shorter college programs or apprenticeships.
    Intermediate,
    /// TEER 4 and 5.
    Labour,
}

impl SkillTier {
    pub const fn is_skilled(self) -> bool {
        !matches!(self, SkillTier::Labour)
    }

    /// TEER 0 and 1 roles carry the higher language expectation.
    pub const fn is_managerial_or_professional(self) -> bool {
        matches!(
            self,
            SkillTier::SeniorManagement | SkillTier::Management | SkillTier::Professional
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            SkillTier::SeniorManagement => "senior management (major group 00)",
            SkillTier::Management => "TEER 0",
            SkillTier::Professional => "TEER 1",
            SkillTier::Technical => "TEER 2",
            SkillTier::Intermediate => "TEER 3",
            SkillTier::Labour => "TEER 4/5",
        }
    }
}

/// Major groups, minor groups, and unit groups recognised as skilled trades.
const TRADE_PREFIXES: [&str; 8] = ["72", "73", "82", "83", "92", "93", "632", "62200"];

impl NocCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == 5 && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn teer(&self) -> u8 {
        self.0.as_bytes()[1] - b'0'
    }

    pub fn tier(&self) -> SkillTier {
        if self.0.starts_with("00") {
            return SkillTier::SeniorManagement;
        }
        match self.teer() {
            0 => SkillTier::Management,
            1 => SkillTier::Professional,
            2 => SkillTier::Technical,
            3 => SkillTier::Intermediate,
            _ => SkillTier::Labour,
        }
    }

    pub fn is_trade(&self) -> bool {
        TRADE_PREFIXES
            .iter()
            .any(|prefix| self.0.starts_with(prefix))
    }

    /// Catalogue entries may name a whole group by prefix.
    pub fn matches(&self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        !pattern.is_empty() && self.0.starts_with(pattern)
    }
}

impl fmt::Display for NocCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NOC {}", self.0)
    }
}

impl TryFrom<String> for NocCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NocCode::parse(&value).ok_or_else(|| format!("'{value}' is not a five-digit NOC code"))
    }
}

impl From<NocCode> for String {
    fn from(value: NocCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_five_digit_codes_only() {
        assert!(NocCode::parse("21231").is_some());
        assert!(NocCode::parse(" 00012 ").is_some());
        assert!(NocCode::parse("2123").is_none());
        assert!(NocCode::parse("2123a").is_none());
        assert!(NocCode::parse("").is_none());
    }

    #[test]
    fn derives_tier_from_second_digit() {
        let tier = |code: &str| NocCode::parse(code).expect("valid code").tier();
        assert_eq!(tier("00012"), SkillTier::SeniorManagement);
        assert_eq!(tier("10010"), SkillTier::Management);
        assert_eq!(tier("21231"), SkillTier::Professional);
        assert_eq!(tier("72200"), SkillTier::Technical);
        assert_eq!(tier("63202"), SkillTier::Intermediate);
        assert_eq!(tier("65201"), SkillTier::Labour);
    }

    #[test]
    fn recognises_trade_groups() {
        let code = |code: &str| NocCode::parse(code).expect("valid code");
        assert!(code("72200").is_trade());
        assert!(code("63202").is_trade());
        assert!(code("62200").is_trade());
        assert!(!code("62100").is_trade());
        assert!(!code("21231").is_trade());
    }
}
