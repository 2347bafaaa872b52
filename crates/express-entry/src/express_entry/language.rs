//! Band score validation and conversion to Canadian Language Benchmarks.
//!
//! Each test/ability pair owns a descending threshold column: the first threshold the score
//! reaches gives the CLB level. Because the columns are sorted, a higher band score can never
//! produce a lower level.

use super::domain::{LanguageTestResult, LanguageTestType};
use super::profile::{Ability, ClbLevel, ClbScores};

/// Lowest band score reaching CLB 10, 9, 8, 7, 6, 5, 4 (in that order).
type Column = [f32; 7];

const LEVELS: [u8; 7] = [10, 9, 8, 7, 6, 5, 4];

const IELTS_SPEAKING: Column = [7.5, 7.0, 6.5, 6.0, 5.5, 5.0, 4.0];
const IELTS_LISTENING: Column = [8.5, 8.0, 7.5, 6.0, 5.5, 5.0, 4.5];
const IELTS_READING: Column = [8.0, 7.0, 6.5, 6.0, 5.0, 4.0, 3.5];
const IELTS_WRITING: Column = [7.5, 7.0, 6.5, 6.0, 5.5, 5.0, 4.0];

const CELPIP_ANY: Column = [10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0];

const TEF_SPEAKING: Column = [393.0, 371.0, 349.0, 310.0, 271.0, 226.0, 181.0];
const TEF_LISTENING: Column = [316.0, 298.0, 280.0, 249.0, 217.0, 181.0, 145.0];
const TEF_READING: Column = [263.0, 248.0, 233.0, 207.0, 181.0, 151.0, 121.0];
const TEF_WRITING: Column = [393.0, 371.0, 349.0, 310.0, 271.0, 226.0, 181.0];

const TCF_SPEAKING: Column = [16.0, 14.0, 12.0, 10.0, 7.0, 6.0, 4.0];
const TCF_LISTENING: Column = [549.0, 523.0, 503.0, 458.0, 398.0, 369.0, 331.0];
const TCF_READING: Column = [549.0, 524.0, 499.0, 453.0, 406.0, 375.0, 342.0];
const TCF_WRITING: Column = [16.0, 14.0, 12.0, 10.0, 7.0, 6.0, 4.0];

/// Reporting granularity of a test's band scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandStep {
    HalfBand,
    Whole,
}

/// Inclusive range and granularity a band score must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub max: f32,
    pub step: BandStep,
}

impl BandRange {
    pub fn accepts(&self, score: f32) -> bool {
        if !score.is_finite() || score < 0.0 || score > self.max {
            return false;
        }
        match self.step {
            BandStep::HalfBand => (score * 2.0).fract() == 0.0,
            BandStep::Whole => score.fract() == 0.0,
        }
    }
}

pub fn band_range(test: LanguageTestType, ability: Ability) -> BandRange {
    match (test, ability) {
        (LanguageTestType::Ielts, _) => BandRange {
            max: 9.0,
            step: BandStep::HalfBand,
        },
        (LanguageTestType::Celpip, _) => BandRange {
            max: 12.0,
            step: BandStep::Whole,
        },
        (LanguageTestType::Tef, Ability::Speaking | Ability::Writing) => BandRange {
            max: 450.0,
            step: BandStep::Whole,
        },
        (LanguageTestType::Tef, Ability::Listening) => BandRange {
            max: 360.0,
            step: BandStep::Whole,
        },
        (LanguageTestType::Tef, Ability::Reading) => BandRange {
            max: 300.0,
            step: BandStep::Whole,
        },
        (LanguageTestType::Tcf, Ability::Speaking | Ability::Writing) => BandRange {
            max: 20.0,
            step: BandStep::Whole,
        },
        (LanguageTestType::Tcf, Ability::Listening | Ability::Reading) => BandRange {
            max: 699.0,
            step: BandStep::Whole,
        },
    }
}

fn column(test: LanguageTestType, ability: Ability) -> &'static Column {
    match (test, ability) {
        (LanguageTestType::Ielts, Ability::Speaking) => &IELTS_SPEAKING,
        (LanguageTestType::Ielts, Ability::Listening) => &IELTS_LISTENING,
        (LanguageTestType::Ielts, Ability::Reading) => &IELTS_READING,
        (LanguageTestType::Ielts, Ability::Writing) => &IELTS_WRITING,
        (LanguageTestType::Celpip, _) => &CELPIP_ANY,
        (LanguageTestType::Tef, Ability::Speaking) => &TEF_SPEAKING,
        (LanguageTestType::Tef, Ability::Listening) => &TEF_LISTENING,
        (LanguageTestType::Tef, Ability::Reading) => &TEF_READING,
        (LanguageTestType::Tef, Ability::Writing) => &TEF_WRITING,
        (LanguageTestType::Tcf, Ability::Speaking) => &TCF_SPEAKING,
        (LanguageTestType::Tcf, Ability::Listening) => &TCF_LISTENING,
        (LanguageTestType::Tcf, Ability::Reading) => &TCF_READING,
        (LanguageTestType::Tcf, Ability::Writing) => &TCF_WRITING,
    }
}

/// Convert one band score. Scores under the CLB 4 threshold map to [`ClbLevel::NONE`].
pub fn clb_for(test: LanguageTestType, ability: Ability, score: f32) -> ClbLevel {
    column(test, ability)
        .iter()
        .zip(LEVELS)
        .find(|(threshold, _)| score >= **threshold)
        .map(|(_, level)| ClbLevel(level))
        .unwrap_or(ClbLevel::NONE)
}

pub fn band_score(result: &LanguageTestResult, ability: Ability) -> f32 {
    match ability {
        Ability::Speaking => result.speaking,
        Ability::Listening => result.listening,
        Ability::Reading => result.reading,
        Ability::Writing => result.writing,
    }
}

pub fn convert(result: &LanguageTestResult) -> ClbScores {
    let level = |ability| clb_for(result.test, ability, band_score(result, ability));
    ClbScores {
        speaking: level(Ability::Speaking),
        listening: level(Ability::Listening),
        reading: level(Ability::Reading),
        writing: level(Ability::Writing),
    }
}
