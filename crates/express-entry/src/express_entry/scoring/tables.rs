//! Comprehensive Ranking System point grids.
//!
//! Threshold tables are sorted from the highest key down; [`step_lookup`] returns the value of
//! the first row whose key the input reaches. Exact-key tables use [`exact_lookup`].

use super::super::domain::EducationLevel;

/// Points for one cell, split by whether a partner is assessed alongside the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Points {
    pub single: u16,
    pub with_spouse: u16,
}

impl Points {
    const fn new(single: u16, with_spouse: u16) -> Self {
        Self {
            single,
            with_spouse,
        }
    }

    pub const fn pick(self, with_spouse: bool) -> u16 {
        if with_spouse {
            self.with_spouse
        } else {
            self.single
        }
    }
}

pub(crate) const HUMAN_CAPITAL_CAP: Points = Points::new(500, 460);
pub(crate) const SPOUSE_CAP: u16 = 40;
pub(crate) const TRANSFERABILITY_CAP: u16 = 100;
pub(crate) const COMBINATION_CAP: u16 = 50;
pub(crate) const ADDITIONAL_CAP: u16 = 600;
pub(crate) const GRAND_TOTAL_CAP: u16 = 1200;

pub(crate) const AGE: [(u8, Points); 27] = [
    (18, Points::new(99, 90)),
    (19, Points::new(105, 95)),
    (20, Points::new(110, 100)),
    (21, Points::new(110, 100)),
    (22, Points::new(110, 100)),
    (23, Points::new(110, 100)),
    (24, Points::new(110, 100)),
    (25, Points::new(110, 100)),
    (26, Points::new(110, 100)),
    (27, Points::new(110, 100)),
    (28, Points::new(110, 100)),
    (29, Points::new(110, 100)),
    (30, Points::new(105, 95)),
    (31, Points::new(99, 90)),
    (32, Points::new(94, 85)),
    (33, Points::new(88, 80)),
    (34, Points::new(83, 75)),
    (35, Points::new(77, 70)),
    (36, Points::new(72, 65)),
    (37, Points::new(66, 60)),
    (38, Points::new(61, 55)),
    (39, Points::new(55, 50)),
    (40, Points::new(50, 45)),
    (41, Points::new(39, 35)),
    (42, Points::new(28, 25)),
    (43, Points::new(17, 15)),
    (44, Points::new(6, 5)),
];

pub(crate) const EDUCATION: [(EducationLevel, Points); 7] = [
    (EducationLevel::HighSchool, Points::new(30, 28)),
    (EducationLevel::OneYearDiploma, Points::new(90, 84)),
    (EducationLevel::TwoYearDiploma, Points::new(98, 91)),
    (EducationLevel::Bachelors, Points::new(120, 112)),
    (EducationLevel::TwoOrMoreDegrees, Points::new(128, 119)),
    (EducationLevel::Masters, Points::new(135, 126)),
    (EducationLevel::Phd, Points::new(150, 140)),
];

/// Per ability, keyed by minimum CLB.
pub(crate) const FIRST_LANGUAGE: [(u8, Points); 6] = [
    (10, Points::new(34, 32)),
    (9, Points::new(31, 29)),
    (8, Points::new(23, 22)),
    (7, Points::new(17, 16)),
    (6, Points::new(9, 8)),
    (4, Points::new(6, 6)),
];

pub(crate) const SECOND_LANGUAGE: [(u8, u16); 3] = [(9, 6), (7, 3), (5, 1)];
pub(crate) const SECOND_LANGUAGE_CAP: Points = Points::new(24, 22);

/// Keyed by whole years of Canadian experience.
pub(crate) const CANADIAN_EXPERIENCE: [(u32, Points); 5] = [
    (5, Points::new(80, 70)),
    (4, Points::new(72, 63)),
    (3, Points::new(64, 56)),
    (2, Points::new(53, 46)),
    (1, Points::new(40, 35)),
];

pub(crate) const SPOUSE_EDUCATION: [(EducationLevel, u16); 7] = [
    (EducationLevel::HighSchool, 2),
    (EducationLevel::OneYearDiploma, 6),
    (EducationLevel::TwoYearDiploma, 7),
    (EducationLevel::Bachelors, 8),
    (EducationLevel::TwoOrMoreDegrees, 9),
    (EducationLevel::Masters, 10),
    (EducationLevel::Phd, 10),
];

pub(crate) const SPOUSE_LANGUAGE: [(u8, u16); 3] = [(9, 5), (7, 3), (5, 1)];

pub(crate) const SPOUSE_CANADIAN_EXPERIENCE: [(u32, u16); 5] =
    [(5, 10), (4, 9), (3, 8), (2, 7), (1, 5)];

/// Indexed by `[tier of factor A][tier of factor B]`.
pub(crate) type Grid<const ROWS: usize> = [[u16; 3]; ROWS];

pub(crate) const EDUCATION_LANGUAGE: Grid<3> = [[0, 0, 0], [0, 13, 25], [0, 25, 50]];
pub(crate) const EDUCATION_FOREIGN_EXPERIENCE: Grid<3> = [[0, 0, 0], [0, 13, 25], [0, 25, 50]];
pub(crate) const FOREIGN_CANADIAN_EXPERIENCE: Grid<3> = [[0, 0, 0], [0, 13, 25], [0, 25, 50]];
pub(crate) const CERTIFICATE_LANGUAGE: Grid<2> = [[0, 0, 0], [0, 25, 50]];

/// Value of the first row whose key `value` reaches; rows must descend by key.
pub(crate) fn step_lookup<K, V>(table: &[(K, V)], value: K) -> Option<V>
where
    K: PartialOrd + Copy,
    V: Copy,
{
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
}

pub(crate) fn exact_lookup<K, V>(table: &[(K, V)], key: K) -> Option<V>
where
    K: PartialEq + Copy,
    V: Copy,
{
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, points)| *points)
}

/// Tier 0/1/2 cell of a grid; out-of-range tiers read as zero.
pub(crate) fn grid_cell<const ROWS: usize>(grid: &Grid<ROWS>, row: u8, column: u8) -> u16 {
    grid.get(row as usize)
        .and_then(|cells| cells.get(column as usize))
        .copied()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descending<K: PartialOrd, V>(table: &[(K, V)]) -> bool {
        table.windows(2).all(|pair| pair[0].0 > pair[1].0)
    }

    #[test]
    fn threshold_tables_descend() {
        assert!(descending(&FIRST_LANGUAGE));
        assert!(descending(&SECOND_LANGUAGE));
        assert!(descending(&CANADIAN_EXPERIENCE));
        assert!(descending(&SPOUSE_LANGUAGE));
        assert!(descending(&SPOUSE_CANADIAN_EXPERIENCE));
    }

    #[test]
    fn age_table_is_contiguous_and_never_rises_after_the_plateau() {
        for pair in AGE.windows(2) {
            assert_eq!(pair[0].0 + 1, pair[1].0);
        }
        let after_plateau: Vec<u16> = AGE
            .iter()
            .filter(|(age, _)| *age >= 29)
            .map(|(_, points)| points.single)
            .collect();
        assert!(after_plateau.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn spouse_column_never_exceeds_single_column() {
        let cells = AGE
            .iter()
            .map(|(_, points)| *points)
            .chain(EDUCATION.iter().map(|(_, points)| *points))
            .chain(FIRST_LANGUAGE.iter().map(|(_, points)| *points))
            .chain(CANADIAN_EXPERIENCE.iter().map(|(_, points)| *points));
        for points in cells {
            assert!(points.with_spouse <= points.single, "{points:?}");
        }
    }

    #[test]
    fn lookups_fall_through_to_none() {
        assert_eq!(step_lookup(&FIRST_LANGUAGE, 3), None);
        assert_eq!(step_lookup(&FIRST_LANGUAGE, 5), Some(Points::new(6, 6)));
        assert_eq!(exact_lookup(&AGE, 45), None);
        assert_eq!(grid_cell(&CERTIFICATE_LANGUAGE, 2, 2), 0);
        assert_eq!(grid_cell(&EDUCATION_LANGUAGE, 2, 2), 50);
    }
}
