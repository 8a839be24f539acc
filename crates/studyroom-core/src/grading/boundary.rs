//! Grade boundary tables.
//!
//! A table is an ordered, gapless partition of the integer percentages
//! `0..=100` into bands, each carrying a letter and a GPA value. Bands are
//! ordered by an explicit `rank` (0 is the best grade). Bands supplied
//! without ranks are taken in the order given.
//!
//! Every edit returns a new table and reflows the upper bounds so that:
//!
//! ```text
//! band[0].max == 100
//! band[i].max == band[i - 1].min - 1
//! band[last].min == 0
//! ```
//!
//! Lookups are therefore a plain scan with no re-validation.

use serde::{Deserialize, Serialize};

use crate::error::BoundaryError;

/// One band of a grade table. `min` and `max` are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBoundary {
    pub letter: String,
    pub min: u8,
    pub max: u8,
    pub gpa: f64,
    /// Position in the grade ranking, 0 being the highest grade. `None`
    /// means "use the position in the list".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl GradeBoundary {
    pub fn new(letter: impl Into<String>, min: u8, max: u8, gpa: f64) -> Self {
        Self {
            letter: letter.into(),
            min,
            max,
            gpa,
            rank: None,
        }
    }

    fn contains(&self, percentage: f64) -> bool {
        percentage >= f64::from(self.min) && percentage < f64::from(self.max) + 1.0
    }
}

/// Built-in table: letter, min, max, gpa.
const DEFAULT_BANDS: [(&str, u8, u8, f64); 12] = [
    ("A+", 95, 100, 4.0),
    ("A", 90, 94, 4.0),
    ("A-", 85, 89, 3.7),
    ("B+", 80, 84, 3.3),
    ("B", 76, 79, 3.0),
    ("B-", 72, 75, 2.7),
    ("C+", 68, 71, 2.3),
    ("C", 64, 67, 2.0),
    ("C-", 60, 63, 1.7),
    ("D+", 55, 59, 1.3),
    ("D", 45, 54, 1.0),
    ("F", 0, 44, 0.0),
];

/// Ordered, gapless partition of `[0, 100]`.
///
/// Construction and every edit validate the partition, so a value of this
/// type always satisfies it. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradeBoundary>", into = "Vec<GradeBoundary>")]
pub struct GradeBoundaryTable {
    bands: Vec<GradeBoundary>,
}

impl GradeBoundaryTable {
    /// Validate a user-supplied table.
    ///
    /// When every band carries a `rank`, bands are ordered by it and ranks
    /// must be unique. When none does, the list order is the ranking. Mixing
    /// both is rejected. Ranks are then renumbered `0..n` so they stay dense.
    pub fn new(mut bands: Vec<GradeBoundary>) -> Result<Self, BoundaryError> {
        if bands.is_empty() {
            return Err(BoundaryError::Empty);
        }
        let ranked = bands.iter().filter(|b| b.rank.is_some()).count();
        if ranked == bands.len() {
            bands.sort_by_key(|b| b.rank);
            if let Some(pair) = bands.windows(2).find(|w| w[0].rank == w[1].rank) {
                return Err(BoundaryError::InvalidBand {
                    letter: pair[1].letter.clone(),
                    message: format!("rank {} is used twice", pair[1].rank.unwrap_or_default()),
                });
            }
        } else if ranked > 0 {
            let unranked = bands
                .iter()
                .find(|b| b.rank.is_none())
                .map(|b| b.letter.clone())
                .unwrap_or_default();
            return Err(BoundaryError::InvalidBand {
                letter: unranked,
                message: "either every band has a rank or none does".to_string(),
            });
        }
        renumber(&mut bands);
        validate(&bands)?;
        Ok(Self { bands })
    }

    /// The built-in 12-band table (A+ 95-100 down to F 0-44).
    pub fn reset_to_default() -> Self {
        let bands = DEFAULT_BANDS
            .iter()
            .enumerate()
            .map(|(rank, &(letter, min, max, gpa))| GradeBoundary {
                letter: letter.to_string(),
                min,
                max,
                gpa,
                rank: Some(rank as u32),
            })
            .collect();
        Self { bands }
    }

    pub fn bands(&self) -> &[GradeBoundary] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Highest GPA value of any band.
    pub fn max_gpa(&self) -> f64 {
        self.bands.iter().map(|b| b.gpa).fold(0.0, f64::max)
    }

    /// Band containing `percentage`, clamped to `[0, 100]`.
    ///
    /// Fractional percentages resolve to the band whose `[min, max + 1)`
    /// interval contains them.
    pub fn band_for(&self, percentage: f64) -> Option<&GradeBoundary> {
        let p = if percentage.is_nan() {
            0.0
        } else {
            percentage.clamp(0.0, 100.0)
        };
        self.bands.iter().find(|b| b.contains(p))
    }

    /// Letter for `percentage`, falling back to the lowest-ranked letter.
    pub fn lookup_letter(&self, percentage: f64) -> &str {
        self.band_for(percentage)
            .or_else(|| self.bands.last())
            .map(|b| b.letter.as_str())
            .unwrap_or("F")
    }

    /// GPA for `percentage`, falling back to 0.0.
    pub fn lookup_gpa(&self, percentage: f64) -> f64 {
        self.band_for(percentage).map(|b| b.gpa).unwrap_or(0.0)
    }

    /// Move the lower threshold of band `index`, then reflow.
    ///
    /// `new_min` must stay strictly below the band above and strictly above
    /// the band below. The lowest band always starts at 0.
    pub fn set_boundary_min(&self, index: usize, new_min: u8) -> Result<Self, BoundaryError> {
        let len = self.bands.len();
        let band = self
            .bands
            .get(index)
            .ok_or(BoundaryError::OutOfBounds { index, len })?;

        if index + 1 == len {
            if new_min != 0 {
                return Err(BoundaryError::LowestBandMin {
                    letter: band.letter.clone(),
                    value: new_min,
                });
            }
        } else {
            let upper = if index == 0 { 101 } else { self.bands[index - 1].min };
            let lower = self.bands[index + 1].min;
            if new_min >= upper || new_min <= lower {
                return Err(BoundaryError::ThresholdOrder {
                    letter: band.letter.clone(),
                    value: new_min,
                    upper,
                    lower,
                });
            }
        }

        let mut bands = self.bands.clone();
        bands[index].min = new_min;
        reflow(&mut bands)?;
        Ok(Self { bands })
    }

    /// Insert a band right below `after_index`.
    ///
    /// The new band starts halfway between its neighbours' thresholds. When
    /// inserted below the lowest band, the old lowest band moves up to start
    /// halfway between 0 and the band above it (50 if it was alone) and the
    /// new band takes over from 0.
    pub fn insert_boundary(
        &self,
        after_index: usize,
        letter: impl Into<String>,
        gpa: f64,
    ) -> Result<Self, BoundaryError> {
        let len = self.bands.len();
        if after_index >= len {
            return Err(BoundaryError::OutOfBounds {
                index: after_index,
                len,
            });
        }

        let mut bands = self.bands.clone();
        let mut inserted = GradeBoundary::new(letter, 0, 0, gpa);

        if after_index + 1 < len {
            let upper = bands[after_index].min;
            let lower = bands[after_index + 1].min;
            let mid = midpoint(upper, lower);
            if mid <= lower {
                return Err(BoundaryError::NoRoom { upper, lower });
            }
            inserted.min = mid;
        } else {
            let upper = if after_index == 0 {
                100
            } else {
                bands[after_index - 1].min
            };
            let mid = midpoint(upper, 0);
            if mid == 0 {
                return Err(BoundaryError::NoRoom { upper, lower: 0 });
            }
            bands[after_index].min = mid;
        }

        bands.insert(after_index + 1, inserted);
        reflow(&mut bands)?;
        Ok(Self { bands })
    }

    /// Remove band `index`; neighbours grow to cover its range.
    pub fn delete_boundary(&self, index: usize) -> Result<Self, BoundaryError> {
        let len = self.bands.len();
        if index >= len {
            return Err(BoundaryError::OutOfBounds { index, len });
        }
        if len == 1 {
            return Err(BoundaryError::Empty);
        }
        let mut bands = self.bands.clone();
        bands.remove(index);
        reflow(&mut bands)?;
        Ok(Self { bands })
    }
}

impl Default for GradeBoundaryTable {
    fn default() -> Self {
        Self::reset_to_default()
    }
}

impl TryFrom<Vec<GradeBoundary>> for GradeBoundaryTable {
    type Error = BoundaryError;

    fn try_from(bands: Vec<GradeBoundary>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<GradeBoundaryTable> for Vec<GradeBoundary> {
    fn from(table: GradeBoundaryTable) -> Self {
        table.bands
    }
}

fn midpoint(upper: u8, lower: u8) -> u8 {
    ((u16::from(upper) + u16::from(lower)) / 2) as u8
}

fn renumber(bands: &mut [GradeBoundary]) {
    for (rank, band) in bands.iter_mut().enumerate() {
        band.rank = Some(rank as u32);
    }
}

/// Recompute every `max` (and the last `min`) from the thresholds.
fn reflow(bands: &mut [GradeBoundary]) -> Result<(), BoundaryError> {
    let Some(last) = bands.len().checked_sub(1) else {
        return Err(BoundaryError::Empty);
    };
    bands[0].max = 100;
    bands[last].min = 0;
    for i in 1..bands.len() {
        let max = match bands[i - 1].min.checked_sub(1) {
            Some(max) => max,
            None => return Err(partition(&bands[i - 1], "leaves no room for the bands below")),
        };
        bands[i].max = max;
    }
    renumber(bands);
    validate(bands)
}

fn validate(bands: &[GradeBoundary]) -> Result<(), BoundaryError> {
    let (first, last) = match (bands.first(), bands.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(BoundaryError::Empty),
    };

    for band in bands {
        if band.letter.trim().is_empty() {
            return Err(BoundaryError::InvalidBand {
                letter: band.letter.clone(),
                message: "letter must not be empty".to_string(),
            });
        }
        if !band.gpa.is_finite() || band.gpa < 0.0 {
            return Err(BoundaryError::InvalidBand {
                letter: band.letter.clone(),
                message: format!("gpa must be a non-negative number (got {})", band.gpa),
            });
        }
        if band.min > band.max || band.max > 100 {
            return Err(partition(band, "range is empty or outside 0-100"));
        }
    }

    if first.max != 100 {
        return Err(partition(first, "the highest band must end at 100"));
    }
    if last.min != 0 {
        return Err(partition(last, "the lowest band must start at 0"));
    }
    for pair in bands.windows(2) {
        let (above, below) = (&pair[0], &pair[1]);
        if u16::from(below.max) + 1 != u16::from(above.min) {
            return Err(partition(
                below,
                &format!("must end right below '{}' (min {})", above.letter, above.min),
            ));
        }
        if below.gpa > above.gpa {
            return Err(BoundaryError::InvalidBand {
                letter: below.letter.clone(),
                message: format!(
                    "gpa {} is above the {} of higher band '{}'",
                    below.gpa, above.gpa, above.letter
                ),
            });
        }
    }
    Ok(())
}

fn partition(band: &GradeBoundary, message: &str) -> BoundaryError {
    BoundaryError::Partition {
        letter: band.letter.clone(),
        min: band.min,
        max: band.max,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_gapless(table: &GradeBoundaryTable) {
        let bands = table.bands();
        assert_eq!(bands[0].max, 100);
        assert_eq!(bands[bands.len() - 1].min, 0);
        for i in 1..bands.len() {
            assert_eq!(bands[i].max + 1, bands[i - 1].min);
            assert_eq!(bands[i].rank, Some(i as u32));
        }
    }

    fn letters(table: &GradeBoundaryTable) -> Vec<&str> {
        table.bands().iter().map(|b| b.letter.as_str()).collect()
    }

    #[test]
    fn default_table_is_valid() {
        let table = GradeBoundaryTable::default();
        assert_eq!(table.len(), 12);
        assert_gapless(&table);
        assert!(GradeBoundaryTable::new(table.bands().to_vec()).is_ok());
    }

    #[test]
    fn default_lookups() {
        let table = GradeBoundaryTable::default();
        assert_eq!(table.lookup_letter(92.0), "A");
        assert_eq!(table.lookup_gpa(92.0), 4.0);
        assert_eq!(table.lookup_letter(44.0), "F");
        assert_eq!(table.lookup_letter(100.0), "A+");
        assert_eq!(table.lookup_letter(0.0), "F");
        assert_eq!(table.lookup_letter(79.0), "B");
        assert_eq!(table.lookup_gpa(72.0), 2.7);
    }

    #[test]
    fn lookups_clamp_out_of_range_input() {
        let table = GradeBoundaryTable::default();
        assert_eq!(table.lookup_letter(130.0), "A+");
        assert_eq!(table.lookup_letter(-5.0), "F");
        assert_eq!(table.lookup_gpa(f64::NAN), 0.0);
    }

    #[test]
    fn fractional_percentages_fall_in_lower_band() {
        let table = GradeBoundaryTable::default();
        assert_eq!(table.lookup_letter(94.5), "A");
        assert_eq!(table.lookup_letter(94.99), "A");
        assert_eq!(table.lookup_letter(95.0), "A+");
    }

    #[test]
    fn set_min_reflows_neighbours() {
        let table = GradeBoundaryTable::default();
        let edited = table.set_boundary_min(1, 88).unwrap();
        assert_gapless(&edited);
        assert_eq!(edited.bands()[1].min, 88);
        assert_eq!(edited.bands()[2].max, 87);
        assert_eq!(edited.lookup_letter(88.0), "A");
        // original untouched
        assert_eq!(table.bands()[1].min, 90);
    }

    #[test]
    fn set_min_on_top_band() {
        let table = GradeBoundaryTable::default();
        let edited = table.set_boundary_min(0, 97).unwrap();
        assert_eq!(edited.bands()[1].max, 96);
        assert!(table.set_boundary_min(0, 101).is_err());
        assert!(table.set_boundary_min(0, 90).is_err());
    }

    #[test]
    fn set_min_rejects_crossing_neighbours() {
        let table = GradeBoundaryTable::default();
        let err = table.set_boundary_min(1, 95).unwrap_err();
        assert!(matches!(err, BoundaryError::ThresholdOrder { upper: 95, lower: 85, .. }));
        assert!(table.set_boundary_min(1, 85).is_err());
        assert!(table.set_boundary_min(20, 50).is_err());
    }

    #[test]
    fn lowest_band_is_pinned_to_zero() {
        let table = GradeBoundaryTable::default();
        assert!(table.set_boundary_min(11, 0).is_ok());
        assert!(matches!(
            table.set_boundary_min(11, 10),
            Err(BoundaryError::LowestBandMin { value: 10, .. })
        ));
    }

    #[test]
    fn insert_between_bands_uses_midpoint() {
        let table = GradeBoundaryTable::default();
        // between D (45) and F (0)
        let edited = table.insert_boundary(10, "E", 0.5).unwrap();
        assert_gapless(&edited);
        assert_eq!(edited.len(), 13);
        assert_eq!(edited.bands()[11].letter, "E");
        assert_eq!(edited.bands()[11].min, 22);
        assert_eq!(edited.bands()[11].max, 44);
        assert_eq!(edited.bands()[12].max, 21);
    }

    #[test]
    fn insert_into_single_band_table_splits_at_fifty() {
        let table = GradeBoundaryTable::new(vec![GradeBoundary::new("P", 0, 100, 1.0)]).unwrap();
        let edited = table.insert_boundary(0, "F", 0.0).unwrap();
        assert_gapless(&edited);
        assert_eq!(letters(&edited), vec!["P", "F"]);
        assert_eq!(edited.bands()[0].min, 50);
        assert_eq!(edited.bands()[1].max, 49);
    }

    #[test]
    fn insert_below_lowest_band() {
        let table = GradeBoundaryTable::default();
        let edited = table.insert_boundary(11, "F-", 0.0).unwrap();
        assert_gapless(&edited);
        assert_eq!(edited.bands()[11].min, 22);
        assert_eq!(edited.bands()[12].letter, "F-");
    }

    #[test]
    fn insert_fails_without_room() {
        let table = GradeBoundaryTable::new(vec![
            GradeBoundary::new("A", 51, 100, 4.0),
            GradeBoundary::new("B", 50, 50, 3.0),
            GradeBoundary::new("F", 0, 49, 0.0),
        ])
        .unwrap();
        assert!(matches!(
            table.insert_boundary(0, "A-", 3.5),
            Err(BoundaryError::NoRoom { upper: 51, lower: 50 })
        ));
    }

    #[test]
    fn delete_sole_band_fails() {
        let table = GradeBoundaryTable::new(vec![GradeBoundary::new("P", 0, 100, 1.0)]).unwrap();
        assert_eq!(table.delete_boundary(0), Err(BoundaryError::Empty));
    }

    #[test]
    fn delete_middle_band_keeps_coverage() {
        let table = GradeBoundaryTable::default();
        let edited = table.delete_boundary(1).unwrap();
        assert_gapless(&edited);
        assert_eq!(edited.len(), 11);
        assert_eq!(edited.bands()[1].letter, "A-");
        assert_eq!(edited.bands()[1].max, 94);
        assert_eq!(edited.lookup_letter(92.0), "A-");
    }

    #[test]
    fn delete_edges() {
        let table = GradeBoundaryTable::default();
        let top = table.delete_boundary(0).unwrap();
        assert_eq!(top.bands()[0].letter, "A");
        assert_eq!(top.bands()[0].max, 100);
        let bottom = table.delete_boundary(11).unwrap();
        assert_eq!(bottom.bands()[10].letter, "D");
        assert_eq!(bottom.bands()[10].min, 0);
    }

    #[test]
    fn new_orders_by_rank_not_position() {
        let mut bands = vec![
            GradeBoundary::new("F", 0, 59, 0.0),
            GradeBoundary::new("P", 60, 100, 1.0),
        ];
        bands[0].rank = Some(1);
        bands[1].rank = Some(0);
        let table = GradeBoundaryTable::new(bands).unwrap();
        assert_eq!(letters(&table), vec!["P", "F"]);
    }

    #[test]
    fn new_rejects_gaps_and_bad_bands() {
        let gap = vec![
            GradeBoundary::new("P", 61, 100, 1.0),
            GradeBoundary::new("F", 0, 59, 0.0),
        ];
        assert!(matches!(
            GradeBoundaryTable::new(gap),
            Err(BoundaryError::Partition { .. })
        ));

        let negative = vec![GradeBoundary::new("P", 0, 100, -1.0)];
        assert!(matches!(
            GradeBoundaryTable::new(negative),
            Err(BoundaryError::InvalidBand { .. })
        ));

        let dup_rank = vec![
            GradeBoundary { rank: Some(0), ..GradeBoundary::new("P", 60, 100, 1.0) },
            GradeBoundary { rank: Some(0), ..GradeBoundary::new("F", 0, 59, 0.0) },
        ];
        assert!(GradeBoundaryTable::new(dup_rank).is_err());

        let mixed = vec![
            GradeBoundary { rank: Some(0), ..GradeBoundary::new("P", 60, 100, 1.0) },
            GradeBoundary::new("F", 0, 59, 0.0),
        ];
        assert!(matches!(
            GradeBoundaryTable::new(mixed),
            Err(BoundaryError::InvalidBand { .. })
        ));
        assert_eq!(GradeBoundaryTable::new(vec![]), Err(BoundaryError::Empty));
    }

    #[test]
    fn unranked_bands_keep_list_order() {
        let table = GradeBoundaryTable::new(vec![
            GradeBoundary::new("P", 60, 100, 1.0),
            GradeBoundary::new("F", 0, 59, 0.0),
        ])
        .unwrap();
        assert_eq!(letters(&table), vec!["P", "F"]);
        assert_eq!(table.bands()[1].rank, Some(1));

        let json = r#"[
            {"letter":"P","min":60,"max":100,"gpa":1.0},
            {"letter":"F","min":0,"max":59,"gpa":0.0}
        ]"#;
        let parsed: GradeBoundaryTable = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, table);
        assert_eq!(parsed.lookup_letter(75.0), "P");
    }

    #[test]
    fn gpa_must_not_rise_below_a_band() {
        let rising = vec![
            GradeBoundary::new("P", 60, 100, 1.0),
            GradeBoundary::new("F", 0, 59, 2.0),
        ];
        assert!(matches!(
            GradeBoundaryTable::new(rising),
            Err(BoundaryError::InvalidBand { .. })
        ));

        let table = GradeBoundaryTable::default();
        assert!(matches!(
            table.insert_boundary(10, "E", 9.0),
            Err(BoundaryError::InvalidBand { .. })
        ));
        assert!(table.insert_boundary(10, "E", 0.5).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"[{"letter":"P","min":0,"max":90,"gpa":1.0}]"#;
        assert!(serde_json::from_str::<GradeBoundaryTable>(json).is_err());

        let table = GradeBoundaryTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: GradeBoundaryTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }
}
