//! Property tests for grade tables and weight distribution.

use proptest::prelude::*;
use studyroom_core::grading::{effective_weights, WeightPlan};
use studyroom_core::{Evaluation, GradeBoundaryTable, NewEvaluation, Weight};

/// Coverage is total and gapless: top band ends at 100, bottom starts at 0,
/// and each band ends right below the previous one's start.
fn assert_partition(table: &GradeBoundaryTable) -> Result<(), TestCaseError> {
    let bands = table.bands();
    prop_assert!(!bands.is_empty());
    prop_assert_eq!(bands[0].max, 100);
    prop_assert_eq!(bands[bands.len() - 1].min, 0);
    for pair in bands.windows(2) {
        prop_assert_eq!(u16::from(pair[1].max) + 1, u16::from(pair[0].min));
        prop_assert!(pair[1].min <= pair[1].max);
    }
    Ok(())
}

/// Lookups find exactly one band everywhere and GPA never rises as the
/// percentage drops.
fn assert_lookups(table: &GradeBoundaryTable) -> Result<(), TestCaseError> {
    let mut previous = f64::INFINITY;
    for p in (0..=100).rev() {
        let p = f64::from(p);
        let hits = table
            .bands()
            .iter()
            .filter(|b| p >= f64::from(b.min) && p < f64::from(b.max) + 1.0)
            .count();
        prop_assert_eq!(hits, 1);
        let gpa = table.lookup_gpa(p);
        prop_assert!(gpa <= previous, "gpa rises to {} at {}%", gpa, p);
        previous = gpa;
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Edit {
    SetMin(usize, u8),
    Insert(usize, f64),
    Delete(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..14, 0u8..=100).prop_map(|(i, m)| Edit::SetMin(i, m)),
        // fraction of the gap between the neighbours' GPAs; above 1 is out of order
        (0usize..14, 0.0f64..1.5).prop_map(|(i, f)| Edit::Insert(i, f)),
        (0usize..14).prop_map(Edit::Delete),
    ]
}

fn evaluation(weight: Weight) -> Evaluation {
    Evaluation::create(NewEvaluation::scheduled("Work", weight)).unwrap()
}

proptest! {
    #[test]
    fn edits_keep_the_partition(edits in prop::collection::vec(edit_strategy(), 0..25)) {
        let mut table = GradeBoundaryTable::default();
        for edit in edits {
            let result = match edit {
                Edit::SetMin(i, m) => table.set_boundary_min(i, m),
                Edit::Insert(i, f) => {
                    let bands = table.bands();
                    let upper = bands.get(i).map_or(1.0, |b| b.gpa);
                    let lower = bands.get(i + 1).map_or(0.0, |b| b.gpa);
                    table.insert_boundary(i, "X", lower + f * (upper - lower))
                }
                Edit::Delete(i) => table.delete_boundary(i),
            };
            // rejected edits leave the previous table in place
            if let Ok(next) = result {
                table = next;
            }
            assert_partition(&table)?;
            assert_lookups(&table)?;
        }
    }

    #[test]
    fn every_percentage_has_one_band(p in 0.0f64..=100.0) {
        let table = GradeBoundaryTable::default();
        let hits = table
            .bands()
            .iter()
            .filter(|b| p >= f64::from(b.min) && p < f64::from(b.max) + 1.0)
            .count();
        prop_assert_eq!(hits, 1);
        prop_assert!(table.band_for(p).is_some());
    }

    #[test]
    fn gpa_never_increases_as_percentage_drops(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let table = GradeBoundaryTable::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.lookup_gpa(low) <= table.lookup_gpa(high));
    }

    #[test]
    fn weights_sum_to_100_with_auto(
        manual in prop::collection::vec(0.0f64..=25.0, 0..4),
        autos in 1usize..6,
    ) {
        let mut evals: Vec<Evaluation> =
            manual.iter().map(|&w| evaluation(Weight::Manual(w))).collect();
        evals.extend((0..autos).map(|_| evaluation(Weight::Auto)));

        let total: f64 = effective_weights(&evals).iter().map(|(_, w)| w).sum();
        prop_assert!((total - 100.0).abs() < 1e-6);
        prop_assert!((WeightPlan::for_evaluations(&evals).total() - total).abs() < 1e-6);
    }
}
