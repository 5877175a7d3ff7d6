//! Score-ordered ranking with admission status and probability.
//!
//! The classification window and the probability decay are independent
//! design parameters and intentionally disagree between positions `B+5`
//! and `B+9` past the cutoff: an applicant can be `NotAdmitted` while the
//! decay formula still yields a non-zero probability. Both values are
//! reported as computed.

use super::domain::{AdmissionStatus, Applicant, RankedApplicant};

/// Number of positions past the cutoff classified as borderline.
pub const BORDERLINE_WINDOW: usize = 5;

/// Probability loss per position past the cutoff, in percentage points.
pub const PROBABILITY_DECAY_STEP: i64 = 10;

/// Sort into ranking order: total score descending, priority ascending
/// (a lower priority number states a higher preference and wins score
/// ties). `sort_by` is stable, so records that tie on both keys keep
/// their store insertion order and the ordering stays total and
/// deterministic across runs.
pub(crate) fn sort_for_ranking(applicants: &mut [Applicant]) {
    applicants.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| a.priority.cmp(&b.priority))
    });
}

/// Rank every applicant for one program against its quota.
///
/// The output is a total, order-preserving transform: each input applicant
/// appears exactly once, with ranks covering `1..=N`.
pub fn rank_applicants(mut applicants: Vec<Applicant>, budget_places: u32) -> Vec<RankedApplicant> {
    sort_for_ranking(&mut applicants);
    applicants
        .into_iter()
        .enumerate()
        .map(|(index, applicant)| RankedApplicant {
            rank: index as u32 + 1,
            probability: probability_at(index, budget_places),
            status: classify(index, budget_places),
            applicant,
        })
        .collect()
}

/// Score of the applicant at rank `budget_places`, the last admitted slot.
/// `None` when the program has fewer applicants than places (or no places).
pub fn passing_score(ranked: &[RankedApplicant], budget_places: u32) -> Option<f64> {
    let last_admitted = (budget_places as usize).checked_sub(1)?;
    ranked
        .get(last_admitted)
        .map(|entry| entry.applicant.total_score)
}

fn classify(index: usize, budget_places: u32) -> AdmissionStatus {
    let budget = budget_places as usize;
    if index < budget {
        AdmissionStatus::Admitted
    } else if index < budget + BORDERLINE_WINDOW {
        AdmissionStatus::Borderline
    } else {
        AdmissionStatus::NotAdmitted
    }
}

fn probability_at(index: usize, budget_places: u32) -> u8 {
    let budget = budget_places as usize;
    if index < budget {
        return 100;
    }
    let positions_past_cutoff = (index - budget + 1) as i64;
    (100 - positions_past_cutoff * PROBABILITY_DECAY_STEP).max(0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant(name: &str, score: f64, priority: u32) -> Applicant {
        Applicant {
            name: name.to_string(),
            program: "Applied Mathematics".to_string(),
            total_score: score,
            priority,
            date_submitted: "2023-08-01".to_string(),
        }
    }

    fn cohort(count: usize) -> Vec<Applicant> {
        (0..count)
            .map(|i| applicant(&format!("applicant-{i:03}"), 300.0 - i as f64, 1))
            .collect()
    }

    #[test]
    fn ranks_cover_one_to_n_without_gaps() {
        let ranked = rank_applicants(cohort(17), 5);
        assert_eq!(ranked.len(), 17);
        let ranks: Vec<u32> = ranked.iter().map(|entry| entry.rank).collect();
        assert_eq!(ranks, (1..=17).collect::<Vec<u32>>());
    }

    #[test]
    fn lower_priority_wins_score_ties() {
        let ranked = rank_applicants(
            vec![
                applicant("second-choice", 250.0, 3),
                applicant("first-choice", 250.0, 1),
                applicant("top-score", 260.0, 4),
            ],
            2,
        );
        let names: Vec<&str> = ranked
            .iter()
            .map(|entry| entry.applicant.name.as_str())
            .collect();
        assert_eq!(names, vec!["top-score", "first-choice", "second-choice"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let ranked = rank_applicants(
            vec![
                applicant("earlier", 250.0, 2),
                applicant("later", 250.0, 2),
            ],
            1,
        );
        assert_eq!(ranked[0].applicant.name, "earlier");
        assert_eq!(ranked[1].applicant.name, "later");
    }

    #[test]
    fn forty_places_forty_five_applicants_matches_contract() {
        let ranked = rank_applicants(cohort(45), 40);

        for entry in &ranked[..40] {
            assert_eq!(entry.status, AdmissionStatus::Admitted);
            assert_eq!(entry.probability, 100);
        }

        let borderline: Vec<(u32, u8)> = ranked[40..]
            .iter()
            .map(|entry| (entry.rank, entry.probability))
            .collect();
        assert_eq!(
            borderline,
            vec![(41, 90), (42, 80), (43, 70), (44, 60), (45, 50)]
        );
        assert!(ranked[40..]
            .iter()
            .all(|entry| entry.status == AdmissionStatus::Borderline));
    }

    #[test]
    fn rank_46_is_not_admitted_yet_keeps_formula_probability() {
        // Status window (5 slots) and probability decay (10 per slot)
        // disagree here; both literal values are part of the contract.
        let ranked = rank_applicants(cohort(50), 40);
        let sixth_past_cutoff = &ranked[45];
        assert_eq!(sixth_past_cutoff.rank, 46);
        assert_eq!(sixth_past_cutoff.status, AdmissionStatus::NotAdmitted);
        assert_eq!(sixth_past_cutoff.probability, 40);
    }

    #[test]
    fn probability_floors_at_zero_from_the_tenth_position_past_cutoff() {
        let ranked = rank_applicants(cohort(55), 40);
        assert_eq!(ranked[48].probability, 10);
        assert_eq!(ranked[49].probability, 0);
        assert_eq!(ranked[54].probability, 0);
    }

    #[test]
    fn first_position_past_window_flips_status() {
        let ranked = rank_applicants(cohort(12), 5);
        assert_eq!(ranked[9].status, AdmissionStatus::Borderline);
        assert_eq!(ranked[10].status, AdmissionStatus::NotAdmitted);
    }

    #[test]
    fn passing_score_is_the_last_admitted_score() {
        let ranked = rank_applicants(cohort(45), 40);
        assert_eq!(passing_score(&ranked, 40), Some(300.0 - 39.0));
    }

    #[test]
    fn passing_score_undefined_when_underfilled() {
        let ranked = rank_applicants(cohort(8), 40);
        assert_eq!(passing_score(&ranked, 40), None);
    }

    #[test]
    fn passing_score_undefined_for_zero_quota() {
        let ranked = rank_applicants(cohort(3), 0);
        assert_eq!(passing_score(&ranked, 0), None);
        assert!(ranked
            .iter()
            .all(|entry| entry.status != AdmissionStatus::Admitted));
        assert_eq!(ranked[0].probability, 90);
    }
}
