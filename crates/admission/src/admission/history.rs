//! Chronological grouping of a program's applicants by submission date.
//!
//! Dates are compared as the stored ISO strings: lexicographic bucket
//! order equals chronological order, and inconsistently formatted dates
//! produce separate buckets (a caller responsibility).

use std::collections::BTreeMap;

use super::domain::{Applicant, HistoricalBucket};

/// Group applicants by exact `date_submitted` value, buckets ascending by
/// date string. Applicants keep their input order within each bucket, so a
/// ranking-ordered snapshot yields ranking-ordered buckets.
pub fn group_by_date(applicants: Vec<Applicant>) -> Vec<HistoricalBucket> {
    let mut buckets: BTreeMap<String, Vec<Applicant>> = BTreeMap::new();
    for applicant in applicants {
        buckets
            .entry(applicant.date_submitted.clone())
            .or_default()
            .push(applicant);
    }

    buckets
        .into_iter()
        .map(|(date, applicants)| HistoricalBucket { date, applicants })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant(name: &str, score: f64, date: &str) -> Applicant {
        Applicant {
            name: name.to_string(),
            program: "Applied Mathematics".to_string(),
            total_score: score,
            priority: 1,
            date_submitted: date.to_string(),
        }
    }

    #[test]
    fn buckets_sort_ascending_by_date_string() {
        let buckets = group_by_date(vec![
            applicant("a", 250.0, "2023-08-01"),
            applicant("b", 240.0, "2023-08-03"),
            applicant("c", 230.0, "2023-08-02"),
        ]);
        let dates: Vec<&str> = buckets.iter().map(|bucket| bucket.date.as_str()).collect();
        assert_eq!(dates, vec!["2023-08-01", "2023-08-02", "2023-08-03"]);
    }

    #[test]
    fn bucket_members_keep_input_order() {
        let buckets = group_by_date(vec![
            applicant("top", 280.0, "2023-08-01"),
            applicant("mid", 260.0, "2023-08-01"),
            applicant("low", 240.0, "2023-08-01"),
        ]);
        assert_eq!(buckets.len(), 1);
        let names: Vec<&str> = buckets[0]
            .applicants
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["top", "mid", "low"]);
    }

    #[test]
    fn unnormalized_date_strings_form_separate_buckets() {
        let buckets = group_by_date(vec![
            applicant("iso", 250.0, "2023-08-01"),
            applicant("other", 240.0, "01.08.2023"),
        ]);
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        assert!(group_by_date(Vec::new()).is_empty());
    }
}
