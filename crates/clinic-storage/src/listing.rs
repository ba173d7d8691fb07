//! Ordering and matching rules shared by every backend.
//!
//! Backends differ in how they fetch records but must list and search them
//! identically, so both rules live here.

use std::cmp::Ordering;

use clinic_core::{Patient, parse_visit_date};

/// Compares two patients for the full listing.
///
/// When both have a parseable visit date the more recent one comes first.
/// In every other case the names decide, ascending. This is not a total
/// order across mixed dated/undated records.
pub fn compare_for_listing(a: &Patient, b: &Patient) -> Ordering {
    let dates = (
        a.visit_date.as_deref().and_then(parse_visit_date),
        b.visit_date.as_deref().and_then(parse_visit_date),
    );
    match dates {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        _ => compare_names(&a.name, &b.name),
    }
}

/// Case-insensitive name order, falling back to byte order on ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorts patients for the full listing.
///
/// `compare_for_listing` is not a total order, which the standard sorts are
/// allowed to panic on. This is a plain stable merge sort: for equal keys
/// the input order is kept, and it never panics.
pub fn sort_for_listing(patients: Vec<Patient>) -> Vec<Patient> {
    if patients.len() <= 1 {
        return patients;
    }
    let mut left = patients;
    let right = left.split_off(left.len() / 2);
    let left = sort_for_listing(left);
    let right = sort_for_listing(right);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        if compare_for_listing(r, l) == Ordering::Less {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}

/// Case-insensitive substring filter over name, contact number and
/// disease/symptoms. An empty query keeps everything.
pub fn filter_by_query<'a, I>(patients: I, query: &str) -> Vec<Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    let needle = query.to_lowercase();
    patients
        .into_iter()
        .filter(|p| p.matches_lowercase(&needle))
        .cloned()
        .collect()
}
