//! Records search
//!
//! Linear filter over a doctor's appointment history by patient name,
//! phone number, or saved diagnosis.

use crate::clinic::queue::newest_first;
use crate::storage::Appointment;

/// Check whether an appointment matches a search term
///
/// Name and diagnosis are compared case-insensitively. The phone number is
/// compared as stored against the lowercased term. An empty term matches.
pub fn matches(appt: &Appointment, term: &str) -> bool {
    let term = term.to_lowercase();

    appt.patient_name.to_lowercase().contains(&term)
        || appt.phone.contains(&term)
        || appt
            .diagnosis()
            .map(|d| d.to_lowercase().contains(&term))
            .unwrap_or(false)
}

/// Filter appointments by `term`, newest first
pub fn search<'a, I>(appointments: I, term: &str) -> Vec<&'a Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let mut results: Vec<&Appointment> = appointments
        .into_iter()
        .filter(|a| matches(a, term))
        .collect();

    results.sort_by(|a, b| newest_first(a, b));
    results
}
