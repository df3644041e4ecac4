//! Queue board ordering
//!
//! Splits a doctor's appointments into the three dashboard columns:
//! - Waiting: ascending token number (who gets called next comes first)
//! - In consultation: newest first
//! - Done: newest first, only the most recent ten

use crate::storage::{Appointment, AppointmentStatus, FIRST_QUEUE_NUMBER};
use serde::Serialize;
use std::cmp::Ordering;

/// Number of finished visits kept on the board
pub const DONE_COLUMN_LIMIT: usize = 10;

/// The three queue columns for one doctor
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueBoard<'a> {
    pub waiting: Vec<&'a Appointment>,
    pub in_consult: Vec<&'a Appointment>,
    pub done: Vec<&'a Appointment>,
}

impl<'a> QueueBoard<'a> {
    /// Build the board from an already ownership-filtered set of appointments
    pub fn build<I>(appointments: I) -> Self
    where
        I: IntoIterator<Item = &'a Appointment>,
    {
        let mut board = QueueBoard::default();

        for appt in appointments {
            match appt.status {
                AppointmentStatus::Waiting => board.waiting.push(appt),
                AppointmentStatus::InConsult => board.in_consult.push(appt),
                AppointmentStatus::Done => board.done.push(appt),
            }
        }

        board.waiting.sort_by_key(|a| a.queue_number);
        board.in_consult.sort_by(|a, b| newest_first(a, b));
        board.done.sort_by(|a, b| newest_first(a, b));
        board.done.truncate(DONE_COLUMN_LIMIT);

        board
    }

    /// The appointment "call next" would pick
    pub fn next_up(&self) -> Option<&'a Appointment> {
        self.waiting.first().copied()
    }

    /// Total appointments shown on the board
    pub fn len(&self) -> usize {
        self.waiting.len() + self.in_consult.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Descending by creation time; equal timestamps fall back to the later token
pub fn newest_first(a: &Appointment, b: &Appointment) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.queue_number.cmp(&a.queue_number))
}

/// Token for the next walk-in given the doctor's existing appointments
///
/// Returns `None` once the highest token is `u32::MAX`.
pub fn next_queue_number<'a, I>(appointments: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    match appointments.into_iter().map(|a| a.queue_number).max() {
        Some(max) => max.checked_add(1),
        None => Some(FIRST_QUEUE_NUMBER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn appt(doctor: Uuid, token: u32, minutes: i64, status: AppointmentStatus) -> Appointment {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Appointment::new(doctor, token, format!("Patient {}", token), "555-0100", "")
            .created_at(base + Duration::minutes(minutes))
            .status(status)
    }

    #[test]
    fn test_next_queue_number() {
        let doctor = Uuid::new_v4();
        let empty: Vec<Appointment> = vec![];
        assert_eq!(next_queue_number(&empty), Some(101));

        let list = vec![
            appt(doctor, 101, 0, AppointmentStatus::Done),
            appt(doctor, 104, 1, AppointmentStatus::Waiting),
            appt(doctor, 102, 2, AppointmentStatus::Waiting),
        ];
        assert_eq!(next_queue_number(&list), Some(105));
    }

    #[test]
    fn test_next_queue_number_exhausted() {
        let doctor = Uuid::new_v4();
        let list = vec![appt(doctor, u32::MAX, 0, AppointmentStatus::Done)];
        assert_eq!(next_queue_number(&list), None);
    }

    #[test]
    fn test_waiting_sorted_by_token() {
        let doctor = Uuid::new_v4();
        let list = vec![
            appt(doctor, 103, 0, AppointmentStatus::Waiting),
            appt(doctor, 101, 5, AppointmentStatus::Waiting),
            appt(doctor, 102, 9, AppointmentStatus::Waiting),
        ];

        let board = QueueBoard::build(&list);
        let tokens: Vec<u32> = board.waiting.iter().map(|a| a.queue_number).collect();

        assert_eq!(tokens, vec![101, 102, 103]);
        assert_eq!(board.next_up().map(|a| a.queue_number), Some(101));
    }

    #[test]
    fn test_in_consult_newest_first() {
        let doctor = Uuid::new_v4();
        let list = vec![
            appt(doctor, 101, 0, AppointmentStatus::InConsult),
            appt(doctor, 102, 10, AppointmentStatus::InConsult),
            appt(doctor, 103, 5, AppointmentStatus::InConsult),
        ];

        let board = QueueBoard::build(&list);
        let tokens: Vec<u32> = board.in_consult.iter().map(|a| a.queue_number).collect();

        assert_eq!(tokens, vec![102, 103, 101]);
        assert!(board.next_up().is_none());
    }

    #[test]
    fn test_done_truncated_to_ten_most_recent() {
        let doctor = Uuid::new_v4();
        let list: Vec<Appointment> = (0..15)
            .map(|i| appt(doctor, 101 + i, i as i64, AppointmentStatus::Done))
            .collect();

        let board = QueueBoard::build(&list);

        assert_eq!(board.done.len(), DONE_COLUMN_LIMIT);
        assert_eq!(board.done[0].queue_number, 115);
        assert_eq!(board.done[9].queue_number, 106);
    }

    #[test]
    fn test_equal_timestamps_order_by_token() {
        let doctor = Uuid::new_v4();
        let list = vec![
            appt(doctor, 101, 0, AppointmentStatus::Done),
            appt(doctor, 102, 0, AppointmentStatus::Done),
        ];

        let board = QueueBoard::build(&list);
        assert_eq!(board.done[0].queue_number, 102);
    }

    #[test]
    fn test_board_len() {
        let doctor = Uuid::new_v4();
        let list = vec![
            appt(doctor, 101, 0, AppointmentStatus::Waiting),
            appt(doctor, 102, 1, AppointmentStatus::InConsult),
            appt(doctor, 103, 2, AppointmentStatus::Done),
        ];

        let board = QueueBoard::build(&list);
        assert_eq!(board.len(), 3);
        assert!(!board.is_empty());
        assert!(QueueBoard::build(&Vec::<Appointment>::new()).is_empty());
    }
}
