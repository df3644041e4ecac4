//! Benchmarks for queue board ordering, records search and store flushes
//!
//! Run with: cargo bench

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use docqueue::clinic::{records, ClinicStore, QueueBoard};
use docqueue::storage::{Appointment, AppointmentStatus, VisitNote};
use tempfile::tempdir;
use uuid::Uuid;

const DIAGNOSES: [&str; 4] = ["Influenza", "Migraine", "Hypertension", "Bronchitis"];

fn create_test_appointments(count: usize) -> Vec<Appointment> {
    let doctor_id = Uuid::new_v4();
    let start = Utc::now() - Duration::days(30);

    (0..count)
        .map(|i| {
            let status = match i % 3 {
                0 => AppointmentStatus::Waiting,
                1 => AppointmentStatus::InConsult,
                _ => AppointmentStatus::Done,
            };
            let mut appt = Appointment::new(
                doctor_id,
                101 + i as u32,
                format!("Patient {}", i),
                format!("555-{:04}", i % 10_000),
                "Checkup",
            )
            .created_at(start + Duration::minutes(i as i64))
            .status(status);

            if status == AppointmentStatus::Done {
                appt.visit_notes = Some(VisitNote::new("Fever", DIAGNOSES[i % 4], "Rest"));
            }
            appt
        })
        .collect()
}

fn bench_board(c: &mut Criterion) {
    let mut group = c.benchmark_group("board");

    for size in [100, 1000, 10000] {
        let appointments = create_test_appointments(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("build_{}", size), |b| {
            b.iter(|| QueueBoard::build(black_box(&appointments)).len())
        });
    }

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    for size in [100, 1000, 10000] {
        let appointments = create_test_appointments(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("search_diagnosis_{}", size), |b| {
            b.iter(|| records::search(black_box(&appointments), black_box("migraine")).len())
        });

        group.bench_function(format!("search_phone_{}", size), |b| {
            b.iter(|| records::search(black_box(&appointments), black_box("555-00")).len())
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    group.bench_function("add_appointment_flush", |b| {
        let dir = tempdir().unwrap();
        let mut clinic = ClinicStore::open_dir(dir.path()).unwrap();
        clinic.register("Bench", "GP", "bench", "pw").unwrap();

        b.iter(|| {
            clinic
                .add_appointment(black_box("Patient"), black_box("555-0100"), "")
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_board, bench_records, bench_store);
criterion_main!(benches);
