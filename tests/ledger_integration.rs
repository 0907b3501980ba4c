//! Durability and crash-safety tests for the ledger.

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use grid_sim::ledger::{LEDGER_HEADER, Ledger};
use grid_sim::sim::SimulationRecord;

fn record(tick: u64, consumption: f64, production: f64) -> SimulationRecord {
    SimulationRecord::new(tick, consumption, production).expect("valid record")
}

#[test]
fn durability_round_trip_on_a_fresh_instance() {
    let ledger = common::temp_ledger("durability");
    let r1 = record(1, 8.0, 10.0);
    let r2 = record(2, 9.0, 7.5);
    ledger.append(r1.clone());
    ledger.append(r2.clone());
    ledger.flush().expect("flush should succeed");

    let fresh = Ledger::new(ledger.path());
    assert_eq!(fresh.load_from_file().expect("load should succeed"), 2);
    assert_eq!(fresh.snapshot(), vec![r1, r2]);
}

#[test]
fn failed_flush_loses_nothing() {
    let path = common::temp_dir("failed_flush")
        .join("absent")
        .join("ledger.csv");
    let ledger = Ledger::new(path);
    let r1 = record(1, 8.0, 10.0);
    let r2 = record(2, 9.0, 7.5);
    ledger.append(r1.clone());
    ledger.append(r2.clone());

    assert!(ledger.flush().is_err());
    assert_eq!(ledger.snapshot(), vec![r1.clone(), r2.clone()]);

    // a second failure still loses nothing
    assert!(ledger.flush().is_err());
    assert_eq!(ledger.snapshot(), vec![r1, r2]);
}

#[test]
fn flush_preserves_existing_file_order() {
    let ledger = common::temp_ledger("order");
    ledger.append(record(1, 1.0, 2.0));
    ledger.flush().expect("flush should succeed");
    ledger.append(record(2, 3.0, 4.0));
    ledger.append(record(3, 5.0, 6.0));
    ledger.flush().expect("flush should succeed");

    let fresh = Ledger::new(ledger.path());
    fresh.load_from_file().expect("load should succeed");
    let ticks: Vec<u64> = fresh.snapshot().iter().map(SimulationRecord::tick).collect();
    assert_eq!(ticks, vec![1, 2, 3]);
}

#[test]
fn file_is_always_well_formed() {
    let ledger = common::temp_ledger("well_formed");
    ledger.append(record(1, 8.0, 10.0));
    ledger.flush().expect("flush should succeed");

    let content = fs::read_to_string(ledger.path()).expect("file should exist");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(LEDGER_HEADER));
    for line in lines {
        assert_eq!(line.matches(',').count(), 4, "line should have 5 fields: {line}");
    }
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let ledger = common::temp_ledger("malformed");
    let content = format!(
        "{LEDGER_HEADER}\n\
         06/08/2026 09:00:00,1,10.00,8.00,2.00\n\
         not a record at all\n\
         06/08/2026 09:00:02,two,10.00,8.00,2.00\n\
         06/08/2026 09:00:03,3,6.00,5.00,1.00\n"
    );
    fs::write(ledger.path(), content).expect("write should succeed");

    assert_eq!(ledger.load_from_file().expect("load should succeed"), 2);
    let ticks: Vec<u64> = ledger.snapshot().iter().map(SimulationRecord::tick).collect();
    assert_eq!(ticks, vec![1, 3]);
}

#[test]
fn clear_resets_file_to_header_only() {
    let ledger = common::temp_ledger("clear_reset");
    ledger.append(record(1, 8.0, 10.0));
    ledger.flush().expect("flush should succeed");

    ledger.clear().expect("clear should succeed");

    let content = fs::read_to_string(ledger.path()).expect("file should exist");
    assert_eq!(content.trim_end(), LEDGER_HEADER);

    let fresh = Ledger::new(ledger.path());
    assert_eq!(fresh.load_from_file().expect("load should succeed"), 0);
}

#[test]
fn appends_from_another_thread_are_not_lost() {
    let ledger = Arc::new(common::temp_ledger("threads"));

    let writer = {
        let ledger = Arc::clone(&ledger);
        thread::spawn(move || {
            for tick in 1..=50 {
                ledger.append(record(tick, 1.0, 2.0));
            }
        })
    };
    for tick in 51..=100 {
        ledger.append(record(tick, 3.0, 4.0));
    }
    writer.join().expect("writer thread should finish");

    assert_eq!(ledger.len(), 100);
    assert_eq!(ledger.flush().expect("flush should succeed"), 100);

    let fresh = Ledger::new(ledger.path());
    assert_eq!(fresh.load_from_file().expect("load should succeed"), 100);
}

#[test]
fn flush_concurrent_with_appends_keeps_every_record() {
    let ledger = Arc::new(common::temp_ledger("flush_race"));

    let appender = {
        let ledger = Arc::clone(&ledger);
        thread::spawn(move || {
            for tick in 1..=20 {
                ledger.append(record(tick, 1.0, 1.0));
                if tick % 5 == 0 {
                    // interleave flushes with appends
                    let _ = ledger.flush();
                }
            }
        })
    };
    for tick in 21..=40 {
        ledger.append(record(tick, 2.0, 2.0));
    }
    appender.join().expect("appender thread should finish");
    ledger.flush().expect("final flush should succeed");

    let fresh = Ledger::new(ledger.path());
    assert_eq!(fresh.load_from_file().expect("load should succeed"), 40);
}
