// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the records emitted with the `log` feature.

#![cfg(feature = "log")]

use std::sync::{Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};
use understory_tracked::{DirtyState, FieldRegistry, FieldSpec};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct Recorder;

impl Log for Recorder {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static RECORDER: Recorder = Recorder;

fn install() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&RECORDER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

fn recorded(level: Level, needle: &str) -> bool {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .any(|(l, message)| *l == level && message.contains(needle))
}

#[test]
fn dirty_transitions_are_traced() {
    install();
    let mut state = DirtyState::new();
    assert!(state.mark());
    assert!(recorded(Level::Trace, "clean -> dirty"));
    assert!(state.clean());
    assert!(recorded(Level::Trace, "dirty -> clean"));
}

#[test]
fn redeclaration_is_logged_at_debug() {
    install();
    let mut registry = FieldRegistry::new();
    registry
        .declare_accessor::<u32, 1>(["logged_width"], FieldSpec::default())
        .unwrap();
    assert!(!recorded(Level::Debug, "\"logged_width\""));
    registry
        .declare_writable::<u32, 1>(["logged_width"], FieldSpec::default())
        .unwrap();
    assert!(recorded(Level::Debug, "redeclaring field \"logged_width\""));
}
