//! Shared helpers for the integration suite.
//!
//! `capture_logs` installs a process-wide logger once and records every
//! record emitted on the calling thread, so parallel tests do not see each
//! other's output.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};
use screen_layout::{HeaderHeightMeasurer, MeasureError};

// =============================================================================
// CAPTURING LOGGER
// =============================================================================

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Start capturing on this thread, dropping anything captured earlier.
pub fn capture_logs() {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Messages captured on this thread at exactly `level`.
pub fn logged(level: Level) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}

// =============================================================================
// FAKE MEASURERS
// =============================================================================

/// Measurer returning a fixed outcome and counting its calls.
pub struct FakeMeasurer {
    outcome: Result<f32, MeasureError>,
    calls: Cell<usize>,
    last_args: Cell<Option<(i32, bool)>>,
}

impl FakeMeasurer {
    pub fn returning(height: f32) -> Self {
        Self::with_outcome(Ok(height))
    }

    pub fn failing(err: MeasureError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<f32, MeasureError>) -> Self {
        Self {
            outcome,
            calls: Cell::new(0),
            last_args: Cell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_args(&self) -> Option<(i32, bool)> {
        self.last_args.get()
    }
}

impl HeaderHeightMeasurer for FakeMeasurer {
    fn compute_dummy_layout(
        &self,
        font_size: i32,
        is_title_empty: bool,
    ) -> Result<f32, MeasureError> {
        self.calls.set(self.calls.get() + 1);
        self.last_args.set(Some((font_size, is_title_empty)));
        self.outcome.clone()
    }
}
