use crate::fhir::{self, ClinicalData};
use crate::model::{Observation, Patient};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use tracing_subscriber::fmt::MakeWriter;

/// Sample document shared with the integration tests
pub(crate) const SAMPLE_FHIR: &str = include_str!("../tests/data/fhir_sample.json");

pub(crate) fn sample_data() -> ClinicalData {
    fhir::parse(SAMPLE_FHIR).expect("sample document should load")
}

pub(crate) fn patient(id: &str, birthdate: &str) -> Patient {
    Patient {
        patient_id: id.to_string(),
        birthdate: Some(birthdate.to_string()),
        ..Default::default()
    }
}

/// A resolved observation with a value and date
pub(crate) fn lab(patient_id: &str, code: &str, value: f64, date: &str) -> Observation {
    Observation {
        code: code.to_string(),
        value: Some(value),
        date: Some(date.to_string()),
        patient_id: patient_id.to_string(),
        ..Default::default()
    }
}

/// Runs a function with all CR_ environment variables unset
pub(crate) fn with_no_cr_vars<F: FnOnce() -> R, R>(f: F) -> R {
    let cr_vars = std::env::vars()
        .map(|(k, _v)| k)
        .filter(|k| k.starts_with("CR_"))
        .collect::<Vec<_>>();

    temp_env::with_vars_unset(&cr_vars, f)
}

// Mock Writer for flexibly testing the logging behaviour, copy-pasted from
// tracing_subscriber's internal test code (with JSON functionality deleted).
// https://github.com/tokio-rs/tracing/blob/b02a700ba6850ad813f77e65144114f866074a8f/tracing-subscriber/src/fmt/mod.rs#L1247-L1314
pub(crate) struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockWriter {
    pub(crate) fn new(buf: Arc<Mutex<Vec<u8>>>) -> Self {
        Self { buf }
    }

    pub(crate) fn map_error<Guard>(err: TryLockError<Guard>) -> io::Error {
        match err {
            TryLockError::WouldBlock => io::Error::from(io::ErrorKind::WouldBlock),
            TryLockError::Poisoned(_) => io::Error::from(io::ErrorKind::Other),
        }
    }

    pub(crate) fn buf(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.buf.try_lock().map_err(Self::map_error)
    }
}

impl io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf()?.flush()
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockMakeWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockMakeWriter {
    pub(crate) fn get_string(&self) -> String {
        let mut buf = self.buf.lock().expect("lock shouldn't be poisoned");
        let string = std::str::from_utf8(&buf[..])
            .expect("formatter should not have produced invalid utf-8")
            .to_owned();
        buf.clear();
        string
    }
}

impl<'a> MakeWriter<'a> for MockMakeWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MockWriter::new(self.buf.clone())
    }
}
