//! Recording resource used by unit tests

use crate::Releasable;
use closers_errors::Error;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Shared record of release calls, in call order
#[derive(Clone, Default)]
pub(crate) struct CallLog(Rc<RefCell<Vec<&'static str>>>);

impl CallLog {
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }

    pub(crate) fn ok(&self, name: &'static str) -> FakeResource {
        FakeResource {
            name,
            failure: None,
            log: self.clone(),
        }
    }

    pub(crate) fn failing(&self, name: &'static str, message: &'static str) -> FakeResource {
        FakeResource {
            name,
            failure: Some(message),
            log: self.clone(),
        }
    }
}

pub(crate) struct FakeResource {
    name: &'static str,
    failure: Option<&'static str>,
    log: CallLog,
}

impl Releasable for FakeResource {
    type Error = Error;

    fn release(&mut self) -> Result<(), Error> {
        self.log.0.borrow_mut().push(self.name);
        match self.failure {
            Some(message) => Err(Error::release(message)),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a plain-text subscriber installed and return the lines it logged
pub(crate) fn capture_logs(f: impl FnOnce()) -> Vec<String> {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// The single captured line containing `message`
pub(crate) fn line_with<'l>(lines: &'l [String], message: &str) -> &'l str {
    let matching: Vec<&String> = lines.iter().filter(|l| l.contains(message)).collect();
    assert_eq!(matching.len(), 1, "expected one line with {message:?} in {lines:#?}");
    matching[0].trim_start()
}
