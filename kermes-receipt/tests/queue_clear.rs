//! Queue clearing against an in-memory spooler

use kermes_printer::{JobInfo, PrintError, PrintResult, PrintSpooler, SpoolerHandle};
use kermes_receipt::queue::clear_queue;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Counters {
    opened: Cell<usize>,
    closed: Cell<usize>,
    deleted: RefCell<Vec<u32>>,
}

struct FakeSpooler {
    jobs: Vec<u32>,
    failing: Vec<u32>,
    jobs_error: bool,
    counters: Rc<Counters>,
}

struct FakeHandle {
    jobs: Vec<u32>,
    failing: Vec<u32>,
    jobs_error: bool,
    counters: Rc<Counters>,
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.counters.closed.set(self.counters.closed.get() + 1);
    }
}

impl SpoolerHandle for FakeHandle {
    fn jobs(&self) -> PrintResult<Vec<JobInfo>> {
        if self.jobs_error {
            return Err(PrintError::Connection("spooler went away".to_string()));
        }
        Ok(self
            .jobs
            .iter()
            .map(|id| JobInfo {
                id: *id,
                document: Some(format!("Kermes Fişi #{id}")),
            })
            .collect())
    }

    fn delete_job(&self, id: u32) -> PrintResult<()> {
        if self.failing.contains(&id) {
            return Err(PrintError::Connection("access denied".to_string()));
        }
        self.counters.deleted.borrow_mut().push(id);
        Ok(())
    }
}

impl PrintSpooler for FakeSpooler {
    type Handle = FakeHandle;

    fn default_printer(&self) -> PrintResult<String> {
        Ok("POS-80".to_string())
    }

    fn open(&self, printer: &str) -> PrintResult<FakeHandle> {
        if printer != "POS-80" {
            return Err(PrintError::Offline(printer.to_string()));
        }
        self.counters.opened.set(self.counters.opened.get() + 1);
        Ok(FakeHandle {
            jobs: self.jobs.clone(),
            failing: self.failing.clone(),
            jobs_error: self.jobs_error,
            counters: Rc::clone(&self.counters),
        })
    }
}

fn spooler(jobs: &[u32], failing: &[u32]) -> FakeSpooler {
    FakeSpooler {
        jobs: jobs.to_vec(),
        failing: failing.to_vec(),
        jobs_error: false,
        counters: Rc::default(),
    }
}

#[test]
fn test_failed_job_is_reported_and_skipped() {
    let spooler = spooler(&[11, 12, 13, 14], &[13]);
    let mut errors = Vec::new();

    let attempted = clear_queue(&spooler, "POS-80", &mut errors).unwrap();

    assert_eq!(attempted, 4);
    assert_eq!(*spooler.counters.deleted.borrow(), [11, 12, 14]);
    let errors = String::from_utf8(errors).unwrap();
    let lines: Vec<&str> = errors.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error deleting job 13: "));
    assert_eq!(spooler.counters.opened.get(), 1);
    assert_eq!(spooler.counters.closed.get(), 1);
}

#[test]
fn test_empty_queue() {
    let spooler = spooler(&[], &[]);
    let mut errors = Vec::new();

    assert_eq!(clear_queue(&spooler, "POS-80", &mut errors).unwrap(), 0);
    assert!(errors.is_empty());
    assert_eq!(spooler.counters.closed.get(), 1);
}

#[test]
fn test_handle_released_when_enumeration_fails() {
    let mut spooler = spooler(&[1, 2], &[]);
    spooler.jobs_error = true;
    let mut errors = Vec::new();

    let result = clear_queue(&spooler, "POS-80", &mut errors);

    assert!(matches!(result, Err(PrintError::Connection(_))));
    assert_eq!(spooler.counters.opened.get(), 1);
    assert_eq!(spooler.counters.closed.get(), 1);
}

#[test]
fn test_unknown_printer_opens_nothing() {
    let spooler = spooler(&[1], &[]);
    let mut errors = Vec::new();

    assert!(clear_queue(&spooler, "Missing", &mut errors).is_err());
    assert_eq!(spooler.counters.opened.get(), 0);
    assert_eq!(spooler.counters.closed.get(), 0);
}
