//! Print queue maintenance

use kermes_printer::{PrintResult, PrintSpooler, SpoolerHandle};
use std::io::Write;
use tracing::{info, instrument, warn};

/// Delete every pending job on `printer`
///
/// Failures on single jobs are written to `errors` as
/// `Error deleting job <id>: <error>` and do not stop the loop. Returns the
/// number of deletions attempted. The printer handle is closed when this
/// function returns, on success and on error alike.
#[instrument(skip(spooler, errors))]
pub fn clear_queue<S: PrintSpooler>(
    spooler: &S,
    printer: &str,
    errors: &mut impl Write,
) -> PrintResult<usize> {
    let handle = spooler.open(printer)?;
    let jobs = handle.jobs()?;
    info!(pending = jobs.len(), "clearing print queue");

    let mut attempted = 0;
    for job in &jobs {
        attempted += 1;
        if let Err(e) = handle.delete_job(job.id) {
            warn!(job = job.id, document = ?job.document, error = %e, "job deletion failed");
            writeln!(errors, "Error deleting job {}: {}", job.id, e)?;
        }
    }

    Ok(attempted)
}
