//! Ctrl-C handling for graceful abort.

use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Install a Ctrl-C handler and return the flag it raises.
///
/// The batch loop polls the flag between roads. A second Ctrl-C while the
/// flag is already set exits immediately.
pub fn install_abort_handler() -> Result<Arc<AtomicBool>> {
    let abort = Arc::new(AtomicBool::new(false));
    let flag = abort.clone();
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        warn!("Interrupt received, finishing roads in progress");
    })?;
    Ok(abort)
}
