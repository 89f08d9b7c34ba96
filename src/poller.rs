/*!
 * Poller
 * Synchronous drain of the capture buffer, one signal per call
 */

use nix::sys::signal::{sigprocmask, SigSet, SigmaskHow, Signal};

use crate::capture;
use crate::catalog::{slot_of, CATCHABLE};
use crate::state::REGISTRATION;

#[cfg(test)]
pub(crate) static MASK_CALLS: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(0);

// The mask wrappers discard errors on purpose: with valid arguments
// sigprocmask cannot fail. This module uses process-wide masking, not
// thread-specific masking, so it is useful only in single-threaded
// programs.

fn block(caught: &SigSet) -> SigSet {
    #[cfg(test)]
    MASK_CALLS.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

    let mut prior = SigSet::empty();
    let _ = sigprocmask(SigmaskHow::SIG_BLOCK, Some(caught), Some(&mut prior));
    prior
}

fn unblock(prior: &SigSet) {
    #[cfg(test)]
    MASK_CALLS.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

    let _ = sigprocmask(SigmaskHow::SIG_SETMASK, Some(prior), None);
}

/// Return a pending signal if one has arrived, `None` otherwise.
///
/// Call this often: after [`install`](crate::install) there should not be an
/// unbounded amount of time between calls, and the result should be dealt
/// with promptly (quiesce shared output state, then
/// [`deliver`](crate::deliver)). Only raw counting happens preemptively; all
/// decision logic runs here, synchronously.
///
/// When nothing is pending this is a single relaxed load with no masking.
/// Otherwise delivery of the caught set is blocked while the catalog is
/// scanned in declaration order and the first nonzero count is decremented.
/// Arrival order across signal types is not preserved, deliberately: within
/// one type repeated arrivals only bump a count, so there is no finer
/// ordering to honor. Repeated stop arrivals collapse to a single pending
/// stop action.
pub fn poll() -> Option<Signal> {
    if !capture::maybe_pending() {
        return None;
    }

    let guard = REGISTRATION.lock();
    debug_assert!(guard.is_some(), "poll before install");
    let reg = guard.as_ref()?;

    let prior = block(&reg.caught);

    let mut arrived = None;
    for &sig in CATCHABLE {
        let slot = slot_of(sig);
        let count = capture::load(slot);
        if count > 0 {
            // One stop is as stopped as many: delivering SIGTSTP n times
            // would suspend once and then stack n-1 useless stops behind
            // the continue, so the counter collapses here.
            let rest = if sig == Signal::SIGTSTP { 0 } else { count - 1 };
            capture::store(slot, rest);
            arrived = Some(sig);
            break;
        }
    }
    if arrived.is_none() {
        capture::clear_maybe_pending();
    }

    unblock(&prior);
    arrived
}
