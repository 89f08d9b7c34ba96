/*!
 * Capture Buffer
 * Per-signal pending counts written from inside the signal handler
 */

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::catalog::SLOT_LIMIT;

const ZERO: AtomicU32 = AtomicU32::new(0);

/// Number of pending arrivals per signal, indexed by raw signal number.
/// Incremented only by the handler; drained only by `poll` while the caught
/// set is blocked.
static PENDING: [AtomicU32; SLOT_LIMIT] = [ZERO; SLOT_LIMIT];

/// If true, `PENDING` might contain nonzero entries. If false, `PENDING` is
/// all zero. May be true spuriously, never false while a count is nonzero;
/// the asymmetry keeps the handler free of conditional logic and gives
/// `poll` a zero-cost answer in the common nothing-pending case.
static MAYBE_PENDING: AtomicBool = AtomicBool::new(false);

/// Record an asynchronous signal.
///
/// This is the handler armed for every caught signal and it must stay
/// async-signal-safe: relaxed atomic stores and one increment, no
/// allocation, no locks, no I/O. The flag is raised before the count so the
/// never-false-while-nonzero invariant holds at every instruction boundary.
pub(crate) extern "C" fn handler(sig: libc::c_int) {
    // The old signal() API resets the disposition to default on every
    // delivery, so the handler must put itself back first. An unavoidable
    // race: the default action may be taken if a second signal of the same
    // kind lands before signal() completes.
    #[cfg(feature = "legacy-handlers")]
    unsafe {
        libc::signal(
            sig,
            handler as extern "C" fn(libc::c_int) as libc::sighandler_t,
        );
    }

    MAYBE_PENDING.store(true, Ordering::Relaxed);
    if let Some(count) = PENDING.get(sig as usize) {
        count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fast-path check used by `poll`.
#[inline]
pub(crate) fn maybe_pending() -> bool {
    MAYBE_PENDING.load(Ordering::Relaxed)
}

/// Called by `poll` once a full scan finds every count zero.
pub(crate) fn clear_maybe_pending() {
    MAYBE_PENDING.store(false, Ordering::Relaxed);
}

pub(crate) fn load(slot: usize) -> u32 {
    PENDING[slot].load(Ordering::Relaxed)
}

/// Only callable while delivery of the caught set is blocked.
pub(crate) fn store(slot: usize, count: u32) {
    PENDING[slot].store(count, Ordering::Relaxed);
}

/// Forget everything; runs at each install, before any handler is armed.
pub(crate) fn reset() {
    for count in &PENDING {
        count.store(0, Ordering::Relaxed);
    }
    MAYBE_PENDING.store(false, Ordering::Relaxed);
}

/// Synthesize an arrival by running the real handler body.
#[cfg(test)]
pub(crate) fn record(sig: nix::sys::signal::Signal) {
    handler(sig as i32);
}
