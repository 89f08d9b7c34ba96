/*!
 * Signal Catalog
 * The fixed, ordered set of signals this subsystem is willing to catch
 */

use bitflags::bitflags;
use nix::sys::signal::Signal;

bitflags! {
    /// Install-time options.
    ///
    /// The three job-control signals stop the process by default and are
    /// captured only on request; a program that owns the terminal wants
    /// Ctrl-Z intercepted, a pipeline stage usually does not. On platforms
    /// lacking these signals the flags are no-ops.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CatchFlags: u32 {
        /// Also catch SIGTSTP (stop typed at the terminal).
        const TSTP = 1 << 0;
        /// Also catch SIGTTIN (background read from the terminal).
        const TTIN = 1 << 1;
        /// Also catch SIGTTOU (background write to the terminal).
        const TTOU = 1 << 2;
    }
}

/// The signals that can be caught.
///
/// This includes all catchable signals that by default are ignored, or that
/// stop or terminate the process. It also includes SIGQUIT since that can
/// come from the terminal. It excludes signals that normally come from
/// program failure, and the two that cannot be caught at all.
///
/// The declaration order is load-bearing: `poll` scans pending counts in
/// this order and reports the first hit.
pub const CATCHABLE: &[Signal] = &[
    // SIGABRT is normally from program failure.
    Signal::SIGALRM,
    // SIGBUS is normally from program failure.
    Signal::SIGCHLD,
    Signal::SIGCONT,
    // SIGFPE is normally from program failure.
    Signal::SIGHUP,
    // SIGILL is normally from program failure.
    Signal::SIGINT,
    // SIGKILL cannot be caught.
    Signal::SIGPIPE,
    // SIGPOLL spells SIGIO here; removed from POSIX.1-2024, still on Linux.
    Signal::SIGIO,
    Signal::SIGPROF,
    #[cfg(any(target_os = "linux", target_os = "android"))]
    Signal::SIGPWR,
    Signal::SIGQUIT,
    // SIGSEGV is normally from program failure.
    // SIGSTOP cannot be caught.
    // SIGSYS is normally from program failure.
    Signal::SIGTERM,
    // SIGTRAP is normally from program failure.
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
    Signal::SIGURG,
    Signal::SIGUSR1,
    Signal::SIGUSR2,
    Signal::SIGVTALRM,
    Signal::SIGWINCH,
    Signal::SIGXCPU,
    Signal::SIGXFSZ,
];

/// Pending-count slots are indexed by raw signal number. Every member of
/// [`CATCHABLE`] is well below this bound on supported platforms.
pub(crate) const SLOT_LIMIT: usize = 64;

#[inline]
pub(crate) fn slot_of(sig: Signal) -> usize {
    sig as i32 as usize
}
