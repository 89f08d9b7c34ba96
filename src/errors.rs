/*!
 * Signal Errors
 * Failure taxonomy for install, restore, and raise
 */

use nix::errno::Errno;
use nix::sys::signal::Signal;
use thiserror::Error;

/// Signal operation result
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal errors
///
/// Everything here is an OS primitive failing, which only happens on unusual
/// platforms (resource exhaustion in the signal syscalls). Contract misuse,
/// such as delivering a signal `poll` never returned or polling before
/// install, is a programming error checked by debug assertions, not a
/// runtime variant; policing it at runtime would need bookkeeping that is
/// not handler-safe.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// Installation failed partway through. The subsystem is left in an
    /// inconsistent state: treat this as fatal and do not call poll,
    /// deliver, or uninstall afterward.
    #[error("cannot install handler for {signal:?}: {errno}")]
    Install { signal: Signal, errno: Errno },

    /// Restoring a saved disposition failed. A half-restored state is
    /// unsafe to continue from; treat as fatal.
    #[error("cannot restore disposition for {signal:?}: {errno}")]
    Restore { signal: Signal, errno: Errno },

    #[error("cannot raise {signal:?}: {errno}")]
    Raise { signal: Signal, errno: Errno },
}
