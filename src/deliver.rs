/*!
 * Deferred Deliverer
 * Replay the action a signal would have had without interception
 */

use log::debug;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};

use crate::backend;
use crate::catalog::slot_of;
use crate::errors::{SignalError, SignalResult};
use crate::state::REGISTRATION;

/// When set, raised signals are recorded here instead of reaching the
/// kernel, so deliveries can be observed without terminating or suspending
/// the test process.
#[cfg(test)]
pub(crate) static RAISE_TAP: parking_lot::Mutex<Option<Vec<Signal>>> =
    parking_lot::Mutex::new(None);

fn raise_now(sig: Signal) -> Result<(), Errno> {
    #[cfg(test)]
    {
        let mut tap = RAISE_TAP.lock();
        if let Some(raised) = tap.as_mut() {
            raised.push(sig);
            return Ok(());
        }
    }
    signal::raise(sig)
}

/// Do for SIG what would have been done had [`install`](crate::install)
/// never run. SIG should have recently been returned by
/// [`poll`](crate::poll).
///
/// If SIG is the terminal stop signal, the process suspends and this
/// returns after a continue signal arrives. If the saved disposition
/// terminates the process, this never returns. Otherwise (an inherited
/// custom handler, or stop-then-continue) it returns after re-arming the
/// capturing handler, and the caller may resume exactly where it left off.
///
/// Callers that hold half-emitted terminal state must quiesce it before
/// calling this; the process may die inside.
pub fn deliver(sig: Signal) -> SignalResult<()> {
    // SIGTSTP is caught only so the caller can react first. The stop itself
    // must look exactly like an un-intercepted stop to whatever supervises
    // this process (a shell doing job control), so raise the true,
    // uncatchable stop signal and leave every disposition in place; the
    // TSTP handler stays armed for the next Ctrl-Z after continuation.
    if sig == Signal::SIGTSTP {
        raise_now(Signal::SIGSTOP).map_err(|errno| SignalError::Raise {
            signal: Signal::SIGSTOP,
            errno,
        })?;
        // Reached once the process is continued.
        return Ok(());
    }

    let saved = {
        let guard = REGISTRATION.lock();
        debug_assert!(guard.is_some(), "deliver before install");
        let Some(reg) = guard.as_ref() else {
            return Ok(());
        };
        debug_assert!(
            reg.caught.contains(sig),
            "deliver with a signal poll never returned: {sig:?}"
        );
        let Some(saved) = reg.saved[slot_of(sig)] else {
            return Ok(());
        };
        saved
    };
    // Lock dropped before the raise: a saved custom handler that runs during
    // it is free to call back into this module.

    let displaced = backend::restore(sig, &saved)
        .map_err(|errno| SignalError::Restore { signal: sig, errno })?;

    let raised = raise_now(sig);
    // Reached only when the disposition did not terminate the process: an
    // inherited handler ran, or the signal stopped us and SIGCONT arrived.

    backend::reinstall(sig, &displaced)
        .map_err(|errno| SignalError::Restore { signal: sig, errno })?;
    debug!("survived {sig:?}; capturing handler re-armed");

    raised.map_err(|errno| SignalError::Raise { signal: sig, errno })
}
