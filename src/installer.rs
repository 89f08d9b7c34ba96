/*!
 * Installer
 * Swap the capturing handler in for every catchable, not-ignored signal
 */

use log::debug;
use nix::sys::signal::{SigSet, Signal};

use crate::backend;
use crate::capture;
use crate::catalog::{slot_of, CatchFlags, CATCHABLE, SLOT_LIMIT};
use crate::errors::{SignalError, SignalResult};
use crate::state::{Registration, REGISTRATION};

fn excluded(sig: Signal, flags: CatchFlags) -> bool {
    match sig {
        Signal::SIGTSTP => !flags.contains(CatchFlags::TSTP),
        Signal::SIGTTIN => !flags.contains(CatchFlags::TTIN),
        Signal::SIGTTOU => !flags.contains(CatchFlags::TTOU),
        _ => false,
    }
}

/// Start capturing signals.
///
/// For every catalog entry not excluded by FLAGS whose disposition is not
/// "explicitly ignored": record the prior disposition, arm the capturing
/// handler, and add the signal to the caught set. Capture state is reset
/// first, so a reinstall starts from a clean slate.
///
/// Fails only where the underlying syscalls can fail, which is unusual; on
/// failure signal handling is in a weird state and neither [`poll`], nor
/// [`deliver`], nor [`uninstall`] should be called.
///
/// [`poll`]: crate::poll
/// [`deliver`]: crate::deliver
/// [`uninstall`]: crate::uninstall
pub fn install(flags: CatchFlags) -> SignalResult<()> {
    capture::reset();

    let mut caught = SigSet::empty();
    let mut saved: [Option<backend::Saved>; SLOT_LIMIT] = [None; SLOT_LIMIT];

    for &sig in CATCHABLE {
        if excluded(sig, flags) {
            continue;
        }
        match backend::probe(sig).map_err(|errno| SignalError::Install { signal: sig, errno })? {
            Some(prior) => {
                saved[slot_of(sig)] = Some(prior);
                caught.add(sig);
            }
            None => debug!("{sig:?} already ignored on purpose; leaving it be"),
        }
    }

    // Arm only after the whole caught set is known: the during-handler mask
    // covers every caught signal, so handlers never interleave.
    for &sig in CATCHABLE {
        if caught.contains(sig) {
            backend::arm(sig, &caught)
                .map_err(|errno| SignalError::Install { signal: sig, errno })?;
        }
    }

    let count = CATCHABLE.iter().filter(|s| caught.contains(**s)).count();
    debug!("capturing {count} of {} catchable signals", CATCHABLE.len());

    *REGISTRATION.lock() = Some(Registration { caught, saved });
    Ok(())
}

/// Stop capturing signals, restoring every caught signal to its saved
/// disposition in catalog order. Idempotent.
///
/// A signal can land in the window between the last check and the restore
/// here; call [`poll`](crate::poll) once afterward to flush it.
pub fn uninstall() -> SignalResult<()> {
    let guard = REGISTRATION.lock();
    let Some(reg) = guard.as_ref() else {
        debug_assert!(false, "uninstall before install");
        return Ok(());
    };

    for &sig in CATCHABLE {
        if reg.caught.contains(sig) {
            if let Some(saved) = &reg.saved[slot_of(sig)] {
                backend::restore(sig, saved)
                    .map_err(|errno| SignalError::Restore { signal: sig, errno })?;
            }
        }
    }
    debug!("original dispositions restored");
    Ok(())
}

/// Whether SIG is currently a member of the caught set.
pub fn captured(sig: Signal) -> bool {
    REGISTRATION
        .lock()
        .as_ref()
        .is_some_and(|reg| reg.caught.contains(sig))
}
