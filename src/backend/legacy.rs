/*!
 * Legacy Backend
 * signal() for platforms without the sigaction machinery
 */

use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, SigSet, Signal};

use crate::capture;

pub(crate) type Saved = SigHandler;

/// Observe the prior disposition of SIG and, unless it was ignored, arm the
/// capturing handler right away.
///
/// signal() cannot query without installing, so the probe swaps SIG_IGN in
/// first. An unavoidable race: SIG may be mistakenly ignored in the window
/// before the handler is armed. Documented platform limitation, same as the
/// self-reinstall race inside the handler; do not try to close it.
pub(crate) fn probe(sig: Signal) -> Result<Option<Saved>, Errno> {
    let old = unsafe { signal(sig, SigHandler::SigIgn)? };
    if old == SigHandler::SigIgn {
        return Ok(None);
    }

    unsafe { signal(sig, SigHandler::Handler(capture::handler))? };
    // Interrupted syscalls should restart, as SA_RESTART would arrange.
    let res = unsafe { libc::siginterrupt(sig as libc::c_int, 0) };
    Errno::result(res)?;
    Ok(Some(old))
}

/// Handlers were armed during probe; nothing further to do here.
pub(crate) fn arm(_sig: Signal, _caught: &SigSet) -> Result<(), Errno> {
    Ok(())
}

/// Install SAVED for SIG, returning the handler it displaced.
pub(crate) fn restore(sig: Signal, saved: &Saved) -> Result<Saved, Errno> {
    unsafe { signal(sig, *saved) }
}

/// Put a displaced capturing handler back once a delivered signal returns.
pub(crate) fn reinstall(sig: Signal, act: &Saved) -> Result<(), Errno> {
    unsafe { signal(sig, *act) }.map(drop)
}
