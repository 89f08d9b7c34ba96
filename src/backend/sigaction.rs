/*!
 * Structured Backend
 * sigaction with SA_RESTART and a full caught-set mask during the handler
 */

use std::mem::MaybeUninit;
use std::ptr;

use nix::errno::Errno;
use nix::sys::signal::{SigSet, Signal};

use crate::capture;
use crate::catalog::CATCHABLE;

/// A disposition as the kernel reports it.
pub(crate) type Saved = libc::sigaction;

/// Read the current disposition of SIG without changing it.
fn query(sig: Signal) -> Result<libc::sigaction, Errno> {
    let mut old = MaybeUninit::<libc::sigaction>::uninit();
    let res = unsafe { libc::sigaction(sig as libc::c_int, ptr::null(), old.as_mut_ptr()) };
    Errno::result(res).map(|_| unsafe { old.assume_init() })
}

/// Observe the prior disposition of SIG. Returns `None` when the signal is
/// explicitly ignored; an ancestor that redirected it on purpose wins and
/// the signal stays ignored.
pub(crate) fn probe(sig: Signal) -> Result<Option<Saved>, Errno> {
    let old = query(sig)?;
    if old.sa_sigaction == libc::SIG_IGN {
        Ok(None)
    } else {
        Ok(Some(old))
    }
}

/// Arm the capturing handler for SIG. The during-handler mask is the entire
/// caught set, so handlers never interleave, and interrupted syscalls are
/// restarted.
pub(crate) fn arm(sig: Signal, caught: &SigSet) -> Result<(), Errno> {
    let mut mask = MaybeUninit::<libc::sigset_t>::uninit();
    unsafe { libc::sigemptyset(mask.as_mut_ptr()) };
    for &member in CATCHABLE {
        if caught.contains(member) {
            unsafe { libc::sigaddset(mask.as_mut_ptr(), member as libc::c_int) };
        }
    }

    let mut act: libc::sigaction = unsafe { std::mem::zeroed() };
    act.sa_sigaction = capture::handler as extern "C" fn(libc::c_int) as libc::sighandler_t;
    act.sa_mask = unsafe { mask.assume_init() };
    act.sa_flags = libc::SA_RESTART;

    let res = unsafe { libc::sigaction(sig as libc::c_int, &act, ptr::null_mut()) };
    Errno::result(res).map(drop)
}

/// Install SAVED for SIG, returning the disposition it displaced.
pub(crate) fn restore(sig: Signal, saved: &Saved) -> Result<Saved, Errno> {
    let mut displaced = MaybeUninit::<libc::sigaction>::uninit();
    let res = unsafe { libc::sigaction(sig as libc::c_int, saved, displaced.as_mut_ptr()) };
    Errno::result(res).map(|_| unsafe { displaced.assume_init() })
}

/// Put a displaced capturing action back once a delivered signal returns.
pub(crate) fn reinstall(sig: Signal, act: &Saved) -> Result<(), Errno> {
    let res = unsafe { libc::sigaction(sig as libc::c_int, act, ptr::null_mut()) };
    Errno::result(res).map(drop)
}
