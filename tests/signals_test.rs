/*!
 * Signal System Tests
 * End-to-end tests that raise real signals against the test process
 */

use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use nix::sys::signal::{raise, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use pretty_assertions::assert_eq;
use serial_test::serial;
use syncsig::{captured, deliver, install, poll, uninstall, CatchFlags, CATCHABLE};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// How many times the inherited (pre-install) SIGUSR1 handler ran.
static INHERITED_RUNS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn inherited_handler(_sig: libc::c_int) {
    INHERITED_RUNS.fetch_add(1, Ordering::Relaxed);
}

/// Give SIG a survivable pre-install disposition, so a later deliver() does
/// not kill the test process.
fn arm_inherited(sig: Signal) {
    let act = SigAction::new(
        SigHandler::Handler(inherited_handler),
        SaFlags::empty(),
        SigSet::empty(),
    );
    unsafe { sigaction(sig, &act) }.expect("sigaction");
}

fn set_ignored(sig: Signal) {
    let act = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(sig, &act) }.expect("sigaction");
}

fn set_default(sig: Signal) {
    let act = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(sig, &act) }.expect("sigaction");
}

fn current_handler(sig: Signal) -> libc::sighandler_t {
    let mut old = MaybeUninit::<libc::sigaction>::uninit();
    let res = unsafe { libc::sigaction(sig as libc::c_int, ptr::null(), old.as_mut_ptr()) };
    assert_eq!(res, 0);
    unsafe { old.assume_init() }.sa_sigaction
}

#[test]
#[serial]
fn n_arrivals_drain_in_exactly_n_polls() {
    init_logs();
    arm_inherited(Signal::SIGUSR1);
    install(CatchFlags::empty()).unwrap();

    for _ in 0..3 {
        raise(Signal::SIGUSR1).unwrap();
    }

    for _ in 0..3 {
        assert_eq!(poll(), Some(Signal::SIGUSR1));
    }
    assert_eq!(poll(), None);

    uninstall().unwrap();
    set_default(Signal::SIGUSR1);
}

#[test]
#[serial]
fn ignored_signals_are_left_ignored() {
    init_logs();
    set_ignored(Signal::SIGUSR2);
    install(CatchFlags::empty()).unwrap();

    assert!(!captured(Signal::SIGUSR2));
    assert!(captured(Signal::SIGUSR1));

    // The kernel still ignores it; nothing is captured.
    raise(Signal::SIGUSR2).unwrap();
    assert_eq!(poll(), None);

    uninstall().unwrap();
    set_default(Signal::SIGUSR2);
}

#[test]
#[serial]
fn install_uninstall_round_trip_restores_every_disposition() {
    init_logs();
    arm_inherited(Signal::SIGUSR1);
    set_ignored(Signal::SIGUSR2);

    let before: Vec<(Signal, libc::sighandler_t)> = CATCHABLE
        .iter()
        .map(|&sig| (sig, current_handler(sig)))
        .collect();

    install(CatchFlags::TSTP | CatchFlags::TTIN | CatchFlags::TTOU).unwrap();
    uninstall().unwrap();

    let after: Vec<(Signal, libc::sighandler_t)> = CATCHABLE
        .iter()
        .map(|&sig| (sig, current_handler(sig)))
        .collect();
    assert_eq!(before, after);

    set_default(Signal::SIGUSR1);
    set_default(Signal::SIGUSR2);
}

#[test]
#[serial]
fn deliver_runs_the_inherited_handler_and_rearms_capture() {
    init_logs();
    arm_inherited(Signal::SIGUSR1);
    install(CatchFlags::empty()).unwrap();
    INHERITED_RUNS.store(0, Ordering::Relaxed);

    raise(Signal::SIGUSR1).unwrap();
    assert_eq!(
        INHERITED_RUNS.load(Ordering::Relaxed),
        0,
        "arrival was captured, not handled"
    );

    let sig = poll().expect("one arrival pending");
    assert_eq!(sig, Signal::SIGUSR1);

    // Deliver replays the signal against the inherited disposition and
    // returns, since that handler does not terminate the process.
    deliver(sig).unwrap();
    assert_eq!(INHERITED_RUNS.load(Ordering::Relaxed), 1);

    // The capturing handler is back: a repeat signal is captured again.
    raise(Signal::SIGUSR1).unwrap();
    assert_eq!(INHERITED_RUNS.load(Ordering::Relaxed), 1);
    assert_eq!(poll(), Some(Signal::SIGUSR1));
    assert_eq!(poll(), None);
    deliver(Signal::SIGUSR1).unwrap();
    assert_eq!(INHERITED_RUNS.load(Ordering::Relaxed), 2);

    uninstall().unwrap();
    set_default(Signal::SIGUSR1);
}

#[test]
#[serial]
fn poll_after_uninstall_flushes_the_last_window() {
    init_logs();
    arm_inherited(Signal::SIGUSR1);
    install(CatchFlags::empty()).unwrap();

    // A signal lands just before uninstall; the documented idiom is one
    // more poll afterward to flush it.
    raise(Signal::SIGUSR1).unwrap();
    uninstall().unwrap();

    assert_eq!(poll(), Some(Signal::SIGUSR1));
    assert_eq!(poll(), None);

    set_default(Signal::SIGUSR1);
}

#[test]
#[serial]
fn job_control_signals_follow_the_install_flags() {
    init_logs();
    install(CatchFlags::empty()).unwrap();
    assert!(!captured(Signal::SIGTSTP));
    assert!(!captured(Signal::SIGTTIN));
    assert!(!captured(Signal::SIGTTOU));
    assert!(captured(Signal::SIGINT));
    uninstall().unwrap();

    install(CatchFlags::TSTP).unwrap();
    assert!(captured(Signal::SIGTSTP));
    assert!(!captured(Signal::SIGTTIN));
    uninstall().unwrap();
}

#[test]
#[serial]
fn reinstall_resets_stale_capture_state() {
    init_logs();
    arm_inherited(Signal::SIGUSR1);
    install(CatchFlags::empty()).unwrap();

    raise(Signal::SIGUSR1).unwrap();
    // Never polled; a fresh install must not report the stale arrival.
    install(CatchFlags::empty()).unwrap();
    assert_eq!(poll(), None);

    uninstall().unwrap();
    set_default(Signal::SIGUSR1);
}
