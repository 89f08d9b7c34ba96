/*!
 * Synchronous Signal Handling
 * Catch asynchronous signals as they arrive, replay their default action at
 * a point the program chooses
 *
 * Asynchronous signals may fire between any two instructions, which makes
 * them a terrible place to do real work: a handler that touches shared
 * state corrupts whatever the interrupted code was halfway through
 * updating. This crate confines the handler to an async-signal-safe
 * minimum (bump a counter, set a flag) and moves every decision into
 * synchronous code the program runs when it is ready.
 *
 * The flow is cooperative. [`install`] swaps a capturing handler in for
 * every catchable signal that was not already ignored on purpose. The
 * program then calls [`poll`] from its hot loops at bounded intervals; when
 * a signal is reported, the program quiesces any external state a signal
 * would otherwise corrupt (half-emitted terminal colors, say) and calls
 * [`deliver`], which restores the original disposition and re-raises so
 * the process terminates, stops, or runs an inherited handler exactly as
 * if nothing had been intercepted. [`uninstall`] puts everything back at
 * exit.
 *
 * ```no_run
 * use syncsig::{install, poll, deliver, uninstall, CatchFlags};
 *
 * # fn reset_terminal_state() {}
 * # fn produce_some_output() -> bool { false }
 * install(CatchFlags::TSTP)?;
 * while produce_some_output() {
 *     if let Some(sig) = poll() {
 *         reset_terminal_state();
 *         deliver(sig)?; // returning means: resume where we stopped
 *     }
 * }
 * uninstall()?;
 * if let Some(sig) = poll() {
 *     reset_terminal_state();
 *     deliver(sig)?;
 * }
 * # Ok::<(), syncsig::SignalError>(())
 * ```
 *
 * Single-threaded by design: masking is process-wide, and the capture state
 * is process-global. Signals whose default action is a failure diagnostic
 * (abort, segfault class) are out of scope and never touched.
 */

mod backend;
mod capture;
mod deliver;
mod installer;
mod poller;
mod state;

pub mod catalog;
pub mod errors;
pub mod output;

// Re-export public API
pub use catalog::{CatchFlags, CATCHABLE};
pub use deliver::deliver;
pub use errors::{SignalError, SignalResult};
pub use installer::{captured, install, uninstall};
pub use nix::sys::signal::Signal;
pub use poller::poll;
