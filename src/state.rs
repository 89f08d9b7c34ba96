/*!
 * Saved Dispositions
 * What was installed before us, and which signals we actually caught
 */

use nix::sys::signal::SigSet;
use parking_lot::Mutex;

use crate::backend;
use crate::catalog::SLOT_LIMIT;

/// Populated once per `install`, before any capturing handler is armed, so
/// nothing here is ever mutated concurrently with handler execution. The
/// handler itself never takes this lock.
pub(crate) struct Registration {
    /// The subset of the catalog actually intercepted. A signal an ancestor
    /// explicitly ignored is not a member.
    pub(crate) caught: SigSet,
    /// Prior disposition per caught signal, indexed by slot. Restored by
    /// deliver and uninstall but never cleared, so uninstall stays
    /// idempotent.
    pub(crate) saved: [Option<backend::Saved>; SLOT_LIMIT],
}

/// `None` until the first successful `install`.
pub(crate) static REGISTRATION: Mutex<Option<Registration>> = Mutex::new(None);
