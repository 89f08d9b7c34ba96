/*!
 * Platform Backends
 * One internal interface over two signal APIs, chosen at build time
 */

// The backend is fixed when the crate is compiled so that nothing on a
// handler-safe path ever branches on which API is in use. The default
// backend is sigaction with restartable, non-reinstalling handlers; the
// `legacy-handlers` feature selects the old signal() API for platforms
// without the structured machinery.

#[cfg(not(feature = "legacy-handlers"))]
mod sigaction;
#[cfg(not(feature = "legacy-handlers"))]
pub(crate) use sigaction::{arm, probe, reinstall, restore, Saved};

#[cfg(feature = "legacy-handlers")]
mod legacy;
#[cfg(feature = "legacy-handlers")]
pub(crate) use legacy::{arm, probe, reinstall, restore, Saved};
