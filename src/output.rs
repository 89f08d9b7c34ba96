/*!
 * Output Integration
 * Bounded-interval signal checkpoints for long-running output loops
 */

use std::io::{self, Write};

use crate::deliver::deliver;
use crate::errors::SignalResult;
use crate::poller::poll;

/// How many bytes an output loop may emit between signal checkpoints.
pub const CHECKPOINT_BYTES: usize = 1024;

/// Drain every pending signal, running QUIESCE before each delivery.
///
/// QUIESCE is the caller's "reset terminal state" hook: it must leave no
/// half-emitted escape sequence behind, because the delivery that follows
/// may terminate or suspend the process. A delivery that returns means the
/// signal did not kill us; draining continues, and once this function
/// returns the caller must re-establish any color state before producing
/// more output.
pub fn process_pending<F>(mut quiesce: F) -> SignalResult<()>
where
    F: FnMut(),
{
    while let Some(sig) = poll() {
        quiesce();
        deliver(sig)?;
    }
    Ok(())
}

/// A writer that checkpoints for signals every [`CHECKPOINT_BYTES`] bytes.
///
/// Wraps any [`Write`] so that a loop producing unboundedly long output
/// still polls at bounded intervals. At each checkpoint the quiesce hook
/// runs against the inner writer (emit the color-reset sequence), output is
/// flushed, and pending signals are delivered. A delivery that returns is
/// "safe to resume exactly where output stopped": the next byte goes out as
/// if nothing happened, though the caller's color state has been reset.
pub struct GuardedWriter<W, F> {
    inner: W,
    quiesce: F,
    since_checkpoint: usize,
}

impl<W, F> GuardedWriter<W, F>
where
    W: Write,
    F: FnMut(&mut W) -> io::Result<()>,
{
    pub fn new(inner: W, quiesce: F) -> Self {
        Self {
            inner,
            quiesce,
            since_checkpoint: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn checkpoint(&mut self) -> io::Result<()> {
        while let Some(sig) = poll() {
            (self.quiesce)(&mut self.inner)?;
            self.inner.flush()?;
            deliver(sig).map_err(io::Error::other)?;
        }
        Ok(())
    }
}

impl<W, F> Write for GuardedWriter<W, F>
where
    W: Write,
    F: FnMut(&mut W) -> io::Result<()>,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut consumed = 0;
        while consumed < buf.len() {
            if self.since_checkpoint >= CHECKPOINT_BYTES {
                self.checkpoint()?;
                self.since_checkpoint = 0;
            }
            let room = CHECKPOINT_BYTES - self.since_checkpoint;
            let take = room.min(buf.len() - consumed);
            let n = self.inner.write(&buf[consumed..consumed + take])?;
            if n == 0 {
                break;
            }
            self.since_checkpoint += n;
            consumed += n;
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture;
    use crate::catalog::CatchFlags;
    use crate::deliver::RAISE_TAP;
    use crate::installer::{install, uninstall};
    use nix::sys::signal::Signal;
    use serial_test::serial;

    /// A sink that remembers at which byte offsets it was quiesced.
    #[derive(Default)]
    struct RecordingSink {
        bytes: Vec<u8>,
        resets_at: Vec<usize>,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    #[serial]
    fn terminate_mid_write_pauses_at_the_chunk_boundary() {
        install(CatchFlags::empty()).unwrap();
        *RAISE_TAP.lock() = Some(Vec::new());

        // A terminate-class signal lands before the write begins; the
        // writer must notice it at the first checkpoint, quiesce, and only
        // then deliver.
        capture::record(Signal::SIGTERM);

        let sink = RecordingSink::default();
        let mut w = GuardedWriter::new(sink, |sink: &mut RecordingSink| {
            let at = sink.bytes.len();
            sink.resets_at.push(at);
            Ok(())
        });

        w.write_all(&[b'x'; 2000]).unwrap();

        let raised = RAISE_TAP.lock().take().unwrap();
        let sink = w.into_inner();
        assert_eq!(sink.bytes.len(), 2000);
        assert_eq!(sink.resets_at, vec![1024], "quiesce must run at the boundary");
        assert_eq!(raised, vec![Signal::SIGTERM]);

        uninstall().unwrap();
    }

    #[test]
    #[serial]
    fn quiet_writes_never_checkpoint_or_deliver() {
        install(CatchFlags::empty()).unwrap();
        *RAISE_TAP.lock() = Some(Vec::new());

        let mut w = GuardedWriter::new(RecordingSink::default(), |sink: &mut RecordingSink| {
            sink.resets_at.push(sink.bytes.len());
            Ok(())
        });
        w.write_all(&[b'y'; 5000]).unwrap();

        let raised = RAISE_TAP.lock().take().unwrap();
        let sink = w.into_inner();
        assert_eq!(sink.bytes.len(), 5000);
        assert!(sink.resets_at.is_empty());
        assert!(raised.is_empty());

        uninstall().unwrap();
    }

    #[test]
    #[serial]
    fn process_pending_quiesces_before_every_delivery() {
        install(CatchFlags::empty()).unwrap();
        *RAISE_TAP.lock() = Some(Vec::new());

        capture::record(Signal::SIGINT);
        capture::record(Signal::SIGTERM);

        let mut quiesced = 0;
        process_pending(|| quiesced += 1).unwrap();

        let raised = RAISE_TAP.lock().take().unwrap();
        assert_eq!(quiesced, 2);
        assert_eq!(raised, vec![Signal::SIGINT, Signal::SIGTERM]);

        uninstall().unwrap();
    }
}
