//! Writer wrapper that masks contact data in formatted log lines.

use std::io;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::masking::ContactMasker;

/// Wraps a [`MakeWriter`] so every line is passed through a [`ContactMasker`]
/// before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct MaskingWriter<M> {
    inner: M,
    masker: Arc<ContactMasker>,
}

impl<M> MaskingWriter<M> {
    /// Wraps `inner`.
    pub fn new(inner: M, masker: Arc<ContactMasker>) -> Self {
        Self { inner, masker }
    }
}

impl<'a, M> MakeWriter<'a> for MaskingWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = MaskedWrite<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        MaskedWrite {
            inner: self.inner.make_writer(),
            masker: Arc::clone(&self.masker),
        }
    }
}

/// Writer handed out by [`MaskingWriter`].
#[derive(Debug)]
pub struct MaskedWrite<W> {
    inner: W,
    masker: Arc<ContactMasker>,
}

impl<W: io::Write> io::Write for MaskedWrite<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // the fmt layer hands over one complete event per call
        let text = String::from_utf8_lossy(buf);
        let masked = self.masker.mask_string(&text);
        self.inner.write_all(masked.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_are_masked() {
        let sink = Captured::default();
        let captured = sink.clone();
        let writer = MaskingWriter::new(move || sink.clone(), Arc::new(ContactMasker::new()));

        let line = b"notification sent to jane.doe@example.com\n";
        let written = writer.make_writer().write(line).unwrap();
        assert_eq!(written, line.len());

        let out = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert!(!out.contains("jane.doe@example.com"));
        assert!(out.ends_with("@example.com\n"));
    }
}
