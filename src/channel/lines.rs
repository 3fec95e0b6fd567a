//! Incremental line decoding for a child's stdout.

/// Splits a byte stream into lines.
///
/// Accepts `\n`, `\r\n` and a lone `\r` as terminators, in any mix, and
/// across chunk boundaries. Invalid UTF-8 is replaced, never rejected.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buf: Vec<u8>,
    pending_cr: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if std::mem::take(&mut self.pending_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' => lines.push(self.take_line()),
                b'\r' => {
                    lines.push(self.take_line());
                    self.pending_cr = true;
                }
                _ => self.buf.push(byte),
            }
        }
        lines
    }

    /// End of stream: return the unterminated tail, if any.
    pub fn finish(&mut self) -> Option<String> {
        self.pending_cr = false;
        (!self.buf.is_empty()).then(|| self.take_line())
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        line
    }
}
