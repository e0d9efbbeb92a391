//! Line framing for the command socket.
//!
//! Reads may split a command across packets or carry several commands at once.
//! [`LineFramer`] buffers bytes and yields one normalised command per `\n`.
//! Lines that are not valid UTF-8 or exceed the configured length are dropped and
//! the framer resynchronises at the next newline.

use tracing::warn;

#[derive(Debug)]
pub struct LineFramer {
    buffer: Vec<u8>,
    max_line_bytes: usize,
    discarding: bool,
}

impl LineFramer {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_bytes,
            discarding: false,
        }
    }

    /// Feed received bytes, returning every command completed by them.
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for chunk in data.split_inclusive(|b| *b == b'\n') {
            let complete = chunk.last() == Some(&b'\n');
            let body = if complete {
                &chunk[..chunk.len() - 1]
            } else {
                chunk
            };

            if self.discarding {
                self.discarding = !complete;
                continue;
            }

            self.buffer.extend_from_slice(body);
            if self.buffer.len() > self.max_line_bytes {
                warn!(
                    bytes = self.buffer.len(),
                    limit = self.max_line_bytes,
                    "Discarding over-long command line"
                );
                self.buffer.clear();
                self.discarding = !complete;
                continue;
            }

            if complete {
                let raw = std::mem::take(&mut self.buffer);
                lines.extend(decode(raw));
            }
        }

        lines
    }

    /// Flush a trailing command that was never newline-terminated.
    pub fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buffer);
        if std::mem::take(&mut self.discarding) {
            return None;
        }
        decode(raw)
    }

    /// Bytes held for an incomplete line.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn decode(raw: Vec<u8>) -> Option<String> {
    match String::from_utf8(raw) {
        Ok(text) => {
            let command = text.trim().to_ascii_uppercase();
            (!command.is_empty()).then_some(command)
        }
        Err(e) => {
            warn!(error = %e, "Discarding command line with invalid UTF-8");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_stacked_commands() {
        let mut framer = LineFramer::new(64);
        assert_eq!(
            framer.push(b"*rst\nc1:outp?\r\n"),
            vec!["*RST".to_string(), "C1:OUTP?".to_string()]
        );
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn joins_partial_reads() {
        let mut framer = LineFramer::new(64);
        assert!(framer.push(b"C1:BSWV ").is_empty());
        assert_eq!(framer.push(b"FRQ,12\n"), vec!["C1:BSWV FRQ,12".to_string()]);
    }

    #[test]
    fn skips_blank_lines() {
        let mut framer = LineFramer::new(64);
        assert_eq!(framer.push(b"\n  \n*IDN?\n"), vec!["*IDN?".to_string()]);
    }

    #[test]
    fn resynchronises_after_invalid_utf8() {
        let mut framer = LineFramer::new(64);
        assert_eq!(
            framer.push(b"\xff\xfe\n*OPC?\n"),
            vec!["*OPC?".to_string()]
        );
    }

    #[test]
    fn drops_over_long_lines_until_newline() {
        let mut framer = LineFramer::new(8);
        assert!(framer.push(b"0123456789").is_empty());
        assert!(framer.push(b"more junk").is_empty());
        assert_eq!(framer.push(b"\nBUZZ?\n"), vec!["BUZZ?".to_string()]);
    }

    #[test]
    fn finish_flushes_unterminated_command() {
        let mut framer = LineFramer::new(64);
        assert!(framer.push(b"*idn?").is_empty());
        assert_eq!(framer.finish(), Some("*IDN?".to_string()));
        assert_eq!(framer.finish(), None);
    }
}
