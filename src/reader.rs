//! Candidate input: reads the list once, before the UI starts.

use std::io::BufRead;

use color_eyre::eyre::Result;

/// How candidates are delimited in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOption {
    line_ending: u8,
}

impl Default for ReaderOption {
    fn default() -> Self {
        Self { line_ending: b'\n' }
    }
}

impl ReaderOption {
    /// Splits on NUL instead of newlines when `enable` is set
    pub fn read0(mut self, enable: bool) -> Self {
        self.line_ending = if enable { b'\0' } else { b'\n' };
        self
    }

    /// The delimiter byte
    pub fn line_ending(&self) -> u8 {
        self.line_ending
    }
}

/// Reads every candidate from `source`.
///
/// Trailing `\r\n` or delimiter bytes are stripped, invalid UTF-8 is replaced
/// lossily. Empty lines are kept: they are valid (if odd) candidates.
pub fn read_candidates(mut source: impl BufRead, option: ReaderOption) -> Result<Vec<String>> {
    let mut candidates = Vec::new();
    let mut buffer = Vec::with_capacity(1024);
    loop {
        buffer.clear();
        if source.read_until(option.line_ending, &mut buffer)? == 0 {
            break;
        }
        if buffer.ends_with(b"\r\n") {
            buffer.truncate(buffer.len() - 2);
        } else if buffer.ends_with(&[option.line_ending]) {
            buffer.pop();
        }
        let line = String::from_utf8_lossy(&buffer).into_owned();
        trace!("got candidate {line:?} with index {}", candidates.len());
        candidates.push(line);
    }
    debug!("read {} candidates", candidates.len());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines() {
        let res = read_candidates(Cursor::new("apple\nbanana\r\ngrape"), ReaderOption::default()).unwrap();
        assert_eq!(res, vec!["apple", "banana", "grape"]);
    }

    #[test]
    fn keeps_inner_empty_lines() {
        let res = read_candidates(Cursor::new("a\n\nb\n"), ReaderOption::default()).unwrap();
        assert_eq!(res, vec!["a", "", "b"]);
    }

    #[test]
    fn reads_nul_delimited() {
        let res = read_candidates(Cursor::new("one\ntwo\0three\0"), ReaderOption::default().read0(true)).unwrap();
        assert_eq!(res, vec!["one\ntwo", "three"]);
    }

    #[test]
    fn empty_input() {
        let res = read_candidates(Cursor::new(""), ReaderOption::default()).unwrap();
        assert!(res.is_empty());
    }
}
