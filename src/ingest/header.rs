//! Header row detection for device exports.
//!
//! Exports start with a free-form preamble (patient name, export date, ...)
//! of variable length. The real header is the first line that carries all
//! the marker labels.

use super::columns::HEADER_MARKERS;
use crate::errors::{AppError, AppResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;
use tracing::debug;

/// Result of a successful header probe.
///
/// Holds every line read so far (preamble included) plus the un-consumed
/// rest of the source, so the content can be replayed from line 0.
#[derive(Debug)]
pub struct LocatedHeader<R> {
    /// Zero-based index of the header line.
    pub header_line: usize,
    buffered: Vec<u8>,
    rest: R,
}

impl<R: BufRead> LocatedHeader<R> {
    /// Content handle: buffered lines followed by the unread remainder.
    pub fn into_content(self) -> Chain<Cursor<Vec<u8>>, R> {
        Cursor::new(self.buffered).chain(self.rest)
    }

    /// The header line itself, as read from the source.
    pub fn header_text(&self) -> String {
        let text = String::from_utf8_lossy(&self.buffered);
        text.lines().nth(self.header_line).unwrap_or_default().to_string()
    }
}

/// True when the line contains every header marker label.
pub fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|marker| line.contains(marker))
}

/// Scan at most `max_probe_lines + 1` lines for the header row.
///
/// The header may be preceded by up to `max_probe_lines` preamble lines.
pub fn locate_header<R: BufRead>(mut reader: R, max_probe_lines: usize) -> AppResult<LocatedHeader<R>> {
    let mut buffered = Vec::new();
    let mut line = String::new();

    for index in 0..=max_probe_lines {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            debug!("Reached end of input after {} lines without a header", index);
            break;
        }
        buffered.extend_from_slice(line.as_bytes());

        if is_header_line(&line) {
            debug!("Header row found at line index {}", index);
            return Ok(LocatedHeader {
                header_line: index,
                buffered,
                rest: reader,
            });
        }
    }

    Err(AppError::HeaderNotFound {
        probed: max_probe_lines.saturating_add(1),
    })
}

/// Open a file and locate its header row.
pub fn locate_header_in_file(
    path: &Path,
    max_probe_lines: usize,
) -> AppResult<LocatedHeader<BufReader<File>>> {
    let file = File::open(path)?;
    locate_header(BufReader::new(file), max_probe_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const HEADER: &str = "Gerät,Seriennummer,Gerätezeitstempel,Aufzeichnungstyp";

    fn with_preamble(n: usize) -> String {
        let mut s = String::new();
        for i in 0..n {
            s.push_str(&format!("Glukose-Werte,Erstellt am,0{}-03-2021 10:00\n", i % 10));
        }
        s.push_str(HEADER);
        s.push('\n');
        s.push_str("FreeStyle LibreLink,SN1,18-02-2021 11:57,0\n");
        s
    }

    #[test]
    fn header_on_first_line() {
        let located = locate_header(Cursor::new(with_preamble(0)), 20).unwrap();
        assert_eq!(located.header_line, 0);
        assert_eq!(located.header_text(), HEADER);
    }

    #[test]
    fn header_after_preamble_is_found_at_its_index() {
        for h in [1, 5, 19, 20] {
            let located = locate_header(Cursor::new(with_preamble(h)), 20).unwrap();
            assert_eq!(located.header_line, h);
        }
    }

    #[test]
    fn header_beyond_probe_bound_is_not_found() {
        let err = locate_header(Cursor::new(with_preamble(21)), 20).unwrap_err();
        assert!(matches!(err, AppError::HeaderNotFound { probed: 21 }));
    }

    #[test]
    fn unbounded_probe_reports_saturated_count() {
        let err = locate_header(Cursor::new("a\nb\n"), usize::MAX).unwrap_err();
        assert!(matches!(err, AppError::HeaderNotFound { probed: usize::MAX }));
    }

    #[test]
    fn partial_marker_set_does_not_qualify() {
        let input = "Gerät,Notizen\nfoo,bar\n";
        assert!(matches!(
            locate_header(Cursor::new(input), 20),
            Err(AppError::HeaderNotFound { .. })
        ));
    }

    #[test]
    fn header_with_trailing_delimiters_qualifies() {
        assert!(is_header_line("Gerät;Seriennummer;;;\r\n"));
        assert!(!is_header_line("Seriennummer only"));
    }

    #[test]
    fn content_replays_preamble_and_rest() {
        let input = with_preamble(3);
        let located = locate_header(Cursor::new(input.clone()), 20).unwrap();
        let mut replay = String::new();
        located.into_content().read_to_string(&mut replay).unwrap();
        assert_eq!(replay, input);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            locate_header(Cursor::new(""), 20),
            Err(AppError::HeaderNotFound { .. })
        ));
    }
}
