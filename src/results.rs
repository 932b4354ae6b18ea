//! JSON Lines result decoding and ranking.
//!
//! Each line of the result entry is one [`DocumentResult`]. Lines are read
//! with a hard length ceiling; a longer line is an error rather than being
//! split. Blank lines are skipped. The first malformed line stops decoding.

use std::io::{BufRead, BufReader, Read, Write};

use tracing::debug;

use crate::telemetry;
use crate::types::DocumentResult;
use crate::{HuginnError, Result};

/// Default line-length ceiling (1 MiB).
pub const DEFAULT_LINE_LIMIT: usize = 1024 * 1024;

/// Iterator over the documents in a JSON Lines stream.
///
/// Yields at most one error, after which iteration ends.
pub struct ResultLines<R> {
    reader: BufReader<R>,
    limit: usize,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> ResultLines<R> {
    pub fn new(reader: R) -> Self {
        Self::with_line_limit(reader, DEFAULT_LINE_LIMIT)
    }

    /// Read lines of at most `limit` bytes, excluding the line terminator.
    pub fn with_line_limit(reader: R, limit: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(limit.clamp(1, DEFAULT_LINE_LIMIT), reader),
            limit,
            line: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    fn next_document(&mut self) -> Result<Option<DocumentResult>> {
        loop {
            self.buf.clear();
            self.line += 1;

            // Room for a CRLF terminator, so one byte over the limit is
            // still observable.
            let read = (&mut self.reader)
                .take((self.limit as u64).saturating_add(2))
                .read_until(b'\n', &mut self.buf)
                .map_err(HuginnError::Archive)?;
            if read == 0 {
                return Ok(None);
            }

            let mut content = self.buf.as_slice();
            if let Some(rest) = content.strip_suffix(b"\n") {
                content = rest.strip_suffix(b"\r").unwrap_or(rest);
            }
            if content.len() > self.limit {
                return Err(HuginnError::LineTooLong {
                    line: self.line,
                    limit: self.limit,
                });
            }
            if content.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            return serde_json::from_slice(content)
                .map(Some)
                .map_err(|source| HuginnError::Decode {
                    line: self.line,
                    source,
                });
        }
    }
}

impl<R: Read> Iterator for ResultLines<R> {
    type Item = Result<DocumentResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_document() {
            Ok(Some(doc)) => Some(Ok(doc)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Counts from a report pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub documents: usize,
    pub entities_printed: usize,
}

/// Write one document: a blank line, `File: <name>`, then the top `limit`
/// entities by descending score.
///
/// Returns the number of entity lines written.
pub fn write_document<W: Write>(
    out: &mut W,
    doc: &mut DocumentResult,
    limit: usize,
) -> Result<usize> {
    writeln!(out).map_err(HuginnError::Report)?;
    writeln!(out, "File: {}", doc.file).map_err(HuginnError::Report)?;

    let top = doc.top(limit);
    for entity in top {
        writeln!(out, "{entity}").map_err(HuginnError::Report)?;
    }
    Ok(top.len())
}

/// Decode every document in `reader` and write its ranked entities.
pub fn write_report<R: Read, W: Write>(
    reader: R,
    limit: usize,
    line_limit: usize,
    out: &mut W,
) -> Result<ReportStats> {
    let mut stats = ReportStats::default();

    for doc in ResultLines::with_line_limit(reader, line_limit) {
        let mut doc = doc?;
        let printed = write_document(out, &mut doc, limit)?;
        debug!(file = %doc.file, entities = doc.entities.len(), printed, "document ranked");

        metrics::counter!(telemetry::DOCUMENTS_TOTAL).increment(1);
        metrics::counter!(telemetry::ENTITIES_PRINTED_TOTAL).increment(printed as u64);
        stats.documents += 1;
        stats.entities_printed += printed;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines() {
        let input = "\n{\"File\":\"a\",\"Entities\":[]}\n\n{\"File\":\"b\",\"Entities\":[]}\n";
        let files: Vec<_> = ResultLines::new(input.as_bytes())
            .map(|d| d.unwrap().file)
            .collect();
        assert_eq!(files, ["a", "b"]);
    }

    #[test]
    fn accepts_crlf_and_missing_final_newline() {
        let input = "{\"File\":\"a\",\"Entities\":[]}\r\n{\"File\":\"b\",\"Entities\":[]}";
        assert_eq!(ResultLines::new(input.as_bytes()).count(), 2);
    }

    #[test]
    fn line_at_limit_is_accepted() {
        let line = r#"{"File":"a","Entities":[]}"#;
        let mut lines = ResultLines::with_line_limit(line.as_bytes(), line.len());
        assert_eq!(lines.next().unwrap().unwrap().file, "a");
        assert!(lines.next().is_none());
    }

    #[test]
    fn line_over_limit_is_rejected() {
        let line = r#"{"File":"a","Entities":[]}"#;
        let mut lines = ResultLines::with_line_limit(line.as_bytes(), line.len() - 1);
        let err = lines.next().unwrap().unwrap_err();
        assert!(matches!(err, HuginnError::LineTooLong { line: 1, .. }));
        assert!(lines.next().is_none());
    }

    #[test]
    fn unbounded_line_limit_reads_normally() {
        let input = "{\"File\":\"a\",\"Entities\":[]}\n";
        let mut lines = ResultLines::with_line_limit(input.as_bytes(), usize::MAX);
        assert_eq!(lines.next().unwrap().unwrap().file, "a");
        assert!(lines.next().is_none());
    }

    #[test]
    fn decode_error_reports_line_number() {
        let input = "{\"File\":\"a\",\"Entities\":[]}\nnot json\n{\"File\":\"c\"}\n";
        let results: Vec<_> = ResultLines::new(input.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(HuginnError::Decode { line: 2, .. })
        ));
    }
}
