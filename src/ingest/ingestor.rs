//! Chunked ingestion of a located device export.

use super::columns::{ColumnIndex, Field};
use super::record::{decode_record, is_blank_record};
use super::sink::ReadingSink;
use crate::errors::{AppError, AppResult};
use crate::models::reading::Reading;
use chrono_tz::Tz;
use csv::StringRecord;
use std::io::BufRead;
use tracing::{debug, info, warn};

/// Upper bound on the rows reserved up front for a batch.
const BATCH_PREALLOC: usize = 1024;

/// Parameters of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Number of readings per flush; must be positive.
    pub chunk_size: usize,
    pub timezone: Tz,
    pub delimiter: u8,
}

impl IngestOptions {
    pub fn new(chunk_size: usize, timezone: Tz) -> Self {
        Self {
            chunk_size,
            timezone,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Decode `content` from its header line on and push readings into `sink`.
///
/// `content` must start at line 0 of the source; the first `header_line`
/// lines are skipped. Readings are flushed every `chunk_size` rows and once
/// more at the end. The first error aborts the run: the batch being built is
/// dropped, batches already flushed stay in the sink.
///
/// Returns the number of readings handed to the sink.
pub fn ingest<R: BufRead, S: ReadingSink>(
    mut content: R,
    header_line: usize,
    user_id: &str,
    options: &IngestOptions,
    sink: &mut S,
) -> AppResult<usize> {
    if options.chunk_size == 0 {
        return Err(AppError::Config("chunk size must be greater than 0".into()));
    }

    skip_lines(&mut content, header_line)?;

    let header_line_no = header_line as u64 + 1;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers = reader
        .headers()
        .map_err(|e| AppError::decode(header_line_no, "<header>", e.to_string()))?
        .clone();
    let index = ColumnIndex::from_headers(&headers, header_line_no)?;
    debug!("Mapped {} known columns out of {}", index.len(), headers.len());
    if !index.has_column(Field::GlucoseHistoryMgDl) && !index.has_column(Field::GlucoseScanMgDl) {
        warn!("Header on line {} has no glucose column", header_line_no);
    }

    // chunk_size bounds memory, it is not a reservation
    let mut batch: Vec<Reading> = Vec::with_capacity(options.chunk_size.min(BATCH_PREALLOC));
    let mut total = 0usize;
    let mut chunks = 0usize;
    let mut record = StringRecord::new();

    loop {
        let more = reader.read_record(&mut record).map_err(|e| {
            let line = e
                .position()
                .map(|p| p.line() + header_line as u64)
                .unwrap_or(0);
            AppError::decode(line, "<record>", e.to_string())
        })?;
        if !more {
            break;
        }
        if is_blank_record(&record) {
            continue;
        }

        let line = record
            .position()
            .map(|p| p.line() + header_line as u64)
            .unwrap_or(0);
        batch.push(decode_record(
            &record,
            &index,
            line,
            user_id,
            options.timezone,
        )?);

        if batch.len() >= options.chunk_size {
            total += flush(sink, &mut batch)?;
            chunks += 1;
            debug!("Flushed chunk #{} ({} readings so far)", chunks, total);
        }
    }

    if !batch.is_empty() {
        total += flush(sink, &mut batch)?;
        chunks += 1;
        debug!("Flushed final chunk #{} ({} readings)", chunks, total);
    }

    info!(
        "Ingested {} readings for user '{}' in {} chunk(s)",
        total, user_id, chunks
    );
    Ok(total)
}

fn flush<S: ReadingSink>(sink: &mut S, batch: &mut Vec<Reading>) -> AppResult<usize> {
    sink.write_batch(batch)?;
    let n = batch.len();
    batch.clear();
    Ok(n)
}

/// Discard `n` leading lines; the csv reader starts right at the header.
fn skip_lines<R: BufRead>(content: &mut R, n: usize) -> AppResult<()> {
    let mut scratch = Vec::new();
    for _ in 0..n {
        scratch.clear();
        if content.read_until(b'\n', &mut scratch)? == 0 {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;
    use std::io::Cursor;

    const HEADER: &str = "Gerät,Seriennummer,Gerätezeitstempel,Aufzeichnungstyp,Glukosewert-Verlauf mg/dL,Glukose-Scan mg/dL";

    fn rows(n: usize) -> String {
        let mut s = format!("Patient,Max\nExportiert,heute\n{}\n", HEADER);
        for i in 0..n {
            s.push_str(&format!("Libre,SN,18-02-2021 {:02}:{:02},0,{},\n", (i / 60) % 24, i % 60, 70 + i));
        }
        s
    }

    #[test]
    fn skips_preamble_before_parsing() {
        let mut sink: Vec<Reading> = Vec::new();
        let n = ingest(
            Cursor::new(rows(3)),
            2,
            "u",
            &IngestOptions::new(10, Berlin),
            &mut sink,
        )
        .unwrap();
        assert_eq!(n, 3);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink[2].glucose_history_mg_dl, Some(72));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let mut sink: Vec<Reading> = Vec::new();
        let err = ingest(
            Cursor::new(rows(1)),
            2,
            "u",
            &IngestOptions::new(0, Berlin),
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn semicolon_delimited_files() {
        let input = format!(
            "{}\nLibre;SN;18-02-2021 11:57;1;;120\n",
            HEADER.replace(',', ";")
        );
        let mut sink: Vec<Reading> = Vec::new();
        ingest(
            Cursor::new(input),
            0,
            "u",
            &IngestOptions::new(10, Berlin).with_delimiter(b';'),
            &mut sink,
        )
        .unwrap();
        assert_eq!(sink[0].glucose_mg_dl(), Some(120));
    }

    #[test]
    fn decode_error_line_is_absolute() {
        let mut input = rows(2);
        input.push_str("Libre,SN,not a date,0,80,\n");
        let mut sink: Vec<Reading> = Vec::new();
        let err = ingest(
            Cursor::new(input),
            2,
            "u",
            &IngestOptions::new(10, Berlin),
            &mut sink,
        )
        .unwrap_err();
        // 2 preamble lines + header + 2 rows → the bad row is line 6
        assert!(matches!(err, AppError::Decode { line: 6, .. }), "{:?}", err);
    }

    #[test]
    fn blank_trailing_rows_are_ignored() {
        let mut input = rows(1);
        input.push_str(",,,,,\n\n");
        let mut sink: Vec<Reading> = Vec::new();
        let n = ingest(
            Cursor::new(input),
            2,
            "u",
            &IngestOptions::new(10, Berlin),
            &mut sink,
        )
        .unwrap();
        assert_eq!(n, 1);
    }
}
