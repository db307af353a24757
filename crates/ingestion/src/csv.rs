//! CSV replay source
//!
//! One reading per line: `timestamp,x,y,z`, integers in milliseconds and raw
//! ADC counts.
//!
//! Lines are read as raw bytes, so bytes that are not UTF-8 never end a
//! replay. Lenient parsing follows C `atoi` over each field: leading
//! whitespace is skipped, an optional sign is accepted, the longest digit
//! prefix is used and anything else reads as 0. A short line repeats its last
//! field into the missing ones (`5,7` reads as `5,7,7,7`), while a blank line
//! reads as all zeros. A negative timestamp is clamped to 0. Strict parsing
//! rejects all of these.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use contracts::{ContractError, Reading, SampleSource};
use tracing::{debug, info, warn};

use crate::metrics::IngestionMetrics;

const FIELDS: [&str; 4] = ["timestamp", "x", "y", "z"];

/// Field parsing policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// `atoi` semantics; never fails
    #[default]
    Lenient,
    /// Every field must be a complete integer; blank lines are skipped
    Strict,
}

/// Line-oriented CSV replay source
pub struct CsvReplaySource {
    source_id: String,
    reader: Option<Box<dyn BufRead + Send>>,
    buf: Vec<u8>,
    mode: ParseMode,
    line_no: u64,
    metrics: Arc<IngestionMetrics>,
}

impl std::fmt::Debug for CsvReplaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvReplaySource")
            .field("source_id", &self.source_id)
            .field("mode", &self.mode)
            .field("line_no", &self.line_no)
            .field("exhausted", &self.reader.is_none())
            .finish()
    }
}

impl CsvReplaySource {
    /// Open a CSV file
    ///
    /// In lenient mode an unreadable path is logged and yields an empty source.
    /// In strict mode it is an error.
    pub fn open(path: impl AsRef<Path>, mode: ParseMode) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let source_id = path.display().to_string();

        match File::open(path) {
            Ok(file) => {
                info!(source_id = %source_id, ?mode, "Opened CSV replay source");
                Ok(Self::from_reader(source_id, BufReader::new(file), mode))
            }
            Err(e) if mode == ParseMode::Lenient => {
                warn!(
                    source_id = %source_id,
                    error = %e,
                    "Cannot open input, replaying nothing"
                );
                Ok(Self::empty(source_id, mode))
            }
            Err(e) => Err(ContractError::source_unavailable(source_id, e.to_string())),
        }
    }

    /// Wrap any buffered reader
    pub fn from_reader<R>(source_id: impl Into<String>, reader: R, mode: ParseMode) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self {
            source_id: source_id.into(),
            reader: Some(Box::new(reader)),
            buf: Vec::new(),
            mode,
            line_no: 0,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    fn empty(source_id: String, mode: ParseMode) -> Self {
        Self {
            source_id,
            reader: None,
            buf: Vec::new(),
            mode,
            line_no: 0,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Share an externally owned metrics instance
    pub fn with_metrics(mut self, metrics: Arc<IngestionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// 1-based number of the last line read
    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    /// Read the next raw line into `buf`, without its terminator
    ///
    /// `Ok(false)` once the input is exhausted.
    fn read_line(&mut self) -> std::io::Result<bool> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };

        self.buf.clear();
        let read = loop {
            match reader.read_until(b'\n', &mut self.buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => break other?,
            }
        };
        if read == 0 {
            return Ok(false);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(true)
    }

    fn parse_lenient(&self, line: &[u8]) -> Reading {
        let mut fields = line.split(|&b| b == b',');
        let mut values = [0i64; 4];
        let mut coerced = false;
        let mut last: &[u8] = &[];

        for value in values.iter_mut() {
            match fields.next() {
                Some(field) => {
                    last = field;
                    coerced |= !is_integer(field);
                }
                None => coerced = true,
            }
            *value = atoi(last);
        }

        if coerced && !is_blank(line) {
            debug!(
                source_id = %self.source_id,
                line = self.line_no,
                "Coerced malformed fields"
            );
            self.metrics.record_parse_error(&self.source_id);
        }

        Reading {
            timestamp: u64::try_from(values[0]).unwrap_or(0),
            x: saturate_i32(values[1]),
            y: saturate_i32(values[2]),
            z: saturate_i32(values[3]),
        }
    }

    fn parse_strict(&self, line: &[u8]) -> Result<Reading, ContractError> {
        let line = std::str::from_utf8(line).map_err(|e| {
            ContractError::sample_parse(
                &self.source_id,
                self.line_no,
                "record",
                format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            )
        })?;

        let mut fields = line.split(',').map(str::trim);
        let mut next = |name: &'static str| {
            fields.next().filter(|f| !f.is_empty()).ok_or_else(|| {
                ContractError::sample_parse(&self.source_id, self.line_no, name, "missing field")
            })
        };

        let timestamp = next(FIELDS[0])?;
        let x = next(FIELDS[1])?;
        let y = next(FIELDS[2])?;
        let z = next(FIELDS[3])?;

        Ok(Reading {
            timestamp: self.strict_timestamp(timestamp)?,
            x: self.strict_axis(FIELDS[1], x)?,
            y: self.strict_axis(FIELDS[2], y)?,
            z: self.strict_axis(FIELDS[3], z)?,
        })
    }

    fn strict_timestamp(&self, field: &str) -> Result<u64, ContractError> {
        match field.parse::<u64>() {
            Ok(value) => Ok(value),
            Err(_) if field.parse::<i64>().is_ok() => Err(ContractError::sample_parse(
                &self.source_id,
                self.line_no,
                FIELDS[0],
                format!("negative timestamp '{}'", field),
            )),
            Err(e) => Err(ContractError::sample_parse(
                &self.source_id,
                self.line_no,
                FIELDS[0],
                format!("'{}': {}", field, e),
            )),
        }
    }

    fn strict_axis(&self, name: &'static str, field: &str) -> Result<i32, ContractError> {
        field.parse::<i32>().map_err(|e| {
            ContractError::sample_parse(
                &self.source_id,
                self.line_no,
                name,
                format!("'{}': {}", field, e),
            )
        })
    }
}

impl SampleSource for CsvReplaySource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn next_reading(&mut self) -> Option<Result<Reading, ContractError>> {
        loop {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => {
                    if self.reader.take().is_some() {
                        debug!(
                            source_id = %self.source_id,
                            lines = self.line_no,
                            "CSV replay exhausted"
                        );
                    }
                    return None;
                }
                Err(e) => {
                    self.reader = None;
                    if self.mode == ParseMode::Lenient {
                        warn!(source_id = %self.source_id, error = %e, "Read failed, stopping replay");
                        return None;
                    }
                    return Some(Err(ContractError::Io(e)));
                }
            }

            self.line_no += 1;
            self.metrics.record_line();

            let blank = is_blank(&self.buf);
            if blank {
                self.metrics.record_blank();
            }

            let reading = match self.mode {
                ParseMode::Lenient => Ok(self.parse_lenient(&self.buf)),
                ParseMode::Strict if blank => continue,
                ParseMode::Strict => self.parse_strict(&self.buf),
            };

            match &reading {
                Ok(_) => self.metrics.record_reading(),
                Err(_) => self.metrics.record_parse_error(&self.source_id),
            }
            return Some(reading);
        }
    }
}

/// C `isspace`, which unlike `u8::is_ascii_whitespace` includes vertical tab
fn is_c_space(b: &u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(is_c_space)
}

/// Whether a field holds exactly one integer, surrounding whitespace allowed
fn is_integer(field: &[u8]) -> bool {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .is_some()
}

/// C `atoi` over a single field, saturating instead of overflowing
fn atoi(field: &[u8]) -> i64 {
    let start = field.iter().position(|b| !is_c_space(b)).unwrap_or(field.len());
    let s = &field[start..];
    let (negative, digits) = match s.first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn lenient(text: &str) -> CsvReplaySource {
        CsvReplaySource::from_reader("test", Cursor::new(text.to_string()), ParseMode::Lenient)
    }

    fn strict(text: &str) -> CsvReplaySource {
        CsvReplaySource::from_reader("test", Cursor::new(text.to_string()), ParseMode::Strict)
    }

    fn drain(source: &mut CsvReplaySource) -> Vec<Result<Reading, ContractError>> {
        std::iter::from_fn(|| source.next_reading()).collect()
    }

    #[test]
    fn test_atoi_semantics() {
        assert_eq!(atoi(b"42"), 42);
        assert_eq!(atoi(b"  -17abc"), -17);
        assert_eq!(atoi(b"\x0b\x0c+8"), 8);
        assert_eq!(atoi(b"abc"), 0);
        assert_eq!(atoi(b""), 0);
        assert_eq!(atoi(b"-"), 0);
        assert_eq!(atoi(b"12 34"), 12);
        assert_eq!(atoi(b"\xff10"), 0);
        assert_eq!(atoi(b"10\xff"), 10);
        assert_eq!(atoi(b"99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_lenient_parses_well_formed_lines() {
        let mut source = lenient("0,1,2,-510\n2,3,-4,-512\r\n");
        let readings: Vec<Reading> = drain(&mut source).into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(
            readings,
            vec![Reading::new(0, 1, 2, -510), Reading::new(2, 3, -4, -512)]
        );
        assert_eq!(source.metrics().snapshot().parse_errors, 0);
    }

    #[test]
    fn test_lenient_short_lines_repeat_last_field() {
        let mut source = lenient("\n5,7\n5\n5,\ntimestamp,x,y,z\n-9,1,1,1\n");
        let readings: Vec<Reading> = drain(&mut source).into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(readings[0], Reading::new(0, 0, 0, 0));
        assert_eq!(readings[1], Reading::new(5, 7, 7, 7));
        assert_eq!(readings[2], Reading::new(5, 5, 5, 5));
        assert_eq!(readings[3], Reading::new(5, 0, 0, 0));
        assert_eq!(readings[4], Reading::new(0, 0, 0, 0));
        assert_eq!(readings[5], Reading::new(0, 1, 1, 1));

        let snapshot = source.metrics().snapshot();
        assert_eq!(snapshot.lines_read, 6);
        assert_eq!(snapshot.blank_lines, 1);
        assert_eq!(snapshot.readings_emitted, 6);
        // short lines and the header are coerced; the blank line is not an error
        assert_eq!(snapshot.parse_errors, 4);
    }

    #[test]
    fn test_lenient_survives_invalid_utf8() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"0,1,0,-512\n");
        bytes.extend_from_slice(b"2,\xff10,0,-512\n");
        bytes.extend_from_slice(b"4,3,0,-512\n");
        let mut source = CsvReplaySource::from_reader("test", Cursor::new(bytes), ParseMode::Lenient);
        let readings: Vec<Reading> = drain(&mut source).into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(
            readings,
            vec![
                Reading::new(0, 1, 0, -512),
                Reading::new(2, 0, 0, -512),
                Reading::new(4, 3, 0, -512),
            ]
        );
        assert_eq!(source.line_no(), 3);
        assert_eq!(source.metrics().snapshot().parse_errors, 1);
    }

    #[test]
    fn test_strict_reports_invalid_utf8_and_continues() {
        let bytes = b"0,1,0,-512\n2,\xff,0,-512\n4,3,0,-512\n".to_vec();
        let mut source = CsvReplaySource::from_reader("test", Cursor::new(bytes), ParseMode::Strict);
        let results = drain(&mut source);

        assert_eq!(results.len(), 3);
        assert!(matches!(
            &results[1],
            Err(ContractError::SampleParse { field: "record", line: 2, .. })
        ));
        assert_eq!(results[2].as_ref().unwrap().timestamp, 4);
    }

    #[test]
    fn test_lenient_axis_overflow_saturates() {
        let mut source = lenient("1,99999999999,-99999999999,0\n");
        let reading = source.next_reading().unwrap().unwrap();
        assert_eq!(reading.x, i32::MAX);
        assert_eq!(reading.y, i32::MIN);
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut source = lenient("0,1,2,3\n2,4,5,6");
        let results = drain(&mut source);
        assert_eq!(results.len(), 2);
        assert_eq!(*results[1].as_ref().unwrap(), Reading::new(2, 4, 5, 6));
    }

    #[test]
    fn test_strict_rejects_malformed_field() {
        let mut source = strict("0,1,2,3\n2,1,oops,3\n4,1,2,3\n");
        let results = drain(&mut source);

        assert!(results[0].is_ok());
        match &results[1] {
            Err(ContractError::SampleParse { line, field, .. }) => {
                assert_eq!(*line, 2);
                assert_eq!(*field, "y");
            }
            other => panic!("expected SampleParse, got {:?}", other),
        }
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_strict_rejects_missing_and_negative() {
        let mut source = strict("1,2,3\n-5,0,0,0\n");
        let results = drain(&mut source);

        assert!(matches!(
            &results[0],
            Err(ContractError::SampleParse { field: "z", line: 1, .. })
        ));
        assert!(matches!(
            &results[1],
            Err(ContractError::SampleParse { field: "timestamp", line: 2, .. })
        ));
    }

    #[test]
    fn test_strict_skips_blank_lines() {
        let mut source = strict("0,0,0,-512\n\n   \n2,0,0,-512\n");
        let results = drain(&mut source);

        assert_eq!(results.len(), 2);
        assert_eq!(results[1].as_ref().unwrap().timestamp, 2);
        assert_eq!(source.line_no(), 4);
        assert_eq!(source.metrics().snapshot().blank_lines, 2);
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,0,0,-512").unwrap();
        writeln!(file, "2,100,0,-512").unwrap();

        let mut source = CsvReplaySource::open(file.path(), ParseMode::Strict).unwrap();
        assert_eq!(drain(&mut source).len(), 2);
        assert!(source.next_reading().is_none());
    }

    #[test]
    fn test_missing_file_depends_on_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let mut source = CsvReplaySource::open(&path, ParseMode::Lenient).unwrap();
        assert!(source.next_reading().is_none());

        let err = CsvReplaySource::open(&path, ParseMode::Strict).unwrap_err();
        assert!(matches!(err, ContractError::SourceUnavailable { .. }));
    }
}
