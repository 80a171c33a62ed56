//! CURRY `.rs3` sensor file → channel table.
//!
//! The file is line oriented. Four paired markers delimit the sections that
//! matter here:
//!
//! ```text
//! NUMBERS START_LIST          one raw channel number per line
//! NUMBERS END_LIST
//! LABELS START_LIST           one channel label per line
//! LABELS END_LIST
//! NUMBERS_OTHERS START_LIST   numbers of non-EEG channels, *relative* to the
//! NUMBERS_OTHERS END_LIST     last primary number seen before this section
//! LABELS_OTHERS START_LIST
//! LABELS_OTHERS END_LIST
//! ```
//!
//! Anything after `#` on a line is a comment. The complete numbers sequence is
//! zipped with the complete labels sequence by position.
//!
//! In [`ParseMode::Lenient`] (the default) the scanner tolerates the same
//! anomalies the Curry export tooling has always tolerated: extra numbers or
//! labels are dropped, an unterminated section simply runs to EOF, stray
//! markers are skipped. Each anomaly is logged at `warn`. [`ParseMode::Strict`]
//! turns every one of them into [`EegError::Format`].
//!
//! A channel number declared twice is an error in both modes: each zipped
//! pair names one `.dat` column.
use std::path::Path;

use crate::error::{format_err, Result};

/// How the scanner reacts to malformed section structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Lenient,
    Strict,
}

// ── Channel table ─────────────────────────────────────────────────────────

/// Raw channel number → label, in file order.
///
/// Raw numbers are neither 0-based nor necessarily contiguous. Inserting a
/// number that is already present replaces its label but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTable {
    entries: Vec<(i64, String)>,
}

impl ChannelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous label for `number`.
    pub fn insert(&mut self, number: i64, name: impl Into<String>) -> Option<String> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == number) {
            Some((_, existing)) => Some(std::mem::replace(existing, name)),
            None => {
                self.entries.push((number, name));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, number: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, name)| name.as_str())
    }

    /// Column position of the first channel labelled exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(_, n)| n == name)
    }

    pub fn numbers(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries.iter().map(|(n, name)| (*n, name.as_str()))
    }
}

// ── Scanner ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    InNumbers,
    InLabels,
    InNumbersOthers,
    InLabelsOthers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Start(ScanState),
    End(ScanState),
}

impl ScanState {
    fn keyword(self) -> &'static str {
        match self {
            ScanState::Idle => "",
            ScanState::InNumbers => "NUMBERS",
            ScanState::InLabels => "LABELS",
            ScanState::InNumbersOthers => "NUMBERS_OTHERS",
            ScanState::InLabelsOthers => "LABELS_OTHERS",
        }
    }
}

fn marker(line: &str) -> Option<Marker> {
    let (keyword, tail) = line.split_once(' ')?;
    let section = match keyword {
        "NUMBERS" => ScanState::InNumbers,
        "LABELS" => ScanState::InLabels,
        "NUMBERS_OTHERS" => ScanState::InNumbersOthers,
        "LABELS_OTHERS" => ScanState::InLabelsOthers,
        _ => return None,
    };
    match tail {
        "START_LIST" => Some(Marker::Start(section)),
        "END_LIST" => Some(Marker::End(section)),
        _ => None,
    }
}

/// Trim, then drop everything from the first `#`.
fn strip_comment(raw: &str) -> &str {
    let line = raw.trim();
    match line.split_once('#') {
        Some((head, _)) => head.trim(),
        None => line,
    }
}

struct Rs3Scanner {
    mode: ParseMode,
    state: ScanState,
    numbers: Vec<i64>,
    names: Vec<String>,
    /// Last primary number at the moment `NUMBERS_OTHERS START_LIST` was seen.
    others_offset: i64,
}

impl Rs3Scanner {
    fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            state: ScanState::Idle,
            numbers: Vec::new(),
            names: Vec::new(),
            others_offset: 0,
        }
    }

    fn anomaly(&self, lineno: usize, msg: &str) -> Result<()> {
        match self.mode {
            ParseMode::Strict => Err(format_err(format!("rs3 line {lineno}: {msg}"))),
            ParseMode::Lenient => {
                log::warn!("rs3 line {lineno}: {msg}");
                Ok(())
            }
        }
    }

    fn open(&mut self, lineno: usize, section: ScanState) -> Result<()> {
        if section == ScanState::InNumbersOthers {
            self.others_offset = *self.numbers.last().ok_or_else(|| {
                format_err(format!(
                    "rs3 line {lineno}: NUMBERS_OTHERS before any channel number"
                ))
            })?;
        }
        self.state = section;
        Ok(())
    }

    fn feed(&mut self, lineno: usize, raw: &str) -> Result<()> {
        let line = strip_comment(raw);
        match (self.state, marker(line)) {
            (ScanState::Idle, Some(Marker::Start(section))) => self.open(lineno, section)?,
            (ScanState::Idle, Some(Marker::End(section))) => {
                self.anomaly(lineno, &format!("{} END_LIST outside its section", section.keyword()))?
            }
            (ScanState::Idle, None) => {}
            (current, Some(Marker::End(section))) if section == current => {
                self.state = ScanState::Idle;
            }
            (current, Some(Marker::End(section))) => self.anomaly(
                lineno,
                &format!("{} END_LIST inside {} section", section.keyword(), current.keyword()),
            )?,
            (current, Some(Marker::Start(section))) => {
                self.anomaly(
                    lineno,
                    &format!(
                        "{} START_LIST inside unterminated {} section",
                        section.keyword(),
                        current.keyword()
                    ),
                )?;
                self.open(lineno, section)?;
            }
            (current, None) => self.push(lineno, current, line)?,
        }
        Ok(())
    }

    fn push(&mut self, lineno: usize, state: ScanState, line: &str) -> Result<()> {
        match state {
            ScanState::InNumbers | ScanState::InNumbersOthers => {
                if line.is_empty() {
                    return Ok(());
                }
                let n: i64 = line.parse().map_err(|_| {
                    format_err(format!("rs3 line {lineno}: channel number {line:?} is not an integer"))
                })?;
                let n = if state == ScanState::InNumbersOthers {
                    n.checked_add(self.others_offset).ok_or_else(|| {
                        format_err(format!(
                            "rs3 line {lineno}: channel number {n} + offset {} overflows",
                            self.others_offset
                        ))
                    })?
                } else {
                    n
                };
                self.numbers.push(n);
            }
            ScanState::InLabels | ScanState::InLabelsOthers => self.names.push(line.to_string()),
            ScanState::Idle => {}
        }
        Ok(())
    }

    fn finish(self, lines: usize) -> Result<ChannelTable> {
        if self.state != ScanState::Idle {
            self.anomaly(
                lines,
                &format!("{} section not terminated before EOF", self.state.keyword()),
            )?;
        }
        if self.numbers.len() != self.names.len() {
            self.anomaly(
                lines,
                &format!(
                    "{} channel numbers but {} labels; extra entries dropped",
                    self.numbers.len(),
                    self.names.len()
                ),
            )?;
        }
        let mut table = ChannelTable::new();
        for (&number, name) in self.numbers.iter().zip(&self.names) {
            // Each pair is one `.dat` column.
            if let Some(prev) = table.get(number) {
                return Err(format_err(format!(
                    "rs3: channel number {number} declared twice ({prev:?}, {name:?})"
                )));
            }
            table.insert(number, name.as_str());
        }
        Ok(table)
    }
}

/// Parse `.rs3` text into a channel table.
pub fn parse_rs3(text: &str, mode: ParseMode) -> Result<ChannelTable> {
    let mut scanner = Rs3Scanner::new(mode);
    let mut count = 0;
    for (i, line) in text.lines().enumerate() {
        scanner.feed(i + 1, line)?;
        count = i + 1;
    }
    scanner.finish(count)
}

/// Read and parse an `.rs3` file.
pub fn read_rs3(path: &Path, mode: ParseMode) -> Result<ChannelTable> {
    let text = super::read_text(path)?;
    let table = parse_rs3(&text, mode)?;
    log::debug!("rs3: {} channels from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EegError;

    const SAMPLE: &str = "\
SENSORS START
NUMBERS START_LIST
1
2
3 # third
NUMBERS END_LIST
LABELS START_LIST
Fp1
Cz
O2
LABELS END_LIST
NUMBERS_OTHERS START_LIST
1
2
NUMBERS_OTHERS END_LIST
LABELS_OTHERS START_LIST
EOG # vertical
Trigger
LABELS_OTHERS END_LIST
";

    #[test]
    fn others_numbers_continue_primary_numbering() {
        let table = parse_rs3(SAMPLE, ParseMode::Strict).unwrap();
        let numbers: Vec<i64> = table.numbers().collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Fp1", "Cz", "O2", "EOG", "Trigger"]);
        assert_eq!(table.get(5), Some("Trigger"));
        assert_eq!(table.position("Trigger"), Some(4));
    }

    #[test]
    fn comments_are_stripped_from_markers() {
        let text = "NUMBERS START_LIST # begin\n7\nNUMBERS END_LIST#end\nLABELS START_LIST\nA\nLABELS END_LIST\n";
        let table = parse_rs3(text, ParseMode::Strict).unwrap();
        assert_eq!(table.get(7), Some("A"));
    }

    #[test]
    fn lenient_truncates_length_mismatch() {
        let text = "NUMBERS START_LIST\n1\n2\n3\nNUMBERS END_LIST\nLABELS START_LIST\nA\nB\nLABELS END_LIST\n";
        let table = parse_rs3(text, ParseMode::Lenient).unwrap();
        assert_eq!(table.len(), 2);
        assert!(matches!(parse_rs3(text, ParseMode::Strict), Err(EegError::Format(_))));
    }

    #[test]
    fn unterminated_section_is_rejected_in_strict_mode() {
        let text = "NUMBERS START_LIST\n1\nNUMBERS END_LIST\nLABELS START_LIST\nA\n";
        assert!(parse_rs3(text, ParseMode::Lenient).is_ok());
        assert!(matches!(parse_rs3(text, ParseMode::Strict), Err(EegError::Format(_))));
    }

    #[test]
    fn start_marker_inside_section_switches_in_lenient_mode() {
        let text = "NUMBERS START_LIST\n1\nLABELS START_LIST\nA\nLABELS END_LIST\n";
        let table = parse_rs3(text, ParseMode::Lenient).unwrap();
        assert_eq!(table.get(1), Some("A"));
        assert!(parse_rs3(text, ParseMode::Strict).is_err());
    }

    #[test]
    fn non_integer_number_is_format_error() {
        let text = "NUMBERS START_LIST\nx1\nNUMBERS END_LIST\n";
        assert!(matches!(parse_rs3(text, ParseMode::Lenient), Err(EegError::Format(_))));
    }

    #[test]
    fn others_without_primary_numbers_is_format_error() {
        let text = "NUMBERS_OTHERS START_LIST\n1\nNUMBERS_OTHERS END_LIST\n";
        assert!(matches!(parse_rs3(text, ParseMode::Lenient), Err(EegError::Format(_))));
    }

    #[test]
    fn duplicate_number_is_format_error_in_both_modes() {
        let text = "NUMBERS START_LIST\n1\n2\n1\nNUMBERS END_LIST\nLABELS START_LIST\nA\nB\nC\nLABELS END_LIST\n";
        for mode in [ParseMode::Lenient, ParseMode::Strict] {
            match parse_rs3(text, mode) {
                Err(EegError::Format(msg)) => assert!(msg.contains("channel number 1"), "{msg}"),
                other => panic!("expected Format error, got {other:?}"),
            }
        }
    }

    #[test]
    fn others_offset_overflow_is_format_error() {
        let text = "NUMBERS START_LIST\n9223372036854775807\nNUMBERS END_LIST\n\
                    NUMBERS_OTHERS START_LIST\n1\nNUMBERS_OTHERS END_LIST\n";
        assert!(matches!(parse_rs3(text, ParseMode::Lenient), Err(EegError::Format(_))));
    }

    #[test]
    fn table_insert_replaces_in_place() {
        let mut table = ChannelTable::new();
        table.insert(1, "A");
        table.insert(2, "B");
        assert_eq!(table.insert(1, "C"), Some("A".to_string()));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["C", "B"]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let a = parse_rs3(SAMPLE, ParseMode::Lenient).unwrap();
        let b = parse_rs3(SAMPLE, ParseMode::Lenient).unwrap();
        assert_eq!(a, b);
    }
}
