//! Parsing for the DVC course schedule dump. Each line looks like
//!
//! ```text
//! Fall 2016\t1234\tCOMSC-210\tBurns\tMTH 10:00-11:15 ...
//! ```
//!
//! Parsing is zero-copy: a `Record` borrows every field from the line it came from.

use std::{fmt, io::BufRead, path::Path};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::{constants::*, Error, Result};

pub mod reports;

pub use reports::*;

/// Why a line was rejected. Header and blank lines are rejected too, so this is a normal
/// outcome rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected season")]
    Season,
    #[error("expected four digit year")]
    Year,
    #[error("year {0} is out of range")]
    YearOutOfRange(u16),
    #[error("expected four digit section")]
    Section,
    #[error("expected course")]
    Course,
    #[error("expected course number")]
    CourseNumber,
    #[error("expected instructor")]
    Instructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring = 0,
    Summer = 1,
    Fall = 2,
    Winter = 3,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub const fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    const fn from_bits(bits: u8) -> Season {
        match bits & 0x3 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Fall,
            _ => Season::Winter,
        }
    }

    /// Splits a leading season name off `s`.
    fn split_prefix(s: &str) -> Option<(Season, &str)> {
        Season::ALL
            .iter()
            .find_map(|&season| s.strip_prefix(season.as_str()).map(|rest| (season, rest)))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A season and year packed into one byte: the season in the low two bits and
/// `year - MIN_TERM_YEAR` in the upper six. Comparing the packed value orders terms by year
/// and then by season.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term(u8);

impl Term {
    pub fn new(season: Season, year: u16) -> Option<Term> {
        if !(MIN_TERM_YEAR..=MAX_TERM_YEAR).contains(&year) {
            return None;
        }
        Some(Term(season as u8 | ((year - MIN_TERM_YEAR) as u8) << 2))
    }

    pub const fn season(self) -> Season {
        Season::from_bits(self.0)
    }

    pub const fn year(self) -> u16 {
        (self.0 >> 2) as u16 + MIN_TERM_YEAR
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season(), self.year())
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self)
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses exactly four ASCII digits.
pub fn parse_four_digits(s: &str) -> Option<u16> {
    match s.as_bytes() {
        &[a, b, c, d] if [a, b, c, d].iter().all(u8::is_ascii_digit) => Some(
            (a - b'0') as u16 * 1000
                + (b - b'0') as u16 * 100
                + (c - b'0') as u16 * 10
                + (d - b'0') as u16,
        ),
        _ => None,
    }
}

/// One schedule line, split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub term: Term,
    pub section: u16,
    /// Subject and number together, e.g. `COMSC-210`.
    pub course: &'a str,
    pub subject: &'a str,
    pub number: &'a str,
    pub instructor: &'a str,
    /// Everything after the instructor, left unparsed.
    pub details: &'a str,
}

impl<'a> Record<'a> {
    pub fn parse(line: &'a str) -> std::result::Result<Self, ParseError> {
        let (season, rest) = Season::split_prefix(line).ok_or(ParseError::Season)?;
        let rest = rest.strip_prefix(' ').ok_or(ParseError::Year)?;
        let (year, rest) = rest.split_once('\t').ok_or(ParseError::Year)?;
        let year = parse_four_digits(year).ok_or(ParseError::Year)?;
        let term = Term::new(season, year).ok_or(ParseError::YearOutOfRange(year))?;

        let (section, rest) = rest.split_once('\t').ok_or(ParseError::Section)?;
        let section = parse_four_digits(section).ok_or(ParseError::Section)?;

        let (course, rest) = rest.split_once('\t').ok_or(ParseError::Course)?;
        let (subject, number) = course.split_once('-').ok_or(ParseError::Course)?;
        if !subject.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(ParseError::Course);
        }
        if !number.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::CourseNumber);
        }

        let (instructor, details) = rest.split_once('\t').unwrap_or((rest, ""));
        if !instructor.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(ParseError::Instructor);
        }

        Ok(Record {
            term,
            section,
            course,
            subject,
            number,
            instructor,
            details,
        })
    }

    /// A perfect hash of (term, section). Section numbers are only unique within a term, so two
    /// lines with the same key describe the same section.
    pub fn dedup_key(&self) -> usize {
        self.term.bits() as usize | (self.section as usize) << 8
    }
}

/// Streams records out of any buffered reader. Records borrow the reader's line buffer, so this
/// hands out one record at a time instead of implementing `Iterator`.
pub struct ScheduleReader<R> {
    reader: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> ScheduleReader<R> {
    pub fn new(reader: R) -> Self {
        ScheduleReader {
            reader,
            buf: String::new(),
            line: 0,
        }
    }

    /// Reads the next line. Line numbers start at 0.
    #[allow(clippy::type_complexity)]
    pub fn next_record(
        &mut self,
    ) -> Option<std::io::Result<(usize, std::result::Result<Record<'_>, ParseError>)>> {
        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => None,
            Err(e) => Some(Err(e)),
            Ok(_) => {
                let n = self.line;
                self.line += 1;
                let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
                Some(Ok((n, Record::parse(line))))
            }
        }
    }
}

/// Counts of accepted and rejected lines, gathered by streaming a reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub accepted: usize,
    pub rejected: usize,
    /// The first few rejections, as (line number, reason).
    pub first_rejections: Vec<(usize, String)>,
}

pub fn parse_stats<R: BufRead>(reader: R) -> Result<ParseStats> {
    let mut reader = ScheduleReader::new(reader);
    let mut stats = ParseStats::default();
    while let Some(next) = reader.next_record() {
        match next? {
            (_, Ok(_)) => stats.accepted += 1,
            (n, Err(reason)) => {
                log::trace!("line {}: {}", n, reason);
                stats.rejected += 1;
                if stats.first_rejections.len() < 10 {
                    stats.first_rejections.push((n, reason.to_string()));
                }
            }
        }
    }
    Ok(stats)
}

/// A schedule file held in memory. Reports borrow from it.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    text: String,
}

impl Schedule {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        log::info!("loaded '{}' ({} bytes)", path.display(), text.len());
        Ok(Schedule { text })
    }

    pub fn parse_str(text: &str) -> Self {
        Schedule {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every line with its number and parse result.
    pub fn lines(&self) -> impl Iterator<Item = (usize, std::result::Result<Record<'_>, ParseError>)> {
        self.text.lines().enumerate().map(|(n, l)| (n, Record::parse(l)))
    }

    /// The lines that parse. Rejected lines are logged and skipped.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.lines().filter_map(|(n, r)| {
            r.map_err(|reason| log::trace!("skipping line {}: {}", n, reason))
                .ok()
        })
    }

    /// Parses every line, allowing only the header (line 0) and blank lines to be rejected.
    pub fn strict_records(&self) -> Result<Vec<Record<'_>>> {
        let mut records = Vec::new();
        for (n, line) in self.text.lines().enumerate() {
            match Record::parse(line) {
                Ok(record) => records.push(record),
                Err(_) if n == 0 || line.trim().is_empty() => continue,
                Err(reason) => return Err(Error::Schedule { line: n, reason }),
            }
        }
        Ok(records)
    }
}
