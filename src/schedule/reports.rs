use std::collections::BTreeMap;

use serde::Serialize;

use super::{Record, Term};
use crate::{
    assoc::{AssociativeArray, ListMap},
    bitset::Bitset,
    constants::*,
    hashtable::HashTable,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCount<'a> {
    pub subject: &'a str,
    pub sections: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectReport<'a> {
    /// Sorted by subject name.
    pub subjects: Vec<SubjectCount<'a>>,
    pub total_sections: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

/// Counts sections per subject. Identical lines are only counted once.
pub fn count_subjects(text: &str) -> SubjectReport<'_> {
    let mut seen: HashTable<&str, ()> = HashTable::default();
    let mut subjects: HashTable<&str, usize> = HashTable::default();
    let mut report = SubjectReport::default();

    for line in text.lines() {
        if !seen.insert(line, ()) {
            report.duplicates += 1;
            continue;
        }
        match Record::parse(line) {
            Ok(record) => *subjects.entry(record.subject) += 1,
            Err(_) => report.rejected += 1,
        }
    }
    log::debug!("subject table: {}", subjects);

    report.subjects = subjects
        .into_entries()
        .into_iter()
        .map(|(subject, sections)| SubjectCount { subject, sections })
        .collect();
    report.subjects.sort_unstable_by(|a, b| a.subject.cmp(b.subject));
    report.total_sections = report.subjects.iter().map(|s| s.sections).sum();
    report
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCount<'a> {
    pub course: &'a str,
    pub sections: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCourses<'a> {
    pub subject: &'a str,
    /// Sorted by course name.
    pub courses: Vec<CourseCount<'a>>,
}

// Generic so the counting doesn't care which associative array backs it.
fn tally<'a, S, C>(subjects: &mut S, record: &Record<'a>)
where
    S: AssociativeArray<&'a str, C>,
    C: AssociativeArray<&'a str, usize> + Default,
{
    *subjects.entry(record.subject).entry(record.course) += 1;
}

/// Counts sections per course, grouped by subject. A (term, section) pair that shows up more
/// than once is only counted the first time.
pub fn count_courses(text: &str) -> Vec<SubjectCourses<'_>> {
    let mut dedup = Bitset::with_len(DEDUP_BITSET_LEN);
    let mut subjects: HashTable<&str, ListMap<&str, usize>> = HashTable::default();
    let mut duplicates = 0;

    for record in text.lines().filter_map(|l| Record::parse(l).ok()) {
        if !dedup.insert(record.dedup_key()) {
            duplicates += 1;
            continue;
        }
        tally(&mut subjects, &record);
    }
    log::debug!(
        "{} subjects, removed {} duplicates",
        subjects.len(),
        duplicates
    );

    let mut result: Vec<SubjectCourses> = subjects
        .iter()
        .map(|(&subject, courses)| {
            let mut courses: Vec<CourseCount> = courses
                .iter()
                .map(|(&course, &sections)| CourseCount { course, sections })
                .collect();
            courses.sort_unstable_by(|a, b| a.course.cmp(b.course));
            SubjectCourses { subject, courses }
        })
        .collect();
    result.sort_unstable_by(|a, b| a.subject.cmp(b.subject));
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict<'a> {
    pub term: Term,
    pub section: u16,
    pub course: &'a str,
    /// The course that claimed the section first.
    pub conflicts_with: &'a str,
}

/// Finds section numbers reused by different courses within the same term.
pub fn find_conflicts(text: &str) -> Vec<Conflict<'_>> {
    let mut owners: HashTable<usize, &str> = HashTable::default();
    let mut conflicts = Vec::new();

    for record in text.lines().filter_map(|l| Record::parse(l).ok()) {
        match owners.get(&record.dedup_key()) {
            Some(&owner) if owner != record.course => {
                log::warn!(
                    "course conflict: {} ({}) conflicts with {} in {}",
                    record.course,
                    record.section,
                    owner,
                    record.term
                );
                conflicts.push(Conflict {
                    term: record.term,
                    section: record.section,
                    course: record.course,
                    conflicts_with: owner,
                });
            }
            Some(_) => {}
            None => {
                owners.insert(record.dedup_key(), record.course);
            }
        }
    }
    conflicts
}

/// Case-insensitive subsequence match: every character of `query` appears in `s` in order.
pub fn fuzzy_match(s: &str, query: &str) -> bool {
    let mut haystack = s.chars().map(|c| c.to_ascii_uppercase());
    query
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .all(|q| haystack.any(|c| c == q))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastOffered<'a> {
    pub course: &'a str,
    pub term: Term,
    pub section: u16,
}

/// Every course with the sections it ran, by term.
#[derive(Debug, Clone, Default)]
pub struct CourseIndex<'a> {
    courses: BTreeMap<&'a str, BTreeMap<Term, u16>>,
}

impl<'a> CourseIndex<'a> {
    pub fn build(text: &'a str) -> Self {
        let mut courses: BTreeMap<&str, BTreeMap<Term, u16>> = BTreeMap::new();
        for record in text.lines().filter_map(|l| Record::parse(l).ok()) {
            courses
                .entry(record.course)
                .or_default()
                .insert(record.term, record.section);
        }
        CourseIndex { courses }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// All course names in sorted order.
    pub fn names(&self) -> Vec<&'a str> {
        self.courses.keys().copied().collect()
    }

    pub fn last_offered(&self, course: &str) -> Option<LastOffered<'a>> {
        let (&course, terms) = self.courses.get_key_value(course)?;
        let (&term, &section) = terms.iter().next_back()?;
        Some(LastOffered {
            course,
            term,
            section,
        })
    }

    /// The last offering of every course that fuzzy-matches `query`, in course order.
    pub fn search(&self, query: &str) -> Vec<LastOffered<'a>> {
        let query = query.trim();
        self.courses
            .iter()
            .filter(|(course, _)| fuzzy_match(course, query))
            .filter_map(|(&course, terms)| {
                terms
                    .iter()
                    .next_back()
                    .map(|(&term, &section)| LastOffered {
                        course,
                        term,
                        section,
                    })
            })
            .collect()
    }
}
