//! Turns release-style filenames into a searchable movie title.
//!
//! Everything here is heuristic: scene naming is inconsistent, and the
//! noise list in [`crate::config`] only covers the common tags.

use crate::models::NormalizedTitle;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("year pattern compiles"));

/// Words that mark a file as bonus material rather than the feature itself.
const EXTRA_KEYWORDS: &[&str] = &["sample", "trailer"];

/// True when the filename carries `sample` or `trailer` as a whole word.
/// Words are runs of ASCII letters and digits, so `Movie_Sample.mkv` matches
/// and `Samples.mkv` does not.
pub fn is_extra(filename: &str) -> bool {
    filename
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| EXTRA_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k)))
}

/// Cleans `filename` (no directory part) into a title, query and year.
///
/// The title is cut right after the first standalone 4-digit number, which is
/// taken to be the release year; anything after it is treated as release
/// metadata. Returns `None` when nothing of the name survives cleaning.
pub fn normalize(filename: &str, noise: &[Regex]) -> Option<NormalizedTitle> {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let mut name = stem.replace(['.', '_', '-'], " ");
    for pattern in noise {
        name = pattern.replace_all(&name, " ").into_owned();
    }
    let name = collapse_whitespace(&name);
    if name.is_empty() {
        return None;
    }

    let Some((start, year)) = YEAR
        .find(&name)
        .map(|m| (m.start(), m.as_str().to_string()))
    else {
        return Some(NormalizedTitle {
            title: name.clone(),
            query: name,
            year: None,
        });
    };

    // Drop whatever opened a bracket around the year, e.g. "Title (2012".
    let before = collapse_whitespace(
        name[..start]
            .trim_end()
            .trim_end_matches(['(', '['])
            .trim_end(),
    );

    if before.is_empty() {
        // A bare number such as "1917" is the title, not a year.
        return Some(NormalizedTitle {
            title: year.clone(),
            query: year,
            year: None,
        });
    }

    Some(NormalizedTitle {
        title: format!("{before} {year}"),
        query: before,
        year: Some(year),
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
