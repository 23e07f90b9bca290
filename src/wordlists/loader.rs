//! Word list loading utilities
//!
//! Reads raw word lists from newline-delimited files.

use super::WordListError;
use std::fs;
use std::path::Path;

/// Load raw words from a newline-delimited file
///
/// Blank lines and lines starting with `#` are skipped. Entries are trimmed
/// but otherwise returned as written; normalisation happens in
/// [`WordList::new`](super::WordList::new).
///
/// # Errors
///
/// Returns `WordListError::Io` if the file cannot be read.
///
/// # Examples
/// ```no_run
/// use wordlik::wordlists::loader::load_from_file;
///
/// let words = load_from_file("data/words.txt").unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, WordListError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| WordListError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(parse_lines(&content))
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
