//! Common utility functions shared across the codebase.

/// Number of whitespace-separated words in `text`.
///
/// # Examples
///
/// ```
/// use themegen::utils::word_count;
///
/// assert_eq!(word_count("Save changes"), 2);
/// assert_eq!(word_count("  spaced   out  "), 2);
/// assert_eq!(word_count(""), 0);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The first `n` words of `text`, joined by single spaces.
pub fn leading_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Build an index of line start byte offsets.
///
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert a byte offset into a 1-based (line, column) pair.
///
/// The column counts characters, not bytes.
pub fn line_col(content: &str, line_index: &[usize], offset: usize) -> (usize, usize) {
    let line = match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    };
    let start = line_index.get(line.saturating_sub(1)).copied().unwrap_or(0);
    let end = offset.min(content.len());
    let col = content.get(start..end).map_or(1, |s| s.chars().count() + 1);
    (line, col)
}

/// Text of the given 1-based line, without its line terminator.
pub fn source_line(content: &str, line: usize) -> &str {
    content
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or_default()
}
