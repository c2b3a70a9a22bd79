use std::borrow::Cow;

/// Average reading speed used for estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// Replaces every HTML tag (`<...>`) with a single space.
///
/// This is deliberately not an HTML parser: anything between `<` and the next
/// `>` is dropped, which is all a word count needs. An unterminated `<` drops
/// the remainder of the input.
///
/// Returns `Cow::Borrowed` when the input contains no `<` (common for plain
/// summaries).
///
/// # Examples
///
/// ```
/// use beam::util::strip_html_tags;
///
/// assert_eq!(strip_html_tags("plain"), "plain");
/// assert_eq!(strip_html_tags("<p>Hello</p>"), " Hello ");
/// ```
pub fn strip_html_tags(s: &str) -> Cow<'_, str> {
    if !s.contains('<') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (false, _) => out.push(c),
            (true, '>') => {
                in_tag = false;
                out.push(' ');
            }
            (true, _) => {}
        }
    }

    Cow::Owned(out)
}

/// Counts whitespace-separated words after stripping HTML tags.
pub fn word_count(content: &str) -> usize {
    strip_html_tags(content).split_whitespace().count()
}

/// Estimates reading time in whole minutes.
///
/// Empty content has no estimate (`None`). Anything else is
/// `words / WORDS_PER_MINUTE`, floored, with a minimum of one minute, so
/// markup with no visible words still reads as one minute.
///
/// # Examples
///
/// ```
/// use beam::util::reading_time_minutes;
///
/// assert_eq!(reading_time_minutes(""), None);
/// assert_eq!(reading_time_minutes("<br/>"), Some(1));
/// assert_eq!(reading_time_minutes(&"word ".repeat(450)), Some(2));
/// ```
pub fn reading_time_minutes(content: &str) -> Option<u32> {
    if content.is_empty() {
        return None;
    }

    let minutes = word_count(content) / WORDS_PER_MINUTE;
    Some(u32::try_from(minutes).unwrap_or(u32::MAX).max(1))
}
