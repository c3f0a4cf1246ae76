/// Arabic block, U+0600..=U+06FF.
pub fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// True iff `text` contains at least one Arabic-block code point.
pub fn is_right_to_left(text: &str) -> bool {
    text.chars().any(is_arabic)
}
