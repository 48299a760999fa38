/// Shortens `text` to at most `max_chars` characters, ending with `...` when cut.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let keep = max_chars.saturating_sub(3);
    let mut out = text.chars().take(keep).collect::<String>();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::truncate_label;

    #[rstest]
    #[case::short("Payment Gateway", 32, "Payment Gateway")]
    #[case::exact("abcdef", 6, "abcdef")]
    #[case::cut("Database connection pool exhausted", 12, "Database ...")]
    #[case::multibyte("Überlastung der Datenbank", 8, "Überl...")]
    fn truncates_labels(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_label(text, max), expected);
    }
}
