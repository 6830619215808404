use super::util;

/// Splits an argument list on commas that are outside brackets and string
/// literals. Pieces are trimmed; a trailing comma adds no empty argument.
pub fn split_arguments(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    if text.trim().is_empty() {
        return pieces;
    }

    let mut start = 0;
    for (idx, c, depth) in util::structural(text) {
        if c == ',' && depth == 0 {
            pieces.push(text[start..idx].trim());
            start = idx + 1;
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        pieces.push(last);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_parens_stay_together() {
        assert_eq!(split_arguments("min(1,2), 3"), vec!["min(1,2)", "3"]);
    }

    #[test]
    fn test_quoted_commas() {
        assert_eq!(
            split_arguments(r#""a, b", 'c,d', x"#),
            vec![r#""a, b""#, "'c,d'", "x"]
        );
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            split_arguments(r#""say \"hi, there\"", 2"#),
            vec![r#""say \"hi, there\"""#, "2"]
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(split_arguments("[1, 2], (3, 4)"), vec!["[1, 2]", "(3, 4)"]);
    }

    #[test]
    fn test_empty_and_trailing() {
        assert!(split_arguments("   ").is_empty());
        assert_eq!(split_arguments("1, "), vec!["1"]);
    }
}
