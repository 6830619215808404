use std::str::CharIndices;

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "in", "is", "if", "elif", "else", "for", "while", "def", "return",
    "break", "continue", "pass", "True", "False", "None", "lambda", "class", "import", "from",
    "global", "del",
];

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_') && !KEYWORDS.contains(&text)
}

/// Characters of `text` that sit outside string literals, each paired with
/// its byte offset and the bracket depth enclosing it. An opening bracket and
/// its matching closing bracket report the same depth.
pub struct Structural<'a> {
    chars: CharIndices<'a>,
    quote: Option<char>,
    depth: usize,
}

pub fn structural(text: &str) -> Structural<'_> {
    Structural {
        chars: text.char_indices(),
        quote: None,
        depth: 0,
    }
}

impl Iterator for Structural<'_> {
    type Item = (usize, char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, c)) = self.chars.next() {
            if let Some(quote) = self.quote {
                if c == '\\' {
                    self.chars.next();
                } else if c == quote {
                    self.quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => self.quote = Some(c),
                '(' | '[' | '{' => {
                    let depth = self.depth;
                    self.depth += 1;
                    return Some((idx, c, depth));
                }
                ')' | ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    return Some((idx, c, self.depth));
                }
                _ => return Some((idx, c, self.depth)),
            }
        }
        None
    }
}

/// True when `text` opens with `open` and the bracket it opens is closed by
/// the final character.
pub fn is_enclosed(text: &str, open: char, close: char) -> bool {
    if !text.starts_with(open) || !text.ends_with(close) {
        return false;
    }
    for (idx, c, depth) in structural(text) {
        if depth == 0 && matches!(c, ')' | ']' | '}') {
            return idx + c.len_utf8() == text.len() && c == close;
        }
    }
    false
}

/// Splits `name(arguments)` into its name and the raw argument text.
pub fn split_call(text: &str) -> Option<(&str, &str)> {
    let name_end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    let name = &text[..name_end];
    if !is_identifier(name) {
        return None;
    }
    let rest = text[name_end..].trim_start();
    if !is_enclosed(rest, '(', ')') {
        return None;
    }
    Some((name, &rest[1..rest.len() - 1]))
}

pub fn strip_comment(text: &str) -> &str {
    for (idx, c, _) in structural(text) {
        if c == '#' {
            return &text[..idx];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("total_2"));
        assert!(is_identifier("_x"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("while"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_is_enclosed() {
        assert!(is_enclosed("[1, [2]]", '[', ']'));
        assert!(!is_enclosed("[1] + [2]", '[', ']'));
        assert!(is_enclosed("(')')", '(', ')'));
        assert!(!is_enclosed("(1", '(', ')'));
    }

    #[test]
    fn test_split_call() {
        assert_eq!(split_call("greet('a', b)"), Some(("greet", "'a', b")));
        assert_eq!(split_call("print ()"), Some(("print", "")));
        assert_eq!(split_call("f(1)(2)"), None);
        assert_eq!(split_call("if(x)"), None);
        assert_eq!(split_call("xs.append(1)"), None);
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("x = 1  # one"), "x = 1  ");
        assert_eq!(strip_comment("print('#1')"), "print('#1')");
        assert_eq!(strip_comment("# only"), "");
    }
}
