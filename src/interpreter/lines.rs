use super::util;

/// One physical line of the program, with its comment stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub lineno: usize,
    pub indent: usize,
    pub text: String,
}

impl SourceLine {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

pub fn scan_lines(source: &str) -> Vec<SourceLine> {
    source
        .lines()
        .enumerate()
        .map(|(idx, raw)| {
            let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
            let text = util::strip_comment(raw.trim_start()).trim_end().to_string();
            SourceLine {
                lineno: idx + 1,
                indent,
                text,
            }
        })
        .collect()
}
