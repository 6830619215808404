use super::lines::SourceLine;

/// Index of the last line belonging to the block opened at `header`.
///
/// The block runs until the next non-blank line indented no deeper than the
/// header. Blank lines never end a block. An empty block returns `header`.
pub fn block_end(lines: &[SourceLine], header: usize) -> usize {
    let indent = lines[header].indent;
    let mut end = header;
    for (idx, line) in lines.iter().enumerate().skip(header + 1) {
        if line.is_blank() {
            continue;
        }
        if line.indent <= indent {
            break;
        }
        end = idx;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lines::scan_lines;

    #[test]
    fn test_block_stops_at_dedent() {
        let lines = scan_lines("if x:\n    a = 1\n\n    b = 2\nc = 3");
        assert_eq!(block_end(&lines, 0), 3);
    }

    #[test]
    fn test_nested_blocks() {
        let lines = scan_lines("for i in xs:\n    if i:\n        print(i)\n    print(0)\nprint(1)");
        assert_eq!(block_end(&lines, 0), 3);
        assert_eq!(block_end(&lines, 1), 2);
    }

    #[test]
    fn test_empty_block() {
        let lines = scan_lines("if x:\nprint(1)");
        assert_eq!(block_end(&lines, 0), 0);
    }

    #[test]
    fn test_block_runs_to_end_of_source() {
        let lines = scan_lines("def f():\n    print(1)\n\n");
        assert_eq!(block_end(&lines, 0), 1);
    }
}
