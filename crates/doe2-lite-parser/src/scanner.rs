// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast command block scanner using SIMD-accelerated byte searching
//!
//! Splits INP text into command blocks without tokenizing them. A block
//! runs until a line ending with the `..` terminator. `$` comments are
//! removed and blank lines between blocks are skipped.

use memchr::memchr;

/// Commands whose blocks carry no model data
pub const IGNORED_COMMANDS: [&str; 5] = ["INPUT", "TITLE", "END", "COMPUTE", "STOP"];

/// Block terminator
pub const TERMINATOR: &str = "..";

/// A raw command block with comments removed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedBlock {
    /// 1-based line where the block starts
    pub line: usize,
    /// Block text, one source line per text line
    pub text: String,
    /// Whether the block ended with `..` (false only for trailing content)
    pub terminated: bool,
}

impl ScannedBlock {
    /// Check if the block is a control command with no model data
    pub fn is_ignored(&self) -> bool {
        let head = self.text.trim_start();
        IGNORED_COMMANDS.iter().any(|cmd| head.starts_with(cmd))
    }

    /// First word of the block (the object name or command)
    pub fn head(&self) -> &str {
        self.text
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }
}

/// Command block scanner for INP files
///
/// Uses memchr to jump between line breaks and to detect comment markers.
pub struct BlockScanner<'a> {
    content: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> BlockScanner<'a> {
    /// Create a new scanner for the given content
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            pos: 0,
            line: 0,
        }
    }

    /// Read the next source line, without its line break
    fn next_line(&mut self) -> Option<&'a str> {
        let bytes = self.content.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(offset) => start + offset,
            None => bytes.len(),
        };
        self.pos = end + 1;
        self.line += 1;

        let line = &self.content[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Scan to find the next block
    pub fn next_block(&mut self) -> Option<ScannedBlock> {
        let mut text = String::new();
        let mut start_line = 0;

        while let Some(raw) = self.next_line() {
            let code = strip_comment(raw);
            let trimmed = code.trim();

            if text.is_empty() {
                if trimmed.is_empty() {
                    continue;
                }
                start_line = self.line;
            }

            text.push_str(code.trim_end());
            text.push('\n');

            if trimmed.ends_with(TERMINATOR) {
                return Some(ScannedBlock {
                    line: start_line,
                    text,
                    terminated: true,
                });
            }
        }

        if text.trim().is_empty() {
            return None;
        }

        Some(ScannedBlock {
            line: start_line,
            text,
            terminated: false,
        })
    }

    /// Count terminated blocks, including ignored ones
    pub fn block_count(content: &'a str) -> usize {
        Self::new(content).filter(|b| b.terminated).count()
    }
}

impl Iterator for BlockScanner<'_> {
    type Item = ScannedBlock;

    fn next(&mut self) -> Option<ScannedBlock> {
        self.next_block()
    }
}

/// Remove a `$` comment, ignoring markers inside quoted strings
pub fn strip_comment(line: &str) -> &str {
    if memchr(b'$', line.as_bytes()).is_none() {
        return line;
    }

    let mut in_string = false;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b'$' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INP: &str = "INPUT ..\n\
$ ---------------------------------------------------------\n\
$              Floors / Spaces\n\
$ ---------------------------------------------------------\n\
\n\
\"Core Flr\" = FLOOR\n   Z = 0   $ ground\n   ..\n\
\"Core Spc\" = SPACE\n   SHAPE = POLYGON\n   ..\r\n\
END ..\n\
\"Dangling\" = SPACE\n   AREA = 5\n";

    #[test]
    fn test_scanner_finds_blocks() {
        let blocks: Vec<_> = BlockScanner::new(TEST_INP).collect();
        assert_eq!(blocks.len(), 5);

        assert!(blocks[0].is_ignored());
        assert_eq!(blocks[1].line, 6);
        assert_eq!(blocks[1].head(), "\"Core");
        assert!(!blocks[1].text.contains('$'));
        assert!(!blocks[2].is_ignored());
        assert!(blocks[3].is_ignored());

        assert!(!blocks[4].terminated);
        assert_eq!(blocks[4].line, 13);
    }

    #[test]
    fn test_block_count() {
        assert_eq!(BlockScanner::block_count(TEST_INP), 4);
    }

    #[test]
    fn test_strip_comment_respects_quotes() {
        assert_eq!(strip_comment("A = 1 $ note"), "A = 1 ");
        assert_eq!(strip_comment("\"Cost $5\" = SPACE"), "\"Cost $5\" = SPACE");
        assert_eq!(strip_comment("$ whole line"), "");
        assert_eq!(strip_comment("no comment"), "no comment");
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(BlockScanner::new("").next_block(), None);
        assert_eq!(BlockScanner::new("\n$ only comments\n\n").next_block(), None);
    }
}
