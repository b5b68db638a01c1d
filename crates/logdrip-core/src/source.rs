//! Line sources: standard input and the built-in generators

use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Paragraph the random generator draws its sentences from
pub const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Sed egestas egestas fringilla phasellus faucibus. Egestas sed sed risus pretium quam vulputate. Amet nisl suscipit adipiscing bibendum est ultricies integer quis auctor. Morbi non arcu risus quis varius quam quisque id diam.";

/// Where the lines come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceKind {
    /// Read standard input to completion
    #[default]
    Stdin,
    /// Sentences of the built-in Lorem-ipsum paragraph
    Lorem,
    /// `line 1` through `line N`
    Numbered(usize),
}

impl SourceKind {
    /// Produce every line of this source
    ///
    /// `reader` is only consulted for [`SourceKind::Stdin`].
    pub fn load<R: BufRead>(self, reader: R) -> Result<Vec<String>> {
        match self {
            SourceKind::Stdin => read_lines(reader),
            SourceKind::Lorem => Ok(lorem_lines()),
            SourceKind::Numbered(count) => Ok(numbered_lines(count)),
        }
    }
}

/// Read all lines from `reader`, without their terminators
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    // `lines()` already strips both "\n" and "\r\n"
    let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
    Ok(lines)
}

/// Split the Lorem-ipsum paragraph into sentences
pub fn lorem_lines() -> Vec<String> {
    LOREM.split(". ").map(str::to_string).collect()
}

/// Generate `line 1` .. `line count`
pub fn numbered_lines(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("line {i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_lines_strips_terminators() {
        let input = Cursor::new("first\r\nsecond\n\nlast");
        let lines = read_lines(input).unwrap();
        assert_eq!(lines, vec!["first", "second", "", "last"]);
    }

    #[test]
    fn test_read_lines_empty() {
        assert!(read_lines(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_lorem_lines() {
        let lines = lorem_lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Lorem ipsum"));
        // Only the last sentence keeps its period
        assert!(lines[4].ends_with("id diam."));
    }

    #[test]
    fn test_numbered_lines() {
        assert_eq!(numbered_lines(3), vec!["line 1", "line 2", "line 3"]);
        assert!(numbered_lines(0).is_empty());
    }

    #[test]
    fn test_load_ignores_reader_for_generators() {
        let lines = SourceKind::Numbered(2).load(Cursor::new("ignored")).unwrap();
        assert_eq!(lines, vec!["line 1", "line 2"]);

        let lines = SourceKind::Stdin.load(Cursor::new("a\nb\n")).unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_source_kind_from_ron() {
        let kind: SourceKind = ron::from_str("Numbered(4)").unwrap();
        assert_eq!(kind, SourceKind::Numbered(4));
    }
}
