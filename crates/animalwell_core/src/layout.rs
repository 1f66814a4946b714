use std::fmt::Write as _;

use crate::error::{Result, SaveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Field,
    Composite,
}

/// One declared member, as resolved at schema build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub label: String,
    pub kind: EntryKind,
    pub range: ByteRange,
    pub depth: usize,
    /// Offset from the enclosing composite's base.
    pub relative: usize,
    pub parent: Option<String>,
}

/// Every member declared while building a schema, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<&LayoutEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub(crate) fn push(&mut self, entry: LayoutEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub(crate) fn close(&mut self, index: usize, end: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.range.end = end;
        }
    }

    /// Offset dump used by `--debug`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let indent = "  ".repeat(entry.depth);
            match &entry.parent {
                Some(parent) => {
                    writeln!(
                        out,
                        "{indent}- {}:\t0x{:X} absolute,\t0x{:X} from {}",
                        entry.label, entry.range.start, entry.relative, parent
                    )
                    .expect("writing to String cannot fail");
                }
                None => {
                    writeln!(
                        out,
                        "{indent}- {}:\t0x{:X} absolute",
                        entry.label, entry.range.start
                    )
                    .expect("writing to String cannot fail");
                }
            }
        }
        out
    }

    pub fn validate(&self, store_len: usize) -> Result<()> {
        for entry in &self.entries {
            if entry.range.end < entry.range.start || entry.range.end > store_len {
                return Err(SaveError::OutOfRange {
                    offset: entry.range.start,
                    len: entry.range.len(),
                    store_len,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, start: usize, end: usize, parent: Option<&str>) -> LayoutEntry {
        LayoutEntry {
            label: label.to_string(),
            kind: EntryKind::Field,
            range: ByteRange { start, end },
            depth: usize::from(parent.is_some()),
            relative: start,
            parent: parent.map(str::to_string),
        }
    }

    #[test]
    fn validate_rejects_member_past_end() {
        let mut layout = Layout::new();
        layout.push(entry("Head", 0, 4, None));
        layout.push(entry("Tail", 8, 12, Some("Root")));
        assert!(layout.validate(12).is_ok());
        assert!(matches!(
            layout.validate(10),
            Err(SaveError::OutOfRange { offset: 8, len: 4, store_len: 10 })
        ));
    }

    #[test]
    fn render_lists_offsets() {
        let mut layout = Layout::new();
        layout.push(entry("Tail", 0x18, 0x1C, Some("Root")));
        assert_eq!(layout.render(), "  - Tail:\t0x18 absolute,\t0x18 from Root\n");
    }
}
