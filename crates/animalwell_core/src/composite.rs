use crate::field::{
    BitCountField, BitflagSetField, ChoiceField, FieldInfo, FloatField, NumericField, RawBytesField,
};
use crate::label::LabelEnum;
use crate::layout::{ByteRange, EntryKind, Layout, LayoutEntry};
use crate::scalar::Scalar;

/// Declares fields in order, resolving their absolute offsets.
///
/// Members land at the running cursor unless `at` moved it first; `at` is
/// relative to this composite's base, so one schema function can be reused
/// at several bases. Every declaration is recorded in the shared [`Layout`].
pub struct CompositeBuilder<'a> {
    layout: &'a mut Layout,
    label: String,
    base: usize,
    cursor: usize,
    depth: usize,
}

impl<'a> CompositeBuilder<'a> {
    pub fn root(layout: &'a mut Layout, label: impl Into<String>) -> Self {
        Self {
            layout,
            label: label.into(),
            base: 0,
            cursor: 0,
            depth: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn at(&mut self, rel: usize) -> &mut Self {
        self.cursor = self.base + rel;
        self
    }

    pub fn skip(&mut self, len: usize) -> &mut Self {
        self.cursor += len;
        self
    }

    pub fn num<T: Scalar>(&mut self, label: &'static str) -> NumericField<T> {
        let field = NumericField::new(label, self.cursor);
        self.claim(field.info());
        field
    }

    pub fn float(&mut self, label: &'static str) -> FloatField {
        let field = FloatField::new(label, self.cursor);
        self.claim(field.info());
        field
    }

    pub fn flags<T: Scalar, F: LabelEnum>(&mut self, label: &'static str) -> BitflagSetField<T, F> {
        let field = BitflagSetField::new(label, self.cursor);
        self.claim(field.info());
        field
    }

    pub fn choice<T: Scalar, C: LabelEnum>(&mut self, label: &'static str) -> ChoiceField<T, C> {
        let field = ChoiceField::new(label, self.cursor);
        self.claim(field.info());
        field
    }

    pub fn raw(&mut self, label: &'static str, width: usize) -> RawBytesField {
        let field = RawBytesField::new(label, self.cursor, width);
        self.claim(field.info());
        field
    }

    pub fn bit_count<T: Scalar>(
        &mut self,
        label: &'static str,
        segments: usize,
        max_bits: u32,
    ) -> BitCountField<T> {
        let field = BitCountField::new(label, self.cursor, segments, max_bits);
        self.claim(field.info());
        field
    }

    /// Opens a child composite based at the current cursor. The parent
    /// continues from wherever the child's cursor ends up.
    pub fn nested<R>(
        &mut self,
        label: impl Into<String>,
        build: impl FnOnce(&mut CompositeBuilder<'_>) -> R,
    ) -> R {
        let label = label.into();
        let start = self.cursor;
        let index = self.layout.push(LayoutEntry {
            label: label.clone(),
            kind: EntryKind::Composite,
            range: ByteRange { start, end: start },
            depth: self.depth,
            relative: start - self.base,
            parent: Some(self.label.clone()),
        });

        let mut child = CompositeBuilder {
            layout: &mut *self.layout,
            label,
            base: start,
            cursor: start,
            depth: self.depth + 1,
        };
        let built = build(&mut child);
        let end = child.cursor;

        self.layout.close(index, end.max(start));
        self.cursor = end;
        built
    }

    fn claim(&mut self, info: FieldInfo) {
        self.layout.push(LayoutEntry {
            label: info.label.to_string(),
            kind: EntryKind::Field,
            range: info.range(),
            depth: self.depth,
            relative: info.offset - self.base,
            parent: Some(self.label.clone()),
        });
        self.cursor = info.offset + info.width;
    }
}
