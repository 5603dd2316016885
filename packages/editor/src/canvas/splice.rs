//! Replacement text for one region, built from kept source ranges and
//! inserted markup.

use std::ops::Range;

/// Builder for the new text of `region`
///
/// Kept ranges remember where they land so offsets inside them can be
/// carried across the rewrite.
#[derive(Debug)]
pub(crate) struct Splice<'a> {
    source: &'a str,
    region: Range<usize>,
    out: String,
    keeps: Vec<(Range<usize>, usize)>,
}

impl<'a> Splice<'a> {
    pub fn new(source: &'a str, region: Range<usize>) -> Self {
        Self {
            source,
            region,
            out: String::new(),
            keeps: Vec::new(),
        }
    }

    pub fn keep(&mut self, range: Range<usize>) -> &mut Self {
        let at = self.position();
        self.out.push_str(&self.source[range.clone()]);
        self.keeps.push((range, at));
        self
    }

    /// Keep `range` minus the given tag spans
    pub fn keep_without(&mut self, range: Range<usize>, dropped: &[Range<usize>]) -> &mut Self {
        let mut cursor = range.start;
        for tag in dropped {
            if cursor < tag.start {
                self.keep(cursor..tag.start);
            }
            cursor = tag.end;
        }
        if cursor < range.end || range.is_empty() {
            self.keep(cursor..range.end);
        }
        self
    }

    pub fn insert(&mut self, markup: &str) -> &mut Self {
        self.out.push_str(markup);
        self
    }

    /// Absolute offset in the new content where the next piece lands
    pub fn position(&self) -> usize {
        self.region.start + self.out.len()
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.out
    }

    /// Where an offset of the old content ends up
    ///
    /// Offsets inside removed markup snap to the next kept range.
    pub fn map(&self, offset: usize) -> usize {
        if offset < self.region.start {
            return offset;
        }
        for (range, at) in &self.keeps {
            if range.start <= offset && offset <= range.end {
                return at + (offset - range.start);
            }
        }
        if offset >= self.region.end {
            return offset - self.region.end + self.region.start + self.out.len();
        }
        self.keeps
            .iter()
            .find(|(range, _)| range.start > offset)
            .map(|(_, at)| *at)
            .unwrap_or_else(|| self.position())
    }

    pub fn into_parts(self) -> (Range<usize>, String) {
        (self.region, self.out)
    }
}
