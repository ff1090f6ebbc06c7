use std::ops::Range;

/// 源代码中的一个字节范围。
pub type Span = Range<usize>;

/// 行号索引：记录每一行起始的字节偏移，用于把 Span 换算成 1 起始的行号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// 返回 `offset` 所在的行号（从 1 开始）。
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(next) => next,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
