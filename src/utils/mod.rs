pub mod span;
// 测试模块
#[cfg(test)]
mod test;

pub use span::{LineIndex, Span};
