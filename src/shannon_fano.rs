pub mod code;
pub mod coder;
pub mod frequency;
pub mod trie;

pub use code::{CodeGenerator, CodeTable, CodeWord, ShannonFanoCodeGenerator};
pub use coder::{Coder, EncodedSequence};
pub use frequency::sorted_frequencies;
pub use trie::DecodeTrie;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFrequency<T> {
    pub symbol: T,
    pub frequency: usize,
}

impl<T> SymbolFrequency<T> {
    pub fn new(symbol: T, frequency: usize) -> Self {
        Self { symbol, frequency }
    }
}

impl<T> From<(T, usize)> for SymbolFrequency<T> {
    fn from(value: (T, usize)) -> Self {
        Self {
            symbol: value.0,
            frequency: value.1,
        }
    }
}
