use std::fmt::Debug;
use std::hash::Hash;
use std::io::{self, Read, Write};

use super::{
    sorted_frequencies, CodeGenerator, CodeTable, CodeWord, DecodeTrie, ShannonFanoCodeGenerator,
    SymbolFrequency,
};
use crate::binary_stream::BitSequence;
use crate::error::{Error, MalformedStream};
use crate::logger;

/// Bitstream produced by [`Coder::encode`], tagged with the number of
/// symbols it holds.
///
/// The bit length is carried by the [`BitSequence`]. The symbol count is
/// needed for alphabets of a single symbol, whose code words are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSequence {
    bits: BitSequence,
    symbol_count: usize,
}

impl EncodedSequence {
    pub fn new(bits: BitSequence, symbol_count: usize) -> Self {
        Self { bits, symbol_count }
    }

    pub fn bits(&self) -> &BitSequence {
        &self.bits
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn into_bits(self) -> BitSequence {
        self.bits
    }

    /// Writes the bit length and the symbol count as big endian `u64`
    /// followed by the padded bits.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&(self.bits.len() as u64).to_be_bytes())?;
        writer.write_all(&(self.symbol_count as u64).to_be_bytes())?;
        self.bits.write_to(writer)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let bit_length = Self::read_length(reader)?;
        let symbol_count = Self::read_length(reader)?;
        let bits = BitSequence::read_from(reader, bit_length)?;
        Ok(Self::new(bits, symbol_count))
    }

    fn read_length<R: Read>(reader: &mut R) -> io::Result<usize> {
        let mut buffer = [0; 8];
        reader.read_exact(&mut buffer)?;
        usize::try_from(u64::from_be_bytes(buffer))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// A Shannon-Fano code built for one symbol sequence.
///
/// All state is computed in [`Coder::new`]; encoding and decoding only
/// read it, so a coder can be shared between threads.
#[derive(Debug, Clone)]
pub struct Coder<T> {
    symbols: Vec<T>,
    frequencies: Vec<SymbolFrequency<T>>,
    code_table: CodeTable<T>,
    decode_trie: DecodeTrie<T>,
}

impl<T> Coder<T>
where
    T: Eq + Hash + Clone + Debug,
{
    pub fn new(symbols: &[T]) -> crate::Result<Self> {
        let frequencies = sorted_frequencies(symbols)?;
        logger::log_frequencies(&frequencies);
        let code_table = ShannonFanoCodeGenerator::new().generate_with_symbols(&frequencies)?;
        logger::log_code_table(&code_table);
        let decode_trie = DecodeTrie::build(&code_table)?;
        logger::log_decode_trie(&decode_trie);
        Ok(Coder {
            symbols: symbols.to_vec(),
            frequencies,
            code_table,
            decode_trie,
        })
    }

    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }

    /// Distinct symbols sorted by descending frequency.
    pub fn frequencies(&self) -> &[SymbolFrequency<T>] {
        &self.frequencies
    }

    pub fn code_table(&self) -> &CodeTable<T> {
        &self.code_table
    }

    pub fn decode_trie(&self) -> &DecodeTrie<T> {
        &self.decode_trie
    }

    /// Encodes the sequence the coder was built from.
    pub fn encode_input(&self) -> crate::Result<EncodedSequence> {
        self.encode(&self.symbols)
    }

    /// Concatenates the code words of `symbols` in order.
    ///
    /// Every symbol is looked up before any bit is produced, an unknown
    /// symbol fails the whole call.
    pub fn encode(&self, symbols: &[T]) -> crate::Result<EncodedSequence> {
        let code_words = symbols
            .iter()
            .enumerate()
            .map(|(position, symbol)| self.lookup(position, symbol))
            .collect::<crate::Result<Vec<&CodeWord>>>()?;
        let bit_length = code_words.iter().map(|c| c.length() as usize).sum();
        let mut bits = BitSequence::with_capacity(bit_length);
        for code_word in code_words {
            code_word.append_to(&mut bits);
        }
        Ok(EncodedSequence::new(bits, symbols.len()))
    }

    fn lookup(&self, position: usize, symbol: &T) -> crate::Result<&CodeWord> {
        self.code_table
            .get(symbol)
            .ok_or_else(|| Error::UnknownSymbol {
                symbol: format!("{:?}", symbol),
                position,
            })
    }

    /// Decodes a bitstream of exactly `bits.len()` bits.
    ///
    /// An empty stream decodes to no symbols, also for a single-symbol
    /// alphabet. Use [`Coder::decode`] to restore such sequences.
    pub fn decode_bits(&self, bits: &BitSequence) -> crate::Result<Vec<T>> {
        Ok(self.decode_trie.decode(bits)?)
    }

    /// Decodes an [`EncodedSequence`] and checks its symbol count.
    pub fn decode(&self, encoded: &EncodedSequence) -> crate::Result<Vec<T>> {
        if let Some(symbol) = self.decode_trie.root_symbol() {
            if !encoded.bits.is_empty() {
                return Err(MalformedStream::MissingTransition { bit_index: 0 }.into());
            }
            return Ok(vec![symbol.clone(); encoded.symbol_count]);
        }
        let decoded = self.decode_bits(&encoded.bits)?;
        if decoded.len() != encoded.symbol_count {
            return Err(MalformedStream::SymbolCountMismatch {
                expected: encoded.symbol_count,
                actual: decoded.len(),
            }
            .into());
        }
        Ok(decoded)
    }
}
