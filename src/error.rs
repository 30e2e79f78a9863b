use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    EmptyInput,
    UnknownSymbol { symbol: String, position: usize },
    MalformedStream(MalformedStream),
    CodeWordTooLong { length: usize },
    FrequencyTotalOverflow,
    AmbiguousCodeTable { symbol: String },
    DuplicateSymbol(String),
    InvalidBitCharacter { character: char, index: usize },
    BitLengthExceedsStorage { bit_length: usize, available_bits: usize },
    UnableToReadInputFile(String, std::io::Error),
    UnableToWriteOutputFile(String, std::io::Error),
    RoundTripMismatch(String),
    WorkerTerminated,
}

/// Reasons a bitstream does not resolve to a complete sequence of leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedStream {
    /// the trie has no child for the bit at this position
    MissingTransition { bit_index: usize },
    /// the stream ends in the middle of a code word
    TruncatedCodeWord { bit_length: usize },
    SymbolCountMismatch { expected: usize, actual: usize },
}

impl From<MalformedStream> for Error {
    fn from(value: MalformedStream) -> Self {
        Self::MalformedStream(value)
    }
}

impl Display for MalformedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTransition { bit_index } => {
                write!(f, "no code word continues with the bit at index {}", bit_index)
            }
            Self::TruncatedCodeWord { bit_length } => {
                write!(
                    f,
                    "stream of {} bits ends in the middle of a code word",
                    bit_length
                )
            }
            Self::SymbolCountMismatch { expected, actual } => {
                write!(
                    f,
                    "expected {} symbols, but the stream holds {}",
                    expected, actual
                )
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => {
                write!(f, "Unable to build a code for an empty symbol sequence")
            }
            Self::UnknownSymbol { symbol, position } => {
                write!(
                    f,
                    "Symbol {} at position {} is not present in the code table",
                    symbol, position
                )
            }
            Self::MalformedStream(reason) => {
                write!(f, "Malformed bitstream: {}", reason)
            }
            Self::CodeWordTooLong { length } => {
                write!(
                    f,
                    "Code word of {} bits exceeds the supported maximum of {} bits",
                    length,
                    u64::BITS
                )
            }
            Self::FrequencyTotalOverflow => {
                write!(f, "Sum of the symbol frequencies exceeds {}", usize::MAX)
            }
            Self::AmbiguousCodeTable { symbol } => {
                write!(
                    f,
                    "Code word of symbol {} collides with another code word",
                    symbol
                )
            }
            Self::DuplicateSymbol(symbol) => {
                write!(f, "Symbol {} appears more than once in the code table", symbol)
            }
            Self::InvalidBitCharacter { character, index } => {
                write!(
                    f,
                    "Character '{}' at index {} is neither '0' nor '1'",
                    character, index
                )
            }
            Self::BitLengthExceedsStorage {
                bit_length,
                available_bits,
            } => {
                write!(
                    f,
                    "Bit length {} exceeds the {} bits of available storage",
                    bit_length, available_bits
                )
            }
            Self::UnableToReadInputFile(path, error) => {
                write!(f, "Unable to read input file '{}': {}", path, error)
            }
            Self::UnableToWriteOutputFile(path, error) => {
                write!(f, "Unable to write output file '{}': {}", path, error)
            }
            Self::RoundTripMismatch(name) => {
                write!(f, "Decoded symbols of '{}' differ from the input", name)
            }
            Self::WorkerTerminated => {
                write!(f, "A worker thread terminated without reporting a result")
            }
        }
    }
}

impl std::error::Error for Error {}
