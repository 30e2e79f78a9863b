use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::str::FromStr;

use super::SymbolFrequency;
use crate::binary_stream::BitSequence;
use crate::error::Error;

/// The bit sequence assigned to one symbol.
///
/// Holds the `length` low bits of `bit_pattern`, read most significant
/// bit first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CodeWord {
    bit_pattern: u64,
    length: u32,
}

impl CodeWord {
    pub const MAX_LENGTH: u32 = u64::BITS;

    pub fn new(bit_pattern: u64, length: u32) -> crate::Result<Self> {
        if length > Self::MAX_LENGTH {
            return Err(Error::CodeWordTooLong {
                length: length as usize,
            });
        }
        Ok(Self {
            bit_pattern: bit_pattern & Self::mask(length),
            length,
        })
    }

    pub fn bit_pattern(&self) -> u64 {
        self.bit_pattern
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Extends the code word by one trailing bit.
    pub fn push(self, bit: bool) -> crate::Result<Self> {
        if self.length >= Self::MAX_LENGTH {
            return Err(Error::CodeWordTooLong {
                length: self.length as usize + 1,
            });
        }
        Ok(Self {
            bit_pattern: (self.bit_pattern << 1) | bit as u64,
            length: self.length + 1,
        })
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.length)
            .rev()
            .map(|shift| (self.bit_pattern >> shift) & 1 == 1)
    }

    pub fn is_prefix_of(&self, other: &CodeWord) -> bool {
        if self.length > other.length {
            return false;
        }
        other
            .bit_pattern
            .checked_shr(other.length - self.length)
            .unwrap_or(0)
            == self.bit_pattern
    }

    pub fn append_to(&self, sequence: &mut BitSequence) {
        sequence.push_bits(self.bit_pattern, self.length);
    }

    fn mask(length: u32) -> u64 {
        u64::MAX.checked_shr(u64::BITS - length).unwrap_or(0)
    }
}

impl fmt::Display for CodeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for CodeWord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .try_fold(CodeWord::default(), |code_word, (index, character)| {
                match character {
                    '0' => code_word.push(false),
                    '1' => code_word.push(true),
                    _ => Err(Error::InvalidBitCharacter { character, index }),
                }
            })
    }
}

impl From<CodeWord> for BitSequence {
    fn from(value: CodeWord) -> Self {
        let mut sequence = BitSequence::with_capacity(value.length as usize);
        value.append_to(&mut sequence);
        sequence
    }
}

/// Mapping from symbol to code word.
///
/// Entries keep the order they were inserted in, which for generated
/// tables is descending symbol frequency.
#[derive(Debug, Clone)]
pub struct CodeTable<T> {
    entries: Vec<(T, CodeWord)>,
    index: HashMap<T, usize>,
}

impl<T> CodeTable<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// Builds a table from caller supplied entries, e.g. a reloaded one.
    ///
    /// The entries are not checked for the prefix property here,
    /// building a [`super::DecodeTrie`] from the table does that.
    pub fn from_entries(entries: Vec<(T, CodeWord)>) -> crate::Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, (symbol, _)) in entries.iter().enumerate() {
            if index.insert(symbol.clone(), position).is_some() {
                return Err(Error::DuplicateSymbol(format!("{:?}", symbol)));
            }
        }
        Ok(Self { entries, index })
    }

    pub fn get(&self, symbol: &T) -> Option<&CodeWord> {
        self.index
            .get(symbol)
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, symbol: &T) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, &CodeWord)> + '_ {
        self.entries.iter().map(|(symbol, code)| (symbol, code))
    }
}

impl<T: Debug> fmt::Display for CodeTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code_word) in self.entries.iter() {
            writeln!(f, "{:?}: {}", symbol, code_word)?;
        }
        Ok(())
    }
}

pub trait CodeGenerator {
    /// Assigns one code word per entry of `sorted_frequencies`, which
    /// must be sorted in descending order.
    fn generate(&self, sorted_frequencies: &[usize]) -> crate::Result<Vec<CodeWord>>;

    fn generate_with_symbols<T>(
        &self,
        sorted_frequencies: &[SymbolFrequency<T>],
    ) -> crate::Result<CodeTable<T>>
    where
        T: Eq + Hash + Clone + Debug,
    {
        let frequencies: Vec<usize> = sorted_frequencies.iter().map(|f| f.frequency).collect();
        let code = self.generate(&frequencies)?;
        let entries = code
            .into_iter()
            .zip(sorted_frequencies)
            .map(|(code_word, sf)| (sf.symbol.clone(), code_word))
            .collect();
        CodeTable::from_entries(entries)
    }
}

/// Recursive-split code generator.
///
/// Each range of the frequency table is cut into two contiguous parts
/// whose weights differ as little as possible. The left part extends the
/// prefix with a 0, the right part with a 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShannonFanoCodeGenerator;

impl CodeGenerator for ShannonFanoCodeGenerator {
    fn generate(&self, sorted_frequencies: &[usize]) -> crate::Result<Vec<CodeWord>> {
        if sorted_frequencies.is_empty() {
            return Err(Error::EmptyInput);
        }
        assert!(
            sorted_frequencies.windows(2).all(|w| w[0] >= w[1]),
            "Frequencies must be sorted in descending order"
        );
        assert!(
            sorted_frequencies.iter().all(|&f| f > 0),
            "Frequencies must be positive"
        );
        // every sub range sums to at most the total
        sorted_frequencies
            .iter()
            .try_fold(0_usize, |total, &f| total.checked_add(f))
            .ok_or(Error::FrequencyTotalOverflow)?;
        let mut code = vec![CodeWord::default(); sorted_frequencies.len()];
        Self::assign_codes(sorted_frequencies, CodeWord::default(), &mut code)?;
        Ok(code)
    }
}

impl ShannonFanoCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    fn assign_codes(
        weights: &[usize],
        prefix: CodeWord,
        code: &mut [CodeWord],
    ) -> crate::Result<()> {
        if weights.len() == 1 {
            code[0] = prefix;
            return Ok(());
        }
        let split = Self::find_split(weights);
        let (left_weights, right_weights) = weights.split_at(split);
        let (left_code, right_code) = code.split_at_mut(split);
        Self::assign_codes(left_weights, prefix.push(false)?, left_code)?;
        Self::assign_codes(right_weights, prefix.push(true)?, right_code)
    }

    /// Index of the first entry of the right part.
    ///
    /// Scans until the running sum exceeds half of the total, then steps
    /// back one entry only if that strictly improves the balance.
    fn find_split(weights: &[usize]) -> usize {
        let total: usize = weights.iter().sum();
        let half = total / 2;
        let mut accumulated = 0;
        let mut split = 0;
        while accumulated <= half {
            accumulated += weights[split];
            split += 1;
        }
        let previous = accumulated - weights[split - 1];
        if Self::imbalance(accumulated, total) > Self::imbalance(previous, total) {
            split -= 1;
        }
        debug_assert!(
            (1..weights.len()).contains(&split),
            "split {} leaves an empty part",
            split
        );
        split
    }

    fn imbalance(left: usize, total: usize) -> usize {
        left.abs_diff(total - left)
    }
}

#[cfg(test)]
mod test {
    use super::{CodeGenerator, CodeTable, CodeWord, ShannonFanoCodeGenerator};
    use crate::error::Error;
    use crate::shannon_fano::SymbolFrequency;

    fn generate_strings(sorted_frequencies: &[usize]) -> Vec<String> {
        ShannonFanoCodeGenerator::new()
            .generate(sorted_frequencies)
            .expect("code generation must succeed")
            .iter()
            .map(CodeWord::to_string)
            .collect()
    }

    #[test]
    fn test_code_word_push() {
        let code_word = CodeWord::default()
            .push(true)
            .and_then(|c| c.push(false))
            .and_then(|c| c.push(true))
            .expect("short code words can be extended");
        assert_eq!(code_word.bit_pattern(), 0b101);
        assert_eq!(code_word.length(), 3);
        assert_eq!(code_word.to_string(), "101");
    }

    #[test]
    fn test_code_word_max_length() {
        let full = CodeWord::new(u64::MAX, 64).expect("64 bits fit");
        assert_eq!(full.bits().count(), 64);
        assert!(matches!(
            full.push(false),
            Err(Error::CodeWordTooLong { length: 65 })
        ));
        assert!(CodeWord::new(0, 65).is_err());
    }

    #[test]
    fn test_code_word_new_masks_unused_bits() {
        let code_word = CodeWord::new(0b1111_0110, 3).expect("3 bits fit");
        assert_eq!(code_word.to_string(), "110");
        assert_eq!(code_word, "110".parse().expect("valid code word"));
    }

    #[test]
    fn test_is_prefix_of() {
        let short: CodeWord = "10".parse().expect("valid code word");
        let long: CodeWord = "1011".parse().expect("valid code word");
        let other: CodeWord = "1101".parse().expect("valid code word");
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(!short.is_prefix_of(&other));
        assert!(CodeWord::default().is_prefix_of(&long));
        let full = CodeWord::new(u64::MAX, 64).expect("64 bits fit");
        assert!(CodeWord::default().is_prefix_of(&full));
    }

    #[test]
    fn test_descending_four_symbols() {
        assert_eq!(generate_strings(&[4, 3, 2, 1]), ["0", "10", "110", "111"]);
    }

    #[test]
    fn test_two_symbols() {
        assert_eq!(generate_strings(&[3, 1]), ["0", "1"]);
        assert_eq!(generate_strings(&[1, 1]), ["0", "1"]);
    }

    #[test]
    fn test_uniform_frequencies_give_balanced_code() {
        assert_eq!(generate_strings(&[1, 1, 1, 1]), ["00", "01", "10", "11"]);
    }

    #[test]
    fn test_exact_balance_tie_keeps_later_split() {
        // splitting after 3 or after 3+2 both leave an imbalance of 2
        assert_eq!(generate_strings(&[3, 2, 2, 1]), ["00", "01", "10", "11"]);
    }

    #[test]
    fn test_single_symbol_gets_empty_code_word() {
        let code = ShannonFanoCodeGenerator::new()
            .generate(&[7])
            .expect("code generation must succeed");
        assert_eq!(code, vec![CodeWord::default()]);
        assert_eq!(code[0].length(), 0);
    }

    #[test]
    fn test_empty_frequencies() {
        assert!(matches!(
            ShannonFanoCodeGenerator::new().generate(&[]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    #[should_panic]
    fn test_unsorted_frequencies() {
        let _ = ShannonFanoCodeGenerator::new().generate(&[1, 5, 4, 3]);
    }

    #[test]
    fn test_generated_code_is_prefix_free() {
        let frequencies = [40, 22, 22, 17, 9, 9, 8, 5, 3, 3, 1, 1, 1];
        let code = ShannonFanoCodeGenerator::new()
            .generate(&frequencies)
            .expect("code generation must succeed");
        for (i, a) in code.iter().enumerate() {
            for (j, b) in code.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_frequency_total_overflow() {
        assert!(matches!(
            ShannonFanoCodeGenerator::new().generate(&[usize::MAX, 1]),
            Err(Error::FrequencyTotalOverflow)
        ));
        let code = ShannonFanoCodeGenerator::new()
            .generate(&[usize::MAX - 1, 1])
            .expect("total fits into usize");
        assert_eq!(code.len(), 2);
    }

    #[test]
    fn test_lengths_of_slowly_decreasing_frequencies() {
        let frequencies = [4, 4, 3, 3, 3, 3, 2, 2, 2, 1, 1, 1, 1];
        let code = ShannonFanoCodeGenerator::new()
            .generate(&frequencies)
            .expect("code generation must succeed");
        let lengths: Vec<u32> = code.iter().map(CodeWord::length).collect();
        assert_eq!(lengths, [3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5]);
        for (window, lengths) in frequencies.windows(2).zip(lengths.windows(2)) {
            if window[0] > window[1] {
                assert!(
                    lengths[0] <= lengths[1],
                    "Frequency {} got {} bits, frequency {} got {} bits",
                    window[0],
                    lengths[0],
                    window[1],
                    lengths[1]
                );
            }
        }
    }

    #[test]
    fn test_higher_frequency_may_get_longer_code_word() {
        // the split balances weights, not lengths: 22 lands one level
        // deeper than 20
        let frequencies = [23, 22, 21, 20, 13, 10, 6];
        assert_eq!(
            generate_strings(&frequencies),
            ["00", "010", "011", "10", "110", "1110", "1111"]
        );
    }

    #[test]
    fn test_generate_with_symbols() {
        let frequencies = [('a', 4), ('b', 3), ('c', 2), ('d', 1)].map(SymbolFrequency::from);
        let table = ShannonFanoCodeGenerator::new()
            .generate_with_symbols(&frequencies)
            .expect("code generation must succeed");
        assert_eq!(table.len(), 4);
        for (symbol, expected) in [('a', "0"), ('b', "10"), ('c', "110"), ('d', "111")] {
            let code_word = table.get(&symbol).expect("symbol must be in table");
            assert_eq!(code_word.to_string(), expected, "Code of {} does not match", symbol);
        }
        assert!(table.get(&'e').is_none());
        assert!(table.contains(&'d') && !table.contains(&'e'));
        assert_eq!(table.to_string(), "'a': 0\n'b': 10\n'c': 110\n'd': 111\n");
    }

    #[test]
    fn test_code_table_rejects_duplicate_symbols() {
        let entries = vec![
            ('a', "0".parse().expect("valid code word")),
            ('a', "1".parse().expect("valid code word")),
        ];
        assert!(matches!(
            CodeTable::from_entries(entries),
            Err(Error::DuplicateSymbol(_))
        ));
    }
}
