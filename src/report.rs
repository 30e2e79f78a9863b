use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use crate::shannon_fano::{Coder, EncodedSequence};

/// Summary of encoding one input
#[derive(Debug, Clone)]
pub struct EncodingReport {
    name: String,
    symbol_count: usize,
    distinct_symbols: usize,
    input_bits: usize,
    encoded_bits: usize,
    code_table: Option<String>,
    bitstream: Option<String>,
    output_file: Option<PathBuf>,
}

impl EncodingReport {
    pub fn new(name: &str, text: &str, coder: &Coder<char>, encoded: &EncodedSequence) -> Self {
        Self {
            name: name.to_owned(),
            symbol_count: encoded.symbol_count(),
            distinct_symbols: coder.code_table().len(),
            input_bits: text.len() * 8,
            encoded_bits: encoded.bit_len(),
            code_table: None,
            bitstream: None,
            output_file: None,
        }
    }

    pub fn with_code_table(mut self, coder: &Coder<char>) -> Self {
        self.code_table = Some(coder.code_table().to_string());
        self
    }

    pub fn with_bitstream(mut self, encoded: &EncodedSequence) -> Self {
        self.bitstream = Some(encoded.bits().to_string());
        self
    }

    pub fn with_output_file(mut self, output_file: PathBuf) -> Self {
        self.output_file = Some(output_file);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn distinct_symbols(&self) -> usize {
        self.distinct_symbols
    }

    /// UTF-8 size of the input in bits
    pub fn input_bits(&self) -> usize {
        self.input_bits
    }

    pub fn encoded_bits(&self) -> usize {
        self.encoded_bits
    }

    pub fn code_table(&self) -> Option<&str> {
        self.code_table.as_deref()
    }

    pub fn bitstream(&self) -> Option<&str> {
        self.bitstream.as_deref()
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// encoded size in percent of the input size
    pub fn ratio(&self) -> f64 {
        if self.input_bits == 0 {
            return 0.0;
        }
        self.encoded_bits as f64 / self.input_bits as f64 * 100.0
    }
}

impl Display for EncodingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(
            f,
            "  symbols: {} ({} distinct)",
            self.symbol_count, self.distinct_symbols
        )?;
        writeln!(f, "  input bits: {}", self.input_bits)?;
        writeln!(
            f,
            "  encoded bits: {} ({:.2}% of input)",
            self.encoded_bits,
            self.ratio()
        )?;
        writeln!(f, "  round trip: verified")?;
        if let Some(code_table) = &self.code_table {
            writeln!(f, "  code table:")?;
            for line in code_table.lines() {
                writeln!(f, "    {}", line)?;
            }
        }
        if let Some(bitstream) = &self.bitstream {
            writeln!(f, "  encoded: {}", bitstream)?;
        }
        if let Some(output_file) = &self.output_file {
            writeln!(f, "  written to: {}", output_file.display())?;
        }
        Ok(())
    }
}
