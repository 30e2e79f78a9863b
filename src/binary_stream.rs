use std::io;
use std::io::Write;

mod sequence;

pub use sequence::{BitIterator, BitSequence};

/// State for writing individual bits to a Writer
pub struct BitWriter<'a, T: Write> {
    /// the underlying output stream
    writer: &'a mut T,
    /// buffer of individual bits not yet written
    buffer: u8,
    /// how many bits are waiting to be written
    buffer_space_used: u8,
}

impl<'a, T: Write> BitWriter<'a, T> {
    pub fn new(writer: &'a mut T) -> BitWriter<'a, T> {
        BitWriter {
            writer,
            buffer: 0,
            buffer_space_used: 0,
        }
    }

    /// write a non-byte-aligned number of bits
    ///
    /// buf: a byte array containing a contigous block, MSb first
    /// count: how many bits of buf to write
    ///
    /// returns the number of bytes handed to the underlying
    /// stream. Bits that do not fill a complete byte stay in
    /// the buffer until more bits arrive or flush is called.
    pub fn write_bits(&mut self, buf: &[u8], count: usize) -> Result<usize, io::Error> {
        let mut remaining_bits_offset = 0;
        let mut bytes_written = 0;
        if self.buffer_space_used == 0 {
            let aligned_byte_count = count / 8;
            self.writer.write_all(&buf[..aligned_byte_count])?;
            bytes_written = aligned_byte_count;
            remaining_bits_offset = aligned_byte_count * 8;
        }
        for bit_index in remaining_bits_offset..count {
            let bit = buf[bit_index / 8] & (0b1000_0000 >> (bit_index % 8)) != 0;
            bytes_written += self.write_bit(bit)?;
        }
        Ok(bytes_written)
    }

    /// append a single bit, returns 1 if this completed a byte
    pub fn write_bit(&mut self, bit: bool) -> Result<usize, io::Error> {
        if bit {
            self.buffer |= 0b1000_0000 >> self.buffer_space_used;
        }
        self.buffer_space_used += 1;
        if self.buffer_space_used < 8 {
            return Ok(0);
        }
        self.writer.write_all(&[self.buffer])?;
        self.buffer_space_used = 0;
        self.buffer = 0; // depended upon in write_bit and flush
        Ok(1)
    }

    /// number of bits waiting for the next byte boundary
    pub fn pending_bits(&self) -> usize {
        self.buffer_space_used as usize
    }
}

impl<T: Write> Write for BitWriter<'_, T> {
    /// Writing of byte arrays into the bit writer
    ///
    /// Warning: Even when the returned number in the result equals
    ///          the length of the input buffer, not all bits of the
    ///          input may have been written (because of possible
    ///          single bits in BitWriters buffer)
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.write_bits(buf, buf.len() * 8)?;
        Ok(buf.len())
    }

    /// Flush all bits and the underlying writer;
    ///
    /// If there are non-byte-aligned bits still
    /// in the buffer, they will be written to the output
    /// with 0 padding to the next byte;
    fn flush(&mut self) -> Result<(), io::Error> {
        if self.buffer_space_used != 0 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.buffer_space_used = 0;
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use std::io::Write;

    #[test]
    fn byte_mode_test() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        let input: &[u8] = &[83, 72, 65, 78, 78, 79, 78];
        writer.write_all(input).expect("should not fail");
        writer.flush().expect("flushing should not fail");
        assert_eq!(my_output, input);
    }

    #[test]
    fn bit_mode_test() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        // write 0b11000011 0b11110000
        writer.write_bits(&[0xFF], 2).expect("ERR");
        writer.write_bits(&[0x00], 4).expect("ERR");
        writer.write_bits(&[0xFF], 2).expect("ERR");
        writer.write_bits(&[0xFF], 4).expect("ERR");
        assert_eq!(writer.pending_bits(), 4);
        writer.flush().expect("ERR");
        assert_eq!(my_output, vec![195, 15 << 4]);
    }

    #[test]
    fn mixed_mode_test() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        // 0b111
        writer.write_bits(&[0xFF], 3).expect("ERR");
        // 0b11100000 00100000 01010000 100
        writer.write_all(&[1, 2, 4 | 128]).expect("ERR");
        writer.flush().expect("ERR");
        assert_eq!(my_output, vec![224, 32, 80, 128]);
    }

    #[test]
    fn single_bits_complete_a_byte() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        let mut completed = 0;
        for bit in [true, false, true, true, false, false, true, false] {
            completed += writer.write_bit(bit).expect("ERR");
        }
        assert_eq!(completed, 1, "exactly one byte must be completed");
        assert_eq!(writer.pending_bits(), 0);
        assert_eq!(my_output, vec![0b1011_0010]);
    }

    #[test]
    fn flush_without_pending_bits_writes_nothing() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        writer.flush().expect("ERR");
        assert!(my_output.is_empty());
    }
}
