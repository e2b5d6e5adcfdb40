//! # Binary framing
//!
//! Inline `format="binary"` data arrays in a VTU file hold a base64 stream of
//!
//! ```text
//! [ payload length as little endian u64 ][ payload as little endian values ]
//! ```
//!
//! where the length counts only the payload bytes. The header matches the
//! `header_type="UInt64"` attribute of the `VTKFile` element. There is no checksum, so a
//! wrong header silently corrupts every array that follows it.
//!
//! A [`Base64Frame`] streams one such array: it is opened with the payload length, accepts
//! any number of writes, and is consumed by [`Base64Frame::close`].

use crate::traits::Numeric;
use crate::Error;

use base64::write::EncoderWriter;
use std::io::Write;

/// An open base64 stream for a single data array
pub struct Base64Frame<'a, W: Write> {
    encoder: EncoderWriter<&'a mut W>,
    declared: u64,
    written: u64,
}

impl<'a, W: Write> Base64Frame<'a, W> {
    /// Start a frame of `payload_bytes` bytes, writing the size header.
    pub fn open(writer: &'a mut W, payload_bytes: u64) -> Result<Self, Error> {
        let mut encoder = EncoderWriter::new(writer, base64::STANDARD);
        encoder.write_all(&payload_bytes.to_le_bytes())?;

        Ok(Self {
            encoder,
            declared: payload_bytes,
            written: 0,
        })
    }

    /// Start a frame sized for `len` values of type `T`.
    pub fn open_for<T: Numeric>(writer: &'a mut W, len: usize) -> Result<Self, Error> {
        Self::open(writer, (len * T::SIZE) as u64)
    }

    /// append a single value
    pub fn push<T: Numeric>(&mut self, value: T) -> Result<(), Error> {
        value.write_le_bytes(&mut self.encoder)?;
        self.written += T::SIZE as u64;
        Ok(())
    }

    /// append a contiguous run of values
    pub fn push_slice<T: Numeric>(&mut self, values: &[T]) -> Result<(), Error> {
        let mut bytes = Vec::with_capacity(values.len() * T::SIZE);
        values
            .iter()
            .for_each(|value| value.extend_le_bytes(&mut bytes));

        self.encoder.write_all(&bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Flush the last partial base64 group and end the line.
    pub fn close(mut self) -> Result<(), Error> {
        debug_assert_eq!(
            self.written, self.declared,
            "base64 frame header does not match the payload written"
        );

        let writer = self.encoder.finish()?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Frame a whole array at once, returning the base64 text without a trailing newline.
///
/// ```
/// let encoded = paraview_mesh::encoding::encode_array(&[1.0_f64, 2.0, 3.0]).unwrap();
/// let bytes = base64::decode(&encoded).unwrap();
///
/// assert_eq!(&bytes[0..8], &24u64.to_le_bytes());
/// assert_eq!(&bytes[8..16], &1.0_f64.to_le_bytes());
/// ```
pub fn encode_array<T: Numeric>(values: &[T]) -> Result<String, Error> {
    let mut buffer = Vec::with_capacity(16 + values.len() * T::SIZE * 4 / 3);

    let mut frame = Base64Frame::open_for::<T>(&mut buffer, values.len())?;
    frame.push_slice(values)?;
    frame.close()?;

    buffer.pop();
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(encoded: &[u8]) -> Vec<u8> {
        let text = std::str::from_utf8(encoded).unwrap();
        base64::decode(text.trim_end()).unwrap()
    }

    #[test]
    fn header_then_payload() {
        let mut buffer = Vec::new();
        let mut frame = Base64Frame::open(&mut buffer, 24).unwrap();
        frame.push_slice(&[1.0_f64, 2.0, 3.0]).unwrap();
        frame.close().unwrap();

        assert_eq!(buffer.last(), Some(&b'\n'));
        assert!(!buffer[..buffer.len() - 1].contains(&b'\n'));

        let bytes = decode(&buffer);
        assert_eq!(bytes.len(), 32);
        assert_eq!(u64::from_le_bytes(bytes[0..8].try_into().unwrap()), 24);

        let mut expected = Vec::new();
        for value in [1.0_f64, 2.0, 3.0] {
            expected.extend_from_slice(&value.to_le_bytes());
        }
        assert_eq!(&bytes[8..], expected.as_slice());
    }

    #[test]
    fn single_value_writes_match_bulk() {
        let values: Vec<i64> = vec![4, 8, 15, 16, 23, 42];

        let mut one_by_one = Vec::new();
        let mut frame = Base64Frame::open_for::<i64>(&mut one_by_one, values.len()).unwrap();
        for value in &values {
            frame.push(*value).unwrap();
        }
        frame.close().unwrap();

        let mut bulk = Vec::new();
        let mut frame = Base64Frame::open_for::<i64>(&mut bulk, values.len()).unwrap();
        frame.push_slice(&values).unwrap();
        frame.close().unwrap();

        assert_eq!(one_by_one, bulk);
    }

    #[test]
    fn partial_group_is_flushed() {
        // 8 byte header + 1 byte payload = 9 bytes -> 12 base64 characters
        let mut buffer = Vec::new();
        let mut frame = Base64Frame::open_for::<u8>(&mut buffer, 1).unwrap();
        frame.push(9_u8).unwrap();
        frame.close().unwrap();

        assert_eq!(buffer.len(), 13);
        assert_eq!(decode(&buffer), vec![1, 0, 0, 0, 0, 0, 0, 0, 9]);
    }

    #[test]
    fn empty_array() {
        let encoded = encode_array::<f64>(&[]).unwrap();
        assert_eq!(base64::decode(&encoded).unwrap(), vec![0; 8]);
    }
}
