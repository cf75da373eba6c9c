//! # Codec Core
//!
//! Byte-level read/write primitives and the [`Codec`] contract every record
//! implements.
//!
//! ## Wire conventions
//!
//! - Integers are fixed width, little-endian.
//! - Object type codes are one byte, except payload type codes (four bytes).
//! - Sequences of objects carry a `u16` element count.
//! - Byte blobs carry a length prefix whose width is fixed per field.
//! - `U256` values are 32 bytes, little-endian.
//!
//! There is no padding and no optional field ordering: a value has exactly
//! one encoding, so the encoding doubles as the canonical form for hashing.

pub mod array;
pub mod json;

use primitive_types::U256;

use crate::error::{Error, Result};

pub use array::{ArrayMode, ArrayRules, ElementGuard};
pub use json::JsonCodec;

/// How strictly an encode/decode call checks structure.
///
/// `Skip` still fails on truncated or unparseable bytes and on unknown type
/// codes (there is nothing to construct), but does not apply type-prefix
/// checks, array rules or length limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    Skip,
    #[default]
    Perform,
}

impl ValidationMode {
    /// `true` when structural rules must be enforced.
    pub fn validates(self) -> bool {
        matches!(self, Self::Perform)
    }
}

/// Binary encoding contract.
///
/// Implementors write their own type code (if they have one) and their
/// fields in declared order. Decoding a concrete variant under
/// [`ValidationMode::Perform`] re-checks the leading type code before
/// consuming it.
pub trait Codec: Sized {
    /// Appends the encoding of `self` to `writer`.
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()>;

    /// Reads one value from `reader`, advancing it.
    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self>;

    /// Encodes `self` into a fresh buffer.
    fn encode(&self, mode: ValidationMode) -> Result<Vec<u8>> {
        let mut writer = Writer::new();
        self.encode_into(&mut writer, mode)?;
        Ok(writer.into_inner())
    }

    /// Decodes one value from the front of `bytes`, returning it together
    /// with the number of bytes consumed.
    fn decode(bytes: &[u8], mode: ValidationMode) -> Result<(Self, usize)> {
        let mut reader = Reader::new(bytes);
        let value = Self::decode_from(&mut reader, mode)?;
        Ok((value, reader.position()))
    }

    /// Decodes a value that must span all of `bytes`.
    fn decode_exact(bytes: &[u8], mode: ValidationMode) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let value = Self::decode_from(&mut reader, mode)?;
        reader.finish()?;
        Ok(value)
    }

    /// Size of the encoding in bytes.
    fn encoded_len(&self) -> Result<usize> {
        Ok(self.encode(ValidationMode::Skip)?.len())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// A cursor over an input buffer.
///
/// Every read names the field it is reading so truncation errors say where
/// the input ran out.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fails with `TrailingBytes` if anything is left unread.
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    pub fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::Truncated {
                context,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        Ok(self.read_array::<1>(context)?[0])
    }

    pub fn read_u16(&mut self, context: &'static str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u64(&mut self, context: &'static str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u256(&mut self, context: &'static str) -> Result<U256> {
        let bytes: [u8; 32] = self.read_array(context)?;
        Ok(U256::from_little_endian(&bytes))
    }

    /// Looks at the next byte without consuming it.
    pub fn peek_u8(&self, context: &'static str) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or(Error::Truncated {
            context,
            needed: 1,
            remaining: 0,
        })
    }

    /// Looks at the next four bytes as a little-endian `u32`.
    pub fn peek_u32(&self, context: &'static str) -> Result<u32> {
        let mut probe = self.clone();
        probe.read_u32(context)
    }

    /// Consumes a one-byte type code, checking it under `Perform`.
    pub fn expect_type(
        &mut self,
        expected: u8,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<()> {
        let actual = self.read_u8(context)?;
        if mode.validates() && actual != expected {
            return Err(Error::TypeMismatch {
                context,
                actual: actual as u32,
            });
        }
        Ok(())
    }

    /// Reads a blob with a one-byte length prefix.
    pub fn read_prefixed_u8(
        &mut self,
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<Vec<u8>> {
        let len = self.read_u8(context)? as usize;
        self.read_blob(len, max, mode, context)
    }

    /// Reads a blob with a two-byte length prefix.
    pub fn read_prefixed_u16(
        &mut self,
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<Vec<u8>> {
        let len = self.read_u16(context)? as usize;
        self.read_blob(len, max, mode, context)
    }

    /// Reads a blob with a four-byte length prefix.
    pub fn read_prefixed_u32(
        &mut self,
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<Vec<u8>> {
        let len = self.read_u32(context)? as usize;
        self.read_blob(len, max, mode, context)
    }

    fn read_blob(
        &mut self,
        len: usize,
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<Vec<u8>> {
        if mode.validates() && len > max {
            return Err(Error::TooLong { context, len, max });
        }
        Ok(self.read_bytes(len, context)?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// An append-only output buffer.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u256(&mut self, v: &U256) {
        let mut bytes = [0u8; 32];
        v.to_little_endian(&mut bytes);
        self.buf.extend_from_slice(&bytes);
    }

    /// Writes a blob with a one-byte length prefix.
    pub fn write_prefixed_u8(
        &mut self,
        bytes: &[u8],
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<()> {
        let len = check_blob_len(bytes, max, u8::MAX as usize, mode, context)?;
        self.write_u8(len as u8);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a blob with a two-byte length prefix.
    pub fn write_prefixed_u16(
        &mut self,
        bytes: &[u8],
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<()> {
        let len = check_blob_len(bytes, max, u16::MAX as usize, mode, context)?;
        self.write_u16(len as u16);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a blob with a four-byte length prefix.
    pub fn write_prefixed_u32(
        &mut self,
        bytes: &[u8],
        max: usize,
        mode: ValidationMode,
        context: &'static str,
    ) -> Result<()> {
        let len = check_blob_len(bytes, max, u32::MAX as usize, mode, context)?;
        self.write_u32(len as u32);
        self.write_bytes(bytes);
        Ok(())
    }
}

/// The prefix width is a hard limit in every mode; the field limit only
/// under `Perform`.
fn check_blob_len(
    bytes: &[u8],
    max: usize,
    prefix_max: usize,
    mode: ValidationMode,
    context: &'static str,
) -> Result<usize> {
    let len = bytes.len();
    if len > prefix_max {
        return Err(Error::TooLong {
            context,
            len,
            max: prefix_max,
        });
    }
    if mode.validates() && len > max {
        return Err(Error::TooLong { context, len, max });
    }
    Ok(len)
}
