//! Deterministic byte layout for every exportable artifact.
//!
//! An artifact starts with its scheme code byte (keys add a kind byte),
//! followed by its fields in a fixed order. Each algebraic field is
//! encoded as a little-endian `u32` length followed by that many bytes of
//! the element's canonical compressed form. An absent field is a bare
//! zero length: the reader consumes exactly the four length bytes and
//! moves on, so subsequent fields stay aligned. Integers are encoded as
//! little-endian `u64` without a length prefix.

use crate::error::EncodingError;
use crate::group::{Element, Encodable};

/// Key kind bytes, shared across schemes.
pub const KEY_KIND_GROUP: u8 = 0;
pub const KEY_KIND_MGR: u8 = 1;
pub const KEY_KIND_MEM: u8 = 2;
pub const KEY_KIND_BLD: u8 = 3;

/// Serializes artifacts field by field.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    pub fn put_u8(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_element<E: Encodable>(&mut self, e: &E) {
        let bytes = e.marshal();
        self.buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&bytes);
    }

    /// Absent fields are written as a zero-length record.
    pub fn put_opt_element<E: Encodable>(&mut self, e: Option<&E>) {
        match e {
            Some(e) => self.put_element(e),
            None => self.buf.extend_from_slice(&0u32.to_le_bytes()),
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Deserializes artifacts field by field, validating lengths and element
/// encodings as it goes.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], EncodingError> {
        if self.remaining() < n {
            return Err(EncodingError::Truncated(what));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn get_u8(&mut self, what: &'static str) -> Result<u8, EncodingError> {
        Ok(self.take(1, what)?[0])
    }

    pub fn get_u64(&mut self, what: &'static str) -> Result<u64, EncodingError> {
        let bytes = self.take(8, what)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    /// Reads the leading scheme code byte and checks it against the
    /// caller's expectation.
    pub fn expect_code(&mut self, expected: u8) -> Result<(), EncodingError> {
        let got = self.get_u8("scheme code")?;
        if got != expected {
            return Err(EncodingError::SchemeCode { got, expected });
        }
        Ok(())
    }

    /// Reads the key kind byte and checks it against the caller's
    /// expectation.
    pub fn expect_kind(&mut self, expected: u8) -> Result<(), EncodingError> {
        let got = self.get_u8("key kind")?;
        if got != expected {
            return Err(EncodingError::KeyKind { got, expected });
        }
        Ok(())
    }

    /// Reads an optional element. A zero length means the field is
    /// absent.
    pub fn get_opt_element<E: Element + Encodable>(
        &mut self,
        what: &'static str,
    ) -> Result<Option<E>, EncodingError> {
        let len_bytes = self.take(4, what)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(len_bytes);
        let len = u32::from_le_bytes(raw) as usize;
        if len == 0 {
            return Ok(None);
        }
        if len != E::marshal_len() || len > self.remaining() {
            return Err(EncodingError::BadLength);
        }
        let bytes = self.take(len, what)?;
        let mut e = E::new();
        e.unmarshal(bytes)?;
        Ok(Some(e))
    }

    /// Reads a mandatory element, failing if the field is absent.
    pub fn get_element<E: Element + Encodable>(
        &mut self,
        what: &'static str,
    ) -> Result<E, EncodingError> {
        self.get_opt_element(what)?
            .ok_or(EncodingError::MissingField(what))
    }

    /// Fails unless the whole buffer has been consumed.
    pub fn finish(self) -> Result<(), EncodingError> {
        if self.remaining() != 0 {
            return Err(EncodingError::TrailingBytes);
        }
        Ok(())
    }
}

/// Text serialization is base64 of the byte serialization.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::encode(bytes)
}

pub fn from_base64(s: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(base64::decode(s.trim())?)
}
