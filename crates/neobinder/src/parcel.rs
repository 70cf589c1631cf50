//! # Parcel
//!
//! An opaque byte container carrying transaction arguments and replies.
//!
//! This layer does not define a wire format; a `Parcel` only moves bytes.
//! The few typed accessors below (little-endian integers, length-prefixed
//! strings) exist so handlers and transports can exchange small values
//! without pulling in a serializer.

use crate::status::Result;
use crate::status::StatusCode;

/// Growable buffer written by the sender of a transaction or reply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parcel {
    data: Vec<u8>,
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a UTF-8 string prefixed by its byte length.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        let len = u32::try_from(value.len()).map_err(|_| StatusCode::BadValue)?;
        self.write_u32(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    /// Returns a cursor positioned at the start of the parcel.
    pub fn reader(&self) -> ParcelReader<'_> {
        ParcelReader { slice: &self.data, pos: 0 }
    }
}

/// A read cursor over a borrowed parcel.
///
/// Reading past the end yields `NotEnoughData` and leaves the cursor where it
/// was.
#[derive(Debug, Clone)]
pub struct ParcelReader<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> ParcelReader<'a> {
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.slice.len().saturating_sub(self.pos)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(StatusCode::NotEnoughData);
        }
        let bytes = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_str(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        let bytes = match self.read_bytes(len) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.pos = start;
                return Err(e);
            }
        };
        std::str::from_utf8(bytes).map_err(|_| {
            self.pos = start;
            StatusCode::BadValue
        })
    }
}
