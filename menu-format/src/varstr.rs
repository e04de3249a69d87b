//! Length-prefixed UTF-8 strings.
//!
//! Every string in both containers is stored as a byte count followed by that
//! many raw UTF-8 bytes. The canonical byte count is a little-endian base-128
//! integer: each byte contributes its low seven bits, and a set high bit means
//! another byte follows. At most [`MAX_LENGTH_GROUPS`] bytes are allowed.
//!
//! Some older tools wrote the count as a single plain byte instead. Those files
//! are readable with [`LengthPrefix::SingleByte`], but nothing here ever
//! writes that form.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on the number of bytes in a length prefix.
pub const MAX_LENGTH_GROUPS: usize = 9;

/// Largest byte length a prefix of [`MAX_LENGTH_GROUPS`] groups can express (`128^9 - 1`).
pub const MAX_STRING_LEN: u64 = (1 << (7 * MAX_LENGTH_GROUPS as u64)) - 1;

/// How the byte count in front of a string is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthPrefix {
    /// Base-128 groups with a continuation bit.
    #[default]
    Continuation,
    /// A single byte holding the whole length (at most 255). Read-only.
    SingleByte,
}

pub(crate) fn read_len<R: Read>(
    reader: &mut R,
    prefix: LengthPrefix,
    what: &'static str,
) -> Result<u64> {
    let read_byte = |reader: &mut R| reader.read_u8().map_err(Error::from_read(what));

    match prefix {
        LengthPrefix::SingleByte => Ok(u64::from(read_byte(reader)?)),
        LengthPrefix::Continuation => {
            let mut len = 0u64;
            for i in 0..MAX_LENGTH_GROUPS {
                let n = read_byte(reader)?;
                len |= u64::from(n & 0x7f) << (7 * i);
                if n & 0x80 == 0 {
                    return Ok(len);
                }
            }
            Err(Error::LengthOverflow(len))
        }
    }
}

pub(crate) fn write_len<W: Write>(writer: &mut W, mut len: u64) -> Result<()> {
    if len > MAX_STRING_LEN {
        return Err(Error::LengthOverflow(len));
    }

    while len >= 0x80 {
        writer.write_u8((len & 0x7f) as u8 | 0x80)?;
        len >>= 7;
    }
    writer.write_u8(len as u8)?;
    Ok(())
}

/// Reads one prefixed string. `what` names the field for truncation errors.
pub(crate) fn read_str<R: Read>(
    reader: &mut R,
    prefix: LengthPrefix,
    what: &'static str,
) -> Result<String> {
    let len = read_len(reader, prefix, what)?;

    let mut buf = Vec::with_capacity(len.min(4096) as usize);
    reader
        .take(len)
        .read_to_end(&mut buf)
        .map_err(Error::from_read(what))?;

    if (buf.len() as u64) < len {
        return Err(Error::TruncatedData(what));
    }

    String::from_utf8(buf).map_err(Error::EncodingError)
}

pub(crate) fn write_str<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    write_len(writer, value.len() as u64)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

/// Decodes one continuation-prefixed string from the front of `reader`.
pub fn decode<R: Read>(reader: &mut R) -> Result<String> {
    read_str(reader, LengthPrefix::Continuation, "string")
}

/// Decodes one string using an explicit prefix layout.
pub fn decode_with<R: Read>(reader: &mut R, prefix: LengthPrefix) -> Result<String> {
    read_str(reader, prefix, "string")
}

/// Encodes `value` with a continuation prefix.
pub fn encode(value: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(value.len() + 2);
    write_str(&mut out, value)?;
    Ok(out)
}
