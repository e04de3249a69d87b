use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};

use crate::counting::CountingReader;
use crate::error::{Error, Result};
use crate::varstr::{self, LengthPrefix};

/// Knobs for reading a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Layout of every string length prefix in the input.
    pub length_prefix: LengthPrefix,
}

impl ParseOptions {
    /// Options for files written by tools that store string lengths in one byte.
    pub fn legacy() -> ParseOptions {
        ParseOptions {
            length_prefix: LengthPrefix::SingleByte,
        }
    }
}

/// Primitive reader shared by both containers. All integers are little-endian.
pub(crate) struct Decoder<R> {
    reader: CountingReader<R>,
    prefix: LengthPrefix,
}

impl<R: Read> Decoder<R> {
    pub(crate) fn new(reader: R, options: &ParseOptions) -> Self {
        Decoder {
            reader: CountingReader::new(reader),
            prefix: options.length_prefix,
        }
    }

    /// Bytes consumed so far.
    #[inline(always)]
    pub(crate) fn position(&self) -> u64 {
        self.reader.bytes_read()
    }

    pub(crate) fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        self.reader.read_u8().map_err(Error::from_read(what))
    }

    pub(crate) fn read_i32(&mut self, what: &'static str) -> Result<i32> {
        self.reader
            .read_i32::<LittleEndian>()
            .map_err(Error::from_read(what))
    }

    pub(crate) fn read_f32(&mut self, what: &'static str) -> Result<f32> {
        self.reader
            .read_f32::<LittleEndian>()
            .map_err(Error::from_read(what))
    }

    pub(crate) fn read_f32x4(&mut self, what: &'static str) -> Result<[f32; 4]> {
        let mut out = [0f32; 4];
        self.reader
            .read_f32_into::<LittleEndian>(&mut out)
            .map_err(Error::from_read(what))?;
        Ok(out)
    }

    pub(crate) fn read_str(&mut self, what: &'static str) -> Result<String> {
        varstr::read_str(&mut self.reader, self.prefix, what)
    }

    /// Reads the leading string of a container. Truncation and bad UTF-8 fail
    /// the same way they do for any other string.
    pub(crate) fn read_header(&mut self) -> Result<String> {
        self.read_str("header")
    }

    pub(crate) fn expect_header(&mut self, expected: &'static str) -> Result<()> {
        let found = self.read_header()?;
        if found != expected {
            return Err(Error::BadHeader { expected, found });
        }
        Ok(())
    }
}

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: Read>(decoder: &mut Decoder<R>) -> Result<Self>
    where
        Self: Sized;
}
