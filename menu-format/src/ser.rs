use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::Result;
use crate::varstr;

/// Write an i32 in little-endian format
pub(crate) fn write_i32<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_i32::<LittleEndian>(value)?;
    Ok(())
}

/// Write an f32 in little-endian format
pub(crate) fn write_f32<W: Write>(writer: &mut W, value: f32) -> Result<()> {
    writer.write_f32::<LittleEndian>(value)?;
    Ok(())
}

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()>;
}

impl Serialize for str {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        varstr::write_str(writer, self)
    }
}

impl Serialize for String {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.as_str().write(writer)
    }
}

impl Serialize for [f32; 4] {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for value in self.iter() {
            write_f32(writer, *value)?;
        }
        Ok(())
    }
}
