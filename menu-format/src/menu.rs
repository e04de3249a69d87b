//! `.menu` containers: item metadata plus repeatable keyed attribute lines.

use std::io::{Read, Write};

use byteorder::WriteBytesExt;
use indexmap::IndexMap;

use crate::de::{Decoder, DeserializeOwned, ParseOptions};
use crate::error::{Error, Result};
use crate::ser::{write_i32, Serialize};

/// Leading string of every menu container.
pub const MENU_HEADER: &str = "CM3D2_MENU";

/// Attribute lines grouped by key, keys in first-seen order.
///
/// The binary block may interleave lines of different keys; that interleaving
/// is not kept. Each key's lines stay in their original relative order and are
/// written back contiguously at the key's first position.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Attrs(IndexMap<String, Vec<Vec<String>>>);

impl Attrs {
    pub fn new() -> Attrs {
        Attrs::default()
    }

    /// Appends one line under `key`, adding the key at the end if unseen.
    pub fn push_line<K: Into<String>>(&mut self, key: K, values: Vec<String>) {
        self.0.entry(key.into()).or_default().push(values);
    }

    pub fn lines(&self, key: &str) -> Option<&[Vec<String>]> {
        self.0.get(key).map(|lines| lines.as_slice())
    }

    pub fn lines_mut(&mut self, key: &str) -> Option<&mut Vec<Vec<String>>> {
        self.0.get_mut(key)
    }

    /// Removes every line of `key`. The remaining keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Vec<Vec<String>>> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Every line in write order, paired with its key.
    pub fn iter_lines(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .flat_map(|(key, lines)| lines.iter().map(move |line| (key.as_str(), line.as_slice())))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of lines across all keys.
    pub fn line_count(&self) -> usize {
        self.0.values().map(|lines| lines.len()).sum()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<Vec<String>>> {
        self.0.iter()
    }

    pub(crate) fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, Vec<Vec<String>>> {
        self.0.values_mut()
    }
}

impl FromIterator<(String, Vec<String>)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (key, values) in iter {
            attrs.push_line(key, values);
        }
        attrs
    }
}

impl<'a> IntoIterator for &'a Attrs {
    type Item = (&'a String, &'a Vec<Vec<String>>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<Vec<String>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MenuRecord {
    pub version: i32,
    pub text_path: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub attrs: Attrs,
}

impl MenuRecord {
    pub fn parse(bytes: &[u8]) -> Result<MenuRecord> {
        MenuRecord::parse_with(bytes, &ParseOptions::default())
    }

    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> Result<MenuRecord> {
        MenuRecord::read_from(bytes, options)
    }

    /// Reads one record from the front of `reader`. Bytes after the block terminator are left unread.
    pub fn read_from<R: Read>(reader: R, options: &ParseOptions) -> Result<MenuRecord> {
        let mut decoder = Decoder::new(reader, options);
        MenuRecord::deserialize_owned(&mut decoder)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write(writer)
    }

    /// Substring replacement over the scalar fields and every attribute value.
    /// Keys are left alone. Returns how many strings changed.
    pub fn replace_keyword(&mut self, old: &str, new: &str) -> usize {
        if old.is_empty() {
            return 0;
        }

        let mut changed = 0;
        let scalars = [
            &mut self.text_path,
            &mut self.name,
            &mut self.category,
            &mut self.description,
        ];
        for field in scalars {
            changed += replace_in(field, old, new) as usize;
        }

        for lines in self.attrs.values_mut() {
            for value in lines.iter_mut().flatten() {
                changed += replace_in(value, old, new) as usize;
            }
        }

        tracing::debug!(old, new, changed, "replaced keyword in MenuRecord");
        changed
    }

    /// Drops every line of each listed key. Returns the number of lines removed.
    pub fn remove_attrs<I, S>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .filter_map(|key| self.attrs.remove(key.as_ref()))
            .map(|lines| lines.len())
            .sum()
    }
}

pub(crate) fn replace_in(field: &mut String, old: &str, new: &str) -> bool {
    if !field.contains(old) {
        return false;
    }
    *field = field.replace(old, new);
    true
}

impl MenuRecord {
    /// Encodes the attribute lines plus terminator. Every size check happens
    /// here, before anything reaches the caller's writer.
    fn attribute_block(&self) -> Result<(i32, Vec<u8>)> {
        let mut block = Vec::new();
        for (key, values) in self.attrs.iter_lines() {
            let arity = u8::try_from(values.len() + 1)
                .map_err(|_| Error::TooManyValues(values.len()))?;
            block.write_u8(arity)?;
            key.write(&mut block)?;
            for value in values {
                value.write(&mut block)?;
            }
        }
        block.write_u8(0)?;

        let block_len = i32::try_from(block.len()).map_err(|_| Error::TooManyValues(block.len()))?;
        Ok((block_len, block))
    }
}

impl Serialize for MenuRecord {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let (block_len, block) = self.attribute_block()?;

        MENU_HEADER.write(writer)?;
        write_i32(writer, self.version)?;
        self.text_path.write(writer)?;
        self.name.write(writer)?;
        self.category.write(writer)?;
        self.description.write(writer)?;
        write_i32(writer, block_len)?;
        writer.write_all(&block)?;
        Ok(())
    }
}

impl DeserializeOwned for MenuRecord {
    fn deserialize_owned<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        let start = decoder.position();
        decoder.expect_header(MENU_HEADER)?;

        let version = decoder.read_i32("version")?;
        let text_path = decoder.read_str("text path")?;
        let name = decoder.read_str("name")?;
        let category = decoder.read_str("category")?;
        let description = decoder.read_str("description")?;

        // The terminator byte ends the block; the declared length is only checked.
        let declared_len = decoder.read_i32("attribute block length")?;
        let block_start = decoder.position();

        let mut attrs = Attrs::new();
        loop {
            let arity = decoder.read_u8("attribute line arity")?;
            if arity == 0 {
                break;
            }

            let key = decoder.read_str("attribute key")?;
            let mut values = Vec::with_capacity(arity as usize - 1);
            for _ in 1..arity {
                values.push(decoder.read_str("attribute value")?);
            }
            attrs.push_line(key, values);
        }

        let end = decoder.position();
        let block_len = end - block_start;
        if u64::try_from(declared_len).ok() != Some(block_len) {
            tracing::warn!(
                declared = declared_len,
                actual = block_len,
                "menu attribute block length does not match its contents"
            );
        }

        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            version,
            keys = attrs.len(),
            lines = attrs.line_count(),
            %name,
            "deserialized MenuRecord"
        );

        Ok(MenuRecord {
            version,
            text_path,
            name,
            category,
            description,
            attrs,
        })
    }
}
