//! `.mate` containers: shader references plus keyed texture, color and float properties.

use std::io::{Read, Write};

use indexmap::IndexMap;

use crate::de::{Decoder, DeserializeOwned, ParseOptions};
use crate::error::{Error, Result};
use crate::menu::replace_in;
use crate::ser::{write_f32, write_i32, Serialize};

/// Leading string of every material container.
pub const MATE_HEADER: &str = "CM3D2_MATERIAL";

/// Texture subtype that carries a path, UV set name and offset/scale.
pub const TEX2D: &str = "tex2d";

pub(crate) const TAG_TEXTURE: &str = "tex";
pub(crate) const TAG_COLOR: &str = "col";
pub(crate) const TAG_FLOAT: &str = "f";
pub(crate) const TAG_END: &str = "end";

/// RGBA.
pub type Color = [f32; 4];

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "TextureRepr", into = "TextureRepr")]
pub enum TextureValue {
    Tex2d(Texture2d),
    /// Any subtype other than `tex2d` (`null`, `texRT`, ...). Only the subtype is stored.
    Other(String),
}

/// Flat JSON shape of a texture: the subtype plus the `tex2d` fields when present.
#[derive(serde::Serialize, serde::Deserialize)]
struct TextureRepr {
    subtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uv_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset_scale: Option<[f32; 4]>,
}

impl From<TextureRepr> for TextureValue {
    fn from(repr: TextureRepr) -> Self {
        if repr.subtype != TEX2D {
            return TextureValue::Other(repr.subtype);
        }

        let defaults = Texture2d::default();
        TextureValue::Tex2d(Texture2d {
            path: repr.path.unwrap_or(defaults.path),
            uv_name: repr.uv_name.unwrap_or(defaults.uv_name),
            offset_scale: repr.offset_scale.unwrap_or(defaults.offset_scale),
        })
    }
}

impl From<TextureValue> for TextureRepr {
    fn from(value: TextureValue) -> Self {
        match value {
            TextureValue::Tex2d(tex) => TextureRepr {
                subtype: TEX2D.to_string(),
                path: Some(tex.path),
                uv_name: Some(tex.uv_name),
                offset_scale: Some(tex.offset_scale),
            },
            TextureValue::Other(subtype) => TextureRepr {
                subtype,
                path: None,
                uv_name: None,
                offset_scale: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Texture2d {
    pub path: String,
    pub uv_name: String,
    /// `(offset_x, offset_y, scale_x, scale_y)`
    pub offset_scale: [f32; 4],
}

impl Texture2d {
    pub fn offset(&self) -> [f32; 2] {
        [self.offset_scale[0], self.offset_scale[1]]
    }

    pub fn scale(&self) -> [f32; 2] {
        [self.offset_scale[2], self.offset_scale[3]]
    }
}

impl Default for Texture2d {
    fn default() -> Self {
        Texture2d {
            path: String::new(),
            uv_name: String::new(),
            offset_scale: [0.0, 0.0, 1.0, 1.0],
        }
    }
}

impl TextureValue {
    /// Builds a value from a bare subtype. `tex2d` gets an empty path and identity offset/scale.
    pub fn new<S: Into<String>>(subtype: S) -> TextureValue {
        let subtype = subtype.into();
        if subtype == TEX2D {
            TextureValue::Tex2d(Texture2d::default())
        } else {
            TextureValue::Other(subtype)
        }
    }

    pub fn subtype(&self) -> &str {
        match self {
            TextureValue::Tex2d(_) => TEX2D,
            TextureValue::Other(subtype) => subtype,
        }
    }

    #[inline(always)]
    pub fn as_tex2d(&self) -> Option<&Texture2d> {
        match self {
            TextureValue::Tex2d(tex) => Some(tex),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MateRecord {
    pub version: i32,
    pub name1: String,
    pub name2: String,
    pub shader1: String,
    pub shader2: String,
    pub textures: IndexMap<String, TextureValue>,
    pub colors: IndexMap<String, Color>,
    pub floats: IndexMap<String, f32>,
}

impl MateRecord {
    pub fn parse(bytes: &[u8]) -> Result<MateRecord> {
        MateRecord::parse_with(bytes, &ParseOptions::default())
    }

    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> Result<MateRecord> {
        MateRecord::read_from(bytes, options)
    }

    /// Reads one record from the front of `reader`. Bytes after the `end` tag are left unread.
    pub fn read_from<R: Read>(reader: R, options: &ParseOptions) -> Result<MateRecord> {
        let mut decoder = Decoder::new(reader, options);
        MateRecord::deserialize_owned(&mut decoder)
    }

    /// Textures first, then colors, then floats, whatever order they were read in.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write(writer)
    }

    /// Total number of texture, color and float properties.
    pub fn property_count(&self) -> usize {
        self.textures.len() + self.colors.len() + self.floats.len()
    }

    /// Substring replacement over the names, shaders and texture paths.
    /// Returns how many strings changed.
    pub fn replace_keyword(&mut self, old: &str, new: &str) -> usize {
        if old.is_empty() {
            return 0;
        }

        let mut changed = 0;
        let scalars = [
            &mut self.name1,
            &mut self.name2,
            &mut self.shader1,
            &mut self.shader2,
        ];
        for field in scalars {
            changed += replace_in(field, old, new) as usize;
        }

        for value in self.textures.values_mut() {
            if let TextureValue::Tex2d(tex) = value {
                changed += replace_in(&mut tex.path, old, new) as usize;
            }
        }

        tracing::debug!(old, new, changed, "replaced keyword in MateRecord");
        changed
    }
}

impl Serialize for TextureValue {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            TextureValue::Tex2d(tex) => {
                TEX2D.write(writer)?;
                tex.path.write(writer)?;
                tex.uv_name.write(writer)?;
                tex.offset_scale.write(writer)
            }
            // A bare "tex2d" would be misread on the way back in.
            TextureValue::Other(subtype) if subtype == TEX2D => {
                TextureValue::new(TEX2D).write(writer)
            }
            TextureValue::Other(subtype) => subtype.write(writer),
        }
    }
}

impl DeserializeOwned for TextureValue {
    fn deserialize_owned<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        let subtype = decoder.read_str("texture subtype")?;
        if subtype != TEX2D {
            return Ok(TextureValue::Other(subtype));
        }

        let path = decoder.read_str("texture path")?;
        let uv_name = decoder.read_str("texture uv name")?;
        let offset_scale = decoder.read_f32x4("texture offset and scale")?;

        Ok(TextureValue::Tex2d(Texture2d {
            path,
            uv_name,
            offset_scale,
        }))
    }
}

impl Serialize for MateRecord {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        MATE_HEADER.write(writer)?;
        write_i32(writer, self.version)?;
        self.name1.write(writer)?;
        self.name2.write(writer)?;
        self.shader1.write(writer)?;
        self.shader2.write(writer)?;

        for (key, value) in self.textures.iter() {
            TAG_TEXTURE.write(writer)?;
            key.write(writer)?;
            value.write(writer)?;
        }

        for (key, value) in self.colors.iter() {
            TAG_COLOR.write(writer)?;
            key.write(writer)?;
            value.write(writer)?;
        }

        for (key, value) in self.floats.iter() {
            TAG_FLOAT.write(writer)?;
            key.write(writer)?;
            write_f32(writer, *value)?;
        }

        TAG_END.write(writer)
    }
}

impl DeserializeOwned for MateRecord {
    fn deserialize_owned<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        let start = decoder.position();
        decoder.expect_header(MATE_HEADER)?;

        let version = decoder.read_i32("version")?;
        let name1 = decoder.read_str("name1")?;
        let name2 = decoder.read_str("name2")?;
        let shader1 = decoder.read_str("shader1")?;
        let shader2 = decoder.read_str("shader2")?;

        let mut textures = IndexMap::new();
        let mut colors = IndexMap::new();
        let mut floats = IndexMap::new();

        loop {
            let tag = decoder.read_str("property tag")?;
            match tag.as_str() {
                TAG_END => break,
                TAG_TEXTURE => {
                    let key = decoder.read_str("texture key")?;
                    let value = TextureValue::deserialize_owned(decoder)?;
                    textures.insert(key, value);
                }
                TAG_COLOR => {
                    let key = decoder.read_str("color key")?;
                    let value = decoder.read_f32x4("color value")?;
                    colors.insert(key, value);
                }
                TAG_FLOAT => {
                    let key = decoder.read_str("float key")?;
                    let value = decoder.read_f32("float value")?;
                    floats.insert(key, value);
                }
                _ => return Err(Error::UnknownTag(tag)),
            }
        }

        let end = decoder.position();
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            version,
            textures = textures.len(),
            colors = colors.len(),
            floats = floats.len(),
            %name1,
            "deserialized MateRecord"
        );

        Ok(MateRecord {
            version,
            name1,
            name2,
            shader1,
            shader2,
            textures,
            colors,
            floats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varstr;

    fn sample() -> MateRecord {
        let mut mate = MateRecord {
            version: 1000,
            name1: "body".into(),
            name2: "body_pmat".into(),
            shader1: "CM3D2/Toony_Lighted".into(),
            shader2: "CM3D2__Toony_Lighted".into(),
            ..MateRecord::default()
        };
        mate.textures.insert(
            "_MainTex".into(),
            TextureValue::Tex2d(Texture2d {
                path: "Assets/texture/body.png".into(),
                uv_name: "_MainTex".into(),
                offset_scale: [0.0, 0.25, 1.0, 2.0],
            }),
        );
        mate.textures.insert("_ToonRamp".into(), TextureValue::new("null"));
        mate.colors.insert("_Color".into(), [1.0, 0.5, 0.25, 1.0]);
        mate.colors.insert("_ShadowColor".into(), [0.0, 0.0, 0.0, 1.0]);
        mate.floats.insert("_Shininess".into(), 0.1);
        mate
    }

    fn push_str(out: &mut Vec<u8>, s: &str) {
        out.extend(varstr::encode(s).unwrap());
    }

    fn prelude() -> Vec<u8> {
        let mut out = Vec::new();
        push_str(&mut out, MATE_HEADER);
        out.extend(7i32.to_le_bytes());
        for s in ["n1", "n2", "s1", "s2"] {
            push_str(&mut out, s);
        }
        out
    }

    #[test]
    fn round_trip_sample() {
        let mate = sample();
        let parsed = MateRecord::parse(&mate.serialize().unwrap()).unwrap();
        assert_eq!(parsed, mate);
    }

    #[test]
    fn floats_are_bit_identical() {
        let mut mate = MateRecord::default();
        let odd = [f32::from_bits(0x7fc0_1234), -0.0, f32::MIN_POSITIVE / 2.0, f32::MAX];
        mate.colors.insert("odd".into(), odd);
        mate.floats.insert("nan".into(), f32::from_bits(0x7fc0_0042));

        let parsed = MateRecord::parse(&mate.serialize().unwrap()).unwrap();
        let bits = |quad: &[f32; 4]| quad.map(f32::to_bits);
        assert_eq!(bits(&parsed.colors["odd"]), bits(&odd));
        assert_eq!(parsed.floats["nan"].to_bits(), 0x7fc0_0042);
    }

    #[test]
    fn properties_are_regrouped_by_kind() {
        let mut bytes = prelude();
        push_str(&mut bytes, "f");
        push_str(&mut bytes, "_Alpha");
        bytes.extend(0.5f32.to_le_bytes());
        push_str(&mut bytes, "col");
        push_str(&mut bytes, "_Color");
        for v in [1.0f32, 1.0, 1.0, 1.0] {
            bytes.extend(v.to_le_bytes());
        }
        push_str(&mut bytes, "tex");
        push_str(&mut bytes, "_MainTex");
        push_str(&mut bytes, "null");
        push_str(&mut bytes, "end");

        let mate = MateRecord::parse(&bytes).unwrap();
        assert_eq!(mate.version, 7);
        assert_eq!(mate.property_count(), 3);

        let out = mate.serialize().unwrap();
        let tex_at = out.windows(4).position(|w| w == b"\x03tex").unwrap();
        let col_at = out.windows(4).position(|w| w == b"\x03col").unwrap();
        let f_at = out.windows(2).position(|w| w == b"\x01f").unwrap();
        assert!(tex_at < col_at && col_at < f_at);
        assert!(out.ends_with(b"\x03end"));
    }

    #[test]
    fn exact_tex2d_layout() {
        let mut mate = MateRecord::default();
        mate.textures.insert(
            "_MainTex".into(),
            TextureValue::Tex2d(Texture2d {
                path: "a.png".into(),
                uv_name: "uv".into(),
                offset_scale: [1.0, 2.0, 3.0, 4.0],
            }),
        );
        let out = mate.serialize().unwrap();

        let mut expected = Vec::new();
        push_str(&mut expected, MATE_HEADER);
        expected.extend(0i32.to_le_bytes());
        for _ in 0..4 {
            push_str(&mut expected, "");
        }
        for s in ["tex", "_MainTex", "tex2d", "a.png", "uv"] {
            push_str(&mut expected, s);
        }
        for v in [1.0f32, 2.0, 3.0, 4.0] {
            expected.extend(v.to_le_bytes());
        }
        push_str(&mut expected, "end");

        assert_eq!(out, expected);
    }

    #[test]
    fn duplicate_keys_keep_first_position_and_last_value() {
        let mut bytes = prelude();
        for (key, value) in [("a", 1.0f32), ("b", 2.0), ("a", 3.0)] {
            push_str(&mut bytes, "f");
            push_str(&mut bytes, key);
            bytes.extend(value.to_le_bytes());
        }
        push_str(&mut bytes, "end");

        let mate = MateRecord::parse(&bytes).unwrap();
        let floats: Vec<_> = mate.floats.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(floats, vec![("a", 3.0), ("b", 2.0)]);
    }

    #[test]
    fn unknown_tag() {
        let mut bytes = prelude();
        push_str(&mut bytes, "vec");
        match MateRecord::parse(&bytes) {
            Err(Error::UnknownTag(tag)) => assert_eq!(tag, "vec"),
            other => panic!("expected UnknownTag, got {:?}", other),
        }
    }

    #[test]
    fn bad_header() {
        let mut bytes = Vec::new();
        push_str(&mut bytes, "CM3D2_MENU");
        bytes.extend(1i32.to_le_bytes());
        assert!(matches!(
            MateRecord::parse(&bytes),
            Err(Error::BadHeader { expected: MATE_HEADER, .. })
        ));
    }

    #[test]
    fn missing_end_tag_is_truncated() {
        let bytes = sample().serialize().unwrap();
        assert!(matches!(
            MateRecord::parse(&bytes[..bytes.len() - 4]),
            Err(Error::TruncatedData("property tag"))
        ));
        assert!(matches!(
            MateRecord::parse(&bytes[..bytes.len() - 6]),
            Err(Error::TruncatedData("float value"))
        ));
    }

    #[test]
    fn truncated_tex2d_payload() {
        let mut bytes = prelude();
        for s in ["tex", "_MainTex", "tex2d", "a.png", "uv"] {
            push_str(&mut bytes, s);
        }
        bytes.extend(1.0f32.to_le_bytes());
        assert!(matches!(
            MateRecord::parse(&bytes),
            Err(Error::TruncatedData("texture offset and scale"))
        ));
    }

    #[test]
    fn bare_tex2d_subtype_is_written_with_payload() {
        let mut mate = MateRecord::default();
        mate.textures.insert("_MainTex".into(), TextureValue::Other(TEX2D.into()));

        let parsed = MateRecord::parse(&mate.serialize().unwrap()).unwrap();
        assert_eq!(parsed.textures["_MainTex"], TextureValue::new(TEX2D));
        assert_eq!(parsed.textures["_MainTex"].as_tex2d().unwrap().scale(), [1.0, 1.0]);
    }

    #[test]
    fn replace_keyword_in_names_and_paths() {
        let mut mate = sample();
        assert_eq!(mate.replace_keyword("body", "skin"), 3);
        assert_eq!(mate.name1, "skin");
        assert_eq!(mate.name2, "skin_pmat");
        assert_eq!(
            mate.textures["_MainTex"].as_tex2d().unwrap().path,
            "Assets/texture/skin.png"
        );
        assert_eq!(mate.textures["_ToonRamp"].subtype(), "null");
    }

    #[test]
    fn texture_json_shape() {
        let tex = TextureValue::Tex2d(Texture2d {
            path: "a.png".into(),
            uv_name: "_MainTex".into(),
            offset_scale: [0.0, 0.0, 1.0, 1.0],
        });
        let json = serde_json::to_value(&tex).unwrap();
        assert_eq!(json["subtype"], "tex2d");
        assert_eq!(json["path"], "a.png");

        let other: TextureValue = serde_json::from_str(r#"{"subtype":"null"}"#).unwrap();
        assert_eq!(other, TextureValue::Other("null".into()));
        assert_eq!(
            serde_json::to_string(&other).unwrap(),
            r#"{"subtype":"null"}"#
        );
        let back: TextureValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, tex);
    }
}
