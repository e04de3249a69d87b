use crate::de::{Decoder, ParseOptions};
use crate::error::{Error, Result};
use crate::mate::{MateRecord, MATE_HEADER};
use crate::menu::{MenuRecord, MENU_HEADER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Menu,
    Mate,
}

impl AssetKind {
    pub fn header(self) -> &'static str {
        match self {
            AssetKind::Menu => MENU_HEADER,
            AssetKind::Mate => MATE_HEADER,
        }
    }

    /// Identifies a container by its leading string only.
    pub fn from_header(bytes: &[u8], options: &ParseOptions) -> Result<AssetKind> {
        let mut decoder = Decoder::new(bytes, options);
        let found = decoder.read_header()?;

        match found.as_str() {
            MENU_HEADER => Ok(AssetKind::Menu),
            MATE_HEADER => Ok(AssetKind::Mate),
            _ => Err(Error::BadHeader {
                expected: "CM3D2_MENU or CM3D2_MATERIAL",
                found,
            }),
        }
    }
}

/// Either container, as picked by its header.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Asset {
    Menu(MenuRecord),
    Mate(MateRecord),
}

impl Asset {
    pub fn parse(bytes: &[u8], options: &ParseOptions) -> Result<Asset> {
        let asset = match AssetKind::from_header(bytes, options)? {
            AssetKind::Menu => Asset::Menu(MenuRecord::parse_with(bytes, options)?),
            AssetKind::Mate => Asset::Mate(MateRecord::parse_with(bytes, options)?),
        };
        Ok(asset)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        match self {
            Asset::Menu(menu) => menu.serialize(),
            Asset::Mate(mate) => mate.serialize(),
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Menu(_) => AssetKind::Menu,
            Asset::Mate(_) => AssetKind::Mate,
        }
    }

    #[inline(always)]
    pub fn as_menu(&self) -> Option<&MenuRecord> {
        match self {
            Asset::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_mate(&self) -> Option<&MateRecord> {
        match self {
            Asset::Mate(mate) => Some(mate),
            _ => None,
        }
    }

    /// Substring replacement in whichever record this is.
    pub fn replace_keyword(&mut self, old: &str, new: &str) -> usize {
        match self {
            Asset::Menu(menu) => menu.replace_keyword(old, new),
            Asset::Mate(mate) => mate.replace_keyword(old, new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mate::TextureValue;

    #[test]
    fn dispatches_on_header() {
        let menu = MenuRecord {
            name: "Item".into(),
            ..MenuRecord::default()
        };
        let mut mate = MateRecord::default();
        mate.textures.insert("_MainTex".into(), TextureValue::new("null"));

        let options = ParseOptions::default();
        let parsed = Asset::parse(&menu.serialize().unwrap(), &options).unwrap();
        assert_eq!(parsed.kind(), AssetKind::Menu);
        assert_eq!(parsed.as_menu(), Some(&menu));

        let parsed = Asset::parse(&mate.serialize().unwrap(), &options).unwrap();
        assert_eq!(parsed.kind(), AssetKind::Mate);
        assert_eq!(parsed.serialize().unwrap(), mate.serialize().unwrap());
    }

    #[test]
    fn unknown_header() {
        let bytes = crate::varstr::encode("CM3D2_MODEL").unwrap();
        match AssetKind::from_header(&bytes, &ParseOptions::default()) {
            Err(Error::BadHeader { found, .. }) => assert_eq!(found, "CM3D2_MODEL"),
            other => panic!("expected BadHeader, got {:?}", other),
        }
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let asset = Asset::Menu(MenuRecord::default());
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["kind"], "menu");
        assert_eq!(json["version"], 0);

        let back: Asset = serde_json::from_value(json).unwrap();
        assert_eq!(back, asset);
    }
}
