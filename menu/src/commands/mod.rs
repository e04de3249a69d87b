use std::path::{Path, PathBuf};

use menu_format::{Asset, MenuRecord, ParseOptions};

use crate::error::{Error, Result};

pub mod attrs;
pub mod convert;
pub mod dump;
pub mod edit;
pub mod info;
pub mod validate;

pub use attrs::{remove as remove_attrs, run as attrs, set as set_attrs};
pub use convert::run as convert;
pub use dump::{pack, run as dump};
pub use edit::run as replace;
pub use info::run as info;
pub use validate::run as validate;

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_asset(path: &Path, options: &ParseOptions) -> Result<Asset> {
    let bytes = read_bytes(path)?;
    Asset::parse(&bytes, options).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_menu(path: &Path, options: &ParseOptions) -> Result<MenuRecord> {
    match read_asset(path, options)? {
        Asset::Menu(menu) => Ok(menu),
        other => Err(Error::NotAMenu {
            path: path.to_path_buf(),
            kind: other.kind(),
        }),
    }
}

pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_asset(path: &Path, asset: &Asset) -> Result<()> {
    let bytes = asset.serialize().map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_bytes(path, &bytes)
}

/// Edits go back to the input file unless an output is given.
#[inline(always)]
pub(crate) fn output_or_input(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.to_path_buf())
}
