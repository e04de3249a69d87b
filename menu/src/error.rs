use std::path::PathBuf;

use menu_format::AssetKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read file `{}`", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write file `{}`", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode `{}`", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: menu_format::Error,
    },

    #[error("Cannot encode record for `{}`", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: menu_format::Error,
    },

    #[error("Invalid JSON in `{}`", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{}` is a {:?} container, not a menu", .path.display(), .kind)]
    NotAMenu { path: PathBuf, kind: AssetKind },

    #[error("Cannot tell how to convert `{}`; expected a .menu or .txt file", .path.display())]
    UnknownExtension { path: PathBuf },
}
