mod asset;
mod counting;
mod de;
mod error;
pub mod mate;
pub mod menu;
mod ser;
pub mod text;
pub mod varstr;

pub use asset::{Asset, AssetKind};
pub use de::ParseOptions;
pub use error::{Error, Result};
pub use mate::{Color, MateRecord, Texture2d, TextureValue};
pub use menu::{Attrs, MenuRecord};
pub use varstr::LengthPrefix;
