use std::path::PathBuf;

use menu_format::{Asset, ParseOptions};

use crate::error::{Error, Result};

/// Record equality by encoded bytes, so float properties compare bit for bit
/// and NaN matches itself.
fn encodes_to(asset: &Asset, bytes: &[u8]) -> bool {
    asset
        .serialize()
        .map(|encoded| encoded == bytes)
        .unwrap_or(false)
}

/// Decodes, re-encodes and decodes again, reporting what survived.
pub fn run(path: PathBuf, parse_options: &ParseOptions) -> Result<()> {
    let original = super::read_bytes(&path)?;
    let decode_error = |source| Error::Decode {
        path: path.clone(),
        source,
    };

    let asset = Asset::parse(&original, parse_options).map_err(decode_error)?;
    let reencoded = asset.serialize().map_err(|source| Error::Encode {
        path: path.clone(),
        source,
    })?;
    let reparsed = Asset::parse(&reencoded, &ParseOptions::default()).map_err(decode_error)?;

    let same_bytes = original == reencoded;
    let same_record = encodes_to(&reparsed, &reencoded);

    tracing::debug!(
        original = original.len(),
        reencoded = reencoded.len(),
        "validated"
    );

    println!("{}: {:?}", path.display(), asset.kind());
    println!(
        "  bytes:  {}",
        if same_bytes { "identical" } else { "differ" }
    );
    println!(
        "  record: {}",
        if same_record { "equal" } else { "differs" }
    );

    if !same_bytes {
        println!(
            "  ({} bytes read, {} bytes written; attribute regrouping or legacy prefixes change the layout)",
            original.len(),
            reencoded.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_format::MateRecord;

    #[test]
    fn nan_float_survives_reparse() {
        let mut mate = MateRecord::default();
        mate.floats.insert("_Shininess".into(), f32::NAN);

        let asset = Asset::Mate(mate);
        let bytes = asset.serialize().unwrap();
        let reparsed = Asset::parse(&bytes, &ParseOptions::default()).unwrap();

        assert_ne!(reparsed, asset);
        assert!(encodes_to(&reparsed, &bytes));
    }

    #[test]
    fn changed_record_does_not_match() {
        let mut mate = MateRecord::default();
        mate.floats.insert("_Shininess".into(), 1.0);
        let bytes = Asset::Mate(mate.clone()).serialize().unwrap();

        mate.floats.insert("_Shininess".into(), 2.0);
        assert!(!encodes_to(&Asset::Mate(mate), &bytes));
    }
}
