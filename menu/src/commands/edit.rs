use std::path::PathBuf;

use menu_format::ParseOptions;

use crate::error::Result;

/// Substring replacement across a menu or material. Unchanged files are left alone.
pub fn run(
    path: PathBuf,
    old: String,
    new: String,
    output: Option<PathBuf>,
    parse_options: &ParseOptions,
) -> Result<()> {
    let mut asset = super::read_asset(&path, parse_options)?;
    let changed = asset.replace_keyword(&old, &new);

    println!("{}: {} fields changed", path.display(), changed);
    if changed == 0 && output.is_none() {
        return Ok(());
    }

    let output = super::output_or_input(&path, output);
    super::write_asset(&output, &asset)
}
