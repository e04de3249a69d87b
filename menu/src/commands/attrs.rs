use std::path::PathBuf;

use menu_format::{text, Asset, ParseOptions};

use crate::error::Result;

/// Prints a menu's attributes in the block layout, or inline with `inline`.
pub fn run(path: PathBuf, inline: bool, parse_options: &ParseOptions) -> Result<()> {
    let menu = super::read_menu(&path, parse_options)?;

    if inline {
        println!("{}", text::to_inline(&menu.attrs));
    } else {
        println!("{}", text::to_block(&menu.attrs));
    }

    Ok(())
}

pub fn set(
    path: PathBuf,
    text_path: PathBuf,
    inline: bool,
    output: Option<PathBuf>,
    parse_options: &ParseOptions,
) -> Result<()> {
    let mut menu = super::read_menu(&path, parse_options)?;
    let source = super::read_text(&text_path)?;

    menu.attrs = if inline {
        text::from_inline(&source)
    } else {
        text::from_block(&source)
    };

    tracing::info!(
        keys = menu.attrs.len(),
        lines = menu.attrs.line_count(),
        "replaced attributes"
    );

    let output = super::output_or_input(&path, output);
    super::write_asset(&output, &Asset::Menu(menu))
}

pub fn remove(
    path: PathBuf,
    keys: Vec<String>,
    output: Option<PathBuf>,
    parse_options: &ParseOptions,
) -> Result<()> {
    let mut menu = super::read_menu(&path, parse_options)?;
    let removed = menu.remove_attrs(&keys);

    println!("Removed {} attribute lines", removed);

    let output = super::output_or_input(&path, output);
    super::write_asset(&output, &Asset::Menu(menu))
}
