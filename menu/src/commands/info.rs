use std::path::PathBuf;

use humansize::{file_size_opts as options, FileSize};
use menu_format::{Asset, ParseOptions};

use crate::error::{Error, Result};

pub fn run(path: PathBuf, parse_options: &ParseOptions) -> Result<()> {
    let bytes = super::read_bytes(&path)?;
    let asset = Asset::parse(&bytes, parse_options).map_err(|source| Error::Decode {
        path: path.clone(),
        source,
    })?;

    let size = bytes
        .len()
        .file_size(options::BINARY)
        .unwrap_or_else(|_| format!("{} B", bytes.len()));

    println!("File:        {}", path.display());
    println!("Size:        {}", size);
    println!("Kind:        {}", asset.kind().header());

    match asset {
        Asset::Menu(menu) => {
            println!("Version:     {}", menu.version);
            println!("Text path:   {}", menu.text_path);
            println!("Name:        {}", menu.name);
            println!("Category:    {}", menu.category);
            println!("Description: {}", menu.description);
            println!(
                "Attributes:  {} keys, {} lines",
                menu.attrs.len(),
                menu.attrs.line_count()
            );
        }
        Asset::Mate(mate) => {
            println!("Version:     {}", mate.version);
            println!("Names:       {} / {}", mate.name1, mate.name2);
            println!("Shaders:     {} / {}", mate.shader1, mate.shader2);
            println!(
                "Properties:  {} ({} textures, {} colors, {} floats)",
                mate.property_count(),
                mate.textures.len(),
                mate.colors.len(),
                mate.floats.len()
            );
            for (key, texture) in mate.textures.iter() {
                match texture.as_tex2d() {
                    Some(tex) => println!("  {:<24} {} ({})", key, tex.path, tex.uv_name),
                    None => println!("  {:<24} <{}>", key, texture.subtype()),
                }
            }
        }
    }

    Ok(())
}
