use minidoge_engine::build::{build_index, trait_summary, write_artifacts, BuildError};
use minidoge_engine::types::RawCollection;
use std::fs;
use std::path::Path;

/// Offline data-prep step: reads the scraped metadata under the collection
/// root (default "."), writes the gallery index and trait summary into the
/// site's data directory, and copies the per-item images into the serving
/// location once.
fn main() -> Result<(), BuildError> {
    let root = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let root = Path::new(&root);

    let metadata_path = root.join("metadata/minidoges_all.json");
    let out_dir = root.join("site/src/data");
    let source_images = root.join("images");
    let public_images = root.join("site/public/images");

    println!("Reading metadata...");
    let raw: RawCollection = serde_json::from_str(&fs::read_to_string(&metadata_path)?)?;

    println!("Processing {} items...", raw.data.len());
    let index = build_index(&raw)?;
    let categories = trait_summary(&index);

    write_artifacts(&out_dir, &index, &categories)?;
    println!("Wrote doges-index.json ({} items)", index.len());
    println!("Wrote trait-values.json ({} categories)", categories.len());

    // The sentinel marks a completed copy; rebuilding skips it
    if !public_images.join("1.png").exists() {
        println!("Copying images to {} ...", public_images.display());
        copy_dir(&source_images, &public_images)?;
        println!("Images copied.");
    } else {
        println!("Images already present, skipping copy.");
    }

    println!("Done!");
    Ok(())
}

fn copy_dir(source: &Path, dest: &Path) -> Result<(), BuildError> {
    for entry in walkdir::WalkDir::new(source) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir yields paths under its root");
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
