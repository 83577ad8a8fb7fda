//! Packaging-time image indexer.
//!
//! Enumerates `public/images/` and bakes the listing into
//! `assets/image_manifest.json`, which the app embeds and consults instead
//! of ever touching the filesystem at runtime. Run it whenever photos are
//! added:
//!
//! ```text
//! cargo run --bin asset_indexer [public-dir] [output-file]
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_OUTPUT: &str = "assets/image_manifest.json";

fn main() -> io::Result<()> {
    let mut args = env::args().skip(1);
    let public_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));

    let mut paths = Vec::new();
    collect_images(&public_dir.join("images"), &public_dir, &mut paths)?;
    // Deterministic manifest order across platforms; the resolver's
    // alternate ordering follows this.
    paths.sort();

    let json = serde_json::to_string_pretty(&paths)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(&output, json)?;

    println!("Indexed {} images into {}", paths.len(), output.display());
    Ok(())
}

fn collect_images(dir: &Path, public_dir: &Path, out: &mut Vec<String>) -> io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_images(&path, public_dir, out)?;
        } else if has_image_extension(&path) {
            if let Ok(relative) = path.strip_prefix(public_dir) {
                out.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("png"))
}
