//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::GzipMode;
use crate::mvt::Tile;
use std::fs;

/// Read a tile file and uncompress it according to `mode`
pub fn read_tile(path: &str, mode: GzipMode) -> Result<Vec<u8>, String> {
    let data = fs::read(path).map_err(|e| format!("Error reading tile {}: {}", path, e))?;
    let unc_tile = match mode {
        GzipMode::Never => Ok(data),
        GzipMode::Always => Tile::gunzip(&data),
        GzipMode::Auto => Tile::decompress(&data).map(|tile| tile.into_owned()),
    };
    let unc_tile = unc_tile.map_err(|e| format!("Error uncompressing tile {}: {}", path, e))?;
    debug!("Read {} bytes from {}", unc_tile.len(), path);
    Ok(unc_tile)
}

#[test]
fn test_read_tile() {
    use flate2::{write::GzEncoder, Compression};
    use std::env;
    use std::io::Write;

    let content = vec![0x1a, 0x00];
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(&content).unwrap();
    let gz = gz.finish().unwrap();

    let mut path = env::temp_dir();
    path.push("vtread_read_tile.pbf.gz");
    fs::write(&path, &gz).unwrap();
    let path = path.display().to_string();

    assert_eq!(read_tile(&path, GzipMode::Auto).unwrap(), content);
    assert_eq!(read_tile(&path, GzipMode::Always).unwrap(), content);
    assert_eq!(read_tile(&path, GzipMode::Never).unwrap(), gz);

    let mut plain = env::temp_dir();
    plain.push("vtread_read_tile.pbf");
    fs::write(&plain, &content).unwrap();
    let plain = plain.display().to_string();
    assert_eq!(read_tile(&plain, GzipMode::Auto).unwrap(), content);
    assert!(read_tile(&plain, GzipMode::Always)
        .err()
        .unwrap()
        .starts_with("Error uncompressing tile"));

    assert!(read_tile("missing.pbf", GzipMode::Auto)
        .err()
        .unwrap()
        .starts_with("Error reading tile missing.pbf"));
}
