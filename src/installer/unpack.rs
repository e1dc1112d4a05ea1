//! Archive extraction into a staging directory

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

/// Whether a relative path stays below the directory it is joined to
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Extract a `.tar.gz` archive into `dest`, returning the number of entries
///
/// Entries with absolute paths or `..` components fail the whole extraction.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> io::Result<usize> {
    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut count = 0;

    for entry in tar.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if !is_contained(&path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("entry '{}' escapes the bundle directory", path.display()),
            ));
        }
        entry.unpack_in(dest)?;
        count += 1;
    }

    debug!("Extracted {} entries into {}", count, dest.display());
    Ok(count)
}

/// Directory inside the staging area that becomes the bundle directory
///
/// Without `repath` the staging directory itself is used.
pub fn content_root(staging: &Path, repath: Option<&str>) -> io::Result<PathBuf> {
    let Some(repath) = repath else {
        return Ok(staging.to_path_buf());
    };

    let relative = Path::new(repath);
    if !is_contained(relative) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("repath '{}' escapes the bundle directory", repath),
        ));
    }

    let root = staging.join(relative);
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("archive has no directory '{}'", repath),
        ));
    }
    Ok(root)
}
