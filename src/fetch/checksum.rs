//! Archive integrity checks
//!
//! Archives are verified by size first, then by the digest the manifest
//! publishes (SHA-256 or BLAKE3). A file that fails verification is deleted so
//! it can never be unpacked by a later run.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{self, Result};
use crate::manifest::{Archive, Checksum};

/// Hex SHA-256 of an in-memory buffer
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Stream a file through a hasher and return the hex digest
fn hash_file(path: &Path, checksum: &Checksum) -> Result<String> {
    let file = File::open(path).map_err(|e| error::fs::read_failed(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    let mut sha256 = Sha256::new();
    let mut blake3 = blake3::Hasher::new();

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| error::fs::read_failed(path, e))?;

        if bytes_read == 0 {
            break;
        }

        match checksum {
            Checksum::Sha256(_) => sha256.update(&buffer[..bytes_read]),
            Checksum::Blake3(_) => {
                blake3.update(&buffer[..bytes_read]);
            }
        }
    }

    Ok(match checksum {
        Checksum::Sha256(_) => hex::encode(sha256.finalize()),
        Checksum::Blake3(_) => blake3.finalize().to_hex().to_string(),
    })
}

fn expected_digest(checksum: &Checksum) -> &str {
    match checksum {
        Checksum::Sha256(hex) | Checksum::Blake3(hex) => hex,
    }
}

/// Verify a downloaded archive against its manifest entry
///
/// On mismatch the file is removed before the error is returned.
pub fn verify_archive(path: &Path, archive: &Archive) -> Result<()> {
    debug!("Verifying {}", path.display());

    let result = check_size(path, archive.size).and_then(|()| {
        let actual = hash_file(path, &archive.checksum)?;
        let expected = expected_digest(&archive.checksum);
        if actual.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(error::fetch::checksum_mismatch(
                path.display().to_string(),
                expected,
                actual,
            ))
        }
    });

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove rejected archive {}: {}", path.display(), e);
        }
    }
    result
}

fn check_size(path: &Path, expected: u64) -> Result<()> {
    let actual = std::fs::metadata(path)
        .map_err(|e| error::fs::read_failed(path, e))?
        .len();
    if actual != expected {
        return Err(error::fetch::size_mismatch(
            path.display().to_string(),
            expected,
            actual,
        ));
    }
    Ok(())
}
