use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::input::InputError;

/// Reads the whole source into memory, inflating `.gz` files on the way.
/// The file handle is closed before returning.
pub fn read_source(path: &Path) -> Result<Vec<u8>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = Vec::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file)
            .read_to_end(&mut buf)
            .map_err(|source| InputError::Decompress {
                path: path.to_path_buf(),
                source,
            })?;
    } else {
        BufReader::new(file).read_to_end(&mut buf)?;
    }
    Ok(buf)
}
