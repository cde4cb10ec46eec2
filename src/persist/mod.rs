//! Binary persistence of learned weights.
//!
//! Each weight matrix is written to its own file in a small self-describing
//! layout, all integers and floats big-endian:
//!
//! ```text
//! magic  u32  = 0x4D545800 ("MTX\0")
//! rows   u32
//! cols   u32
//! data   rows * cols f64, row-major
//! ```
//!
//! `load` shape-checks each header against the target network before
//! reading any data, and decodes both files completely before touching the
//! network's weights, so a failed load leaves the in-memory network
//! unchanged.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::math::Matrix;
use crate::network::Network;

const MATRIX_MAGIC: u32 = 0x4D54_5800;

/// Failure modes of `save`/`load`.
///
/// `Io` is a filesystem-level problem (missing file, permission, short
/// write); `Format` means the file was readable but is not a weight matrix
/// of the expected shape.
#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Format(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "weight file I/O error: {}", e),
            PersistError::Format(msg) => write!(f, "weight file format error: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Format(_) => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        PersistError::Io(e)
    }
}

/// Writes both weight matrices to their respective paths.
pub fn save(
    network: &Network,
    hidden_path: &Path,
    output_path: &Path,
) -> Result<(), PersistError> {
    write_matrix_file(hidden_path, &network.hidden_weights)?;
    write_matrix_file(output_path, &network.output_weights)?;
    Ok(())
}

/// Restores both weight matrices from their respective paths.
///
/// Both files must decode and match the network's configured shapes; only
/// then are the in-memory matrices replaced.
pub fn load(
    network: &mut Network,
    hidden_path: &Path,
    output_path: &Path,
) -> Result<(), PersistError> {
    let hidden = read_matrix_file(hidden_path, network.hidden_size, network.input_size)?;
    let output = read_matrix_file(output_path, network.output_size, network.hidden_size)?;

    network.hidden_weights = hidden;
    network.output_weights = output;
    Ok(())
}

fn write_matrix_file(path: &Path, matrix: &Matrix) -> Result<(), PersistError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_matrix(&mut w, matrix)?;
    w.flush()?;
    Ok(())
}

fn read_matrix_file(
    path: &Path,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<Matrix, PersistError> {
    let file = File::open(path)?;
    let mut r = BufReader::new(file);
    read_matrix(&mut r, path, expected_rows, expected_cols)
}

fn write_matrix<W: Write>(w: &mut W, matrix: &Matrix) -> Result<(), PersistError> {
    w.write_all(&MATRIX_MAGIC.to_be_bytes())?;
    w.write_all(&(matrix.rows as u32).to_be_bytes())?;
    w.write_all(&(matrix.cols as u32).to_be_bytes())?;
    for row in &matrix.data {
        for &v in row {
            w.write_all(&v.to_be_bytes())?;
        }
    }
    Ok(())
}

fn read_matrix<R: Read>(
    r: &mut R,
    path: &Path,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<Matrix, PersistError> {
    let magic = read_u32(r, path)?;
    if magic != MATRIX_MAGIC {
        return Err(PersistError::Format(format!(
            "{}: bad magic {:#010x}, not a weight matrix file",
            path.display(),
            magic
        )));
    }

    let rows = read_u32(r, path)? as usize;
    let cols = read_u32(r, path)? as usize;

    // Shape-check the header before trusting it to size the data buffer;
    // a corrupt header must never drive the allocation.
    if rows != expected_rows || cols != expected_cols {
        return Err(PersistError::Format(format!(
            "{}: stored shape {}x{} does not match expected {}x{}",
            path.display(),
            rows,
            cols,
            expected_rows,
            expected_cols
        )));
    }

    let mut bytes = vec![0u8; rows * cols * 8];
    read_exact_or_format(r, &mut bytes, path)?;

    let values: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|c| f64::from_be_bytes(c.try_into().unwrap()))
        .collect();

    Ok(Matrix::from_row_major(rows, cols, &values))
}

fn read_u32<R: Read>(r: &mut R, path: &Path) -> Result<u32, PersistError> {
    let mut buf = [0u8; 4];
    read_exact_or_format(r, &mut buf, path)?;
    Ok(u32::from_be_bytes(buf))
}

/// A short read means the stream is truncated, which is a format problem
/// rather than a filesystem one.
fn read_exact_or_format<R: Read>(
    r: &mut R,
    buf: &mut [u8],
    path: &Path,
) -> Result<(), PersistError> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            PersistError::Format(format!("{}: truncated weight file", path.display()))
        } else {
            PersistError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn temp_pair(tag: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir();
        (
            dir.join(format!("digitnet_{}_hidden.model", tag)),
            dir.join(format!("digitnet_{}_output.model", tag)),
        )
    }

    #[test]
    fn save_load_round_trip_preserves_predictions() {
        let mut rng = StdRng::seed_from_u64(17);
        let net = Network::new(5, 4, 3, 0.2, &mut rng);
        let (hidden_path, output_path) = temp_pair("roundtrip");

        save(&net, &hidden_path, &output_path).unwrap();

        let mut restored = Network::new(5, 4, 3, 0.2, &mut rng);
        load(&mut restored, &hidden_path, &output_path).unwrap();
        std::fs::remove_file(&hidden_path).ok();
        std::fs::remove_file(&output_path).ok();

        let input = [0.1, 0.9, 0.5, 0.3, 0.7];
        let original = net.predict(&input).to_row_major();
        let reloaded = restored.predict(&input).to_row_major();
        for (a, b) in original.iter().zip(reloaded.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn load_shape_mismatch_is_format_error_and_leaves_weights_alone() {
        let mut rng = StdRng::seed_from_u64(23);
        let small = Network::new(3, 2, 2, 0.1, &mut rng);
        let (hidden_path, output_path) = temp_pair("mismatch");

        save(&small, &hidden_path, &output_path).unwrap();

        let mut target = Network::new(4, 3, 2, 0.1, &mut rng);
        let hidden_before = target.hidden_weights.clone();
        let output_before = target.output_weights.clone();

        let err = load(&mut target, &hidden_path, &output_path).unwrap_err();
        std::fs::remove_file(&hidden_path).ok();
        std::fs::remove_file(&output_path).ok();

        assert!(matches!(err, PersistError::Format(_)), "got {:?}", err);
        assert_eq!(target.hidden_weights, hidden_before);
        assert_eq!(target.output_weights, output_before);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut rng = StdRng::seed_from_u64(29);
        let mut net = Network::new(3, 2, 2, 0.1, &mut rng);
        let dir = std::env::temp_dir();

        let err = load(
            &mut net,
            &dir.join("digitnet_no_such_hidden.model"),
            &dir.join("digitnet_no_such_output.model"),
        )
        .unwrap_err();

        assert!(matches!(err, PersistError::Io(_)), "got {:?}", err);
    }

    #[test]
    fn load_truncated_file_is_format_error() {
        let mut rng = StdRng::seed_from_u64(31);
        let net = Network::new(3, 2, 2, 0.1, &mut rng);
        let (hidden_path, output_path) = temp_pair("truncated");

        save(&net, &hidden_path, &output_path).unwrap();

        // Chop the hidden file mid-data.
        let bytes = std::fs::read(&hidden_path).unwrap();
        std::fs::write(&hidden_path, &bytes[..bytes.len() - 5]).unwrap();

        let mut restored = Network::new(3, 2, 2, 0.1, &mut rng);
        let err = load(&mut restored, &hidden_path, &output_path).unwrap_err();
        std::fs::remove_file(&hidden_path).ok();
        std::fs::remove_file(&output_path).ok();

        assert!(matches!(err, PersistError::Format(_)), "got {:?}", err);
    }

    #[test]
    fn load_absurd_header_dims_is_format_error() {
        let mut rng = StdRng::seed_from_u64(41);
        let net = Network::new(3, 2, 2, 0.1, &mut rng);
        let (hidden_path, output_path) = temp_pair("absurd");

        save(&net, &hidden_path, &output_path).unwrap();

        // Valid magic, but a header claiming u32::MAX x u32::MAX. The load
        // must reject the shape without ever sizing a buffer from it.
        let mut bytes = super::MATRIX_MAGIC.to_be_bytes().to_vec();
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        std::fs::write(&hidden_path, &bytes).unwrap();

        let mut restored = Network::new(3, 2, 2, 0.1, &mut rng);
        let hidden_before = restored.hidden_weights.clone();

        let err = load(&mut restored, &hidden_path, &output_path).unwrap_err();
        std::fs::remove_file(&hidden_path).ok();
        std::fs::remove_file(&output_path).ok();

        assert!(matches!(err, PersistError::Format(_)), "got {:?}", err);
        assert_eq!(restored.hidden_weights, hidden_before);
    }

    #[test]
    fn load_bad_magic_is_format_error() {
        let mut rng = StdRng::seed_from_u64(37);
        let net = Network::new(3, 2, 2, 0.1, &mut rng);
        let (hidden_path, output_path) = temp_pair("badmagic");

        save(&net, &hidden_path, &output_path).unwrap();
        std::fs::write(&hidden_path, b"definitely not a matrix").unwrap();

        let mut restored = Network::new(3, 2, 2, 0.1, &mut rng);
        let err = load(&mut restored, &hidden_path, &output_path).unwrap_err();
        std::fs::remove_file(&hidden_path).ok();
        std::fs::remove_file(&output_path).ok();

        assert!(matches!(err, PersistError::Format(_)), "got {:?}", err);
    }
}
