//! Versioned graph blobs.
//!
//! Encoding pipeline:
//! 1. Serialize the [`Dag`] with bincode (serde mode)
//! 2. Prefix the magic bytes and format version
//! 3. Compress with zstd
//!
//! Decoding runs the same steps backwards and re-checks every node and edge
//! handle before handing the graph out. Floats are stored bit-exact.

use std::fs;
use std::path::Path;

use arbor_graph::Dag;
use tracing::{debug, error, instrument};

use crate::{StoreError, StoreResult};

/// Current blob format version.
pub const FORMAT_VERSION: u32 = 1;

/// Magic bytes identifying a graph blob.
pub const MAGIC_BYTES: &[u8; 8] = b"ARBORDAG";

const VERSION_SIZE: usize = 4;
const HEADER_SIZE: usize = MAGIC_BYTES.len() + VERSION_SIZE;
const COMPRESSION_LEVEL: i32 = 3;

/// Encode a graph into a compressed, versioned blob.
///
/// # Errors
///
/// `Serialization` or `Compression` if either stage fails.
pub fn encode_dag(dag: &Dag) -> StoreResult<Vec<u8>> {
    let body = bincode::serde::encode_to_vec(dag, bincode::config::standard())
        .map_err(|e| StoreError::serialization(e.to_string()))?;

    let mut framed = Vec::with_capacity(HEADER_SIZE.saturating_add(body.len()));
    framed.extend_from_slice(MAGIC_BYTES);
    framed.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    framed.extend(body);

    zstd::bulk::compress(&framed, COMPRESSION_LEVEL)
        .map_err(|e| StoreError::compression(e.to_string()))
}

/// Decode a blob produced by [`encode_dag`].
///
/// # Errors
///
/// `Decompression`, `InvalidData` for a bad header, trailing bytes or
/// dangling handles, `VersionMismatch` for another format version and
/// `Deserialization` for a corrupt body.
pub fn decode_dag(bytes: &[u8]) -> StoreResult<Dag> {
    let framed = zstd::decode_all(bytes).map_err(|e| StoreError::decompression(e.to_string()))?;

    let body = strip_header(&framed)?;
    let (dag, consumed): (Dag, usize) =
        bincode::serde::decode_from_slice(body, bincode::config::standard())
            .map_err(|e| StoreError::deserialization(e.to_string()))?;
    if consumed != body.len() {
        return Err(StoreError::invalid_data(format!(
            "{} trailing bytes after graph",
            body.len().saturating_sub(consumed)
        )));
    }

    dag.check_references()
        .map_err(|e| StoreError::invalid_data(e.to_string()))?;
    Ok(dag)
}

fn strip_header(framed: &[u8]) -> StoreResult<&[u8]> {
    let (magic, rest) = framed
        .split_at_checked(MAGIC_BYTES.len())
        .ok_or_else(|| StoreError::invalid_data("blob shorter than header"))?;
    if magic != MAGIC_BYTES {
        return Err(StoreError::invalid_data("missing ARBORDAG magic bytes"));
    }

    let (version, body) = rest
        .split_first_chunk::<VERSION_SIZE>()
        .ok_or_else(|| StoreError::invalid_data("blob shorter than header"))?;
    let found = u32::from_le_bytes(*version);
    if found != FORMAT_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: FORMAT_VERSION,
            found,
        });
    }
    Ok(body)
}

/// Write a graph blob to `path`.
///
/// # Errors
///
/// `AlreadyExists` if `path` exists and `force_override` is off, otherwise
/// any encoding or I/O failure.
#[instrument(skip(dag), fields(dag_id = dag.id()))]
pub fn save_dag(path: &Path, dag: &Dag, force_override: bool) -> StoreResult<()> {
    if path.exists() && !force_override {
        error!(
            path = %path.display(),
            "File already exists, use force_override if it should be overwritten"
        );
        return Err(StoreError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "Saving dag");
    let bytes = encode_dag(dag)?;
    fs::write(path, bytes).map_err(|e| StoreError::io(path, &e))?;
    debug!(path = %path.display(), "Dag saved");
    Ok(())
}

/// Read a graph blob from `path`.
///
/// # Errors
///
/// `NotFound` for a missing file, otherwise any I/O or decoding failure.
#[instrument]
pub fn load_dag(path: &Path) -> StoreResult<Dag> {
    if !path.exists() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, &e))?;
    let dag = decode_dag(&bytes)?;
    debug!(
        nodes = dag.node_count(),
        edges = dag.edge_count(),
        "Dag loaded"
    );
    Ok(dag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_graph::{GraphBuilder, GraphResult};

    fn small_dag() -> GraphResult<Dag> {
        let mut builder = GraphBuilder::new().with_id("M02");
        let root = builder.add_node((0, 0, 0));
        let tip = builder.add_node((0, 3, 1));
        builder.connect(root, tip)?;
        builder.build(root)
    }

    #[test]
    fn test_header_precedes_body() -> Result<(), Box<dyn std::error::Error>> {
        let bytes = encode_dag(&small_dag()?)?;
        let framed = zstd::decode_all(bytes.as_slice())?;

        assert_eq!(framed.get(..8), Some(&MAGIC_BYTES[..]));
        assert_eq!(framed.get(8..12), Some(&FORMAT_VERSION.to_le_bytes()[..]));
        Ok(())
    }

    #[test]
    fn test_wrong_magic_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
        let blob = zstd::bulk::compress(b"NOTADAG\0\x01\0\0\0rest", 3)?;
        assert!(matches!(decode_dag(&blob), Err(StoreError::InvalidData { .. })));
        Ok(())
    }

    #[test]
    fn test_future_version_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let mut framed = MAGIC_BYTES.to_vec();
        framed.extend_from_slice(&7_u32.to_le_bytes());
        let blob = zstd::bulk::compress(&framed, 3)?;

        assert!(matches!(
            decode_dag(&blob),
            Err(StoreError::VersionMismatch {
                expected: FORMAT_VERSION,
                found: 7
            })
        ));
        Ok(())
    }

    #[test]
    fn test_truncated_header_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
        let blob = zstd::bulk::compress(b"ARBOR", 3)?;
        assert!(matches!(decode_dag(&blob), Err(StoreError::InvalidData { .. })));
        Ok(())
    }

    #[test]
    fn test_garbage_is_not_zstd() {
        assert!(matches!(
            decode_dag(b"plainly not compressed"),
            Err(StoreError::Decompression { .. })
        ));
    }
}
