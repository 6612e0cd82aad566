use ring::digest::{Context, SHA256};

use crate::error::{BlockchainError, Result};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch
pub fn current_timestamp() -> Result<u64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Clock(format!("System time error: {e}")))?;
    Ok(duration.as_secs())
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// Double SHA-256 over text, where the second round hashes the lowercase hex
/// *string* of the first digest rather than its raw bytes.
///
/// Block hashes and transaction hashes are both defined by this function, so
/// the hex-string round must stay as it is.
pub fn text_hash(text: &str) -> String {
    let first = HEXLOWER.encode(&sha256_digest(text.as_bytes()));
    HEXLOWER.encode(&sha256_digest(first.as_bytes()))
}

/// Decode a hex digest and reverse its byte order.
pub fn endian_flip(hex_digest: &str) -> Result<Vec<u8>> {
    let mut bytes = HEXLOWER_PERMISSIVE
        .decode(hex_digest.as_bytes())
        .map_err(|e| BlockchainError::InvalidHash(format!("{hex_digest}: {e}")))?;
    bytes.reverse();
    Ok(bytes)
}

/// Conventional double SHA-256 over raw bytes, returned as the hex of the
/// byte-reversed digest. Only used for Merkle nodes.
pub fn merkle_node_hash(data: &[u8]) -> String {
    let mut digest = sha256_digest(&sha256_digest(data));
    digest.reverse();
    HEXLOWER.encode(&digest)
}
