// Bincode helpers for blocks, plus the canonical text form fed to `text_hash`
use crate::error::{BlockchainError, Result};

/// Serialize data using bincode 2.0 with standard configuration
pub fn serialize<T: bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    let config = bincode::config::standard();
    bincode::encode_to_vec(data, config)
        .map_err(|e| BlockchainError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data using bincode 2.0 with standard configuration
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: bincode::Decode<()>,
{
    let config = bincode::config::standard();
    let (data, _) = bincode::decode_from_slice(bytes, config)
        .map_err(|e| BlockchainError::Serialization(format!("Deserialization failed: {e}")))?;
    Ok(data)
}

/// Join fields in order, each prefixed with its byte length (`<len>:<text>`).
///
/// Plain concatenation lets `("1", "23")` and `("12", "3")` collide; the
/// length prefix keeps every distinct field tuple distinct.
pub fn canonical_preimage<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for field in fields {
        let field = field.as_ref();
        out.push_str(&field.len().to_string());
        out.push(':');
        out.push_str(field);
    }
    out
}
