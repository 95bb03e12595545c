use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use super::errors::PasswordError;

/// Algorithm tag embedded in every encoded record.
pub const ALGORITHM_TAG: &str = "argon2id";

/// Argon2 revision this build derives and accepts (0x13).
pub const FORMAT_VERSION: u32 = 19;

/// Work-factor parameters for a single derivation.
///
/// Stored alongside the salt and hash so that every record can be
/// re-derived from its own fields, independent of the current defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of iterations
    pub time_cost: u32,
    /// Degree of parallelism
    pub parallelism: u32,
    /// Salt length in bytes
    pub salt_length: u32,
    /// Derived key length in bytes
    pub output_length: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_cost: 64 * 1024,
            time_cost: 3,
            parallelism: 2,
            salt_length: 16,
            output_length: 32,
        }
    }
}

/// One stored credential, decoded.
///
/// Invariant: `params.salt_length == salt.len()` and
/// `params.output_length == hash.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    pub version: u32,
    pub params: HashParams,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

/// Serialize a record into the stored text form.
///
/// Produces `$argon2id$v=<version>$m=<m>,t=<t>,p=<p>$<salt>$<hash>` with
/// salt and hash base64-encoded without padding. Splitting the result on
/// `$` yields exactly six fields, the first of which is empty.
pub fn encode(record: &HashRecord) -> String {
    format!(
        "${}$v={}$m={},t={},p={}${}${}",
        ALGORITHM_TAG,
        record.version,
        record.params.memory_cost,
        record.params.time_cost,
        record.params.parallelism,
        STANDARD_NO_PAD.encode(&record.salt),
        STANDARD_NO_PAD.encode(&record.hash),
    )
}

/// Parse a stored credential back into a record.
///
/// Fails closed: any shape the encoder cannot have produced is rejected.
///
/// # Errors
/// * `MalformedHash` - field count is not six, or the tag/parameters do not parse
/// * `UnsupportedVersion` - the embedded version is not the one this build derives
/// * `InvalidEncoding` - salt or hash is not valid base64
pub fn decode(encoded: &str) -> Result<HashRecord, PasswordError> {
    let fields: Vec<&str> = encoded.split('$').collect();
    if fields.len() != 6 || !fields[0].is_empty() || fields[1] != ALGORITHM_TAG {
        return Err(PasswordError::MalformedHash);
    }

    let version: u32 = fields[2]
        .strip_prefix("v=")
        .and_then(|v| v.parse().ok())
        .ok_or(PasswordError::MalformedHash)?;
    if version != FORMAT_VERSION {
        return Err(PasswordError::UnsupportedVersion(version));
    }

    let (memory_cost, time_cost, parallelism) = parse_cost_params(fields[3])?;

    let salt = STANDARD_NO_PAD
        .decode(fields[4])
        .map_err(|e| PasswordError::InvalidEncoding(e.to_string()))?;
    let hash = STANDARD_NO_PAD
        .decode(fields[5])
        .map_err(|e| PasswordError::InvalidEncoding(e.to_string()))?;

    // The record is self-describing: the byte lengths come from the
    // decoded fields themselves, not from external configuration.
    let params = HashParams {
        memory_cost,
        time_cost,
        parallelism,
        salt_length: salt.len() as u32,
        output_length: hash.len() as u32,
    };

    Ok(HashRecord {
        version,
        params,
        salt,
        hash,
    })
}

fn parse_cost_params(field: &str) -> Result<(u32, u32, u32), PasswordError> {
    let mut parts = field.split(',');
    let memory_cost = parse_keyed(parts.next(), "m=")?;
    let time_cost = parse_keyed(parts.next(), "t=")?;
    let parallelism = parse_keyed(parts.next(), "p=")?;
    if parts.next().is_some() {
        return Err(PasswordError::MalformedHash);
    }
    Ok((memory_cost, time_cost, parallelism))
}

fn parse_keyed(part: Option<&str>, key: &str) -> Result<u32, PasswordError> {
    part.and_then(|p| p.strip_prefix(key))
        .and_then(|v| v.parse().ok())
        .ok_or(PasswordError::MalformedHash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> HashRecord {
        HashRecord {
            version: FORMAT_VERSION,
            params: HashParams {
                memory_cost: 64 * 1024,
                time_cost: 3,
                parallelism: 2,
                salt_length: 16,
                output_length: 11,
            },
            salt: b"0123456789abcdef".to_vec(),
            hash: b"secret-hash".to_vec(),
        }
    }

    #[test]
    fn test_encode_is_byte_stable() {
        let encoded = encode(&sample_record());
        assert_eq!(
            encoded,
            "$argon2id$v=19$m=65536,t=3,p=2$MDEyMzQ1Njc4OWFiY2RlZg$c2VjcmV0LWhhc2g"
        );
    }

    #[test]
    fn test_round_trip() {
        let record = sample_record();
        let decoded = decode(&encode(&record)).expect("Failed to decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_backfills_lengths() {
        let decoded =
            decode("$argon2id$v=19$m=65536,t=3,p=2$MDEyMzQ1Njc4OWFiY2RlZg$c2VjcmV0LWhhc2g")
                .expect("Failed to decode");
        assert_eq!(decoded.params.salt_length, 16);
        assert_eq!(decoded.params.output_length, 11);
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        let result = decode("$argon2id$v=19$m=65536,t=3,p=2$c2FsdA");
        assert_eq!(result, Err(PasswordError::MalformedHash));

        let result = decode("not-a-record");
        assert_eq!(result, Err(PasswordError::MalformedHash));
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let result = decode("$argon2i$v=19$m=65536,t=3,p=2$c2FsdA$aGFzaA");
        assert_eq!(result, Err(PasswordError::MalformedHash));
    }

    #[test]
    fn test_decode_rejects_unsupported_version() {
        let result = decode("$argon2id$v=16$m=65536,t=3,p=2$c2FsdA$aGFzaA");
        assert_eq!(result, Err(PasswordError::UnsupportedVersion(16)));
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let result = decode("$argon2id$v=19$m=65536,t=3,p=2$!!!$aGFzaA");
        assert!(matches!(result, Err(PasswordError::InvalidEncoding(_))));
    }

    #[test]
    fn test_decode_rejects_malformed_cost_params() {
        let result = decode("$argon2id$v=19$m=65536,t=3$c2FsdA$aGFzaA");
        assert_eq!(result, Err(PasswordError::MalformedHash));

        let result = decode("$argon2id$v=19$t=3,m=65536,p=2$c2FsdA$aGFzaA");
        assert_eq!(result, Err(PasswordError::MalformedHash));
    }
}
