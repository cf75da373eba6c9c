//! # Hashing Utilities
//!
//! BLAKE2b at the two output sizes the ledger uses. Both are plain
//! unkeyed BLAKE2b with the digest length set in the parameter block, so
//! `blake2b_160` is not a truncation of `blake2b_256`.

use blake2::digest::consts::{U20, U32};
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;
type Blake2b160 = Blake2b<U20>;

/// BLAKE2b with a 32-byte digest.
///
/// Used for signing messages (over the essence encoding) and for deriving
/// an Ed25519 address from a public key.
///
/// # Example
///
/// ```
/// use tangle_protocol::crypto::blake2b_256;
///
/// let digest = blake2b_256(b"essence bytes");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Blake2b256::digest(data));
    out
}

/// BLAKE2b with a 20-byte digest, the size of alias and NFT ids.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Blake2b160::digest(data));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake2b_256_known_vector() {
        // BLAKE2b-256 of the empty string.
        assert_eq!(
            hex::encode(blake2b_256(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn test_deterministic_and_sensitive() {
        assert_eq!(blake2b_256(b"abc"), blake2b_256(b"abc"));
        assert_ne!(blake2b_256(b"abc"), blake2b_256(b"abd"));
    }

    #[test]
    fn test_160_is_not_a_truncation() {
        let long = blake2b_256(b"output id");
        let short = blake2b_160(b"output id");
        assert_ne!(&long[..20], &short[..]);
    }
}
