//! Cache key derivation.
//!
//! Keys combine a resource name with its identifying parameters so distinct
//! parameter sets never collide.

use sha2::{Digest, Sha256};

/// Compute a cache key for a resource-and-parameters combination.
///
/// The key is a SHA-256 hash over the resource name and each parameter,
/// separated so `("a", ["bc"])` and `("ab", ["c"])` hash differently.
pub fn resource_key(resource: &str, params: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resource.as_bytes());
    for param in params {
        hasher.update(b"\n");
        hasher.update(param.as_bytes());
    }
    hex::encode(hasher.finalize())
}
