use super::{HashFunction, leading_u64};
use md5::Md5;
use sha1::{Digest, Sha1};

/// MD5 of the UTF-8 input, truncated to its first 8 bytes (big-endian).
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hash;

impl HashFunction for Md5Hash {
    fn hash(&self, input: &str) -> u64 {
        leading_u64(&Md5::digest(input.as_bytes()))
    }
}

/// SHA-1 of the UTF-8 input, truncated to its first 8 bytes (big-endian).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Hash;

impl HashFunction for Sha1Hash {
    fn hash(&self, input: &str) -> u64 {
        leading_u64(&Sha1::digest(input.as_bytes()))
    }
}
