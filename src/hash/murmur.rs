use super::HashFunction;

/// Murmur3 x64 128-bit (seed 0), folded to 64 bits by mixing both lanes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur3Hash;

impl HashFunction for Murmur3Hash {
    fn hash(&self, input: &str) -> u64 {
        let full = murmur3::murmur3_x64_128(&mut input.as_bytes(), 0).unwrap_or_default();

        let lo = full as u64;
        let hi = (full >> 64) as u64;

        lo ^ hi.rotate_left(1)
    }
}
