// Mask Generation Function
// MGF1 over SHA-1, as used by the OAEP codec

use sha1::{Digest, Sha1};

/// Hash primitive behind MGF1 and the OAEP label hash
pub type MgfHash = Sha1;

/// Output length of [`MgfHash`] in bytes (hLen)
pub const HASH_LEN: usize = 20;

/// Hash `data` with [`MgfHash`]
pub fn hash(data: &[u8]) -> Vec<u8> {
    MgfHash::digest(data).to_vec()
}

/// MGF1 with the fixed hash: `mask_len` bytes derived from `seed`
pub fn mgf1(seed: &[u8], mask_len: usize) -> Vec<u8> {
    mgf1_with::<MgfHash>(seed, mask_len)
}

/// MGF1 with an arbitrary digest.
///
/// Concatenates `D(seed || BE32(counter))` for counter = 0, 1, ... and
/// truncates to exactly `mask_len` bytes.
pub fn mgf1_with<D: Digest>(seed: &[u8], mask_len: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(mask_len + <D as Digest>::output_size());
    let mut counter = 0u32;

    while mask.len() < mask_len {
        let mut hasher = D::new();
        hasher.update(seed);
        hasher.update(counter.to_be_bytes());
        mask.extend_from_slice(&hasher.finalize());
        counter += 1;
    }

    mask.truncate(mask_len);
    mask
}

/// XOR `mask` into `data`; both must have the same length
pub(crate) fn xor_in_place(data: &mut [u8], mask: &[u8]) {
    debug_assert_eq!(data.len(), mask.len());
    data.iter_mut().zip(mask).for_each(|(a, &b)| *a ^= b);
}
