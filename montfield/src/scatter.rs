//! Cache-line-oblivious table storage for secret-indexed lookups.
//!
//! [`scatter`] spreads N equal-length byte arrays over 64-byte cache lines:
//! each line holds one `64/N`-byte piece of every array, at a position
//! permuted by a per-line scramble word derived from a seed. A
//! [`gather`](ProtMemory::gather) walks every cache line exactly once, in
//! order, so the sequence of lines touched is the same for every index; only
//! the intra-line byte offset depends on the index, which is assumed safe
//! (no cache-sub-line side channel in the threat model).

use alloc::{boxed::Box, vec};
use core::hash::Hasher as _;

use siphasher::sip128::{Hasher128 as _, SipHasher24};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Size in bytes of one cache line of the backing store.
pub const CACHE_LINE_SIZE: usize = 64;

/// One 64-byte-aligned cache line.
#[derive(Clone, Copy)]
#[repr(align(64))]
struct CacheLine([u8; CACHE_LINE_SIZE]);

/// Expand a 64-bit seed into a pseudo-random byte stream.
///
/// SipHash-2-4 keyed with the seed bytes doubled into a 16-byte key, over a
/// 32-bit little-endian counter, emitting 16 bytes per counter value and
/// truncating the final block.
pub fn expand_seed(seed: u64, out: &mut [u8]) {
    let mut key = [0u8; 16];
    for (i, &byte) in seed.to_le_bytes().iter().enumerate() {
        key[2 * i] = byte;
        key[2 * i + 1] = byte;
    }

    for (counter, chunk) in out.chunks_mut(16).enumerate() {
        let mut hasher = SipHasher24::new_with_key(&key);
        hasher.write(&(counter as u32).to_le_bytes());
        let hash = hasher.finish128();

        let mut block = [0u8; 16];
        block[..8].copy_from_slice(&hash.h1.to_le_bytes());
        block[8..].copy_from_slice(&hash.h2.to_le_bytes());
        chunk.copy_from_slice(&block[..chunk.len()]);
    }
}

/// Scattered table: N arrays interleaved across aligned cache lines.
pub struct ProtMemory {
    lines: Box<[CacheLine]>,
    scramble: Box<[u16]>,
    nr_arrays: usize,
    array_len: usize,
}

/// Position of array `j`'s piece within cache line `i`, as a piece index.
///
/// The multiplier is forced odd so the map is a permutation of the piece
/// slots for any scramble word.
fn slot(scramble: u16, j: usize, mask: usize) -> usize {
    (j * ((scramble as usize >> 8) | 1) + (scramble as usize & 0xFF)) & mask
}

/// Spread the given equally-sized arrays into a [`ProtMemory`].
///
/// The array count must be a power of two between 2 and 64; the arrays must
/// all have the same non-zero length. The seed determines the per-line
/// scramble; a fixed seed yields a reproducible layout.
pub fn scatter(arrays: &[&[u8]], seed: u64) -> Result<ProtMemory> {
    let nr_arrays = arrays.len();
    if nr_arrays > CACHE_LINE_SIZE || nr_arrays & 1 == 1 || !nr_arrays.is_power_of_two() {
        return Err(Error::InvalidParameter);
    }
    let array_len = arrays[0].len();
    if array_len == 0 || arrays.iter().any(|a| a.len() != array_len) {
        return Err(Error::InvalidParameter);
    }

    let piece_len = CACHE_LINE_SIZE / nr_arrays;
    let cache_lines = array_len.div_ceil(piece_len);
    let mask = nr_arrays - 1;

    let mut scramble = vec![0u16; cache_lines].into_boxed_slice();
    {
        let mut stream = vec![0u8; cache_lines * 2];
        expand_seed(seed, &mut stream);
        for (word, chunk) in scramble.iter_mut().zip(stream.chunks_exact(2)) {
            *word = u16::from_le_bytes([chunk[0], chunk[1]]);
        }
    }

    let mut lines = vec![CacheLine([0; CACHE_LINE_SIZE]); cache_lines].into_boxed_slice();
    let mut remaining = array_len;
    for (i, line) in lines.iter_mut().enumerate() {
        let offset = i * piece_len;
        let take = piece_len.min(remaining);

        for (j, array) in arrays.iter().enumerate() {
            let dst = slot(scramble[i], j, mask) * piece_len;
            line.0[dst..dst + take].copy_from_slice(&array[offset..offset + take]);
        }

        remaining -= take;
    }

    Ok(ProtMemory {
        lines,
        scramble,
        nr_arrays,
        array_len,
    })
}

impl ProtMemory {
    /// Number of arrays held.
    pub fn nr_arrays(&self) -> usize {
        self.nr_arrays
    }

    /// Length in bytes of each array.
    pub fn array_len(&self) -> usize {
        self.array_len
    }

    /// Reconstruct array `index` into `out`.
    ///
    /// Visits every cache line exactly once, in order, regardless of
    /// `index`; `out` must be [`array_len`](Self::array_len) bytes.
    pub fn gather(&self, out: &mut [u8], index: usize) {
        debug_assert!(index < self.nr_arrays);
        assert_eq!(out.len(), self.array_len);

        let piece_len = CACHE_LINE_SIZE / self.nr_arrays;
        let mask = self.nr_arrays - 1;
        let mut remaining = self.array_len;

        for (i, line) in self.lines.iter().enumerate() {
            let src = slot(self.scramble[i], index, mask) * piece_len;
            let take = piece_len.min(remaining);
            let offset = i * piece_len;
            out[offset..offset + take].copy_from_slice(&line.0[src..src + take]);
            remaining -= take;
        }
    }
}

impl Drop for ProtMemory {
    fn drop(&mut self) {
        for line in self.lines.iter_mut() {
            line.0.zeroize();
        }
        self.scramble.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn expand_seed_is_deterministic_and_truncates() {
        let mut a = [0u8; 40];
        let mut b = [0u8; 40];
        expand_seed(7, &mut a);
        expand_seed(7, &mut b);
        assert_eq!(a, b);

        // a longer expansion shares its prefix
        let mut c = [0u8; 48];
        expand_seed(7, &mut c);
        assert_eq!(&c[..40], &a[..]);

        let mut d = [0u8; 40];
        expand_seed(8, &mut d);
        assert_ne!(a, d);
    }

    #[test]
    fn slot_is_a_permutation() {
        for nr in [2usize, 4, 8, 16, 32, 64] {
            let mask = nr - 1;
            for scramble in [0u16, 1, 0x00FF, 0xA5C3, 0xFFFF, 0x8001] {
                let mut seen = [false; 64];
                for j in 0..nr {
                    seen[slot(scramble, j, mask)] = true;
                }
                assert!(seen[..nr].iter().all(|&s| s), "nr={nr} scramble={scramble}");
            }
        }
    }

    #[test]
    fn round_trip_patterned_arrays() {
        let arrays: Vec<Vec<u8>> = (0u8..4).map(|p| vec![p; 100]).collect();
        let refs: Vec<&[u8]> = arrays.iter().map(|a| a.as_slice()).collect();
        let prot = scatter(&refs, 4).unwrap();

        let mut out = vec![0u8; 100];
        for i in 0..4 {
            prot.gather(&mut out, i);
            assert_eq!(out, arrays[i]);
        }
    }

    #[test]
    fn round_trip_all_shapes() {
        for nr in [2usize, 4, 8, 16, 32, 64] {
            for len in [1usize, 7, 64, 100, 257] {
                let arrays: Vec<Vec<u8>> = (0..nr)
                    .map(|j| (0..len).map(|i| (i * 31 + j * 7 + 1) as u8).collect())
                    .collect();
                let refs: Vec<&[u8]> = arrays.iter().map(|a| a.as_slice()).collect();
                let prot = scatter(&refs, 0xDEAD_BEEF).unwrap();
                assert_eq!(prot.nr_arrays(), nr);
                assert_eq!(prot.array_len(), len);

                let mut out = vec![0u8; len];
                for (j, array) in arrays.iter().enumerate() {
                    prot.gather(&mut out, j);
                    assert_eq!(&out, array, "nr={nr} len={len} index={j}");
                }
            }
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        let a = [1u8; 8];
        let b = [2u8; 8];
        let short = [3u8; 7];

        // not a power of two / out of range counts
        assert!(scatter(&[&a], 0).is_err());
        assert!(scatter(&[&a, &b, &a], 0).is_err());
        assert!(scatter(&(0..65).map(|_| &a[..]).collect::<Vec<_>>(), 0).is_err());

        // zero or mismatched lengths
        let empty: &[u8] = &[];
        assert!(scatter(&[empty, empty], 0).is_err());
        assert!(scatter(&[&a, &short], 0).is_err());

        assert!(scatter(&[&a, &b], 0).is_ok());
    }

    #[test]
    fn layout_depends_on_seed() {
        let arrays: Vec<Vec<u8>> = (0u8..2).map(|p| vec![p; 512]).collect();
        let refs: Vec<&[u8]> = arrays.iter().map(|a| a.as_slice()).collect();

        let p1 = scatter(&refs, 1).unwrap();
        let p2 = scatter(&refs, 2).unwrap();

        let flat = |p: &ProtMemory| -> Vec<u8> {
            p.lines.iter().flat_map(|l| l.0.iter().copied()).collect()
        };
        assert_ne!(flat(&p1), flat(&p2));

        // both still gather correctly
        let mut out = vec![0u8; 512];
        p2.gather(&mut out, 1);
        assert_eq!(out, arrays[1]);
    }
}
