//! Curve contexts.

use alloc::{boxed::Box, vec, vec::Vec};

use montfield::{FieldElement, MontCtx, ProtMemory, scatter};
use rand_core::RngCore;

use crate::{
    arith::{self, Workplace},
    curve::{self, NistCurve},
    error::{Error, Result},
};

/// Pre-computed generator window tables.
///
/// Table `i` holds the affine multiples `{0, 1, …, 2^w − 1}·(2^(w·i)·G)`,
/// scattered across cache lines with the context seed. The zero multiple is
/// the all-zero (0, 0) infinity encoding.
pub(crate) struct GenTables {
    pub window: u32,
    /// Entries hold plain rather than Montgomery-form integers.
    pub plain: bool,
    pub entry_len: usize,
    /// Generator affine coordinates, Montgomery form.
    pub gx: FieldElement,
    pub gy: FieldElement,
    pub tables: Vec<ProtMemory>,
}

/// Descriptor of a short Weierstrass curve `y² = x³ − 3x + b`.
///
/// Owns the Montgomery field context, the curve constant `b` in Montgomery
/// form, the group order, and (for the built-in NIST presets) the generator
/// tables. Immutable once built; may be shared across threads for read-only
/// use. Points borrow their context, so it outlives them by construction.
pub struct EcContext {
    mont: MontCtx,
    b: FieldElement,
    order: Box<[u8]>,
    tables: Option<GenTables>,
}

impl EcContext {
    /// Create a context from big-endian curve parameters.
    ///
    /// `modulus`, `b` and `order` must all have the byte length of the
    /// field prime. `seed` scrambles the cache-line layout of the generator
    /// tables; a fixed seed gives a reproducible layout, a random one
    /// hardens against adversaries who can induce repeated runs.
    pub fn new(modulus: &[u8], b: &[u8], order: &[u8], seed: u64) -> Result<Self> {
        if b.len() != modulus.len() || order.len() != modulus.len() {
            return Err(Error::InvalidLength);
        }

        let mont = MontCtx::new(modulus)?;
        let b_mont = mont.from_bytes(b)?;
        let mut ctx = Self {
            mont,
            b: b_mont,
            order: order.into(),
            tables: None,
        };

        if let Some(preset) = curve::recognize(modulus, b, order) {
            ctx.tables = Some(ctx.build_tables(preset, seed)?);
        }

        Ok(ctx)
    }

    /// Like [`new`](Self::new), drawing the scramble seed from `rng`.
    pub fn new_with_rng<R: RngCore + ?Sized>(
        modulus: &[u8],
        b: &[u8],
        order: &[u8],
        rng: &mut R,
    ) -> Result<Self> {
        Self::new(modulus, b, order, rng.next_u64())
    }

    /// The Montgomery field context of the curve's prime.
    pub fn mont(&self) -> &MontCtx {
        &self.mont
    }

    /// The group order, big-endian, as supplied at construction.
    pub fn order(&self) -> &[u8] {
        &self.order
    }

    pub(crate) fn b(&self) -> &FieldElement {
        &self.b
    }

    pub(crate) fn tables(&self) -> Option<&GenTables> {
        self.tables.as_ref()
    }

    /// Compute and scatter the window tables for the preset generator.
    fn build_tables(&self, preset: &NistCurve, seed: u64) -> Result<GenTables> {
        let mont = &self.mont;
        let mut wp = Workplace::new(mont);

        let gx = mont.from_bytes(preset.gx)?;
        let gy = mont.from_bytes(preset.gy)?;

        let window = preset.window;
        let points_per_table = 1usize << window;
        let nr_tables = (mont.bytes() * 8).div_ceil(window as usize);
        let entry_len = if preset.plain_tables {
            2 * mont.bytes()
        } else {
            2 * mont.words() * 8
        };

        // Base point of the current table: 2^(w·i)·G, Jacobian.
        let mut bx = gx.clone();
        let mut by = gy.clone();
        let mut bz = mont.alloc();
        mont.set_one(&mut bz);

        let mut tables = Vec::with_capacity(nr_tables);
        for _ in 0..nr_tables {
            // Multiples 1·B .. (2^w − 1)·B of the base.
            let mut xs = Vec::with_capacity(points_per_table - 1);
            let mut ys = Vec::with_capacity(points_per_table - 1);
            let mut zs = Vec::with_capacity(points_per_table - 1);
            xs.push(bx.clone());
            ys.push(by.clone());
            zs.push(bz.clone());
            for j in 1..points_per_table - 1 {
                let mut nx = xs[j - 1].clone();
                let mut ny = ys[j - 1].clone();
                let mut nz = zs[j - 1].clone();
                arith::full_add(mont, &mut wp, &mut nx, &mut ny, &mut nz, &bx, &by, &bz);
                xs.push(nx);
                ys.push(ny);
                zs.push(nz);
            }
            batch_normalize(mont, &mut wp, &mut xs, &mut ys, &mut zs);

            let mut blobs: Vec<Vec<u8>> = Vec::with_capacity(points_per_table);
            blobs.push(vec![0u8; entry_len]); // 0·B, the (0, 0) infinity encoding
            let half = entry_len / 2;
            for j in 0..points_per_table - 1 {
                let mut blob = vec![0u8; entry_len];
                if preset.plain_tables {
                    mont.to_bytes(&mut blob[..half], &xs[j], &mut wp.scratch)?;
                    mont.to_bytes(&mut blob[half..], &ys[j], &mut wp.scratch)?;
                } else {
                    mont.montgomery_to_le_bytes(&xs[j], &mut blob[..half]);
                    mont.montgomery_to_le_bytes(&ys[j], &mut blob[half..]);
                }
                blobs.push(blob);
            }
            let refs: Vec<&[u8]> = blobs.iter().map(|b| b.as_slice()).collect();
            tables.push(scatter(&refs, seed)?);

            // Advance the base to 2^w·B.
            for _ in 0..window {
                arith::full_double(mont, &mut wp, &mut bx, &mut by, &mut bz);
            }
        }

        Ok(GenTables {
            window,
            plain: preset.plain_tables,
            entry_len,
            gx,
            gy,
            tables,
        })
    }
}

/// Convert a batch of Jacobian points (none at infinity) to affine form
/// with a single field inversion (Montgomery's trick).
fn batch_normalize(
    mont: &MontCtx,
    wp: &mut Workplace,
    xs: &mut [FieldElement],
    ys: &mut [FieldElement],
    zs: &mut [FieldElement],
) {
    let m = zs.len();
    debug_assert!(m > 0);

    // prefix[k] = z_0·z_1···z_k
    let mut prefix = Vec::with_capacity(m);
    prefix.push(zs[0].clone());
    for k in 1..m {
        let mut acc = prefix[k - 1].clone();
        mont.mul_assign(&mut acc, &zs[k], &mut wp.scratch);
        prefix.push(acc);
    }

    // inv = (z_0···z_(m-1))⁻¹, peeled one z at a time walking backwards
    let mut inv = mont.alloc();
    mont.inv_prime(&mut inv, &prefix[m - 1], &mut wp.scratch);

    let mut zinv = mont.alloc();
    for k in (0..m).rev() {
        if k > 0 {
            mont.mul(&mut zinv, &inv, &prefix[k - 1], &mut wp.scratch);
        } else {
            mont.copy(&mut zinv, &inv);
        }
        mont.mul_assign(&mut inv, &zs[k], &mut wp.scratch);

        mont.square(&mut wp.a, &zinv, &mut wp.scratch);
        mont.mul(&mut wp.b, &wp.a, &zinv, &mut wp.scratch);
        mont.mul_assign(&mut xs[k], &wp.a, &mut wp.scratch);
        mont.mul_assign(&mut ys[k], &wp.b, &mut wp.scratch);
        mont.set_one(&mut zs[k]);
    }
}
