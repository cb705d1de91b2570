//! Scalar multiplication.

use alloc::vec;

use montfield::{BitWindowRl, FieldElement, MontCtx, expand_seed};
use subtle::Choice;
use zeroize::Zeroizing;

use crate::{
    arith::{self, Workplace},
    context::{EcContext, GenTables},
    error::Result,
};

/// Left-to-right binary double-and-always-add ladder.
///
/// Every bit costs one doubling, one addition and one masked select, so the
/// field-operation sequence depends only on the scalar's bit length. The
/// value-dependent branches inside the addition formulas are never reached
/// with secret-dependent operands: the accumulator is at infinity only
/// before the first set bit (handled by the leading-bit scan) and the base
/// point is fixed.
pub(crate) fn mul_generic(
    ctx: &EcContext,
    x: &mut FieldElement,
    y: &mut FieldElement,
    z: &mut FieldElement,
    k: &[u8],
    seed: u64,
) {
    let mont = ctx.mont();
    let mut wp = Workplace::new(mont);
    let mut acc = Workplace::new(mont);

    // Re-randomize the projective representation: (λ²X, λ³Y, λZ) denotes
    // the same point for any λ ≠ 0, so intermediate values differ from run
    // to run while the result is unchanged.
    let mut lambda = mont.alloc();
    derive_blinding(mont, &mut wp, &mut lambda, seed);
    mont.square(&mut wp.a, &lambda, &mut wp.scratch);
    mont.mul(&mut wp.b, &wp.a, &lambda, &mut wp.scratch);
    mont.mul_assign(x, &wp.a, &mut wp.scratch);
    mont.mul_assign(y, &wp.b, &mut wp.scratch);
    mont.mul_assign(z, &lambda, &mut wp.scratch);

    let z_is_one = bool::from(mont.is_one(z));

    let Workplace {
        a: xa,
        b: ya,
        c: za,
        d: xb,
        e: yb,
        f: zb,
        ..
    } = &mut acc;

    // Start from the point at infinity.
    mont.set_one(xa);
    mont.set_one(ya);
    mont.set_zero(za);

    // Skip leading zero bytes and bits, so the first doubling already acts
    // on a non-trivial value.
    let mut bytes = k;
    while let Some((&0, rest)) = bytes.split_first() {
        bytes = rest;
    }

    if let Some(&first) = bytes.first() {
        let top_bit = 7 - first.leading_zeros();
        for (idx, &byte) in bytes.iter().enumerate() {
            let start = if idx == 0 { top_bit } else { 7 };
            for shift in (0..=start).rev() {
                arith::full_double(mont, &mut wp, xa, ya, za);

                mont.copy(xb, xa);
                mont.copy(yb, ya);
                mont.copy(zb, za);
                if z_is_one {
                    arith::mix_add(mont, &mut wp, xb, yb, zb, x, y);
                } else {
                    arith::full_add(mont, &mut wp, xb, yb, zb, x, y, z);
                }

                // Keep 2·A + P when the bit is set, 2·A otherwise.
                let bit = Choice::from((byte >> shift) & 1);
                mont.conditional_assign(xa, xb, bit);
                mont.conditional_assign(ya, yb, bit);
                mont.conditional_assign(za, zb, bit);
            }
        }
    }

    mont.copy(x, xa);
    mont.copy(y, ya);
    mont.copy(z, za);
}

/// Fixed-window multiplication of the generator using the pre-computed,
/// scattered tables.
///
/// Window `i` of the scalar (counting from the least significant bit)
/// selects an affine multiple of `2^(w·i)·G` from table `i`; the `gather`
/// walk makes the cache-line trace identical for every window value. A zero
/// window gathers the (0, 0) infinity encoding, which the mixed addition
/// passes through unchanged.
pub(crate) fn mul_generator(
    ctx: &EcContext,
    tables: &GenTables,
    x: &mut FieldElement,
    y: &mut FieldElement,
    z: &mut FieldElement,
    k: &[u8],
) -> Result<()> {
    let mont = ctx.mont();
    let mut wp = Workplace::new(mont);

    let mut xa = mont.alloc();
    let mut ya = mont.alloc();
    let mut za = mont.alloc();
    arith::set_infinity(mont, &mut xa, &mut ya, &mut za);

    let mut entry = Zeroizing::new(vec![0u8; tables.entry_len]);
    let mut ex = mont.alloc();
    let mut ey = mont.alloc();
    let half = tables.entry_len / 2;

    for (prot, digit) in tables
        .tables
        .iter()
        .zip(BitWindowRl::new(tables.window, k))
    {
        prot.gather(&mut entry, digit as usize);
        if tables.plain {
            mont.decode_into(&mut ex, &entry[..half], &mut wp.scratch)?;
            mont.decode_into(&mut ey, &entry[half..], &mut wp.scratch)?;
        } else {
            mont.from_montgomery_le_bytes(&mut ex, &entry[..half]);
            mont.from_montgomery_le_bytes(&mut ey, &entry[half..]);
        }
        arith::mix_add(mont, &mut wp, &mut xa, &mut ya, &mut za, &ex, &ey);
    }

    mont.copy(x, &xa);
    mont.copy(y, &ya);
    mont.copy(z, &za);
    Ok(())
}

/// Derive an odd blinding factor below the modulus from the per-call seed.
fn derive_blinding(mont: &MontCtx, wp: &mut Workplace, out: &mut FieldElement, seed: u64) {
    let mut buf = Zeroizing::new(vec![0u8; mont.bytes()]);
    expand_seed(seed, &mut buf);

    // Clearing the top byte keeps the value below the modulus for any
    // prime without leading zero padding; forcing the low bit keeps it
    // non-zero.
    buf[0] = 0;
    let last = buf.len() - 1;
    buf[last] |= 1;

    let mut ok = mont.decode_into(out, &buf, &mut wp.scratch).is_ok();
    let mut i = 0;
    while !ok && i < buf.len() {
        buf[i] = 0;
        i += 1;
        ok = mont.decode_into(out, &buf, &mut wp.scratch).is_ok();
    }
    if !ok {
        mont.set_one(out);
    }
}
