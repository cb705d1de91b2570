//! Montgomery field contexts over odd prime moduli chosen at runtime.
//!
//! A [`MontCtx`] is built once from a big-endian modulus and is immutable
//! afterwards; every arithmetic operation goes through it. Field elements
//! are kept in Montgomery form (`x·R mod p`, `R = 2^(64·n)`) for their whole
//! lifetime; conversion happens only at the byte-I/O boundary.

use alloc::{boxed::Box, vec, vec::Vec};
use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{
    error::{Error, Result},
    limb::{adc, be_bytes_to_limbs, ct_lt, limbs_to_be_bytes, mac, sbb},
    window::BitWindowLr,
};

/// Window width used for the Fermat inversion ladder.
const INV_WINDOW: u32 = 4;

/// An element of the field described by a [`MontCtx`].
///
/// Always in Montgomery form and fully reduced. The backing storage is
/// zeroized on drop.
pub struct FieldElement {
    limbs: Box<[u64]>,
}

impl FieldElement {
    /// Borrow the little-endian Montgomery-form limbs.
    ///
    /// # ⚠️ Warning
    ///
    /// The limbs are in Montgomery form, not the canonical integer. Use
    /// [`MontCtx::to_bytes`] to leave the Montgomery domain.
    pub fn as_montgomery_limbs(&self) -> &[u64] {
        &self.limbs
    }
}

impl Clone for FieldElement {
    fn clone(&self) -> Self {
        Self {
            limbs: self.limbs.clone(),
        }
    }
}

impl Drop for FieldElement {
    fn drop(&mut self) {
        self.limbs.zeroize();
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldElement(0x")?;
        for limb in self.limbs.iter().rev() {
            write!(f, "{limb:016x}")?;
        }
        f.write_str(")")
    }
}

/// Scratch area for Montgomery multiplication, sized `2n + 1` words.
///
/// Owned by the caller so that the multiplication hot path never allocates.
pub struct Scratchpad(Box<[u64]>);

impl Drop for Scratchpad {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Immutable descriptor of a prime field `F_p` with Montgomery arithmetic.
///
/// Holds the modulus, `R mod p` (the Montgomery one), `R² mod p`, and
/// `−p⁻¹ mod 2^64`. All derived constants are computed deterministically
/// from the modulus at construction time.
pub struct MontCtx {
    /// Modulus, little-endian limbs.
    modulus: Box<[u64]>,
    /// `−p⁻¹ mod 2^64`.
    m0: u64,
    /// `R mod p`, i.e. 1 in Montgomery form.
    one: Box<[u64]>,
    /// `R² mod p`, used to enter the Montgomery domain.
    r2: Box<[u64]>,
    /// Limb count `n = ⌈bits(p)/64⌉`.
    words: usize,
    /// Byte length of the modulus as originally supplied; all byte-string
    /// I/O uses exactly this length.
    bytes: usize,
}

impl MontCtx {
    /// Create a context for the odd prime `p` given as big-endian bytes.
    ///
    /// Fails with [`Error::InvalidValue`] if the modulus is even or not
    /// greater than 1. Primality is not verified; the Fermat inversion is
    /// only meaningful for prime moduli.
    pub fn new(modulus_be: &[u8]) -> Result<Self> {
        if modulus_be.is_empty() {
            return Err(Error::InvalidLength);
        }

        let significant = {
            let mut s = modulus_be;
            while let Some((&0, rest)) = s.split_first() {
                s = rest;
            }
            s
        };
        if significant.is_empty() || (significant.len() == 1 && significant[0] == 1) {
            return Err(Error::InvalidValue);
        }
        if significant[significant.len() - 1] & 1 == 0 {
            return Err(Error::InvalidValue);
        }

        let words = significant.len().div_ceil(8);
        let mut modulus = vec![0u64; words].into_boxed_slice();
        be_bytes_to_limbs(&mut modulus, significant);

        // p^-1 mod 2^64 by Newton iteration, doubling precision each step.
        let mut inv: u64 = 1;
        for _ in 0..6 {
            inv = inv.wrapping_mul(2u64.wrapping_sub(modulus[0].wrapping_mul(inv)));
        }
        let m0 = inv.wrapping_neg();

        // R mod p and R² mod p by repeated modular doubling of 1.
        let mut one = vec![0u64; words].into_boxed_slice();
        one[0] = 1;
        for _ in 0..64 * words {
            double_assign_raw(&mut one, &modulus);
        }
        let mut r2 = one.clone();
        for _ in 0..64 * words {
            double_assign_raw(&mut r2, &modulus);
        }

        Ok(Self {
            modulus,
            m0,
            one,
            r2,
            words,
            bytes: modulus_be.len(),
        })
    }

    /// Limb count of a field element.
    pub fn words(&self) -> usize {
        self.words
    }

    /// Byte length of the modulus; the length of every encoded element.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Allocate a zeroed field element.
    pub fn alloc(&self) -> FieldElement {
        FieldElement {
            limbs: vec![0u64; self.words].into_boxed_slice(),
        }
    }

    /// Allocate a scratchpad for use with the multiplication routines.
    pub fn scratchpad(&self) -> Scratchpad {
        Scratchpad(vec![0u64; 2 * self.words + 1].into_boxed_slice())
    }

    /// Decode a big-endian integer into Montgomery form.
    ///
    /// The input must be exactly [`bytes`](Self::bytes) long and encode a
    /// value below the modulus.
    pub fn from_bytes(&self, input: &[u8]) -> Result<FieldElement> {
        let mut out = self.alloc();
        let mut scratch = self.scratchpad();
        self.decode_into(&mut out, input, &mut scratch)?;
        Ok(out)
    }

    /// Like [`from_bytes`](Self::from_bytes), into caller-owned storage.
    pub fn decode_into(
        &self,
        out: &mut FieldElement,
        input: &[u8],
        scratch: &mut Scratchpad,
    ) -> Result<()> {
        if input.len() != self.bytes {
            return Err(Error::InvalidLength);
        }

        // Leading bytes beyond the limb capacity must be zero padding.
        let excess = input.len().saturating_sub(self.words * 8);
        if input[..excess].iter().any(|&b| b != 0) {
            return Err(Error::InvalidValue);
        }

        be_bytes_to_limbs(&mut out.limbs, &input[excess..]);
        if !bool::from(ct_lt(&out.limbs, &self.modulus)) {
            return Err(Error::InvalidValue);
        }

        // x·R²·R⁻¹ = x·R
        self.mul_raw(&mut scratch.0, &out.limbs, &self.r2);
        self.mul_finish(&mut out.limbs, &mut scratch.0);
        Ok(())
    }

    /// Encode a field element as a big-endian integer of
    /// [`bytes`](Self::bytes) length.
    pub fn to_bytes(&self, out: &mut [u8], a: &FieldElement, scratch: &mut Scratchpad) -> Result<()> {
        if out.len() != self.bytes {
            return Err(Error::InvalidLength);
        }

        let plain = &mut scratch.0[..self.words];
        plain.copy_from_slice(&a.limbs);
        redc_raw(plain, &self.modulus, self.m0);
        limbs_to_be_bytes(out, plain);
        Ok(())
    }

    /// `out = a + b mod p`.
    pub fn add(&self, out: &mut FieldElement, a: &FieldElement, b: &FieldElement) {
        out.limbs.copy_from_slice(&a.limbs);
        add_assign_raw(&mut out.limbs, &b.limbs, &self.modulus);
    }

    /// `a = a + b mod p`.
    pub fn add_assign(&self, a: &mut FieldElement, b: &FieldElement) {
        add_assign_raw(&mut a.limbs, &b.limbs, &self.modulus);
    }

    /// `a = 2a mod p`.
    pub fn double_assign(&self, a: &mut FieldElement) {
        double_assign_raw(&mut a.limbs, &self.modulus);
    }

    /// `out = a - b mod p`; wraps through the modulus when `b > a`.
    pub fn sub(&self, out: &mut FieldElement, a: &FieldElement, b: &FieldElement) {
        out.limbs.copy_from_slice(&a.limbs);
        sub_assign_raw(&mut out.limbs, &b.limbs, &self.modulus);
    }

    /// `a = a - b mod p`.
    pub fn sub_assign(&self, a: &mut FieldElement, b: &FieldElement) {
        sub_assign_raw(&mut a.limbs, &b.limbs, &self.modulus);
    }

    /// `a = p - a`, with 0 mapping to 0.
    pub fn neg_assign(&self, a: &mut FieldElement) {
        let was_zero = self.is_zero(a);

        // a < p, so the chain cannot end in a borrow
        let mut borrow = 0;
        for (x, &m) in a.limbs.iter_mut().zip(self.modulus.iter()) {
            let (d, b) = sbb(m, *x, borrow);
            *x = d;
            borrow = b;
        }
        for x in a.limbs.iter_mut() {
            *x = u64::conditional_select(x, &0, was_zero);
        }
    }

    /// Montgomery product `out = a·b·R⁻¹ mod p` (CIOS).
    ///
    /// Operands must already be reduced below the modulus; wide inputs are
    /// not reduced.
    pub fn mul(
        &self,
        out: &mut FieldElement,
        a: &FieldElement,
        b: &FieldElement,
        scratch: &mut Scratchpad,
    ) {
        self.mul_raw(&mut scratch.0, &a.limbs, &b.limbs);
        self.mul_finish(&mut out.limbs, &mut scratch.0);
    }

    /// `a = a·b·R⁻¹ mod p`.
    pub fn mul_assign(&self, a: &mut FieldElement, b: &FieldElement, scratch: &mut Scratchpad) {
        self.mul_raw(&mut scratch.0, &a.limbs, &b.limbs);
        self.mul_finish(&mut a.limbs, &mut scratch.0);
    }

    /// `out = a² ·R⁻¹ mod p`.
    pub fn square(&self, out: &mut FieldElement, a: &FieldElement, scratch: &mut Scratchpad) {
        self.mul_raw(&mut scratch.0, &a.limbs, &a.limbs);
        self.mul_finish(&mut out.limbs, &mut scratch.0);
    }

    /// `a = a² ·R⁻¹ mod p`.
    pub fn square_assign(&self, a: &mut FieldElement, scratch: &mut Scratchpad) {
        self.mul_raw(&mut scratch.0, &a.limbs, &a.limbs);
        self.mul_finish(&mut a.limbs, &mut scratch.0);
    }

    /// Modular inverse by Fermat's little theorem: `out = a^(p-2) mod p`.
    ///
    /// Fixed 4-bit windows over the public exponent `p - 2`; constant-time
    /// with respect to `a`. Defined to return 0 for a zero input.
    pub fn inv_prime(&self, out: &mut FieldElement, a: &FieldElement, scratch: &mut Scratchpad) {
        // powers a^0 .. a^(2^w - 1)
        let mut table: Vec<FieldElement> = Vec::with_capacity(1 << INV_WINDOW);
        let mut power = self.alloc();
        self.set_one(&mut power);
        table.push(power.clone());
        for _ in 1..(1 << INV_WINDOW) {
            self.mul_assign(&mut power, a, scratch);
            table.push(power.clone());
        }

        // p - 2, big-endian
        let mut exp_limbs = self.modulus.to_vec();
        let mut borrow = 0;
        let (d, b) = sbb(exp_limbs[0], 2, borrow);
        exp_limbs[0] = d;
        borrow = b;
        for limb in exp_limbs.iter_mut().skip(1) {
            let (d, b) = sbb(*limb, 0, borrow);
            *limb = d;
            borrow = b;
        }
        let mut exp_bytes = vec![0u8; self.words * 8];
        limbs_to_be_bytes(&mut exp_bytes, &exp_limbs);

        self.set_one(out);
        for digit in BitWindowLr::new(INV_WINDOW, &exp_bytes) {
            for _ in 0..INV_WINDOW {
                self.square_assign(out, scratch);
            }
            self.mul_assign(out, &table[digit as usize], scratch);
        }
    }

    /// Constant-time conditional move: `out = choice ? a : b`.
    pub fn select(
        &self,
        out: &mut FieldElement,
        a: &FieldElement,
        b: &FieldElement,
        choice: Choice,
    ) {
        for ((o, &x), &y) in out.limbs.iter_mut().zip(a.limbs.iter()).zip(b.limbs.iter()) {
            *o = u64::conditional_select(&y, &x, choice);
        }
    }

    /// Constant-time conditional assignment: `dst = choice ? src : dst`.
    pub fn conditional_assign(&self, dst: &mut FieldElement, src: &FieldElement, choice: Choice) {
        for (d, s) in dst.limbs.iter_mut().zip(src.limbs.iter()) {
            d.conditional_assign(s, choice);
        }
    }

    /// Constant-time test for zero.
    pub fn is_zero(&self, a: &FieldElement) -> Choice {
        a.limbs
            .iter()
            .fold(Choice::from(1u8), |acc, limb| acc & limb.ct_eq(&0))
    }

    /// Constant-time test for one.
    pub fn is_one(&self, a: &FieldElement) -> Choice {
        a.limbs[..].ct_eq(&self.one)
    }

    /// Constant-time equality of two field elements.
    pub fn ct_eq(&self, a: &FieldElement, b: &FieldElement) -> Choice {
        a.limbs[..].ct_eq(&b.limbs)
    }

    /// Set to zero.
    pub fn set_zero(&self, a: &mut FieldElement) {
        a.limbs.fill(0);
    }

    /// Set to one (in Montgomery form).
    pub fn set_one(&self, a: &mut FieldElement) {
        a.limbs.copy_from_slice(&self.one);
    }

    /// Set to a small non-negative integer, which must be below the modulus.
    pub fn set_small(&self, a: &mut FieldElement, value: u64, scratch: &mut Scratchpad) {
        debug_assert!(self.words > 1 || value < self.modulus[0]);

        a.limbs.fill(0);
        a.limbs[0] = value;
        self.mul_raw(&mut scratch.0, &a.limbs, &self.r2);
        self.mul_finish(&mut a.limbs, &mut scratch.0);
    }

    /// Copy `src` into `dst`.
    pub fn copy(&self, dst: &mut FieldElement, src: &FieldElement) {
        dst.limbs.copy_from_slice(&src.limbs);
    }

    /// Serialize the Montgomery-form limbs as little-endian bytes.
    ///
    /// # ⚠️ Warning
    ///
    /// The output stays in the Montgomery domain; it is only meaningful to
    /// a matching [`from_montgomery_le_bytes`](Self::from_montgomery_le_bytes).
    pub fn montgomery_to_le_bytes(&self, a: &FieldElement, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.words * 8);
        for (chunk, &limb) in out.chunks_exact_mut(8).zip(a.limbs.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
    }

    /// Load Montgomery-form limbs from little-endian bytes.
    ///
    /// # ⚠️ Warning
    ///
    /// The input is expected to be in Montgomery form and reduced. Failure
    /// to maintain these invariants leads to miscomputation.
    pub fn from_montgomery_le_bytes(&self, out: &mut FieldElement, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), self.words * 8);
        for (limb, chunk) in out.limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(buf);
        }
    }

    /// CIOS product into the scratch accumulator; result (plus one carry
    /// word) is below `2p` and finished by [`mul_finish`](Self::mul_finish).
    fn mul_raw(&self, scratch: &mut [u64], a: &[u64], b: &[u64]) {
        let n = self.words;
        let p = &self.modulus;
        debug_assert_eq!(a.len(), n);
        debug_assert_eq!(b.len(), n);

        let t = &mut scratch[..n + 2];
        t.fill(0);

        for i in 0..n {
            let ai = a[i];
            let mut carry = 0;
            for j in 0..n {
                let (lo, hi) = mac(t[j], ai, b[j], carry);
                t[j] = lo;
                carry = hi;
            }
            let (lo, hi) = adc(t[n], carry, 0);
            t[n] = lo;
            t[n + 1] += hi;

            let m = t[0].wrapping_mul(self.m0);
            let (_, mut carry) = mac(t[0], m, p[0], 0);
            for j in 1..n {
                let (lo, hi) = mac(t[j], m, p[j], carry);
                t[j - 1] = lo;
                carry = hi;
            }
            let (lo, hi) = adc(t[n], carry, 0);
            t[n - 1] = lo;
            t[n] = t[n + 1] + hi;
            t[n + 1] = 0;
        }
    }

    /// Final reduction of the CIOS accumulator into `out`.
    fn mul_finish(&self, out: &mut [u64], scratch: &mut [u64]) {
        let n = self.words;
        let hi = scratch[n];
        out.copy_from_slice(&scratch[..n]);
        conditional_sub(out, hi, &self.modulus);
    }
}

/// `a = 2a mod p`; `a` must be reduced on entry.
fn double_assign_raw(a: &mut [u64], p: &[u64]) {
    let mut carry = 0;
    for x in a.iter_mut() {
        let (s, c) = adc(*x, *x, carry);
        *x = s;
        carry = c;
    }
    conditional_sub(a, carry, p);
}

/// `a = a + b mod p`.
fn add_assign_raw(a: &mut [u64], b: &[u64], p: &[u64]) {
    let mut carry = 0;
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        let (s, c) = adc(*x, y, carry);
        *x = s;
        carry = c;
    }
    conditional_sub(a, carry, p);
}

/// `a = a - b mod p`, adding the modulus back on borrow.
fn sub_assign_raw(a: &mut [u64], b: &[u64], p: &[u64]) {
    let mut borrow = 0;
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        let (d, bo) = sbb(*x, y, borrow);
        *x = d;
        borrow = bo;
    }

    let mask = borrow;
    let mut carry = 0;
    for (x, &m) in a.iter_mut().zip(p.iter()) {
        let (s, c) = adc(*x, m & mask, carry);
        *x = s;
        carry = c;
    }
}

/// Branch-free reduction: subtract `p` from the value `(hi, a)` exactly when
/// it is not below `p`. `hi` is at most 1.
fn conditional_sub(a: &mut [u64], hi: u64, p: &[u64]) {
    let mut borrow = 0;
    for (&x, &m) in a.iter().zip(p.iter()) {
        let (_, b) = sbb(x, m, borrow);
        borrow = b;
    }
    let take = Choice::from((hi != 0) as u8) | Choice::from(((borrow & 1) as u8) ^ 1);

    let mut borrow = 0;
    for (x, &m) in a.iter_mut().zip(p.iter()) {
        let (d, b) = sbb(*x, m, borrow);
        borrow = b;
        *x = u64::conditional_select(x, &d, take);
    }
}

/// Montgomery reduction of an n-word value in place: `a = a·R⁻¹ mod p`.
fn redc_raw(a: &mut [u64], p: &[u64], m0: u64) {
    let n = p.len();
    for _ in 0..n {
        let m = a[0].wrapping_mul(m0);
        let (_, mut carry) = mac(a[0], m, p[0], 0);
        for j in 1..n {
            let (lo, hi) = mac(a[j], m, p[j], carry);
            a[j - 1] = lo;
            carry = hi;
        }
        a[n - 1] = carry;
    }
    conditional_sub(a, 0, p);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use hex_literal::hex;

    /// 2^64 - 59, prime; small enough to check against `u128` arithmetic.
    const P64: u64 = 0xFFFF_FFFF_FFFF_FFC5;

    fn ctx64() -> MontCtx {
        MontCtx::new(&P64.to_be_bytes()).unwrap()
    }

    fn enc64(ctx: &MontCtx, v: u64) -> FieldElement {
        ctx.from_bytes(&v.to_be_bytes()).unwrap()
    }

    fn dec64(ctx: &MontCtx, a: &FieldElement) -> u64 {
        let mut out = [0u8; 8];
        let mut s = ctx.scratchpad();
        ctx.to_bytes(&mut out, a, &mut s).unwrap();
        u64::from_be_bytes(out)
    }

    #[test]
    fn rejects_bad_moduli() {
        assert_eq!(MontCtx::new(&[]).err(), Some(Error::InvalidLength));
        assert_eq!(MontCtx::new(&[0, 0]).err(), Some(Error::InvalidValue));
        assert!(MontCtx::new(&[1]).is_err());
        assert!(MontCtx::new(&[0x10]).is_err());
        assert!(MontCtx::new(&[3]).is_ok());
    }

    #[test]
    fn mul_matches_u128_oracle() {
        let ctx = ctx64();
        let mut s = ctx.scratchpad();
        let cases = [
            (0u64, 0u64),
            (1, 1),
            (2, P64 - 1),
            (P64 - 1, P64 - 1),
            (0x1234_5678_9ABC_DEF0, 0x0FED_CBA9_8765_4321),
            (P64 - 2, 3),
        ];
        for (x, y) in cases {
            let a = enc64(&ctx, x);
            let b = enc64(&ctx, y);
            let mut r = ctx.alloc();
            ctx.mul(&mut r, &a, &b, &mut s);
            let expect = ((x as u128 * y as u128) % P64 as u128) as u64;
            assert_eq!(dec64(&ctx, &r), expect, "{x} * {y}");
        }
    }

    #[test]
    fn add_sub_match_u128_oracle() {
        let ctx = ctx64();
        let cases = [(0u64, 5u64), (P64 - 1, P64 - 1), (P64 - 1, 1), (7, 9)];
        for (x, y) in cases {
            let a = enc64(&ctx, x);
            let b = enc64(&ctx, y);
            let mut r = ctx.alloc();
            ctx.add(&mut r, &a, &b);
            assert_eq!(
                dec64(&ctx, &r),
                ((x as u128 + y as u128) % P64 as u128) as u64
            );
            ctx.sub(&mut r, &a, &b);
            assert_eq!(
                dec64(&ctx, &r),
                ((x as u128 + P64 as u128 - y as u128) % P64 as u128) as u64
            );
        }
    }

    #[test]
    fn inversion() {
        let ctx = ctx64();
        let mut s = ctx.scratchpad();
        for x in [1u64, 2, 3, 0xDEAD_BEEF, P64 - 1] {
            let a = enc64(&ctx, x);
            let mut inv = ctx.alloc();
            ctx.inv_prime(&mut inv, &a, &mut s);
            let mut r = ctx.alloc();
            ctx.mul(&mut r, &a, &inv, &mut s);
            assert!(bool::from(ctx.is_one(&r)), "{x}");
        }

        // 0 inverts to 0
        let zero = ctx.alloc();
        let mut inv = ctx.alloc();
        ctx.inv_prime(&mut inv, &zero, &mut s);
        assert!(bool::from(ctx.is_zero(&inv)));
    }

    #[test]
    fn negate() {
        let ctx = ctx64();
        let mut a = enc64(&ctx, 5);
        ctx.neg_assign(&mut a);
        assert_eq!(dec64(&ctx, &a), P64 - 5);

        let mut zero = ctx.alloc();
        ctx.neg_assign(&mut zero);
        assert!(bool::from(ctx.is_zero(&zero)));
    }

    #[test]
    fn select_truth_table() {
        let ctx = ctx64();
        let a = enc64(&ctx, 11);
        let b = enc64(&ctx, 22);
        let mut r = ctx.alloc();
        ctx.select(&mut r, &a, &b, Choice::from(1));
        assert_eq!(dec64(&ctx, &r), 11);
        ctx.select(&mut r, &a, &b, Choice::from(0));
        assert_eq!(dec64(&ctx, &r), 22);
    }

    #[test]
    fn set_small() {
        let ctx = ctx64();
        let mut s = ctx.scratchpad();
        let mut a = ctx.alloc();
        ctx.set_small(&mut a, 42, &mut s);
        assert_eq!(dec64(&ctx, &a), 42);
        ctx.set_one(&mut a);
        assert_eq!(dec64(&ctx, &a), 1);
        ctx.set_zero(&mut a);
        assert_eq!(dec64(&ctx, &a), 0);
    }

    const P256: [u8; 32] =
        hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");

    #[test]
    fn p256_field_algebra() {
        let ctx = MontCtx::new(&P256).unwrap();
        let mut s = ctx.scratchpad();

        let a = ctx
            .from_bytes(&hex!(
                "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
            ))
            .unwrap();
        let b = ctx
            .from_bytes(&hex!(
                "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
            ))
            .unwrap();
        let c = ctx
            .from_bytes(&hex!(
                "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"
            ))
            .unwrap();

        // (a·b)·c == a·(b·c)
        let mut ab = ctx.alloc();
        ctx.mul(&mut ab, &a, &b, &mut s);
        let mut abc1 = ctx.alloc();
        ctx.mul(&mut abc1, &ab, &c, &mut s);
        let mut bc = ctx.alloc();
        ctx.mul(&mut bc, &b, &c, &mut s);
        let mut abc2 = ctx.alloc();
        ctx.mul(&mut abc2, &a, &bc, &mut s);
        assert!(bool::from(ctx.ct_eq(&abc1, &abc2)));

        // a·(b + c) == a·b + a·c
        let mut sum = ctx.alloc();
        ctx.add(&mut sum, &b, &c);
        let mut lhs = ctx.alloc();
        ctx.mul(&mut lhs, &a, &sum, &mut s);
        let mut ac = ctx.alloc();
        ctx.mul(&mut ac, &a, &c, &mut s);
        let mut rhs = ctx.alloc();
        ctx.add(&mut rhs, &ab, &ac);
        assert!(bool::from(ctx.ct_eq(&lhs, &rhs)));

        // a·a⁻¹ == 1, a + (p − a) == 0
        let mut inv = ctx.alloc();
        ctx.inv_prime(&mut inv, &a, &mut s);
        let mut r = ctx.alloc();
        ctx.mul(&mut r, &a, &inv, &mut s);
        assert!(bool::from(ctx.is_one(&r)));

        let mut na = a.clone();
        ctx.neg_assign(&mut na);
        ctx.add(&mut r, &a, &na);
        assert!(bool::from(ctx.is_zero(&r)));
    }

    #[test]
    fn p256_round_trip() {
        let ctx = MontCtx::new(&P256).unwrap();
        let mut s = ctx.scratchpad();
        let input = hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
        let fe = ctx.from_bytes(&input).unwrap();
        let mut out = [0u8; 32];
        ctx.to_bytes(&mut out, &fe, &mut s).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn p256_rejects_out_of_range() {
        let ctx = MontCtx::new(&P256).unwrap();
        // the modulus itself is not a valid element
        assert!(ctx.from_bytes(&P256).is_err());
        assert!(ctx.from_bytes(&[0xFF; 32]).is_err());
        // wrong lengths
        assert!(ctx.from_bytes(&[0u8; 31]).is_err());
        assert!(ctx.from_bytes(&[0u8; 33]).is_err());
        // zero is fine
        assert!(ctx.from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn montgomery_escape_hatch_round_trips() {
        let ctx = MontCtx::new(&P256).unwrap();
        let fe = ctx
            .from_bytes(&hex!(
                "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"
            ))
            .unwrap();
        let mut bytes = Vec::new();
        bytes.resize(ctx.words() * 8, 0);
        ctx.montgomery_to_le_bytes(&fe, &mut bytes);
        let mut back = ctx.alloc();
        ctx.from_montgomery_le_bytes(&mut back, &bytes);
        assert!(bool::from(ctx.ct_eq(&fe, &back)));
    }
}
