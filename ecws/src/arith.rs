//! Jacobian point formulas for `y² = x³ − 3x + b`.
//!
//! All functions operate in place on the first point's coordinates, using a
//! caller-owned [`Workplace`] so the hot path never allocates. The infinity
//! and equal-operand branches are value-dependent; scalar multiplication
//! never reaches them with secret-dependent operands because it always
//! doubles, always adds, and selects by masking (see `scalar`).

use montfield::{FieldElement, MontCtx, Scratchpad};
use subtle::Choice;

/// Scratch field elements for the point formulas, plus the multiplication
/// scratchpad. One workplace per concurrent operation; the contents are
/// zeroized when dropped.
pub(crate) struct Workplace {
    pub a: FieldElement,
    pub b: FieldElement,
    pub c: FieldElement,
    pub d: FieldElement,
    pub e: FieldElement,
    pub f: FieldElement,
    pub g: FieldElement,
    pub h: FieldElement,
    pub scratch: Scratchpad,
}

impl Workplace {
    pub(crate) fn new(mont: &MontCtx) -> Self {
        Self {
            a: mont.alloc(),
            b: mont.alloc(),
            c: mont.alloc(),
            d: mont.alloc(),
            e: mont.alloc(),
            f: mont.alloc(),
            g: mont.alloc(),
            h: mont.alloc(),
            scratch: mont.scratchpad(),
        }
    }
}

/// Write the canonical point at infinity (1, 1, 0).
pub(crate) fn set_infinity(
    mont: &MontCtx,
    x: &mut FieldElement,
    y: &mut FieldElement,
    z: &mut FieldElement,
) {
    mont.set_one(x);
    mont.set_one(y);
    mont.set_zero(z);
}

/// Double a point in place: (X, Y, Z) ← 2·(X, Y, Z).
///
/// Uses the `a = −3` doubling sequence. A zero Y needs no special handling;
/// the formulas already produce Z₃ = 0.
pub(crate) fn full_double(
    mont: &MontCtx,
    wp: &mut Workplace,
    x: &mut FieldElement,
    y: &mut FieldElement,
    z: &mut FieldElement,
) {
    if bool::from(mont.is_zero(z)) {
        set_infinity(mont, x, y, z);
        return;
    }

    mont.square(&mut wp.a, z, &mut wp.scratch); // delta = Z1²
    mont.square(&mut wp.b, y, &mut wp.scratch); // gamma = Y1²
    mont.mul(&mut wp.c, x, &wp.b, &mut wp.scratch); // beta = X1·gamma
    mont.sub(&mut wp.d, x, &wp.a);
    mont.add(&mut wp.e, x, &wp.a);
    mont.mul_assign(&mut wp.d, &wp.e, &mut wp.scratch);
    mont.add(&mut wp.e, &wp.d, &wp.d);
    mont.add_assign(&mut wp.d, &wp.e); // alpha = 3·(X1−delta)·(X1+delta)

    mont.add_assign(z, y);
    mont.square_assign(z, &mut wp.scratch);
    mont.sub_assign(z, &wp.b);
    mont.sub_assign(z, &wp.a); // Z3 = (Y1+Z1)² − gamma − delta

    mont.square(x, &wp.d, &mut wp.scratch);
    mont.add(&mut wp.e, &wp.c, &wp.c);
    mont.double_assign(&mut wp.e);
    mont.double_assign(&mut wp.e);
    mont.sub_assign(x, &wp.e); // X3 = alpha² − 8·beta

    mont.add(&mut wp.e, &wp.c, &wp.c);
    mont.add(y, &wp.e, &wp.e);
    mont.sub_assign(y, x);
    mont.mul_assign(y, &wp.d, &mut wp.scratch);
    mont.square(&mut wp.e, &wp.b, &mut wp.scratch);
    mont.double_assign(&mut wp.e);
    mont.double_assign(&mut wp.e);
    mont.double_assign(&mut wp.e);
    mont.sub_assign(y, &wp.e); // Y3 = alpha·(4·beta − X3) − 8·gamma²
}

/// Mixed addition in place: (X1, Y1, Z1) ← (X1, Y1, Z1) + (x2, y2, 1).
///
/// The affine operand encodes the point at infinity as (0, 0).
pub(crate) fn mix_add(
    mont: &MontCtx,
    wp: &mut Workplace,
    x1: &mut FieldElement,
    y1: &mut FieldElement,
    z1: &mut FieldElement,
    x2: &FieldElement,
    y2: &FieldElement,
) {
    // Second term may be the point at infinity, encoded as (0, 0). Checked
    // first: lifting (0, 0) to Z = 1 would not be a valid point.
    if bool::from(mont.is_zero(x2) & mont.is_zero(y2)) {
        return;
    }

    // First term may be the point at infinity
    if bool::from(mont.is_zero(z1)) {
        mont.copy(x1, x2);
        mont.copy(y1, y2);
        mont.set_one(z1);
        return;
    }

    mont.square(&mut wp.a, z1, &mut wp.scratch); // Z1Z1
    mont.mul(&mut wp.b, x2, &wp.a, &mut wp.scratch); // U2
    mont.mul(&mut wp.c, y2, z1, &mut wp.scratch);
    mont.mul_assign(&mut wp.c, &wp.a, &mut wp.scratch); // S2 = Y2·Z1·Z1Z1

    // With (x2, y2) lifted to (U2, S2, Z1) we can detect P1 = ±P2
    if bool::from(mont.ct_eq(x1, &wp.b)) {
        if bool::from(mont.ct_eq(y1, &wp.c)) {
            full_double(mont, wp, x1, y1, z1);
        } else {
            set_infinity(mont, x1, y1, z1);
        }
        return;
    }

    mont.sub_assign(&mut wp.b, x1); // H = U2 − X1
    mont.square(&mut wp.d, &wp.b, &mut wp.scratch); // HH
    mont.add(&mut wp.e, &wp.d, &wp.d);
    mont.double_assign(&mut wp.e); // I = 4·HH
    mont.mul(&mut wp.f, &wp.b, &wp.e, &mut wp.scratch); // J = H·I

    mont.sub_assign(&mut wp.c, y1);
    mont.double_assign(&mut wp.c); // r = 2·(S2 − Y1)
    mont.mul_assign(&mut wp.e, x1, &mut wp.scratch); // V = X1·I

    mont.square(x1, &wp.c, &mut wp.scratch);
    mont.sub_assign(x1, &wp.f);
    mont.sub_assign(x1, &wp.e);
    mont.sub_assign(x1, &wp.e); // X3 = r² − J − 2·V

    mont.mul_assign(&mut wp.f, y1, &mut wp.scratch);
    mont.double_assign(&mut wp.f); // 2·Y1·J
    mont.sub(y1, &wp.e, x1);
    mont.mul_assign(y1, &wp.c, &mut wp.scratch);
    mont.sub_assign(y1, &wp.f); // Y3 = r·(V − X3) − 2·Y1·J

    mont.add_assign(z1, &wp.b);
    mont.square_assign(z1, &mut wp.scratch);
    mont.sub_assign(z1, &wp.a);
    mont.sub_assign(z1, &wp.d); // Z3 = (Z1+H)² − Z1Z1 − HH
}

/// Full Jacobian addition in place:
/// (X1, Y1, Z1) ← (X1, Y1, Z1) + (x2, y2, z2).
pub(crate) fn full_add(
    mont: &MontCtx,
    wp: &mut Workplace,
    x1: &mut FieldElement,
    y1: &mut FieldElement,
    z1: &mut FieldElement,
    x2: &FieldElement,
    y2: &FieldElement,
    z2: &FieldElement,
) {
    // First term may be the point at infinity
    if bool::from(mont.is_zero(z1)) {
        mont.copy(x1, x2);
        mont.copy(y1, y2);
        mont.copy(z1, z2);
        return;
    }

    // Second term may be the point at infinity
    if bool::from(mont.is_zero(z2)) {
        return;
    }

    mont.square(&mut wp.a, z1, &mut wp.scratch); // Z1Z1
    mont.square(&mut wp.b, z2, &mut wp.scratch); // Z2Z2
    mont.mul(&mut wp.c, x1, &wp.b, &mut wp.scratch); // U1
    mont.mul(&mut wp.d, x2, &wp.a, &mut wp.scratch); // U2
    mont.mul(&mut wp.e, y1, z2, &mut wp.scratch);
    mont.mul_assign(&mut wp.e, &wp.b, &mut wp.scratch); // S1 = Y1·Z2·Z2Z2
    mont.mul(&mut wp.f, y2, z1, &mut wp.scratch);
    mont.mul_assign(&mut wp.f, &wp.a, &mut wp.scratch); // S2 = Y2·Z1·Z1Z1

    // P1 = ±P2 needs the dedicated formulas
    if bool::from(mont.ct_eq(&wp.c, &wp.d)) {
        if bool::from(mont.ct_eq(&wp.e, &wp.f)) {
            full_double(mont, wp, x1, y1, z1);
        } else {
            set_infinity(mont, x1, y1, z1);
        }
        return;
    }

    mont.sub_assign(&mut wp.d, &wp.c); // H = U2 − U1
    mont.add(&mut wp.g, &wp.d, &wp.d);
    mont.square_assign(&mut wp.g, &mut wp.scratch); // I = (2·H)²
    mont.mul(&mut wp.h, &wp.d, &wp.g, &mut wp.scratch); // J = H·I
    mont.sub_assign(&mut wp.f, &wp.e);
    mont.double_assign(&mut wp.f); // r = 2·(S2 − S1)
    mont.mul_assign(&mut wp.c, &wp.g, &mut wp.scratch); // V = U1·I

    mont.square(x1, &wp.f, &mut wp.scratch);
    mont.sub_assign(x1, &wp.h);
    mont.sub_assign(x1, &wp.c);
    mont.sub_assign(x1, &wp.c); // X3 = r² − J − 2·V

    mont.sub(y1, &wp.c, x1);
    mont.mul_assign(y1, &wp.f, &mut wp.scratch);
    mont.mul(&mut wp.g, &wp.e, &wp.h, &mut wp.scratch);
    mont.double_assign(&mut wp.g);
    mont.sub_assign(y1, &wp.g); // Y3 = r·(V − X3) − 2·S1·J

    mont.add_assign(z1, z2);
    mont.square_assign(z1, &mut wp.scratch);
    mont.sub_assign(z1, &wp.a);
    mont.sub_assign(z1, &wp.b);
    mont.mul_assign(z1, &wp.d, &mut wp.scratch); // Z3 = ((Z1+Z2)² − Z1Z1 − Z2Z2)·H
}

/// Affine form of a Jacobian point: (X/Z², Y/Z³), or (0, 0) for the point
/// at infinity.
pub(crate) fn normalize_coords(
    mont: &MontCtx,
    wp: &mut Workplace,
    out_x: &mut FieldElement,
    out_y: &mut FieldElement,
    x: &FieldElement,
    y: &FieldElement,
    z: &FieldElement,
) {
    if bool::from(mont.is_zero(z)) {
        mont.set_zero(out_x);
        mont.set_zero(out_y);
        return;
    }

    mont.inv_prime(&mut wp.a, z, &mut wp.scratch);
    mont.square(&mut wp.b, &wp.a, &mut wp.scratch);
    mont.mul(&mut wp.c, &wp.b, &wp.a, &mut wp.scratch);
    mont.mul(out_x, x, &wp.b, &mut wp.scratch);
    mont.mul(out_y, y, &wp.c, &mut wp.scratch);
}

/// Whether affine (x, y) satisfies y² = x³ − 3x + b.
pub(crate) fn on_curve(
    mont: &MontCtx,
    wp: &mut Workplace,
    x: &FieldElement,
    y: &FieldElement,
    b: &FieldElement,
) -> Choice {
    mont.square(&mut wp.a, y, &mut wp.scratch);
    mont.square(&mut wp.c, x, &mut wp.scratch);
    mont.mul_assign(&mut wp.c, x, &mut wp.scratch);
    mont.sub_assign(&mut wp.c, x);
    mont.sub_assign(&mut wp.c, x);
    mont.sub_assign(&mut wp.c, x);
    mont.add_assign(&mut wp.c, b);
    mont.ct_eq(&wp.a, &wp.c)
}
