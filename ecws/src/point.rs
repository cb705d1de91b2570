//! Jacobian curve points.

use core::ptr;

use montfield::FieldElement;
use subtle::Choice;

use crate::{
    EcContext,
    arith::{self, Workplace},
    error::{Error, Result},
    scalar,
};

/// A point on a short Weierstrass curve, in Jacobian coordinates.
///
/// Owns its three Montgomery-form coordinates and borrows the curve
/// context, so the context necessarily outlives the point. The point at
/// infinity is represented canonically as (1, 1, 0). Every stored point
/// either satisfies the curve equation in Jacobian form or is the point at
/// infinity with Z = 0.
#[derive(Clone)]
pub struct EcPoint<'c> {
    ctx: &'c EcContext,
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl<'c> EcPoint<'c> {
    /// Create a point from affine big-endian coordinates.
    ///
    /// (0, 0) is taken as the point at infinity. Any other pair must
    /// satisfy the curve equation; otherwise [`Error::NotOnCurve`] is
    /// returned and no partial point is leaked.
    pub fn new(ctx: &'c EcContext, x: &[u8], y: &[u8]) -> Result<Self> {
        let mont = ctx.mont();
        if x.len() != mont.bytes() || y.len() != mont.bytes() {
            return Err(Error::InvalidLength);
        }

        let x = mont.from_bytes(x)?;
        let y = mont.from_bytes(y)?;
        let mut z = mont.alloc();
        mont.set_one(&mut z);
        let mut point = Self { ctx, x, y, z };

        if bool::from(mont.is_zero(&point.x) & mont.is_zero(&point.y)) {
            arith::set_infinity(mont, &mut point.x, &mut point.y, &mut point.z);
        } else {
            let mut wp = Workplace::new(mont);
            if !bool::from(arith::on_curve(mont, &mut wp, &point.x, &point.y, ctx.b())) {
                return Err(Error::NotOnCurve);
            }
        }
        Ok(point)
    }

    /// The point at infinity.
    pub fn identity(ctx: &'c EcContext) -> Self {
        let mont = ctx.mont();
        let mut point = Self {
            ctx,
            x: mont.alloc(),
            y: mont.alloc(),
            z: mont.alloc(),
        };
        arith::set_infinity(mont, &mut point.x, &mut point.y, &mut point.z);
        point
    }

    /// The context this point lives on.
    pub fn context(&self) -> &'c EcContext {
        self.ctx
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> Choice {
        self.ctx.mont().is_zero(&self.z)
    }

    /// Write the affine coordinates as big-endian bytes.
    ///
    /// Both buffers must have the field's byte length. The point at
    /// infinity encodes as (0, 0).
    pub fn get_xy(&self, x_out: &mut [u8], y_out: &mut [u8]) -> Result<()> {
        let mont = self.ctx.mont();
        if x_out.len() != mont.bytes() || y_out.len() != mont.bytes() {
            return Err(Error::InvalidLength);
        }

        let mut wp = Workplace::new(mont);
        let mut ax = mont.alloc();
        let mut ay = mont.alloc();
        arith::normalize_coords(mont, &mut wp, &mut ax, &mut ay, &self.x, &self.y, &self.z);
        mont.to_bytes(x_out, &ax, &mut wp.scratch)?;
        mont.to_bytes(y_out, &ay, &mut wp.scratch)?;
        Ok(())
    }

    /// Double the point in place.
    pub fn double(&mut self) {
        let mont = self.ctx.mont();
        let mut wp = Workplace::new(mont);
        arith::full_double(mont, &mut wp, &mut self.x, &mut self.y, &mut self.z);
    }

    /// Add another point: `self ← self + other`.
    ///
    /// Both points must have been created from the same context.
    pub fn add(&mut self, other: &EcPoint<'_>) -> Result<()> {
        if !ptr::eq(self.ctx, other.ctx) {
            return Err(Error::CurveMismatch);
        }

        let mont = self.ctx.mont();
        let mut wp = Workplace::new(mont);
        arith::full_add(
            mont,
            &mut wp,
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &other.x,
            &other.y,
            &other.z,
        );
        Ok(())
    }

    /// Scalar multiplication: `self ← k·self`, big-endian scalar of any
    /// length.
    ///
    /// The field-operation sequence depends only on the scalar's bit
    /// length, never on its value. When the context carries generator
    /// tables and `self` is the generator, a fixed-window path with
    /// cache-line-oblivious table lookups is used instead of the ladder.
    /// `seed` re-randomizes the projective representation of the base
    /// point before the ladder runs.
    pub fn mul(&mut self, k: &[u8], seed: u64) -> Result<()> {
        if let Some(tables) = self.ctx.tables() {
            let mont = self.ctx.mont();
            let is_gen = mont.ct_eq(&self.x, &tables.gx)
                & mont.ct_eq(&self.y, &tables.gy)
                & mont.is_one(&self.z);
            if k.len() <= mont.bytes() && bool::from(is_gen) {
                return scalar::mul_generator(
                    self.ctx,
                    tables,
                    &mut self.x,
                    &mut self.y,
                    &mut self.z,
                    k,
                );
            }
        }

        scalar::mul_generic(self.ctx, &mut self.x, &mut self.y, &mut self.z, k, seed);
        Ok(())
    }

    /// Negate the point in place: Y ← p − Y.
    pub fn neg(&mut self) {
        self.ctx.mont().neg_assign(&mut self.y);
    }

    /// Convert to affine form in place: Z becomes 1, or the canonical
    /// (1, 1, 0) for the point at infinity.
    pub fn normalize(&mut self) {
        let mont = self.ctx.mont();
        if bool::from(self.is_identity()) {
            arith::set_infinity(mont, &mut self.x, &mut self.y, &mut self.z);
            return;
        }

        let mut wp = Workplace::new(mont);
        let mut ax = mont.alloc();
        let mut ay = mont.alloc();
        arith::normalize_coords(mont, &mut wp, &mut ax, &mut ay, &self.x, &self.y, &self.z);
        mont.copy(&mut self.x, &ax);
        mont.copy(&mut self.y, &ay);
        mont.set_one(&mut self.z);
    }

    /// Overwrite this point with another from the same context.
    pub fn copy_from(&mut self, other: &EcPoint<'_>) -> Result<()> {
        if !ptr::eq(self.ctx, other.ctx) {
            return Err(Error::CurveMismatch);
        }

        let mont = self.ctx.mont();
        mont.copy(&mut self.x, &other.x);
        mont.copy(&mut self.y, &other.y);
        mont.copy(&mut self.z, &other.z);
        Ok(())
    }

    /// Coordinate-wise equality of the Jacobian representations.
    ///
    /// Equal Z and either both at infinity or equal X and Y. This is *not*
    /// equality of the represented points: the same point with different Z
    /// compares unequal. Normalize both points first for that.
    pub fn eq_coordinates(&self, other: &EcPoint<'_>) -> Result<Choice> {
        if !ptr::eq(self.ctx, other.ctx) {
            return Err(Error::CurveMismatch);
        }

        let mont = self.ctx.mont();
        let z_eq = mont.ct_eq(&self.z, &other.z);
        let both_infinity = mont.is_zero(&self.z);
        let xy_eq = mont.ct_eq(&self.x, &other.x) & mont.ct_eq(&self.y, &other.y);
        Ok(z_eq & (both_infinity | xy_eq))
    }
}
