//! Built-in NIST curve parameters.
//!
//! Contexts built from these exact parameters carry pre-computed generator
//! tables; any other short Weierstrass curve with `a = −3` still works, it
//! just has no generator fast path.

use hex_literal::hex;

use crate::{EcContext, EcPoint, Result};

/// Parameters of a NIST short Weierstrass curve `y² = x³ − 3x + b`.
///
/// All byte strings are big-endian with the byte length of the field prime.
pub struct NistCurve {
    /// Curve name as in SP 800-186.
    pub name: &'static str,
    /// Field prime `p`.
    pub modulus: &'static [u8],
    /// Curve constant `b`.
    pub b: &'static [u8],
    /// Order of the generator.
    pub order: &'static [u8],
    /// Generator x-coordinate.
    pub gx: &'static [u8],
    /// Generator y-coordinate.
    pub gy: &'static [u8],
    /// Window width for the generator tables.
    pub(crate) window: u32,
    /// Whether table entries are stored as plain rather than
    /// Montgomery-form integers.
    pub(crate) plain_tables: bool,
}

impl NistCurve {
    /// Build an [`EcContext`] for this curve, with generator tables
    /// scrambled by `seed`.
    pub fn context(&self, seed: u64) -> Result<EcContext> {
        EcContext::new(self.modulus, self.b, self.order, seed)
    }

    /// The generator point on a context built from this curve.
    pub fn generator<'c>(&self, ctx: &'c EcContext) -> Result<EcPoint<'c>> {
        EcPoint::new(ctx, self.gx, self.gy)
    }
}

/// NIST P-256 (secp256r1, prime256v1).
pub const P256: NistCurve = NistCurve {
    name: "P-256",
    modulus: &hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    b: &hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    order: &hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
    gx: &hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
    gy: &hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
    window: 5,
    plain_tables: false,
};

/// NIST P-384 (secp384r1).
pub const P384: NistCurve = NistCurve {
    name: "P-384",
    modulus: &hex!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
        "ffffffff0000000000000000ffffffff"
    ),
    b: &hex!(
        "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875a"
        "c656398d8a2ed19d2a85c8edd3ec2aef"
    ),
    order: &hex!(
        "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf"
        "581a0db248b0a77aecec196accc52973"
    ),
    gx: &hex!(
        "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a38"
        "5502f25dbf55296c3a545e3872760ab7"
    ),
    gy: &hex!(
        "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c0"
        "0a60b1ce1d7e819d7a431d7c90ea0e5f"
    ),
    window: 5,
    plain_tables: false,
};

/// NIST P-521 (secp521r1).
pub const P521: NistCurve = NistCurve {
    name: "P-521",
    modulus: &hex!(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "ffff"
    ),
    b: &hex!(
        "0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef1"
        "09e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b50"
        "3f00"
    ),
    order: &hex!(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        "fffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e9138"
        "6409"
    ),
    gx: &hex!(
        "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d"
        "3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5"
        "bd66"
    ),
    gy: &hex!(
        "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e"
        "662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd1"
        "6650"
    ),
    window: 4,
    plain_tables: true,
};

/// Look up the preset matching the given raw parameters exactly.
pub(crate) fn recognize(
    modulus: &[u8],
    b: &[u8],
    order: &[u8],
) -> Option<&'static NistCurve> {
    [&P256, &P384, &P521]
        .into_iter()
        .find(|c| c.modulus == modulus && c.b == b && c.order == order)
}
