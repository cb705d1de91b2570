//! Scalar multiplication laws.

use ecws::{EcPoint, P256};
use proptest::{prelude::any, proptest};

const SEED: u64 = 4;

fn affine(p: &EcPoint<'_>) -> (Vec<u8>, Vec<u8>) {
    let len = p.context().mont().bytes();
    let mut x = vec![0u8; len];
    let mut y = vec![0u8; len];
    p.get_xy(&mut x, &mut y).unwrap();
    (x, y)
}

/// Big-endian sum of two byte strings.
fn be_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len()) + 1;
    let mut out = vec![0u8; len];
    let mut carry = 0u16;
    for i in 0..len {
        let x = a.len().checked_sub(i + 1).map_or(0, |j| a[j]) as u16;
        let y = b.len().checked_sub(i + 1).map_or(0, |j| b[j]) as u16;
        let sum = x + y + carry;
        out[len - 1 - i] = sum as u8;
        carry = sum >> 8;
    }
    out
}

/// Big-endian doubling of a byte string.
fn be_shl1(a: &[u8]) -> Vec<u8> {
    be_add(a, a)
}

#[test]
fn zero_scalar_gives_identity() {
    let ctx = P256.context(SEED).unwrap();

    for k in [&[][..], &[0][..], &[0u8; 32][..]] {
        let mut p = P256.generator(&ctx).unwrap();
        p.mul(k, SEED).unwrap();
        assert!(bool::from(p.is_identity()), "k = {k:?}");
    }
}

#[test]
fn leading_zeroes_do_not_change_the_product() {
    let ctx = P256.context(SEED).unwrap();
    let k = [0x13, 0x37];
    let padded = [0, 0, 0, 0x13, 0x37];

    let mut p = P256.generator(&ctx).unwrap();
    p.mul(&k, SEED).unwrap();
    let mut q = P256.generator(&ctx).unwrap();
    q.mul(&padded, SEED).unwrap();
    assert_eq!(affine(&p), affine(&q));
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(8))]

    #[test]
    fn scalar_addition_distributes(k1 in any::<[u8; 16]>(), k2 in any::<[u8; 16]>()) {
        let ctx = P256.context(SEED).unwrap();

        let mut lhs = P256.generator(&ctx).unwrap();
        lhs.mul(&be_add(&k1, &k2), SEED).unwrap();

        let mut p1 = P256.generator(&ctx).unwrap();
        p1.mul(&k1, SEED).unwrap();
        let mut p2 = P256.generator(&ctx).unwrap();
        p2.mul(&k2, SEED).unwrap();
        p1.add(&p2).unwrap();

        assert_eq!(affine(&lhs), affine(&p1));
    }

    #[test]
    fn doubling_the_scalar_doubles_the_point(k in any::<[u8; 12]>()) {
        let ctx = P256.context(SEED).unwrap();

        let mut doubled_point = P256.generator(&ctx).unwrap();
        doubled_point.mul(&k, SEED).unwrap();
        doubled_point.double();

        let mut doubled_scalar = P256.generator(&ctx).unwrap();
        doubled_scalar.mul(&be_shl1(&k), SEED).unwrap();

        assert_eq!(affine(&doubled_point), affine(&doubled_scalar));
    }

    #[test]
    fn ladder_and_table_paths_commute(k in any::<[u8; 12]>()) {
        let ctx = P256.context(SEED).unwrap();

        // k·(2G) through the generic ladder
        let mut base = P256.generator(&ctx).unwrap();
        base.double();
        base.mul(&k, SEED).unwrap();

        // (2k)·G through the table path
        let mut from_tables = P256.generator(&ctx).unwrap();
        from_tables.mul(&be_shl1(&k), SEED).unwrap();

        assert_eq!(affine(&base), affine(&from_tables));
    }
}
