use criterion::{Criterion, criterion_group, criterion_main};
use ecws::P256;

fn bench_point(c: &mut Criterion) {
    let ctx = P256.context(4).unwrap();
    let g = P256.generator(&ctx).unwrap();
    let k = [0xA5u8; 32];

    c.bench_function("p256 double", |b| {
        let mut p = g.clone();
        b.iter(|| p.double());
    });

    c.bench_function("p256 add", |b| {
        let mut p = g.clone();
        p.double();
        b.iter(|| p.add(&g).unwrap());
    });

    c.bench_function("p256 scalar mul (generator)", |b| {
        b.iter(|| {
            let mut p = g.clone();
            p.mul(&k, 0xFFF).unwrap();
        });
    });

    c.bench_function("p256 scalar mul (arbitrary point)", |b| {
        let mut base = g.clone();
        base.double();
        b.iter(|| {
            let mut p = base.clone();
            p.mul(&k, 0xFFF).unwrap();
        });
    });
}

criterion_group!(benches, bench_point);
criterion_main!(benches);
