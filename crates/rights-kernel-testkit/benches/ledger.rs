use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use rights_kernel::{BasicConfig, Label, Mint, UnitOps};
use rights_kernel_core::ListExtentOps;
use rights_kernel_testkit::PixelFixture;

fn bench_nat_withdraw_deposit(c: &mut Criterion) {
    let mint = Mint::new(BasicConfig, "bench bucks");
    let assay = mint.assay();
    let purse = mint.mint(1_000_000, None).unwrap();
    let units = assay.make_units(10).unwrap();

    c.bench_function("nat withdraw+deposit", |b| {
        b.iter(|| {
            let payment = purse.withdraw(black_box(&units), None).unwrap();
            purse.deposit_all(&payment).unwrap();
        })
    });
}

fn bench_nat_split(c: &mut Criterion) {
    let mint = Mint::new(BasicConfig, "bench bucks");
    let assay = mint.assay();
    let purse = mint.mint(u64::MAX / 2, None).unwrap();
    let parts: Vec<_> = (0..16).map(|_| assay.make_units(1).unwrap()).collect();
    let sixteen = assay.make_units(16).unwrap();

    c.bench_function("nat split 16", |b| {
        b.iter_batched(
            || purse.withdraw(&sixteen, None).unwrap(),
            |payment| assay.split(&payment, black_box(&parts), None).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_list_with_without(c: &mut Criterion) {
    let unit_ops = UnitOps::new(Label::new("bench items"), ListExtentOps::<u32>::default());
    let evens = unit_ops.make((0..512).map(|i| i * 2).collect()).unwrap();
    let odds = unit_ops.make((0..512).map(|i| i * 2 + 1).collect()).unwrap();
    let all = unit_ops.with(&evens, &odds).unwrap();

    c.bench_function("list with 512+512", |b| {
        b.iter(|| unit_ops.with(black_box(&evens), black_box(&odds)).unwrap())
    });
    c.bench_function("list without 512 of 1024", |b| {
        b.iter(|| unit_ops.without(black_box(&all), black_box(&odds)).unwrap())
    });
}

fn bench_pixel_revoke(c: &mut Criterion) {
    c.bench_function("revoke 32x32 row", |b| {
        b.iter_batched(
            || PixelFixture::striped(32, 32, 8),
            |fixture| {
                let row: Vec<_> = fixture.mint.ext().canvas().pixels()[..32].to_vec();
                let units = fixture.mint.assay().make_units(row).unwrap();
                fixture.mint.ext().revoke(&units).unwrap()
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_nat_withdraw_deposit,
    bench_nat_split,
    bench_list_with_without,
    bench_pixel_revoke
);
criterion_main!(benches);
