#![deny(warnings)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gradfill::*;

const SIZE: usize = 256;

fn methods() -> impl Iterator<Item = DitherMethod> {
    Some(DitherMethod::None)
        .into_iter()
        .chain(OrderedPattern::ALL.into_iter().map(DitherMethod::Ordered))
        .chain(Diffusion::ALL.into_iter().map(DitherMethod::ErrorDiffusion))
}

fn gradient() -> Gradient {
    Gradient::new(
        vec![
            GradStop::new(0.0, RGBA::rgb(20, 12, 28)),
            GradStop::new(0.4, RGBA::rgb(208, 70, 72)),
            GradStop::new(1.0, RGBA::rgb(222, 238, 214)),
        ],
        GradShape::Radial,
        (SIZE as Scalar / 2.0, SIZE as Scalar / 2.0),
        (SIZE as Scalar, SIZE as Scalar / 2.0),
    )
}

fn fill_benchmark(c: &mut Criterion) {
    let gradient = gradient();
    let palette: Palette = "#140c1c #442434 #30346d #4e4a4e #854c30 #346524 #d04648 #757161 \
                            #597dce #d27d2c #8595a1 #6daa2c #d2aa99 #6dc2ca #dad45e #deeed6"
        .parse()
        .expect("invalid palette");
    let size = Size {
        width: SIZE,
        height: SIZE,
    };
    let target = Rect::new(0, 0, SIZE, SIZE);
    let mask = full_mask(size);
    let mut canvas: ImageOwned<RGBA> = ImageOwned::new_default(size);

    let mut group = c.benchmark_group("fill");
    group.throughput(Throughput::Elements(target.area() as u64));
    for method in methods() {
        let fill = GradientFill::new(&gradient, DitherConfig::new(method))
            .with_palette(Some(&palette));
        group.bench_with_input(BenchmarkId::new("palette16", method), &fill, |b, fill| {
            b.iter(|| fill.apply(&mut canvas, target, &mask))
        });
    }
    group.finish();
}

fn field_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));
    for shape in [
        GradShape::Linear,
        GradShape::Radial,
        GradShape::Angular,
        GradShape::Diamond,
    ] {
        let gradient = Gradient {
            shape,
            ..gradient()
        };
        let field = gradient.field().expect("invalid gradient");
        group.bench_function(format!("{:?}", shape), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for y in 0..SIZE {
                    for x in 0..SIZE {
                        sum += field.evaluate_pixel(x, y).0;
                    }
                }
                sum
            })
        });
    }
    group.finish();
}

fn hilbert_benchmark(c: &mut Criterion) {
    let size = Size {
        width: SIZE + 1,
        height: SIZE / 2,
    };
    let mut group = c.benchmark_group("hilbert");
    group.throughput(Throughput::Elements((size.width * size.height) as u64));
    group.bench_function("curve", |b| {
        b.iter(|| HilbertCurve::new(size).fold(0, |acc, (x, y)| acc ^ (x + y)))
    });
    group.finish();
}

criterion_group!(benches, fill_benchmark, field_benchmark, hilbert_benchmark);
criterion_main!(benches);
