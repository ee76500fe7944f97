use cgmlst_fixtures::{FixtureGenerator, GeneratorConfig, JsonLinesSink, MutationRules, PopulationBuilder, SineSequence};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_generation(c: &mut Criterion) {
    let builder = PopulationBuilder::new(MutationRules::default(), 1);

    c.bench_function("population_512x2000", |b| {
        b.iter(|| {
            let mut seq = SineSequence::new(1);
            builder.build(512, 2000, &mut seq)
        })
    });

    c.bench_function("population_4096x100", |b| {
        b.iter(|| {
            let mut seq = SineSequence::new(1);
            builder.build(4096, 100, &mut seq)
        })
    });

    let generator = FixtureGenerator::new(GeneratorConfig::small(1, 2000, 256)).unwrap();
    let fixture = generator.generate(Vec::new()).unwrap();
    c.bench_function("emit_256x2000_jsonl", |b| {
        b.iter(|| {
            let mut sink = JsonLinesSink::new(std::io::sink());
            fixture.emit(&mut sink).unwrap();
            sink.digest()
        })
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
