//! End-to-end checks of the canonical fixture and its reproducibility.

use cgmlst_fixtures::fixture::{CANONICAL_NEXT_DRAW, CANONICAL_RECORDS, CANONICAL_VISIBLE_RECORDS};
use cgmlst_fixtures::seed::CountingSource;
use cgmlst_fixtures::storage::{read_auxiliary, write_auxiliary};
use cgmlst_fixtures::{
    Document, DocumentAssembler, DrawSource, EmitMode, FixtureError, FixtureGenerator, GeneratorConfig,
    JsonLinesSink, MutationRules, PopulationBuilder, RegressionExpectation, SineSequence,
};

#[test]
fn test_canonical_fixture_reproduces() {
    let generator = FixtureGenerator::new(GeneratorConfig::default()).unwrap();
    // The built-in regression check runs inside generate.
    let fixture = generator.generate(Vec::new()).unwrap();
    assert_eq!(fixture.population.len(), 7000);
    assert_eq!(fixture.record_count(), CANONICAL_RECORDS);
    assert_eq!(fixture.visible_count() + 1, CANONICAL_VISIBLE_RECORDS);
    assert_eq!(fixture.population.lineage.rounds(), 14);
    assert!(fixture.population.profiles.iter().all(|p| p.len() == 2000));
}

#[test]
fn test_canonical_next_draw_after_replay() {
    // Replaying the same number of draws lands on the same value.
    let fixture = FixtureGenerator::new(GeneratorConfig::small(1, 20, 10))
        .unwrap()
        .generate(Vec::new())
        .unwrap();
    let mut replay = SineSequence::new(1);
    for _ in 0..fixture.draws {
        replay.next_draw();
    }
    assert_eq!(fixture.draws, 224);
    assert_eq!(replay.next_draw().to_bits(), 0.05121995474655705f64.to_bits());
    assert!(CANONICAL_NEXT_DRAW > 0.0 && CANONICAL_NEXT_DRAW < 1.0);
}

#[test]
fn test_size_law_and_prefix_determinism() {
    let builder = PopulationBuilder::new(MutationRules::default(), 1);
    let mut seq = SineSequence::new(1);
    let big = builder.build(7000, 8, &mut seq);
    let mut seq = SineSequence::new(1);
    let small = builder.build(4096, 8, &mut seq);
    assert_eq!(big.len(), 7000);
    assert_eq!(small.len(), 4096);
    assert_eq!(&big.profiles[..4096], &small.profiles[..]);
}

#[test]
fn test_draws_per_profile_with_visibility() {
    let config = GeneratorConfig::small(1, 64, 33);
    let assembler = DocumentAssembler::from_config(&config);
    let builder = PopulationBuilder::new(config.mutation.clone(), 1);
    let mut src = CountingSource::new(SineSequence::new(1));
    let population = builder.build(33, 64, &mut src);
    let tally = &population.tally;
    assert_eq!(src.draws(), 33 * (1 + 64) + tally.retyped + tally.novel);
    assert_eq!(src.draws(), tally.draws());

    src.reset();
    for _ in 0..population.len() {
        assembler.draw_visibility(&mut src);
    }
    assert_eq!(src.draws(), 33);

    let fixture = FixtureGenerator::new(config).unwrap().generate(Vec::new()).unwrap();
    assert_eq!(fixture.draws, tally.draws() + 33);
}

#[test]
fn test_independent_runs_hash_identically() {
    let digest = || {
        let generator = FixtureGenerator::new(GeneratorConfig::small(1, 300, 200)).unwrap();
        let fixture = generator.generate(Vec::new()).unwrap();
        let mut sink = JsonLinesSink::new(Vec::new());
        fixture.emit(&mut sink).unwrap();
        sink.digest()
    };
    assert_eq!(digest(), digest());
}

#[test]
fn test_auxiliary_scores_are_spliced_after_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let aux_path = dir.path().join("scores.jsonl.gz");
    let lines: Vec<Document> = vec![
        serde_json::from_str(r#"{"fileId":"000000","scores":{"000001":3}}"#).unwrap(),
        serde_json::from_str(r#"{"fileId":"000001","scores":{"000002":1}}"#).unwrap(),
    ];
    let file = std::fs::File::create(&aux_path).unwrap();
    write_auxiliary(file, &lines).unwrap();
    let auxiliary = read_auxiliary(std::fs::File::open(&aux_path).unwrap()).unwrap();

    let out = dir.path().join("fixture.jsonl");
    let generator = FixtureGenerator::new(GeneratorConfig::small(2, 10, 5)).unwrap();
    let (_, report) = generator.write(auxiliary, &out, EmitMode::Create).unwrap();
    assert_eq!(report.documents, 1 + 2 + 5);

    let text = std::fs::read_to_string(&out).unwrap();
    let docs: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert!(docs[0].get("genomes").is_some());
    assert_eq!(docs[1]["fileId"], "000000");
    assert_eq!(docs[2]["scores"]["000002"], 1);
    assert_eq!(docs[3]["fileId"], "000000");
    assert!(docs[3]["analysis"]["cgmlst"]["matches"].is_array());
}

#[test]
fn test_append_keeps_earlier_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("fixture.jsonl");
    let first = FixtureGenerator::new(GeneratorConfig::small(1, 10, 4)).unwrap();
    first.write(Vec::new(), &out, EmitMode::Create).unwrap();
    let before = std::fs::read_to_string(&out).unwrap();

    let second = FixtureGenerator::new(GeneratorConfig::small(2, 10, 3)).unwrap();
    second.write(Vec::new(), &out, EmitMode::Append).unwrap();
    let after = std::fs::read_to_string(&out).unwrap();
    assert!(after.starts_with(&before));
    assert_eq!(after.lines().count(), 5 + 4);
}

#[test]
fn test_failed_regression_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("fixture.jsonl");
    let config = GeneratorConfig {
        regression: Some(RegressionExpectation {
            next_draw: CANONICAL_NEXT_DRAW,
            records: CANONICAL_RECORDS,
            visible_records: CANONICAL_VISIBLE_RECORDS,
        }),
        ..GeneratorConfig::small(1, 10, 10)
    };
    let result = FixtureGenerator::new(config).unwrap().write(Vec::new(), &out, EmitMode::Create);
    assert!(matches!(result, Err(FixtureError::Regression(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
