use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tenpai::hand::parse_tiles;
use tenpai::tile::Wind;
use tenpai::{AgariCalculator, Rule, ScoringContext, analyze_waits, shanten};

const HANDS: &[&str] = &[
    "1112345678999m",
    "2234455m 234p 234s",
    "19m 19p 19s ESWNPF 5p",
    "1357m 2468p 1359s E",
    "223344m 55667p 88s",
];

fn bench_shanten(c: &mut Criterion) {
    let hands: Vec<_> = HANDS.iter().map(|s| parse_tiles(s).unwrap()).collect();
    c.bench_function("shanten", |b| {
        b.iter(|| {
            for tiles in &hands {
                black_box(shanten(black_box(tiles), &[]));
            }
        });
    });
}

fn bench_waits(c: &mut Criterion) {
    let hands: Vec<_> = HANDS.iter().map(|s| parse_tiles(s).unwrap()).collect();
    c.bench_function("analyze_waits", |b| {
        b.iter(|| {
            for tiles in &hands {
                black_box(analyze_waits(black_box(tiles), &[]));
            }
        });
    });
}

fn bench_agari(c: &mut Criterion) {
    let rule = Rule::default();
    let ctx = ScoringContext {
        riichi: true,
        ..ScoringContext::tsumo(Wind::East, Wind::South)
    };
    let tiles = parse_tiles("2233445566778m 8m").unwrap();
    c.bench_function("agari_multi_reading", |b| {
        b.iter(|| {
            let calc = AgariCalculator {
                tehai: black_box(&tiles),
                melds: &[],
                ctx: &ctx,
                rule: &rule,
            };
            calc.agari()
        });
    });
}

criterion_group!(benches, bench_shanten, bench_waits, bench_agari);
criterion_main!(benches);
