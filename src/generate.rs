use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{self, Write};

use rand::Rng;

use crate::config::GenConfig;

/// Composition of a generated trace, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenSummary {
    pub total: u64,
    pub add: u64,
    pub dec: u64,
    pub pop: u64,
    pub minval: i64,
    pub maxval: i64,
}

/// Writes a random command trace to `out`.
///
/// The first `size` lines add uniform keys, the remaining `op` lines are
/// drawn by weighted sampling. A lazy binary heap mirrors the commands so
/// that every emitted decrease targets a live ordinal with a key no larger
/// than its current one, and no pop ever hits an empty heap; while the
/// mirror is empty a drawn decrease or pop becomes an add instead.
///
/// The trace is fully determined by `cfg` and the state of `rng`.
pub fn random_trace<W: Write, R: Rng>(
    out: &mut W,
    cfg: &GenConfig,
    rng: &mut R,
) -> io::Result<GenSummary> {
    let totalfreq = cfg.addfreq + cfg.decfreq + cfg.popfreq;
    // ordinal -> live key, and every (key, ordinal) entry ever pushed; the
    // mirror discards stale entries the same lazy way the baseline heap does
    let mut keys: Vec<Option<i64>> = Vec::new();
    let mut entries: Vec<(i64, usize)> = Vec::new();
    let mut heap: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();
    let mut add = 0;
    let mut dec = 0;
    let mut pop = 0;

    for _ in 0..cfg.size {
        let key = rng.random_range(cfg.minval..=cfg.maxval);
        heap.push(Reverse((key, keys.len())));
        entries.push((key, keys.len()));
        writeln!(out, "a {}", key)?;
        keys.push(Some(key));
        add += 1;
    }
    let mut live = cfg.size;

    for _ in 0..cfg.op {
        let action = rng.random_range(0..=totalfreq);
        if action < cfg.decfreq && live != 0 {
            // pick entries at random until one is still live
            let (key, ordinal) = loop {
                let (key, ordinal) = entries[rng.random_range(0..entries.len())];
                if keys[ordinal] == Some(key) {
                    break (key, ordinal);
                }
            };
            let new_key = rng.random_range(cfg.minval..=key);
            heap.push(Reverse((new_key, ordinal)));
            entries.push((new_key, ordinal));
            keys[ordinal] = Some(new_key);
            writeln!(out, "d {} {}", ordinal, new_key)?;
            dec += 1;
        } else if action < cfg.decfreq + cfg.popfreq && live != 0 {
            // discard stale entries on the way to the live minimum
            let ordinal = loop {
                let Reverse((key, ordinal)) = heap.pop().unwrap();
                if keys[ordinal] == Some(key) {
                    break ordinal;
                }
            };
            keys[ordinal] = None;
            live -= 1;
            writeln!(out, "p")?;
            pop += 1;
        } else {
            let key = rng.random_range(cfg.minval..=cfg.maxval);
            heap.push(Reverse((key, keys.len())));
            entries.push((key, keys.len()));
            writeln!(out, "a {}", key)?;
            keys.push(Some(key));
            live += 1;
            add += 1;
        }
    }

    Ok(GenSummary {
        total: cfg.size + cfg.op,
        add,
        dec,
        pop,
        minval: cfg.minval,
        maxval: cfg.maxval,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> GenConfig {
        GenConfig {
            size: 50,
            op: 500,
            minval: -1000,
            maxval: 1000,
            ..GenConfig::default()
        }
    }

    fn generate(cfg: &GenConfig, seed: u64) -> (Vec<u8>, GenSummary) {
        let mut buf = Vec::new();
        let summary = random_trace(&mut buf, cfg, &mut StdRng::seed_from_u64(seed)).unwrap();
        (buf, summary)
    }

    #[test]
    fn same_seed_same_trace() {
        let cfg = small_config();
        let (a, _) = generate(&cfg, 42);
        let (b, _) = generate(&cfg, 42);
        assert_eq!(a, b);
        let (c, _) = generate(&cfg, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn summary_matches_the_emitted_lines() {
        let cfg = small_config();
        let (buf, summary) = generate(&cfg, 7);
        let text = String::from_utf8(buf).unwrap();
        let mut counted = (0, 0, 0);
        for line in text.lines() {
            match line.split_whitespace().next().unwrap() {
                "a" => counted.0 += 1,
                "d" => counted.1 += 1,
                "p" => counted.2 += 1,
                other => panic!("unexpected command {:?}", other),
            }
        }
        assert_eq!(counted, (summary.add, summary.dec, summary.pop));
        assert_eq!(summary.total, cfg.size + cfg.op);
        assert_eq!(summary.add + summary.dec + summary.pop, summary.total);
    }

    #[test]
    fn every_command_is_valid_against_a_replayed_model() {
        let cfg = small_config();
        let (buf, _) = generate(&cfg, 99);
        let text = String::from_utf8(buf).unwrap();
        let mut model: Vec<Option<i64>> = Vec::new();
        let mut live = 0usize;
        for line in text.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens[0] {
                "a" => {
                    let key: i64 = tokens[1].parse().unwrap();
                    assert!(key >= cfg.minval && key <= cfg.maxval);
                    model.push(Some(key));
                    live += 1;
                }
                "d" => {
                    let ordinal: usize = tokens[1].parse().unwrap();
                    let new_key: i64 = tokens[2].parse().unwrap();
                    let key = model[ordinal].expect("decrease of a dead ordinal");
                    assert!(new_key <= key);
                    assert!(new_key >= cfg.minval);
                    model[ordinal] = Some(new_key);
                }
                "p" => {
                    assert!(live > 0, "pop against an empty heap");
                    let (ordinal, _) = model
                        .iter()
                        .enumerate()
                        .filter_map(|(i, k)| k.map(|k| (i, k)))
                        .min_by_key(|&(i, k)| (k, i))
                        .unwrap();
                    model[ordinal] = None;
                    live -= 1;
                }
                other => panic!("unexpected command {:?}", other),
            }
        }
    }

    #[test]
    fn an_empty_mirror_falls_back_to_adds() {
        let cfg = GenConfig {
            size: 0,
            op: 100,
            addfreq: 0,
            decfreq: 1,
            popfreq: 1,
            minval: 0,
            maxval: 10,
            ..GenConfig::default()
        };
        let (buf, summary) = generate(&cfg, 3);
        let text = String::from_utf8(buf).unwrap();
        // the very first command cannot be a decrease or a pop
        assert!(text.starts_with('a'));
        assert!(summary.add > 0);
    }
}
