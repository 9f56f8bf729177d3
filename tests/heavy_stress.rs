#![cfg(feature = "heavy")]
use hmm_graph::{HmmEngine, StateGraph, StateKind};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_dna(rng: &mut StdRng, len: usize) -> String {
    const ALPHABET: &[u8] = b"ACGT";
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            char::from(ALPHABET[idx])
        })
        .collect()
}

fn cpg_model() -> StateGraph {
    let mut g = StateGraph::new();
    let s = g.add_state(StateKind::Start).unwrap();
    let island = g.add_state(StateKind::Hidden).unwrap();
    let ocean = g.add_state(StateKind::Hidden).unwrap();
    let e = g.add_state(StateKind::End).unwrap();
    g.add_transition(s, island, 0.5).unwrap();
    g.add_transition(s, ocean, 0.5).unwrap();
    g.add_transition(island, island, 0.99).unwrap();
    g.add_transition(island, ocean, 0.0099).unwrap();
    g.add_transition(island, e, 0.0001).unwrap();
    g.add_transition(ocean, ocean, 0.999).unwrap();
    g.add_transition(ocean, island, 0.0009).unwrap();
    g.add_transition(ocean, e, 0.0001).unwrap();
    for (sym, p) in [('A', 0.15), ('C', 0.35), ('G', 0.35), ('T', 0.15)] {
        g.add_emission(island, sym, p).unwrap();
    }
    for (sym, p) in [('A', 0.3), ('C', 0.2), ('G', 0.2), ('T', 0.3)] {
        g.add_emission(ocean, sym, p).unwrap();
    }
    g.normalize_all().unwrap();
    g
}

#[test]
fn heavy_stress_viterbi_long_sequence() {
    let mut rng = StdRng::seed_from_u64(123);
    let obs = random_dna(&mut rng, 50_000);
    let engine = HmmEngine::new(cpg_model()).unwrap();
    // probabilities underflow to zero at this length; the path is still well formed
    let path = engine.viterbi(&obs).unwrap();
    assert_eq!(path.len(), obs.len() + 2);
    assert_eq!(path.first(), Some(engine.start()));
    assert_eq!(path.last(), Some(engine.end()));
    let total = engine.forward(&obs).unwrap();
    assert!((0.0..=1.0).contains(&total));
}
