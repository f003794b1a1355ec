// tests/concurrency_tests.rs

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rayon::prelude::*;
use shiftreduce::config::ParserConfig;
use shiftreduce::derivation::{candidate_set, compare_hypotheses, successors};
use shiftreduce::{ParseState, Transition, Tree};

use common::*;

/// Deterministic stand-in for a model: prefers reductions, penalises long labels.
fn toy_score(state: &ParseState, transition: &Transition) -> f64 {
    let label_cost = transition.label().map_or(0.0, |l| l.len() as f64 * 0.1);
    let depth_cost = state.stack().len() as f64 * 0.01;
    match transition {
        Transition::Shift => -0.5 - depth_cost,
        Transition::Finalize => 1.0,
        _ => -label_cost,
    }
}

/// Expands one beam step and keeps the best `width` states.
fn step(
    beam: &[ParseState],
    candidates: &[Transition],
    width: usize,
    parallel: bool,
) -> Vec<ParseState> {
    let expanded: Vec<Vec<ParseState>> = if parallel {
        beam.par_iter()
            .map(|s| successors(s, candidates, &[], &toy_score).unwrap())
            .collect()
    } else {
        beam.iter()
            .map(|s| successors(s, candidates, &[], &toy_score).unwrap())
            .collect()
    };
    let flat: Vec<ParseState> = expanded.into_iter().flatten().collect();
    let mut ranked: Vec<(&ParseState, usize)> = flat.iter().zip(0..).collect();
    ranked.sort_by(|a, b| compare_hypotheses(*a, *b));
    ranked.into_iter().take(width).map(|(s, _)| s.clone()).collect()
}

fn run_beam(sentence: Vec<Tree>, parallel: bool) -> Vec<Vec<String>> {
    let candidates = candidate_set(&["NP", "VP", "S"]);
    let mut beam = vec![ParseState::new(sentence)];
    for _ in 0..24 {
        if beam.iter().all(|s| s.is_finished()) {
            break;
        }
        let (done, open): (Vec<_>, Vec<_>) = beam.into_iter().partition(|s| s.is_finished());
        let mut next = step(&open, &candidates, 4, parallel);
        next.extend(done);
        beam = next;
    }
    beam.iter().map(history).collect()
}

#[test]
fn test_parallel_expansion_matches_sequential() {
    init_test_logging();
    let sequential = run_beam(old_dog(), false);
    let parallel = run_beam(old_dog(), true);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_states_shared_across_threads() {
    let config = Arc::new(ParserConfig::default().with_max_unary_chain(2));
    let sentence: Arc<[Tree]> = old_dog().into();
    let base = ParseState::with_shared_config(sentence, Arc::clone(&config));
    let base = replay_shift(&base, 3);

    let results: Vec<String> = (0..32)
        .into_par_iter()
        .map(|i| {
            let label = if i % 2 == 0 { "NP" } else { "NX" };
            let next = Transition::binary(shiftreduce::Side::Right, label, false)
                .apply(&base, i as f64)
                .unwrap();
            let below = base.stack().pop().unwrap().pop().unwrap();
            assert!(next.stack().pop().unwrap().ptr_eq(&below));
            next.stack().peek().unwrap().to_string()
        })
        .collect();

    assert_eq!(results[0], "(NP (JJ old) (NN dog))");
    assert_eq!(results[1], "(NX (JJ old) (NN dog))");
    assert_eq!(base.stack().len(), 3);
    assert_eq!(base.transitions().len(), 3);
}

fn replay_shift(state: &ParseState, n: usize) -> ParseState {
    let shifts = vec![Transition::Shift; n];
    shiftreduce::derivation::replay(state, &shifts, &[]).unwrap()
}
