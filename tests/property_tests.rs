// tests/property_tests.rs

mod common;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;
use shiftreduce::constraint::unwrap_unary_chain;
use shiftreduce::derivation::candidate_set;
use shiftreduce::tree::tagged_sentence;
use shiftreduce::{ParseState, ParserConstraint, Side, Transition, TransitionKind, Tree};

const LABELS: [&str; 3] = ["A", "B", "C"];
const MAX_STEPS: usize = 64;

fn sentence(len: usize) -> Vec<Tree> {
    let words: Vec<String> = (0..len).map(|i| format!("w{i}")).collect();
    let tags = ["DT", "NN", "VB", "JJ", "IN", "RB"];
    let pairs: Vec<(&str, &str)> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), tags[i % tags.len()]))
        .collect();
    tagged_sentence(&pairs)
}

fn hash_of(t: &Transition) -> u64 {
    let mut hasher = DefaultHasher::new();
    t.hash(&mut hasher);
    hasher.finish()
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

/// Sentence length, up to two constraints inside it, and the walk's choices.
fn walk_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, usize)>, Vec<usize>)> {
    (1usize..=5).prop_flat_map(|len| {
        (
            Just(len),
            proptest::collection::vec((0..len, 1..=len, 0..LABELS.len()), 0..=2),
            proptest::collection::vec(any::<usize>(), 0..MAX_STEPS),
        )
    })
}

fn constraints_for(len: usize, raw: &[(usize, usize, usize)]) -> Vec<ParserConstraint> {
    raw.iter()
        .map(|(start, width, label)| {
            let end = (start + width).min(len).max(start + 1);
            ParserConstraint::new(*start, end, LABELS[*label]).unwrap()
        })
        .collect()
}

proptest! {
    #[test]
    fn random_derivations_keep_invariants((len, raw, choices) in walk_strategy()) {
        let constraints = constraints_for(len, &raw);
        let candidates = candidate_set(&LABELS);
        let mut state = ParseState::new(sentence(len));

        for choice in choices {
            let legal: Vec<&Transition> = candidates
                .iter()
                .filter(|t| t.is_legal(&state, &constraints))
                .collect();
            for t in &candidates {
                prop_assert_eq!(t.is_legal(&state, &constraints), t.is_legal(&state, &constraints));
            }
            if legal.is_empty() {
                break;
            }
            let transition = legal[choice % legal.len()];
            let next = transition.apply(&state, 1.0).unwrap();

            prop_assert!(next.check_invariants().is_ok(), "{}", next);
            prop_assert_eq!(next.transitions().len(), state.transitions().len() + 1);
            prop_assert_eq!(next.last_transition(), Some(transition));
            prop_assert_eq!(next.score(), state.score() + 1.0);
            prop_assert!(state.check_invariants().is_ok());

            if transition.kind() == TransitionKind::BinaryRemoveUnary {
                let left = state.stack().iter().nth(1).unwrap();
                let bottom = unwrap_unary_chain(left, state.config().max_unary_chain).unwrap();
                let combined = next.stack().peek().unwrap();
                prop_assert_eq!(&combined.children()[0], bottom);
                prop_assert!(left.children().len() == 1 && !left.is_preterminal());
                prop_assert!(!bottom.ptr_eq(left), "nothing was removed from {}", left);
            }
            state = next;
        }

        if let Some(tree) = state.tree() {
            prop_assert_eq!(tree.span().end, len);
            for c in &constraints {
                prop_assert!(shiftreduce::constraint::tree_satisfies(tree, c));
            }
        }
    }

    #[test]
    fn remove_unary_never_legal_on_shallow_left_operand(
        len in 2usize..=5,
        label in 0..LABELS.len(),
        side in side_strategy(),
        is_root in any::<bool>(),
    ) {
        // Every tree on the stack is a bare preterminal after shifting only.
        let mut state = ParseState::new(sentence(len));
        while Transition::Shift.is_legal(&state, &[]) {
            state = Transition::Shift.apply(&state, 0.0).unwrap();
            let t = Transition::binary_remove_unary(side, LABELS[label], is_root);
            prop_assert!(!t.is_legal(&state, &[]));
        }
    }

    #[test]
    fn identity_ignores_root_flag(
        label in "[A-Z]{1,4}",
        other in "[A-Z]{1,4}",
        side in side_strategy(),
        other_side in side_strategy(),
        root_a in any::<bool>(),
        root_b in any::<bool>(),
    ) {
        let a = Transition::binary_remove_unary(side, label.clone(), root_a);
        let b = Transition::binary_remove_unary(other_side, other.clone(), root_b);
        if side == other_side && label == other {
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        } else {
            prop_assert_ne!(&a, &b);
        }
        prop_assert_ne!(&a, &Transition::binary(side, label.clone(), root_a));
        prop_assert_ne!(&a, &Transition::unary(side, label, root_a));
    }

    #[test]
    fn display_round_trips(
        label in "([A-Z][A-Z0-9$-]{0,5})?",
        side in side_strategy(),
        is_root in any::<bool>(),
        kind in 0..3usize,
    ) {
        let t = match kind {
            0 => Transition::unary(side, label, is_root),
            1 => Transition::binary(side, label, is_root),
            _ => Transition::binary_remove_unary(side, label, is_root),
        };
        let parsed: Transition = t.to_string().parse().unwrap();
        prop_assert_eq!(&parsed, &t);
        prop_assert_eq!(parsed.is_root(), t.is_root());
    }
}
