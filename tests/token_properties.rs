use proptest::prelude::*;

use strokr::pattern::Pattern;
use strokr::pattern::token::{Token, tokenize, tokens_to_text};
use strokr::session::{MatchEngine, MatchOutcome};

const VOCABULARY: &[&str] = &[
    "a", "1", "L", "C", "F", " ", "LC", "RC", "MC", "SLC", "SRC", "F1", "F9", "F10", "F12",
];

fn pattern_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 1..12)
        .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn tokenize_round_trips_text(text in pattern_text()) {
        let tokens = tokenize(&text);
        prop_assert_eq!(tokens_to_text(&tokens), text);
    }

    #[test]
    fn offsets_sum_to_text_length(text in pattern_text()) {
        let tokens = tokenize(&text);
        let total: usize = tokens.iter().map(|t| t.text_len()).sum();
        prop_assert_eq!(total, text.chars().count());
    }

    #[test]
    fn buffer_stays_a_prefix(
        text in pattern_text(),
        input in prop::collection::vec(0usize..64, 0..80),
    ) {
        let pattern = Pattern::new("p", &text);
        let mut engine = MatchEngine::new();
        engine.load(pattern.clone());
        let now = std::time::Instant::now();

        // Pick inputs mostly from the pattern itself so progress happens.
        let pool: Vec<Token> = pattern
            .tokens
            .iter()
            .copied()
            .chain([Token::Char('#'), Token::Function(5)])
            .collect();
        for i in input {
            let outcome = engine.submit(pool[i % pool.len()], now);
            if matches!(outcome, MatchOutcome::Completed(_)) {
                break;
            }
            let buffer = engine.buffer();
            prop_assert!(buffer.len() < pattern.tokens.len());
            prop_assert_eq!(buffer, &pattern.tokens[..buffer.len()]);
        }
    }
}
