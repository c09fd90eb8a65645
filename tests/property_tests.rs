//! Property-based tests for the token-production contract

use gmond_conf_lexer::{lexer_from_str, tokenize};
use proptest::prelude::*;

/// A single lexical element of generated input
#[derive(Debug, Clone)]
enum Piece {
    Word(String),
    Quoted(String),
    Operator(char),
    Comment(String),
}

fn word_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.\\-/]{1,12}"
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    prop_oneof![
        4 => word_strategy().prop_map(Piece::Word),
        2 => "[a-zA-Z0-9_. ]{0,10}".prop_map(Piece::Quoted),
        3 => prop::sample::select(vec!['{', '}', '=']).prop_map(Piece::Operator),
        1 => "[a-zA-Z0-9 {}=\"#\t]{0,16}".prop_map(Piece::Comment),
    ]
}

fn separator_strategy() -> impl Strategy<Value = String> {
    "[ \t\r\n]{1,3}"
}

/// Renders pieces with the given separators and returns the text together
/// with the tokens the lexer must produce for it
fn render(pieces: &[(Piece, String)]) -> (String, Vec<String>) {
    let mut text = String::new();
    let mut expected = Vec::new();
    for (piece, separator) in pieces {
        match piece {
            Piece::Word(word) => {
                text.push_str(word);
                expected.push(word.clone());
            }
            Piece::Quoted(body) => {
                let literal = format!("\"{}\"", body);
                text.push_str(&literal);
                expected.push(literal);
            }
            Piece::Operator(op) => {
                text.push(*op);
                expected.push(op.to_string());
            }
            Piece::Comment(body) => {
                text.push('#');
                text.push_str(body);
                text.push('\n');
            }
        }
        text.push_str(separator);
    }
    (text, expected)
}

proptest! {
    #[test]
    fn test_structural_round_trip(
        pieces in prop::collection::vec((piece_strategy(), separator_strategy()), 0..24)
    ) {
        let (text, expected) = render(&pieces);
        let tokens = tokenize(&text).unwrap();
        prop_assert_eq!(&tokens, &expected);

        // Re-joining the tokens with single spaces lexes to the same sequence
        let rejoined = tokens.join(" ");
        prop_assert_eq!(tokenize(&rejoined).unwrap(), tokens);
    }

    #[test]
    fn test_operators_are_always_atomic(
        words in prop::collection::vec(word_strategy(), 1..8),
        ops in prop::collection::vec(prop::sample::select(vec!['{', '}', '=']), 1..8),
    ) {
        // Operators glued directly onto words, no whitespace anywhere
        let mut text = String::new();
        let mut expected = Vec::new();
        for (word, op) in words.iter().zip(ops.iter()) {
            text.push_str(word);
            text.push(*op);
            expected.push(word.clone());
            expected.push(op.to_string());
        }

        prop_assert_eq!(tokenize(&text).unwrap(), expected);
    }

    #[test]
    fn test_no_token_is_empty_and_end_is_sticky(input in "[ -~\t\r\n]{0,64}") {
        let mut lexer = lexer_from_str(&input);
        while let Some(token) = lexer.next_token().unwrap() {
            prop_assert!(!token.is_empty());
        }
        for _ in 0..3 {
            prop_assert_eq!(lexer.next_token().unwrap(), None);
        }
    }

    #[test]
    fn test_operator_characters_only_appear_alone(input in "[ -~\t\r\n]{0,64}") {
        for token in tokenize(&input).unwrap() {
            if token.chars().any(|c| matches!(c, '{' | '}' | '=')) {
                prop_assert_eq!(token.chars().count(), 1);
            }
        }
    }

    #[test]
    fn test_quoted_literal_keeps_inner_spaces(words in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let literal = format!("\"{}\"", words.join(" "));
        let text = format!("title = {}\n", literal);
        prop_assert_eq!(tokenize(&text).unwrap(), vec!["title".to_string(), "=".to_string(), literal]);
    }

    #[test]
    fn test_comments_produce_no_tokens(
        body in "[ -~\t]{0,40}",
        terminator in prop::sample::select(vec!["\n", "\r", "\r\n", "\n\r"]),
    ) {
        let text = format!("#{}{}", body, terminator);
        prop_assert!(tokenize(&text).unwrap().is_empty());

        let text = format!("ttl = 1 #{}{}port", body, terminator);
        prop_assert_eq!(tokenize(&text).unwrap(), vec!["ttl", "=", "1", "port"]);
    }
}
