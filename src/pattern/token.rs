use std::fmt;

/// Sentinel label for an offset that falls outside the pattern.
pub const UNKNOWN_TOKEN: &str = "?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickKind {
    Left,
    ShiftLeft,
    Right,
    ShiftRight,
    Middle,
}

impl ClickKind {
    pub fn code(self) -> &'static str {
        match self {
            ClickKind::Left => "LC",
            ClickKind::ShiftLeft => "SLC",
            ClickKind::Right => "RC",
            ClickKind::ShiftRight => "SRC",
            ClickKind::Middle => "MC",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ClickKind::Left => "\u{25d0}",              // ◐
            ClickKind::ShiftLeft => "\u{21e7}\u{25d0}", // ⇧◐
            ClickKind::Right => "\u{25d1}",             // ◑
            ClickKind::ShiftRight => "\u{21e7}\u{25d1}", // ⇧◑
            ClickKind::Middle => "\u{25c9}",            // ◉
        }
    }
}

/// One atomic unit of input. Patterns are sequences of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Char(char),
    /// Function key F1..=F12.
    Function(u8),
    Click(ClickKind),
}

impl Token {
    /// Number of characters this token occupies in a pattern string.
    pub fn text_len(self) -> usize {
        match self {
            Token::Char(_) => 1,
            Token::Function(n) if n >= 10 => 3,
            Token::Function(_) => 2,
            Token::Click(kind) => kind.code().len(),
        }
    }

    /// Form shown on screen: clicks become glyphs, function keys get brackets.
    pub fn icon(self) -> String {
        match self {
            Token::Char(ch) => ch.to_string(),
            Token::Function(n) => format!("[F{n}]"),
            Token::Click(kind) => kind.icon().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Char(ch) => write!(f, "{ch}"),
            Token::Function(n) => write!(f, "F{n}"),
            Token::Click(kind) => f.write_str(kind.code()),
        }
    }
}

/// Multi-character literals, longest first. A literal must come before any
/// literal that is a prefix of it (`F10` before `F1`).
const LITERALS: &[(&str, Token)] = &[
    ("SLC", Token::Click(ClickKind::ShiftLeft)),
    ("SRC", Token::Click(ClickKind::ShiftRight)),
    ("F10", Token::Function(10)),
    ("F11", Token::Function(11)),
    ("F12", Token::Function(12)),
    ("LC", Token::Click(ClickKind::Left)),
    ("RC", Token::Click(ClickKind::Right)),
    ("MC", Token::Click(ClickKind::Middle)),
    ("F1", Token::Function(1)),
    ("F2", Token::Function(2)),
    ("F3", Token::Function(3)),
    ("F4", Token::Function(4)),
    ("F5", Token::Function(5)),
    ("F6", Token::Function(6)),
    ("F7", Token::Function(7)),
    ("F8", Token::Function(8)),
    ("F9", Token::Function(9)),
];

/// Split a pattern string into tokens with a leftmost, longest-match scan.
/// Anything that does not start a known literal is a single `Char`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        match LITERALS.iter().find(|(literal, _)| rest.starts_with(literal)) {
            Some((literal, token)) => {
                tokens.push(*token);
                rest = &rest[literal.len()..];
            }
            None => {
                tokens.push(Token::Char(ch));
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    tokens
}

/// Token covering the given character offset of the pattern string.
pub fn token_at_offset(tokens: &[Token], offset: usize) -> Option<Token> {
    let mut start = 0;
    for &token in tokens {
        let end = start + token.text_len();
        if offset < end {
            return Some(token);
        }
        start = end;
    }
    None
}

/// Concatenated text form; inverse of [`tokenize`].
pub fn tokens_to_text(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

/// Concatenated icon form used by the training view.
pub fn format_for_display(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.icon()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_characters() {
        assert_eq!(
            tokenize("1a2"),
            vec![Token::Char('1'), Token::Char('a'), Token::Char('2')]
        );
    }

    #[test]
    fn test_shift_click_is_one_token() {
        assert_eq!(tokenize("SLC"), vec![Token::Click(ClickKind::ShiftLeft)]);
        assert_eq!(tokenize("SRC"), vec![Token::Click(ClickKind::ShiftRight)]);
    }

    #[test]
    fn test_two_digit_function_keys_win_over_f1() {
        assert_eq!(tokenize("F10"), vec![Token::Function(10)]);
        assert_eq!(tokenize("F12a"), vec![Token::Function(12), Token::Char('a')]);
        // F13 is not a literal: F1 followed by '3'
        assert_eq!(tokenize("F13"), vec![Token::Function(1), Token::Char('3')]);
    }

    #[test]
    fn test_mixed_pattern() {
        assert_eq!(
            tokenize("F1aLCaRCaMC"),
            vec![
                Token::Function(1),
                Token::Char('a'),
                Token::Click(ClickKind::Left),
                Token::Char('a'),
                Token::Click(ClickKind::Right),
                Token::Char('a'),
                Token::Click(ClickKind::Middle),
            ]
        );
    }

    #[test]
    fn test_lone_letters_stay_characters() {
        assert_eq!(tokenize("SL"), vec![Token::Char('S'), Token::Char('L')]);
        assert_eq!(tokenize("lc"), vec![Token::Char('l'), Token::Char('c')]);
    }

    #[test]
    fn test_round_trip_text() {
        for text in ["1a2a3a4a5a", "F1aF2aF3a", "LCaRCa", "SLCSRCMC", "F10F1F11", "é✓ x"] {
            assert_eq!(tokens_to_text(&tokenize(text)), text);
        }
    }

    #[test]
    fn test_empty_pattern() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_token_at_offset() {
        let tokens = tokenize("1aLC");
        assert_eq!(token_at_offset(&tokens, 0), Some(Token::Char('1')));
        assert_eq!(token_at_offset(&tokens, 2), Some(Token::Click(ClickKind::Left)));
        assert_eq!(token_at_offset(&tokens, 3), Some(Token::Click(ClickKind::Left)));
        assert_eq!(token_at_offset(&tokens, 4), None);
        assert_eq!(token_at_offset(&[], 0), None);
    }

    #[test]
    fn test_text_len_matches_display() {
        for (_, token) in LITERALS {
            assert_eq!(token.text_len(), token.to_string().chars().count());
        }
    }

    #[test]
    fn test_literal_never_shadowed_by_earlier_prefix() {
        for (i, (later, _)) in LITERALS.iter().enumerate() {
            for (earlier, _) in &LITERALS[..i] {
                assert!(
                    !later.starts_with(earlier),
                    "{earlier} would shadow {later}"
                );
            }
        }
    }

    #[test]
    fn test_display_icons() {
        assert_eq!(format_for_display(&tokenize("LCa")), "\u{25d0}a");
        assert_eq!(format_for_display(&tokenize("F3")), "[F3]");
        assert_eq!(format_for_display(&tokenize("SRC")), "\u{21e7}\u{25d1}");
    }
}
