pub mod source;
pub mod token;

use token::Token;

/// A named drill. Stats are keyed by `text`, not by `name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: String,
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Pattern {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            tokens: token::tokenize(text),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn display(&self) -> String {
        token::format_for_display(&self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::token::ClickKind;

    #[test]
    fn test_new_pattern_tokenizes() {
        let p = Pattern::new("Clicks", "LCaRCa");
        assert_eq!(p.len(), 4);
        assert_eq!(p.tokens[0], Token::Click(ClickKind::Left));
        assert_eq!(p.text, "LCaRCa");
    }
}
