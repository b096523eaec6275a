use crate::types::Token as TokenTrait;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Text of the token
    pub text: &'a str,
    /// Index of the token within the sequence produced by one parser.
    pub position: usize,
}

impl<'a> TokenTrait for Token<'a> {
    fn text(&self) -> &str {
        self.text
    }

    fn position(&self) -> usize {
        self.position
    }
}

/// Splits a phonetic transcript on whitespace runs.
///
/// Tokens are returned verbatim: no case folding, no filtering.
#[derive(Debug)]
pub struct TokenParser<'a> {
    source: &'a str,
    offset: usize,
    emitted: usize,
}

impl<'a> TokenParser<'a> {
    pub fn parse(text: &'a str) -> TokenParser<'a> {
        TokenParser {
            source: text,
            offset: 0,
            emitted: 0,
        }
    }
}

fn skip_len(text: &str, whitespace: bool) -> usize {
    text.chars()
        .take_while(|x| x.is_whitespace() == whitespace)
        .map(|x| x.len_utf8())
        .sum::<usize>()
}

impl<'a> Iterator for TokenParser<'a> {
    type Item = Token<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let rest_of_text = self.source.get(self.offset..)?;
        let start = self.offset + skip_len(rest_of_text, true);
        let rest_of_text = self.source.get(start..)?;
        let len = skip_len(rest_of_text, false);
        if len == 0 {
            self.offset = self.source.len();
            return None;
        }
        let end = start + len;
        let token = Token {
            text: self.source.get(start..end)?,
            position: self.emitted,
        };
        self.offset = end;
        self.emitted += 1;
        Some(token)
    }
}

pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TokenParser::parse(text).collect()
}
