use anyhow::bail;
use espack_common::Span;
use espack_utils::ecmascript::{is_identifier_part, is_identifier_start};

use crate::keywords::REGEX_PRECEDING_KEYWORDS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
  Ident,
  /// String literal with its decoded value.
  Str(String),
  Num,
  /// One raw template-literal chunk, interpolation tokens excluded.
  Template,
  Regex,
  /// `...`
  Ellipsis,
  /// `=>`
  Arrow,
  /// Any other single significant ASCII character.
  Punct(u8),
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
  pub kind: TokenKind,
  pub span: Span,
}

impl Token {
  pub fn text<'s>(&self, source: &'s str) -> &'s str {
    self.span.text(source)
  }

  pub fn is_punct(&self, ch: u8) -> bool {
    self.kind == TokenKind::Punct(ch)
  }

  pub fn is_ident(&self, source: &str, name: &str) -> bool {
    self.kind == TokenKind::Ident && self.text(source) == name
  }
}

/// Whether a `/` at this point starts a regex literal. Decided from the last
/// significant token, the usual single-token heuristic.
fn regex_allowed(tokens: &[Token], source: &str) -> bool {
  match tokens.last() {
    None => true,
    Some(token) => match &token.kind {
      TokenKind::Ident => REGEX_PRECEDING_KEYWORDS.contains(token.text(source)),
      TokenKind::Str(_) | TokenKind::Num | TokenKind::Template | TokenKind::Regex => false,
      TokenKind::Punct(b')' | b']' | b'}') => false,
      TokenKind::Punct(_) | TokenKind::Ellipsis | TokenKind::Arrow => true,
    },
  }
}

struct Lexer<'s> {
  source: &'s str,
  pos: usize,
  tokens: Vec<Token>,
  brace_depth: usize,
  /// Brace depths at which suspended template literals resume.
  template_stack: Vec<usize>,
}

pub(crate) fn lex(source: &str) -> anyhow::Result<Vec<Token>> {
  let mut lexer = Lexer { source, pos: 0, tokens: Vec::new(), brace_depth: 0, template_stack: Vec::new() };
  lexer.run()?;
  Ok(lexer.tokens)
}

impl Lexer<'_> {
  fn byte(&self, at: usize) -> Option<u8> {
    self.source.as_bytes().get(at).copied()
  }

  fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
    self.tokens.push(Token { kind, span: Span::new(start, end) });
  }

  fn run(&mut self) -> anyhow::Result<()> {
    while let Some(byte) = self.byte(self.pos) {
      let start = self.pos;
      match byte {
        b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => self.pos += 1,
        b'/' => match self.byte(start + 1) {
          Some(b'/') => {
            self.pos = self.source[start..].find('\n').map_or(self.source.len(), |at| start + at);
          }
          Some(b'*') => {
            self.pos =
              self.source[start + 2..].find("*/").map_or(self.source.len(), |at| start + 2 + at + 2);
          }
          _ if regex_allowed(&self.tokens, self.source) => self.lex_regex()?,
          _ => {
            self.pos += 1;
            self.push(TokenKind::Punct(b'/'), start, self.pos);
          }
        },
        b'\'' | b'"' => self.lex_string(byte)?,
        b'`' => self.lex_template_chunk()?,
        b'{' => {
          self.brace_depth += 1;
          self.pos += 1;
          self.push(TokenKind::Punct(b'{'), start, self.pos);
        }
        b'}' => {
          if self.template_stack.last() == Some(&self.brace_depth) {
            // An interpolation closes; the enclosing template resumes here.
            self.template_stack.pop();
            self.lex_template_chunk()?;
          } else {
            self.brace_depth = self.brace_depth.saturating_sub(1);
            self.pos += 1;
            self.push(TokenKind::Punct(b'}'), start, self.pos);
          }
        }
        b'.' => {
          if self.byte(start + 1).is_some_and(|next| next.is_ascii_digit()) {
            self.lex_number();
          } else if self.byte(start + 1) == Some(b'.') && self.byte(start + 2) == Some(b'.') {
            self.pos += 3;
            self.push(TokenKind::Ellipsis, start, self.pos);
          } else {
            self.pos += 1;
            self.push(TokenKind::Punct(b'.'), start, self.pos);
          }
        }
        b'=' if self.byte(start + 1) == Some(b'>') => {
          self.pos += 2;
          self.push(TokenKind::Arrow, start, self.pos);
        }
        b'0'..=b'9' => self.lex_number(),
        _ => {
          let ch = self.source[start..].chars().next().expect("byte offset on char boundary");
          if is_identifier_start(ch) {
            self.lex_identifier();
          } else if byte.is_ascii() {
            self.pos += 1;
            self.push(TokenKind::Punct(byte), start, self.pos);
          } else {
            // Stray non-ASCII punctuation; not meaningful at module level.
            self.pos += ch.len_utf8();
          }
        }
      }
    }
    Ok(())
  }

  fn lex_identifier(&mut self) {
    let start = self.pos;
    for (offset, ch) in self.source[start..].char_indices() {
      if !is_identifier_part(ch) {
        self.pos = start + offset;
        self.push(TokenKind::Ident, start, self.pos);
        return;
      }
    }
    self.pos = self.source.len();
    self.push(TokenKind::Ident, start, self.pos);
  }

  fn lex_number(&mut self) {
    let start = self.pos;
    let bytes = self.source.as_bytes();
    let mut at = start + 1;
    while let Some(&byte) = bytes.get(at) {
      let exponent_sign = (byte == b'+' || byte == b'-')
        && matches!(bytes.get(at - 1), Some(b'e' | b'E'))
        && matches!(bytes.get(start), Some(b'0'..=b'9') | Some(b'.'));
      if byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'_' || exponent_sign {
        at += 1;
      } else {
        break;
      }
    }
    self.pos = at;
    self.push(TokenKind::Num, start, self.pos);
  }

  fn lex_string(&mut self, quote: u8) -> anyhow::Result<()> {
    let start = self.pos;
    let mut value = String::new();
    let mut chars = self.source[start + 1..].char_indices();
    while let Some((offset, ch)) = chars.next() {
      match ch {
        '\\' => match chars.next() {
          Some((_, 'n')) => value.push('\n'),
          Some((_, 't')) => value.push('\t'),
          Some((_, 'r')) => value.push('\r'),
          Some((_, '0')) => value.push('\0'),
          Some((_, '\n')) => {}
          Some((_, escaped)) => value.push(escaped),
          None => break,
        },
        '\n' => bail!("unterminated string literal at byte {start}"),
        _ if ch as u32 == u32::from(quote) => {
          self.pos = start + 1 + offset + 1;
          self.push(TokenKind::Str(value), start, self.pos);
          return Ok(());
        }
        _ => value.push(ch),
      }
    }
    bail!("unterminated string literal at byte {start}")
  }

  /// Lexes one raw chunk of a template literal, starting at the opening
  /// backtick or at the `}` that closes an interpolation. When the chunk
  /// ends in `${`, the interpolation's tokens are lexed by the main loop and
  /// the template resumes at the matching close brace.
  fn lex_template_chunk(&mut self) -> anyhow::Result<()> {
    let start = self.pos;
    let mut chars = self.source[start + 1..].char_indices();
    while let Some((offset, ch)) = chars.next() {
      match ch {
        '\\' => {
          chars.next();
        }
        '`' => {
          self.pos = start + 1 + offset + 1;
          self.push(TokenKind::Template, start, self.pos);
          return Ok(());
        }
        '$' if self.byte(start + 1 + offset + 1) == Some(b'{') => {
          self.pos = start + 1 + offset + 2;
          self.push(TokenKind::Template, start, self.pos);
          self.template_stack.push(self.brace_depth);
          return Ok(());
        }
        _ => {}
      }
    }
    bail!("unterminated template literal at byte {start}")
  }

  fn lex_regex(&mut self) -> anyhow::Result<()> {
    let start = self.pos;
    let mut in_class = false;
    let mut chars = self.source[start + 1..].char_indices();
    while let Some((offset, ch)) = chars.next() {
      match ch {
        '\\' => {
          chars.next();
        }
        '[' => in_class = true,
        ']' => in_class = false,
        '/' if !in_class => {
          let mut end = start + 1 + offset + 1;
          while self.source[end..].chars().next().is_some_and(is_identifier_part) {
            end += self.source[end..].chars().next().expect("checked above").len_utf8();
          }
          self.pos = end;
          self.push(TokenKind::Regex, start, self.pos);
          return Ok(());
        }
        '\n' => bail!("unterminated regular expression literal at byte {start}"),
        _ => {}
      }
    }
    bail!("unterminated regular expression literal at byte {start}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().into_iter().map(|token| token.kind).collect()
  }

  #[test]
  fn lexes_identifiers_puncts_and_literals() {
    assert_eq!(
      kinds("const x = 'a';"),
      vec![
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Punct(b'='),
        TokenKind::Str("a".to_owned()),
        TokenKind::Punct(b';'),
      ]
    );
  }

  #[test]
  fn decodes_string_escapes() {
    let tokens = lex(r#"'a\nb\'c'"#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str("a\nb'c".to_owned()));
  }

  #[test]
  fn skips_comments() {
    assert_eq!(kinds("a // b\nc /* d */ e"), vec![TokenKind::Ident; 3]);
  }

  #[test]
  fn template_interpolations_yield_inner_tokens() {
    let source = "`head ${name} tail`";
    let tokens = lex(source).unwrap();
    assert_eq!(
      tokens.iter().map(|token| token.kind.clone()).collect::<Vec<_>>(),
      vec![TokenKind::Template, TokenKind::Ident, TokenKind::Template]
    );
    assert_eq!(tokens[1].text(source), "name");
  }

  #[test]
  fn nested_braces_inside_interpolations_balance() {
    let source = "`${ {a: 1}.a }` done";
    let tokens = lex(source).unwrap();
    assert!(tokens.iter().any(|token| token.is_ident(source, "done")));
  }

  #[test]
  fn regex_heuristic_distinguishes_division() {
    let regex = lex("x = /ab[/]c/g;").unwrap();
    assert!(regex.iter().any(|token| token.kind == TokenKind::Regex));

    let division = lex("a / b / c").unwrap();
    assert!(!division.iter().any(|token| token.kind == TokenKind::Regex));
  }

  #[test]
  fn unterminated_literals_fail() {
    assert!(lex("'open").is_err());
    assert!(lex("`open ${x}").is_err());
  }

  #[test]
  fn arrow_and_ellipsis_are_single_tokens() {
    assert_eq!(
      kinds("(...a) => a"),
      vec![
        TokenKind::Punct(b'('),
        TokenKind::Ellipsis,
        TokenKind::Ident,
        TokenKind::Punct(b')'),
        TokenKind::Arrow,
        TokenKind::Ident,
      ]
    );
  }
}
