use std::ops::Range;

use anyhow::bail;
use espack_common::{
  ExportDecl, ExportSpecifier, IdentRef, ImportDecl, ImportSpecifier, Program, Span, Statement,
  StatementKind,
};

use crate::keywords::{KEYWORDS, MEMBER_MODIFIERS, OBJECT_PRECEDING_KEYWORDS};
use crate::lexer::{lex, Token, TokenKind};

/// Splits a module into import statements, export statements and opaque
/// script runs, collecting top-level bindings and renameable identifier
/// reference sites along the way.
pub fn parse_module(source: &str) -> anyhow::Result<Program> {
  let tokens = lex(source)?;
  let mut statements = Vec::new();
  let mut nesting = 0usize;
  let mut run_start: Option<usize> = None;
  let mut index = 0;

  while index < tokens.len() {
    let token = &tokens[index];
    if nesting == 0 && token.kind == TokenKind::Ident {
      let after_dot = index > 0 && tokens[index - 1].is_punct(b'.');
      if !after_dot {
        let next = if token.is_ident(source, "import") && starts_import(&tokens, index) {
          flush_script_run(&mut statements, &tokens, run_start.take(), index, source);
          let (statement, next) = parse_import(&tokens, index, source)?;
          statements.push(statement);
          Some(next)
        } else if token.is_ident(source, "export") && starts_export(&tokens, index, source) {
          flush_script_run(&mut statements, &tokens, run_start.take(), index, source);
          let (statement, next) = parse_export(&tokens, index, source)?;
          statements.push(statement);
          Some(next)
        } else {
          None
        };
        if let Some(next) = next {
          index = next;
          continue;
        }
      }
    }
    if run_start.is_none() {
      run_start = Some(index);
    }
    nesting = adjust_nesting(nesting, token);
    index += 1;
  }
  flush_script_run(&mut statements, &tokens, run_start.take(), tokens.len(), source);

  Ok(Program { statements })
}

fn starts_import(tokens: &[Token], at: usize) -> bool {
  // `import(…)` and `import.meta` are expressions, not declarations.
  tokens.get(at + 1).is_some_and(|next| !next.is_punct(b'(') && !next.is_punct(b'.'))
}

fn starts_export(tokens: &[Token], at: usize, source: &str) -> bool {
  tokens.get(at + 1).is_some_and(|next| {
    next.is_punct(b'{')
      || next.is_punct(b'*')
      || (next.kind == TokenKind::Ident
        && matches!(
          next.text(source),
          "default" | "var" | "let" | "const" | "function" | "class" | "async"
        ))
  })
}

fn adjust_nesting(nesting: usize, token: &Token) -> usize {
  match token.kind {
    TokenKind::Punct(b'(' | b'[' | b'{') => nesting + 1,
    TokenKind::Punct(b')' | b']' | b'}') => nesting.saturating_sub(1),
    _ => nesting,
  }
}

fn ident_ref(token: &Token, source: &str) -> IdentRef {
  IdentRef::new(token.text(source), token.span)
}

fn token_at<'t>(tokens: &'t [Token], at: usize, context: &str) -> anyhow::Result<&'t Token> {
  tokens.get(at).ok_or_else(|| anyhow::anyhow!("unexpected end of {context}"))
}

fn flush_script_run(
  statements: &mut Vec<Statement>,
  tokens: &[Token],
  run_start: Option<usize>,
  end: usize,
  source: &str,
) {
  let Some(start) = run_start else { return };
  if start >= end {
    return;
  }
  let span = Span::new(tokens[start].span.start, tokens[end - 1].span.end);
  statements.push(Statement {
    span,
    kind: StatementKind::Script,
    idents: collect_idents(tokens, start..end, source),
    bindings: scan_top_level_bindings(tokens, start, end - 1, source),
  });
}

fn parse_import(tokens: &[Token], at: usize, source: &str) -> anyhow::Result<(Statement, usize)> {
  let mut decl =
    ImportDecl { specifier: String::new(), default: None, namespace: None, named: Vec::new() };
  let mut bindings = Vec::new();
  let mut j = at + 1;

  if let TokenKind::Str(specifier) = &token_at(tokens, j, "import statement")?.kind {
    // `import '…'` — evaluated for side effects only.
    decl.specifier = specifier.clone();
    j += 1;
  } else {
    if token_at(tokens, j, "import statement")?.kind == TokenKind::Ident
      && !token_at(tokens, j, "import statement")?.is_ident(source, "from")
    {
      let ident = ident_ref(&tokens[j], source);
      bindings.push(ident.clone());
      decl.default = Some(ident);
      j += 1;
      if token_at(tokens, j, "import statement")?.is_punct(b',') {
        j += 1;
      }
    }

    let clause = token_at(tokens, j, "import statement")?;
    if clause.is_punct(b'{') {
      j = parse_named_imports(tokens, j, source, &mut decl, &mut bindings)?;
    } else if clause.is_punct(b'*') {
      j += 1;
      if !token_at(tokens, j, "import statement")?.is_ident(source, "as") {
        bail!("expected `as` after `*` in import statement at byte {}", tokens[at].span.start);
      }
      j += 1;
      let local = token_at(tokens, j, "import statement")?;
      if local.kind != TokenKind::Ident {
        bail!("expected namespace binding in import statement at byte {}", tokens[at].span.start);
      }
      let ident = ident_ref(local, source);
      bindings.push(ident.clone());
      decl.namespace = Some(ident);
      j += 1;
    }

    if !token_at(tokens, j, "import statement")?.is_ident(source, "from") {
      bail!("expected `from` in import statement at byte {}", tokens[at].span.start);
    }
    j += 1;
    match &token_at(tokens, j, "import statement")?.kind {
      TokenKind::Str(specifier) => {
        decl.specifier = specifier.clone();
        j += 1;
      }
      _ => bail!("expected module specifier in import statement at byte {}", tokens[at].span.start),
    }
  }

  if tokens.get(j).is_some_and(|token| token.is_punct(b';')) {
    j += 1;
  }
  let span = Span::new(tokens[at].span.start, tokens[j - 1].span.end);
  let statement =
    Statement { span, kind: StatementKind::Import(decl), idents: Vec::new(), bindings };
  Ok((statement, j))
}

fn parse_named_imports(
  tokens: &[Token],
  open: usize,
  source: &str,
  decl: &mut ImportDecl,
  bindings: &mut Vec<IdentRef>,
) -> anyhow::Result<usize> {
  let mut j = open + 1;
  loop {
    let token = token_at(tokens, j, "import specifiers")?;
    if token.is_punct(b'}') {
      return Ok(j + 1);
    }
    if token.is_punct(b',') {
      j += 1;
      continue;
    }
    match &token.kind {
      TokenKind::Ident => {
        let imported = token.text(source).to_owned();
        let mut local = ident_ref(token, source);
        if tokens.get(j + 1).is_some_and(|next| next.is_ident(source, "as")) {
          let alias = token_at(tokens, j + 2, "import specifiers")?;
          if alias.kind != TokenKind::Ident {
            bail!("expected binding after `as` at byte {}", token.span.start);
          }
          local = ident_ref(alias, source);
          j += 3;
        } else {
          j += 1;
        }
        bindings.push(local.clone());
        decl.named.push(ImportSpecifier { imported, local });
      }
      TokenKind::Str(_) => {
        // String import names are untracked; skip the whole entry.
        j += 1;
        while !token_at(tokens, j, "import specifiers")?.is_punct(b',')
          && !token_at(tokens, j, "import specifiers")?.is_punct(b'}')
        {
          j += 1;
        }
      }
      _ => bail!("unexpected token in import specifiers at byte {}", token.span.start),
    }
  }
}

fn parse_export(tokens: &[Token], at: usize, source: &str) -> anyhow::Result<(Statement, usize)> {
  let export_end = tokens[at].span.end;
  let mut bindings = Vec::new();
  let mut j = at + 1;
  let clause = token_at(tokens, j, "export statement")?;

  let kind = if clause.is_punct(b'{') {
    let (specifiers, after) = parse_named_exports(tokens, j, source)?;
    j = after;
    let mut from = None;
    if tokens.get(j).is_some_and(|token| token.is_ident(source, "from")) {
      j += 1;
      match &token_at(tokens, j, "export statement")?.kind {
        TokenKind::Str(specifier) => {
          from = Some(specifier.clone());
          j += 1;
        }
        _ => bail!("expected module specifier in export statement at byte {}", tokens[at].span.start),
      }
    }
    ExportDecl::Named { specifiers, from }
  } else if clause.is_punct(b'*') {
    j += 1;
    let mut alias = None;
    if tokens.get(j).is_some_and(|token| token.is_ident(source, "as")) {
      let name = token_at(tokens, j + 1, "export statement")?;
      if name.kind != TokenKind::Ident {
        bail!("expected binding after `as` at byte {}", tokens[at].span.start);
      }
      alias = Some(name.text(source).to_owned());
      j += 2;
    }
    if !token_at(tokens, j, "export statement")?.is_ident(source, "from") {
      bail!("expected `from` in export statement at byte {}", tokens[at].span.start);
    }
    j += 1;
    match &token_at(tokens, j, "export statement")?.kind {
      TokenKind::Str(specifier) => {
        let from = specifier.clone();
        j += 1;
        ExportDecl::All { from, alias }
      }
      _ => bail!("expected module specifier in export statement at byte {}", tokens[at].span.start),
    }
  } else if clause.is_ident(source, "default") {
    let prefix_end = clause.span.end;
    j += 1;
    let head = token_at(tokens, j, "export statement")?;
    let declaration_key = if head.is_ident(source, "async")
      && tokens.get(j + 1).is_some_and(|next| next.is_ident(source, "function"))
    {
      Some(j + 1)
    } else if head.is_ident(source, "function") || head.is_ident(source, "class") {
      Some(j)
    } else {
      None
    };

    let binding = if let Some(key) = declaration_key {
      let mut name_at = key + 1;
      if tokens.get(name_at).is_some_and(|token| token.is_punct(b'*')) {
        name_at += 1;
      }
      let name = tokens
        .get(name_at)
        .filter(|token| token.kind == TokenKind::Ident && !KEYWORDS.contains(token.text(source)))
        .map(|token| {
          bindings.push(ident_ref(token, source));
          token.text(source).to_owned()
        });
      j = find_balanced_end(tokens, key) + 1;
      name
    } else {
      // Default expression: runs to the next top-level `;` (or a token that
      // can only begin a new statement).
      let mut depth = 0usize;
      while j < tokens.len() {
        let token = &tokens[j];
        if depth == 0 {
          if token.is_punct(b';') {
            break;
          }
          if token.kind == TokenKind::Ident
            && matches!(token.text(source), "var" | "let" | "const" | "import" | "export")
          {
            break;
          }
        }
        depth = adjust_nesting(depth, token);
        j += 1;
      }
      None
    };
    ExportDecl::Default { prefix_end, binding }
  } else if matches!(clause.text(source), "var" | "let" | "const") {
    let (found, last) = scan_var_bindings(tokens, j, tokens.len() - 1, source);
    bindings = found;
    j = last + 1;
    ExportDecl::Declaration { prefix_end: export_end }
  } else {
    // function / class / async function declarations.
    let key = if clause.is_ident(source, "async") {
      if !tokens.get(j + 1).is_some_and(|next| next.is_ident(source, "function")) {
        bail!("unsupported export statement at byte {}", tokens[at].span.start);
      }
      j + 1
    } else {
      j
    };
    let mut name_at = key + 1;
    if tokens.get(name_at).is_some_and(|token| token.is_punct(b'*')) {
      name_at += 1;
    }
    let name = token_at(tokens, name_at, "export statement")?;
    if name.kind != TokenKind::Ident || KEYWORDS.contains(name.text(source)) {
      bail!("expected declaration name in export statement at byte {}", tokens[at].span.start);
    }
    bindings.push(ident_ref(name, source));
    j = find_balanced_end(tokens, key) + 1;
    ExportDecl::Declaration { prefix_end: export_end }
  };

  if tokens.get(j).is_some_and(|token| token.is_punct(b';')) {
    j += 1;
  }
  let span = Span::new(tokens[at].span.start, tokens[j - 1].span.end);
  let idents = match kind {
    // Pure export statements are elided from output; nothing to rename.
    ExportDecl::Named { .. } | ExportDecl::All { .. } => Vec::new(),
    _ => collect_idents(tokens, at..j, source),
  };
  let statement = Statement { span, kind: StatementKind::Export(kind), idents, bindings };
  Ok((statement, j))
}

fn parse_named_exports(
  tokens: &[Token],
  open: usize,
  source: &str,
) -> anyhow::Result<(Vec<ExportSpecifier>, usize)> {
  let mut specifiers = Vec::new();
  let mut j = open + 1;
  loop {
    let token = token_at(tokens, j, "export specifiers")?;
    if token.is_punct(b'}') {
      return Ok((specifiers, j + 1));
    }
    if token.is_punct(b',') {
      j += 1;
      continue;
    }
    match &token.kind {
      TokenKind::Ident => {
        let local = token.text(source).to_owned();
        let mut exported = local.clone();
        if tokens.get(j + 1).is_some_and(|next| next.is_ident(source, "as")) {
          let alias = token_at(tokens, j + 2, "export specifiers")?;
          match &alias.kind {
            TokenKind::Ident => {
              exported = alias.text(source).to_owned();
              j += 3;
            }
            // String export names are untracked.
            TokenKind::Str(_) => {
              j += 3;
              continue;
            }
            _ => bail!("expected name after `as` at byte {}", token.span.start),
          }
        } else {
          j += 1;
        }
        specifiers.push(ExportSpecifier { local, exported });
      }
      TokenKind::Str(_) => {
        j += 1;
        while !token_at(tokens, j, "export specifiers")?.is_punct(b',')
          && !token_at(tokens, j, "export specifiers")?.is_punct(b'}')
        {
          j += 1;
        }
      }
      _ => bail!("unexpected token in export specifiers at byte {}", token.span.start),
    }
  }
}

/// Index of the `}` that closes the body of a function/class declaration
/// starting at `from`. Braces inside parameter defaults nest above the body
/// brace, so the first `}` returning the total depth to zero is the end.
fn find_balanced_end(tokens: &[Token], from: usize) -> usize {
  let mut depth = 0usize;
  for index in from..tokens.len() {
    match tokens[index].kind {
      TokenKind::Punct(b'(' | b'[' | b'{') => depth += 1,
      TokenKind::Punct(b')' | b']' | b'}') => {
        depth = depth.saturating_sub(1);
        if depth == 0 && tokens[index].is_punct(b'}') {
          return index;
        }
      }
      _ => {}
    }
  }
  tokens.len().saturating_sub(1)
}

/// Collects the binding names a `var`/`let`/`const` statement declares,
/// returning them with the index of the statement's last token. Destructuring
/// patterns are left untracked.
fn scan_var_bindings(
  tokens: &[Token],
  keyword: usize,
  last: usize,
  source: &str,
) -> (Vec<IdentRef>, usize) {
  let mut bindings = Vec::new();
  let mut depth = 0usize;
  let mut expecting = true;
  let mut j = keyword + 1;
  while j <= last {
    let token = &tokens[j];
    if depth == 0 {
      match &token.kind {
        TokenKind::Ident => {
          let text = token.text(source);
          if matches!(text, "var" | "let" | "const" | "import" | "export") {
            // A new statement began without a separating semicolon.
            return (bindings, j.saturating_sub(1));
          }
          if expecting && !KEYWORDS.contains(text) {
            bindings.push(ident_ref(token, source));
            expecting = false;
            j += 1;
            continue;
          }
        }
        TokenKind::Punct(b',') => {
          expecting = true;
          j += 1;
          continue;
        }
        TokenKind::Punct(b';') => return (bindings, j),
        _ => {}
      }
      expecting = false;
    }
    depth = adjust_nesting(depth, token);
    j += 1;
  }
  (bindings, last)
}

fn at_statement_start(tokens: &[Token], at: usize, range_start: usize) -> bool {
  at == range_start
    || matches!(tokens[at - 1].kind, TokenKind::Punct(b';' | b'}' | b')'))
}

/// Top-level bindings introduced by an opaque script run.
fn scan_top_level_bindings(
  tokens: &[Token],
  start: usize,
  last: usize,
  source: &str,
) -> Vec<IdentRef> {
  let mut bindings = Vec::new();
  let mut depth = 0usize;
  let mut j = start;
  while j <= last {
    let token = &tokens[j];
    if depth == 0 && token.kind == TokenKind::Ident {
      let after_dot = j > start && tokens[j - 1].is_punct(b'.');
      if !after_dot {
        match token.text(source) {
          "var" | "let" | "const" => {
            let (found, end) = scan_var_bindings(tokens, j, last, source);
            bindings.extend(found);
            j = end + 1;
            continue;
          }
          "function" | "class" | "async" if at_statement_start(tokens, j, start) => {
            let text = token.text(source);
            let key = if text == "async" {
              if tokens.get(j + 1).is_some_and(|next| next.is_ident(source, "function")) {
                j + 1
              } else {
                j += 1;
                continue;
              }
            } else {
              j
            };
            let mut name_at = key + 1;
            if tokens.get(name_at).is_some_and(|next| next.is_punct(b'*')) {
              name_at += 1;
            }
            if let Some(name) = tokens
              .get(name_at)
              .filter(|next| next.kind == TokenKind::Ident && !KEYWORDS.contains(next.text(source)))
            {
              bindings.push(ident_ref(name, source));
            }
            j = find_balanced_end(tokens, key).min(last) + 1;
            continue;
          }
          _ => {}
        }
      }
    }
    depth = adjust_nesting(depth, token);
    j += 1;
  }
  bindings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
  Paren,
  Bracket,
  Object,
  Block,
  Class,
}

fn object_or_block(prev: Option<&Token>, source: &str) -> Ctx {
  match prev {
    None => Ctx::Block,
    Some(token) => match &token.kind {
      TokenKind::Arrow => Ctx::Block,
      TokenKind::Ellipsis => Ctx::Object,
      TokenKind::Punct(ch) if b"([,=:?!&|+-*/%^<>~".contains(ch) => Ctx::Object,
      TokenKind::Ident if OBJECT_PRECEDING_KEYWORDS.contains(token.text(source)) => Ctx::Object,
      _ => Ctx::Block,
    },
  }
}

/// Identifier reference sites eligible for renaming. Property accesses,
/// object keys and class/object member names are excluded; object shorthand
/// positions are marked so a rename can expand them to `key: renamed`.
fn collect_idents(tokens: &[Token], range: Range<usize>, source: &str) -> Vec<IdentRef> {
  let mut idents = Vec::new();
  let mut stack: Vec<Ctx> = Vec::new();
  let mut pending_class: Option<usize> = None;

  for index in range.clone() {
    let token = &tokens[index];
    match &token.kind {
      TokenKind::Punct(b'(') => stack.push(Ctx::Paren),
      TokenKind::Punct(b'[') => stack.push(Ctx::Bracket),
      TokenKind::Punct(b'{') => {
        let ctx = if pending_class == Some(stack.len()) {
          pending_class = None;
          Ctx::Class
        } else {
          let prev = index.checked_sub(1).filter(|at| *at >= range.start).map(|at| &tokens[at]);
          object_or_block(prev, source)
        };
        stack.push(ctx);
      }
      TokenKind::Punct(b')' | b']' | b'}') => {
        stack.pop();
      }
      TokenKind::Ident => {
        let text = token.text(source);
        if text == "class" {
          pending_class = Some(stack.len());
          continue;
        }
        if KEYWORDS.contains(text) {
          continue;
        }
        let prev = index.checked_sub(1).filter(|at| *at >= range.start).map(|at| &tokens[at]);
        if prev.is_some_and(|p| p.is_punct(b'.') || p.is_punct(b'#')) {
          continue;
        }
        let next = tokens.get(index + 1);
        let prev_is_modifier = prev
          .is_some_and(|p| p.kind == TokenKind::Ident && MEMBER_MODIFIERS.contains(p.text(source)));
        match stack.last() {
          Some(Ctx::Object) => {
            let member_start = prev.is_some_and(|p| p.is_punct(b'{') || p.is_punct(b','));
            if member_start {
              let next_is = |ch: u8| next.is_some_and(|n| n.is_punct(ch));
              if next_is(b',') || next_is(b'}') {
                let mut ident = ident_ref(token, source);
                ident.shorthand = true;
                idents.push(ident);
              }
              // Keys, method names and other member-position constructs
              // stay untouched.
            } else if !prev_is_modifier {
              idents.push(ident_ref(token, source));
            }
          }
          Some(Ctx::Class) => {
            let member_start =
              prev.is_some_and(|p| p.is_punct(b'{') || p.is_punct(b';') || p.is_punct(b'}'));
            if !member_start && !prev_is_modifier {
              idents.push(ident_ref(token, source));
            }
          }
          _ => idents.push(ident_ref(token, source)),
        }
      }
      _ => {}
    }
  }
  idents
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(source: &str) -> Program {
    parse_module(source).unwrap()
  }

  fn import_of(statement: &Statement) -> &ImportDecl {
    match &statement.kind {
      StatementKind::Import(decl) => decl,
      other => panic!("expected import, got {other:?}"),
    }
  }

  fn export_of(statement: &Statement) -> &ExportDecl {
    match &statement.kind {
      StatementKind::Export(decl) => decl,
      other => panic!("expected export, got {other:?}"),
    }
  }

  #[test]
  fn parses_every_import_form() {
    let source = "import d from './a';\n\
                  import * as ns from './b';\n\
                  import { x, y as z } from './c';\n\
                  import d2, { w } from './d';\n\
                  import './side-effect';\n";
    let program = parse(source);
    assert_eq!(program.statements.len(), 5);

    let first = import_of(&program.statements[0]);
    assert_eq!(first.specifier, "./a");
    assert_eq!(first.default.as_ref().unwrap().name, "d");

    let second = import_of(&program.statements[1]);
    assert_eq!(second.namespace.as_ref().unwrap().name, "ns");

    let third = import_of(&program.statements[2]);
    assert_eq!(third.named.len(), 2);
    assert_eq!(third.named[0].imported, "x");
    assert_eq!(third.named[0].local.name, "x");
    assert_eq!(third.named[1].imported, "y");
    assert_eq!(third.named[1].local.name, "z");

    let fourth = import_of(&program.statements[3]);
    assert_eq!(fourth.default.as_ref().unwrap().name, "d2");
    assert_eq!(fourth.named[0].imported, "w");

    let fifth = import_of(&program.statements[4]);
    assert_eq!(fifth.specifier, "./side-effect");
    assert!(fifth.default.is_none() && fifth.named.is_empty() && fifth.namespace.is_none());
  }

  #[test]
  fn parses_export_forms() {
    let source = "export { a, b as c };\n\
                  export { d } from './dep';\n\
                  export * from './all';\n\
                  export * as everything from './all';\n";
    let program = parse(source);

    match export_of(&program.statements[0]) {
      ExportDecl::Named { specifiers, from } => {
        assert!(from.is_none());
        assert_eq!(specifiers[0].local, "a");
        assert_eq!(specifiers[0].exported, "a");
        assert_eq!(specifiers[1].local, "b");
        assert_eq!(specifiers[1].exported, "c");
      }
      other => panic!("unexpected {other:?}"),
    }
    match export_of(&program.statements[1]) {
      ExportDecl::Named { from, .. } => assert_eq!(from.as_deref(), Some("./dep")),
      other => panic!("unexpected {other:?}"),
    }
    match export_of(&program.statements[2]) {
      ExportDecl::All { from, alias } => {
        assert_eq!(from, "./all");
        assert!(alias.is_none());
      }
      other => panic!("unexpected {other:?}"),
    }
    match export_of(&program.statements[3]) {
      ExportDecl::All { alias, .. } => assert_eq!(alias.as_deref(), Some("everything")),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn export_declarations_keep_their_bindings_and_prefix() {
    let source = "export const answer = 42;";
    let program = parse(source);
    let statement = &program.statements[0];
    assert_eq!(statement.bindings.len(), 1);
    assert_eq!(statement.bindings[0].name, "answer");
    match export_of(statement) {
      ExportDecl::Declaration { prefix_end } => {
        assert_eq!(&source[statement.span.start..*prefix_end], "export");
      }
      other => panic!("unexpected {other:?}"),
    }

    let program = parse("export function greet(name) { return name; }");
    let statement = &program.statements[0];
    assert_eq!(statement.bindings[0].name, "greet");
  }

  #[test]
  fn export_default_variants() {
    let named = parse("export default function handler(req) { return req; }");
    match export_of(&named.statements[0]) {
      ExportDecl::Default { binding, .. } => assert_eq!(binding.as_deref(), Some("handler")),
      other => panic!("unexpected {other:?}"),
    }
    assert_eq!(named.statements[0].bindings[0].name, "handler");

    let anonymous = parse("export default { answer: 42 };");
    match export_of(&anonymous.statements[0]) {
      ExportDecl::Default { binding, .. } => assert!(binding.is_none()),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn script_runs_collect_top_level_bindings() {
    let source = "const a = 1, b = 2;\n\
                  function outer() { var inner = 3; }\n\
                  class Widget {}\n\
                  let { destructured } = obj;\n";
    let program = parse(source);
    assert_eq!(program.statements.len(), 1);
    let names: Vec<_> =
      program.statements[0].bindings.iter().map(|binding| binding.name.as_str()).collect();
    // `inner` is function-scoped and destructured names are untracked.
    assert_eq!(names, vec!["a", "b", "outer", "Widget"]);
  }

  #[test]
  fn ident_collection_excludes_member_positions() {
    let source = "log(counter.value, { counter: counter, plain });";
    let program = parse(source);
    let idents = &program.statements[0].idents;
    let names: Vec<_> = idents.iter().map(|ident| (ident.name.as_str(), ident.shorthand)).collect();
    // `value` is a property access, the first `counter` inside the object is
    // a key, `plain` is shorthand.
    assert_eq!(
      names,
      vec![("log", false), ("counter", false), ("counter", false), ("plain", true)]
    );
  }

  #[test]
  fn ident_collection_sees_through_templates_and_ternaries() {
    let source = "const msg = `value: ${count}` ;\nconst pick = flag ? left : right;";
    let program = parse(source);
    let names: Vec<_> =
      program.statements[0].idents.iter().map(|ident| ident.name.as_str()).collect();
    assert_eq!(names, vec!["msg", "count", "pick", "flag", "left", "right"]);
  }

  #[test]
  fn dynamic_import_and_import_meta_stay_script() {
    let program = parse("const mod = import('./lazy');\nconst url = import.meta;");
    assert!(program
      .statements
      .iter()
      .all(|statement| matches!(statement.kind, StatementKind::Script)));
  }

  #[test]
  fn class_members_are_not_reference_sites() {
    let source = "class Box { size = width; get area() { return this.size; } }";
    let program = parse(source);
    let names: Vec<_> =
      program.statements[0].idents.iter().map(|ident| ident.name.as_str()).collect();
    // `size`/`area` are member names; `width` is the only outside reference
    // (`this.size` is a property access).
    assert_eq!(names, vec!["Box", "width"]);
  }

  #[test]
  fn unterminated_literals_are_parse_errors() {
    assert!(parse_module("const s = 'oops").is_err());
    assert!(parse_module("const t = `oops").is_err());
  }
}
