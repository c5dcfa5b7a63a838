//! Compound selectors joined by the descendant combinator.
//!
//! Supported: `tag`, `*`, `.class`, `#id`, `[attr]`, `[attr=value]` (value
//! bare, single- or double-quoted), and whitespace between compounds. Tag
//! names match case-insensitively; everything else is case-sensitive.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::document::{
  Document,
  NodeId,
};

pub type Result<T> = std::result::Result<T, SelectorError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
  #[error("empty selector")]
  Empty,
  #[error("unexpected `{found}` at offset {offset}")]
  Unexpected { found: char, offset: usize },
  #[error("expected a name at offset {offset}")]
  ExpectedName { offset: usize },
  #[error("unexpected end of selector")]
  UnexpectedEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
  name:  String,
  value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
  tag:     Option<String>,
  id:      Option<String>,
  classes: SmallVec<[String; 2]>,
  attrs:   SmallVec<[AttrTest; 2]>,
}

impl Compound {
  fn matches(&self, doc: &Document, node: NodeId) -> bool {
    let Some(tag) = doc.tag(node) else {
      return false;
    };
    if self.tag.as_deref().is_some_and(|want| want != tag) {
      return false;
    }
    if self
      .id
      .as_deref()
      .is_some_and(|id| doc.attr(node, "id") != Some(id))
    {
      return false;
    }
    if !self.classes.iter().all(|class| doc.has_class(node, class)) {
      return false;
    }
    self.attrs.iter().all(|test| {
      match (doc.attr(node, &test.name), &test.value) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(actual), Some(expected)) => actual == expected,
      }
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
  source:    String,
  /// Outermost ancestor first.
  compounds: SmallVec<[Compound; 2]>,
}

impl fmt::Display for Selector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

impl Selector {
  pub fn parse(input: &str) -> Result<Self> {
    let mut parser = Parser { input, pos: 0 };
    let mut compounds = SmallVec::new();
    loop {
      parser.skip_whitespace();
      if parser.peek().is_none() {
        break;
      }
      compounds.push(parser.compound()?);
      match parser.peek() {
        None => break,
        Some(ch) if ch.is_whitespace() => continue,
        Some(found) => {
          return Err(SelectorError::Unexpected {
            found,
            offset: parser.pos,
          });
        },
      }
    }
    if compounds.is_empty() {
      return Err(SelectorError::Empty);
    }
    Ok(Self {
      source: input.trim().to_string(),
      compounds,
    })
  }

  /// Whether `node` matches. Ancestor compounds may match anywhere up the
  /// tree, including outside of any query scope.
  pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
    let Some((last, ancestors)) = self.compounds.split_last() else {
      return false;
    };
    if !last.matches(doc, node) {
      return false;
    }
    let mut current = doc.parent(node);
    for compound in ancestors.iter().rev() {
      loop {
        let Some(candidate) = current else {
          return false;
        };
        current = doc.parent(candidate);
        if compound.matches(doc, candidate) {
          break;
        }
      }
    }
    true
  }
}

struct Parser<'a> {
  input: &'a str,
  pos:   usize,
}

impl Parser<'_> {
  fn peek(&self) -> Option<char> {
    self.input[self.pos..].chars().next()
  }

  fn bump(&mut self) -> Option<char> {
    let ch = self.peek()?;
    self.pos += ch.len_utf8();
    Some(ch)
  }

  fn skip_whitespace(&mut self) {
    while self.peek().is_some_and(char::is_whitespace) {
      self.bump();
    }
  }

  fn expect(&mut self, want: char) -> Result<()> {
    match self.bump() {
      Some(ch) if ch == want => Ok(()),
      Some(found) => {
        Err(SelectorError::Unexpected {
          found,
          offset: self.pos - found.len_utf8(),
        })
      },
      None => Err(SelectorError::UnexpectedEnd),
    }
  }

  fn name(&mut self) -> Result<String> {
    let start = self.pos;
    while self.peek().is_some_and(is_name_char) {
      self.bump();
    }
    if self.pos == start {
      return Err(SelectorError::ExpectedName { offset: start });
    }
    Ok(self.input[start..self.pos].to_string())
  }

  fn compound(&mut self) -> Result<Compound> {
    let start = self.pos;
    let mut compound = Compound::default();
    match self.peek() {
      Some('*') => {
        self.bump();
      },
      Some(ch) if is_name_char(ch) => compound.tag = Some(self.name()?.to_ascii_lowercase()),
      _ => {},
    }

    loop {
      match self.peek() {
        Some('.') => {
          self.bump();
          compound.classes.push(self.name()?);
        },
        Some('#') => {
          self.bump();
          compound.id = Some(self.name()?);
        },
        Some('[') => {
          self.bump();
          compound.attrs.push(self.attribute()?);
        },
        _ => break,
      }
    }

    if self.pos == start {
      return Err(match self.peek() {
        Some(found) => {
          SelectorError::Unexpected {
            found,
            offset: self.pos,
          }
        },
        None => SelectorError::UnexpectedEnd,
      });
    }
    Ok(compound)
  }

  /// Rest of `[name]` or `[name=value]` after the opening bracket.
  fn attribute(&mut self) -> Result<AttrTest> {
    self.skip_whitespace();
    let name = self.name()?;
    self.skip_whitespace();
    let value = match self.peek() {
      Some('=') => {
        self.bump();
        self.skip_whitespace();
        let value = match self.peek() {
          Some(quote @ ('"' | '\'')) => {
            self.bump();
            let start = self.pos;
            loop {
              match self.bump() {
                Some(ch) if ch == quote => break,
                Some(_) => {},
                None => return Err(SelectorError::UnexpectedEnd),
              }
            }
            self.input[start..self.pos - 1].to_string()
          },
          _ => self.name()?,
        };
        self.skip_whitespace();
        Some(value)
      },
      _ => None,
    };
    self.expect(']')?;
    Ok(AttrTest { name, value })
  }
}

fn is_name_char(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '-' || ch == '_'
}
