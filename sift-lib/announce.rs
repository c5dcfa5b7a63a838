//! Live-region announcements of the current result set.
//!
//! The announcer holds the two message templates and the single live
//! announcement. Every call to [`Announcer::announce`] replaces the live
//! announcement with a new one carrying a fresh sequence number, so hosts can
//! tell a repeated message ("2 of 3 options" twice in a row) from no change at
//! all.
//!
//! Templates use `[name]` placeholders: `[number]`, `[total]` and `[filter]`.
//! Placeholders without a value are kept verbatim.

use std::fmt;

use crate::config::Config;

pub const NUMBER: &str = "number";
pub const TOTAL: &str = "total";
pub const FILTER: &str = "filter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Text(String),
  /// User-typed filter text, rendered distinctly from the counts.
  Emphasis(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
  seq:      u64,
  segments: Vec<Segment>,
}

impl Announcement {
  pub fn seq(&self) -> u64 {
    self.seq
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  /// Plain text, without any emphasis markup.
  pub fn text(&self) -> String {
    let mut out = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Text(text) | Segment::Emphasis(text) => out.push_str(text),
      }
    }
    out
  }

  /// Escaped HTML with the filter text wrapped in `<kbd>`.
  pub fn html(&self) -> String {
    let mut out = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Text(text) => escape_html(text, &mut out),
        Segment::Emphasis(text) => {
          out.push_str("<kbd>");
          escape_html(text, &mut out);
          out.push_str("</kbd>");
        },
      }
    }
    out
  }
}

impl fmt::Display for Announcement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for segment in &self.segments {
      match segment {
        Segment::Text(text) => f.write_str(text)?,
        Segment::Emphasis(text) => write!(f, "`{text}`")?,
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct Announcer {
  number_in_total: String,
  number_filtered: String,
  live:            Option<Announcement>,
  next_seq:        u64,
}

impl Default for Announcer {
  fn default() -> Self {
    Self::from_config(&Config::default())
  }
}

impl Announcer {
  pub fn new(number_in_total: impl Into<String>, number_filtered: impl Into<String>) -> Self {
    Self {
      number_in_total: number_in_total.into(),
      number_filtered: number_filtered.into(),
      live:            None,
      next_seq:        1,
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(
      config.number_in_total_template.clone(),
      config.number_filtered_template.clone(),
    )
  }

  /// The announcement currently in the live region, if any was made yet.
  pub fn live(&self) -> Option<&Announcement> {
    self.live.as_ref()
  }

  /// Replace the live announcement with one describing the given result set.
  pub fn announce(&mut self, query: &str, visible: usize, total: usize) -> &Announcement {
    let number = visible.to_string();
    let segments = if query.is_empty() {
      render(&self.number_in_total, &[(NUMBER, Segment::Text(number))])
    } else {
      render(&self.number_filtered, &[
        (NUMBER, Segment::Text(number)),
        (TOTAL, Segment::Text(total.to_string())),
        (FILTER, Segment::Emphasis(query.to_string())),
      ])
    };

    let seq = self.next_seq;
    self.next_seq = self.next_seq.saturating_add(1);
    tracing::trace!(seq, visible, total, "announce");
    self.live.insert(Announcement { seq, segments })
  }
}

/// Substitute `[name]` placeholders in `template`.
///
/// Substituted values are never scanned for placeholders themselves.
fn render(template: &str, values: &[(&str, Segment)]) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut text = String::new();
  let mut rest = template;

  while let Some(open) = rest.find('[') {
    let (before, tail) = rest.split_at(open);
    text.push_str(before);

    let value = tail.find(']').and_then(|close| {
      let name = &tail[1..close];
      values
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| (close, value))
    });

    match value {
      Some((close, value)) => {
        match value {
          Segment::Text(value) => text.push_str(value),
          Segment::Emphasis(_) => {
            if !text.is_empty() {
              segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(value.clone());
          },
        }
        rest = &tail[close + 1..];
      },
      None => {
        text.push('[');
        rest = &tail[1..];
      },
    }
  }

  text.push_str(rest);
  if !text.is_empty() {
    segments.push(Segment::Text(text));
  }
  segments
}

fn escape_html(text: &str, out: &mut String) {
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
}
