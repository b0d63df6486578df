//! Line classifier for the queue documents.
//!
//! Both queue formats share one shape: level-1/2 headings split the document
//! into sections and only the `In Progress` and `Up Next` sections are read.
//! Inside those sections every line is classified on its own; lines that are
//! not item lines are ignored rather than rejected, so hand-edited notes,
//! blank lines and sub-headings never break parsing.

use tracing::debug;

use super::{ItemStatus, WorkItem};

const IN_PROGRESS: &str = "In Progress";
const UP_NEXT: &str = "Up Next";
const SEPARATORS: [char; 4] = ['-', '–', '—', ':'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  /// `- **slug** - description`
  Primary,
  /// `- [ ] **slug** - description` or `- [ ] slug: description`
  Legacy,
}

#[derive(Debug, PartialEq)]
enum Line<'a> {
  Heading { level: usize, text: &'a str },
  Item(ItemLine<'a>),
  Other,
}

#[derive(Debug, PartialEq)]
struct ItemLine<'a> {
  slug: &'a str,
  description: &'a str,
  checked: bool,
}

pub fn parse_queue(document: &str) -> Vec<WorkItem> {
  parse(document, Format::Primary)
}

pub fn parse_legacy_queue(document: &str) -> Vec<WorkItem> {
  parse(document, Format::Legacy)
}

fn parse(document: &str, format: Format) -> Vec<WorkItem> {
  let mut in_progress = Vec::new();
  let mut up_next = Vec::new();
  let mut seen_in_progress = false;
  let mut seen_up_next = false;
  let mut section: Option<ItemStatus> = None;

  for raw in document.lines() {
    match classify(raw, format) {
      Line::Heading { level, text } if level <= 2 => {
        section = if text == IN_PROGRESS && !seen_in_progress {
          seen_in_progress = true;
          Some(ItemStatus::InProgress)
        } else if text == UP_NEXT && !seen_up_next {
          seen_up_next = true;
          Some(ItemStatus::UpNext)
        } else {
          None
        };
      }
      Line::Item(item) => {
        // Checked legacy entries are finished work.
        if item.checked {
          continue;
        }
        let Some(status) = section else {
          continue;
        };
        let target = match status {
          ItemStatus::InProgress => &mut in_progress,
          ItemStatus::UpNext => &mut up_next,
        };
        target.push(WorkItem {
          slug: item.slug.to_string(),
          status,
          description: item.description.to_string(),
        });
      }
      Line::Heading { .. } | Line::Other => {}
    }
  }

  if !document.trim().is_empty() && !seen_in_progress && !seen_up_next {
    debug!("queue document ({format:?}) has no In Progress or Up Next heading");
  }

  in_progress.extend(up_next);
  in_progress
}

fn classify(raw: &str, format: Format) -> Line<'_> {
  let line = raw.trim();

  if let Some(heading) = heading(line) {
    return heading;
  }

  let Some(rest) = strip_bullet(line) else {
    return Line::Other;
  };

  let item = match format {
    Format::Primary => bold_item(rest, false),
    Format::Legacy => legacy_item(rest),
  };

  item.map(Line::Item).unwrap_or(Line::Other)
}

fn heading(line: &str) -> Option<Line<'_>> {
  let level = line.chars().take_while(|c| *c == '#').count();
  if level == 0 {
    return None;
  }
  let rest = &line[level..];
  if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
    return None;
  }
  Some(Line::Heading {
    level,
    text: rest.trim(),
  })
}

fn strip_bullet(line: &str) -> Option<&str> {
  let mut chars = line.chars();
  let bullet = chars.next()?;
  if !matches!(bullet, '-' | '*' | '+') {
    return None;
  }
  let rest = chars.as_str();
  if !rest.starts_with(char::is_whitespace) {
    return None;
  }
  Some(rest.trim_start())
}

fn bold_item(rest: &str, checked: bool) -> Option<ItemLine<'_>> {
  let inner = rest.strip_prefix("**")?;
  let end = inner.find("**")?;
  let slug = inner[..end].trim();
  if slug.is_empty() {
    return None;
  }
  Some(ItemLine {
    slug,
    description: description(&inner[end + 2..]),
    checked,
  })
}

fn legacy_item(rest: &str) -> Option<ItemLine<'_>> {
  let (checked, rest) = if let Some(r) = rest.strip_prefix("[ ]") {
    (false, r)
  } else if let Some(r) = rest.strip_prefix("[x]").or_else(|| rest.strip_prefix("[X]")) {
    (true, r)
  } else {
    return None;
  };
  let rest = rest.trim_start();

  if rest.starts_with("**") {
    return bold_item(rest, checked);
  }

  let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
  let slug = rest[..token_end].trim_end_matches(':');
  if slug.is_empty() {
    return None;
  }
  Some(ItemLine {
    slug,
    description: description(&rest[token_end..]),
    checked,
  })
}

fn description(rest: &str) -> &str {
  let rest = rest.trim_start();
  rest
    .strip_prefix(SEPARATORS)
    .unwrap_or(rest)
    .trim()
}
