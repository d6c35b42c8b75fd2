use std::fmt;

use thiserror::Error;

/// One step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node relative to the editor root. The empty path is the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value path: {message}")]
pub struct ValuePathParseError {
    message: String,
}

impl ValuePathParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    /// Number of segments; children of the root sit at depth 1.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn parent(&self) -> Option<ValuePath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self::new(self.segments[..self.segments.len() - 1].to_vec()))
    }

    pub fn child_key(&self, key: impl Into<String>) -> ValuePath {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self::new(segments)
    }

    pub fn child_index(&self, index: usize) -> ValuePath {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self::new(segments)
    }

    pub fn starts_with(&self, prefix: &ValuePath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == *prefix.segments
    }

    /// Moves a path living under `old_prefix` to `new_prefix`. Paths outside
    /// the prefix come back unchanged.
    pub fn rebase(&self, old_prefix: &ValuePath, new_prefix: &ValuePath) -> ValuePath {
        if !self.starts_with(old_prefix) {
            return self.clone();
        }
        let mut segments = new_prefix.segments.clone();
        segments.extend_from_slice(&self.segments[old_prefix.segments.len()..]);
        Self::new(segments)
    }

    /// Where this path points after element `removed` of the list at
    /// `container` is deleted. `None` when the path was inside the removed
    /// element; later siblings shift down by one.
    pub fn after_removal(&self, container: &ValuePath, removed: usize) -> Option<ValuePath> {
        if !self.starts_with(container) || self.segments.len() == container.segments.len() {
            return Some(self.clone());
        }
        let at = container.segments.len();
        match self.segments[at] {
            PathSegment::Index(index) if index == removed => None,
            PathSegment::Index(index) if index > removed => {
                let mut segments = self.segments.clone();
                segments[at] = PathSegment::Index(index - 1);
                Some(Self::new(segments))
            }
            _ => Some(self.clone()),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValuePathParseError> {
        parse_path(input)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => {
                    write!(f, "[\"{}\"]", key.replace('\\', "\\\\").replace('"', "\\\""))?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn parse_path(input: &str) -> Result<ValuePath, ValuePathParseError> {
    let chars: Vec<char> = input.trim().chars().collect();
    let mut idx = 0usize;
    let mut out = Vec::<PathSegment>::new();

    while idx < chars.len() {
        match chars[idx] {
            '.' => {
                if out.is_empty() {
                    return Err(ValuePathParseError::new("path cannot start with '.'"));
                }
                idx += 1;
                out.push(PathSegment::Key(parse_key(&chars, &mut idx)?));
            }
            '[' => out.push(parse_bracket_segment(&chars, &mut idx)?),
            _ if out.is_empty() => out.push(PathSegment::Key(parse_key(&chars, &mut idx)?)),
            ch => {
                return Err(ValuePathParseError::new(format!(
                    "unexpected character '{ch}' at position {idx}"
                )));
            }
        }
    }

    Ok(ValuePath::new(out))
}

fn parse_key(chars: &[char], idx: &mut usize) -> Result<String, ValuePathParseError> {
    let start = *idx;
    while *idx < chars.len() && !matches!(chars[*idx], '.' | '[' | ']') {
        *idx += 1;
    }
    if *idx == start {
        return Err(ValuePathParseError::new(format!(
            "expected key at position {start}"
        )));
    }
    Ok(chars[start..*idx].iter().collect())
}

fn parse_bracket_segment(
    chars: &[char],
    idx: &mut usize,
) -> Result<PathSegment, ValuePathParseError> {
    *idx += 1;
    let Some(&first) = chars.get(*idx) else {
        return Err(ValuePathParseError::new("unterminated '[' segment"));
    };

    if first == '"' || first == '\'' {
        *idx += 1;
        let mut key = String::new();
        let mut closed = false;
        while let Some(&c) = chars.get(*idx) {
            *idx += 1;
            if c == '\\' {
                let Some(&next) = chars.get(*idx) else {
                    return Err(ValuePathParseError::new("unterminated escape in quoted key"));
                };
                key.push(next);
                *idx += 1;
                continue;
            }
            if c == first {
                closed = true;
                break;
            }
            key.push(c);
        }
        if !closed {
            return Err(ValuePathParseError::new("unterminated quoted key"));
        }
        if chars.get(*idx) != Some(&']') {
            return Err(ValuePathParseError::new("expected closing ']'"));
        }
        *idx += 1;
        return Ok(PathSegment::Key(key));
    }

    let start = *idx;
    while *idx < chars.len() && chars[*idx] != ']' {
        *idx += 1;
    }
    if *idx >= chars.len() {
        return Err(ValuePathParseError::new("unterminated '[' segment"));
    }
    let raw: String = chars[start..*idx].iter().collect();
    *idx += 1;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValuePathParseError::new("empty bracket segment"));
    }
    Ok(match trimmed.parse::<usize>() {
        Ok(index) => PathSegment::Index(index),
        Err(_) => PathSegment::Key(trimmed.to_string()),
    })
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
