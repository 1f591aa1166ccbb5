//! # Data Locations
//!
//! Typed paths into nested JSON values.
//!
//! A `DataLocation` is an ordered list of steps, each either an object key or
//! an array index. The string form follows the lodash convention used by form
//! controls: `children[0].title`. A purely numeric dotted segment (`children.0`)
//! is read as an index as well, so both spellings address the same node.

use crate::error::PathError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One step of a data location
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

impl PathStep {
    pub fn key(key: impl Into<String>) -> Self {
        PathStep::Key(key.into())
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Index(index) => Some(*index),
            PathStep::Key(_) => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(key) => Some(key),
            PathStep::Index(_) => None,
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "{}", key),
            PathStep::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Path to a node relative to some root value (empty = the root itself)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataLocation {
    steps: Vec<PathStep>,
}

impl DataLocation {
    /// The empty location (whole value)
    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Parse the lodash-style string form
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let mut steps = Vec::new();
        if input.is_empty() {
            return Ok(Self { steps });
        }

        for segment in input.split('.') {
            if segment.is_empty() {
                return Err(PathError::MalformedLocation(input.to_string()));
            }

            let (head, mut rest) = match segment.find('[') {
                Some(pos) => (&segment[..pos], &segment[pos..]),
                None => (segment, ""),
            };

            if !head.is_empty() {
                steps.push(parse_segment(head));
            }

            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| PathError::MalformedLocation(input.to_string()))?;
                if !rest.starts_with('[') {
                    return Err(PathError::MalformedLocation(input.to_string()));
                }
                let inner = rest[1..close].trim_matches(|c| c == '"' || c == '\'');
                if inner.is_empty() {
                    return Err(PathError::MalformedLocation(input.to_string()));
                }
                steps.push(parse_segment(inner));
                rest = &rest[close + 1..];
            }
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Final step, if any
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Location of the containing node (`None` for the root)
    pub fn parent(&self) -> Option<DataLocation> {
        if self.steps.is_empty() {
            return None;
        }
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    /// New location with one more step
    pub fn child(&self, step: PathStep) -> DataLocation {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    pub fn starts_with(&self, prefix: &DataLocation) -> bool {
        self.steps.starts_with(&prefix.steps)
    }

    /// Location relative to `base`, if `self` lies underneath it
    pub fn strip_prefix(&self, base: &DataLocation) -> Option<DataLocation> {
        if !self.starts_with(base) {
            return None;
        }
        Some(Self {
            steps: self.steps[base.steps.len()..].to_vec(),
        })
    }
}

fn parse_segment(segment: &str) -> PathStep {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = segment.parse::<usize>() {
            return PathStep::Index(index);
        }
    }
    PathStep::Key(segment.to_string())
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(key) if i > 0 => write!(f, ".{}", key)?,
                step => write!(f, "{}", step)?,
            }
        }
        Ok(())
    }
}

impl FromStr for DataLocation {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataLocation::parse(s)
    }
}

impl From<Vec<PathStep>> for DataLocation {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl Serialize for DataLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DataLocation::parse(&raw).map_err(serde::de::Error::custom)
    }
}
