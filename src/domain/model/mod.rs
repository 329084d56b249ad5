// Domain models - Core types and data structures

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};


/// Strip the leading dash marker(s) from an engine flag
pub fn strip_flag(flag: &str) -> &str {
    flag.trim_start_matches('-')
}

/// Ordered mapping from engine flag (without dashes) to its value.
///
/// A `None` value means the flag is passed on its own (e.g. `-vn`).
/// Re-inserting an existing flag replaces its value but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: Vec<(String, Option<String>)>,
}

impl FlagMap {
    /// Create an empty flag map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a flag
    pub fn insert(&mut self, flag: impl Into<String>, value: Option<String>) {
        let flag = flag.into();
        let flag = strip_flag(&flag).to_string();
        match self.entries.iter_mut().find(|(key, _)| *key == flag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((flag, value)),
        }
    }

    /// Insert a flag that carries a value
    pub fn set(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.insert(flag, Some(value.into()));
    }

    /// Insert a value-less flag
    pub fn set_bare(&mut self, flag: impl Into<String>) {
        self.insert(flag, None);
    }

    /// Value of a flag; `Some(None)` for a present value-less flag
    pub fn get(&self, flag: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(key, _)| key == strip_flag(flag))
            .map(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.get(flag).is_some()
    }

    /// Remove a flag, returning its value if it was present
    pub fn remove(&mut self, flag: &str) -> Option<Option<String>> {
        let position = self
            .entries
            .iter()
            .position(|(key, _)| key == strip_flag(flag))?;
        Some(self.entries.remove(position).1)
    }

    /// Merge `other` on top of `self`; `other` wins on conflicts
    pub fn merge(&mut self, other: FlagMap) {
        for (flag, value) in other.entries {
            self.insert(flag, value);
        }
    }

    /// Builder-style merge
    pub fn merged(mut self, other: FlagMap) -> Self {
        self.merge(other);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(flag, value)| (flag.as_str(), value.as_deref()))
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(flag, _)| flag.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut map = FlagMap::new();
        for (flag, value) in iter {
            map.insert(flag, value);
        }
        map
    }
}

impl IntoIterator for FlagMap {
    type Item = (String, Option<String>);
    type IntoIter = std::vec::IntoIter<(String, Option<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for FlagMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            match value {
                Some(value) => write!(f, "-{} {}", flag, value)?,
                None => write!(f, "-{}", flag)?,
            }
        }
        Ok(())
    }
}

/// Deserializes from a table of `flag = "value"` or `flag = true` (value-less),
/// keeping the document order.
impl<'de> Deserialize<'de> for FlagMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagMapVisitor;

        impl<'de> Visitor<'de> for FlagMapVisitor {
            type Value = FlagMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of engine flags to string values or `true`")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FlagMap, A::Error> {
                let mut map = FlagMap::new();
                while let Some((flag, value)) = access.next_entry::<String, FlagValue>()? {
                    match value {
                        FlagValue::Text(text) => map.set(flag, text),
                        FlagValue::Bare(true) => map.set_bare(flag),
                        FlagValue::Bare(false) => {}
                    }
                }
                Ok(map)
            }
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FlagValue {
            Text(String),
            Bare(bool),
        }

        deserializer.deserialize_map(FlagMapVisitor)
    }
}

/// One selectable answer of a choice question
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Choice {
    /// Text shown to the user
    pub label: String,
    /// Value passed to the engine
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Kind of interview question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Pick one of a fixed list, a custom value, or remove the flag
    Choice(Vec<Choice>),
    /// Free-form value typed by the user
    FreeInput,
}

/// A single configurable setting of the interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub kind: QuestionKind,
    pub title: String,
    /// Engine flag without leading dashes
    pub flag: String,
    /// 1-based default selection; `N+1` is "custom value", `N+2` is "remove option"
    pub default_index: usize,
}

impl Question {
    /// Create a choice question
    pub fn choice(
        title: impl Into<String>,
        flag: &str,
        default_index: usize,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            kind: QuestionKind::Choice(choices),
            title: title.into(),
            flag: strip_flag(flag).to_string(),
            default_index,
        }
    }

    /// Create a free input question
    pub fn free_input(title: impl Into<String>, flag: &str) -> Self {
        Self {
            kind: QuestionKind::FreeInput,
            title: title.into(),
            flag: strip_flag(flag).to_string(),
            default_index: 0,
        }
    }

    /// Choices of a choice question, empty for free input
    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            QuestionKind::Choice(choices) => choices,
            QuestionKind::FreeInput => &[],
        }
    }

    /// Slot number of the "custom value" entry
    pub fn custom_slot(&self) -> usize {
        self.choices().len() + 1
    }

    /// Slot number of the "remove option" entry
    pub fn remove_slot(&self) -> usize {
        self.choices().len() + 2
    }

    /// Resolve a 1-based slot to the answer it stands for
    pub fn resolve(&self, slot: usize) -> Option<Selection<'_>> {
        let choices = self.choices();
        match slot {
            0 => None,
            s if s <= choices.len() => Some(Selection::Choice(&choices[s - 1])),
            s if s == self.custom_slot() => Some(Selection::Custom),
            s if s == self.remove_slot() => Some(Selection::Remove),
            _ => None,
        }
    }
}

/// What a selected slot of a choice question means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    Choice(&'a Choice),
    Custom,
    Remove,
}

/// Raw catalogue entry as written in a config file
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub option: String,
    #[serde(default)]
    pub default: usize,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// Interview domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Video,
    Audio,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Video => write!(f, "video"),
            Domain::Audio => write!(f, "audio"),
        }
    }
}

/// Which domains the conversion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeTarget {
    AudioOnly,
    VideoOnly,
    Both,
}

impl EncodeTarget {
    /// Options presented to the user, in slot order
    pub const LABELS: [&'static str; 3] = ["Audio only", "Video only", "Video and audio"];

    /// Slot selected when the user just presses enter
    pub const DEFAULT_SLOT: usize = 3;

    /// Map a 1-based slot to a target
    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            1 => Some(EncodeTarget::AudioOnly),
            2 => Some(EncodeTarget::VideoOnly),
            3 => Some(EncodeTarget::Both),
            _ => None,
        }
    }

    /// Domains interviewed for this target, in interview order
    pub fn domains(&self) -> &'static [Domain] {
        match self {
            EncodeTarget::AudioOnly => &[Domain::Audio],
            EncodeTarget::VideoOnly => &[Domain::Video],
            EncodeTarget::Both => &[Domain::Video, Domain::Audio],
        }
    }
}

/// How the options are gathered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewMode {
    Interactive,
    Defaults,
}
