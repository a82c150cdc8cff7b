// Profile extraction from scraped post engagement.
//
// Scrape actors disagree on field names and nesting, so records are read as
// loose JSON and probed by a fixed list of named strategies. A strategy that
// finds nothing contributes nothing; extraction never fails.

use std::collections::HashSet;

use serde_json::Value;

use crate::normalize::{is_member_profile, normalize_profile_url, profile_url_from_identifier};

/// Fields on a record that point straight at the post author.
const AUTHOR_FIELDS: &[&str] = &["authorProfileUrl", "author_profile_url", "authorUrl"];

/// Flat fields that hold a profile link, in priority order.
const URL_FIELDS: &[&str] = &[
    "profileUrl",
    "profile_url",
    "linkedinUrl",
    "linkedin_url",
    "linkedInUrl",
    "profileLink",
    "publicProfileUrl",
    "authorProfileUrl",
];

/// Sub-objects that may describe the engaging person.
const NESTED_OBJECTS: &[&str] = &[
    "actor", "user", "profile", "reactor", "author", "member", "commenter",
];

/// Identifier fields synthesized into a profile URL inside a nested object.
const NESTED_ID_FIELDS: &[&str] = &["publicId", "publicIdentifier", "vanityName"];

/// Identifier fields synthesized directly on an element.
const ELEMENT_ID_FIELDS: &[&str] = &["publicId", "publicIdentifier"];

const REACTION_KEYS: &[&str] = &["reactions", "likers", "likes"];
const COMMENT_KEYS: &[&str] = &["comments", "commenters"];
const ENGAGEMENT_KEYS: &[&str] = &["engagements"];

/// One way of finding engagers in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A direct author profile field on the record.
    AuthorField,
    /// Reactions/likers/likes collection; flat and nested lookups.
    Reactions,
    /// Comments/commenters collection; as reactions plus the comment author.
    Comments,
    /// Generic engagements collection; flat lookups only.
    Engagements,
    /// The record itself is one engager row (one dataset item per reactor).
    /// Skipped for post records; only member profile links count.
    EngagerRow,
}

/// Strategies in the order they are applied to every record.
pub const STRATEGIES: &[Strategy] = &[
    Strategy::AuthorField,
    Strategy::Reactions,
    Strategy::Comments,
    Strategy::Engagements,
    Strategy::EngagerRow,
];

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::AuthorField => "author_field",
            Strategy::Reactions => "reactions",
            Strategy::Comments => "comments",
            Strategy::Engagements => "engagements",
            Strategy::EngagerRow => "engager_row",
        }
    }

    /// Add every profile this strategy finds in `record` to `out`.
    pub fn apply(self, record: &Value, out: &mut ProfileSet) {
        match self {
            Strategy::AuthorField => {
                if let Some(url) = first_url_field(record, AUTHOR_FIELDS) {
                    out.insert(&url);
                }
            }
            Strategy::Reactions => {
                for element in collection(record, REACTION_KEYS) {
                    if let Some(url) = element_profile(element, true) {
                        out.insert(&url);
                    }
                }
            }
            Strategy::Comments => {
                for element in collection(record, COMMENT_KEYS) {
                    if let Some(url) = element_profile(element, true) {
                        out.insert(&url);
                    }
                    if let Some(url) = element.get("author").and_then(comment_author_profile) {
                        out.insert(&url);
                    }
                }
            }
            Strategy::Engagements => {
                for element in collection(record, ENGAGEMENT_KEYS) {
                    if let Some(url) = element_profile(element, false) {
                        out.insert(&url);
                    }
                }
            }
            Strategy::EngagerRow => {
                if is_post_record(record) {
                    return;
                }
                if let Some(url) = engager_row_profile(record) {
                    out.insert(&url);
                }
            }
        }
    }
}

/// Insertion-ordered set of canonical profile URLs.
#[derive(Debug, Default, Clone)]
pub struct ProfileSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert. Returns true if the profile was new.
    pub fn insert(&mut self, raw: &str) -> bool {
        let Some(canonical) = normalize_profile_url(raw) else {
            return false;
        };
        if self.seen.insert(canonical.clone()) {
            self.ordered.push(canonical);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Extract deduplicated canonical profile URLs, in first-seen order.
pub fn extract_profile_urls(records: &[Value]) -> Vec<String> {
    let mut profiles = ProfileSet::new();
    for record in records {
        for strategy in STRATEGIES {
            let before = profiles.len();
            strategy.apply(record, &mut profiles);
            let added = profiles.len() - before;
            if added > 0 {
                tracing::trace!(strategy = strategy.name(), added, "Profiles extracted");
            }
        }
    }
    profiles.into_vec()
}

/// Elements of the first array found under any of `keys`.
fn collection<'a>(record: &'a Value, keys: &[&str]) -> impl Iterator<Item = &'a Value> {
    keys.iter()
        .find_map(|k| record.get(*k).and_then(Value::as_array))
        .into_iter()
        .flatten()
}

/// First string field among `fields` that normalizes to a LinkedIn URL.
fn first_url_field(obj: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| obj.get(*f).and_then(Value::as_str))
        .find_map(normalize_profile_url)
}

fn first_identifier(obj: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| obj.get(*f).and_then(Value::as_str))
        .find_map(profile_url_from_identifier)
}

/// Profile for one collection element. Flat fields first, then identifiers on
/// the element, then (if `nested`) each recognized sub-object.
fn element_profile(element: &Value, nested: bool) -> Option<String> {
    if let Some(raw) = element.as_str() {
        return normalize_profile_url(raw);
    }
    if !element.is_object() {
        return None;
    }

    first_url_field(element, URL_FIELDS)
        .or_else(|| first_identifier(element, ELEMENT_ID_FIELDS))
        .or_else(|| {
            if !nested {
                return None;
            }
            NESTED_OBJECTS
                .iter()
                .filter_map(|name| element.get(*name).filter(|v| v.is_object()))
                .find_map(|obj| {
                    first_url_field(obj, URL_FIELDS)
                        .or_else(|| first_identifier(obj, NESTED_ID_FIELDS))
                })
        })
}

/// A record carrying any post-level key describes the post, not one engager.
fn is_post_record(record: &Value) -> bool {
    [AUTHOR_FIELDS, REACTION_KEYS, COMMENT_KEYS, ENGAGEMENT_KEYS]
        .iter()
        .flat_map(|keys| keys.iter())
        .any(|key| record.get(*key).is_some())
}

/// Member profile for a flattened engager row. Post, company and feed links
/// sitting in the same fields are passed over.
fn engager_row_profile(record: &Value) -> Option<String> {
    if !record.is_object() {
        return None;
    }
    let nested: Vec<&Value> = NESTED_OBJECTS
        .iter()
        .filter_map(|name| record.get(*name).filter(|v| v.is_object()))
        .collect();

    std::iter::once(record)
        .chain(nested.iter().copied())
        .flat_map(|obj| {
            URL_FIELDS
                .iter()
                .filter_map(move |f| obj.get(*f).and_then(Value::as_str))
        })
        .filter_map(normalize_profile_url)
        .find(|url| is_member_profile(url))
        .or_else(|| first_identifier(record, ELEMENT_ID_FIELDS))
        .or_else(|| nested.iter().find_map(|obj| first_identifier(obj, NESTED_ID_FIELDS)))
}

/// A comment's `author` object. Unlike other sub-objects it may carry the
/// profile under a bare `url` key.
fn comment_author_profile(author: &Value) -> Option<String> {
    if !author.is_object() {
        return None;
    }
    first_url_field(author, URL_FIELDS)
        .or_else(|| first_url_field(author, &["url"]))
        .or_else(|| first_identifier(author, NESTED_ID_FIELDS))
}
