//! # Visual tags attached to array indices.
//!
//! Tags are purely observational: algorithms set and clear them so a renderer
//! can highlight bars, but no algorithm ever reads them back.

use std::fmt;

/// A single visual annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Index is part of the current comparison.
    Comparing,
    /// Index is the element currently being moved or tracked.
    Selected,
    /// Index holds the partition pivot.
    Pivot,
    /// Index holds its final value.
    Sorted,
}

impl Tag {
    /// All tags, in bit order.
    pub const ALL: [Tag; 4] = [Tag::Comparing, Tag::Selected, Tag::Pivot, Tag::Sorted];

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Tag::Comparing => 1 << 0,
            Tag::Selected => 1 << 1,
            Tag::Pivot => 1 << 2,
            Tag::Sorted => 1 << 3,
        }
    }

    /// Short lowercase name (CSS-class style).
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Comparing => "comparing",
            Tag::Selected => "selected",
            Tag::Pivot => "pivot",
            Tag::Sorted => "sorted",
        }
    }
}

/// Compact set of [`Tag`]s for one index.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u8);

impl TagSet {
    /// The empty set.
    pub const EMPTY: TagSet = TagSet(0);

    /// Adds a tag; returns `true` if the set changed.
    #[inline]
    pub fn insert(&mut self, tag: Tag) -> bool {
        let before = self.0;
        self.0 |= tag.bit();
        before != self.0
    }

    /// Removes a tag; returns `true` if the set changed.
    #[inline]
    pub fn remove(&mut self, tag: Tag) -> bool {
        let before = self.0;
        self.0 &= !tag.bit();
        before != self.0
    }

    #[inline]
    pub fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates contained tags in bit order.
    pub fn iter(self) -> impl Iterator<Item = Tag> {
        Tag::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        TagSet(tag.bit())
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::EMPTY;
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Tag::as_str)).finish()
    }
}
