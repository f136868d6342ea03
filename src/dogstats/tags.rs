/// An ordered set of tags.
///
/// Insertion order is preserved and a tag that is already present is silently
/// skipped, so no two equal strings ever coexist in the set.
///
/// Tags are stored exactly as given. The `|` field separator is stripped when
/// a packet is encoded, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Creates an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Appends `tag` unless it is already present and returns the resulting tags.
    pub fn add(&mut self, tag: impl AsRef<str>) -> &[String] {
        self.insert(tag.as_ref());
        &self.tags
    }

    /// Appends every tag of `tags` in order, skipping the ones already present,
    /// including duplicates inside `tags` itself. Returns the resulting tags.
    pub fn add_all<I>(&mut self, tags: I) -> &[String]
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for tag in tags {
            self.insert(tag.as_ref());
        }
        &self.tags
    }

    /// Returns `true` if `tag` is in the set.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of tags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    /// Iterates the tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tags.iter()
    }

    fn insert(&mut self, tag: &str) {
        if !self.contains(tag) {
            self.tags.push(tag.to_owned());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for TagSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// Merges instance tags with call-site tags for a single packet.
///
/// The result holds every instance tag, in stored order, followed by each call
/// tag that is not already present. Call tags are de-duplicated against each
/// other as well. The instance set is left untouched.
pub fn merge_tags<'a, T>(instance: &'a TagSet, call: &'a [T]) -> Vec<&'a str>
where
    T: AsRef<str>,
{
    let mut merged: Vec<&str> = Vec::with_capacity(instance.len() + call.len());
    merged.extend(instance.iter().map(String::as_str));

    for tag in call {
        let tag = tag.as_ref();
        if !merged.contains(&tag) {
            merged.push(tag);
        }
    }
    merged
}
