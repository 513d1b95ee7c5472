/// Case-insensitive substring filter over post text. Keywords are lowercased
/// once at construction; matching lowercases the candidate text.
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new(raw: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: raw.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k))
    }
}
