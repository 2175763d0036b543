//! Keyword normalization for matching Search Console queries.
//!
//! Matching is case-insensitive and accent-insensitive: both sides are
//! lowercased, Latin diacritics are folded to ASCII, punctuation becomes a
//! space and whitespace is collapsed. A stored keyword matches a query when
//! the normalized query contains the normalized keyword.

/// Normalize text for keyword matching.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match fold_char(c) {
            Some(replacement) => folded.push_str(replacement),
            None if is_combining_mark(c) => {}
            None if c.is_alphanumeric() => folded.push(c),
            None => folded.push(' '),
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a stored keyword matches an incoming query.
///
/// An empty keyword matches nothing.
pub fn matches(keyword: &str, query: &str) -> bool {
    NormalizedKeyword::new(keyword).matches(query)
}

/// A keyword normalized once, for matching against many queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKeyword(String);

impl NormalizedKeyword {
    pub fn new(keyword: &str) -> Self {
        Self(normalize(keyword))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, query: &str) -> bool {
        self.matches_normalized(&normalize(query))
    }

    /// Match against a query that is already normalized.
    pub fn matches_normalized(&self, normalized_query: &str) -> bool {
        !self.0.is_empty() && normalized_query.contains(self.0.as_str())
    }
}

/// Combining diacritical marks, as sent by decomposed (NFD) input.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}
