//! Stopword sets and a light suffix stemmer per language.
//!
//! Both exist to sharpen the lexical-overlap signal feeding the sentence
//! graph: stopwords would otherwise dominate term-frequency vectors, and
//! stemming lets inflected forms of the same word count as overlap. The
//! stemmer is deliberately shallow suffix stripping, not a full Porter
//! implementation; ranking only needs stable, consistent token classes.

use crate::types::Language;

const EN_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "had", "has",
    "have", "he", "her", "his", "i", "in", "is", "it", "its", "of", "on", "or", "she", "that",
    "the", "their", "them", "they", "this", "to", "was", "we", "were", "which", "will", "with",
    "you",
];

const ES_STOPWORDS: &[&str] = &[
    "a", "al", "como", "con", "de", "del", "el", "ella", "en", "es", "esta", "este", "ha", "la",
    "las", "lo", "los", "mas", "no", "o", "para", "pero", "por", "que", "se", "son", "su", "sus",
    "un", "una", "y",
];

const FR_STOPWORDS: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "est", "et", "il",
    "la", "le", "les", "mais", "ne", "ou", "par", "pas", "pour", "que", "qui", "se", "son", "sont",
    "sur", "un", "une",
];

const DE_STOPWORDS: &[&str] = &[
    "als", "auch", "auf", "aus", "bei", "das", "dem", "den", "der", "die", "ein", "eine", "er",
    "es", "für", "hat", "ich", "im", "in", "ist", "mit", "nicht", "sich", "sie", "sind", "und",
    "von", "war", "wie", "zu",
];

const IT_STOPWORDS: &[&str] = &[
    "a", "al", "che", "chi", "con", "da", "dei", "del", "della", "di", "e", "gli", "ha", "i",
    "il", "in", "la", "le", "lo", "ma", "non", "per", "più", "si", "sono", "su", "un", "una",
];

const PT_STOPWORDS: &[&str] = &[
    "a", "ao", "as", "com", "da", "das", "de", "do", "dos", "e", "em", "es", "foi", "mais",
    "não", "no", "nos", "o", "os", "ou", "para", "pela", "pelo", "por", "que", "se", "são",
    "um", "uma",
];

const RU_STOPWORDS: &[&str] = &[
    "а", "без", "бы", "был", "в", "во", "все", "для", "его", "ее", "же", "за", "и", "из", "к",
    "как", "мы", "на", "не", "но", "о", "он", "она", "они", "от", "по", "с", "так", "то", "у",
    "что", "это",
];

/// Whether `word` (already lowercased) is a stopword for `lang`.
///
/// Unmapped languages (auto and the CJK set, which carry little
/// inflection) use the English list, matching the generic-splitter
/// fallback behavior.
pub fn is_stopword(lang: Language, word: &str) -> bool {
    stopwords(lang).contains(&word)
}

fn stopwords(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Es => ES_STOPWORDS,
        Language::Fr => FR_STOPWORDS,
        Language::De => DE_STOPWORDS,
        Language::It => IT_STOPWORDS,
        Language::Pt => PT_STOPWORDS,
        Language::Ru => RU_STOPWORDS,
        Language::Auto | Language::En | Language::Zh | Language::Ja | Language::Ko => EN_STOPWORDS,
    }
}

/// Light suffix stemmer. Strips one layer of common inflectional endings
/// for the European languages; CJK tokens pass through untouched.
pub fn stem(lang: Language, word: &str) -> String {
    let word = word.to_lowercase();
    let suffixes: &[&str] = match lang {
        Language::Auto | Language::En => &[
            "ations", "ation", "ness", "ments", "ment", "ings", "ing", "ies", "edly", "ed",
            "ly", "es", "s",
        ],
        Language::Es => &["aciones", "ación", "mente", "idad", "aron", "ando", "iendo", "es", "s"],
        Language::Fr => &["ations", "ation", "ement", "euses", "euse", "eux", "ées", "ée", "er", "es", "s"],
        Language::De => &["ungen", "ung", "heit", "keit", "lich", "isch", "en", "er", "es", "e"],
        Language::It => &["azioni", "azione", "mente", "ando", "endo", "are", "ere", "ire", "i", "e"],
        Language::Pt => &["ações", "ação", "mente", "ando", "endo", "indo", "es", "s"],
        Language::Ru => &["ости", "ость", "ами", "ями", "ого", "его", "ть", "ет", "ов", "ах", "ы", "и", "а", "я"],
        Language::Zh | Language::Ja | Language::Ko => return word,
    };

    for suffix in suffixes {
        if let Some(stemmed) = word.strip_suffix(suffix) {
            // Keep a meaningful stem; over-stripping hurts more than
            // under-stripping here.
            if stemmed.chars().count() >= 3 {
                return stemmed.to_string();
            }
        }
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_stopwords_match() {
        assert!(is_stopword(Language::En, "the"));
        assert!(is_stopword(Language::En, "with"));
        assert!(!is_stopword(Language::En, "summarization"));
    }

    #[test]
    fn unmapped_languages_use_english_list() {
        assert!(is_stopword(Language::Auto, "and"));
        assert!(is_stopword(Language::Zh, "the"));
    }

    #[test]
    fn english_stemming_collapses_inflections() {
        assert_eq!(stem(Language::En, "running"), stem(Language::En, "runnings"));
        assert_eq!(stem(Language::En, "jumped"), "jump");
        assert_eq!(stem(Language::En, "summaries"), "summar");
    }

    #[test]
    fn short_words_survive_stemming() {
        // "es" would strip to nothing; the guard keeps the original.
        assert_eq!(stem(Language::En, "yes"), "yes");
    }

    #[test]
    fn cjk_passes_through() {
        assert_eq!(stem(Language::Ja, "要約"), "要約");
    }
}
