//! Word inflection — singular/plural conversion with exception lists.
//!
//! Two static word lists steer the conversion: `uncountable` words pass
//! through untouched, and `irregular` pairs override the suffix rules in
//! both directions. The lists ship with sensible defaults and are loaded
//! from configuration in deployments that need their own vocabulary; after
//! construction they are immutable and queried by exact (case-folded) key.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// Configurable exception lists for the inflector.
///
/// The external representation is two tables: a flat list of uncountable
/// words and a singular → plural map of irregular pairs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WordLists {
    #[serde(default)]
    pub uncountable: Vec<String>,
    #[serde(default)]
    pub irregular: HashMap<String, String>,
}

impl WordLists {
    /// The built-in vocabulary.
    pub fn builtin() -> Self {
        let uncountable = [
            "access",
            "advice",
            "art",
            "baggage",
            "dances",
            "equipment",
            "fish",
            "fuel",
            "furniture",
            "food",
            "heat",
            "honey",
            "homework",
            "impatience",
            "information",
            "knowledge",
            "luggage",
            "money",
            "music",
            "news",
            "patience",
            "progress",
            "pollution",
            "research",
            "rice",
            "sand",
            "series",
            "sheep",
            "sms",
            "species",
            "staff",
            "toothpaste",
            "traffic",
            "understanding",
            "water",
            "weather",
            "work",
        ];
        let irregular = [
            ("child", "children"),
            ("clothes", "clothing"),
            ("man", "men"),
            ("movie", "movies"),
            ("person", "people"),
            ("woman", "women"),
            ("mouse", "mice"),
            ("goose", "geese"),
            ("ox", "oxen"),
            ("leaf", "leaves"),
            ("course", "courses"),
            ("size", "sizes"),
        ];

        Self {
            uncountable: uncountable.iter().map(|s| (*s).to_owned()).collect(),
            irregular: irregular
                .iter()
                .map(|(s, p)| ((*s).to_owned(), (*p).to_owned()))
                .collect(),
        }
    }
}

/// Converts words between singular and plural forms.
///
/// # Examples
///
/// ```
/// use courier::inflector::Inflector;
///
/// let inflector = Inflector::default();
/// assert_eq!(inflector.plural("berry"), "berries");
/// assert_eq!(inflector.singular("children"), "child");
/// assert_eq!(inflector.plural("fish"), "fish");
/// ```
#[derive(Debug, Clone)]
pub struct Inflector {
    uncountable: HashSet<String>,
    irregular: HashMap<String, String>,
    irregular_reverse: HashMap<String, String>,
}

impl Inflector {
    /// Builds an inflector over the given word lists.
    pub fn new(lists: WordLists) -> Self {
        let irregular_reverse = lists
            .irregular
            .iter()
            .map(|(singular, plural)| (plural.to_lowercase(), singular.to_lowercase()))
            .collect();

        Self {
            uncountable: lists
                .uncountable
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            irregular: lists
                .irregular
                .into_iter()
                .map(|(s, p)| (s.to_lowercase(), p.to_lowercase()))
                .collect(),
            irregular_reverse,
        }
    }

    /// `true` when the word has no distinct plural form.
    pub fn uncountable(&self, word: &str) -> bool {
        self.uncountable.contains(&word.to_lowercase())
    }

    /// The plural form of `word`.
    ///
    /// Irregular pairs and uncountable words win over the suffix rules:
    /// `s`/`x`/`z`/`ch`/`sh` endings take `es`, a consonant + `y` ending
    /// becomes `ies`, everything else takes `s`. A leading capital is
    /// preserved.
    pub fn plural(&self, word: &str) -> String {
        let lower = word.to_lowercase();

        if self.uncountable.contains(&lower) {
            return word.to_owned();
        }

        if let Some(plural) = self.irregular.get(&lower) {
            return match_case(word, plural);
        }

        let pluralized = if ["s", "x", "z"].iter().any(|s| lower.ends_with(s))
            || ["ch", "sh"].iter().any(|s| lower.ends_with(s))
        {
            format!("{lower}es")
        } else if ends_in_consonant_y(&lower) {
            format!("{}ies", &lower[..lower.len() - 1])
        } else {
            format!("{lower}s")
        };

        match_case(word, &pluralized)
    }

    /// The singular form of `word`; the inverse of [`plural`](Self::plural).
    pub fn singular(&self, word: &str) -> String {
        let lower = word.to_lowercase();

        if self.uncountable.contains(&lower) {
            return word.to_owned();
        }

        if let Some(singular) = self.irregular_reverse.get(&lower) {
            return match_case(word, singular);
        }

        let singularized = if lower.ends_with("ies") && lower.len() > 3 {
            format!("{}y", &lower[..lower.len() - 3])
        } else if ["ches", "shes", "sses", "xes", "zes"]
            .iter()
            .any(|s| lower.ends_with(s))
        {
            lower[..lower.len() - 2].to_owned()
        } else if lower.ends_with('s') && !lower.ends_with("ss") {
            lower[..lower.len() - 1].to_owned()
        } else {
            lower.clone()
        };

        match_case(word, &singularized)
    }

    /// Pluralizes only when `count` is not exactly one.
    pub fn pluralize(&self, word: &str, count: usize) -> String {
        if count == 1 {
            word.to_owned()
        } else {
            self.plural(word)
        }
    }
}

impl Default for Inflector {
    fn default() -> Self {
        Self::new(WordLists::builtin())
    }
}

// Carries a leading capital from the input over to the converted word.
fn match_case(original: &str, converted: &str) -> String {
    let capitalized = original
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase());

    if capitalized {
        let mut chars = converted.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    } else {
        converted.to_owned()
    }
}

fn ends_in_consonant_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    chars.next() == Some('y')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() && !"aeiou".contains(c))
}

/// `mother cat` → `motherCat`.
pub fn camelize(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut boundary = false;
    for (index, c) in phrase.chars().enumerate() {
        if c == ' ' || c == '_' {
            boundary = true;
        } else if boundary {
            out.extend(c.to_uppercase());
            boundary = false;
        } else if index == 0 {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `mother cat` → `mother_cat`.
pub fn underscore(phrase: &str) -> String {
    phrase.trim().replace(' ', "_")
}

/// `mother_cat` or `mother-cat` → `mother cat`.
pub fn humanize(word: &str) -> String {
    word.replace(['_', '-'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncountable_words_pass_through() {
        let inflector = Inflector::default();
        assert!(inflector.uncountable("fish"));
        assert_eq!(inflector.plural("fish"), "fish");
        assert_eq!(inflector.singular("money"), "money");
    }

    #[test]
    fn irregular_pairs_apply_both_ways() {
        let inflector = Inflector::default();
        assert_eq!(inflector.plural("child"), "children");
        assert_eq!(inflector.singular("children"), "child");
        assert_eq!(inflector.plural("person"), "people");
        assert_eq!(inflector.singular("people"), "person");
    }

    #[test]
    fn suffix_rules() {
        let inflector = Inflector::default();
        assert_eq!(inflector.plural("berry"), "berries");
        assert_eq!(inflector.singular("berries"), "berry");
        assert_eq!(inflector.plural("dish"), "dishes");
        assert_eq!(inflector.singular("dishes"), "dish");
        assert_eq!(inflector.plural("box"), "boxes");
        assert_eq!(inflector.singular("boxes"), "box");
        assert_eq!(inflector.plural("cat"), "cats");
        assert_eq!(inflector.singular("cats"), "cat");
    }

    #[test]
    fn vowel_y_takes_plain_s() {
        let inflector = Inflector::default();
        assert_eq!(inflector.plural("day"), "days");
        assert_eq!(inflector.singular("days"), "day");
    }

    #[test]
    fn pluralize_respects_count() {
        let inflector = Inflector::default();
        assert_eq!(inflector.pluralize("user", 1), "user");
        assert_eq!(inflector.pluralize("user", 0), "users");
        assert_eq!(inflector.pluralize("user", 3), "users");
    }

    #[test]
    fn leading_capital_is_preserved() {
        let inflector = Inflector::default();
        assert_eq!(inflector.plural("Child"), "Children");
        assert_eq!(inflector.singular("Berries"), "Berry");
    }

    #[test]
    fn custom_word_lists_override_builtin() {
        let lists = WordLists {
            uncountable: vec!["data".to_owned()],
            irregular: [("index".to_owned(), "indices".to_owned())].into(),
        };
        let inflector = Inflector::new(lists);
        assert_eq!(inflector.plural("data"), "data");
        assert_eq!(inflector.plural("index"), "indices");
        assert_eq!(inflector.singular("indices"), "index");
        // builtin pairs are not present on a custom vocabulary
        assert_eq!(inflector.singular("children"), "children");
    }

    #[test]
    fn word_lists_deserialize_from_toml() {
        let lists: WordLists = toml::from_str(
            r#"
            uncountable = ["sheep"]

            [irregular]
            goose = "geese"
            "#,
        )
        .unwrap();
        assert_eq!(lists.uncountable, vec!["sheep"]);
        assert_eq!(lists.irregular.get("goose").map(String::as_str), Some("geese"));
    }

    #[test]
    fn phrase_helpers() {
        assert_eq!(camelize("mother cat"), "motherCat");
        assert_eq!(underscore("mother cat"), "mother_cat");
        assert_eq!(humanize("mother_cat"), "mother cat");
        assert_eq!(humanize("mother-cat"), "mother cat");
    }
}
