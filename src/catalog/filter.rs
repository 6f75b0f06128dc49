use super::core::{Catalog, Category};
use std::collections::HashSet;

impl Catalog {
    /// Words a child can read with the given letters, restricted to the given
    /// categories, in catalog order. Empty letter or category sets simply
    /// produce an empty list.
    pub fn available_words(
        &self,
        allowed_letters: &HashSet<String>,
        allowed_categories: &HashSet<Category>,
    ) -> Vec<String> {
        self.entries()
            .iter()
            .filter(|entry| allowed_categories.contains(&entry.category))
            .filter(|entry| letters_cover(&entry.text, allowed_letters))
            .map(|entry| entry.text.clone())
            .collect()
    }
}

/// Every position of the uppercase word must be covered by an allowed token.
/// A "CH" pair is one unit and is only covered by the "CH" token itself;
/// selecting "C" and "H" separately does not cover it, and selecting "CH"
/// does not cover a lone "C" or "H" elsewhere.
pub fn letters_cover(word: &str, allowed_letters: &HashSet<String>) -> bool {
    let upper: Vec<char> = word.to_uppercase().chars().collect();
    let mut i = 0;

    while i < upper.len() {
        if upper[i] == 'C' && upper.get(i + 1) == Some(&'H') {
            if !allowed_letters.contains("CH") {
                return false;
            }
            i += 2;
            continue;
        }

        if !allowed_letters.contains(upper[i].to_string().as_str()) {
            return false;
        }
        i += 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn categories(cats: &[Category]) -> HashSet<Category> {
        cats.iter().copied().collect()
    }

    #[test]
    fn test_letters_cover_simple_word() {
        assert!(letters_cover("Máma", &letters(&["M", "Á", "A"])));
        assert!(!letters_cover("Máma", &letters(&["M", "A"])));
    }

    #[test]
    fn test_letters_cover_digraph_as_unit() {
        // "CH" token covers the pair
        assert!(letters_cover("CH", &letters(&["CH"])));
        // separate C and H do not reconstruct the digraph
        assert!(!letters_cover("CH", &letters(&["C", "H"])));
    }

    #[test]
    fn test_letters_cover_chata() {
        assert!(letters_cover("Chata", &letters(&["CH", "A", "T"])));
        assert!(!letters_cover("Chata", &letters(&["A", "T"])));
        assert!(!letters_cover("Chata", &letters(&["C", "H", "A", "T"])));
    }

    #[test]
    fn test_letters_cover_lone_c_needs_c() {
        // "Cibule": C not followed by H, so plain C must be allowed
        assert!(letters_cover(
            "Cibule",
            &letters(&["C", "I", "B", "U", "L", "E"])
        ));
        assert!(!letters_cover(
            "Cibule",
            &letters(&["CH", "I", "B", "U", "L", "E"])
        ));
    }

    #[test]
    fn test_letters_cover_trailing_c() {
        // A word-final C has no following H and counts as bare C
        assert!(letters_cover("Nic", &letters(&["N", "I", "C"])));
    }

    #[test]
    fn test_letters_cover_empty_set() {
        assert!(!letters_cover("A", &HashSet::new()));
    }

    #[test]
    fn test_available_words_category_and_letters_independent() {
        let catalog = Catalog::czech();
        let all_letters: HashSet<String> =
            crate::catalog::core::CZECH_ALPHABET.iter().map(|t| t.to_string()).collect();

        // All categories, all letters: the whole catalog
        let everything =
            catalog.available_words(&all_letters, &categories(&Category::ALL));
        assert_eq!(everything.len(), catalog.len());

        // Restricting categories keeps the letter filter untouched
        let conjunctions_only = catalog.available_words(
            &all_letters,
            &categories(&[Category::Conjunction]),
        );
        assert!(conjunctions_only.contains(&"Ale".to_string()));
        assert!(!conjunctions_only.contains(&"Máma".to_string()));
    }

    #[test]
    fn test_available_words_empty_sets() {
        let catalog = Catalog::czech();
        let all_letters: HashSet<String> =
            crate::catalog::core::CZECH_ALPHABET.iter().map(|t| t.to_string()).collect();

        assert!(catalog
            .available_words(&HashSet::new(), &categories(&Category::ALL))
            .is_empty());
        assert!(catalog
            .available_words(&all_letters, &HashSet::new())
            .is_empty());
    }

    #[test]
    fn test_available_words_catalog_order() {
        let catalog = Catalog::czech();
        let all_letters: HashSet<String> =
            crate::catalog::core::CZECH_ALPHABET.iter().map(|t| t.to_string()).collect();

        let words = catalog.available_words(&all_letters, &categories(&Category::ALL));
        let full: Vec<String> = catalog.entries().iter().map(|e| e.text.clone()).collect();
        assert_eq!(words, full);
    }

    #[test]
    fn test_available_words_starter_letters() {
        let catalog = Catalog::czech();
        let starter = letters(&[
            "A", "Á", "E", "É", "I", "Í", "J", "L", "M", "O", "Ó", "P", "S", "T", "U", "Ú", "Ů",
        ]);

        let words = catalog.available_words(&starter, &categories(&Category::ALL));
        assert!(words.contains(&"Máma".to_string()));
        assert!(words.contains(&"Pes".to_string()));
        assert!(!words.contains(&"Kniha".to_string()));
    }
}
