use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::error::Error;

static WORDS_DIR: Dir = include_dir!("src/words");

/// The selectable letter tokens shown on the setup screen, in alphabet order.
/// "CH" is a single token: Czech treats the digraph as its own letter.
pub const CZECH_ALPHABET: [&str; 42] = [
    "A", "Á", "B", "C", "Č", "D", "Ď", "E", "É", "Ě", "F", "G", "H", "CH", "I", "Í", "J", "K", "L",
    "M", "N", "Ň", "O", "Ó", "P", "Q", "R", "Ř", "S", "Š", "T", "Ť", "U", "Ú", "Ů", "V", "W", "X",
    "Y", "Ý", "Z", "Ž",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Noun,
    Adjective,
    Verb,
    Conjunction,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Noun,
        Category::Adjective,
        Category::Verb,
        Category::Conjunction,
    ];

    /// Czech label shown on the setup screen
    pub fn label(&self) -> &'static str {
        match self {
            Category::Noun => "Podstatná jména",
            Category::Adjective => "Přídavná jména",
            Category::Verb => "Slovesa",
            Category::Conjunction => "Spojky",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub category: Category,
}

#[derive(Deserialize, Clone, Debug)]
struct CatalogFile {
    name: String,
    nouns: Vec<String>,
    adjectives: Vec<String>,
    verbs: Vec<String>,
    conjunctions: Vec<String>,
}

/// The fixed word catalog, tagged by grammatical category.
///
/// Entries keep catalog order: nouns, adjectives, verbs, conjunctions,
/// each group in authored order.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub name: String,
    entries: Vec<WordEntry>,
}

impl Catalog {
    pub fn new(file_name: &str) -> Self {
        read_catalog_from_file(format!("{file_name}.json")).unwrap()
    }

    /// The built-in Czech catalog.
    pub fn czech() -> Self {
        Self::new("czech")
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_catalog_from_file(file_name: String) -> Result<Catalog, Box<dyn Error>> {
    let file = WORDS_DIR
        .get_file(file_name)
        .expect("Catalog file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let parsed: CatalogFile = from_str(file_as_str).expect("Unable to deserialize catalog json");

    let mut entries = Vec::new();
    for (words, category) in [
        (&parsed.nouns, Category::Noun),
        (&parsed.adjectives, Category::Adjective),
        (&parsed.verbs, Category::Verb),
        (&parsed.conjunctions, Category::Conjunction),
    ] {
        entries.extend(words.iter().map(|text| WordEntry {
            text: text.clone(),
            category,
        }));
    }

    Ok(Catalog {
        name: parsed.name,
        entries,
    })
}
