use rand::seq::SliceRandom;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::persistence::JsonDocument;

pub const PHRASES_FILE: &str = "duaas.json";

/// Seed list written on first run.
pub const DEFAULT_PHRASES: [&str; 10] = [
    "اللَّهُمَّ إِنِّي أَسْأَلُكَ الْهُدَى، وَالتُّقَى، وَالْعَفَافَ، وَالْغِنَى",
    "رَبِّ اغْفِرْ لِي خَطِيئَتِي وَجَهْلِي، وَإِسْرَافِي فِي أَمْرِي كُلِّهِ، وَمَا أَنْتَ أَعْلَمُ بِهِ مِنِّي",
    "اللَّهُمَّ اغْفِرْ لِي ذَنْبِي كُلَّهُ، دِقَّهُ وَجِلَّهُ، وَأَوَّلَهُ وَآخِرَهُ، وَعَلَانِيَتَهُ وَسِرَّهُ",
    "اللَّهُمَّ إِنِّي أَعُوذُ بِكَ مِنْ شَرِّ مَا عَمِلْتُ، وَمِنْ شَرِّ مَا لَمْ أَعْمَلْ",
    "اللَّهُمَّ إِنِّي أَعُوذُ بِكَ مِنَ الْهَمِّ وَالْحَزَنِ، وَالْعَجْزِ وَالْكَسَلِ، وَالْجُبْنِ وَالْبُخْلِ، وَضَلَعِ الدَّيْنِ وَغَلَبَةِ الرِّجَالِ",
    "اللَّهُمَّ إِنِّي أَسْأَلُكَ الْجَنَّةَ وَأَعُوذُ بِكَ مِنَ النَّارِ",
    "اللَّهُمَّ أَصْلِحْ لِي دِينِي الَّذِي هُوَ عِصْمَةُ أَمْرِي، وَأَصْلِحْ لِي دُنْيَايَ الَّتِي فِيهَا مَعَاشِي",
    "اللَّهُمَّ إِنِّي أَعُوذُ بِكَ مِنْ زَوَالِ نِعْمَتِكَ، وَتَحَوُّلِ عَافِيَتِكَ، وَفُجَاءَةِ نِقْمَتِكَ، وَجَمِيعِ سَخَطِكَ",
    "لَا إِلَهَ إِلَّا اللَّهُ وَحْدَهُ لَا شَرِيكَ لَهُ، لَهُ الْمُلْكُ وَلَهُ الْحَمْدُ وَهُوَ عَلَى كُلِّ شَيْءٍ قَدِيرٌ",
    "سُبْحَانَ اللَّهِ وَبِحَمْدِهِ، سُبْحَانَ اللَّهِ الْعَظِيمِ",
];

/// The ordered list of reminder phrases, mirrored to disk after every mutation.
pub struct PhraseStore {
    document: JsonDocument,
    phrases: Vec<String>,
}

impl PhraseStore {
    /// Loads the phrase list, seeding the defaults when the file is missing,
    /// unreadable or empty. Never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let document = JsonDocument::new(path);

        let loaded = match document.load::<Vec<String>>() {
            Ok(Some(phrases)) if !phrases.is_empty() => Some(phrases),
            Ok(Some(_)) => {
                warn!(path = %document.path().display(), "phrase list is empty, reseeding defaults");
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(path = %document.path().display(), error = %err, "unable to load phrase list, using defaults");
                None
            }
        };

        match loaded {
            Some(phrases) => {
                info!(count = phrases.len(), "loaded phrase list");
                Self { document, phrases }
            }
            None => {
                let store = Self {
                    document,
                    phrases: DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
                };
                store.persist();
                store
            }
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Uniform pick. `None` only once every phrase has been removed.
    pub fn random_phrase(&self) -> Option<&str> {
        self.phrases
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    /// Appends the trimmed text. Blank input is ignored and returns `false`.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.phrases.push(text.to_string());
        self.persist();
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.phrases.len() {
            return None;
        }
        let removed = self.phrases.remove(index);
        self.persist();
        Some(removed)
    }

    // A failed write leaves the in-memory list authoritative until the next save.
    fn persist(&self) {
        if let Err(err) = self.document.save(&self.phrases) {
            error!(path = %self.document.path().display(), error = %err, "failed to save phrase list");
        }
    }
}
