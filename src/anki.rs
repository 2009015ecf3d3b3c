// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::hash::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::PathBuf;

use genanki_rs::Deck;
use genanki_rs::Field;
use genanki_rs::Model;
use genanki_rs::Note;
use genanki_rs::Template;

use cardmine_core::CardSink;
use cardmine_core::ErrorReport;
use cardmine_core::Fallible;

/// A flashcard deck backend that packages cards into an Anki `.apkg` file.
///
/// The deck is built fresh in memory each run; flushing rewrites the package
/// file. IDs are derived from the deck name so that re-importing an updated
/// package updates the existing deck in Anki instead of creating a new one.
pub struct AnkiSink {
    model: Model,
    deck: Deck,
    output: PathBuf,
}

impl AnkiSink {
    pub fn new(deck_name: &str, output: PathBuf) -> Self {
        let model = Model::new(
            stable_id(deck_name, "model"),
            "Cardmine QA Model",
            vec![
                Field::new("Question"),
                Field::new("Answer"),
                Field::new("PageNumber"),
            ],
            vec![
                Template::new("Card 1").qfmt("{{Question}}").afmt(
                    r#"{{FrontSide}}<hr id="answer">{{Answer}}<br><br>Page: {{PageNumber}}"#,
                ),
            ],
        );
        let deck = Deck::new(
            stable_id(deck_name, "deck"),
            deck_name,
            "Q&A pairs mined from a document",
        );
        AnkiSink {
            model,
            deck,
            output,
        }
    }
}

impl CardSink for AnkiSink {
    fn add_card(&mut self, question: &str, answer: &str, page: &str) -> Fallible<()> {
        let note = Note::new(self.model.clone(), vec![question, answer, page])
            .map_err(|e| ErrorReport::new(format!("Failed to construct note: {e}")))?;
        self.deck.add_note(note);
        Ok(())
    }

    fn flush(&mut self) -> Fallible<()> {
        self.deck
            .write_to_file(&self.output.display().to_string())
            .map_err(|e| ErrorReport::new(format!("Failed to write deck package: {e}")))
    }
}

/// A deterministic ID in genanki's conventional `1 << 30 .. 1 << 31` range.
fn stable_id(name: &str, salt: &str) -> i64 {
    let mut hasher = DefaultHasher::new();
    salt.hash(&mut hasher);
    name.hash(&mut hasher);
    (1 << 30) + (hasher.finish() % (1 << 30)) as i64
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_stable_id_is_deterministic() {
        assert_eq!(stable_id("chemistry", "deck"), stable_id("chemistry", "deck"));
    }

    #[test]
    fn test_stable_id_distinguishes_names_and_salts() {
        assert_ne!(stable_id("chemistry", "deck"), stable_id("physics", "deck"));
        assert_ne!(
            stable_id("chemistry", "deck"),
            stable_id("chemistry", "model")
        );
    }

    #[test]
    fn test_stable_id_range() {
        let id = stable_id("chemistry", "deck");
        assert!((1 << 30) <= id && id < (1 << 31));
    }

    #[test]
    fn test_flush_writes_package() -> Fallible<()> {
        let dir = tempdir()?;
        let output = dir.path().join("deck.apkg");
        let mut sink = AnkiSink::new("test", output.clone());
        sink.add_card("What is water?", "H2O.", "12")?;
        sink.flush()?;
        assert!(output.exists());
        Ok(())
    }
}
