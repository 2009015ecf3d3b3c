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

//! Lenient line-oriented parser for model-generated Q&A text.
//!
//! The model is asked to answer in a `Question N` / `Answer N` format, but
//! small models drift: numbering disappears, colons come and go, answers run
//! over multiple lines. This parser is best-effort by construction: malformed
//! output degrades to fewer pairs, never to an error.

use crate::types::record::QaPair;

enum Line {
    /// A line starting with a question marker, e.g. `Question 1: <text>`.
    Question(String),
    /// A line starting with an answer marker, e.g. `Answer 1: <text>`.
    Answer(String),
    /// Any other non-blank line.
    Text(String),
}

impl Line {
    fn read(line: &str) -> Self {
        if let Some(rest) = match_marker(line, "Question") {
            Line::Question(rest)
        } else if let Some(rest) = match_marker(line, "Answer") {
            Line::Answer(rest)
        } else {
            Line::Text(line.to_string())
        }
    }
}

/// Match a marker line: the keyword (case-insensitively), optional
/// whitespace, optional digits, an optional colon, whitespace, remainder.
/// Returns the remainder, which may be empty.
fn match_marker(line: &str, keyword: &str) -> Option<String> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = line[keyword.len()..]
        .trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some(rest.trim_start().to_string())
}

/// Parse model output into a sequence of question/answer pairs.
///
/// Grammar, in order of precedence per line:
///   - A question marker emits any completed pending pair, then starts a new
///     one. A bare marker (`Question 1` alone) takes its question text from
///     the next plain line.
///   - An answer marker overwrites any pending partial answer.
///   - A plain line continues a pending answer (joined with a space), or
///     starts the answer when only a question is pending.
///
/// A trailing completed pair is emitted at end of input. Pairs with an empty
/// question or answer are dropped. Blank lines are skipped. Never errors:
/// unusable input yields an empty sequence.
pub fn parse_qa(text: &str) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut question: Option<String> = None;
    let mut answer: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match Line::read(line) {
            Line::Question(rest) => {
                emit(&mut pairs, &question, &answer);
                question = Some(rest);
                answer = None;
            }
            Line::Answer(rest) => {
                answer = Some(rest);
            }
            Line::Text(text) => {
                if let Some(answer) = answer.as_mut() {
                    answer.push(' ');
                    answer.push_str(&text);
                } else if question.as_deref() == Some("") {
                    question = Some(text);
                } else if question.is_some() {
                    answer = Some(text);
                }
            }
        }
    }
    emit(&mut pairs, &question, &answer);
    pairs
}

fn emit(pairs: &mut Vec<QaPair>, question: &Option<String>, answer: &Option<String>) {
    if let (Some(question), Some(answer)) = (question, answer) {
        let question = question.trim();
        let answer = answer.trim();
        if !question.is_empty() && !answer.is_empty() {
            pairs.push(QaPair::new(question, answer));
        }
    }
}
