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

/// The role marker opening the model's reply turn.
const ASSISTANT: &str = "<|assistant|>";

/// All role markers that terminate a turn.
const MARKERS: [&str; 3] = ["<|assistant|>", "<|system|>", "<|user|>"];

/// Extract the model's answer turn from a role-tagged transcript.
///
/// A turn is the span between an `<|assistant|>` marker and the next role
/// marker or the end of the transcript, crossing line boundaries. Only the
/// first non-empty turn is trusted: the model may hallucinate further role
/// turns after its answer. Returns `None` if the transcript contains no
/// assistant turn, or only empty ones.
pub fn extract_assistant_turn(transcript: &str) -> Option<String> {
    let mut rest = transcript;
    while let Some(idx) = rest.find(ASSISTANT) {
        let body = &rest[idx + ASSISTANT.len()..];
        let end = MARKERS
            .iter()
            .filter_map(|marker| body.find(marker))
            .min()
            .unwrap_or(body.len());
        let turn = body[..end].trim();
        if !turn.is_empty() {
            return Some(turn.to_string());
        }
        rest = &body[end..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_assistant_turn() {
        assert_eq!(extract_assistant_turn("<|system|>hi<|user|>there"), None);
        assert_eq!(extract_assistant_turn(""), None);
    }

    #[test]
    fn test_first_turn_wins() {
        let transcript = "<|assistant|>A<|user|>B<|assistant|>C";
        assert_eq!(extract_assistant_turn(transcript), Some("A".to_string()));
    }

    #[test]
    fn test_turn_runs_to_end_of_transcript() {
        let transcript = "<|system|>\nsys\n<|user|>\nask\n<|assistant|>\nreply";
        assert_eq!(
            extract_assistant_turn(transcript),
            Some("reply".to_string())
        );
    }

    #[test]
    fn test_turn_crosses_line_boundaries() {
        let transcript = "<|assistant|>\nQuestion 1\nAnswer 1\n<|user|>more";
        assert_eq!(
            extract_assistant_turn(transcript),
            Some("Question 1\nAnswer 1".to_string())
        );
    }

    #[test]
    fn test_empty_turns_are_skipped() {
        let transcript = "<|assistant|>   <|user|>x<|assistant|>real";
        assert_eq!(
            extract_assistant_turn(transcript),
            Some("real".to_string())
        );
    }

    #[test]
    fn test_all_turns_empty() {
        let transcript = "<|assistant|>  \n <|user|>x";
        assert_eq!(extract_assistant_turn(transcript), None);
    }
}
