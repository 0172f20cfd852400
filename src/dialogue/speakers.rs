/*!
 * Speaker attribution from leading `NAME:` labels.
 *
 * Everything before the first colon is the candidate name. Short candidates
 * are accepted ("GUY #2", "MAN IN BLACK"); long ones are ordinary dialogue
 * that happens to contain a colon ("The real question is: ...") and are
 * ignored. In an all-capitals label a leading article is not counted, so
 * "THE MAN IN BLACK" passes a three-token limit while "The real question
 * is" does not.
 */

/// Default maximum number of tokens in a speaker name
pub const DEFAULT_MAX_SPEAKER_TOKENS: usize = 3;

const ARTICLES: [&str; 3] = ["THE", "A", "AN"];

#[derive(Debug, Clone)]
pub struct SpeakerAttributor {
    max_tokens: usize,
}

impl Default for SpeakerAttributor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEAKER_TOKENS)
    }
}

impl SpeakerAttributor {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Upper-cased speaker name if `text` starts with a plausible label
    pub fn attribute(&self, text: &str) -> Option<String> {
        let (candidate, _) = text.split_once(':')?;

        // "10:30" and the like are times, not names
        if !candidate.chars().any(char::is_alphabetic) {
            return None;
        }

        let shouted = candidate == candidate.to_uppercase();
        let tokens: Vec<String> = candidate
            .split_whitespace()
            .map(str::to_uppercase)
            .collect();

        let counted = match tokens.first() {
            Some(first) if shouted && tokens.len() > 1 && ARTICLES.contains(&first.as_str()) => {
                tokens.len() - 1
            }
            _ => tokens.len(),
        };

        if counted == 0 || counted > self.max_tokens {
            return None;
        }

        Some(tokens.join(" "))
    }
}
