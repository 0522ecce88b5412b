/// Injected keyword tables for structure and filler detection.
///
/// Immutable once constructed; callers that need different vocabularies pass
/// their own instance instead of mutating shared state.
#[derive(Debug, Clone)]
pub struct DeliveryLexicon {
    /// Phrases that open a talk.
    pub intro_keywords: Vec<String>,
    /// Phrases that wrap a talk up.
    pub closing_keywords: Vec<String>,
    /// Filler tokens matched against segment text.
    pub filler_tokens: Vec<String>,
}

impl Default for DeliveryLexicon {
    fn default() -> Self {
        Self {
            intro_keywords: to_strings(&["안녕하세요", "반갑습니다", "소개", "시작하겠습니다", "오늘은"]),
            closing_keywords: to_strings(&[
                "감사합니다",
                "마치겠습니다",
                "마무리",
                "이상입니다",
                "정리하자면",
            ]),
            filler_tokens: to_strings(&["음", "어", "그", "저기", "음음"]),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl DeliveryLexicon {
    pub fn contains_intro(&self, text: &str) -> bool {
        self.intro_keywords.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn contains_closing(&self, text: &str) -> bool {
        self.closing_keywords.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn is_filler_token(&self, token: &str) -> bool {
        let trimmed = token.trim();
        self.filler_tokens.iter().any(|f| f == trimmed)
    }
}
