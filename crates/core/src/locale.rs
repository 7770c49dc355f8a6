//! Supported locales and localized text resolution.

use serde::{Deserialize, Serialize};

/// A locale the site publishes copy in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English, the fallback for every missing translation.
    #[default]
    En,
    /// Korean
    Ko,
    /// Japanese
    Ja,
    /// Hindi
    Hi,
}

impl Locale {
    /// Every supported locale, English first.
    pub const ALL: [Self; 4] = [Self::En, Self::Ko, Self::Ja, Self::Hi];

    /// Returns the BCP 47 tag used in URLs and `hreflang`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ko => "ko",
            Self::Ja => "ja",
            Self::Hi => "hi",
        }
    }

    /// Resolves a request parameter, falling back to English for absent or unknown values.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(|p| p.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ko" => Ok(Self::Ko),
            "ja" => Ok(Self::Ja),
            "hi" => Ok(Self::Hi),
            _ => Err(format!("Unsupported locale: {s}")),
        }
    }
}

/// A piece of copy with an English original and optional translations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// English text.
    pub en: Option<String>,
    /// Korean translation.
    pub ko: Option<String>,
    /// Japanese translation.
    pub ja: Option<String>,
    /// Hindi translation.
    pub hi: Option<String>,
}

impl LocalizedText {
    /// Creates English-only text.
    #[must_use]
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en: Some(text.into()),
            ..Self::default()
        }
    }

    /// Lays `patch` over this text. Locales present in `patch` win; the others keep
    /// their current value.
    #[must_use]
    pub fn overlay(&self, patch: Self) -> Self {
        Self {
            en: patch.en.or_else(|| self.en.clone()),
            ko: patch.ko.or_else(|| self.ko.clone()),
            ja: patch.ja.or_else(|| self.ja.clone()),
            hi: patch.hi.or_else(|| self.hi.clone()),
        }
    }

    /// Returns the text for `locale`, or the English text when that translation is
    /// missing or blank.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> Option<&str> {
        let translated = match locale {
            Locale::En => None,
            Locale::Ko => self.ko.as_deref(),
            Locale::Ja => self.ja.as_deref(),
            Locale::Hi => self.hi.as_deref(),
        };

        translated
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.en.as_deref().filter(|t| !t.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Locale::En)]
    #[case(Some("ko"), Locale::Ko)]
    #[case(Some("JA"), Locale::Ja)]
    #[case(Some("hi"), Locale::Hi)]
    #[case(Some("fr"), Locale::En)]
    #[case(Some(""), Locale::En)]
    fn test_from_param(#[case] param: Option<&str>, #[case] expected: Locale) {
        assert_eq!(Locale::from_param(param), expected);
    }

    #[test]
    fn test_resolve_prefers_translation() {
        let text = LocalizedText {
            en: Some("Fast payouts".into()),
            ko: Some("빠른 출금".into()),
            ..LocalizedText::default()
        };
        assert_eq!(text.resolve(Locale::Ko), Some("빠른 출금"));
        assert_eq!(text.resolve(Locale::En), Some("Fast payouts"));
    }

    #[test]
    fn test_overlay_keeps_missing_locales() {
        let stored = LocalizedText {
            en: Some("Spring Sale".into()),
            ko: Some("봄 세일".into()),
            ja: Some("春のセール".into()),
            hi: None,
        };
        let patch = LocalizedText {
            en: Some("Summer Sale".into()),
            hi: Some("ग्रीष्मकालीन सेल".into()),
            ..LocalizedText::default()
        };

        let merged = stored.overlay(patch);
        assert_eq!(merged.en.as_deref(), Some("Summer Sale"));
        assert_eq!(merged.ko.as_deref(), Some("봄 세일"));
        assert_eq!(merged.ja.as_deref(), Some("春のセール"));
        assert_eq!(merged.hi.as_deref(), Some("ग्रीष्मकालीन सेल"));
    }

    #[test]
    fn test_resolve_falls_back_to_english_verbatim() {
        let text = LocalizedText {
            en: Some("Fast payouts".into()),
            ja: Some("   ".into()),
            ..LocalizedText::default()
        };
        assert_eq!(text.resolve(Locale::Ja), Some("Fast payouts"));
        assert_eq!(text.resolve(Locale::Hi), Some("Fast payouts"));
    }

    #[test]
    fn test_resolve_without_any_text() {
        assert_eq!(LocalizedText::default().resolve(Locale::Ko), None);
    }
}
