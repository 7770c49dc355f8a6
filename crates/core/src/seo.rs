//! Page metadata for the rendering layer.
//!
//! Metadata is a value computed from a listing or detail result and handed to whoever
//! owns the document head; nothing here mutates shared presentation state.

use serde::Serialize;

use crate::listing::FirmDetail;
use crate::locale::Locale;

/// Site name used in every title.
pub const SITE_NAME: &str = "PropFirmMentor";

const MAX_DESCRIPTION_CHARS: usize = 160;

/// One alternate-language link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateLink {
    /// Locale code (`hreflang`).
    pub locale: Locale,
    /// Path including the `locale` query parameter.
    pub path: String,
}

/// Title, description, and canonical links for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Document title.
    pub title: String,
    /// Meta description, at most 160 characters.
    pub description: String,
    /// Canonical path without query string.
    pub canonical_path: String,
    /// Locale the page is rendered in.
    pub locale: Locale,
    /// The same page in every supported locale.
    pub alternates: Vec<AlternateLink>,
}

impl PageMetadata {
    /// Metadata for the firm listing page.
    #[must_use]
    pub fn for_listing(locale: Locale) -> Self {
        let (title, description) = match locale {
            Locale::En => (
                "Compare Prop Trading Firms",
                "Compare prop firm challenges, account prices, payout splits and live discount codes.",
            ),
            Locale::Ko => (
                "프롭 트레이딩 회사 비교",
                "프롭 펌 챌린지, 계좌 가격, 수익 배분과 할인 코드를 비교하세요.",
            ),
            Locale::Ja => (
                "プロップファーム比較",
                "プロップファームのチャレンジ価格、利益分配、割引コードを比較。",
            ),
            Locale::Hi => (
                "प्रॉप ट्रेडिंग फर्मों की तुलना",
                "प्रॉप फर्म चैलेंज, खाते की कीमतें, पेआउट स्प्लिट और डिस्काउंट कोड की तुलना करें।",
            ),
        };

        Self::build(
            format!("{title} | {SITE_NAME}"),
            description.to_string(),
            "/firms".to_string(),
            locale,
        )
    }

    /// Metadata for one firm's detail page.
    ///
    /// The description is the firm's localized description when present, otherwise a
    /// summary built from its current discount and payout split.
    #[must_use]
    pub fn for_firm(detail: &FirmDetail, locale: Locale) -> Self {
        let firm = &detail.firm;
        let title = if detail.current_discount.is_zero() {
            format!("{} Review | {SITE_NAME}", firm.name)
        } else {
            format!(
                "{} Review: {}% Off | {SITE_NAME}",
                firm.name,
                detail.current_discount.normalize()
            )
        };

        let description = firm
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "{} prop firm: {} payout split, {} evaluation step(s).",
                    firm.name, firm.payout_split, firm.evaluation_steps
                )
            });

        Self::build(
            title,
            truncate(&description, MAX_DESCRIPTION_CHARS),
            format!("/firms/{}", firm.slug),
            locale,
        )
    }

    fn build(title: String, description: String, canonical_path: String, locale: Locale) -> Self {
        let alternates = Locale::ALL
            .iter()
            .map(|l| AlternateLink {
                locale: *l,
                path: format!("{canonical_path}?locale={l}"),
            })
            .collect();

        Self {
            title,
            description,
            canonical_path,
            locale,
            alternates,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars - 1).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingService;
    use crate::listing::tests::fixtures::{firm_record, now, promotion};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_listing_metadata_has_all_alternates() {
        let meta = PageMetadata::for_listing(Locale::Ko);
        assert_eq!(meta.canonical_path, "/firms");
        assert_eq!(meta.locale, Locale::Ko);
        assert!(meta.title.ends_with("| PropFirmMentor"));
        let paths: Vec<_> = meta.alternates.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/firms?locale=en",
                "/firms?locale=ko",
                "/firms?locale=ja",
                "/firms?locale=hi"
            ]
        );
    }

    #[test]
    fn test_firm_metadata_mentions_discount() {
        let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
        let promo = promotion(&record, dec!(20), None, now() + Duration::days(2));
        record.promotions.push(promo);
        let detail = ListingService::firm_detail(record, Locale::En, now()).unwrap();

        let meta = PageMetadata::for_firm(&detail, Locale::En);
        assert_eq!(meta.title, "FTMO Review: 20% Off | PropFirmMentor");
        assert_eq!(meta.canonical_path, "/firms/ftmo");
        assert_eq!(meta.description, "FTMO description");
    }

    #[test]
    fn test_firm_metadata_without_description() {
        let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
        record.firm.description = crate::locale::LocalizedText::default();
        let detail = ListingService::firm_detail(record, Locale::En, now()).unwrap();

        let meta = PageMetadata::for_firm(&detail, Locale::En);
        assert_eq!(meta.title, "FTMO Review | PropFirmMentor");
        assert_eq!(
            meta.description,
            "FTMO prop firm: 80/20 payout split, 2 evaluation step(s)."
        );
    }

    #[test]
    fn test_long_description_is_truncated() {
        let long = "x".repeat(400);
        let cut = truncate(&long, MAX_DESCRIPTION_CHARS);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(cut.ends_with('…'));
    }
}
