/// Topic → mode routing by keyword matching.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::schema::mode::Mode;

/// Keyword rules in priority order. A topic matching several rules takes
/// the earliest one.
static RULES: Lazy<Vec<(Mode, Regex)>> = Lazy::new(|| {
    vec![
        (
            Mode::BusinessGrowth,
            keyword_regex(&[
                "doanh thu",
                "bán",
                "marketing",
                "ads",
                "quảng cáo",
                "shop",
                "sàn",
                "shopee",
                "tiktok",
                "funnel",
                "conversion",
                "khách hàng",
            ]),
        ),
        (
            Mode::ProcessOptimization,
            keyword_regex(&[
                "quy trình",
                "tối ưu",
                "workflow",
                "process",
                "vận hành",
                "sop",
                "kpi",
                "chi phí",
                "tự động",
                "automation",
            ]),
        ),
        (
            Mode::AiSystem,
            keyword_regex(&[
                "ai",
                "machine learning",
                "ml",
                "data",
                "dữ liệu",
                "api",
                "system",
                "hệ thống",
                "pipeline",
                "agent",
            ]),
        ),
        (
            Mode::Education,
            keyword_regex(&[
                "học",
                "giáo dục",
                "dạy",
                "đào tạo",
                "lesson",
                "kids",
                "trẻ em",
            ]),
        ),
    ]
});

/// Whole-word alternation over `keywords`. `\b` is Unicode-aware, so
/// Vietnamese diacritics count as word characters.
fn keyword_regex(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).unwrap()
}

/// Route a topic to a mode. Case-insensitive; never fails.
pub fn classify(topic: &str) -> Mode {
    let lowered = topic.to_lowercase();
    let mode = RULES
        .iter()
        .find(|(_, re)| re.is_match(&lowered))
        .map(|(mode, _)| *mode)
        .unwrap_or(Mode::General);
    debug!(topic, mode = mode.label(), "classified topic");
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_keywords() {
        assert_eq!(classify("Tăng doanh thu cho shop online"), Mode::BusinessGrowth);
        assert_eq!(classify("Facebook ADS for beginners"), Mode::BusinessGrowth);
    }

    #[test]
    fn process_keywords() {
        assert_eq!(classify("Tự động hóa quy trình tạo video AI"), Mode::ProcessOptimization);
        assert_eq!(classify("Weekly KPI review"), Mode::ProcessOptimization);
    }

    #[test]
    fn ai_keywords() {
        assert_eq!(classify("Build an AI agent"), Mode::AiSystem);
        assert_eq!(classify("Làm sạch dữ liệu"), Mode::AiSystem);
    }

    #[test]
    fn education_keywords() {
        assert_eq!(classify("Cách học tiếng Anh"), Mode::Education);
        assert_eq!(classify("Science lesson for kids"), Mode::Education);
    }

    #[test]
    fn business_outranks_process() {
        assert_eq!(classify("tối ưu quy trình bán hàng"), Mode::BusinessGrowth);
        assert_eq!(classify("shop automation"), Mode::BusinessGrowth);
    }

    #[test]
    fn process_outranks_ai_and_education() {
        assert_eq!(classify("AI workflow"), Mode::ProcessOptimization);
        assert_eq!(classify("automation lesson"), Mode::ProcessOptimization);
    }

    #[test]
    fn keywords_need_word_boundaries() {
        // "ai" inside "said" / "mail", "ml" inside "html", "sop" inside "isopropyl"
        assert_eq!(classify("He said to check the mail"), Mode::General);
        assert_eq!(classify("html basics"), Mode::General);
        assert_eq!(classify("isopropyl safety"), Mode::General);
    }

    #[test]
    fn no_keywords_falls_back_to_general() {
        assert_eq!(classify("con mèo của tôi"), Mode::General);
        assert_eq!(classify(""), Mode::General);
    }
}
