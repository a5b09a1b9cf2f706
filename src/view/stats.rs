use serde::Serialize;

use super::dates::format_publish_date;
use crate::model::Stats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn date_range_text(stats: &Stats) -> String {
    let earliest = format_publish_date(stats.date_range.earliest.as_deref()).unwrap_or_default();
    let latest = format_publish_date(stats.date_range.latest.as_deref()).unwrap_or_default();
    format!("{} - {}", earliest, latest)
}

/// Headline cards of the overview page.
pub fn stat_cards(stats: &Stats) -> Vec<StatCard> {
    let mut cards = vec![
        StatCard {
            title: "Total Articles",
            value: group_thousands(stats.total_articles),
        },
        StatCard {
            title: "Unique Domains",
            value: stats.unique_domains.to_string(),
        },
        StatCard {
            title: "Avg Word Count",
            value: format!("{:.0}", stats.avg_word_count.round()),
        },
        StatCard {
            title: "Date Range",
            value: date_range_text(stats),
        },
    ];
    if let Some(sme) = &stats.sme_related {
        cards.push(StatCard {
            title: "SME Related",
            value: format!("{} ({:.1}%)", group_thousands(sme.total), sme.percentage),
        });
    }
    cards
}

/// Average news score to three decimals, `0` when the server has none.
pub fn news_quality(stats: &Stats) -> String {
    stats
        .avg_news_score
        .map(|score| format!("{:.3}", score))
        .unwrap_or_else(|| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateRange, SmeStats};

    fn stats() -> Stats {
        Stats {
            total_articles: 1_250,
            unique_domains: 48,
            date_range: DateRange {
                earliest: Some("01/01/2024 - 09:00".to_string()),
                latest: Some("sometime".to_string()),
            },
            top_domains: Vec::new(),
            avg_word_count: 612.5,
            avg_news_score: None,
            sme_related: Some(SmeStats {
                total: 400,
                percentage: 32.0,
            }),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_stat_cards() {
        let cards = stat_cards(&stats());
        let values: Vec<_> = cards.iter().map(|c| (c.title, c.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Total Articles", "1,250"),
                ("Unique Domains", "48"),
                ("Avg Word Count", "613"),
                ("Date Range", "January 1, 2024 - sometime"),
                ("SME Related", "400 (32.0%)"),
            ]
        );
        assert_eq!(news_quality(&stats()), "0");
    }
}
