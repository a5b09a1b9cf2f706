use serde::Serialize;

/// Number of domains shown in the overview chart.
pub const TOP_DOMAINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

/// Display form of a domain: a leading `www.` is dropped.
pub fn display_domain(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}

/// Top domains by article count, highest first.
///
/// The sort is stable so equal counts keep the order the server sent them in.
pub fn rank_domains(counts: &[(String, u64)]) -> Vec<DomainCount> {
    let mut ranked: Vec<DomainCount> = counts
        .iter()
        .map(|(domain, count)| DomainCount {
            domain: display_domain(domain).to_string(),
            count: *count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_DOMAINS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(d, c)| (d.to_string(), *c)).collect()
    }

    #[test]
    fn test_strips_www_and_sorts() {
        let ranked = rank_domains(&counts(&[
            ("www.bbc.co.uk", 3),
            ("ft.com", 9),
            ("www.smallbusiness.co.uk", 5),
        ]));
        assert_eq!(
            ranked,
            vec![
                DomainCount { domain: "ft.com".to_string(), count: 9 },
                DomainCount { domain: "smallbusiness.co.uk".to_string(), count: 5 },
                DomainCount { domain: "bbc.co.uk".to_string(), count: 3 },
            ]
        );
        // Only a leading prefix is removed
        assert_eq!(display_domain("news.www.example.com"), "news.www.example.com");
    }

    #[test]
    fn test_ties_keep_server_order() {
        let ranked = rank_domains(&counts(&[("b.com", 2), ("a.com", 2), ("c.com", 7)]));
        let names: Vec<_> = ranked.iter().map(|d| d.domain.as_str()).collect();
        assert_eq!(names, vec!["c.com", "b.com", "a.com"]);
    }

    #[test]
    fn test_at_most_ten_and_descending() {
        let input: Vec<(String, u64)> = (0..25).map(|i| (format!("d{}.com", i), (i * 7 % 13) as u64)).collect();
        let ranked = rank_domains(&input);
        assert_eq!(ranked.len(), TOP_DOMAINS);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_idempotent_on_sorted_input() {
        let first = rank_domains(&counts(&[
            ("www.a.com", 1),
            ("b.com", 8),
            ("c.com", 8),
            ("d.com", 4),
        ]));
        let again = rank_domains(
            &first
                .iter()
                .map(|d| (d.domain.clone(), d.count))
                .collect::<Vec<_>>(),
        );
        assert_eq!(first, again);
    }

    #[test]
    fn test_empty() {
        assert!(rank_domains(&[]).is_empty());
    }
}
