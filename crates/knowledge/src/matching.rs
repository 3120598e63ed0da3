//! County and keyword matching over the reference data.
//!
//! Both matchers are pure: they never touch the datasets beyond reading them
//! and always return results in load order.

use crate::types::{KnowledgeBlock, Provider};

/// Separator placed between the contents of matched knowledge blocks.
pub const KNOWLEDGE_SEPARATOR: &str = "\n\n";

/// Providers whose `counties_served` contains `county`.
///
/// Comparison is case-insensitive exact equality, never substring. An absent
/// or empty county yields no providers.
pub fn providers_for_county<'a>(
    providers: &'a [Provider],
    county: Option<&str>,
) -> Vec<&'a Provider> {
    let Some(county) = county.filter(|c| !c.is_empty()) else {
        return Vec::new();
    };

    let lowered = county.to_lowercase();
    providers.iter().filter(|p| p.serves(&lowered)).collect()
}

/// Knowledge blocks with at least one tag occurring in the question.
pub fn matching_blocks<'a>(
    blocks: &'a [KnowledgeBlock],
    question: &str,
) -> Vec<&'a KnowledgeBlock> {
    let lowered = question.to_lowercase();
    blocks.iter().filter(|b| b.matches(&lowered)).collect()
}

/// Contents of all matching blocks joined by a blank line.
///
/// Returns an empty string when nothing matches.
pub fn relevant_knowledge(blocks: &[KnowledgeBlock], question: &str) -> String {
    matching_blocks(blocks, question)
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join(KNOWLEDGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(name: &str, counties: &[&str]) -> Provider {
        serde_json::from_value(json!({ "name": name, "counties_served": counties })).unwrap()
    }

    fn sample_providers() -> Vec<Provider> {
        vec![
            provider("ABQ Family Center", &["Bernalillo"]),
            provider("Northern Kids", &["Taos", "Rio Arriba"]),
            provider("Metro Parents", &["Sandoval", "BERNALILLO"]),
        ]
    }

    fn sample_blocks() -> Vec<KnowledgeBlock> {
        vec![
            KnowledgeBlock::new(["food"], "Food bank info..."),
            KnowledgeBlock::new(["housing", "rent"], "Housing info..."),
            KnowledgeBlock::new(["WIC", "formula"], "WIC info..."),
        ]
    }

    fn names<'a>(matches: &[&'a Provider]) -> Vec<&'a str> {
        matches.iter().filter_map(|p| p.name()).collect()
    }

    #[test]
    fn test_county_match_is_case_insensitive_and_ordered() {
        let providers = sample_providers();
        let matches = providers_for_county(&providers, Some("bernalillo"));
        assert_eq!(names(&matches), vec!["ABQ Family Center", "Metro Parents"]);
    }

    #[test]
    fn test_county_match_is_not_substring() {
        let providers = sample_providers();
        assert!(providers_for_county(&providers, Some("Rio")).is_empty());
        assert!(providers_for_county(&providers, Some("Bernalillo County")).is_empty());
    }

    #[test]
    fn test_absent_or_empty_county_matches_nothing() {
        let providers = sample_providers();
        assert!(providers_for_county(&providers, None).is_empty());
        assert!(providers_for_county(&providers, Some("")).is_empty());
    }

    #[test]
    fn test_whitespace_county_is_present_but_unmatched() {
        let providers = sample_providers();
        assert!(providers_for_county(&providers, Some("  ")).is_empty());
        assert!(providers_for_county(&providers, Some(" Taos ")).is_empty());

        let padded = vec![provider("Padded", &["  "])];
        assert_eq!(providers_for_county(&padded, Some("  ")).len(), 1);
    }

    #[test]
    fn test_membership_property_holds_for_every_county() {
        let providers = sample_providers();
        for county in ["bernalillo", "TAOS", "rio arriba", "Sandoval", "Luna"] {
            let matches = providers_for_county(&providers, Some(county));
            for p in &providers {
                let listed = p
                    .counties_served()
                    .iter()
                    .any(|c| c.to_lowercase() == county.to_lowercase());
                assert_eq!(matches.contains(&p), listed, "county {}", county);
            }
        }
    }

    #[test]
    fn test_knowledge_substring_match() {
        let blocks = sample_blocks();
        let knowledge = relevant_knowledge(&blocks, "Where can I find a foodbank?");
        assert_eq!(knowledge, "Food bank info...");
    }

    #[test]
    fn test_knowledge_joins_in_dataset_order() {
        let blocks = sample_blocks();
        let question = "Need baby FORMULA and help with rent or food";
        let knowledge = relevant_knowledge(&blocks, question);
        assert_eq!(knowledge, "Food bank info...\n\nHousing info...\n\nWIC info...");
    }

    #[test]
    fn test_knowledge_no_match_is_empty() {
        let blocks = sample_blocks();
        assert_eq!(relevant_knowledge(&blocks, "transportation"), "");
        assert_eq!(relevant_knowledge(&blocks, ""), "");
    }

    #[test]
    fn test_matching_is_idempotent() {
        let providers = sample_providers();
        let blocks = sample_blocks();

        let first = providers_for_county(&providers, Some("taos"));
        let second = providers_for_county(&providers, Some("taos"));
        assert_eq!(first, second);

        assert_eq!(
            relevant_knowledge(&blocks, "rent help"),
            relevant_knowledge(&blocks, "rent help")
        );
        assert_eq!(providers, sample_providers());
    }
}
