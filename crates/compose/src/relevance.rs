use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;

pub struct RelevanceConfig {
    /// A fragment survives only when it shares strictly more than this
    /// many distinct lower-cased words with the summary.
    pub min_overlap: usize,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self { min_overlap: 3 }
    }
}

/// Narrows retrieved regulation fragments to the citable ones: a
/// fragment must carry a recognizable resolution identifier and share
/// enough vocabulary with the case summary. Retrieval alone cannot
/// guarantee a citable identifier is present, so this trades recall for
/// precision.
pub struct RelevanceFilter {
    config: RelevanceConfig,
    identifier: Regex,
}

impl RelevanceFilter {
    pub fn new(config: RelevanceConfig) -> Self {
        Self {
            config,
            // Resolution codes like "RN 465/2021"; number part varies
            // between two and four digits in practice.
            identifier: Regex::new(r"RN ?\d{2,4}/\d{4}").unwrap(),
        }
    }

    /// Returns surviving identifiers and fragments as parallel
    /// sequences in first-insertion order. Fragments sharing an
    /// identifier overwrite earlier ones (last wins).
    pub fn filter(&self, summary: &str, fragments: &[String]) -> (Vec<String>, Vec<String>) {
        let summary_words: HashSet<String> = tokenize(summary);

        let mut relevant: IndexMap<String, String> = IndexMap::new();

        for fragment in fragments {
            let Some(identifier) = self.identifier.find(fragment) else {
                continue;
            };

            let fragment_words = tokenize(fragment);
            let overlap = summary_words.intersection(&fragment_words).count();

            if overlap > self.config.min_overlap {
                relevant.insert(identifier.as_str().to_string(), fragment.clone());
            }
        }

        let identifiers = relevant.keys().cloned().collect();
        let texts = relevant.values().cloned().collect();
        (identifiers, texts)
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RelevanceFilter {
        RelevanceFilter::new(RelevanceConfig::default())
    }

    #[test]
    fn keeps_fragment_with_identifier_and_overlap() {
        let summary = "negativa de cobertura com base em rol taxativo";
        let fragments = vec![
            "RN 465/2021 trata do rol de procedimentos e eventos em saúde, \
             cobertura negativa baseada no rol taxativo de procedimentos"
                .to_string(),
        ];

        let (ids, texts) = filter().filter(summary, &fragments);
        assert_eq!(ids, vec!["RN 465/2021"]);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("rol de procedimentos"));
    }

    #[test]
    fn fragment_without_identifier_is_always_excluded() {
        // Perfect lexical overlap, no citable code.
        let summary = "cobertura deve ser concedida conforme política interna";
        let fragments = vec!["cobertura deve ser concedida conforme política interna".to_string()];

        let (ids, texts) = filter().filter(summary, &fragments);
        assert!(ids.is_empty());
        assert!(texts.is_empty());
    }

    #[test]
    fn low_overlap_fragment_is_dropped() {
        let summary = "negativa de cobertura";
        let fragments = vec!["RN 117/2004 dispõe sobre prazos administrativos gerais".to_string()];

        let (ids, _) = filter().filter(summary, &fragments);
        assert!(ids.is_empty());
    }

    #[test]
    fn duplicate_identifier_last_fragment_wins_first_position_kept() {
        let summary = "negativa de cobertura com base em rol taxativo de procedimentos";
        let fragments = vec![
            "RN 465/2021 versão antiga sobre cobertura do rol taxativo de procedimentos".to_string(),
            "RN 558/2022 prazos de cobertura para procedimentos do rol taxativo".to_string(),
            "RN 465/2021 versão atualizada sobre cobertura do rol taxativo de procedimentos"
                .to_string(),
        ];

        let (ids, texts) = filter().filter(summary, &fragments);
        assert_eq!(ids, vec!["RN 465/2021", "RN 558/2022"]);
        assert!(texts[0].contains("versão atualizada"));
    }

    #[test]
    fn filter_is_idempotent_on_its_own_output() {
        let summary = "negativa de cobertura com base em rol taxativo de procedimentos";
        let fragments = vec![
            "RN 465/2021 cobertura do rol taxativo de procedimentos".to_string(),
            "RN 558/2022 prazos de cobertura para procedimentos do rol".to_string(),
        ];

        let f = filter();
        let (ids1, texts1) = f.filter(summary, &fragments);
        let (ids2, texts2) = f.filter(summary, &texts1);

        assert_eq!(ids1, ids2);
        assert_eq!(texts1, texts2);
    }
}
