//! Languages command

use crate::app::OutputFormat;
use anyhow::Result;
use serde::Serialize;
use sourcechunk_core::GrammarRegistry;

#[derive(Debug, Serialize)]
struct LanguageInfo {
    language: String,
    semantic_kinds: Vec<String>,
    container_kinds: Vec<String>,
}

fn describe(registry: &GrammarRegistry) -> Vec<LanguageInfo> {
    registry
        .languages()
        .into_iter()
        .filter_map(|language| registry.get(language))
        .map(|grammar| {
            let mut semantic: Vec<String> =
                grammar.semantic_kinds().map(str::to_string).collect();
            semantic.sort();
            let containers = semantic
                .iter()
                .filter(|k| grammar.is_container(k))
                .cloned()
                .collect();
            LanguageInfo {
                language: grammar.language().to_string(),
                semantic_kinds: semantic,
                container_kinds: containers,
            }
        })
        .collect()
}

pub async fn run(format: OutputFormat) -> Result<()> {
    let languages = describe(&GrammarRegistry::with_defaults());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&languages)?);
        }
        OutputFormat::Cli => {
            for info in &languages {
                println!("{}", info.language);
                println!("  units:      {}", info.semantic_kinds.join(", "));
                println!("  containers: {}", info.container_kinds.join(", "));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults() {
        let languages = describe(&GrammarRegistry::with_defaults());
        let python = languages.iter().find(|l| l.language == "python").unwrap();
        assert_eq!(python.container_kinds, vec!["class_definition"]);
        assert!(python
            .semantic_kinds
            .contains(&"function_definition".to_string()));
        assert!(languages.iter().any(|l| l.language == "rust"));
    }
}
