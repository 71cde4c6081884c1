// src/services/alienware.rs

//! Fact extraction for the Alienware Arena giveaway and vault pages.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{GiveawayFact, VaultFact};

const TITLE_SELECTOR: &str = ".js-widget-title";
const VAULT_SELECTOR: &str = "[data-product-disabled]";

const COUNTRY_KEYS_PATTERN: &str = r"(?s)var\s+countryKeys\s*=\s*(\{.*?\});";

/// Extract the current giveaway title and key count from the giveaway page.
pub fn extract_giveaway(html: &str) -> Result<GiveawayFact> {
    let document = Html::parse_document(html);
    let title_sel = parse_selector(TITLE_SELECTOR)?;

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(GiveawayFact {
        title,
        key_count: extract_key_count(html),
    })
}

/// Read the vault's disabled flag; a missing flag counts as disabled.
pub fn extract_vault(html: &str) -> Result<VaultFact> {
    let document = Html::parse_document(html);
    let vault_sel = parse_selector(VAULT_SELECTOR)?;

    let flag = document
        .select(&vault_sel)
        .find_map(|el| el.value().attr("data-product-disabled"))
        .map(|v| v.trim().to_ascii_lowercase());

    Ok(match flag.as_deref() {
        Some("false") => VaultFact { is_disabled: false },
        Some("true") => VaultFact { is_disabled: true },
        _ => VaultFact::default(),
    })
}

/// Highest per-level count in the `countryKeys` literal, 0 if unavailable.
fn extract_key_count(html: &str) -> u64 {
    let Some(literal) = Regex::new(COUNTRY_KEYS_PATTERN)
        .ok()
        .and_then(|re| re.captures(html))
        .and_then(|c| c.get(1))
    else {
        log::debug!("countryKeys block not found");
        return 0;
    };

    match serde_json::from_str::<Value>(literal.as_str()) {
        Ok(Value::Object(countries)) => countries
            .values()
            .filter_map(Value::as_object)
            .flat_map(|levels| levels.values())
            .filter_map(Value::as_u64)
            .max()
            .unwrap_or(0),
        Ok(_) => 0,
        Err(e) => {
            log::debug!("countryKeys block is not valid JSON: {}", e);
            0
        }
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::extract("alienware", format!("selector '{s}': {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIVEAWAY_PAGE: &str = r#"
        <html><body>
          <h2 class="widget-title js-widget-title">  Free Space Shooter Key  </h2>
          <script>
            var countryKeys = {
              "GR": {"1": 12, "2": 40},
              "US": {"1": 150, "2": "n/a"},
              "DE": []
            };
          </script>
        </body></html>
    "#;

    #[test]
    fn test_extract_giveaway() {
        let fact = extract_giveaway(GIVEAWAY_PAGE).unwrap();
        assert_eq!(fact.title.as_deref(), Some("Free Space Shooter Key"));
        assert_eq!(fact.key_count, 150);
    }

    #[test]
    fn test_missing_key_block_defaults_to_zero() {
        let html = r#"<div class="js-widget-title">Game</div>"#;
        let fact = extract_giveaway(html).unwrap();
        assert_eq!(fact.title.as_deref(), Some("Game"));
        assert_eq!(fact.key_count, 0);
    }

    #[test]
    fn test_missing_title_is_none() {
        let html = r#"<div class="js-widget-title">   </div><p>nothing</p>"#;
        let fact = extract_giveaway(html).unwrap();
        assert_eq!(fact.title, None);
    }

    #[test]
    fn test_vault_open() {
        let html = r#"<button data-product-disabled="false">Claim</button>"#;
        assert!(!extract_vault(html).unwrap().is_disabled);
    }

    #[test]
    fn test_vault_closed() {
        let html = r#"<button data-product-disabled="true">Claim</button>"#;
        assert!(extract_vault(html).unwrap().is_disabled);
    }

    #[test]
    fn test_vault_flag_missing_is_closed() {
        let html = r#"<button>Claim</button>"#;
        assert!(extract_vault(html).unwrap().is_disabled);
    }
}
