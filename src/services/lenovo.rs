// src/services/lenovo.rs

//! Drop feed for the Lenovo Legion key drop community.
//!
//! The community page embeds a guest access token; with it, the newest posts
//! of the drop space are fetched from the GraphQL API and turned into
//! [`DropCandidate`]s.

use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{DropCandidate, LenovoConfig};
use crate::utils::http::fetch_text;

const SOURCE: &str = "lenovo";

const POSTS_QUERY: &str = r#"
query GetSpacePosts($spaceId: ID!, $limit: Int!) {
  posts(spaceIds: [$spaceId], limit: $limit, orderBy: publishedAt, reverse: true) {
    nodes {
      id
      title
      fields {
        key
        value
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<PostsData>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: PostConnection,
}

#[derive(Debug, Deserialize)]
struct PostConnection {
    #[serde(default)]
    nodes: Vec<PostNode>,
}

#[derive(Debug, Deserialize)]
struct PostNode {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    fields: Vec<PostField>,
}

#[derive(Debug, Deserialize)]
struct PostField {
    key: String,
    #[serde(default)]
    value: Option<String>,
}

/// Pull the embedded guest access token out of the community page.
pub fn extract_access_token(html: &str) -> Option<String> {
    Regex::new(r#""accessToken"\s*:\s*"([^"]+)""#)
        .ok()?
        .captures(html)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

/// GraphQL request body for the newest posts of the drop space.
pub fn posts_request(config: &LenovoConfig) -> Value {
    json!({
        "query": POSTS_QUERY,
        "variables": {
            "spaceId": config.space_id,
            "limit": config.post_limit,
        }
    })
}

/// Decode a GraphQL posts response into drop candidates, in feed order.
pub fn parse_posts(body: &str, config: &LenovoConfig) -> Result<Vec<DropCandidate>> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors {
        return Err(AppError::api(SOURCE, errors));
    }

    let data = response
        .data
        .ok_or_else(|| AppError::extract(SOURCE, "response has no data"))?;

    Ok(data
        .posts
        .nodes
        .into_iter()
        .map(|post| to_candidate(post, config))
        .collect())
}

fn to_candidate(post: PostNode, config: &LenovoConfig) -> DropCandidate {
    let mut status_fields = Vec::new();
    let mut start_date_field = None;

    for field in post.fields {
        let Some(value) = field.value else { continue };
        if field.key == config.status_field_key {
            status_fields.push(value);
        } else if field.key == config.start_field_key && start_date_field.is_none() {
            start_date_field = Some(value);
        }
    }

    DropCandidate {
        id: post.id,
        title: post.title,
        status_fields,
        start_date_field,
    }
}

/// Fetch the current drop candidates from the community API.
pub async fn fetch_candidates(client: &Client, config: &LenovoConfig) -> Result<Vec<DropCandidate>> {
    let page = fetch_text(client, &config.page_url).await?;
    let token = extract_access_token(&page)
        .ok_or_else(|| AppError::extract(SOURCE, "no access token on community page"))?;
    log::debug!("Obtained {} access token", SOURCE);

    let body = client
        .post(&config.api_url)
        .bearer_auth(token)
        .header(reqwest::header::ORIGIN, &config.origin)
        .header(reqwest::header::REFERER, &config.page_url)
        .json(&posts_request(config))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_posts(&body, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_access_token() {
        let html = r#"<script>window.__STATE__={"auth":{"accessToken":"abc.def-123","x":1}}</script>"#;
        assert_eq!(extract_access_token(html).as_deref(), Some("abc.def-123"));
        assert_eq!(extract_access_token("<html></html>"), None);
    }

    #[test]
    fn test_posts_request_variables() {
        let config = LenovoConfig::default();
        let body = posts_request(&config);
        assert_eq!(body["variables"]["spaceId"], "y4nnEocBKMA2");
        assert_eq!(body["variables"]["limit"], 50);
        assert!(body["query"].as_str().unwrap().contains("posts(spaceIds"));
    }

    #[test]
    fn test_parse_posts() {
        let body = r#"{
            "data": { "posts": { "nodes": [
                {
                    "id": "p1",
                    "title": "Legion Drop: Racing Game",
                    "fields": [
                        { "key": "status", "value": "[\"AmAI_EO502mWht5Fb6OE0\"]" },
                        { "key": "start_date", "value": "\"2026-10-20T18:00:00.000Z\"" },
                        { "key": "body", "value": "<p>hi</p>" }
                    ]
                },
                { "id": "p2", "title": "Rules", "fields": [ { "key": "status", "value": null } ] }
            ] } }
        }"#;

        let candidates = parse_posts(body, &LenovoConfig::default()).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "p1");
        assert_eq!(
            candidates[0].status_fields,
            vec!["[\"AmAI_EO502mWht5Fb6OE0\"]".to_string()]
        );
        assert_eq!(
            candidates[0].start_date_field.as_deref(),
            Some("\"2026-10-20T18:00:00.000Z\"")
        );
        assert!(candidates[1].status_fields.is_empty());
        assert_eq!(candidates[1].start_date_field, None);
    }

    #[test]
    fn test_parse_posts_api_errors() {
        let body = r#"{ "errors": [ { "message": "Unauthorized" } ] }"#;
        let err = parse_posts(body, &LenovoConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Api { .. }));
    }

    #[test]
    fn test_parse_posts_missing_data() {
        let err = parse_posts("{}", &LenovoConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Extract { .. }));
    }

    #[test]
    fn test_parse_posts_invalid_json() {
        let err = parse_posts("<html>blocked</html>", &LenovoConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
