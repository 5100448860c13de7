// src/search/query.rs
//! Search request construction for "similar video" lookups.
//!
//! The active policy is fixed: it always asks for videos tagged with the two
//! literal keyword terms below, newest first. The article's own high-scoring
//! keywords are collected and gate the request, but are not sent as terms.

use serde_json::{json, Value};

use crate::article::Article;
use crate::error::{ServiceError, ServiceResult};

/// Keywords must score strictly above this to count as candidate terms.
pub const KEYWORD_SCORE_THRESHOLD: f64 = 5.0;

pub const FIXED_TERMS: [&str; 2] = ["RTL", "Lombardi"];

pub const PAGE_SIZE: usize = 5;

pub const SORT_FIELD: &str = "fields.publicationDate";

/// `_source` projection requested for every hit.
pub const SOURCE_FIELDS: [&str; 13] = [
    "fields.headline",
    "fields.intro",
    "fields.lastModifiedDate",
    "fields.publicationDate",
    "fields.topic",
    "fields.urlTitle",
    "id",
    "sections",
    "subType",
    "type",
    "webUrl",
    "tags",
    "keywords",
];

/// A built search request plus the candidate terms it was derived from.
#[derive(Debug, Clone)]
pub struct SimilarQuery {
    pub candidate_terms: Vec<String>,
    pub body: Value,
}

/// Build the search body for `article`.
///
/// Fails with `Precondition` when no keyword scores above the threshold.
pub fn build(article: &Article) -> ServiceResult<SimilarQuery> {
    let candidate_terms = article.keywords_above(KEYWORD_SCORE_THRESHOLD);
    if candidate_terms.is_empty() {
        return Err(ServiceError::Precondition {
            threshold: KEYWORD_SCORE_THRESHOLD,
        });
    }

    let body = json!({
        "query": {
            "bool": {
                "must": [
                    { "terms": { "keywords.label": FIXED_TERMS } },
                    { "terms": { "type": ["video"] } }
                ],
                "must_not": [
                    { "term": { "fields.hiddenArticle": "true" } }
                ]
            }
        },
        "sort": [ { SORT_FIELD: { "order": "desc" } } ],
        "size": PAGE_SIZE,
        "_source": { "includes": SOURCE_FIELDS }
    });

    Ok(SimilarQuery {
        candidate_terms,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Keyword;

    fn article_with(keywords: &[(&str, f64)]) -> Article {
        Article {
            id: "181291926".into(),
            keywords: keywords
                .iter()
                .map(|(label, score)| Keyword {
                    label: label.to_string(),
                    score: *score,
                })
                .collect(),
            ..Article::default()
        }
    }

    fn must_terms(body: &Value) -> Vec<String> {
        body["query"]["bool"]["must"][0]["terms"]["keywords.label"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn fixed_terms_are_used_regardless_of_keywords() {
        for kws in [
            vec![("x", 9.0)],
            vec![("Merkel", 7.5), ("Berlin", 6.0)],
            vec![("RTL", 5.5), ("noise", 1.0)],
        ] {
            let q = build(&article_with(&kws)).unwrap();
            assert_eq!(must_terms(&q.body), vec!["RTL", "Lombardi"]);
        }
    }

    #[test]
    fn candidate_terms_are_collected_but_not_queried() {
        let q = build(&article_with(&[("Merkel", 7.5), ("low", 2.0)])).unwrap();
        assert_eq!(q.candidate_terms, vec!["Merkel".to_string()]);
        assert!(!q.body.to_string().contains("Merkel"));
    }

    #[test]
    fn no_qualifying_keyword_is_a_precondition_error() {
        for kws in [vec![], vec![("edge", 5.0), ("low", 0.1)]] {
            let err = build(&article_with(&kws)).unwrap_err();
            assert!(matches!(err, ServiceError::Precondition { .. }), "{err}");
        }
    }

    #[test]
    fn filters_sort_size_and_projection() {
        let q = build(&article_with(&[("x", 9.0)])).unwrap();
        let b = &q.body;
        assert_eq!(b["query"]["bool"]["must"][1]["terms"]["type"][0], "video");
        assert_eq!(
            b["query"]["bool"]["must_not"][0]["term"]["fields.hiddenArticle"],
            "true"
        );
        assert_eq!(b["sort"][0]["fields.publicationDate"]["order"], "desc");
        assert_eq!(b["size"], 5);

        let includes = b["_source"]["includes"].as_array().unwrap();
        assert_eq!(includes.len(), SOURCE_FIELDS.len());
        for f in ["fields.headline", "id", "subType", "webUrl", "keywords"] {
            assert!(includes.iter().any(|v| v == f), "missing {f}");
        }
    }
}
