//! Similarity scoring and re-ranking of articles.
//!
//! Each article is embedded from [`article_text`] and scored against the
//! hypothetical-answer embedding with a plain dot product. Vectors are
//! expected to be unit length already; nothing here normalizes them.

use hyde_search::Article;
use serde::Serialize;

use crate::error::RagError;

/// Characters of `content` included in the embedded text.
pub const CONTENT_PREFIX_CHARS: usize = 100;

/// An article paired with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    /// The article.
    pub article: Article,
    /// Dot product against the anchor embedding.
    pub score: f32,
}

/// The text embedded for an article: `"{title} {description} {content prefix}"`.
///
/// The content prefix is counted in characters, not bytes.
pub fn article_text(article: &Article) -> String {
    let prefix: String = article.content.chars().take(CONTENT_PREFIX_CHARS).collect();
    format!("{} {} {}", article.title, article.description, prefix)
}

/// Plain dot product.
///
/// # Errors
///
/// Returns [`RagError::Embedding`] if the vectors differ in length.
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32, RagError> {
    if a.len() != b.len() {
        return Err(RagError::Embedding(format!(
            "vector length mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Score every article against `anchor` and sort by score, highest first.
///
/// The sort is stable: equal scores keep their input order.
///
/// # Errors
///
/// Returns [`RagError::Embedding`] if `embeddings` does not have one
/// vector per article, or any vector's length differs from `anchor`.
pub fn rank_articles(
    articles: Vec<Article>,
    embeddings: &[Vec<f32>],
    anchor: &[f32],
) -> Result<Vec<ScoredArticle>, RagError> {
    if articles.len() != embeddings.len() {
        return Err(RagError::Embedding(format!(
            "{} articles but {} embeddings",
            articles.len(),
            embeddings.len()
        )));
    }

    let mut scored = articles
        .into_iter()
        .zip(embeddings)
        .map(|(article, embedding)| {
            Ok(ScoredArticle {
                score: dot_product(anchor, embedding)?,
                article,
            })
        })
        .collect::<Result<Vec<_>, RagError>>()?;

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str) -> Article {
        Article::new(format!("title {url}"), "desc", "body", url)
    }

    #[test]
    fn article_text_joins_fields() {
        let a = Article::new("Title", "Desc", "Body text", "https://a.com");
        assert_eq!(article_text(&a), "Title Desc Body text");
    }

    #[test]
    fn article_text_truncates_content() {
        let content = "x".repeat(250);
        let a = Article::new("T", "D", content, "https://a.com");
        let text = article_text(&a);
        assert_eq!(text, format!("T D {}", "x".repeat(CONTENT_PREFIX_CHARS)));
    }

    #[test]
    fn article_text_counts_characters_not_bytes() {
        let content = "é".repeat(150);
        let a = Article::new("T", "D", content, "https://a.com");
        let text = article_text(&a);
        assert_eq!(text.chars().count(), 4 + CONTENT_PREFIX_CHARS);
    }

    #[test]
    fn article_text_with_empty_fields() {
        let a = Article::new("", "", "", "https://a.com");
        assert_eq!(article_text(&a), "  ");
    }

    #[test]
    fn dot_product_identical_unit_vectors() {
        let a = [0.6, 0.8];
        assert!((dot_product(&a, &a).expect("dot") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dot_product_orthogonal() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert!(dot_product(&a, &b).expect("dot").abs() < 1e-6);
    }

    #[test]
    fn dot_product_does_not_normalize() {
        let a = [2.0, 0.0];
        let b = [3.0, 0.0];
        assert!((dot_product(&a, &b).expect("dot") - 6.0).abs() < 1e-6);
    }

    #[test]
    fn dot_product_length_mismatch() {
        let err = dot_product(&[1.0], &[1.0, 0.0]).unwrap_err();
        assert_eq!(err.code(), "EMBEDDING_MISMATCH");
    }

    #[test]
    fn rank_orders_by_descending_score() {
        let articles = vec![article("a"), article("b"), article("c")];
        // Scores against anchor [1, 0] are 0.2, 0.9, 0.5.
        let embeddings = vec![vec![0.2, 0.0], vec![0.9, 0.0], vec![0.5, 0.0]];
        let ranked = rank_articles(articles, &embeddings, &[1.0, 0.0]).expect("rank");
        let urls: Vec<&str> = ranked.iter().map(|s| s.article.url.as_str()).collect();
        assert_eq!(urls, ["b", "c", "a"]);
        assert!((ranked[0].score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rank_ties_keep_input_order() {
        let articles = vec![article("a"), article("b"), article("c"), article("d")];
        let embeddings = vec![vec![0.5], vec![0.7], vec![0.5], vec![0.7]];
        let ranked = rank_articles(articles, &embeddings, &[1.0]).expect("rank");
        let urls: Vec<&str> = ranked.iter().map(|s| s.article.url.as_str()).collect();
        assert_eq!(urls, ["b", "d", "a", "c"]);
    }

    #[test]
    fn rank_count_mismatch() {
        let err = rank_articles(vec![article("a")], &[], &[1.0]).unwrap_err();
        assert_eq!(err.code(), "EMBEDDING_MISMATCH");
    }

    #[test]
    fn rank_empty_is_empty() {
        let ranked = rank_articles(Vec::new(), &[], &[1.0]).expect("rank");
        assert!(ranked.is_empty());
    }
}
