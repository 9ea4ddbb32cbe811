//! Article deduplication by URL.
//!
//! Exact string comparison on `url`; no normalisation. When a URL repeats,
//! the later article's fields replace the earlier one's but the slot keeps
//! the position where the URL was first seen.

use std::collections::HashMap;

use crate::types::Article;

/// Collapse articles sharing a URL into one entry.
///
/// Output order is first-occurrence order of each URL. The article stored
/// at that position is the **last** one seen with that URL.
pub fn deduplicate(articles: Vec<Article>) -> Vec<Article> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(articles.len());
    let mut merged: Vec<Article> = Vec::with_capacity(articles.len());

    for article in articles {
        match slots.get(&article.url) {
            Some(&idx) => merged[idx] = article,
            None => {
                slots.insert(article.url.clone(), merged.len());
                merged.push(article);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, title: &str) -> Article {
        Article::new(title, format!("{title} desc"), format!("{title} body"), url)
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(deduplicate(vec![]).is_empty());
    }

    #[test]
    fn distinct_urls_preserved_in_order() {
        let out = deduplicate(vec![
            article("https://a.com", "A"),
            article("https://b.com", "B"),
            article("https://c.com", "C"),
        ]);
        let urls: Vec<&str> = out.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, ["https://a.com", "https://b.com", "https://c.com"]);
    }

    #[test]
    fn last_occurrence_fields_win() {
        let out = deduplicate(vec![
            article("https://a.com", "first"),
            article("https://a.com", "second"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "second");
        assert_eq!(out[0].description, "second desc");
    }

    #[test]
    fn replaced_article_keeps_first_position() {
        let out = deduplicate(vec![
            article("https://a.com", "A1"),
            article("https://b.com", "B"),
            article("https://a.com", "A2"),
            article("https://c.com", "C"),
        ]);
        let titles: Vec<&str> = out.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["A2", "B", "C"]);
    }

    #[test]
    fn urls_compared_exactly() {
        let out = deduplicate(vec![
            article("https://a.com/x", "plain"),
            article("https://a.com/x/", "slash"),
            article("https://A.com/x", "upper"),
        ]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn every_url_appears_once() {
        let input: Vec<Article> = (0..30)
            .map(|i| article(&format!("https://site{}.com", i % 7), &format!("t{i}")))
            .collect();
        let out = deduplicate(input);
        assert_eq!(out.len(), 7);
        let mut urls: Vec<&str> = out.iter().map(|a| a.url.as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), 7);
        // site0 last appears at i = 28.
        assert_eq!(out[0].title, "t28");
    }
}
