//! Filtering and quick search over CMS collection entries.

use serde::Deserialize;

use crate::block::ContentBlock;
use crate::decode::decode_value;
use crate::text::excerpt;

/// Hits returned by [`quick_search`] when no limit is given.
pub const DEFAULT_LIMIT: usize = 5;

/// Entries per page on listing pages.
pub const DEFAULT_PER_PAGE: usize = 3;

/// The CMS list response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub total: u64,
}

/// A collection entry carrying a rich-text field (blog post, service).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub categories: Option<String>,
    /// Comma separated.
    #[serde(default)]
    pub tags: Option<String>,
}

/// Decode a rich-text field block by block so one bad block only drops
/// itself, never the entry or the collection.
fn lenient_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match decode_value(&value) {
        Ok(decoded) => Ok(decoded.blocks),
        Err(e) => {
            log::warn!("ignoring entry content: {e}");
            Ok(Vec::new())
        }
    }
}

impl Entry {
    pub fn excerpt(&self) -> &str {
        excerpt(&self.content)
    }

    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

/// Listing filter. Empty fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub query: String,
    pub category: String,
    pub tag: String,
}

impl Filter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let query_ok = self.query.is_empty() || {
            let query = self.query.to_lowercase();
            contains(&entry.title, &query)
                || contains(entry.excerpt(), &query)
                || contains(entry.categories.as_deref().unwrap_or(""), &query)
                || contains(entry.tags.as_deref().unwrap_or(""), &query)
        };
        let category_ok =
            self.category.is_empty() || entry.categories.as_deref() == Some(self.category.as_str());
        let tag_ok = self.tag.is_empty() || entry.tag_list().any(|tag| tag == self.tag);

        query_ok && category_ok && tag_ok
    }

    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub entries: Vec<&'a Entry>,
    /// 1-based.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Filter `entries`, then take 1-based `page` of `per_page` matches.
pub fn list_page<'a>(
    entries: &'a [Entry],
    filter: &Filter,
    page: usize,
    per_page: usize,
) -> Page<'a> {
    let matches = filter.apply(entries);
    Page {
        entries: paginate(&matches, page, per_page).to_vec(),
        page,
        page_count: page_count(matches.len(), per_page),
        total: matches.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: u64,
    pub document_id: String,
    pub title: String,
    pub text: String,
}

/// Entries whose title or excerpt contains `query`, case-insensitively,
/// in input order and at most `limit` of them.
pub fn quick_search(entries: &[Entry], query: &str, limit: usize) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| contains(&entry.title, &query) || contains(entry.excerpt(), &query))
        .take(limit)
        .map(|entry| SearchHit {
            id: entry.id,
            document_id: entry.document_id.clone(),
            title: entry.title.clone(),
            text: entry.excerpt().to_string(),
        })
        .collect()
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Items on 1-based `page`. Out of range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POSTS: &str = r#"{
        "data": [
            {
                "id": 1, "documentId": "a1", "title": "VAT deadlines",
                "content": [{"type":"paragraph","children":[{"text":"File your return on time."}]}],
                "categories": "Tax", "tags": "VAT, Deadlines"
            },
            {
                "id": 2, "documentId": "b2", "title": "Choosing an auditor",
                "content": [{"type":"paragraph","children":[{"text":"What to look for in a VAT audit."}]}],
                "categories": "Audit", "tags": "Audit"
            },
            {
                "id": 3, "documentId": "c3", "title": "Company news",
                "content": null,
                "categories": null, "tags": null
            }
        ],
        "meta": {"pagination": {"page": 1, "pageSize": 25, "pageCount": 1, "total": 3}}
    }"#;

    fn posts() -> Vec<Entry> {
        let collection: Collection<Entry> = serde_json::from_str(POSTS).unwrap();
        assert_eq!(
            collection.meta.pagination,
            Some(Pagination {
                page: 1,
                page_size: 25,
                page_count: 1,
                total: 3,
            })
        );
        collection.data
    }

    fn ids(entries: &[&Entry]) -> Vec<u64> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn quick_search_matches_title_and_excerpt() {
        let posts = posts();
        let hits = quick_search(&posts, "vat", DEFAULT_LIMIT);
        assert_eq!(
            hits.iter().map(|h| h.document_id.as_str()).collect::<Vec<_>>(),
            vec!["a1", "b2"]
        );
        assert_eq!(hits[0].text, "File your return on time.");
    }

    #[test]
    fn quick_search_limit_and_empty_query() {
        let posts = posts();
        assert_eq!(quick_search(&posts, "vat", 1).len(), 1);
        assert!(quick_search(&posts, "", DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn filter_by_query_category_and_tag() {
        let posts = posts();
        let by_query = Filter {
            query: "deadlines".to_string(),
            ..Filter::default()
        };
        assert_eq!(ids(&by_query.apply(&posts)), vec![1]);

        let by_category = Filter {
            category: "Audit".to_string(),
            ..Filter::default()
        };
        assert_eq!(ids(&by_category.apply(&posts)), vec![2]);

        let by_tag = Filter {
            tag: "Deadlines".to_string(),
            ..Filter::default()
        };
        assert_eq!(ids(&by_tag.apply(&posts)), vec![1]);

        assert_eq!(ids(&Filter::default().apply(&posts)), vec![1, 2, 3]);
    }

    #[test]
    fn null_content_has_empty_excerpt() {
        let posts = posts();
        assert_eq!(posts[2].excerpt(), "");
        assert_eq!(posts[2].tag_list().count(), 0);
    }

    #[test]
    fn malformed_block_drops_only_itself() {
        let json = r#"{"data": [
            {"id": 1, "documentId": "a1", "title": "VAT deadlines",
             "content": [{"type":"paragraph","children":[{"text":"File on time."}]}]},
            {"id": 2, "documentId": "b2", "title": "Audit checklist",
             "content": [
                {"type":"paragraph","children":"oops"},
                {"type":"paragraph","children":[{"text":"Prepare your VAT records."}]}
             ]},
            {"id": 3, "documentId": "c3", "title": "Odd", "content": {"type":"paragraph"}}
        ]}"#;
        let collection: Collection<Entry> = serde_json::from_str(json).unwrap();
        let posts = collection.data;
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[1].content.len(), 1);
        assert_eq!(posts[1].excerpt(), "Prepare your VAT records.");
        assert!(posts[2].content.is_empty());

        let hits = quick_search(&posts, "vat", DEFAULT_LIMIT);
        assert_eq!(hits.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn listing_filters_then_pages() {
        let posts = posts();
        let all = list_page(&posts, &Filter::default(), 1, 2);
        assert_eq!(ids(&all.entries), vec![1, 2]);
        assert_eq!((all.page_count, all.total), (2, 3));

        let second = list_page(&posts, &Filter::default(), 2, 2);
        assert_eq!(ids(&second.entries), vec![3]);

        let tax = Filter {
            category: "Tax".to_string(),
            ..Filter::default()
        };
        let page = list_page(&posts, &tax, 1, DEFAULT_PER_PAGE);
        assert_eq!(ids(&page.entries), vec![1]);
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn pagination() {
        let items = [1, 2, 3, 4, 5, 6, 7];
        assert_eq!(page_count(items.len(), DEFAULT_PER_PAGE), 3);
        assert_eq!(paginate(&items, 1, 3), &[1, 2, 3]);
        assert_eq!(paginate(&items, 3, 3), &[7]);
        assert!(paginate(&items, 4, 3).is_empty());
        assert!(paginate(&items, 0, 3).is_empty());
        assert_eq!(page_count(0, 3), 0);
    }
}
