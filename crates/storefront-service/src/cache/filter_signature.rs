//! Canonical encoding of the query parameters that shape a product list.

use std::fmt;
use storefront_core::{PageRequest, ProductFilter};
use url::form_urlencoded;

/// The recognized list parameters as sorted, form-urlencoded pairs.
///
/// Two requests share a cache entry exactly when their signatures are
/// equal. The encoding never contains `:`, so it is a single key segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSignature(String);

impl FilterSignature {
    /// Builds the signature of a normalized filter and page.
    #[must_use]
    pub fn new(filter: &ProductFilter, page: PageRequest) -> Self {
        let mut pairs: Vec<(&str, String)> = vec![
            ("ordering", filter.ordering.to_string()),
            ("page", page.page.to_string()),
            ("size", page.size.to_string()),
        ];
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            pairs.push(("q", term.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            pairs.push(("category", category_id.to_string()));
        }
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        Self(encoded)
    }

    /// The encoded signature.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CategoryId, ProductOrdering};

    fn filter(search: Option<&str>, category: Option<i64>, ordering: &str) -> ProductFilter {
        ProductFilter {
            search: search.map(ToString::to_string),
            category_id: category.map(CategoryId),
            ordering: ProductOrdering::parse(ordering).unwrap(),
        }
    }

    #[test]
    fn test_sorted_and_encoded() {
        let signature = FilterSignature::new(&filter(Some("desk lamp"), Some(3), "price"), PageRequest::new(2, 10));
        assert_eq!(signature.as_str(), "category=3&ordering=price&page=2&q=desk+lamp&size=10");
    }

    #[test]
    fn test_defaults() {
        let signature = FilterSignature::new(&ProductFilter::default(), PageRequest::first());
        assert_eq!(signature.as_str(), "ordering=-created_at&page=1&size=20");
    }

    #[test]
    fn test_every_field_changes_signature() {
        let base = FilterSignature::new(&filter(Some("lamp"), Some(1), "price"), PageRequest::new(1, 20));
        let variants = [
            FilterSignature::new(&filter(Some("lamps"), Some(1), "price"), PageRequest::new(1, 20)),
            FilterSignature::new(&filter(None, Some(1), "price"), PageRequest::new(1, 20)),
            FilterSignature::new(&filter(Some("lamp"), Some(2), "price"), PageRequest::new(1, 20)),
            FilterSignature::new(&filter(Some("lamp"), None, "price"), PageRequest::new(1, 20)),
            FilterSignature::new(&filter(Some("lamp"), Some(1), "-price"), PageRequest::new(1, 20)),
            FilterSignature::new(&filter(Some("lamp"), Some(1), "price"), PageRequest::new(2, 20)),
            FilterSignature::new(&filter(Some("lamp"), Some(1), "price"), PageRequest::new(1, 50)),
        ];
        for variant in &variants {
            assert_ne!(&base, variant);
        }
    }

    #[test]
    fn test_separator_characters_are_encoded() {
        let signature = FilterSignature::new(&filter(Some("a:b&c=d"), None, "name"), PageRequest::first());
        assert!(!signature.as_str().contains(':'));
        assert!(signature.as_str().contains("q=a%3Ab%26c%3Dd"));
    }

    #[test]
    fn test_blank_search_ignored() {
        let blank = FilterSignature::new(&filter(Some("   "), None, "-created_at"), PageRequest::first());
        let none = FilterSignature::new(&ProductFilter::default(), PageRequest::first());
        assert_eq!(blank, none);
    }
}
