//! Case-insensitive text search over the rows shown in the list pages.

/// A record that can be matched against a search term.
pub trait Searchable {
    /// The text fields that the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// Check whether any of the search fields of `item` contain `search`,
/// ignoring case.
///
/// An empty or blank `search` matches everything.
pub fn matches_search<T: Searchable>(item: &T, search: &str) -> bool {
    let needle = search.trim().to_lowercase();

    if needle.is_empty() {
        return true;
    }

    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the items in `items` that match `search`, preserving their order.
pub fn filter_by_search<'a, T: Searchable>(items: &'a [T], search: Option<&str>) -> Vec<&'a T> {
    match search {
        Some(search) => items
            .iter()
            .filter(|item| matches_search(*item, search))
            .collect(),
        None => items.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Searchable, filter_by_search, matches_search};

    struct Item {
        name: &'static str,
        notes: Option<&'static str>,
    }

    impl Searchable for Item {
        fn search_fields(&self) -> Vec<&str> {
            let mut fields = vec![self.name];
            fields.extend(self.notes);
            fields
        }
    }

    #[test]
    fn matches_ignoring_case() {
        let item = Item {
            name: "Maize Flour",
            notes: None,
        };

        assert!(matches_search(&item, "flour"));
        assert!(matches_search(&item, "MAIZE"));
        assert!(!matches_search(&item, "rice"));
    }

    #[test]
    fn matches_any_field() {
        let item = Item {
            name: "Milk",
            notes: Some("Brookside, 500ml"),
        };

        assert!(matches_search(&item, "brookside"));
    }

    #[test]
    fn blank_search_matches_everything() {
        let item = Item {
            name: "Milk",
            notes: None,
        };

        assert!(matches_search(&item, ""));
        assert!(matches_search(&item, "   "));
    }

    #[test]
    fn filter_keeps_order() {
        let items = [
            Item {
                name: "Bread",
                notes: None,
            },
            Item {
                name: "Rice",
                notes: Some("Pishori"),
            },
            Item {
                name: "Brown bread",
                notes: None,
            },
        ];

        let names: Vec<_> = filter_by_search(&items, Some("bread"))
            .into_iter()
            .map(|item| item.name)
            .collect();

        assert_eq!(names, vec!["Bread", "Brown bread"]);
        assert_eq!(filter_by_search(&items, None).len(), 3);
    }
}
