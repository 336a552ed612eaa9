//! Category filtering of a fetched catalog.

use crate::types::{Category, Product};

/// The category selection applied to a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No narrowing; the synthetic `"all"` selection.
    #[default]
    All,
    /// Only products whose category equals this label.
    Only(Category),
}

impl CategoryFilter {
    /// Interpret a selection label. `"all"`, an empty label or no selection
    /// means no filter.
    #[must_use]
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection {
            None | Some("" | Category::ALL) => Self::All,
            Some(label) => Self::Only(Category::new(label)),
        }
    }

    /// The products of `catalog` matching this selection, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        match self {
            Self::All => catalog.iter().collect(),
            Self::Only(category) => catalog
                .iter()
                .filter(|p| &p.category == category)
                .collect(),
        }
    }

    /// The selection as a category tab.
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::All => Category::all(),
            Self::Only(category) => category.clone(),
        }
    }

    /// Whether `tab` is the active selection.
    #[must_use]
    pub fn is_selected(&self, tab: &Category) -> bool {
        match self {
            Self::All => tab.is_all(),
            Self::Only(category) => category == tab,
        }
    }
}

/// Category tabs in display order: `["all", ...categories]`.
#[must_use]
pub fn category_tabs(categories: &[Category]) -> Vec<Category> {
    std::iter::once(Category::all())
        .chain(categories.iter().cloned())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Price, ProductId};

    fn product(id: i32, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::from(id)).unwrap(),
            category: Category::new(category),
            image: String::new(),
            description: String::new(),
            rating: None,
        }
    }

    /// Five products across two categories.
    fn fixture() -> Vec<Product> {
        vec![
            product(1, "electronics"),
            product(2, "jewelery"),
            product(3, "electronics"),
            product(4, "jewelery"),
            product(5, "electronics"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_each_category_returns_matching_subset() {
        let catalog = fixture();
        let electronics = CategoryFilter::from_selection(Some("electronics")).apply(&catalog);
        let jewelery = CategoryFilter::from_selection(Some("jewelery")).apply(&catalog);

        assert_eq!(ids(&electronics), vec![1, 3, 5]);
        assert_eq!(ids(&jewelery), vec![2, 4]);
    }

    #[test]
    fn test_category_subsets_partition_catalog() {
        let catalog = fixture();
        let mut seen: Vec<i32> = ["electronics", "jewelery"]
            .iter()
            .flat_map(|c| ids(&CategoryFilter::from_selection(Some(*c)).apply(&catalog)))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_all_returns_full_catalog_after_any_selection() {
        let catalog = fixture();
        for previous in ["jewelery", "electronics", "unknown"] {
            let narrowed = CategoryFilter::from_selection(Some(previous)).apply(&catalog);
            assert!(narrowed.len() < catalog.len());

            let all = CategoryFilter::from_selection(Some("all")).apply(&catalog);
            assert_eq!(ids(&all), vec![1, 2, 3, 4, 5]);
        }
        assert_eq!(CategoryFilter::from_selection(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_selection(Some("")), CategoryFilter::All);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let catalog = fixture();
        assert!(
            CategoryFilter::from_selection(Some("books"))
                .apply(&catalog)
                .is_empty()
        );
    }

    #[test]
    fn test_tabs_start_with_all() {
        let tabs = category_tabs(&[Category::new("electronics"), Category::new("jewelery")]);
        let labels: Vec<_> = tabs.iter().map(Category::as_str).collect();
        assert_eq!(labels, vec!["all", "electronics", "jewelery"]);

        assert_eq!(category_tabs(&[]), vec![Category::all()]);
    }

    #[test]
    fn test_is_selected() {
        let all = CategoryFilter::All;
        assert!(all.is_selected(&Category::all()));
        assert!(!all.is_selected(&Category::new("jewelery")));

        let only = CategoryFilter::from_selection(Some("jewelery"));
        assert!(only.is_selected(&Category::new("jewelery")));
        assert!(!only.is_selected(&Category::all()));
        assert_eq!(only.category(), Category::new("jewelery"));
    }
}
