//! Catalog store
//!
//! Holds the catalog once it has loaded. Consumers only reach the catalog
//! through [`CatalogStore::catalog`], so nothing can read derived views while
//! the store is still loading.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::{CatalogClient, CatalogError};
use crate::models::{Catalog, Category, Hero, Title};

/// Load progress of the catalog
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CatalogState {
    /// Fetch in flight (or never resolved)
    #[default]
    Loading,
    /// Catalog available
    Ready(Arc<Catalog>),
    /// Fetch failed. Still not ready; there is no retry.
    Failed(String),
}

/// Owner of the loaded catalog
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: CatalogState,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that is already ready (CLI and tests)
    pub fn ready(catalog: Catalog) -> Self {
        Self {
            state: CatalogState::Ready(Arc::new(catalog)),
        }
    }

    /// Fetch the catalog once and apply the result
    pub async fn load(&mut self, client: &CatalogClient) {
        info!(source = %client.source(), "loading catalog");
        let result = client.fetch().await;
        self.apply(result);
    }

    /// Apply the outcome of a fetch.
    ///
    /// A ready store ignores later results: the catalog is loaded exactly once.
    pub fn apply(&mut self, result: Result<Catalog, CatalogError>) {
        if self.is_ready() {
            warn!("catalog already loaded, ignoring second load result");
            return;
        }

        match result {
            Ok(catalog) => {
                let total: usize = Category::ALL.iter().map(|c| catalog.row(*c).len()).sum();
                info!(titles = total, hero = %catalog.hero.title.title, "catalog ready");
                self.state = CatalogState::Ready(Arc::new(catalog));
            }
            Err(e) => {
                error!(error = %e, "error loading catalog");
                self.state = CatalogState::Failed(e.to_string());
            }
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, CatalogState::Ready(_))
    }

    /// The loaded catalog, or `None` while not ready
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match &self.state {
            CatalogState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// Flattened titles across all rows (empty while not ready)
    pub fn flattened_titles(&self) -> Vec<Arc<Title>> {
        self.catalog().map(|c| c.flattened()).unwrap_or_default()
    }

    /// Titles of one row (empty while not ready)
    pub fn row(&self, category: Category) -> &[Arc<Title>] {
        self.catalog().map(|c| c.row(category)).unwrap_or(&[])
    }

    pub fn hero(&self) -> Option<&Hero> {
        self.catalog().map(|c| &c.hero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleKind;

    fn title(id: u64, name: &str) -> Arc<Title> {
        Arc::new(Title {
            id,
            title: name.into(),
            description: String::new(),
            image: String::new(),
            genre: "Drama".into(),
            rating: "PG".into(),
            year: 2020,
            duration: "1h 40m".into(),
            trailer_url: format!("https://media.example/{}.mp4", id),
            kind: TitleKind::Movie,
        })
    }

    fn catalog() -> Catalog {
        Catalog {
            trending: vec![title(1, "One"), title(2, "Two")],
            popular: vec![title(2, "Two"), title(3, "Three")],
            new_releases: vec![title(4, "Four")],
            action_movies: vec![],
            comedy_shows: vec![title(5, "Five")],
            hero: Hero {
                title: title(9, "Nine"),
                background_image: "bg.jpg".into(),
            },
        }
    }

    #[test]
    fn test_store_starts_loading() {
        let store = CatalogStore::new();
        assert!(!store.is_ready());
        assert!(store.catalog().is_none());
        assert!(store.flattened_titles().is_empty());
        assert!(store.hero().is_none());
    }

    #[test]
    fn test_flattened_keeps_order_and_duplicates() {
        let store = CatalogStore::ready(catalog());
        let ids: Vec<u64> = store.flattened_titles().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 2, 3, 4, 5]);
    }

    #[test]
    fn test_failure_stays_not_ready() {
        let mut store = CatalogStore::new();
        store.apply(Err(CatalogError::Status(404)));
        assert!(!store.is_ready());
        assert!(matches!(store.state(), CatalogState::Failed(_)));
        assert!(store.row(Category::Trending).is_empty());
    }

    #[test]
    fn test_second_load_is_ignored() {
        let mut store = CatalogStore::new();
        store.apply(Ok(catalog()));
        let mut other = catalog();
        other.trending.clear();
        store.apply(Ok(other));
        assert_eq!(store.row(Category::Trending).len(), 2);

        store.apply(Err(CatalogError::Status(500)));
        assert!(store.is_ready());
    }

    #[test]
    fn test_find_falls_back_to_hero() {
        let c = catalog();
        assert_eq!(c.find(3).map(|t| t.title.as_str()), Some("Three"));
        assert_eq!(c.find(9).map(|t| t.title.as_str()), Some("Nine"));
        assert!(c.find(42).is_none());
    }
}
