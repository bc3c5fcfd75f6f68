//! Data structures for the Marquee catalog
//!
//! Contains the shared models used across the application:
//! - **Catalog**: titles, the hero, and the five fixed categories
//! - **Playback**: play intents and where they came from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Catalog Models
// =============================================================================

/// Movie or series discriminator (`"type"` in the catalog document)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Series,
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleKind::Movie => write!(f, "Movie"),
            TitleKind::Series => write!(f, "Series"),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub image: String,
    /// Space separated genre tags, e.g. "Sci-Fi Thriller"
    pub genre: String,
    pub rating: String,
    pub year: u16,
    /// Display string such as "2h 15m" or "3 Seasons"
    pub duration: String,
    pub trailer_url: String,
    #[serde(rename = "type")]
    pub kind: TitleKind,
}

impl Title {
    /// Individual genre tags
    pub fn genre_tags(&self) -> impl Iterator<Item = &str> {
        self.genre.split_whitespace()
    }

    /// Genre tags joined for card display ("Action • Thriller")
    pub fn genre_line(&self) -> String {
        self.genre_tags().collect::<Vec<_>>().join(" • ")
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.year, self.kind)
    }
}

/// The featured title, carrying its own background artwork
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    #[serde(flatten)]
    pub title: Arc<Title>,
    pub background_image: String,
}

/// The five fixed catalog rows, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Trending,
    Popular,
    NewReleases,
    ActionMovies,
    ComedyShows,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Trending,
        Category::Popular,
        Category::NewReleases,
        Category::ActionMovies,
        Category::ComedyShows,
    ];

    /// Row heading shown above the cards
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Trending => "Trending Now",
            Category::Popular => "Popular on Marquee",
            Category::NewReleases => "New Releases",
            Category::ActionMovies => "Action Movies",
            Category::ComedyShows => "Comedy Shows",
        }
    }

    /// Key used in the catalog document
    pub fn key(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::Popular => "popular",
            Category::NewReleases => "newReleases",
            Category::ActionMovies => "actionMovies",
            Category::ComedyShows => "comedyShows",
        }
    }

    /// Position in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// The full catalog document.
///
/// Titles are held behind `Arc` so views and the player can share read-only
/// handles without copying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub trending: Vec<Arc<Title>>,
    pub popular: Vec<Arc<Title>>,
    pub new_releases: Vec<Arc<Title>>,
    pub action_movies: Vec<Arc<Title>>,
    pub comedy_shows: Vec<Arc<Title>>,
    pub hero: Hero,
}

impl Catalog {
    /// Titles in one category
    pub fn row(&self, category: Category) -> &[Arc<Title>] {
        match category {
            Category::Trending => &self.trending,
            Category::Popular => &self.popular,
            Category::NewReleases => &self.new_releases,
            Category::ActionMovies => &self.action_movies,
            Category::ComedyShows => &self.comedy_shows,
        }
    }

    /// All row titles concatenated in category order.
    ///
    /// A title listed in two categories appears twice.
    pub fn flattened(&self) -> Vec<Arc<Title>> {
        Category::ALL
            .iter()
            .flat_map(|c| self.row(*c).iter().cloned())
            .collect()
    }

    /// First title with the given id, searching the hero last
    pub fn find(&self, id: u64) -> Option<&Arc<Title>> {
        Category::ALL
            .iter()
            .flat_map(|c| self.row(*c).iter())
            .find(|t| t.id == id)
            .or_else(|| (self.hero.title.id == id).then_some(&self.hero.title))
    }
}

// =============================================================================
// Playback Models
// =============================================================================

/// Where a play intent was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayOrigin {
    Hero,
    Row(Category),
    SearchResult,
    Cli,
}

/// A request to play one title's trailer
#[derive(Debug, Clone)]
pub struct PlayIntent {
    pub title: Arc<Title>,
    pub origin: PlayOrigin,
    /// Autoplay intents start muted, explicit ones do not
    pub autoplay: bool,
}

impl PlayIntent {
    /// User asked to play
    pub fn explicit(title: Arc<Title>, origin: PlayOrigin) -> Self {
        Self {
            title,
            origin,
            autoplay: false,
        }
    }

    /// Playback started without a user request
    pub fn autoplay(title: Arc<Title>, origin: PlayOrigin) -> Self {
        Self {
            title,
            origin,
            autoplay: true,
        }
    }
}
