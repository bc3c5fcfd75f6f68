//! CLI Command Handlers
//!
//! Each handler loads the catalog, answers one query and returns an
//! [`ExitCode`]. Catalog and player resolution follow [`Config`] precedence.

use std::sync::Arc;

use serde::Serialize;

use crate::api::{CatalogClient, CatalogSource};
use crate::cli::{ExitCode, InfoCmd, Output, PlayCmd, RowsCmd, SearchCmd};
use crate::config::Config;
use crate::models::{Catalog, Category, Title};
use crate::search::filter_titles;
use crate::stream::{LocalPlayer, PlayerError, PlayerType};

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub catalog: Option<String>,
    pub player: Option<PlayerType>,
}

// =============================================================================
// Catalog loading
// =============================================================================

async fn load_catalog(
    source: CatalogSource,
    output: &Output,
) -> Result<Catalog, ExitCode> {
    output.info(format!("Loading catalog from {}...", source));
    CatalogClient::new(source)
        .fetch()
        .await
        .map_err(|e| output.error(format!("Catalog load failed: {}", e), ExitCode::CatalogLoad))
}

/// One line per title for human output
fn title_line(title: &Title) -> String {
    format!(
        "{:>5}  {} ({})  {}  {}",
        title.id,
        title.title,
        title.year,
        title.rating,
        title.genre_line()
    )
}

fn title_block(title: &Title) -> String {
    format!(
        "{}\n{} • {} • {} • {}\n{}\n\nGenres:  {}\nTrailer: {}",
        title.title,
        title.kind,
        title.year,
        title.rating,
        title.duration,
        title.description,
        title.genre_line(),
        title.trailer_url
    )
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, globals: &Globals, output: &Output) -> ExitCode {
    if cmd.query.is_empty() {
        return output.error("Search query must not be empty", ExitCode::InvalidArgs);
    }

    let config = Config::load();
    let catalog = match load_catalog(config.catalog_source(globals.catalog.as_deref()), output).await
    {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let results = filter_titles(&catalog.flattened(), &cmd.query);
    output.info(format!("{} result(s) for \"{}\"", results.len(), cmd.query));

    let human = || {
        if results.is_empty() {
            return "No results found".to_string();
        }
        results
            .iter()
            .map(|t| title_line(t))
            .collect::<Vec<_>>()
            .join("\n")
    };
    if let Err(e) = output.print(&results, human) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Rows Command
// =============================================================================

/// One category in `rows` output
#[derive(Debug, Serialize)]
pub struct RowOutput<'a> {
    pub key: &'static str,
    pub heading: &'static str,
    pub titles: &'a [Arc<Title>],
}

/// `rows` output: the hero and every category in display order
#[derive(Debug, Serialize)]
pub struct RowsOutput<'a> {
    pub hero: &'a Title,
    pub rows: Vec<RowOutput<'a>>,
}

/// Collect the rows view of a catalog
pub fn rows_of(catalog: &Catalog) -> RowsOutput<'_> {
    RowsOutput {
        hero: catalog.hero.title.as_ref(),
        rows: Category::ALL
            .iter()
            .map(|c| RowOutput {
                key: c.key(),
                heading: c.heading(),
                titles: catalog.row(*c),
            })
            .collect(),
    }
}

pub async fn rows_cmd(_cmd: RowsCmd, globals: &Globals, output: &Output) -> ExitCode {
    let config = Config::load();
    let catalog = match load_catalog(config.catalog_source(globals.catalog.as_deref()), output).await
    {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let rows = rows_of(&catalog);
    let human = || {
        let mut out = format!("Featured: {}\n", title_line(rows.hero).trim_start());
        for row in &rows.rows {
            out.push_str(&format!("\n{} ({})\n", row.heading, row.titles.len()));
            for title in row.titles {
                out.push_str(&title_line(title));
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    };
    if let Err(e) = output.print(&rows, human) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, globals: &Globals, output: &Output) -> ExitCode {
    let config = Config::load();
    let catalog = match load_catalog(config.catalog_source(globals.catalog.as_deref()), output).await
    {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let Some(title) = catalog.find(cmd.id) else {
        return output.error(format!("No title with id {}", cmd.id), ExitCode::NotFound);
    };

    if let Err(e) = output.print(title, || title_block(title)) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Play Command
// =============================================================================

/// `play` result
#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub status: &'static str,
    pub id: u64,
    pub title: String,
    pub player: PlayerType,
}

pub async fn play_cmd(cmd: PlayCmd, globals: &Globals, output: &Output) -> ExitCode {
    let config = Config::load();
    let player_type = config.player_type(globals.player);
    if player_type == PlayerType::None {
        return output.error(PlayerError::Disabled.to_string(), ExitCode::PlayerFailed);
    }

    let catalog = match load_catalog(config.catalog_source(globals.catalog.as_deref()), output).await
    {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let Some(title) = catalog.find(cmd.id) else {
        return output.error(format!("No title with id {}", cmd.id), ExitCode::NotFound);
    };

    let player = LocalPlayer::new(player_type);
    if !player.is_available().await {
        return output.error(
            PlayerError::NotFound(player_type.command().to_string()).to_string(),
            ExitCode::PlayerFailed,
        );
    }

    output.info(format!(
        "Playing {} in {}...",
        title.title,
        player_type.display_name()
    ));

    if let Err(e) = player.play_and_wait(&title.trailer_url, &title.title).await {
        return output.error(format!("Playback failed: {}", e), ExitCode::PlayerFailed);
    }

    let response = PlayResponse {
        status: "finished",
        id: title.id,
        title: title.title.clone(),
        player: player_type,
    };
    let human = || format!("Finished {}", response.title);
    if let Err(e) = output.print(&response, human) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hero, TitleKind};

    fn title(id: u64, name: &str) -> Arc<Title> {
        Arc::new(Title {
            id,
            title: name.into(),
            description: "A film".into(),
            image: String::new(),
            genre: "Drama".into(),
            rating: "PG".into(),
            year: 2020,
            duration: "1h 40m".into(),
            trailer_url: format!("https://cdn.test/{}.mp4", id),
            kind: TitleKind::Movie,
        })
    }

    fn catalog() -> Catalog {
        Catalog {
            trending: vec![title(1, "One"), title(2, "Two")],
            popular: vec![],
            new_releases: vec![title(3, "Three")],
            action_movies: vec![],
            comedy_shows: vec![],
            hero: Hero {
                title: title(9, "Nine"),
                background_image: String::new(),
            },
        }
    }

    fn quiet() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    #[test]
    fn test_rows_of_keeps_category_order() {
        let catalog = catalog();
        let rows = rows_of(&catalog);
        assert_eq!(rows.hero.id, 9);
        let keys: Vec<_> = rows.rows.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            ["trending", "popular", "newReleases", "actionMovies", "comedyShows"]
        );
        assert_eq!(rows.rows[0].titles.len(), 2);
        assert!(rows.rows[1].titles.is_empty());
    }

    #[test]
    fn test_rows_json_shape() {
        let catalog = catalog();
        let value = serde_json::to_value(rows_of(&catalog)).unwrap();
        assert_eq!(value["hero"]["title"], "Nine");
        assert_eq!(value["rows"][2]["heading"], "New Releases");
        assert_eq!(value["rows"][2]["titles"][0]["trailerUrl"], "https://cdn.test/3.mp4");
    }

    #[test]
    fn test_title_line() {
        let line = title_line(&title(42, "Answer"));
        assert_eq!(line, "   42  Answer (2020)  PG  Drama");
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let cmd = SearchCmd { query: "".into() };
        let code = search_cmd(cmd, &Globals::default(), &quiet()).await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_search_accepts_whitespace_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, serde_json::to_string(&catalog()).unwrap()).unwrap();
        let globals = Globals {
            catalog: Some(path.display().to_string()),
            player: None,
        };

        // Same filter as the search box: whitespace is a real query
        let cmd = SearchCmd { query: " ".into() };
        assert_eq!(search_cmd(cmd, &globals, &quiet()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_missing_catalog_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let globals = Globals {
            catalog: Some(dir.path().join("absent.json").display().to_string()),
            player: None,
        };
        let code = rows_cmd(RowsCmd {}, &globals, &quiet()).await;
        assert_eq!(code, ExitCode::CatalogLoad);
    }

    #[tokio::test]
    async fn test_info_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, serde_json::to_string(&catalog()).unwrap()).unwrap();
        let globals = Globals {
            catalog: Some(path.display().to_string()),
            player: None,
        };

        assert_eq!(
            info_cmd(InfoCmd { id: 404 }, &globals, &quiet()).await,
            ExitCode::NotFound
        );
        assert_eq!(
            info_cmd(InfoCmd { id: 9 }, &globals, &quiet()).await,
            ExitCode::Success
        );
    }

    #[tokio::test]
    async fn test_play_with_player_disabled() {
        let globals = Globals {
            catalog: None,
            player: Some(PlayerType::None),
        };
        let code = play_cmd(PlayCmd { id: 1 }, &globals, &quiet()).await;
        assert_eq!(code, ExitCode::PlayerFailed);
    }
}
