//! Render model for the character screen.
//!
//! # Design
//! `ScreenView` is what the host draws, already decided: which panels exist,
//! which avatars to request, which film lines to show. The host maps it onto
//! native widgets (image views, gradient, virtualized list) and never has to
//! re-derive the rules. `to_text` renders the same model as plain text for
//! terminals and tests.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::screen::{CharacterScreen, ScreenPhase};
use crate::types::Character;

pub const LOADING_MESSAGE: &str = "Loading characters...";
pub const FEATURED_LABEL: &str = "Featured Character";
pub const RANDOMIZE_LABEL: &str = "🎲 Pick random";
pub const FILMS_LABEL: &str = "Featured In";
/// Film titles shown per row before collapsing into `+N more`.
pub const MAX_FILMS_SHOWN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    /// Only the loading indicator is shown.
    Loading { message: &'static str },
    Ready {
        featured: Option<FeaturedPanel>,
        rows: Vec<CharacterRow>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedPanel {
    pub label: &'static str,
    pub avatar_url: Option<String>,
    pub name: String,
    pub button_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRow {
    /// List identity key. Upstream ids are unique; duplicates still render.
    pub key: String,
    pub avatar_url: Option<String>,
    pub name: String,
    pub films: Option<FilmsSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmsSection {
    pub label: &'static str,
    pub titles: Vec<String>,
    /// Films not listed in `titles`.
    pub remaining: usize,
}

impl FilmsSection {
    /// `None` for a character without films.
    pub fn for_films(films: &[String]) -> Option<Self> {
        if films.is_empty() {
            return None;
        }
        let shown = films.len().min(MAX_FILMS_SHOWN);
        Some(Self {
            label: FILMS_LABEL,
            titles: films[..shown].to_vec(),
            remaining: films.len() - shown,
        })
    }

    pub fn more_label(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("+{} more", self.remaining))
    }
}

impl FeaturedPanel {
    fn for_character(character: &Character) -> Self {
        Self {
            label: FEATURED_LABEL,
            avatar_url: character.image_url.clone(),
            name: character.name.clone(),
            button_label: RANDOMIZE_LABEL,
        }
    }
}

impl From<&Character> for CharacterRow {
    fn from(character: &Character) -> Self {
        Self {
            key: character.list_key(),
            avatar_url: character.image_url.clone(),
            name: character.name.clone(),
            films: FilmsSection::for_films(&character.films),
        }
    }
}

impl From<&CharacterScreen> for ScreenView {
    fn from(screen: &CharacterScreen) -> Self {
        match screen.phase() {
            // Idle only lasts until the mount effect runs.
            ScreenPhase::Idle | ScreenPhase::Loading => ScreenView::Loading {
                message: LOADING_MESSAGE,
            },
            ScreenPhase::Ready => ScreenView::Ready {
                featured: screen.featured().map(FeaturedPanel::for_character),
                rows: screen.characters().iter().map(CharacterRow::from).collect(),
            },
        }
    }
}

/// Cut `text` to at most `width` display columns, ending in `…` when cut.
pub fn truncate_line(text: &str, width: usize) -> String {
    let visible = text.trim_end_matches(['\r', '\n']);
    let line = visible.lines().next().unwrap_or("");
    if line.width() <= width && line.len() == visible.len() {
        return line.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Plain-text rendering of `view`, `width` columns wide.
pub fn to_text(view: &ScreenView, width: usize) -> String {
    let mut out = String::new();
    match view {
        ScreenView::Loading { message } => {
            out.push_str(message);
            out.push('\n');
        }
        ScreenView::Ready { featured, rows } => {
            if let Some(panel) = featured {
                out.push_str(&format!("[{}]\n", panel.label.to_uppercase()));
                if let Some(url) = &panel.avatar_url {
                    out.push_str(&format!("(image {url})\n"));
                }
                out.push_str(&truncate_line(&panel.name, width));
                out.push('\n');
                out.push_str(&format!("< {} >\n\n", panel.button_label));
            }
            for row in rows {
                out.push_str(&truncate_line(&row.name, width));
                out.push('\n');
                if let Some(films) = &row.films {
                    out.push_str(&format!("  {}\n", films.label.to_uppercase()));
                    for title in &films.titles {
                        out.push_str(&format!("  •{}\n", truncate_line(title, width.saturating_sub(3))));
                    }
                    if let Some(more) = films.more_label() {
                        out.push_str(&format!("  {more}\n"));
                    }
                }
            }
        }
    }
    out
}
