//! Game catalog and the games dialog: which games exist, and which one the
//! player has opened.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::engine::score::HighScoreBook;
use crate::error::ArcadeError;
use crate::games::{self, VariantDesc};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GameVariant {
    LightningDodge,
    SunshineCollector,
    WindSurfer,
}

impl GameVariant {
    /// Stable id used by the host page and in config keys.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn parse(id: &str) -> Result<Self, ArcadeError> {
        id.parse().map_err(|_| ArcadeError::UnknownVariant(id.to_owned()))
    }

    /// Default tuning for this game.
    pub fn descriptor(self) -> VariantDesc {
        match self {
            GameVariant::LightningDodge => games::lightning_dodge::descriptor(),
            GameVariant::SunshineCollector => games::sunshine_collector::descriptor(),
            GameVariant::WindSurfer => games::wind_surfer::descriptor(),
        }
    }

    pub fn all() -> impl Iterator<Item = GameVariant> {
        GameVariant::iter()
    }
}

/// One card in the games dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
    pub best: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameMenu {
    entries: Vec<MenuEntry>,
    selected: Option<GameVariant>,
}

impl GameMenu {
    pub fn new(book: &HighScoreBook) -> Self {
        let entries = GameVariant::all()
            .map(|variant| {
                let desc = variant.descriptor();
                MenuEntry {
                    id: variant.id(),
                    title: desc.title,
                    blurb: desc.blurb,
                    best: book.best(desc.storage_key),
                }
            })
            .collect();
        Self { entries, selected: None }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn select(&mut self, id: &str) -> Result<GameVariant, ArcadeError> {
        let variant = GameVariant::parse(id)?;
        self.selected = Some(variant);
        Ok(variant)
    }

    pub fn selected(&self) -> Option<GameVariant> {
        self.selected
    }

    /// Back to the list.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Reflect a finished game's high score on its card.
    pub fn record(&mut self, variant: GameVariant, best: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == variant.id()) {
            entry.best = entry.best.max(best);
        }
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}
