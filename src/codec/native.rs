//! Native splits document schema
//!
//! Mirrors the persisted layout field for field. Every field is optional on read.
//! On write, top-level fields are emitted only when present and non-zero, while
//! every split always carries `time`, `best_time` and `best_segment` (`"0"` when
//! unset) so a missing best is never defaulted from the reference on reload.

use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Result;
use crate::game::{Game, GameSplit, allocate_splits};
use crate::time::{parse_stored, to_stored};
use crate::types::{Micros, is_set};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NativeDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    attempt_count: u32,
    #[serde(skip_serializing_if = "is_zero")]
    finished_count: u32,
    #[serde(
        deserialize_with = "world_record",
        serialize_with = "stored_time",
        skip_serializing_if = "Option::is_none"
    )]
    world_record: Option<Micros>,
    #[serde(
        deserialize_with = "start_delay",
        serialize_with = "stored_time",
        skip_serializing_if = "Option::is_none"
    )]
    start_delay: Option<Micros>,
    splits: Vec<NativeSplit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme_variant: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    width: u32,
    #[serde(skip_serializing_if = "is_zero")]
    height: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NativeSplit {
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(deserialize_with = "split_time", serialize_with = "stored_time")]
    time: Option<Micros>,
    #[serde(deserialize_with = "best_time", serialize_with = "stored_time")]
    best_time: Option<Micros>,
    #[serde(deserialize_with = "best_segment", serialize_with = "stored_time")]
    best_segment: Option<Micros>,
}

impl NativeDocument {
    /// Build the in-memory game, deriving segments and defaulting missing bests.
    pub(crate) fn into_game(self, path: PathBuf) -> Result<Game> {
        let mut splits = allocate_splits(self.splits.len())?;
        let mut bests = Vec::new();
        bests
            .try_reserve_exact(self.splits.len())
            .map_err(|_| crate::SplitsError::out_of_memory("document bests", self.splits.len()))?;

        for split in self.splits {
            bests.push((split.best_time, split.best_segment));
            splits.push(GameSplit {
                title: split.title,
                time: split.time.unwrap_or_default(),
                ..Default::default()
            });
        }

        let mut game = Game::from_splits(path, splits);
        game.title = self.title;
        game.theme = self.theme;
        game.theme_variant = self.theme_variant;
        game.width = self.width;
        game.height = self.height;
        game.attempt_count = self.attempt_count;
        game.finished_count = self.finished_count;
        game.world_record = self.world_record.unwrap_or_default();
        game.start_delay = self.start_delay.unwrap_or_default();

        game.derive_segments();
        for (split, (best_time, best_segment)) in game.splits_mut().iter_mut().zip(bests) {
            split.best_time = best_time.unwrap_or(split.time);
            split.best_segment = best_segment.unwrap_or(split.segment);
        }
        Ok(game)
    }

    pub(crate) fn from_game(game: &Game) -> Self {
        Self {
            title: game.title.clone(),
            attempt_count: game.attempt_count,
            finished_count: game.finished_count,
            world_record: present(game.world_record),
            start_delay: present(game.start_delay),
            splits: game
                .splits()
                .iter()
                .map(|split| NativeSplit {
                    title: split.title.clone(),
                    time: Some(split.time),
                    best_time: Some(split.best_time),
                    best_segment: Some(split.best_segment),
                })
                .collect(),
            theme: game.theme.clone(),
            theme_variant: game.theme_variant.clone(),
            width: game.width,
            height: game.height,
        }
    }
}

fn present(time: Micros) -> Option<Micros> {
    is_set(time).then_some(time)
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn stored_time<S: Serializer>(time: &Option<Micros>, serializer: S) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => serializer.serialize_str(&to_stored(*time)),
        None => serializer.serialize_none(),
    }
}

fn world_record<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Micros>, D::Error> {
    d.deserialize_any(TimeVisitor { field: "world_record" })
}

fn start_delay<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Micros>, D::Error> {
    d.deserialize_any(TimeVisitor { field: "start_delay" })
}

fn split_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Micros>, D::Error> {
    d.deserialize_any(TimeVisitor { field: "time" })
}

fn best_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Micros>, D::Error> {
    d.deserialize_any(TimeVisitor { field: "best_time" })
}

fn best_segment<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Micros>, D::Error> {
    d.deserialize_any(TimeVisitor { field: "best_segment" })
}

/// Accepts a time string (raw or human form), a bare integer, or null.
struct TimeVisitor {
    field: &'static str,
}

impl<'de> Visitor<'de> for TimeVisitor {
    type Value = Option<Micros>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a time string for `{}`", self.field)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_stored(v)
            .map(Some)
            .map_err(|e| E::custom(format!("invalid `{}`: {}", self.field, e)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(Some)
            .map_err(|_| E::custom(format!("invalid `{}`: {} is out of range", self.field, v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}
