//! Loads creature tables and extra dungeons from JSON data files.
//!
//! A data directory may hold:
//! - `monsters.json`: map of template id to creature
//! - `bosses.json`: same shape, for mini and final bosses
//! - `dungeons.json`: optional list of dungeon templates added to the built-ins
//!
//! Tables may also be wrapped, e.g. `{"monsters": {...}}`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use delve_domain::{CreatureTemplate, DungeonTemplate, TemplateId};

use crate::entities::templates::builtin_dungeons;
use crate::entities::TemplateStore;

#[derive(Debug, thiserror::Error)]
pub enum TemplateLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn read_json(path: &Path) -> Result<serde_json::Value, TemplateLoadError> {
    let bytes = fs::read(path).map_err(|source| TemplateLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| TemplateLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a creature table. Entries without an id take their map key.
pub fn load_creature_table(
    path: &Path,
    wrapper: &str,
) -> Result<BTreeMap<TemplateId, CreatureTemplate>, TemplateLoadError> {
    let mut value = read_json(path)?;
    if let Some(inner) = value.get_mut(wrapper) {
        value = inner.take();
    }

    let raw: BTreeMap<String, CreatureTemplate> =
        serde_json::from_value(value).map_err(|source| TemplateLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(raw
        .into_iter()
        .map(|(key, mut template)| {
            if template.id.is_empty() {
                template.id = TemplateId::new(key.clone());
            }
            (TemplateId::new(key), template)
        })
        .collect())
}

pub fn load_dungeon_list(path: &Path) -> Result<Vec<DungeonTemplate>, TemplateLoadError> {
    let value = read_json(path)?;
    serde_json::from_value(value).map_err(|source| TemplateLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the template store from a data directory. Missing or broken files
/// leave the corresponding table empty, which routes lookups to the
/// built-in fallback creatures.
pub fn load_template_store(data_dir: &Path) -> TemplateStore {
    let monsters = load_or_empty(&data_dir.join("monsters.json"), "monsters");
    let bosses = load_or_empty(&data_dir.join("bosses.json"), "bosses");

    let mut dungeons = builtin_dungeons();
    let extra_path = data_dir.join("dungeons.json");
    if extra_path.exists() {
        match load_dungeon_list(&extra_path) {
            Ok(extra) => {
                tracing::info!(count = extra.len(), "Loaded extra dungeons");
                for dungeon in extra {
                    dungeons.retain(|existing| existing.id != dungeon.id);
                    dungeons.push(dungeon);
                }
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring dungeon data file"),
        }
    }

    tracing::info!(
        monsters = monsters.len(),
        bosses = bosses.len(),
        dungeons = dungeons.len(),
        data_dir = %data_dir.display(),
        "Templates loaded"
    );
    TemplateStore::new(dungeons, monsters, bosses)
}

fn load_or_empty(path: &Path, wrapper: &str) -> BTreeMap<TemplateId, CreatureTemplate> {
    match load_creature_table(path, wrapper) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(error = %e, "Creature table unavailable, using fallback creatures");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TemplateSource;
    use delve_domain::DungeonId;

    #[test]
    fn loads_bundled_data_files() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let store = load_template_store(&data_dir);

        assert!(store.monster_table_loaded());
        assert!(store.boss_table_loaded());
        for dungeon in store.dungeons() {
            for id in &dungeon.possible_monsters {
                assert!(store.monster(id).is_some(), "{} missing monster {}", dungeon.id, id);
            }
            for id in dungeon
                .possible_mini_bosses
                .iter()
                .chain(dungeon.possible_final_bosses.iter())
            {
                assert!(store.boss(id).is_some(), "{} missing boss {}", dungeon.id, id);
            }
        }
    }

    #[test]
    fn wrapped_table_and_key_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("monsters.json");
        fs::write(
            &path,
            r#"{"monsters":{"bat":{"name":"Bat","hp":40,"atk":6,"def":1,"attribute":"dark"}}}"#,
        )
        .expect("write");

        let table = load_creature_table(&path, "monsters").expect("load");
        let bat = table.get(&TemplateId::from("bat")).expect("bat");
        assert_eq!(bat.id, TemplateId::from("bat"));
        assert_eq!(bat.hp, 40);
    }

    #[test]
    fn missing_directory_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = load_template_store(&dir.path().join("absent"));

        assert!(!store.monster_table_loaded());
        let (_, source) = store.monster(&TemplateId::from("wolf")).expect("wolf");
        assert_eq!(source, TemplateSource::Fallback);
    }

    #[test]
    fn when_table_malformed_returns_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bosses.json");
        fs::write(&path, r#"{"dragon": {"name": "Dragon"}}"#).expect("write");

        assert!(matches!(
            load_creature_table(&path, "bosses"),
            Err(TemplateLoadError::Parse { .. })
        ));
    }

    #[test]
    fn extra_dungeons_override_builtins() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("dungeons.json"),
            r#"[{"id":"forest_cave","name":"Quiet Cave","level":1,"monsterCount":{"min":1,"max":1}}]"#,
        )
        .expect("write");

        let store = load_template_store(dir.path());
        let forest = store.dungeon(&DungeonId::from("forest_cave")).expect("forest");
        assert_eq!(forest.name, "Quiet Cave");
        assert_eq!(store.dungeons().len(), 3);
    }
}
