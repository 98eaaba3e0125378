//! Routine templates and shop items
//!
//! The catalog is loaded once at startup and never mutated. It either comes
//! from a YAML file or from the built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};

/// A single chore within a routine template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChoreDefinition {
    pub id: String,
    pub title: String,
    /// Estimated time to complete in minutes
    #[serde(default)]
    pub estimated_time: u32,
    #[serde(default)]
    pub image_ref: String,
    /// Points awarded on completion
    #[serde(default)]
    pub points: u32,
}

/// A recurring routine made of ordered chores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutineTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub chores: Vec<ChoreDefinition>,
}

impl RoutineTemplate {
    /// Points available if every chore is completed
    pub fn total_points(&self) -> u64 {
        self.chores.iter().map(|c| u64::from(c.points)).sum()
    }

    /// Sum of estimated chore minutes
    pub fn estimated_minutes(&self) -> u64 {
        self.chores.iter().map(|c| u64::from(c.estimated_time)).sum()
    }
}

/// Something that can be bought with points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShopItem {
    pub id: String,
    pub title: String,
    /// Cost in points
    pub points: u32,
    #[serde(default)]
    pub image_ref: String,
}

/// Immutable routine and shop catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    routines: Vec<RoutineTemplate>,
    #[serde(default)]
    shop: Vec<ShopItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(routines: Vec<RoutineTemplate>, shop: Vec<ShopItem>) -> LedgerResult<Self> {
        let catalog = Self { routines, shop };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a YAML file
    pub fn load(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        debug!(?path, "Catalog::load: called");
        let content = fs::read_to_string(path)?;
        let catalog: Self = serde_yaml::from_str(&content)?;
        catalog.validate()?;
        info!(
            routines = catalog.routines.len(),
            shop_items = catalog.shop.len(),
            "Loaded catalog from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Load from `path` if given, otherwise use the built-in catalog
    pub fn load_or_default(path: Option<&Path>) -> LedgerResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> LedgerResult<()> {
        let mut template_ids = HashSet::new();
        for template in &self.routines {
            if !template_ids.insert(template.id.as_str()) {
                return Err(LedgerError::InvalidCatalog(format!("duplicate routine id: {}", template.id)));
            }
            let mut chore_ids = HashSet::new();
            for chore in &template.chores {
                if !chore_ids.insert(chore.id.as_str()) {
                    return Err(LedgerError::InvalidCatalog(format!(
                        "duplicate chore id {} in routine {}",
                        chore.id, template.id
                    )));
                }
            }
        }

        let mut item_ids = HashSet::new();
        for item in &self.shop {
            if !item_ids.insert(item.id.as_str()) {
                return Err(LedgerError::InvalidCatalog(format!("duplicate shop item id: {}", item.id)));
            }
        }
        Ok(())
    }

    pub fn templates(&self) -> &[RoutineTemplate] {
        &self.routines
    }

    pub fn template(&self, id: &str) -> Option<&RoutineTemplate> {
        self.routines.iter().find(|t| t.id == id)
    }

    pub fn shop_items(&self) -> &[ShopItem] {
        &self.shop
    }

    pub fn shop_item(&self, id: &str) -> Option<&ShopItem> {
        self.shop.iter().find(|i| i.id == id)
    }
}

fn chore(id: &str, title: &str, estimated_time: u32, image_ref: &str, points: u32) -> ChoreDefinition {
    ChoreDefinition {
        id: id.to_string(),
        title: title.to_string(),
        estimated_time,
        image_ref: image_ref.to_string(),
        points,
    }
}

fn item(id: &str, title: &str, points: u32, image_ref: &str) -> ShopItem {
    ShopItem {
        id: id.to_string(),
        title: title.to_string(),
        points,
        image_ref: image_ref.to_string(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let routines = vec![
            RoutineTemplate {
                id: "morning".to_string(),
                title: "Morgenrutine".to_string(),
                image_ref: "img/morning.png".to_string(),
                chores: vec![
                    chore("brush-teeth-morning", "Børst tænder", 5, "img/brush-teeth.png", 5),
                    chore("get-dressed", "Tag tøj på", 10, "img/get-dressed.png", 10),
                    chore("pack-lunch", "Pak madkasse", 10, "img/lunch-box.png", 15),
                    chore("eat-breakfast", "Spis morgenmad", 15, "img/breakfast.png", 10),
                    chore("leave-house", "Kom ud af døren", 5, "img/door.png", 5),
                ],
            },
            RoutineTemplate {
                id: "before-dinner".to_string(),
                title: "Før aftensmad".to_string(),
                image_ref: "img/afternoon.png".to_string(),
                chores: vec![
                    chore("wash-hands", "Vask hænder", 2, "img/wash-hands.png", 5),
                    chore("set-table", "Dæk bordet", 10, "img/set-table.png", 15),
                    chore("help-cooking", "Hjælp med madlavning", 20, "img/cooking.png", 25),
                ],
            },
            RoutineTemplate {
                id: "after-dinner".to_string(),
                title: "Efter aftensmad".to_string(),
                image_ref: "img/afternoon.png".to_string(),
                chores: vec![
                    chore("clear-table", "Ryd bordet", 5, "img/clear-table.png", 10),
                    chore("load-dishwasher", "Fyld opvaskemaskinen", 10, "img/dishwasher.png", 15),
                    chore("wipe-counters", "Tør køkkenbordet af", 5, "img/wipe-counter.png", 10),
                ],
            },
            RoutineTemplate {
                id: "bedtime".to_string(),
                title: "Sengetid".to_string(),
                image_ref: "img/bedtime.png".to_string(),
                chores: vec![
                    chore("brush-teeth-night", "Børst tænder", 5, "img/brush-teeth.png", 5),
                    chore("pajamas", "Tag nattøj på", 5, "img/pajamas.png", 5),
                    chore("read-book", "Læs en bog", 15, "img/book.png", 15),
                    chore("lights-out", "Sluk lyset", 1, "img/lights-out.png", 5),
                ],
            },
        ];

        let shop = vec![
            item("extra-screen-time", "Ekstra skærmtid (30 min)", 50, "img/screen-time.png"),
            item("favorite-dessert", "Yndlingsdessert", 75, "img/dessert.png"),
            item("small-toy", "Lille legetøj", 150, "img/toy.png"),
            item("movie-night", "Familie filmaften", 200, "img/movie.png"),
        ];

        Self { routines, shop }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.templates().len(), 4);
        assert_eq!(catalog.shop_items().len(), 4);

        let morning = catalog.template("morning").unwrap();
        assert_eq!(morning.chores.len(), 5);
        assert_eq!(morning.chores[0].id, "brush-teeth-morning");
        assert_eq!(morning.total_points(), 45);
        assert_eq!(morning.estimated_minutes(), 45);

        assert_eq!(catalog.shop_item("movie-night").unwrap().points, 200);
        assert!(catalog.template("lunch").is_none());
    }

    #[test]
    fn test_load_yaml_catalog() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.yml");
        fs::write(
            &path,
            r#"
routines:
  - id: morning
    title: Morning
    image-ref: img/morning.png
    chores:
      - id: a
        title: Chore A
        estimated-time: 3
        points: 5
      - id: b
        title: Chore B
        points: 10
shop:
  - id: sticker
    title: Sticker
    points: 5
"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        let morning = catalog.template("morning").unwrap();
        assert_eq!(morning.chores.len(), 2);
        assert_eq!(morning.chores[0].estimated_time, 3);
        assert_eq!(morning.chores[1].estimated_time, 0);
        assert_eq!(morning.chores[1].image_ref, "");
        assert_eq!(catalog.shop_item("sticker").unwrap().points, 5);
    }

    #[test]
    fn test_rejects_duplicate_template_ids() {
        let t = RoutineTemplate {
            id: "morning".to_string(),
            title: "Morning".to_string(),
            image_ref: String::new(),
            chores: vec![],
        };
        let err = Catalog::new(vec![t.clone(), t], vec![]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidCatalog(_)));
    }

    #[test]
    fn test_rejects_duplicate_chore_ids() {
        let t = RoutineTemplate {
            id: "morning".to_string(),
            title: "Morning".to_string(),
            image_ref: String::new(),
            chores: vec![chore("a", "A", 1, "", 1), chore("a", "A again", 1, "", 1)],
        };
        let err = Catalog::new(vec![t], vec![]).unwrap_err();
        assert!(err.to_string().contains("duplicate chore id a"));
    }

    #[test]
    fn test_rejects_duplicate_shop_ids() {
        let err = Catalog::new(vec![], vec![item("x", "X", 1, ""), item("x", "Y", 2, "")]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidCatalog(_)));
    }

    #[test]
    fn test_template_sums_do_not_overflow() {
        let t = RoutineTemplate {
            id: "marathon".to_string(),
            title: "Marathon".to_string(),
            image_ref: String::new(),
            chores: vec![chore("a", "A", u32::MAX, "", u32::MAX), chore("b", "B", u32::MAX, "", u32::MAX)],
        };
        assert_eq!(t.total_points(), 2 * u64::from(u32::MAX));
        assert_eq!(t.estimated_minutes(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_load_or_default() {
        let catalog = Catalog::load_or_default(None).unwrap();
        assert_eq!(catalog, Catalog::default());

        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        assert!(Catalog::load_or_default(Some(&missing)).is_err());
    }
}
