//! Built-in activity catalog and image resolution.
//!
//! Library cards are persisted by key only; the picture is looked up here
//! whenever a card is displayed.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use shared::{Activity, FromLibrary, LibraryActivity};

/// Category filter value meaning "no filter"
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Bundled asset name of the picture
    pub image: String,
    pub category: String,
}

impl CatalogEntry {
    fn new(id: &str, name: &str, image: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            category: category.to_string(),
        }
    }

    /// The activity stored when this entry is picked from the library
    pub fn to_activity(&self) -> Activity {
        Activity::Library(LibraryActivity {
            id: Some(self.id.clone()),
            from_library: FromLibrary,
            image_key: Some(self.id.clone()),
            name: self.name.clone(),
            category: Some(self.category.clone()),
        })
    }
}

/// Static id → picture lookup, fixed for the lifetime of the process
pub trait ActivityCatalog: Send + Sync {
    fn lookup(&self, id: &str) -> Option<&CatalogEntry>;

    fn entries(&self) -> &[CatalogEntry];

    /// Entries in `category` ("All" for every category) whose name contains
    /// `query`, ignoring case
    fn search(&self, category: &str, query: &str) -> Vec<&CatalogEntry> {
        let query = query.trim().to_lowercase();
        self.entries()
            .iter()
            .filter(|e| category == ALL_CATEGORIES || e.category == category)
            .filter(|e| e.name.to_lowercase().contains(&query))
            .collect()
    }
}

/// A library category and whether it is offered as a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub visible: bool,
}

impl Category {
    fn new(key: &str, visible: bool) -> Self {
        Self {
            key: key.to_string(),
            label: key.to_string(),
            visible,
        }
    }
}

/// Category settings used when none have been saved: every category shown
pub fn default_categories() -> Vec<Category> {
    [
        "Personal Care",
        "Food",
        "Holiday & Travel",
        "Places",
        "Medical",
        "Early Years",
        "School",
        "Daily Routine",
        "Clothes",
    ]
    .into_iter()
    .map(|key| Category::new(key, true))
    .collect()
}

/// Filter chips to offer; "All" is always shown separately
pub fn visible_categories(categories: &[Category]) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| c.visible && c.key != ALL_CATEGORIES)
        .collect()
}

/// The selected filter, reset to "All" once its category is hidden
pub fn effective_category<'a>(selected: &'a str, categories: &[Category]) -> &'a str {
    if selected == ALL_CATEGORIES || visible_categories(categories).iter().any(|c| c.label == selected) {
        selected
    } else {
        ALL_CATEGORIES
    }
}

/// Where a card's picture comes from when it is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Bundled catalog asset
    Asset(String),
    /// User photo on the device
    File(String),
}

/// Library cards resolve through the catalog by `imageKey` (no key or an
/// unknown key gives no image); custom cards use their own stored file.
pub fn resolve_image(catalog: &dyn ActivityCatalog, activity: &Activity) -> Option<ImageSource> {
    match activity {
        Activity::Library(card) => card
            .image_key
            .as_deref()
            .and_then(|key| catalog.lookup(key))
            .map(|entry| ImageSource::Asset(entry.image.clone())),
        Activity::Custom(card) => Some(ImageSource::File(card.image.uri.clone())),
    }
}

static BUILTIN_ENTRIES: Lazy<Vec<CatalogEntry>> = Lazy::new(|| {
    vec![
        CatalogEntry::new("1", "home", "home.svg", "Places"),
        CatalogEntry::new("2", "toilet", "toilet.svg", "Personal Care"),
        CatalogEntry::new("3", "bath", "bath.svg", "Personal Care"),
        CatalogEntry::new("4", "bedtime", "bedtime.svg", "Daily Routine"),
        CatalogEntry::new("5", "breakfast", "breakfast.svg", "Food"),
        CatalogEntry::new("6", "brush teeth", "brush-teeth.svg", "Personal Care"),
        CatalogEntry::new("7", "get dressed", "get-dressed.svg", "Daily Routine"),
        CatalogEntry::new("8", "milk", "milk.svg", "Food"),
        CatalogEntry::new("9", "orange juice", "orange-juice.svg", "Food"),
        CatalogEntry::new("10", "water", "water.svg", "Food"),
        CatalogEntry::new("11", "school", "school.svg", "Places"),
        CatalogEntry::new("12", "pajamas", "pajamas.svg", "Clothes"),
    ]
});

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The twelve cards bundled with the app
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ENTRIES.clone())
    }
}

impl ActivityCatalog for StaticCatalog {
    fn lookup(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
