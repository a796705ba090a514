//! Read-only product catalog.
//!
//! The catalog is static data loaded once at start-up, either the built-in
//! demo data ([`Catalog::demo`]) or a JSON document with the same shape
//! ([`Catalog::from_json`]). Cart lines copy items out of the catalog when
//! they are added.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bloom_core::{Item, ItemId, Price, Shop, ShopId};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two shops share an ID.
    #[error("duplicate shop id: {0}")]
    DuplicateShop(ShopId),
    /// Two items share an ID.
    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),
    /// An item refers to a shop that is not in the catalog.
    #[error("item {item} refers to unknown shop {shop}")]
    UnknownShop { item: ItemId, shop: ShopId },
    /// The catalog has no shops to attribute orders to.
    #[error("catalog has no shops")]
    NoShops,
    /// The catalog document could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The catalog document could not be parsed.
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Sort key for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Price,
    #[default]
    #[serde(alias = "date_added")]
    Date,
}

/// Sort direction for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter and sort options for [`Catalog::query`].
///
/// The default lists every shop, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub shop: Option<ShopId>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

/// Serialized catalog document.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    shops: Vec<Shop>,
    items: Vec<Item>,
}

/// The set of shops and items for sale.
#[derive(Debug, Clone)]
pub struct Catalog {
    shops: Vec<Shop>,
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog, checking that IDs are unique and every item's shop exists.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first inconsistency found.
    pub fn new(shops: Vec<Shop>, items: Vec<Item>) -> Result<Self, CatalogError> {
        if shops.is_empty() {
            return Err(CatalogError::NoShops);
        }

        let mut shop_ids = HashSet::new();
        for shop in &shops {
            if !shop_ids.insert(&shop.id) {
                return Err(CatalogError::DuplicateShop(shop.id.clone()));
            }
        }

        let mut item_ids = HashSet::new();
        for item in &items {
            if !item_ids.insert(&item.id) {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
            if !shop_ids.contains(&item.shop_id) {
                return Err(CatalogError::UnknownShop {
                    item: item.id.clone(),
                    shop: item.shop_id.clone(),
                });
            }
        }

        Ok(Self { shops, items })
    }

    /// Parse a catalog from a JSON document of the form `{ "shops": [...], "items": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or any validation
    /// error from [`Catalog::new`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(raw)?;
        Self::new(doc.shops, doc.items)
    }

    /// Read and parse a catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or any error
    /// from [`Catalog::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// The built-in flower shop data.
    #[must_use]
    pub fn demo() -> Self {
        let flowery = ShopId::new("flowery-fragrant");
        let bloomwell = ShopId::new("bloomwell");

        let shops = vec![
            Shop {
                id: flowery.clone(),
                name: "Flowery Fragrant".to_string(),
                location: "123 Garden Street, Bloomville".to_string(),
            },
            Shop {
                id: bloomwell.clone(),
                name: "Bloomwell".to_string(),
                location: "456 Rose Avenue, Petalton".to_string(),
            },
        ];

        let items = vec![
            demo_item(
                "rose-1",
                "Rose",
                2599,
                &flowery,
                "Beautiful pink roses perfect for any romantic occasion",
                "rose-bouquet",
                15,
            ),
            demo_item(
                "lily-1",
                "Lily",
                3299,
                &flowery,
                "Elegant white lilies symbolizing purity and rebirth",
                "lily-bouquet",
                10,
            ),
            demo_item(
                "tulip-1",
                "Tulip",
                1899,
                &bloomwell,
                "Vibrant spring tulips to brighten any space",
                "tulip-bouquet",
                20,
            ),
            demo_item(
                "daisy-1",
                "Daisy",
                2299,
                &bloomwell,
                "Cheerful daisies bringing joy and innocence",
                "daisy-bouquet",
                12,
            ),
            demo_item(
                "rose-2",
                "Premium Rose",
                4599,
                &flowery,
                "Premium collection of the finest roses",
                "rose-bouquet",
                25,
            ),
            demo_item(
                "lily-2",
                "White Lily Premium",
                3899,
                &bloomwell,
                "Premium white lilies for special occasions",
                "lily-bouquet",
                8,
            ),
        ];

        Self { shops, items }
    }

    /// Every item, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by ID.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Every shop, in catalog order. Never empty.
    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    /// Look up a shop by ID.
    #[must_use]
    pub fn shop(&self, id: &ShopId) -> Option<&Shop> {
        self.shops.iter().find(|shop| &shop.id == id)
    }

    /// The first listed shop. Orders fall back to it when nothing else applies.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // `new` and `demo` guarantee at least one shop
    pub fn primary_shop(&self) -> &Shop {
        &self.shops[0]
    }

    /// Filter and sort items. Favorited items always sort ahead of the rest.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery, favorites: &[ItemId]) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| query.shop.as_ref().is_none_or(|shop| &item.shop_id == shop))
            .collect();

        items.sort_by(|a, b| {
            let a_fav = favorites.contains(&a.id);
            let b_fav = favorites.contains(&b.id);
            b_fav.cmp(&a_fav).then_with(|| {
                let ordering = match query.sort {
                    SortKey::Price => a.unit_price.cmp(&b.unit_price),
                    SortKey::Date => a.created_at.cmp(&b.created_at),
                };
                match query.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            })
        });

        items
    }
}

fn demo_item(
    id: &str,
    name: &str,
    cents: u32,
    shop: &ShopId,
    description: &str,
    image: &str,
    day_of_january: u32,
) -> Item {
    Item {
        id: ItemId::new(id),
        name: name.to_string(),
        unit_price: Price::from_cents(cents),
        shop_id: shop.clone(),
        description: description.to_string(),
        image: format!("/static/images/{image}.jpg"),
        created_at: january_2024(day_of_january),
    }
}

fn january_2024(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn test_demo_is_consistent() {
        let demo = Catalog::demo();
        let rebuilt = Catalog::new(demo.shops().to_vec(), demo.items().to_vec()).unwrap();
        assert_eq!(rebuilt.items().len(), 6);
        assert_eq!(rebuilt.shops().len(), 2);
    }

    #[test]
    fn test_item_lookup() {
        let catalog = Catalog::demo();
        let lily = catalog.item(&ItemId::new("lily-1")).unwrap();
        assert_eq!(lily.unit_price.to_string(), "$32.99");
        assert!(catalog.item(&ItemId::new("cactus-9")).is_none());
    }

    #[test]
    fn test_default_query_is_newest_first() {
        let catalog = Catalog::demo();
        let listed = catalog.query(&CatalogQuery::default(), &[]);
        assert_eq!(
            ids(&listed),
            ["rose-2", "tulip-1", "rose-1", "daisy-1", "lily-1", "lily-2"]
        );
    }

    #[test]
    fn test_filter_by_shop_and_sort_by_price() {
        let catalog = Catalog::demo();
        let query = CatalogQuery {
            shop: Some(ShopId::new("bloomwell")),
            sort: SortKey::Price,
            order: SortOrder::Asc,
        };
        assert_eq!(
            ids(&catalog.query(&query, &[])),
            ["tulip-1", "daisy-1", "lily-2"]
        );
    }

    #[test]
    fn test_favorites_sort_first() {
        let catalog = Catalog::demo();
        let query = CatalogQuery {
            sort: SortKey::Price,
            order: SortOrder::Asc,
            ..CatalogQuery::default()
        };
        let favorites = [ItemId::new("rose-2"), ItemId::new("lily-1")];
        let listed = ids(&catalog.query(&query, &favorites));
        assert_eq!(listed[..2], ["lily-1", "rose-2"]);
        assert_eq!(listed[2], "tulip-1");
    }

    #[test]
    fn test_new_rejects_inconsistent_data() {
        let demo = Catalog::demo();
        let mut items = demo.items().to_vec();
        items.push(items[0].clone());
        assert!(matches!(
            Catalog::new(demo.shops().to_vec(), items),
            Err(CatalogError::DuplicateItem(_))
        ));

        let mut orphan = demo.items()[0].clone();
        orphan.id = ItemId::new("orphan");
        orphan.shop_id = ShopId::new("nowhere");
        assert!(matches!(
            Catalog::new(demo.shops().to_vec(), vec![orphan]),
            Err(CatalogError::UnknownShop { .. })
        ));

        assert!(matches!(
            Catalog::new(Vec::new(), Vec::new()),
            Err(CatalogError::NoShops)
        ));
    }

    #[test]
    fn test_from_json() {
        let demo = Catalog::demo();
        let raw = serde_json::to_string(&CatalogDocument {
            shops: demo.shops().to_vec(),
            items: demo.items()[..2].to_vec(),
        })
        .unwrap();
        let parsed = Catalog::from_json(&raw).unwrap();
        assert_eq!(parsed.items().len(), 2);
        assert!(matches!(
            Catalog::from_json("[]"),
            Err(CatalogError::Parse(_))
        ));
    }
}
