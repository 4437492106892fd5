//! Catalog construction.
//!
//! [`CatalogBuilder`] owns the mutable interner while records are added.
//! [`CatalogBuilder::build`] freezes it, so a [`Catalog`] can be shared
//! across worker threads without anything being interned after ingestion.

use canonical::{normalize, Interner, InternerBuilder, NormalizeConfig};
use ingest::{RawListing, RawProduct};

use crate::types::{Listing, ListingId, Product, ProductId};

/// Collects listings and products, normalizing every field on insert.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    interner: InternerBuilder,
    normalize_cfg: NormalizeConfig,
    listings: Vec<Listing>,
    products: Vec<Product>,
}

impl CatalogBuilder {
    pub fn new(normalize_cfg: NormalizeConfig) -> Self {
        Self {
            interner: InternerBuilder::new(),
            normalize_cfg,
            listings: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Pre-size the arenas when the record counts are known.
    pub fn with_capacity(normalize_cfg: NormalizeConfig, listings: usize, products: usize) -> Self {
        Self {
            interner: InternerBuilder::new(),
            normalize_cfg,
            listings: Vec::with_capacity(listings),
            products: Vec::with_capacity(products),
        }
    }

    pub fn add_listing(&mut self, raw: RawListing) -> ListingId {
        let cfg = &self.normalize_cfg;
        let title = normalize(&raw.title, &mut self.interner, cfg);
        let manufacturer = normalize(&raw.manufacturer, &mut self.interner, cfg);
        let currency = normalize(&raw.currency, &mut self.interner, cfg);
        let price = normalize(&raw.price, &mut self.interner, cfg);

        let id = ListingId(self.listings.len());
        self.listings
            .push(Listing::new(raw, title, manufacturer, currency, price));
        id
    }

    pub fn add_product(&mut self, raw: RawProduct) -> ProductId {
        let cfg = &self.normalize_cfg;
        let name = normalize(&raw.product_name, &mut self.interner, cfg);
        let manufacturer = normalize(&raw.manufacturer, &mut self.interner, cfg);
        let family = normalize(&raw.family, &mut self.interner, cfg);
        let model = normalize(&raw.model, &mut self.interner, cfg);
        let announced_date = normalize(&raw.announced_date, &mut self.interner, cfg);

        let id = ProductId(self.products.len());
        self.products.push(Product::new(
            raw,
            name,
            manufacturer,
            family,
            model,
            announced_date,
        ));
        id
    }

    pub fn extend_listings(&mut self, raws: impl IntoIterator<Item = RawListing>) {
        for raw in raws {
            self.add_listing(raw);
        }
    }

    pub fn extend_products(&mut self, raws: impl IntoIterator<Item = RawProduct>) {
        for raw in raws {
            self.add_product(raw);
        }
    }

    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Freeze the interner and hand back the immutable catalog.
    pub fn build(self) -> Catalog {
        Catalog {
            interner: self.interner.freeze(),
            listings: self.listings,
            products: self.products,
        }
    }
}

/// Frozen set of listings and products plus the interner their tokens
/// resolve against.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) interner: Interner,
    pub(crate) listings: Vec<Listing>,
    pub(crate) products: Vec<Product>,
}

impl Catalog {
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn listing(&self, id: ListingId) -> Option<&Listing> {
        self.listings.get(id.0)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(id.0)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        (0..self.products.len()).map(ProductId)
    }

    /// Clear every best-match state and matched-listing collection so the
    /// catalog can be matched again.
    pub fn reset_matches(&mut self) {
        for listing in &mut self.listings {
            listing.reset();
        }
        for product in &mut self.products {
            product.matched_listings.clear();
        }
    }
}
