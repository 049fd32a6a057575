// Catalog Store - ordered hotels and their positioned room products
// In-memory structure; persistence is the session's job (store module).

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

// ============================================================================
// PRODUCT
// ============================================================================

/// A room product. Belongs to exactly one hotel; `position` drives display
/// ordering everywhere (list view, calendar cells, export).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub hotel: String,
    pub name: String,
    /// Channel-facing code, blank for products not yet mapped.
    pub code: Option<String>,
    pub position: usize,
}

/// Direction for `move_product`. Kept as an enum so callers can't pass
/// arbitrary offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered list of hotels and, per hotel, an ordered list of products.
///
/// Hotels are identified by display name (unique). Products are unique by
/// name within their hotel. Removing a hotel drops its products but NOT its
/// ledger rows; the caller owns that cascade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    hotels: Vec<String>,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            hotels: Vec::new(),
            products: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Hotels
    // ------------------------------------------------------------------

    /// Register a hotel. Newest hotels land at the end of the list.
    pub fn add_hotel(&mut self, name: &str) -> Result<()> {
        if self.hotels.iter().any(|h| h == name) {
            return Err(LedgerError::DuplicateHotel(name.to_string()));
        }
        self.hotels.push(name.to_string());
        Ok(())
    }

    /// Remove a hotel and every product registered under it.
    /// Ledger rows for the hotel are untouched here.
    pub fn remove_hotel(&mut self, name: &str) -> Result<()> {
        let before = self.hotels.len();
        self.hotels.retain(|h| h != name);
        if self.hotels.len() == before {
            return Err(LedgerError::HotelNotFound(name.to_string()));
        }
        self.products.retain(|p| p.hotel != name);
        Ok(())
    }

    pub fn hotels(&self) -> &[String] {
        &self.hotels
    }

    pub fn has_hotel(&self, name: &str) -> bool {
        self.hotels.iter().any(|h| h == name)
    }

    /// Substring search over hotel names, in stored order.
    /// Empty query matches everything.
    pub fn find_hotels(&self, query: &str) -> Vec<&str> {
        self.hotels
            .iter()
            .filter(|h| h.contains(query))
            .map(|h| h.as_str())
            .collect()
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// Register a product under a hotel, appended with the next position.
    pub fn add_product(&mut self, hotel: &str, name: &str, code: Option<String>) -> Result<()> {
        if !self.has_hotel(hotel) {
            return Err(LedgerError::HotelNotFound(hotel.to_string()));
        }
        if self
            .products
            .iter()
            .any(|p| p.hotel == hotel && p.name == name)
        {
            return Err(LedgerError::DuplicateProduct(name.to_string()));
        }
        let position = self.products_for(hotel).len();
        self.products.push(Product {
            hotel: hotel.to_string(),
            name: name.to_string(),
            code,
            position,
        });
        Ok(())
    }

    /// Products of one hotel in display order.
    pub fn products_for(&self, hotel: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.hotel == hotel).collect()
    }

    /// Product names of one hotel in display order. This sequence is the
    /// canonical sort key for ledger rows and calendar cells.
    pub fn product_order(&self, hotel: &str) -> Vec<String> {
        self.products
            .iter()
            .filter(|p| p.hotel == hotel)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Swap the product at `index` (within the hotel's own sub-list) with
    /// its neighbor. Out-of-bounds moves are a no-op, not an error.
    /// Returns whether anything changed.
    pub fn move_product(&mut self, hotel: &str, index: usize, direction: MoveDirection) -> bool {
        let indices: Vec<usize> = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.hotel == hotel)
            .map(|(i, _)| i)
            .collect();

        let neighbor = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < indices.len() => index + 1,
            _ => return false,
        };
        if index >= indices.len() {
            return false;
        }

        self.products.swap(indices[index], indices[neighbor]);
        self.renumber(hotel);
        true
    }

    /// Remove the product at `index` within the hotel's sub-list.
    /// Later products shift down by one position. Out-of-bounds is a no-op.
    /// Ledger rows referencing the product are left in place (documented
    /// quirk: historical rows survive until overwritten).
    pub fn remove_product(&mut self, hotel: &str, index: usize) -> bool {
        let global = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.hotel == hotel)
            .map(|(i, _)| i)
            .nth(index);

        match global {
            Some(i) => {
                self.products.remove(i);
                self.renumber(hotel);
                true
            }
            None => false,
        }
    }

    /// Rebuild positions 0..n for one hotel after a mutation.
    fn renumber(&mut self, hotel: &str) {
        let mut next = 0;
        for p in self.products.iter_mut().filter(|p| p.hotel == hotel) {
            p.position = next;
            next += 1;
        }
    }

    /// Bulk-replace contents from persisted rows. Positions are assigned by
    /// appearance order, which is how the products table encodes them.
    pub fn replace(&mut self, hotels: Vec<String>, products: Vec<(String, String, Option<String>)>) {
        self.hotels = hotels;
        self.products.clear();
        for (hotel, name, code) in products {
            let position = self.products_for(&hotel).len();
            self.products.push(Product {
                hotel,
                name,
                code,
                position,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty() && self.products.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
