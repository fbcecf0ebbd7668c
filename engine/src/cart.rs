//! Cart aggregation across completed sessions.

use swipecart_types::{CartLineItem, Points, Price, TaxRate};

/// Receiver for the line items a session produces on completion.
pub trait CartSink {
    fn add_items(&mut self, items: Vec<CartLineItem>);
}

/// Checkout totals for the current cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of prices over scanned items only.
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
    /// Sum of line item points. Skipped lines contribute zero.
    pub points: Points,
    pub scanned: usize,
    pub skipped: usize,
}

/// The shopping cart. Holds line items from completed sessions only.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartLineItem>,
    tax_rate: TaxRate,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        Self {
            items: Vec::new(),
            tax_rate,
        }
    }

    pub fn clear(&mut self) {
        tracing::debug!(lines = self.items.len(), "Cart cleared");
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn scanned(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter().filter(|item| item.is_scanned())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter().filter(|item| !item.is_scanned())
    }

    #[must_use]
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    #[must_use]
    pub fn total_points(&self) -> Points {
        self.items.iter().map(|item| item.earned_points).sum()
    }

    /// Subtotal of items actually purchased. Skipped items are never bought.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.scanned().map(|item| item.price).sum()
    }

    #[must_use]
    pub fn tax(&self, subtotal: Price) -> Price {
        self.tax_rate.apply(subtotal)
    }

    #[must_use]
    pub fn total(&self) -> Price {
        let subtotal = self.total_price();
        subtotal + self.tax(subtotal)
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.total_price();
        let tax = self.tax(subtotal);
        let scanned = self.scanned().count();
        CartTotals {
            subtotal,
            tax,
            total: subtotal + tax,
            points: self.total_points(),
            scanned,
            skipped: self.items.len() - scanned,
        }
    }
}

impl CartSink for Cart {
    fn add_items(&mut self, items: Vec<CartLineItem>) {
        if items.is_empty() {
            return;
        }
        tracing::debug!(
            added = items.len(),
            lines = self.items.len() + items.len(),
            "Cart updated"
        );
        self.items.extend(items);
    }
}
