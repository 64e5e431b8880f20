//! Sales quote builder
//!
//! A quote is a list of catalog services with quantities, a discount and a
//! tax rate. Amounts are integer cents; percentages round half up. The draft
//! is persisted like any other config and exported as plain text.

use std::fmt::Write as _;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ConfigStore, StorageBackend};
use crate::constants::{quote, storage};
use crate::preview::format_price;

pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub price_cents: u64,
    /// Billed every month instead of once
    pub monthly: bool,
}

pub const SERVICES: &[Service] = &[
    Service { id: "landing", name: "Landing page", price_cents: 49_900, monthly: false },
    Service { id: "website", name: "Sitio web corporativo", price_cents: 149_900, monthly: false },
    Service { id: "ecommerce", name: "Tienda online", price_cents: 299_900, monthly: false },
    Service { id: "mobile-app", name: "App móvil", price_cents: 499_900, monthly: false },
    Service { id: "whatsapp-bot", name: "Automatización de WhatsApp", price_cents: 79_900, monthly: false },
    Service { id: "seo", name: "SEO", price_cents: 29_900, monthly: true },
    Service { id: "maintenance", name: "Mantenimiento", price_cents: 19_900, monthly: true },
];

pub fn service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub service_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    #[serde(default)]
    pub client_name: String,

    #[serde(default)]
    pub items: Vec<QuoteLine>,

    #[serde(default)]
    pub discount_percent: u8,

    #[serde(default = "default_tax")]
    pub tax_percent: u8,

    #[serde(default)]
    pub notes: String,
}

fn default_tax() -> u8 {
    quote::DEFAULT_TAX_PERCENT
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            items: Vec::new(),
            discount_percent: 0,
            tax_percent: default_tax(),
            notes: String::new(),
        }
    }
}

/// `amount * percent / 100`, rounded half up
fn percent_of(amount: u64, percent: u8) -> u64 {
    (amount * u64::from(percent) + 50) / 100
}

impl QuoteDraft {
    /// Add one unit; an existing line for the same service grows instead
    pub fn add_service(&mut self, id: &str) -> bool {
        if service(id).is_none() {
            warn!(service = %id, "Unknown service");
            return false;
        }
        match self.items.iter_mut().find(|line| line.service_id == id) {
            Some(line) => line.quantity = (line.quantity + 1).min(quote::MAX_QUANTITY),
            None => self.items.push(QuoteLine { service_id: id.to_string(), quantity: 1 }),
        }
        true
    }

    /// Zero removes the line
    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_service(id);
        } else if let Some(line) = self.items.iter_mut().find(|line| line.service_id == id) {
            line.quantity = quantity.min(quote::MAX_QUANTITY);
        }
    }

    pub fn remove_service(&mut self, id: &str) {
        self.items.retain(|line| line.service_id != id);
    }

    pub fn set_discount(&mut self, percent: u8) {
        self.discount_percent = percent.min(quote::MAX_DISCOUNT_PERCENT);
    }

    pub fn set_tax(&mut self, percent: u8) {
        self.tax_percent = percent.min(100);
    }

    pub fn line_total_cents(line: &QuoteLine) -> u64 {
        service(&line.service_id).map_or(0, |s| s.price_cents * u64::from(line.quantity))
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.items.iter().map(Self::line_total_cents).sum()
    }

    pub fn discount_cents(&self) -> u64 {
        percent_of(self.subtotal_cents(), self.discount_percent)
    }

    pub fn tax_cents(&self) -> u64 {
        percent_of(self.subtotal_cents() - self.discount_cents(), self.tax_percent)
    }

    pub fn total_cents(&self) -> u64 {
        self.subtotal_cents() - self.discount_cents() + self.tax_cents()
    }

    /// Clamp out-of-range values and drop unknown services
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        self.items.retain(|line| {
            let known = service(&line.service_id).is_some();
            if !known {
                warn!(service = %line.service_id, "Dropping unknown service from stored quote");
            }
            known && line.quantity > 0
        });
        for line in &mut self.items {
            line.quantity = line.quantity.min(quote::MAX_QUANTITY);
        }
        self.set_discount(self.discount_percent);
        self.set_tax(self.tax_percent);
        *self != before
    }

    /// Plain-text export of the quote
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let client = if self.client_name.trim().is_empty() { "Sin nombre" } else { self.client_name.trim() };
        let _ = writeln!(out, "Cotización para: {client}");
        let _ = writeln!(out, "{}", "-".repeat(40));
        if self.items.is_empty() {
            let _ = writeln!(out, "(sin servicios)");
        }
        for line in &self.items {
            let Some(service) = service(&line.service_id) else { continue };
            let period = if service.monthly { "/mes" } else { "" };
            let _ = writeln!(
                out,
                "{} x{}  {}{}",
                service.name,
                line.quantity,
                format_price(Self::line_total_cents(line)),
                period
            );
        }
        let _ = writeln!(out, "{}", "-".repeat(40));
        let _ = writeln!(out, "Subtotal: {}", format_price(self.subtotal_cents()));
        if self.discount_percent > 0 {
            let _ = writeln!(
                out,
                "Descuento ({}%): -{}",
                self.discount_percent,
                format_price(self.discount_cents())
            );
        }
        let _ = writeln!(out, "Impuestos ({}%): {}", self.tax_percent, format_price(self.tax_cents()));
        let _ = writeln!(out, "Total: {}", format_price(self.total_cents()));
        if !self.notes.trim().is_empty() {
            let _ = writeln!(out, "Notas: {}", self.notes.trim());
        }
        out
    }
}

/// Open the persisted quote draft, correcting stale values in storage
pub fn open_quote_store(backend: Rc<dyn StorageBackend>) -> ConfigStore<QuoteDraft> {
    let mut store = ConfigStore::open(backend, storage::QUOTE_KEY, QuoteDraft::default());
    if store.update(|draft| {
        draft.sanitize();
    }) {
        info!("Corrected stored quote draft");
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStorage;

    #[test]
    fn test_same_service_merges() {
        let mut draft = QuoteDraft::default();
        draft.add_service("landing");
        draft.add_service("landing");
        draft.add_service("seo");
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[0].quantity, 2);
        assert!(!draft.add_service("nope"));
    }

    #[test]
    fn test_totals_with_discount_and_tax() {
        let mut draft = QuoteDraft::default();
        draft.add_service("website");
        draft.add_service("seo");
        draft.set_discount(10);
        draft.set_tax(19);

        assert_eq!(draft.subtotal_cents(), 179_800);
        assert_eq!(draft.discount_cents(), 17_980);
        // 161_820 * 19% = 30_745.8
        assert_eq!(draft.tax_cents(), 30_746);
        assert_eq!(draft.total_cents(), 192_566);
    }

    #[test]
    fn test_discount_is_capped() {
        let mut draft = QuoteDraft::default();
        draft.set_discount(80);
        assert_eq!(draft.discount_percent, quote::MAX_DISCOUNT_PERCENT);
    }

    #[test]
    fn test_zero_quantity_removes_line() {
        let mut draft = QuoteDraft::default();
        draft.add_service("ecommerce");
        draft.set_quantity("ecommerce", 0);
        assert!(draft.items.is_empty());
        assert_eq!(draft.total_cents(), 0);
    }

    #[test]
    fn test_summary_lists_lines_and_total() {
        let mut draft = QuoteDraft::default();
        draft.client_name = "Panadería Sol".into();
        draft.add_service("landing");
        draft.set_tax(0);
        let text = draft.summary();
        assert!(text.starts_with("Cotización para: Panadería Sol\n"));
        assert!(text.contains("Landing page x1  $499.00"));
        assert!(text.contains("Total: $499.00"));
        assert!(!text.contains("Descuento"));
    }

    #[test]
    fn test_store_repairs_stale_draft() {
        let backend = Rc::new(MemoryStorage::new());
        backend.insert_raw(
            storage::QUOTE_KEY,
            r#"{"clientName":"X","items":[{"serviceId":"gone","quantity":1},{"serviceId":"seo","quantity":500}],"discountPercent":90}"#,
        );
        let store = open_quote_store(backend.clone());
        let draft = store.get();
        assert_eq!(draft.items, vec![QuoteLine { service_id: "seo".into(), quantity: quote::MAX_QUANTITY }]);
        assert_eq!(draft.discount_percent, quote::MAX_DISCOUNT_PERCENT);
        assert_eq!(draft.tax_percent, quote::DEFAULT_TAX_PERCENT);

        let reopened = open_quote_store(backend);
        assert_eq!(reopened.get(), draft);
    }
}
