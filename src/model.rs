use serde::{Deserialize, Serialize};

use crate::money::{finite_or_zero, parse_number};
use crate::template::TemplateId;

/// Company or client shown in the from/to blocks.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Party {
    pub name: String,
    pub address: String, // may span several lines
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One billable row.
///
/// `amount` is cached: edits to quantity or rate refresh it, but a row loaded
/// from storage keeps whatever amount was saved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Description,
    Quantity,
    Rate,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
            amount: 0.0,
        }
    }
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
            amount: finite_or_zero(quantity * rate),
        }
    }

    /// Applies raw editor input to one field. Quantity and rate are parsed
    /// forgivingly and refresh `amount`; description leaves it alone.
    pub fn update_field(&mut self, field: LineItemField, value: &str) {
        match field {
            LineItemField::Description => self.description = value.to_string(),
            LineItemField::Quantity => {
                self.quantity = parse_number(value);
                self.refresh_amount();
            }
            LineItemField::Rate => {
                self.rate = parse_number(value);
                self.refresh_amount();
            }
        }
    }

    // Two finite inputs can still overflow, e.g. 1e200 * 1e200.
    fn refresh_amount(&mut self) {
        self.amount = finite_or_zero(self.quantity * self.rate);
    }

    /// By-value form of [`LineItem::update_field`].
    pub fn with_field(mut self, field: LineItemField, value: &str) -> Self {
        self.update_field(field, value);
        self
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.quantity.is_finite() && self.rate.is_finite() && self.amount.is_finite()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// An invoice being edited.
///
/// Subtotal, tax and total are not stored here; see [`InvoiceDraft::totals`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub number: String,
    pub issue_date: String,
    pub due_date: String,
    pub currency: String,
    pub template: TemplateId,
    pub tax_rate: f64,
    pub discount: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub company: Option<Party>,
    #[serde(default)]
    pub client: Option<Party>,
    #[serde(default)]
    pub(crate) line_items: Vec<LineItem>,
}

/// Derived figures of a draft, unrounded.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}
