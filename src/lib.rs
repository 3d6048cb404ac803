//! Invoice drafting core: line items, derived totals, and five
//! interchangeable HTML layouts, plus the storage, export, currency and
//! settings collaborators the CLI wires together.

pub mod config;
pub mod currency;
pub mod error;
pub mod export;
pub mod invoice;
pub mod logging;
pub mod model;
pub mod money;
pub mod store;
pub mod template;

pub use error::{Error, Result};
pub use invoice::{DraftDefaults, compute_totals, next_invoice_number};
pub use model::{InvoiceDraft, InvoiceStatus, LineItem, LineItemField, Party, Totals};
pub use store::{FileStore, InvoiceStore, MemStore};
pub use template::{Document, Renderer, TEMPLATES, TemplateDescriptor, TemplateId};
