//! Storage collaborator: CRUD keyed by integer ids.
//!
//! Ids are handed out by the store itself, starting at 1, and never reused.
//! [`MemStore`] keeps everything in memory; [`FileStore`] wraps one and writes
//! a JSON snapshot after every mutation. Figures must be finite: JSON has no
//! spelling for NaN or infinity.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::invoice::{default_company, sample_client};
use crate::model::{InvoiceDraft, LineItem, Party};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Company {
    pub id: u32,
    #[serde(flatten)]
    pub party: Party,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Client {
    pub id: u32,
    #[serde(flatten)]
    pub party: Party,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LineItemRecord {
    pub id: u32,
    pub invoice_id: u32,
    #[serde(flatten)]
    pub item: LineItem,
}

/// Invoice header as stored. The party blocks and line items live in their
/// own tables and are joined back in [`InvoiceWithDetails`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub id: u32,
    pub company_id: u32,
    pub client_id: u32,
    pub created_at: DateTime<Utc>,
    pub draft: InvoiceDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceWithDetails {
    pub id: u32,
    pub company: Company,
    pub client: Client,
    pub created_at: DateTime<Utc>,
    /// Header fields plus parties and rows, ready for editing or rendering.
    pub draft: InvoiceDraft,
    pub line_item_ids: Vec<u32>,
}

pub trait InvoiceStore {
    fn get_company(&self, id: u32) -> Result<Option<Company>>;
    fn create_company(&mut self, party: Party) -> Result<Company>;
    fn update_company(&mut self, id: u32, party: Party) -> Result<Option<Company>>;

    fn get_client(&self, id: u32) -> Result<Option<Client>>;
    fn list_clients(&self) -> Result<Vec<Client>>;
    fn create_client(&mut self, party: Party) -> Result<Client>;
    fn update_client(&mut self, id: u32, party: Party) -> Result<Option<Client>>;

    fn get_invoice(&self, id: u32) -> Result<Option<InvoiceWithDetails>>;
    fn list_invoices(&self) -> Result<Vec<InvoiceWithDetails>>;
    /// Stores the header and one line-item row per draft row.
    fn create_invoice(&mut self, company_id: u32, client_id: u32, draft: &InvoiceDraft) -> Result<InvoiceWithDetails>;
    /// Replaces the header and all line items of an existing invoice.
    fn update_invoice(&mut self, id: u32, draft: &InvoiceDraft) -> Result<Option<InvoiceWithDetails>>;
    /// Deletes the invoice and its line items. `false` if it did not exist.
    fn delete_invoice(&mut self, id: u32) -> Result<bool>;

    fn line_items_by_invoice(&self, invoice_id: u32) -> Result<Vec<LineItemRecord>>;
    fn create_line_item(&mut self, invoice_id: u32, item: LineItem) -> Result<LineItemRecord>;
    fn update_line_item(&mut self, id: u32, item: LineItem) -> Result<Option<LineItemRecord>>;
    fn delete_line_item(&mut self, id: u32) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MemStore {
    companies: BTreeMap<u32, Company>,
    clients: BTreeMap<u32, Client>,
    invoices: BTreeMap<u32, InvoiceRecord>,
    line_items: BTreeMap<u32, LineItemRecord>,
    next_company_id: u32,
    next_client_id: u32,
    next_invoice_id: u32,
    next_line_item_id: u32,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::empty()
    }
}

fn take_id(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}

impl MemStore {
    /// A store holding nothing at all.
    pub fn empty() -> Self {
        Self {
            companies: BTreeMap::new(),
            clients: BTreeMap::new(),
            invoices: BTreeMap::new(),
            line_items: BTreeMap::new(),
            next_company_id: 1,
            next_client_id: 1,
            next_invoice_id: 1,
            next_line_item_id: 1,
        }
    }

    /// A store seeded with the default company (#1) and a sample client (#1).
    pub fn seeded() -> Self {
        let mut store = Self::empty();
        let company_id = take_id(&mut store.next_company_id);
        store.companies.insert(
            company_id,
            Company {
                id: company_id,
                party: default_company(),
            },
        );
        let client_id = take_id(&mut store.next_client_id);
        store.clients.insert(
            client_id,
            Client {
                id: client_id,
                party: sample_client(),
            },
        );
        store
    }

    fn number_taken(&self, number: &str, except: Option<u32>) -> bool {
        self.invoices
            .values()
            .any(|inv| Some(inv.id) != except && inv.draft.number == number)
    }

    fn insert_line_items(&mut self, invoice_id: u32, items: &[LineItem]) {
        for item in items {
            let id = take_id(&mut self.next_line_item_id);
            self.line_items.insert(
                id,
                LineItemRecord {
                    id,
                    invoice_id,
                    item: item.clone(),
                },
            );
        }
    }

    fn remove_line_items_of(&mut self, invoice_id: u32) {
        self.line_items.retain(|_, rec| rec.invoice_id != invoice_id);
    }

    fn rows_of(&self, invoice_id: u32) -> Vec<LineItemRecord> {
        // BTreeMap order is id order, which is insertion order.
        self.line_items
            .values()
            .filter(|rec| rec.invoice_id == invoice_id)
            .cloned()
            .collect()
    }

    fn details(&self, record: &InvoiceRecord) -> Option<InvoiceWithDetails> {
        let company = self.companies.get(&record.company_id)?.clone();
        let client = self.clients.get(&record.client_id)?.clone();
        let rows = self.rows_of(record.id);

        let mut draft = record.draft.clone();
        draft.company = Some(company.party.clone());
        draft.client = Some(client.party.clone());
        draft.set_line_items(rows.iter().map(|r| r.item.clone()).collect());

        Some(InvoiceWithDetails {
            id: record.id,
            company,
            client,
            created_at: record.created_at,
            draft,
            line_item_ids: rows.iter().map(|r| r.id).collect(),
        })
    }

    /// First stored invoice number holding a non-finite figure, if any.
    fn non_finite_invoice(&self) -> Option<String> {
        let bad_header = self
            .invoices
            .values()
            .find(|inv| !inv.draft.has_finite_figures());
        if let Some(inv) = bad_header {
            return Some(inv.draft.number.clone());
        }
        self.line_items
            .values()
            .find(|rec| !rec.item.is_finite())
            .map(|rec| match self.invoices.get(&rec.invoice_id) {
                Some(inv) => inv.draft.number.clone(),
                None => format!("#{}", rec.invoice_id),
            })
    }

    fn ensure_finite_item(&self, invoice_id: u32, item: &LineItem) -> Result<()> {
        if item.is_finite() {
            return Ok(());
        }
        let number = match self.invoices.get(&invoice_id) {
            Some(inv) => inv.draft.number.clone(),
            None => format!("#{}", invoice_id),
        };
        Err(Error::NonFinite(number))
    }

    /// Header as stored: parties and rows stripped.
    fn header_of(draft: &InvoiceDraft) -> InvoiceDraft {
        let mut header = draft.clone();
        header.company = None;
        header.client = None;
        header.set_line_items(Vec::new());
        header
    }
}

impl InvoiceStore for MemStore {
    fn get_company(&self, id: u32) -> Result<Option<Company>> {
        Ok(self.companies.get(&id).cloned())
    }

    fn create_company(&mut self, party: Party) -> Result<Company> {
        let id = take_id(&mut self.next_company_id);
        let company = Company { id, party };
        self.companies.insert(id, company.clone());
        Ok(company)
    }

    fn update_company(&mut self, id: u32, party: Party) -> Result<Option<Company>> {
        Ok(self.companies.get_mut(&id).map(|company| {
            company.party = party;
            company.clone()
        }))
    }

    fn get_client(&self, id: u32) -> Result<Option<Client>> {
        Ok(self.clients.get(&id).cloned())
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.clients.values().cloned().collect())
    }

    fn create_client(&mut self, party: Party) -> Result<Client> {
        let id = take_id(&mut self.next_client_id);
        let client = Client { id, party };
        self.clients.insert(id, client.clone());
        Ok(client)
    }

    fn update_client(&mut self, id: u32, party: Party) -> Result<Option<Client>> {
        Ok(self.clients.get_mut(&id).map(|client| {
            client.party = party;
            client.clone()
        }))
    }

    fn get_invoice(&self, id: u32) -> Result<Option<InvoiceWithDetails>> {
        Ok(self.invoices.get(&id).and_then(|record| self.details(record)))
    }

    fn list_invoices(&self) -> Result<Vec<InvoiceWithDetails>> {
        Ok(self.invoices.values().filter_map(|record| self.details(record)).collect())
    }

    fn create_invoice(&mut self, company_id: u32, client_id: u32, draft: &InvoiceDraft) -> Result<InvoiceWithDetails> {
        if !self.companies.contains_key(&company_id) {
            return Err(Error::not_found("company", company_id));
        }
        if !self.clients.contains_key(&client_id) {
            return Err(Error::not_found("client", client_id));
        }
        if self.number_taken(&draft.number, None) {
            return Err(Error::DuplicateNumber(draft.number.clone()));
        }
        if !draft.has_finite_figures() {
            return Err(Error::NonFinite(draft.number.clone()));
        }

        let id = take_id(&mut self.next_invoice_id);
        let record = InvoiceRecord {
            id,
            company_id,
            client_id,
            created_at: Utc::now(),
            draft: Self::header_of(draft),
        };
        self.invoices.insert(id, record);
        self.insert_line_items(id, draft.line_items());
        tracing::debug!(id, number = %draft.number, "invoice created");

        self.get_invoice(id)?.ok_or_else(|| Error::not_found("invoice", id))
    }

    fn update_invoice(&mut self, id: u32, draft: &InvoiceDraft) -> Result<Option<InvoiceWithDetails>> {
        if !self.invoices.contains_key(&id) {
            return Ok(None);
        }
        if self.number_taken(&draft.number, Some(id)) {
            return Err(Error::DuplicateNumber(draft.number.clone()));
        }
        if !draft.has_finite_figures() {
            return Err(Error::NonFinite(draft.number.clone()));
        }

        if let Some(record) = self.invoices.get_mut(&id) {
            record.draft = Self::header_of(draft);
        }
        self.remove_line_items_of(id);
        self.insert_line_items(id, draft.line_items());
        tracing::debug!(id, rows = draft.line_items().len(), "invoice updated");

        self.get_invoice(id)
    }

    fn delete_invoice(&mut self, id: u32) -> Result<bool> {
        if !self.invoices.contains_key(&id) {
            return Ok(false);
        }
        self.remove_line_items_of(id);
        self.invoices.remove(&id);
        tracing::debug!(id, "invoice deleted");
        Ok(true)
    }

    fn line_items_by_invoice(&self, invoice_id: u32) -> Result<Vec<LineItemRecord>> {
        Ok(self.rows_of(invoice_id))
    }

    fn create_line_item(&mut self, invoice_id: u32, item: LineItem) -> Result<LineItemRecord> {
        if !self.invoices.contains_key(&invoice_id) {
            return Err(Error::not_found("invoice", invoice_id));
        }
        self.ensure_finite_item(invoice_id, &item)?;
        let id = take_id(&mut self.next_line_item_id);
        let record = LineItemRecord { id, invoice_id, item };
        self.line_items.insert(id, record.clone());
        Ok(record)
    }

    fn update_line_item(&mut self, id: u32, item: LineItem) -> Result<Option<LineItemRecord>> {
        if let Some(record) = self.line_items.get(&id) {
            self.ensure_finite_item(record.invoice_id, &item)?;
        }
        Ok(self.line_items.get_mut(&id).map(|record| {
            record.item = item;
            record.clone()
        }))
    }

    fn delete_line_item(&mut self, id: u32) -> Result<bool> {
        Ok(self.line_items.remove(&id).is_some())
    }
}

/// [`MemStore`] persisted as pretty JSON at `path`.
///
/// The snapshot is written after every successful mutation. When the write
/// fails the change is rolled back in memory too, so the caller can retry.
pub struct FileStore {
    path: PathBuf,
    inner: MemStore,
}

impl FileStore {
    /// Loads `path`, or starts from a seeded store if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            tracing::info!(path = %path.display(), "creating new invoice store");
            MemStore::seeded()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(number) = self.inner.non_finite_invoice() {
            return Err(Error::NonFinite(number));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.inner)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Applies `change` and persists it; on any failure memory is restored.
    fn commit<T>(&mut self, change: impl FnOnce(&mut MemStore) -> Result<T>) -> Result<T> {
        let before = self.inner.clone();
        let outcome = change(&mut self.inner).and_then(|value| self.save().map(|()| value));
        if outcome.is_err() {
            self.inner = before;
        }
        outcome
    }
}

impl InvoiceStore for FileStore {
    fn get_company(&self, id: u32) -> Result<Option<Company>> {
        self.inner.get_company(id)
    }

    fn create_company(&mut self, party: Party) -> Result<Company> {
        self.commit(|store| store.create_company(party))
    }

    fn update_company(&mut self, id: u32, party: Party) -> Result<Option<Company>> {
        self.commit(|store| store.update_company(id, party))
    }

    fn get_client(&self, id: u32) -> Result<Option<Client>> {
        self.inner.get_client(id)
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        self.inner.list_clients()
    }

    fn create_client(&mut self, party: Party) -> Result<Client> {
        self.commit(|store| store.create_client(party))
    }

    fn update_client(&mut self, id: u32, party: Party) -> Result<Option<Client>> {
        self.commit(|store| store.update_client(id, party))
    }

    fn get_invoice(&self, id: u32) -> Result<Option<InvoiceWithDetails>> {
        self.inner.get_invoice(id)
    }

    fn list_invoices(&self) -> Result<Vec<InvoiceWithDetails>> {
        self.inner.list_invoices()
    }

    fn create_invoice(&mut self, company_id: u32, client_id: u32, draft: &InvoiceDraft) -> Result<InvoiceWithDetails> {
        self.commit(|store| store.create_invoice(company_id, client_id, draft))
    }

    fn update_invoice(&mut self, id: u32, draft: &InvoiceDraft) -> Result<Option<InvoiceWithDetails>> {
        self.commit(|store| store.update_invoice(id, draft))
    }

    fn delete_invoice(&mut self, id: u32) -> Result<bool> {
        self.commit(|store| store.delete_invoice(id))
    }

    fn line_items_by_invoice(&self, invoice_id: u32) -> Result<Vec<LineItemRecord>> {
        self.inner.line_items_by_invoice(invoice_id)
    }

    fn create_line_item(&mut self, invoice_id: u32, item: LineItem) -> Result<LineItemRecord> {
        self.commit(|store| store.create_line_item(invoice_id, item))
    }

    fn update_line_item(&mut self, id: u32, item: LineItem) -> Result<Option<LineItemRecord>> {
        self.commit(|store| store.update_line_item(id, item))
    }

    fn delete_line_item(&mut self, id: u32) -> Result<bool> {
        self.commit(|store| store.delete_line_item(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::DraftDefaults;
    use crate::model::LineItemField;
    use chrono::NaiveDate;

    fn draft(number: &str) -> InvoiceDraft {
        let issue = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        let mut draft = InvoiceDraft::new(number, issue, &DraftDefaults::default());
        draft.push_line_item(LineItem::new("Design", 2.0, 100.0));
        draft.push_line_item(LineItem::new("Hosting", 1.0, 50.0));
        draft
    }

    #[test]
    fn seeded_store_has_default_parties() {
        let store = MemStore::seeded();
        assert_eq!(store.get_company(1).unwrap().unwrap().party.name, "Your Company");
        assert_eq!(store.list_clients().unwrap().len(), 1);
        assert!(MemStore::empty().get_company(1).unwrap().is_none());
    }

    #[test]
    fn ids_auto_increment_from_one() {
        let mut store = MemStore::empty();
        let a = store.create_client(sample_client()).unwrap();
        let b = store.create_client(sample_client()).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[test]
    fn create_invoice_joins_parties_and_rows() {
        let mut store = MemStore::seeded();
        let created = store.create_invoice(1, 1, &draft("INV-1")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.line_item_ids, [1, 2]);
        assert_eq!(created.draft.line_items()[1].description, "Hosting");
        assert_eq!(created.draft.client.as_ref().unwrap().name, "Sample Client Inc.");
        assert_eq!(created.draft.totals().subtotal, 250.0);
    }

    #[test]
    fn create_invoice_rejects_duplicates_and_dangling_refs() {
        let mut store = MemStore::seeded();
        store.create_invoice(1, 1, &draft("INV-1")).unwrap();
        assert!(matches!(
            store.create_invoice(1, 1, &draft("INV-1")),
            Err(Error::DuplicateNumber(n)) if n == "INV-1"
        ));
        assert!(matches!(
            store.create_invoice(9, 1, &draft("INV-2")),
            Err(Error::NotFound { entity: "company", id: 9 })
        ));
    }

    #[test]
    fn update_replaces_rows_wholesale() {
        let mut store = MemStore::seeded();
        let created = store.create_invoice(1, 1, &draft("INV-1")).unwrap();

        let mut edited = created.draft.clone();
        edited.remove_line_item(0);
        edited.tax_rate = 5.0;
        let updated = store.update_invoice(created.id, &edited).unwrap().unwrap();

        assert_eq!(updated.draft.tax_rate, 5.0);
        assert_eq!(updated.line_item_ids, [3]);
        assert_eq!(store.line_items_by_invoice(created.id).unwrap().len(), 1);
        assert!(store.update_invoice(42, &edited).unwrap().is_none());
    }

    #[test]
    fn stored_amount_survives_round_trip() {
        let mut store = MemStore::seeded();
        let mut d = draft("INV-1");
        let mut manual = LineItem::new("Manual", 2.0, 10.0);
        manual.amount = 99.0;
        d.set_line_items(vec![manual]);
        let created = store.create_invoice(1, 1, &d).unwrap();
        assert_eq!(created.draft.line_items()[0].amount, 99.0);
    }

    #[test]
    fn delete_cascades_to_line_items() {
        let mut store = MemStore::seeded();
        let first = store.create_invoice(1, 1, &draft("INV-1")).unwrap();
        let second = store.create_invoice(1, 1, &draft("INV-2")).unwrap();

        assert!(store.delete_invoice(first.id).unwrap());
        assert!(store.get_invoice(first.id).unwrap().is_none());
        assert!(store.line_items_by_invoice(first.id).unwrap().is_empty());
        assert_eq!(store.line_items_by_invoice(second.id).unwrap().len(), 2);
        assert!(!store.delete_invoice(first.id).unwrap());
    }

    #[test]
    fn line_item_crud() {
        let mut store = MemStore::seeded();
        let inv = store.create_invoice(1, 1, &draft("INV-1")).unwrap();
        let rec = store.create_line_item(inv.id, LineItem::new("Extra", 1.0, 5.0)).unwrap();
        let updated = store
            .update_line_item(rec.id, LineItem::new("Extra", 3.0, 5.0))
            .unwrap()
            .unwrap();
        assert_eq!(updated.item.amount, 15.0);
        assert!(store.delete_line_item(rec.id).unwrap());
        assert!(store.update_line_item(rec.id, LineItem::default()).unwrap().is_none());
        assert!(store.create_line_item(77, LineItem::default()).is_err());
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        let created = store.create_invoice(1, 1, &draft("INV-1")).unwrap();
        let client = store
            .update_client(1, Party {
                name: "Renamed Ltd.".to_string(),
                ..sample_client()
            })
            .unwrap();
        assert!(client.is_some());
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        let loaded = reopened.get_invoice(created.id).unwrap().unwrap();
        assert_eq!(loaded.draft.line_items(), created.draft.line_items());
        assert_eq!(loaded.draft.number, "INV-1");
        assert_eq!(loaded.client.party.name, "Renamed Ltd.");
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn overflowing_row_still_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut d = draft("INV-1");
        let idx = d.add_line_item();
        d.update_line_item(idx, LineItemField::Quantity, "1e200");
        d.update_line_item(idx, LineItemField::Rate, "1e200");

        let mut store = FileStore::open(&path).unwrap();
        let created = store.create_invoice(1, 1, &d).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        let loaded = reopened.get_invoice(created.id).unwrap().unwrap();
        assert_eq!(loaded.draft.line_items()[2].amount, 0.0);
        assert_eq!(loaded.draft.totals().subtotal, 250.0);
    }

    #[test]
    fn non_finite_figures_are_rejected_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        let created = store.create_invoice(1, 1, &draft("INV-1")).unwrap();

        let mut bad = draft("INV-2");
        bad.tax_rate = f64::INFINITY;
        assert!(matches!(store.create_invoice(1, 1, &bad), Err(Error::NonFinite(n)) if n == "INV-2"));

        let mut row = LineItem::new("Broken", 1.0, 1.0);
        row.amount = f64::NAN;
        assert!(matches!(store.create_line_item(created.id, row.clone()), Err(Error::NonFinite(_))));
        let first_row = created.line_item_ids[0];
        assert!(matches!(store.update_line_item(first_row, row), Err(Error::NonFinite(_))));

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.list_invoices().unwrap().len(), 1);
        assert_eq!(reopened.line_items_by_invoice(created.id).unwrap().len(), 2);
    }

    #[test]
    fn failed_write_rolls_back_and_allows_retry() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = FileStore::open(blocker.join("store.json")).unwrap();
        let d = draft("INV-1");
        let before = d.clone();

        assert!(matches!(store.create_invoice(1, 1, &d), Err(Error::Io(_))));
        assert_eq!(d, before);
        assert!(store.list_invoices().unwrap().is_empty());

        fs::remove_file(&blocker).unwrap();
        let created = store.create_invoice(1, 1, &d).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.draft.number, "INV-1");
        assert!(store.path().exists());
    }

    #[test]
    fn company_rows_with_legacy_logo_still_load() {
        let json = r#"{"id":3,"name":"Acme","address":"1 Road","email":"a@acme.test","logo":"acme.png"}"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.id, 3);
        assert_eq!(company.party.name, "Acme");
        assert!(!serde_json::to_string(&company).unwrap().contains("logo"));
    }
}
