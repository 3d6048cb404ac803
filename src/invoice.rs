//! Invoice aggregate: line-item editing and derived totals.

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::model::{InvoiceDraft, InvoiceStatus, LineItem, LineItemField, Party, Totals};
use crate::money::parse_number;
use crate::template::TemplateId;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const NUMBER_PREFIX: &str = "INV";
/// Shown when a draft somehow reaches rendering without a number.
pub const PLACEHOLDER_NUMBER: &str = "INV-001";

/// Subtotal, tax and total for a sequence of rows.
///
/// Amounts are summed left to right starting from `0.0`; nothing is rounded.
/// The total is not clamped, so a large discount yields a negative total.
pub fn compute_totals(line_items: &[LineItem], tax_rate: f64, discount: f64) -> Totals {
    let subtotal = line_items.iter().fold(0.0, |acc, item| acc + item.amount);
    let tax_amount = subtotal * tax_rate / 100.0;
    let total = subtotal + tax_amount - discount;

    Totals {
        subtotal,
        tax_amount,
        total,
    }
}

/// Values a fresh draft starts from. Usually built from the user settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDefaults {
    pub currency: String,
    pub template: TemplateId,
    pub tax_rate: f64,
    pub payment_terms_days: u64,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            currency: "PKR".to_string(),
            template: TemplateId::Minimalist,
            tax_rate: 10.0,
            payment_terms_days: 30,
        }
    }
}

pub fn default_company() -> Party {
    Party {
        name: "Your Company".to_string(),
        address: "123 Business St\nSan Francisco, CA 94105".to_string(),
        email: "contact@yourcompany.com".to_string(),
        phone: Some("+1 (555) 123-4567".to_string()),
    }
}

pub fn sample_client() -> Party {
    Party {
        name: "Sample Client Inc.".to_string(),
        address: "456 Client Ave\nNew York, NY 10001".to_string(),
        email: "billing@sampleclient.com".to_string(),
        phone: Some("+1 (555) 987-6543".to_string()),
    }
}

fn due_after(issue: NaiveDate, days: u64) -> NaiveDate {
    issue.checked_add_days(Days::new(days)).unwrap_or(issue)
}

/// Next free number for `date`, formatted `INV-YYYYMMDD-NN`.
///
/// Scans `existing` for numbers with the same date prefix and returns one
/// past the highest index found (starting at 01).
pub fn next_invoice_number<'a>(date: NaiveDate, existing: impl IntoIterator<Item = &'a str>) -> String {
    let prefix = format!("{}-{}", NUMBER_PREFIX, date.format("%Y%m%d"));
    let pattern = Regex::new(&format!(r"^{}-(\d+)$", regex::escape(&prefix))).expect("valid number pattern");

    let next_idx = existing
        .into_iter()
        .filter_map(|number| pattern.captures(number.trim()))
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1));

    format!("{}-{:02}", prefix, next_idx)
}

impl InvoiceDraft {
    /// Fresh draft issued on `issue_date`, due after the configured payment
    /// terms, with no line items.
    pub fn new(number: impl Into<String>, issue_date: NaiveDate, defaults: &DraftDefaults) -> Self {
        Self {
            number: number.into(),
            issue_date: issue_date.format(DATE_FORMAT).to_string(),
            due_date: due_after(issue_date, defaults.payment_terms_days)
                .format(DATE_FORMAT)
                .to_string(),
            currency: defaults.currency.clone(),
            template: defaults.template,
            tax_rate: defaults.tax_rate,
            discount: 0.0,
            notes: None,
            status: InvoiceStatus::Draft,
            company: Some(default_company()),
            client: Some(sample_client()),
            line_items: Vec::new(),
        }
    }

    /// Fills blank header fields and missing parties once, typically right
    /// after a draft is loaded, so renderers never see holes.
    pub fn resolve_defaults(&mut self, today: NaiveDate, defaults: &DraftDefaults) {
        if self.number.trim().is_empty() {
            self.number = PLACEHOLDER_NUMBER.to_string();
        }
        if self.issue_date.trim().is_empty() {
            self.issue_date = today.format(DATE_FORMAT).to_string();
        }
        if self.due_date.trim().is_empty() {
            let issue = NaiveDate::parse_from_str(&self.issue_date, DATE_FORMAT).unwrap_or(today);
            self.due_date = due_after(issue, defaults.payment_terms_days)
                .format(DATE_FORMAT)
                .to_string();
        }
        if self.currency.trim().is_empty() {
            self.currency = defaults.currency.clone();
        }
        if self.notes.as_deref().is_some_and(|n| n.trim().is_empty()) {
            self.notes = None;
        }
        self.company.get_or_insert_with(default_company);
        self.client.get_or_insert_with(sample_client);
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Replaces all rows, keeping their stored amounts as-is.
    pub fn set_line_items(&mut self, items: Vec<LineItem>) {
        self.line_items = items;
    }

    /// Appends an empty row and returns its position.
    pub fn add_line_item(&mut self) -> usize {
        self.line_items.push(LineItem::default());
        self.line_items.len() - 1
    }

    pub fn push_line_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Edits one row in place. Unknown positions are ignored.
    pub fn update_line_item(&mut self, index: usize, field: LineItemField, value: &str) -> Option<&LineItem> {
        if index >= self.line_items.len() {
            tracing::warn!(index, len = self.line_items.len(), "ignoring edit of missing line item");
            return None;
        }
        let item = &mut self.line_items[index];
        item.update_field(field, value);
        Some(item)
    }

    /// Removes the row at `index`; the others keep their relative order.
    pub fn remove_line_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.line_items.len() {
            Some(self.line_items.remove(index))
        } else {
            tracing::warn!(index, len = self.line_items.len(), "ignoring removal of missing line item");
            None
        }
    }

    pub fn set_tax_rate_input(&mut self, value: &str) {
        self.tax_rate = parse_number(value);
    }

    pub fn set_discount_input(&mut self, value: &str) {
        self.discount = parse_number(value);
    }

    /// False when a rate, discount or any row figure is NaN or infinite;
    /// such a draft cannot be stored.
    pub fn has_finite_figures(&self) -> bool {
        self.tax_rate.is_finite() && self.discount.is_finite() && self.line_items.iter().all(LineItem::is_finite)
    }

    /// Recomputed on every call; there is no cached copy to go stale.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.line_items, self.tax_rate, self.discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
    }

    fn design_and_hosting() -> Vec<LineItem> {
        vec![LineItem::new("Design", 2.0, 100.0), LineItem::new("Hosting", 1.0, 50.0)]
    }

    #[test]
    fn computes_subtotal_tax_and_total() {
        let totals = compute_totals(&design_and_hosting(), 10.0, 20.0);
        assert_eq!(totals.subtotal, 250.0);
        assert_eq!(totals.tax_amount, 25.0);
        assert_eq!(totals.total, 255.0);
    }

    #[test]
    fn empty_list_total_is_negative_discount() {
        let totals = compute_totals(&[], 10.0, 15.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.total, -15.0);
        assert!(compute_totals(&[], 10.0, 0.0).subtotal.is_sign_positive());
    }

    #[test]
    fn discount_larger_than_subtotal_is_not_clamped() {
        let items = vec![LineItem::new("Tiny", 1.0, 5.0)];
        assert_eq!(compute_totals(&items, 0.0, 20.0).total, -15.0);
    }

    #[test]
    fn stored_amount_wins_over_quantity_times_rate() {
        let mut item = LineItem::new("Manual", 2.0, 10.0);
        item.amount = 99.0;
        assert_eq!(compute_totals(&[item], 0.0, 0.0).subtotal, 99.0);
    }

    #[test]
    fn new_draft_uses_defaults_and_payment_terms() {
        let draft = InvoiceDraft::new("INV-20241215-01", test_date(), &DraftDefaults::default());
        assert_eq!(draft.issue_date, "2024-12-15");
        assert_eq!(draft.due_date, "2025-01-14");
        assert_eq!(draft.currency, "PKR");
        assert_eq!(draft.template, TemplateId::Minimalist);
        assert_eq!(draft.tax_rate, 10.0);
        assert_eq!(draft.discount, 0.0);
        assert_eq!(draft.status, InvoiceStatus::Draft);
        assert!(draft.line_items().is_empty());
    }

    #[test]
    fn add_line_item_appends_default_row() {
        let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
        draft.push_line_item(LineItem::new("First", 1.0, 1.0));
        let idx = draft.add_line_item();
        assert_eq!(idx, 1);
        assert_eq!(draft.line_items()[0].description, "First");
        assert_eq!(draft.line_items()[1], LineItem::default());
        assert_eq!(draft.line_items()[1].quantity, 1.0);
    }

    #[test]
    fn remove_line_item_keeps_order_of_the_rest() {
        let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
        for name in ["a", "b", "c"] {
            draft.push_line_item(LineItem::new(name, 1.0, 1.0));
        }
        let removed = draft.remove_line_item(1).unwrap();
        assert_eq!(removed.description, "b");
        let names: Vec<_> = draft.line_items().iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(draft.remove_line_item(5).is_none());
    }

    #[test]
    fn editing_missing_row_is_ignored() {
        let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
        assert!(draft.update_line_item(0, LineItemField::Rate, "5").is_none());
        assert!(draft.line_items().is_empty());
    }

    #[test]
    fn row_edits_feed_totals() {
        let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
        let idx = draft.add_line_item();
        draft.update_line_item(idx, LineItemField::Quantity, "3");
        draft.update_line_item(idx, LineItemField::Rate, "40");
        draft.set_tax_rate_input("5");
        draft.set_discount_input("oops");
        let totals = draft.totals();
        assert_eq!(totals.subtotal, 120.0);
        assert_eq!(totals.tax_amount, 6.0);
        assert_eq!(totals.total, 126.0);
        assert_eq!(draft.discount, 0.0);
    }

    #[test]
    fn description_edit_keeps_amount() {
        let item = LineItem::new("Old", 2.0, 100.0).with_field(LineItemField::Description, "New");
        assert_eq!(item.description, "New");
        assert_eq!(item.amount, 200.0);
    }

    #[test]
    fn non_numeric_quantity_becomes_zero() {
        let item = LineItem::new("Row", 2.0, 100.0).with_field(LineItemField::Quantity, "two");
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.amount, 0.0);
    }

    #[test]
    fn resolve_defaults_fills_blank_fields() {
        let mut draft = InvoiceDraft::new("", test_date(), &DraftDefaults::default());
        draft.issue_date.clear();
        draft.due_date.clear();
        draft.currency.clear();
        draft.notes = Some("   ".to_string());
        draft.company = None;
        draft.client = None;

        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        draft.resolve_defaults(today, &DraftDefaults::default());

        assert_eq!(draft.number, PLACEHOLDER_NUMBER);
        assert_eq!(draft.issue_date, "2025-02-01");
        assert_eq!(draft.due_date, "2025-03-03");
        assert_eq!(draft.currency, "PKR");
        assert_eq!(draft.notes, None);
        assert_eq!(draft.company, Some(default_company()));
        assert_eq!(draft.client, Some(sample_client()));
    }

    #[test]
    fn resolve_defaults_keeps_populated_fields() {
        let mut draft = InvoiceDraft::new("INV-7", test_date(), &DraftDefaults::default());
        draft.notes = Some("Net 30".to_string());
        let before = draft.clone();
        draft.resolve_defaults(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), &DraftDefaults::default());
        assert_eq!(draft, before);
    }

    #[test]
    fn next_number_counts_per_day() {
        let existing = ["INV-20241215-01", "INV-20241215-07", "INV-20241214-09", "custom"];
        assert_eq!(next_invoice_number(test_date(), existing), "INV-20241215-08");
        assert_eq!(next_invoice_number(test_date(), []), "INV-20241215-01");
    }

    #[test]
    fn next_number_does_not_overflow_huge_suffixes() {
        let existing = ["INV-20241215-4294967295"];
        assert_eq!(next_invoice_number(test_date(), existing), "INV-20241215-4294967296");
        let existing = ["INV-20241215-18446744073709551615"];
        assert_eq!(
            next_invoice_number(test_date(), existing),
            "INV-20241215-18446744073709551615"
        );
    }

    #[test]
    fn overflowing_row_amount_becomes_zero() {
        let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
        let idx = draft.add_line_item();
        draft.update_line_item(idx, LineItemField::Quantity, "1e200");
        let item = draft.update_line_item(idx, LineItemField::Rate, "1e200").unwrap();
        assert_eq!(item.rate, 1e200);
        assert_eq!(item.amount, 0.0);
        assert_eq!(LineItem::new("Big", 1e200, 1e200).amount, 0.0);

        draft.set_tax_rate_input("1e400");
        draft.set_discount_input("-1e999");
        assert_eq!((draft.tax_rate, draft.discount), (0.0, 0.0));
        assert!(draft.has_finite_figures());
    }

    #[test]
    fn hand_built_infinity_is_detected() {
        let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
        assert!(draft.has_finite_figures());
        draft.discount = f64::INFINITY;
        assert!(!draft.has_finite_figures());
        draft.discount = 0.0;
        let mut item = LineItem::new("Row", 1.0, 1.0);
        item.amount = f64::NAN;
        draft.push_line_item(item);
        assert!(!draft.has_finite_figures());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Quantity and rate edits always leave amount == quantity * rate.
        #[test]
        fn amount_tracks_quantity_and_rate(q in 0.0f64..10_000.0, r in 0.0f64..10_000.0) {
            let item = LineItem::default()
                .with_field(LineItemField::Quantity, &q.to_string())
                .with_field(LineItemField::Rate, &r.to_string());
            prop_assert!((item.amount - q * r).abs() <= 1e-9 * (1.0 + (q * r).abs()));
        }

        /// Totals follow their formulas and recomputing changes nothing.
        #[test]
        fn totals_follow_formulas_and_are_idempotent(
            rows in prop::collection::vec((0.0f64..1_000.0, 0.0f64..1_000.0), 0..20),
            tax_rate in 0.0f64..50.0,
            discount in 0.0f64..5_000.0,
        ) {
            let items: Vec<LineItem> = rows.iter().map(|(q, r)| LineItem::new("", *q, *r)).collect();
            let first = compute_totals(&items, tax_rate, discount);
            let second = compute_totals(&items, tax_rate, discount);
            prop_assert_eq!(first, second);

            let sum = items.iter().fold(0.0, |acc, i| acc + i.amount);
            prop_assert_eq!(first.subtotal, sum);
            prop_assert_eq!(first.tax_amount, sum * tax_rate / 100.0);
            prop_assert_eq!(first.total, sum + first.tax_amount - discount);
        }

        /// Removing a row and appending an equivalent one leaves the total
        /// unchanged apart from float reassociation.
        #[test]
        fn remove_then_readd_preserves_totals(
            rows in prop::collection::vec((0.0f64..1_000.0, 0.0f64..1_000.0), 1..10),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut draft = InvoiceDraft::new("INV-1", test_date(), &DraftDefaults::default());
            for (q, r) in &rows {
                draft.push_line_item(LineItem::new("row", *q, *r));
            }
            let before = draft.totals();
            let idx = pick.index(rows.len());
            let removed = draft.remove_line_item(idx).unwrap();
            let others: Vec<LineItem> = draft.line_items().to_vec();
            draft.push_line_item(removed);

            prop_assert_eq!(&draft.line_items()[..others.len()], &others[..]);
            prop_assert!((draft.totals().total - before.total).abs() <= 1e-6 * (1.0 + before.total.abs()));
        }
    }
}
