use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use comfy_table::{Attribute, Cell, Color, Table};
use inquire::{Confirm, DateSelect, InquireError, Select, Text};

use invoice_studio::config::{self, AppSettings};
use invoice_studio::currency::{self, CURRENCIES};
use invoice_studio::export;
use invoice_studio::invoice::default_company;
use invoice_studio::logging;
use invoice_studio::money::{format_money, format_plain, parse_number};
use invoice_studio::store::InvoiceWithDetails;
use invoice_studio::{
    Error, FileStore, InvoiceDraft, InvoiceStore, LineItemField, Party, Renderer, Result, TEMPLATES, TemplateId,
    next_invoice_number,
};

// ==========================================
// Constants
// ==========================================
const NEW_CLIENT_OPT: &str = "➕ Add New Client";
// Invoices are issued by the first company in the store.
const SENDER_COMPANY_ID: u32 = 1;

const MENU_ADD: &str = "➕ Add line item";
const MENU_EDIT: &str = "✏️  Edit line item";
const MENU_REMOVE: &str = "🗑  Remove line item";
const MENU_TAX: &str = "Tax rate";
const MENU_DISCOUNT: &str = "Discount";
const MENU_NOTES: &str = "Notes";
const MENU_TEMPLATE: &str = "Template";
const MENU_CURRENCY: &str = "Currency";
const MENU_PREVIEW: &str = "👀 Preview";
const MENU_SAVE: &str = "💾 Save & exit";
const MENU_DISCARD: &str = "Discard changes";

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "invoice-studio", version, about = "Draft, preview and export invoices")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new invoice
    New,
    /// Edit an existing invoice
    Edit { id: u32 },
    /// Print a text preview of an invoice
    Show {
        id: u32,
        /// Template to render with (defaults to the invoice's own)
        #[arg(short, long)]
        template: Option<String>,
        /// Currency code to display (defaults to the invoice's own)
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Export an invoice as a printable HTML page
    Export {
        id: u32,
        #[arg(short, long)]
        template: Option<String>,
        #[arg(short, long)]
        currency: Option<String>,
        /// Open the exported page (and its print dialog) right away
        #[arg(long)]
        open: bool,
    },
    /// List stored invoices
    List,
    /// Delete an invoice and its line items
    Delete { id: u32 },
    /// Show the available templates
    Templates,
    /// Show the supported currencies
    Currencies,
    /// Convert an amount using the configured rates service
    Convert { amount: f64, from: String, to: String },
    /// Edit your own company details (the invoice sender)
    Company,
    /// Configure data directory and invoice defaults
    Config,
}

// ==========================================
// Main Function
// ==========================================

fn main() {
    logging::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        return;
    };

    if let Err(e) = run(command) {
        match e {
            Error::Prompt(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                println!("Cancelled.")
            }
            other => {
                eprintln!("❌ Error: {}", other);
                std::process::exit(1);
            }
        }
    }
}

fn run(command: Commands) -> Result<()> {
    let settings = config::load_settings()?;

    match command {
        Commands::New => {
            let mut store = FileStore::open(settings.store_path())?;
            new_invoice(&settings, &mut store)
        }
        Commands::Edit { id } => {
            let mut store = FileStore::open(settings.store_path())?;
            edit_invoice(&settings, &mut store, id)
        }
        Commands::Show { id, template, currency } => {
            let store = FileStore::open(settings.store_path())?;
            show_invoice(&settings, &store, id, template.as_deref(), currency.as_deref())
        }
        Commands::Export { id, template, currency, open } => {
            let store = FileStore::open(settings.store_path())?;
            export_invoice(&settings, &store, id, template.as_deref(), currency.as_deref(), open)
        }
        Commands::List => {
            let store = FileStore::open(settings.store_path())?;
            list_invoices(&store)
        }
        Commands::Delete { id } => {
            let mut store = FileStore::open(settings.store_path())?;
            delete_invoice(&mut store, id)
        }
        Commands::Templates => {
            show_templates();
            Ok(())
        }
        Commands::Currencies => {
            show_currencies();
            Ok(())
        }
        Commands::Convert { amount, from, to } => convert_amount(&settings, amount, &from, &to),
        Commands::Company => {
            let mut store = FileStore::open(settings.store_path())?;
            edit_company(&mut store)
        }
        Commands::Config => setup_config_wizard(settings).map(|_| ()),
    }
}

// ==========================================
// 1. Create & Edit
// ==========================================

fn new_invoice(settings: &AppSettings, store: &mut dyn InvoiceStore) -> Result<()> {
    let company_id = sender_company(store)?;
    let client_id = select_or_create_client(store)?;

    let issue_date = DateSelect::new("Invoice Date:")
        .with_default(Local::now().date_naive())
        .prompt()?;

    let existing = store.list_invoices()?;
    let number = next_invoice_number(issue_date, existing.iter().map(|inv| inv.draft.number.as_str()));
    println!("🧾 Invoice number: {}", number);

    let mut draft = InvoiceDraft::new(number, issue_date, &settings.draft_defaults());
    draft.template = pick_template(draft.template)?;
    draft.currency = pick_currency(&draft.currency)?;

    enter_line_items(&mut draft)?;

    let tax = Text::new("Tax Rate %:").with_default(&format_plain(draft.tax_rate)).prompt()?;
    draft.set_tax_rate_input(&tax);
    let discount = Text::new("Discount (absolute amount):").with_default("0").prompt()?;
    draft.set_discount_input(&discount);
    let notes = Text::new("Notes (Optional):").prompt()?;
    draft.notes = Some(notes).filter(|n| !n.trim().is_empty());

    print_totals(&draft);

    let saved = loop {
        match store.create_invoice(company_id, client_id, &draft) {
            Ok(saved) => break saved,
            Err(Error::DuplicateNumber(taken)) => {
                let existing = store.list_invoices()?;
                let renumbered = next_invoice_number(issue_date, existing.iter().map(|inv| inv.draft.number.as_str()));
                if renumbered == taken {
                    return Err(Error::DuplicateNumber(taken));
                }
                println!("⚠️  {} is already taken, renumbered to {}", taken, renumbered);
                draft.number = renumbered;
            }
            Err(e) => {
                println!("❌ Could not save: {}", e);
                if !Confirm::new("Try saving again?").with_default(true).prompt()? {
                    return Err(e);
                }
            }
        }
    };
    println!("✅ Invoice #{} saved as {}", saved.id, saved.draft.number);

    if Confirm::new("Export printable copy now?").with_default(true).prompt()? {
        let exported = Renderer::with_overrides(&settings.templates_dir()).and_then(|renderer| {
            export_and_report(settings, &renderer, &saved.draft, &saved.draft.currency, saved.draft.template, true)
        });
        if let Err(e) = exported {
            println!("❌ Export failed: {}", e);
            println!("   The invoice is saved; run `invoice-studio export {}` to try again.", saved.id);
        }
    }
    Ok(())
}

fn edit_invoice(settings: &AppSettings, store: &mut dyn InvoiceStore, id: u32) -> Result<()> {
    let mut invoice = load_invoice(store, id, settings)?;
    let renderer = Renderer::with_overrides(&settings.templates_dir())?;
    let draft = &mut invoice.draft;

    let menu = vec![
        MENU_ADD,
        MENU_EDIT,
        MENU_REMOVE,
        MENU_TAX,
        MENU_DISCOUNT,
        MENU_NOTES,
        MENU_TEMPLATE,
        MENU_CURRENCY,
        MENU_PREVIEW,
        MENU_SAVE,
        MENU_DISCARD,
    ];

    loop {
        print_line_items(draft);
        print_totals(draft);

        let choice = Select::new("What would you like to change?", menu.clone()).prompt()?;
        if choice == MENU_DISCARD {
            println!("↩️  Changes discarded.");
            return Ok(());
        }
        if choice == MENU_SAVE {
            match store.update_invoice(id, draft) {
                Ok(Some(saved)) => {
                    println!("✅ Saved {} ({} line items)", saved.draft.number, saved.line_item_ids.len());
                    return Ok(());
                }
                Ok(None) => {
                    println!("❌ Invoice #{} no longer exists.", id);
                    return Ok(());
                }
                Err(e) => {
                    println!("❌ Could not save: {}", e);
                    println!("   Your edits are kept. Save again or discard them.");
                    continue;
                }
            }
        }

        match apply_menu_choice(choice, draft, &renderer) {
            Ok(()) => {}
            Err(Error::Prompt(InquireError::OperationCanceled)) => println!("↩️  Back to menu."),
            Err(e @ Error::Prompt(_)) => return Err(e),
            Err(e) => println!("❌ {}", e),
        }
    }
}

fn apply_menu_choice(choice: &str, draft: &mut InvoiceDraft, renderer: &Renderer) -> Result<()> {
    match choice {
        MENU_ADD => {
            let idx = draft.add_line_item();
            edit_row(draft, idx)?;
        }
        MENU_EDIT => {
            if let Some(idx) = pick_row(draft, "Select line item to edit:")? {
                edit_row(draft, idx)?;
            }
        }
        MENU_REMOVE => {
            if let Some(idx) = pick_row(draft, "Select line item to remove:")? {
                draft.remove_line_item(idx);
            }
        }
        MENU_TAX => {
            let value = Text::new("Tax Rate %:").with_default(&format_plain(draft.tax_rate)).prompt()?;
            draft.set_tax_rate_input(&value);
        }
        MENU_DISCOUNT => {
            let value = Text::new("Discount:").with_default(&format_plain(draft.discount)).prompt()?;
            draft.set_discount_input(&value);
        }
        MENU_NOTES => {
            let current = draft.notes.clone().unwrap_or_default();
            let value = Text::new("Notes:").with_default(&current).prompt()?;
            draft.notes = Some(value).filter(|n| !n.trim().is_empty());
        }
        MENU_TEMPLATE => draft.template = pick_template(draft.template)?,
        MENU_CURRENCY => draft.currency = pick_currency(&draft.currency)?,
        MENU_PREVIEW => {
            let doc = renderer.render(draft, &draft.currency, draft.template)?;
            println!("\n{}\n", doc.to_text());
        }
        _ => {}
    }
    Ok(())
}

fn edit_row(draft: &mut InvoiceDraft, idx: usize) -> Result<()> {
    let Some(current) = draft.line_items().get(idx).cloned() else {
        return Ok(());
    };

    let description = Text::new("Description:").with_default(&current.description).prompt()?;
    draft.update_line_item(idx, LineItemField::Description, &description);
    let quantity = Text::new("Quantity:").with_default(&format_plain(current.quantity)).prompt()?;
    draft.update_line_item(idx, LineItemField::Quantity, &quantity);
    let rate = Text::new("Rate:").with_default(&format_plain(current.rate)).prompt()?;
    draft.update_line_item(idx, LineItemField::Rate, &rate);
    Ok(())
}

fn pick_row(draft: &InvoiceDraft, prompt: &str) -> Result<Option<usize>> {
    if draft.line_items().is_empty() {
        println!("❌ No line items yet.");
        return Ok(None);
    }
    let options: Vec<String> = draft
        .line_items()
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {} ({} × {})", i + 1, item.description, format_plain(item.quantity), format_plain(item.rate)))
        .collect();
    Ok(Some(Select::new(prompt, options).raw_prompt()?.index))
}

fn enter_line_items(draft: &mut InvoiceDraft) -> Result<()> {
    println!("\n--- Enter Line Items ---");
    println!("(Leave Description empty to finish)");

    loop {
        let desc = Text::new("Description (leave empty to finish):").prompt()?;
        if desc.trim().is_empty() {
            break;
        }

        let idx = draft.add_line_item();
        draft.update_line_item(idx, LineItemField::Description, &desc);
        let quantity = Text::new("Quantity:").with_default("1").prompt()?;
        draft.update_line_item(idx, LineItemField::Quantity, &quantity);
        let rate = Text::new("Rate:").prompt()?;
        draft.update_line_item(idx, LineItemField::Rate, &rate);
    }
    Ok(())
}

fn pick_template(current: TemplateId) -> Result<TemplateId> {
    let options: Vec<String> = TEMPLATES
        .iter()
        .map(|t| format!("{} ({}) - {}", t.name, t.id, t.description))
        .collect();
    let cursor = TEMPLATES.iter().position(|t| t.id == current).unwrap_or(0);
    let choice = Select::new("Template:", options).with_starting_cursor(cursor).raw_prompt()?;
    Ok(TEMPLATES[choice.index].id)
}

fn pick_currency(current: &str) -> Result<String> {
    let options: Vec<String> = CURRENCIES
        .iter()
        .map(|c| format!("{} ({}) - {}", c.code, c.symbol, c.name))
        .collect();
    let cursor = CURRENCIES.iter().position(|c| c.code == current).unwrap_or(0);
    let choice = Select::new("Currency:", options).with_starting_cursor(cursor).raw_prompt()?;
    Ok(CURRENCIES[choice.index].code.to_string())
}

// ==========================================
// 2. Parties
// ==========================================

fn sender_company(store: &mut dyn InvoiceStore) -> Result<u32> {
    if let Some(company) = store.get_company(SENDER_COMPANY_ID)? {
        return Ok(company.id);
    }
    Ok(store.create_company(default_company())?.id)
}

fn edit_company(store: &mut dyn InvoiceStore) -> Result<()> {
    let id = sender_company(store)?;
    let current = store.get_company(id)?.ok_or_else(|| Error::not_found("company", id))?.party;

    println!("\n--- Your Company ---");
    let name = Text::new("Company Name:").with_default(&current.name).prompt()?;
    let address = Text::new("Address (use '\\n' for new lines):")
        .with_default(&current.address.replace('\n', "\\n"))
        .prompt()?;
    let email = Text::new("Email:").with_default(&current.email).prompt()?;
    let phone = Text::new("Phone (Optional):")
        .with_default(current.phone.as_deref().unwrap_or(""))
        .prompt()?;

    let party = Party {
        name: name.trim().to_string(),
        address: address.replace("\\n", "\n"),
        email: email.trim().to_string(),
        phone: Some(phone).filter(|p| !p.trim().is_empty()),
    };
    if let Some(company) = store.update_company(id, party)? {
        println!("✅ Company updated: {}", company.party.name);
    }
    Ok(())
}

fn select_or_create_client(store: &mut dyn InvoiceStore) -> Result<u32> {
    let clients = store.list_clients()?;
    let mut options = vec![NEW_CLIENT_OPT.to_string()];
    options.extend(clients.iter().map(|c| format!("#{} {}", c.id, c.party.name)));

    let choice = Select::new("Please Select Client (Type to Filter):", options).raw_prompt()?;
    if choice.index == 0 {
        return create_client_wizard(store);
    }
    let client = &clients[choice.index - 1];
    println!("✅ Selected Client: {}", client.party.name);
    Ok(client.id)
}

fn create_client_wizard(store: &mut dyn InvoiceStore) -> Result<u32> {
    println!("\n--- Creating New Client ---");

    let name = Text::new("Client Name:").prompt()?;
    let address = Text::new("Address (use '\\n' for new lines):").prompt()?;
    let email = Text::new("Client Email:").prompt()?;
    let phone = Text::new("Phone (Optional):").prompt()?;

    let client = store.create_client(Party {
        name: name.trim().to_string(),
        address: address.replace("\\n", "\n"),
        email: email.trim().to_string(),
        phone: Some(phone).filter(|p| !p.trim().is_empty()),
    })?;

    println!("✅ Client created successfully: #{} {}", client.id, client.party.name);
    Ok(client.id)
}

// ==========================================
// 3. Show / Export / List / Delete
// ==========================================

fn load_invoice(store: &dyn InvoiceStore, id: u32, settings: &AppSettings) -> Result<InvoiceWithDetails> {
    let mut invoice = store.get_invoice(id)?.ok_or_else(|| Error::not_found("invoice", id))?;
    invoice
        .draft
        .resolve_defaults(Local::now().date_naive(), &settings.draft_defaults());
    Ok(invoice)
}

fn render_choice(draft: &InvoiceDraft, template: Option<&str>, currency: Option<&str>) -> (TemplateId, String) {
    let template = template.map(TemplateId::resolve).unwrap_or(draft.template);
    let currency = currency.unwrap_or(draft.currency.as_str()).to_uppercase();
    (template, currency)
}

fn show_invoice(
    settings: &AppSettings,
    store: &dyn InvoiceStore,
    id: u32,
    template: Option<&str>,
    currency: Option<&str>,
) -> Result<()> {
    let invoice = load_invoice(store, id, settings)?;
    let (template, currency) = render_choice(&invoice.draft, template, currency);

    let renderer = Renderer::with_overrides(&settings.templates_dir())?;
    let doc = renderer.render(&invoice.draft, &currency, template)?;
    println!("--- {} [{}] ---", doc.title, template.descriptor().name);
    println!("{}", doc.to_text());
    Ok(())
}

fn export_invoice(
    settings: &AppSettings,
    store: &dyn InvoiceStore,
    id: u32,
    template: Option<&str>,
    currency: Option<&str>,
    open: bool,
) -> Result<()> {
    let invoice = load_invoice(store, id, settings)?;
    let (template, currency) = render_choice(&invoice.draft, template, currency);
    let renderer = Renderer::with_overrides(&settings.templates_dir())?;
    export_and_report(settings, &renderer, &invoice.draft, &currency, template, open)
}

fn export_and_report(
    settings: &AppSettings,
    renderer: &Renderer,
    draft: &InvoiceDraft,
    currency: &str,
    template: TemplateId,
    open: bool,
) -> Result<()> {
    let doc = renderer.render(draft, currency, template)?;
    let path = export::export_document(renderer, &doc, draft, &settings.output_dir())?;
    println!("✅ Exported: {:?}", path);

    if open {
        // A viewer failing to launch leaves the exported file in place.
        if let Err(e) = export::open_in_viewer(&path) {
            println!("⚠️  {}", e);
        }
    }
    Ok(())
}

fn list_invoices(store: &dyn InvoiceStore) -> Result<()> {
    let invoices = store.list_invoices()?;
    if invoices.is_empty() {
        println!("(None found)");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Number"),
        Cell::new("Client"),
        Cell::new("Issued"),
        Cell::new("Due"),
        Cell::new("Template"),
        Cell::new("Status"),
        Cell::new("Total"),
    ]);

    for inv in &invoices {
        let total = inv.draft.totals().total;
        let symbol = currency::symbol_for(&inv.draft.currency);
        table.add_row(vec![
            Cell::new(inv.id),
            Cell::new(&inv.draft.number),
            Cell::new(&inv.client.party.name),
            Cell::new(&inv.draft.issue_date),
            Cell::new(&inv.draft.due_date),
            Cell::new(inv.draft.template),
            Cell::new(inv.draft.status),
            money_cell(symbol, total),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn delete_invoice(store: &mut dyn InvoiceStore, id: u32) -> Result<()> {
    let Some(invoice) = store.get_invoice(id)? else {
        println!("❌ Invoice #{} not found.", id);
        return Ok(());
    };

    let question = format!("Delete {} and its {} line items?", invoice.draft.number, invoice.line_item_ids.len());
    if Confirm::new(&question).with_default(false).prompt()? && store.delete_invoice(id)? {
        println!("🗑  Deleted {}", invoice.draft.number);
    }
    Ok(())
}

// ==========================================
// 4. Reference Data
// ==========================================

fn show_templates() {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("ID"), Cell::new("Name"), Cell::new("Description")]);
    for t in TEMPLATES {
        table.add_row(vec![Cell::new(t.id), Cell::new(t.name), Cell::new(t.description)]);
    }
    println!("{table}");
}

fn show_currencies() {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Code"), Cell::new("Symbol"), Cell::new("Name")]);
    for c in CURRENCIES {
        table.add_row(vec![Cell::new(c.code), Cell::new(c.symbol), Cell::new(c.name)]);
    }
    println!("{table}");
}

fn convert_amount(settings: &AppSettings, amount: f64, from: &str, to: &str) -> Result<()> {
    let Some(url) = settings.rates_url.as_deref() else {
        println!("❌ No rates_url configured. Run `invoice-studio config` first.");
        return Ok(());
    };

    let (from, to) = (from.to_uppercase(), to.to_uppercase());
    let rates = currency::fetch_rates(url)?;
    let converted = currency::convert(amount, &from, &to, &rates);
    println!(
        "💱 {} = {}",
        format_money(currency::symbol_for(&from), amount),
        format_money(currency::symbol_for(&to), converted)
    );
    Ok(())
}

// ==========================================
// 5. Tables
// ==========================================

fn money_cell(symbol: &str, value: f64) -> Cell {
    let cell = Cell::new(format_money(symbol, value));
    if value < 0.0 {
        cell.fg(Color::Rgb { r: 185, g: 28, b: 28 })
    } else {
        cell
    }
}

fn print_line_items(draft: &InvoiceDraft) {
    let symbol = currency::symbol_for(&draft.currency);
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Description"),
        Cell::new("Qty"),
        Cell::new("Rate"),
        Cell::new("Amount"),
    ]);
    for (i, item) in draft.line_items().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.description),
            Cell::new(format_plain(item.quantity)),
            Cell::new(format_money(symbol, item.rate)),
            Cell::new(format_money(symbol, item.amount)),
        ]);
    }
    println!("\n--- {} ({}, {}) ---", draft.number, draft.currency, draft.template);
    println!("{table}");
}

fn print_totals(draft: &InvoiceDraft) {
    let symbol = currency::symbol_for(&draft.currency);
    let totals = draft.totals();

    let mut table = Table::new();
    table.add_row(vec![Cell::new("Subtotal"), Cell::new(format_money(symbol, totals.subtotal))]);
    table.add_row(vec![
        Cell::new(format!("Tax ({}%)", format_plain(draft.tax_rate))),
        Cell::new(format_money(symbol, totals.tax_amount)),
    ]);
    if draft.discount > 0.0 {
        table.add_row(vec![
            Cell::new("Discount"),
            Cell::new(format!("-{}", format_money(symbol, draft.discount))),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        money_cell(symbol, totals.total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

// ==========================================
// 6. Config
// ==========================================

fn setup_config_wizard(current: AppSettings) -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");

    let data_root = Text::new("Root Data Directory:").with_default(&current.data_root).prompt()?;
    let default_currency = pick_currency(&current.default_currency)?;
    let default_template = pick_template(current.default_template)?;
    let tax = Text::new("Default Tax Rate %:")
        .with_default(&format_plain(current.default_tax_rate))
        .prompt()?;
    let terms = Text::new("Payment Terms (days):")
        .with_default(&current.payment_terms_days.to_string())
        .prompt()?;
    let rates_url = Text::new("Currency Rates URL (Optional):")
        .with_default(current.rates_url.as_deref().unwrap_or(""))
        .prompt()?;

    let settings = AppSettings {
        data_root,
        default_currency,
        default_template,
        default_tax_rate: parse_number(&tax),
        payment_terms_days: parse_number(&terms).max(0.0) as u64,
        rates_url: Some(rates_url).filter(|u| !u.trim().is_empty()),
    };

    config::save_settings(&settings)?;
    println!("✅ Settings saved to {:?}", config::config_path());
    Ok(settings)
}
