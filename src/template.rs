//! Template registry and the projector that turns a draft into a document.
//!
//! Every layout receives the same [`InvoiceView`]: figures are computed and
//! formatted once, placeholders are substituted once, and the layouts only
//! decide where things go on the page.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::currency;
use crate::error::Result;
use crate::invoice::{PLACEHOLDER_NUMBER, default_company, sample_client};
use crate::model::{InvoiceDraft, Party};
use crate::money::{format_money, format_plain};

// Embedded so a fresh install renders without any files on disk.
const MINIMALIST: &str = include_str!("../templates/minimalist.html");
const GRADIENT: &str = include_str!("../templates/gradient.html");
const GRID: &str = include_str!("../templates/grid.html");
const CLASSIC: &str = include_str!("../templates/classic.html");
const FREELANCE: &str = include_str!("../templates/freelance.html");
pub(crate) const PRINT_PAGE: &str = include_str!("../templates/print.html");
pub(crate) const PRINT_PAGE_NAME: &str = "print.html";

pub const PLACEHOLDER_DESCRIPTION: &str = "Service";
pub const PLACEHOLDER_NOTES: &str = "No additional notes.";
pub const PLACEHOLDER_DATE: &str = "Not set";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateId {
    #[default]
    Minimalist,
    Gradient,
    Grid,
    Classic,
    Freelance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
}

/// All layouts, in picker order.
pub const TEMPLATES: &[TemplateDescriptor] = &[
    TemplateDescriptor {
        id: TemplateId::Minimalist,
        name: "Minimalist Corporate",
        description: "Clean, monochrome, tech-focused",
    },
    TemplateDescriptor {
        id: TemplateId::Gradient,
        name: "Modern Gradient",
        description: "Creative, startup-friendly",
    },
    TemplateDescriptor {
        id: TemplateId::Grid,
        name: "Grid Tabular",
        description: "Structured, enterprise-grade",
    },
    TemplateDescriptor {
        id: TemplateId::Classic,
        name: "Classic Business",
        description: "Traditional, conservative",
    },
    TemplateDescriptor {
        id: TemplateId::Freelance,
        name: "Freelance/Service",
        description: "Friendly, personal",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template '{}'", self.0)
    }
}

impl std::error::Error for UnknownTemplate {}

impl TemplateId {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Minimalist => "minimalist",
            TemplateId::Gradient => "gradient",
            TemplateId::Grid => "grid",
            TemplateId::Classic => "classic",
            TemplateId::Freelance => "freelance",
        }
    }

    /// Lenient lookup: anything unrecognised becomes [`TemplateId::Minimalist`].
    pub fn resolve(id: &str) -> Self {
        id.parse().unwrap_or_else(|err: UnknownTemplate| {
            tracing::warn!(%err, fallback = "minimalist", "falling back to default template");
            TemplateId::Minimalist
        })
    }

    pub fn descriptor(self) -> &'static TemplateDescriptor {
        // Every variant has exactly one registry entry; see the registry test.
        TEMPLATES
            .iter()
            .find(|t| t.id == self)
            .unwrap_or(&TEMPLATES[0])
    }

    fn file_name(self) -> String {
        format!("{}.html", self.as_str())
    }

    fn embedded_source(self) -> &'static str {
        match self {
            TemplateId::Minimalist => MINIMALIST,
            TemplateId::Gradient => GRADIENT,
            TemplateId::Grid => GRID,
            TemplateId::Classic => CLASSIC,
            TemplateId::Freelance => FREELANCE,
        }
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        TEMPLATES
            .iter()
            .map(|t| t.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTemplate(wanted.to_string()))
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        TemplateId::resolve(&value)
    }
}

impl From<TemplateId> for String {
    fn from(value: TemplateId) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct PartyView {
    pub name: String,
    pub address_lines: Vec<String>,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&Party> for PartyView {
    fn from(party: &Party) -> Self {
        Self {
            name: party.name.clone(),
            address_lines: party
                .address
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            email: party.email.clone(),
            phone: party.phone.clone().filter(|p| !p.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemView {
    pub description: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

/// Fully populated, display-ready data handed to every layout.
#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub number: String,
    pub issue_date: String,
    pub due_date: String,
    pub status: String,
    pub currency: String,
    pub symbol: String,
    pub company: PartyView,
    pub client: PartyView,
    pub items: Vec<ItemView>,
    pub subtotal: String,
    pub tax_label: String,
    pub tax_amount: String,
    pub show_discount: bool,
    pub discount: String,
    pub total: String,
    pub notes: String,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

impl InvoiceView {
    pub fn resolve(draft: &InvoiceDraft, currency_code: &str) -> Self {
        let symbol = currency::symbol_for(currency_code);
        let totals = draft.totals();

        let items = draft
            .line_items()
            .iter()
            .map(|item| ItemView {
                description: or_placeholder(&item.description, PLACEHOLDER_DESCRIPTION),
                quantity: format_plain(item.quantity),
                rate: format_money(symbol, item.rate),
                amount: format_money(symbol, item.amount),
            })
            .collect();

        let company = draft.company.clone().unwrap_or_else(default_company);
        let client = draft.client.clone().unwrap_or_else(sample_client);

        Self {
            number: or_placeholder(&draft.number, PLACEHOLDER_NUMBER),
            issue_date: or_placeholder(&draft.issue_date, PLACEHOLDER_DATE),
            due_date: or_placeholder(&draft.due_date, PLACEHOLDER_DATE),
            status: draft.status.to_string(),
            currency: currency_code.trim().to_uppercase(),
            symbol: symbol.to_string(),
            company: PartyView::from(&company),
            client: PartyView::from(&client),
            items,
            subtotal: format_money(symbol, totals.subtotal),
            tax_label: format!("Tax ({}%)", format_plain(draft.tax_rate)),
            tax_amount: format_money(symbol, totals.tax_amount),
            show_discount: draft.discount > 0.0,
            discount: format!("-{}", format_money(symbol, draft.discount)),
            total: format_money(symbol, totals.total),
            notes: or_placeholder(draft.notes.as_deref().unwrap_or_default(), PLACEHOLDER_NOTES),
        }
    }
}

/// A rendered invoice: a self-contained HTML fragment (styles inline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub template: TemplateId,
    pub title: String,
    pub html: String,
}

static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(p|div|h[1-6]|tr|li|header|section|table|thead|tbody)>|<br\s*/?>").expect("valid regex"));
static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<style>.*?</style>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}

impl Document {
    /// Terminal-friendly text: one line per block element, tags and styles
    /// removed, whitespace collapsed.
    pub fn to_text(&self) -> String {
        let without_styles = STYLE_BLOCK.replace_all(&self.html, "");
        let with_breaks = BLOCK_END.replace_all(&without_styles, "\n");
        let bare = ANY_TAG.replace_all(&with_breaks, " ");

        decode_entities(&bare)
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Holds the compiled layouts.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Layouts compiled from the copies embedded in the binary.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        let mut sources: Vec<(String, &str)> = TEMPLATES
            .iter()
            .map(|t| (t.id.file_name(), t.id.embedded_source()))
            .collect();
        sources.push((PRINT_PAGE_NAME.to_string(), PRINT_PAGE));
        tera.add_raw_templates(sources)?;
        Ok(Self { tera })
    }

    /// Embedded layouts, with any `<id>.html` found in `dir` taking precedence.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;
        if !dir.is_dir() {
            return Ok(renderer);
        }

        for descriptor in TEMPLATES {
            let name = descriptor.id.file_name();
            let path = dir.join(&name);
            if path.is_file() {
                tracing::info!(path = %path.display(), "using template override");
                renderer.tera.add_template_file(&path, Some(name.as_str()))?;
            }
        }
        Ok(renderer)
    }

    /// Projects `draft` through one layout. Does not touch the draft; equal
    /// inputs give byte-identical output.
    pub fn render(&self, draft: &InvoiceDraft, currency_code: &str, template: TemplateId) -> Result<Document> {
        let view = InvoiceView::resolve(draft, currency_code);
        let context = Context::from_serialize(&view)?;
        let html = self.tera.render(&template.file_name(), &context)?;

        Ok(Document {
            template,
            title: format!("Invoice {}", view.number),
            html,
        })
    }

    /// Same as [`Renderer::render`] for an id coming straight from user input.
    pub fn render_named(&self, draft: &InvoiceDraft, currency_code: &str, template_id: &str) -> Result<Document> {
        self.render(draft, currency_code, TemplateId::resolve(template_id))
    }

    pub(crate) fn tera(&self) -> &Tera {
        &self.tera
    }
}
