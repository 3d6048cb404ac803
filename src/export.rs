//! Print-ready export of rendered documents.
//!
//! The exported file is a standalone HTML page (A4, print colours kept) that
//! asks the browser to print itself when opened. PDF bytes are left to the
//! browser's print dialog.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use slug::slugify;
use tera::Context;

use crate::error::{Error, Result};
use crate::invoice::DATE_FORMAT;
use crate::model::InvoiceDraft;
use crate::template::{Document, PRINT_PAGE_NAME, Renderer};

#[derive(Serialize)]
struct PrintPage<'a> {
    number: &'a str,
    body: &'a str,
    auto_print: bool,
}

/// Wraps `doc` in the print page.
pub fn print_page(renderer: &Renderer, doc: &Document, draft: &InvoiceDraft, auto_print: bool) -> Result<String> {
    let page = PrintPage {
        number: &draft.number,
        body: &doc.html,
        auto_print,
    };
    let context = Context::from_serialize(&page)?;
    Ok(renderer.tera().render(PRINT_PAGE_NAME, &context)?)
}

/// `<number-slug>_<template>.html`, e.g. `inv-20241215-01_grid.html`.
pub fn export_file_name(draft: &InvoiceDraft, doc: &Document) -> String {
    let stem = slugify(&draft.number);
    let stem = if stem.is_empty() { "invoice".to_string() } else { stem };
    format!("{}_{}.html", stem, doc.template)
}

/// Writes the print page under `<out_dir>/<issue year>/` and returns its path.
pub fn export_document(renderer: &Renderer, doc: &Document, draft: &InvoiceDraft, out_dir: &Path) -> Result<PathBuf> {
    let year = NaiveDate::parse_from_str(&draft.issue_date, DATE_FORMAT)
        .map(|d| d.year())
        .unwrap_or_else(|_| Local::now().year());

    let target_dir = out_dir.join(year.to_string());
    fs::create_dir_all(&target_dir)
        .map_err(|e| Error::Export(format!("cannot create {}: {}", target_dir.display(), e)))?;

    let path = target_dir.join(export_file_name(draft, doc));
    let html = print_page(renderer, doc, draft, true)?;
    fs::write(&path, html).map_err(|e| Error::Export(format!("cannot write {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), template = %doc.template, "invoice exported");
    Ok(path)
}

/// Opens `path` with the platform's default viewer.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = Command::new("xdg-open");

    command
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| Error::Export(format!("could not open {}: {}", path.display(), e)))
}
