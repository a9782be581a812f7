//! PDF rendering for contract and invoice documents.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::entities::{Contract, Member, Payment};
use crate::error::{pdf_error, Error};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: Mm = Mm(20.0);
const LINE_HEIGHT: Mm = Mm(6.0);
// Helvetica at 11pt fits roughly this many characters in the text column.
const WRAP_COLUMNS: usize = 90;

const BRAND: &str = "CargoLink";

const LOGO_FILE: &str = "public/LOGO_.png";
const LOGO_WIDTH: Mm = Mm(40.0);
const LOGO_DPI: f64 = 300.0;

/// Brand image drawn in the top right corner of every document.
#[derive(Debug)]
pub struct Logo {
    png: Vec<u8>,
}

impl Logo {
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    /// Reads the logo from `root`, or from its parent when `root` has none.
    /// Documents render without a logo when neither is readable.
    pub async fn load(root: &Path) -> Option<Self> {
        let path = match resolve_logo(root) {
            Some(path) => path,
            None => {
                tracing::warn!(root = ?root, "{} not found, documents will have no logo", LOGO_FILE);
                return None;
            }
        };

        match tokio::fs::read(&path).await {
            Ok(png) => {
                tracing::info!(path = ?path, "logo loaded");
                Some(Self::from_png(png))
            }
            Err(err) => {
                tracing::warn!(path = ?path, "could not read logo: {}", err);
                None
            }
        }
    }

    fn draw(&self, layer: &PdfLayerReference) -> Result<(), Error> {
        let decoder = PngDecoder::new(Cursor::new(self.png.as_slice())).map_err(pdf_error)?;
        let image = Image::try_from(decoder).map_err(pdf_error)?;

        let width_px = image.image.width.0 as f64;
        let height_px = image.image.height.0 as f64;
        if width_px == 0.0 {
            return Err(pdf_error("logo has no pixels"));
        }

        let scale = LOGO_WIDTH.0 / (width_px * 25.4 / LOGO_DPI);
        let height = height_px * 25.4 / LOGO_DPI * scale;

        image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(PAGE_WIDTH.0 - MARGIN.0 - LOGO_WIDTH.0)),
                translate_y: Some(Mm(PAGE_HEIGHT.0 - MARGIN.0 - height)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(LOGO_DPI),
                ..Default::default()
            },
        );

        Ok(())
    }
}

/// `public/LOGO_.png` under `root`, falling back to the same path under its parent.
pub fn resolve_logo(root: &Path) -> Option<PathBuf> {
    std::iter::once(root)
        .chain(root.parent())
        .map(|dir| dir.join(LOGO_FILE))
        .find(|path| path.is_file())
}

struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: Mm,
    pages: usize,
}

impl Writer {
    fn new(title: &str, logo: Option<&Logo>) -> Result<Self, Error> {
        let (doc, page, layer) =
            PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        if let Some(logo) = logo {
            if let Err(err) = logo.draw(&layer) {
                tracing::warn!("rendering without logo: {}", err);
            }
        }

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: Mm(PAGE_HEIGHT.0 - MARGIN.0),
            pages: 1,
        })
    }

    fn ensure_room(&mut self, lines: u8) {
        let mut bottom = self.cursor.0;
        for _ in 0..lines {
            bottom -= LINE_HEIGHT.0;
        }

        if bottom >= MARGIN.0 {
            return;
        }

        self.pages += 1;
        let (page, layer) =
            self.doc
                .add_page(PAGE_WIDTH, PAGE_HEIGHT, format!("Layer {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = Mm(PAGE_HEIGHT.0 - MARGIN.0);
    }

    fn advance(&mut self, lines: u8) {
        for _ in 0..lines {
            self.cursor = Mm(self.cursor.0 - LINE_HEIGHT.0);
        }
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(2);
        self.layer
            .use_text(text, 16.0, MARGIN, self.cursor, &self.bold);
        self.advance(2);
    }

    fn label(&mut self, text: &str) {
        self.ensure_room(1);
        self.layer
            .use_text(text, 12.0, MARGIN, self.cursor, &self.bold);
        self.advance(1);
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, WRAP_COLUMNS) {
            self.ensure_room(1);
            self.layer
                .use_text(line, 11.0, MARGIN, self.cursor, &self.regular);
            self.advance(1);
        }
    }

    fn field(&mut self, name: &str, value: &str) {
        self.paragraph(&format!("{}: {}", name, value));
    }

    fn gap(&mut self) {
        self.advance(1);
    }

    fn finish(self) -> Result<Vec<u8>, Error> {
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Greedy word wrap. Words longer than `width` are split across lines.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut line = String::new();

        for word in raw.split_whitespace() {
            let word: Vec<char> = word.chars().collect();
            let mut chunks = word.chunks(width.max(1)).peekable();

            while let Some(chunk) = chunks.next() {
                let len = line.chars().count();
                let needed = if len == 0 { chunk.len() } else { len + 1 + chunk.len() };

                if needed > width && len > 0 {
                    lines.push(std::mem::take(&mut line));
                }

                if !line.is_empty() {
                    line.push(' ');
                }
                line.extend(chunk);

                if chunks.peek().is_some() {
                    lines.push(std::mem::take(&mut line));
                }
            }
        }

        lines.push(line);
    }

    lines
}

fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

fn date_or_dash(date: Option<chrono::DateTime<chrono::Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

pub fn render_contract(
    contract: &Contract,
    holder: &Member,
    logo: Option<&Logo>,
) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new(&format!("Contract {}", contract.title), logo)?;

    w.heading(&format!("{} - Contract", BRAND));
    w.field("Reference", &contract.id.to_string());
    w.field("Title", &contract.title);
    w.field("Status", contract.status.name());
    w.field("Issued", &contract.created_at.format("%Y-%m-%d").to_string());
    w.gap();

    w.label("Contracting party");
    w.field("Name", &holder.name);
    w.field("Email", &holder.email);
    if let Some(phone) = &holder.phone {
        w.field("Phone", phone);
    }
    w.field("Account", holder.role.name());
    w.gap();

    w.label("Period and value");
    w.field("Start", &date_or_dash(contract.start_date));
    w.field("End", &date_or_dash(contract.end_date));
    w.field(
        "Value",
        &contract
            .value
            .map(|v| money(v, "EUR"))
            .unwrap_or_else(|| "-".into()),
    );
    w.gap();

    w.label("Content");
    w.paragraph(&contract.content);
    w.gap();

    w.label("Terms");
    w.paragraph(&contract.terms);
    w.gap();

    w.label("Signatures");
    w.paragraph(&format!("For {}: ______________________", BRAND));
    w.paragraph(&format!("For {}: ______________________", holder.name));

    w.finish()
}

pub fn render_invoice(
    payment: &Payment,
    payer: &Member,
    logo: Option<&Logo>,
) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new(&format!("Invoice {}", payment.id), logo)?;

    w.heading(&format!("{} - Invoice", BRAND));
    w.field("Invoice number", &payment.id.to_string());
    w.field("Date", &payment.created_at.format("%Y-%m-%d").to_string());
    w.field("Status", payment.status.name());
    w.gap();

    w.label("Billed to");
    w.field("Name", &payer.name);
    w.field("Email", &payer.email);
    w.gap();

    w.label("Details");
    if let Some(match_id) = payment.match_id {
        w.field("Shipment match", &match_id.to_string());
    }
    if let Some(description) = &payment.description {
        w.paragraph(description);
    }
    w.field("Total", &money(payment.amount, &payment.currency));

    w.finish()
}
