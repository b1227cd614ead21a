//! [`FormBackend`] for AcroForm PDF templates, built on `lopdf`.
//!
//! Text fields get their `/V` set along with a plain Helvetica appearance
//! stream. Button groups get `/V` on the parent and `/AS` on every kid
//! widget. Flattening stamps each widget's normal appearance onto its page
//! as a form XObject and then drops the widgets and the AcroForm.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use claim_fields::SelectionToken;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use crate::backend::FormBackend;
use crate::error::{RenderError, Result};

const FONT_RESOURCE: &str = "Helv";
const ANNOTATION_HIDDEN: i64 = 1 << 1;
const MAX_TREE_DEPTH: usize = 32;
const TEXT_INSET: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl FieldType {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"Tx" => FieldType::Text,
            b"Btn" => FieldType::Button,
            b"Ch" => FieldType::Choice,
            b"Sig" => FieldType::Signature,
            _ => FieldType::Unknown,
        }
    }

    fn accepts_text(self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::Choice | FieldType::Unknown
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct FieldEntry {
    id: ObjectId,
    field_type: FieldType,
}

/// An open AcroForm document with its terminal fields indexed by
/// fully-qualified name.
#[derive(Debug, Clone)]
pub struct PdfForm {
    document: Document,
    fields: BTreeMap<String, FieldEntry>,
}

impl PdfForm {
    pub fn from_document(document: Document) -> Result<Self> {
        if acroform(&document)?.is_none() {
            return Err(RenderError::malformed("document has no AcroForm"));
        }
        let fields = index_fields(&document)?;
        Ok(Self { document, fields })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|entry| entry.field_type)
    }

    /// Current `/V` of a text field.
    pub fn text_value(&self, name: &str) -> Option<String> {
        let entry = self.fields.get(name)?;
        let dict = self.document.get_dictionary(entry.id).ok()?;
        let bytes = dict.get(b"V").and_then(Object::as_str).ok()?;
        Some(decode_text_string(bytes))
    }

    /// Current `/V` of a button group, without the leading `/`.
    pub fn selected_option(&self, name: &str) -> Option<String> {
        let entry = self.fields.get(name)?;
        let dict = self.document.get_dictionary(entry.id).ok()?;
        let bytes = dict.get(b"V").and_then(Object::as_name).ok()?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// lopdf-backed form backend.
#[derive(Debug, Clone)]
pub struct AcroFormBackend {
    max_font_size: f32,
}

impl Default for AcroFormBackend {
    fn default() -> Self {
        Self { max_font_size: 10.0 }
    }
}

impl AcroFormBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_font_size(mut self, size: f32) -> Self {
        self.max_font_size = size;
        self
    }
}

impl FormBackend for AcroFormBackend {
    type Form = PdfForm;

    fn load(&self, path: &Path) -> Result<PdfForm> {
        let document = Document::load(path).map_err(RenderError::pdf("load form"))?;
        let form = PdfForm::from_document(document)?;
        debug!(path = %path.display(), fields = form.fields.len(), "loaded form");
        Ok(form)
    }

    fn field_names(&self, form: &PdfForm) -> BTreeSet<String> {
        form.fields.keys().cloned().collect()
    }

    fn set_text_field(&self, form: &mut PdfForm, field: &str, value: &str) -> Result<()> {
        let entry = form
            .fields
            .get(field)
            .copied()
            .ok_or_else(|| RenderError::UnknownField {
                name: field.to_string(),
            })?;
        if !entry.field_type.accepts_text() {
            return Err(RenderError::malformed(format!(
                "'{field}' is not a text field"
            )));
        }
        let document = &mut form.document;
        set_text(document, entry.id, value, self.max_font_size)?;
        if let Some(acroform) = acroform_mut(document)? {
            acroform.set("NeedAppearances", Object::Boolean(true));
        }
        trace!(field, "wrote text field");
        Ok(())
    }

    fn set_selection_field(
        &self,
        form: &mut PdfForm,
        field: &str,
        token: &SelectionToken,
    ) -> Result<()> {
        let entry = form
            .fields
            .get(field)
            .copied()
            .ok_or_else(|| RenderError::UnknownField {
                name: field.to_string(),
            })?;
        if entry.field_type != FieldType::Button {
            return Err(RenderError::malformed(format!(
                "'{field}' is not a button field"
            )));
        }
        let document = &mut form.document;
        let state = token.as_str().as_bytes();

        let mut widget_states = Vec::new();
        for widget in widgets(document, entry.id)? {
            let on = appearance_states(document, widget)?
                .iter()
                .any(|name| name.as_slice() == state);
            widget_states.push((widget, on));
        }
        if !widget_states.iter().any(|(_, on)| *on) {
            return Err(RenderError::UnknownOption {
                group: field.to_string(),
                token: token.to_string(),
            });
        }

        dictionary_mut(document, entry.id)?.set("V", Object::Name(state.to_vec()));
        for (widget, on) in widget_states {
            let appearance = if on { state.to_vec() } else { b"Off".to_vec() };
            dictionary_mut(document, widget)?.set("AS", Object::Name(appearance));
        }
        Ok(())
    }

    fn flatten(&self, form: &mut PdfForm) -> Result<()> {
        let document = &mut form.document;
        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(RenderError::Flatten {
                reason: "document has no pages".to_string(),
            });
        }
        let mut stamped = 0;
        for page in pages {
            stamped += flatten_page(document, page)?;
        }
        let root = catalog_id(document)?;
        dictionary_mut(document, root)?.remove(b"AcroForm");
        form.fields.clear();
        debug!(widgets = stamped, "flattened form");
        Ok(())
    }

    fn write(&self, form: &PdfForm, path: &Path) -> Result<()> {
        let mut document = form.document.clone();
        document
            .save(path)
            .map_err(|error| RenderError::Pdf {
                operation: "write form",
                source: error.into(),
            })?;
        Ok(())
    }
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => document
            .get_object(*id)
            .map_err(RenderError::pdf("resolve reference")),
        other => Ok(other),
    }
}

fn dictionary(document: &Document, id: ObjectId) -> Result<&Dictionary> {
    document
        .get_dictionary(id)
        .map_err(RenderError::pdf("read dictionary"))
}

fn dictionary_mut(document: &mut Document, id: ObjectId) -> Result<&mut Dictionary> {
    document
        .get_dictionary_mut(id)
        .map_err(RenderError::pdf("update dictionary"))
}

fn resolved_dict<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Dictionary> {
    resolve(document, object)?
        .as_dict()
        .map_err(RenderError::pdf("read dictionary"))
}

fn resolved_array<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Vec<Object>> {
    resolve(document, object)?
        .as_array()
        .map_err(RenderError::pdf("read array"))
}

fn catalog_id(document: &Document) -> Result<ObjectId> {
    document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(RenderError::pdf("locate document catalog"))
}

fn acroform(document: &Document) -> Result<Option<&Dictionary>> {
    let catalog = dictionary(document, catalog_id(document)?)?;
    match catalog.get(b"AcroForm") {
        Ok(object) => resolved_dict(document, object).map(Some),
        Err(_) => Ok(None),
    }
}

fn acroform_mut(document: &mut Document) -> Result<Option<&mut Dictionary>> {
    let root = catalog_id(document)?;
    let indirect = dictionary(document, root)?
        .get(b"AcroForm")
        .and_then(Object::as_reference)
        .ok();
    if let Some(id) = indirect {
        return dictionary_mut(document, id).map(Some);
    }
    match dictionary_mut(document, root)?.get_mut(b"AcroForm") {
        Ok(Object::Dictionary(acroform)) => Ok(Some(acroform)),
        _ => Ok(None),
    }
}

fn kids(document: &Document, dict: &Dictionary) -> Result<Vec<ObjectId>> {
    match dict.get(b"Kids") {
        Ok(object) => Ok(resolved_array(document, object)?
            .iter()
            .filter_map(|kid| kid.as_reference().ok())
            .collect()),
        Err(_) => Ok(Vec::new()),
    }
}

fn index_fields(document: &Document) -> Result<BTreeMap<String, FieldEntry>> {
    let mut fields = BTreeMap::new();
    let Some(acroform) = acroform(document)? else {
        return Ok(fields);
    };
    let roots: Vec<ObjectId> = match acroform.get(b"Fields") {
        Ok(object) => resolved_array(document, object)?
            .iter()
            .filter_map(|field| field.as_reference().ok())
            .collect(),
        Err(_) => Vec::new(),
    };
    for root in roots {
        walk_field(document, root, "", None, &mut fields, 0)?;
    }
    Ok(fields)
}

fn walk_field(
    document: &Document,
    id: ObjectId,
    parent_name: &str,
    inherited: Option<FieldType>,
    fields: &mut BTreeMap<String, FieldEntry>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_TREE_DEPTH {
        return Err(RenderError::malformed("form field tree is too deep"));
    }
    let dict = dictionary(document, id)?;
    let partial = dict
        .get(b"T")
        .and_then(Object::as_str)
        .ok()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
    let name = match partial {
        None => parent_name.to_string(),
        Some(partial) if parent_name.is_empty() => partial,
        Some(partial) => format!("{parent_name}.{partial}"),
    };
    let field_type = dict
        .get(b"FT")
        .and_then(Object::as_name)
        .ok()
        .map(FieldType::from_name)
        .or(inherited);

    // Kids without a /T are widgets of this field, not child fields.
    let child_fields: Vec<ObjectId> = kids(document, dict)?
        .into_iter()
        .filter(|kid| {
            document
                .get_dictionary(*kid)
                .is_ok_and(|kid| kid.has(b"T"))
        })
        .collect();
    if child_fields.is_empty() {
        if !name.is_empty() {
            fields.insert(
                name,
                FieldEntry {
                    id,
                    field_type: field_type.unwrap_or(FieldType::Unknown),
                },
            );
        }
        return Ok(());
    }
    for child in child_fields {
        walk_field(document, child, &name, field_type, fields, depth + 1)?;
    }
    Ok(())
}

/// Widget annotations of a terminal field; merged fields are their own widget.
fn widgets(document: &Document, field: ObjectId) -> Result<Vec<ObjectId>> {
    let kids = kids(document, dictionary(document, field)?)?;
    if kids.is_empty() {
        Ok(vec![field])
    } else {
        Ok(kids)
    }
}

/// `(x, y, width, height)` of a widget rectangle.
fn widget_rect(document: &Document, widget: &Dictionary) -> Result<(f32, f32, f32, f32)> {
    let rect = widget
        .get(b"Rect")
        .map_err(RenderError::pdf("read widget rectangle"))?;
    let corners: Vec<f32> = resolved_array(document, rect)?
        .iter()
        .filter_map(|value| value.as_float().ok())
        .collect();
    let [x1, y1, x2, y2] = corners[..] else {
        return Err(RenderError::malformed("widget rectangle needs four numbers"));
    };
    Ok((x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs()))
}

/// Text string for `/V`: plain bytes for ASCII, UTF-16BE with a byte order
/// mark otherwise.
fn text_string(value: &str) -> Vec<u8> {
    if value.is_ascii() {
        return value.as_bytes().to_vec();
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend(unit.to_be_bytes());
    }
    bytes
}

fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().copied().map(char::from).collect(),
    }
}

/// WinAnsiEncoding byte for a character, for the appearance font.
fn win_ansi_byte(c: char) -> Option<u8> {
    let code = u32::from(c);
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return u8::try_from(code).ok();
    }
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Appearance bytes; characters the font cannot show become `?`.
fn win_ansi(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

fn number(value: f32) -> Object {
    Object::Real(value)
}

fn font_resources() -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    let mut fonts = Dictionary::new();
    fonts.set(FONT_RESOURCE, Object::Dictionary(font));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    resources
}

fn text_appearance(text: &[u8], width: f32, height: f32, max_font_size: f32) -> Result<Stream> {
    let font_size = (height * 0.7).clamp(4.0, max_font_size);
    let baseline = ((height - font_size) / 2.0 + font_size * 0.2).max(1.0);
    let content = Content {
        operations: vec![
            Operation::new("BMC", vec![Object::Name(b"Tx".to_vec())]),
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_RESOURCE.into()), number(font_size)],
            ),
            Operation::new("Td", vec![number(TEXT_INSET), number(baseline)]),
            Operation::new("Tj", vec![Object::string_literal(text.to_vec())]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("EMC", vec![]),
        ],
    };
    let bytes = content
        .encode()
        .map_err(RenderError::pdf("encode field appearance"))?;

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Form".to_vec()));
    dict.set(
        "BBox",
        Object::Array(vec![number(0.0), number(0.0), number(width), number(height)]),
    );
    dict.set("Resources", Object::Dictionary(font_resources()));
    Ok(Stream::new(dict, bytes))
}

fn set_text(document: &mut Document, field: ObjectId, value: &str, max_font: f32) -> Result<()> {
    // Every widget is checked before the field is touched.
    let text = win_ansi(value);
    let mut appearances = Vec::new();
    for widget in widgets(document, field)? {
        let (_, _, width, height) = widget_rect(document, dictionary(document, widget)?)?;
        appearances.push((widget, text_appearance(&text, width, height, max_font)?));
    }

    dictionary_mut(document, field)?.set("V", Object::string_literal(text_string(value)));
    for (widget, appearance) in appearances {
        let appearance_id = document.add_object(appearance);
        let mut states = Dictionary::new();
        states.set("N", Object::Reference(appearance_id));
        dictionary_mut(document, widget)?.set("AP", Object::Dictionary(states));
    }
    Ok(())
}

/// Names of the normal appearance states of a button widget.
fn appearance_states(document: &Document, widget: ObjectId) -> Result<Vec<Vec<u8>>> {
    let dict = dictionary(document, widget)?;
    let Ok(appearances) = dict.get(b"AP") else {
        return Ok(Vec::new());
    };
    let Ok(normal) = resolved_dict(document, appearances)?.get(b"N") else {
        return Ok(Vec::new());
    };
    match resolve(document, normal)? {
        Object::Dictionary(states) => Ok(states.iter().map(|(name, _)| name.clone()).collect()),
        _ => Ok(Vec::new()),
    }
}

enum Appearance {
    Indirect(ObjectId),
    Inline(Stream),
}

struct Stamp {
    appearance: Appearance,
    x: f32,
    y: f32,
}

fn is_widget(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .and_then(Object::as_name)
        .is_ok_and(|subtype| subtype == b"Widget".as_slice())
}

fn is_hidden(dict: &Dictionary) -> bool {
    dict.get(b"F")
        .and_then(Object::as_i64)
        .is_ok_and(|flags| flags & ANNOTATION_HIDDEN != 0)
}

fn stream_appearance(id: Option<ObjectId>, object: &Object) -> Option<Appearance> {
    match (id, object) {
        (Some(id), Object::Stream(_)) => Some(Appearance::Indirect(id)),
        (None, Object::Stream(stream)) => Some(Appearance::Inline(stream.clone())),
        _ => None,
    }
}

/// The appearance a widget currently shows, honouring `/AS` for buttons.
fn normal_appearance(document: &Document, widget: &Dictionary) -> Result<Option<Appearance>> {
    let Ok(appearances) = widget.get(b"AP") else {
        return Ok(None);
    };
    let Ok(normal) = resolved_dict(document, appearances)?.get(b"N") else {
        return Ok(None);
    };
    let normal_id = normal.as_reference().ok();
    match resolve(document, normal)? {
        Object::Dictionary(states) => {
            let Ok(state) = widget.get(b"AS").and_then(Object::as_name) else {
                return Ok(None);
            };
            let Ok(chosen) = states.get(state) else {
                return Ok(None);
            };
            let chosen_id = chosen.as_reference().ok();
            Ok(stream_appearance(chosen_id, resolve(document, chosen)?))
        }
        object => Ok(stream_appearance(normal_id, object)),
    }
}

fn page_resources(document: &Document, page: ObjectId) -> Result<Dictionary> {
    let mut current = Some(page);
    let mut depth = 0;
    while let Some(id) = current {
        let dict = dictionary(document, id)?;
        if let Ok(resources) = dict.get(b"Resources") {
            return Ok(resolved_dict(document, resources)?.clone());
        }
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok(Dictionary::new())
}

fn page_contents(document: &Document, page: &Dictionary) -> Result<Vec<Object>> {
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match document
            .get_object(*id)
            .map_err(RenderError::pdf("read page contents"))?
        {
            Object::Array(parts) => Ok(parts.clone()),
            _ => Ok(vec![Object::Reference(*id)]),
        },
        Ok(Object::Array(parts)) => Ok(parts.clone()),
        Ok(_) | Err(_) => Ok(Vec::new()),
    }
}

fn flatten_page(document: &mut Document, page: ObjectId) -> Result<usize> {
    let page_dict = dictionary(document, page)?;
    let annotations = match page_dict.get(b"Annots") {
        Ok(object) => resolved_array(document, object)?.clone(),
        Err(_) => return Ok(0),
    };

    let mut kept = Vec::new();
    let mut stamps = Vec::new();
    for annotation in annotations {
        let Ok(id) = annotation.as_reference() else {
            kept.push(annotation);
            continue;
        };
        let dict = dictionary(document, id)?;
        if !is_widget(dict) {
            kept.push(annotation);
            continue;
        }
        if is_hidden(dict) {
            continue;
        }
        if let Some(appearance) = normal_appearance(document, dict)? {
            let (x, y, _, _) = widget_rect(document, dict)?;
            stamps.push(Stamp { appearance, x, y });
        }
    }

    let mut resources = page_resources(document, page)?;
    let mut xobjects = match resources.get(b"XObject") {
        Ok(object) => resolved_dict(document, object)?.clone(),
        Err(_) => Dictionary::new(),
    };
    let mut contents = vec![];
    let existing = page_contents(document, dictionary(document, page)?)?;

    let stamped = stamps.len();
    let mut operations = vec![Operation::new("Q", vec![])];
    for (index, stamp) in stamps.into_iter().enumerate() {
        let appearance = match stamp.appearance {
            Appearance::Indirect(id) => id,
            Appearance::Inline(stream) => document.add_object(stream),
        };
        let name = format!("FlatField{index}");
        xobjects.set(name.as_str(), Object::Reference(appearance));
        operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    number(1.0),
                    number(0.0),
                    number(0.0),
                    number(1.0),
                    number(stamp.x),
                    number(stamp.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }
    resources.set("XObject", Object::Dictionary(xobjects));

    let stamp_bytes = Content { operations }
        .encode()
        .map_err(RenderError::pdf("encode flattened content"))?;
    let save_state = document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let stamp_content = document.add_object(Stream::new(Dictionary::new(), stamp_bytes));
    contents.push(Object::Reference(save_state));
    contents.extend(existing);
    contents.push(Object::Reference(stamp_content));

    let page_dict = dictionary_mut(document, page)?;
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Array(contents));
    if kept.is_empty() {
        page_dict.remove(b"Annots");
    } else {
        page_dict.set("Annots", Object::Array(kept));
    }
    Ok(stamped)
}
