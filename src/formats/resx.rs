//! Support for .NET `.resx` resource files.
//!
//! A document is kept as the full sequence of XML events it was parsed from,
//! so writing it back reproduces the input byte for byte apart from the
//! entries appended to it. Entries are the `<data name="...">` elements that
//! are direct children of the root element:
//!
//! ```xml
//! <root>
//!   <data name="Greeting" xml:space="preserve">
//!     <value>Hello</value>
//!     <comment>Shown on the start page</comment>
//!   </data>
//! </root>
//! ```

use std::{
    collections::HashMap,
    io::{BufRead, Write},
    ops::Range,
};

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use quick_xml::{
    Reader, Writer,
    events::{BytesStart, BytesText, Event},
};

use crate::{error::Error, traits::Parser};

const ENTRY_TAG: &[u8] = b"data";
const VALUE_TAG: &[u8] = b"value";
const COMMENT_TAG: &[u8] = b"comment";
const DEFAULT_INDENT: &str = "\n  ";

/// The byte encoding a document was read with; it is written back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    fn decode(bytes: &[u8]) -> Result<(String, Self), Error> {
        let Some((encoding, bom_len)) = Encoding::for_bom(bytes) else {
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::Encoding(format!("invalid UTF-8 data: {}", e)))?;
            return Ok((text, TextEncoding::Utf8));
        };

        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(Error::Encoding(format!("invalid {} data", encoding.name())));
        }
        let detected = if encoding == UTF_8 {
            TextEncoding::Utf8Bom
        } else if encoding == UTF_16LE {
            TextEncoding::Utf16Le
        } else if encoding == UTF_16BE {
            TextEncoding::Utf16Be
        } else {
            return Err(Error::Encoding(format!(
                "unsupported encoding {}",
                encoding.name()
            )));
        };
        Ok((text.into_owned(), detected))
    }

    fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut out = vec![0xEF, 0xBB, 0xBF];
                out.extend_from_slice(text.as_bytes());
                out
            }
            TextEncoding::Utf16Le => {
                let mut out = vec![0xFF, 0xFE];
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                out
            }
            TextEncoding::Utf16Be => {
                let mut out = vec![0xFE, 0xFF];
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                out
            }
        }
    }
}

/// A read-only view of one entry of a [`ResxDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The `name` attribute; lookups compare it exactly.
    pub name: String,
    /// Text of the `<value>` element, `None` if the entry has none.
    pub value: Option<String>,
    /// Text of the `<comment>` element, if any.
    pub comment: Option<String>,
    span: Range<usize>,
}

/// An entry element detached from any document, ready to be appended to one.
#[derive(Debug, Clone)]
pub struct EntryNode {
    name: String,
    events: Vec<Event<'static>>,
}

impl EntryNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Result<Option<String>, Error> {
        child_text(&self.events, VALUE_TAG)
    }

    pub fn comment(&self) -> Result<Option<String>, Error> {
        child_text(&self.events, COMMENT_TAG)
    }

    /// Replaces the text of the `<value>` element.
    pub fn set_value(&mut self, value: &str) -> Result<(), Error> {
        let child = find_child(&self.events, VALUE_TAG)
            .ok_or_else(|| Error::MissingValue(self.name.clone()))?;
        replace_text(&mut self.events, child, value);
        Ok(())
    }

    /// Replaces the text of the `<comment>` element. Returns false if there is none.
    pub fn set_comment(&mut self, comment: &str) -> bool {
        match find_child(&self.events, COMMENT_TAG) {
            Some(child) => {
                replace_text(&mut self.events, child, comment);
                true
            }
            None => false,
        }
    }
}

/// A parsed `.resx` document.
#[derive(Debug, Clone)]
pub struct ResxDocument {
    events: Vec<Event<'static>>,
    encoding: TextEncoding,
    root_start: usize,
    root_end: usize,
    child_indent: Option<String>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ResxDocument {
    /// Entries in document order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Deep copy of an entry of this document.
    pub fn clone_entry(&self, entry: &Entry) -> EntryNode {
        EntryNode {
            name: entry.name.clone(),
            events: self.events[entry.span.clone()].to_vec(),
        }
    }

    /// Appends `node` as the last child of the root element.
    ///
    /// The node is indented like the existing children. Names are not checked
    /// for duplicates here.
    pub fn append(&mut self, node: EntryNode) -> Result<(), Error> {
        let (name, value, comment) = describe(&node.events)?;

        let trailing_whitespace = self.root_end > self.root_start + 1
            && is_whitespace_text(&self.events[self.root_end - 1]);
        let at = if trailing_whitespace {
            self.root_end - 1
        } else {
            self.root_end
        };
        let indent = self
            .child_indent
            .get_or_insert_with(|| DEFAULT_INDENT.to_string())
            .clone();

        let node_len = node.events.len();
        let mut inserted = Vec::with_capacity(node_len + 2);
        inserted.push(Event::Text(BytesText::from_escaped(indent.clone())));
        inserted.extend(node.events);
        if !trailing_whitespace {
            let newline = if indent.contains('\r') { "\r\n" } else { "\n" };
            inserted.push(Event::Text(BytesText::from_escaped(newline)));
        }
        let inserted_len = inserted.len();
        self.events.splice(at..at, inserted);

        let span = at + 1..at + 1 + node_len;
        self.root_end += inserted_len;
        self.index.entry(name.clone()).or_insert(self.entries.len());
        self.entries.push(Entry {
            name,
            value,
            comment,
            span,
        });
        Ok(())
    }

    fn parse(text: &str, encoding: TextEncoding) -> Result<Self, Error> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut events: Vec<Event<'static>> = Vec::new();
        let mut depth = 0usize;
        let mut root_start = None;
        let mut root_end = None;
        let mut child_indent = None;
        let mut open_entry = None;
        let mut spans = Vec::new();

        loop {
            let event = reader.read_event()?;
            check_escapes(&event)?;
            match &event {
                Event::Eof => break,
                Event::Start(e) => {
                    if depth == 0 {
                        if root_start.is_some() {
                            return Err(Error::invalid_resource("more than one root element"));
                        }
                        root_start = Some(events.len());
                    } else if depth == 1 {
                        note_indent(&events, &mut child_indent);
                        if e.name().as_ref() == ENTRY_TAG {
                            open_entry = Some(events.len());
                        }
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Err(Error::invalid_resource("unmatched closing tag"));
                    }
                    depth -= 1;
                    if depth == 0 {
                        root_end = Some(events.len());
                    } else if depth == 1 {
                        if let Some(start) = open_entry.take() {
                            spans.push(start..events.len() + 1);
                        }
                    }
                }
                Event::Empty(e) => {
                    if depth == 0 {
                        if root_start.is_some() {
                            return Err(Error::invalid_resource("more than one root element"));
                        }
                        // An empty root is expanded so entries can be appended to it.
                        root_start = Some(events.len());
                        root_end = Some(events.len() + 1);
                        events.push(Event::Start(e.clone().into_owned()));
                        events.push(Event::End(e.to_end().into_owned()));
                        continue;
                    }
                    if depth == 1 {
                        note_indent(&events, &mut child_indent);
                        if e.name().as_ref() == ENTRY_TAG {
                            spans.push(events.len()..events.len() + 1);
                        }
                    }
                }
                Event::Text(t) if depth == 0 => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(Error::invalid_resource("text outside of the root element"));
                    }
                }
                Event::Comment(_) if depth == 1 => note_indent(&events, &mut child_indent),
                _ => {}
            }
            events.push(event.into_owned());
        }

        if depth != 0 {
            return Err(Error::invalid_resource(
                "unexpected end of document: unclosed elements",
            ));
        }
        let (Some(root_start), Some(root_end)) = (root_start, root_end) else {
            return Err(Error::invalid_resource("document has no root element"));
        };

        let mut entries = Vec::with_capacity(spans.len());
        let mut index = HashMap::new();
        for span in spans {
            let (name, value, comment) = describe(&events[span.clone()])?;
            index.entry(name.clone()).or_insert(entries.len());
            entries.push(Entry {
                name,
                value,
                comment,
                span,
            });
        }

        Ok(ResxDocument {
            events,
            encoding,
            root_start,
            root_end,
            child_indent,
            entries,
            index,
        })
    }
}

impl Parser for ResxDocument {
    /// Parse from any reader, detecting UTF-8/UTF-16 byte order marks.
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let (text, encoding) = TextEncoding::decode(&bytes)?;
        Self::parse(&text, encoding)
    }

    /// Write to any writer, in the encoding the document was read with.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml = Vec::new();
        let mut xml_writer = Writer::new(&mut xml);
        for event in &self.events {
            xml_writer.write_event(event.clone())?;
        }

        let text = String::from_utf8(xml)
            .map_err(|e| Error::Encoding(format!("serialized document is not UTF-8: {}", e)))?;
        writer.write_all(&self.encoding.encode(&text))?;
        Ok(())
    }
}

/// Records the whitespace preceding the first child of the root.
fn note_indent(events: &[Event<'static>], child_indent: &mut Option<String>) {
    if child_indent.is_some() {
        return;
    }
    if let Some(Event::Text(t)) = events.last() {
        if t.iter().all(u8::is_ascii_whitespace) {
            *child_indent = Some(String::from_utf8_lossy(t).into_owned());
        }
    }
}

/// Entity references must resolve in every text node and attribute.
fn check_escapes(event: &Event<'_>) -> Result<(), Error> {
    match event {
        Event::Text(t) => {
            t.unescape()?;
        }
        Event::Start(e) | Event::Empty(e) => {
            for attr in e.attributes() {
                attr.map_err(quick_xml::Error::from)?.unescape_value()?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn is_whitespace_text(event: &Event<'_>) -> bool {
    matches!(event, Event::Text(t) if t.iter().all(u8::is_ascii_whitespace))
}

fn entry_name(e: &BytesStart<'_>) -> Result<String, Error> {
    let attr = e
        .try_get_attribute("name")
        .map_err(|e| Error::DataMismatch(e.to_string()))?
        .ok_or_else(|| Error::invalid_resource("data tag missing 'name'"))?;
    Ok(attr.unescape_value()?.into_owned())
}

/// Name, value and comment of the entry element spanning `events`.
fn describe(events: &[Event<'_>]) -> Result<(String, Option<String>, Option<String>), Error> {
    let name = match events.first() {
        Some(Event::Start(e)) | Some(Event::Empty(e)) => entry_name(e)?,
        _ => return Err(Error::invalid_resource("entry does not start with an element")),
    };
    let value = child_text(events, VALUE_TAG)?;
    let comment = child_text(events, COMMENT_TAG)?;
    Ok((name, value, comment))
}

/// Location of a child element inside an entry's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Child {
    /// `<tag/>` at this index.
    Empty(usize),
    /// `<tag>` at `start`, `</tag>` at `end`.
    Element { start: usize, end: usize },
}

/// First direct child of the entry element named `tag`.
fn find_child(events: &[Event<'_>], tag: &[u8]) -> Option<Child> {
    let mut depth = 0usize;
    let mut open = None;
    for (i, event) in events.iter().enumerate().skip(1) {
        match event {
            Event::Start(e) => {
                if depth == 0 && open.is_none() && e.name().as_ref() == tag {
                    open = Some(i);
                }
                depth += 1;
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = open {
                        return Some(Child::Element { start, end: i });
                    }
                }
            }
            Event::Empty(e) if depth == 0 && open.is_none() && e.name().as_ref() == tag => {
                return Some(Child::Empty(i));
            }
            _ => {}
        }
    }
    None
}

fn child_text(events: &[Event<'_>], tag: &[u8]) -> Result<Option<String>, Error> {
    match find_child(events, tag) {
        None => Ok(None),
        Some(Child::Empty(_)) => Ok(Some(String::new())),
        Some(Child::Element { start, end }) => {
            let mut text = String::new();
            for event in &events[start + 1..end] {
                match event {
                    Event::Text(t) => text.push_str(&t.unescape()?),
                    Event::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
                    _ => {}
                }
            }
            Ok(Some(text))
        }
    }
}

fn replace_text(events: &mut Vec<Event<'static>>, child: Child, text: &str) {
    let text_event = Event::Text(BytesText::new(text).into_owned());
    match child {
        Child::Element { start, end } => {
            events.splice(start + 1..end, [text_event]);
        }
        Child::Empty(i) => {
            if let Event::Empty(e) = events[i].clone() {
                let end = e.to_end().into_owned();
                events.splice(i..=i, [Event::Start(e), text_event, Event::End(end)]);
            }
        }
    }
}
