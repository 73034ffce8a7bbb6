//! Pull-based GEXF event reader.
//!
//! Wraps a `quick-xml` reader and turns the handful of elements cartogephi cares about into
//! [`GexfEvent`]s, in document order. Everything else (edges, attribute declarations, sizes,
//! shapes, text) is skipped without being buffered.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq)]
pub enum GexfEvent {
    /// `<node id=".." label="..">`
    NodeStart { id: String, label: String },
    /// `<attvalue for=".." value=".."/>` nested in a node.
    AttValue { key: String, value: String },
    /// `<viz:position x=".." y=".."/>` nested in a node.
    Position { x: f64, y: f64 },
    /// `<viz:color r=".." g=".." b=".."/>` nested in a node.
    Color { r: f64, g: f64, b: f64 },
    /// `</node>` (or the end of a self-closing `<node/>`).
    NodeEnd,
}

pub struct GexfEvents<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    depth: usize,
    node_depth: usize,
    seen_root: bool,
    pending: Option<GexfEvent>,
    done: bool,
}

impl<R> std::fmt::Debug for GexfEvents<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GexfEvents")
            .field("depth", &self.depth)
            .field("node_depth", &self.node_depth)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<R: BufRead> GexfEvents<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            depth: 0,
            node_depth: 0,
            seen_root: false,
            pending: None,
            done: false,
        }
    }

    /// Reads up to the next relevant event. `Ok(None)` marks a clean end of document.
    pub fn next_event(&mut self) -> Result<Option<GexfEvent>> {
        if let Some(ev) = self.pending.take() {
            return Ok(Some(ev));
        }

        loop {
            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(ev) => ev,
                Err(err) => {
                    return Err(Error::MalformedDocument {
                        position: self.reader.error_position() as u64,
                        message: err.to_string(),
                    });
                }
            };

            match event {
                Event::Start(e) => {
                    open_element(&mut self.depth, &mut self.seen_root, position)?;
                    let is_node = e.local_name().as_ref() == b"node";
                    let translated = translate(&e, self.node_depth, position)?;
                    if is_node {
                        self.node_depth += 1;
                    }
                    if translated.is_some() {
                        return Ok(translated);
                    }
                }
                Event::Empty(e) => {
                    open_element(&mut self.depth, &mut self.seen_root, position)?;
                    self.depth -= 1;
                    let translated = translate(&e, self.node_depth, position)?;
                    if matches!(translated, Some(GexfEvent::NodeStart { .. })) {
                        self.pending = Some(GexfEvent::NodeEnd);
                    }
                    if translated.is_some() {
                        return Ok(translated);
                    }
                }
                Event::End(e) => {
                    let Some(depth) = self.depth.checked_sub(1) else {
                        return Err(Error::MalformedDocument {
                            position,
                            message: "unexpected closing tag".to_string(),
                        });
                    };
                    self.depth = depth;
                    if e.local_name().as_ref() == b"node" && self.node_depth > 0 {
                        self.node_depth -= 1;
                        return Ok(Some(GexfEvent::NodeEnd));
                    }
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(Error::MalformedDocument {
                            position,
                            message: format!(
                                "unexpected end of input with {} unclosed element(s)",
                                self.depth
                            ),
                        });
                    }
                    if !self.seen_root {
                        return Err(Error::MalformedDocument {
                            position,
                            message: "no root element".to_string(),
                        });
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for GexfEvents<R> {
    type Item = Result<GexfEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(Some(ev)) => Some(Ok(ev)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn open_element(depth: &mut usize, seen_root: &mut bool, position: u64) -> Result<()> {
    if *depth == 0 {
        if *seen_root {
            return Err(Error::MalformedDocument {
                position,
                message: "more than one root element".to_string(),
            });
        }
        *seen_root = true;
    }
    *depth += 1;
    Ok(())
}

fn translate(e: &BytesStart<'_>, node_depth: usize, position: u64) -> Result<Option<GexfEvent>> {
    let ev = match e.local_name().as_ref() {
        b"node" => GexfEvent::NodeStart {
            id: required(e, "node", "id", position)?,
            label: required(e, "node", "label", position)?,
        },
        _ if node_depth == 0 => return Ok(None),
        b"attvalue" => GexfEvent::AttValue {
            key: required(e, "attvalue", "for", position)?,
            value: required(e, "attvalue", "value", position)?,
        },
        b"position" => GexfEvent::Position {
            x: number(e, "viz:position", "x", position)?,
            y: number(e, "viz:position", "y", position)?,
        },
        b"color" => GexfEvent::Color {
            r: number(e, "viz:color", "r", position)?,
            g: number(e, "viz:color", "g", position)?,
            b: number(e, "viz:color", "b", position)?,
        },
        _ => return Ok(None),
    };
    Ok(Some(ev))
}

fn attribute(e: &BytesStart<'_>, name: &str, position: u64) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::MalformedDocument {
            position,
            message: err.to_string(),
        })?;
        if attr.key.as_ref() != name.as_bytes() {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|err| Error::MalformedDocument {
                position,
                message: err.to_string(),
            })?;
        return Ok(Some(value.into_owned()));
    }
    Ok(None)
}

fn required(
    e: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
    position: u64,
) -> Result<String> {
    attribute(e, name, position)?.ok_or(Error::MissingAttribute {
        element,
        attribute: name,
    })
}

fn number(
    e: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
    position: u64,
) -> Result<f64> {
    let raw = required(e, element, name, position)?;
    raw.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        element,
        attribute: name,
        value: raw.clone(),
    })
}
