//! Rendering values into GDB-style text
//!
//! [`Renderer::render`] resolves a value into a [`RenderNode`] tree: values
//! with a registered printer go through it, everything else (scalars,
//! pointers, arrays, plain structs) is decoded directly. The tree's `Display`
//! implementation then produces the text GDB would print:
//!
//! ```text
//! std::vector of length 3, capacity 4 = {1, 2, 3}
//! std::map with 2 elements = {[1] = 10, [2] = 20}
//! {first = 1, second = 97 'a'}
//! ```
//!
//! Limits come from the registry's [`PrintSettings`]: containers stop after
//! `max_elements` children (map children count per entry), and values nested
//! deeper than `max_depth` are shown as `{...}`.

use crate::errors::Result;
use crate::memory::value::{Scalar, Value};
use crate::printers::{format_address, ChildValue, DisplayHint, Printer, Summary};
use crate::registry::PrinterRegistry;
use crate::settings::PrintSettings;
use crate::snapshot::Target;
use std::fmt;

/// A rendered value
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    /// Scalars, pointers and printer summaries without children
    Leaf(String),
    /// Decoded string contents, quoted on display
    Str { text: String, truncated: bool },
    Composite {
        summary: Option<String>,
        hint: Option<DisplayHint>,
        children: Vec<RenderChild>,
        /// More children existed past the element limit
        elided: bool,
    },
    /// Nested deeper than the depth limit
    Elided,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderChild {
    pub label: String,
    pub node: RenderNode,
}

/// Walks values through the printers of one registry
pub struct Renderer<'r> {
    registry: &'r PrinterRegistry,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r PrinterRegistry) -> Self {
        Renderer { registry }
    }

    fn settings(&self) -> &PrintSettings {
        self.registry.settings()
    }

    pub fn render(&self, target: &dyn Target, value: &Value) -> Result<RenderNode> {
        self.render_at(target, value, 0)
    }

    pub fn render_to_string(&self, target: &dyn Target, value: &Value) -> Result<String> {
        Ok(self.render(target, value)?.to_string())
    }

    fn render_at(&self, target: &dyn Target, value: &Value, depth: usize) -> Result<RenderNode> {
        if depth > self.settings().max_depth {
            return Ok(RenderNode::Elided);
        }
        match self.registry.lookup(target, value)? {
            Some(printer) => self.render_printer(target, printer.as_ref(), depth),
            None => self.render_raw(target, value, depth),
        }
    }

    fn render_printer(
        &self,
        target: &dyn Target,
        printer: &dyn Printer,
        depth: usize,
    ) -> Result<RenderNode> {
        let summary = printer.summary(target)?;
        let hint = printer.display_hint();
        let Some(children) = printer.children(target)? else {
            return self.render_summary(target, summary, depth);
        };

        let mut limit = self.settings().max_elements;
        if hint == Some(DisplayHint::Map) {
            limit = limit.saturating_mul(2);
        }
        let mut rendered = Vec::new();
        let mut elided = false;
        for child in children {
            if rendered.len() == limit {
                elided = true;
                break;
            }
            let child = child?;
            let node = match child.value {
                ChildValue::Value(value) => self.render_at(target, &value, depth + 1)?,
                ChildValue::Int(n) => RenderNode::Leaf(n.to_string()),
            };
            rendered.push(RenderChild {
                label: child.label,
                node,
            });
        }

        let summary = self.render_summary(target, summary, depth)?.to_string();
        Ok(RenderNode::Composite {
            summary: Some(summary),
            hint,
            children: rendered,
            elided,
        })
    }

    fn render_summary(&self, target: &dyn Target, summary: Summary, depth: usize) -> Result<RenderNode> {
        Ok(match summary {
            Summary::Text(text) => RenderNode::Leaf(text),
            Summary::String { text, truncated } => RenderNode::Str { text, truncated },
            Summary::Value(value) => self.render_at(target, &value, depth + 1)?,
            Summary::Wrapping { name, inner } => {
                let inner = self.render_summary(target, *inner, depth)?;
                RenderNode::Leaf(format!("{} wrapping: {}", name, inner))
            }
        })
    }

    /// Values without a printer
    fn render_raw(&self, target: &dyn Target, value: &Value, depth: usize) -> Result<RenderNode> {
        let object = value.referent(target)?;
        let resolved = target.types().resolve(object.ty())?;

        if let Some(len) = object.array_len(target)? {
            let mut children = Vec::new();
            for i in 0..len.min(self.settings().max_elements) {
                let element = object.index(target, i)?;
                children.push(RenderChild {
                    label: format!("[{}]", i),
                    node: self.render_at(target, &element, depth + 1)?,
                });
            }
            return Ok(RenderNode::Composite {
                summary: None,
                hint: Some(DisplayHint::Array),
                children,
                elided: len > self.settings().max_elements,
            });
        }

        if let Some(name) = resolved.struct_name() {
            let def = target.types().struct_def(name)?;
            let mut children = Vec::new();
            for layout in target.types().field_offsets(def)? {
                let field = object.field(target, &layout.name)?;
                children.push(RenderChild {
                    label: layout.name,
                    node: self.render_at(target, &field, depth + 1)?,
                });
            }
            return Ok(RenderNode::Composite {
                summary: None,
                hint: None,
                children,
                elided: false,
            });
        }

        Ok(RenderNode::Leaf(format_scalar(object.read_scalar(target)?)))
    }
}

/// GDB spelling of a decoded scalar
pub fn format_scalar(scalar: Scalar) -> String {
    match scalar {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Char(n) => format!("{} '{}'", n, escape_char(n)),
        Scalar::Float(f) => f.to_string(),
        Scalar::Pointer(address) => format_address(address),
    }
}

fn escape_char(n: i64) -> String {
    match n {
        0x27 => "\\'".to_string(),
        0x5c => "\\\\".to_string(),
        0x0a => "\\n".to_string(),
        0x09 => "\\t".to_string(),
        0x20..=0x7e => char::from(n as u8).to_string(),
        _ => match u32::try_from(n).ok().and_then(char::from_u32) {
            Some(c) if n > 0x7f && !c.is_control() => c.to_string(),
            _ => format!("\\{:03o}", n & 0xff),
        },
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in text.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            c if c.is_control() => write!(f, "\\{:03o}", u32::from(c) & 0xff)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderNode::Leaf(text) => write!(f, "{}", text),
            RenderNode::Str { text, truncated } => {
                write_quoted(f, text)?;
                if *truncated {
                    write!(f, "...")?;
                }
                Ok(())
            }
            RenderNode::Elided => write!(f, "{{...}}"),
            RenderNode::Composite {
                summary,
                hint,
                children,
                elided,
            } => {
                if children.is_empty() && !elided {
                    return match summary {
                        Some(summary) => write!(f, "{}", summary),
                        None => write!(f, "{{}}"),
                    };
                }
                if let Some(summary) = summary {
                    write!(f, "{} = ", summary)?;
                }
                write!(f, "{{")?;
                let items = format_items(*hint, children);
                write!(f, "{}", items.join(", "))?;
                if *elided {
                    write!(f, "...")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn format_items(hint: Option<DisplayHint>, children: &[RenderChild]) -> Vec<String> {
    match hint {
        Some(DisplayHint::Map) => children
            .chunks(2)
            .map(|pair| match pair {
                [key, value] => format!("[{}] = {}", key.node, value.node),
                [key] => format!("[{}]", key.node),
                _ => String::new(),
            })
            .collect(),
        Some(DisplayHint::Array) => children.iter().map(|child| child.node.to_string()).collect(),
        _ => children
            .iter()
            .map(|child| format!("{} = {}", child.label, child.node))
            .collect(),
    }
}
