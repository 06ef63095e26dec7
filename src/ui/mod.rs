//! Terminal presentation built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! [`render_lines`] lays a [`RenderNode`] out as an indented tree, one styled
//! [`Line`] per element, ready to be placed in a `Paragraph` by a host's pane:
//!
//! ```text
//! m = std::map with 2 elements
//!   [1] = 10
//!   [2] = 20
//! ```
//!
//! Colors come from [`theme::DEFAULT_THEME`].

pub mod theme;

use crate::printers::DisplayHint;
use crate::render::{RenderChild, RenderNode};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use theme::DEFAULT_THEME;

const INDENT: &str = "  ";

/// Tree view of a rendered value named `name`
pub fn render_lines(name: &str, node: &RenderNode) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_entry(
        &mut lines,
        0,
        Span::styled(
            name.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.function)
                .add_modifier(Modifier::BOLD),
        ),
        node,
    );
    lines
}

fn push_entry(lines: &mut Vec<Line<'static>>, depth: usize, label: Span<'static>, node: &RenderNode) {
    let mut spans = vec![
        Span::raw(INDENT.repeat(depth)),
        label,
        Span::styled(" = ", Style::default().fg(DEFAULT_THEME.fg)),
    ];
    spans.extend(head_spans(node));
    lines.push(Line::from(spans));

    let RenderNode::Composite {
        hint,
        children,
        elided,
        ..
    } = node
    else {
        return;
    };

    if *hint == Some(DisplayHint::Map) {
        for pair in children.chunks(2) {
            if let [key, value] = pair {
                let label = Span::styled(
                    format!("[{}]", key.node),
                    Style::default().fg(DEFAULT_THEME.keyword),
                );
                push_entry(lines, depth + 1, label, &value.node);
            }
        }
    } else {
        for RenderChild { label, node } in children {
            let label = Span::styled(label.clone(), Style::default().fg(DEFAULT_THEME.keyword));
            push_entry(lines, depth + 1, label, node);
        }
    }

    if *elided {
        lines.push(Line::from(vec![
            Span::raw(INDENT.repeat(depth + 1)),
            Span::styled(
                "...",
                Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::DIM),
            ),
        ]));
    }
}

/// Spans shown on the same line as a node's label
fn head_spans(node: &RenderNode) -> Vec<Span<'static>> {
    match node {
        RenderNode::Leaf(text) => vec![leaf_span(text)],
        RenderNode::Str { .. } => vec![Span::styled(
            node.to_string(),
            Style::default().fg(DEFAULT_THEME.string),
        )],
        RenderNode::Elided => vec![Span::styled(
            "{...}",
            Style::default().fg(DEFAULT_THEME.comment),
        )],
        RenderNode::Composite {
            summary,
            children,
            elided,
            ..
        } => match summary {
            Some(summary) => vec![Span::styled(
                summary.clone(),
                Style::default().fg(DEFAULT_THEME.type_name),
            )],
            None if children.is_empty() && !elided => vec![Span::styled(
                "{}",
                Style::default().fg(DEFAULT_THEME.comment),
            )],
            None => Vec::new(),
        },
    }
}

fn leaf_span(text: &str) -> Span<'static> {
    let color = if text.starts_with("0x") {
        DEFAULT_THEME.secondary
    } else if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        DEFAULT_THEME.number
    } else {
        DEFAULT_THEME.type_name
    };
    Span::styled(text.to_string(), Style::default().fg(color))
}
