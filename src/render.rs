//! Default HTML renderer for text cells
//!
//! Display markup of a convertible cell is its escaped value, optionally
//! passed through a per-column formatter first. Input-backed cells (and
//! every cell in edit mode) render a single `<input>` element holding the
//! raw value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::cell::{Activation, InputKind};
use crate::grid::{RenderMode, RenderRequest, Renderer};

/// Escape text for use inside element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Turns a raw cell value into display text
pub type Formatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Renders cells as HTML fragments
#[derive(Clone)]
pub struct HtmlRenderer {
    mask_char: char,
    next_name: u64,
    formatters: HashMap<String, Formatter>,
}

impl fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut columns: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        columns.sort_unstable();
        f.debug_struct("HtmlRenderer")
            .field("mask_char", &self.mask_char)
            .field("next_name", &self.next_name)
            .field("formatted_columns", &columns)
            .finish()
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new('*')
    }
}

impl HtmlRenderer {
    pub fn new(mask_char: char) -> Self {
        Self {
            mask_char,
            next_name: 0,
            formatters: HashMap::new(),
        }
    }

    /// Format display text of `column` with `formatter`
    ///
    /// Only plain double-click cells in display mode are formatted; inputs
    /// and masked text always show the stored value.
    pub fn with_formatter(
        mut self,
        column: impl Into<String>,
        formatter: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatters.insert(column.into(), Arc::new(formatter));
        self
    }

    fn unique_name(&mut self) -> String {
        self.next_name += 1;
        format!("gridedit-{}", self.next_name)
    }

    fn display_text(&self, request: &RenderRequest<'_>) -> String {
        match request.input_kind {
            InputKind::Plain => match self.formatters.get(&request.address.column_name) {
                Some(format) => escape_html(&format(&request.state.value)),
                None => escape_html(&request.state.value),
            },
            InputKind::Masked => std::iter::repeat(self.mask_char)
                .take(request.state.value.chars().count())
                .collect(),
        }
    }

    fn input_markup(&mut self, request: &RenderRequest<'_>) -> String {
        let name = self.unique_name();
        let state = request.state;
        let mut html = String::with_capacity(state.value.len() + 128);

        html.push_str("<input type=\"");
        html.push_str(request.input_kind.input_type());
        html.push_str("\" value=\"");
        html.push_str(&escape_html(&state.value));
        html.push_str("\" name=\"");
        html.push_str(&name);
        html.push_str("\" align=\"center\"");
        if state.is_disabled {
            html.push_str(" disabled");
        }
        if let Some(max) = state.max_length {
            html.push_str(&format!(" maxLength=\"{}\"", max));
        }
        html.push_str(" data-edit-type=\"");
        html.push_str(request.edit_tag);
        html.push_str("\"/>");
        html
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, request: RenderRequest<'_>) -> String {
        let as_input = request.mode == RenderMode::Edit || request.activation == Activation::Focus;
        if as_input {
            self.input_markup(&request)
        } else {
            self.display_text(&request)
        }
    }
}
