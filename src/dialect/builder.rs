//! SQL text builder that keeps placeholders and bind values in lockstep.

use serde::Serialize;

use crate::model::BindValue;

/// How bind placeholders are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`
    Positional,
    /// `$1`, `$2`, ...
    Numbered,
}

/// How identifiers are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    None,
    Backtick,
    Bracket,
}

/// Rendered SQL text plus the ordered values for its placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSql {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

pub struct SqlBuilder {
    sql: String,
    binds: Vec<BindValue>,
    placeholders: usize,
    placeholder_style: PlaceholderStyle,
    quote_style: QuoteStyle,
}

impl SqlBuilder {
    pub fn new(placeholder_style: PlaceholderStyle, quote_style: QuoteStyle) -> Self {
        Self {
            sql: String::with_capacity(128),
            binds: Vec::new(),
            placeholders: 0,
            placeholder_style,
            quote_style,
        }
    }

    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push an identifier, quoting each dot-separated part
    pub fn push_identifier(&mut self, ident: &str) {
        for (i, part) in ident.split('.').enumerate() {
            if i > 0 {
                self.sql.push('.');
            }
            match self.quote_style {
                QuoteStyle::None => self.sql.push_str(part),
                QuoteStyle::Backtick => {
                    self.sql.push('`');
                    self.sql.push_str(part);
                    self.sql.push('`');
                }
                QuoteStyle::Bracket => {
                    self.sql.push('[');
                    self.sql.push_str(part);
                    self.sql.push(']');
                }
            }
        }
    }

    /// Push a placeholder without a bind value (stored-call OUT parameters)
    pub fn push_placeholder(&mut self) {
        self.placeholders += 1;
        match self.placeholder_style {
            PlaceholderStyle::Positional => self.sql.push('?'),
            PlaceholderStyle::Numbered => {
                self.sql.push('$');
                self.sql.push_str(&self.placeholders.to_string());
            }
        }
    }

    /// Push a placeholder and record its value
    pub fn push_bind(&mut self, value: BindValue) {
        self.push_placeholder();
        self.binds.push(value);
    }

    /// Push the elements of an iterator separated by `sep`
    pub fn push_iter<T>(
        &mut self,
        iter: impl IntoIterator<Item = T>,
        sep: &str,
        mut push_elem: impl FnMut(&mut Self, T),
    ) {
        for (i, item) in iter.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            push_elem(self, item);
        }
    }

    pub fn finish(self) -> RenderedSql {
        RenderedSql {
            sql: self.sql,
            binds: self.binds,
        }
    }
}
