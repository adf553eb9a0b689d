//! Zod expression trees
//!
//! A small combinator AST for the right-hand side of generated statements.
//! Cross-references between statements are carried as names (`Ident`,
//! `Lazy`), never as nested trees, so a cyclic entity graph always produces
//! a finite forest; the emitted `z.lazy(() => ...)` defers resolution to the
//! validation runtime.

/// A Zod expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `z.string()`
    String,
    /// `z.number()`
    Number,
    /// `z.boolean()`
    Boolean,
    /// `z.date()`
    Date,
    /// `z.null()`
    Null,
    /// `z.array(inner)`
    Array(Box<Expr>),
    /// `z.object({ ... })` with ordered keys
    Object(Vec<(String, Expr)>),
    /// `z.union([...])`
    Union(Vec<Expr>),
    /// `z.lazy(() => Name)` — deferred reference to a named statement
    Lazy(String),
    /// `a.or(b)`
    Or(Box<Expr>, Box<Expr>),
    /// `inner.optional()`
    Optional(Box<Expr>),
    /// `inner.nullable()`
    Nullable(Box<Expr>),
    /// `inner.describe("...")`
    Describe(Box<Expr>, String),
    /// A bare reference to a named statement
    Ident(String),
}

impl Expr {
    /// Deferred reference to the statement named `name`
    pub fn lazy(name: impl Into<String>) -> Expr {
        Expr::Lazy(name.into())
    }

    /// Direct reference to the statement named `name`
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    /// `z.date().or(z.string())` — the interchangeable date/ISO-string value
    pub fn date_or_string() -> Expr {
        Expr::Date.or(Expr::String)
    }

    /// Wrap in `z.array(...)`
    pub fn array(self) -> Expr {
        Expr::Array(Box::new(self))
    }

    /// Append `.or(other)`
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Append `.optional()`
    pub fn optional(self) -> Expr {
        Expr::Optional(Box::new(self))
    }

    /// Append `.nullable()`
    pub fn nullable(self) -> Expr {
        Expr::Nullable(Box::new(self))
    }

    /// Append `.describe("...")`
    pub fn describe(self, text: impl Into<String>) -> Expr {
        Expr::Describe(Box::new(self), text.into())
    }

    /// The object keys, if this is an object (possibly behind wrappers)
    pub fn object_keys(&self) -> Option<Vec<&str>> {
        match self {
            Expr::Object(fields) => Some(fields.iter().map(|(k, _)| k.as_str()).collect()),
            Expr::Array(inner)
            | Expr::Optional(inner)
            | Expr::Nullable(inner)
            | Expr::Describe(inner, _) => inner.object_keys(),
            _ => None,
        }
    }

    /// Look up an object field by key (behind wrappers)
    pub fn object_field(&self, key: &str) -> Option<&Expr> {
        match self {
            Expr::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Expr::Array(inner)
            | Expr::Optional(inner)
            | Expr::Nullable(inner)
            | Expr::Describe(inner, _) => inner.object_field(key),
            _ => None,
        }
    }

    /// Whether the expression renders on a single line.
    ///
    /// Objects stay inline only while small and fully inline themselves;
    /// everything atomic or chained over inline parts is inline.
    fn is_inline(&self) -> bool {
        match self {
            Expr::String
            | Expr::Number
            | Expr::Boolean
            | Expr::Date
            | Expr::Null
            | Expr::Lazy(_)
            | Expr::Ident(_) => true,
            Expr::Array(inner)
            | Expr::Optional(inner)
            | Expr::Nullable(inner)
            | Expr::Describe(inner, _) => inner.is_inline(),
            Expr::Or(a, b) => a.is_inline() && b.is_inline(),
            Expr::Union(parts) => parts.iter().all(Expr::is_inline),
            Expr::Object(fields) => fields.len() <= 3 && fields.iter().all(|(_, v)| v.is_inline()),
        }
    }

    /// Render into `out` at the given indent level (two spaces per level)
    pub(crate) fn write(&self, out: &mut String, indent: usize) {
        match self {
            Expr::String => out.push_str("z.string()"),
            Expr::Number => out.push_str("z.number()"),
            Expr::Boolean => out.push_str("z.boolean()"),
            Expr::Date => out.push_str("z.date()"),
            Expr::Null => out.push_str("z.null()"),
            Expr::Lazy(name) => {
                out.push_str("z.lazy(() => ");
                out.push_str(name);
                out.push(')');
            }
            Expr::Ident(name) => out.push_str(name),
            Expr::Array(inner) => {
                out.push_str("z.array(");
                inner.write(out, indent);
                out.push(')');
            }
            Expr::Or(a, b) => {
                a.write(out, indent);
                out.push_str(".or(");
                b.write(out, indent);
                out.push(')');
            }
            Expr::Optional(inner) => {
                inner.write(out, indent);
                out.push_str(".optional()");
            }
            Expr::Nullable(inner) => {
                inner.write(out, indent);
                out.push_str(".nullable()");
            }
            Expr::Describe(inner, text) => {
                inner.write(out, indent);
                out.push_str(".describe(\"");
                out.push_str(&escape_string(text));
                out.push_str("\")");
            }
            Expr::Union(parts) => {
                if self.is_inline() {
                    out.push_str("z.union([");
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        part.write(out, indent);
                    }
                    out.push_str("])");
                } else {
                    out.push_str("z.union([\n");
                    for part in parts {
                        push_indent(out, indent + 1);
                        part.write(out, indent + 1);
                        out.push_str(",\n");
                    }
                    push_indent(out, indent);
                    out.push_str("])");
                }
            }
            Expr::Object(fields) => {
                if fields.is_empty() {
                    out.push_str("z.object({})");
                } else if self.is_inline() {
                    out.push_str("z.object({ ");
                    for (i, (key, value)) in fields.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(key);
                        out.push_str(": ");
                        value.write(out, indent);
                    }
                    out.push_str(" })");
                } else {
                    out.push_str("z.object({\n");
                    for (key, value) in fields {
                        push_indent(out, indent + 1);
                        out.push_str(key);
                        out.push_str(": ");
                        value.write(out, indent + 1);
                        out.push_str(",\n");
                    }
                    push_indent(out, indent);
                    out.push_str("})");
                }
            }
        }
    }
}

/// Escape a double-quoted TypeScript string literal
fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}
