//! Statement emission
//!
//! The output contract of the compiler: an ordered sequence of named,
//! independently referencable statements collected into a [`SourceFile`],
//! which a dedicated printer serializes to compilable TypeScript. Schema
//! construction never touches strings of code; correctness is checked
//! against this structured form.

mod expr;

pub use expr::Expr;

/// A single top-level statement of the generated file
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `import { a, b } from "module";`
    Import {
        /// Named imports
        names: Vec<String>,
        /// Module specifier
        from: String,
    },

    /// One or more `//` comment lines
    Comment(String),

    /// A `const` schema definition
    Const(ConstDef),

    /// `export type {name} = z.infer<typeof {schema}>;`
    InferType {
        /// Alias name
        name: String,
        /// Schema const the type is inferred from
        schema: String,
    },

    /// `export type {name} = typeof {of};`
    TypeOf {
        /// Alias name
        name: String,
        /// Const the type is taken from
        of: String,
    },

    /// The consolidated operation registry object literal
    Registry(RegistryDef),

    /// `export const {name} = ` followed by a template literal
    TemplateConst {
        /// Const name
        name: String,
        /// Verbatim template contents (escaped by the printer)
        value: String,
    },
}

/// A named `const` definition
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    /// Statement name; later statements reference it by this identifier
    pub name: String,

    /// Whether the const is exported
    pub export: bool,

    /// Annotate with `: z.ZodType<unknown>` so self- and cross-references
    /// type-check without eager evaluation
    pub recursive: bool,

    /// The schema expression
    pub init: Expr,
}

/// The consolidated registry definition
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryDef {
    /// Const name (e.g. `allSchemas`)
    pub name: String,

    /// Entries in emission order: (registry key, [(operation, schema name)])
    pub entries: Vec<(String, Vec<(String, String)>)>,
}

impl Statement {
    /// The name this statement defines, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Statement::Const(def) => Some(&def.name),
            Statement::InferType { name, .. }
            | Statement::TypeOf { name, .. }
            | Statement::TemplateConst { name, .. } => Some(name),
            Statement::Registry(def) => Some(&def.name),
            Statement::Import { .. } | Statement::Comment(_) => None,
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            Statement::Import { names, from } => {
                out.push_str("import { ");
                out.push_str(&names.join(", "));
                out.push_str(" } from \"");
                out.push_str(from);
                out.push_str("\";");
            }
            Statement::Comment(text) => {
                for (i, line) in text.lines().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    out.push_str("// ");
                    out.push_str(line);
                }
            }
            Statement::Const(def) => {
                if def.export {
                    out.push_str("export ");
                }
                out.push_str("const ");
                out.push_str(&def.name);
                if def.recursive {
                    out.push_str(": z.ZodType<unknown>");
                }
                out.push_str(" = ");
                def.init.write(out, 0);
                out.push(';');
            }
            Statement::InferType { name, schema } => {
                out.push_str("export type ");
                out.push_str(name);
                out.push_str(" = z.infer<typeof ");
                out.push_str(schema);
                out.push_str(">;");
            }
            Statement::TypeOf { name, of } => {
                out.push_str("export type ");
                out.push_str(name);
                out.push_str(" = typeof ");
                out.push_str(of);
                out.push(';');
            }
            Statement::Registry(def) => {
                out.push_str("export const ");
                out.push_str(&def.name);
                out.push_str(" = {\n");
                for (key, operations) in &def.entries {
                    out.push_str("  ");
                    out.push_str(key);
                    out.push_str(": {\n");
                    for (operation, schema) in operations {
                        out.push_str("    ");
                        out.push_str(operation);
                        out.push_str(": ");
                        out.push_str(schema);
                        out.push_str(",\n");
                    }
                    out.push_str("  },\n");
                }
                out.push_str("};");
            }
            Statement::TemplateConst { name, value } => {
                out.push_str("export const ");
                out.push_str(name);
                out.push_str(" = `");
                out.push_str(&escape_template(value));
                out.push_str("`;");
            }
        }
    }
}

/// The ordered statements of one generated file, plus its file identifier
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// File identifier for the host's output writer
    pub file_name: String,

    /// Statements in emission order
    pub statements: Vec<Statement>,
}

impl SourceFile {
    /// An empty file with the given identifier
    pub fn new(file_name: impl Into<String>) -> SourceFile {
        SourceFile {
            file_name: file_name.into(),
            statements: Vec::new(),
        }
    }

    /// Append one statement
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Append a sequence of statements
    pub fn extend(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.statements.extend(statements);
    }

    /// Look up a named statement
    pub fn statement(&self, name: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.name() == Some(name))
    }

    /// Look up a named const definition
    pub fn const_def(&self, name: &str) -> Option<&ConstDef> {
        match self.statement(name) {
            Some(Statement::Const(def)) => Some(def),
            _ => None,
        }
    }

    /// Serialize to TypeScript source text.
    ///
    /// Rendering is a pure function of the statement sequence; equal inputs
    /// produce byte-identical output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            statement.write(&mut out);
            out.push('\n');
        }
        out
    }
}

/// Escape template-literal contents: backslashes, backticks, and `${`
fn escape_template(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_statement() {
        let mut file = SourceFile::new("out.ts");
        file.push(Statement::Import {
            names: vec!["z".to_string()],
            from: "zod".to_string(),
        });
        assert_eq!(file.render(), "import { z } from \"zod\";\n");
    }

    #[test]
    fn test_recursive_const_annotation() {
        let def = ConstDef {
            name: "UserWhereInput".to_string(),
            export: true,
            recursive: true,
            init: Expr::Object(vec![]),
        };
        let mut out = String::new();
        Statement::Const(def).write(&mut out);
        assert_eq!(
            out,
            "export const UserWhereInput: z.ZodType<unknown> = z.object({});"
        );
    }

    #[test]
    fn test_plain_const_has_no_annotation() {
        let def = ConstDef {
            name: "StringFilter".to_string(),
            export: false,
            recursive: false,
            init: Expr::String,
        };
        let mut out = String::new();
        Statement::Const(def).write(&mut out);
        assert_eq!(out, "const StringFilter = z.string();");
    }

    #[test]
    fn test_infer_type() {
        let mut out = String::new();
        Statement::InferType {
            name: "UserFindManyArgsType".to_string(),
            schema: "UserFindManyArgsSchema".to_string(),
        }
        .write(&mut out);
        assert_eq!(
            out,
            "export type UserFindManyArgsType = z.infer<typeof UserFindManyArgsSchema>;"
        );
    }

    #[test]
    fn test_registry_rendering() {
        let def = RegistryDef {
            name: "allSchemas".to_string(),
            entries: vec![(
                "user".to_string(),
                vec![
                    ("findMany".to_string(), "UserFindManyArgsSchema".to_string()),
                    ("update".to_string(), "UserUpdateArgsSchema".to_string()),
                    ("create".to_string(), "UserCreateArgsSchema".to_string()),
                ],
            )],
        };
        let mut out = String::new();
        Statement::Registry(def).write(&mut out);
        let expected = "export const allSchemas = {\n  user: {\n    findMany: UserFindManyArgsSchema,\n    update: UserUpdateArgsSchema,\n    create: UserCreateArgsSchema,\n  },\n};";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_template_const_escapes_backticks() {
        let mut out = String::new();
        Statement::TemplateConst {
            name: "systemPrompt".to_string(),
            value: "use `findMany` for ${queries}".to_string(),
        }
        .write(&mut out);
        assert_eq!(
            out,
            "export const systemPrompt = `use \\`findMany\\` for \\${queries}`;"
        );
    }

    #[test]
    fn test_statement_lookup() {
        let mut file = SourceFile::new("out.ts");
        file.push(Statement::Comment("header".to_string()));
        file.push(Statement::Const(ConstDef {
            name: "BooleanFilter".to_string(),
            export: false,
            recursive: false,
            init: Expr::Boolean,
        }));
        assert!(file.const_def("BooleanFilter").is_some());
        assert!(file.statement("missing").is_none());
    }
}
