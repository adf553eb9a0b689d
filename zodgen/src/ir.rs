//! Intermediate representation of the entity graph
//!
//! The IR is the input contract of the compiler: an ordered sequence of
//! entities with fully resolved relationship targets, produced by a modeling
//! front end. Every generated schema is a pure function of this graph.

/// A modeled record type (table/model)
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Entity name (UpperCamelCase by convention)
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<Field>,
}

/// A field of an entity
#[derive(Debug, Clone, Default)]
pub struct Field {
    /// Field name
    pub name: String,

    /// Scalar kind or relation
    pub ty: FieldType,

    /// Declared nullable in the model (`?` suffix)
    pub optional: bool,

    /// Field attributes
    pub attrs: FieldAttrs,
}

/// Attributes attached to a field
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAttrs {
    /// Identity field (`@id`)
    pub id: bool,

    /// Uniqueness constraint (`@unique`)
    pub unique: bool,

    /// Carries a default value (`@default(...)`)
    pub has_default: bool,

    /// The default value expression evaluates using the caller's
    /// authenticated identity; such a value is always server-derived and
    /// must never be client-supplied
    pub default_uses_auth: bool,

    /// Auto-managed update timestamp (`@updatedAt`)
    pub updated_at: bool,
}

/// Field types
#[derive(Debug, Clone)]
pub enum FieldType {
    /// A scalar value
    Scalar(ScalarType),

    /// A reference to another entity
    Relation(Relation),
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Scalar(ScalarType::String)
    }
}

/// Scalar kinds
///
/// Front ends map unmodeled kinds to `String`, the documented lossy fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Boolean,
    DateTime,
    Int,
    Float,
}

/// A directed relation edge to another entity
#[derive(Debug, Clone, Default)]
pub struct Relation {
    /// Related entity name
    pub target: String,

    /// To-many (`[]`) vs. to-one
    pub many: bool,

    /// Scalar fields of the owning entity that store the foreign key.
    /// Fully owned by the relation's connect/create machinery; never
    /// client-writable.
    pub fk_fields: Vec<String>,

    /// Referenced fields on the target (usually the identity)
    pub references: Vec<String>,
}

impl Field {
    /// The relation edge, if this is a relation field
    pub fn as_relation(&self) -> Option<&Relation> {
        match &self.ty {
            FieldType::Relation(rel) => Some(rel),
            FieldType::Scalar(_) => None,
        }
    }

    /// The scalar kind, if this is a scalar field
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match &self.ty {
            FieldType::Scalar(scalar) => Some(*scalar),
            FieldType::Relation(_) => None,
        }
    }

    /// Returns true if this is a relation field
    pub fn is_relation(&self) -> bool {
        matches!(self.ty, FieldType::Relation(_))
    }
}

impl Entity {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Relation fields with their edges, in declaration order
    pub fn relations(&self) -> impl Iterator<Item = (&Field, &Relation)> {
        self.fields
            .iter()
            .filter_map(|f| f.as_relation().map(|rel| (f, rel)))
    }

    /// Identity fields (`@id`)
    pub fn id_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.attrs.id)
    }

    /// Singularly-unique fields (`@unique`)
    pub fn unique_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.attrs.unique)
    }

    /// Returns true if the entity has at least one relation field
    pub fn has_relations(&self) -> bool {
        self.fields.iter().any(Field::is_relation)
    }

    /// Returns true if `name` is foreign-key storage for any relation of
    /// this entity
    pub fn is_foreign_key(&self, name: &str) -> bool {
        self.relations()
            .any(|(_, rel)| rel.fk_fields.iter().any(|fk| fk == name))
    }
}
