//! Entity schema model.
//!
//! An [`EntitySchema`] is built once from GraphQL SDL and never mutated.
//! Object types carrying the `@entity` directive become entities; enum
//! definitions supply the allowed values of enum and enum-list fields.

use std::collections::{HashMap, HashSet};

use graphql_parser::schema::{
    parse_schema, Definition, Document, EnumType, Field as GqlField, ObjectType, Type,
    TypeDefinition,
};

use crate::error::{CodegenError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// The outermost type is non-null (`T!`, `[T]!`).
    pub not_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    /// A named scalar. Whether it maps to a TypeScript type is decided at
    /// generation time.
    Scalar(String),
    Enum(EnumDef),
    List(ListElement),
    /// Reference to another entity by its key.
    Relationship(String),
}

/// Element type of a list field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListElement {
    Scalar(String),
    Enum(EnumDef),
    /// Anything else: entity references or nested lists. Kept as the
    /// rendered GraphQL type so generation can report it.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<String>,
}

impl EntitySchema {
    /// Parse GraphQL SDL into an entity schema.
    pub fn parse(sdl: &str) -> Result<Self> {
        let document = parse_schema::<String>(sdl)
            .map_err(|e| CodegenError::SchemaParse(e.to_string()))?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &Document<'_, String>) -> Result<Self> {
        let mut enums: HashMap<&str, EnumDef> = HashMap::new();
        let mut entity_types: Vec<&ObjectType<'_, String>> = Vec::new();

        for def in &document.definitions {
            match def {
                Definition::TypeDefinition(TypeDefinition::Object(obj)) if is_entity_type(obj) => {
                    entity_types.push(obj)
                }
                Definition::TypeDefinition(TypeDefinition::Enum(e)) => {
                    enums.insert(e.name.as_str(), enum_def(e));
                }
                _ => {}
            }
        }

        let mut entity_names = HashSet::new();
        for obj in &entity_types {
            if !entity_names.insert(obj.name.as_str()) {
                return Err(CodegenError::DuplicateEntity(obj.name.clone()));
            }
        }

        let resolver = KindResolver {
            enums: &enums,
            entities: &entity_names,
        };

        let entities = entity_types
            .iter()
            .map(|obj| Entity {
                name: obj.name.clone(),
                fields: obj.fields.iter().map(|f| resolver.field(f)).collect(),
            })
            .collect();

        Ok(EntitySchema { entities })
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

struct KindResolver<'a> {
    enums: &'a HashMap<&'a str, EnumDef>,
    entities: &'a HashSet<&'a str>,
}

impl KindResolver<'_> {
    fn field(&self, field: &GqlField<'_, String>) -> Field {
        let not_null = matches!(field.field_type, Type::NonNullType(_));
        let kind = match strip_non_null(&field.field_type) {
            Type::ListType(inner) => FieldKind::List(self.list_element(inner)),
            Type::NamedType(name) => self.named(name),
            Type::NonNullType(_) => unreachable!("non-null wrapper already stripped"),
        };
        Field {
            name: field.name.clone(),
            kind,
            not_null,
        }
    }

    fn named(&self, name: &str) -> FieldKind {
        if name == "ID" {
            FieldKind::Id
        } else if let Some(def) = self.enums.get(name) {
            FieldKind::Enum(def.clone())
        } else if self.entities.contains(name) {
            FieldKind::Relationship(name.to_string())
        } else {
            FieldKind::Scalar(name.to_string())
        }
    }

    fn list_element(&self, ty: &Type<'_, String>) -> ListElement {
        match strip_non_null(ty) {
            Type::NamedType(name) => {
                if let Some(def) = self.enums.get(name.as_str()) {
                    ListElement::Enum(def.clone())
                } else if self.entities.contains(name.as_str()) {
                    ListElement::Unsupported(name.clone())
                } else {
                    ListElement::Scalar(name.clone())
                }
            }
            other => ListElement::Unsupported(other.to_string()),
        }
    }
}

fn strip_non_null<'a, 'b>(ty: &'b Type<'a, String>) -> &'b Type<'a, String> {
    match ty {
        Type::NonNullType(inner) => strip_non_null(inner),
        other => other,
    }
}

/// Check if an object type has the @entity directive.
fn is_entity_type(obj: &ObjectType<'_, String>) -> bool {
    obj.directives.iter().any(|d| d.name == "entity")
}

fn enum_def(e: &EnumType<'_, String>) -> EnumDef {
    EnumDef {
        name: e.name.clone(),
        values: e.values.iter().map(|v| v.name.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        type Token @entity {
            id: ID!
            owner: String
            kind: Trait!
            holder: Account!
            tags: [String!]
            traits: [Trait!]!
            friends: [Account!]!
            grid: [[Int!]!]
        }

        type Account @entity {
            id: ID!
        }

        type NotAnEntity {
            id: ID!
        }

        enum Trait {
            GOOD
            BAD
        }
    "#;

    fn field<'a>(entity: &'a Entity, name: &str) -> &'a Field {
        entity.fields.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn test_only_entity_types_are_collected() {
        let schema = EntitySchema::parse(SCHEMA).unwrap();
        let names: Vec<_> = schema.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Token", "Account"]);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let schema = EntitySchema::parse(SCHEMA).unwrap();
        let token = schema.entity("Token").unwrap();
        let names: Vec<_> = token.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "owner", "kind", "holder", "tags", "traits", "friends", "grid"]
        );
    }

    #[test]
    fn test_field_kinds() {
        let schema = EntitySchema::parse(SCHEMA).unwrap();
        let token = schema.entity("Token").unwrap();
        let trait_def = EnumDef {
            name: "Trait".to_string(),
            values: vec!["GOOD".to_string(), "BAD".to_string()],
        };

        assert_eq!(field(token, "id").kind, FieldKind::Id);
        assert!(field(token, "id").not_null);

        assert_eq!(
            field(token, "owner").kind,
            FieldKind::Scalar("String".to_string())
        );
        assert!(!field(token, "owner").not_null);

        assert_eq!(field(token, "kind").kind, FieldKind::Enum(trait_def.clone()));
        assert_eq!(
            field(token, "holder").kind,
            FieldKind::Relationship("Account".to_string())
        );
        assert_eq!(
            field(token, "tags").kind,
            FieldKind::List(ListElement::Scalar("String".to_string()))
        );
        assert!(!field(token, "tags").not_null);
        assert_eq!(
            field(token, "traits").kind,
            FieldKind::List(ListElement::Enum(trait_def))
        );
        assert!(field(token, "traits").not_null);
        assert_eq!(
            field(token, "friends").kind,
            FieldKind::List(ListElement::Unsupported("Account".to_string()))
        );
        assert!(matches!(
            field(token, "grid").kind,
            FieldKind::List(ListElement::Unsupported(_))
        ));
    }

    #[test]
    fn test_duplicate_entity() {
        let sdl = r#"
            type Token @entity { id: ID! }
            type Token @entity { id: ID! }
        "#;
        let err = EntitySchema::parse(sdl).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateEntity(name) if name == "Token"));
    }

    #[test]
    fn test_parse_error() {
        let err = EntitySchema::parse("type Token @entity {").unwrap_err();
        assert!(matches!(err, CodegenError::SchemaParse(_)));
    }
}
