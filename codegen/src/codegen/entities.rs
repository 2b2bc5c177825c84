//! Entity type generation.
//!
//! Emits `entities.ts`: an instance shape and a data-access model per
//! entity, followed by a map from entity name to model. Any field that has
//! no TypeScript mapping aborts generation; no partial file is produced.

use super::typescript::{array_of, object_alias, string_union, Member, GENERATED_FILE_NOTE};
use super::GeneratedFile;
use crate::error::{CodegenError, Result};
use crate::schema::{Entity, EntitySchema, Field, FieldKind, ListElement};
use crate::types::ts_type_for_scalar;

pub const ENTITIES_FILE: &str = "entities.ts";

pub struct EntityCodeGenerator<'a> {
    schema: &'a EntitySchema,
}

impl<'a> EntityCodeGenerator<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    pub fn generate(&self) -> Result<GeneratedFile> {
        let mut content = String::new();
        content.push_str(GENERATED_FILE_NOTE);
        content.push('\n');

        for entity in &self.schema.entities {
            content.push('\n');
            content.push_str(&instance_type(entity)?);
            content.push('\n');
            content.push_str(&model_type(&entity.name));
        }

        let models: Vec<Member> = self
            .schema
            .entities
            .iter()
            .map(|e| Member::new(&e.name, format!("{}Model", e.name)))
            .collect();
        content.push('\n');
        content.push_str(&object_alias("entities", &models));

        Ok(GeneratedFile {
            filename: ENTITIES_FILE.to_string(),
            content,
        })
    }
}

fn instance_type(entity: &Entity) -> Result<String> {
    let members = entity
        .fields
        .iter()
        .map(|field| {
            let ty = field_type(entity, field)?;
            let always_required = matches!(field.kind, FieldKind::Id | FieldKind::Relationship(_));
            Ok(if field.not_null || always_required {
                Member::new(&field.name, ty)
            } else {
                Member::optional(&field.name, ty)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(object_alias(&format!("{}Instance", entity.name), &members))
}

fn field_type(entity: &Entity, field: &Field) -> Result<String> {
    match &field.kind {
        FieldKind::Id => Ok("string".to_string()),
        FieldKind::Scalar(scalar) => ts_type_for_scalar(scalar)
            .map(str::to_string)
            .ok_or_else(|| CodegenError::UnmappableScalar {
                entity: entity.name.clone(),
                field: field.name.clone(),
                scalar: scalar.clone(),
            }),
        FieldKind::Enum(def) => Ok(string_union(&def.values)),
        FieldKind::List(element) => {
            let element = match element {
                ListElement::Scalar(scalar) => ts_type_for_scalar(scalar).map(str::to_string),
                ListElement::Enum(def) => Some(string_union(&def.values)),
                ListElement::Unsupported(_) => None,
            };
            element
                .map(|ty| array_of(&ty))
                .ok_or_else(|| CodegenError::UnmappableListElement {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                })
        }
        // Referenced entities are stored by key.
        FieldKind::Relationship(_) => Ok("string".to_string()),
    }
}

fn model_type(entity: &str) -> String {
    let instance = format!("{}Instance", entity);
    let members = [
        Member::new("get", format!("(id: string) => Promise<{} | null>", instance)),
        Member::new(
            "insert",
            format!("(obj: {}) => Promise<{}>", instance, instance),
        ),
        Member::new(
            "update",
            format!(
                "(obj: {{ id: string }} & Partial<{}>) => Promise<{}>",
                instance, instance
            ),
        ),
        Member::new("delete", "(id: string) => Promise<void>"),
    ];
    object_alias(&format!("{}Model", entity), &members)
}
