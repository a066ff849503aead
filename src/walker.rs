//! Schema Walker
//!
//! Turns one `match (Type::class) { $prop => ... }` expression into a
//! [`Definition`]. Right-hand sides may be:
//!
//! - `Type::class` → leaf reference, resolved through the file's imports
//! - `match (...) { ... }` → nested definition (walked recursively)
//! - `[Type::class]` or `[match (...) { ... }]` → the same, as a sequence

use crate::error::{Result, SchemaError};
use crate::imports::ImportRegistry;
use crate::parser::{ArrayItem, Expr, ExprKind, MatchExpr};
use crate::schema::{Definition, PropertyRef};

/// Per-walk state: where the match came from and the file's imports
pub struct WalkContext<'a> {
    pub file: &'a str,
    pub namespace: &'a str,
    pub imports: &'a mut ImportRegistry,
}

/// Walk a match expression into a definition.
///
/// # Errors
/// Returns [`SchemaError::Structure`] for malformed matches, arms and
/// right-hand sides, and [`SchemaError::CyclicDefinition`] when a nested
/// match re-declares one of its enclosing types.
pub fn walk(ctx: &mut WalkContext<'_>, expr: &Expr) -> Result<Definition> {
    let mut ancestors = Vec::new();
    walk_expr(ctx, expr, &mut ancestors)
}

fn walk_expr(ctx: &mut WalkContext<'_>, expr: &Expr, ancestors: &mut Vec<String>) -> Result<Definition> {
    let Some(matched) = expr.as_match() else {
        return Err(SchemaError::structure(
            ctx.file,
            expr.line,
            "Definition must be a match expression",
        ));
    };
    walk_match(ctx, matched, expr.line, ancestors)
}

fn walk_match(
    ctx: &mut WalkContext<'_>,
    matched: &MatchExpr,
    line: usize,
    ancestors: &mut Vec<String>,
) -> Result<Definition> {
    let type_name = match &matched.subject.kind {
        ExprKind::ClassConst { class } if !class.contains('\\') => class.clone(),
        _ => {
            return Err(SchemaError::structure(
                ctx.file,
                matched.subject.line,
                "The match subject must be a simple class name of the form Name::class",
            ));
        }
    };

    if ancestors.contains(&type_name) {
        let mut chain = ancestors.clone();
        chain.push(type_name.clone());
        return Err(SchemaError::CyclicDefinition {
            file: ctx.file.to_string(),
            line,
            type_name,
            chain: chain.join(" -> "),
        });
    }

    ancestors.push(type_name.clone());
    let mut definition = Definition::new(ctx.namespace, type_name);

    for arm in &matched.arms {
        let [condition] = arm.conditions.as_slice() else {
            return Err(SchemaError::structure(
                ctx.file,
                arm.line,
                "Each match arm must contain exactly one single variable name to the left side of the arrow",
            ));
        };

        let ExprKind::Variable { name } = &condition.kind else {
            return Err(SchemaError::structure(
                ctx.file,
                condition.line,
                "Left side definition of property must be a $variable name",
            ));
        };

        if definition.properties.contains_key(name) {
            return Err(SchemaError::structure(
                ctx.file,
                arm.line,
                format!("Property ${} is declared more than once", name),
            ));
        }

        let property = walk_property(ctx, &arm.body, ancestors)?;
        definition.properties.insert(name.clone(), property);
    }

    ancestors.pop();
    Ok(definition)
}

fn walk_property(ctx: &mut WalkContext<'_>, body: &Expr, ancestors: &mut Vec<String>) -> Result<PropertyRef> {
    match &body.kind {
        ExprKind::ClassConst { class } => Ok(PropertyRef::type_name(ctx.imports.resolve_reference(class))),
        ExprKind::Match(matched) => Ok(PropertyRef::nested(walk_match(ctx, matched, body.line, ancestors)?)),
        ExprKind::Array { items } => walk_array(ctx, items, body.line, ancestors),
        _ => Err(SchemaError::structure(
            ctx.file,
            body.line,
            "Right side definition of property must contain a Name::class, a match expression or an array (of 1 element) of either one of the two",
        )),
    }
}

fn walk_array(
    ctx: &mut WalkContext<'_>,
    items: &[ArrayItem],
    line: usize,
    ancestors: &mut Vec<String>,
) -> Result<PropertyRef> {
    let element = match items {
        [ArrayItem { key: None, value }] => value,
        _ => {
            return Err(SchemaError::structure(
                ctx.file,
                line,
                "Right side array must contain exactly one unkeyed element, either a Name::class or a match expression",
            ));
        }
    };

    match &element.kind {
        ExprKind::ClassConst { .. } | ExprKind::Match(_) => {
            Ok(walk_property(ctx, element, ancestors)?.into_array())
        }
        _ => Err(SchemaError::structure(
            ctx.file,
            element.line,
            "Right side array element must be a Name::class or a match expression",
        )),
    }
}
