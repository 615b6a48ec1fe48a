use crate::backend::ts_ast::TypeNode;
use crate::syntax::lexer::SourceLoc;

use super::error::TransformError;
use super::tags::{DocTag, TagSlice};

fn map_atom(atom: &str, location: SourceLoc) -> Result<TypeNode, TransformError> {
    match atom {
        "number" => Ok(TypeNode::Number),
        "string" => Ok(TypeNode::String),
        "boolean" | "bool" => Ok(TypeNode::Boolean),
        "nil" => Ok(TypeNode::Undefined),
        _ => Err(TransformError::UnknownType {
            name: atom.to_string(),
            location,
        }),
    }
}

/// Map a tag type such as `number` or `string|nil`
pub fn map_type(ty: &str, location: SourceLoc) -> Result<TypeNode, TransformError> {
    let mut types = ty
        .split('|')
        .map(|atom| map_atom(atom, location))
        .collect::<Result<Vec<_>, _>>()?;

    if types.len() == 1 {
        Ok(types.remove(0))
    } else {
        Ok(TypeNode::Union(types))
    }
}

/// `void` without `@treturn`, the single type with one, a tuple with several
pub fn return_type(tags: &[DocTag], location: SourceLoc) -> Result<TypeNode, TransformError> {
    let mut types = tags
        .treturns()
        .into_iter()
        .map(|ty| map_type(ty, location))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match types.len() {
        0 => TypeNode::Void,
        1 => types.remove(0),
        _ => TypeNode::Tuple(types),
    })
}

#[cfg(test)]
mod types_tests {
    use super::*;

    fn treturn(ty: &str) -> DocTag {
        DocTag::TReturn {
            ty: ty.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn atoms_map_through_the_table() {
        let loc = SourceLoc::default();
        assert_eq!(map_type("number", loc), Ok(TypeNode::Number));
        assert_eq!(map_type("bool", loc), Ok(TypeNode::Boolean));
        assert_eq!(map_type("nil", loc), Ok(TypeNode::Undefined));
    }

    #[test]
    fn unions_keep_their_order() {
        assert_eq!(
            map_type("string|number|nil", SourceLoc::default()),
            Ok(TypeNode::Union(vec![
                TypeNode::String,
                TypeNode::Number,
                TypeNode::Undefined
            ]))
        );
    }

    #[test]
    fn unknown_atoms_are_fatal() {
        assert!(matches!(
            map_type("number|table", SourceLoc::default()),
            Err(TransformError::UnknownType { name, .. }) if name == "table"
        ));
        assert!(map_type("", SourceLoc::default()).is_err());
    }

    #[test]
    fn return_types_by_tag_count() {
        let loc = SourceLoc::default();
        assert_eq!(return_type(&[], loc), Ok(TypeNode::Void));
        assert_eq!(return_type(&[treturn("string")], loc), Ok(TypeNode::String));
        assert_eq!(
            return_type(&[treturn("string"), treturn("number")], loc),
            Ok(TypeNode::Tuple(vec![TypeNode::String, TypeNode::Number]))
        );
    }
}
