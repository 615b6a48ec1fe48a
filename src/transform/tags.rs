//! LDoc tags decoded from documentation comments.
//!
//! A comment holds at most one tag. Its raw text is split on whitespace: the
//! first word is the comment marker, the second selects the tag and the rest
//! are read positionally. Anything that does not decode is skipped.

use serde::Serialize;

use crate::syntax::ast::Comment;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    /// `@param <name> <description...>`
    Param { name: String, description: String },
    /// `@tparam <type> <name> <description...>`
    TParam {
        name: String,
        ty: String,
        description: String,
    },
    /// `@return <description...>`
    Return { description: String },
    /// `@treturn <type> <description...>`
    TReturn { ty: String, description: String },
    /// `@type <type> <description...>`
    Type { ty: String, description: String },
    /// `@classmod <name>`
    ClassMod { name: String },
    /// `@module <name>`
    Module { name: String },
}

/// Decode the tag of a single comment, if it has one
pub fn decode_tag(raw: &str) -> Option<DocTag> {
    let mut words = raw.split_whitespace().skip(1);
    let tag = words.next()?;

    let tag = match tag {
        "@param" => DocTag::Param {
            name: words.next()?.to_string(),
            description: join(words),
        },
        "@tparam" => {
            let ty = words.next()?.to_string();
            let name = words.next()?.to_string();
            DocTag::TParam {
                name,
                ty,
                description: join(words),
            }
        }
        "@return" => DocTag::Return {
            description: join(words),
        },
        "@treturn" => DocTag::TReturn {
            ty: words.next()?.to_string(),
            description: join(words),
        },
        "@type" => DocTag::Type {
            ty: words.next()?.to_string(),
            description: join(words),
        },
        "@classmod" => DocTag::ClassMod {
            name: words.next()?.to_string(),
        },
        "@module" => DocTag::Module {
            name: words.next()?.to_string(),
        },
        _ => return None,
    };

    Some(tag)
}

fn join<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words.collect::<Vec<_>>().join(" ")
}

/// Decode every comment in order, dropping those without a tag
pub fn resolve_tags<'c>(comments: impl IntoIterator<Item = &'c Comment>) -> Vec<DocTag> {
    comments
        .into_iter()
        .filter_map(|comment| decode_tag(&comment.raw))
        .collect()
}

/// Lookups over the tags attached to one statement
pub trait TagSlice {
    /// Types of the `@tparam` tags naming `name`, in tag order
    fn tparams_named(&self, name: &str) -> Vec<&str>;
    /// Types of every `@treturn` tag, in tag order
    fn treturns(&self) -> Vec<&str>;
    /// Type of the first `@type` tag
    fn local_type(&self) -> Option<&str>;
    fn class_marker(&self) -> Option<&str>;
    fn module_marker(&self) -> Option<&str>;
}

impl TagSlice for [DocTag] {
    fn tparams_named(&self, name: &str) -> Vec<&str> {
        self.iter()
            .filter_map(|tag| match tag {
                DocTag::TParam { name: n, ty, .. } if n == name => Some(ty.as_str()),
                _ => None,
            })
            .collect()
    }

    fn treturns(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|tag| match tag {
                DocTag::TReturn { ty, .. } => Some(ty.as_str()),
                _ => None,
            })
            .collect()
    }

    fn local_type(&self) -> Option<&str> {
        self.iter().find_map(|tag| match tag {
            DocTag::Type { ty, .. } => Some(ty.as_str()),
            _ => None,
        })
    }

    fn class_marker(&self) -> Option<&str> {
        self.iter().find_map(|tag| match tag {
            DocTag::ClassMod { name } => Some(name.as_str()),
            _ => None,
        })
    }

    fn module_marker(&self) -> Option<&str> {
        self.iter().find_map(|tag| match tag {
            DocTag::Module { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tags_tests {
    use super::*;
    use crate::syntax::lexer::SourceLoc;
    use pretty_assertions::assert_eq;

    fn comment(raw: &str) -> Comment {
        Comment {
            value: raw.trim_start_matches('-').to_string(),
            raw: raw.to_string(),
            location: SourceLoc::default(),
        }
    }

    #[test]
    fn decodes_every_kind() {
        assert_eq!(
            decode_tag("-- @tparam number|nil x the x value"),
            Some(DocTag::TParam {
                name: "x".to_string(),
                ty: "number|nil".to_string(),
                description: "the x value".to_string(),
            })
        );
        assert_eq!(
            decode_tag("-- @param x"),
            Some(DocTag::Param {
                name: "x".to_string(),
                description: String::new(),
            })
        );
        assert_eq!(
            decode_tag("-- @return   something  useful"),
            Some(DocTag::Return {
                description: "something useful".to_string(),
            })
        );
        assert_eq!(
            decode_tag("-- @treturn string"),
            Some(DocTag::TReturn {
                ty: "string".to_string(),
                description: String::new(),
            })
        );
        assert_eq!(
            decode_tag("-- @type boolean flag"),
            Some(DocTag::Type {
                ty: "boolean".to_string(),
                description: "flag".to_string(),
            })
        );
        assert_eq!(
            decode_tag("-- @classmod Account"),
            Some(DocTag::ClassMod {
                name: "Account".to_string(),
            })
        );
        assert_eq!(
            decode_tag("-- @module util"),
            Some(DocTag::Module {
                name: "util".to_string(),
            })
        );
    }

    #[test]
    fn undecodable_comments_are_skipped() {
        assert_eq!(decode_tag("-- just a comment"), None);
        assert_eq!(decode_tag("--@type number"), None);
        assert_eq!(decode_tag("-- @tparam number"), None);
        assert_eq!(decode_tag("-- @classmod"), None);
        assert_eq!(decode_tag("--"), None);
    }

    #[test]
    fn resolution_keeps_comment_order() {
        let comments = vec![
            comment("-- @treturn number"),
            comment("-- unrelated"),
            comment("-- @treturn string"),
        ];
        let tags = resolve_tags(&comments);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.treturns(), vec!["number", "string"]);
    }

    #[test]
    fn tparams_are_matched_by_name() {
        let comments = vec![
            comment("-- @tparam number a"),
            comment("-- @tparam string b"),
            comment("-- @tparam boolean a"),
        ];
        let tags = resolve_tags(&comments);

        assert_eq!(tags.tparams_named("a"), vec!["number", "boolean"]);
        assert_eq!(tags.tparams_named("b"), vec!["string"]);
        assert!(tags.tparams_named("c").is_empty());
    }
}
