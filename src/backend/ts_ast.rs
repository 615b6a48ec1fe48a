//! The TypeScript tree produced by the transformer.
//!
//! Every statement and expression is wrapped in a [`Node`] carrying a
//! [`NodeId`]. The ids are handed out by the transformer in construction
//! order, and [`Provenance`] maps them back to the Lua source they came from.

use core::fmt;
use std::collections::HashMap;

use serde::Serialize;

use crate::syntax::lexer::SourceLoc;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub id: NodeId,
    pub kind: T,
}

pub type TsExpr = Node<ExprKind>;
pub type TsStmt = Node<StmtKind>;

/// Source location of every node the transformer built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance {
    locations: HashMap<NodeId, SourceLoc>,
}

impl Provenance {
    pub fn record(&mut self, id: NodeId, location: SourceLoc) {
        self.locations.insert(id, location);
    }

    pub fn get(&self, id: NodeId) -> Option<&SourceLoc> {
        self.locations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn clear(&mut self) {
        self.locations.clear();
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Number,
    String,
    Boolean,
    Undefined,
    Void,
    Union(Vec<TypeNode>),
    Tuple(Vec<TypeNode>),
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let join = |types: &[TypeNode], sep: &str| {
            types
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(sep)
        };

        match self {
            TypeNode::Number => write!(f, "number"),
            TypeNode::String => write!(f, "string"),
            TypeNode::Boolean => write!(f, "boolean"),
            TypeNode::Undefined => write!(f, "undefined"),
            TypeNode::Void => write!(f, "void"),
            TypeNode::Union(types) => write!(f, "{}", join(types, " | ")),
            TypeNode::Tuple(types) => write!(f, "[{}]", join(types, ", ")),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    StrictEq,
    StrictNotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn to_str(&self) -> &str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,
    Not,
    BitNot,
}

impl PrefixOp {
    pub fn to_str(&self) -> &str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
}

impl AssignOp {
    pub fn to_str(&self) -> &str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(String),
    Computed(Box<TsExpr>),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: TsExpr,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub rest: bool,
    pub ty: Option<TypeNode>,
}

/// Parameters, return type and body shared by every kind of function
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<Param>,
    pub return_type: Option<TypeNode>,
    pub body: Vec<TsStmt>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Number(f64),
    String(String),
    Bool(bool),

    /// `object.property`
    Member {
        object: Box<TsExpr>,
        property: String,
    },
    /// `object[index]`
    Element {
        object: Box<TsExpr>,
        index: Box<TsExpr>,
    },

    Binary(Box<TsExpr>, BinaryOp, Box<TsExpr>),
    Prefix(PrefixOp, Box<TsExpr>),
    Postfix(Box<TsExpr>, PostfixOp),
    Assign(Box<TsExpr>, AssignOp, Box<TsExpr>),
    Spread(Box<TsExpr>),

    Array(Vec<TsExpr>),
    Object(Vec<Property>),

    Call {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },

    /// Always anonymous
    Function(Function),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Binding {
    Ident(String),
    Array(Vec<String>),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Const,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: DeclKind,
    pub binding: Binding,
    pub ty: Option<TypeNode>,
    pub init: Option<TsExpr>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub exported: bool,
    pub func: Function,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub is_static: bool,
    pub func: Function,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub methods: Vec<Node<Method>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Else {
    /// `else if`, always a `StmtKind::If`
    If(Box<TsStmt>),
    Block(Vec<TsStmt>),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum StmtKind {
    Var(VarDecl),
    Function(FunctionDecl),
    Class(ClassDecl),
    Expr(TsExpr),
    Return(Option<TsExpr>),
    /// `export = value`
    ExportAssign(TsExpr),

    If {
        cond: TsExpr,
        then_block: Vec<TsStmt>,
        else_branch: Option<Else>,
    },
    For {
        init: VarDecl,
        test: TsExpr,
        update: TsExpr,
        body: Vec<TsStmt>,
    },
    ForOf {
        binding: Binding,
        iterable: TsExpr,
        body: Vec<TsStmt>,
    },
    While {
        cond: TsExpr,
        body: Vec<TsStmt>,
    },
    Break,
}
