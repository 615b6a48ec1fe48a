use crate::utils::Spanned;

use super::lexer::{BinOp, LogicalOp, SourceLoc, UnOp};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
    Vararg,
}

/// `a.b` or `a:b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexer {
    Dot,
    Colon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableField {
    /// `[key] = value`
    Keyed {
        key: Spanned<Expr>,
        value: Spanned<Expr>,
    },
    /// `name = value`
    Named {
        key: Spanned<String>,
        value: Spanned<Expr>,
    },
    /// `value`
    Positional(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Name(String),
    Vararg,
}

impl Param {
    /// Name used to look up `@tparam` tags
    pub fn tag_name(&self) -> &str {
        match self {
            Param::Name(name) => name,
            Param::Vararg => "...",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub params: Vec<Spanned<Param>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Literal(Literal),

    Member {
        base: Box<Spanned<Expr>>,
        indexer: Indexer,
        name: Spanned<String>,
    },
    Index {
        base: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },

    // Operations
    Unary(UnOp, Box<Spanned<Expr>>),
    Binary(Box<Spanned<Expr>>, BinOp, Box<Spanned<Expr>>),
    Logical(Box<Spanned<Expr>>, LogicalOp, Box<Spanned<Expr>>),

    Table(Vec<Spanned<TableField>>),

    Call {
        base: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    StringCall {
        base: Box<Spanned<Expr>>,
        argument: Box<Spanned<Expr>>,
    },
    TableCall {
        base: Box<Spanned<Expr>>,
        argument: Box<Spanned<Expr>>,
    },

    Function(FunctionBody),
}

impl Expr {
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            Expr::Call { .. } | Expr::StringCall { .. } | Expr::TableCall { .. }
        )
    }

    pub fn is_lvalue(&self) -> bool {
        matches!(self, Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. })
    }
}

/// A statement list together with the byte offset at which the block opens.
/// Comments before `start` never belong to the block's first statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
    pub start: usize,
}

impl Block {
    pub fn new(stmts: Vec<Spanned<Stmt>>, start: usize) -> Self {
        Block { stmts, start }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Local {
        names: Vec<Spanned<String>>,
        init: Vec<Spanned<Expr>>,
    },
    Assign {
        targets: Vec<Spanned<Expr>>,
        init: Vec<Spanned<Expr>>,
    },
    Call(Spanned<Expr>),
    Function {
        name: Spanned<Expr>,
        is_local: bool,
        func: FunctionBody,
    },
    Return(Vec<Spanned<Expr>>),
    If {
        cond: Spanned<Expr>,
        then_block: Block,
        elif_blocks: Vec<(Spanned<Expr>, Block)>,
        else_block: Option<Block>,
    },
    While {
        cond: Spanned<Expr>,
        block: Block,
    },
    ForNumeric {
        var: Spanned<String>,
        start: Spanned<Expr>,
        end: Spanned<Expr>,
        step: Option<Spanned<Expr>>,
        block: Block,
    },
    ForGeneric {
        vars: Vec<Spanned<String>>,
        iterators: Vec<Spanned<Expr>>,
        block: Block,
    },
    Break,

    // Parsed, but not translated
    Repeat {
        block: Block,
        cond: Spanned<Expr>,
    },
    Do(Block),
    Goto(String),
    Label(String),
}

impl Stmt {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Local { .. } => "LocalStatement",
            Stmt::Assign { .. } => "AssignmentStatement",
            Stmt::Call(_) => "CallStatement",
            Stmt::Function { .. } => "FunctionDeclaration",
            Stmt::Return(_) => "ReturnStatement",
            Stmt::If { .. } => "IfStatement",
            Stmt::While { .. } => "WhileStatement",
            Stmt::ForNumeric { .. } => "ForNumericStatement",
            Stmt::ForGeneric { .. } => "ForGenericStatement",
            Stmt::Break => "BreakStatement",
            Stmt::Repeat { .. } => "RepeatStatement",
            Stmt::Do(_) => "DoStatement",
            Stmt::Goto(_) => "GotoStatement",
            Stmt::Label(_) => "LabelStatement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Text without the comment markers
    pub value: String,
    /// Text exactly as written, markers included
    pub raw: String,
    pub location: SourceLoc,
}

/// One parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub body: Block,
    pub comments: Vec<Comment>,
}
