//! Printer from the TypeScript tree to source text.
//!
//! Output is written line by line with four-space indentation. When the
//! provenance table is available, every printed statement records which Lua
//! line it came from.

use serde::Serialize;

use super::ts_ast::*;

/// One generated line and the Lua position it was printed from
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMapping {
    pub generated_line: usize,
    pub source_line: usize,
    pub source_column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintedCode {
    pub code: String,
    pub mappings: Vec<LineMapping>,
}

// Operator precedence, as in the TypeScript grammar
const PREC_ASSIGN: u8 = 2;
const PREC_PREFIX: u8 = 15;
const PREC_POSTFIX: u8 = 16;
const PREC_MEMBER: u8 = 18;
const PREC_PRIMARY: u8 = 20;

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 4,
        BinaryOp::And => 5,
        BinaryOp::StrictEq | BinaryOp::StrictNotEq => 9,
        BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => 10,
        BinaryOp::Add | BinaryOp::Sub => 12,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 13,
        BinaryOp::Pow => 14,
    }
}

fn precedence(expr: &ExprKind) -> u8 {
    match expr {
        ExprKind::Assign(..) | ExprKind::Function(_) => PREC_ASSIGN,
        ExprKind::Binary(_, op, _) => binary_precedence(*op),
        ExprKind::Prefix(..) => PREC_PREFIX,
        ExprKind::Postfix(..) => PREC_POSTFIX,
        ExprKind::Call { .. } | ExprKind::Member { .. } | ExprKind::Element { .. } => PREC_MEMBER,
        ExprKind::Ident(_)
        | ExprKind::Number(_)
        | ExprKind::String(_)
        | ExprKind::Bool(_)
        | ExprKind::Array(_)
        | ExprKind::Object(_)
        | ExprKind::Spread(_) => PREC_PRIMARY,
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_infinite() {
        "Infinity".to_string()
    } else if n.is_nan() {
        "NaN".to_string()
    } else {
        // f64's Display drops the fraction of integral values
        n.to_string()
    }
}

pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Printer<'p> {
    indent: String,
    out: String,
    /// 1-based number of the line being written
    line: usize,
    provenance: Option<&'p Provenance>,
    mappings: Vec<LineMapping>,
}

impl<'p> Printer<'p> {
    fn new(provenance: Option<&'p Provenance>) -> Self {
        Printer {
            indent: String::new(),
            out: String::new(),
            line: 1,
            provenance,
            mappings: Vec::new(),
        }
    }

    pub fn print(stmts: &[TsStmt], provenance: Option<&'p Provenance>) -> PrintedCode {
        let mut printer = Printer::new(provenance);
        for stmt in stmts {
            printer.stmt(stmt);
        }

        PrintedCode {
            code: printer.out,
            mappings: printer.mappings,
        }
    }

    fn emit(&mut self, str: &str) {
        self.out.push_str(str);
    }

    fn start_line(&mut self) {
        self.out.push_str(&self.indent);
    }

    fn end_line(&mut self) {
        self.out.push('\n');
        self.line += 1;
    }

    fn increase_indent(&mut self) {
        self.indent.push_str("    ");
    }

    fn decrease_indent(&mut self) {
        self.indent.truncate(self.indent.len().saturating_sub(4));
    }

    fn map(&mut self, id: NodeId) {
        let Some(location) = self.provenance.and_then(|p| p.get(id)) else {
            return;
        };

        self.mappings.push(LineMapping {
            generated_line: self.line,
            source_line: location.start_pos.line,
            source_column: location.start_pos.column,
        });
    }

    /// ` {`, the statements, then `}` left open on its line
    fn block(&mut self, body: &[TsStmt]) {
        self.emit(" {");
        self.end_line();

        self.increase_indent();
        for stmt in body {
            self.stmt(stmt);
        }
        self.decrease_indent();

        self.start_line();
        self.emit("}");
    }

    fn stmt(&mut self, stmt: &TsStmt) {
        self.map(stmt.id);
        self.start_line();
        self.stmt_inline(stmt);
        self.end_line();
    }

    fn stmt_inline(&mut self, stmt: &TsStmt) {
        match &stmt.kind {
            StmtKind::Var(decl) => {
                self.var_decl(decl);
                self.emit(";");
            }
            StmtKind::Function(decl) => {
                if decl.exported {
                    self.emit("export ");
                }
                self.emit("function ");
                self.emit(&decl.name);
                self.function(&decl.func);
            }
            StmtKind::Class(class) => self.class(class),
            StmtKind::Expr(expr) => {
                self.expr(expr, PREC_ASSIGN);
                self.emit(";");
            }
            StmtKind::Return(value) => {
                self.emit("return");
                if let Some(value) = value {
                    self.emit(" ");
                    self.expr(value, PREC_ASSIGN);
                }
                self.emit(";");
            }
            StmtKind::ExportAssign(value) => {
                self.emit("export = ");
                self.expr(value, PREC_ASSIGN);
                self.emit(";");
            }
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => {
                self.emit("if (");
                self.expr(cond, PREC_ASSIGN);
                self.emit(")");
                self.block(then_block);

                match else_branch {
                    Some(Else::If(elif)) => {
                        self.emit(" else ");
                        self.map(elif.id);
                        self.stmt_inline(elif);
                    }
                    Some(Else::Block(body)) => {
                        self.emit(" else");
                        self.block(body);
                    }
                    None => {}
                }
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.emit("for (");
                self.var_decl(init);
                self.emit("; ");
                self.expr(test, PREC_ASSIGN);
                self.emit("; ");
                self.expr(update, PREC_ASSIGN);
                self.emit(")");
                self.block(body);
            }
            StmtKind::ForOf {
                binding,
                iterable,
                body,
            } => {
                self.emit("for (const ");
                self.binding(binding);
                self.emit(" of ");
                self.expr(iterable, PREC_ASSIGN);
                self.emit(")");
                self.block(body);
            }
            StmtKind::While { cond, body } => {
                self.emit("while (");
                self.expr(cond, PREC_ASSIGN);
                self.emit(")");
                self.block(body);
            }
            StmtKind::Break => self.emit("break;"),
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.emit(match decl.kind {
            DeclKind::Let => "let ",
            DeclKind::Const => "const ",
        });
        self.binding(&decl.binding);

        if let Some(ty) = &decl.ty {
            self.emit(&format!(": {ty}"));
        }

        if let Some(init) = &decl.init {
            self.emit(" = ");
            self.expr(init, PREC_ASSIGN);
        }
    }

    fn binding(&mut self, binding: &Binding) {
        match binding {
            Binding::Ident(name) => self.emit(name),
            Binding::Array(names) => self.emit(&format!("[{}]", names.join(", "))),
        }
    }

    fn class(&mut self, class: &ClassDecl) {
        self.emit(&format!("class {} {{", class.name));
        self.end_line();
        self.increase_indent();

        for method in &class.methods {
            self.map(method.id);
            self.start_line();
            if method.kind.is_static {
                self.emit("static ");
            }
            self.emit(&method.kind.name);
            self.function(&method.kind.func);
            self.end_line();
        }

        self.decrease_indent();
        self.start_line();
        self.emit("}");
    }

    /// `(params): type { body }` of a function
    fn function(&mut self, func: &Function) {
        let params: Vec<String> = func.params.iter().map(param).collect();
        self.emit(&format!("({})", params.join(", ")));

        if let Some(ty) = &func.return_type {
            self.emit(&format!(": {ty}"));
        }

        self.block(&func.body);
    }

    fn expr(&mut self, expr: &TsExpr, min_prec: u8) {
        if precedence(&expr.kind) < min_prec {
            self.emit("(");
            self.expr_inner(expr);
            self.emit(")");
        } else {
            self.expr_inner(expr);
        }
    }

    /// The object of a member access or the callee of a call
    fn object(&mut self, expr: &TsExpr) {
        // A leading `{` or `function` would not parse as an expression
        if matches!(expr.kind, ExprKind::Object(_) | ExprKind::Function(_)) {
            self.emit("(");
            self.expr_inner(expr);
            self.emit(")");
        } else {
            self.expr(expr, PREC_MEMBER);
        }
    }

    fn list(&mut self, exprs: &[TsExpr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.expr(expr, PREC_ASSIGN);
        }
    }

    fn expr_inner(&mut self, expr: &TsExpr) {
        match &expr.kind {
            ExprKind::Ident(name) => self.emit(name),
            ExprKind::Number(n) => self.emit(&format_number(*n)),
            ExprKind::String(s) => self.emit(&quote_string(s)),
            ExprKind::Bool(b) => self.emit(if *b { "true" } else { "false" }),

            ExprKind::Member { object, property } => {
                self.object(object);
                self.emit(".");
                self.emit(property);
            }
            ExprKind::Element { object, index } => {
                self.object(object);
                self.emit("[");
                self.expr(index, PREC_ASSIGN);
                self.emit("]");
            }

            ExprKind::Binary(lhs, op, rhs) => {
                let prec = binary_precedence(*op);
                let (lhs_prec, rhs_prec) = if *op == BinaryOp::Pow {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };

                // `-x ** y` is a syntax error
                if *op == BinaryOp::Pow && matches!(lhs.kind, ExprKind::Prefix(..)) {
                    self.emit("(");
                    self.expr_inner(lhs);
                    self.emit(")");
                } else {
                    self.expr(lhs, lhs_prec);
                }

                self.emit(&format!(" {} ", op.to_str()));
                self.expr(rhs, rhs_prec);
            }
            ExprKind::Prefix(op, operand) => {
                self.emit(op.to_str());
                // Keep `- -x` from turning into a decrement
                if *op == PrefixOp::Neg && matches!(operand.kind, ExprKind::Prefix(PrefixOp::Neg, _))
                {
                    self.emit(" ");
                }
                self.expr(operand, PREC_PREFIX);
            }
            ExprKind::Postfix(operand, PostfixOp::Increment) => {
                self.expr(operand, PREC_POSTFIX);
                self.emit("++");
            }
            ExprKind::Assign(target, op, value) => {
                self.expr(target, PREC_ASSIGN + 1);
                self.emit(&format!(" {} ", op.to_str()));
                self.expr(value, PREC_ASSIGN);
            }
            ExprKind::Spread(value) => {
                self.emit("...");
                self.expr(value, PREC_ASSIGN);
            }

            ExprKind::Array(elements) => {
                self.emit("[");
                self.list(elements);
                self.emit("]");
            }
            ExprKind::Object(properties) => {
                if properties.is_empty() {
                    self.emit("{}");
                    return;
                }

                self.emit("{ ");
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    match &property.key {
                        PropertyKey::Ident(name) => self.emit(name),
                        PropertyKey::Computed(key) => {
                            self.emit("[");
                            self.expr(key, PREC_ASSIGN);
                            self.emit("]");
                        }
                    }
                    self.emit(": ");
                    self.expr(&property.value, PREC_ASSIGN);
                }
                self.emit(" }");
            }

            ExprKind::Call { callee, args } => {
                self.object(callee);
                self.emit("(");
                self.list(args);
                self.emit(")");
            }
            ExprKind::Function(func) => {
                self.emit("function ");
                self.function(func);
            }
        }
    }
}

fn param(param: &Param) -> String {
    let mut out = String::new();
    if param.rest {
        out.push_str("...");
    }
    out.push_str(&param.name);

    match (&param.ty, param.rest) {
        (Some(ty @ TypeNode::Union(_)), true) => out.push_str(&format!(": ({ty})[]")),
        (Some(ty), true) => out.push_str(&format!(": {ty}[]")),
        (Some(ty), false) => out.push_str(&format!(": {ty}")),
        (None, _) => {}
    }

    out
}
