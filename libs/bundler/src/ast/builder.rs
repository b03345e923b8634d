// Copyright 2018-2026 the Esbundle authors. MIT license.

//! Small constructors for the AST shapes the lowerer and the harness
//! emitter synthesize. Everything is span-less; the printed bundle has
//! no original source positions anyway.

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;

pub fn ident(sym: &str) -> Ident {
  Ident::new(sym.into(), DUMMY_SP)
}

pub fn ident_expr(sym: &str) -> Expr {
  Expr::Ident(ident(sym))
}

pub fn this() -> Expr {
  Expr::This(ThisExpr { span: DUMMY_SP })
}

pub fn str_lit(value: &str) -> Str {
  Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }
}

pub fn str(value: &str) -> Expr {
  Expr::Lit(Lit::Str(str_lit(value)))
}

pub fn num(value: f64) -> Expr {
  Expr::Lit(Lit::Num(Number {
    span: DUMMY_SP,
    value,
    raw: None,
  }))
}

pub fn bool(value: bool) -> Expr {
  Expr::Lit(Lit::Bool(Bool {
    span: DUMMY_SP,
    value,
  }))
}

pub fn array(elems: Vec<Expr>) -> Expr {
  Expr::Array(ArrayLit {
    span: DUMMY_SP,
    elems: elems
      .into_iter()
      .map(|expr| {
        Some(ExprOrSpread {
          spread: None,
          expr: Box::new(expr),
        })
      })
      .collect(),
  })
}

/// `{ key: value, … }` with plain identifier keys.
pub fn object(props: Vec<(&str, Expr)>) -> Expr {
  Expr::Object(ObjectLit {
    span: DUMMY_SP,
    props: props
      .into_iter()
      .map(|(key, value)| {
        PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
          key: PropName::Ident(ident(key)),
          value: Box::new(value),
        })))
      })
      .collect(),
  })
}

pub fn member(obj: Expr, prop: &str) -> Expr {
  Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(obj),
    prop: MemberProp::Ident(ident(prop)),
  })
}

pub fn computed_member(obj: Expr, prop: Expr) -> Expr {
  Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(obj),
    prop: MemberProp::Computed(ComputedPropName {
      span: DUMMY_SP,
      expr: Box::new(prop),
    }),
  })
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
  Expr::Call(CallExpr {
    span: DUMMY_SP,
    callee: Callee::Expr(Box::new(callee)),
    args: args
      .into_iter()
      .map(|expr| ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
      })
      .collect(),
    type_args: None,
  })
}

pub fn new_expr(callee: Expr, args: Vec<Expr>) -> Expr {
  Expr::New(NewExpr {
    span: DUMMY_SP,
    callee: Box::new(callee),
    args: Some(
      args
        .into_iter()
        .map(|expr| ExprOrSpread {
          spread: None,
          expr: Box::new(expr),
        })
        .collect(),
    ),
    type_args: None,
  })
}

pub fn assign(target: Expr, value: Expr) -> Expr {
  Expr::Assign(AssignExpr {
    span: DUMMY_SP,
    op: AssignOp::Assign,
    left: PatOrExpr::Expr(Box::new(target)),
    right: Box::new(value),
  })
}

pub fn add(left: Expr, right: Expr) -> Expr {
  Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::Add,
    left: Box::new(left),
    right: Box::new(right),
  })
}

pub fn strict_not_eq(left: Expr, right: Expr) -> Expr {
  Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::NotEqEq,
    left: Box::new(left),
    right: Box::new(right),
  })
}

pub fn not(arg: Expr) -> Expr {
  Expr::Unary(UnaryExpr {
    span: DUMMY_SP,
    op: UnaryOp::Bang,
    arg: Box::new(arg),
  })
}

pub fn cond(test: Expr, cons: Expr, alt: Expr) -> Expr {
  Expr::Cond(CondExpr {
    span: DUMMY_SP,
    test: Box::new(test),
    cons: Box::new(cons),
    alt: Box::new(alt),
  })
}

pub fn paren(expr: Expr) -> Expr {
  Expr::Paren(ParenExpr {
    span: DUMMY_SP,
    expr: Box::new(expr),
  })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
  Stmt::Expr(ExprStmt {
    span: DUMMY_SP,
    expr: Box::new(expr),
  })
}

pub fn ret(arg: Option<Expr>) -> Stmt {
  Stmt::Return(ReturnStmt {
    span: DUMMY_SP,
    arg: arg.map(Box::new),
  })
}

pub fn throw(arg: Expr) -> Stmt {
  Stmt::Throw(ThrowStmt {
    span: DUMMY_SP,
    arg: Box::new(arg),
  })
}

pub fn if_stmt(test: Expr, cons: Stmt) -> Stmt {
  Stmt::If(IfStmt {
    span: DUMMY_SP,
    test: Box::new(test),
    cons: Box::new(cons),
    alt: None,
  })
}

pub fn declarator(name: Ident, init: Option<Expr>) -> VarDeclarator {
  VarDeclarator {
    span: DUMMY_SP,
    name: Pat::Ident(name.into()),
    init: init.map(Box::new),
    definite: false,
  }
}

pub fn var_stmt(decls: Vec<VarDeclarator>) -> Stmt {
  Stmt::Decl(Decl::Var(Box::new(VarDecl {
    span: DUMMY_SP,
    kind: VarDeclKind::Var,
    declare: false,
    decls,
  })))
}

pub fn function(params: &[&str], body: Vec<Stmt>) -> Function {
  Function {
    params: params
      .iter()
      .map(|name| Param {
        span: DUMMY_SP,
        decorators: Vec::new(),
        pat: Pat::Ident(ident(name).into()),
      })
      .collect(),
    decorators: Vec::new(),
    span: DUMMY_SP,
    body: Some(BlockStmt {
      span: DUMMY_SP,
      stmts: body,
    }),
    is_generator: false,
    is_async: false,
    type_params: None,
    return_type: None,
  }
}

pub fn fn_expr(params: &[&str], body: Vec<Stmt>) -> Expr {
  Expr::Fn(FnExpr {
    ident: None,
    function: Box::new(function(params, body)),
  })
}

pub fn fn_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
  Stmt::Decl(Decl::Fn(FnDecl {
    ident: ident(name),
    declare: false,
    function: Box::new(function(params, body)),
  }))
}
