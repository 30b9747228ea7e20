//! Constructors for synthesized nodes

use crate::ast::{
    Arrow, ArrowBody, ClassMember, ClassProperty, Decl, Expr, Function, Lit, MemberProp, Method,
    MethodKind, Param, Pattern, Prop, PropKey, Stmt, Str, VarDecl, VarDeclarator, VarKind,
};

impl Expr {
    /// `name`
    #[inline]
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// `null`
    #[inline]
    #[must_use]
    pub fn null() -> Self {
        Expr::Lit(Lit::Null)
    }

    /// `'value'`
    #[inline]
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Expr::Lit(Lit::Str(Str::new(value)))
    }

    /// `obj.prop`
    #[must_use]
    pub fn member(obj: Expr, prop: impl Into<String>) -> Self {
        Expr::Member {
            obj: Box::new(obj),
            prop: MemberProp::Ident(prop.into()),
            optional: false,
        }
    }

    /// `callee(args)`
    #[must_use]
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
            optional: false,
        }
    }

    /// `this.state`
    #[must_use]
    pub fn this_state() -> Self {
        Expr::member(Expr::This, "state")
    }

    /// `this.state.<name>`
    #[must_use]
    pub fn this_state_field(name: impl Into<String>) -> Self {
        Expr::member(Expr::this_state(), name)
    }

    /// `this.props`
    #[must_use]
    pub fn this_props() -> Self {
        Expr::member(Expr::This, "props")
    }

    /// `{ key: value, ... }` from static keys
    #[must_use]
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Object(
            entries
                .into_iter()
                .map(|(key, value)| Prop::KeyValue {
                    key: PropKey::Ident(key.into()),
                    value,
                })
                .collect(),
        )
    }

    /// `(params) => body`
    #[must_use]
    pub fn arrow(params: Vec<Param>, body: ArrowBody) -> Self {
        Expr::Arrow(Box::new(Arrow {
            params,
            body,
            is_async: false,
            return_type: None,
        }))
    }

    /// `left = right`
    #[must_use]
    pub fn assign(left: Expr, right: Expr) -> Self {
        Expr::Assign {
            op: "=".to_string(),
            left: Box::new(Pattern::Expr(Box::new(left))),
            right: Box::new(right),
        }
    }

    /// `(expr)`
    #[inline]
    #[must_use]
    pub fn paren(expr: Expr) -> Self {
        Expr::Paren(Box::new(expr))
    }

    /// Check for `this.state.<name>`
    #[must_use]
    pub fn is_this_state_field(&self, name: &str) -> bool {
        matches!(
            self,
            Expr::Member { obj, prop: MemberProp::Ident(prop), .. }
                if prop == name && obj.as_ref() == &Expr::this_state()
        )
    }
}

impl Stmt {
    /// `expr;`
    #[inline]
    #[must_use]
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    /// `const <pattern> = <init>;`
    #[must_use]
    pub fn const_decl(name: Pattern, init: Expr) -> Self {
        Stmt::Decl(Decl::Var(VarDecl {
            kind: VarKind::Const,
            decls: vec![VarDeclarator {
                name,
                type_ann: None,
                init: Some(init),
            }],
        }))
    }

    /// `super(props);`
    #[must_use]
    pub fn super_call(args: Vec<Expr>) -> Self {
        Stmt::Expr(Expr::call(Expr::Super, args))
    }
}

impl Method {
    /// `constructor(params) { body }`
    #[must_use]
    pub fn constructor(params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            kind: MethodKind::Constructor,
            key: PropKey::Ident("constructor".to_string()),
            is_static: false,
            modifiers: Vec::new(),
            function: Function {
                params,
                body,
                ..Function::default()
            },
        }
    }
}

impl ClassMember {
    /// `static <name> = <value>;`
    #[must_use]
    pub fn static_property(name: impl Into<String>, value: Expr) -> Self {
        ClassMember::Property(ClassProperty {
            key: PropKey::Ident(name.into()),
            is_static: true,
            modifiers: Vec::new(),
            type_ann: None,
            value: Some(value),
        })
    }
}
