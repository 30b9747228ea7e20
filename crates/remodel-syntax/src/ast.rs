//! Syntax tree types
//!
//! A tagged-variant tree covering the JavaScript/JSX (and light TypeScript)
//! subset the rewrite rules reason about. Every node is owned by exactly one
//! parent through `Box`/`Vec`; the tree is acyclic by construction.
//!
//! Constructs the rules never look into are kept as [`Verbatim`] nodes: the
//! original source text plus the column it started at, so the printer can
//! re-indent it without touching its content.

/// Root of a parsed file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub body: Vec<Stmt>,
}

impl Program {
    /// Create program from statements
    #[inline]
    #[must_use]
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }

    /// Iterate over top-level import declarations with their statement index
    pub fn imports(&self) -> impl Iterator<Item = (usize, &ImportDecl)> {
        self.body.iter().enumerate().filter_map(|(i, stmt)| match stmt {
            Stmt::Import(decl) => Some((i, decl)),
            _ => None,
        })
    }

    /// Iterate over top-level class declarations, exported or not
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.body.iter().filter_map(Stmt::as_class)
    }

    /// Mutable iteration over top-level class declarations
    pub fn classes_mut(&mut self) -> impl Iterator<Item = &mut ClassDecl> {
        self.body.iter_mut().filter_map(Stmt::as_class_mut)
    }

    /// Keep the top-level statements for which `keep` returns `true`
    ///
    /// See [`retain_stmts`].
    pub fn retain_stmts(&mut self, keep: impl FnMut(&mut Stmt) -> bool) {
        retain_stmts(&mut self.body, keep);
    }
}

/// Keep the statements for which `keep` returns `true`
///
/// Trailing comments are not offered to `keep`. The trailing comment of a
/// removed statement is kept on its own line instead of joining whatever
/// statement now precedes it.
pub fn retain_stmts(stmts: &mut Vec<Stmt>, mut keep: impl FnMut(&mut Stmt) -> bool) {
    let mut dropped = false;
    stmts.retain_mut(|stmt| {
        if let Stmt::TrailingComment(raw) = stmt {
            if std::mem::take(&mut dropped) {
                *stmt = Stmt::Comment(raw.clone());
            }
            return true;
        }
        dropped = !keep(stmt);
        !dropped
    });
}

/// Source text preserved as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verbatim {
    /// Original text
    pub text: String,
    /// Zero-based column of the first character in the original file
    pub column: usize,
}

impl Verbatim {
    /// Create verbatim node
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, column: usize) -> Self {
        Self {
            text: text.into(),
            column,
        }
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `import ... from '...'`
    Import(ImportDecl),
    /// Function, class or variable declaration
    Decl(Decl),
    /// `export <declaration>`
    ExportDecl(Decl),
    /// `export default ...`
    ExportDefault(DefaultDecl),
    /// Expression statement
    Expr(Expr),
    /// `return [expr];`
    Return(Option<Expr>),
    /// `throw expr;`
    Throw(Expr),
    /// `if (test) cons [else alt]`
    If {
        /// Condition (without the surrounding parentheses)
        test: Expr,
        /// Consequent branch
        cons: Box<Stmt>,
        /// Alternate branch
        alt: Option<Box<Stmt>>,
    },
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// `try { } catch (param) { } finally { }`
    Try {
        /// Protected block
        block: Vec<Stmt>,
        /// Catch binding
        param: Option<Pattern>,
        /// Catch block
        handler: Option<Vec<Stmt>>,
        /// Finally block
        finalizer: Option<Vec<Stmt>>,
    },
    /// `for (init; test; update) body`
    For {
        /// Initializer
        init: Option<ForInit>,
        /// Condition
        test: Option<Expr>,
        /// Update expression
        update: Option<Expr>,
        /// Loop body
        body: Box<Stmt>,
    },
    /// `for (left in right) body` and `for (left of right) body`
    ForIn {
        /// Loop binding or assignment target
        left: ForHead,
        /// `of` rather than `in`
        of: bool,
        /// `for await (...)`
        is_await: bool,
        /// Iterated value
        right: Expr,
        /// Loop body
        body: Box<Stmt>,
    },
    /// `while (test) body`
    While {
        /// Condition (without the surrounding parentheses)
        test: Expr,
        /// Loop body
        body: Box<Stmt>,
    },
    /// `do body while (test);`
    DoWhile {
        /// Loop body
        body: Box<Stmt>,
        /// Condition (without the surrounding parentheses)
        test: Expr,
    },
    /// `switch (discriminant) { cases }`
    Switch {
        /// Switched value (without the surrounding parentheses)
        discriminant: Expr,
        /// `case` and `default` clauses in source order
        cases: Vec<SwitchCase>,
    },
    /// `label: body`
    Labeled {
        /// Label name
        label: String,
        /// Labeled statement
        body: Box<Stmt>,
    },
    /// `break [label];`
    Break(Option<String>),
    /// `continue [label];`
    Continue(Option<String>),
    /// `;`
    Empty,
    /// Line or block comment
    Comment(Verbatim),
    /// Comment that shares a line with the preceding statement
    TrailingComment(Verbatim),
    /// Unmodelled statement kept as source text
    Verbatim(Verbatim),
}

impl Stmt {
    /// Class declaration carried by this statement, if any
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassDecl> {
        match self {
            Stmt::Decl(Decl::Class(class))
            | Stmt::ExportDecl(Decl::Class(class))
            | Stmt::ExportDefault(DefaultDecl::Class(class)) => Some(class),
            _ => None,
        }
    }

    /// Mutable class declaration carried by this statement, if any
    pub fn as_class_mut(&mut self) -> Option<&mut ClassDecl> {
        match self {
            Stmt::Decl(Decl::Class(class))
            | Stmt::ExportDecl(Decl::Class(class))
            | Stmt::ExportDefault(DefaultDecl::Class(class)) => Some(class),
            _ => None,
        }
    }

    /// Function declaration carried by this statement, if any
    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match self {
            Stmt::Decl(Decl::Function(func))
            | Stmt::ExportDecl(Decl::Function(func))
            | Stmt::ExportDefault(DefaultDecl::Function(func)) => Some(func),
            _ => None,
        }
    }

    /// Node kind for diagnostics
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Import(_) => NodeKind::ImportDeclaration,
            Stmt::Decl(decl) | Stmt::ExportDecl(decl) => decl.kind(),
            Stmt::ExportDefault(_) => NodeKind::ExportDefault,
            Stmt::Expr(_) => NodeKind::ExpressionStatement,
            Stmt::Return(_) => NodeKind::Return,
            Stmt::Throw(_) => NodeKind::Throw,
            Stmt::If { .. } => NodeKind::If,
            Stmt::Block(_) => NodeKind::Block,
            Stmt::Try { .. } => NodeKind::Try,
            Stmt::For { .. } | Stmt::ForIn { .. } => NodeKind::For,
            Stmt::While { .. } | Stmt::DoWhile { .. } => NodeKind::While,
            Stmt::Switch { .. } => NodeKind::Switch,
            Stmt::Labeled { .. } => NodeKind::Labeled,
            Stmt::Break(_) | Stmt::Continue(_) => NodeKind::Jump,
            Stmt::Empty => NodeKind::Empty,
            Stmt::Comment(_) | Stmt::TrailingComment(_) => NodeKind::Comment,
            Stmt::Verbatim(_) => NodeKind::Verbatim,
        }
    }
}

/// First clause of a `for (;;)` loop
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `let i = 0`
    Var(VarDecl),
    /// `i = 0`
    Expr(Expr),
}

/// Left side of a `for...in` or `for...of` loop
#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    /// `const item`
    Var {
        /// Declaration keyword
        kind: VarKind,
        /// Bound pattern
        name: Pattern,
    },
    /// Existing binding or member assigned on each iteration
    Target(Pattern),
}

/// One `case` or `default` clause of a `switch`
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Case value, `None` for `default`
    pub test: Option<Expr>,
    /// Clause body
    pub body: Vec<Stmt>,
}

/// Declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `function name() {}`
    Function(FunctionDecl),
    /// `class Name {}`
    Class(ClassDecl),
    /// `const|let|var ...`
    Var(VarDecl),
}

impl Decl {
    /// Node kind for diagnostics
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Decl::Function(_) => NodeKind::FunctionDeclaration,
            Decl::Class(_) => NodeKind::ClassDeclaration,
            Decl::Var(_) => NodeKind::VariableDeclaration,
        }
    }
}

/// Target of `export default`
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDecl {
    /// Named or anonymous function
    Function(FunctionDecl),
    /// Named or anonymous class
    Class(ClassDecl),
    /// Any other expression
    Expr(Expr),
}

/// Import declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Bindings in source order
    pub specifiers: Vec<ImportSpecifier>,
    /// Module path (string contents, without quotes)
    pub source: String,
    /// `import type ...` (TypeScript)
    pub type_only: bool,
}

impl ImportDecl {
    /// Create import with the given specifiers
    #[inline]
    #[must_use]
    pub fn new(source: impl Into<String>, specifiers: Vec<ImportSpecifier>) -> Self {
        Self {
            specifiers,
            source: source.into(),
            type_only: false,
        }
    }

    /// Local names bound by this declaration
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.specifiers.iter().map(ImportSpecifier::local_name)
    }

    /// Check for a namespace (`* as ns`) specifier
    #[must_use]
    pub fn has_namespace(&self) -> bool {
        self.specifiers
            .iter()
            .any(|s| matches!(s, ImportSpecifier::Namespace(_)))
    }

    /// Named specifier importing `imported`, if any
    #[must_use]
    pub fn named(&self, imported: &str) -> Option<&ImportSpecifier> {
        self.specifiers
            .iter()
            .find(|s| s.imported_name() == Some(imported))
    }
}

/// One binding of an import declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportSpecifier {
    /// `import local from ...`
    Default(String),
    /// `import * as local from ...`
    Namespace(String),
    /// `import { imported as local } from ...`
    Named {
        /// Exported name in the source module
        imported: String,
        /// Local alias (`None` when identical to `imported`)
        local: Option<String>,
    },
}

impl ImportSpecifier {
    /// Named specifier without alias
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            imported: name.into(),
            local: None,
        }
    }

    /// Name bound in the importing module
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self {
            Self::Default(local) | Self::Namespace(local) => local,
            Self::Named { imported, local } => local.as_deref().unwrap_or(imported),
        }
    }

    /// Imported name for named specifiers
    #[must_use]
    pub fn imported_name(&self) -> Option<&str> {
        match self {
            Self::Named { imported, .. } => Some(imported),
            _ => None,
        }
    }
}

/// Function signature and body shared by declarations, expressions and methods
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Function {
    /// Parameters
    pub params: Vec<Param>,
    /// Body statements
    pub body: Vec<Stmt>,
    /// `async`
    pub is_async: bool,
    /// `function*`
    pub is_generator: bool,
    /// TypeScript type parameters, raw (`<T>`)
    pub type_params: Option<String>,
    /// TypeScript return type, raw including the colon (`: T`)
    pub return_type: Option<String>,
}

/// Function declaration (name is optional only under `export default`)
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Declared name
    pub name: Option<String>,
    /// Signature and body
    pub function: Function,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Binding pattern (defaults appear as [`Pattern::Assign`])
    pub pat: Pattern,
    /// TypeScript `?`
    pub optional: bool,
    /// TypeScript annotation, raw including the colon
    pub type_ann: Option<String>,
}

impl Param {
    /// Plain identifier parameter
    #[inline]
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self {
            pat: Pattern::Ident(name.into()),
            optional: false,
            type_ann: None,
        }
    }
}

/// Class declaration or expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDecl {
    /// Class name
    pub name: Option<String>,
    /// `extends` expression
    pub super_class: Option<Expr>,
    /// TypeScript type arguments of the superclass, raw (`<Props>`)
    pub super_type_args: Option<String>,
    /// TypeScript `implements` clause, raw
    pub implements: Option<String>,
    /// TypeScript type parameters, raw
    pub type_params: Option<String>,
    /// Decorators, raw
    pub decorators: Vec<String>,
    /// Members in source order
    pub body: Vec<ClassMember>,
}

impl ClassDecl {
    /// Non-static method by name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.body.iter().find_map(|m| match m {
            ClassMember::Method(method) if !method.is_static && method.key.is_named(name) => {
                Some(method)
            }
            _ => None,
        })
    }

    /// Mutable non-static method by name
    pub fn method_mut(&mut self, name: &str) -> Option<&mut Method> {
        self.body.iter_mut().find_map(|m| match m {
            ClassMember::Method(method) if !method.is_static && method.key.is_named(name) => {
                Some(method)
            }
            _ => None,
        })
    }

    /// Class property (field) by name, static or not
    pub fn property_mut(&mut self, name: &str) -> Option<&mut ClassProperty> {
        self.body.iter_mut().find_map(|m| match m {
            ClassMember::Property(prop) if prop.key.is_named(name) => Some(prop),
            _ => None,
        })
    }

    /// Check for a `render` method
    #[inline]
    #[must_use]
    pub fn has_render(&self) -> bool {
        self.method("render").is_some()
    }

    /// Constructor, if declared
    #[must_use]
    pub fn constructor(&self) -> Option<&Method> {
        self.body.iter().find_map(|m| match m {
            ClassMember::Method(method) if method.kind == MethodKind::Constructor => Some(method),
            _ => None,
        })
    }

    /// Mutable constructor, if declared
    pub fn constructor_mut(&mut self) -> Option<&mut Method> {
        self.body.iter_mut().find_map(|m| match m {
            ClassMember::Method(method) if method.kind == MethodKind::Constructor => Some(method),
            _ => None,
        })
    }

    /// Check whether the superclass is `<namespace>.<name>`
    #[must_use]
    pub fn extends_member(&self, namespace: &str, name: &str) -> bool {
        matches!(
            &self.super_class,
            Some(Expr::Member { obj, prop: MemberProp::Ident(prop), .. })
                if prop == name && matches!(obj.as_ref(), Expr::Ident(ns) if ns == namespace)
        )
    }
}

/// Class body member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Method, accessor or constructor
    Method(Method),
    /// Field (`static x = 1;`)
    Property(ClassProperty),
    /// Comment between members
    Comment(Verbatim),
    /// Unmodelled member
    Verbatim(Verbatim),
}

/// Method kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodKind {
    /// Plain method
    #[default]
    Method,
    /// `constructor`
    Constructor,
    /// `get x()`
    Getter,
    /// `set x(v)`
    Setter,
}

/// Method definition (class member or object literal method)
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Method kind
    pub kind: MethodKind,
    /// Method name
    pub key: PropKey,
    /// `static`
    pub is_static: bool,
    /// TypeScript modifiers, raw (`private`, `readonly`, ...)
    pub modifiers: Vec<String>,
    /// Signature and body
    pub function: Function,
}

impl Method {
    /// Plain method with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>, body: Vec<Stmt>) -> Self {
        Self {
            kind: MethodKind::Method,
            key: PropKey::Ident(name.into()),
            is_static: false,
            modifiers: Vec::new(),
            function: Function {
                body,
                ..Function::default()
            },
        }
    }
}

/// Class field
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    /// Field name
    pub key: PropKey,
    /// `static`
    pub is_static: bool,
    /// TypeScript modifiers, raw
    pub modifiers: Vec<String>,
    /// TypeScript annotation, raw including the colon
    pub type_ann: Option<String>,
    /// Initializer
    pub value: Option<Expr>,
}

/// `const`, `let` or `var`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `const`
    Const,
    /// `let`
    Let,
    /// `var`
    Var,
}

impl VarKind {
    /// Parse a declaration keyword
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "const" => Some(VarKind::Const),
            "let" => Some(VarKind::Let),
            "var" => Some(VarKind::Var),
            _ => None,
        }
    }

    /// Keyword text
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declaration keyword
    pub kind: VarKind,
    /// Declarators in source order
    pub decls: Vec<VarDeclarator>,
}

/// One `pattern = init` entry of a variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    /// Bound pattern
    pub name: Pattern,
    /// TypeScript annotation, raw including the colon
    pub type_ann: Option<String>,
    /// Initializer
    pub init: Option<Expr>,
}

/// Object or class property key
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// `name` (also private `#name`)
    Ident(String),
    /// `'name'`
    Str(Str),
    /// `1`
    Num(String),
    /// `[expr]`
    Computed(Box<Expr>),
}

impl PropKey {
    /// Check whether the key statically names `name`
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        match self {
            PropKey::Ident(ident) => ident == name,
            PropKey::Str(s) => s.value == name,
            _ => false,
        }
    }

    /// Static name of the key, if any
    #[must_use]
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropKey::Ident(ident) => Some(ident),
            PropKey::Str(s) => Some(&s.value),
            PropKey::Num(n) => Some(n),
            PropKey::Computed(_) => None,
        }
    }
}

/// String literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Str {
    /// Contents between the quotes, escapes as written
    pub value: String,
    /// Quote character used in the source
    pub quote: char,
}

impl Str {
    /// Single-quoted literal
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: '\'',
        }
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    /// String
    Str(Str),
    /// Number, raw
    Num(String),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// Regular expression, raw
    Regex(String),
}

/// Template literal
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Raw text chunks; always one more than `exprs`
    pub quasis: Vec<String>,
    /// Substitutions
    pub exprs: Vec<Expr>,
}

/// Member property
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `.name`
    Ident(String),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// Arrow function
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    /// Parameters
    pub params: Vec<Param>,
    /// Body
    pub body: ArrowBody,
    /// `async`
    pub is_async: bool,
    /// TypeScript return type, raw
    pub return_type: Option<String>,
}

/// Arrow function body
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `=> { ... }`
    Block(Vec<Stmt>),
    /// `=> expr`
    Expr(Box<Expr>),
}

/// Object literal member
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    /// `key: value`
    KeyValue {
        /// Key
        key: PropKey,
        /// Value
        value: Expr,
    },
    /// `{ name }`
    Shorthand(String),
    /// `...expr`
    Spread(Expr),
    /// `name() {}`
    Method(Method),
    /// Unmodelled member
    Verbatim(Verbatim),
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier reference
    Ident(String),
    /// `this`
    This,
    /// `super`
    Super,
    /// Literal
    Lit(Lit),
    /// Template literal
    Template(Template),
    /// `[a, , b]`
    Array(Vec<Option<Expr>>),
    /// `{ ... }`
    Object(Vec<Prop>),
    /// `obj.prop`, `obj[prop]`, `obj?.prop`
    Member {
        /// Object
        obj: Box<Expr>,
        /// Property
        prop: MemberProp,
        /// `?.`
        optional: bool,
    },
    /// `callee(args)`
    Call {
        /// Callee
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
        /// `?.()`
        optional: bool,
    },
    /// `new callee(args)`
    New {
        /// Constructor
        callee: Box<Expr>,
        /// Arguments (`None` for `new X`)
        args: Option<Vec<Expr>>,
    },
    /// Arrow function
    Arrow(Box<Arrow>),
    /// Function expression
    Function(Box<FunctionDecl>),
    /// Class expression
    Class(Box<ClassDecl>),
    /// `op arg`
    Unary {
        /// Operator
        op: String,
        /// Operand
        arg: Box<Expr>,
    },
    /// `++x` / `x--`
    Update {
        /// Operator
        op: String,
        /// Prefix form
        prefix: bool,
        /// Operand
        arg: Box<Expr>,
    },
    /// Binary and logical operators
    Binary {
        /// Operator
        op: String,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// `left op= right`
    Assign {
        /// Operator (`=`, `+=`, ...)
        op: String,
        /// Target
        left: Box<Pattern>,
        /// Value
        right: Box<Expr>,
    },
    /// `test ? cons : alt`
    Cond {
        /// Condition
        test: Box<Expr>,
        /// Consequent
        cons: Box<Expr>,
        /// Alternate
        alt: Box<Expr>,
    },
    /// `a, b`
    Seq(Vec<Expr>),
    /// `(expr)`
    Paren(Box<Expr>),
    /// `await expr`
    Await(Box<Expr>),
    /// `yield [*] expr`
    Yield {
        /// Operand
        arg: Option<Box<Expr>>,
        /// `yield*`
        delegate: bool,
    },
    /// `...expr`
    Spread(Box<Expr>),
    /// JSX element
    Jsx(Box<JsxElement>),
    /// JSX fragment `<>...</>`
    JsxFragment(Vec<JsxChild>),
    /// Unmodelled expression
    Verbatim(Verbatim),
}

impl Expr {
    /// Node kind for diagnostics
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Ident(_) => NodeKind::Identifier,
            Expr::This => NodeKind::This,
            Expr::Super => NodeKind::Super,
            Expr::Lit(_) | Expr::Template(_) => NodeKind::Literal,
            Expr::Array(_) => NodeKind::Array,
            Expr::Object(_) => NodeKind::Object,
            Expr::Member { .. } => NodeKind::Member,
            Expr::Call { .. } => NodeKind::Call,
            Expr::New { .. } => NodeKind::New,
            Expr::Arrow(_) => NodeKind::Arrow,
            Expr::Function(_) => NodeKind::FunctionExpression,
            Expr::Class(_) => NodeKind::ClassExpression,
            Expr::Unary { .. } | Expr::Update { .. } | Expr::Await(_) | Expr::Yield { .. } => {
                NodeKind::Unary
            }
            Expr::Binary { .. } => NodeKind::Binary,
            Expr::Assign { .. } => NodeKind::Assign,
            Expr::Cond { .. } => NodeKind::Conditional,
            Expr::Seq(_) => NodeKind::Sequence,
            Expr::Paren(_) => NodeKind::Paren,
            Expr::Spread(_) => NodeKind::Spread,
            Expr::Jsx(_) => NodeKind::JsxElement,
            Expr::JsxFragment(_) => NodeKind::JsxFragment,
            Expr::Verbatim(_) => NodeKind::Verbatim,
        }
    }

    /// Strip any number of wrapping parentheses
    #[must_use]
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren(inner) = expr {
            expr = inner;
        }
        expr
    }

    /// Identifier name, if this is a bare identifier
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Destructuring or assignment target
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `name`
    Ident(String),
    /// `[a, , b]`
    Array(Vec<Option<Pattern>>),
    /// `{ a, b: c }`
    Object(Vec<ObjectPatProp>),
    /// `pattern = default`
    Assign {
        /// Target
        left: Box<Pattern>,
        /// Default value
        right: Box<Expr>,
    },
    /// `...pattern`
    Rest(Box<Pattern>),
    /// Member expression target (`this.x = ...`)
    Expr(Box<Expr>),
    /// Unmodelled target
    Verbatim(Verbatim),
}

impl Pattern {
    /// Collect every identifier bound by this pattern
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Ident(name) => out.push(name),
            Pattern::Array(elems) => {
                for elem in elems.iter().flatten() {
                    elem.bound_names(out);
                }
            }
            Pattern::Object(props) => {
                for prop in props {
                    match prop {
                        ObjectPatProp::KeyValue { value, .. } => value.bound_names(out),
                        ObjectPatProp::Shorthand { name, .. } => out.push(name),
                        ObjectPatProp::Rest(rest) => rest.bound_names(out),
                        ObjectPatProp::Verbatim(_) => {}
                    }
                }
            }
            Pattern::Assign { left, .. } => left.bound_names(out),
            Pattern::Rest(inner) => inner.bound_names(out),
            Pattern::Expr(_) | Pattern::Verbatim(_) => {}
        }
    }
}

/// Object destructuring member
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatProp {
    /// `key: pattern`
    KeyValue {
        /// Key
        key: PropKey,
        /// Bound pattern
        value: Pattern,
    },
    /// `name` or `name = default`
    Shorthand {
        /// Bound name
        name: String,
        /// Default value
        default: Option<Expr>,
    },
    /// `...rest`
    Rest(Pattern),
    /// Unmodelled member
    Verbatim(Verbatim),
}

/// JSX element
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    /// Tag name (`div`, `Button`, `Foo.Bar`, `svg:rect`)
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<JsxAttr>,
    /// Children in source order
    pub children: Vec<JsxChild>,
    /// Written as `<Name />`
    pub self_closing: bool,
}

impl JsxElement {
    /// Identifier the tag name resolves through (`Foo` for `Foo.Bar`)
    #[must_use]
    pub fn root_name(&self) -> &str {
        self.name.split(['.', ':']).next().unwrap_or(&self.name)
    }

    /// Check whether the tag names a component rather than an intrinsic element
    #[must_use]
    pub fn is_component(&self) -> bool {
        self.name.contains('.')
            || self
                .name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase())
    }
}

/// JSX attribute
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttr {
    /// `name` or `name=value`
    Named {
        /// Attribute name
        name: String,
        /// Value
        value: Option<JsxAttrValue>,
    },
    /// `{...expr}`
    Spread(Expr),
}

/// JSX attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttrValue {
    /// String literal, raw including quotes
    Str(String),
    /// `{expr}`
    Expr(Expr),
    /// Element value
    Element(Box<JsxElement>),
    /// Fragment value
    Fragment(Vec<JsxChild>),
}

/// JSX child
#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    /// Text, raw
    Text(String),
    /// `{expr}` or `{}`
    Expr(Option<Expr>),
    /// `{...expr}`
    Spread(Expr),
    /// Nested element
    Element(JsxElement),
    /// Nested fragment
    Fragment(Vec<JsxChild>),
    /// Container holding only comments, raw
    Raw(String),
}

/// Coarse node classification used in diagnostics and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NodeKind {
    ImportDeclaration,
    FunctionDeclaration,
    ClassDeclaration,
    VariableDeclaration,
    ExportDefault,
    ExpressionStatement,
    Return,
    Throw,
    If,
    Block,
    Try,
    For,
    While,
    Switch,
    Labeled,
    Jump,
    Empty,
    Comment,
    Identifier,
    This,
    Super,
    Literal,
    Array,
    Object,
    Member,
    Call,
    New,
    Arrow,
    FunctionExpression,
    ClassExpression,
    Unary,
    Binary,
    Assign,
    Conditional,
    Sequence,
    Paren,
    Spread,
    JsxElement,
    JsxFragment,
    Verbatim,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specifier_local_names() {
        assert_eq!(ImportSpecifier::Default("React".into()).local_name(), "React");
        assert_eq!(ImportSpecifier::named("Component").local_name(), "Component");
        let aliased = ImportSpecifier::Named {
            imported: "Component".into(),
            local: Some("Base".into()),
        };
        assert_eq!(aliased.local_name(), "Base");
        assert_eq!(aliased.imported_name(), Some("Component"));
    }

    #[test]
    fn removed_statement_releases_its_trailing_comment() {
        let comment = |text: &str| Verbatim::new(text, 0);
        let mut stmts = vec![
            Stmt::Empty,
            Stmt::Break(None),
            Stmt::TrailingComment(comment("// gone")),
            Stmt::Continue(None),
            Stmt::TrailingComment(comment("// kept")),
        ];
        retain_stmts(&mut stmts, |s| !matches!(s, Stmt::Break(_)));
        assert_eq!(
            stmts,
            vec![
                Stmt::Empty,
                Stmt::Comment(comment("// gone")),
                Stmt::Continue(None),
                Stmt::TrailingComment(comment("// kept")),
            ]
        );
    }

    #[test]
    fn bound_names_walks_nested_patterns() {
        let pat = Pattern::Array(vec![
            Some(Pattern::Ident("a".into())),
            None,
            Some(Pattern::Object(vec![
                ObjectPatProp::Shorthand {
                    name: "b".into(),
                    default: None,
                },
                ObjectPatProp::Rest(Pattern::Ident("rest".into())),
            ])),
        ]);
        let mut names = Vec::new();
        pat.bound_names(&mut names);
        assert_eq!(names, vec!["a", "b", "rest"]);
    }

    #[test]
    fn jsx_component_detection() {
        let el = |name: &str| JsxElement {
            name: name.into(),
            attrs: vec![],
            children: vec![],
            self_closing: true,
        };
        assert!(el("Button").is_component());
        assert!(el("ui.Button").is_component());
        assert!(!el("div").is_component());
        assert_eq!(el("Foo.Bar").root_name(), "Foo");
    }

    #[test]
    fn extends_member_matches_namespace_component() {
        let class = ClassDecl {
            name: Some("App".into()),
            super_class: Some(Expr::Member {
                obj: Box::new(Expr::Ident("React".into())),
                prop: MemberProp::Ident("Component".into()),
                optional: false,
            }),
            ..ClassDecl::default()
        };
        assert!(class.extends_member("React", "Component"));
        assert!(!class.extends_member("Preact", "Component"));
    }
}
