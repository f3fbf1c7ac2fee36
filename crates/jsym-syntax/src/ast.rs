//! Node payloads of the syntax tree.

use jsym_core::TextRange;

use crate::lexer::DocComment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub parent: Option<NodeId>,
    pub range: TextRange,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    CompilationUnit(CompilationUnit),
    Type(TypeDecl),
    Field(FieldDecl),
    /// Methods and constructors.
    Method(MethodDecl),
    Parameter(ParameterDecl),
    EnumConstant(EnumConstantDecl),
    AnnotationMember(AnnotationMemberDecl),
    Initializer(Initializer),
    Block(Block),
    LocalVar(LocalVarDecl),
    CatchClause(CatchClause),
    Stmt(Stmt),
    Expr(Expr),
}

#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted name without the trailing `.*`.
    pub name: String,
    pub is_static: bool,
    pub is_on_demand: bool,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub members: Vec<NodeId>,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    Sealed,
}

impl Modifier {
    pub(crate) fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "public" => Modifier::Public,
            "protected" => Modifier::Protected,
            "private" => Modifier::Private,
            "static" => Modifier::Static,
            "abstract" => Modifier::Abstract,
            "final" => Modifier::Final,
            "native" => Modifier::Native,
            "synchronized" => Modifier::Synchronized,
            "transient" => Modifier::Transient,
            "volatile" => Modifier::Volatile,
            "strictfp" => Modifier::Strictfp,
            "default" => Modifier::Default,
            "sealed" => Modifier::Sealed,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Modifiers {
    pub keywords: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
}

impl Modifiers {
    #[must_use]
    pub fn has(&self, modifier: Modifier) -> bool {
        self.keywords.contains(&modifier)
    }
}

#[derive(Debug, Clone)]
pub struct Annotation {
    /// Name as written, possibly qualified.
    pub name: String,
    pub args: AnnotationArgs,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub enum AnnotationArgs {
    /// `@Foo`
    Marker,
    /// `@Foo(expr)`
    SingleMember(NodeId),
    /// `@Foo(a = x, b = y)`, also `@Foo()`.
    Normal(Vec<(String, NodeId)>),
}

#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub(crate) fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "boolean" => PrimitiveKind::Boolean,
            "byte" => PrimitiveKind::Byte,
            "char" => PrimitiveKind::Char,
            "short" => PrimitiveKind::Short,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Primitive(PrimitiveKind),
    /// `a.b.Outer<X>.Inner<Y>`, one segment per dotted name.
    Class(Vec<ClassSegment>),
    Wildcard(Option<(WildcardBound, Box<TypeRef>)>),
    Array(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSegment {
    pub name: String,
    pub args: Vec<TypeRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardBound {
    Extends,
    Super,
}

impl TypeRef {
    /// Dotted name of a class type without type arguments.
    #[must_use]
    pub fn class_name(&self) -> Option<String> {
        match &self.kind {
            TypeRefKind::Class(segments) => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }

    /// Type arguments of the last segment of a class type.
    #[must_use]
    pub fn type_args(&self) -> &[TypeRef] {
        match &self.kind {
            TypeRefKind::Class(segments) => segments
                .last()
                .map(|s| s.args.as_slice())
                .unwrap_or_default(),
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: String,
    pub init: Option<NodeId>,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    /// `None` for `void` methods and constructors.
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub name_range: TextRange,
    pub params: Vec<NodeId>,
    pub throws: Vec<TypeRef>,
    pub body: Option<NodeId>,
    pub is_constructor: bool,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub modifiers: Modifiers,
    /// Declared type; for a varargs parameter this is the element type.
    pub ty: TypeRef,
    pub name: String,
    pub is_varargs: bool,
}

#[derive(Debug, Clone)]
pub struct EnumConstantDecl {
    pub modifiers: Modifiers,
    pub name: String,
    pub args: Vec<NodeId>,
    pub has_body: bool,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone)]
pub struct AnnotationMemberDecl {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: String,
    pub default: Option<NodeId>,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone)]
pub struct Initializer {
    pub is_static: bool,
    pub body: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct LocalVarDecl {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: String,
    pub init: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    /// A [`NodeKind::Parameter`] node; multi-catch keeps the first type.
    pub param: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(NodeId),
    /// A local class or interface declaration.
    LocalType(NodeId),
    If {
        cond: NodeId,
        then: NodeId,
        otherwise: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        cond: NodeId,
    },
    For {
        init: Vec<NodeId>,
        cond: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEach {
        var: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    Try {
        resources: Vec<NodeId>,
        body: NodeId,
        catches: Vec<NodeId>,
        finally: Option<NodeId>,
    },
    Return(Option<NodeId>),
    Throw(NodeId),
    Synchronized {
        lock: NodeId,
        body: NodeId,
    },
    Empty,
    /// A statement kept only as its source range (`switch`, `break`, `assert`, ...).
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    TextBlock(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    /// A simple identifier.
    Name(String),
    FieldAccess {
        target: NodeId,
        name: String,
    },
    MethodCall {
        target: Option<NodeId>,
        name: String,
        args: Vec<NodeId>,
    },
    New {
        ty: TypeRef,
        args: Vec<NodeId>,
        has_body: bool,
    },
    NewArray {
        element: TypeRef,
        dims: usize,
        init: Option<NodeId>,
    },
    This,
    Super,
    ClassLiteral(TypeRef),
    ArrayInit(Vec<NodeId>),
    Annotation(Annotation),
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Assign {
        target: NodeId,
        value: NodeId,
    },
    Conditional {
        cond: NodeId,
        then: NodeId,
        otherwise: NodeId,
    },
    Cast {
        ty: TypeRef,
        expr: NodeId,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    InstanceOf {
        expr: NodeId,
        ty: TypeRef,
    },
    /// Lambdas, method references and switch expressions, kept as a range.
    Unsupported,
}

impl NodeKind {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let annotation_values = |modifiers: &Modifiers, out: &mut Vec<NodeId>| {
            for annotation in &modifiers.annotations {
                annotation.args.push_values(out);
            }
        };
        match self {
            NodeKind::CompilationUnit(cu) => out.extend(&cu.types),
            NodeKind::Type(ty) => {
                annotation_values(&ty.modifiers, &mut out);
                out.extend(&ty.members);
            }
            NodeKind::Field(field) => {
                annotation_values(&field.modifiers, &mut out);
                out.extend(field.init);
            }
            NodeKind::Method(method) => {
                annotation_values(&method.modifiers, &mut out);
                out.extend(&method.params);
                out.extend(method.body);
            }
            NodeKind::Parameter(param) => annotation_values(&param.modifiers, &mut out),
            NodeKind::EnumConstant(constant) => {
                annotation_values(&constant.modifiers, &mut out);
                out.extend(&constant.args);
            }
            NodeKind::AnnotationMember(member) => {
                annotation_values(&member.modifiers, &mut out);
                out.extend(member.default);
            }
            NodeKind::Initializer(init) => out.push(init.body),
            NodeKind::Block(block) => out.extend(&block.stmts),
            NodeKind::LocalVar(local) => {
                annotation_values(&local.modifiers, &mut out);
                out.extend(local.init);
            }
            NodeKind::CatchClause(clause) => out.extend([clause.param, clause.body]),
            NodeKind::Stmt(stmt) => stmt.push_children(&mut out),
            NodeKind::Expr(expr) => expr.push_children(&mut out),
        }
        out
    }
}

impl AnnotationArgs {
    fn push_values(&self, out: &mut Vec<NodeId>) {
        match self {
            AnnotationArgs::Marker => {}
            AnnotationArgs::SingleMember(value) => out.push(*value),
            AnnotationArgs::Normal(pairs) => out.extend(pairs.iter().map(|(_, v)| *v)),
        }
    }
}

impl Stmt {
    fn push_children(&self, out: &mut Vec<NodeId>) {
        match self {
            Stmt::Expr(id) | Stmt::LocalType(id) | Stmt::Throw(id) => out.push(*id),
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                out.extend([*cond, *then]);
                out.extend(*otherwise);
            }
            Stmt::While { cond, body } => out.extend([*cond, *body]),
            Stmt::DoWhile { body, cond } => out.extend([*body, *cond]),
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(*cond);
                out.extend(update);
                out.push(*body);
            }
            Stmt::ForEach {
                var,
                iterable,
                body,
            } => out.extend([*var, *iterable, *body]),
            Stmt::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                out.extend(resources);
                out.push(*body);
                out.extend(catches);
                out.extend(*finally);
            }
            Stmt::Return(value) => out.extend(*value),
            Stmt::Synchronized { lock, body } => out.extend([*lock, *body]),
            Stmt::Empty | Stmt::Other => {}
        }
    }
}

impl Expr {
    fn push_children(&self, out: &mut Vec<NodeId>) {
        match self {
            Expr::Literal(_)
            | Expr::Name(_)
            | Expr::This
            | Expr::Super
            | Expr::ClassLiteral(_)
            | Expr::Unsupported => {}
            Expr::FieldAccess { target, .. } => out.push(*target),
            Expr::MethodCall { target, args, .. } => {
                out.extend(*target);
                out.extend(args);
            }
            Expr::New { args, .. } => out.extend(args),
            Expr::NewArray { init, .. } => out.extend(*init),
            Expr::ArrayInit(values) => out.extend(values),
            Expr::Annotation(annotation) => annotation.args.push_values(out),
            Expr::Unary { operand, .. } => out.push(*operand),
            Expr::Binary { lhs, rhs, .. } => out.extend([*lhs, *rhs]),
            Expr::Assign { target, value } => out.extend([*target, *value]),
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => out.extend([*cond, *then, *otherwise]),
            Expr::Cast { expr, .. } | Expr::InstanceOf { expr, .. } => out.push(*expr),
            Expr::ArrayAccess { array, index } => out.extend([*array, *index]),
        }
    }
}
