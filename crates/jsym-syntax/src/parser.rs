//! Recursive-descent parser producing a [`SyntaxTree`].

use std::path::PathBuf;
use std::sync::Arc;

use jsym_core::{LineIndex, TextRange, TextSize};

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{lex, DocComment, Token, TokenKind};
use crate::tree::SyntaxTree;

const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

const ASSIGN_OPS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<="];

type PResult<T> = Result<T, ParseError>;

/// Parse `text` into a tree. `path` becomes the tree's storage backlink.
pub fn parse(text: &str, path: Option<PathBuf>) -> PResult<SyntaxTree> {
    let text: Arc<str> = Arc::from(text);
    let lexed = lex(&text).map_err(|err| syntax_error(&text, err.offset, err.message))?;
    let mut parser = Parser {
        text: &*text,
        tokens: lexed.tokens,
        docs: lexed.docs,
        pos: 0,
        nodes: Vec::new(),
    };
    let root = parser.compilation_unit()?;
    let Parser { nodes, .. } = parser;
    Ok(SyntaxTree::new(text, path, nodes, root))
}

fn syntax_error(text: &str, offset: usize, message: impl Into<String>) -> ParseError {
    let offset = offset.min(text.len()) as u32;
    ParseError::Syntax {
        message: message.into(),
        offset,
        position: LineIndex::new(text).line_col(TextSize::from(offset)),
    }
}

struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    docs: Vec<DocComment>,
    pos: usize,
    nodes: Vec<NodeData>,
}

impl<'t> Parser<'t> {
    // ---- token cursor -------------------------------------------------

    fn nth(&self, n: usize) -> Token {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn cur(&self) -> Token {
        self.nth(0)
    }

    fn text_of(&self, token: Token) -> &'t str {
        &self.text[token.range]
    }

    fn nth_is(&self, n: usize, s: &str) -> bool {
        let token = self.nth(n);
        matches!(token.kind, TokenKind::Punct | TokenKind::Ident) && self.text_of(token) == s
    }

    fn at(&self, s: &str) -> bool {
        self.nth_is(0, s)
    }

    fn at_eof(&self) -> bool {
        self.cur().kind == TokenKind::Eof
    }

    fn nth_is_ident(&self, n: usize) -> bool {
        let token = self.nth(n);
        token.kind == TokenKind::Ident && !RESERVED.contains(&self.text_of(token))
    }

    fn at_ident(&self) -> bool {
        self.nth_is_ident(0)
    }

    /// Whether tokens `n` and `n + 1` touch (no whitespace between).
    fn adjacent(&self, n: usize) -> bool {
        self.nth(n).range.end() == self.nth(n + 1).range.start()
    }

    fn bump(&mut self) -> Token {
        let token = self.cur();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.at(s) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, s: &str) -> PResult<Token> {
        if self.at(s) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected `{s}`")))
        }
    }

    fn ident(&mut self) -> PResult<String> {
        if self.at_ident() {
            let token = self.bump();
            Ok(self.text_of(token).to_string())
        } else {
            Err(self.error("expected identifier"))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.cur();
        let found = match token.kind {
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("`{}`", self.text_of(token)),
        };
        syntax_error(
            self.text,
            usize::from(token.range.start()),
            format!("{}, found {found}", message.into()),
        )
    }

    fn start(&self) -> TextSize {
        self.cur().range.start()
    }

    fn range_from(&self, start: TextSize) -> TextRange {
        let end = match self.pos {
            0 => start,
            pos => self.tokens[pos - 1].range.end(),
        };
        TextRange::new(start, end.max(start))
    }

    fn take_doc(&mut self) -> Option<DocComment> {
        let index = self.tokens[self.pos].doc.take()?;
        self.docs.get(index).cloned()
    }

    fn alloc(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(NodeData {
            parent: None,
            range,
            kind,
        });
        id
    }

    fn alloc_expr(&mut self, expr: Expr, start: TextSize) -> NodeId {
        let range = self.range_from(start);
        self.alloc(NodeKind::Expr(expr), range)
    }

    /// Run `f`; on failure rewind the cursor and drop any nodes it created.
    fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<Option<T>>) -> Option<T> {
        let pos = self.pos;
        let nodes = self.nodes.len();
        match f(self) {
            Ok(Some(value)) => Some(value),
            _ => {
                self.pos = pos;
                self.nodes.truncate(nodes);
                None
            }
        }
    }

    /// Skip a balanced `open ... close` group starting at the current token.
    fn skip_balanced(&mut self, open: &str, close: &str) -> PResult<()> {
        self.expect(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            if self.at_eof() {
                return Err(self.error(format!("expected `{close}`")));
            }
            if self.at(open) {
                depth += 1;
            } else if self.at(close) {
                depth -= 1;
            }
            self.bump();
        }
        Ok(())
    }

    // ---- declarations -------------------------------------------------

    fn compilation_unit(&mut self) -> PResult<NodeId> {
        let mut cu = CompilationUnit::default();

        if self.at("package") {
            self.bump();
            cu.package = Some(self.qualified_name()?);
            self.expect(";")?;
        }

        while self.at("import") {
            let start = self.start();
            self.bump();
            let is_static = self.eat("static");
            let mut name = self.ident()?;
            let mut is_on_demand = false;
            while self.eat(".") {
                if self.eat("*") {
                    is_on_demand = true;
                    break;
                }
                name.push('.');
                name.push_str(&self.ident()?);
            }
            self.expect(";")?;
            cu.imports.push(Import {
                name,
                is_static,
                is_on_demand,
                range: self.range_from(start),
            });
        }

        while !self.at_eof() {
            if self.eat(";") {
                continue;
            }
            let doc = self.take_doc();
            let start = self.start();
            let modifiers = self.modifiers()?;
            cu.types.push(self.type_decl(doc, modifiers, start)?);
        }

        let range = TextRange::up_to(TextSize::of(self.text));
        Ok(self.alloc(NodeKind::CompilationUnit(cu), range))
    }

    fn qualified_name(&mut self) -> PResult<String> {
        let mut name = self.ident()?;
        while self.at(".") && self.nth_is_ident(1) {
            self.bump();
            name.push('.');
            name.push_str(&self.ident()?);
        }
        Ok(name)
    }

    fn modifiers(&mut self) -> PResult<Modifiers> {
        let mut modifiers = Modifiers::default();
        loop {
            if self.at("@") && !self.nth_is(1, "interface") {
                modifiers.annotations.push(self.annotation()?);
                continue;
            }
            let token = self.cur();
            if token.kind != TokenKind::Ident {
                break;
            }
            let Some(modifier) = Modifier::from_keyword(self.text_of(token)) else {
                break;
            };
            // `sealed` is contextual; `default` only modifies when a declaration follows.
            if matches!(modifier, Modifier::Sealed | Modifier::Default)
                && !(self.nth(1).kind == TokenKind::Ident || self.nth_is(1, "<"))
            {
                break;
            }
            modifiers.keywords.push(modifier);
            self.bump();
        }
        Ok(modifiers)
    }

    fn at_type_decl_keyword(&self) -> bool {
        self.at("class")
            || self.at("interface")
            || self.at("enum")
            || (self.at("@") && self.nth_is(1, "interface"))
    }

    fn type_decl(
        &mut self,
        doc: Option<DocComment>,
        modifiers: Modifiers,
        start: TextSize,
    ) -> PResult<NodeId> {
        let kind = if self.eat("class") {
            TypeDeclKind::Class
        } else if self.eat("interface") {
            TypeDeclKind::Interface
        } else if self.eat("enum") {
            TypeDeclKind::Enum
        } else if self.at("@") && self.nth_is(1, "interface") {
            self.bump_n(2);
            TypeDeclKind::Annotation
        } else {
            return Err(self.error("expected type declaration"));
        };

        let name = self.ident()?;
        let type_params = if self.at("<") {
            self.type_params()?
        } else {
            Vec::new()
        };
        let extends = if self.eat("extends") {
            self.type_list()?
        } else {
            Vec::new()
        };
        let implements = if self.eat("implements") {
            self.type_list()?
        } else {
            Vec::new()
        };
        if self.at("permits") {
            self.bump();
            self.type_list()?;
        }

        self.expect("{")?;
        let members = self.type_body(kind, &name)?;
        self.expect("}")?;

        let decl = TypeDecl {
            kind,
            name,
            modifiers,
            type_params,
            extends,
            implements,
            members,
            doc,
        };
        let range = self.range_from(start);
        Ok(self.alloc(NodeKind::Type(decl), range))
    }

    fn type_list(&mut self) -> PResult<Vec<TypeRef>> {
        let mut types = vec![self.type_ref()?];
        while self.eat(",") {
            types.push(self.type_ref()?);
        }
        Ok(types)
    }

    fn type_body(&mut self, kind: TypeDeclKind, type_name: &str) -> PResult<Vec<NodeId>> {
        let mut members = Vec::new();
        if kind == TypeDeclKind::Enum {
            members.extend(self.enum_constants()?);
        }
        while !self.at("}") && !self.at_eof() {
            if self.eat(";") {
                continue;
            }
            members.extend(self.member(kind, type_name)?);
        }
        Ok(members)
    }

    fn enum_constants(&mut self) -> PResult<Vec<NodeId>> {
        let mut constants = Vec::new();
        loop {
            if self.eat(";") || self.at("}") {
                break;
            }
            let doc = self.take_doc();
            let start = self.start();
            let modifiers = self.modifiers()?;
            let name = self.ident()?;
            let args = if self.at("(") {
                self.arguments()?
            } else {
                Vec::new()
            };
            let has_body = self.at("{");
            if has_body {
                self.skip_balanced("{", "}")?;
            }
            let constant = EnumConstantDecl {
                modifiers,
                name,
                args,
                has_body,
                doc,
            };
            let range = self.range_from(start);
            constants.push(self.alloc(NodeKind::EnumConstant(constant), range));
            if !self.eat(",") {
                self.eat(";");
                break;
            }
        }
        Ok(constants)
    }

    fn member(&mut self, owner: TypeDeclKind, type_name: &str) -> PResult<Vec<NodeId>> {
        let doc = self.take_doc();
        let start = self.start();

        if self.at("{") || (self.at("static") && self.nth_is(1, "{")) {
            let is_static = self.eat("static");
            let body = self.block()?;
            let range = self.range_from(start);
            return Ok(vec![self.alloc(
                NodeKind::Initializer(Initializer { is_static, body }),
                range,
            )]);
        }

        let modifiers = self.modifiers()?;
        if self.at_type_decl_keyword() {
            return Ok(vec![self.type_decl(doc, modifiers, start)?]);
        }

        let type_params = if self.at("<") {
            self.type_params()?
        } else {
            Vec::new()
        };

        if self.at_ident() && self.text_of(self.cur()) == type_name && self.nth_is(1, "(") {
            let name_range = self.cur().range;
            let name = self.ident()?;
            let method = self.method_rest(MethodDecl {
                modifiers,
                type_params,
                return_type: None,
                name,
                name_range,
                params: Vec::new(),
                throws: Vec::new(),
                body: None,
                is_constructor: true,
                doc,
            })?;
            let range = self.range_from(start);
            return Ok(vec![self.alloc(NodeKind::Method(method), range)]);
        }

        let return_type = if self.eat("void") {
            None
        } else {
            Some(self.type_ref()?)
        };
        let name_range = self.cur().range;
        let name = self.ident()?;

        if self.at("(") && owner == TypeDeclKind::Annotation {
            self.bump();
            self.expect(")")?;
            let ty = return_type.ok_or_else(|| self.error("annotation member needs a type"))?;
            let default = if self.eat("default") {
                Some(self.element_value()?)
            } else {
                None
            };
            self.expect(";")?;
            let member = AnnotationMemberDecl {
                modifiers,
                ty,
                name,
                default,
                doc,
            };
            let range = self.range_from(start);
            return Ok(vec![self.alloc(NodeKind::AnnotationMember(member), range)]);
        }

        if self.at("(") {
            let method = self.method_rest(MethodDecl {
                modifiers,
                type_params,
                return_type,
                name,
                name_range,
                params: Vec::new(),
                throws: Vec::new(),
                body: None,
                is_constructor: false,
                doc,
            })?;
            let range = self.range_from(start);
            return Ok(vec![self.alloc(NodeKind::Method(method), range)]);
        }

        let ty = return_type.ok_or_else(|| self.error("field cannot be void"))?;
        let mut fields = Vec::new();
        let mut name = name;
        loop {
            let ty = self.array_dims(ty.clone())?;
            let init = if self.eat("=") {
                Some(self.variable_init()?)
            } else {
                None
            };
            let field = FieldDecl {
                modifiers: modifiers.clone(),
                ty,
                name,
                init,
                doc: doc.clone(),
            };
            let range = self.range_from(start);
            fields.push(self.alloc(NodeKind::Field(field), range));
            if !self.eat(",") {
                break;
            }
            name = self.ident()?;
        }
        self.expect(";")?;
        Ok(fields)
    }

    fn method_rest(&mut self, mut method: MethodDecl) -> PResult<MethodDecl> {
        method.params = self.params()?;
        if let Some(ty) = method.return_type.take() {
            method.return_type = Some(self.array_dims(ty)?);
        }
        if self.eat("throws") {
            method.throws = self.type_list()?;
        }
        if self.at("{") {
            method.body = Some(self.block()?);
        } else {
            self.expect(";")?;
        }
        Ok(method)
    }

    fn params(&mut self) -> PResult<Vec<NodeId>> {
        self.expect("(")?;
        let mut params = Vec::new();
        if self.eat(")") {
            return Ok(params);
        }
        loop {
            let start = self.start();
            let modifiers = self.modifiers()?;
            let ty = self.type_ref()?;
            let is_varargs = self.eat("...");
            // receiver parameter: `Outer this`
            if self.eat("this") {
                if !self.eat(",") {
                    break;
                }
                continue;
            }
            let name = self.ident()?;
            let ty = self.array_dims(ty)?;
            let param = ParameterDecl {
                modifiers,
                ty,
                name,
                is_varargs,
            };
            let range = self.range_from(start);
            params.push(self.alloc(NodeKind::Parameter(param), range));
            if !self.eat(",") {
                break;
            }
        }
        self.expect(")")?;
        Ok(params)
    }

    fn variable_init(&mut self) -> PResult<NodeId> {
        if self.at("{") {
            self.array_init()
        } else {
            self.expression()
        }
    }

    // ---- types ----------------------------------------------------------

    fn type_params(&mut self) -> PResult<Vec<TypeParam>> {
        self.expect("<")?;
        let mut params = Vec::new();
        loop {
            let start = self.start();
            while self.at("@") {
                self.annotation()?;
            }
            let name = self.ident()?;
            let mut bounds = Vec::new();
            if self.eat("extends") {
                bounds.push(self.type_ref()?);
                while self.eat("&") {
                    bounds.push(self.type_ref()?);
                }
            }
            params.push(TypeParam {
                name,
                bounds,
                range: self.range_from(start),
            });
            if !self.eat(",") {
                break;
            }
        }
        self.expect(">")?;
        Ok(params)
    }

    fn type_ref(&mut self) -> PResult<TypeRef> {
        let ty = self.non_array_type()?;
        self.array_dims(ty)
    }

    fn non_array_type(&mut self) -> PResult<TypeRef> {
        let start = self.start();
        let token = self.cur();
        if token.kind == TokenKind::Ident {
            if let Some(primitive) = PrimitiveKind::from_keyword(self.text_of(token)) {
                self.bump();
                return Ok(TypeRef {
                    kind: TypeRefKind::Primitive(primitive),
                    range: self.range_from(start),
                });
            }
        }

        let mut segments = Vec::new();
        loop {
            let name = self.ident()?;
            let args = if self.at("<") {
                self.type_args()?
            } else {
                Vec::new()
            };
            segments.push(ClassSegment { name, args });
            if self.at(".") && self.nth_is_ident(1) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(TypeRef {
            kind: TypeRefKind::Class(segments),
            range: self.range_from(start),
        })
    }

    fn array_dims(&mut self, mut ty: TypeRef) -> PResult<TypeRef> {
        while self.at("[") && self.nth_is(1, "]") {
            self.bump_n(2);
            let range = TextRange::new(ty.range.start(), self.range_from(ty.range.start()).end());
            ty = TypeRef {
                kind: TypeRefKind::Array(Box::new(ty)),
                range,
            };
        }
        Ok(ty)
    }

    fn type_args(&mut self) -> PResult<Vec<TypeRef>> {
        self.expect("<")?;
        let mut args = Vec::new();
        // diamond
        if self.eat(">") {
            return Ok(args);
        }
        loop {
            if self.at("?") {
                let start = self.start();
                self.bump();
                let bound = if self.eat("extends") {
                    Some((WildcardBound::Extends, Box::new(self.type_ref()?)))
                } else if self.eat("super") {
                    Some((WildcardBound::Super, Box::new(self.type_ref()?)))
                } else {
                    None
                };
                args.push(TypeRef {
                    kind: TypeRefKind::Wildcard(bound),
                    range: self.range_from(start),
                });
            } else {
                args.push(self.type_ref()?);
            }
            if !self.eat(",") {
                break;
            }
        }
        self.expect(">")?;
        Ok(args)
    }

    // ---- annotations ----------------------------------------------------

    fn annotation(&mut self) -> PResult<Annotation> {
        let start = self.start();
        self.expect("@")?;
        let name = self.qualified_name()?;
        let args = if self.eat("(") {
            if self.eat(")") {
                AnnotationArgs::Normal(Vec::new())
            } else if self.at_ident() && self.nth_is(1, "=") {
                let mut pairs = Vec::new();
                loop {
                    let key = self.ident()?;
                    self.expect("=")?;
                    pairs.push((key, self.element_value()?));
                    if !self.eat(",") {
                        break;
                    }
                }
                self.expect(")")?;
                AnnotationArgs::Normal(pairs)
            } else {
                let value = self.element_value()?;
                self.expect(")")?;
                AnnotationArgs::SingleMember(value)
            }
        } else {
            AnnotationArgs::Marker
        };
        Ok(Annotation {
            name,
            args,
            range: self.range_from(start),
        })
    }

    fn element_value(&mut self) -> PResult<NodeId> {
        if self.at("@") {
            let start = self.start();
            let annotation = self.annotation()?;
            Ok(self.alloc_expr(Expr::Annotation(annotation), start))
        } else if self.at("{") {
            self.array_init()
        } else {
            self.conditional()
        }
    }

    fn array_init(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.expect("{")?;
        let mut values = Vec::new();
        while !self.at("}") {
            values.push(if self.at("{") || self.at("@") {
                self.element_value()?
            } else {
                self.expression()?
            });
            if !self.eat(",") {
                break;
            }
        }
        self.expect("}")?;
        Ok(self.alloc_expr(Expr::ArrayInit(values), start))
    }

    // ---- statements -----------------------------------------------------

    fn block(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.expect("{")?;
        let mut stmts = Vec::new();
        while !self.at("}") {
            if self.at_eof() {
                return Err(self.error("expected `}`"));
            }
            stmts.extend(self.block_statement()?);
        }
        self.expect("}")?;
        let range = self.range_from(start);
        Ok(self.alloc(NodeKind::Block(Block { stmts }), range))
    }

    fn block_statement(&mut self) -> PResult<Vec<NodeId>> {
        let start = self.start();
        let local_type = self.at_type_decl_keyword()
            || ((self.at("abstract") || self.at("final") || self.at("static"))
                && (self.nth_is(1, "class") || self.nth_is(1, "interface")));
        if local_type {
            let doc = self.take_doc();
            let modifiers = self.modifiers()?;
            let ty = self.type_decl(doc, modifiers, start)?;
            let range = self.range_from(start);
            return Ok(vec![self.alloc(NodeKind::Stmt(Stmt::LocalType(ty)), range)]);
        }

        if let Some(locals) = self.speculate(|p| p.local_var_decl(true)) {
            return Ok(locals);
        }
        Ok(vec![self.statement()?])
    }

    /// `[modifiers] Type name [= init] {, name [= init]} [;]`, or `None` when
    /// the tokens do not start a local variable declaration.
    fn local_var_decl(&mut self, terminated: bool) -> PResult<Option<Vec<NodeId>>> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let ty = self.type_ref()?;
        if !(self.at_ident()
            && (self.nth_is(1, "=")
                || self.nth_is(1, ";")
                || self.nth_is(1, ",")
                || self.nth_is(1, "[")
                || (!terminated && (self.nth_is(1, ":") || self.nth_is(1, ")")))))
        {
            return Ok(None);
        }

        let mut locals = Vec::new();
        loop {
            let name = self.ident()?;
            let ty = self.array_dims(ty.clone())?;
            let init = if self.eat("=") {
                Some(self.variable_init()?)
            } else {
                None
            };
            let local = LocalVarDecl {
                modifiers: modifiers.clone(),
                ty,
                name,
                init,
            };
            let range = self.range_from(start);
            locals.push(self.alloc(NodeKind::LocalVar(local), range));
            if !self.eat(",") {
                break;
            }
        }
        if terminated {
            self.expect(";")?;
        }
        Ok(Some(locals))
    }

    fn statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        if self.at("{") {
            return self.block();
        }

        let keyword = if self.cur().kind == TokenKind::Ident {
            self.text_of(self.cur())
        } else {
            ""
        };
        let stmt = match keyword {
            "if" => {
                self.bump();
                let cond = self.paren_expression()?;
                let then = self.statement()?;
                let otherwise = if self.eat("else") {
                    Some(self.statement()?)
                } else {
                    None
                };
                Stmt::If {
                    cond,
                    then,
                    otherwise,
                }
            }
            "while" => {
                self.bump();
                let cond = self.paren_expression()?;
                let body = self.statement()?;
                Stmt::While { cond, body }
            }
            "do" => {
                self.bump();
                let body = self.statement()?;
                self.expect("while")?;
                let cond = self.paren_expression()?;
                self.expect(";")?;
                Stmt::DoWhile { body, cond }
            }
            "for" => self.for_statement()?,
            "try" => self.try_statement()?,
            "return" => {
                self.bump();
                let value = if self.at(";") {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect(";")?;
                Stmt::Return(value)
            }
            "throw" => {
                self.bump();
                let value = self.expression()?;
                self.expect(";")?;
                Stmt::Throw(value)
            }
            "synchronized" => {
                self.bump();
                let lock = self.paren_expression()?;
                let body = self.block()?;
                Stmt::Synchronized { lock, body }
            }
            "switch" => {
                self.bump();
                self.skip_balanced("(", ")")?;
                self.skip_balanced("{", "}")?;
                Stmt::Other
            }
            "break" | "continue" | "assert" | "yield" if !self.nth_is(1, "=") => {
                while !self.at(";") {
                    if self.at_eof() {
                        return Err(self.error("expected `;`"));
                    }
                    self.bump();
                }
                self.bump();
                Stmt::Other
            }
            _ if self.at(";") => {
                self.bump();
                Stmt::Empty
            }
            _ if self.at_ident() && self.nth_is(1, ":") => {
                // labelled statement: keep the statement, drop the label
                self.bump_n(2);
                return self.statement();
            }
            _ => {
                let expr = self.expression()?;
                self.expect(";")?;
                Stmt::Expr(expr)
            }
        };
        let range = self.range_from(start);
        Ok(self.alloc(NodeKind::Stmt(stmt), range))
    }

    fn paren_expression(&mut self) -> PResult<NodeId> {
        self.expect("(")?;
        let expr = self.expression()?;
        self.expect(")")?;
        Ok(expr)
    }

    fn for_statement(&mut self) -> PResult<Stmt> {
        self.expect("for")?;
        self.expect("(")?;

        let header = self.speculate(|p| {
            let locals = p.local_var_decl(false)?;
            Ok(locals.filter(|_| p.at(":")))
        });
        if let Some(mut vars) = header {
            self.expect(":")?;
            let iterable = self.expression()?;
            self.expect(")")?;
            let body = self.statement()?;
            let var = vars.remove(0);
            return Ok(Stmt::ForEach {
                var,
                iterable,
                body,
            });
        }

        let init = if self.at(";") {
            Vec::new()
        } else if let Some(locals) = self.speculate(|p| p.local_var_decl(false)) {
            locals
        } else {
            self.expression_list()?
        };
        self.expect(";")?;
        let cond = if self.at(";") {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(";")?;
        let update = if self.at(")") {
            Vec::new()
        } else {
            self.expression_list()?
        };
        self.expect(")")?;
        let body = self.statement()?;
        Ok(Stmt::For {
            init,
            cond,
            update,
            body,
        })
    }

    fn expression_list(&mut self) -> PResult<Vec<NodeId>> {
        let mut exprs = vec![self.expression()?];
        while self.eat(",") {
            exprs.push(self.expression()?);
        }
        Ok(exprs)
    }

    fn try_statement(&mut self) -> PResult<Stmt> {
        self.expect("try")?;
        let mut resources = Vec::new();
        if self.eat("(") {
            while !self.at(")") {
                match self.speculate(|p| p.local_var_decl(false)) {
                    Some(locals) => resources.extend(locals),
                    None => resources.push(self.expression()?),
                }
                if !self.eat(";") {
                    break;
                }
            }
            self.expect(")")?;
        }
        let body = self.block()?;

        let mut catches = Vec::new();
        while self.at("catch") {
            let start = self.start();
            self.bump();
            self.expect("(")?;
            let param_start = self.start();
            let modifiers = self.modifiers()?;
            let ty = self.type_ref()?;
            while self.eat("|") {
                self.type_ref()?;
            }
            let name = self.ident()?;
            let param = ParameterDecl {
                modifiers,
                ty,
                name,
                is_varargs: false,
            };
            let range = self.range_from(param_start);
            let param = self.alloc(NodeKind::Parameter(param), range);
            self.expect(")")?;
            let body = self.block()?;
            let range = self.range_from(start);
            catches.push(self.alloc(NodeKind::CatchClause(CatchClause { param, body }), range));
        }
        let finally = if self.eat("finally") {
            Some(self.block()?)
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() && resources.is_empty() {
            return Err(self.error("expected `catch` or `finally`"));
        }
        Ok(Stmt::Try {
            resources,
            body,
            catches,
            finally,
        })
    }

    // ---- expressions ----------------------------------------------------

    fn expression(&mut self) -> PResult<NodeId> {
        let start = self.start();
        if self.at_lambda() {
            self.skip_lambda()?;
            return Ok(self.alloc_expr(Expr::Unsupported, start));
        }
        let lhs = self.conditional()?;
        let Some(len) = self.assign_op_len() else {
            return Ok(lhs);
        };
        self.bump_n(len);
        let value = self.expression()?;
        Ok(self.alloc_expr(Expr::Assign { target: lhs, value }, start))
    }

    fn assign_op_len(&self) -> Option<usize> {
        if ASSIGN_OPS.iter().any(|op| self.at(op)) {
            return Some(1);
        }
        // `>>=` and `>>>=` arrive as separate adjacent tokens.
        if self.at(">") && self.nth_is(1, ">") && self.adjacent(0) {
            if self.nth_is(2, "=") && self.adjacent(1) {
                return Some(3);
            }
            if self.nth_is(2, ">") && self.nth_is(3, "=") && self.adjacent(1) && self.adjacent(2) {
                return Some(4);
            }
        }
        None
    }

    fn conditional(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let cond = self.binary(1)?;
        if !self.eat("?") {
            return Ok(cond);
        }
        let then = self.expression()?;
        self.expect(":")?;
        let otherwise = if self.at_lambda() {
            self.expression()?
        } else {
            self.conditional()?
        };
        Ok(self.alloc_expr(
            Expr::Conditional {
                cond,
                then,
                otherwise,
            },
            start,
        ))
    }

    /// Binary operator at the cursor: operator, precedence, token count.
    fn binary_op(&self) -> Option<(Option<BinaryOp>, u8, usize)> {
        let token = self.cur();
        if !matches!(token.kind, TokenKind::Punct | TokenKind::Ident) {
            return None;
        }
        let op = match self.text_of(token) {
            "||" => (Some(BinaryOp::Or), 1, 1),
            "&&" => (Some(BinaryOp::And), 2, 1),
            "|" => (Some(BinaryOp::BitOr), 3, 1),
            "^" => (Some(BinaryOp::BitXor), 4, 1),
            "&" => (Some(BinaryOp::BitAnd), 5, 1),
            "==" => (Some(BinaryOp::Eq), 6, 1),
            "!=" => (Some(BinaryOp::Ne), 6, 1),
            "<" => (Some(BinaryOp::Lt), 7, 1),
            "<=" => (Some(BinaryOp::Le), 7, 1),
            // `instanceof` is reported without an operator.
            "instanceof" => (None, 7, 1),
            ">" => {
                if self.assign_op_len().is_some() {
                    return None;
                }
                if self.nth_is(1, ">") && self.adjacent(0) {
                    if self.nth_is(2, ">") && self.adjacent(1) {
                        (Some(BinaryOp::UShr), 8, 3)
                    } else {
                        (Some(BinaryOp::Shr), 8, 2)
                    }
                } else if self.nth_is(1, "=") && self.adjacent(0) {
                    (Some(BinaryOp::Ge), 7, 2)
                } else {
                    (Some(BinaryOp::Gt), 7, 1)
                }
            }
            "<<" => (Some(BinaryOp::Shl), 8, 1),
            "+" => (Some(BinaryOp::Add), 9, 1),
            "-" => (Some(BinaryOp::Sub), 9, 1),
            "*" => (Some(BinaryOp::Mul), 10, 1),
            "/" => (Some(BinaryOp::Div), 10, 1),
            "%" => (Some(BinaryOp::Rem), 10, 1),
            _ => return None,
        };
        Some(op)
    }

    fn binary(&mut self, min_prec: u8) -> PResult<NodeId> {
        let start = self.start();
        let mut lhs = self.unary()?;
        while let Some((op, prec, len)) = self.binary_op() {
            if prec < min_prec {
                break;
            }
            self.bump_n(len);
            lhs = match op {
                Some(op) => {
                    let rhs = self.binary(prec + 1)?;
                    self.alloc_expr(Expr::Binary { op, lhs, rhs }, start)
                }
                None => {
                    self.eat("final");
                    let ty = self.type_ref()?;
                    // pattern binding: `x instanceof Foo foo`
                    if self.at_ident() {
                        self.bump();
                    }
                    self.alloc_expr(Expr::InstanceOf { expr: lhs, ty }, start)
                }
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let op = match self.text_of(self.cur()) {
            _ if self.cur().kind != TokenKind::Punct => None,
            "+" => Some(UnaryOp::Plus),
            "-" => Some(UnaryOp::Minus),
            "!" => Some(UnaryOp::Not),
            "~" => Some(UnaryOp::BitNot),
            "++" => Some(UnaryOp::PreIncrement),
            "--" => Some(UnaryOp::PreDecrement),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.unary()?;
            return Ok(self.alloc_expr(Expr::Unary { op, operand }, start));
        }

        if self.at("(") {
            if let Some(ty) = self.speculate(|p| p.cast_prefix()) {
                let expr = self.unary()?;
                return Ok(self.alloc_expr(Expr::Cast { ty, expr }, start));
            }
        }

        let primary = self.primary()?;
        self.postfix(primary, start)
    }

    /// `(Type)` followed by something that can only be a cast operand.
    fn cast_prefix(&mut self) -> PResult<Option<TypeRef>> {
        self.expect("(")?;
        let primitive = PrimitiveKind::from_keyword(self.text_of(self.cur())).is_some();
        let ty = self.type_ref()?;
        while self.eat("&") {
            self.type_ref()?;
        }
        self.expect(")")?;
        if primitive {
            return Ok(Some(ty));
        }
        let token = self.cur();
        let operand = match token.kind {
            TokenKind::Ident => self.text_of(token) != "instanceof",
            TokenKind::Punct => matches!(self.text_of(token), "(" | "!" | "~"),
            TokenKind::Eof => false,
            _ => true,
        };
        Ok(operand.then_some(ty))
    }

    fn at_lambda(&self) -> bool {
        if self.at_ident() && self.nth_is(1, "->") {
            return true;
        }
        if !self.at("(") {
            return false;
        }
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let token = self.nth(n);
            if token.kind == TokenKind::Eof {
                return false;
            }
            if self.nth_is(n, "(") {
                depth += 1;
            } else if self.nth_is(n, ")") {
                depth -= 1;
                if depth == 0 {
                    return self.nth_is(n + 1, "->");
                }
            }
            n += 1;
        }
    }

    fn skip_lambda(&mut self) -> PResult<()> {
        if self.at("(") {
            self.skip_balanced("(", ")")?;
        } else {
            self.bump();
        }
        self.expect("->")?;
        if self.at("{") {
            return self.skip_balanced("{", "}");
        }
        let mut depth = 0usize;
        loop {
            if self.at_eof() {
                return Ok(());
            }
            if depth == 0
                && (self.at(",") || self.at(")") || self.at(";") || self.at("}") || self.at("]"))
            {
                return Ok(());
            }
            if self.at("(") || self.at("{") || self.at("[") {
                depth += 1;
            } else if self.at(")") || self.at("}") || self.at("]") {
                depth -= 1;
            }
            self.bump();
        }
    }

    fn arguments(&mut self) -> PResult<Vec<NodeId>> {
        self.expect("(")?;
        let mut args = Vec::new();
        if self.eat(")") {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if !self.eat(",") {
                break;
            }
        }
        self.expect(")")?;
        Ok(args)
    }

    fn primary(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let token = self.cur();
        let literal = match token.kind {
            TokenKind::Int
            | TokenKind::Long
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::TextBlock => Some(
                decode_literal(token.kind, self.text_of(token))
                    .ok_or_else(|| self.error("malformed literal"))?,
            ),
            TokenKind::Ident => match self.text_of(token) {
                "true" => Some(Literal::Boolean(true)),
                "false" => Some(Literal::Boolean(false)),
                "null" => Some(Literal::Null),
                _ => None,
            },
            _ => None,
        };
        if let Some(literal) = literal {
            self.bump();
            return Ok(self.alloc_expr(Expr::Literal(literal), start));
        }

        if self.at("(") {
            return self.paren_expression();
        }
        if self.at("@") {
            return self.element_value();
        }
        if self.at("{") {
            return self.array_init();
        }
        if self.eat("this") {
            if self.at("(") {
                let args = self.arguments()?;
                return Ok(self.alloc_expr(
                    Expr::MethodCall {
                        target: None,
                        name: "this".to_string(),
                        args,
                    },
                    start,
                ));
            }
            return Ok(self.alloc_expr(Expr::This, start));
        }
        if self.eat("super") {
            if self.at("(") {
                let args = self.arguments()?;
                return Ok(self.alloc_expr(
                    Expr::MethodCall {
                        target: None,
                        name: "super".to_string(),
                        args,
                    },
                    start,
                ));
            }
            return Ok(self.alloc_expr(Expr::Super, start));
        }
        if self.at("new") {
            return self.creation();
        }
        if self.at("switch") {
            self.bump();
            self.skip_balanced("(", ")")?;
            self.skip_balanced("{", "}")?;
            return Ok(self.alloc_expr(Expr::Unsupported, start));
        }
        if PrimitiveKind::from_keyword(self.text_of(token)).is_some() || self.at("void") {
            let ty = if self.eat("void") {
                TypeRef {
                    kind: TypeRefKind::Class(vec![ClassSegment {
                        name: "void".to_string(),
                        args: Vec::new(),
                    }]),
                    range: self.range_from(start),
                }
            } else {
                self.type_ref()?
            };
            self.expect(".")?;
            self.expect("class")?;
            return Ok(self.alloc_expr(Expr::ClassLiteral(ty), start));
        }
        if self.at_ident() {
            let name = self.ident()?;
            if self.at("(") {
                let args = self.arguments()?;
                return Ok(self.alloc_expr(
                    Expr::MethodCall {
                        target: None,
                        name,
                        args,
                    },
                    start,
                ));
            }
            return Ok(self.alloc_expr(Expr::Name(name), start));
        }
        Err(self.error("expected expression"))
    }

    fn creation(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.expect("new")?;
        if self.at("<") {
            self.type_args()?;
        }
        let ty = self.non_array_type()?;
        if self.at("[") {
            let mut dims = 0;
            while self.eat("[") {
                if !self.at("]") {
                    self.expression()?;
                }
                self.expect("]")?;
                dims += 1;
            }
            let init = if self.at("{") {
                Some(self.array_init()?)
            } else {
                None
            };
            return Ok(self.alloc_expr(
                Expr::NewArray {
                    element: ty,
                    dims,
                    init,
                },
                start,
            ));
        }
        let args = self.arguments()?;
        let has_body = self.at("{");
        if has_body {
            self.skip_balanced("{", "}")?;
        }
        Ok(self.alloc_expr(Expr::New { ty, args, has_body }, start))
    }

    fn postfix(&mut self, mut expr: NodeId, start: TextSize) -> PResult<NodeId> {
        loop {
            if self.at(".") {
                if self.nth_is(1, "class") {
                    let ty = self.expr_to_type(expr)?;
                    self.bump_n(2);
                    expr = self.alloc_expr(Expr::ClassLiteral(ty), start);
                } else if self.nth_is(1, "this") {
                    self.bump_n(2);
                    expr = self.alloc_expr(Expr::This, start);
                } else if self.nth_is(1, "new") {
                    self.bump();
                    expr = self.creation()?;
                } else {
                    self.bump();
                    if self.at("<") {
                        self.type_args()?;
                    }
                    let name = self.ident()?;
                    expr = if self.at("(") {
                        let args = self.arguments()?;
                        self.alloc_expr(
                            Expr::MethodCall {
                                target: Some(expr),
                                name,
                                args,
                            },
                            start,
                        )
                    } else {
                        self.alloc_expr(Expr::FieldAccess { target: expr, name }, start)
                    };
                }
            } else if self.at("[") && self.nth_is(1, "]") {
                let element = self.expr_to_type(expr)?;
                let ty = self.array_dims(element)?;
                self.expect(".")?;
                self.expect("class")?;
                expr = self.alloc_expr(Expr::ClassLiteral(ty), start);
            } else if self.at("[") {
                self.bump();
                let index = self.expression()?;
                self.expect("]")?;
                expr = self.alloc_expr(Expr::ArrayAccess { array: expr, index }, start);
            } else if self.at("++") || self.at("--") {
                let op = if self.eat("++") {
                    UnaryOp::PostIncrement
                } else {
                    self.bump();
                    UnaryOp::PostDecrement
                };
                expr = self.alloc_expr(Expr::Unary { op, operand: expr }, start);
            } else if self.eat("::") {
                if !self.eat("new") {
                    self.ident()?;
                }
                expr = self.alloc_expr(Expr::Unsupported, start);
            } else {
                return Ok(expr);
            }
        }
    }

    /// Reinterpret a `Name`/`FieldAccess` chain as a type (for `a.B.class`
    /// and `a.B[].class`), dropping the chain's nodes.
    fn expr_to_type(&mut self, expr: NodeId) -> PResult<TypeRef> {
        let mut names = Vec::new();
        let mut current = expr;
        let first = loop {
            match &self.nodes[current.index()].kind {
                NodeKind::Expr(Expr::Name(name)) => {
                    names.push(name.clone());
                    break current;
                }
                NodeKind::Expr(Expr::FieldAccess { target, name }) => {
                    names.push(name.clone());
                    current = *target;
                }
                _ => return Err(self.error("expected type name")),
            }
        };
        names.reverse();
        let range = self.nodes[expr.index()].range;
        // The chain was allocated last, innermost name first.
        self.nodes.truncate(first.index());
        Ok(TypeRef {
            kind: TypeRefKind::Class(
                names
                    .into_iter()
                    .map(|name| ClassSegment {
                        name,
                        args: Vec::new(),
                    })
                    .collect(),
            ),
            range,
        })
    }
}

fn decode_literal(kind: TokenKind, text: &str) -> Option<Literal> {
    let digits = |s: &str| s.replace('_', "");
    Some(match kind {
        TokenKind::Int => Literal::Int(parse_integer(&digits(text))? as i32),
        TokenKind::Long => Literal::Long(parse_integer(&digits(&text[..text.len() - 1]))? as i64),
        TokenKind::Float => {
            let body = digits(text.trim_end_matches(['f', 'F']));
            Literal::Float(body.parse().ok()?)
        }
        TokenKind::Double => {
            let body = digits(text.trim_end_matches(['d', 'D']));
            Literal::Double(body.parse().ok()?)
        }
        TokenKind::Char => {
            let value = unescape(&text[1..text.len() - 1])?;
            let mut chars = value.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Literal::Char(c)
        }
        TokenKind::String => Literal::String(unescape(&text[1..text.len() - 1])?),
        TokenKind::TextBlock => Literal::TextBlock(text_block(&text[3..text.len() - 3])?),
        _ => return None,
    })
}

/// Integer literal value as raw bits, so `0xFFFFFFFF` and `2147483648`
/// (only legal after unary minus) both wrap the way Java defines.
fn parse_integer(text: &str) -> Option<u64> {
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        u64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            's' => out.push(' '),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            '\n' => {}
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                let unit = u16::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            d @ '0'..='7' => {
                let mut value = d.to_digit(8)?;
                let max_len = if d <= '3' { 3 } else { 2 };
                for _ in 1..max_len {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Content of a text block: incidental indentation stripped, trailing
/// spaces removed, escapes processed.
fn text_block(raw: &str) -> Option<String> {
    let content = raw.split_once('\n').map(|(_, rest)| rest)?;
    let lines: Vec<&str> = content.split('\n').collect();
    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| *i == lines.len() - 1 || !line.trim().is_empty())
        .map(|(_, line)| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let stripped: Vec<&str> = lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect();
    unescape(&stripped.join("\n"))
}
