//! A tiny in-memory type world for exercising the type algebra.

use std::sync::Arc;

use jsym_types::{
    Accessibility, Annotated, AnnotationRef, AnnotationValue, FieldRef, MethodRef,
    ReferenceTypeDeclaration, ResolvedAnnotationExpr, ResolvedType, Result, SymbolReference,
    TypeDeclRef, TypeDeclarationKind, TypeParamRef, TypeParameterDeclaration, TypeSolver,
    TypeSolverBackend,
};

#[derive(Debug, Clone, Copy)]
pub enum Arg {
    /// One of the declaring type's own parameters.
    Param(&'static str),
    /// A non-generic type, by qualified name.
    Type(&'static str),
}

#[derive(Debug)]
pub struct Spec {
    pub name: &'static str,
    pub kind: TypeDeclarationKind,
    pub params: Vec<&'static str>,
    pub supers: Vec<(&'static str, Vec<Arg>)>,
    pub annotations: Vec<&'static str>,
}

fn spec(
    name: &'static str,
    kind: TypeDeclarationKind,
    params: &[&'static str],
    supers: Vec<(&'static str, Vec<Arg>)>,
) -> Arc<Spec> {
    Arc::new(Spec {
        name,
        kind,
        params: params.to_vec(),
        supers,
        annotations: Vec::new(),
    })
}

#[derive(Debug)]
pub struct FakeBackend {
    label: &'static str,
    specs: Vec<Arc<Spec>>,
}

impl FakeBackend {
    pub fn new(label: &'static str, specs: Vec<Arc<Spec>>) -> Self {
        Self { label, specs }
    }
}

impl TypeSolverBackend for FakeBackend {
    fn label(&self) -> String {
        self.label.to_string()
    }

    fn try_to_solve_type(
        &self,
        name: &str,
        root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        Ok(self
            .specs
            .iter()
            .find(|s| s.name == name)
            .map(|s| {
                Arc::new(FakeType {
                    spec: s.clone(),
                    solver: root.clone(),
                }) as TypeDeclRef
            })
            .into())
    }
}

/// The standard world: a handful of `java.lang`/`java.util` types plus a
/// few generic shapes in `pkg`.
pub fn world() -> TypeSolver {
    use Arg::*;
    use TypeDeclarationKind::*;
    let marker = Spec {
        name: "pkg.Marker",
        kind: Annotation,
        params: Vec::new(),
        supers: vec![("java.lang.annotation.Annotation", Vec::new())],
        annotations: vec!["java.lang.annotation.Inherited"],
    };
    TypeSolver::new(FakeBackend::new(
        "world",
        vec![
            spec("java.lang.Object", Class, &[], Vec::new()),
            spec("java.lang.Number", Class, &[], Vec::new()),
            spec("java.lang.Comparable", Interface, &["T"], Vec::new()),
            spec(
                "java.lang.Integer",
                Class,
                &[],
                vec![
                    ("java.lang.Number", Vec::new()),
                    ("java.lang.Comparable", vec![Type("java.lang.Integer")]),
                ],
            ),
            spec(
                "java.lang.String",
                Class,
                &[],
                vec![("java.lang.Comparable", vec![Type("java.lang.String")])],
            ),
            spec("java.lang.annotation.Annotation", Interface, &[], Vec::new()),
            spec("java.lang.annotation.Inherited", Annotation, &[], Vec::new()),
            spec("java.util.Collection", Interface, &["E"], Vec::new()),
            spec(
                "java.util.List",
                Interface,
                &["E"],
                vec![("java.util.Collection", vec![Param("E")])],
            ),
            spec(
                "java.util.Set",
                Interface,
                &["E"],
                vec![("java.util.Collection", vec![Param("E")])],
            ),
            spec(
                "pkg.StringList",
                Interface,
                &[],
                vec![("java.util.List", vec![Type("java.lang.String")])],
            ),
            spec("pkg.Pair", Class, &["A", "B"], Vec::new()),
            spec(
                "pkg.Swapped",
                Class,
                &["X", "Y"],
                vec![("pkg.Pair", vec![Param("Y"), Param("X")])],
            ),
            Arc::new(marker),
        ],
    ))
}

#[derive(Debug)]
pub struct FakeType {
    spec: Arc<Spec>,
    solver: TypeSolver,
}

impl FakeType {
    fn param(&self, name: &str) -> TypeParamRef {
        Arc::new(FakeParam {
            name: name.to_string(),
            container: self.spec.name.to_string(),
        })
    }
}

impl Annotated for FakeType {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(self
            .spec
            .annotations
            .iter()
            .map(|name| {
                Arc::new(FakeAnnotation {
                    name: name.to_string(),
                }) as AnnotationRef
            })
            .collect())
    }
}

impl ReferenceTypeDeclaration for FakeType {
    fn name(&self) -> String {
        jsym_core::simple_name(self.spec.name).to_string()
    }

    fn package_name(&self) -> String {
        jsym_core::package_name(self.spec.name).to_string()
    }

    fn class_name(&self) -> String {
        self.name()
    }

    fn kind(&self) -> TypeDeclarationKind {
        self.spec.kind
    }

    fn accessibility(&self) -> Accessibility {
        Accessibility::Public
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        Ok(self.spec.params.iter().map(|p| self.param(p)).collect())
    }

    fn ancestors(&self) -> Result<Vec<ResolvedType>> {
        let mut out = Vec::new();
        if self.spec.kind == TypeDeclarationKind::Class
            && self.spec.name != "java.lang.Object"
            && !self.spec.supers.iter().any(|(name, _)| {
                self.solver
                    .try_to_solve_type(name)
                    .ok()
                    .and_then(SymbolReference::into_declaration)
                    .is_some_and(|d| d.is_class())
            })
        {
            out.push(ResolvedType::reference(
                self.solver.solve_type("java.lang.Object")?,
                Vec::new(),
            ));
        }
        for (name, args) in &self.spec.supers {
            let decl = self.solver.solve_type(name)?;
            let args = args
                .iter()
                .map(|arg| match arg {
                    Arg::Param(p) => Ok(ResolvedType::type_variable(self.param(p))),
                    Arg::Type(t) => Ok(ResolvedType::reference(
                        self.solver.solve_type(t)?,
                        Vec::new(),
                    )),
                })
                .collect::<Result<Vec<_>>>()?;
            out.push(ResolvedType::reference(decl, args));
        }
        Ok(out)
    }

    fn declared_fields(&self) -> Result<Vec<FieldRef>> {
        Ok(Vec::new())
    }

    fn declared_methods(&self) -> Result<Vec<MethodRef>> {
        Ok(Vec::new())
    }

    fn constructors(&self) -> Result<Vec<MethodRef>> {
        Ok(Vec::new())
    }

    fn internal_types(&self) -> Result<Vec<TypeDeclRef>> {
        Ok(Vec::new())
    }

    fn type_solver(&self) -> TypeSolver {
        self.solver.clone()
    }
}

#[derive(Debug)]
pub struct FakeParam {
    pub name: String,
    pub container: String,
}

impl TypeParameterDeclaration for FakeParam {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn container_qualified_name(&self) -> String {
        self.container.clone()
    }

    fn declared_on_type(&self) -> bool {
        true
    }

    fn bounds(&self) -> Result<Vec<ResolvedType>> {
        Ok(Vec::new())
    }
}

#[derive(Debug)]
struct FakeAnnotation {
    name: String,
}

impl ResolvedAnnotationExpr for FakeAnnotation {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn qualified_name(&self) -> String {
        self.name.clone()
    }

    fn declaration(&self) -> Result<Option<TypeDeclRef>> {
        Ok(None)
    }

    fn values(&self) -> Result<Vec<(String, AnnotationValue)>> {
        Ok(Vec::new())
    }
}

/// `name` with the given type arguments.
pub fn ty(solver: &TypeSolver, name: &str, args: Vec<ResolvedType>) -> ResolvedType {
    ResolvedType::reference(solver.solve_type(name).unwrap(), args)
}

/// A type variable declared on `container`.
pub fn var(container: &str, name: &str) -> ResolvedType {
    ResolvedType::type_variable(Arc::new(FakeParam {
        name: name.to_string(),
        container: container.to_string(),
    }))
}
