//! # Rule — Condições, Ações e Regras de Produção
//!
//! Uma [`Rule`] é uma transformação condicional sobre a base de fatos:
//! quando suas condições casam, suas ações modificam a base. Este módulo
//! define toda a álgebra de condições e ações como **variantes etiquetadas**
//! (sum types) — o schema textual dinâmico é convertido nestes nós tipados
//! uma única vez, no load, eliminando checagens de forma em tempo de
//! casamento.
//!
//! ## Estrutura de uma Regra
//!
//! ```text
//! Rule {
//!     name: "zebra-stripes",
//!     conditions: [ Atom { pred: "is-zebra", args: [?x], deg: ?d, deg-pred: (> ?d 0.5) } ],
//!     actions:    [ Add  { pred: "has-stripes", args: [?x], deg: (* 0.9 ?d) } ],
//!     priority: 0,
//! }
//! ```
//!
//! ## Combinadores de Condição
//!
//! | Variante | Semântica |
//! |----------|-----------|
//! | [`Condition::Atom`] | casa um fato armazenado, ligando variáveis |
//! | [`Condition::And`] | todos os filhos casam; ligações compõem da esquerda para a direita |
//! | [`Condition::Or`] | ao menos um filho casa; cada filho contribui ligações |
//! | [`Condition::Not`] | negação-por-falha sobre a base e ligações atuais |
//!
//! ## Invariante de Ligação
//!
//! Toda variável referenciada por um `deg-pred` ou por uma ação precisa
//! estar ligada em algum ponto das condições da regra. [`Rule::validate`]
//! impõe isso na ingestão, simulando a ordem de avaliação do casador.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::bindings::Bindings;
use crate::core::fact::Term;
use crate::error::{InferenceError, Result, ValidationError};

/// Comparador de uma restrição de grau (`deg-pred`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=` (a forma `==` é aceita na entrada)
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl ComparisonOp {
    /// Interpreta o símbolo textual do comparador.
    pub fn parse(op: &str) -> Result<Self> {
        match op {
            "<" => Ok(ComparisonOp::Lt),
            "<=" => Ok(ComparisonOp::Le),
            "=" | "==" => Ok(ComparisonOp::Eq),
            "!=" => Ok(ComparisonOp::Ne),
            ">=" => Ok(ComparisonOp::Ge),
            ">" => Ok(ComparisonOp::Gt),
            other => Err(ValidationError::UnknownOperator {
                operator: other.to_string(),
            }
            .into()),
        }
    }

    /// Símbolo canônico emitido na serialização.
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Gt => ">",
        }
    }

    /// Aplica o comparador a dois reais.
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Gt => lhs > rhs,
        }
    }
}

/// Operando de uma restrição de grau: literal numérico ou variável ligada.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintOperand {
    /// Literal numérico.
    Literal(f64),
    /// Variável de grau (forma `?nome`).
    Variable(String),
}

impl ConstraintOperand {
    /// Resolve o operando sob as ligações atuais.
    ///
    /// Variável não ligada (ou ligada a um símbolo) resolve para `None`.
    fn resolve(&self, bindings: &Bindings) -> Option<f64> {
        match self {
            ConstraintOperand::Literal(v) => Some(*v),
            ConstraintOperand::Variable(name) => bindings.degree(name),
        }
    }

    /// Nome da variável, se o operando for uma variável.
    fn variable(&self) -> Option<&str> {
        match self {
            ConstraintOperand::Variable(name) => Some(name),
            ConstraintOperand::Literal(_) => None,
        }
    }
}

/// Restrição sobre graus: `[op, lhs, rhs]`.
///
/// A avaliação exige que toda variável referenciada esteja ligada;
/// caso contrário a restrição **falha** (nunca erra).
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeConstraint {
    pub op: ComparisonOp,
    pub lhs: ConstraintOperand,
    pub rhs: ConstraintOperand,
}

impl DegreeConstraint {
    /// Avalia a restrição sob as ligações atuais.
    pub fn holds(&self, bindings: &Bindings) -> bool {
        match (self.lhs.resolve(bindings), self.rhs.resolve(bindings)) {
            (Some(lhs), Some(rhs)) => self.op.compare(lhs, rhs),
            _ => false,
        }
    }
}

/// Operador de uma expressão de grau n-ária.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DegreeOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
}

impl DegreeOp {
    /// Interpreta o símbolo textual do operador.
    pub fn parse(op: &str) -> Result<Self> {
        match op {
            "+" => Ok(DegreeOp::Add),
            "-" => Ok(DegreeOp::Sub),
            "*" => Ok(DegreeOp::Mul),
            "/" => Ok(DegreeOp::Div),
            "min" => Ok(DegreeOp::Min),
            "max" => Ok(DegreeOp::Max),
            other => Err(ValidationError::UnknownOperator {
                operator: other.to_string(),
            }
            .into()),
        }
    }

    /// Símbolo canônico emitido na serialização.
    pub fn symbol(&self) -> &'static str {
        match self {
            DegreeOp::Add => "+",
            DegreeOp::Sub => "-",
            DegreeOp::Mul => "*",
            DegreeOp::Div => "/",
            DegreeOp::Min => "min",
            DegreeOp::Max => "max",
        }
    }
}

/// Expressão de grau avaliada na aplicação de uma ação.
///
/// Aritmética padrão sobre reais; `-` subtrai do primeiro operando a soma
/// dos demais; `/` dobra à esquerda e erra em divisor zero; `min`/`max`
/// aceitam qualquer aridade ≥ 1. O resultado final é **saturado** em
/// [0,1] antes de ser armazenado.
#[derive(Clone, Debug, PartialEq)]
pub enum DegreeExpr {
    /// Literal numérico (ex: `0.9`).
    Literal(f64),
    /// Variável de grau resolvida das ligações (ex: `"?d"`).
    Variable(String),
    /// Forma n-ária `[op, arg, …]` (ex: `["*", 0.9, "?d"]`).
    Apply { op: DegreeOp, args: Vec<DegreeExpr> },
}

impl DegreeExpr {
    /// Avalia a expressão sob as ligações, saturando o resultado em [0,1].
    ///
    /// # Erros
    ///
    /// - Variável de grau não ligada → erro de validação (defeito de
    ///   autoria da regra);
    /// - divisor zero → erro de inferência;
    /// - forma n-ária sem operandos → erro de validação.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64> {
        Ok(self.eval_inner(bindings)?.clamp(0.0, 1.0))
    }

    /// Recursão sem saturação — apenas o valor final é saturado.
    fn eval_inner(&self, bindings: &Bindings) -> Result<f64> {
        match self {
            DegreeExpr::Literal(value) => Ok(*value),
            DegreeExpr::Variable(name) => {
                bindings.degree(name).ok_or_else(|| {
                    ValidationError::UnboundVariable {
                        variable: name.clone(),
                    }
                    .into()
                })
            }
            DegreeExpr::Apply { op, args } => {
                if args.is_empty() {
                    return Err(ValidationError::EmptyExpression.into());
                }
                let values = args
                    .iter()
                    .map(|arg| arg.eval_inner(bindings))
                    .collect::<Result<Vec<f64>>>()?;
                match op {
                    DegreeOp::Add => Ok(values.iter().sum()),
                    DegreeOp::Sub => Ok(values[0] - values[1..].iter().sum::<f64>()),
                    DegreeOp::Mul => Ok(values.iter().product()),
                    DegreeOp::Div => {
                        let mut acc = values[0];
                        for divisor in &values[1..] {
                            if *divisor == 0.0 {
                                return Err(InferenceError::DivisionByZero.into());
                            }
                            acc /= divisor;
                        }
                        Ok(acc)
                    }
                    DegreeOp::Min => Ok(values.iter().copied().fold(f64::INFINITY, f64::min)),
                    DegreeOp::Max => Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
                }
            }
        }
    }

    /// Coleta as variáveis referenciadas pela expressão.
    fn collect_variables(&self, into: &mut BTreeSet<String>) {
        match self {
            DegreeExpr::Literal(_) => {}
            DegreeExpr::Variable(name) => {
                into.insert(name.clone());
            }
            DegreeExpr::Apply { args, .. } => {
                for arg in args {
                    arg.collect_variables(into);
                }
            }
        }
    }
}

/// Condição de uma regra — variante etiquetada.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Casa um fato armazenado com mesmo predicado e aridade, unificando
    /// os termos sob as ligações atuais. Opcionalmente liga o grau do
    /// fato casado a `degree_var` e/ou exige `degree_constraint`.
    Atom {
        predicate: String,
        args: Vec<Term>,
        degree_var: Option<String>,
        degree_constraint: Option<DegreeConstraint>,
    },
    /// Todos os filhos casam; as ligações compõem da esquerda para a direita.
    And(Vec<Condition>),
    /// Ao menos um filho casa; cada filho satisfeito contribui ligações.
    Or(Vec<Condition>),
    /// Negação-por-falha: casa quando o filho não possui nenhuma
    /// extensão de ligação. Nunca estende ligações.
    Not(Box<Condition>),
}

impl Condition {
    /// Constrói um átomo simples, interpretando `?` nos argumentos.
    ///
    /// # Exemplo
    ///
    /// ```rust
    /// use fuzzy_infer::core::Condition;
    ///
    /// let cond = Condition::atom("is-zebra", ["?x"]);
    /// ```
    pub fn atom<P, A, S>(predicate: P, args: A) -> Condition
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::Atom {
            predicate: predicate.into(),
            args: args.into_iter().map(|a| Term::parse(a.into())).collect(),
            degree_var: None,
            degree_constraint: None,
        }
    }

    /// Valida a condição simulando a ordem de avaliação do casador.
    ///
    /// `bound` acumula as variáveis ligadas até este ponto; restrições de
    /// grau só podem referenciar variáveis já ligadas (inclusive pelas
    /// ligações do próprio átomo). Filhos de `Not` podem ligar variáveis
    /// internamente, mas nada escapa da negação.
    fn validate(&self, bound: &mut BTreeSet<String>) -> Result<()> {
        match self {
            Condition::Atom {
                predicate,
                args,
                degree_var,
                degree_constraint,
            } => {
                if predicate.is_empty() {
                    return Err(ValidationError::EmptyPredicate.into());
                }
                for term in args {
                    if let Term::Variable(name) = term {
                        bound.insert(name.clone());
                    }
                }
                if let Some(var) = degree_var {
                    bound.insert(var.clone());
                }
                if let Some(constraint) = degree_constraint {
                    for operand in [&constraint.lhs, &constraint.rhs] {
                        if let Some(var) = operand.variable() {
                            if !bound.contains(var) {
                                return Err(ValidationError::UnboundVariable {
                                    variable: var.to_string(),
                                }
                                .into());
                            }
                        }
                    }
                }
                Ok(())
            }
            Condition::And(children) => {
                for child in children {
                    child.validate(bound)?;
                }
                Ok(())
            }
            Condition::Or(children) => {
                // Cada ramo é validado a partir do mesmo conjunto de entrada;
                // variáveis ligadas em qualquer ramo contam como "ligadas em
                // algum ponto" para o restante da regra.
                let incoming = bound.clone();
                for child in children {
                    let mut branch = incoming.clone();
                    child.validate(&mut branch)?;
                    bound.extend(branch);
                }
                Ok(())
            }
            Condition::Not(child) => {
                let mut inner = bound.clone();
                child.validate(&mut inner)
            }
        }
    }

    /// Alimenta o hash estrutural da regra.
    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        match self {
            Condition::Atom {
                predicate,
                args,
                degree_var,
                degree_constraint,
            } => {
                0u8.hash(state);
                predicate.hash(state);
                for term in args {
                    term.as_str().hash(state);
                }
                degree_var.hash(state);
                if let Some(constraint) = degree_constraint {
                    constraint.op.symbol().hash(state);
                    for operand in [&constraint.lhs, &constraint.rhs] {
                        match operand {
                            ConstraintOperand::Literal(v) => v.to_bits().hash(state),
                            ConstraintOperand::Variable(name) => name.hash(state),
                        }
                    }
                }
            }
            Condition::And(children) => {
                1u8.hash(state);
                for child in children {
                    child.hash_structure(state);
                }
            }
            Condition::Or(children) => {
                2u8.hash(state);
                for child in children {
                    child.hash_structure(state);
                }
            }
            Condition::Not(child) => {
                3u8.hash(state);
                child.hash_structure(state);
            }
        }
    }
}

/// Molde de fato instanciado por uma ação: argumentos podem conter
/// variáveis e o grau é uma expressão opcional (ausente ⇒ usa-se o grau
/// de casamento da regra).
#[derive(Clone, Debug, PartialEq)]
pub struct FactTemplate {
    pub predicate: String,
    pub args: Vec<Term>,
    pub degree: Option<DegreeExpr>,
}

impl FactTemplate {
    /// Constrói um molde, interpretando `?` nos argumentos.
    pub fn new<P, A, S>(predicate: P, args: A, degree: Option<DegreeExpr>) -> FactTemplate
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FactTemplate {
            predicate: predicate.into(),
            args: args.into_iter().map(|a| Term::parse(a.into())).collect(),
            degree,
        }
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.predicate.hash(state);
        for term in &self.args {
            term.as_str().hash(state);
        }
        if let Some(expr) = &self.degree {
            hash_expr(expr, state);
        }
    }
}

fn hash_expr<H: Hasher>(expr: &DegreeExpr, state: &mut H) {
    match expr {
        DegreeExpr::Literal(v) => v.to_bits().hash(state),
        DegreeExpr::Variable(name) => name.hash(state),
        DegreeExpr::Apply { op, args } => {
            op.symbol().hash(state);
            for arg in args {
                hash_expr(arg, state);
            }
        }
    }
}

/// Ação executada quando uma regra dispara.
///
/// As formas textuais são `add`, `remove` e `modify`.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Instancia o molde e combina na base por fuzzy-OR.
    Add(FactTemplate),
    /// Remove o fato cuja identidade casa com o molde instanciado.
    Retract(FactTemplate),
    /// Define o grau do fato casado; ausente, comporta-se como `Add`.
    Modify(FactTemplate),
}

impl Action {
    /// Molde de fato alvo da ação.
    pub fn template(&self) -> &FactTemplate {
        match self {
            Action::Add(t) | Action::Retract(t) | Action::Modify(t) => t,
        }
    }

    /// Forma textual da ação no schema (`add`/`remove`/`modify`).
    pub fn kind_label(&self) -> &'static str {
        match self {
            Action::Add(_) => "add",
            Action::Retract(_) => "remove",
            Action::Modify(_) => "modify",
        }
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.kind_label().hash(state);
        self.template().hash_structure(state);
    }
}

/// Identidade de uma regra para detecção de conflitos: o nome, quando
/// presente, senão o hash estrutural de condições + ações.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleIdentity {
    Named(String),
    Structural(u64),
}

/// Regra de produção: condições ordenadas, ações ordenadas, prioridade.
///
/// Regras de maior prioridade são avaliadas primeiro em cada passo do
/// driver; empates preservam a ordem de inserção.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Nome opcional — identidade para conflitos e diagnóstico.
    pub name: Option<String>,
    /// Descrição opcional, livre.
    pub description: Option<String>,
    /// Prioridade de disparo (maior = antes). Padrão 0.
    pub priority: i32,
    /// Condições — AND implícito, avaliadas em ordem de declaração.
    pub conditions: Vec<Condition>,
    /// Ações aplicadas em ordem de declaração a cada casamento.
    pub actions: Vec<Action>,
}

impl Rule {
    /// Cria uma regra anônima de prioridade 0.
    pub fn new(conditions: Vec<Condition>, actions: Vec<Action>) -> Rule {
        Rule {
            name: None,
            description: None,
            priority: 0,
            conditions,
            actions,
        }
    }

    /// Valida os invariantes estruturais da regra.
    ///
    /// - Ao menos uma ação.
    /// - Toda variável referenciada por uma restrição de grau ou por uma
    ///   ação está ligada em algum ponto das condições.
    ///
    /// Uma lista de condições **vazia** é permitida na construção
    /// programática: tal regra dispara exatamente uma vez por passo.
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }

        let mut bound = BTreeSet::new();
        for condition in &self.conditions {
            condition.validate(&mut bound)?;
        }

        let mut referenced = BTreeSet::new();
        for action in &self.actions {
            let template = action.template();
            for term in &template.args {
                if let Term::Variable(name) = term {
                    referenced.insert(name.clone());
                }
            }
            if let Some(expr) = &template.degree {
                expr.collect_variables(&mut referenced);
            }
        }
        for variable in referenced {
            if !bound.contains(&variable) {
                return Err(ValidationError::UnboundVariable { variable }.into());
            }
        }
        Ok(())
    }

    /// Identidade da regra para detecção de conflitos.
    pub fn identity(&self) -> RuleIdentity {
        match &self.name {
            Some(name) => RuleIdentity::Named(name.clone()),
            None => RuleIdentity::Structural(self.structural_hash()),
        }
    }

    /// Hash estrutural de condições + ações (graus pelo padrão de bits).
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for condition in &self.conditions {
            condition.hash_structure(&mut hasher);
        }
        for action in &self.actions {
            action.hash_structure(&mut hasher);
        }
        hasher.finish()
    }
}

/// Rótulo de diagnóstico: o nome da regra ou `regra-anônima`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str("regra-anônima"),
        }
    }
}

/// Construtor fluente de regras.
///
/// Conveniência sobre o modelo central: a regra construída é
/// indistinguível de uma ingerida pelo schema textual.
///
/// ## Exemplo
///
/// ```rust
/// use fuzzy_infer::core::RuleBuilder;
///
/// let regra = RuleBuilder::new()
///     .when("is-zebra", ["?x"])
///     .with_degree_above(0.5)
///     .then_add("has-stripes", ["?x"])
///     .with_degree_times(0.9)
///     .named("zebra-stripes")
///     .build()
///     .unwrap();
/// assert_eq!(regra.name.as_deref(), Some("zebra-stripes"));
/// ```
#[derive(Default)]
pub struct RuleBuilder {
    name: Option<String>,
    description: Option<String>,
    priority: i32,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    degree_var: Option<String>,
    error: Option<ValidationError>,
}

impl RuleBuilder {
    /// Inicia um construtor vazio.
    pub fn new() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Acrescenta uma condição atômica.
    pub fn when<P, A, S>(mut self, predicate: P, args: A) -> Self
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition::atom(predicate, args));
        self
    }

    /// Acrescenta uma condição atômica negada (negação-por-falha).
    pub fn when_not<P, A, S>(mut self, predicate: P, args: A) -> Self
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions
            .push(Condition::Not(Box::new(Condition::atom(predicate, args))));
        self
    }

    /// Liga o grau do fato casado pela última condição à variável dada.
    pub fn with_degree(mut self, variable: impl Into<String>) -> Self {
        let variable = variable.into();
        match self.conditions.last_mut() {
            Some(Condition::Atom { degree_var, .. }) => {
                *degree_var = Some(variable.clone());
                self.degree_var = Some(variable);
            }
            _ => self.fail(ValidationError::EmptyConditions),
        }
        self
    }

    /// Exige grau do último átomo acima do limiar (liga `?d`).
    pub fn with_degree_above(self, threshold: f64) -> Self {
        self.constrain_degree(ComparisonOp::Gt, threshold)
    }

    /// Exige grau do último átomo abaixo do limiar (liga `?d`).
    pub fn with_degree_below(self, threshold: f64) -> Self {
        self.constrain_degree(ComparisonOp::Lt, threshold)
    }

    fn constrain_degree(mut self, op: ComparisonOp, threshold: f64) -> Self {
        match self.conditions.last_mut() {
            Some(Condition::Atom {
                degree_var,
                degree_constraint,
                ..
            }) => {
                let variable = degree_var.clone().unwrap_or_else(|| "?d".to_string());
                *degree_var = Some(variable.clone());
                *degree_constraint = Some(DegreeConstraint {
                    op,
                    lhs: ConstraintOperand::Variable(variable.clone()),
                    rhs: ConstraintOperand::Literal(threshold),
                });
                self.degree_var = Some(variable);
            }
            _ => self.fail(ValidationError::EmptyConditions),
        }
        self
    }

    /// Acrescenta uma ação `add` (grau padrão: grau de casamento).
    pub fn then_add<P, A, S>(mut self, predicate: P, args: A) -> Self
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions
            .push(Action::Add(FactTemplate::new(predicate, args, None)));
        self
    }

    /// Acrescenta uma ação `remove`.
    pub fn then_remove<P, A, S>(mut self, predicate: P, args: A) -> Self
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions
            .push(Action::Retract(FactTemplate::new(predicate, args, None)));
        self
    }

    /// Acrescenta uma ação `modify`.
    pub fn then_modify<P, A, S>(mut self, predicate: P, args: A) -> Self
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions
            .push(Action::Modify(FactTemplate::new(predicate, args, None)));
        self
    }

    /// Define o grau da última ação como `fator × grau casado`.
    ///
    /// Se nenhuma condição ligou um grau ainda, a primeira condição
    /// atômica recebe a variável implícita `?_deg`.
    pub fn with_degree_times(mut self, factor: f64) -> Self {
        if self.degree_var.is_none() {
            match self.conditions.first_mut() {
                Some(Condition::Atom { degree_var, .. }) => {
                    let variable = degree_var.clone().unwrap_or_else(|| "?_deg".to_string());
                    *degree_var = Some(variable.clone());
                    self.degree_var = Some(variable);
                }
                _ => self.fail(ValidationError::EmptyConditions),
            }
        }
        let expr = match &self.degree_var {
            Some(variable) => DegreeExpr::Apply {
                op: DegreeOp::Mul,
                args: vec![
                    DegreeExpr::Literal(factor),
                    DegreeExpr::Variable(variable.clone()),
                ],
            },
            None => DegreeExpr::Literal(factor),
        };
        self.set_action_degree(expr)
    }

    /// Define o grau da última ação por uma expressão arbitrária.
    pub fn with_degree_expr(self, expr: DegreeExpr) -> Self {
        self.set_action_degree(expr)
    }

    fn set_action_degree(mut self, expr: DegreeExpr) -> Self {
        match self.actions.last_mut() {
            Some(action) => {
                let template = match action {
                    Action::Add(t) | Action::Retract(t) | Action::Modify(t) => t,
                };
                template.degree = Some(expr);
            }
            None => self.fail(ValidationError::NoActions),
        }
        self
    }

    /// Define o nome da regra.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Define a descrição da regra.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Define a prioridade da regra.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Registra o primeiro erro de encadeamento; reportado em `build`.
    fn fail(&mut self, error: ValidationError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Constrói e valida a regra.
    pub fn build(self) -> Result<Rule> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        let rule = Rule {
            name: self.name,
            description: self.description,
            priority: self.priority,
            conditions: self.conditions,
            actions: self.actions,
        };
        rule.validate()?;
        Ok(rule)
    }
}
