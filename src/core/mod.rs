//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os **tipos fundamentais** do motor de inferência
//! fuzzy. Tudo no sistema gira em torno destes tipos:
//!
//! - [`Fact`] — tripla `(predicado, argumentos, grau)` com crença em [0,1]
//! - [`Term`] — símbolo ground ou variável `?nome`
//! - [`Bindings`] — ligações de variáveis construídas pelo casador
//! - [`Condition`] / [`Action`] / [`Rule`] — a álgebra das regras de produção
//! - [`RuleBuilder`] — construtor fluente de regras
//! - [`KnowledgeBase`] — contêiner central de fatos e regras
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use fuzzy_infer::core::{Fact, KnowledgeBase, RuleBuilder};
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_fact(Fact::new("is-mammal", ["dog"], 1.0).unwrap()).unwrap();
//! kb.add_rule(
//!     RuleBuilder::new()
//!         .when("is-mammal", ["?x"])
//!         .then_add("warm-blooded", ["?x"])
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//! ```

/// Sub-módulo com [`Fact`], [`Term`] e a identidade [`FactKey`].
pub mod fact;

/// Sub-módulo com [`Bindings`] — ligações de variáveis.
pub mod bindings;

/// Sub-módulo com a álgebra de regras: condições, restrições,
/// expressões de grau, ações e o [`RuleBuilder`].
pub mod rule;

/// Sub-módulo com a [`KnowledgeBase`] — contêiner central.
pub mod knowledge_base;

// Re-exports para conveniência — permite usar `crate::core::Fact` diretamente.
pub use bindings::{Bindings, BoundValue};
pub use fact::{Fact, FactKey, Term};
pub use knowledge_base::KnowledgeBase;
pub use rule::{
    Action, ComparisonOp, Condition, ConstraintOperand, DegreeConstraint, DegreeExpr, DegreeOp,
    FactTemplate, Rule, RuleBuilder, RuleIdentity,
};
