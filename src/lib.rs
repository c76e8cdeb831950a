//! # Fuzzy Infer — Motor de Regras de Produção com Encadeamento Progressivo
//!
//! Sistema de inferência fuzzy: uma base de conhecimento guarda **fatos**
//! anotados com graus de crença em [0,1], uma base de **regras** descreve
//! como novos fatos derivam dos existentes, e o driver de inferência
//! **satura** a base disparando repetidamente as regras aplicáveis até o
//! ponto fixo.
//!
//! ## Fluxo Típico
//!
//! ```text
//! cliente
//!   ├── popula fatos e regras (direto ou via serialização JSON/YAML)
//!   ├── run(max_iterations)
//!   │     └── casador de padrões por regra → avalia expressões de grau
//!   │         → ações comprometem no armazém (fuzzy-OR)
//!   ├── query(predicado, padrão)
//!   └── merge(kb_a, kb_b, estratégia) — compõe bases sem inferir
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! use fuzzy_infer::core::{Fact, KnowledgeBase, RuleBuilder};
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_fact(Fact::new("is-zebra", ["sam"], 0.8).unwrap()).unwrap();
//! kb.add_rule(
//!     RuleBuilder::new()
//!         .when("is-zebra", ["?x"])
//!         .with_degree_above(0.5)
//!         .then_add("has-stripes", ["?x"])
//!         .with_degree_times(0.9)
//!         .named("zebra-stripes")
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! kb.run(100).unwrap();
//!
//! let pattern = vec![Some("sam".to_string())];
//! let stripes = kb.query("has-stripes", Some(&pattern));
//! assert!((stripes[0].degree - 0.72).abs() < 1e-9);
//! ```
//!
//! ## Observações de Modelo
//!
//! - A [`core::KnowledgeBase`] é um valor único e possuído; mesclagem e
//!   serialização produzem instâncias novas.
//! - Todas as operações públicas são síncronas e bloqueantes; o crate não
//!   instala subscriber de logging — apenas emite eventos `tracing`.

/// Módulo `core` — tipos fundamentais: Fact, Term, Bindings, Rule, KnowledgeBase.
pub mod core;

/// Módulo `error` — erro unificado e as quatro famílias de erro.
pub mod error;

/// Módulo `fuzzy_ops` — T-normas, T-conormas, negações e hedges.
pub mod fuzzy_ops;

/// Módulo `inference` — casador de padrões e driver de saturação.
pub mod inference;

/// Módulo `merge` — mesclagem de bases com detecção de conflitos.
pub mod merge;

/// Módulo `serialization` — round-trip com o schema textual JSON/YAML.
pub mod serialization;

// Re-exports da superfície principal do crate.
pub use crate::core::{
    Action, Bindings, Condition, DegreeConstraint, DegreeExpr, Fact, FactKey, KnowledgeBase, Rule,
    RuleBuilder, Term,
};
pub use crate::error::{FuzzyError, Result};
pub use crate::inference::{InferenceEngine, RunStats};
pub use crate::merge::{Conflict, ConflictKind, MergeStrategy, Merger};
