//! # Módulo Inference — Casador de Padrões e Driver de Saturação
//!
//! Este módulo contém o **motor de inferência** propriamente dito:
//! o casador de padrões, que confronta condições com o armazém de fatos
//! produzindo todas as extensões de ligação, e o driver de encadeamento
//! progressivo, que dispara regras até o ponto fixo.
//!
//! ## Divisão de Responsabilidades
//!
//! | Componente | Papel |
//! |------------|-------|
//! | [`matcher`] | `(condição, ligações, base) → [(ligações′, grau)]`, completo |
//! | [`engine`] | passos de disparo em ordem de prioridade até o ponto fixo |
//!
//! ## Exemplo
//!
//! ```text
//! KB contém: is-zebra(sam)=0.8
//! Regra: is-zebra(?x) com ?d > 0.5  ⇒  add has-stripes(?x) com 0.9·?d
//! run ⇒ has-stripes(sam)=0.72
//! ```

/// Sub-módulo com o casador de padrões.
pub mod matcher;

/// Sub-módulo com o driver de saturação.
pub mod engine;

// Re-exports para acesso via `crate::inference::InferenceEngine`.
pub use engine::{InferenceEngine, RunStats, DEFAULT_MAX_ITERATIONS};
pub use matcher::{match_condition, match_conditions, Match};
