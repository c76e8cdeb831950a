//! # Erros — Tipos de Erro do Motor de Inferência
//!
//! Este módulo define o tipo de erro unificado [`FuzzyError`] e os
//! sub-tipos por domínio. O motor distingue **quatro famílias** de erro,
//! cada uma entregue de forma síncrona ao chamador:
//!
//! | Família | Quando ocorre |
//! |---------|---------------|
//! | [`ValidationError`] | Fato ou regra malformados, detectados na ingestão |
//! | [`InferenceError`] | Falhas durante o `run` — não-convergência, divisão por zero |
//! | [`SerializationError`] | Violações de schema no load, falhas de I/O |
//! | [`MergeError`] | Pesos inválidos, conflitos não resolvidos em modo estrito |
//!
//! Os erros são **entregues, não recuperados**: o driver aborta o `run`
//! atual sem aplicar a ação ofensora, mas fatos adicionados por ações
//! anteriores do mesmo passo permanecem na base.

use thiserror::Error;

/// Alias de resultado usado em todo o crate.
pub type Result<T> = std::result::Result<T, FuzzyError>;

/// Tipo de erro unificado do motor de inferência fuzzy.
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// Erro de validação — fato ou regra malformados na ingestão.
    #[error("validação: {0}")]
    Validation(#[from] ValidationError),

    /// Erro de inferência — falha durante a execução do driver.
    #[error("inferência: {0}")]
    Inference(#[from] InferenceError),

    /// Erro de serialização — schema inválido ou falha de I/O.
    #[error("serialização: {0}")]
    Serialization(#[from] SerializationError),

    /// Erro de mesclagem — configuração ou conflito irreconciliável.
    #[error("mesclagem: {0}")]
    Merge(#[from] MergeError),
}

/// Erros levantados pelo caminho de ingestão (fatos e regras).
///
/// Nunca são levantados pelo driver: toda a validação estrutural
/// acontece em `add_fact`/`add_rule` ou no parser do schema textual.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("grau fora do intervalo [0,1]: {degree}")]
    DegreeOutOfRange { degree: f64 },

    #[error("predicado não pode ser vazio")]
    EmptyPredicate,

    #[error("variável não ligada: {variable}")]
    UnboundVariable { variable: String },

    #[error("operador desconhecido: {operator}")]
    UnknownOperator { operator: String },

    #[error("lista de condições vazia")]
    EmptyConditions,

    #[error("regra sem ações")]
    NoActions,

    #[error("expressão de grau sem operandos")]
    EmptyExpression,
}

/// Erros levantados durante a execução do driver de inferência.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("ponto fixo não atingido após {limit} iterações")]
    MaxIterationsExceeded { limit: usize },

    #[error("divisão por zero em expressão de grau")]
    DivisionByZero,

    #[error("aridade incompatível para {predicate}: esperado {expected}, recebido {found}")]
    ArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
    },
}

/// Erros de serialização — violações do schema textual e falhas de I/O.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML inválido: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("falha de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema inválido: {reason}")]
    Schema { reason: String },
}

/// Erros de mesclagem de bases de conhecimento.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("estratégia WEIGHTED requer pesos")]
    MissingWeights,

    #[error("pesos inválidos: ({w1}, {w2}) — exigem-se não-negativos com soma positiva")]
    InvalidWeights { w1: f64, w2: f64 },

    #[error("{count} conflito(s) não resolvido(s) em modo estrito")]
    UnresolvedConflicts { count: usize },
}

// Conversões diretas dos erros externos para a família de serialização.
impl From<serde_json::Error> for FuzzyError {
    fn from(err: serde_json::Error) -> Self {
        FuzzyError::Serialization(SerializationError::Json(err))
    }
}

impl From<serde_yaml::Error> for FuzzyError {
    fn from(err: serde_yaml::Error) -> Self {
        FuzzyError::Serialization(SerializationError::Yaml(err))
    }
}

impl From<std::io::Error> for FuzzyError {
    fn from(err: std::io::Error) -> Self {
        FuzzyError::Serialization(SerializationError::Io(err))
    }
}
