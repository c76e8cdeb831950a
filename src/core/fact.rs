//! # Fact — Unidade Atômica de Crença
//!
//! Um [`Fact`] é a menor unidade de conhecimento do motor: a tripla
//! `(predicado, argumentos, grau)`, onde o grau é uma crença em [0,1].
//!
//! ## Identidade e Valor
//!
//! A **identidade** de um fato é o par `(predicado, argumentos)` — o
//! [`FactKey`]. O grau é o único componente mutável: ao reinserir um fato
//! com a mesma chave, o registro armazenado é **substituído** (nunca
//! mutado no lugar), com o grau combinado por fuzzy-OR.
//!
//! ## Termos e Variáveis
//!
//! Fatos armazenados contêm apenas **símbolos ground**. Variáveis — nomes
//! iniciados por `?` — aparecem somente em condições, ações e consultas,
//! representadas pelo tipo [`Term`].
//!
//! ## Exemplo
//!
//! ```rust
//! use fuzzy_infer::core::Fact;
//!
//! let fato = Fact::new("is-zebra", ["sam"], 0.8).unwrap();
//! assert_eq!(fato.predicate, "is-zebra");
//! assert!((fato.degree - 0.8).abs() < 1e-12);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Identidade de um fato na base: o par `(predicado, argumentos)`.
pub type FactKey = (String, Vec<String>);

/// Um termo em uma condição, ação ou consulta.
///
/// A convenção textual `?nome` identifica variáveis; o tipo preserva a
/// forma impressa completa (com o `?`) para diagnósticos e serialização.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// Símbolo ground — um identificador opaco (ex: `"sam"`).
    Symbol(String),
    /// Variável — nome iniciado por `?` (ex: `"?x"`).
    Variable(String),
}

impl Term {
    /// Interpreta uma string segundo a convenção `?`: prefixo `?` produz
    /// [`Term::Variable`], qualquer outra forma produz [`Term::Symbol`].
    pub fn parse(text: impl Into<String>) -> Term {
        let text = text.into();
        if text.starts_with('?') {
            Term::Variable(text)
        } else {
            Term::Symbol(text)
        }
    }

    /// Retorna a forma impressa do termo (variáveis mantêm o `?`).
    pub fn as_str(&self) -> &str {
        match self {
            Term::Symbol(s) | Term::Variable(s) => s,
        }
    }

    /// `true` se o termo é uma variável.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fato fuzzy — tripla `(predicado, argumentos, grau de crença)`.
///
/// O tipo é um **valor**: não possui identidade própria além da chave
/// `(predicado, argumentos)`. A forma serializada segue o schema textual
/// `{"pred": ..., "args": [...], "deg": ...}`, com grau padrão `1.0`
/// quando omitido.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Nome do predicado (ex: `"is-zebra"`). Nunca vazio.
    #[serde(rename = "pred")]
    pub predicate: String,

    /// Sequência ordenada de símbolos ground.
    #[serde(default)]
    pub args: Vec<String>,

    /// Grau de crença em [0,1]. `0` = totalmente descrido, `1` = certo.
    #[serde(rename = "deg", default = "default_degree")]
    pub degree: f64,
}

/// Grau assumido quando o schema textual omite o campo `deg`.
fn default_degree() -> f64 {
    1.0
}

impl Fact {
    /// Cria um fato validado.
    ///
    /// # Erros
    ///
    /// Retorna erro de validação se o predicado for vazio ou o grau
    /// estiver fora de [0,1].
    ///
    /// # Exemplo
    ///
    /// ```rust
    /// use fuzzy_infer::core::Fact;
    ///
    /// let ok = Fact::new("rainy", ["today"], 0.4);
    /// assert!(ok.is_ok());
    ///
    /// let ruim = Fact::new("rainy", ["today"], 1.4);
    /// assert!(ruim.is_err());
    /// ```
    pub fn new<P, A, S>(predicate: P, args: A, degree: f64) -> Result<Fact>
    where
        P: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fact = Fact {
            predicate: predicate.into(),
            args: args.into_iter().map(Into::into).collect(),
            degree,
        };
        fact.validate()?;
        Ok(fact)
    }

    /// Valida os invariantes estruturais do fato.
    ///
    /// Chamada por todo caminho de ingestão (`add_fact`, parser do
    /// schema), já que os campos são públicos.
    pub fn validate(&self) -> Result<()> {
        if self.predicate.is_empty() {
            return Err(ValidationError::EmptyPredicate.into());
        }
        if !(0.0..=1.0).contains(&self.degree) {
            return Err(ValidationError::DegreeOutOfRange {
                degree: self.degree,
            }
            .into());
        }
        Ok(())
    }

    /// Retorna a identidade `(predicado, argumentos)` do fato.
    pub fn key(&self) -> FactKey {
        (self.predicate.clone(), self.args.clone())
    }
}

/// Formatação legível: `predicado(arg1, arg2) [deg=0.80]`.
impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) [deg={:.2}]",
            self.predicate,
            self.args.join(", "),
            self.degree
        )
    }
}
