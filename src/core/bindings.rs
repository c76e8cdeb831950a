//! # Bindings — Ligações de Variáveis
//!
//! Durante o casamento de padrões, variáveis (`?x`, `?d`) vão sendo
//! **ligadas** a valores: símbolos ground para variáveis de termo, reais
//! para variáveis de grau. O conjunto de ligações cresce monotonicamente
//! ao longo da avaliação de uma condição e vive apenas durante a
//! avaliação de uma única regra.
//!
//! Religar uma variável já ligada só é aceito quando o novo valor
//! coincide com o existente — é assim que o casador impõe consistência
//! entre ocorrências repetidas da mesma variável.

use std::collections::BTreeMap;
use std::fmt;

/// Valor ao qual uma variável pode estar ligada.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundValue {
    /// Símbolo ground, ligado por unificação de termos.
    Symbol(String),
    /// Grau de crença, ligado pelo campo `deg` de uma condição.
    Degree(f64),
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Symbol(s) => f.write_str(s),
            BoundValue::Degree(d) => write!(f, "{d:.2}"),
        }
    }
}

/// Mapa de variável → valor, com ordem determinística de iteração.
///
/// A ordenação (BTreeMap) garante que dois conjuntos de ligações com o
/// mesmo conteúdo sejam iguais e imprimam igual — requisito para a
/// deduplicação de casamentos no OR e para logs reproduzíveis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    vars: BTreeMap<String, BoundValue>,
}

impl Bindings {
    /// Cria um conjunto de ligações vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna o valor ligado à variável, se houver.
    pub fn get(&self, variable: &str) -> Option<&BoundValue> {
        self.vars.get(variable)
    }

    /// Retorna o símbolo ligado à variável, se for uma ligação de termo.
    pub fn symbol(&self, variable: &str) -> Option<&str> {
        match self.vars.get(variable) {
            Some(BoundValue::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    /// Retorna o grau ligado à variável, se for uma ligação de grau.
    pub fn degree(&self, variable: &str) -> Option<f64> {
        match self.vars.get(variable) {
            Some(BoundValue::Degree(d)) => Some(*d),
            _ => None,
        }
    }

    /// Liga a variável a um símbolo.
    ///
    /// Retorna `false` se a variável já estiver ligada a um valor
    /// diferente — o chamador deve então descartar o candidato.
    pub fn bind_symbol(&mut self, variable: &str, value: &str) -> bool {
        match self.vars.get(variable) {
            Some(BoundValue::Symbol(existing)) => existing == value,
            Some(BoundValue::Degree(_)) => false,
            None => {
                self.vars
                    .insert(variable.to_string(), BoundValue::Symbol(value.to_string()));
                true
            }
        }
    }

    /// Liga a variável a um grau de crença.
    ///
    /// Retorna `false` se a variável já estiver ligada a um valor
    /// diferente.
    pub fn bind_degree(&mut self, variable: &str, value: f64) -> bool {
        match self.vars.get(variable) {
            Some(BoundValue::Degree(existing)) => *existing == value,
            Some(BoundValue::Symbol(_)) => false,
            None => {
                self.vars
                    .insert(variable.to_string(), BoundValue::Degree(value));
                true
            }
        }
    }

    /// Número de variáveis ligadas.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// `true` se nenhuma variável está ligada.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Itera sobre os pares `(variável, valor)` em ordem determinística.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Formatação legível para logs: `{?d ↦ 0.80, ?x ↦ sam}`.
impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var} ↦ {value}")?;
        }
        write!(f, "}}")
    }
}
