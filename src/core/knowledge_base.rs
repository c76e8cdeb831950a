//! # KnowledgeBase — Contêiner Central de Fatos e Regras
//!
//! A [`KnowledgeBase`] é o **coração** do motor: o contêiner que armazena
//! os fatos com seus graus de crença e a base de regras ordenada por
//! prioridade, com as operações de consulta usadas pelo casador de
//! padrões e pelo driver de inferência.
//!
//! ## Armazenamento
//!
//! - **Fatos**: `BTreeMap<FactKey, Fact>` — no máximo um fato por chave
//!   `(predicado, argumentos)`, com iteração determinística;
//! - **Regras**: `Vec<Rule>` mantido ordenado por prioridade decrescente;
//!   empates preservam a ordem de inserção (ordenação estável).
//!
//! ## Combinação Fuzzy-OR
//!
//! Inserir um fato cuja chave já existe substitui o grau armazenado pelo
//! **máximo** entre o antigo e o novo — a crença nunca decresce por
//! reinserção. Veja [`KnowledgeBase::insert_or_combine`].
//!
//! ## Exemplo de Uso
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
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! kb.run(100).unwrap();
//! let listras = kb.query("has-stripes", None);
//! assert_eq!(listras.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::fact::{Fact, FactKey};
use crate::core::rule::Rule;
use crate::error::Result;
use crate::fuzzy_ops;
use crate::inference::{InferenceEngine, RunStats};
use crate::serialization;

/// Base de conhecimento in-memory: fatos + regras.
///
/// É um **valor único e possuído** — não há estado global compartilhado.
/// Serialização e mesclagem produzem instâncias novas, nunca compartilham
/// estado mutável com as fontes. O tipo não especifica thread-safety:
/// chamadores que compartilhem uma KB entre threads devem serializar o
/// acesso externamente.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    /// Fatos indexados pela identidade `(predicado, argumentos)`.
    facts: BTreeMap<FactKey, Fact>,

    /// Regras ordenadas por prioridade decrescente, inserção estável.
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// Cria uma base vazia.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Armazém de fatos
    // ------------------------------------------------------------------

    /// Insere um fato com semântica de **combinação fuzzy-OR**.
    ///
    /// Chave ausente: insere com o grau do fato. Chave presente:
    /// substitui o registro armazenado com grau `max(antigo, novo)` —
    /// a crença é monotonicamente não-decrescente sob reinserção.
    ///
    /// # Retorno
    ///
    /// `true` se a base mudou (inserção nova ou grau elevado).
    ///
    /// # Erros
    ///
    /// Erro de validação se o fato for malformado (grau fora de [0,1],
    /// predicado vazio).
    pub fn insert_or_combine(&mut self, fact: Fact) -> Result<bool> {
        fact.validate()?;
        let key = fact.key();
        match self.facts.get(&key) {
            Some(existing) => {
                let combined = fuzzy_ops::or_max(existing.degree, fact.degree);
                if combined > existing.degree {
                    tracing::debug!(
                        fato = %fact,
                        anterior = existing.degree,
                        "KB: grau combinado por fuzzy-OR"
                    );
                    self.facts.insert(key, Fact { degree: combined, ..fact });
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            None => {
                tracing::debug!(fato = %fact, "KB: fato armazenado");
                self.facts.insert(key, fact);
                Ok(true)
            }
        }
    }

    /// Adiciona um fato à base (combinação fuzzy-OR em duplicata).
    pub fn add_fact(&mut self, fact: Fact) -> Result<()> {
        self.insert_or_combine(fact).map(|_| ())
    }

    /// Adiciona múltiplos fatos à base.
    pub fn add_facts(&mut self, facts: impl IntoIterator<Item = Fact>) -> Result<()> {
        for fact in facts {
            self.add_fact(fact)?;
        }
        Ok(())
    }

    /// Substitui incondicionalmente o registro da chave do fato.
    ///
    /// É o caminho usado pela ação `modify` — diferente de
    /// [`insert_or_combine`](KnowledgeBase::insert_or_combine), o grau
    /// pode **diminuir**.
    ///
    /// # Retorno
    ///
    /// `true` se a base mudou (chave nova ou grau diferente).
    pub fn set_fact(&mut self, fact: Fact) -> Result<bool> {
        fact.validate()?;
        let key = fact.key();
        let changed = match self.facts.get(&key) {
            Some(existing) => existing.degree != fact.degree,
            None => true,
        };
        if changed {
            tracing::debug!(fato = %fact, "KB: grau definido");
            self.facts.insert(key, fact);
        }
        Ok(changed)
    }

    /// Remove o fato com a identidade dada. Idempotente.
    ///
    /// # Retorno
    ///
    /// `true` se o fato existia.
    pub fn remove_fact(&mut self, predicate: &str, args: &[String]) -> bool {
        let key = (predicate.to_string(), args.to_vec());
        let removed = self.facts.remove(&key).is_some();
        if removed {
            tracing::debug!(predicado = predicate, "KB: fato removido");
        }
        removed
    }

    /// Busca o fato com a identidade exata `(predicado, argumentos)`.
    pub fn lookup(&self, predicate: &str, args: &[String]) -> Option<&Fact> {
        let key = (predicate.to_string(), args.to_vec());
        self.facts.get(&key)
    }

    /// Itera sobre os fatos de um predicado, em ordem determinística.
    ///
    /// Usado pelo casador de padrões — a completude do casamento exige
    /// enumerar todos os candidatos, não apenas o primeiro.
    pub fn scan<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Fact> + 'a {
        self.facts
            .values()
            .filter(move |fact| fact.predicate == predicate)
    }

    /// Itera sobre todos os fatos armazenados.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.values()
    }

    /// Número de fatos armazenados.
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    // ------------------------------------------------------------------
    // Base de regras
    // ------------------------------------------------------------------

    /// Adiciona uma regra validada e reordena por prioridade decrescente.
    ///
    /// A ordenação é **estável**: regras de mesma prioridade mantêm a
    /// ordem de inserção — é essa a ordem de avaliação do driver.
    ///
    /// # Erros
    ///
    /// Erro de validação se a regra for malformada (sem ações, variável
    /// de ação ou de restrição não ligada nas condições).
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        rule.validate()?;
        tracing::debug!(regra = %rule, prioridade = rule.priority, "KB: regra armazenada");
        self.rules.push(rule);
        self.rules.sort_by_key(|r| std::cmp::Reverse(r.priority));
        Ok(())
    }

    /// Adiciona múltiplas regras à base.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<()> {
        for rule in rules {
            self.add_rule(rule)?;
        }
        Ok(())
    }

    /// Regras em ordem de avaliação (prioridade decrescente).
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Número de regras armazenadas.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Limpa toda a base — remove todos os fatos e regras.
    pub fn clear(&mut self) {
        self.facts.clear();
        self.rules.clear();
    }

    // ------------------------------------------------------------------
    // Interface de consulta
    // ------------------------------------------------------------------

    /// Consulta fatos por predicado e padrão posicional de argumentos.
    ///
    /// O padrão é opcional: `None` retorna todos os fatos do predicado.
    /// Quando presente, cada posição é `None` (curinga) ou um literal que
    /// deve coincidir; a aridade do fato deve igualar a do padrão.
    ///
    /// A consulta **não** modifica a base nem executa inferência.
    ///
    /// # Exemplo
    ///
    /// ```rust
    /// use fuzzy_infer::core::{Fact, KnowledgeBase};
    ///
    /// let mut kb = KnowledgeBase::new();
    /// kb.add_fact(Fact::new("age", ["alice", "young"], 0.9).unwrap()).unwrap();
    ///
    /// // Todos os fatos "age" de alice, qualquer valor:
    /// let padrao = vec![Some("alice".to_string()), None];
    /// assert_eq!(kb.query("age", Some(&padrao)).len(), 1);
    /// ```
    pub fn query(&self, predicate: &str, pattern: Option<&[Option<String>]>) -> Vec<&Fact> {
        self.facts
            .values()
            .filter(|fact| fact.predicate == predicate)
            .filter(|fact| match pattern {
                None => true,
                Some(pattern) => {
                    fact.args.len() == pattern.len()
                        && fact
                            .args
                            .iter()
                            .zip(pattern)
                            .all(|(arg, slot)| match slot {
                                None => true,
                                Some(literal) => arg == literal,
                            })
                }
            })
            .collect()
    }

    /// Consulta com limiar de grau mínimo, além do padrão posicional.
    pub fn query_with_min_degree(
        &self,
        predicate: &str,
        pattern: Option<&[Option<String>]>,
        min_degree: f64,
    ) -> Vec<&Fact> {
        self.query(predicate, pattern)
            .into_iter()
            .filter(|fact| fact.degree >= min_degree)
            .collect()
    }

    // ------------------------------------------------------------------
    // Conveniências: inferência e serialização
    // ------------------------------------------------------------------

    /// Executa o encadeamento progressivo até o ponto fixo.
    ///
    /// Delega ao [`InferenceEngine`] com o limite de iterações dado.
    pub fn run(&mut self, max_iterations: usize) -> Result<RunStats> {
        InferenceEngine::new(max_iterations).run(self)
    }

    /// Serializa a base para um `serde_json::Value` no schema textual.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serialization::to_value(self)
    }

    /// Reconstrói uma base a partir de um `serde_json::Value`.
    pub fn from_value(value: serde_json::Value) -> Result<KnowledgeBase> {
        serialization::from_value(value)
    }

    /// Salva a base em disco; sufixo `.yaml`/`.yml` seleciona YAML,
    /// qualquer outro seleciona JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        serialization::save_to_file(self, path)
    }

    /// Carrega uma base do disco, com o formato dado pelo sufixo.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<KnowledgeBase> {
        serialization::load_from_file(path)
    }
}
