//! # Mesclagem — Combinação de Bases com Detecção de Conflitos
//!
//! O [`Merger`] combina duas bases de conhecimento plenamente formadas em
//! uma terceira, **sem** executar inferência e **sem mutar** as entradas.
//!
//! ## Estratégias
//!
//! | Estratégia | Fatos | Regras |
//! |------------|-------|--------|
//! | [`Union`](MergeStrategy::Union) | fuzzy-OR em duplicatas | todas de ambas |
//! | [`Override`](MergeStrategy::Override) | KB2 define incondicionalmente | KB2 substitui mesmo nome |
//! | [`Complement`](MergeStrategy::Complement) | só chaves ausentes da KB1 | só identidades ausentes |
//! | [`Weighted`](MergeStrategy::Weighted) | média ponderada em duplicatas | união |
//! | [`Smart`](MergeStrategy::Smart) | resolução por conflito detectado | idem |
//!
//! ## Tipos de Conflito
//!
//! | Tipo | Condição | Severidade |
//! |------|----------|------------|
//! | [`FactContradiction`](ConflictKind::FactContradiction) | mesma chave, `\|d₁−d₂\| ≥ limiar` | `\|d₁−d₂\|` |
//! | [`MutualExclusion`](ConflictKind::MutualExclusion) | mesmo sujeito em família de exclusão declarada | `min(d₁, d₂)` |
//! | [`RuleConflict`](ConflictKind::RuleConflict) | mesmo nome, estrutura diferente | 1.0 |
//! | [`Subsumption`](ConflictKind::Subsumption) | condições de uma ⊋ da outra, mesmas ações | 0.3 |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::fact::{Fact, FactKey};
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::rule::{Rule, RuleIdentity};
use crate::error::{MergeError, Result};

/// Estratégia de mesclagem de duas bases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Inclui tudo de ambas; duplicatas colapsam por fuzzy-OR (máximo).
    Union,
    /// Parte da KB1; a KB2 define graus incondicionalmente e substitui
    /// regras de mesmo nome.
    Override,
    /// Parte da KB1; da KB2 entram apenas fatos de chave ausente e
    /// regras de identidade ausente.
    Complement,
    /// Fatos presentes em ambas recebem `(w₁·d₁ + w₂·d₂)/(w₁+w₂)`;
    /// exige pesos não-negativos com soma positiva. Regras seguem Union.
    Weighted,
    /// Detecta conflitos; com `auto_resolve` aplica a resolução sugerida
    /// de cada conflito, senão recai em Union registrando a lista.
    Smart,
}

impl MergeStrategy {
    /// Rótulo textual da estratégia.
    pub fn label(&self) -> &'static str {
        match self {
            MergeStrategy::Union => "union",
            MergeStrategy::Override => "override",
            MergeStrategy::Complement => "complement",
            MergeStrategy::Weighted => "weighted",
            MergeStrategy::Smart => "smart",
        }
    }
}

/// Tipo de um conflito detectado entre duas bases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// Mesma chave com graus distantes além do limiar.
    FactContradiction,
    /// Fatos sobre o mesmo sujeito em uma família de exclusão declarada.
    MutualExclusion,
    /// Regras de mesmo nome com condições ou ações estruturalmente
    /// diferentes.
    RuleConflict,
    /// Condições de uma regra são superconjunto estrito das de outra,
    /// com ações idênticas.
    Subsumption,
}

impl ConflictKind {
    /// Rótulo legível em PT-BR, usado no relatório de conflitos.
    pub fn label(&self) -> &'static str {
        match self {
            ConflictKind::FactContradiction => "Contradição de fatos",
            ConflictKind::MutualExclusion => "Exclusão mútua",
            ConflictKind::RuleConflict => "Conflito de regras",
            ConflictKind::Subsumption => "Subsunção",
        }
    }
}

/// Item de uma das bases envolvido em um conflito.
#[derive(Clone, Debug)]
pub enum ConflictItem {
    Fact(Fact),
    Rule(Rule),
}

impl fmt::Display for ConflictItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictItem::Fact(fact) => fact.fmt(f),
            ConflictItem::Rule(rule) => rule.fmt(f),
        }
    }
}

/// Um conflito detectado entre a KB1 e a KB2.
#[derive(Clone, Debug)]
pub struct Conflict {
    /// Tipo do conflito.
    pub kind: ConflictKind,
    /// Severidade em [0,1] — conflitos mais graves vêm primeiro.
    pub severity: f64,
    /// Item da KB1 envolvido.
    pub kb1_item: ConflictItem,
    /// Item da KB2 envolvido.
    pub kb2_item: ConflictItem,
    /// Descrição legível do conflito.
    pub description: String,
    /// Resolução sugerida, aplicada pelo modo `auto_resolve`.
    pub suggested_resolution: String,
}

/// Mesclador de bases de conhecimento com detecção de conflitos.
///
/// O mesclador é **puro** em relação às entradas: `merge` recebe as duas
/// bases por referência imutável e produz uma base nova. A lista de
/// conflitos da última mesclagem fica disponível em
/// [`conflicts`](Merger::conflicts) e [`conflict_report`](Merger::conflict_report).
///
/// ## Exemplo
///
/// ```rust
/// use fuzzy_infer::core::{Fact, KnowledgeBase};
/// use fuzzy_infer::merge::{Merger, MergeStrategy};
///
/// let mut kb1 = KnowledgeBase::new();
/// kb1.add_fact(Fact::new("age", ["alice", "young"], 0.9).unwrap()).unwrap();
/// let mut kb2 = KnowledgeBase::new();
/// kb2.add_fact(Fact::new("age", ["alice", "young"], 0.1).unwrap()).unwrap();
///
/// let mut merger = Merger::new();
/// let merged = merger
///     .merge(&kb1, &kb2, MergeStrategy::Smart, None, true)
///     .unwrap();
/// assert_eq!(merged.fact_count(), 1);
/// assert_eq!(merger.conflicts().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Merger {
    /// Limiar de contradição de fatos (diferença de grau), em [0,1].
    threshold: f64,
    /// Famílias de exclusão: conjuntos de predicados dos quais no máximo
    /// um pode valer para um mesmo sujeito.
    exclusion_families: Vec<BTreeSet<String>>,
    /// Em modo estrito, SMART sem `auto_resolve` falha se houver conflitos.
    strict: bool,
    /// Conflitos da última mesclagem, em severidade decrescente.
    conflicts: Vec<Conflict>,
}

impl Default for Merger {
    fn default() -> Self {
        Merger {
            threshold: 0.5,
            exclusion_families: Vec::new(),
            strict: false,
            conflicts: Vec::new(),
        }
    }
}

impl Merger {
    /// Cria um mesclador com limiar padrão 0.5.
    pub fn new() -> Self {
        Merger::default()
    }

    /// Define o limiar de contradição de fatos (saturado em [0,1]).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Declara uma família de exclusão mútua de predicados.
    pub fn with_exclusion_family<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_families
            .push(predicates.into_iter().map(Into::into).collect());
        self
    }

    /// Ativa o modo estrito: SMART sem `auto_resolve` falha em conflito.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Mescla duas bases segundo a estratégia.
    ///
    /// `weights` é exigido apenas por [`MergeStrategy::Weighted`];
    /// `auto_resolve` só tem efeito em [`MergeStrategy::Smart`].
    ///
    /// # Erros
    ///
    /// - `MissingWeights`/`InvalidWeights` sob WEIGHTED;
    /// - `UnresolvedConflicts` sob SMART em modo estrito sem
    ///   `auto_resolve` com conflitos detectados.
    pub fn merge(
        &mut self,
        kb1: &KnowledgeBase,
        kb2: &KnowledgeBase,
        strategy: MergeStrategy,
        weights: Option<(f64, f64)>,
        auto_resolve: bool,
    ) -> Result<KnowledgeBase> {
        self.conflicts.clear();
        tracing::debug!(estrategia = strategy.label(), "mesclagem iniciada");

        match strategy {
            MergeStrategy::Union => self.union_merge(kb1, kb2),
            MergeStrategy::Override => self.override_merge(kb1, kb2),
            MergeStrategy::Complement => self.complement_merge(kb1, kb2),
            MergeStrategy::Weighted => {
                let (w1, w2) = weights.ok_or(MergeError::MissingWeights)?;
                if w1 < 0.0 || w2 < 0.0 || w1 + w2 <= 0.0 {
                    return Err(MergeError::InvalidWeights { w1, w2 }.into());
                }
                self.weighted_merge(kb1, kb2, w1, w2)
            }
            MergeStrategy::Smart => self.smart_merge(kb1, kb2, auto_resolve),
        }
    }

    /// Conflitos detectados pela última mesclagem, severidade decrescente.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Relatório legível dos conflitos, agrupado por tipo.
    pub fn conflict_report(&self) -> String {
        if self.conflicts.is_empty() {
            return "Nenhum conflito detectado.".to_string();
        }

        let mut report = format!("Detectado(s) {} conflito(s):\n\n", self.conflicts.len());
        let mut by_kind: BTreeMap<&'static str, Vec<&Conflict>> = BTreeMap::new();
        for conflict in &self.conflicts {
            by_kind.entry(conflict.kind.label()).or_default().push(conflict);
        }

        for (label, conflicts) in by_kind {
            report.push_str(&format!("{} ({}):\n", label, conflicts.len()));
            for conflict in conflicts.iter().take(3) {
                report.push_str(&format!("  - {}\n", conflict.description));
                report.push_str(&format!("    Sugestão: {}\n", conflict.suggested_resolution));
            }
            if conflicts.len() > 3 {
                report.push_str(&format!("  ... e mais {}\n", conflicts.len() - 3));
            }
            report.push('\n');
        }

        report
    }

    // ------------------------------------------------------------------
    // Estratégias
    // ------------------------------------------------------------------

    fn union_merge(&self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) -> Result<KnowledgeBase> {
        let mut result = KnowledgeBase::new();
        for fact in kb1.facts().chain(kb2.facts()) {
            result.add_fact(fact.clone())?;
        }
        for rule in kb1.rules().iter().chain(kb2.rules()) {
            result.add_rule(rule.clone())?;
        }
        Ok(result)
    }

    fn override_merge(&self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) -> Result<KnowledgeBase> {
        let mut result = KnowledgeBase::new();
        for fact in kb1.facts() {
            result.add_fact(fact.clone())?;
        }
        // A KB2 define graus incondicionalmente — pode diminuí-los
        for fact in kb2.facts() {
            result.set_fact(fact.clone())?;
        }

        let kb2_names: BTreeSet<&str> = kb2
            .rules()
            .iter()
            .filter_map(|r| r.name.as_deref())
            .collect();
        for rule in kb1.rules() {
            let replaced = rule
                .name
                .as_deref()
                .map(|name| kb2_names.contains(name))
                .unwrap_or(false);
            if !replaced {
                result.add_rule(rule.clone())?;
            }
        }
        for rule in kb2.rules() {
            result.add_rule(rule.clone())?;
        }
        Ok(result)
    }

    fn complement_merge(&self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) -> Result<KnowledgeBase> {
        let mut result = KnowledgeBase::new();
        for fact in kb1.facts() {
            result.add_fact(fact.clone())?;
        }
        for fact in kb2.facts() {
            if kb1.lookup(&fact.predicate, &fact.args).is_none() {
                result.add_fact(fact.clone())?;
            }
        }

        let kb1_identities: BTreeSet<RuleIdentity> =
            kb1.rules().iter().map(Rule::identity).collect();
        for rule in kb1.rules() {
            result.add_rule(rule.clone())?;
        }
        for rule in kb2.rules() {
            if !kb1_identities.contains(&rule.identity()) {
                result.add_rule(rule.clone())?;
            }
        }
        Ok(result)
    }

    fn weighted_merge(
        &self,
        kb1: &KnowledgeBase,
        kb2: &KnowledgeBase,
        w1: f64,
        w2: f64,
    ) -> Result<KnowledgeBase> {
        let mut result = KnowledgeBase::new();
        for fact in kb1.facts() {
            match kb2.lookup(&fact.predicate, &fact.args) {
                Some(other) => {
                    let degree = (w1 * fact.degree + w2 * other.degree) / (w1 + w2);
                    result.add_fact(Fact {
                        degree,
                        ..fact.clone()
                    })?;
                }
                None => result.add_fact(fact.clone())?,
            }
        }
        for fact in kb2.facts() {
            if kb1.lookup(&fact.predicate, &fact.args).is_none() {
                result.add_fact(fact.clone())?;
            }
        }

        for rule in kb1.rules().iter().chain(kb2.rules()) {
            result.add_rule(rule.clone())?;
        }
        Ok(result)
    }

    fn smart_merge(
        &mut self,
        kb1: &KnowledgeBase,
        kb2: &KnowledgeBase,
        auto_resolve: bool,
    ) -> Result<KnowledgeBase> {
        self.detect_conflicts(kb1, kb2);
        self.conflicts.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if !self.conflicts.is_empty() {
            tracing::warn!(total = self.conflicts.len(), "conflitos detectados na mesclagem");
            for conflict in self.conflicts.iter().take(5) {
                tracing::warn!(
                    tipo = conflict.kind.label(),
                    severidade = conflict.severity,
                    "{}",
                    conflict.description
                );
            }
        }

        if !auto_resolve {
            if self.strict && !self.conflicts.is_empty() {
                return Err(MergeError::UnresolvedConflicts {
                    count: self.conflicts.len(),
                }
                .into());
            }
            // Sem resolução automática, a mesclagem recai em UNION e a
            // lista de conflitos fica registrada para inspeção.
            return self.union_merge(kb1, kb2);
        }

        // Resoluções sugeridas para fatos: manter o maior grau; em
        // exclusão mútua o perdedor é descartado.
        let mut resolved: BTreeMap<FactKey, Fact> = BTreeMap::new();
        let mut dropped: BTreeSet<FactKey> = BTreeSet::new();
        for conflict in &self.conflicts {
            if let (ConflictItem::Fact(f1), ConflictItem::Fact(f2)) =
                (&conflict.kb1_item, &conflict.kb2_item)
            {
                match conflict.kind {
                    ConflictKind::FactContradiction => {
                        let keep = if f2.degree > f1.degree { f2 } else { f1 };
                        resolved.insert(keep.key(), keep.clone());
                    }
                    ConflictKind::MutualExclusion => {
                        let loser = if f2.degree > f1.degree { f1 } else { f2 };
                        dropped.insert(loser.key());
                    }
                    _ => {}
                }
            }
        }

        let mut result = KnowledgeBase::new();
        for fact in kb1.facts().chain(kb2.facts()) {
            let key = fact.key();
            if dropped.contains(&key) {
                continue;
            }
            match resolved.get(&key) {
                Some(keeper) => {
                    result.set_fact(keeper.clone())?;
                }
                None => result.add_fact(fact.clone())?,
            }
        }

        // Resoluções sugeridas para regras: conflito de nome fica com a
        // maior prioridade (empate pende para a KB1); subsunção fica com
        // a mais específica (mais condições).
        let mut skip_kb1: BTreeSet<RuleIdentity> = BTreeSet::new();
        let mut skip_kb2: BTreeSet<RuleIdentity> = BTreeSet::new();
        for conflict in &self.conflicts {
            if let (ConflictItem::Rule(r1), ConflictItem::Rule(r2)) =
                (&conflict.kb1_item, &conflict.kb2_item)
            {
                match conflict.kind {
                    ConflictKind::RuleConflict => {
                        if r2.priority > r1.priority {
                            skip_kb1.insert(r1.identity());
                        } else {
                            skip_kb2.insert(r2.identity());
                        }
                    }
                    ConflictKind::Subsumption => {
                        if r1.conditions.len() < r2.conditions.len() {
                            skip_kb1.insert(r1.identity());
                        } else {
                            skip_kb2.insert(r2.identity());
                        }
                    }
                    _ => {}
                }
            }
        }

        for rule in kb1.rules() {
            if !skip_kb1.contains(&rule.identity()) {
                result.add_rule(rule.clone())?;
            }
        }
        for rule in kb2.rules() {
            if !skip_kb2.contains(&rule.identity()) {
                result.add_rule(rule.clone())?;
            }
        }
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Detecção de conflitos
    // ------------------------------------------------------------------

    fn detect_conflicts(&mut self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) {
        self.detect_fact_contradictions(kb1, kb2);
        self.detect_mutual_exclusions(kb1, kb2);
        self.detect_rule_conflicts(kb1, kb2);
        self.detect_subsumptions(kb1, kb2);
    }

    /// Mesma chave, graus distantes além do limiar.
    fn detect_fact_contradictions(&mut self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) {
        for fact2 in kb2.facts() {
            let Some(fact1) = kb1.lookup(&fact2.predicate, &fact2.args) else {
                continue;
            };
            let diff = (fact1.degree - fact2.degree).abs();
            if diff >= self.threshold {
                let winner = if fact1.degree >= fact2.degree { "KB1" } else { "KB2" };
                self.conflicts.push(Conflict {
                    kind: ConflictKind::FactContradiction,
                    severity: diff,
                    kb1_item: ConflictItem::Fact(fact1.clone()),
                    kb2_item: ConflictItem::Fact(fact2.clone()),
                    description: format!(
                        "{}({}): {:.2} vs {:.2}",
                        fact1.predicate,
                        fact1.args.join(", "),
                        fact1.degree,
                        fact2.degree
                    ),
                    suggested_resolution: format!("manter o maior grau ({winner})"),
                });
            }
        }
    }

    /// Fatos de uma família de exclusão sobre o mesmo sujeito.
    ///
    /// Conta como conflito: predicados distintos da família, ou o mesmo
    /// predicado com argumentos restantes diferentes (duas espécies
    /// atribuídas ao mesmo indivíduo). A chave idêntica não conflita —
    /// é o mesmo fato.
    fn detect_mutual_exclusions(&mut self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) {
        for family in &self.exclusion_families {
            let kb1_family: Vec<&Fact> = kb1
                .facts()
                .filter(|f| family.contains(&f.predicate) && !f.args.is_empty())
                .collect();
            for fact2 in kb2.facts() {
                if !family.contains(&fact2.predicate) || fact2.args.is_empty() {
                    continue;
                }
                for fact1 in &kb1_family {
                    if fact1.args[0] != fact2.args[0] {
                        continue;
                    }
                    let conflicting = fact1.predicate != fact2.predicate
                        || fact1.args != fact2.args;
                    if !conflicting {
                        continue;
                    }
                    self.conflicts.push(Conflict {
                        kind: ConflictKind::MutualExclusion,
                        severity: fact1.degree.min(fact2.degree),
                        kb1_item: ConflictItem::Fact((*fact1).clone()),
                        kb2_item: ConflictItem::Fact(fact2.clone()),
                        description: format!(
                            "exclusão para o sujeito {}: {} vs {}",
                            fact1.args[0], fact1, fact2
                        ),
                        suggested_resolution:
                            "manter o maior grau e anotar a incerteza".to_string(),
                    });
                }
            }
        }
    }

    /// Regras de mesmo nome com estrutura diferente.
    fn detect_rule_conflicts(&mut self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) {
        let kb1_named: BTreeMap<&str, &Rule> = kb1
            .rules()
            .iter()
            .filter_map(|r| r.name.as_deref().map(|name| (name, r)))
            .collect();
        for rule2 in kb2.rules() {
            let Some(name) = rule2.name.as_deref() else {
                continue;
            };
            let Some(rule1) = kb1_named.get(name) else {
                continue;
            };
            if rule1.conditions != rule2.conditions || rule1.actions != rule2.actions {
                let winner = if rule2.priority > rule1.priority { "KB2" } else { "KB1" };
                self.conflicts.push(Conflict {
                    kind: ConflictKind::RuleConflict,
                    severity: 1.0,
                    kb1_item: ConflictItem::Rule((*rule1).clone()),
                    kb2_item: ConflictItem::Rule(rule2.clone()),
                    description: format!("implementações divergentes da regra '{name}'"),
                    suggested_resolution: format!(
                        "manter a maior prioridade ({winner}; empate pende para a KB1)"
                    ),
                });
            }
        }
    }

    /// Condições de uma regra são superconjunto estrito das de outra,
    /// com ações idênticas.
    fn detect_subsumptions(&mut self, kb1: &KnowledgeBase, kb2: &KnowledgeBase) {
        for rule1 in kb1.rules() {
            for rule2 in kb2.rules() {
                let subsumes = rule_subsumes(rule1, rule2) || rule_subsumes(rule2, rule1);
                if !subsumes {
                    continue;
                }
                let specific = if rule1.conditions.len() > rule2.conditions.len() {
                    rule1
                } else {
                    rule2
                };
                self.conflicts.push(Conflict {
                    kind: ConflictKind::Subsumption,
                    severity: 0.3,
                    kb1_item: ConflictItem::Rule(rule1.clone()),
                    kb2_item: ConflictItem::Rule(rule2.clone()),
                    description: format!(
                        "'{rule1}' e '{rule2}' têm as mesmas ações com condições aninhadas"
                    ),
                    suggested_resolution: format!("manter a mais específica ('{specific}')"),
                });
            }
        }
    }
}

/// `general` subsume `specific`: mesmas ações e condições de `general`
/// formam subconjunto estrito das de `specific`.
fn rule_subsumes(general: &Rule, specific: &Rule) -> bool {
    general.actions == specific.actions
        && general.conditions.len() < specific.conditions.len()
        && general
            .conditions
            .iter()
            .all(|cond| specific.conditions.contains(cond))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rule::RuleBuilder;

    fn fact(pred: &str, args: &[&str], deg: f64) -> Fact {
        Fact::new(pred, args.iter().copied(), deg).unwrap()
    }

    fn kb_with(facts: &[(&str, &[&str], f64)]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        for (pred, args, deg) in facts {
            kb.add_fact(fact(pred, args, *deg)).unwrap();
        }
        kb
    }

    fn degree_of(kb: &KnowledgeBase, pred: &str, args: &[&str]) -> f64 {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        kb.lookup(pred, &args).expect("fato ausente").degree
    }

    /// UNION colapsa duplicatas pelo máximo e é comutativa.
    #[test]
    fn test_union_merge_commutative() {
        let kb1 = kb_with(&[("p", &["a"], 0.4), ("q", &["b"], 1.0)]);
        let kb2 = kb_with(&[("p", &["a"], 0.7), ("r", &["c"], 0.5)]);

        let mut merger = Merger::new();
        let ab = merger
            .merge(&kb1, &kb2, MergeStrategy::Union, None, false)
            .unwrap();
        let ba = merger
            .merge(&kb2, &kb1, MergeStrategy::Union, None, false)
            .unwrap();

        assert_eq!(ab.fact_count(), 3);
        assert!((degree_of(&ab, "p", &["a"]) - 0.7).abs() < 1e-12);
        let facts_ab: Vec<Fact> = ab.facts().cloned().collect();
        let facts_ba: Vec<Fact> = ba.facts().cloned().collect();
        assert_eq!(facts_ab, facts_ba);
    }

    /// A mesclagem nunca muta as entradas.
    #[test]
    fn test_merge_is_pure() {
        let kb1 = kb_with(&[("p", &["a"], 0.4)]);
        let kb2 = kb_with(&[("p", &["a"], 0.9)]);
        let before1: Vec<Fact> = kb1.facts().cloned().collect();
        let before2: Vec<Fact> = kb2.facts().cloned().collect();

        let mut merger = Merger::new();
        merger
            .merge(&kb1, &kb2, MergeStrategy::Union, None, false)
            .unwrap();

        assert_eq!(before1, kb1.facts().cloned().collect::<Vec<_>>());
        assert_eq!(before2, kb2.facts().cloned().collect::<Vec<_>>());
    }

    /// OVERRIDE: a KB2 define o grau mesmo quando menor, e substitui a
    /// regra de mesmo nome.
    #[test]
    fn test_override_merge() {
        let mut kb1 = kb_with(&[("p", &["a"], 0.9), ("q", &["b"], 0.5)]);
        kb1.add_rule(
            RuleBuilder::new()
                .when("p", ["?x"])
                .then_add("r1-old", ["?x"])
                .named("shared")
                .build()
                .unwrap(),
        )
        .unwrap();

        let mut kb2 = kb_with(&[("p", &["a"], 0.2)]);
        kb2.add_rule(
            RuleBuilder::new()
                .when("p", ["?x"])
                .then_add("r1-new", ["?x"])
                .named("shared")
                .build()
                .unwrap(),
        )
        .unwrap();

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Override, None, false)
            .unwrap();

        assert!((degree_of(&merged, "p", &["a"]) - 0.2).abs() < 1e-12);
        assert!((degree_of(&merged, "q", &["b"]) - 0.5).abs() < 1e-12);
        assert_eq!(merged.rule_count(), 1);
        let template = merged.rules()[0].actions[0].template();
        assert_eq!(template.predicate, "r1-new");
    }

    /// COMPLEMENT: só entram chaves e identidades ausentes da KB1.
    #[test]
    fn test_complement_merge() {
        let kb1 = kb_with(&[("p", &["a"], 0.9)]);
        let kb2 = kb_with(&[("p", &["a"], 0.1), ("q", &["b"], 0.6)]);

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Complement, None, false)
            .unwrap();

        assert!((degree_of(&merged, "p", &["a"]) - 0.9).abs() < 1e-12);
        assert!((degree_of(&merged, "q", &["b"]) - 0.6).abs() < 1e-12);
    }

    /// COMPLEMENT não duplica regras anônimas estruturalmente idênticas.
    #[test]
    fn test_complement_rule_identity() {
        let mk = || {
            RuleBuilder::new()
                .when("p", ["?x"])
                .then_add("q", ["?x"])
                .build()
                .unwrap()
        };
        let mut kb1 = KnowledgeBase::new();
        kb1.add_rule(mk()).unwrap();
        let mut kb2 = KnowledgeBase::new();
        kb2.add_rule(mk()).unwrap();
        kb2.add_rule(
            RuleBuilder::new()
                .when("p", ["?x"])
                .then_add("z", ["?x"])
                .build()
                .unwrap(),
        )
        .unwrap();

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Complement, None, false)
            .unwrap();
        assert_eq!(merged.rule_count(), 2);
    }

    /// WEIGHTED: média ponderada para chaves comuns, original nas demais.
    #[test]
    fn test_weighted_merge() {
        let kb1 = kb_with(&[("p", &["a"], 0.8), ("only1", &["x"], 0.5)]);
        let kb2 = kb_with(&[("p", &["a"], 0.4), ("only2", &["y"], 0.9)]);

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Weighted, Some((0.7, 0.3)), false)
            .unwrap();

        // (0.7·0.8 + 0.3·0.4) / 1.0 = 0.68
        assert!((degree_of(&merged, "p", &["a"]) - 0.68).abs() < 1e-9);
        assert!((degree_of(&merged, "only1", &["x"]) - 0.5).abs() < 1e-12);
        assert!((degree_of(&merged, "only2", &["y"]) - 0.9).abs() < 1e-12);
    }

    /// WEIGHTED exige pesos presentes, não-negativos e de soma positiva.
    #[test]
    fn test_weighted_merge_validates_weights() {
        let kb1 = KnowledgeBase::new();
        let kb2 = KnowledgeBase::new();
        let mut merger = Merger::new();

        assert!(matches!(
            merger.merge(&kb1, &kb2, MergeStrategy::Weighted, None, false),
            Err(crate::error::FuzzyError::Merge(MergeError::MissingWeights))
        ));
        assert!(matches!(
            merger.merge(&kb1, &kb2, MergeStrategy::Weighted, Some((0.0, 0.0)), false),
            Err(crate::error::FuzzyError::Merge(
                MergeError::InvalidWeights { .. }
            ))
        ));
        assert!(matches!(
            merger.merge(&kb1, &kb2, MergeStrategy::Weighted, Some((-0.2, 0.5)), false),
            Err(crate::error::FuzzyError::Merge(
                MergeError::InvalidWeights { .. }
            ))
        ));
    }

    /// Cenário SMART: contradição 0.9 vs 0.1 com limiar 0.5 — mantém o
    /// maior grau e reporta severidade 0.8.
    #[test]
    fn test_smart_merge_contradiction_scenario() {
        let kb1 = kb_with(&[("age", &["alice", "young"], 0.9)]);
        let kb2 = kb_with(&[("age", &["alice", "young"], 0.1)]);

        let mut merger = Merger::new().with_threshold(0.5);
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, true)
            .unwrap();

        assert!((degree_of(&merged, "age", &["alice", "young"]) - 0.9).abs() < 1e-12);
        assert_eq!(merger.conflicts().len(), 1);
        let conflict = &merger.conflicts()[0];
        assert_eq!(conflict.kind, ConflictKind::FactContradiction);
        assert!((conflict.severity - 0.8).abs() < 1e-9);
    }

    /// SMART sem `auto_resolve` recai em UNION, registrando os conflitos.
    #[test]
    fn test_smart_without_auto_resolve_defers_to_union() {
        let kb1 = kb_with(&[("age", &["alice", "young"], 0.9)]);
        let kb2 = kb_with(&[("age", &["alice", "young"], 0.1)]);

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, false)
            .unwrap();

        // UNION: fuzzy-OR fica com o máximo
        assert!((degree_of(&merged, "age", &["alice", "young"]) - 0.9).abs() < 1e-12);
        assert_eq!(merger.conflicts().len(), 1);
        assert!(merger.conflict_report().contains("Contradição de fatos"));
    }

    /// Modo estrito: SMART sem resolução automática falha em conflito.
    #[test]
    fn test_smart_strict_mode_fails() {
        let kb1 = kb_with(&[("age", &["alice", "young"], 0.9)]);
        let kb2 = kb_with(&[("age", &["alice", "young"], 0.1)]);

        let mut merger = Merger::new().strict(true);
        assert!(matches!(
            merger.merge(&kb1, &kb2, MergeStrategy::Smart, None, false),
            Err(crate::error::FuzzyError::Merge(
                MergeError::UnresolvedConflicts { count: 1 }
            ))
        ));
    }

    /// Exclusão mútua: duas espécies para o mesmo indivíduo; a resolução
    /// descarta o grau menor.
    #[test]
    fn test_mutual_exclusion_family() {
        let kb1 = kb_with(&[("species", &["rover", "dog"], 0.9)]);
        let kb2 = kb_with(&[("species", &["rover", "wolf"], 0.6)]);

        let mut merger = Merger::new().with_exclusion_family(["species"]);
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, true)
            .unwrap();

        let conflict = &merger.conflicts()[0];
        assert_eq!(conflict.kind, ConflictKind::MutualExclusion);
        assert!((conflict.severity - 0.6).abs() < 1e-12);

        assert!((degree_of(&merged, "species", &["rover", "dog"]) - 0.9).abs() < 1e-12);
        assert!(merged
            .lookup("species", &["rover".to_string(), "wolf".to_string()])
            .is_none());
    }

    /// Predicados distintos da mesma família também se excluem.
    #[test]
    fn test_mutual_exclusion_across_predicates() {
        let kb1 = kb_with(&[("is-carnivore", &["rex"], 0.8)]);
        let kb2 = kb_with(&[("is-herbivore", &["rex"], 0.7)]);

        let mut merger = Merger::new().with_exclusion_family(["is-carnivore", "is-herbivore"]);
        merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, false)
            .unwrap();
        assert_eq!(merger.conflicts().len(), 1);
        assert_eq!(merger.conflicts()[0].kind, ConflictKind::MutualExclusion);
    }

    /// Conflito de regras: mesmo nome, estrutura diferente — fica a de
    /// maior prioridade, com empate pendendo para a KB1.
    #[test]
    fn test_rule_conflict_resolution() {
        let mut kb1 = KnowledgeBase::new();
        kb1.add_rule(
            RuleBuilder::new()
                .when("p", ["?x"])
                .then_add("from-kb1", ["?x"])
                .named("shared")
                .with_priority(1)
                .build()
                .unwrap(),
        )
        .unwrap();
        let mut kb2 = KnowledgeBase::new();
        kb2.add_rule(
            RuleBuilder::new()
                .when("p", ["?x"])
                .then_add("from-kb2", ["?x"])
                .named("shared")
                .with_priority(5)
                .build()
                .unwrap(),
        )
        .unwrap();

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, true)
            .unwrap();

        let conflict = &merger.conflicts()[0];
        assert_eq!(conflict.kind, ConflictKind::RuleConflict);
        assert!((conflict.severity - 1.0).abs() < 1e-12);

        assert_eq!(merged.rule_count(), 1);
        assert_eq!(
            merged.rules()[0].actions[0].template().predicate,
            "from-kb2"
        );
    }

    /// Subsunção: mesmas ações, condições aninhadas — fica a mais
    /// específica.
    #[test]
    fn test_subsumption_resolution() {
        let general = RuleBuilder::new()
            .when("is-bird", ["?x"])
            .then_add("can-fly", ["?x"])
            .build()
            .unwrap();
        let specific = RuleBuilder::new()
            .when("is-bird", ["?x"])
            .when("has-wings", ["?x"])
            .then_add("can-fly", ["?x"])
            .build()
            .unwrap();

        let mut kb1 = KnowledgeBase::new();
        kb1.add_rule(general).unwrap();
        let mut kb2 = KnowledgeBase::new();
        kb2.add_rule(specific).unwrap();

        let mut merger = Merger::new();
        let merged = merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, true)
            .unwrap();

        let conflict = &merger.conflicts()[0];
        assert_eq!(conflict.kind, ConflictKind::Subsumption);
        assert!((conflict.severity - 0.3).abs() < 1e-12);

        assert_eq!(merged.rule_count(), 1);
        assert_eq!(merged.rules()[0].conditions.len(), 2);
    }

    /// Relatório vazio e relatório agrupado.
    #[test]
    fn test_conflict_report() {
        let merger = Merger::new();
        assert_eq!(merger.conflict_report(), "Nenhum conflito detectado.");

        let kb1 = kb_with(&[("p", &["a"], 1.0)]);
        let kb2 = kb_with(&[("p", &["a"], 0.1)]);
        let mut merger = Merger::new();
        merger
            .merge(&kb1, &kb2, MergeStrategy::Smart, None, false)
            .unwrap();
        let report = merger.conflict_report();
        assert!(report.contains("Detectado(s) 1 conflito(s)"));
        assert!(report.contains("Sugestão:"));
    }
}
