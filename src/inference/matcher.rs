//! # Casador de Padrões — Condições contra o Armazém de Fatos
//!
//! Dado `(condição, ligações, base)`, o casador produz o conjunto —
//! possivelmente vazio — de pares `(ligações_estendidas, grau_contribuído)`
//! sob os quais a condição é satisfeita.
//!
//! O casador é **completo**: enumera todas as extensões, não apenas a
//! primeira, porque as ações de uma regra disparam uma vez por casamento
//! distinto. A busca é força-bruta sobre o armazém — `O(|F|^C)` para `C`
//! átomos. O custo é aceito em troca da completude; indexação
//! incremental (estilo Rete) fica fora de escopo.
//!
//! ## Semântica por Combinador
//!
//! | Combinador | Casamentos | Grau contribuído |
//! |------------|------------|------------------|
//! | Átomo | um por fato unificável que passe na restrição | grau do fato |
//! | AND | produto cartesiano dobrado da esquerda para a direita | mínimo dos filhos (vazio ⇒ 1.0) |
//! | OR | união dos filhos, deduplicada por ligações iguais | máximo entre duplicatas |
//! | NOT | um, quando o filho não casa nada | 1.0 |
//!
//! NOT é negação-por-falha sobre a base e as ligações atuais, e **nunca**
//! estende ligações.

use crate::core::bindings::Bindings;
use crate::core::fact::Term;
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::rule::Condition;
use crate::fuzzy_ops;

/// Um casamento: as ligações estendidas e o grau contribuído.
pub type Match = (Bindings, f64);

/// Casa uma condição contra a base sob as ligações atuais.
///
/// Retorna todos os casamentos; vazio significa condição insatisfeita.
pub fn match_condition(condition: &Condition, bindings: &Bindings, kb: &KnowledgeBase) -> Vec<Match> {
    match condition {
        Condition::Atom {
            predicate,
            args,
            degree_var,
            degree_constraint,
        } => {
            let mut matches = Vec::new();
            for fact in kb.scan(predicate) {
                if fact.args.len() != args.len() {
                    continue;
                }
                let mut candidate = bindings.clone();
                let mut unified = true;
                for (term, value) in args.iter().zip(&fact.args) {
                    let ok = match term {
                        Term::Symbol(symbol) => symbol == value,
                        Term::Variable(name) => candidate.bind_symbol(name, value),
                    };
                    if !ok {
                        unified = false;
                        break;
                    }
                }
                if !unified {
                    continue;
                }
                if let Some(var) = degree_var {
                    if !candidate.bind_degree(var, fact.degree) {
                        continue;
                    }
                }
                if let Some(constraint) = degree_constraint {
                    if !constraint.holds(&candidate) {
                        continue;
                    }
                }
                matches.push((candidate, fact.degree));
            }
            matches
        }

        Condition::And(children) => match_sequence(children, bindings, kb),

        Condition::Or(children) => {
            let mut merged: Vec<Match> = Vec::new();
            for child in children {
                for (extended, degree) in match_condition(child, bindings, kb) {
                    // Deduplica ligações iguais mantendo o grau máximo
                    if let Some(entry) = merged.iter_mut().find(|entry| entry.0 == extended) {
                        entry.1 = fuzzy_ops::or_max(entry.1, degree);
                    } else {
                        merged.push((extended, degree));
                    }
                }
            }
            merged
        }

        Condition::Not(child) => {
            if match_condition(child, bindings, kb).is_empty() {
                vec![(bindings.clone(), 1.0)]
            } else {
                Vec::new()
            }
        }
    }
}

/// Casa uma sequência de condições — o AND implícito de uma regra —
/// partindo de ligações vazias.
///
/// O grau de casamento resultante é o mínimo dos graus contribuídos;
/// a sequência vazia casa exatamente uma vez com grau 1.0.
pub fn match_conditions(conditions: &[Condition], kb: &KnowledgeBase) -> Vec<Match> {
    match_sequence(conditions, &Bindings::new(), kb)
}

/// Dobra uma sequência de condições da esquerda para a direita,
/// estendendo cartesianamente o conjunto de ligações a cada passo.
fn match_sequence(conditions: &[Condition], bindings: &Bindings, kb: &KnowledgeBase) -> Vec<Match> {
    let mut current = vec![(bindings.clone(), 1.0)];
    for condition in conditions {
        let mut next = Vec::new();
        for (accumulated, degree) in &current {
            for (extended, child_degree) in match_condition(condition, accumulated, kb) {
                next.push((extended, fuzzy_ops::and_min(*degree, child_degree)));
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        current = next;
    }
    current
}
