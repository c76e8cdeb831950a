//! # Driver de Inferência — Saturação até o Ponto Fixo
//!
//! O [`InferenceEngine`] executa o **encadeamento progressivo**: dispara
//! repetidamente as regras aplicáveis até que um passo inteiro não altere
//! o armazém de fatos (ponto fixo), ou até o teto de iterações.
//!
//! ## Algoritmo
//!
//! ```text
//! repete até max_iterations:
//!   mudou ← falso
//!   para cada regra R em ordem de prioridade decrescente:
//!     para cada (ligações, grau_casado) no casamento das condições de R:
//!       para cada ação A de R, em ordem de declaração:
//!         alvo ← instanciar(A.molde, ligações, grau_casado)
//!         aplicar(A, alvo)   // add ⇒ fuzzy-OR; modify ⇒ substitui; remove
//!   se não mudou: retorna
//! erro de inferência: teto de iterações excedido
//! ```
//!
//! ## Visibilidade Dentro do Passo
//!
//! Ações aplicadas por uma regra são visíveis às regras **seguintes do
//! mesmo passo** (o casamento de cada regra lê o armazém vivo no momento
//! em que a regra é avaliada). O conjunto de casamentos de uma regra é
//! coletado por inteiro antes de suas próprias ações serem aplicadas.
//!
//! ## Terminação
//!
//! No caso só-`add`, o conjunto de fatos ground possíveis é finito e os
//! graus só crescem sob fuzzy-OR, logo o ponto fixo chega em um número
//! finito de passos. `remove`/`modify` podem oscilar; o teto de
//! iterações limita esse caso.

use crate::core::bindings::Bindings;
use crate::core::fact::{Fact, Term};
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::rule::Action;
use crate::error::{InferenceError, Result, ValidationError};
use crate::inference::matcher;

/// Teto de iterações assumido pelas conveniências do crate.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Estatísticas de uma execução bem-sucedida do driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Passos executados, incluindo o passo final sem mudanças.
    pub iterations: usize,
    /// Fatos no armazém antes da execução.
    pub facts_before: usize,
    /// Fatos no armazém após a execução.
    pub facts_after: usize,
    /// Total de disparos de regra (um por casamento, por passo).
    pub rules_fired: usize,
}

/// Driver de encadeamento progressivo com teto de iterações.
///
/// O driver só muta o armazém de fatos — as regras nunca são alteradas.
/// A ordem de avaliação dentro de um passo é estável: prioridade
/// decrescente com empate pela ordem de inserção.
#[derive(Clone, Copy, Debug)]
pub struct InferenceEngine {
    /// Número máximo de passos antes de abortar com erro.
    pub max_iterations: usize,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        InferenceEngine {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl InferenceEngine {
    /// Cria um driver com o teto de iterações dado.
    pub fn new(max_iterations: usize) -> Self {
        InferenceEngine { max_iterations }
    }

    /// Executa a saturação até o ponto fixo.
    ///
    /// # Erros
    ///
    /// - `MaxIterationsExceeded` se o ponto fixo não for atingido;
    /// - erros de avaliação de expressão de grau (divisão por zero,
    ///   variável não ligada) abortam a execução **sem** aplicar a ação
    ///   ofensora — os efeitos anteriores do passo permanecem.
    pub fn run(&self, kb: &mut KnowledgeBase) -> Result<RunStats> {
        let facts_before = kb.fact_count();
        let mut rules_fired = 0usize;

        for iteration in 1..=self.max_iterations {
            let mut changed = false;
            // As regras não mudam durante o run; o clone libera o
            // empréstimo para que as ações possam mutar o armazém.
            let rules = kb.rules().to_vec();

            for rule in &rules {
                // O conjunto completo de casamentos é coletado antes das
                // ações desta regra; regras seguintes enxergam os efeitos.
                let matches = matcher::match_conditions(&rule.conditions, kb);
                for (bindings, match_degree) in matches {
                    for action in &rule.actions {
                        changed |= self.apply_action(kb, action, &bindings, match_degree)?;
                    }
                    rules_fired += 1;
                    tracing::info!(regra = %rule, ligacoes = %bindings, "regra disparada");
                }
            }

            if !changed {
                let stats = RunStats {
                    iterations: iteration,
                    facts_before,
                    facts_after: kb.fact_count(),
                    rules_fired,
                };
                tracing::info!(
                    iteracoes = stats.iterations,
                    fatos_antes = stats.facts_before,
                    fatos_depois = stats.facts_after,
                    "inferência concluída"
                );
                return Ok(stats);
            }
        }

        Err(InferenceError::MaxIterationsExceeded {
            limit: self.max_iterations,
        }
        .into())
    }

    /// Instancia o molde da ação e a aplica ao armazém.
    ///
    /// Retorna `true` se o armazém mudou. Variável de argumento não
    /// ligada é um defeito de autoria da regra, entregue como erro de
    /// validação.
    fn apply_action(
        &self,
        kb: &mut KnowledgeBase,
        action: &Action,
        bindings: &Bindings,
        match_degree: f64,
    ) -> Result<bool> {
        let template = action.template();
        let mut args = Vec::with_capacity(template.args.len());
        for term in &template.args {
            match term {
                Term::Symbol(symbol) => args.push(symbol.clone()),
                Term::Variable(name) => match bindings.symbol(name) {
                    Some(value) => args.push(value.to_string()),
                    None => {
                        return Err(ValidationError::UnboundVariable {
                            variable: name.clone(),
                        }
                        .into())
                    }
                },
            }
        }

        match action {
            Action::Add(_) | Action::Modify(_) => {
                // Sem expressão explícita, o grau da ação é o grau de
                // casamento da regra; o resultado já vem saturado.
                let degree = match &template.degree {
                    Some(expr) => expr.evaluate(bindings)?,
                    None => match_degree,
                };
                let fact = Fact {
                    predicate: template.predicate.clone(),
                    args,
                    degree,
                };
                match action {
                    Action::Add(_) => kb.insert_or_combine(fact),
                    // modify substitui o grau; em chave ausente insere,
                    // comportando-se como add
                    _ => kb.set_fact(fact),
                }
            }
            Action::Retract(_) => Ok(kb.remove_fact(&template.predicate, &args)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rule::{
        Condition, DegreeExpr, DegreeOp, FactTemplate, Rule, RuleBuilder,
    };

    fn fact(pred: &str, args: &[&str], deg: f64) -> Fact {
        Fact::new(pred, args.iter().copied(), deg).unwrap()
    }

    fn degree_of(kb: &KnowledgeBase, pred: &str, args: &[&str]) -> f64 {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        kb.lookup(pred, &args).expect("fato ausente").degree
    }

    /// Cenário "zebra": `is-zebra(sam)=0.8` e grau derivado `0.9 × ?d`.
    #[test]
    fn test_zebra_stripes_scenario() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("is-zebra", &["sam"], 0.8)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("is-zebra", ["?x"])
                .with_degree_above(0.5)
                .then_add("has-stripes", ["?x"])
                .with_degree_times(0.9)
                .named("zebra-stripes")
                .build()
                .unwrap(),
        )
        .unwrap();

        kb.run(100).unwrap();

        let pattern = vec![Some("sam".to_string())];
        let results = kb.query("has-stripes", Some(&pattern));
        assert_eq!(results.len(), 1);
        assert!((results[0].degree - 0.72).abs() < 1e-9);
    }

    /// Todos os casamentos disparam — um fato derivado por animal.
    #[test]
    fn test_all_matches_fire() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("is-mammal", &["dog"], 1.0)).unwrap();
        kb.add_fact(fact("is-mammal", &["cat"], 1.0)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("is-mammal", ["?x"])
                .then_add("warm-blooded", ["?x"])
                .build()
                .unwrap(),
        )
        .unwrap();

        kb.run(100).unwrap();
        assert_eq!(kb.query("warm-blooded", None).len(), 2);
    }

    /// Combinador OR: `can-fly` vale para o pássaro e para o jato.
    #[test]
    fn test_or_combinator_scenario() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("has-wings", &["bird"], 0.9)).unwrap();
        kb.add_fact(fact("is-airplane", &["jet"], 1.0)).unwrap();
        kb.add_rule(
            Rule::new(
                vec![Condition::Or(vec![
                    Condition::atom("has-wings", ["?x"]),
                    Condition::atom("is-airplane", ["?x"]),
                ])],
                vec![Action::Add(FactTemplate::new("can-fly", ["?x"], None))],
            ),
        )
        .unwrap();

        kb.run(100).unwrap();
        let flying = kb.query("can-fly", None);
        assert_eq!(flying.len(), 2);
        // Sem expressão explícita, o grau da ação é o grau de casamento
        assert!((degree_of(&kb, "can-fly", &["bird"]) - 0.9).abs() < 1e-12);
        assert!((degree_of(&kb, "can-fly", &["jet"]) - 1.0).abs() < 1e-12);
    }

    /// Prioridade ordena o disparo, mas o fuzzy-OR fica com o maior grau.
    #[test]
    fn test_priority_does_not_override_fuzzy_or() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("trigger", &["go"], 1.0)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("trigger", ["?x"])
                .then_add("result", ["?x"])
                .with_degree_expr(DegreeExpr::Literal(0.6))
                .named("alta-prioridade")
                .with_priority(10)
                .build()
                .unwrap(),
        )
        .unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("trigger", ["?x"])
                .then_add("result", ["?x"])
                .with_degree_expr(DegreeExpr::Literal(0.9))
                .named("baixa-prioridade")
                .with_priority(1)
                .build()
                .unwrap(),
        )
        .unwrap();

        kb.run(100).unwrap();
        assert!((degree_of(&kb, "result", &["go"]) - 0.9).abs() < 1e-12);
    }

    /// Regra sem condições dispara exatamente uma vez por passo e o
    /// armazém converge pelo caminho normal de combinação.
    #[test]
    fn test_empty_conditions_fire_once_per_pass() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::new(
            vec![],
            vec![Action::Add(FactTemplate::new(
                "axiom",
                ["true"],
                Some(DegreeExpr::Literal(0.5)),
            ))],
        ))
        .unwrap();

        let stats = kb.run(100).unwrap();
        assert_eq!(kb.fact_count(), 1);
        // Passo 1 insere, passo 2 não muda nada e fecha o ponto fixo
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.rules_fired, 2);
    }

    /// Base vazia executa com sucesso em um único passo.
    #[test]
    fn test_empty_kb_runs() {
        let mut kb = KnowledgeBase::new();
        let stats = kb.run(100).unwrap();
        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.facts_after, 0);
    }

    /// `run` é idempotente sobre a própria saída (sem remove/modify).
    #[test]
    fn test_run_is_idempotent() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("is-zebra", &["sam"], 0.8)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("is-zebra", ["?x"])
                .then_add("has-stripes", ["?x"])
                .with_degree_times(0.9)
                .build()
                .unwrap(),
        )
        .unwrap();

        kb.run(100).unwrap();
        let snapshot: Vec<Fact> = kb.facts().cloned().collect();
        kb.run(100).unwrap();
        let again: Vec<Fact> = kb.facts().cloned().collect();
        assert_eq!(snapshot, again);
    }

    /// Encadeamento transitivo converge em poucos passos.
    #[test]
    fn test_chained_rules_reach_fixed_point() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("a", &["x"], 0.8)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("a", ["?v"])
                .then_add("b", ["?v"])
                .build()
                .unwrap(),
        )
        .unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("b", ["?v"])
                .then_add("c", ["?v"])
                .build()
                .unwrap(),
        )
        .unwrap();

        kb.run(100).unwrap();
        // Graus propagam pelo grau de casamento: 0.8 em toda a cadeia
        assert!((degree_of(&kb, "c", &["x"]) - 0.8).abs() < 1e-12);
    }

    /// NOT em condição: só dispara para quem não tem pelo.
    #[test]
    fn test_not_condition_in_rule() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("is-mammal", &["dog"], 1.0)).unwrap();
        kb.add_fact(fact("is-mammal", &["dolphin"], 1.0)).unwrap();
        kb.add_fact(fact("has-hair", &["dog"], 1.0)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("is-mammal", ["?x"])
                .when_not("has-hair", ["?x"])
                .then_add("is-hairless", ["?x"])
                .build()
                .unwrap(),
        )
        .unwrap();

        kb.run(100).unwrap();
        let hairless = kb.query("is-hairless", None);
        assert_eq!(hairless.len(), 1);
        assert_eq!(hairless[0].args[0], "dolphin");
    }

    /// Oscilação remove/add nunca converge; o teto limita e erra.
    #[test]
    fn test_max_iterations_exceeded() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("p", &["a"], 1.0)).unwrap();
        kb.add_rule(Rule::new(
            vec![Condition::atom("p", ["a"])],
            vec![Action::Retract(FactTemplate::new("p", ["a"], None))],
        ))
        .unwrap();
        kb.add_rule(Rule::new(
            vec![Condition::Not(Box::new(Condition::atom("p", ["a"])))],
            vec![Action::Add(FactTemplate::new(
                "p",
                ["a"],
                Some(DegreeExpr::Literal(1.0)),
            ))],
        ))
        .unwrap();

        let result = kb.run(10);
        assert!(matches!(
            result,
            Err(crate::error::FuzzyError::Inference(
                InferenceError::MaxIterationsExceeded { limit: 10 }
            ))
        ));
    }

    /// `modify` em chave ausente comporta-se como `add`; em chave
    /// presente substitui o grau (podendo diminuí-lo).
    #[test]
    fn test_modify_semantics() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("sensor", &["s1"], 1.0)).unwrap();
        kb.add_fact(fact("reading", &["s1"], 0.9)).unwrap();
        kb.add_rule(Rule::new(
            vec![Condition::atom("sensor", ["?s"])],
            vec![
                Action::Modify(FactTemplate::new(
                    "reading",
                    ["?s"],
                    Some(DegreeExpr::Literal(0.4)),
                )),
                Action::Modify(FactTemplate::new(
                    "calibrated",
                    ["?s"],
                    Some(DegreeExpr::Literal(0.7)),
                )),
            ],
        ))
        .unwrap();

        kb.run(100).unwrap();
        assert!((degree_of(&kb, "reading", &["s1"]) - 0.4).abs() < 1e-12);
        assert!((degree_of(&kb, "calibrated", &["s1"]) - 0.7).abs() < 1e-12);
    }

    /// Erro de grau aborta o run sem aplicar a ação ofensora, mas os
    /// efeitos anteriores do passo permanecem.
    #[test]
    fn test_error_aborts_without_partial_commit() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("p", &["a"], 1.0)).unwrap();
        kb.add_rule(Rule::new(
            vec![Condition::atom("p", ["?x"])],
            vec![
                Action::Add(FactTemplate::new(
                    "first",
                    ["?x"],
                    Some(DegreeExpr::Literal(0.5)),
                )),
                Action::Add(FactTemplate::new(
                    "broken",
                    ["?x"],
                    Some(DegreeExpr::Apply {
                        op: DegreeOp::Div,
                        args: vec![DegreeExpr::Literal(1.0), DegreeExpr::Literal(0.0)],
                    }),
                )),
            ],
        ))
        .unwrap();

        assert!(kb.run(100).is_err());
        assert!(kb.lookup("first", &["a".to_string()]).is_some());
        assert!(kb.lookup("broken", &["a".to_string()]).is_none());
    }

    /// Variável ligada em só um ramo de OR: casar pelo outro ramo deixa
    /// a variável da ação sem ligação — erro de validação em runtime.
    #[test]
    fn test_unbound_action_variable_at_runtime() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("q", &["b"], 1.0)).unwrap();
        kb.add_rule(Rule::new(
            vec![Condition::Or(vec![
                Condition::atom("p", ["?x"]),
                Condition::atom("q", ["?y"]),
            ])],
            vec![Action::Add(FactTemplate::new("r", ["?x"], None))],
        ))
        .unwrap();

        assert!(matches!(
            kb.run(100),
            Err(crate::error::FuzzyError::Validation(
                ValidationError::UnboundVariable { .. }
            ))
        ));
    }

    /// Ações de regras anteriores são visíveis no mesmo passo.
    #[test]
    fn test_actions_visible_within_pass() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(fact("seed", &["x"], 1.0)).unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("seed", ["?v"])
                .then_add("stage-1", ["?v"])
                .with_priority(2)
                .build()
                .unwrap(),
        )
        .unwrap();
        kb.add_rule(
            RuleBuilder::new()
                .when("stage-1", ["?v"])
                .then_add("stage-2", ["?v"])
                .with_priority(1)
                .build()
                .unwrap(),
        )
        .unwrap();

        let stats = kb.run(100).unwrap();
        assert!(kb.lookup("stage-2", &["x".to_string()]).is_some());
        // stage-1 e stage-2 derivados no mesmo passo; o segundo passo
        // apenas confirma o ponto fixo
        assert_eq!(stats.iterations, 2);
    }
}
