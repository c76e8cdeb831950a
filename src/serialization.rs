//! # Serialização — Round-Trip entre o Modelo e o Schema Textual
//!
//! Módulo responsável por converter a [`KnowledgeBase`] de/para o schema
//! textual, idêntico em JSON e YAML:
//!
//! ```text
//! KnowledgeBase := { "facts": [Fact*], "rules": [Rule*] }
//! Fact          := { "pred": string, "args": [string*], "deg": number }   // deg padrão 1.0
//! Rule          := { "name"?, "description"?, "priority"? (padrão 0),
//!                    "cond": [Condition+], "actions": [Action+] }
//! Condition     := { "pred", "args", "deg"?, "deg-pred"? } | {"and": …} | {"or": …} | {"not": …}
//! Action        := { "action": "add"|"modify"|"remove", "fact": FactTemplate }
//! DegreeExpr    := number | "?var" | [op, DegreeExpr+]
//! ```
//!
//! O schema dinâmico é espelhado por tipos-documento não-tipados
//! (`serde`, enums `untagged`) e convertido para o modelo tipado por um
//! **único parser no load** — erros de forma aparecem na ingestão, nunca
//! durante o casamento.
//!
//! ## Seleção de Formato
//!
//! Sufixo `.yaml`/`.yml` seleciona YAML; qualquer outro sufixo, JSON.
//! O round-trip `load(save(kb)) ≡ kb` vale a menos da estabilidade da
//! ordenação por prioridade das regras.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::fact::{Fact, Term};
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::rule::{
    Action, ComparisonOp, Condition, ConstraintOperand, DegreeConstraint, DegreeExpr, DegreeOp,
    FactTemplate, Rule,
};
use crate::error::{Result, SerializationError, ValidationError};

// ----------------------------------------------------------------------
// Tipos-documento — o espelho serde do schema textual
// ----------------------------------------------------------------------

/// Documento raiz: `{"facts": [...], "rules": [...]}`.
#[derive(Serialize, Deserialize)]
struct KbDoc {
    #[serde(default)]
    facts: Vec<Fact>,
    #[serde(default)]
    rules: Vec<RuleDoc>,
}

#[derive(Serialize, Deserialize)]
struct RuleDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "priority_is_default")]
    priority: i32,
    cond: Vec<CondDoc>,
    actions: Vec<ActionDoc>,
}

fn priority_is_default(priority: &i32) -> bool {
    *priority == 0
}

/// Condição no schema: os combinadores são reconhecidos pela chave
/// (`and`/`or`/`not`), o átomo pela presença de `pred`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CondDoc {
    And {
        and: Vec<CondDoc>,
    },
    Or {
        or: Vec<CondDoc>,
    },
    Not {
        not: Box<CondDoc>,
    },
    Atom {
        pred: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deg: Option<String>,
        #[serde(
            default,
            rename = "deg-pred",
            skip_serializing_if = "Option::is_none"
        )]
        deg_pred: Option<ConstraintDoc>,
    },
}

/// Restrição `[op, operando, operando]` — serializada como sequência.
#[derive(Serialize, Deserialize)]
struct ConstraintDoc(String, OperandDoc, OperandDoc);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OperandDoc {
    Num(f64),
    Var(String),
}

#[derive(Serialize, Deserialize)]
struct ActionDoc {
    action: String,
    fact: TemplateDoc,
}

#[derive(Serialize, Deserialize)]
struct TemplateDoc {
    pred: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deg: Option<ExprDoc>,
}

/// Expressão de grau: número, `"?var"` ou `[op, expr, …]`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ExprDoc {
    Num(f64),
    Str(String),
    Call(Vec<ExprDoc>),
}

// ----------------------------------------------------------------------
// Documento → modelo tipado (o parser do load)
// ----------------------------------------------------------------------

fn schema_error(reason: impl Into<String>) -> crate::error::FuzzyError {
    SerializationError::Schema {
        reason: reason.into(),
    }
    .into()
}

fn from_doc(doc: KbDoc) -> Result<KnowledgeBase> {
    let mut kb = KnowledgeBase::new();
    kb.add_facts(doc.facts)?;
    for rule in doc.rules {
        kb.add_rule(rule_from_doc(rule)?)?;
    }
    Ok(kb)
}

fn rule_from_doc(doc: RuleDoc) -> Result<Rule> {
    // O schema exige ao menos uma condição ([Condition+]); regras sem
    // condições só existem por construção programática.
    if doc.cond.is_empty() {
        return Err(ValidationError::EmptyConditions.into());
    }
    let conditions = doc
        .cond
        .into_iter()
        .map(cond_from_doc)
        .collect::<Result<Vec<Condition>>>()?;
    let actions = doc
        .actions
        .into_iter()
        .map(action_from_doc)
        .collect::<Result<Vec<Action>>>()?;
    Ok(Rule {
        name: doc.name,
        description: doc.description,
        priority: doc.priority,
        conditions,
        actions,
    })
}

fn cond_from_doc(doc: CondDoc) -> Result<Condition> {
    match doc {
        CondDoc::And { and } => Ok(Condition::And(
            and.into_iter().map(cond_from_doc).collect::<Result<_>>()?,
        )),
        CondDoc::Or { or } => Ok(Condition::Or(
            or.into_iter().map(cond_from_doc).collect::<Result<_>>()?,
        )),
        CondDoc::Not { not } => Ok(Condition::Not(Box::new(cond_from_doc(*not)?))),
        CondDoc::Atom {
            pred,
            args,
            deg,
            deg_pred,
        } => {
            let degree_var = match deg {
                Some(var) if var.starts_with('?') => Some(var),
                Some(var) => {
                    return Err(schema_error(format!(
                        "campo 'deg' de condição deve ser variável '?': {var}"
                    )))
                }
                None => None,
            };
            let degree_constraint = deg_pred.map(constraint_from_doc).transpose()?;
            Ok(Condition::Atom {
                predicate: pred,
                args: args.into_iter().map(Term::parse).collect(),
                degree_var,
                degree_constraint,
            })
        }
    }
}

fn constraint_from_doc(doc: ConstraintDoc) -> Result<DegreeConstraint> {
    let ConstraintDoc(op, lhs, rhs) = doc;
    Ok(DegreeConstraint {
        op: ComparisonOp::parse(&op)?,
        lhs: operand_from_doc(lhs)?,
        rhs: operand_from_doc(rhs)?,
    })
}

fn operand_from_doc(doc: OperandDoc) -> Result<ConstraintOperand> {
    match doc {
        OperandDoc::Num(value) => Ok(ConstraintOperand::Literal(value)),
        OperandDoc::Var(var) if var.starts_with('?') => Ok(ConstraintOperand::Variable(var)),
        OperandDoc::Var(other) => Err(schema_error(format!(
            "operando de 'deg-pred' deve ser número ou variável '?': {other}"
        ))),
    }
}

fn action_from_doc(doc: ActionDoc) -> Result<Action> {
    let template = template_from_doc(doc.fact)?;
    match doc.action.as_str() {
        "add" => Ok(Action::Add(template)),
        "remove" => Ok(Action::Retract(template)),
        "modify" => Ok(Action::Modify(template)),
        other => Err(schema_error(format!("tipo de ação desconhecido: {other}"))),
    }
}

fn template_from_doc(doc: TemplateDoc) -> Result<FactTemplate> {
    Ok(FactTemplate {
        predicate: doc.pred,
        args: doc.args.into_iter().map(Term::parse).collect(),
        degree: doc.deg.map(expr_from_doc).transpose()?,
    })
}

fn expr_from_doc(doc: ExprDoc) -> Result<DegreeExpr> {
    match doc {
        ExprDoc::Num(value) => Ok(DegreeExpr::Literal(value)),
        ExprDoc::Str(var) if var.starts_with('?') => Ok(DegreeExpr::Variable(var)),
        ExprDoc::Str(other) => Err(schema_error(format!(
            "expressão de grau: string deve ser variável '?': {other}"
        ))),
        ExprDoc::Call(items) => {
            let mut items = items.into_iter();
            let op = match items.next() {
                Some(ExprDoc::Str(op)) if !op.starts_with('?') => DegreeOp::parse(&op)?,
                _ => {
                    return Err(schema_error(
                        "expressão de grau: a forma [op, …] exige operador na cabeça",
                    ))
                }
            };
            let args = items.map(expr_from_doc).collect::<Result<Vec<_>>>()?;
            if args.is_empty() {
                return Err(ValidationError::EmptyExpression.into());
            }
            Ok(DegreeExpr::Apply { op, args })
        }
    }
}

// ----------------------------------------------------------------------
// Modelo tipado → documento
// ----------------------------------------------------------------------

fn to_doc(kb: &KnowledgeBase) -> KbDoc {
    KbDoc {
        facts: kb.facts().cloned().collect(),
        rules: kb.rules().iter().map(rule_to_doc).collect(),
    }
}

fn rule_to_doc(rule: &Rule) -> RuleDoc {
    RuleDoc {
        name: rule.name.clone(),
        description: rule.description.clone(),
        priority: rule.priority,
        cond: rule.conditions.iter().map(cond_to_doc).collect(),
        actions: rule.actions.iter().map(action_to_doc).collect(),
    }
}

fn cond_to_doc(condition: &Condition) -> CondDoc {
    match condition {
        Condition::And(children) => CondDoc::And {
            and: children.iter().map(cond_to_doc).collect(),
        },
        Condition::Or(children) => CondDoc::Or {
            or: children.iter().map(cond_to_doc).collect(),
        },
        Condition::Not(child) => CondDoc::Not {
            not: Box::new(cond_to_doc(child)),
        },
        Condition::Atom {
            predicate,
            args,
            degree_var,
            degree_constraint,
        } => CondDoc::Atom {
            pred: predicate.clone(),
            args: args.iter().map(|t| t.as_str().to_string()).collect(),
            deg: degree_var.clone(),
            deg_pred: degree_constraint.as_ref().map(constraint_to_doc),
        },
    }
}

fn constraint_to_doc(constraint: &DegreeConstraint) -> ConstraintDoc {
    ConstraintDoc(
        constraint.op.symbol().to_string(),
        operand_to_doc(&constraint.lhs),
        operand_to_doc(&constraint.rhs),
    )
}

fn operand_to_doc(operand: &ConstraintOperand) -> OperandDoc {
    match operand {
        ConstraintOperand::Literal(value) => OperandDoc::Num(*value),
        ConstraintOperand::Variable(var) => OperandDoc::Var(var.clone()),
    }
}

fn action_to_doc(action: &Action) -> ActionDoc {
    let template = action.template();
    ActionDoc {
        action: action.kind_label().to_string(),
        fact: TemplateDoc {
            pred: template.predicate.clone(),
            args: template.args.iter().map(|t| t.as_str().to_string()).collect(),
            deg: template.degree.as_ref().map(expr_to_doc),
        },
    }
}

fn expr_to_doc(expr: &DegreeExpr) -> ExprDoc {
    match expr {
        DegreeExpr::Literal(value) => ExprDoc::Num(*value),
        DegreeExpr::Variable(var) => ExprDoc::Str(var.clone()),
        DegreeExpr::Apply { op, args } => {
            let mut items = vec![ExprDoc::Str(op.symbol().to_string())];
            items.extend(args.iter().map(expr_to_doc));
            ExprDoc::Call(items)
        }
    }
}

// ----------------------------------------------------------------------
// Superfície pública
// ----------------------------------------------------------------------

/// Serializa a base para um `serde_json::Value` no schema textual.
pub fn to_value(kb: &KnowledgeBase) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(to_doc(kb))?)
}

/// Reconstrói uma base a partir de um `serde_json::Value`.
pub fn from_value(value: serde_json::Value) -> Result<KnowledgeBase> {
    let doc: KbDoc = serde_json::from_value(value)?;
    from_doc(doc)
}

/// Serializa a base como JSON pretty-printed (facilita inspeção manual).
pub fn to_json(kb: &KnowledgeBase) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_doc(kb))?)
}

/// Reconstrói uma base a partir de uma string JSON.
pub fn from_json(json: &str) -> Result<KnowledgeBase> {
    let doc: KbDoc = serde_json::from_str(json)?;
    from_doc(doc)
}

/// Serializa a base como YAML.
pub fn to_yaml(kb: &KnowledgeBase) -> Result<String> {
    Ok(serde_yaml::to_string(&to_doc(kb))?)
}

/// Reconstrói uma base a partir de uma string YAML.
pub fn from_yaml(yaml: &str) -> Result<KnowledgeBase> {
    let doc: KbDoc = serde_yaml::from_str(yaml)?;
    from_doc(doc)
}

/// Salva a base em disco no formato dado pelo sufixo do caminho.
pub fn save_to_file(kb: &KnowledgeBase, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = if is_yaml(path) {
        to_yaml(kb)?
    } else {
        to_json(kb)?
    };
    std::fs::write(path, text)?;
    tracing::debug!(caminho = %path.display(), "KB salva em disco");
    Ok(())
}

/// Carrega uma base do disco no formato dado pelo sufixo do caminho.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<KnowledgeBase> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let kb = if is_yaml(path) {
        from_yaml(&text)?
    } else {
        from_json(&text)?
    };
    tracing::debug!(
        caminho = %path.display(),
        fatos = kb.fact_count(),
        regras = kb.rule_count(),
        "KB carregada do disco"
    );
    Ok(kb)
}

/// Sufixo `.yaml`/`.yml` seleciona YAML; qualquer outro, JSON.
fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
