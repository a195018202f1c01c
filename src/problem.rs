//! The input contract: a preprocessed clause set over a fixed signature.
//!
//! Parsing and clausification are upstream concerns; this crate accepts a
//! serde-friendly tree form and interns it per slice, so every slice owns
//! its banks and nothing leaks between strategies.

use crate::error::{ProverError, Result};
use crate::logic::{LiteralId, SliceContext, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputTerm {
    Var(String),
    App {
        functor: String,
        args: Vec<InputTerm>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLiteral {
    pub predicate: String,
    pub polarity: bool,
    pub args: Vec<InputTerm>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputClause {
    pub literals: Vec<InputLiteral>,
}

/// A problem in clause normal form. The predicate name `=` with two
/// arguments denotes equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemCnf {
    pub clauses: Vec<InputClause>,
}

impl ProblemCnf {
    pub fn from_json(text: &str) -> Result<ProblemCnf> {
        serde_json::from_str(text).map_err(|e| ProverError::User(format!("bad problem: {}", e)))
    }

    /// Intern the problem into a fresh slice context. Variables are
    /// clause-local; the signature is frozen afterwards so later symbols
    /// count as introduced.
    pub fn load(&self, ctx: &mut SliceContext) -> Vec<Vec<LiteralId>> {
        let clauses = self
            .clauses
            .iter()
            .map(|clause| {
                let mut vars: HashMap<&str, u32> = HashMap::new();
                clause
                    .literals
                    .iter()
                    .map(|lit| {
                        let args: Vec<TermId> = lit
                            .args
                            .iter()
                            .map(|t| intern_term(ctx, t, &mut vars))
                            .collect();
                        let pred = ctx
                            .sig
                            .intern_predicate(&lit.predicate, args.len() as u8);
                        ctx.literals
                            .mk_literal(&ctx.sig, &ctx.terms, pred, lit.polarity, args)
                    })
                    .collect()
            })
            .collect();
        ctx.sig.freeze();
        clauses
    }
}

fn intern_term<'a>(
    ctx: &mut SliceContext,
    term: &'a InputTerm,
    vars: &mut HashMap<&'a str, u32>,
) -> TermId {
    match term {
        InputTerm::Var(name) => {
            let next = vars.len() as u32;
            let id = *vars.entry(name.as_str()).or_insert(next);
            ctx.terms.mk_var(id)
        }
        InputTerm::App { functor, args } => {
            let arg_ids: Vec<TermId> = args.iter().map(|a| intern_term(ctx, a, vars)).collect();
            let f = ctx.sig.intern_function(functor, arg_ids.len() as u8);
            ctx.terms.mk_app(&ctx.sig, f, arg_ids)
        }
    }
}

/// Shorthand constructors for building problems in code
impl InputTerm {
    pub fn var(name: &str) -> InputTerm {
        InputTerm::Var(name.to_string())
    }

    pub fn app(functor: &str, args: Vec<InputTerm>) -> InputTerm {
        InputTerm::App {
            functor: functor.to_string(),
            args,
        }
    }

    pub fn constant(name: &str) -> InputTerm {
        InputTerm::app(name, vec![])
    }
}

impl InputLiteral {
    pub fn new(predicate: &str, polarity: bool, args: Vec<InputTerm>) -> InputLiteral {
        InputLiteral {
            predicate: predicate.to_string(),
            polarity,
            args,
        }
    }
}

impl InputClause {
    pub fn new(literals: Vec<InputLiteral>) -> InputClause {
        InputClause { literals }
    }
}
