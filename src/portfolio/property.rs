//! Problem property computation for schedule selection.

use crate::problem::{InputTerm, ProblemCnf};

/// Syntactic statistics of a problem
#[derive(Debug, Clone, Default)]
pub struct Property {
    pub clause_count: usize,
    pub literal_count: usize,
    pub equality_count: usize,
    pub unit_count: usize,
    pub has_positive_arity_function: bool,
    pub all_ground: bool,
}

/// Schedule families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemCategory {
    /// Plain first-order problems
    Fof,
    /// Fully ground problems, closer to SAT
    Sat,
    /// No functions of positive arity
    Epr,
}

impl Property {
    pub fn of(problem: &ProblemCnf) -> Property {
        let mut prop = Property {
            all_ground: true,
            ..Default::default()
        };
        prop.clause_count = problem.clauses.len();
        for clause in &problem.clauses {
            if clause.literals.len() == 1 {
                prop.unit_count += 1;
            }
            for lit in &clause.literals {
                prop.literal_count += 1;
                if lit.predicate == "=" && lit.args.len() == 2 {
                    prop.equality_count += 1;
                }
                for arg in &lit.args {
                    scan_term(arg, &mut prop);
                }
            }
        }
        prop
    }

    pub fn category(&self) -> ProblemCategory {
        if !self.has_positive_arity_function {
            ProblemCategory::Epr
        } else if self.all_ground {
            ProblemCategory::Sat
        } else {
            ProblemCategory::Fof
        }
    }
}

fn scan_term(term: &InputTerm, prop: &mut Property) {
    match term {
        InputTerm::Var(_) => prop.all_ground = false,
        InputTerm::App { args, .. } => {
            if !args.is_empty() {
                prop.has_positive_arity_function = true;
            }
            for a in args {
                scan_term(a, prop);
            }
        }
    }
}
