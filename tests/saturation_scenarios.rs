//! End-to-end saturation scenarios through the public API.

use resolute::{
    saturate, CancellationToken, InputClause, InputLiteral, InputTerm, Options, ProblemCnf,
    SaturationResult, SliceContext, SliceTimer,
};

fn run(problem: ProblemCnf, opts: Options) -> SaturationResult {
    let mut ctx = SliceContext::new();
    let clauses = problem.load(&mut ctx);
    let timer = SliceTimer::new(opts.time_limit_deciseconds, CancellationToken::new());
    let (result, _) = saturate(&mut ctx, clauses, &opts, &timer).expect("engine error");
    result
}

fn lit(pred: &str, polarity: bool, args: Vec<InputTerm>) -> InputLiteral {
    InputLiteral::new(pred, polarity, args)
}

#[test]
fn test_direct_contradiction_refutes_immediately() {
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![lit("p", true, vec![InputTerm::constant("a")])]),
            InputClause::new(vec![lit("p", false, vec![InputTerm::constant("a")])]),
        ],
    };
    let result = run(problem, Options::default());
    match result {
        SaturationResult::Refutation(proof) => {
            assert_eq!(proof.steps.last().unwrap().clause, "$false");
            // The refutation references both input clauses
            let last = proof.steps.last().unwrap();
            assert_eq!(last.parents.len(), 2);
        }
        other => panic!("expected refutation, got {}", other.name()),
    }
}

#[test]
fn test_single_positive_clause_is_satisfiable() {
    let problem = ProblemCnf {
        clauses: vec![InputClause::new(vec![lit(
            "p",
            true,
            vec![InputTerm::var("X")],
        )])],
    };
    let result = run(problem, Options::default());
    assert!(
        matches!(result, SaturationResult::Satisfiable),
        "complete calculus must report satisfiable on exhaustion"
    );
}

#[test]
fn test_resolution_chain() {
    // p(a), ~p(X) | q(X), ~q(a) is unsatisfiable
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![lit("p", true, vec![InputTerm::constant("a")])]),
            InputClause::new(vec![
                lit("p", false, vec![InputTerm::var("X")]),
                lit("q", true, vec![InputTerm::var("X")]),
            ]),
            InputClause::new(vec![lit("q", false, vec![InputTerm::constant("a")])]),
        ],
    };
    let result = run(problem, Options::default());
    assert!(matches!(result, SaturationResult::Refutation(_)));
}

#[test]
fn test_equality_reasoning() {
    // a = b, p(a), ~p(b) is unsatisfiable
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![lit(
                "=",
                true,
                vec![InputTerm::constant("a"), InputTerm::constant("b")],
            )]),
            InputClause::new(vec![lit("p", true, vec![InputTerm::constant("a")])]),
            InputClause::new(vec![lit("p", false, vec![InputTerm::constant("b")])]),
        ],
    };
    let result = run(problem, Options::default());
    assert!(
        matches!(result, SaturationResult::Refutation(_)),
        "got {}",
        result.name()
    );
}

#[test]
fn test_equality_resolution_closes_goal() {
    // f(X) != f(a) | q(X),  ~q(a)
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![
                lit(
                    "=",
                    false,
                    vec![
                        InputTerm::app("f", vec![InputTerm::var("X")]),
                        InputTerm::app("f", vec![InputTerm::constant("a")]),
                    ],
                ),
                lit("q", true, vec![InputTerm::var("X")]),
            ]),
            InputClause::new(vec![lit("q", false, vec![InputTerm::constant("a")])]),
        ],
    };
    let result = run(problem, Options::default());
    assert!(
        matches!(result, SaturationResult::Refutation(_)),
        "got {}",
        result.name()
    );
}

#[test]
fn test_satisfiable_horn_chain() {
    // p(a), ~p(X) | q(f(X)) saturates
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![lit("p", true, vec![InputTerm::constant("a")])]),
            InputClause::new(vec![
                lit("p", false, vec![InputTerm::var("X")]),
                lit("q", true, vec![InputTerm::app("f", vec![InputTerm::var("X")])]),
            ]),
        ],
    };
    let result = run(problem, Options::default());
    assert!(
        matches!(result, SaturationResult::Satisfiable),
        "got {}",
        result.name()
    );
}

#[test]
fn test_zero_age_ratio_still_terminates() {
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![lit("p", true, vec![InputTerm::constant("a")])]),
            InputClause::new(vec![lit("p", false, vec![InputTerm::constant("a")])]),
        ],
    };
    let opts = Options {
        age_ratio: 0,
        weight_ratio: 1,
        ..Default::default()
    };
    assert!(matches!(
        run(problem, opts),
        SaturationResult::Refutation(_)
    ));
}

#[test]
fn test_both_ratios_zero_is_user_error() {
    let problem = ProblemCnf {
        clauses: vec![InputClause::new(vec![lit(
            "p",
            true,
            vec![InputTerm::constant("a")],
        )])],
    };
    let mut ctx = SliceContext::new();
    let clauses = problem.load(&mut ctx);
    let opts = Options {
        age_ratio: 0,
        weight_ratio: 0,
        ..Default::default()
    };
    let timer = SliceTimer::new(0, CancellationToken::new());
    assert!(saturate(&mut ctx, clauses, &opts, &timer).is_err());
}

#[test]
fn test_proof_steps_are_well_founded() {
    let problem = ProblemCnf {
        clauses: vec![
            InputClause::new(vec![lit("p", true, vec![InputTerm::constant("a")])]),
            InputClause::new(vec![
                lit("p", false, vec![InputTerm::var("X")]),
                lit("q", true, vec![InputTerm::var("X")]),
            ]),
            InputClause::new(vec![lit("q", false, vec![InputTerm::constant("a")])]),
        ],
    };
    match run(problem, Options::default()) {
        SaturationResult::Refutation(proof) => {
            let ids: Vec<usize> = proof.steps.iter().map(|s| s.id).collect();
            for step in &proof.steps {
                let pos = ids.iter().position(|&i| i == step.id).unwrap();
                for p in &step.parents {
                    let ppos = ids
                        .iter()
                        .position(|&i| i == *p)
                        .expect("parent missing from proof");
                    assert!(ppos < pos);
                }
            }
        }
        other => panic!("expected refutation, got {}", other.name()),
    }
}
