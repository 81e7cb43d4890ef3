//! Solver-neutral linear program description and the LP backend seam.
//!
//! The dispatch model is written against [`LinearProgram`] and solved by any
//! [`LpSolver`]. [`MiniLpSolver`] drives `good_lp` with the pure-Rust
//! `minilp` simplex backend.

use good_lp::solvers::minilp::minilp;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    variable,
};

use super::error::OptimizationError;

/// Handle to a variable of a [`LinearProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

/// Sense of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `lhs == rhs`
    Eq,
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
}

#[derive(Debug, Clone, Copy)]
struct VarBounds {
    lower: f64,
    upper: Option<f64>,
}

/// `sum(coef * var) <relation> rhs`
#[derive(Debug, Clone)]
struct LinearConstraint {
    terms: Vec<(VarId, f64)>,
    relation: Relation,
    rhs: f64,
}

/// A minimisation LP over continuous variables.
#[derive(Debug, Clone, Default)]
pub struct LinearProgram {
    bounds: Vec<VarBounds>,
    objective: Vec<f64>,
    constraints: Vec<LinearConstraint>,
}

impl LinearProgram {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable with `lower <= x` and, if given, `x <= upper`.
    ///
    /// The variable starts with a zero objective coefficient.
    pub fn add_variable(&mut self, lower: f64, upper: Option<f64>) -> VarId {
        self.bounds.push(VarBounds { lower, upper });
        self.objective.push(0.0);
        VarId(self.bounds.len() - 1)
    }

    /// Adds `sum(terms) <relation> rhs`.
    pub fn add_constraint(&mut self, terms: Vec<(VarId, f64)>, relation: Relation, rhs: f64) {
        self.constraints.push(LinearConstraint {
            terms,
            relation,
            rhs,
        });
    }

    /// Sets the objective coefficient of `var`.
    pub fn set_objective(&mut self, var: VarId, coefficient: f64) {
        self.objective[var.0] = coefficient;
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.bounds.len()
    }

    /// Number of constraints, not counting variable bounds.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of a full assignment, indexed like the variables.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }
}

/// Optimal variable values returned by a solver.
#[derive(Debug, Clone)]
pub struct LpSolution {
    values: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    /// Builds a solution and evaluates the program's objective on it.
    pub fn new(lp: &LinearProgram, values: Vec<f64>) -> Self {
        let objective = lp.objective_value(&values);
        Self { values, objective }
    }

    /// Value of one variable.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.0]
    }

    /// Objective value at this solution.
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

/// Anything that can solve a [`LinearProgram`] to optimality.
pub trait LpSolver {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Solves `lp`.
    ///
    /// # Errors
    ///
    /// Returns `Infeasible`, `Unbounded`, or `SolverFailure` when no optimal
    /// point is found.
    fn solve(&self, lp: &LinearProgram) -> Result<LpSolution, OptimizationError>;
}

/// `good_lp` backend using the `minilp` simplex solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MiniLpSolver;

impl LpSolver for MiniLpSolver {
    fn name(&self) -> &'static str {
        "minilp"
    }

    fn solve(&self, lp: &LinearProgram) -> Result<LpSolution, OptimizationError> {
        let mut problem = ProblemVariables::new();
        let vars: Vec<Variable> = lp
            .bounds
            .iter()
            .map(|b| {
                let def = variable().min(b.lower);
                let def = match b.upper {
                    Some(upper) => def.max(upper),
                    None => def,
                };
                problem.add(def)
            })
            .collect();

        let objective: Expression = lp
            .objective
            .iter()
            .zip(&vars)
            .filter(|(c, _)| **c != 0.0)
            .map(|(&c, &v)| v * c)
            .sum();

        let mut model = problem.minimise(objective).using(minilp);
        for c in &lp.constraints {
            let lhs: Expression = c
                .terms
                .iter()
                .map(|&(id, coef)| vars[id.0] * coef)
                .sum();
            model.add_constraint(match c.relation {
                Relation::Eq => constraint::eq(lhs, c.rhs),
                Relation::Le => constraint::leq(lhs, c.rhs),
                Relation::Ge => constraint::geq(lhs, c.rhs),
            });
        }

        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => OptimizationError::Infeasible,
            ResolutionError::Unbounded => OptimizationError::Unbounded,
            other => OptimizationError::SolverFailure(other.to_string()),
        })?;

        let values: Vec<f64> = vars.iter().map(|&v| solution.value(v)).collect();
        checked_solution(lp, values)
    }
}

/// Rejects assignments that are not a finite optimum.
///
/// `minilp` reports an unbounded program as a successful solve with infinite
/// values, so the check happens here rather than in the error mapping.
fn checked_solution(
    lp: &LinearProgram,
    values: Vec<f64>,
) -> Result<LpSolution, OptimizationError> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(OptimizationError::SolverFailure(
            "solver returned NaN variable values".into(),
        ));
    }
    if values.iter().any(|v| v.is_infinite()) {
        return Err(OptimizationError::Unbounded);
    }
    let solution = LpSolution::new(lp, values);
    if solution.objective().is_finite() {
        Ok(solution)
    } else {
        Err(OptimizationError::Unbounded)
    }
}
