//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for L-BFGS solvers used by the
//! log-likelihood optimizer. These helpers hide Argmin’s generic wiring and
//! apply crate-level options (tolerances, memory size).
//!
//! Conventions
//! -----------
//! - The L-BFGS memory (`m`) is taken from `opts.lbfgs_mem` or defaults to
//!   [`DEFAULT_LBFGS_MEM`].
//! - The builders do **not** set an initial parameter vector or
//!   `max_iters`; these are runtime concerns applied by `run_lbfgs`.
//! - Tolerances rejected by Argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   via the crate’s `From<Error>` implementation.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with a Hager–Zhang line search and the tolerances in
/// `opts`.
///
/// # Errors
/// Returns an `OptError` when Argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with a More–Thuente line search and the tolerances in
/// `opts`.
///
/// # Errors
/// Returns an `OptError` when Argmin rejects a tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply the optional gradient and cost-change tolerances from `opts` to an
/// L-BFGS solver, whatever its line search.
///
/// When a tolerance is `None`, Argmin’s default stays in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
