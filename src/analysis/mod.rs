//! The force-method analysis pipeline.
//!
//! `run` drives the stages in strict order: validation, determinacy,
//! redundant selection, substructure statics, flexibility assembly,
//! compatibility solve, superposition and verification, then
//! displacement recovery. A cooperative cancel flag is polled and a
//! monotonic progress fraction published at every stage boundary.

pub mod compatibility;
pub mod determinacy;
pub mod displacements;
pub mod flexibility;
pub mod redundants;
pub mod statics;
pub mod substructure;
pub mod superpose;

pub use redundants::Redundant;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::math;
use crate::model::FrameModel;
use crate::results::{AnalysisResult, Diagnostics};

/// Factorization used on the flexibility matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// Cholesky, falling back to LU when F is not positive definite.
    #[default]
    Cholesky,
    /// LU with partial pivoting.
    Lu,
}

/// Cooperative cancellation handle; clone it and keep one side.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    inner: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

/// Monotonic progress fraction in `0..=1`, updated after each stage.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    bits: Arc<AtomicU64>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&self, fraction: f64) {
        self.bits.store(fraction.to_bits(), Ordering::Relaxed);
    }

    pub fn fraction(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Options for one analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Include the axial term `N·N/(EA)` in the work integrals.
    pub include_axial: bool,
    /// Include the shear term `V·V/(κGA)` (Timoshenko mode).
    pub include_shear: bool,
    /// Override the automatic redundant selection.
    pub manual_redundants: Option<Vec<Redundant>>,
    /// Base Simpson sample count per segment (odd, >= 5).
    pub simpson_points: usize,
    /// Flexibility factorization.
    pub solver: SolverKind,
    /// Cooperative cancellation flag, polled between stages.
    #[serde(skip)]
    pub cancel: CancelFlag,
    /// Progress reporting handle.
    #[serde(skip)]
    pub progress: Progress,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_axial: true,
            include_shear: false,
            manual_redundants: None,
            simpson_points: 21,
            solver: SolverKind::Cholesky,
            cancel: CancelFlag::default(),
            progress: Progress::default(),
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Euler-Bernoulli flexure only: drop the axial term too.
    pub fn flexure_only() -> Self {
        Self {
            include_axial: false,
            ..Self::default()
        }
    }

    /// Timoshenko mode: flexure, axial and shear flexibility.
    pub fn timoshenko() -> Self {
        Self {
            include_shear: true,
            ..Self::default()
        }
    }

    pub fn with_redundants(mut self, redundants: Vec<Redundant>) -> Self {
        self.manual_redundants = Some(redundants);
        self
    }

    pub fn with_simpson_points(mut self, points: usize) -> Self {
        self.simpson_points = points;
        self
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    fn validate(&self) -> FrameResult<()> {
        if self.simpson_points < 5 || self.simpson_points % 2 == 0 {
            return Err(FrameError::InvalidOptions(format!(
                "simpson_points must be odd and at least 5, got {}",
                self.simpson_points
            )));
        }
        Ok(())
    }
}

impl FrameModel {
    /// Analyze this model. The model itself is read-only for the whole
    /// call; all outputs live on the returned result.
    pub fn analyze(&self, options: &AnalysisOptions) -> FrameResult<AnalysisResult> {
        run(self, options)
    }
}

/// Run the full pipeline.
pub fn run(model: &FrameModel, options: &AnalysisOptions) -> FrameResult<AnalysisResult> {
    options.validate()?;
    model.validate()?;

    let checkpoint = |fraction: f64| -> FrameResult<()> {
        if options.cancel.is_canceled() {
            return Err(FrameError::Canceled);
        }
        options.progress.set(fraction);
        Ok(())
    };
    options.progress.set(0.0);

    let ctx = statics::StaticsContext::new(model)?;
    ctx.check_connected()?;
    checkpoint(0.05)?;

    let gh = match determinacy::classify(model)? {
        determinacy::Determinacy::Isostatic => 0,
        determinacy::Determinacy::Hyperstatic(n) => n as usize,
    };
    determinacy::check_stability(model)?;
    debug!("degree of indeterminacy: {gh}");
    checkpoint(0.1)?;

    let admissible = |set: &[Redundant]| -> bool {
        let supports = substructure::primary_supports(model, set);
        let Ok(releases) = substructure::primary_releases(model, set) else {
            return false;
        };
        match ctx.reaction_matrix(&supports, &releases) {
            Ok((a, _)) => {
                math::numerical_rank(&a) == a.nrows() && math::condition_number(&a) <= 1e12
            }
            Err(_) => false,
        }
    };

    let redundants: Vec<Redundant> = if gh == 0 {
        Vec::new()
    } else if let Some(manual) = &options.manual_redundants {
        if manual.len() != gh {
            return Err(FrameError::RedundantSelection(format!(
                "{} redundants provided but the degree of indeterminacy is {gh}",
                manual.len()
            )));
        }
        for r in manual {
            redundants::validate_redundant(model, r)?;
        }
        if !admissible(manual) {
            return Err(FrameError::RedundantSelection(
                "the provided redundants leave an unstable primary structure".to_string(),
            ));
        }
        manual.clone()
    } else {
        redundants::select(model, gh, admissible)?
    };
    checkpoint(0.2)?;

    let (mut primary, mut units) = substructure::generate(model, &redundants)?;
    ctx.solve_case(&mut primary)?;
    for unit in units.iter_mut() {
        ctx.solve_case(unit)?;
    }
    checkpoint(0.5)?;

    let flex = flexibility::assemble(&ctx, options, &primary, &units, &redundants)?;
    checkpoint(0.7)?;

    let rhs = &flex.eh - &flex.e0;
    let solution = compatibility::solve(&flex.f, &rhs, options.solver)?;
    checkpoint(0.8)?;

    let x: Vec<f64> = solution.x.iter().copied().collect();
    let bar_fields = superpose::combine_fields(&primary, &units, &x)?;
    let reactions = superpose::combine_reactions(&primary, &units, &redundants, &x);
    let equilibrium_residuals = superpose::verify_equilibrium(&ctx, &primary, &reactions)?;
    checkpoint(0.9)?;

    let joint_displacements =
        displacements::joint_displacements(&ctx, options, &primary, &bar_fields, &reactions)?;
    let deflections = displacements::deflection_curves(&ctx, &bar_fields, &joint_displacements)?;
    checkpoint(1.0)?;

    info!(
        "analysis of '{}' done: gh = {gh}, cond = {:.3e}, residual = {:.3e}",
        model.name, solution.condition, solution.residual
    );

    Ok(AnalysisResult {
        gh: gh as i32,
        redundants,
        x,
        reactions,
        bar_fields,
        joint_displacements,
        deflections,
        diagnostics: Diagnostics {
            condition_number: solution.condition,
            residual_norm: solution.residual,
            equilibrium_residuals,
            warnings: solution.warnings,
        },
    })
}
