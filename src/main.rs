use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use rocket_ode::convergence::{self, ConvergenceReport};
use rocket_ode::integrator::{analytic_dense, analytic_on_grid, solve, Method};
use rocket_ode::io::{self, family, json, table};
use rocket_ode::model::ModelParameters;
use rocket_ode::sweep::{self, DEFAULT_SWEEP_POINTS};
use rocket_ode::trajectory::{Trajectory, TrajectoryFamily};

const DENSE_POINTS: usize = 1000;

/// Variable-mass rocket velocity: closed form vs Euler vs RK4, with convergence analysis
#[derive(Parser, Debug)]
#[command(name = "rocket-ode", version, about, long_about = None)]
struct Args {
    /// Only print written file paths
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve once at the step size from the parameter file
    Solve {
        #[arg(short, long, default_value = "params.txt")]
        params: PathBuf,
        #[arg(short, long, default_value = "results")]
        out: PathBuf,
    },
    /// Solve on a ratio-2 refinement family, then analyze it
    Study {
        #[arg(short, long, default_value = "params.txt")]
        params: PathBuf,
        #[arg(short, long, default_value = "results")]
        out: PathBuf,
        #[arg(short, long, default_value = "errors")]
        errors: PathBuf,
        /// Number of refinement levels, coarsest at the file's h
        #[arg(short, long, default_value_t = 4)]
        levels: usize,
    },
    /// Estimate convergence order from previously written results
    Analyze {
        #[arg(short, long, default_value = "results")]
        dir: PathBuf,
        #[arg(short, long, default_value = "errors")]
        errors: PathBuf,
    },
    /// Final velocity as a function of mu
    Sweep {
        #[arg(short, long, default_value = "params.txt")]
        params: PathBuf,
        #[arg(short, long, default_value = "parametric research")]
        out: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_SWEEP_POINTS)]
        count: usize,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let quiet = args.quiet;

    match args.command {
        Command::Solve { params, out } => {
            let params = load_params(&params)?;
            run_solve(&params, &out, quiet)?;
        }
        Command::Study { params, out, errors, levels } => {
            let params = load_params(&params)?;
            for h in rocket_ode::trajectory::refined_steps(params.h, levels) {
                run_solve(&params.with_step(h), &out, true)?;
            }
            run_analyze(&out, &errors, quiet)?;
        }
        Command::Analyze { dir, errors } => {
            run_analyze(&dir, &errors, quiet)?;
        }
        Command::Sweep { params, out, count } => {
            let params = load_params(&params)?;
            run_sweep(&params, &out, count, quiet)?;
        }
    }

    Ok(())
}

fn load_params(path: &Path) -> Result<ModelParameters, Box<dyn Error>> {
    let params = io::read_params_file(path)?;
    params.validate()?;
    Ok(params)
}

// ---------------------------------------------------------------------------
// solve
// ---------------------------------------------------------------------------

fn run_solve(params: &ModelParameters, out: &Path, quiet: bool) -> Result<(), Box<dyn Error>> {
    let h = params.h;
    fs::create_dir_all(out)?;

    let exact_cut = analytic_on_grid(params);
    let exact_full = analytic_dense(params, DENSE_POINTS);
    let euler = solve(params, Method::Euler);
    let rk4 = solve(params, Method::Rk4);

    let mut written = Vec::new();
    let full_path = out.join(family::file_name(family::ANALYTIC_FULL, h));
    table::write_trajectory_file(&full_path, "v_exact", &exact_full)?;
    written.push(full_path);
    written.extend(family::save_run(out, Method::Euler, h, &euler, &exact_cut)?);
    written.extend(family::save_run(out, Method::Rk4, h, &rk4, &exact_cut)?);
    let cmp_path = out.join(family::file_name("comparison", h));
    table::write_comparison_file(&cmp_path, &exact_cut, &euler, &rk4)?;
    written.push(cmp_path);

    if !quiet {
        print_solve_report(params, &exact_cut, &euler, &rk4);
    }
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn print_solve_report(params: &ModelParameters, exact: &Trajectory, euler: &Trajectory, rk4: &Trajectory) {
    let exact_fn = |t| params.analytic(t);

    println!();
    println!("====================================================================");
    println!("  VARIABLE-MASS VELOCITY, h = {}", params.h);
    println!("====================================================================");
    println!(
        "  F = {:<10} m0 = {:<10} mu = {:<10} v0 = {:<10}",
        params.thrust, params.m0, params.mu, params.v0
    );
    println!(
        "  t_end = {:<8} steps = {:<8} grid end = {:.4}",
        params.t_end,
        euler.len().saturating_sub(1),
        params.grid_end()
    );
    println!();
    println!("  {:<16} {:>16} {:>16}", "solution", "v(t_last)", "max |error|");
    println!("  {}", "─".repeat(50));
    let rows = [("Analytical", exact), (Method::Euler.label(), euler), (Method::Rk4.label(), rk4)];
    for (label, tr) in rows {
        let v_end = tr.last().map_or(f64::NAN, |(_, v)| v);
        println!(
            "  {:<16} {:>16.8} {:>16.3e}",
            label,
            v_end,
            tr.max_error_by(exact_fn)
        );
    }
    println!();
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

fn run_analyze(dir: &Path, errors_dir: &Path, quiet: bool) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(errors_dir)?;

    let mut reports: Vec<ConvergenceReport> = Vec::new();
    for method in Method::ALL {
        let (numeric, analytic): (TrajectoryFamily, TrajectoryFamily) = io::load_family_dir(dir, method)?;
        let report = convergence::analyze(method, &numeric, &analytic);

        let series_path = errors_dir.join(format!("log_error_{}.txt", method.name()));
        table::write_error_series_file(&series_path, &report.errors)?;
        println!("wrote {}", series_path.display());

        let json_path = errors_dir.join(json::report_file_name(method.name()));
        json::write_report_file(&json_path, &report)?;
        println!("wrote {}", json_path.display());
        reports.push(report);
    }

    if !quiet {
        print_convergence_report(&reports);
    }
    Ok(())
}

fn print_convergence_report(reports: &[ConvergenceReport]) {
    println!();
    println!("====================================================================");
    println!("  CONVERGENCE ANALYSIS");
    println!("====================================================================");
    println!(
        "  {:<14} {:>7} {:>11} {:>13} {:>11} {:>12}",
        "method", "levels", "regression", "richardson p", "observed", "err(h_min)"
    );
    println!("  {}", "─".repeat(72));
    for r in reports {
        println!(
            "  {:<14} {:>7} {:>11.3} {:>13.3} {:>11.3} {:>12.3e}",
            r.method,
            r.steps.len(),
            r.regression_order,
            r.richardson.order,
            r.observed_order,
            r.richardson.error
        );
    }
    println!();
    println!("  NaN = undefined (too few ratio-2 levels, or discrepancies at round-off)");
    println!();
}

// ---------------------------------------------------------------------------
// sweep
// ---------------------------------------------------------------------------

fn run_sweep(params: &ModelParameters, out: &Path, count: usize, quiet: bool) -> Result<(), Box<dyn Error>> {
    // Mass is monotone in mu, so checking both ends of the range covers the sweep
    params.with_mu(0.1 * params.mu).validate()?;
    params.with_mu(1.5 * params.mu).validate()?;

    fs::create_dir_all(out)?;
    let points = sweep::mu_sweep(params, count);

    let path = out.join("v_mu.txt");
    table::write_sweep_file(&path, &points)?;

    if !quiet {
        println!();
        println!("  {:>10} {:>14} {:>14} {:>14}", "mu", "exact", "Euler", "RK4");
        println!("  {}", "─".repeat(56));
        let stride = (points.len() / 10).max(1);
        for (i, p) in points.iter().enumerate() {
            if i % stride == 0 || i + 1 == points.len() {
                println!("  {:>10.4} {:>14.6} {:>14.6} {:>14.6}", p.mu, p.exact, p.euler, p.rk4);
            }
        }
        println!();
    }
    println!("wrote {}", path.display());
    Ok(())
}
