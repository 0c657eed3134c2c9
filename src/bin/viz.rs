use eframe::egui;
use egui_plot::{Legend, Line, Plot};

use rocket_ode::convergence::{error_series, ErrorPoint};
use rocket_ode::integrator::{analytic_dense, euler, rk4, Method};
use rocket_ode::io::read_params_file;
use rocket_ode::model::ModelParameters;
use rocket_ode::trajectory::{Trajectory, TrajectoryFamily};

const LEVELS: usize = 5;

fn main() -> eframe::Result {
    let params = match std::env::args().nth(1) {
        Some(path) => match read_params_file(&path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}: {}, using defaults", path, e);
                ModelParameters::default()
            }
        },
        None => ModelParameters::default(),
    };

    let app = ConvergenceViz::new(params);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Euler vs RK4", options, Box::new(|_| Ok(Box::new(app))))
}

struct ConvergenceViz {
    params: ModelParameters,
    exact: Trajectory,
    euler: Trajectory,
    rk4: Trajectory,
    euler_errors: Vec<ErrorPoint>,
    rk4_errors: Vec<ErrorPoint>,
}

impl ConvergenceViz {
    fn new(params: ModelParameters) -> Self {
        let series = |method| {
            let numeric = TrajectoryFamily::refined(&params, method, LEVELS);
            let analytic = TrajectoryFamily::analytic(&params, &numeric.steps());
            error_series(&numeric, &analytic)
        };
        let euler_errors = series(Method::Euler);
        let rk4_errors = series(Method::Rk4);
        Self {
            exact: analytic_dense(&params, 1000),
            euler: euler(&params),
            rk4: rk4(&params),
            euler_errors,
            rk4_errors,
            params,
        }
    }
}

fn velocity_points(tr: &Trajectory) -> Vec<[f64; 2]> {
    tr.points().map(|(t, v)| [t, v]).collect()
}

fn log_points(series: &[ErrorPoint]) -> Vec<[f64; 2]> {
    series.iter().map(|p| [p.h.ln(), p.error.ln()]).collect()
}

impl eframe::App for ConvergenceViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let p = &self.params;
            ui.heading(format!("dv/dt = (F - mu v) / (m0 + mu t),  h = {}", p.h));
            ui.label(format!(
                "F = {}  |  m0 = {}  |  mu = {}  |  v0 = {}  |  t_end = {}",
                p.thrust, p.m0, p.mu, p.v0, p.t_end
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let height = available.y - 24.0;

            ui.horizontal(|ui| {
                // Velocity vs Time
                ui.vertical(|ui| {
                    ui.label("Velocity (m/s)");
                    Plot::new("velocity")
                        .width(half_w)
                        .height(height)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Analytical", velocity_points(&self.exact)));
                            plot_ui.line(Line::new("Euler", velocity_points(&self.euler)));
                            plot_ui.line(Line::new("Runge-Kutta 4", velocity_points(&self.rk4)));
                        });
                });

                // log(error) vs log(h)
                ui.vertical(|ui| {
                    ui.label("log(max error)");
                    Plot::new("log_error")
                        .width(half_w)
                        .height(height)
                        .x_axis_label("log(h)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Euler", log_points(&self.euler_errors)));
                            plot_ui.line(Line::new("Runge-Kutta 4", log_points(&self.rk4_errors)));
                        });
                });
            });
        });
    }
}
