//! Interactive viewer for sheetsim scenarios
//!
//! Draws the sheet displacement, the sheet distribution and the field
//! profile, and reloads the scenario file whenever it changes on disk.

use notify::{Event, RecommendedWatcher, Watcher};
use sheetsim_core::{Derivative, SimulationContext, State};
use std::path::PathBuf;
use std::sync::mpsc;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x2f, 0x1e, 0x2e);
const AXIS: egui::Color32 = egui::Color32::from_rgb(0xb9, 0xb6, 0xb0);
const FIELD_ORIGIN: egui::Color32 = egui::Color32::from_rgb(0x48, 0xb6, 0x85);
const FIELD_LINE: egui::Color32 = egui::Color32::from_rgb(0xef, 0x61, 0x55);
const SHEET_DOT: egui::Color32 = egui::Color32::from_rgb(0xfe, 0xc4, 0x18);
const DISTRIBUTION: egui::Color32 = egui::Color32::from_rgba_premultiplied(1, 36, 47, 50);

/// Draw every n-th sheet as a dot
const DOT_STRIDE: usize = 100;
/// Sample every n-th sheet for the field polyline
const FIELD_STRIDE: usize = 10;
/// Field values are clipped to ±FIELD_MAX before plotting
const FIELD_MAX: f64 = 10.0;

/// `(position, field)` pairs ordered by position, taken from every
/// `stride`-th sheet and clipped to `±field_max`
pub fn field_trace(
    state: &State,
    derivative: &Derivative,
    stride: usize,
    field_max: f64,
) -> Vec<(f64, f64)> {
    let mut sheets: Vec<(usize, f64)> = state.positions().iter().copied().enumerate().collect();
    sheets.sort_by(|a, b| a.1.total_cmp(&b.1));
    sheets
        .into_iter()
        .filter(|(i, _)| i % stride.max(1) == 0)
        .filter_map(|(i, x)| {
            let e = derivative.field().get(i)?;
            Some((x, e.clamp(-field_max, field_max)))
        })
        .collect()
}

/// Add `speed` to the fractional step budget and take the whole steps out
/// of it, so speeds below one step per frame still slow the run down
pub fn take_steps(budget: &mut f32, speed: f32) -> usize {
    *budget += speed.max(0.0);
    let steps = budget.floor();
    *budget -= steps;
    steps as usize
}

/// Viewer application
pub struct ViewApp {
    source_path: Option<PathBuf>,
    ctx_opt: Option<SimulationContext>,
    last_derivative: Option<Derivative>,
    initial_positions: Vec<f64>, // dots keep their starting height
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    step_budget: f32,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
    needs_reload: bool,
}

impl ViewApp {
    pub fn new(source_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), source_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                log::warn!("not watching {}: {}", path.display(), e);
            }
        }

        let mut app = Self {
            source_path,
            ctx_opt: None,
            last_derivative: None,
            initial_positions: Vec::new(),
            last_load_error: None,
            playing: false,
            speed_multiplier: 1.0,
            step_budget: 0.0,
            file_watcher: watcher,
            file_receiver: rx,
            needs_reload: false,
        };

        app.reload_context();

        app
    }

    fn reload_context(&mut self) {
        let loaded = crate::load_scenario(self.source_path.as_deref())
            .and_then(|scenario| Ok(SimulationContext::new(scenario)?));
        self.last_derivative = None;
        match loaded {
            Ok(ctx) => {
                log::info!("loaded scenario with {} sheets", ctx.config().resolution());
                self.initial_positions = ctx.state().positions().to_vec();
                self.ctx_opt = Some(ctx);
                self.last_load_error = None;
            }
            Err(e) => {
                log::error!("failed to load scenario: {}", e);
                self.last_load_error = Some(format!("{}", e));
                self.ctx_opt = None;
                self.initial_positions.clear();
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if let Some(ref source_path) = self.source_path {
                        if paths.iter().any(|p| p.ends_with(source_path) || source_path.ends_with(p)) {
                            self.needs_reload = true;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("file watcher error: {}", e);
                }
            }
        }

        if self.needs_reload {
            self.reload_context();
            self.needs_reload = false;
        }
    }

    fn draw(&self, ui: &egui::Ui, sim: &SimulationContext) {
        let rect = ui.max_rect();
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let xmax = sim.config().xmax();
        let state = sim.state();
        let axis = egui::Stroke::new(1.0, AXIS);

        // displacement on top, distribution strip in the middle, field below
        let displacement_height = rect.height() * 0.5;
        let distribution_height = rect.height() * 0.1;
        let displacement_bottom = rect.top() + displacement_height;
        let distribution_bottom = displacement_bottom + distribution_height;
        let field_origin = (distribution_bottom + rect.bottom()) / 2.0;
        let field_half_height = (rect.bottom() - distribution_bottom) / 2.0;

        let plot_x = |x: f64| rect.left() + ((x + xmax) / (2.0 * xmax)) as f32 * rect.width();
        let plot_displacement = |x: f64| {
            displacement_bottom - ((x + xmax) / (2.0 * xmax)) as f32 * displacement_height
        };

        for y in [displacement_bottom, distribution_bottom] {
            painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], axis);
        }
        painter.line_segment(
            [egui::pos2(rect.left(), field_origin), egui::pos2(rect.right(), field_origin)],
            egui::Stroke::new(1.0, FIELD_ORIGIN),
        );

        for (&x, &start) in state
            .positions()
            .iter()
            .zip(&self.initial_positions)
            .step_by(DOT_STRIDE)
        {
            let sx = plot_x(x);
            painter.circle_filled(egui::pos2(sx, plot_displacement(start)), 1.5, SHEET_DOT);
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(sx - 1.5, displacement_bottom),
                    egui::pos2(sx + 1.5, distribution_bottom),
                ),
                0.0,
                DISTRIBUTION,
            );
        }

        if let Some(ref derivative) = self.last_derivative {
            let points: Vec<egui::Pos2> = field_trace(state, derivative, FIELD_STRIDE, FIELD_MAX)
                .into_iter()
                .map(|(x, e)| {
                    egui::pos2(plot_x(x), field_origin - (e / FIELD_MAX) as f32 * field_half_height)
                })
                .collect();
            painter.add(egui::Shape::line(points, egui::Stroke::new(1.0, FIELD_LINE)));
        }
    }
}

impl eframe::App for ViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    if let Some(ref mut sim) = self.ctx_opt {
                        sim.reset();
                    }
                    self.last_derivative = None;
                    self.step_budget = 0.0;
                    self.playing = false;
                }

                if ui.button("⏭ Step").clicked() {
                    if let Some(ref mut sim) = self.ctx_opt {
                        self.last_derivative = Some(sim.step());
                    }
                }

                ui.separator();

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=10.0));

                ui.separator();

                if let Some(ref sim) = self.ctx_opt {
                    ui.label(format!("Step: {}  t = {:.2}", sim.current_step(), sim.time()));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref sim) = self.ctx_opt {
                self.draw(ui, sim);
            }

            if let Some(ref error) = self.last_load_error {
                let rect = ui.max_rect();
                ui.vertical_centered(|ui| {
                    ui.add_space(rect.height() * 0.4);
                    ui.label(
                        egui::RichText::new(format!("Error: {}", error))
                            .color(egui::Color32::RED)
                            .size(16.0),
                    );
                });
            }
        });

        if self.playing {
            if let Some(ref mut sim) = self.ctx_opt {
                for _ in 0..take_steps(&mut self.step_budget, self.speed_multiplier) {
                    self.last_derivative = Some(sim.step());
                }
            }
            ctx.request_repaint();
        }
    }
}
