use std::path::Path;

use eframe::egui::{Color32, ComboBox, DragValue, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use rfd::FileDialog;

use libyield_study::comparator::{ComparisonRecord, Metric};
use libyield_study::config::StudyConfig;
use libyield_study::process::{process, ComparisonFigure};
use libyield_study::style::{MarkerShape, SeriesStyle, StyleColor};

// Styles handed out to newly added files, in order
const DEFAULT_MARKERS: [&str; 4] = ["v", "^", "s", "o"];
const DEFAULT_COLORS: [&str; 4] = ["g", "b", "gray", "k"];

fn render_error_dialog(show: &mut bool, message: &str, ctx: &eframe::egui::Context) {
    eframe::egui::Window::new("Error")
        .open(show)
        .show(ctx, |ui| {
            ui.label(message);
            ui.label("Check the log file yield_study.log for more information.");
        });
}

fn file_dialog() -> FileDialog {
    let dialog = FileDialog::new();
    match std::env::current_dir() {
        Ok(dir) => dialog.set_directory(dir),
        Err(_) => dialog,
    }
}

fn default_style(idx: usize) -> SeriesStyle {
    let marker = DEFAULT_MARKERS[idx % DEFAULT_MARKERS.len()]
        .parse::<MarkerShape>()
        .unwrap_or_default();
    let color = DEFAULT_COLORS[idx % DEFAULT_COLORS.len()]
        .parse::<StyleColor>()
        .unwrap_or_default();
    SeriesStyle::new(marker, color)
}

fn plot_marker(marker: MarkerShape) -> egui_plot::MarkerShape {
    match marker {
        MarkerShape::Circle => egui_plot::MarkerShape::Circle,
        MarkerShape::Square => egui_plot::MarkerShape::Square,
        MarkerShape::TriangleUp => egui_plot::MarkerShape::Up,
        MarkerShape::TriangleDown => egui_plot::MarkerShape::Down,
        MarkerShape::Diamond => egui_plot::MarkerShape::Diamond,
        MarkerShape::Cross => egui_plot::MarkerShape::Cross,
        MarkerShape::Plus => egui_plot::MarkerShape::Plus,
    }
}

fn plot_color(color: &StyleColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// Draw one panel of the comparison: the metric against the x series picked by `x_of`
fn comparison_plot(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    figure: &ComparisonFigure,
    x_of: fn(&ComparisonRecord) -> &Vec<f64>,
) {
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(figure.metric.label())
        .show(ui, |plot_ui| {
            for record in figure.records.iter() {
                let color = plot_color(&record.style.color);
                let points: Vec<[f64; 2]> = x_of(record)
                    .iter()
                    .zip(record.metric_nominal.iter())
                    .map(|(x, y)| [*x, *y])
                    .collect();
                for (point, err) in points.iter().zip(record.metric_err.iter()) {
                    let bar = vec![[point[0], point[1] - err], [point[0], point[1] + err]];
                    plot_ui.line(Line::new(PlotPoints::new(bar)).color(color));
                }
                plot_ui.line(
                    Line::new(PlotPoints::new(points.clone()))
                        .color(color)
                        .name(&record.source_label),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .shape(plot_marker(record.style.marker))
                        .radius(4.0)
                        .filled(true)
                        .color(color)
                        .name(&record.source_label),
                );
            }
        });
}

/// The UI app which inherits the eframe::App trait.
///
/// Holds the study configuration and the last successful comparison.
#[derive(Debug)]
pub struct StudyApp {
    config: StudyConfig,
    figure: Option<ComparisonFigure>,
    show_error_window: bool,
    error_message: String,
}

impl StudyApp {
    /// Create the application
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut visuals = eframe::egui::Visuals::dark();
        visuals.override_text_color = Some(Color32::LIGHT_GRAY);
        cc.egui_ctx.set_visuals(visuals);
        cc.egui_ctx.set_theme(eframe::egui::Theme::Dark);
        StudyApp {
            config: StudyConfig::default(),
            figure: None,
            show_error_window: false,
            error_message: String::new(),
        }
    }

    fn report_error(&mut self, message: String) {
        log::error!("{message}");
        self.error_message = message;
        self.show_error_window = true;
    }

    /// Run the comparison for the current config
    fn run_comparison(&mut self) {
        log::info!("Starting comparison...");
        match process(&self.config, |done, total| {
            log::info!("Normalized file {done} of {total}")
        }) {
            Ok(figure) => {
                log::info!("Comparison complete");
                self.figure = Some(figure);
            }
            Err(e) => {
                self.figure = None;
                self.report_error(format!("Comparison failed: {e}"));
            }
        }
    }

    /// Write the current StudyConfig to a file
    fn write_config(&mut self, path: &Path) {
        if let Err(e) = self.config.write_config_file(path) {
            self.report_error(format!(
                "Error writing config to file {}: {e}",
                path.display()
            ));
        }
    }

    /// Read the StudyConfig from a file
    fn read_config(&mut self, path: &Path) {
        match StudyConfig::read_config_file(path) {
            Ok(conf) => {
                self.config = conf;
                self.figure = None;
            }
            Err(e) => self.report_error(format!("{e}")),
        }
    }

    fn render_file_list(&mut self, ui: &mut Ui) {
        let mut remove: Option<usize> = None;
        eframe::egui::Grid::new("FileGrid").striped(true).show(ui, |ui| {
            ui.label("File");
            ui.label("Marker");
            ui.label("Color");
            ui.label("Label");
            ui.end_row();
            for (idx, (path, style)) in self
                .config
                .files
                .iter()
                .zip(self.config.styles.iter_mut())
                .enumerate()
            {
                ui.label(path.display().to_string());
                ComboBox::from_id_salt(("marker", idx))
                    .selected_text(style.marker.code())
                    .show_ui(ui, |ui| {
                        for marker in MarkerShape::ALL {
                            ui.selectable_value(&mut style.marker, marker, marker.code());
                        }
                    });
                let mut rgb = [style.color.r, style.color.g, style.color.b];
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    style.color = StyleColor::new(rgb[0], rgb[1], rgb[2]);
                }
                let mut label = style.label.clone().unwrap_or_default();
                if ui.text_edit_singleline(&mut label).changed() {
                    style.label = if label.is_empty() { None } else { Some(label) };
                }
                if ui.button("Remove").clicked() {
                    remove = Some(idx);
                }
                ui.end_row();
            }
        });
        if let Some(idx) = remove {
            self.config.remove_file(idx);
        }

        if ui.button("Add File...").clicked() {
            if let Some(path) = file_dialog()
                .add_filter("CSV file", &["csv", "CSV", "txt"])
                .pick_file()
            {
                let style = default_style(self.config.files.len());
                self.config.add_file(path, style);
            }
        }
    }
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        render_error_dialog(&mut self.show_error_window, &self.error_message, ctx);
        eframe::egui::TopBottomPanel::top("ConfigPanel").show(ctx, |ui| {
            //Menus
            ui.menu_button("File", |ui| {
                if ui.button("Open...").clicked() {
                    if let Some(path) = file_dialog()
                        .add_filter("YAML file", &["yaml", "yml"])
                        .pick_file()
                    {
                        self.read_config(&path);
                    }
                }
                if ui.button("Save...").clicked() {
                    if let Some(path) = file_dialog()
                        .add_filter("YAML file", &["yaml", "yml"])
                        .save_file()
                    {
                        self.write_config(&path);
                    }
                }
            });

            //Config
            ui.separator();
            ui.label(
                RichText::new("Configuration")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            eframe::egui::Grid::new("ConfigGrid").show(ui, |ui| {
                ui.label("Target:");
                ui.text_edit_singleline(&mut self.config.target);
                ui.end_row();

                ui.label("Metric:");
                ComboBox::from_id_salt("metric")
                    .selected_text(self.config.metric.label())
                    .show_ui(ui, |ui| {
                        for metric in Metric::ALL {
                            ui.selectable_value(&mut self.config.metric, metric, metric.label());
                        }
                    });
                ui.end_row();

                ui.label("Reference Index");
                ui.add(DragValue::new(&mut self.config.reference_index).speed(1));
                ui.end_row();

                let mut use_last_runs = self.config.last_runs.is_some();
                ui.checkbox(&mut use_last_runs, "Only the last runs");
                if use_last_runs {
                    let mut n = self.config.last_runs.unwrap_or(1);
                    ui.add(
                        DragValue::new(&mut n)
                            .speed(1)
                            .range(std::ops::RangeInclusive::new(1, 100)),
                    );
                    self.config.last_runs = Some(n);
                } else {
                    self.config.last_runs = None;
                }
                ui.end_row();
            });

            ui.separator();
            ui.label(RichText::new("Files").color(Color32::LIGHT_BLUE).size(18.0));
            self.render_file_list(ui);

            //Controls
            ui.separator();
            if ui
                .add_enabled(
                    !self.config.files.is_empty(),
                    eframe::egui::Button::new("Compare"),
                )
                .clicked()
            {
                self.run_comparison();
            }
        });

        eframe::egui::CentralPanel::default().show(ctx, |ui| match &self.figure {
            Some(figure) => {
                ui.label(
                    RichText::new(figure.title())
                        .color(Color32::LIGHT_BLUE)
                        .size(18.0),
                );
                ui.columns(2, |columns| {
                    comparison_plot(
                        &mut columns[0],
                        "CurrentPanel",
                        "Average Current [uA]",
                        figure,
                        |r| &r.avg_current,
                    );
                    comparison_plot(
                        &mut columns[1],
                        "ScalerPanel",
                        "T2 Scaler Rate [kHz]",
                        figure,
                        |r| &r.scaler_rate,
                    );
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.heading("Add summary files and click Compare");
                });
            }
        });
    }
}
