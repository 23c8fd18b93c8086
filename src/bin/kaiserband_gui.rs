use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints};

use kaiserband::audio::{PlaybackSession, read_wav_mono};
use kaiserband::config::{
    ATTENUATION_RANGE, AppConfig, FilterParams, HIGH_CUTOFF_RANGE, LOW_CUTOFF_RANGE,
    TRANSITION_WIDTH_RANGE,
};
use kaiserband::signal_processing::{FrequencyResponse, frequency_response};
use kaiserband::{FilterPipeline, KaiserDesign, SampleBuffer, save_wav};

const MAX_LOG_LINES: usize = 500;

#[derive(Parser, Debug)]
#[command(name = "kaiserband_gui")]
#[command(about = "Kaiser-window bandpass filter - GUI", long_about = None)]
struct Args {
    /// WAV file to load on startup
    input: Option<PathBuf>,

    /// TOML configuration file with initial filter settings
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

enum GuiUpdate {
    Processed {
        job: u64,
        design: KaiserDesign,
        filtered: SampleBuffer,
        response: FrequencyResponse,
    },
    Failed {
        job: u64,
        message: String,
    },
    Log(String),
}

/// Tags processing jobs so results computed for a replaced input are dropped
#[derive(Debug, Default)]
struct JobTracker {
    generation: u64,
}

impl JobTracker {
    /// Id for a job on the current input
    fn current(&self) -> u64 {
        self.generation
    }

    /// The input changed; results of jobs started before now are stale
    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn is_current(&self, job: u64) -> bool {
        job == self.generation
    }
}

struct GuiLogger {
    tx: Sender<GuiUpdate>,
    max_level: log::LevelFilter,
}

impl log::Log for GuiLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("[{}] {}", record.level(), record.args());
            let _ = self.tx.send(GuiUpdate::Log(msg));
        }
    }

    fn flush(&self) {}
}

/// Run design + zero-phase filtering off the UI thread
fn spawn_processing(
    job: u64,
    input: SampleBuffer,
    params: FilterParams,
    response_points: usize,
    tx: Sender<GuiUpdate>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let pipeline = FilterPipeline::new(params);
        let update = match pipeline.run(&input) {
            Ok(result) => {
                let response = frequency_response(
                    &result.design.coefficients,
                    result.design.spec.sample_rate_hz,
                    response_points,
                );
                GuiUpdate::Processed {
                    job,
                    design: result.design,
                    filtered: result.filtered,
                    response,
                }
            }
            Err(e) => GuiUpdate::Failed {
                job,
                message: e.to_string(),
            },
        };
        let _ = tx.send(update);
    })
}

fn waveform_points(buffer: &SampleBuffer) -> PlotPoints {
    let fs = buffer.sample_rate as f64;
    buffer
        .head(buffer.preview_len())
        .iter()
        .enumerate()
        .map(|(i, &s)| [i as f64 / fs, s as f64])
        .collect()
}

struct KaiserbandApp {
    rx: Receiver<GuiUpdate>,
    tx: Sender<GuiUpdate>,
    config: AppConfig,
    input_path: String,
    output_path: String,
    original: Option<SampleBuffer>,
    filtered: Option<SampleBuffer>,
    design: Option<KaiserDesign>,
    response: Option<FrequencyResponse>,
    status: String,
    processing: Option<thread::JoinHandle<()>>,
    jobs: JobTracker,
    playback: Option<PlaybackSession>,
    log_lines: VecDeque<String>,
}

impl KaiserbandApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        rx: Receiver<GuiUpdate>,
        tx: Sender<GuiUpdate>,
        config: AppConfig,
        input: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            rx,
            tx,
            config,
            input_path: String::new(),
            output_path: "filtered.wav".to_string(),
            original: None,
            filtered: None,
            design: None,
            response: None,
            status: "Load a WAV file to begin".to_string(),
            processing: None,
            jobs: JobTracker::default(),
            playback: None,
            log_lines: VecDeque::new(),
        };
        if let Some(path) = input {
            app.input_path = path.display().to_string();
            app.load_input();
        }
        app
    }

    fn load_input(&mut self) {
        self.stop_playback();
        match read_wav_mono(&self.input_path) {
            Ok(buffer) => {
                self.status = format!(
                    "Loaded {:.2}s @ {} Hz",
                    buffer.duration_secs(),
                    buffer.sample_rate
                );
                log::info!("Loaded {} ({} samples)", self.input_path, buffer.len());
                self.jobs.invalidate();
                self.original = Some(buffer);
                self.filtered = None;
                self.design = None;
                self.response = None;
            }
            Err(e) => {
                self.status = format!("Load failed: {}", e);
                log::error!("Failed to load {}: {}", self.input_path, e);
            }
        }
    }

    fn start_processing(&mut self) {
        let Some(original) = &self.original else {
            self.status = "No input loaded".to_string();
            return;
        };
        if self.processing.is_some() {
            return;
        }
        self.status = "Processing...".to_string();
        self.processing = Some(spawn_processing(
            self.jobs.current(),
            original.clone(),
            self.config.filter,
            self.config.response.points,
            self.tx.clone(),
        ));
    }

    fn finish_processing(&mut self) {
        if let Some(handle) = self.processing.take() {
            let _ = handle.join();
        }
    }

    fn play(&mut self, filtered: bool) {
        self.stop_playback();
        let buffer = if filtered {
            self.filtered.as_ref()
        } else {
            self.original.as_ref()
        };
        let Some(buffer) = buffer else {
            return;
        };
        match PlaybackSession::start(buffer) {
            Ok(session) => self.playback = Some(session),
            Err(e) => {
                self.status = format!("Playback failed: {}", e);
                log::error!("Playback failed: {}", e);
            }
        }
    }

    fn stop_playback(&mut self) {
        if let Some(session) = self.playback.take() {
            session.stop();
        }
    }

    fn save_filtered(&mut self) {
        let Some(filtered) = &self.filtered else {
            return;
        };
        match save_wav(&self.output_path, filtered, self.config.output.normalize_peak) {
            Ok(()) => self.status = format!("Saved {}", self.output_path),
            Err(e) => {
                self.status = format!("Save failed: {}", e);
                log::error!("Failed to save {}: {}", self.output_path, e);
            }
        }
    }

    fn drain_updates(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            match update {
                GuiUpdate::Processed {
                    job,
                    design,
                    filtered,
                    response,
                } => {
                    self.finish_processing();
                    if !self.jobs.is_current(job) {
                        log::debug!("Dropping result for a replaced input");
                        continue;
                    }
                    self.status = format!(
                        "Filtered: {} taps, beta={:.3}",
                        design.num_taps, design.beta
                    );
                    self.design = Some(design);
                    self.filtered = Some(filtered);
                    self.response = Some(response);
                }
                GuiUpdate::Failed { job, message } => {
                    self.finish_processing();
                    if !self.jobs.is_current(job) {
                        continue;
                    }
                    self.status = format!("Error: {}", message);
                    log::error!("Processing failed: {}", message);
                }
                GuiUpdate::Log(line) => {
                    self.log_lines.push_back(line);
                    while self.log_lines.len() > MAX_LOG_LINES {
                        self.log_lines.pop_front();
                    }
                }
            }
        }

        if self
            .playback
            .as_ref()
            .is_some_and(|session| session.is_finished())
        {
            self.stop_playback();
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Input").color(egui::Color32::WHITE).strong());
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.input_path);
            let busy = self.processing.is_some();
            if ui.add_enabled(!busy, egui::Button::new("Load")).clicked() {
                self.load_input();
            }
        });

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Filter").color(egui::Color32::WHITE).strong());
        let filter = &mut self.config.filter;
        param_slider(ui, "Low cutoff", &mut filter.low_cutoff_hz, LOW_CUTOFF_RANGE, "Hz");
        param_slider(ui, "High cutoff", &mut filter.high_cutoff_hz, HIGH_CUTOFF_RANGE, "Hz");
        param_slider(
            ui,
            "Transition",
            &mut filter.transition_width_hz,
            TRANSITION_WIDTH_RANGE,
            "Hz",
        );
        param_slider(
            ui,
            "Attenuation",
            &mut filter.stopband_attenuation_db,
            ATTENUATION_RANGE,
            "dB",
        );
        if ui.small_button("Reset").clicked() {
            *filter = FilterParams::default();
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let busy = self.processing.is_some();
            let can_process = self.original.is_some() && !busy;
            if ui
                .add_enabled(can_process, egui::Button::new("Process"))
                .clicked()
            {
                self.start_processing();
            }
            if busy {
                ui.spinner();
            }
        });

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Playback").color(egui::Color32::WHITE).strong());
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.original.is_some(), egui::Button::new("Original"))
                .clicked()
            {
                self.play(false);
            }
            if ui
                .add_enabled(self.filtered.is_some(), egui::Button::new("Filtered"))
                .clicked()
            {
                self.play(true);
            }
            if ui
                .add_enabled(self.playback.is_some(), egui::Button::new("Stop"))
                .clicked()
            {
                self.stop_playback();
            }
        });
        if let Some(session) = &self.playback {
            ui.label(format!("{:.1}s", session.position_secs()));
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Output").color(egui::Color32::WHITE).strong());
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.output_path);
            if ui
                .add_enabled(self.filtered.is_some(), egui::Button::new("Save"))
                .clicked()
            {
                self.save_filtered();
            }
        });
        ui.checkbox(&mut self.config.output.normalize_peak, "Normalize peak");

        if let Some(design) = &self.design {
            ui.add_space(8.0);
            ui.separator();
            ui.label(format!("Taps: {}", design.num_taps));
            ui.label(format!("Beta: {:.4}", design.beta));
            ui.label(format!(
                "Group delay: {} samples",
                design.coefficients.group_delay_samples()
            ));
        }
    }

    fn draw_plots(&self, ui: &mut egui::Ui) {
        let plot_height = 180.0;

        ui.label(
            egui::RichText::new("Waveform")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        Plot::new("waveform_plot")
            .height(plot_height)
            .x_axis_label("s")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                if let Some(original) = &self.original {
                    plot_ui.line(
                        Line::new("Original", waveform_points(original))
                            .color(egui::Color32::from_rgb(100, 200, 255).gamma_multiply(0.6)),
                    );
                }
                if let Some(filtered) = &self.filtered {
                    plot_ui.line(
                        Line::new("Filtered", waveform_points(filtered))
                            .color(egui::Color32::from_rgb(255, 200, 50)),
                    );
                }
            });

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Frequency response")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        let floor = -(self.config.filter.stopband_attenuation_db + 40.0);
        Plot::new("response_plot")
            .height(plot_height)
            .x_axis_label("Hz")
            .y_axis_label("dB")
            .include_y(floor)
            .include_y(5.0)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let Some(response) = &self.response else {
                    return;
                };
                let points: PlotPoints = response
                    .points_db()
                    .into_iter()
                    .map(|[f, db]| [f, db.max(floor)])
                    .collect();
                plot_ui.line(
                    Line::new("Magnitude", points).color(egui::Color32::from_rgb(100, 255, 100)),
                );

                if let Some(design) = &self.design {
                    for (name, hz) in [
                        ("Low cutoff", design.spec.low_cutoff_hz),
                        ("High cutoff", design.spec.high_cutoff_hz),
                    ] {
                        let marker: PlotPoints = vec![[hz, floor], [hz, 5.0]].into();
                        plot_ui.line(
                            Line::new(name, marker)
                                .color(egui::Color32::from_rgb(255, 80, 80))
                                .style(LineStyle::Dashed { length: 5.0 }),
                        );
                    }
                }
            });
    }
}

fn param_slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f64,
    range: RangeInclusive<f64>,
    suffix: &str,
) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).color(egui::Color32::LIGHT_GRAY));
        ui.add(egui::Slider::new(value, range).suffix(format!(" {}", suffix)));
    });
}

impl eframe::App for KaiserbandApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates();
        if self.processing.is_some() || self.playback.is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Status:").color(egui::Color32::LIGHT_GRAY));
                ui.label(egui::RichText::new(&self.status).color(egui::Color32::WHITE));
            });
        });

        egui::TopBottomPanel::bottom("debug_log")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Log")
                            .color(egui::Color32::LIGHT_GRAY)
                            .strong(),
                    );
                    if ui.small_button("Clear").clicked() {
                        self.log_lines.clear();
                    }
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(
                                egui::RichText::new(line)
                                    .font(egui::FontId::monospace(11.0))
                                    .color(egui::Color32::from_rgb(180, 180, 180)),
                            );
                        }
                    });
            });

        egui::SidePanel::left("controls_panel")
            .default_width(340.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.draw_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.draw_plots(ui);
            });
        });
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let (tx, rx) = crossbeam_channel::unbounded::<GuiUpdate>();

    let logger = GuiLogger {
        tx: tx.clone(),
        max_level: log_level,
    };
    log::set_boxed_logger(Box::new(logger)).ok();
    log::set_max_level(log_level);

    let config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Kaiserband - FIR Bandpass Filter"),
        ..Default::default()
    };

    let input = args.input;
    eframe::run_native(
        "Kaiserband",
        native_options,
        Box::new(move |cc| Ok(Box::new(KaiserbandApp::new(cc, rx, tx, config, input)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_for_loaded_input_is_current() {
        let jobs = JobTracker::default();
        let job = jobs.current();
        assert!(jobs.is_current(job));
    }

    #[test]
    fn test_result_for_replaced_input_is_stale() {
        let mut jobs = JobTracker::default();
        let first = jobs.current();

        // A new file is loaded while the first job is still running
        jobs.invalidate();
        assert!(!jobs.is_current(first));

        let second = jobs.current();
        assert_ne!(first, second);
        assert!(jobs.is_current(second));
    }

    #[test]
    fn test_repeated_runs_on_same_input_stay_current() {
        let mut jobs = JobTracker::default();
        jobs.invalidate();
        let a = jobs.current();
        let b = jobs.current();
        assert_eq!(a, b);
        assert!(jobs.is_current(a) && jobs.is_current(b));
    }
}
