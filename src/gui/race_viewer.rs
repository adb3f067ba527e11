use std::{
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chrono::{Local, NaiveDate};
use eframe::egui;
use egui_plot::{Bar, BarChart, Corner, Legend, LineStyle, Plot, PlotBounds, VLine};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use crate::{
    CHANNEL_BUFFER_DEFAULT, api, catalog,
    catalog::Team,
    data::{DateRange, SnapshotMetadata, StockData},
    error::TrError,
    gui::GuiEvent,
    prefs,
    prefs::Prefs,
    race::{
        RaceFrame,
        filter::{RaceFilters, RangePreset, TeamFilter},
        frames::{full_date_span, prepare_frames},
        playback::{Playback, PlaybackSpeed},
    },
    utils::datetime::date_to_str,
};

pub struct RaceViewer {
    refresh_sender: mpsc::Sender<GuiEvent>,
    workspace: PathBuf,
    snapshot_date: Option<NaiveDate>,

    load_event_sender: mpsc::Sender<LoadEvent>,
    load_event_receiver: mpsc::Receiver<LoadEvent>,

    stocks: Vec<StockData>,
    metadata: Option<SnapshotMetadata>,
    frames: Vec<RaceFrame>,
    filters: RaceFilters,
    range_preset: RangePreset,
    explicit_range: Option<DateRange>,
    playback: Playback,
    sectors: Vec<&'static str>,

    warning_message: Option<String>,
}

enum LoadEvent {
    Finished(Vec<StockData>, Option<SnapshotMetadata>),
    Error(TrError),
}

impl RaceViewer {
    pub fn new(
        cc: &eframe::CreationContext,
        refresh_sender: mpsc::Sender<GuiEvent>,
        workspace: &Path,
        snapshot_date: Option<NaiveDate>,
        explicit_range: Option<DateRange>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let (load_event_sender, load_event_receiver) =
            mpsc::channel::<LoadEvent>(CHANNEL_BUFFER_DEFAULT);

        let saved_prefs = prefs::load().unwrap_or_default();

        let mut playback = Playback::new();
        playback.set_speed(saved_prefs.speed);

        Self {
            refresh_sender,
            workspace: workspace.to_path_buf(),
            snapshot_date,

            load_event_sender,
            load_event_receiver,

            stocks: vec![],
            metadata: None,
            frames: vec![],
            filters: saved_prefs.filters,
            range_preset: saved_prefs.range_preset,
            explicit_range,
            playback,
            sectors: catalog::all_sectors(),

            warning_message: None,
        }
    }

    fn load_stocks(&mut self, reload: bool) {
        self.warning_message = None;

        let date = self.snapshot_date;
        let load_event_sender = self.load_event_sender.clone();

        tokio::spawn(async move {
            let loaded = if reload {
                api::reload_stocks(date.as_ref()).await
            } else {
                api::stocks(date.as_ref()).await
            };

            match loaded {
                Ok(stocks) => {
                    let metadata = api::metadata().await.ok();
                    let _ = load_event_sender
                        .send(LoadEvent::Finished(stocks, metadata))
                        .await;
                }
                Err(err) => {
                    let _ = load_event_sender.send(LoadEvent::Error(err)).await;
                }
            }
        });
    }

    fn on_load_stocks(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Finished(stocks, metadata) => {
                self.stocks = stocks;
                self.metadata = metadata;
                self.rebuild_frames();
            }
            LoadEvent::Error(err) => self.warning_message = Some(err.to_string()),
        }
    }

    /// Recompute the frame sequence, rewinding to the first frame.
    fn rebuild_frames(&mut self) {
        self.frames = match full_date_span(&self.stocks) {
            Some(full_span) => {
                let date_range = match self.explicit_range {
                    Some(range) => range,
                    None => self.range_preset.resolve(&full_span),
                };

                prepare_frames(&self.stocks, &date_range, &self.filters)
            }
            None => vec![],
        };

        self.playback.seek(0);
        self.sync_current_date();
    }

    fn sync_current_date(&mut self) {
        let date = self
            .frames
            .get(self.playback.current_index)
            .map(|frame| frame.date);
        self.playback.set_current_date(date);
    }

    fn save_prefs(&self) {
        let _ = prefs::store(&Prefs {
            filters: self.filters.clone(),
            range_preset: self.range_preset,
            speed: self.playback.speed,
        });
    }

    fn playback_row(&mut self, ui: &mut egui::Ui) {
        let total_frames = self.frames.len();

        ui.horizontal(|ui| {
            if ui.button("⏮").clicked() {
                self.playback.step_back();
                self.sync_current_date();
            }

            let play_label = if self.playback.playing { "⏸" } else { "▶" };
            if ui.button(play_label).clicked() {
                self.playback.toggle();
            }

            if ui.button("⏭").clicked() {
                self.playback.step_forward(total_frames);
                self.sync_current_date();
            }

            ui.separator();

            for speed in PlaybackSpeed::iter() {
                if ui
                    .selectable_label(self.playback.speed == speed, speed.to_string())
                    .clicked()
                {
                    self.playback.set_speed(speed);
                    self.save_prefs();
                }
            }

            ui.separator();

            if total_frames > 0 {
                let mut index = self.playback.current_index;
                if ui
                    .add(egui::Slider::new(&mut index, 0..=total_frames - 1).show_value(false))
                    .changed()
                {
                    self.playback.seek(index);
                    self.sync_current_date();
                }

                ui.label(
                    egui::RichText::new(format!(
                        "{}/{total_frames}",
                        self.playback.current_index + 1
                    ))
                    .color(egui::Color32::GRAY),
                );
            }

            if ui.button("↻ Refresh").clicked() {
                self.load_stocks(true);
                let _ = self.refresh_sender.try_send(GuiEvent::Refresh);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(date) = self.playback.current_date {
                    ui.label(egui::RichText::new(date_to_str(&date)).strong().size(18.0));
                }
            });
        });
    }

    fn filter_row(&mut self, ui: &mut egui::Ui) {
        let mut rebuild = false;

        ui.horizontal_wrapped(|ui| {
            for team in TeamFilter::iter() {
                if ui
                    .selectable_label(self.filters.team == team, team.to_string())
                    .clicked()
                {
                    self.filters.team = team;
                    rebuild = true;
                }
            }

            ui.separator();

            for sector in &self.sectors {
                let selected = self.filters.selected_sectors.iter().any(|s| s == sector);
                let text = egui::RichText::new(*sector).color(str_to_color(sector));

                if ui.selectable_label(selected, text).clicked() {
                    if selected {
                        self.filters.selected_sectors.retain(|s| s != sector);
                    } else {
                        self.filters.selected_sectors.push(sector.to_string());
                    }
                    rebuild = true;
                }
            }

            ui.separator();

            for preset in RangePreset::iter() {
                let selected = self.explicit_range.is_none() && self.range_preset == preset;

                if ui.selectable_label(selected, preset.to_string()).clicked() {
                    self.explicit_range = None;
                    self.range_preset = preset;
                    rebuild = true;
                }
            }
        });

        if rebuild {
            self.rebuild_frames();
            self.save_prefs();
        }
    }

    fn ranking_panel(&self, ui: &mut egui::Ui) {
        let Some(frame) = self.frames.get(self.playback.current_index) else {
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in &frame.stocks {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{:>2}", entry.rank))
                            .color(egui::Color32::GRAY)
                            .monospace(),
                    );
                    ui.label(
                        egui::RichText::new(&entry.ticker)
                            .color(team_color(entry.team, entry.cumulative_return < 1.0))
                            .strong(),
                    )
                    .on_hover_text(format!("{} · {}", entry.name, entry.sector));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{:+.1}%",
                                (entry.cumulative_return - 1.0) * 100.0
                            ))
                            .monospace(),
                        );
                    });
                });
            }
        });
    }

    fn race_plot(&self, ui: &mut egui::Ui) {
        let Some(frame) = self.frames.get(self.playback.current_index) else {
            ui.centered_and_justified(|ui| {
                ui.label("No race data, fetch a snapshot first");
            });
            return;
        };

        let mut blue_bars: Vec<Bar> = vec![];
        let mut white_bars: Vec<Bar> = vec![];
        let mut min_return: f64 = 1.0;
        let mut max_return: f64 = 1.0;

        for entry in &frame.stocks {
            min_return = min_return.min(entry.cumulative_return);
            max_return = max_return.max(entry.cumulative_return);

            // Bars grow away from the 1.0 baseline, left for losses
            let bar = Bar::new(-(entry.rank as f64), entry.cumulative_return - 1.0)
                .base_offset(1.0)
                .width(0.8)
                .name(format!("{} - {}", entry.ticker, entry.name))
                .fill(team_color(entry.team, entry.cumulative_return < 1.0));

            match entry.team {
                Team::Blue => blue_bars.push(bar),
                Team::White => white_bars.push(bar),
            }
        }

        let shown = frame.stocks.len() as f64;

        Plot::new("race_plot")
            .legend(Legend::default().position(Corner::LeftTop))
            .label_formatter(|name, point| {
                if name.is_empty() {
                    "".to_string()
                } else {
                    format!("{name} ×{:.2} ({:+.1}%)", point.x, (point.x - 1.0) * 100.0)
                }
            })
            .x_axis_formatter(|mark, _| format!("{:+.0}%", (mark.value - 1.0) * 100.0))
            .show_axes([true, false])
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [(min_return * 0.95).min(1.0), -shown - 0.7],
                    [(max_return * 1.05).max(1.0), -0.3],
                ));

                plot_ui.vline(
                    VLine::new("", 1.0)
                        .color(egui::Color32::from_rgb(71, 85, 105))
                        .style(LineStyle::dashed_loose()),
                );

                plot_ui.bar_chart(
                    BarChart::new("Blue Team", blue_bars)
                        .horizontal()
                        .color(team_color(Team::Blue, false)),
                );
                plot_ui.bar_chart(
                    BarChart::new("White Team", white_bars)
                        .horizontal()
                        .color(team_color(Team::White, false)),
                );
            });
    }
}

impl eframe::App for RaceViewer {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let already_run = ctx.data(|d| {
            d.get_temp::<bool>(egui::Id::new("startup_once"))
                .unwrap_or(false)
        });

        if !already_run {
            self.load_stocks(false);

            ctx.data_mut(|d| d.insert_temp(egui::Id::new("startup_once"), true));
        }

        while let Ok(event) = self.load_event_receiver.try_recv() {
            self.on_load_stocks(event);
        }

        if self.playback.tick(Instant::now(), self.frames.len()) {
            self.sync_current_date();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::TopBottomPanel::top("tools_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    self.playback_row(ui);
                    self.filter_row(ui);
                });

            egui::TopBottomPanel::bottom("status_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        ui.label(
                            egui::RichText::new(format!("🗀 {}", self.workspace.to_string_lossy()))
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                        );

                        if let Some(metadata) = &self.metadata {
                            ui.label(
                                egui::RichText::new(format!(
                                    "Yahoo Finance · updated {}",
                                    metadata
                                        .last_updated
                                        .with_timezone(&Local)
                                        .format("%Y-%m-%d %H:%M")
                                ))
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                            );
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(
                                    self.warning_message
                                        .as_ref()
                                        .map(|t| format!("⚠ {t}"))
                                        .unwrap_or_default(),
                                )
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                            );
                        });
                    });
                });

            egui::SidePanel::right("ranking_panel")
                .show_separator_line(false)
                .default_width(240.0)
                .show_inside(ui, |ui| {
                    self.ranking_panel(ui);
                });

            egui::CentralPanel::default().show_inside(ui, |ui| {
                self.race_plot(ui);
            });
        });

        if self.playback.playing {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}

fn team_color(team: Team, negative: bool) -> egui::Color32 {
    match (team, negative) {
        (Team::Blue, false) => egui::Color32::from_rgb(59, 130, 246),
        (Team::Blue, true) => egui::Color32::from_rgb(37, 99, 235),
        (Team::White, false) => egui::Color32::from_rgb(107, 114, 128),
        (Team::White, true) => egui::Color32::from_rgb(75, 85, 99),
    }
}

fn str_to_color(s: &str) -> egui::Color32 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish();

    let hue = (hash % 360) as f64;
    let saturation = 0.8;
    let lightness = 1.0;

    let (r, g, b) = hsv::hsv_to_rgb(hue, saturation, lightness);

    egui::Color32::from_rgb(r, g, b)
}
