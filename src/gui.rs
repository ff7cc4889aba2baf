use crate::aggregate::{
    aggregate, filter_fingerprint, AggregateOptions, StatsCache, StatsKey,
};
use crate::canvas::{CanvasController, CanvasPhase, RenderMode};
use crate::dataset::{load_dataset, ActivityDataset};
use crate::heatmap::{plan_frame, FrameBuffer, HeatmapFrame};
use crate::layout::{load_floor_plan, FloorPlan};
use crate::regions::{persist, RegionStore};
use crate::settings::AppSettings;
use crate::timeline::{
    draw_indicators, draw_live_heat, plan_indicators, plan_live_heat, PlaybackClock,
};
use crate::tooltip;
use eframe::egui;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One activity heatmap: its own canvas lifecycle, pixel buffer, GPU texture
/// and the frame plan the tooltip overlay reads from.
struct HeatmapPanel {
    activity: String,
    canvas: CanvasController,
    buffer: FrameBuffer,
    texture: Option<egui::TextureHandle>,
    frame: HeatmapFrame,
}

impl HeatmapPanel {
    fn new(activity: String, canvas: CanvasController) -> Self {
        Self {
            activity,
            canvas,
            buffer: FrameBuffer::default(),
            texture: None,
            frame: HeatmapFrame::default(),
        }
    }
}

/// The animated floor-plan view: dynamic-mode canvas plus playback state.
struct TimelinePanel {
    canvas: CanvasController,
    buffer: FrameBuffer,
    texture: Option<egui::TextureHandle>,
    clock: PlaybackClock,
    selected_date: Option<String>,
    /// Live heatmap overlay toggle. View state only, reset per session.
    live_heatmap: bool,
}

impl TimelinePanel {
    fn new(canvas: CanvasController) -> Self {
        Self {
            canvas,
            buffer: FrameBuffer::default(),
            texture: None,
            clock: PlaybackClock::default(),
            selected_date: None,
            live_heatmap: false,
        }
    }
}

#[derive(Default)]
struct CombinationForm {
    /// Name of the combination being edited, `None` while adding.
    editing: Option<String>,
    name: String,
    selected: BTreeSet<String>,
}

impl CombinationForm {
    fn clear(&mut self) {
        self.editing = None;
        self.name.clear();
        self.selected.clear();
    }
}

pub struct FloorsightApp {
    settings: AppSettings,
    settings_path: PathBuf,
    store: RegionStore,
    stats_cache: StatsCache,
    dataset: Option<ActivityDataset>,
    floor_plan: Option<FloorPlan>,
    image_bytes: Option<Arc<Vec<u8>>>,
    panels: Vec<HeatmapPanel>,
    timeline: Option<TimelinePanel>,
    selected_dates: BTreeSet<String>,
    hidden_activities: HashSet<String>,
    manage_regions_open: bool,
    combo_form: CombinationForm,
    status: Option<String>,
    dataset_path_input: String,
    floor_plan_path_input: String,
    image_path_input: String,
}

impl FloorsightApp {
    pub fn new(settings: AppSettings, settings_path: PathBuf, store: RegionStore) -> Self {
        let mut app = Self {
            dataset_path_input: settings.last_dataset_path.clone().unwrap_or_default(),
            floor_plan_path_input: settings.last_floor_plan_path.clone().unwrap_or_default(),
            image_path_input: settings.last_layout_image_path.clone().unwrap_or_default(),
            settings,
            settings_path,
            store,
            stats_cache: StatsCache::new(),
            dataset: None,
            floor_plan: None,
            image_bytes: None,
            panels: Vec::new(),
            timeline: None,
            selected_dates: BTreeSet::new(),
            hidden_activities: HashSet::new(),
            manage_regions_open: false,
            combo_form: CombinationForm::default(),
            status: None,
        };
        // Best-effort restore of the previous session's files.
        if !app.floor_plan_path_input.is_empty() {
            app.load_floor_plan_from_input();
        }
        if !app.image_path_input.is_empty() {
            app.load_image_from_input();
        }
        if !app.dataset_path_input.is_empty() {
            app.load_dataset_from_input();
        }
        app.status = None;
        app
    }

    fn save_settings(&self) {
        if let Err(err) = self.settings.save(&self.settings_path) {
            tracing::warn!(error = %err, "failed to save settings");
        }
    }

    fn save_store(&mut self) {
        match persist::save(&self.store) {
            Ok(path) => tracing::debug!(path = %path.display(), "region store saved"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to save region combinations");
                self.status = Some(format!("Could not save region combinations: {err}"));
            }
        }
    }

    fn mark_canvases_dirty(&mut self) {
        for panel in &mut self.panels {
            panel.canvas.mark_dirty();
        }
        if let Some(timeline) = &mut self.timeline {
            timeline.canvas.mark_dirty();
        }
    }

    fn load_dataset_from_input(&mut self) {
        match load_dataset(Path::new(&self.dataset_path_input)) {
            Ok(dataset) => {
                self.selected_dates = dataset.dates().into_iter().collect();
                self.stats_cache.retain_dataset(dataset.version);
                self.status = Some(format!(
                    "Loaded {} records ({} to {})",
                    dataset.records.len(),
                    dataset.metadata.date_range.start,
                    dataset.metadata.date_range.end
                ));
                self.dataset = Some(dataset);
                self.settings.last_dataset_path = Some(self.dataset_path_input.clone());
                self.save_settings();
                self.mark_canvases_dirty();
            }
            Err(err) => self.status = Some(format!("{err:#}")),
        }
    }

    fn load_floor_plan_from_input(&mut self) {
        match load_floor_plan(Path::new(&self.floor_plan_path_input)) {
            Ok(plan) => {
                self.status = Some(format!("Loaded {} regions", plan.layout.regions.len()));
                self.floor_plan = Some(plan);
                self.settings.last_floor_plan_path = Some(self.floor_plan_path_input.clone());
                self.save_settings();
                self.rebuild_canvases();
            }
            Err(err) => self.status = Some(format!("{err:#}")),
        }
    }

    fn load_image_from_input(&mut self) {
        match std::fs::read(Path::new(&self.image_path_input)) {
            Ok(bytes) => {
                self.image_bytes = Some(Arc::new(bytes));
                self.settings.last_layout_image_path = Some(self.image_path_input.clone());
                self.save_settings();
                self.rebuild_canvases();
            }
            Err(err) => self.status = Some(format!("Could not read layout image: {err}")),
        }
    }

    /// (Re)creates the per-panel canvases once both the floor plan and the
    /// layout image are available. Any previous canvases are dropped, which
    /// also cancels their pending decode retries.
    fn rebuild_canvases(&mut self) {
        let (Some(plan), Some(bytes)) = (&self.floor_plan, &self.image_bytes) else {
            return;
        };
        let aspect = plan.layout.aspect_ratio();
        self.panels = self
            .settings
            .panel_activities
            .iter()
            .map(|activity| {
                HeatmapPanel::new(
                    activity.clone(),
                    CanvasController::new(Arc::clone(bytes), aspect),
                )
            })
            .collect();
        self.timeline = Some(TimelinePanel::new(CanvasController::new(
            Arc::clone(bytes),
            aspect,
        )));
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Dataset:");
            ui.add(
                egui::TextEdit::singleline(&mut self.dataset_path_input).desired_width(220.0),
            );
            if ui.button("Load").clicked() {
                self.load_dataset_from_input();
            }
            ui.separator();
            ui.label("Floor plan:");
            ui.add(
                egui::TextEdit::singleline(&mut self.floor_plan_path_input).desired_width(220.0),
            );
            if ui.button("Load").clicked() {
                self.load_floor_plan_from_input();
            }
            ui.separator();
            ui.label("Layout image:");
            ui.add(egui::TextEdit::singleline(&mut self.image_path_input).desired_width(220.0));
            if ui.button("Load").clicked() {
                self.load_image_from_input();
            }
        });

        ui.horizontal(|ui| {
            if ui
                .checkbox(&mut self.settings.show_instances, "Show instances")
                .changed()
            {
                self.save_settings();
                self.mark_canvases_dirty();
            }
            if ui
                .checkbox(&mut self.settings.use_combined_regions, "Combined regions")
                .changed()
            {
                self.save_settings();
                self.mark_canvases_dirty();
            }
            if ui.button("Manage regions").clicked() {
                self.manage_regions_open = true;
            }
            if let Some(status) = &self.status {
                ui.separator();
                ui.weak(status);
            }
        });
    }

    fn date_selector_ui(&mut self, ui: &mut egui::Ui) {
        let Some(dates) = self.dataset.as_ref().map(|d| d.dates()) else {
            return;
        };
        ui.horizontal_wrapped(|ui| {
            ui.label("Dates:");
            for date in dates {
                let mut selected = self.selected_dates.contains(&date);
                if ui.toggle_value(&mut selected, &date).changed() {
                    if selected {
                        self.selected_dates.insert(date.clone());
                    } else {
                        self.selected_dates.remove(&date);
                    }
                    self.mark_canvases_dirty();
                }
            }
        });
    }

    fn heatmap_grid_ui(&mut self, ui: &mut egui::Ui) {
        let Some(dataset) = &self.dataset else {
            ui.weak("Load a dataset, a floor plan and a layout image to begin.");
            return;
        };
        let Some(plan) = &self.floor_plan else {
            ui.weak("Load a floor plan and a layout image to see the heatmap.");
            return;
        };
        if self.panels.is_empty() {
            ui.weak("Load a layout image to see the heatmap.");
            return;
        }

        let records = dataset.filtered(&self.selected_dates, &self.hidden_activities);
        let available = dataset.activities(&self.hidden_activities);
        let snapshot = self.store.snapshot();
        let options = AggregateOptions {
            show_instances: self.settings.show_instances,
            use_combined_regions: self.settings.use_combined_regions,
        };
        let fingerprint = filter_fingerprint(self.selected_dates.iter().map(String::as_str));
        let dataset_version = dataset.version;

        let mut activity_changes: Vec<(usize, String)> = Vec::new();
        let panel_count = self.panels.len();
        let panels = &mut self.panels;
        let cache = &self.stats_cache;

        ui.columns(panel_count, |columns| {
            for (index, panel) in panels.iter_mut().enumerate() {
                let ui = &mut columns[index];

                egui::ComboBox::from_id_source(("heatmap-activity", index))
                    .selected_text(panel.activity.clone())
                    .show_ui(ui, |ui| {
                        for activity in &available {
                            if ui
                                .selectable_label(panel.activity == *activity, activity)
                                .clicked()
                                && panel.activity != *activity
                            {
                                activity_changes.push((index, activity.clone()));
                            }
                        }
                    });

                panel.canvas.poll_decode();
                match panel.canvas.phase().clone() {
                    CanvasPhase::Loading => {
                        ui.spinner();
                        ui.ctx().request_repaint();
                        continue;
                    }
                    CanvasPhase::Error(message) => {
                        ui.colored_label(egui::Color32::RED, message);
                        continue;
                    }
                    CanvasPhase::Ready => {}
                }

                panel.canvas.resize(ui.available_width());
                let (canvas_w, canvas_h) = panel.canvas.size();
                if canvas_w == 0 || canvas_h == 0 {
                    continue;
                }

                if panel.canvas.needs_redraw(RenderMode::Static) {
                    let key = StatsKey {
                        dataset_version,
                        store_revision: snapshot.revision,
                        activity: panel.activity.clone(),
                        show_instances: options.show_instances,
                        use_combined_regions: options.use_combined_regions,
                        filter_fingerprint: fingerprint,
                    };
                    let heat = cache.get_or_compute(key, || {
                        aggregate(&records, &panel.activity, options, &snapshot)
                    });
                    panel.frame = plan_frame(
                        &plan.layout,
                        &snapshot,
                        &heat,
                        options,
                        canvas_w as f32,
                        canvas_h as f32,
                    );
                    if let Some(base) = panel.canvas.scaled_base() {
                        panel.buffer.compose(base, &panel.frame);
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(
                            [canvas_w as usize, canvas_h as usize],
                            panel.buffer.rgba_pixels(),
                        );
                        match &mut panel.texture {
                            Some(texture) => {
                                texture.set(color_image, egui::TextureOptions::LINEAR)
                            }
                            None => {
                                panel.texture = Some(ui.ctx().load_texture(
                                    format!("heatmap-{index}"),
                                    color_image,
                                    egui::TextureOptions::LINEAR,
                                ));
                            }
                        }
                    }
                    panel.canvas.complete_redraw();
                }

                let display_width = ui.available_width();
                let display_height = display_width * canvas_h as f32 / canvas_w as f32;
                let (rect, _response) = ui.allocate_exact_size(
                    egui::vec2(display_width, display_height),
                    egui::Sense::hover(),
                );
                if let Some(texture) = &panel.texture {
                    ui.painter().image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                draw_region_labels(ui.painter(), rect, &panel.frame);
                tooltip::overlay(ui, rect, &panel.frame, options.show_instances);
            }
        });

        for (index, activity) in activity_changes {
            self.panels[index].activity = activity.clone();
            self.panels[index].canvas.mark_dirty();
            if let Some(slot) = self.settings.panel_activities.get_mut(index) {
                *slot = activity;
            }
            self.save_settings();
        }
    }

    fn timeline_ui(&mut self, ui: &mut egui::Ui) {
        let (Some(dataset), Some(plan), Some(timeline)) =
            (&self.dataset, &self.floor_plan, &mut self.timeline)
        else {
            ui.weak("The timeline needs a dataset, a floor plan and a layout image.");
            return;
        };

        timeline.canvas.poll_decode();
        match timeline.canvas.phase().clone() {
            CanvasPhase::Loading => {
                ui.spinner();
                ui.ctx().request_repaint();
                return;
            }
            CanvasPhase::Error(message) => {
                ui.colored_label(egui::Color32::RED, message);
                return;
            }
            CanvasPhase::Ready => {}
        }

        let dates = dataset.dates();
        if timeline.selected_date.is_none() {
            timeline.selected_date = dates.first().cloned();
        }

        let mut speed_changed = false;
        ui.horizontal(|ui| {
            let play_label = if timeline.clock.playing { "Pause" } else { "Play" };
            if ui.button(play_label).clicked() {
                timeline.clock.playing = !timeline.clock.playing;
            }
            ui.label("Speed:");
            if ui
                .add(egui::Slider::new(&mut self.settings.playback_speed, 1.0..=600.0).suffix("x"))
                .changed()
            {
                timeline.clock.speed = self.settings.playback_speed;
                speed_changed = true;
            }
            ui.checkbox(&mut timeline.live_heatmap, "Activity heatmap");
            egui::ComboBox::from_id_source("timeline-date")
                .selected_text(timeline.selected_date.clone().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for date in &dates {
                        let selected = timeline.selected_date.as_deref() == Some(date);
                        if ui.selectable_label(selected, date).clicked() {
                            timeline.selected_date = Some(date.clone());
                        }
                    }
                });
            let mut seconds = timeline.clock.seconds;
            if ui
                .add(
                    egui::Slider::new(&mut seconds, 0.0..=86_399.0)
                        .custom_formatter(|value, _| crate::format::format_clock(value)),
                )
                .changed()
            {
                timeline.clock.scrub(seconds);
            }
        });

        timeline.clock.tick(ui.input(|i| i.stable_dt).min(0.1));

        timeline.canvas.resize(ui.available_width());
        let (canvas_w, canvas_h) = timeline.canvas.size();
        if canvas_w == 0 || canvas_h == 0 {
            return;
        }

        // The base image only re-uploads on resize; the moving indicators are
        // painted as vector shapes on top every frame.
        if timeline.canvas.needs_redraw(RenderMode::Static) {
            if let Some(base) = timeline.canvas.scaled_base() {
                timeline.buffer.compose(base, &HeatmapFrame::default());
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [canvas_w as usize, canvas_h as usize],
                    timeline.buffer.rgba_pixels(),
                );
                match &mut timeline.texture {
                    Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                    None => {
                        timeline.texture = Some(ui.ctx().load_texture(
                            "timeline-base",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
            }
            timeline.canvas.complete_redraw();
        }

        let display_width = ui.available_width();
        let display_height = display_width * canvas_h as f32 / canvas_w as f32;
        let (rect, _response) =
            ui.allocate_exact_size(egui::vec2(display_width, display_height), egui::Sense::hover());
        if let Some(texture) = &timeline.texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if let Some(date) = &timeline.selected_date {
            let active = dataset.active_at(date, timeline.clock.seconds);
            if timeline.live_heatmap {
                let cells =
                    plan_live_heat(&plan.layout, &active, canvas_w as f32, canvas_h as f32);
                draw_live_heat(ui.painter(), rect, (canvas_w as f32, canvas_h as f32), &cells);
            }
            let plans =
                plan_indicators(&plan.layout, &active, canvas_w as f32, canvas_h as f32);
            draw_indicators(
                ui.painter(),
                rect,
                (canvas_w as f32, canvas_h as f32),
                &plans,
            );
            ui.weak(format!(
                "{} active at {}",
                active.len(),
                crate::format::format_clock(timeline.clock.seconds)
            ));
        }

        // Request the next frame only after this one finished drawing, so a
        // slow draw lowers the frame rate instead of building a backlog.
        if timeline.clock.playing {
            ui.ctx().request_repaint();
        }

        if speed_changed {
            self.save_settings();
        }
    }

    fn region_manager_ui(&mut self, ui: &mut egui::Ui) {
        let Some(plan) = &self.floor_plan else {
            ui.weak("Load a floor plan to manage its regions.");
            return;
        };
        let region_names: Vec<String> =
            plan.layout.regions.iter().map(|r| r.name.clone()).collect();

        ui.heading("Combinations");
        let combinations = self.store.combinations().to_vec();
        let mut store_changed = false;
        for combination in &combinations {
            ui.horizontal(|ui| {
                ui.strong(&combination.name);
                ui.weak(combination.regions.join(", "));
                if ui.small_button("Edit").clicked() {
                    self.combo_form.editing = Some(combination.name.clone());
                    self.combo_form.name = combination.name.clone();
                    self.combo_form.selected = combination.regions.iter().cloned().collect();
                }
                if ui.small_button("Remove").clicked() {
                    self.store.remove_combination(&combination.name);
                    store_changed = true;
                }
            });
        }
        if combinations.is_empty() {
            ui.weak("No combinations yet.");
        }

        ui.separator();
        let form_title = match &self.combo_form.editing {
            Some(old) => format!("Edit {old}"),
            None => "New combination".to_string(),
        };
        ui.label(form_title);
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.text_edit_singleline(&mut self.combo_form.name);
        });
        ui.horizontal_wrapped(|ui| {
            for name in &region_names {
                let claimed_elsewhere = self
                    .store
                    .combinations()
                    .iter()
                    .filter(|c| Some(&c.name) != self.combo_form.editing.as_ref())
                    .any(|c| c.regions.contains(name));
                let mut selected = self.combo_form.selected.contains(name);
                let checkbox = ui.add_enabled(
                    !claimed_elsewhere,
                    egui::Checkbox::new(&mut selected, name),
                );
                if checkbox.changed() {
                    if selected {
                        self.combo_form.selected.insert(name.clone());
                    } else {
                        self.combo_form.selected.remove(name);
                    }
                }
            }
        });
        ui.horizontal(|ui| {
            let action = if self.combo_form.editing.is_some() {
                "Save changes"
            } else {
                "Add combination"
            };
            if ui.button(action).clicked() {
                // Stats and hit regions are keyed by name, so a combination
                // named after a raw region would be indistinguishable from it.
                if name_shadows_region(&region_names, &self.combo_form.name) {
                    self.status = Some(format!(
                        "{:?} is already a region name",
                        self.combo_form.name.trim()
                    ));
                } else {
                    let regions: Vec<String> =
                        self.combo_form.selected.iter().cloned().collect();
                    let result = match self.combo_form.editing.clone() {
                        Some(old) => {
                            self.store
                                .update_combination(&old, &self.combo_form.name, regions)
                        }
                        None => self.store.add_combination(&self.combo_form.name, regions),
                    };
                    match result {
                        Ok(()) => {
                            self.combo_form.clear();
                            self.status = None;
                            store_changed = true;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "rejected combination edit");
                            self.status = Some(err.to_string());
                        }
                    }
                }
            }
            if self.combo_form.editing.is_some() && ui.button("Cancel").clicked() {
                self.combo_form.clear();
            }
        });

        ui.separator();
        ui.heading("Excluded regions");
        ui.horizontal_wrapped(|ui| {
            for name in &region_names {
                let mut excluded = self.store.excluded().contains(name);
                if ui.checkbox(&mut excluded, name).changed() {
                    self.store.toggle_exclusion(name);
                    store_changed = true;
                }
            }
        });

        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::RED, status);
        }

        if store_changed {
            self.save_store();
            self.mark_canvases_dirty();
        }
    }
}

/// Whether a proposed combination name collides with a raw region name of
/// the loaded floor plan.
fn name_shadows_region(region_names: &[String], candidate: &str) -> bool {
    let candidate = candidate.trim();
    region_names.iter().any(|name| name == candidate)
}

/// Paints region labels over the displayed canvas: a white outline built
/// from offset copies beneath black fill text, rotated for tall regions.
fn draw_region_labels(painter: &egui::Painter, canvas_rect: egui::Rect, frame: &HeatmapFrame) {
    if frame.canvas_size.0 <= 0.0 {
        return;
    }
    let scale = canvas_rect.width() / frame.canvas_size.0;

    for paint in &frame.paints {
        let Some(label) = &paint.label else {
            continue;
        };
        let font = egui::FontId::proportional((label.font_size * scale).max(4.0));
        let center = canvas_rect.min
            + egui::vec2(label.center.0 * scale, label.center.1 * scale);
        let angle = if label.rotated {
            -std::f32::consts::FRAC_PI_2
        } else {
            0.0
        };

        let outline_galley =
            painter.layout_no_wrap(label.text.clone(), font.clone(), egui::Color32::WHITE);
        let fill_galley = painter.layout_no_wrap(label.text.clone(), font, egui::Color32::BLACK);
        let pos = rotated_anchor(center, fill_galley.size(), angle);
        let outline = (label.outline_width * scale).max(0.5);

        let offsets = [
            (-outline, 0.0),
            (outline, 0.0),
            (0.0, -outline),
            (0.0, outline),
            (-outline, -outline),
            (outline, -outline),
            (-outline, outline),
            (outline, outline),
        ];
        for (dx, dy) in offsets {
            let mut shape = egui::epaint::TextShape::new(
                pos + egui::vec2(dx, dy),
                outline_galley.clone(),
                egui::Color32::WHITE,
            );
            shape.angle = angle;
            painter.add(shape);
        }
        let mut shape = egui::epaint::TextShape::new(pos, fill_galley, egui::Color32::BLACK);
        shape.angle = angle;
        painter.add(shape);
    }
}

/// Top-left anchor such that the galley's center lands on `center` after
/// rotation around the anchor.
fn rotated_anchor(center: egui::Pos2, size: egui::Vec2, angle: f32) -> egui::Pos2 {
    let (sin, cos) = angle.sin_cos();
    let half = size / 2.0;
    let rotated_half = egui::vec2(half.x * cos - half.y * sin, half.x * sin + half.y * cos);
    center - rotated_half
}

impl eframe::App for FloorsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.controls_ui(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.date_selector_ui(ui);
                self.heatmap_grid_ui(ui);
                ui.separator();
                ui.collapsing("Timeline", |ui| {
                    self.timeline_ui(ui);
                });
            });
        });

        if self.manage_regions_open {
            let mut open = self.manage_regions_open;
            egui::Window::new("Manage regions")
                .open(&mut open)
                .resizable(true)
                .show(ctx, |ui| {
                    self.region_manager_ui(ui);
                });
            self.manage_regions_open = open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::name_shadows_region;

    #[test]
    fn combination_names_may_not_shadow_raw_regions() {
        let regions = vec!["Dock".to_string(), "Office".to_string()];
        assert!(name_shadows_region(&regions, "Dock"));
        assert!(name_shadows_region(&regions, "  Office  "));
        assert!(!name_shadows_region(&regions, "East"));
        assert!(!name_shadows_region(&regions, "dock"));
    }
}
