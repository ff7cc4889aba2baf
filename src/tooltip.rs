use crate::aggregate::RegionStats;
use crate::format::format_duration;
use crate::heatmap::HeatmapFrame;
use eframe::egui;

/// Transparent hover areas over the rendered heatmap, one per hit region,
/// scaled from canvas pixel space to the displayed rectangle. Purely
/// presentational; all numbers come from the frame's stats snapshot.
pub fn overlay(
    ui: &mut egui::Ui,
    canvas_rect: egui::Rect,
    frame: &HeatmapFrame,
    show_instances: bool,
) {
    if frame.canvas_size.0 <= 0.0 || frame.canvas_size.1 <= 0.0 {
        return;
    }
    let scale_x = canvas_rect.width() / frame.canvas_size.0;
    let scale_y = canvas_rect.height() / frame.canvas_size.1;

    for (name, hit) in &frame.hit_regions {
        let screen_rect = egui::Rect::from_min_size(
            canvas_rect.min
                + egui::vec2(hit.rect.x * scale_x, hit.rect.y * scale_y),
            egui::vec2(hit.rect.width * scale_x, hit.rect.height * scale_y),
        );
        let response = ui.interact(
            screen_rect,
            ui.id().with(("heatmap-tooltip", name)),
            egui::Sense::hover(),
        );
        if response.hovered() {
            response.on_hover_ui(|ui| {
                if show_instances {
                    histogram_tooltip(ui, &hit.stats);
                } else {
                    duration_tooltip(ui, &hit.stats);
                }
            });
        }
    }
}

fn duration_tooltip(ui: &mut egui::Ui, stats: &RegionStats) {
    header(ui, stats);
    egui::Grid::new("tooltip-duration").num_columns(2).show(ui, |ui| {
        ui.label("Duration:");
        ui.strong(format_duration(stats.total_duration));
        ui.end_row();
        ui.label("Instances:");
        ui.strong(stats.instance_count.to_string());
        ui.end_row();
        ui.label("Average:");
        ui.strong(format_duration(stats.average_duration));
        ui.end_row();
        ui.label("% of total:");
        ui.strong(format!("{:.1}%", stats.percentage));
        ui.end_row();
    });
}

fn histogram_tooltip(ui: &mut egui::Ui, stats: &RegionStats) {
    header(ui, stats);
    egui::Grid::new("tooltip-histogram").num_columns(2).show(ui, |ui| {
        for bucket in &stats.histogram {
            ui.label(&bucket.label);
            ui.strong(bucket.count.to_string());
            ui.end_row();
        }
        ui.label("Total instances:");
        ui.strong(stats.instance_count.to_string());
        ui.end_row();
        ui.label("% of total:");
        ui.strong(format!("{:.1}%", stats.percentage));
        ui.end_row();
    });
}

fn header(ui: &mut egui::Ui, stats: &RegionStats) {
    ui.horizontal(|ui| {
        ui.strong(&stats.activity);
        ui.weak(&stats.region);
    });
    ui.separator();
}
