use crate::planet::events::*;
use crate::planet::resources::{PlanetBuild, PlanetStats, ViewerSettings};
use bevy::app::AppExit;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

pub fn render_planet_ui(
    mut contexts: EguiContexts,
    mut settings: ResMut<ViewerSettings>,
    build: Res<PlanetBuild>,
    stats: Res<PlanetStats>,
    mut level_requests: MessageWriter<RequestLevelEvent>,
    mut new_seed_events: MessageWriter<GenerateNewSeedEvent>,
    mut regenerate_events: MessageWriter<RegeneratePlanetEvent>,
    mut app_exit_events: MessageWriter<AppExit>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::right("settings_panel")
        .default_width(300.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Planet");
            ui.add_space(10.0);

            ui.label("Seed");
            ui.horizontal(|ui| {
                ui.label(settings.user_seed.to_string());
                if ui.button("New seed").clicked() {
                    new_seed_events.write(GenerateNewSeedEvent);
                }
            });
            ui.add_space(10.0);

            ui.label("Level of detail");
            let max_depth = settings.max_depth;
            if ui
                .add(egui::Slider::new(&mut settings.lod, 0..=max_depth))
                .changed()
            {
                level_requests.write(RequestLevelEvent);
            }
            ui.add_space(10.0);

            ui.label("Fault node density");
            ui.add(egui::Slider::new(&mut settings.node_density, 0.01..=0.99).step_by(0.01));
            if ui.button("Regenerate").clicked() {
                regenerate_events.write(RegeneratePlanetEvent);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            if build.is_running() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Building...");
                });
            }
            egui::Grid::new("planet_stats").show(ui, |ui| {
                ui.label("Level");
                ui.label(stats.depth.to_string());
                ui.end_row();
                ui.label("Faces");
                ui.label(stats.faces.to_string());
                ui.end_row();
                ui.label("Fault links");
                ui.label(stats.fault_links.to_string());
                ui.end_row();
                ui.label("Fault edges");
                ui.label(stats.fault_edges.to_string());
                ui.end_row();
                ui.label("Plates");
                ui.label(stats.plates.to_string());
                ui.end_row();
            });

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(10.0);

            if ui.button("Quit").clicked() {
                app_exit_events.write(AppExit::Success);
            }
        });
}
