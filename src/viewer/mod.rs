mod draw;
mod interaction;

use eframe::egui;

use crate::geometry::LayoutConfig;
use crate::graph::SchemaGraph;
use crate::model::Schema;
use crate::orchestrator::{compute_layout, drag_node, LayoutResult};

/// Desktop pan/zoom/drag viewer. Pure presentation: the pan offset, zoom
/// scale, hovered/selected node, and search text live here and nowhere near
/// the layout or routing code. A drag rebuilds the graph transiently (it
/// borrows from `schema`, which the viewer owns for its whole lifetime) and
/// asks the orchestrator to re-route — it never touches column or row
/// assignment.
pub struct Viewer {
    schema: Schema,
    config: LayoutConfig,
    result: LayoutResult,
    pan: egui::Vec2,
    zoom: f32,
    dragging: Option<petgraph::graph::NodeIndex>,
    search: String,
}

impl Viewer {
    pub fn new(schema: Schema) -> Self {
        let config = LayoutConfig::default();
        let graph = SchemaGraph::build(&schema, &config);
        let result = compute_layout(&graph, &config);
        Viewer { schema, config, result, pan: egui::Vec2::ZERO, zoom: 1.0, dragging: None, search: String::new() }
    }

    fn move_node(&mut self, node: petgraph::graph::NodeIndex, new_position: crate::geometry::Point) {
        let graph = SchemaGraph::build(&self.schema, &self.config);
        drag_node(&graph, &mut self.result, node, new_position, &self.config);
    }
}

impl eframe::App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut self.search);
                ui.separator();
                ui.label(format!("zoom {:.0}%", self.zoom * 100.0));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let graph = SchemaGraph::build(&self.schema, &self.config);
            interaction::handle_pan_zoom(ui, &mut self.pan, &mut self.zoom);
            if let Some((node, new_pos)) = interaction::handle_drag(ui, &graph, &self.result, self.pan, self.zoom, &mut self.dragging) {
                drop(graph);
                self.move_node(node, new_pos);
                return;
            }
            draw::paint(ui, &graph, &self.result, &self.config, self.pan, self.zoom, &self.search);
        });
    }
}

/// Builds the eframe window and blocks until it's closed: a plain
/// `NativeOptions` with a sized `ViewportBuilder`, handed to
/// `eframe::run_native`.
pub fn render_window(schema: Schema) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "schema-erd",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(schema)))),
    )
}
