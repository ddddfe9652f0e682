//! Visualization utilities for VRP solutions.
//!
//! A [`RenderPlan`] turns solutions into plain geometry (one panel per
//! solution, one closed polyline per vehicle). [`Visualizer`] draws a plan
//! as a single SVG with the panels side by side.

use crate::error::Result;
use crate::instance::{Location, VrpInstance};
use crate::solution::Solution;
use std::fmt::Write as _;
use std::path::Path;

/// Per-vehicle stroke colours, cycled when there are more vehicles
const ROUTE_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// Geometry for one solution
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Title shown above the panel
    pub label: String,
    /// Total distance of the solution
    pub cost: f64,
    pub depot: Location,
    /// Customer indices with their positions
    pub customers: Vec<(usize, Location)>,
    /// One polyline per vehicle, depot -> customers -> depot
    pub polylines: Vec<Vec<Location>>,
    /// Travel distance of each polyline
    pub route_costs: Vec<f64>,
}

/// Everything needed to draw a side-by-side comparison
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub panels: Vec<Panel>,
    /// Bounding box of all locations: (min_x, max_x, min_y, max_y)
    pub bounds: (f64, f64, f64, f64),
}

impl RenderPlan {
    pub fn new(instance: &VrpInstance, solutions: &[(Solution, &str)]) -> Self {
        let depot = instance.locations[instance.depot];
        let customers: Vec<(usize, Location)> = instance
            .customers()
            .into_iter()
            .map(|c| (c, instance.locations[c]))
            .collect();

        let panels = solutions
            .iter()
            .map(|(solution, label)| {
                let polylines = solution
                    .routes
                    .iter()
                    .map(|route| {
                        std::iter::once(depot)
                            .chain(route.iter().map(|&c| instance.locations[c]))
                            .chain(std::iter::once(depot))
                            .collect()
                    })
                    .collect();

                Panel {
                    label: label.to_string(),
                    cost: solution.cost,
                    depot,
                    customers: customers.clone(),
                    polylines,
                    route_costs: solution.route_costs(instance),
                }
            })
            .collect();

        RenderPlan {
            panels,
            bounds: get_bounds(&instance.locations),
        }
    }
}

fn get_bounds(locations: &[Location]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for loc in locations {
        min_x = min_x.min(loc.x);
        max_x = max_x.max(loc.x);
        min_y = min_y.min(loc.y);
        max_y = max_y.max(loc.y);
    }

    (min_x, max_x, min_y, max_y)
}

/// SVG visualization generator
pub struct Visualizer {
    /// Width of one panel
    pub panel_width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin around each panel's plotting area
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            panel_width: 500.0,
            height: 540.0,
            margin: 50.0,
            node_radius: 6.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an SVG with every panel of `plan` side by side
    pub fn generate_svg(&self, plan: &RenderPlan) -> String {
        let width = self.panel_width * plan.panels.len().max(1) as f64;
        let mut svg = String::new();

        let _ = write!(
            svg,
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>
    .customer {{ fill: #1f4fd8; stroke: #102a75; stroke-width: 1; }}
    .depot {{ fill: #e02020; stroke: #8b0000; stroke-width: 1; }}
    .route {{ stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            w = width,
            h = self.height
        );

        for (idx, panel) in plan.panels.iter().enumerate() {
            self.draw_panel(&mut svg, panel, plan.bounds, idx as f64 * self.panel_width);
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn draw_panel(&self, svg: &mut String, panel: &Panel, bounds: (f64, f64, f64, f64), offset_x: f64) {
        let (min_x, max_x, min_y, max_y) = bounds;
        let span = |lo: f64, hi: f64| if hi > lo { hi - lo } else { 1.0 };
        let plot = (self.panel_width - 2.0 * self.margin).min(self.height - 2.0 * self.margin);
        let scale = plot / span(min_x, max_x).max(span(min_y, max_y));

        let transform = |loc: &Location| -> (f64, f64) {
            let tx = offset_x + self.margin + (loc.x - min_x) * scale;
            let ty = self.height - self.margin - (loc.y - min_y) * scale;
            (tx, ty)
        };

        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="25" class="title">{} ({:.4})</text>"#,
            offset_x + self.margin,
            panel.label,
            panel.cost
        );

        for (vehicle, polyline) in panel.polylines.iter().enumerate() {
            let color = ROUTE_COLORS[vehicle % ROUTE_COLORS.len()];
            let points: Vec<String> = polyline
                .iter()
                .map(|loc| {
                    let (x, y) = transform(loc);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();

            let _ = writeln!(
                svg,
                r#"<polyline points="{}" class="route" stroke="{}"/>"#,
                points.join(" "),
                color
            );
        }

        for (id, loc) in &panel.customers {
            let (x, y) = transform(loc);
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{}" class="customer"/>"#,
                x, y, self.node_radius
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>"#,
                x,
                y - self.node_radius - 3.0,
                id
            );
        }

        let (dx, dy) = transform(&panel.depot);
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{r2}" height="{r2}" class="depot"/>"#,
            dx - self.node_radius,
            dy - self.node_radius,
            r2 = 2.0 * self.node_radius
        );

        // Legend
        let legend_x = offset_x + self.panel_width - self.margin - 100.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="40" width="10" height="10" class="depot"/><text x="{:.2}" y="49" class="label">Depot</text>"#,
            legend_x,
            legend_x + 15.0
        );
        for vehicle in 0..panel.route_costs.len() {
            let y = 55.0 + 14.0 * vehicle as f64;
            let _ = writeln!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="route" stroke="{}"/><text x="{:.2}" y="{:.2}" class="label">Vehicle {} ({:.2})</text>"#,
                legend_x,
                y + 5.0,
                legend_x + 10.0,
                y + 5.0,
                ROUTE_COLORS[vehicle % ROUTE_COLORS.len()],
                legend_x + 15.0,
                y + 9.0,
                vehicle + 1,
                panel.route_costs[vehicle]
            );
        }
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        std::fs::write(path, svg)?;
        Ok(())
    }
}
