//! Inline SVG rendering for dashboard charts.

use crate::domain::chart::{ChartSpec, SeriesKind, XValue};
use crate::domain::query::CorrelationMatrix;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 360.0;
const PAD_LEFT: f64 = 80.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 50.0;
const PAD_BOTTOM: f64 = 50.0;

const PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// Viridis sampled at 0, .25, .5, .75, 1.
const VIRIDIS: [(f64, f64, f64); 5] = [
    (68.0, 1.0, 84.0),
    (59.0, 82.0, 139.0),
    (33.0, 145.0, 140.0),
    (94.0, 201.0, 98.0),
    (253.0, 231.0, 37.0),
];

pub fn render_chart(spec: &ChartSpec) -> String {
    if spec.is_empty() {
        return render_placeholder(&spec.title, "No data in the selected range.");
    }

    let points = spec.series.iter().flat_map(|s| s.x.iter().zip(&s.y));
    let mut x_min: Option<XValue> = None;
    let mut x_max: Option<XValue> = None;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (x, &y) in points {
        if x_min.is_none_or(|m| x.position() < m.position()) {
            x_min = Some(*x);
        }
        if x_max.is_none_or(|m| x.position() > m.position()) {
            x_max = Some(*x);
        }
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    let (Some(x_lo), Some(x_hi)) = (x_min, x_max) else {
        return render_placeholder(&spec.title, "No data in the selected range.");
    };
    if !y_min.is_finite() {
        return render_placeholder(&spec.title, "No numeric values to plot.");
    }

    let has_bars = spec.series.iter().any(|s| s.kind == SeriesKind::Bar);
    if has_bars {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }

    let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM;

    let x_range = x_hi.position() - x_lo.position();
    let y_range = y_max - y_min;
    let scale_y = if y_range > 0.0 {
        plot_height / y_range
    } else {
        1.0
    };
    let max_bars = spec
        .series
        .iter()
        .filter(|s| s.kind == SeriesKind::Bar)
        .map(|s| s.len())
        .max()
        .unwrap_or(0);
    // Bars need half a slot of room on each side.
    let (x_inset, slot) = if has_bars && max_bars > 0 {
        let slot = plot_width / max_bars as f64;
        (slot / 2.0, slot)
    } else {
        (0.0, 0.0)
    };
    let scale_x = if x_range > 0.0 {
        (plot_width - 2.0 * x_inset) / x_range
    } else {
        0.0
    };

    let to_x = |x: &XValue| {
        if x_range > 0.0 {
            PAD_LEFT + x_inset + (x.position() - x_lo.position()) * scale_x
        } else {
            PAD_LEFT + plot_width / 2.0
        }
    };
    let to_y = |y: f64| {
        if y_range > 0.0 {
            HEIGHT - PAD_BOTTOM - (y - y_min) * scale_y
        } else {
            PAD_TOP + plot_height / 2.0
        }
    };

    let mut svg = open_svg(WIDTH, HEIGHT);
    svg.push_str(&title_text(&spec.title));
    svg.push_str(&axes(plot_width, plot_height));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
        PAD_LEFT + plot_width / 2.0,
        HEIGHT - 10.0,
        escape(&spec.x_title)
    ));
    svg.push_str(&format!(
        r#"<text x="15" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 15 {:.1})">{}</text>"#,
        PAD_TOP + plot_height / 2.0,
        PAD_TOP + plot_height / 2.0,
        escape(&spec.y_title)
    ));
    svg.push_str(&tick_labels(&x_lo, &x_hi, y_min, y_max, x_inset));

    let bar_width = (slot * 0.8).max(1.0);
    for (i, series) in spec.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        match series.kind {
            SeriesKind::Line => {
                let coords: Vec<String> = series
                    .x
                    .iter()
                    .zip(&series.y)
                    .filter(|(_, y)| y.is_finite())
                    .map(|(x, &y)| format!("{:.1},{:.1}", to_x(x), to_y(y)))
                    .collect();
                if coords.len() == 1 {
                    let (x, y) = coords[0].split_once(',').unwrap_or(("0", "0"));
                    svg.push_str(&format!(
                        r#"<circle cx="{x}" cy="{y}" r="3" fill="{color}"/>"#
                    ));
                } else if !coords.is_empty() {
                    svg.push_str(&format!(
                        r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{}"/>"#,
                        coords.join(" ")
                    ));
                }
            }
            SeriesKind::Bar => {
                let base = to_y(0.0_f64.clamp(y_min, y_max));
                for (x, &y) in series.x.iter().zip(&series.y) {
                    if !y.is_finite() {
                        continue;
                    }
                    let top = to_y(y);
                    svg.push_str(&format!(
                        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{color}"/>"#,
                        to_x(x) - bar_width / 2.0,
                        top.min(base),
                        bar_width,
                        (base - top).abs()
                    ));
                }
            }
        }
    }

    svg.push_str(&legend(spec));
    svg.push_str("</svg>");
    svg
}

pub fn render_heatmap(title: &str, matrix: &CorrelationMatrix) -> String {
    let n = matrix.size();
    if n == 0 {
        return render_placeholder(title, "No columns to correlate.");
    }

    let label_width = 110.0;
    let cell = 60.0;
    let width = label_width + cell * n as f64 + PAD_RIGHT;
    let height = PAD_TOP + cell * n as f64 + 90.0;

    let mut svg = open_svg(width, height);
    svg.push_str(&title_text(title));

    for i in 0..n {
        let y = PAD_TOP + cell * i as f64;
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            label_width - 6.0,
            y + cell / 2.0 + 4.0,
            escape(matrix.columns[i].label())
        ));
        for j in 0..n {
            let x = label_width + cell * j as f64;
            let r = matrix.get(i, j);
            let (fill, text) = if r.is_finite() {
                (viridis((r + 1.0) / 2.0), format!("{:.2}", r))
            } else {
                ("#cccccc".to_string(), "n/a".to_string())
            };
            svg.push_str(&format!(
                r#"<rect class="cell" x="{x:.1}" y="{y:.1}" width="{cell:.1}" height="{cell:.1}" fill="{fill}"/>"#
            ));
            let ink = if r.is_finite() && r < 0.3 { "white" } else { "black" };
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11" fill="{ink}">{text}</text>"#,
                x + cell / 2.0,
                y + cell / 2.0 + 4.0
            ));
        }
    }

    let label_y = PAD_TOP + cell * n as f64 + 12.0;
    for (j, column) in matrix.columns.iter().enumerate() {
        let x = label_width + cell * j as f64 + cell / 2.0;
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{label_y:.1}" text-anchor="end" font-size="11" transform="rotate(-45 {x:.1} {label_y:.1})">{}</text>"#,
            escape(column.label())
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Empty frame carrying an explanatory message in place of a chart.
pub fn render_placeholder(title: &str, message: &str) -> String {
    let mut svg = open_svg(WIDTH, HEIGHT);
    svg.push_str(&title_text(title));
    svg.push_str(&format!(
        r##"<text class="placeholder" x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14" fill="#666">{}</text>"##,
        WIDTH / 2.0,
        HEIGHT / 2.0,
        escape(message)
    ));
    svg.push_str("</svg>");
    svg
}

fn open_svg(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width:.0} {height:.0}" width="100%" preserveAspectRatio="xMidYMid meet" font-family="sans-serif">"#
    )
}

fn title_text(title: &str) -> String {
    format!(
        r#"<text x="{:.1}" y="25" text-anchor="start" font-size="16" font-weight="bold">{}</text>"#,
        PAD_LEFT,
        escape(title)
    )
}

fn axes(plot_width: f64, plot_height: f64) -> String {
    let x0 = PAD_LEFT;
    let y0 = HEIGHT - PAD_BOTTOM;
    format!(
        r##"<line x1="{x0:.1}" y1="{PAD_TOP:.1}" x2="{x0:.1}" y2="{y0:.1}" stroke="#333"/><line x1="{x0:.1}" y1="{y0:.1}" x2="{:.1}" y2="{y0:.1}" stroke="#333"/>"##,
        x0 + plot_width,
    ) + &format!(
        r##"<rect x="{x0:.1}" y="{PAD_TOP:.1}" width="{plot_width:.1}" height="{plot_height:.1}" fill="none" stroke="#eee"/>"##
    )
}

fn tick_labels(x_lo: &XValue, x_hi: &XValue, y_min: f64, y_max: f64, x_inset: f64) -> String {
    let bottom = HEIGHT - PAD_BOTTOM;
    let mut out = String::new();
    out.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="start" font-size="10">{}</text>"#,
        PAD_LEFT + x_inset,
        bottom + 15.0,
        escape(&x_lo.to_string())
    ));
    if x_hi.position() > x_lo.position() {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{}</text>"#,
            WIDTH - PAD_RIGHT - x_inset,
            bottom + 15.0,
            escape(&x_hi.to_string())
        ));
    }
    out.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{}</text>"#,
        PAD_LEFT - 5.0,
        bottom,
        format_number(y_min)
    ));
    if y_max > y_min {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{}</text>"#,
            PAD_LEFT - 5.0,
            PAD_TOP + 10.0,
            format_number(y_max)
        ));
    }
    out
}

fn legend(spec: &ChartSpec) -> String {
    let mut out = String::new();
    for (i, series) in spec.series.iter().enumerate() {
        let y = PAD_TOP + 5.0 + 16.0 * i as f64;
        let x = WIDTH - PAD_RIGHT - 150.0;
        let color = PALETTE[i % PALETTE.len()];
        out.push_str(&format!(
            r#"<rect x="{x:.1}" y="{:.1}" width="10" height="10" fill="{color}"/><text class="legend" x="{:.1}" y="{y:.1}" font-size="11">{}</text>"#,
            y - 9.0,
            x + 15.0,
            escape(&series.label)
        ));
    }
    out
}

fn format_number(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else if abs >= 1.0 || abs == 0.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.4}", v)
    }
}

fn viridis(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f64;
    let (r0, g0, b0) = VIRIDIS[i];
    let (r1, g1, b1) = VIRIDIS[i + 1];
    let lerp = |a: f64, b: f64| (a + (b - a) * frac).round() as u8;
    format!("#{:02x}{:02x}{:02x}", lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
