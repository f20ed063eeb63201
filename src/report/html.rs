use std::fmt::Write as FmtWrite;

use serde::Serialize;
use thiserror::Error;

use crate::report::{SummaryData, format_pct, format_speed, format_value};

pub const PARKINSONS_COLOR: &str = "#e63946";
pub const CONTROL_COLOR: &str = "#457b9d";
pub const THRESHOLD_COLOR: &str = "#d62828";

const CHART_W: f64 = 820.0;
const CHART_H: f64 = 420.0;

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ChartSeries<'a> {
    pub label: &'a str,
    pub color: &'static str,
    pub speeds: &'a [f64],
    pub counts: &'a [usize],
    /// Density curve already scaled to counts per bin.
    pub density: Option<&'a [(f64, f64)]>,
}

#[derive(Debug, Clone)]
pub struct ChartData<'a> {
    pub edges: &'a [f64],
    pub threshold: f64,
    pub series: [ChartSeries<'a>; 2],
}

#[derive(Serialize)]
struct EmbeddedSeries<'a> {
    label: &'a str,
    speeds: &'a [f64],
    counts: &'a [usize],
}

#[derive(Serialize)]
struct EmbeddedData<'a> {
    threshold: f64,
    edges: &'a [f64],
    series: Vec<EmbeddedSeries<'a>>,
}

/// Speed arrays as a JSON literal safe to drop inside a `<script>` element.
pub fn embedded_data_json(chart: &ChartData<'_>) -> Result<String, serde_json::Error> {
    let data = EmbeddedData {
        threshold: chart.threshold,
        edges: chart.edges,
        series: chart
            .series
            .iter()
            .map(|s| EmbeddedSeries {
                label: s.label,
                speeds: s.speeds,
                counts: s.counts,
            })
            .collect(),
    };
    Ok(serde_json::to_string(&data)?.replace("</", "<\\/"))
}

pub fn render_html(summary: &SummaryData, chart: &ChartData<'_>) -> Result<String, HtmlError> {
    let mut html = String::with_capacity(64 * 1024);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>"
    )?;
    writeln!(html, "<title>{} gait speed report</title>", summary.tool.name)?;
    writeln!(html, "<style>")?;
    writeln!(
        html,
        "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}}"
    )?;
    writeln!(html, "h1{{margin:0 0 8px 0;font-size:24px;}}")?;
    writeln!(html, "h2{{margin:24px 0 8px 0;font-size:20px;}}")?;
    writeln!(
        html,
        ".meta{{color:#555;font-size:13px;margin-bottom:16px;}}"
    )?;
    writeln!(
        html,
        ".summary{{border-collapse:collapse;margin:12px 0 20px 0;width:100%;max-width:820px;}}"
    )?;
    writeln!(
        html,
        ".summary th,.summary td{{border:1px solid #ddd;padding:6px 10px;text-align:right;}}"
    )?;
    writeln!(
        html,
        ".summary th:first-child,.summary td:first-child{{text-align:left;}}"
    )?;
    writeln!(html, "svg{{background:#fafafa;border:1px solid #e5e5e5;}}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    writeln!(html, "<h1>Gait speed: Parkinson&#39;s vs. Control</h1>")?;
    writeln!(
        html,
        "<div class=\"meta\">Input: {}<br/>Load strategy: {}<br/>Records: {} of {} data rows<br/>Tool: {} {}</div>",
        escape_html(&summary.input.path),
        summary.input.strategy,
        summary.input.records,
        summary.input.rows_read,
        escape_html(&summary.tool.name),
        escape_html(&summary.tool.version)
    )?;

    writeln!(html, "<h2>Summary</h2>")?;
    writeln!(html, "<table class=\"summary\">")?;
    writeln!(
        html,
        "<tr><th>Cohort</th><th>n</th><th>Mean (m/s)</th><th>SD</th><th>Min</th><th>Max</th><th>&lt; {} m/s</th></tr>",
        format_value(summary.threshold)
    )?;
    for c in &summary.cohorts {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} ({}%)</td></tr>",
            escape_html(c.label),
            c.n,
            format_speed(c.mean),
            format_speed(c.std_dev),
            format_speed(c.min),
            format_speed(c.max),
            c.below_threshold,
            format_pct(c.below_threshold_pct)
        )?;
    }
    writeln!(html, "</table>")?;
    writeln!(
        html,
        "<p>Percentage difference in mean speed (Control vs. Parkinson&#39;s): <b>{}%</b></p>",
        format_pct(summary.percent_difference)
    )?;

    writeln!(html, "<h2>Distribution</h2>")?;
    svg_dual_histogram(&mut html, chart, CHART_W, CHART_H)?;

    writeln!(
        html,
        "<script type=\"application/json\" id=\"gait-data\">{}</script>",
        embedded_data_json(chart)?
    )?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn svg_dual_histogram(
    out: &mut String,
    chart: &ChartData<'_>,
    w: f64,
    h: f64,
) -> std::fmt::Result {
    writeln!(out, "<div class=\"plot\">")?;
    writeln!(
        out,
        "<svg width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        w, h, w, h
    )?;
    let left = 56.0;
    let right = 20.0;
    let top = 40.0;
    let bottom = 44.0;
    let plot_w = w - left - right;
    let plot_h = h - top - bottom;
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\" stroke=\"#ddd\"/>",
        left, top, plot_w, plot_h
    )?;

    let (x_min, x_max) = match (chart.edges.first(), chart.edges.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        _ => (0.0, 1.0),
    };
    let mut y_peak = 0.0f64;
    for s in &chart.series {
        for &c in s.counts {
            y_peak = y_peak.max(c as f64);
        }
        if let Some(curve) = s.density {
            for &(_, y) in curve {
                y_peak = y_peak.max(y);
            }
        }
    }
    let y_max = y_peak.ceil().max(1.0);
    let sx = |x: f64| left + (x - x_min) / (x_max - x_min) * plot_w;
    let sy = |y: f64| top + plot_h - y / y_max * plot_h;

    draw_y_ticks(out, left, top, plot_w, plot_h, y_max, 5)?;
    draw_x_ticks(out, left, top, plot_w, plot_h, x_min, x_max, 6)?;
    draw_axis_labels(
        out,
        left,
        top,
        plot_w,
        plot_h,
        "Gait speed (m/s)",
        "Number of subjects",
    )?;

    for s in &chart.series {
        for (i, &count) in s.counts.iter().enumerate() {
            if count == 0 || i + 1 >= chart.edges.len() {
                continue;
            }
            let x0 = sx(chart.edges[i]);
            let x1 = sx(chart.edges[i + 1]);
            let y0 = sy(count as f64);
            writeln!(
                out,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"0.55\" stroke=\"#fff\" stroke-width=\"0.5\"/>",
                x0,
                y0,
                (x1 - x0).max(1.0),
                top + plot_h - y0,
                s.color
            )?;
        }
    }

    for s in &chart.series {
        let Some(curve) = s.density else {
            continue;
        };
        let mut points = String::new();
        for &(x, y) in curve {
            write!(points, "{:.2},{:.2} ", sx(x), sy(y))?;
        }
        writeln!(
            out,
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            points.trim_end(),
            s.color
        )?;
    }

    if chart.threshold >= x_min && chart.threshold <= x_max {
        let tx = sx(chart.threshold);
        writeln!(
            out,
            "<line x1=\"{:.2}\" y1=\"{}\" x2=\"{:.2}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1.5\" stroke-dasharray=\"6,4\"/>",
            tx,
            top,
            tx,
            top + plot_h,
            THRESHOLD_COLOR
        )?;
        writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{}\" font-size=\"11\" fill=\"{}\">{} m/s</text>",
            tx + 4.0,
            top + 12.0,
            THRESHOLD_COLOR,
            format_value(chart.threshold)
        )?;
    }

    let mut lx = left;
    for s in &chart.series {
        writeln!(
            out,
            "<rect x=\"{}\" y=\"14\" width=\"12\" height=\"12\" fill=\"{}\" fill-opacity=\"0.55\"/>",
            lx, s.color
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"24\" font-size=\"12\">{}</text>",
            lx + 16.0,
            escape_html(s.label)
        )?;
        lx += 140.0;
    }

    writeln!(out, "</svg></div>")?;
    Ok(())
}

fn draw_y_ticks(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    y_max: f64,
    ticks: usize,
) -> std::fmt::Result {
    for i in 0..=ticks {
        let v = y_max * i as f64 / ticks as f64;
        let y = top + plot_h - plot_h * i as f64 / ticks as f64;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{:.2}\" x2=\"{}\" y2=\"{:.2}\" stroke=\"#eee\"/>",
            left,
            y,
            left + plot_w,
            y
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{:.2}\" font-size=\"10\" text-anchor=\"end\">{:.1}</text>",
            left - 6.0,
            y + 3.0,
            v
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_x_ticks(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    x_min: f64,
    x_max: f64,
    ticks: usize,
) -> std::fmt::Result {
    for i in 0..=ticks {
        let v = x_min + (x_max - x_min) * i as f64 / ticks as f64;
        let x = left + plot_w * i as f64 / ticks as f64;
        writeln!(
            out,
            "<line x1=\"{:.2}\" y1=\"{}\" x2=\"{:.2}\" y2=\"{}\" stroke=\"#999\"/>",
            x,
            top + plot_h,
            x,
            top + plot_h + 4.0
        )?;
        writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{}\" font-size=\"10\" text-anchor=\"middle\">{:.2}</text>",
            x,
            top + plot_h + 16.0,
            v
        )?;
    }
    Ok(())
}

fn draw_axis_labels(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    x_label: &str,
    y_label: &str,
) -> std::fmt::Result {
    writeln!(
        out,
        "<text x=\"{:.2}\" y=\"{}\" font-size=\"12\" text-anchor=\"middle\">{}</text>",
        left + plot_w / 2.0,
        top + plot_h + 36.0,
        escape_html(x_label)
    )?;
    let cy = top + plot_h / 2.0;
    writeln!(
        out,
        "<text x=\"14\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 14 {:.2})\">{}</text>",
        cy,
        cy,
        escape_html(y_label)
    )?;
    Ok(())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
