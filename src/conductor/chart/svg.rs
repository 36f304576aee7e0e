//! SVG bar chart drawing.

use super::series::ExtractedSeries;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: usize = 5;

pub const PALETTE: [&str; 4] = ["#00aaff", "#00ffaa", "#ffaa00", "#ff5555"];

static BAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<rect class="bar"[^>]*?data-label="([^"]*)"[^>]*?data-value="([^"]*)""#)
        .expect("bar pattern is valid")
});

/// Draw `series` as a bar chart, one bar per point in input order
pub fn render_svg(series: &ExtractedSeries, title: &str, y_label: &str) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let values = series.values();
    // The axis always includes zero
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let mut hi = values.iter().copied().fold(0.0_f64, f64::max);
    if hi == lo {
        hi = lo + 1.0;
    }
    // Work in units of the largest magnitude so the span cannot overflow
    let scale = hi.max(-lo);
    let (hi_s, lo_s) = (hi / scale, lo / scale);
    let span = hi_s - lo_s;
    let y_of = |v: f64| MARGIN_TOP + (hi_s - v / scale) / span * plot_h;
    let baseline = y_of(0.0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text class="title" x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0 + 6.0,
        escape(title)
    );

    // y axis, ticks and label
    let _ = writeln!(
        svg,
        r#"<line x1="{x}" y1="{t}" x2="{x}" y2="{b}" stroke="black"/>"#,
        x = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = MARGIN_TOP + plot_h
    );
    for i in 0..=Y_TICKS {
        let v = scale * (lo_s + span * i as f64 / Y_TICKS as f64);
        let y = y_of(v);
        let _ = writeln!(
            svg,
            r#"<line x1="{x1}" y1="{y:.2}" x2="{x2}" y2="{y:.2}" stroke="black"/><text x="{tx}" y="{ty:.2}" text-anchor="end" font-size="11">{label}</text>"#,
            x1 = MARGIN_LEFT - 5.0,
            x2 = MARGIN_LEFT,
            tx = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
            label = format_tick(v)
        );
    }
    let _ = writeln!(
        svg,
        r#"<text class="y-label" x="{x}" y="{y}" text-anchor="middle" font-size="12" transform="rotate(-90 {x} {y})">{label}</text>"#,
        x = 18.0,
        y = MARGIN_TOP + plot_h / 2.0,
        label = escape(y_label)
    );

    // bars
    let slot = if series.is_empty() {
        plot_w
    } else {
        plot_w / series.len() as f64
    };
    for (i, point) in series.points().iter().enumerate() {
        let x = MARGIN_LEFT + slot * i as f64 + slot * 0.1;
        let top = y_of(point.value);
        let (y, h) = if top < baseline {
            (top, baseline - top)
        } else {
            (baseline, top - baseline)
        };
        let _ = writeln!(
            svg,
            r#"<rect class="bar" x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" data-label="{label}" data-value="{value}"/>"#,
            w = slot * 0.8,
            fill = PALETTE[i % PALETTE.len()],
            label = escape(&point.label),
            value = point.value
        );

        let cx = x + slot * 0.4;
        let ly = MARGIN_TOP + plot_h + 16.0;
        let _ = writeln!(
            svg,
            r#"<text class="x-label" x="{cx:.2}" y="{ly:.2}" text-anchor="end" font-size="11" transform="rotate(-15 {cx:.2} {ly:.2})">{label}</text>"#,
            label = escape(&point.label)
        );
    }

    // x axis on the zero line
    let _ = writeln!(
        svg,
        r#"<line x1="{l}" y1="{y:.2}" x2="{r}" y2="{y:.2}" stroke="black"/>"#,
        l = MARGIN_LEFT,
        r = MARGIN_LEFT + plot_w,
        y = baseline
    );
    svg.push_str("</svg>\n");
    svg
}

/// Re-read bar metadata from a chart produced by [`render_svg`]
pub fn read_bars(svg: &str) -> Vec<(String, f64)> {
    BAR_RE
        .captures_iter(svg)
        .filter_map(|c| {
            let value = c[2].parse().ok()?;
            Some((unescape(&c[1]), value))
        })
        .collect()
}

fn format_tick(v: f64) -> String {
    let rounded = if v.abs() < 1e15 {
        (v * 100.0).round() / 100.0
    } else {
        v
    };
    let s = format!("{:.2}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
