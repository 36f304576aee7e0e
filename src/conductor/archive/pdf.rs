//! Minimal single-font PDF writer for plain-text reports.
//!
//! Text is set in Helvetica 12pt on A4 with 10mm margins and a 10mm line
//! height, word-wrapped to the page width and paginated. Characters outside
//! Latin-1 are replaced with `?`.

use std::fmt::Write;

const PAGE_W: f64 = 595.28;
const PAGE_H: f64 = 841.89;
const MM: f64 = 72.0 / 25.4;
const MARGIN: f64 = 10.0 * MM;
const LINE_H: f64 = 10.0 * MM;
const FONT_SIZE: f64 = 12.0;

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];
const DEFAULT_WIDTH: u16 = 556;

/// Render `text` as a complete PDF file
pub fn render_text_pdf(text: &str) -> Vec<u8> {
    let max_width = (PAGE_W - 2.0 * MARGIN) * 1000.0 / FONT_SIZE;
    let lines = wrap_lines(&to_latin1(text), max_width);
    let per_page = lines_per_page();

    let pages: Vec<&[Vec<u8>]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(per_page).collect()
    };

    // 1: catalog, 2: pages, 3: font, then (page, content) pairs
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(3 + 2 * pages.len());

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            pages.len()
        )
        .into_bytes(),
    );
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                PAGE_W,
                PAGE_H,
                id + 1
            )
            .into_bytes(),
        );

        let stream = content_stream(page);
        let mut obj = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        obj.extend_from_slice(&stream);
        obj.extend_from_slice(b"\nendstream");
        objects.push(obj);
    }

    assemble(&objects)
}

fn lines_per_page() -> usize {
    (((PAGE_H - 2.0 * MARGIN) / LINE_H).floor() as usize).max(1)
}

fn content_stream(lines: &[Vec<u8>]) -> Vec<u8> {
    let mut out = String::new();
    let _ = writeln!(out, "BT /F1 {} Tf", FONT_SIZE);
    for (i, line) in lines.iter().enumerate() {
        // baseline sits in the lower part of each 10mm cell
        let y = PAGE_H - MARGIN - LINE_H * (i as f64 + 1.0) + (LINE_H - FONT_SIZE) / 2.0 + 2.0;
        let _ = writeln!(
            out,
            "1 0 0 1 {:.2} {:.2} Tm ({}) Tj",
            MARGIN,
            y,
            escape(line)
        );
    }
    out.push_str("ET");
    out.into_bytes()
}

fn assemble(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in offsets {
        let _ = write!(xref, "{:010} 00000 n \n", off);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Latin-1 bytes; other characters become `?`, tabs become spaces
fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\t' => b' ',
            c if (c as u32) < 256 => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn char_width(b: u8) -> f64 {
    match b {
        0x20..=0x7E => HELVETICA_WIDTHS[(b - 0x20) as usize] as f64,
        _ => DEFAULT_WIDTH as f64,
    }
}

fn width(bytes: &[u8]) -> f64 {
    bytes.iter().map(|b| char_width(*b)).sum()
}

/// Greedy word wrap; words wider than a line are broken by character
fn wrap_lines(text: &[u8], max_width: f64) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();

    for paragraph in text.split(|b| *b == b'\n') {
        let mut line: Vec<u8> = Vec::new();

        for word in paragraph.split(|b| *b == b' ') {
            let sep = if line.is_empty() { 0.0 } else { char_width(b' ') };
            if width(&line) + sep + width(word) <= max_width {
                if !line.is_empty() {
                    line.push(b' ');
                }
                line.extend_from_slice(word);
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for b in word {
                if !line.is_empty() && width(&line) + char_width(*b) > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(*b);
            }
        }
        lines.push(line);
    }

    // no trailing blank line for text ending in a newline
    if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn escape(line: &[u8]) -> String {
    let mut out = String::with_capacity(line.len());
    for b in line {
        match b {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(*b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}
