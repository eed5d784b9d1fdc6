//! Minimal PDF 1.4 serializer for the layout page model.
//!
//! Emits the base-14 Helvetica fonts with WinAnsi encoding, one content
//! stream per page and a classic cross-reference table. Output is
//! byte-for-byte deterministic for a given page model.

use crate::layout::{Align, Document, PAGE_HEIGHT, PAGE_WIDTH, Page};
use crate::metrics::text_width;

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Serialize a page model into a self-contained PDF byte stream.
///
/// Object numbering: 1 catalog, 2 page tree, 3 regular font, 4 bold font,
/// then one page object and one content stream per page.
pub fn document_to_pdf(document: &Document) -> Vec<u8> {
    let page_count = document.pages.len();
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + 2 * page_count);

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect();
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        )
        .into_bytes(),
    );
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    for (i, page) in document.pages.iter().enumerate() {
        let content = page_content(page);
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH * MM_TO_PT,
                PAGE_HEIGHT * MM_TO_PT,
                6 + 2 * i
            )
            .into_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    // Binary marker comment so transports treat the file as binary.
    out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn page_content(page: &Page) -> Vec<u8> {
    let mut ops: Vec<u8> = Vec::new();
    for block in &page.blocks {
        let start_x = match block.align {
            Align::Left => block.x,
            Align::Center => block.x - text_width(&block.text, block.size, block.bold) / 2.0,
        };
        let x = start_x * MM_TO_PT;
        // PDF device space grows upward from the bottom-left corner.
        let y = (PAGE_HEIGHT - block.y) * MM_TO_PT;
        let font = if block.bold { "F2" } else { "F1" };
        let shade = block.shade.map(|s| s as f64 / 255.0).unwrap_or(0.0);

        ops.extend_from_slice(b"BT\n");
        ops.extend_from_slice(format!("/{} {:.2} Tf\n", font, block.size).as_bytes());
        ops.extend_from_slice(format!("{:.3} g\n", shade).as_bytes());
        ops.extend_from_slice(format!("{:.2} {:.2} Td\n", x, y).as_bytes());
        ops.push(b'(');
        ops.extend_from_slice(&escape_text(&block.text));
        ops.extend_from_slice(b") Tj\nET\n");
    }
    ops
}

/// WinAnsi-encode a string and escape it for a PDF literal string. Characters
/// with no WinAnsi mapping degrade to a question mark.
fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte: u8 = match ch {
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        };
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            _ => out.push(byte),
        }
    }
    out
}
